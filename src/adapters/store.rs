//! Filesystem persistence adapter.
//!
//! Profiles are human-readable `key=value` files (one per model, editable
//! over the debug console); the system configuration is a compact postcard
//! blob.  On the device the backing directory lives on the FAT partition,
//! on the host wherever the caller points it.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::warn;

use crate::app::ports::StorePort;
use crate::config::SystemConfig;
use crate::error::StoreError;
use crate::tool::profile::GpioProfile;

const CONFIG_FILE: &str = "config.bin";

/// `key=value` / postcard store rooted at one directory.
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn profile_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.profile", name.to_ascii_lowercase()))
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            warn!("store: cannot create {}: {e}", self.dir.display());
            StoreError::IoError
        })
    }

    fn read_file(path: &Path) -> Result<Vec<u8>, StoreError> {
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound),
            Err(e) => {
                warn!("store: read {}: {e}", path.display());
                Err(StoreError::IoError)
            }
        }
    }
}

impl StorePort for FsStore {
    fn load_profile(&self, name: &str, profile: &mut GpioProfile) -> Result<(), StoreError> {
        let bytes = Self::read_file(&self.profile_path(name))?;
        let text = core::str::from_utf8(&bytes).map_err(|_| StoreError::Corrupted)?;
        profile.apply_record(text)
    }

    fn save_profile(&mut self, name: &str, profile: &GpioProfile) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let path = self.profile_path(name);
        fs::write(&path, profile.to_record()).map_err(|e| {
            warn!("store: write {}: {e}", path.display());
            StoreError::IoError
        })
    }

    fn load_config(&self) -> Result<SystemConfig, StoreError> {
        let bytes = Self::read_file(&self.dir.join(CONFIG_FILE))?;
        postcard::from_bytes(&bytes).map_err(|e| {
            warn!("store: config blob rejected: {e}");
            StoreError::Corrupted
        })
    }

    fn save_config(&mut self, config: &SystemConfig) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| StoreError::IoError)?;
        fs::write(self.dir.join(CONFIG_FILE), bytes).map_err(|e| {
            warn!("store: write config: {e}");
            StoreError::IoError
        })
    }
}
