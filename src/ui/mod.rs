//! Navigation state machine and screen models.
//!
//! The UI is pure: `handle_key` consumes a classified key press plus a
//! read-only view of the application state and yields commands; `render`
//! produces a [`ScreenModel`] for whatever display adapter is attached.
//! No hardware calls happen here.

pub mod help;
pub mod menu;
pub mod scrollbar;

use core::fmt::Write as _;

use crate::app::commands::AppCommand;
use crate::config::StartScreen;
use crate::events::{Key, Press};
use crate::modes::{self, IDLE_MODE, InverterKind};
use menu::{ListCursor, MenuRow, VISIBLE_ROWS};

/// The screens of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    SelectInverter,
    Menu,
    Settings,
    Help,
}

/// Read-only application state the UI needs for row building and dispatch.
#[derive(Debug, Clone, Copy)]
pub struct UiContext {
    pub powered: bool,
    pub active_mode: Option<usize>,
    pub limit_enabled: bool,
    /// Seconds left on the runtime countdown, when one is running.
    pub countdown_secs: Option<u32>,
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowModel {
    pub text: &'static str,
    pub selected: bool,
    /// Checkmark on the right (active mode, selected inverter family).
    pub checked: bool,
    /// Trailing value column ("Yes" / "No", "120 Hz").
    pub value: Option<heapless::String<12>>,
}

impl RowModel {
    pub(crate) fn plain(text: &'static str) -> Self {
        Self { text, selected: false, checked: false, value: None }
    }
}

/// Everything a display adapter needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScreenModel {
    pub title: heapless::String<24>,
    pub rows: heapless::Vec<RowModel, 6>,
    /// Runtime countdown badge, top right.
    pub countdown_secs: Option<u32>,
    /// Thumb top edge on the dotted rail, when the content scrolls.
    pub scrollbar_thumb_y: Option<u32>,
    /// Footer overlay text.
    pub hint: Option<&'static str>,
}

const HINT_EXIT: &str = "Hold BACK to exit";

/// Fixed-size value-column text for a boolean setting.
pub fn yes_no(v: bool) -> heapless::String<12> {
    let mut s = heapless::String::new();
    let _ = s.push_str(if v { "Yes" } else { "No" });
    s
}

// Settings rows by fixed index.  Row 2 is a non-selectable section header.
const SET_LIMIT: usize = 0;
const SET_CAPTCHA: usize = 1;
const SET_HEADER: usize = 2;
const SET_EMBRACO: usize = 3;
const SET_SAMSUNG: usize = 4;
const SET_ROWS: usize = 5;

/// Navigation state.
pub struct UiState {
    screen: Screen,
    menu: ListCursor,
    settings: ListCursor,
    select_cursor: usize,
    help_top: usize,
    hint_visible: bool,
    inverter: InverterKind,
    /// "Arrow captcha" preference: require an UP/DOWN sequence instead of a
    /// plain OK in confirmation dialogs.
    arrow_captcha: bool,
}

impl UiState {
    pub fn new(start: StartScreen) -> Self {
        let screen = match start {
            StartScreen::SelectInverter => Screen::SelectInverter,
            StartScreen::Menu => Screen::Menu,
            StartScreen::Help => Screen::Help,
        };
        Self {
            screen,
            menu: ListCursor::new(),
            settings: ListCursor::new(),
            select_cursor: 0,
            help_top: 0,
            hint_visible: false,
            inverter: InverterKind::default(),
            arrow_captcha: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn inverter(&self) -> InverterKind {
        self.inverter
    }

    pub fn arrow_captcha(&self) -> bool {
        self.arrow_captcha
    }

    /// Hint overlay timeout fired.
    pub fn clear_hint(&mut self) {
        self.hint_visible = false;
    }

    /// Dispatch one classified key press.  Long BACK never reaches this
    /// point; the control loop consumes it globally as the exit chord.
    pub fn handle_key(
        &mut self,
        key: Key,
        press: Press,
        ctx: &UiContext,
    ) -> heapless::Vec<AppCommand, 2> {
        let mut out = heapless::Vec::new();
        match self.screen {
            Screen::SelectInverter => self.on_select_key(key, press, &mut out),
            Screen::Menu => self.on_menu_key(key, press, ctx, &mut out),
            Screen::Settings => self.on_settings_key(key, press, ctx, &mut out),
            Screen::Help => self.on_help_key(key, press),
        }
        out
    }

    fn on_select_key(&mut self, key: Key, press: Press, out: &mut heapless::Vec<AppCommand, 2>) {
        match (key, press) {
            (Key::Up | Key::Down, Press::Short | Press::Repeat) => {
                self.select_cursor ^= 1;
            }
            (Key::Ok, Press::Short) => {
                self.inverter = if self.select_cursor == 0 {
                    InverterKind::Embraco
                } else {
                    InverterKind::Samsung
                };
                let _ = out.push(AppCommand::SelectInverter(self.inverter));
                self.goto_menu();
            }
            (Key::Back, Press::Short) => self.show_hint(out),
            _ => {}
        }
    }

    fn on_menu_key(
        &mut self,
        key: Key,
        press: Press,
        ctx: &UiContext,
        out: &mut heapless::Vec<AppCommand, 2>,
    ) {
        let rows = menu::menu_rows(ctx.powered);
        self.menu.clamp(rows.len());
        match (key, press) {
            (Key::Up, Press::Short | Press::Repeat) => self.menu.up(rows.len()),
            (Key::Down, Press::Short | Press::Repeat) => self.menu.down(rows.len()),
            (Key::Ok, Press::Short) => match rows[self.menu.cursor()] {
                MenuRow::Mode(idx) => {
                    let _ = out.push(AppCommand::ApplyMode(idx));
                }
                MenuRow::PowerOn => {
                    let _ = out.push(AppCommand::RequestPowerOn);
                }
                MenuRow::PowerOff => {
                    let _ = out.push(AppCommand::PowerOff);
                }
                MenuRow::Settings => {
                    self.settings.reset();
                    self.screen = Screen::Settings;
                }
                MenuRow::Help => {
                    self.standby_first(ctx, out);
                    self.help_top = 0;
                    self.screen = Screen::Help;
                }
            },
            (Key::Back, Press::Short) => self.show_hint(out),
            _ => {}
        }
    }

    fn on_settings_key(
        &mut self,
        key: Key,
        press: Press,
        ctx: &UiContext,
        out: &mut heapless::Vec<AppCommand, 2>,
    ) {
        match (key, press) {
            (Key::Up, Press::Short | Press::Repeat) => {
                let prev = match self.settings.cursor() {
                    0 => SET_ROWS - 1,
                    c if c - 1 == SET_HEADER => SET_HEADER - 1,
                    c => c - 1,
                };
                self.settings.jump_to(prev);
            }
            (Key::Down, Press::Short | Press::Repeat) => {
                let next = match self.settings.cursor() + 1 {
                    n if n == SET_HEADER => SET_HEADER + 1,
                    n if n >= SET_ROWS => 0,
                    n => n,
                };
                self.settings.jump_to(next);
            }
            (Key::Ok, Press::Short) => match self.settings.cursor() {
                SET_LIMIT => {
                    let _ = out.push(AppCommand::RequestLimitToggle);
                }
                SET_CAPTCHA => self.arrow_captcha = !self.arrow_captcha,
                SET_EMBRACO => self.pick_inverter(InverterKind::Embraco, out),
                SET_SAMSUNG => self.pick_inverter(InverterKind::Samsung, out),
                _ => {}
            },
            (Key::Back, Press::Short) => self.goto_menu(),
            _ => {}
        }
        // `ctx` is unused on this screen today; kept so all screen handlers
        // share one signature.
        let _ = ctx;
    }

    fn on_help_key(&mut self, key: Key, press: Press) {
        let total = self.inverter.help_lines().len();
        match (key, press) {
            (Key::Up, Press::Short | Press::Repeat) => {
                self.help_top = help::scroll_up(self.help_top);
            }
            (Key::Down, Press::Short | Press::Repeat) => {
                self.help_top = help::scroll_down(self.help_top, total);
            }
            (Key::Back, Press::Short) => self.goto_menu(),
            _ => {}
        }
    }

    /// Switching the inverter family powers off and lands back in the
    /// unpowered menu, so the new family always starts from the safe state.
    /// Re-picking the current family does nothing.
    fn pick_inverter(&mut self, kind: InverterKind, out: &mut heapless::Vec<AppCommand, 2>) {
        if self.inverter != kind {
            self.inverter = kind;
            let _ = out.push(AppCommand::PowerOff);
            let _ = out.push(AppCommand::SelectInverter(kind));
            self.goto_menu();
        }
    }

    /// Help is a read-only screen; a spinning compressor drops to standby
    /// before it is shown.  Settings stays live so the runtime limit can be
    /// toggled mid-run.
    fn standby_first(&mut self, ctx: &UiContext, out: &mut heapless::Vec<AppCommand, 2>) {
        if ctx.powered && ctx.active_mode != Some(IDLE_MODE) {
            let _ = out.push(AppCommand::ApplyMode(IDLE_MODE));
        }
    }

    fn show_hint(&mut self, out: &mut heapless::Vec<AppCommand, 2>) {
        self.hint_visible = true;
        let _ = out.push(AppCommand::ShowExitHint);
    }

    fn goto_menu(&mut self) {
        self.screen = Screen::Menu;
        self.menu.reset();
    }

    // -- rendering ----------------------------------------------------------

    /// Build the frame for the current screen.
    pub fn render(&self, ctx: &UiContext) -> ScreenModel {
        let mut model = match self.screen {
            Screen::SelectInverter => self.render_select(),
            Screen::Menu => self.render_menu(ctx),
            Screen::Settings => self.render_settings(ctx),
            Screen::Help => self.render_help(),
        };
        if self.hint_visible {
            model.hint = Some(HINT_EXIT);
        }
        model
    }

    fn render_select(&self) -> ScreenModel {
        let mut model = ScreenModel::default();
        let _ = model.title.push_str("Select inverter");
        for (idx, kind) in [InverterKind::Embraco, InverterKind::Samsung].iter().enumerate() {
            let _ = model.rows.push(RowModel {
                text: kind.name(),
                selected: idx == self.select_cursor,
                checked: false,
                value: None,
            });
        }
        model
    }

    fn render_menu(&self, ctx: &UiContext) -> ScreenModel {
        let mut model = ScreenModel::default();
        let _ = write!(model.title, "{} starter", self.inverter.name());
        model.countdown_secs = ctx.countdown_secs.filter(|&s| s > 0);

        let rows = menu::menu_rows(ctx.powered);
        let mut cursor = self.menu;
        cursor.clamp(rows.len());
        let window = cursor.first_visible()..(cursor.first_visible() + VISIBLE_ROWS).min(rows.len());
        for idx in window {
            let (text, checked) = match rows[idx] {
                MenuRow::Mode(m) => {
                    let name = modes::mode_at(m).map_or("?", |mode| mode.name);
                    (name, ctx.active_mode == Some(m))
                }
                MenuRow::PowerOn => ("Power on", false),
                MenuRow::PowerOff => ("Power off", false),
                MenuRow::Settings => ("Settings", false),
                MenuRow::Help => ("Help", false),
            };
            let _ = model.rows.push(RowModel {
                text,
                selected: idx == cursor.cursor(),
                checked,
                value: None,
            });
        }
        if rows.len() > VISIBLE_ROWS {
            model.scrollbar_thumb_y = scrollbar::thumb_y(rows.len() as u32, cursor.cursor() as u32);
        }
        model
    }

    fn render_settings(&self, ctx: &UiContext) -> ScreenModel {
        let mut model = ScreenModel::default();
        let _ = model.title.push_str("Settings");

        let all: [RowModel; SET_ROWS] = [
            RowModel {
                value: Some(yes_no(ctx.limit_enabled)),
                ..RowModel::plain("Limit run time")
            },
            RowModel {
                value: Some(yes_no(self.arrow_captcha)),
                ..RowModel::plain("Arrow captcha")
            },
            RowModel::plain("Inverter type"),
            RowModel {
                checked: self.inverter == InverterKind::Embraco,
                ..RowModel::plain("Embraco")
            },
            RowModel {
                checked: self.inverter == InverterKind::Samsung,
                ..RowModel::plain("Samsung")
            },
        ];

        let first = self.settings.first_visible();
        for (idx, mut row) in all.into_iter().enumerate().skip(first).take(VISIBLE_ROWS) {
            row.selected = idx == self.settings.cursor();
            let _ = model.rows.push(row);
        }
        model.scrollbar_thumb_y =
            scrollbar::thumb_y(SET_ROWS as u32, self.settings.cursor() as u32);
        model
    }

    fn render_help(&self) -> ScreenModel {
        let mut model = ScreenModel::default();
        let lines = self.inverter.help_lines();
        for line in lines.iter().skip(self.help_top).take(help::HELP_VISIBLE_LINES) {
            let _ = model.rows.push(RowModel::plain(line));
        }
        let positions = help::max_top_line(lines.len()) + 1;
        if positions > 1 {
            model.scrollbar_thumb_y = scrollbar::thumb_y(positions as u32, self.help_top as u32);
        }
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(powered: bool, active: Option<usize>) -> UiContext {
        UiContext {
            powered,
            active_mode: active,
            limit_enabled: true,
            countdown_secs: None,
        }
    }

    fn press(ui: &mut UiState, key: Key, c: &UiContext) -> Vec<AppCommand> {
        ui.handle_key(key, Press::Short, c).to_vec()
    }

    fn menu_state() -> UiState {
        UiState::new(StartScreen::Menu)
    }

    #[test]
    fn select_screen_picks_family_and_enters_menu() {
        let mut ui = UiState::new(StartScreen::SelectInverter);
        let c = ctx(false, None);
        press(&mut ui, Key::Down, &c);
        let cmds = press(&mut ui, Key::Ok, &c);
        assert_eq!(cmds, vec![AppCommand::SelectInverter(InverterKind::Samsung)]);
        assert_eq!(ui.screen(), Screen::Menu);
        assert_eq!(ui.inverter(), InverterKind::Samsung);
    }

    #[test]
    fn unpowered_ok_on_first_row_requests_power_on() {
        let mut ui = menu_state();
        let c = ctx(false, None);
        let cmds = press(&mut ui, Key::Ok, &c);
        assert_eq!(cmds, vec![AppCommand::RequestPowerOn]);
    }

    #[test]
    fn powered_menu_selects_modes_by_row() {
        let mut ui = menu_state();
        let c = ctx(true, Some(0));
        press(&mut ui, Key::Down, &c);
        press(&mut ui, Key::Down, &c);
        let cmds = press(&mut ui, Key::Ok, &c);
        assert_eq!(cmds, vec![AppCommand::ApplyMode(2)]);
    }

    #[test]
    fn power_off_row_follows_modes() {
        let mut ui = menu_state();
        let c = ctx(true, Some(0));
        for _ in 0..crate::modes::mode_count() {
            press(&mut ui, Key::Down, &c);
        }
        let cmds = press(&mut ui, Key::Ok, &c);
        assert_eq!(cmds, vec![AppCommand::PowerOff]);
    }

    #[test]
    fn entering_help_while_spinning_drops_to_standby() {
        let mut ui = menu_state();
        let c = ctx(true, Some(3));
        // Navigate to the Help row (last).
        press(&mut ui, Key::Up, &c);
        let cmds = press(&mut ui, Key::Ok, &c);
        assert_eq!(cmds, vec![AppCommand::ApplyMode(IDLE_MODE)]);
        assert_eq!(ui.screen(), Screen::Help);
    }

    #[test]
    fn entering_settings_keeps_the_active_mode_running() {
        let mut ui = menu_state();
        let c = ctx(true, Some(3));
        press(&mut ui, Key::Up, &c); // Help
        press(&mut ui, Key::Up, &c); // Settings
        let cmds = press(&mut ui, Key::Ok, &c);
        assert!(cmds.is_empty(), "settings entry must not touch the mode");
        assert_eq!(ui.screen(), Screen::Settings);
    }

    #[test]
    fn short_back_on_menu_shows_exit_hint() {
        let mut ui = menu_state();
        let c = ctx(false, None);
        let cmds = press(&mut ui, Key::Back, &c);
        assert_eq!(cmds, vec![AppCommand::ShowExitHint]);
        assert_eq!(ui.render(&c).hint, Some(HINT_EXIT));
        ui.clear_hint();
        assert_eq!(ui.render(&c).hint, None);
    }

    #[test]
    fn settings_cursor_skips_the_section_header() {
        let mut ui = menu_state();
        let c = ctx(false, None);
        press(&mut ui, Key::Down, &c); // Settings row

        press(&mut ui, Key::Ok, &c);
        assert_eq!(ui.screen(), Screen::Settings);

        press(&mut ui, Key::Down, &c); // 0 -> 1
        press(&mut ui, Key::Down, &c); // 1 -> 3, skipping header
        let cmds = press(&mut ui, Key::Ok, &c);
        // Embraco already selected: no command, no change.
        assert!(cmds.is_empty());
        assert_eq!(ui.screen(), Screen::Settings);

        press(&mut ui, Key::Down, &c); // 3 -> 4
        press(&mut ui, Key::Down, &c); // 4 -> 0 wrap
        press(&mut ui, Key::Up, &c); // 0 -> 4 wrap
        press(&mut ui, Key::Up, &c); // 4 -> 3
        press(&mut ui, Key::Up, &c); // 3 -> 1, skipping header
        let cmds = press(&mut ui, Key::Ok, &c);
        assert!(cmds.is_empty(), "captcha toggle is local");
        assert!(ui.arrow_captcha());
    }

    #[test]
    fn changing_family_in_settings_powers_off_into_the_menu() {
        let mut ui = menu_state();
        let c = ctx(true, Some(2));
        press(&mut ui, Key::Up, &c); // Help
        press(&mut ui, Key::Up, &c); // Settings
        press(&mut ui, Key::Ok, &c);
        assert_eq!(ui.screen(), Screen::Settings);

        for _ in 0..3 {
            press(&mut ui, Key::Down, &c); // Samsung row
        }
        let cmds = press(&mut ui, Key::Ok, &c);
        assert_eq!(
            cmds,
            vec![AppCommand::PowerOff, AppCommand::SelectInverter(InverterKind::Samsung)]
        );
        assert_eq!(ui.screen(), Screen::Menu);
        assert_eq!(ui.inverter(), InverterKind::Samsung);
    }

    #[test]
    fn limit_row_emits_toggle_request() {
        let mut ui = menu_state();
        let c = ctx(false, None);
        press(&mut ui, Key::Down, &c);
        press(&mut ui, Key::Ok, &c);
        let cmds = press(&mut ui, Key::Ok, &c);
        assert_eq!(cmds, vec![AppCommand::RequestLimitToggle]);
    }

    #[test]
    fn help_scrolls_and_back_returns_to_menu() {
        let mut ui = menu_state();
        let c = ctx(false, None);
        press(&mut ui, Key::Up, &c); // Help row
        press(&mut ui, Key::Ok, &c);
        assert_eq!(ui.screen(), Screen::Help);

        let first = ui.render(&c).rows[0].clone();
        ui.handle_key(Key::Down, Press::Repeat, &c);
        assert_ne!(ui.render(&c).rows[0], first);
        ui.handle_key(Key::Up, Press::Short, &c);
        assert_eq!(ui.render(&c).rows[0], first);

        press(&mut ui, Key::Back, &c);
        assert_eq!(ui.screen(), Screen::Menu);
    }

    #[test]
    fn menu_scrollbar_only_when_rows_overflow() {
        let ui = menu_state();
        assert_eq!(ui.render(&ctx(false, None)).scrollbar_thumb_y, None);
        assert!(ui.render(&ctx(true, Some(0))).scrollbar_thumb_y.is_some());
    }

    #[test]
    fn countdown_badge_shows_only_while_counting() {
        let ui = menu_state();
        let mut c = ctx(true, Some(1));
        c.countdown_secs = Some(42);
        assert_eq!(ui.render(&c).countdown_secs, Some(42));
        c.countdown_secs = Some(0);
        assert_eq!(ui.render(&c).countdown_secs, None);
    }

    #[test]
    fn menu_viewport_holds_four_rows() {
        let mut ui = menu_state();
        let c = ctx(true, Some(0));
        let model = ui.render(&c);
        assert_eq!(model.rows.len(), VISIBLE_ROWS);
        // Scroll to the bottom: viewport still four rows, last selected.
        for _ in 0..6 {
            press(&mut ui, Key::Down, &c);
        }
        let model = ui.render(&c);
        assert_eq!(model.rows.len(), VISIBLE_ROWS);
        assert!(model.rows.last().unwrap().selected);
        assert_eq!(model.rows.last().unwrap().text, "Help");
    }
}
