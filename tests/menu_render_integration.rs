//! Screen-model integration: key presses in, rendered frames out.
//!
//! Uses a capturing display adapter so the frames the firmware would draw
//! are asserted directly, checkmarks and countdown badge included.

use invstarter::app::events::AppEvent;
use invstarter::app::ports::{ActuatorPort, DialogPort, DisplayPort, EventSink, TimerPort};
use invstarter::app::service::AppService;
use invstarter::config::{StartScreen, SystemConfig};
use invstarter::events::{Event, Key, Press};
use invstarter::ui::ScreenModel;

struct NullHw;
impl ActuatorPort for NullHw {
    fn pin_hi_z(&mut self) {}
    fn pin_drive_low(&mut self) {}
    fn pwm_start(&mut self, _freq_hz: u32, _duty_percent: u8) {}
    fn pwm_stop(&mut self) {}
    fn pwm_running(&self) -> bool {
        false
    }
    fn settle_delay(&mut self, _ms: u32) {}
    fn led_set(&mut self, _on: bool) {}
}

struct NullTimers;
impl TimerPort for NullTimers {
    fn start_periodic(&mut self, _id: invstarter::app::ports::TimerId, _period_ms: u32) {}
    fn start_oneshot(&mut self, _id: invstarter::app::ports::TimerId, _delay_ms: u32) {}
    fn cancel(&mut self, _id: invstarter::app::ports::TimerId) {}
    fn cancel_all(&mut self) {}
}

struct YesDialog;
impl DialogPort for YesDialog {
    fn confirm(&mut self, _header: &str, _body: &str) -> bool {
        true
    }
}

struct NullSink;
impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

#[derive(Default)]
struct CaptureDisplay {
    last: Option<ScreenModel>,
}

impl DisplayPort for CaptureDisplay {
    fn present(&mut self, model: &ScreenModel) {
        self.last = Some(model.clone());
    }
}

struct Rig {
    app: AppService,
    display: CaptureDisplay,
}

impl Rig {
    fn new(start: StartScreen) -> Self {
        let config = SystemConfig { start_screen: start, ..SystemConfig::default() };
        Self { app: AppService::new(config), display: CaptureDisplay::default() }
    }

    fn key(&mut self, key: Key) {
        self.app.handle_event(
            Event::Key { key, press: Press::Short },
            &mut NullHw,
            &mut NullTimers,
            &mut YesDialog,
            &mut NullSink,
        );
    }

    fn event(&mut self, event: Event) {
        self.app
            .handle_event(event, &mut NullHw, &mut NullTimers, &mut YesDialog, &mut NullSink);
    }

    fn frame(&mut self) -> ScreenModel {
        self.app.render(&mut self.display);
        self.display.last.clone().unwrap()
    }
}

#[test]
fn select_screen_feeds_the_menu_title() {
    let mut rig = Rig::new(StartScreen::SelectInverter);

    let frame = rig.frame();
    assert_eq!(frame.title.as_str(), "Select inverter");
    assert_eq!(frame.rows.len(), 2);
    assert_eq!(frame.rows[0].text, "Embraco");
    assert!(frame.rows[0].selected);

    rig.key(Key::Down);
    rig.key(Key::Ok);
    let frame = rig.frame();
    assert_eq!(frame.title.as_str(), "Samsung starter");
}

#[test]
fn checkmark_and_badge_track_the_applied_mode() {
    let mut rig = Rig::new(StartScreen::Menu);

    rig.key(Key::Ok); // power on
    rig.key(Key::Down);
    rig.key(Key::Ok); // Low speed

    let frame = rig.frame();
    let low = frame.rows.iter().find(|r| r.text == "Low speed").unwrap();
    assert!(low.checked, "applied mode carries the checkmark");
    assert!(low.selected);
    assert!(!frame.rows.iter().any(|r| r.text == "Stand by" && r.checked));
    assert_eq!(frame.countdown_secs, Some(120));
    assert!(frame.scrollbar_thumb_y.is_some(), "7 rows overflow the viewport");

    // Two display ticks later the badge follows the limiter.
    rig.event(Event::RuntimeTick);
    rig.event(Event::RuntimeTick);
    assert_eq!(rig.frame().countdown_secs, Some(118));
}

#[test]
fn power_off_collapses_the_menu() {
    let mut rig = Rig::new(StartScreen::Menu);
    rig.key(Key::Ok); // power on
    rig.key(Key::Down);
    rig.key(Key::Ok); // Low speed

    // Down to the Power off row: Low -> Mid -> Max -> Power off.
    rig.key(Key::Down);
    rig.key(Key::Down);
    rig.key(Key::Down);
    rig.key(Key::Ok);

    let frame = rig.frame();
    let texts: Vec<_> = frame.rows.iter().map(|r| r.text).collect();
    assert_eq!(texts, vec!["Power on", "Settings", "Help"]);
    assert_eq!(frame.scrollbar_thumb_y, None, "three rows fit without scrolling");
    assert_eq!(frame.countdown_secs, None);
}

#[test]
fn hint_overlay_appears_and_times_out() {
    let mut rig = Rig::new(StartScreen::Menu);

    rig.key(Key::Back);
    assert!(rig.frame().hint.is_some());

    rig.event(Event::HintTimeout);
    assert_eq!(rig.frame().hint, None);
}

#[test]
fn settings_values_reflect_live_state() {
    let mut rig = Rig::new(StartScreen::Menu);
    rig.key(Key::Down);
    rig.key(Key::Ok); // Settings

    let frame = rig.frame();
    assert_eq!(frame.title.as_str(), "Settings");
    let limit = frame.rows.iter().find(|r| r.text == "Limit run time").unwrap();
    assert_eq!(limit.value.as_ref().unwrap().as_str(), "Yes");
    assert!(frame.rows.iter().find(|r| r.text == "Embraco").unwrap().checked);

    // Toggling the limit off flips the value column (dialog auto-answers yes).
    rig.key(Key::Ok);
    let frame = rig.frame();
    let limit = frame.rows.iter().find(|r| r.text == "Limit run time").unwrap();
    assert_eq!(limit.value.as_ref().unwrap().as_str(), "No");
}
