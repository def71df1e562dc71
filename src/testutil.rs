//! Recording mock ports shared by the unit tests.

use crate::app::events::AppEvent;
use crate::app::ports::{
    ActuatorPort, DialogPort, EventSink, TimerId, TimerPort, ToolIoPort,
};

/// One recorded actuator call, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    HiZ,
    DriveLow,
    PwmStart { freq_hz: u32, duty: u8 },
    PwmStop,
    Settle(u32),
    Led(bool),
}

#[derive(Default)]
pub struct MockHw {
    pub calls: Vec<HwCall>,
    pwm_on: bool,
    pub led_on: bool,
}

impl ActuatorPort for MockHw {
    fn pin_hi_z(&mut self) {
        self.calls.push(HwCall::HiZ);
    }

    fn pin_drive_low(&mut self) {
        self.calls.push(HwCall::DriveLow);
    }

    fn pwm_start(&mut self, freq_hz: u32, duty_percent: u8) {
        self.pwm_on = true;
        self.calls.push(HwCall::PwmStart { freq_hz, duty: duty_percent });
    }

    fn pwm_stop(&mut self) {
        self.pwm_on = false;
        self.calls.push(HwCall::PwmStop);
    }

    fn pwm_running(&self) -> bool {
        self.pwm_on
    }

    fn settle_delay(&mut self, ms: u32) {
        self.calls.push(HwCall::Settle(ms));
    }

    fn led_set(&mut self, on: bool) {
        self.led_on = on;
        self.calls.push(HwCall::Led(on));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerCall {
    Periodic(TimerId, u32),
    Oneshot(TimerId, u32),
    Cancel(TimerId),
    CancelAll,
}

#[derive(Default)]
pub struct MockTimers {
    pub calls: Vec<TimerCall>,
}

impl TimerPort for MockTimers {
    fn start_periodic(&mut self, id: TimerId, period_ms: u32) {
        self.calls.push(TimerCall::Periodic(id, period_ms));
    }

    fn start_oneshot(&mut self, id: TimerId, delay_ms: u32) {
        self.calls.push(TimerCall::Oneshot(id, delay_ms));
    }

    fn cancel(&mut self, id: TimerId) {
        self.calls.push(TimerCall::Cancel(id));
    }

    fn cancel_all(&mut self) {
        self.calls.push(TimerCall::CancelAll);
    }
}

/// Dialog that answers from a script, recording each prompt header.
pub struct ScriptedDialog {
    pub answers: Vec<bool>,
    pub prompts: Vec<String>,
}

impl ScriptedDialog {
    pub fn answering(answers: &[bool]) -> Self {
        // Reversed so pop() yields answers in call order.
        Self { answers: answers.iter().rev().copied().collect(), prompts: Vec::new() }
    }
}

impl DialogPort for ScriptedDialog {
    fn confirm(&mut self, header: &str, _body: &str) -> bool {
        self.prompts.push(header.to_owned());
        self.answers.pop().unwrap_or(false)
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

/// Tool pin fabric: levels are indexed by GPIO number.
#[derive(Default)]
pub struct MockToolIo {
    pub out_levels: std::collections::HashMap<i32, bool>,
    pub in_levels: std::collections::HashMap<i32, bool>,
}

impl ToolIoPort for MockToolIo {
    fn out_init(&mut self, gpio: i32, level_high: bool) {
        self.out_levels.insert(gpio, level_high);
    }

    fn out_write(&mut self, gpio: i32, level_high: bool) {
        self.out_levels.insert(gpio, level_high);
    }

    fn in_init(&mut self, gpio: i32) {
        self.in_levels.entry(gpio).or_insert(true);
    }

    fn in_read(&mut self, gpio: i32) -> bool {
        self.in_levels.get(&gpio).copied().unwrap_or(true)
    }
}
