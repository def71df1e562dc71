//! Property-based checks for the pure helpers: frame codec, scrollbar
//! geometry, list cursor invariants, event queue, profile records.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;

use invstarter::events::{self, Event, Key, Press};
use invstarter::tool::cf10b;
use invstarter::tool::profile::{GpioProfile, ModelKind};
use invstarter::ui::menu::{ListCursor, VISIBLE_ROWS};
use invstarter::ui::scrollbar::{self, THUMB_H, TRACK_Y0, TRACK_Y1};

fn arb_event() -> impl Strategy<Value = Event> {
    let keys = prop_oneof![
        Just(Key::Up),
        Just(Key::Down),
        Just(Key::Ok),
        Just(Key::Back)
    ];
    let presses = prop_oneof![Just(Press::Short), Just(Press::Long), Just(Press::Repeat)];
    prop_oneof![
        Just(Event::RuntimeExpired),
        Just(Event::RuntimeTick),
        Just(Event::LedToggle),
        Just(Event::HintTimeout),
        Just(Event::EngineTick),
        (keys, presses).prop_map(|(key, press)| Event::Key { key, press }),
    ]
}

proptest! {
    #[test]
    fn set_speed_frames_always_verify(rpm in any::<u16>()) {
        let frame = cf10b::build_set_speed(rpm);
        prop_assert!(cf10b::verify(&frame));
        prop_assert_eq!(frame[0], cf10b::HDR0);
        prop_assert_eq!(frame[1], cf10b::HDR1);
        let sum: u32 = frame.iter().map(|&b| u32::from(b)).sum();
        prop_assert_eq!(sum % 0x100, 0);
        let encoded = u16::from(frame[2]) | (u16::from(frame[3]) << 8);
        prop_assert!(encoded <= cf10b::RPM_MAX);
    }

    #[test]
    fn rpm_for_freq_is_monotonic_and_bounded(freq in 0u32..100_000) {
        let rpm = cf10b::rpm_for_freq(freq);
        prop_assert!(rpm <= cf10b::RPM_MAX);
        prop_assert!(cf10b::rpm_for_freq(freq + 1) >= rpm);
    }

    #[test]
    fn thumb_stays_on_the_track(total in 2u32..200, pos in 0u32..300) {
        let y = scrollbar::thumb_y(total, pos).unwrap();
        prop_assert!(y >= TRACK_Y0);
        prop_assert!(y + THUMB_H <= TRACK_Y1);
        if pos > 0 {
            prop_assert!(y >= scrollbar::thumb_y(total, pos - 1).unwrap());
        }
    }

    #[test]
    fn list_cursor_never_leaves_the_window(
        total in 1usize..10,
        moves in proptest::collection::vec(any::<bool>(), 0..40),
    ) {
        let mut c = ListCursor::new();
        for up in moves {
            if up { c.up(total) } else { c.down(total) }
            prop_assert!(c.cursor() < total);
            prop_assert!(c.first_visible() <= c.cursor());
            prop_assert!(c.cursor() < c.first_visible() + VISIBLE_ROWS);
        }
    }

    #[test]
    fn queue_preserves_events_in_order(
        batch in proptest::collection::vec(arb_event(), 0..30),
    ) {
        // This binary's only queue user, so the static ring is ours.
        while events::pop_event().is_some() {}
        for &event in &batch {
            prop_assert!(events::push_event(event));
        }
        for &event in &batch {
            prop_assert_eq!(events::pop_event(), Some(event));
        }
        prop_assert!(events::queue_is_empty());
    }

    #[test]
    fn profile_records_roundtrip(
        freq in 0u32..100_000,
        debounce in 0u32..10_000,
        active_high in any::<bool>(),
        blocks in any::<bool>(),
    ) {
        let mut p = GpioProfile::preset(ModelKind::Frequency);
        p.freq_hz = freq;
        p.debounce_ms = debounce;
        p.out_active_high = active_high;
        p.interlock_blocks_out = blocks;

        let mut q = GpioProfile::preset(ModelKind::Frequency);
        q.apply_record(&p.to_record()).unwrap();
        prop_assert_eq!(p, q);
    }
}
