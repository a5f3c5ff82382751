use std::cell::RefCell;
use std::rc::Rc;

use super::*;
use crate::clock::ManualTimers;
use crate::foundation::math::FixedUniform;
use crate::typewriter::config::{Phrases, VariableSpeed};

fn config(text: Phrases) -> TypewriterConfig {
    TypewriterConfig {
        text,
        start_on_visible: false,
        ..TypewriterConfig::default()
    }
}

/// Deliver timers until none remain, recording `(ms, displayed)` after each delivery.
fn drain(d: &mut TypewriterDriver, timers: &mut ManualTimers, limit: usize) -> Vec<(u64, String)> {
    let mut out = Vec::new();
    for _ in 0..limit {
        let Some(id) = timers.pop_next() else {
            break;
        };
        if d.on_timer(id, timers) {
            out.push((timers.now().as_millis() as u64, d.displayed().to_string()));
        }
    }
    out
}

#[test]
fn two_phrases_end_to_end() {
    let mut timers = ManualTimers::new();
    let mut d = TypewriterDriver::new(config(vec!["hi", "bye"].into())).unwrap();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    d.on_phrase_complete(move |text, idx| sink.borrow_mut().push((text.to_string(), idx)));

    assert!(d.start(&mut timers));
    let timeline = drain(&mut d, &mut timers, 100);
    let expected: Vec<(u64, String)> = [
        (0, "h"),
        (50, "hi"),
        (2050, "h"),
        (2080, ""),
        (2130, "b"),
        (2180, "by"),
        (2230, "bye"),
    ]
    .into_iter()
    .map(|(t, s)| (t, s.to_string()))
    .collect();
    assert_eq!(timeline, expected);
    assert_eq!(
        *seen.borrow(),
        vec![("hi".to_string(), 0), ("bye".to_string(), 1)]
    );
    assert!(d.is_done());
    assert!(timers.is_idle());
}

#[test]
fn initial_delay_postpones_the_first_character() {
    let mut timers = ManualTimers::new();
    let mut d = TypewriterDriver::new(TypewriterConfig {
        initial_delay_ms: 300,
        ..config("ok".into())
    })
    .unwrap();
    d.start(&mut timers);
    let timeline = drain(&mut d, &mut timers, 1);
    assert_eq!(timeline, vec![(300, "o".to_string())]);
}

#[test]
fn waits_for_visibility_when_configured() {
    let mut timers = ManualTimers::new();
    let mut d = TypewriterDriver::new(TypewriterConfig {
        start_on_visible: true,
        ..config("x".into())
    })
    .unwrap();
    assert!(!d.start(&mut timers));
    assert!(timers.is_idle());
    assert!(!d.set_visible(false, &mut timers));
    assert!(d.set_visible(true, &mut timers));
    assert!(!d.set_visible(true, &mut timers));
    assert!(d.has_pending_timer());
}

#[test]
fn visibility_alone_does_not_start() {
    let mut timers = ManualTimers::new();
    let mut d = TypewriterDriver::new(TypewriterConfig {
        start_on_visible: true,
        ..config("x".into())
    })
    .unwrap();
    assert!(!d.set_visible(true, &mut timers));
    assert!(d.start(&mut timers));
}

#[test]
fn variable_speed_draws_each_typing_delay() {
    let mut timers = ManualTimers::new();
    let mut d = TypewriterDriver::new(TypewriterConfig {
        variable_speed: Some(VariableSpeed { min: 10, max: 110 }),
        ..config("abc".into())
    })
    .unwrap()
    .with_rng(FixedUniform(0.25));
    d.start(&mut timers);
    let times: Vec<u64> = drain(&mut d, &mut timers, 10)
        .into_iter()
        .map(|(t, _)| t)
        .collect();
    assert_eq!(times, vec![0, 35, 70]);
}

#[test]
fn teardown_stops_and_ignores_late_deliveries() {
    let mut timers = ManualTimers::new();
    let mut d = TypewriterDriver::new(config("hello".into())).unwrap();
    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();
    d.on_phrase_complete(move |_, _| *sink.borrow_mut() += 1);
    d.start(&mut timers);
    drain(&mut d, &mut timers, 2);
    assert_eq!(d.displayed(), "he");

    let late = TimerId(9_999);
    d.teardown(&mut timers);
    d.teardown(&mut timers);
    assert!(timers.is_idle());
    assert!(!d.on_timer(late, &mut timers));
    assert_eq!(d.displayed(), "he");
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn reconfigure_cancels_and_restarts() {
    let mut timers = ManualTimers::new();
    let mut d = TypewriterDriver::new(config("abc".into())).unwrap();
    d.start(&mut timers);
    drain(&mut d, &mut timers, 2);
    assert_eq!(d.displayed(), "ab");

    d.reconfigure(
        TypewriterConfig {
            typing_speed_ms: 5,
            ..config("xy".into())
        },
        &mut timers,
    )
    .unwrap();
    assert_eq!(d.displayed(), "");
    let timeline = drain(&mut d, &mut timers, 10);
    let shown: Vec<&str> = timeline.iter().map(|(_, s)| s.as_str()).collect();
    assert_eq!(shown, vec!["x", "xy"]);
    assert!(d.is_done());
}

#[test]
fn reconfigure_before_start_does_not_start() {
    let mut timers = ManualTimers::new();
    let mut d = TypewriterDriver::new(config("abc".into())).unwrap();
    d.reconfigure(config("z".into()), &mut timers).unwrap();
    assert!(!d.is_started());
    assert!(timers.is_idle());
}

#[test]
fn reverse_loop_keeps_cycling() {
    let mut timers = ManualTimers::new();
    let mut d = TypewriterDriver::new(TypewriterConfig {
        looping: true,
        reverse_mode: true,
        ..config("ab".into())
    })
    .unwrap();
    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();
    d.on_phrase_complete(move |_, _| *sink.borrow_mut() += 1);
    d.start(&mut timers);
    drain(&mut d, &mut timers, 30);
    assert!(!d.is_done());
    assert!(d.has_pending_timer());
    assert!(*count.borrow() >= 4);
}
