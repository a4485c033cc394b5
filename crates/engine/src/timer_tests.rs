// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn timer() -> GameTimer {
    let mut timer = GameTimer::new(Topics::default());
    timer.set_duration_minutes(1);
    timer
}

#[test]
fn stopped_timer_ignores_ticks() {
    let mut t = timer();
    let mut fx = Vec::new();
    assert_eq!(t.tick(&mut fx), Tick::Idle);
    assert!(fx.is_empty());
    assert_eq!(t.elapsed_secs(), 0);
}

#[test]
fn tick_publishes_the_four_time_topics() {
    let mut t = timer();
    t.start();
    let mut fx = Vec::new();
    assert_eq!(t.tick(&mut fx), Tick::Ticked);

    let published: Vec<(String, String)> = fx
        .iter()
        .filter_map(|e| match e {
            Effect::Publish { topic, payload, .. } => Some((topic.clone(), payload.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        published,
        vec![
            ("op/gameTime_in_sec".to_string(), "1".to_string()),
            ("op/gameTime_remain_in_sec".to_string(), "59".to_string()),
            ("op/gameTime_formatted".to_string(), "00:00:01".to_string()),
            ("op/gameTime_remain_formatted".to_string(), "00:00:59".to_string()),
        ]
    );
}

#[test]
fn pause_preserves_the_counter() {
    let mut t = timer();
    t.start();
    let mut fx = Vec::new();
    t.tick(&mut fx);
    t.tick(&mut fx);

    t.pause();
    assert_eq!(t.state(), TimerState::Paused);
    assert_eq!(t.tick(&mut fx), Tick::Idle);
    assert_eq!(t.elapsed_secs(), 2);

    t.start();
    t.tick(&mut fx);
    assert_eq!(t.elapsed_secs(), 3);
}

#[test]
fn stop_resets_the_counter() {
    let mut t = timer();
    t.start();
    let mut fx = Vec::new();
    t.tick(&mut fx);
    t.stop();
    assert_eq!(t.state(), TimerState::Stopped);
    assert_eq!(t.elapsed_secs(), 0);
}

#[test]
fn expiry_fires_exactly_once() {
    let mut t = timer();
    t.start();
    let mut fx = Vec::new();
    for _ in 0..59 {
        assert_eq!(t.tick(&mut fx), Tick::Ticked);
    }
    assert_eq!(t.tick(&mut fx), Tick::Expired);
    assert_eq!(t.state(), TimerState::Stopped);
    assert_eq!(t.tick(&mut fx), Tick::Idle);
}

#[test]
fn remaining_time_never_underflows() {
    let mut t = GameTimer::new(Topics::default());
    t.set_duration_minutes(0);
    t.start();
    let mut fx = Vec::new();
    assert_eq!(t.tick(&mut fx), Tick::Expired);
    let Effect::Publish { payload, .. } = &fx[1] else {
        panic!("expected publish");
    };
    assert_eq!(payload, "0");
}
