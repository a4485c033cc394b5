// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Game clock: periodic publisher of elapsed and remaining session time.
//!
//! The timer is a pure state machine driven by an external 1 s ticker (the
//! daemon's interval). Each tick while started publishes the four game-time
//! topics; reaching the configured duration stops the clock and reports
//! expiry exactly once.

use op_core::{format_hms, Effect, Qos, Topics};

/// Timer lifecycle: `stop` resets the counter, `pause` preserves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Started,
    Paused,
}

op_core::simple_display! {
    TimerState {
        Stopped => "STOPPED",
        Started => "STARTED",
        Paused => "PAUSED",
    }
}

/// Outcome of one external tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Timer not running; nothing happened.
    Idle,
    /// Clock advanced and the time topics were published.
    Ticked,
    /// The session duration was reached; the clock has stopped.
    Expired,
}

#[derive(Debug, Clone)]
pub struct GameTimer {
    topics: Topics,
    state: TimerState,
    game_time_secs: u64,
    duration_secs: u64,
}

impl GameTimer {
    pub fn new(topics: Topics) -> Self {
        GameTimer { topics, state: TimerState::Stopped, game_time_secs: 0, duration_secs: 0 }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.game_time_secs
    }

    pub fn set_duration_minutes(&mut self, minutes: u64) {
        self.duration_secs = minutes * 60;
    }

    /// Start, or resume from pause without resetting the counter.
    pub fn start(&mut self) {
        if self.state != TimerState::Started {
            tracing::info!(duration_secs = self.duration_secs, "game timer started");
            self.state = TimerState::Started;
        }
    }

    /// Halt the clock but keep the elapsed count.
    pub fn pause(&mut self) {
        if self.state == TimerState::Started {
            tracing::info!(elapsed_secs = self.game_time_secs, "game timer paused");
            self.state = TimerState::Paused;
        }
    }

    /// Halt the clock and reset the elapsed count.
    pub fn stop(&mut self) {
        if self.state != TimerState::Stopped {
            tracing::info!("game timer stopped");
            self.state = TimerState::Stopped;
        }
        self.game_time_secs = 0;
    }

    /// Advance the clock by one second and publish the time topics.
    pub fn tick(&mut self, fx: &mut Vec<Effect>) -> Tick {
        if self.state != TimerState::Started {
            return Tick::Idle;
        }
        self.game_time_secs += 1;
        let elapsed = self.game_time_secs;
        let remain = self.duration_secs.saturating_sub(elapsed);
        self.publish(&self.topics.game_time_in_sec(), elapsed.to_string(), fx);
        self.publish(&self.topics.game_time_remain_in_sec(), remain.to_string(), fx);
        self.publish(&self.topics.game_time_formatted(), format_hms(elapsed), fx);
        self.publish(&self.topics.game_time_remain_formatted(), format_hms(remain), fx);
        if elapsed >= self.duration_secs {
            tracing::warn!(elapsed_secs = elapsed, "game time expired");
            self.state = TimerState::Stopped;
            return Tick::Expired;
        }
        Tick::Ticked
    }

    fn publish(&self, topic: &str, payload: String, fx: &mut Vec<Effect>) {
        fx.push(Effect::publish_with(topic, payload, Qos::AtMostOnce, false));
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
