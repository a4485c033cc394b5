// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Delay leaf: parks a sequence without blocking the engine.
//!
//! Observes the published game-clock topic as a logical time source. The
//! first observed tick caches the start; the node finishes once the clock
//! has advanced by the configured delay. Sharing the session clock keeps
//! delays monotone across pauses.

use crate::node::{Base, NodeEvent};
use op_core::{Effect, WorkflowState};

#[derive(Debug, Clone)]
pub(crate) struct Delay {
    topic: String,
    delay_secs: u64,
    started_at: Option<u64>,
    subscribed: bool,
}

impl Delay {
    pub(crate) fn new(topic: String, delay_secs: u64) -> Self {
        Delay { topic, delay_secs, started_at: None, subscribed: false }
    }

    pub(crate) fn topic(&self) -> &str {
        &self.topic
    }

    pub(crate) fn execute(&mut self, base: &mut Base, fx: &mut Vec<Effect>) -> Vec<NodeEvent> {
        tracing::info!(node = %base.name, delay_secs = self.delay_secs, "delay started");
        self.started_at = None;
        fx.push(Effect::subscribe(&self.topic));
        self.subscribed = true;
        base.state = WorkflowState::Active;
        Vec::new()
    }

    pub(crate) fn dispose(&mut self, fx: &mut Vec<Effect>) {
        if self.subscribed {
            fx.push(Effect::unsubscribe(&self.topic));
            self.subscribed = false;
        }
    }

    pub(crate) fn on_message(&mut self, base: &mut Base, topic: &str, payload: &str) -> Vec<NodeEvent> {
        if topic != self.topic || base.state != WorkflowState::Active {
            return Vec::new();
        }
        // Clock payloads are bare second counts; anything else is ignored.
        let Ok(now) = payload.trim().parse::<u64>() else {
            return Vec::new();
        };
        match self.started_at {
            None => {
                tracing::debug!(node = %base.name, start = now, "delay clock started");
                self.started_at = Some(now);
                Vec::new()
            }
            Some(start) if now.saturating_sub(start) >= self.delay_secs => {
                tracing::info!(node = %base.name, "delay elapsed");
                base.state = WorkflowState::Finished;
                vec![NodeEvent::finished(&base.name, false)]
            }
            Some(_) => Vec::new(),
        }
    }

    pub(crate) fn skip(&mut self, base: &mut Base, target: &str) -> Vec<NodeEvent> {
        if base.state.is_terminal() || !base.matches(target) {
            return Vec::new();
        }
        tracing::info!(node = %base.name, "marking delay as skipped");
        let was_active = base.state == WorkflowState::Active;
        base.state = WorkflowState::Skipped;
        if was_active {
            return vec![NodeEvent::finished(&base.name, true)];
        }
        Vec::new()
    }
}

#[cfg(test)]
#[path = "delay_tests.rs"]
mod tests;
