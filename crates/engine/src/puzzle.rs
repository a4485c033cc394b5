// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Standard puzzle leaf: drives one micro-controller over one topic.
//!
//! Executing publishes `TRIGGER:ON` and then subscribes, in that order, so
//! a firmware that echoes immediately cannot be missed. Incoming STATUS
//! reports advance the node; completion retires the firmware with a final
//! `TRIGGER:OFF`.

use crate::node::{Base, NodeEvent};
use op_core::message::{Message, Method, State};
use op_core::{Effect, WorkflowState};
use serde_json::Value;

/// How a puzzle interprets its STATUS reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PuzzlePolicy {
    /// SOLVED completes the puzzle.
    Standard,
    /// ACTIVE arms the puzzle; the next INACTIVE completes it without a
    /// retiring trigger (the firmware already settled itself).
    Scale,
}

#[derive(Debug, Clone)]
pub(crate) struct Puzzle {
    topic: String,
    policy: PuzzlePolicy,
    subscribed: bool,
    /// Scale policy: saw ACTIVE since execute.
    engaged: bool,
    last_status: Option<State>,
    last_message: Option<String>,
}

impl Puzzle {
    pub(crate) fn new(topic: impl Into<String>, policy: PuzzlePolicy) -> Self {
        Puzzle {
            topic: topic.into(),
            policy,
            subscribed: false,
            engaged: false,
            last_status: None,
            last_message: None,
        }
    }

    pub(crate) fn topic(&self) -> &str {
        &self.topic
    }

    pub(crate) fn last_status(&self) -> Option<State> {
        self.last_status
    }

    pub(crate) fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    pub(crate) fn execute(&mut self, base: &mut Base, fx: &mut Vec<Effect>) -> Vec<NodeEvent> {
        self.engaged = false;
        self.publish_trigger(base, State::On, false, fx);
        fx.push(Effect::subscribe(&self.topic));
        self.subscribed = true;
        tracing::info!(node = %base.name, topic = %self.topic, "subscribed");
        base.state = WorkflowState::Active;
        Vec::new()
    }

    pub(crate) fn dispose(&mut self, fx: &mut Vec<Effect>) {
        if self.subscribed {
            fx.push(Effect::unsubscribe(&self.topic));
            self.subscribed = false;
        }
    }

    pub(crate) fn on_message(
        &mut self,
        base: &mut Base,
        topic: &str,
        payload: &str,
        fx: &mut Vec<Effect>,
    ) -> Vec<NodeEvent> {
        if topic != self.topic || base.state != WorkflowState::Active {
            return Vec::new();
        }
        let msg = match Message::parse(payload) {
            Ok(msg) => msg,
            Err(err) => {
                let error = format!("[{}] No valid JSON: {}", base.name, err);
                tracing::warn!(node = %base.name, %error, "undecodable payload");
                return vec![NodeEvent::failed(&base.name, error)];
            }
        };
        match msg.method {
            Method::Status => {
                tracing::info!(node = %base.name, state = %msg.state, "status change");
                self.last_status = Some(msg.state);
                match msg.state {
                    State::Inactive => self.on_status_inactive(base),
                    State::Active => {
                        self.engaged = true;
                        Vec::new()
                    }
                    State::Solved => self.finish(base, false, fx),
                    State::Failed => {
                        vec![NodeEvent::failed(&base.name, data_text(&msg.data))]
                    }
                    other => vec![NodeEvent::failed(
                        &base.name,
                        format!("[{}] State '{}' is not supported", base.name, other),
                    )],
                }
            }
            Method::Trigger => match msg.state {
                // Trigger echoes are hooks with nothing to do here.
                State::On | State::Off => Vec::new(),
                other => vec![NodeEvent::failed(
                    &base.name,
                    format!("[{}] Trigger state '{}' is not supported", base.name, other),
                )],
            },
            Method::Message => {
                tracing::info!(node = %base.name, "received plain message, nothing to do");
                self.last_message = Some(data_text(&msg.data));
                Vec::new()
            }
        }
    }

    pub(crate) fn skip(&mut self, base: &mut Base, target: &str, fx: &mut Vec<Effect>) -> Vec<NodeEvent> {
        if base.state.is_terminal() || !base.matches(target) {
            return Vec::new();
        }
        tracing::info!(node = %base.name, "marking workflow as skipped");
        let was_active = base.state == WorkflowState::Active;
        base.state = WorkflowState::Skipped;
        if was_active {
            self.publish_trigger(base, State::Off, true, fx);
            return vec![NodeEvent::finished(&base.name, true)];
        }
        Vec::new()
    }

    fn on_status_inactive(&mut self, base: &mut Base) -> Vec<NodeEvent> {
        match self.policy {
            PuzzlePolicy::Standard => Vec::new(),
            PuzzlePolicy::Scale if self.engaged => {
                // The scale settled by itself; no retiring trigger.
                base.state = WorkflowState::Finished;
                vec![NodeEvent::finished(&base.name, false)]
            }
            PuzzlePolicy::Scale => Vec::new(),
        }
    }

    fn finish(&mut self, base: &mut Base, skipped: bool, fx: &mut Vec<Effect>) -> Vec<NodeEvent> {
        self.publish_trigger(base, State::Off, skipped, fx);
        if !skipped {
            base.state = WorkflowState::Finished;
        }
        vec![NodeEvent::finished(&base.name, skipped)]
    }

    fn publish_trigger(&self, base: &Base, state: State, skipped: bool, fx: &mut Vec<Effect>) {
        let data = if state == State::Off && skipped {
            Value::String("skipped".to_string())
        } else {
            base.settings_data()
        };
        let msg = Message::with_data(Method::Trigger, state, data);
        fx.push(Effect::publish(&self.topic, msg.to_json()));
        tracing::info!(node = %base.name, topic = %self.topic, state = %state, "trigger published");
    }
}

/// Render message data for error text and dashboard fields.
fn data_text(data: &Value) -> String {
    match data {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
