// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus effects the engine asks the runtime to perform.
//!
//! Workflow mutations never touch the network directly; they append effects
//! which the daemon applies in order. Buffer order is the happens-before
//! guarantee for a leaf's `TRIGGER:ON` preceding its subscription.

/// MQTT delivery guarantee, kept broker-library agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qos {
    AtMostOnce,
    AtLeastOnce,
    ExactlyOnce,
}

/// A single bus operation requested by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Publish { topic: String, payload: String, qos: Qos, retain: bool },
    Subscribe { topic: String },
    Unsubscribe { topic: String },
}

impl Effect {
    /// Publish at QoS 2, not retained (the trigger/command default).
    pub fn publish(topic: impl Into<String>, payload: impl Into<String>) -> Self {
        Effect::Publish {
            topic: topic.into(),
            payload: payload.into(),
            qos: Qos::ExactlyOnce,
            retain: false,
        }
    }

    pub fn publish_with(
        topic: impl Into<String>,
        payload: impl Into<String>,
        qos: Qos,
        retain: bool,
    ) -> Self {
        Effect::Publish { topic: topic.into(), payload: payload.into(), qos, retain }
    }

    pub fn subscribe(topic: impl Into<String>) -> Self {
        Effect::Subscribe { topic: topic.into() }
    }

    pub fn unsubscribe(topic: impl Into<String>) -> Self {
        Effect::Unsubscribe { topic: topic.into() }
    }

    /// Effect name for log spans (e.g., "publish", "subscribe")
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Publish { .. } => "publish",
            Effect::Subscribe { .. } => "subscribe",
            Effect::Unsubscribe { .. } => "unsubscribe",
        }
    }

    /// Key-value pairs for structured logging
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Effect::Publish { topic, payload, retain, .. } => vec![
                ("topic", topic.clone()),
                ("payload", payload.clone()),
                ("retain", retain.to_string()),
            ],
            Effect::Subscribe { topic } => vec![("topic", topic.clone())],
            Effect::Unsubscribe { topic } => vec![("topic", topic.clone())],
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
