// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus payload codec for the `{method, state, data}` peer contract.
//!
//! Enum names are case-insensitive on parse and lower-case on the wire.
//! A payload that is not valid JSON degrades to a plain MESSAGE carrying
//! the raw text instead of erroring; unknown enum names are hard errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors from decoding a bus payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    #[error("attribute '{0}' is missing")]
    MissingField(&'static str),
    #[error("method '{0}' is not valid")]
    InvalidMethod(String),
    #[error("state '{0}' is not valid")]
    InvalidState(String),
}

/// Message method: outgoing commands vs incoming lifecycle reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Message,
    Status,
    Trigger,
}

impl Method {
    /// Parse a method name case-insensitively.
    pub fn parse(s: &str) -> Result<Self, MessageError> {
        match s.to_ascii_uppercase().as_str() {
            "MESSAGE" => Ok(Method::Message),
            "STATUS" => Ok(Method::Status),
            "TRIGGER" => Ok(Method::Trigger),
            _ => Err(MessageError::InvalidMethod(s.to_string())),
        }
    }
}

crate::simple_display! {
    Method {
        Message => "message",
        Status => "status",
        Trigger => "trigger",
    }
}

/// Message state as reported by or commanded to a peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    Off,
    On,
    Inactive,
    Active,
    Solved,
    Failed,
    None,
}

impl State {
    /// Parse a state name case-insensitively.
    pub fn parse(s: &str) -> Result<Self, MessageError> {
        match s.to_ascii_uppercase().as_str() {
            "OFF" => Ok(State::Off),
            "ON" => Ok(State::On),
            "INACTIVE" => Ok(State::Inactive),
            "ACTIVE" => Ok(State::Active),
            "SOLVED" => Ok(State::Solved),
            "FAILED" => Ok(State::Failed),
            "NONE" => Ok(State::None),
            _ => Err(MessageError::InvalidState(s.to_string())),
        }
    }
}

crate::simple_display! {
    State {
        Off => "off",
        On => "on",
        Inactive => "inactive",
        Active => "active",
        Solved => "solved",
        Failed => "failed",
        None => "none",
    }
}

/// Data transfer object for communication with the other bus participants.
///
/// Field order is the wire order; [`Message::to_json`] emits
/// `{"method":…,"state":…,"data":…}` byte-for-byte.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub method: Method,
    pub state: State,
    pub data: Value,
}

impl Message {
    pub fn new(method: Method, state: State) -> Self {
        Self { method, state, data: Value::Null }
    }

    pub fn with_data(method: Method, state: State, data: Value) -> Self {
        Self { method, state, data }
    }

    /// Decode a message from a raw payload.
    ///
    /// Text that is not valid JSON is wrapped as `MESSAGE`/`NONE` with the
    /// raw payload as data. A missing `state` is accepted only for the
    /// `MESSAGE` method.
    pub fn parse(text: &str) -> Result<Self, MessageError> {
        let Ok(value) = serde_json::from_str::<Value>(text) else {
            tracing::warn!(payload = text, "payload is not valid JSON, degrading to message");
            return Ok(Message {
                method: Method::Message,
                state: State::None,
                data: Value::String(text.to_string()),
            });
        };

        let obj = value.as_object().ok_or(MessageError::MissingField("method"))?;
        let method = match obj.get("method").and_then(Value::as_str) {
            Some(s) => Method::parse(s)?,
            None => return Err(MessageError::MissingField("method")),
        };
        let state = match obj.get("state").and_then(Value::as_str) {
            Some(s) => State::parse(s)?,
            None if method == Method::Message => State::None,
            None => return Err(MessageError::MissingField("state")),
        };
        let data = obj.get("data").cloned().unwrap_or(Value::Null);

        Ok(Message { method, state, data })
    }

    /// Serialize to the canonical wire form.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
