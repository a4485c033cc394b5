// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fire-and-forget leaves: one publish (or a fixed burst) and done.
//!
//! Single commands complete synchronously, never subscribe, and are immune
//! to skip: the action is atomic from the operator's point of view.

use crate::node::{Base, NodeEvent};
use op_core::message::{Message, Method, State};
use op_core::{Effect, WorkflowState, TTS_TOPIC};
use serde::Serialize;
use serde_json::Value;

/// RGB color triple for the LED strips.
pub type Rgb = (u8, u8, u8);

/// Rooms with addressable LED strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    LobbyRoom,
    MainRoom,
    ServerRoom,
}

impl Location {
    /// `(display name, topic)` per strip at this location.
    pub(crate) fn strips(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Location::LobbyRoom => &[("Control lobbyroom light", "2/ledstrip/lobby")],
            Location::MainRoom => &[
                ("Control mainroom light north", "2/ledstrip/labroom/north"),
                ("Control mainroom light south", "2/ledstrip/labroom/south"),
                ("Control mainroom light middle", "2/ledstrip/labroom/middle"),
            ],
            Location::ServerRoom => &[
                ("Control serverroom light", "2/ledstrip/serverroom"),
                ("Control door serverroom light", "2/ledstrip/doorserverroom"),
            ],
        }
    }
}

op_core::simple_display! {
    Location {
        LobbyRoom => "LOBBYROOM",
        MainRoom => "MAINROOM",
        ServerRoom => "SERVERROOM",
    }
}

/// LED strip command envelope; field order is the firmware contract.
#[derive(Serialize)]
struct StripTrigger<'a> {
    method: &'a str,
    state: &'a str,
    data: Value,
}

/// Text-to-speech envelope; either spoken text or a file to play.
#[derive(Serialize)]
struct TtsPayload<'a> {
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    play_from_file: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_location: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a str>,
}

#[derive(Debug, Clone)]
pub(crate) enum Command {
    Trigger { topic: String, state: State, data: Option<Value> },
    Message { topic: String, text: String },
    Audio { payload: String, from_file: bool },
    Light { topic: String, power: State, brightness: u8, color: Rgb },
}

impl Command {
    pub(crate) fn trigger(topic: impl Into<String>, state: State, data: Option<Value>) -> Self {
        Command::Trigger { topic: topic.into(), state, data }
    }

    pub(crate) fn message(topic: impl Into<String>, text: impl Into<String>) -> Self {
        Command::Message { topic: topic.into(), text: text.into() }
    }

    pub(crate) fn audio(payload: impl Into<String>, from_file: bool) -> Self {
        Command::Audio { payload: payload.into(), from_file }
    }

    pub(crate) fn light(topic: impl Into<String>, power: State, brightness: u8, color: Rgb) -> Self {
        Command::Light { topic: topic.into(), power, brightness, color }
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Command::Trigger { .. } => "SendTrigger",
            Command::Message { .. } => "SendMessage",
            Command::Audio { .. } => "TTSAudio",
            Command::Light { .. } => "SingleLight",
        }
    }

    pub(crate) fn topic(&self) -> &str {
        match self {
            Command::Trigger { topic, .. }
            | Command::Message { topic, .. }
            | Command::Light { topic, .. } => topic,
            Command::Audio { .. } => TTS_TOPIC,
        }
    }

    pub(crate) fn execute(&mut self, base: &mut Base, fx: &mut Vec<Effect>) -> Vec<NodeEvent> {
        base.state = WorkflowState::Active;
        self.publish(base, fx);
        base.state = WorkflowState::Finished;
        vec![NodeEvent::finished(&base.name, false)]
    }

    fn publish(&self, base: &Base, fx: &mut Vec<Effect>) {
        match self {
            Command::Trigger { topic, state, data } => {
                let msg = Message::with_data(
                    Method::Trigger,
                    *state,
                    data.clone().unwrap_or(Value::Null),
                );
                fx.push(Effect::publish(topic, msg.to_json()));
                tracing::info!(node = %base.name, %topic, state = %state, "trigger sent");
            }
            Command::Message { topic, text } => {
                let msg = Message::with_data(
                    Method::Message,
                    State::None,
                    Value::String(text.clone()),
                );
                fx.push(Effect::publish(topic, msg.to_json()));
                tracing::info!(node = %base.name, %topic, "message sent");
            }
            Command::Audio { payload, from_file } => {
                let tts = if *from_file {
                    TtsPayload {
                        method: "message",
                        play_from_file: Some(true),
                        file_location: Some(payload),
                        data: None,
                    }
                } else {
                    TtsPayload {
                        method: "message",
                        play_from_file: None,
                        file_location: None,
                        data: Some(payload),
                    }
                };
                fx.push(Effect::publish(
                    TTS_TOPIC,
                    serde_json::to_string(&tts).unwrap_or_default(),
                ));
                tracing::info!(node = %base.name, from_file, "audio sent");
            }
            Command::Light { topic, power, brightness, color } => {
                let (r, g, b) = color;
                self.publish_strip(topic, "rgb", Value::String(format!("{r},{g},{b}")), fx);
                self.publish_strip(topic, "brightness", Value::from(*brightness), fx);
                self.publish_strip(topic, "power", Value::String(power.to_string()), fx);
                tracing::info!(node = %base.name, %topic, power = %power, "light driven");
            }
        }
    }

    fn publish_strip(&self, topic: &str, state: &str, data: Value, fx: &mut Vec<Effect>) {
        let payload = StripTrigger { method: "trigger", state, data };
        fx.push(Effect::publish(topic, serde_json::to_string(&payload).unwrap_or_default()));
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
