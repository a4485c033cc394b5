// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session options consumed from the retained `gameOptions` blob.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors from decoding stored game options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("no game options received")]
    Missing,
    #[error("invalid game options: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Parsed `gameOptions`, consumed at the next session start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOptions {
    /// Number of participants, used to parameterize puzzles.
    #[serde(default = "default_participants")]
    pub participants: u32,
    /// Game duration in minutes.
    pub duration: u64,
    /// Top-level workflow name to rewind the session to.
    #[serde(rename = "skipTo", default, skip_serializing_if = "Option::is_none")]
    pub skip_to: Option<String>,
}

fn default_participants() -> u32 {
    4
}

impl GameOptions {
    /// Decode from the stored options value; `None` means nothing was
    /// retained on the options topic yet.
    pub fn from_stored(value: Option<&Value>) -> Result<Self, OptionsError> {
        let value = value.ok_or(OptionsError::Missing)?;
        Ok(serde_json::from_value(value.clone())?)
    }
}

#[cfg(test)]
#[path = "options_tests.rs"]
mod tests;
