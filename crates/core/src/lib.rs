// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! op-core: Core library for the escape-room operator

pub mod macros;

pub mod effect;
pub mod graph;
pub mod message;
pub mod options;
pub mod state;
pub mod time_fmt;
pub mod topics;

pub use effect::{Effect, Qos};
pub use graph::{EdgeData, Graph, GraphEdge, GraphNode, NodeData};
pub use message::{Message, MessageError, Method, State};
pub use options::{GameOptions, OptionsError};
pub use state::WorkflowState;
pub use time_fmt::format_hms;
pub use topics::{Topics, DEFAULT_PREFIX, TTS_TOPIC};
