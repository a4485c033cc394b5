// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! op-daemon: the escape-room operator process
//!
//! Owns the MQTT connection, the workflow controller, and the single event
//! loop that serializes bus callbacks, game-clock ticks, and shutdown.

pub mod bus;
pub mod controller;
pub mod purge;
pub mod runtime;

pub use bus::{BusAdapter, BusError, MqttBus};
pub use controller::{Controller, GameState};
pub use purge::MosquittoPurge;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use bus::fake::{BusCall, FakeBus};
