// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon event loop: the single serialization point.
//!
//! One task owns the controller and selects over broker events, the 1 s
//! game-clock interval, and the shutdown signal, so every workflow mutation
//! observes one total order.

use crate::bus::MqttBus;
use crate::controller::Controller;
use rumqttc::{Event, EventLoop, Incoming};
use std::time::Duration;
use thiserror::Error;
use tokio::time::MissedTickBehavior;

/// How long the first broker connect may take before startup fails.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("broker connect failed: {0}")]
    Connect(String),
    #[error("broker connect timed out")]
    ConnectTimeout,
}

/// Poll until the first CONNACK. A failure here is fatal; later connection
/// losses are retried by the client library inside [`run`].
pub async fn wait_for_connack(eventloop: &mut EventLoop) -> Result<(), RuntimeError> {
    let deadline = tokio::time::sleep(CONNECT_TIMEOUT);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            event = eventloop.poll() => match event {
                Ok(Event::Incoming(Incoming::ConnAck(_))) => return Ok(()),
                Ok(_) => {}
                Err(err) => return Err(RuntimeError::Connect(err.to_string())),
            },
            () = &mut deadline => return Err(RuntimeError::ConnectTimeout),
        }
    }
}

/// Run the operator until SIGINT.
pub async fn run(controller: &mut Controller<MqttBus>, mut eventloop: EventLoop) {
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            event = eventloop.poll() => match event {
                Ok(Event::Incoming(Incoming::Publish(publish))) => {
                    controller.handle_publish(&publish.topic, &publish.payload).await;
                }
                Ok(Event::Incoming(Incoming::ConnAck(_))) => {
                    // Subscribing on CONNACK renews subscriptions after a
                    // reconnect; the session itself continues in memory.
                    if let Err(err) = controller.on_connect().await {
                        tracing::warn!(error = %err, "resubscribe failed");
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(error = %err, "broker connection lost, retrying");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            },
            _ = ticker.tick() => controller.tick().await,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                return;
            }
        }
    }
}
