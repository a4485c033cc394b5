// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus adapter: the seam between engine effects and the MQTT client.
//!
//! The engine emits [`Effect`]s; [`apply`] replays them against a
//! [`BusAdapter`] in order, which is what upholds the publish-before-
//! subscribe guarantee for puzzle leaves.

use async_trait::async_trait;
use op_core::{Effect, Qos};
use rumqttc::AsyncClient;
use thiserror::Error;

/// Errors from bus operations.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("mqtt client error: {0}")]
    Client(String),
}

/// Minimal publish/subscribe surface the controller needs.
#[async_trait]
pub trait BusAdapter: Send + Sync {
    async fn publish(
        &self,
        topic: &str,
        payload: &[u8],
        qos: Qos,
        retain: bool,
    ) -> Result<(), BusError>;

    async fn subscribe(&self, topic: &str) -> Result<(), BusError>;

    async fn unsubscribe(&self, topic: &str) -> Result<(), BusError>;
}

/// Replay engine effects against the bus, preserving order.
pub async fn apply<B: BusAdapter>(bus: &B, effects: Vec<Effect>) -> Result<(), BusError> {
    for effect in effects {
        tracing::debug!(effect = effect.name(), fields = ?effect.fields(), "applying effect");
        match effect {
            Effect::Publish { topic, payload, qos, retain } => {
                bus.publish(&topic, payload.as_bytes(), qos, retain).await?;
            }
            Effect::Subscribe { topic } => bus.subscribe(&topic).await?,
            Effect::Unsubscribe { topic } => bus.unsubscribe(&topic).await?,
        }
    }
    Ok(())
}

/// Production adapter over the rumqttc async client.
#[derive(Clone)]
pub struct MqttBus {
    client: AsyncClient,
}

impl MqttBus {
    pub fn new(client: AsyncClient) -> Self {
        MqttBus { client }
    }
}

fn to_mqtt_qos(qos: Qos) -> rumqttc::QoS {
    match qos {
        Qos::AtMostOnce => rumqttc::QoS::AtMostOnce,
        Qos::AtLeastOnce => rumqttc::QoS::AtLeastOnce,
        Qos::ExactlyOnce => rumqttc::QoS::ExactlyOnce,
    }
}

#[async_trait]
impl BusAdapter for MqttBus {
    async fn publish(
        &self,
        topic: &str,
        payload: &[u8],
        qos: Qos,
        retain: bool,
    ) -> Result<(), BusError> {
        self.client
            .publish(topic, to_mqtt_qos(qos), retain, payload)
            .await
            .map_err(|e| BusError::Client(e.to_string()))
    }

    async fn subscribe(&self, topic: &str) -> Result<(), BusError> {
        self.client
            .subscribe(topic, rumqttc::QoS::AtMostOnce)
            .await
            .map_err(|e| BusError::Client(e.to_string()))
    }

    async fn unsubscribe(&self, topic: &str) -> Result<(), BusError> {
        self.client.unsubscribe(topic).await.map_err(|e| BusError::Client(e.to_string()))
    }
}

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub mod fake {
    use super::{BusAdapter, BusError};
    use async_trait::async_trait;
    use op_core::Qos;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// One recorded bus operation.
    #[derive(Debug, Clone, PartialEq)]
    pub enum BusCall {
        Publish { topic: String, payload: String, qos: Qos, retain: bool },
        Subscribe { topic: String },
        Unsubscribe { topic: String },
    }

    /// Recording adapter for tests.
    #[derive(Clone, Default)]
    pub struct FakeBus {
        calls: Arc<Mutex<Vec<BusCall>>>,
    }

    impl FakeBus {
        pub fn new() -> Self {
            FakeBus::default()
        }

        /// Everything recorded so far, in order.
        pub fn calls(&self) -> Vec<BusCall> {
            self.calls.lock().clone()
        }

        /// Payloads published to one topic, in order.
        pub fn published(&self, topic: &str) -> Vec<String> {
            self.calls
                .lock()
                .iter()
                .filter_map(|c| match c {
                    BusCall::Publish { topic: t, payload, .. } if t == topic => {
                        Some(payload.clone())
                    }
                    _ => None,
                })
                .collect()
        }

        /// Topics with at least one live subscription.
        pub fn subscriptions(&self) -> Vec<String> {
            let mut topics = Vec::new();
            for call in self.calls.lock().iter() {
                match call {
                    BusCall::Subscribe { topic } => topics.push(topic.clone()),
                    BusCall::Unsubscribe { topic } => topics.retain(|t| t != topic),
                    BusCall::Publish { .. } => {}
                }
            }
            topics
        }

        pub fn clear(&self) {
            self.calls.lock().clear();
        }
    }

    #[async_trait]
    impl BusAdapter for FakeBus {
        async fn publish(
            &self,
            topic: &str,
            payload: &[u8],
            qos: Qos,
            retain: bool,
        ) -> Result<(), BusError> {
            self.calls.lock().push(BusCall::Publish {
                topic: topic.to_string(),
                payload: String::from_utf8_lossy(payload).to_string(),
                qos,
                retain,
            });
            Ok(())
        }

        async fn subscribe(&self, topic: &str) -> Result<(), BusError> {
            self.calls.lock().push(BusCall::Subscribe { topic: topic.to_string() });
            Ok(())
        }

        async fn unsubscribe(&self, topic: &str) -> Result<(), BusError> {
            self.calls.lock().push(BusCall::Unsubscribe { topic: topic.to_string() });
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
