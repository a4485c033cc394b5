// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow controller: command dispatch, session lifecycle, and the live
//! graph snapshot.
//!
//! Routes every inbound bus message to either a game command handler, the
//! options store, or the root workflow; publishes a retained snapshot of the
//! graph whenever it changed. The caller (the daemon event loop) serializes
//! all entry points, which is what gives workflow mutations a single total
//! order.

use crate::bus::{self, BusAdapter, BusError};
use crate::purge::MosquittoPurge;
use op_core::message::State;
use op_core::{Effect, GameOptions, Qos, Topics};
use op_engine::{GameTimer, Location, Node, NodeEvent, Tick, WorkflowFactory};
use serde_json::Value;

/// Audio played when the game time runs out.
const GAMEOVER_SOUND: &str = "/opt/ue-operator/sounds/gameover.mp3";

/// Session lifecycle as seen by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Stopped,
    Started,
    Paused,
}

op_core::simple_display! {
    GameState {
        Stopped => "STOPPED",
        Started => "STARTED",
        Paused => "PAUSED",
    }
}

pub struct Controller<B: BusAdapter> {
    bus: B,
    topics: Topics,
    factory: Box<dyn WorkflowFactory>,
    purge: Option<MosquittoPurge>,
    options: Option<Value>,
    game_state: GameState,
    timer: GameTimer,
    root: Option<Node>,
    last_graph_config: Option<String>,
}

impl<B: BusAdapter> Controller<B> {
    pub fn new(
        bus: B,
        topics: Topics,
        factory: Box<dyn WorkflowFactory>,
        purge: Option<MosquittoPurge>,
    ) -> Self {
        let timer = GameTimer::new(topics.clone());
        Controller {
            bus,
            topics,
            factory,
            purge,
            options: None,
            game_state: GameState::Stopped,
            timer,
            root: None,
            last_graph_config: None,
        }
    }

    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    /// (Re)subscribe the control surface. Run on every broker connect so a
    /// reconnect picks the session back up.
    pub async fn on_connect(&self) -> Result<(), BusError> {
        self.bus.subscribe(&self.topics.game_control()).await?;
        self.bus.subscribe(&self.topics.game_options()).await?;
        tracing::info!("operator (re)connected, waiting for game control commands");
        Ok(())
    }

    /// Entry point for every inbound bus message.
    pub async fn handle_publish(&mut self, topic: &str, payload: &[u8]) {
        let text = String::from_utf8_lossy(payload).to_string();
        if topic == self.topics.game_control() {
            self.handle_command(&text).await;
        } else if topic == self.topics.game_options() {
            self.save_options(&text);
        } else {
            let mut fx = Vec::new();
            let evs = match &mut self.root {
                Some(root) => root.on_message(topic, &text, &mut fx),
                None => Vec::new(),
            };
            self.apply(fx).await;
            self.handle_root_events(evs).await;
        }
        self.publish_game_state().await;
    }

    /// Drive the game clock; called once per second by the event loop.
    pub async fn tick(&mut self) {
        let mut fx = Vec::new();
        match self.timer.tick(&mut fx) {
            Tick::Idle => {}
            Tick::Ticked => self.apply(fx).await,
            Tick::Expired => {
                self.apply(fx).await;
                self.on_game_time_expired().await;
            }
        }
    }

    async fn handle_command(&mut self, raw: &str) {
        let command = raw.trim().to_uppercase();
        if command == "START" {
            self.start().await;
        } else if command == "STOP" {
            self.stop().await;
        } else if command == "PAUSE" {
            self.pause();
        } else if let Some(name) = command.strip_prefix("SKIP ") {
            self.skip(name.trim()).await;
        } else if command.is_empty() {
            // Our own retained-clear handshake echoes back as empty.
        } else {
            tracing::info!(%command, "game command is not supported");
        }
    }

    fn save_options(&mut self, text: &str) {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => {
                tracing::info!(options = %value, "game options stored");
                self.options = Some(value);
            }
            Err(err) => tracing::warn!(error = %err, "discarding undecodable game options"),
        }
    }

    /// Start a session, or resume a paused one. Idempotent against repeated
    /// START commands.
    async fn start(&mut self) {
        if self.game_state == GameState::Started {
            return;
        }
        self.purge_retained().await;
        if self.game_state == GameState::Stopped {
            let options = match GameOptions::from_stored(self.options.as_ref()) {
                Ok(options) => options,
                Err(err) => {
                    tracing::error!(error = %err, "cannot start session");
                    return;
                }
            };
            let children = match self.factory.create(&options, &self.topics) {
                Ok(children) => children,
                Err(err) => {
                    tracing::error!(error = %err, "workflow definition rejected");
                    return;
                }
            };
            let mut root =
                Node::sequence("Main workflow", children).with_highlight(true);
            if let Some(skip_to) = &options.skip_to {
                mark_skip_to(&mut root, skip_to);
            }

            let mut fx = Vec::new();
            let evs = root.execute(&mut fx);
            self.root = Some(root);
            self.timer.set_duration_minutes(options.duration);
            self.timer.start();
            self.game_state = GameState::Started;
            tracing::info!(?options, "main workflow started");
            self.apply(fx).await;
            self.handle_root_events(evs).await;
        } else {
            self.timer.start();
            self.game_state = GameState::Started;
            tracing::info!("main workflow resumed");
        }
    }

    async fn stop(&mut self) {
        if self.game_state == GameState::Stopped {
            return;
        }
        self.timer.stop();
        let mut fx = Vec::new();
        if let Some(root) = &mut self.root {
            root.dispose(&mut fx);
        }
        self.apply(fx).await;
        self.game_state = GameState::Stopped;
        self.purge_retained().await;
        tracing::info!("main workflow stopped");
    }

    fn pause(&mut self) {
        if self.game_state == GameState::Paused {
            return;
        }
        self.timer.pause();
        self.game_state = GameState::Paused;
        tracing::info!("main workflow paused");
    }

    async fn skip(&mut self, name: &str) {
        tracing::info!(node = name, "operator skip");
        let mut fx = Vec::new();
        let evs = match &mut self.root {
            Some(root) => root.skip(name, &mut fx),
            None => Vec::new(),
        };
        self.apply(fx).await;
        self.handle_root_events(evs).await;
    }

    async fn handle_root_events(&mut self, evs: Vec<NodeEvent>) {
        for ev in evs {
            match ev {
                NodeEvent::Finished { .. } => self.on_workflow_solved().await,
                NodeEvent::Failed { name, error } => {
                    // Fail-soft: puzzles report errors, the session goes on.
                    tracing::warn!(node = %name, %error, "workflow failed");
                }
            }
        }
    }

    async fn on_workflow_solved(&mut self) {
        tracing::info!("escape room finished successfully");
        self.publish_control_handshake().await;
        self.stop().await;
    }

    async fn on_game_time_expired(&mut self) {
        tracing::warn!("game time expired, running loss sequence");
        let mut fx = Vec::new();
        Node::light_control(Location::ServerRoom, State::On, 255, (255, 0, 0)).execute(&mut fx);
        Node::light_control(Location::MainRoom, State::On, 255, (255, 0, 0)).execute(&mut fx);
        Node::tts_file("Play gameover", GAMEOVER_SOUND).execute(&mut fx);
        self.apply(fx).await;
        self.publish_control_handshake().await;
        self.stop().await;
    }

    /// Retained null on the control topic tells the dashboard the session
    /// is over and clears the last command.
    async fn publish_control_handshake(&self) {
        let control = self.topics.game_control();
        if let Err(err) = self.bus.publish(&control, &[], Qos::ExactlyOnce, true).await {
            tracing::warn!(error = %err, "control handshake failed");
        }
    }

    /// Publish the graph snapshot, retained, iff it changed.
    async fn publish_game_state(&mut self) {
        let Some(root) = &self.root else {
            return;
        };
        let config = root.graph_config();
        if self.last_graph_config.as_deref() == Some(config.as_str()) {
            return;
        }
        let topic = self.topics.game_state();
        match self.bus.publish(&topic, config.as_bytes(), Qos::AtMostOnce, true).await {
            Ok(()) => self.last_graph_config = Some(config),
            Err(err) => tracing::warn!(error = %err, "game state publish failed"),
        }
    }

    async fn purge_retained(&self) {
        let Some(purge) = &self.purge else {
            tracing::debug!("retained purge disabled");
            return;
        };
        let keep = vec![self.topics.game_control(), self.topics.game_options()];
        if let Err(err) = purge.run(&keep).await {
            tracing::warn!(error = %err, "retained purge failed");
        }
    }

    async fn apply(&self, fx: Vec<Effect>) {
        if let Err(err) = bus::apply(&self.bus, fx).await {
            tracing::warn!(error = %err, "bus effect failed");
        }
    }
}

/// Rewind support: every top-level child before the first match is marked
/// SKIPPED before execution; with no match the whole session skips and
/// completes immediately.
fn mark_skip_to(root: &mut Node, skip_to: &str) {
    let names: Vec<String> =
        root.children().iter().map(|c| c.name().to_string()).collect();
    let mut fx = Vec::new();
    for name in names {
        if name.eq_ignore_ascii_case(skip_to) {
            return;
        }
        tracing::info!(node = %name, skip_to, "skipped by skipTo");
        root.skip(&name, &mut fx);
    }
    tracing::warn!(skip_to, "skipTo matched no top-level workflow");
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
