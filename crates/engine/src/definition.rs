// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow definitions: factories that build the session tree from options.
//!
//! A definition is looked up by name in a static registry (the dynamic
//! module loading of earlier operator generations collapsed to a
//! compile-time choice).

use crate::command::{Location, Rgb};
use crate::error::DefinitionError;
use crate::node::Node;
use op_core::message::State;
use op_core::{GameOptions, Topics};
use serde_json::{Map, Value};

const WHITE: Rgb = (255, 255, 255);

/// Builds the top-level workflow list for one session.
pub trait WorkflowFactory: Send + Sync {
    fn create(&self, options: &GameOptions, topics: &Topics) -> Result<Vec<Node>, DefinitionError>;
}

/// Look up a workflow definition by registry name.
pub fn registry(name: &str) -> Option<Box<dyn WorkflowFactory>> {
    match name {
        "escape-room" => Some(Box::new(EscapeRoomDefinition)),
        _ => None,
    }
}

/// The production escape-room session: lobby, control room, server room.
pub struct EscapeRoomDefinition;

impl WorkflowFactory for EscapeRoomDefinition {
    fn create(&self, options: &GameOptions, topics: &Topics) -> Result<Vec<Node>, DefinitionError> {
        let mut globes_settings = Map::new();
        globes_settings.insert("data".to_string(), Value::from(options.participants));

        Ok(vec![
            Node::init(vec![
                Node::send_trigger("Close lab room door", "4/door/entrance", State::Off),
                Node::send_trigger("Close server room door", "4/door/server", State::Off),
                Node::send_trigger("Deactivate laser", "7/laser", State::Off),
                Node::light_control(Location::LobbyRoom, State::Off, 255, WHITE),
                Node::light_control(Location::MainRoom, State::Off, 255, WHITE),
                Node::light_control(Location::ServerRoom, State::Off, 255, WHITE),
            ]),
            Node::sequence(
                "Lobby Room",
                vec![
                    Node::tts("Welcome message", "Welcome to the escape room. Your time starts now."),
                    Node::puzzle("Input keypad code", "4/puzzle"),
                    Node::send_trigger("Open lab room door", "4/door/entrance", State::On),
                    Node::puzzle("Globes riddle", "4/globes").with_settings(globes_settings),
                ],
            ),
            Node::sequence(
                "Control Room",
                vec![
                    Node::light_control(Location::MainRoom, State::On, 255, WHITE),
                    Node::parallel(
                        "Control room riddles",
                        vec![
                            Node::sequence(
                                "Solve safe",
                                vec![
                                    Node::puzzle("Activate safe", "5/safe/activate"),
                                    Node::puzzle("Open safe", "5/safe/control"),
                                    Node::scale_puzzle("Scale riddle", "6/puzzle/scale"),
                                ],
                            ),
                            Node::sequence(
                                "Solve door riddle",
                                vec![
                                    Node::send_trigger("Activate laser", "7/laser", State::On),
                                    Node::parallel(
                                        "Solve fuse box",
                                        vec![
                                            Node::puzzle(
                                                "Redirect laser in fusebox",
                                                "7/fusebox/laserDetection",
                                            ),
                                            Node::puzzle(
                                                "First rewiring of fusebox",
                                                "7/fusebox/rewiring0",
                                            ),
                                            Node::puzzle(
                                                "Second rewiring of fusebox",
                                                "7/fusebox/rewiring1",
                                            ),
                                            Node::puzzle(
                                                "Set potentiometer of fusebox",
                                                "7/fusebox/potentiometer",
                                            ),
                                        ],
                                    )?,
                                    Node::light_control(Location::ServerRoom, State::On, 255, WHITE),
                                    Node::puzzle("Control robot", "7/robot"),
                                    Node::send_trigger(
                                        "Open server room door",
                                        "4/door/server",
                                        State::On,
                                    ),
                                ],
                            ),
                        ],
                    )?,
                ],
            ),
            Node::sequence(
                "Server Room",
                vec![
                    Node::parallel(
                        "Server room riddles",
                        vec![
                            Node::puzzle("Terminal riddle", "6/puzzle/terminal"),
                            Node::puzzle("Maze riddle", "8/puzzle/maze"),
                            Node::puzzle("Simon riddle", "8/puzzle/simon"),
                        ],
                    )?,
                    Node::delay("Door unlock delay", 5, topics),
                    Node::send_trigger("Open escape room door", "4/door/entrance", State::On),
                ],
            ),
        ])
    }
}

#[cfg(test)]
#[path = "definition_tests.rs"]
mod tests;
