// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use op_core::Effect;

fn options(participants: u32) -> GameOptions {
    GameOptions { participants, duration: 60, skip_to: None }
}

#[test]
fn registry_knows_the_escape_room() {
    assert!(registry("escape-room").is_some());
    assert!(registry("no-such-definition").is_none());
}

#[test]
fn default_tree_has_the_expected_rooms() {
    let tree = EscapeRoomDefinition
        .create(&options(4), &Topics::default())
        .unwrap_or_else(|e| panic!("valid tree: {e}"));
    let names: Vec<&str> = tree.iter().map(Node::name).collect();
    assert_eq!(names, vec!["Init", "Lobby Room", "Control Room", "Server Room"]);
}

#[test]
fn participants_parameterize_the_globes_riddle() {
    let tree = EscapeRoomDefinition
        .create(&options(3), &Topics::default())
        .unwrap_or_else(|e| panic!("valid tree: {e}"));
    let lobby = &tree[1];
    let mut globes = lobby
        .children()
        .iter()
        .find(|c| c.name() == "Globes riddle")
        .unwrap_or_else(|| panic!("globes riddle present"))
        .clone();

    let mut fx = Vec::new();
    globes.execute(&mut fx);
    let Effect::Publish { payload, .. } = &fx[0] else {
        panic!("expected trigger publish");
    };
    assert_eq!(payload, r#"{"method":"trigger","state":"on","data":3}"#);
}

#[test]
fn tree_is_quiet_until_executed() {
    let tree = EscapeRoomDefinition
        .create(&options(4), &Topics::default())
        .unwrap_or_else(|e| panic!("valid tree: {e}"));
    assert!(tree.iter().all(|n| n.state() == op_core::WorkflowState::Inactive));
}
