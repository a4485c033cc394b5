// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::node::{Node, NodeEvent};
use op_core::{Effect, Topics, WorkflowState};

const CLOCK: &str = "op/gameTime_in_sec";

fn five_second_delay() -> Node {
    Node::delay("Door unlock delay", 5, &Topics::default())
}

#[test]
fn execute_subscribes_to_the_clock_topic() {
    let mut node = five_second_delay();
    let mut fx = Vec::new();
    let evs = node.execute(&mut fx);

    assert!(evs.is_empty());
    assert_eq!(fx, vec![Effect::subscribe(CLOCK)]);
    assert_eq!(node.state(), WorkflowState::Active);
}

#[test]
fn first_tick_caches_the_start_time() {
    let mut node = five_second_delay();
    let mut fx = Vec::new();
    node.execute(&mut fx);

    assert!(node.on_message(CLOCK, "100", &mut fx).is_empty());
    assert!(node.on_message(CLOCK, "104", &mut fx).is_empty());
    let evs = node.on_message(CLOCK, "105", &mut fx);
    assert_eq!(evs, vec![NodeEvent::finished("Door unlock delay", false)]);
    assert_eq!(node.state(), WorkflowState::Finished);
}

#[test]
fn finishing_emits_no_publish() {
    let mut node = five_second_delay();
    let mut fx = Vec::new();
    node.execute(&mut fx);
    node.on_message(CLOCK, "0", &mut fx);

    fx.clear();
    node.on_message(CLOCK, "5", &mut fx);
    assert!(fx.is_empty());
}

#[test]
fn garbage_clock_payloads_are_ignored() {
    let mut node = five_second_delay();
    let mut fx = Vec::new();
    node.execute(&mut fx);

    assert!(node.on_message(CLOCK, "not a number", &mut fx).is_empty());
    assert_eq!(node.state(), WorkflowState::Active);
}

#[test]
fn foreign_topics_are_ignored() {
    let mut node = five_second_delay();
    let mut fx = Vec::new();
    node.execute(&mut fx);

    assert!(node.on_message("op/gameTime_formatted", "00:00:10", &mut fx).is_empty());
}

#[test]
fn skip_emits_no_publish() {
    let mut node = five_second_delay();
    let mut fx = Vec::new();
    node.execute(&mut fx);

    fx.clear();
    let evs = node.skip("door UNLOCK delay", &mut fx);
    assert_eq!(evs, vec![NodeEvent::finished("Door unlock delay", true)]);
    assert_eq!(node.state(), WorkflowState::Skipped);
    assert!(fx.is_empty());
}

#[test]
fn dispose_unsubscribes() {
    let mut node = five_second_delay();
    let mut fx = Vec::new();
    node.execute(&mut fx);

    fx.clear();
    node.dispose(&mut fx);
    assert_eq!(fx, vec![Effect::unsubscribe(CLOCK)]);
    assert_eq!(node.state(), WorkflowState::Inactive);
}
