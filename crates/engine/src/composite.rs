// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Composite workflows: sequence, parallel, and combined groups.
//!
//! Composites consume their children's `Finished` events and forward
//! `Failed` events unchanged. A sequence keeps exactly one child active;
//! a parallel starts everything and completes when every child is terminal.

use crate::error::DefinitionError;
use crate::node::{Base, Node, NodeEvent};
use op_core::{Effect, WorkflowState};
use std::collections::HashMap;

/// Ordered children executed one after another. Shared by `Sequence` and
/// `Combined`, which differ only in graph export.
#[derive(Debug, Clone)]
pub(crate) struct Composite {
    pub(crate) children: Vec<Node>,
    pub(crate) current: usize,
}

impl Composite {
    pub(crate) fn new(children: Vec<Node>) -> Self {
        Composite { children, current: 0 }
    }

    pub(crate) fn execute(&mut self, base: &mut Base, fx: &mut Vec<Effect>) -> Vec<NodeEvent> {
        base.state = WorkflowState::Active;
        self.current = 0;
        let mut out = Vec::new();
        self.start_current(base, fx, &mut out);
        out
    }

    pub(crate) fn dispose(&mut self, active: bool, fx: &mut Vec<Effect>) {
        if active {
            if let Some(child) = self.children.get_mut(self.current) {
                child.dispose(fx);
            }
        }
        self.current = 0;
    }

    pub(crate) fn on_message(
        &mut self,
        base: &mut Base,
        topic: &str,
        payload: &str,
        fx: &mut Vec<Effect>,
    ) -> Vec<NodeEvent> {
        let mut out = Vec::new();
        if let Some(child) = self.children.get_mut(self.current) {
            let evs = child.on_message(topic, payload, fx);
            self.handle_child_events(base, evs, fx, &mut out);
        }
        out
    }

    pub(crate) fn skip(&mut self, base: &mut Base, target: &str, fx: &mut Vec<Effect>) -> Vec<NodeEvent> {
        if base.state.is_terminal() {
            return Vec::new();
        }
        let mut out = Vec::new();
        if base.matches(target) {
            tracing::info!(node = %base.name, "marking workflow sequence as skipped");
            let was_active = base.state == WorkflowState::Active;
            base.state = WorkflowState::Skipped;
            // Cascade self-skips; the subtree is dead, so child completions
            // are not treated as progress.
            for child in &mut self.children {
                let name = child.name().to_string();
                child.skip(&name, fx);
            }
            if was_active {
                out.push(NodeEvent::finished(&base.name, true));
            }
        } else {
            // Forward the original name so deeper descendants can match.
            for i in 0..self.children.len() {
                let evs = self.children[i].skip(target, fx);
                if i == self.current {
                    self.handle_child_events(base, evs, fx, &mut out);
                }
            }
        }
        out
    }

    /// Consume events from the current child: completion advances the
    /// cursor, failures bubble to the caller.
    fn handle_child_events(
        &mut self,
        base: &mut Base,
        evs: Vec<NodeEvent>,
        fx: &mut Vec<Effect>,
        out: &mut Vec<NodeEvent>,
    ) {
        for ev in evs {
            match ev {
                NodeEvent::Finished { .. } => {
                    self.advance(fx);
                    self.start_current(base, fx, out);
                }
                failed @ NodeEvent::Failed { .. } => out.push(failed),
            }
        }
    }

    /// Dispose the current child and move the cursor past it.
    fn advance(&mut self, fx: &mut Vec<Effect>) {
        if let Some(child) = self.children.get_mut(self.current) {
            child.dispose(fx);
        }
        self.current += 1;
    }

    /// Start the child at the cursor, draining synchronous completions
    /// (single commands, pre-skipped children) until a child stays active
    /// or the list is exhausted.
    fn start_current(&mut self, base: &mut Base, fx: &mut Vec<Effect>, out: &mut Vec<NodeEvent>) {
        while self.current < self.children.len() {
            let evs = self.children[self.current].execute(fx);
            let mut advanced = false;
            for ev in evs {
                match ev {
                    NodeEvent::Finished { .. } => {
                        self.advance(fx);
                        advanced = true;
                    }
                    failed @ NodeEvent::Failed { .. } => out.push(failed),
                }
            }
            if !advanced {
                return;
            }
        }
        if base.state == WorkflowState::Active {
            tracing::info!(node = %base.name, "workflow sequence finished");
            base.state = WorkflowState::Finished;
            out.push(NodeEvent::finished(&base.name, false));
        }
    }
}

/// Children executed concurrently; completion tracked per child name.
#[derive(Debug, Clone)]
pub(crate) struct Parallel {
    children: Vec<Node>,
    finished: HashMap<String, bool>,
}

impl Parallel {
    pub(crate) fn new(name: &str, children: Vec<Node>) -> Result<Self, DefinitionError> {
        let mut finished = HashMap::new();
        for child in &children {
            if finished.insert(child.name().to_string(), false).is_some() {
                return Err(DefinitionError::DuplicateChild {
                    parallel: name.to_string(),
                    child: child.name().to_string(),
                });
            }
        }
        Ok(Parallel { children, finished })
    }

    pub(crate) fn children(&self) -> &[Node] {
        &self.children
    }

    pub(crate) fn execute(&mut self, base: &mut Base, fx: &mut Vec<Effect>) -> Vec<NodeEvent> {
        let names: Vec<&str> = self.children.iter().map(Node::name).collect();
        tracing::info!(node = %base.name, children = ?names, "starting in parallel");
        base.state = WorkflowState::Active;
        let mut out = Vec::new();
        for i in 0..self.children.len() {
            let evs = self.children[i].execute(fx);
            self.record_events(evs, &mut out);
        }
        self.check_all_finished(base, &mut out);
        out
    }

    pub(crate) fn dispose(&mut self, active: bool, fx: &mut Vec<Effect>) {
        if active {
            for child in &mut self.children {
                child.dispose(fx);
            }
        }
    }

    pub(crate) fn on_message(
        &mut self,
        base: &mut Base,
        topic: &str,
        payload: &str,
        fx: &mut Vec<Effect>,
    ) -> Vec<NodeEvent> {
        let mut out = Vec::new();
        for i in 0..self.children.len() {
            let evs = self.children[i].on_message(topic, payload, fx);
            self.record_events(evs, &mut out);
        }
        self.check_all_finished(base, &mut out);
        out
    }

    pub(crate) fn skip(&mut self, base: &mut Base, target: &str, fx: &mut Vec<Effect>) -> Vec<NodeEvent> {
        if base.state.is_terminal() {
            return Vec::new();
        }
        let mut out = Vec::new();
        if base.matches(target) {
            tracing::info!(node = %base.name, "marking parallel workflows as skipped");
            let was_active = base.state == WorkflowState::Active;
            base.state = WorkflowState::Skipped;
            for child in &mut self.children {
                let name = child.name().to_string();
                child.skip(&name, fx);
            }
            if was_active {
                out.push(NodeEvent::finished(&base.name, true));
            }
        } else {
            for i in 0..self.children.len() {
                let evs = self.children[i].skip(target, fx);
                self.record_events(evs, &mut out);
            }
            self.check_all_finished(base, &mut out);
        }
        out
    }

    fn record_events(&mut self, evs: Vec<NodeEvent>, out: &mut Vec<NodeEvent>) {
        for ev in evs {
            match ev {
                NodeEvent::Finished { name, .. } => {
                    if let Some(flag) = self.finished.get_mut(&name) {
                        *flag = true;
                    }
                }
                failed @ NodeEvent::Failed { .. } => out.push(failed),
            }
        }
    }

    fn check_all_finished(&mut self, base: &mut Base, out: &mut Vec<NodeEvent>) {
        if base.state == WorkflowState::Active && self.finished.values().all(|done| *done) {
            tracing::info!(node = %base.name, "parallel workflows finished");
            base.state = WorkflowState::Finished;
            out.push(NodeEvent::finished(&base.name, false));
        }
    }
}

#[cfg(test)]
#[path = "composite_tests.rs"]
mod tests;
