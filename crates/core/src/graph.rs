// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Graph snapshot DTOs broadcast on the state topic for dashboards.
//!
//! Node IDs are globally unique workflow names; edge IDs are unique by
//! construction (`<src>-><dst>`). Serialization is deterministic so the
//! controller can de-duplicate consecutive snapshots byte-wise.

use crate::message::State;
use crate::state::WorkflowState;
use serde::Serialize;

/// One graph node wrapped in the `data` envelope the dashboard expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub data: NodeData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeData {
    pub id: String,
    pub name: String,
    pub highlight: bool,
    pub status: WorkflowState,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(rename = "messageState", skip_serializing_if = "Option::is_none")]
    pub message_state: Option<State>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One graph edge wrapped in the `data` envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEdge {
    pub data: EdgeData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeData {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl GraphEdge {
    /// Edge from `source` to `target` with the canonical `<src>-><dst>` id.
    pub fn link(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        let id = format!("{source}->{target}");
        GraphEdge { data: EdgeData { id, source, target } }
    }
}

/// The full `{nodes, edges}` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Graph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl Graph {
    pub fn new(nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Self {
        Graph { nodes, edges }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "graph_tests.rs"]
mod tests;
