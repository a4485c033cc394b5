// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-node workflow lifecycle state.

use serde::{Deserialize, Serialize};

/// Lifecycle of a workflow node.
///
/// Transitions are monotone along `INACTIVE → ACTIVE → FINISHED`, with a
/// lateral `SKIPPED` terminal reachable from any non-terminal state. The
/// only sanctioned reverse step is `dispose` returning an ACTIVE node to
/// INACTIVE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WorkflowState {
    Inactive,
    Active,
    Finished,
    Skipped,
}

impl WorkflowState {
    /// Whether this state admits no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowState::Finished | WorkflowState::Skipped)
    }
}

crate::simple_display! {
    WorkflowState {
        Inactive => "INACTIVE",
        Active => "ACTIVE",
        Finished => "FINISHED",
        Skipped => "SKIPPED",
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
