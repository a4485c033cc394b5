// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    inactive = { WorkflowState::Inactive, false },
    active   = { WorkflowState::Active, false },
    finished = { WorkflowState::Finished, true },
    skipped  = { WorkflowState::Skipped, true },
)]
fn terminality(state: WorkflowState, terminal: bool) {
    assert_eq!(state.is_terminal(), terminal);
}

#[test]
fn serializes_uppercase() {
    assert_eq!(serde_json::to_string(&WorkflowState::Inactive).unwrap(), "\"INACTIVE\"");
    assert_eq!(serde_json::to_string(&WorkflowState::Skipped).unwrap(), "\"SKIPPED\"");
    assert_eq!(WorkflowState::Finished.to_string(), "FINISHED");
}
