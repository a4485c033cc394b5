// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine error types

use thiserror::Error;

/// Errors raised while building a workflow tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// Duplicate child names break the parallel's completion bookkeeping.
    #[error("parallel '{parallel}' has duplicate child '{child}'")]
    DuplicateChild { parallel: String, child: String },
}
