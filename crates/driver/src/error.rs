// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors a coordinator driver call can fail with.

use thiserror::Error;

/// Errors surfaced by a [`crate::CoordinatorDriver`] call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error("no node at {0}")]
    NoNode(String),
    #[error("node already exists at {0}")]
    NodeExists(String),
    #[error("version mismatch writing {0}")]
    BadVersion(String),
    #[error("session expired")]
    SessionExpired,
    #[error("connection loss: {0}")]
    ConnectionLoss(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
}
