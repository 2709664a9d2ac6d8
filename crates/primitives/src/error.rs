// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the atomic value, lock, and election cores.

use coord_driver::DriverError;
use thiserror::Error;

/// Errors the three primitive cores expose to application code.
#[derive(Debug, Error)]
pub enum CoordError {
    #[error("session is not connected")]
    NotConnected,
    #[error("timed out waiting to acquire the lock")]
    Timeout,
    #[error("no node at {0}")]
    NotFound(String),
    #[error("version mismatch: current value does not match the expected value")]
    VersionMismatch,
    #[error("lock is not currently held")]
    NotLocked,
    #[error("coordinator error: {0}")]
    Coordinator(#[from] DriverError),
}
