// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The coordinator driver trait the three primitive cores consume.

use crate::{ChildrenWatch, CreateMode, DriverError, Stat};
use async_trait::async_trait;

/// Adapter for a hierarchical, session-oriented coordination service.
///
/// Implementations are expected to be cheap to clone (an `Arc`-wrapped
/// connection handle is the usual shape) and safe to share across
/// concurrently-running primitives on the same process.
#[async_trait]
pub trait CoordinatorDriver: Clone + Send + Sync + 'static {
    /// Checks whether a node exists, returning its stat if so.
    async fn exists(&self, path: &str) -> Result<Option<Stat>, DriverError>;

    /// Reads a node's data and stat. Fails with [`DriverError::NoNode`] if
    /// the node does not exist.
    async fn get(&self, path: &str) -> Result<(Vec<u8>, Stat), DriverError>;

    /// Writes a node's data if `expected_version` still matches the
    /// coordinator's version counter. Fails with
    /// [`DriverError::BadVersion`] otherwise, or [`DriverError::NoNode`] if
    /// the node does not exist.
    async fn set(&self, path: &str, data: Vec<u8>, expected_version: i64)
        -> Result<Stat, DriverError>;

    /// Creates a node. For a sequential `mode`, `path` is the prefix the
    /// coordinator appends its monotonic counter to, and the returned
    /// `String` is the full path actually created. For a non-sequential
    /// `mode` the returned path equals `path`. Fails with
    /// [`DriverError::NodeExists`] if a non-sequential `path` is already
    /// occupied, or [`DriverError::NoNode`] if `path`'s parent does not
    /// exist.
    async fn create(
        &self,
        path: &str,
        data: Vec<u8>,
        mode: CreateMode,
    ) -> Result<String, DriverError>;

    /// Deletes a node if `expected_version` still matches. Fails with
    /// [`DriverError::BadVersion`] on a stale version, or
    /// [`DriverError::NoNode`] if the node is already gone.
    async fn delete(&self, path: &str, expected_version: i64) -> Result<(), DriverError>;

    /// Lists a node's children and arms a one-shot watch that fires the
    /// next time that child set changes. Fails with
    /// [`DriverError::NoNode`] if `path` does not exist.
    async fn children_watch(&self, path: &str) -> Result<ChildrenWatch, DriverError>;
}
