// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-level value types shared by the driver trait and its callers.

use tokio::sync::oneshot;

/// The coordinator's per-node version counter, bumped on every mutation and
/// used as the optimistic-concurrency precondition for `set`/`delete`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stat {
    pub version: i64,
}

/// How a node should be created. Only `EphemeralSequential` is used by the
/// lock and election cores (as "protected ephemeral-sequential"); the
/// atomic value core creates its node (and its ancestors) as
/// `Persistent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMode {
    Persistent,
    PersistentSequential,
    Ephemeral,
    EphemeralSequential,
}

impl CreateMode {
    pub fn is_sequential(self) -> bool {
        matches!(self, Self::PersistentSequential | Self::EphemeralSequential)
    }

    pub fn is_ephemeral(self) -> bool {
        matches!(self, Self::Ephemeral | Self::EphemeralSequential)
    }
}

/// What fired a children watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// The watched node's child set changed.
    ChildrenChanged,
    /// The watched node itself was deleted.
    Deleted,
    /// The session observing this watch ended.
    SessionLost,
    /// Anything else the driver may report; callers re-arm and re-check.
    Other,
}

/// The result of a `children-watch` call: the child set as of the call, its
/// stat, and a one-shot receiver that resolves exactly once when the
/// coordinator next reports a change.
pub struct ChildrenWatch {
    pub children: Vec<String>,
    pub stat: Stat,
    pub event: oneshot::Receiver<WatchEvent>,
}
