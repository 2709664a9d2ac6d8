// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fair distributed mutual exclusion over ephemeral-sequential membership.

use crate::CoordError;
use coord_core::parse_suffix_id;
use coord_driver::{
    create_parent_if_absent, create_protected_ephemeral_sequential, delete_empty_ancestors,
    sorted_children_by_numeric_suffix, ClusterSession, CoordinatorDriver, DriverError,
};
use std::time::Duration;

/// In-memory state of one mutex use: which parent it contends on, which
/// participant (if any) it currently holds registered, and whether that
/// participant is the current holder.
pub struct Lock<D: CoordinatorDriver> {
    session: ClusterSession<D>,
    parent: String,
    participant_path: Option<String>,
    participant_id: Option<u64>,
    locked: bool,
}

impl<D: CoordinatorDriver> Lock<D> {
    pub fn new(session: ClusterSession<D>, parent: impl Into<String>) -> Self {
        Self {
            session,
            parent: parent.into(),
            participant_path: None,
            participant_id: None,
            locked: false,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Blocks until the lock is acquired or `wait_time * unit` elapses.
    ///
    /// Registers a protected-ephemeral-sequential participant, then loops:
    /// list children under a fresh one-shot watch, succeed immediately if
    /// we are the sole or smallest-suffix child, otherwise race the watch
    /// event against a freshly-armed timer of the full `wait_time * unit`
    /// duration (re-armed every iteration, matching the wait loop this is
    /// ported from). On timeout the participant node is deleted before
    /// returning `Timeout` — a deliberate divergence from the source,
    /// which leaves it registered.
    pub async fn acquire(&mut self, wait_time: u64, unit: Duration) -> Result<(), CoordError> {
        if !self.session.is_live() {
            return Err(CoordError::NotConnected);
        }

        // Cloned once up front: an owned handle means the calls below never
        // hold a borrow of `self` across the `&mut self` writes (`locked`,
        // `participant_path`) that happen in the same loop.
        let driver = self.session.driver().clone();
        create_parent_if_absent(&driver, &self.parent, Vec::new()).await?;
        let (path, name) =
            create_protected_ephemeral_sequential(&driver, &self.parent, Vec::new()).await?;
        let id = parse_suffix_id(&name);
        tracing::debug!(parent = %self.parent, path = %path, id, "lock participant registered");
        self.participant_path = Some(path);
        self.participant_id = Some(id);

        let wait_duration = unit.saturating_mul(u32::try_from(wait_time).unwrap_or(u32::MAX));

        loop {
            let watch = sorted_children_by_numeric_suffix(&driver, &self.parent).await?;
            if Self::smallest_is_ours(&watch.children, id) {
                self.locked = true;
                tracing::info!(parent = %self.parent, id, "lock acquired");
                return Ok(());
            }

            tokio::select! {
                () = tokio::time::sleep(wait_duration) => {
                    tracing::debug!(parent = %self.parent, id, "lock acquire timed out, cleaning up participant");
                    self.cleanup_participant_on_timeout().await;
                    return Err(CoordError::Timeout);
                }
                _event = watch.event => {
                    // One-shot watch fired (children changed, or any other
                    // reported event); re-arm and re-evaluate from the top.
                }
            }
        }
    }

    fn smallest_is_ours(children: &[String], id: u64) -> bool {
        if children.len() == 1 {
            return true;
        }
        children
            .first()
            .map(|name| parse_suffix_id(name) == id)
            .unwrap_or(false)
    }

    async fn cleanup_participant_on_timeout(&mut self) {
        let Some(path) = self.participant_path.take() else {
            return;
        };
        self.participant_id = None;
        let driver = self.session.driver();
        match driver.exists(&path).await {
            Ok(Some(stat)) => {
                if let Err(e) = driver.delete(&path, stat.version).await {
                    tracing::warn!(path = %path, error = %e, "failed to delete lock participant after timeout");
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "failed to check lock participant after timeout");
            }
        }
    }

    /// Deletes the participant node and clears `locked`. Fails with
    /// [`CoordError::NotLocked`] if this handle is not currently holding
    /// the lock. Best-effort garbage-collects now-empty ancestors of
    /// `parent` afterward; a concurrent participant causes that pass to
    /// stop harmlessly at the first non-empty ancestor.
    pub async fn release(&mut self) -> Result<(), CoordError> {
        if !self.locked {
            return Err(CoordError::NotLocked);
        }
        let path = self.participant_path.clone().ok_or(CoordError::NotLocked)?;
        let driver = self.session.driver().clone();
        let version = match driver.exists(&path).await? {
            Some(stat) => stat.version,
            None => return Err(CoordError::Coordinator(DriverError::NoNode(path))),
        };
        driver.delete(&path, version).await?;
        self.locked = false;
        self.participant_path = None;
        self.participant_id = None;

        if let Err(e) = delete_empty_ancestors(&driver, &self.parent).await {
            tracing::warn!(parent = %self.parent, error = %e, "failed to garbage-collect lock parent");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
