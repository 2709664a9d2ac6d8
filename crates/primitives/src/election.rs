// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Leader election over ephemeral-sequential membership, publishing role
//! transitions on a stream instead of blocking the caller: a callback
//! API would force the worker to call back into arbitrary user code while
//! holding no lock on its own state.

use crate::CoordError;
use coord_core::parse_suffix_id;
use coord_driver::{
    create_parent_if_absent, create_protected_ephemeral_sequential,
    sorted_children_by_numeric_suffix, ClusterSession, CoordinatorDriver,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

/// A handle's current standing in its election group. This design never
/// transitions `Leader` back to `Follower`: losing leadership only
/// happens by session death, after which the handle is defunct and must
/// be recreated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Follower,
    Leader,
}

/// One process's membership in a leader election group.
///
/// `start` registers a participant and spawns a single background worker
/// that watches the group's children and promotes this handle to
/// [`Role::Leader`] the moment it becomes the smallest-suffix child.
/// Role transitions are published on [`Election::leadership`]; errors
/// observed by the worker (rather than returned from `start`, which is
/// non-blocking) are delivered through [`Election::next_error`].
pub struct Election<D: CoordinatorDriver> {
    session: ClusterSession<D>,
    parent: String,
    participant_path: Arc<Mutex<Option<String>>>,
    leadership_rx: watch::Receiver<Role>,
    error_rx: mpsc::Receiver<CoordError>,
    stop_tx: Option<oneshot::Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl<D: CoordinatorDriver> Election<D> {
    /// Non-blocking: spawns the background worker and returns immediately.
    /// Registration (parent creation, participant creation) happens inside
    /// the worker itself; any failure there is delivered on the error
    /// stream, never returned here.
    pub fn start(session: ClusterSession<D>, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        let (leadership_tx, leadership_rx) = watch::channel(Role::Follower);
        let (error_tx, error_rx) = mpsc::channel(16);
        let (stop_tx, stop_rx) = oneshot::channel();
        let participant_path = Arc::new(Mutex::new(None));

        let worker = tokio::spawn(run_worker(
            session.clone(),
            parent.clone(),
            participant_path.clone(),
            leadership_tx,
            error_tx,
            stop_rx,
        ));

        Self {
            session,
            parent,
            participant_path,
            leadership_rx,
            error_rx,
            stop_tx: Some(stop_tx),
            worker: Some(worker),
        }
    }

    /// Current role as of the last observed transition.
    pub fn role(&self) -> Role {
        *self.leadership_rx.borrow()
    }

    /// A clone of the leadership watch channel; `.changed().await` wakes
    /// on every transition, `.borrow()` reads the latest value without
    /// consuming it.
    pub fn leadership(&self) -> watch::Receiver<Role> {
        self.leadership_rx.clone()
    }

    /// Receives the next coordinator error observed by the background
    /// worker, if any. Returns `None` once the worker has exited and the
    /// channel is drained.
    pub async fn next_error(&mut self) -> Option<CoordError> {
        self.error_rx.recv().await
    }

    pub fn parent(&self) -> &str {
        &self.parent
    }

    /// Signals the worker to exit, waits for it to finish, then deletes
    /// the participant node and surfaces any delete error. After `stop`
    /// the handle must not be reused.
    pub async fn stop(mut self) -> Result<(), CoordError> {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.worker.take() {
            let _ = handle.await;
        }

        let path = self.participant_path.lock().take();
        if let Some(path) = path {
            let driver = self.session.driver();
            if let Some(stat) = driver.exists(&path).await? {
                driver.delete(&path, stat.version).await?;
            }
        }
        Ok(())
    }
}

async fn run_worker<D: CoordinatorDriver>(
    session: ClusterSession<D>,
    parent: String,
    participant_path: Arc<Mutex<Option<String>>>,
    leadership_tx: watch::Sender<Role>,
    error_tx: mpsc::Sender<CoordError>,
    mut stop_rx: oneshot::Receiver<()>,
) {
    if !session.is_live() {
        let _ = error_tx.send(CoordError::NotConnected).await;
        return;
    }
    let driver = session.driver().clone();

    if let Err(e) = create_parent_if_absent(&driver, &parent, Vec::new()).await {
        let _ = error_tx.send(e.into()).await;
        return;
    }
    let (path, name) =
        match create_protected_ephemeral_sequential(&driver, &parent, Vec::new()).await {
            Ok(v) => v,
            Err(e) => {
                let _ = error_tx.send(e.into()).await;
                return;
            }
        };
    let id = parse_suffix_id(&name);
    tracing::debug!(parent = %parent, path = %path, id, "election participant registered");
    *participant_path.lock() = Some(path);

    let mut announced = false;

    loop {
        let listing = match sorted_children_by_numeric_suffix(&driver, &parent).await {
            Ok(w) => w,
            Err(e) => {
                let _ = error_tx.send(e.into()).await;
                return;
            }
        };

        if !announced {
            let is_leader = listing.children.len() == 1
                || listing
                    .children
                    .first()
                    .map(|name| parse_suffix_id(name) == id)
                    .unwrap_or(false);
            if is_leader {
                announced = true;
                tracing::info!(parent = %parent, id, "election: promoted to leader");
                // Only fails if every receiver (including our own `Election`
                // handle) has been dropped, in which case there is nothing
                // left to notify anyway.
                let _ = leadership_tx.send(Role::Leader);
            }
        }

        tokio::select! {
            _ = &mut stop_rx => {
                tracing::debug!(parent = %parent, id, "election worker stopping");
                return;
            }
            _event = listing.event => {
                // One-shot watch fired; re-arm and re-evaluate from the
                // top regardless of event kind.
            }
        }
    }
}

#[cfg(test)]
#[path = "election_tests.rs"]
mod tests;
