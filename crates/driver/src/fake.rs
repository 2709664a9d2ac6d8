// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`CoordinatorDriver`] used by this workspace's own tests, and
//! available to downstream callers under the `test-support` feature so the
//! lock/election/atomic cores can be exercised without a live ensemble.
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{ChildrenWatch, CoordinatorDriver, CreateMode, DriverError, Stat, WatchEvent};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SessionToken(u64);

struct FakeNode {
    data: Vec<u8>,
    version: i64,
    ephemeral_owner: Option<SessionToken>,
    children: BTreeSet<String>,
}

#[derive(Default)]
struct FakeState {
    nodes: HashMap<String, FakeNode>,
    seq_counters: HashMap<String, u64>,
    watchers: HashMap<String, Vec<oneshot::Sender<WatchEvent>>>,
    sessions_alive: HashMap<SessionToken, bool>,
    next_session: u64,
}

impl FakeState {
    fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            "/".to_string(),
            FakeNode {
                data: Vec::new(),
                version: 0,
                ephemeral_owner: None,
                children: BTreeSet::new(),
            },
        );
        Self {
            nodes,
            ..Default::default()
        }
    }

    fn fire(&mut self, path: &str, event: WatchEvent) {
        if let Some(senders) = self.watchers.remove(path) {
            for sender in senders {
                let _ = sender.send(event);
            }
        }
    }
}

fn child_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn parent_or_root(path: &str) -> Result<String, DriverError> {
    coord_core::parent_of(path)
        .map_err(|e| DriverError::InvalidPath(e.to_string()))
        .map(|p| p.unwrap_or_else(|| "/".to_string()))
}

/// An in-memory ensemble. Cloning a [`FakeCoordinatorDriver`] shares the
/// same simulated session (the usual case: many primitives on one
/// process share one connection); use [`FakeCoordinatorDriver::fork_session`]
/// to simulate a second process connecting independently to the same
/// ensemble, and [`FakeCoordinatorDriver::kill_session`] to simulate that
/// process's connection ending.
#[derive(Clone)]
pub struct FakeCoordinatorDriver {
    inner: Arc<Mutex<FakeState>>,
    session: SessionToken,
}

impl FakeCoordinatorDriver {
    /// Creates a fresh, empty ensemble with one simulated client session.
    pub fn new_ensemble() -> Self {
        let inner = Arc::new(Mutex::new(FakeState::new()));
        let session = Self::register_session(&inner);
        Self { inner, session }
    }

    /// Connects a second (or Nth) simulated client to the same ensemble
    /// under its own session token. Ephemeral nodes it creates are
    /// unaffected by another session's death, and vice versa.
    pub fn fork_session(&self) -> Self {
        let session = Self::register_session(&self.inner);
        Self {
            inner: self.inner.clone(),
            session,
        }
    }

    fn register_session(inner: &Arc<Mutex<FakeState>>) -> SessionToken {
        let mut state = inner.lock();
        let token = SessionToken(state.next_session);
        state.next_session += 1;
        state.sessions_alive.insert(token, true);
        token
    }

    /// Simulates this session's connection to the coordinator ending:
    /// every ephemeral node it owns disappears, and any children watch
    /// registered on their parents fires.
    pub fn kill_session(&self) {
        let mut state = self.inner.lock();
        state.sessions_alive.insert(self.session, false);
        let doomed: Vec<String> = state
            .nodes
            .iter()
            .filter(|(_, node)| node.ephemeral_owner == Some(self.session))
            .map(|(path, _)| path.clone())
            .collect();
        for path in doomed {
            Self::remove_node(&mut state, &path);
        }
    }

    fn alive(&self) -> bool {
        *self
            .inner
            .lock()
            .sessions_alive
            .get(&self.session)
            .unwrap_or(&false)
    }

    fn check_alive(&self) -> Result<(), DriverError> {
        if self.alive() {
            Ok(())
        } else {
            Err(DriverError::SessionExpired)
        }
    }

    fn remove_node(state: &mut FakeState, path: &str) {
        if state.nodes.remove(path).is_none() {
            return;
        }
        state.fire(path, WatchEvent::Deleted);
        if let Ok(Some(parent)) = coord_core::parent_of(path) {
            if let Some(parent_node) = state.nodes.get_mut(&parent) {
                parent_node.children.remove(child_name(path));
            }
            state.fire(&parent, WatchEvent::ChildrenChanged);
        }
    }
}

#[async_trait]
impl CoordinatorDriver for FakeCoordinatorDriver {
    async fn exists(&self, path: &str) -> Result<Option<Stat>, DriverError> {
        self.check_alive()?;
        let state = self.inner.lock();
        Ok(state.nodes.get(path).map(|n| Stat { version: n.version }))
    }

    async fn get(&self, path: &str) -> Result<(Vec<u8>, Stat), DriverError> {
        self.check_alive()?;
        let state = self.inner.lock();
        let node = state
            .nodes
            .get(path)
            .ok_or_else(|| DriverError::NoNode(path.to_string()))?;
        Ok((node.data.clone(), Stat { version: node.version }))
    }

    async fn set(
        &self,
        path: &str,
        data: Vec<u8>,
        expected_version: i64,
    ) -> Result<Stat, DriverError> {
        self.check_alive()?;
        let mut state = self.inner.lock();
        let node = state
            .nodes
            .get_mut(path)
            .ok_or_else(|| DriverError::NoNode(path.to_string()))?;
        if node.version != expected_version {
            return Err(DriverError::BadVersion(path.to_string()));
        }
        node.data = data;
        node.version += 1;
        Ok(Stat { version: node.version })
    }

    async fn create(
        &self,
        path: &str,
        data: Vec<u8>,
        mode: CreateMode,
    ) -> Result<String, DriverError> {
        self.check_alive()?;
        let mut state = self.inner.lock();
        let parent = parent_or_root(path)?;
        if !state.nodes.contains_key(&parent) {
            return Err(DriverError::NoNode(parent));
        }

        let full_path = if mode.is_sequential() {
            let seq = state.seq_counters.entry(parent.clone()).or_insert(0);
            let id = *seq;
            *seq += 1;
            format!("{path}{id:010}")
        } else {
            if state.nodes.contains_key(path) {
                return Err(DriverError::NodeExists(path.to_string()));
            }
            path.to_string()
        };

        let owner = if mode.is_ephemeral() {
            Some(self.session)
        } else {
            None
        };
        state.nodes.insert(
            full_path.clone(),
            FakeNode {
                data,
                version: 0,
                ephemeral_owner: owner,
                children: BTreeSet::new(),
            },
        );
        if let Some(parent_node) = state.nodes.get_mut(&parent) {
            parent_node.children.insert(child_name(&full_path).to_string());
        }
        state.fire(&parent, WatchEvent::ChildrenChanged);
        Ok(full_path)
    }

    async fn delete(&self, path: &str, expected_version: i64) -> Result<(), DriverError> {
        self.check_alive()?;
        let mut state = self.inner.lock();
        {
            let node = state
                .nodes
                .get(path)
                .ok_or_else(|| DriverError::NoNode(path.to_string()))?;
            if node.version != expected_version {
                return Err(DriverError::BadVersion(path.to_string()));
            }
        }
        Self::remove_node(&mut state, path);
        Ok(())
    }

    async fn children_watch(&self, path: &str) -> Result<ChildrenWatch, DriverError> {
        self.check_alive()?;
        let mut state = self.inner.lock();
        let node = state
            .nodes
            .get(path)
            .ok_or_else(|| DriverError::NoNode(path.to_string()))?;
        let children: Vec<String> = node.children.iter().cloned().collect();
        let stat = Stat { version: node.version };
        let (tx, rx) = oneshot::channel();
        state.watchers.entry(path.to_string()).or_default().push(tx);
        Ok(ChildrenWatch {
            children,
            stat,
            event: rx,
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
