// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One process's attachment to the coordinator.

use crate::CoordinatorDriver;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Process-wide defaults used to seed new sessions when the caller does
/// not override them. Constructed once, read-only after; never mutated
/// from application code.
pub struct SessionDefaults {
    pub endpoints: &'static str,
    pub cluster_name: &'static str,
}

pub static DEFAULT_SESSION: SessionDefaults = SessionDefaults {
    endpoints: "127.0.0.1",
    cluster_name: "local",
};

/// One process's attachment to the coordinator: the ensemble endpoints it
/// was configured with, a live/dead flag, and the driver handle shared by
/// every primitive built on this session.
///
/// Constructing a real connection (DNS resolution, the coordinator's own
/// handshake) is the driver's concern, not this type's — `connect` only
/// flips the local liveness flag that the lock and election cores consult
/// before registering a participant. Actual session death on the
/// coordinator side (e.g. a missed heartbeat) is observed the other way:
/// any in-flight driver call on a dead session fails, independent of
/// whether `disconnect` was ever called locally.
#[derive(Clone)]
pub struct ClusterSession<D: CoordinatorDriver> {
    endpoints: String,
    live: Arc<AtomicBool>,
    driver: D,
}

impl<D: CoordinatorDriver> ClusterSession<D> {
    /// Builds an idle session over `driver`, using the given
    /// comma-separated endpoint list.
    pub fn new(endpoints: impl Into<String>, driver: D) -> Self {
        Self {
            endpoints: endpoints.into(),
            live: Arc::new(AtomicBool::new(false)),
            driver,
        }
    }

    /// Builds an idle session using the process-wide default endpoints.
    pub fn with_defaults(driver: D) -> Self {
        Self::new(DEFAULT_SESSION.endpoints, driver)
    }

    /// Marks the session live. Infallible: there is no handshake at this
    /// layer, only the local flag primitives check before registering.
    pub fn connect(&self) {
        self.live.store(true, Ordering::SeqCst);
    }

    /// Marks the session dead. Already-registered ephemeral participants
    /// remain the driver's problem to clean up (it owns the real
    /// connection lifetime); this only stops new primitive operations
    /// from proceeding past their session-liveness check.
    pub fn disconnect(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    pub fn endpoints(&self) -> &str {
        &self.endpoints
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
