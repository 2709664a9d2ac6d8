// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! coord-driver: the coordinator driver trait this library consumes, the
//! value types it exchanges, and the helper operations layered on top of
//! it (parent creation, protected ephemeral-sequential creation, sorted
//! children listing, ancestor garbage collection).
//!
//! The driver trait itself has no production implementation here — a real
//! coordinator client is an external collaborator (see the crate's design
//! notes). The `test-support` feature ships an in-memory implementation
//! used by this workspace's own tests and available to downstream callers
//! that want to exercise the primitives crate without a live ensemble.

mod driver;
mod error;
mod helpers;
mod session;
mod types;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use driver::CoordinatorDriver;
pub use error::DriverError;
pub use helpers::{
    create_parent_if_absent, create_protected_ephemeral_sequential, delete_empty_ancestors,
    sorted_children_by_numeric_suffix,
};
pub use session::ClusterSession;
pub use types::{ChildrenWatch, CreateMode, Stat, WatchEvent};

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeCoordinatorDriver;
