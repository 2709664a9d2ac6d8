// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Helper operations layered on top of the raw [`CoordinatorDriver`]
//! contract: idempotent parent creation, protected ephemeral-sequential
//! child creation, sorted children listing, and best-effort ancestor
//! garbage collection.

use crate::{ChildrenWatch, CoordinatorDriver, CreateMode, DriverError};

async fn ensure_node<D: CoordinatorDriver>(
    driver: &D,
    path: &str,
    data: Vec<u8>,
) -> Result<(), DriverError> {
    if driver.exists(path).await?.is_some() {
        return Ok(());
    }
    match driver.create(path, data, CreateMode::Persistent).await {
        Ok(_) => Ok(()),
        // A concurrent creator won the race; the node is there either way.
        Err(DriverError::NodeExists(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Splits `path` by `/`, creating each ancestor as an empty persistent node
/// if absent, then creates the leaf with `data` if absent. Idempotent: a
/// repeated call against an already-created path is a no-op. Any
/// intermediate ancestor creation error is surfaced rather than swallowed.
pub async fn create_parent_if_absent<D: CoordinatorDriver>(
    driver: &D,
    path: &str,
    data: Vec<u8>,
) -> Result<(), DriverError> {
    let ancestors =
        coord_core::ancestors(path).map_err(|e| DriverError::InvalidPath(e.to_string()))?;
    for ancestor in ancestors {
        ensure_node(driver, &ancestor, Vec::new()).await?;
    }
    ensure_node(driver, path, data).await
}

/// Creates a sequential ephemeral child under `parent`, with a client-unique
/// prefix so the child survives reconnects unambiguously. Returns the
/// child's absolute path and its name (the substring after `parent/`,
/// e.g. `_c_<uuid>-0000000007`).
pub async fn create_protected_ephemeral_sequential<D: CoordinatorDriver>(
    driver: &D,
    parent: &str,
    data: Vec<u8>,
) -> Result<(String, String), DriverError> {
    let prefix = coord_core::join_path(parent, &format!("_c_{}-", uuid::Uuid::new_v4()));
    let full_path = driver
        .create(&prefix, data, CreateMode::EphemeralSequential)
        .await?;
    let name = full_path
        .strip_prefix(parent)
        .and_then(|s| s.strip_prefix('/'))
        .unwrap_or(&full_path)
        .to_string();
    Ok((full_path, name))
}

/// Lists `parent`'s children with a one-shot watch, ordered by parsed
/// numeric suffix (ties and parse failures break on full-name order).
pub async fn sorted_children_by_numeric_suffix<D: CoordinatorDriver>(
    driver: &D,
    parent: &str,
) -> Result<ChildrenWatch, DriverError> {
    let mut watch = driver.children_watch(parent).await?;
    coord_core::sort_by_suffix(&mut watch.children);
    Ok(watch)
}

/// From `path` upward, deletes nodes whose child list is empty; stops at
/// the first non-empty ancestor (or the top of the tree). Not fatal if a
/// concurrent actor has repopulated or already removed a node along the
/// way — both are treated as success.
pub async fn delete_empty_ancestors<D: CoordinatorDriver>(
    driver: &D,
    path: &str,
) -> Result<(), DriverError> {
    let mut current = path.to_string();
    loop {
        let watch = match driver.children_watch(&current).await {
            Ok(w) => w,
            Err(DriverError::NoNode(_)) => return Ok(()),
            Err(e) => return Err(e),
        };
        if !watch.children.is_empty() {
            return Ok(());
        }
        match driver.delete(&current, watch.stat.version).await {
            Ok(()) | Err(DriverError::NoNode(_)) | Err(DriverError::BadVersion(_)) => {}
            Err(e) => return Err(e),
        }
        match coord_core::parent_of(&current).map_err(|e| DriverError::InvalidPath(e.to_string()))?
        {
            Some(parent) => current = parent,
            None => return Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "helpers_tests.rs"]
mod tests;
