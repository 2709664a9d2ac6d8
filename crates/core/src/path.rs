// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Absolute coordinator path splitting, used by `createParentIfAbsent`- and
//! `deleteEmptyAncestors`-equivalent logic in the driver crate.

use thiserror::Error;

/// A malformed coordinator path.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("path must be absolute (start with '/'): {0:?}")]
    NotAbsolute(String),
    #[error("path must not be empty")]
    Empty,
    #[error("path has an empty segment: {0:?}")]
    EmptySegment(String),
}

fn segments(path: &str) -> Result<Vec<&str>, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    if !path.starts_with('/') {
        return Err(PathError::NotAbsolute(path.to_string()));
    }
    if path == "/" {
        return Ok(Vec::new());
    }
    let parts: Vec<&str> = path[1..].split('/').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(PathError::EmptySegment(path.to_string()));
    }
    Ok(parts)
}

/// Joins a parent path and a child segment with exactly one separating `/`.
pub fn join_path(parent: &str, child: &str) -> String {
    let parent = parent.trim_end_matches('/');
    let child = child.trim_start_matches('/');
    if parent.is_empty() {
        format!("/{child}")
    } else {
        format!("{parent}/{child}")
    }
}

/// Returns the immediate parent of `path`, or `None` if `path` is already a
/// top-level child of the root.
pub fn parent_of(path: &str) -> Result<Option<String>, PathError> {
    let parts = segments(path)?;
    if parts.len() <= 1 {
        return Ok(None);
    }
    Ok(Some(format!("/{}", parts[..parts.len() - 1].join("/"))))
}

/// Returns every proper ancestor of `path`, root-first (e.g. `/a/b/c` ->
/// `["/a", "/a/b"]`). Used top-down to create ancestors in order, and
/// reversed (leaf-first) to delete them in order.
pub fn ancestors(path: &str) -> Result<Vec<String>, PathError> {
    let parts = segments(path)?;
    let mut out = Vec::with_capacity(parts.len().saturating_sub(1));
    for i in 1..parts.len() {
        out.push(format!("/{}", parts[..i].join("/")));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
