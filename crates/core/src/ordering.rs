// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Numeric ordering of ephemeral-sequential child names.
//!
//! Coordinator-assigned sequential children look like `_c_<uuid>-<digits>`.
//! The digits after the final `-` give the total order within a parent;
//! comparing them lexicographically would put `-9` after `-10`, so they are
//! parsed and compared numerically instead.

/// Parses the monotonic suffix of an ephemeral-sequential child name: the
/// integer found after the final `-`. A name with no `-`, or whose suffix
/// does not parse as an integer, is treated as id `0` rather than rejected,
/// so that a single malformed entry never aborts a children listing.
pub fn parse_suffix_id(name: &str) -> u64 {
    name.rfind('-')
        .and_then(|idx| name[idx + 1..].parse::<u64>().ok())
        .unwrap_or(0)
}

/// Sorts child names by their parsed numeric suffix, breaking ties (and
/// parse failures, which all collapse to id `0`) by full-name lexicographic
/// order so the result is always deterministic.
pub fn sort_by_suffix(names: &mut [String]) {
    names.sort_by(|a, b| parse_suffix_id(a).cmp(&parse_suffix_id(b)).then_with(|| a.cmp(b)));
}

#[cfg(test)]
#[path = "ordering_tests.rs"]
mod tests;
