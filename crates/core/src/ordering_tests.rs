// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

#[yare::parameterized(
    simple             = { "_c_abc-0000000007", 7 },
    ten_digit          = { "_c_abc-0000000042", 42 },
    no_prefix          = { "lock-3", 3 },
    no_dash            = { "noseq", 0 },
    trailing_dash      = { "foo-", 0 },
    multiple_dashes    = { "_c_guid-with-dash-12", 12 },
    non_numeric_suffix = { "_c_abc-xyz", 0 },
    empty               = { "", 0 },
)]
fn parses_expected_id(name: &str, expected: u64) {
    assert_eq!(parse_suffix_id(name), expected);
}

#[test]
fn sorts_numerically_not_lexicographically() {
    let mut names = vec![
        "_c_a-0000000010".to_string(),
        "_c_b-0000000002".to_string(),
        "_c_c-0000000001".to_string(),
    ];
    sort_by_suffix(&mut names);
    assert_eq!(
        names,
        vec![
            "_c_c-0000000001".to_string(),
            "_c_b-0000000002".to_string(),
            "_c_a-0000000010".to_string(),
        ]
    );
}

#[test]
fn ties_break_on_full_name() {
    let mut names = vec!["zzz-0000000001".to_string(), "aaa-0000000001".to_string()];
    sort_by_suffix(&mut names);
    assert_eq!(
        names,
        vec!["aaa-0000000001".to_string(), "zzz-0000000001".to_string()]
    );
}

#[test]
fn unparsable_suffixes_sort_stably_with_no_dash_names() {
    let mut names = vec!["b-nope".to_string(), "a".to_string()];
    sort_by_suffix(&mut names);
    // both parse to id 0; full-name order decides
    assert_eq!(names, vec!["a".to_string(), "b-nope".to_string()]);
}

proptest! {
    #[test]
    fn sort_by_suffix_yields_nondecreasing_ids(mut ids in proptest::collection::vec(0u64..10_000, 0..50)) {
        let mut names: Vec<String> = ids.iter().map(|id| format!("_c_x-{id:010}")).collect();
        sort_by_suffix(&mut names);
        let parsed: Vec<u64> = names.iter().map(|n| parse_suffix_id(n)).collect();
        ids.sort_unstable();
        prop_assert_eq!(parsed, ids);
    }
}
