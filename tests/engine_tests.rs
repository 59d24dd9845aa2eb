//! End-to-end scenarios for block discovery.

use concordance::engine::{
    BlockLayout, Classified, Concordance, FnCancel, FnFilter, KeyFilter, NeverCancel,
    SearchOutcome,
};
use concordance::lines::{LineFilter, LineOptions};
use concordance::{ConcordanceError, SearchOptions};
use std::cell::Cell;

const SCENARIO: [&str; 8] = ["aaa", "bbb", "ccc", "", "aaa", "bbb", "", "ccc"];

fn blank_insignificant() -> LineFilter {
    LineFilter::new(&LineOptions::default()).unwrap()
}

fn search<'a, F>(lines: &'a [&'a str], filter: F, options: &SearchOptions) -> SearchOutcome<'a, &'a str>
where
    F: KeyFilter<&'a str>,
    F::Key: Clone,
{
    Concordance::new(lines, filter).find_blocks(options, &NeverCancel)
}

fn layout(part_count: usize, starts: &[usize]) -> BlockLayout {
    BlockLayout {
        part_count,
        occurrence_starts: starts.to_vec(),
    }
}

#[test]
fn test_two_blocks_with_insignificant_blank_lines() {
    let outcome = search(&SCENARIO, blank_insignificant(), &SearchOptions::new());

    assert_eq!(outcome.layouts(), vec![layout(2, &[0, 4]), layout(1, &[2, 7])]);

    let first = &outcome.blocks[0];
    assert_eq!(*first.part_at(0, 0).unwrap(), "aaa");
    assert_eq!(*first.part_at(1, 1).unwrap(), "bbb");
    let second = &outcome.blocks[1];
    assert_eq!(*second.part_at(1, 0).unwrap(), "ccc");
    assert_eq!(second.positions(1).unwrap(), 7..8);
}

#[test]
fn test_min_parts_keeps_only_long_block() {
    let options = SearchOptions::new().with_min_parts(2);
    let outcome = search(&SCENARIO, blank_insignificant(), &options);

    assert_eq!(outcome.layouts(), vec![layout(2, &[0, 4])]);
    assert_eq!(outcome.summary.dismissed_blocks, 1);
    // The dismissed "ccc" positions are not claimed.
    assert_eq!(outcome.summary.covered_positions, 4);
}

#[test]
fn test_no_repeats_yields_empty_result() {
    let outcome = search(&["a", "b", "c"], blank_insignificant(), &SearchOptions::new());
    assert!(outcome.blocks.is_empty());
    assert_eq!(outcome.summary.accepted_blocks, 0);
}

#[test]
fn test_max_blocks_zero_is_unlimited_and_one_truncates() {
    let lines = ["a", "x", "a", "b", "y", "b", "c", "z", "c"];

    let unlimited = search(&lines, blank_insignificant(), &SearchOptions::new().with_max_blocks(0));
    assert_eq!(unlimited.blocks.len(), 3);
    assert!(!unlimited.summary.truncated);

    let limited = search(&lines, blank_insignificant(), &SearchOptions::new().with_max_blocks(1));
    assert_eq!(limited.layouts(), vec![unlimited.layouts()[0].clone()]);
    assert!(limited.summary.truncated);
}

#[test]
fn test_dismissed_positions_can_form_a_different_block() {
    // Unlimited: "a" x3 (1 part) claims positions 3 and 6, so "b" stays one part.
    // With min_parts = 2 the "a" block is dismissed and "b a" grows into them.
    let lines = ["a", "x", "b", "a", "y", "b", "a"];

    let unlimited = search(&lines, blank_insignificant(), &SearchOptions::new());
    assert_eq!(
        unlimited.layouts(),
        vec![layout(1, &[0, 3, 6]), layout(1, &[2, 5])]
    );

    let filtered = search(&lines, blank_insignificant(), &SearchOptions::new().with_min_parts(2));
    assert_eq!(filtered.layouts(), vec![layout(2, &[2, 5])]);
    assert!(!unlimited.layouts().contains(&filtered.layouts()[0]));
}

#[test]
fn test_rejecting_filter_yields_nothing() {
    let filter = FnFilter::new(|_: &&str| None::<Classified<String>>);
    let outcome = search(&["a", "a", "a"], filter, &SearchOptions::new());
    assert!(outcome.blocks.is_empty());
    assert_eq!(outcome.summary.excluded_elements, 3);
    assert_eq!(outcome.summary.unique_keys, 0);
}

#[test]
fn test_all_insignificant_yields_nothing() {
    let filter = FnFilter::new(|s: &&str| Some(Classified::insignificant(s.to_string())));
    let outcome = search(&["a", "b", "a", "b"], filter, &SearchOptions::new());
    assert!(outcome.blocks.is_empty());
}

#[test]
fn test_significance_fixed_by_first_occurrence() {
    // The filter calls "k" insignificant the first time only; "k" never anchors.
    let seen = Cell::new(false);
    let filter = FnFilter::new(|s: &&str| {
        let significant = *s != "k" || seen.replace(true);
        Some(Classified {
            key: s.to_string(),
            significant,
        })
    });
    let outcome = search(&["k", "1", "k", "2", "k"], filter, &SearchOptions::new());
    assert!(outcome.blocks.is_empty());
}

#[test]
fn test_normalizing_filter_groups_variants() {
    let filter = LineFilter::new(&LineOptions {
        trim: true,
        ignore_case: true,
        ..LineOptions::default()
    })
    .unwrap();
    let lines = ["  Foo()", "bar", "FOO()", "x"];
    let outcome = search(&lines, filter, &SearchOptions::new());
    assert_eq!(outcome.layouts(), vec![layout(1, &[0, 2])]);
    // Parts are the original, unnormalized elements.
    assert_eq!(*outcome.blocks[0].part_at(1, 0).unwrap(), "FOO()");
}

#[test]
fn test_repeated_search_is_identical() {
    let concordance = Concordance::new(&SCENARIO[..], blank_insignificant());
    let first = concordance.find_blocks(&SearchOptions::new(), &NeverCancel);
    let second = concordance.find_blocks(&SearchOptions::new(), &NeverCancel);
    assert_eq!(first.layouts(), second.layouts());
    assert_eq!(first.blocks, second.blocks);
}

#[test]
fn test_cancellation_returns_accepted_prefix() {
    let lines = ["a", "x", "a", "b", "y", "b", "c", "z", "c"];
    let unlimited = search(&lines, blank_insignificant(), &SearchOptions::new());

    // Polls: a, grow a, a again, x, b, grow b, b again, y. Key c cancels.
    let polls = Cell::new(0);
    let cancel = FnCancel(|| {
        polls.set(polls.get() + 1);
        polls.get() > 8
    });
    let outcome =
        Concordance::new(&lines[..], blank_insignificant()).find_blocks(&SearchOptions::new(), &cancel);

    assert!(outcome.summary.interrupted);
    assert_eq!(outcome.layouts(), unlimited.layouts()[..2].to_vec());
}

#[test]
fn test_out_of_range_access() {
    let outcome = search(&SCENARIO, blank_insignificant(), &SearchOptions::new());
    let block = &outcome.blocks[0];
    assert!(matches!(
        block.part_at(0, 2),
        Err(ConcordanceError::OutOfRange { what: "part", index: 2, len: 2 })
    ));
    assert!(matches!(
        block.part_at(9, 0),
        Err(ConcordanceError::OutOfRange { what: "occurrence", .. })
    ));
}

#[test]
fn test_negative_limits_rejected_eagerly() {
    assert!(matches!(
        SearchOptions::from_limits(-1, 0),
        Err(ConcordanceError::InvalidArgument { name: "max_blocks", .. })
    ));
}
