//! Closeness scoring tests
//!
//! The sliding window is checked against a direct pairwise count.

use proptest::prelude::*;
use tapegraph::closeness;

fn pairwise_count(list_1: &[usize], list_2: &[usize], threshold: usize) -> usize {
    list_1
        .iter()
        .map(|&i| list_2.iter().filter(|&&j| i.abs_diff(j) <= threshold).count())
        .sum()
}

fn cue_lines() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::btree_set(0usize..200, 0..30).prop_map(|set| set.into_iter().collect())
}

#[test]
fn test_two_speaker_exchange() {
    // A at 0, B at 2 with the default threshold
    assert_eq!(closeness(&[0], &[2], 5, 1.0), 2.0);
}

#[test]
fn test_dense_exchange() {
    let a = [0, 2, 4, 6];
    let b = [1, 3, 5, 7];
    // Every pair except (0, 7) lies within 5 lines
    let expected = pairwise_count(&a, &b, 5) as f64 + 0.5;
    assert_eq!(closeness(&a, &b, 5, 0.5), expected);
    assert_eq!(expected, 15.5);
}

#[test]
fn test_base_only_when_out_of_range() {
    assert_eq!(closeness(&[0, 1], &[100, 200], 5, 1.0), 1.0);
    assert_eq!(closeness(&[0, 1], &[100, 200], 5, 0.0), 0.0);
}

proptest! {
    #[test]
    fn prop_closeness_is_symmetric(
        a in cue_lines(),
        b in cue_lines(),
        threshold in 0usize..20,
    ) {
        prop_assert_eq!(
            closeness(&a, &b, threshold, 1.0),
            closeness(&b, &a, threshold, 1.0)
        );
    }

    #[test]
    fn prop_closeness_matches_pairwise_count(
        a in cue_lines(),
        b in cue_lines(),
        threshold in 0usize..20,
    ) {
        let expected = pairwise_count(&a, &b, threshold) as f64 + 1.0;
        prop_assert_eq!(closeness(&a, &b, threshold, 1.0), expected);
    }

    #[test]
    fn prop_closeness_at_least_base(
        a in cue_lines(),
        b in cue_lines(),
        base in 0.0f64..10.0,
    ) {
        prop_assert!(closeness(&a, &b, 5, base) >= base);
    }
}
