//! Assertion functions for comparing pipeline outputs with expectations.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

/// Assert that two collections are equal in order and content.
///
/// # Panics
///
/// Panics with both collections rendered if they differ in length or in any
/// position.
pub fn assert_collections_equal<T: Debug + PartialEq>(actual: &[T], expected: &[T]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "length mismatch: expected {} elements, got {}\n  expected: {expected:?}\n  actual:   {actual:?}",
        expected.len(),
        actual.len()
    );
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert_eq!(
            a, e,
            "mismatch at index {i}\n  expected: {expected:?}\n  actual:   {actual:?}"
        );
    }
}

/// Assert that two collections hold the same multiset of elements,
/// ignoring order.
///
/// # Panics
///
/// Panics if any element occurs a different number of times in the two
/// collections.
pub fn assert_collections_unordered_equal<T: Debug + Eq + Hash>(actual: &[T], expected: &[T]) {
    fn histogram<T: Eq + Hash>(items: &[T]) -> HashMap<&T, usize> {
        let mut counts = HashMap::new();
        for item in items {
            *counts.entry(item).or_insert(0) += 1;
        }
        counts
    }

    let actual_counts = histogram(actual);
    let expected_counts = histogram(expected);
    assert_eq!(
        actual_counts, expected_counts,
        "multiset mismatch\n  expected: {expected:?}\n  actual:   {actual:?}"
    );
}

/// Assert that a collection has exactly `expected` elements.
///
/// # Panics
///
/// Panics with the collection rendered if the size differs.
pub fn assert_collection_size<T: Debug>(actual: &[T], expected: usize) {
    assert_eq!(
        actual.len(),
        expected,
        "expected {expected} elements, got {}: {actual:?}",
        actual.len()
    );
}

/// Assert that every element satisfies `pred`.
///
/// # Panics
///
/// Panics naming the first offending element.
pub fn assert_all<T: Debug>(actual: &[T], pred: impl Fn(&T) -> bool) {
    for (i, item) in actual.iter().enumerate() {
        assert!(pred(item), "element at index {i} failed predicate: {item:?}");
    }
}

/// Assert that at least one element satisfies `pred`.
///
/// # Panics
///
/// Panics with the collection rendered if no element matches.
pub fn assert_any<T: Debug>(actual: &[T], pred: impl Fn(&T) -> bool) {
    assert!(
        actual.iter().any(pred),
        "no element satisfied the predicate: {actual:?}"
    );
}

/// Assert that no element satisfies `pred`.
///
/// # Panics
///
/// Panics naming the first offending element.
pub fn assert_none<T: Debug>(actual: &[T], pred: impl Fn(&T) -> bool) {
    for (i, item) in actual.iter().enumerate() {
        assert!(
            !pred(item),
            "element at index {i} unexpectedly satisfied the predicate: {item:?}"
        );
    }
}

/// Assert that two key-value maps are equal, reporting missing, extra, and
/// differing keys separately.
///
/// # Panics
///
/// Panics with a per-key breakdown on any difference.
pub fn assert_map_equal<K, V>(actual: &HashMap<K, V>, expected: &HashMap<K, V>)
where
    K: Debug + Eq + Hash,
    V: Debug + PartialEq,
{
    let actual_keys: HashSet<&K> = actual.keys().collect();
    let expected_keys: HashSet<&K> = expected.keys().collect();
    let missing: Vec<_> = expected_keys.difference(&actual_keys).collect();
    let extra: Vec<_> = actual_keys.difference(&expected_keys).collect();
    assert!(
        missing.is_empty() && extra.is_empty(),
        "key mismatch\n  missing: {missing:?}\n  extra:   {extra:?}"
    );
    for (key, expected_value) in expected {
        let actual_value = &actual[key];
        assert_eq!(
            actual_value, expected_value,
            "value mismatch for key {key:?}"
        );
    }
}
