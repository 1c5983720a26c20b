use rill::collector;
use rill::collectors::{
    AndThen, Averaging, Counting, Joining, Mapping, Reducing, Summarizing, Summing, ToList, ToSet,
};
use rill::testing::*;
use rill::{from_iter, from_vec};
use std::collections::HashSet;

#[test]
fn to_list_preserves_order() -> anyhow::Result<()> {
    let out = from_iter(vec![3, 1, 4, 1, 5]).collect(ToList::new())?;
    assert_collections_equal(&out, &[3, 1, 4, 1, 5]);
    Ok(())
}

#[test]
fn to_set_deduplicates() -> anyhow::Result<()> {
    let out = from_iter(vec![1, 2, 2, 3, 3, 3]).collect(ToSet::new())?;
    assert_eq!(out, HashSet::from([1, 2, 3]));
    Ok(())
}

#[test]
fn counting_collector_matches_count_terminal() -> anyhow::Result<()> {
    let via_collector = from_iter(1..=7).collect(Counting::new())?;
    let via_terminal = from_iter(1..=7).count()?;
    assert_eq!(via_collector, 7);
    assert_eq!(via_terminal, 7);
    Ok(())
}

#[test]
fn reduce_sums_with_identity() -> anyhow::Result<()> {
    let sum = from_vec(vec![1, 2, 3, 4, 5]).reduce(0, |a, b| a + b)?;
    assert_eq!(sum, 15);
    Ok(())
}

#[test]
fn fold_accumulates_across_types() -> anyhow::Result<()> {
    // Total length of all strings, folded into a numeric accumulator.
    let total = from_vec(vec!["a".to_string(), "bb".to_string(), "ccc".to_string()])
        .fold(0usize, |acc, s| acc + s.len())?;
    assert_eq!(total, 6);
    Ok(())
}

#[test]
fn summing_collector() -> anyhow::Result<()> {
    let sum: u64 = from_iter(1u64..=100).collect(Summing::new())?;
    assert_eq!(sum, 5050);
    Ok(())
}

#[test]
fn reducing_without_identity_is_none_on_empty() -> anyhow::Result<()> {
    let longest = from_vec(Vec::<String>::new())
        .collect(Reducing::new(|a: String, b: String| {
            if b.len() > a.len() { b } else { a }
        }))?;
    assert_eq!(longest, None);
    Ok(())
}

#[test]
fn joining_with_separator() -> anyhow::Result<()> {
    let words = vec![
        "Hello".to_string(),
        "World".to_string(),
        "Java".to_string(),
        "Stream".to_string(),
        "API".to_string(),
    ];
    let joined = from_vec(words.clone()).collect(Joining::with(" "))?;
    assert_eq!(joined, "Hello World Java Stream API");

    let glued = from_vec(words).collect(Joining::new())?;
    assert_eq!(glued, "HelloWorldJavaStreamAPI");
    Ok(())
}

#[test]
fn custom_collector_from_four_closures() -> anyhow::Result<()> {
    // Total character count across all words.
    let chars = collector::of(
        || 0usize,
        |acc: &mut usize, word: String| *acc += word.len(),
        |a, b| a + b,
        |acc| acc,
    );
    let total = from_vec(vec![
        "Hello".to_string(),
        "World".to_string(),
        "Java".to_string(),
        "Stream".to_string(),
        "API".to_string(),
    ])
    .collect(chars)?;
    assert_eq!(total, 23);
    Ok(())
}

#[test]
fn summary_statistics_single_pass() -> anyhow::Result<()> {
    let stats = from_vec(vec![85i32, 90, 78, 92]).collect(Summarizing::new())?;
    assert_eq!(stats.count, 4);
    assert_eq!(stats.sum, 345.0);
    assert_eq!(stats.min, Some(78.0));
    assert_eq!(stats.max, Some(92.0));
    assert!((stats.mean - 86.25).abs() < 1e-9);
    Ok(())
}

#[test]
fn summary_statistics_on_empty_input() -> anyhow::Result<()> {
    let stats = from_vec(Vec::<i32>::new()).collect(Summarizing::new())?;
    assert_eq!(stats.count, 0);
    assert_eq!(stats.sum, 0.0);
    assert_eq!(stats.min, None);
    assert_eq!(stats.max, None);
    assert_eq!(stats.mean, 0.0);
    Ok(())
}

#[test]
fn averaging_collector() -> anyhow::Result<()> {
    let avg = from_vec(vec![1u32, 2, 3]).collect(Averaging::new())?;
    assert!((avg - 2.0).abs() < 1e-12);

    let empty = from_vec(Vec::<u32>::new()).collect(Averaging::new())?;
    assert_eq!(empty, 0.0);
    Ok(())
}

#[test]
fn mapping_adapter_feeds_the_downstream() -> anyhow::Result<()> {
    let total_len: u64 = from_vec(vec!["ab".to_string(), "cde".to_string()])
        .collect(Mapping::new(|s: String| s.len() as u64, Summing::new()))?;
    assert_eq!(total_len, 5);
    Ok(())
}

#[test]
fn and_then_transforms_the_finished_result() -> anyhow::Result<()> {
    let report = from_iter(1..=4).collect(AndThen::new(Counting::new(), |n| format!("{n} items")))?;
    assert_eq!(report, "4 items");
    Ok(())
}
