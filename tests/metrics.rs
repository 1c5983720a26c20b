#![cfg(feature = "metrics")]

use rill::MetricsCollector;
use rill::collectors::ToList;
use rill::{from_iter, from_vec};

#[test]
fn sequential_run_records_one_segment_and_timing() -> anyhow::Result<()> {
    let metrics = MetricsCollector::new();
    let out = from_iter(1..=10)
        .with_metrics(metrics.clone())
        .map(|n| n * 2)
        .collect(ToList::new())?;

    assert_eq!(out.len(), 10);
    assert_eq!(metrics.counter("segments"), Some(1));
    assert!(metrics.elapsed().is_some());
    Ok(())
}

#[test]
fn parallel_run_records_segments_and_merges() -> anyhow::Result<()> {
    let metrics = MetricsCollector::new();
    let data: Vec<u32> = (0..100).collect();
    from_vec(data)
        .with_metrics(metrics.clone())
        .parallel_with(None, Some(4))
        .map(|n| n + 1)
        .collect(ToList::new())?;

    assert_eq!(metrics.counter("segments"), Some(4));
    assert_eq!(metrics.counter("merges"), Some(3));
    assert_eq!(metrics.counter("barriers"), None);
    Ok(())
}

#[test]
fn barrier_stages_are_counted() -> anyhow::Result<()> {
    let metrics = MetricsCollector::new();
    let data: Vec<u32> = (0..100).rev().collect();
    from_vec(data)
        .with_metrics(metrics.clone())
        .parallel_with(None, Some(4))
        .sorted()
        .collect(ToList::new())?;

    assert_eq!(metrics.counter("barriers"), Some(1));
    Ok(())
}

#[test]
fn json_report_exposes_counters() -> anyhow::Result<()> {
    let metrics = MetricsCollector::new();
    from_iter(1..=5)
        .with_metrics(metrics.clone())
        .collect(ToList::new())?;

    let report = metrics.to_json();
    assert_eq!(report["counters"]["segments"].as_u64(), Some(1));
    assert!(report["elapsed_ms"].as_u64().is_some());
    Ok(())
}
