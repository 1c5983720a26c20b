//! Execution metrics for pipeline runs.
//!
//! A [`MetricsCollector`] is a thread-safe counter registry with wall-clock
//! timing. Attach one to a pipeline with
//! [`with_metrics`](crate::Sequence::with_metrics) and read it back after a
//! collector-driven terminal (`collect`, `count`, `reduce`, `min`, `max`)
//! completes. The runner records:
//!
//! - `segments` -- how many input segments the run used (1 for sequential)
//! - `barriers` -- how many global stages forced a parallel barrier
//! - `merges` -- how many accumulator merges the parallel merge phase did
//!
//! # Example
//!
//! ```
//! use rill::from_vec;
//! use rill::collectors::ToList;
//! use rill::metrics::MetricsCollector;
//!
//! let metrics = MetricsCollector::new();
//! let out = from_vec(vec![1, 2, 3])
//!     .with_metrics(metrics.clone())
//!     .map(|x| x * 2)
//!     .collect(ToList::new())
//!     .unwrap();
//!
//! assert_eq!(out, vec![2, 4, 6]);
//! assert_eq!(metrics.counter("segments"), Some(1));
//! assert!(metrics.elapsed().is_some());
//! ```

use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Thread-safe container for pipeline execution metrics.
#[derive(Clone, Default)]
pub struct MetricsCollector {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    counters: HashMap<String, u64>,
    start: Option<Instant>,
    end: Option<Instant>,
}

impl MetricsCollector {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `by` to the named counter, creating it at zero if absent.
    pub fn increment(&self, name: &str, by: u64) {
        let mut inner = self.inner.lock().unwrap();
        *inner.counters.entry(name.to_string()).or_insert(0) += by;
    }

    /// Current value of the named counter, if it was ever incremented.
    #[must_use]
    pub fn counter(&self, name: &str) -> Option<u64> {
        self.inner.lock().unwrap().counters.get(name).copied()
    }

    /// Record the start of a run. A later run overwrites the previous mark.
    pub fn record_start(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.start = Some(Instant::now());
        inner.end = None;
    }

    /// Record the end of a run.
    pub fn record_end(&self) {
        self.inner.lock().unwrap().end = Some(Instant::now());
    }

    /// Wall-clock duration of the most recent completed run.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        let inner = self.inner.lock().unwrap();
        match (inner.start, inner.end) {
            (Some(start), Some(end)) => Some(end.duration_since(start)),
            _ => None,
        }
    }

    /// Render all metrics as a JSON object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let inner = self.inner.lock().unwrap();
        let elapsed_ms = match (inner.start, inner.end) {
            (Some(start), Some(end)) => Some(end.duration_since(start).as_millis() as u64),
            _ => None,
        };
        json!({
            "counters": inner.counters,
            "elapsed_ms": elapsed_ms,
        })
    }

    /// Print all metrics to stdout.
    pub fn print(&self) {
        let inner = self.inner.lock().unwrap();
        println!("Pipeline metrics:");
        let mut names: Vec<_> = inner.counters.keys().collect();
        names.sort();
        for name in names {
            println!("  {name}: {}", inner.counters[name]);
        }
        if let (Some(start), Some(end)) = (inner.start, inner.end) {
            println!("  elapsed: {:?}", end.duration_since(start));
        }
    }
}
