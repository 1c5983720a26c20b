//! Built-in collectors for terminal [`collect`](crate::Sequence::collect).
//!
//! These are reusable implementations of [`Collector`](crate::Collector):
//!
//! - [`ToList`] -- ordered `Vec<T>`.
//! - [`ToSet`] -- deduplicated `HashSet<T>`.
//! - [`Counting`] -- element count.
//! - [`Reduce`] / [`Reducing`] -- associative reduction with/without identity.
//! - [`Summing`] -- sum of values.
//! - [`Joining`] -- concatenated strings with an optional separator.
//! - [`Summarizing`] / [`SummaryStats`] -- count, sum, min, max, mean in one pass.
//! - [`Averaging`] -- mean as `f64`.
//! - [`GroupingBy`] -- buckets per key, each reduced by a downstream collector.
//! - [`PartitioningBy`] / [`Partitioned`] -- two-way split by predicate.
//! - [`Mapping`] -- element transform in front of a downstream collector.
//! - [`AndThen`] -- post-transform of another collector's result.
//!
//! Every collector here is parallel-safe: its merge is associative over
//! partial accumulators from ordered, disjoint segments.
//!
//! # Examples
//! ```
//! use rill::from_vec;
//! use rill::collectors::{GroupingBy, Mapping, Summing};
//!
//! let totals = from_vec(vec![
//!     ("x".to_string(), 10u64),
//!     ("x".to_string(), 5),
//!     ("y".to_string(), 1),
//! ])
//! .collect(GroupingBy::with(
//!     |kv: &(String, u64)| kv.0.clone(),
//!     Mapping::new(|kv: (String, u64)| kv.1, Summing::new()),
//! ))
//! .unwrap();
//!
//! assert_eq!(totals["x"], 15);
//! assert_eq!(totals["y"], 1);
//! ```

mod adapters;
mod basic;
mod grouping;
mod statistical;

pub use adapters::{AndThen, Mapping};
pub use basic::{Counting, Joining, Reduce, Reducing, Summing, ToList, ToSet};
pub use grouping::{GroupingBy, Partitioned, PartitioningBy};
pub use statistical::{Averaging, Summarizing, SummaryAcc, SummaryStats};
