//! # Rill
//!
//! A **lazy, composable sequence-processing pipeline** for Rust: chain
//! transformation stages over a data source, then terminate the chain with a
//! reduction, optionally executed across multiple workers.
//!
//! ## Key Features
//!
//! - **Lazy stage chains** - filter, map, flat_map, distinct, sorted,
//!   limit/skip; nothing is pulled until a terminal operation runs
//! - **Pluggable collectors** - the supplier/accumulator/combiner/finisher
//!   protocol, with a first-class [`collector::of`] constructor for custom
//!   reductions
//! - **Grouping and partitioning** - single-pass bucketing with nested
//!   downstream collectors, including multi-level grouping
//! - **Sequential and parallel execution** - same terminal API; parallel
//!   mode segments the input, reduces per segment under rayon, and merges
//!   deterministically
//! - **Bounded-input validation** - eager operations on unbounded generator
//!   sources are rejected up front instead of hanging
//! - **Typed errors** - stage failures carry the stage name and element
//!   position; nothing is swallowed inside the engine
//!
//! ## Quick Start
//!
//! ```
//! use rill::from_vec;
//! use rill::collectors::{GroupingBy, Mapping, Summing};
//!
//! let orders = vec![
//!     ("electronics".to_string(), 1200u64),
//!     ("furniture".to_string(), 300),
//!     ("electronics".to_string(), 80),
//! ];
//!
//! let totals = from_vec(orders)
//!     .filter(|o| o.1 >= 100)
//!     .collect(GroupingBy::with(
//!         |o: &(String, u64)| o.0.clone(),
//!         Mapping::new(|o: (String, u64)| o.1, Summing::new()),
//!     ))
//!     .unwrap();
//!
//! assert_eq!(totals["electronics"], 1200);
//! assert_eq!(totals["furniture"], 300);
//! ```
//!
//! ## Core Concepts
//!
//! ### Sequence
//!
//! A [`Sequence<T>`] is a single-use pipeline handle. Build one with
//! [`from_vec`], [`from_iter`], or the generator constructors [`generate`],
//! [`iterate`], and [`from_fn`]; chain stages fluently; finish with exactly
//! one terminal operation. Terminals consume the handle; rerunning a
//! pipeline means rebuilding it from the origin data.
//!
//! ### Stages
//!
//! Intermediate methods return a new lazy handle and never touch the source.
//! `limit(n)` short-circuits upstream pulling, which makes it the required
//! escape hatch in front of eager operations on unbounded sources:
//!
//! ```
//! use rill::iterate;
//! use rill::collectors::ToList;
//!
//! // First ten Fibonacci numbers from an unbounded cursor.
//! let fib = iterate((0u64, 1u64), |&(a, b)| (b, a + b))
//!     .map(|(a, _)| a)
//!     .limit(10)
//!     .collect(ToList::new())
//!     .unwrap();
//! assert_eq!(fib, vec![0, 1, 1, 2, 3, 5, 8, 13, 21, 34]);
//! ```
//!
//! ### Collectors
//!
//! A [`Collector`] describes a reduction as four operations over an opaque
//! accumulator. The [`collectors`] module ships the usual suspects
//! (`ToList`, `ToSet`, `Counting`, `Summing`, `Summarizing`, `GroupingBy`,
//! `PartitioningBy`, ...), and [`collector::of`] assembles one from four
//! closures. Collectors used in parallel mode must merge associatively; all
//! built-ins do.
//!
//! ### Execution Modes
//!
//! Sequential execution (the default) runs fully on the calling thread with
//! no suspension points. [`Sequence::parallel`] switches collector-driven
//! terminals to the segment-and-merge executor; results for associative
//! collectors are observationally identical to sequential runs.
//!
//! ## Feature Flags
//!
//! - `metrics` *(default)* - execution metrics via
//!   [`metrics::MetricsCollector`]
//!
//! ## Module Overview
//!
//! - [`sequence`] - the pipeline handle, stage methods, terminals
//! - [`source`] - finite and generator-backed element sources
//! - [`collector`] - the four-function reduction protocol
//! - [`collectors`] - built-in collectors and adapters
//! - [`runner`] - sequential and parallel execution engine
//! - [`error`] - the error taxonomy terminals surface
//! - [`testing`] - assertions and dataset builders for pipeline tests

pub mod collector;
pub mod collectors;
pub mod error;
pub mod runner;
pub mod sequence;
pub mod source;
mod stage;
pub mod testing;
mod type_token;

#[cfg(feature = "metrics")]
pub mod metrics;

pub use collector::{Collector, FnCollector};
pub use error::{Error, Result};
pub use runner::{ExecMode, Runner};
pub use sequence::{Element, Sequence, from_fn, from_iter, from_vec, generate, iterate};
pub use source::Source;

#[cfg(feature = "metrics")]
pub use metrics::MetricsCollector;
