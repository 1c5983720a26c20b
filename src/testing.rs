//! Testing utilities for pipelines.
//!
//! Assertion helpers for comparing pipeline outputs and a fluent builder for
//! test datasets:
//!
//! ```
//! use rill::from_vec;
//! use rill::collectors::ToList;
//! use rill::testing::*;
//!
//! let data = DatasetBuilder::new().range(1..=3).repeat(9, 2).build();
//! let out = from_vec(data).map(|x: i32| x + 1).collect(ToList::new()).unwrap();
//! assert_collections_equal(&out, &[2, 3, 4, 10, 10]);
//! ```

pub mod assertions;
pub mod builders;

pub use assertions::*;
pub use builders::*;
