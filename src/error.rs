//! Error types surfaced by terminal operations.
//!
//! Nothing inside the pipeline machinery swallows an error: every failure is
//! reported to the caller of the terminal operation that drove the run. User
//! stage functions are free to absorb their own failures (e.g. by returning
//! `None` from `filter_map`); that is a caller concern, not an engine one.
//!
//! Absent results (`find_first` on an empty sequence, `min` with no
//! elements) are not errors; those terminals return `Option`.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while executing a pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// A user-supplied stage function failed.
    ///
    /// `index` is the zero-based position of the offending element in the
    /// stage's input, the closest originating context the engine can always
    /// provide.
    #[error("{stage} stage failed at element {index}: {message}")]
    Stage {
        /// Name of the stage whose function failed (`map`, `filter`, ...).
        stage: &'static str,
        /// Zero-based position of the element within the stage's input.
        index: u64,
        /// Rendered failure reported by the user function.
        message: String,
    },

    /// An eager operation was applied at an unbounded point of the chain.
    ///
    /// Raised for `sorted`/`distinct` without a preceding `limit` on an
    /// infinite source, for parallel splitting of such a source, and for
    /// eager terminals (`collect`, `count`, `reduce`, ...) on an unbounded
    /// chain.
    #[error("`{op}` requires a bounded sequence; apply `limit` first or use a finite source")]
    Unbounded {
        /// The operation that needed a bounded input.
        op: &'static str,
    },

    /// Combining two partial accumulators failed.
    ///
    /// Only custom [`Collector`](crate::Collector) implementations can
    /// produce this; every built-in merge is infallible.
    #[error("combining partial accumulators failed: {message}")]
    Merge {
        /// Rendered failure reported by the combiner.
        message: String,
    },
}

impl Error {
    /// Build a [`Error::Stage`] from a user function's failure.
    pub fn stage(stage: &'static str, index: u64, err: impl std::fmt::Display) -> Self {
        Self::Stage {
            stage,
            index,
            message: err.to_string(),
        }
    }

    /// Build a [`Error::Merge`] from a combiner's failure.
    pub fn merge(err: impl std::fmt::Display) -> Self {
        Self::Merge {
            message: err.to_string(),
        }
    }

    pub(crate) const fn unbounded(op: &'static str) -> Self {
        Self::Unbounded { op }
    }
}
