//! Type-erased element streams.
//!
//! The runner moves [`AnyStream`] values between stages; each stage
//! downcasts to the [`PullStream`] it expects, wraps it lazily, and
//! re-erases the result. A failed downcast is an engine invariant
//! violation, never a user error, so the helpers here panic with the
//! expected type name instead of propagating.

use crate::error::Error;
use std::any::{Any, type_name};

/// A type-erased lazy element stream carried between stages at runtime.
pub(crate) type AnyStream = Box<dyn Any + Send>;

/// The concrete form of a stream: a pull-based iterator of elements, each
/// possibly replaced by the error that aborted the pipeline.
pub(crate) type PullStream<T> = Box<dyn Iterator<Item = Result<T, Error>> + Send>;

/// Re-erase a concrete stream.
pub(crate) fn erase<T: 'static>(stream: PullStream<T>) -> AnyStream {
    Box::new(stream)
}

/// Wrap an already-materialized vector as a stream.
pub(crate) fn stream_of<T: Send + 'static>(items: Vec<T>) -> AnyStream {
    erase::<T>(Box::new(items.into_iter().map(Ok)))
}

/// Recover the concrete stream behind an [`AnyStream`].
///
/// Panics on a type mismatch: stage composition is statically typed, so the
/// erased stream reaching any given stage always has the expected element
/// type unless the engine itself miswired the chain.
pub(crate) fn downcast_stream<T: 'static>(stream: AnyStream, ctx: &'static str) -> PullStream<T> {
    match stream.downcast::<PullStream<T>>() {
        Ok(s) => *s,
        Err(_) => panic!("{ctx}: stream does not carry {}", type_name::<T>()),
    }
}
