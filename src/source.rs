//! Element sources: finite vectors and generator-backed cursors.
//!
//! A [`Source`] is the origin of a pipeline. Finite sources are materialized
//! vectors and support splitting into ordered segments for parallel runs.
//! Generator sources wrap an owned mutable cursor with a
//! `next() -> Option<T>` pull and are treated as unbounded: the runner
//! rejects eager operations on them unless a `limit` bounds the chain first.
//!
//! Sources are single-use. Opening one consumes it; restarting a pipeline
//! means building a new source from the origin data.

use crate::runner::split_vec;
use crate::sequence::Element;
use crate::type_token::{AnyStream, erase, stream_of};

/// A producer of elements feeding a pipeline.
pub struct Source<T> {
    kind: SourceKind<T>,
}

enum SourceKind<T> {
    Items(Vec<T>),
    Cursor(Box<dyn Iterator<Item = T> + Send>),
}

impl<T: Element> Source<T> {
    /// A finite source over an owned vector.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            kind: SourceKind::Items(items),
        }
    }

    /// A finite source materialized from any iterable.
    pub fn from_iter<I: IntoIterator<Item = T>>(items: I) -> Self {
        Self::from_vec(items.into_iter().collect())
    }

    /// An unbounded source calling `supply` for every element.
    pub fn generate<F>(supply: F) -> Self
    where
        F: FnMut() -> T + Send + 'static,
    {
        Self {
            kind: SourceKind::Cursor(Box::new(GenerateCursor { supply })),
        }
    }

    /// An unbounded source emitting `seed, step(&seed), step(&step(&seed)), ...`.
    pub fn iterate<F>(seed: T, step: F) -> Self
    where
        F: FnMut(&T) -> T + Send + 'static,
    {
        Self {
            kind: SourceKind::Cursor(Box::new(IterateCursor {
                state: Some(seed),
                step,
            })),
        }
    }

    /// A generator source that ends when `next` returns `None`.
    ///
    /// The engine cannot prove such a source finite, so it is treated as
    /// unbounded for validation purposes.
    pub fn from_fn<F>(next: F) -> Self
    where
        F: FnMut() -> Option<T> + Send + 'static,
    {
        Self {
            kind: SourceKind::Cursor(Box::new(std::iter::from_fn(next))),
        }
    }

    pub(crate) fn into_node(self) -> SourceNode {
        match self.kind {
            SourceKind::Items(items) => SourceNode {
                finite: true,
                len: Some(items.len()),
                imp: NodeImpl::Finite(Box::new(move |n| {
                    split_vec(items, n).into_iter().map(stream_of).collect()
                })),
            },
            SourceKind::Cursor(cursor) => SourceNode {
                finite: false,
                len: None,
                imp: NodeImpl::Unbounded(Box::new(move || {
                    erase::<T>(Box::new(cursor.map(Ok)))
                })),
            },
        }
    }
}

/// Cursor for [`Source::generate`]: a supplier invoked once per pull.
struct GenerateCursor<F> {
    supply: F,
}

impl<T, F: FnMut() -> T> Iterator for GenerateCursor<F> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        Some((self.supply)())
    }
}

/// Cursor for [`Source::iterate`]: owns the current value and advances it
/// with the step function on every pull.
struct IterateCursor<T, F> {
    state: Option<T>,
    step: F,
}

impl<T, F: FnMut(&T) -> T> Iterator for IterateCursor<T, F> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let current = self.state.take()?;
        self.state = Some((self.step)(&current));
        Some(current)
    }
}

/// Type-erased source as stored inside a pipeline handle.
pub(crate) struct SourceNode {
    pub(crate) finite: bool,
    pub(crate) len: Option<usize>,
    imp: NodeImpl,
}

enum NodeImpl {
    /// Split the materialized payload into at most `n` ordered chunks.
    Finite(Box<dyn FnOnce(usize) -> Vec<AnyStream> + Send>),
    /// Open the generator as a single lazy stream.
    Unbounded(Box<dyn FnOnce() -> AnyStream + Send>),
}

impl SourceNode {
    /// Open the source as one stream, consuming it.
    pub(crate) fn open(self) -> AnyStream {
        match self.imp {
            NodeImpl::Finite(split) => split(1)
                .into_iter()
                .next()
                .expect("split yields at least one chunk"),
            NodeImpl::Unbounded(open) => open(),
        }
    }

    /// Split a finite source into at most `n` ordered segments.
    pub(crate) fn split(self, n: usize) -> Option<Vec<AnyStream>> {
        match self.imp {
            NodeImpl::Finite(split) => Some(split(n)),
            NodeImpl::Unbounded(_) => None,
        }
    }
}
