//! The collector protocol: supplier, accumulator, combiner, finisher.
//!
//! A [`Collector`] describes a reduction as four operations over an
//! intermediate accumulator type `Acc`, finished into a result type `Out`.
//! The engine never inspects `Acc`; it only threads it through these four
//! calls.
//!
//! # Parallel safety
//!
//! In parallel mode every segment accumulates into its own `Acc`, and the
//! partial accumulators are folded pairwise through [`merge`]. For the
//! parallel result to equal the sequential one, `merge` must behave as if
//! the two partitions' elements had been accumulated sequentially in
//! concatenation order; that is the associativity contract all built-in collectors
//! satisfy. Using a collector with a non-associative combiner in parallel
//! mode is a documented misuse: the merge order is deterministic per run but
//! otherwise unspecified.
//!
//! `merge` consumes both operands and returns a new owned accumulator; it
//! must not retain references into either input. This keeps segment state
//! exclusively owned until the moment it is handed over.
//!
//! [`merge`]: Collector::merge

use crate::error::Result;
use std::marker::PhantomData;

/// A reduction described by four functions.
pub trait Collector<T>: Send + Sync {
    /// Intermediate accumulator state, exclusively owned by one reduction
    /// (or one segment) until merged.
    type Acc: Send;
    /// Final result produced by [`finish`](Collector::finish).
    type Out;

    /// Produce a fresh, empty accumulator.
    fn create(&self) -> Self::Acc;

    /// Fold one element into the accumulator.
    fn add_input(&self, acc: &mut Self::Acc, item: T);

    /// Combine two partial accumulators into one, consuming both.
    ///
    /// Fallible so custom collectors can surface
    /// [`Error::Merge`](crate::Error::Merge); built-ins never fail here.
    fn merge(&self, a: Self::Acc, b: Self::Acc) -> Result<Self::Acc>;

    /// Turn the final accumulator into the result value.
    fn finish(&self, acc: Self::Acc) -> Self::Out;
}

/// Build a collector from four closures.
///
/// The first-class counterpart of implementing [`Collector`] by hand:
///
/// ```
/// use rill::{collector, from_vec};
///
/// // Total character count across all words.
/// let chars = collector::of(
///     || 0usize,
///     |acc: &mut usize, word: String| *acc += word.len(),
///     |a, b| a + b,
///     |acc| acc,
/// );
///
/// let n = from_vec(vec!["Hello".to_string(), "World".to_string()])
///     .collect(chars)
///     .unwrap();
/// assert_eq!(n, 10);
/// ```
pub fn of<T, A, R, Sup, Acc, Comb, Fin>(
    supplier: Sup,
    accumulator: Acc,
    combiner: Comb,
    finisher: Fin,
) -> FnCollector<T, A, R, Sup, Acc, Comb, Fin>
where
    A: Send,
    Sup: Fn() -> A + Send + Sync,
    Acc: Fn(&mut A, T) + Send + Sync,
    Comb: Fn(A, A) -> A + Send + Sync,
    Fin: Fn(A) -> R + Send + Sync,
{
    FnCollector {
        supplier,
        accumulator,
        combiner,
        finisher,
        _marker: PhantomData,
    }
}

/// A collector assembled from closures by [`of`].
pub struct FnCollector<T, A, R, Sup, Acc, Comb, Fin> {
    supplier: Sup,
    accumulator: Acc,
    combiner: Comb,
    finisher: Fin,
    _marker: PhantomData<fn(T) -> (A, R)>,
}

impl<T, A, R, Sup, Acc, Comb, Fin> Collector<T> for FnCollector<T, A, R, Sup, Acc, Comb, Fin>
where
    A: Send,
    Sup: Fn() -> A + Send + Sync,
    Acc: Fn(&mut A, T) + Send + Sync,
    Comb: Fn(A, A) -> A + Send + Sync,
    Fin: Fn(A) -> R + Send + Sync,
{
    type Acc = A;
    type Out = R;

    fn create(&self) -> A {
        (self.supplier)()
    }

    fn add_input(&self, acc: &mut A, item: T) {
        (self.accumulator)(acc, item);
    }

    fn merge(&self, a: A, b: A) -> Result<A> {
        Ok((self.combiner)(a, b))
    }

    fn finish(&self, acc: A) -> R {
        (self.finisher)(acc)
    }
}
