//! The lazy pipeline handle and its terminal operations.
//!
//! A [`Sequence<T>`] wraps a source plus an ordered chain of lazy stages.
//! Composing stages never pulls an element; the first pull happens when a
//! terminal operation runs. Every terminal consumes the handle, so a
//! pipeline executes exactly once; restarting means rebuilding from the
//! origin data.

use crate::collector::Collector;
use crate::collectors::{Counting, Reduce, Reducing};
use crate::error::Result;
use crate::runner::{ExecMode, Plan, Runner};
use crate::source::Source;
use crate::stage::{
    DistinctStage, DynStage, FilterMapStage, FilterStage, FlatMapStage, InspectStage, LimitStage,
    MapStage, SkipStage, SortedStage, TryFilterStage, TryFlatMapStage, TryMapStage,
};
use std::cmp::Ordering;
use std::fmt::Display;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

#[cfg(feature = "metrics")]
use crate::metrics::MetricsCollector;

/// Bound required of pipeline element types.
///
/// Elements move between worker threads in parallel mode and are cloned when
/// a finite source is segmented, hence `Send + Sync + Clone`.
pub trait Element: 'static + Send + Sync + Clone {}
impl<T> Element for T where T: 'static + Send + Sync + Clone {}

/// A lazy, single-use processing pipeline over elements of type `T`.
///
/// ```
/// use rill::from_vec;
/// use rill::collectors::ToList;
///
/// let out = from_vec(vec![1, 2, 2, 3, 3, 3, 4])
///     .distinct()
///     .map(|n| n * 10)
///     .collect(ToList::new())
///     .unwrap();
/// assert_eq!(out, vec![10, 20, 30, 40]);
/// ```
pub struct Sequence<T> {
    source: crate::source::SourceNode,
    stages: Vec<Arc<dyn DynStage>>,
    mode: ExecMode,
    #[cfg(feature = "metrics")]
    metrics: Option<MetricsCollector>,
    _t: PhantomData<T>,
}

/// Pipeline over an owned vector.
pub fn from_vec<T: Element>(items: Vec<T>) -> Sequence<T> {
    Sequence::from_source(Source::from_vec(items))
}

/// Pipeline over any finite iterable, materialized up front.
pub fn from_iter<T: Element, I: IntoIterator<Item = T>>(items: I) -> Sequence<T> {
    Sequence::from_source(Source::from_iter(items))
}

/// Unbounded pipeline calling `supply` once per pulled element.
pub fn generate<T, F>(supply: F) -> Sequence<T>
where
    T: Element,
    F: FnMut() -> T + Send + 'static,
{
    Sequence::from_source(Source::generate(supply))
}

/// Unbounded pipeline emitting `seed, step(&seed), step(&step(&seed)), ...`.
pub fn iterate<T, F>(seed: T, step: F) -> Sequence<T>
where
    T: Element,
    F: FnMut(&T) -> T + Send + 'static,
{
    Sequence::from_source(Source::iterate(seed, step))
}

/// Generator pipeline ending when `next` returns `None`; treated as
/// unbounded by validation since the engine cannot prove it finite.
pub fn from_fn<T, F>(next: F) -> Sequence<T>
where
    T: Element,
    F: FnMut() -> Option<T> + Send + 'static,
{
    Sequence::from_source(Source::from_fn(next))
}

impl<T: Element> Sequence<T> {
    /// Pipeline over an explicit [`Source`].
    pub fn from_source(source: Source<T>) -> Self {
        Self {
            source: source.into_node(),
            stages: Vec::new(),
            mode: ExecMode::default(),
            #[cfg(feature = "metrics")]
            metrics: None,
            _t: PhantomData,
        }
    }

    fn push_stage<U: Element>(mut self, stage: Arc<dyn DynStage>) -> Sequence<U> {
        self.stages.push(stage);
        Sequence {
            source: self.source,
            stages: self.stages,
            mode: self.mode,
            #[cfg(feature = "metrics")]
            metrics: self.metrics,
            _t: PhantomData,
        }
    }

    /* ---------------- intermediate stages ---------------- */

    /// Keep elements satisfying `pred`, preserving order.
    pub fn filter<P>(self, pred: P) -> Sequence<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.push_stage(Arc::new(FilterStage::new(pred)))
    }

    /// Transform every element.
    pub fn map<O, F>(self, f: F) -> Sequence<O>
    where
        O: Element,
        F: Fn(T) -> O + Send + Sync + 'static,
    {
        self.push_stage(Arc::new(MapStage::new(f)))
    }

    /// Expand every element into zero or more output elements, emitted in
    /// input order with each sub-sequence exhausted before the next pull.
    pub fn flat_map<O, I, F>(self, f: F) -> Sequence<O>
    where
        O: Element,
        I: IntoIterator<Item = O>,
        F: Fn(T) -> I + Send + Sync + 'static,
    {
        self.push_stage(Arc::new(FlatMapStage::new(move |item| {
            f(item).into_iter().collect::<Vec<O>>()
        })))
    }

    /// Transform and filter in one step: `None` drops the element.
    pub fn filter_map<O, F>(self, f: F) -> Sequence<O>
    where
        O: Element,
        F: Fn(T) -> Option<O> + Send + Sync + 'static,
    {
        self.push_stage(Arc::new(FilterMapStage::new(f)))
    }

    /// Fallible `map`: an `Err` aborts the pipeline, surfacing the failure
    /// with the element's position to the terminal's caller.
    pub fn try_map<O, E, F>(self, f: F) -> Sequence<O>
    where
        O: Element,
        E: Display,
        F: Fn(T) -> std::result::Result<O, E> + Send + Sync + 'static,
    {
        self.push_stage(Arc::new(TryMapStage::new(move |item| {
            f(item).map_err(|e| e.to_string())
        })))
    }

    /// Fallible `filter`.
    pub fn try_filter<E, P>(self, pred: P) -> Sequence<T>
    where
        E: Display,
        P: Fn(&T) -> std::result::Result<bool, E> + Send + Sync + 'static,
    {
        self.push_stage(Arc::new(TryFilterStage::new(move |item: &T| {
            pred(item).map_err(|e| e.to_string())
        })))
    }

    /// Fallible `flat_map`.
    pub fn try_flat_map<O, E, F>(self, f: F) -> Sequence<O>
    where
        O: Element,
        E: Display,
        F: Fn(T) -> std::result::Result<Vec<O>, E> + Send + Sync + 'static,
    {
        self.push_stage(Arc::new(TryFlatMapStage::new(move |item| {
            f(item).map_err(|e| e.to_string())
        })))
    }

    /// Observe every element without changing it.
    pub fn inspect<F>(self, f: F) -> Sequence<T>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.push_stage(Arc::new(InspectStage::new(f)))
    }

    /// Drop repeated elements, keeping the first occurrence in order.
    ///
    /// Buffers the set of already-seen elements; rejected on an unbounded
    /// chain without a preceding [`limit`](Sequence::limit).
    pub fn distinct(self) -> Sequence<T>
    where
        T: Eq + Hash,
    {
        self.distinct_by(|item: &T| item.clone())
    }

    /// `distinct` under an explicit definition of equality: two elements are
    /// duplicates when `key` maps them to equal values.
    pub fn distinct_by<K, F>(self, key: F) -> Sequence<T>
    where
        K: Element + Eq + Hash,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.push_stage(Arc::new(DistinctStage::new(key)))
    }

    /// Sort by the natural order. Stable.
    ///
    /// A non-lazy barrier: the whole upstream is materialized before the
    /// first element comes out, so an unbounded chain without a preceding
    /// [`limit`](Sequence::limit) is rejected.
    pub fn sorted(self) -> Sequence<T>
    where
        T: Ord,
    {
        self.sorted_by(T::cmp)
    }

    /// Sort with a comparator. Stable.
    pub fn sorted_by<F>(self, cmp: F) -> Sequence<T>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.push_stage(Arc::new(SortedStage::new(cmp)))
    }

    /// Sort by a key projection. Stable.
    pub fn sorted_by_key<K, F>(self, key: F) -> Sequence<T>
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        self.sorted_by(move |a, b| key(a).cmp(&key(b)))
    }

    /// Pass through at most `n` elements, then stop pulling upstream.
    ///
    /// This is the short-circuit that makes eager operations legal
    /// downstream of an unbounded source: exactly `n` upstream pulls occur.
    pub fn limit(self, n: usize) -> Sequence<T> {
        self.push_stage(Arc::new(LimitStage::<T>::new(n)))
    }

    /// Drop the first `n` elements.
    pub fn skip(self, n: usize) -> Sequence<T> {
        self.push_stage(Arc::new(SkipStage::<T>::new(n)))
    }

    /* ---------------- execution configuration ---------------- */

    /// Execute terminal reductions across a rayon worker pool.
    ///
    /// Same terminal API, different internal path: the input is segmented
    /// and each segment reduced independently before a deterministic merge.
    /// Short-circuiting terminals (`find_first`, the match family) and the
    /// inherently sequential ones (`fold`, `for_each`) still run on the
    /// calling thread.
    #[must_use]
    pub fn parallel(self) -> Self {
        self.parallel_with(None, None)
    }

    /// [`parallel`](Sequence::parallel) with explicit worker-thread and
    /// segment-count bounds.
    #[must_use]
    pub fn parallel_with(mut self, threads: Option<usize>, segments: Option<usize>) -> Self {
        self.mode = ExecMode::Parallel { threads, segments };
        self
    }

    /// Execute on the calling thread (the default).
    #[must_use]
    pub fn sequential(mut self) -> Self {
        self.mode = ExecMode::Sequential;
        self
    }

    /// Record execution metrics (segment, barrier, and merge counts plus
    /// wall-clock timing) for collector-driven terminals into `metrics`.
    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = Some(metrics);
        self
    }

    fn into_plan(self) -> (Plan, Runner) {
        let runner = Runner {
            mode: self.mode,
            ..Runner::default()
        };
        let plan = Plan {
            source: self.source,
            stages: self.stages,
            #[cfg(feature = "metrics")]
            metrics: self.metrics,
        };
        (plan, runner)
    }

    /* ---------------- terminal operations ---------------- */

    /// Drive the pipeline into `collector` and return its finished result.
    pub fn collect<C: Collector<T>>(self, collector: C) -> Result<C::Out> {
        let (plan, runner) = self.into_plan();
        runner.run_collect::<T, C>(plan, &collector, "collect")
    }

    /// Reduce with an identity and an associative operation.
    ///
    /// `op` doubles as the parallel combiner, so it must be associative and
    /// `identity` a true identity for it. For a non-associative or
    /// cross-type reduction use [`fold`](Sequence::fold).
    pub fn reduce<F>(self, identity: T, op: F) -> Result<T>
    where
        F: Fn(T, T) -> T + Send + Sync + 'static,
    {
        let (plan, runner) = self.into_plan();
        runner.run_collect(plan, &Reduce::new(identity, op), "reduce")
    }

    /// Fold into an arbitrary accumulator type.
    ///
    /// Accepts non-associative functions and therefore always runs
    /// sequentially, even on a pipeline configured parallel.
    pub fn fold<A, F>(self, init: A, mut f: F) -> Result<A>
    where
        F: FnMut(A, T) -> A,
    {
        let (plan, runner) = self.into_plan();
        let stream = runner.open_pull::<T>(plan, "fold", true)?;
        let mut acc = init;
        for item in stream {
            acc = f(acc, item?);
        }
        Ok(acc)
    }

    /// Invoke `f` on every element, in order, on the calling thread.
    pub fn for_each<F>(self, mut f: F) -> Result<()>
    where
        F: FnMut(T),
    {
        let (plan, runner) = self.into_plan();
        let stream = runner.open_pull::<T>(plan, "for_each", true)?;
        for item in stream {
            f(item?);
        }
        Ok(())
    }

    /// Count the elements reaching the end of the chain.
    pub fn count(self) -> Result<u64> {
        let (plan, runner) = self.into_plan();
        runner.run_collect::<T, _>(plan, &Counting::new(), "count")
    }

    /// First element, if any. Short-circuits after one pull.
    pub fn find_first(self) -> Result<Option<T>> {
        let (plan, runner) = self.into_plan();
        let mut stream = runner.open_pull::<T>(plan, "find_first", false)?;
        match stream.next() {
            None => Ok(None),
            Some(item) => Ok(Some(item?)),
        }
    }

    /// Whether any element satisfies `pred`. Short-circuits on the first hit.
    pub fn any_match<P>(self, mut pred: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        let (plan, runner) = self.into_plan();
        let stream = runner.open_pull::<T>(plan, "any_match", false)?;
        for item in stream {
            if pred(&item?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether every element satisfies `pred`. Short-circuits on the first
    /// miss.
    pub fn all_match<P>(self, mut pred: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        let (plan, runner) = self.into_plan();
        let stream = runner.open_pull::<T>(plan, "all_match", false)?;
        for item in stream {
            if !pred(&item?) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Whether no element satisfies `pred`.
    pub fn none_match<P>(self, pred: P) -> Result<bool>
    where
        P: FnMut(&T) -> bool,
    {
        self.any_match(pred).map(|hit| !hit)
    }

    /// Smallest element by natural order; `None` when empty.
    pub fn min(self) -> Result<Option<T>>
    where
        T: Ord,
    {
        self.min_by(T::cmp)
    }

    /// Smallest element by `cmp`; the first minimal element wins ties.
    pub fn min_by<F>(self, cmp: F) -> Result<Option<T>>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        let (plan, runner) = self.into_plan();
        let pick = Reducing::new(move |a, b| {
            if cmp(&b, &a) == Ordering::Less { b } else { a }
        });
        runner.run_collect(plan, &pick, "min")
    }

    /// Largest element by natural order; `None` when empty.
    pub fn max(self) -> Result<Option<T>>
    where
        T: Ord,
    {
        self.max_by(T::cmp)
    }

    /// Largest element by `cmp`; the first maximal element wins ties.
    pub fn max_by<F>(self, cmp: F) -> Result<Option<T>>
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        let (plan, runner) = self.into_plan();
        let pick = Reducing::new(move |a, b| {
            if cmp(&b, &a) == Ordering::Greater { b } else { a }
        });
        runner.run_collect(plan, &pick, "max")
    }
}
