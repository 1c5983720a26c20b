//! Lazy transformation stages.
//!
//! Stages are a small closed set of transformations behind the [`DynStage`]
//! trait object: filter, map, flat_map, filter_map, their fallible `try_`
//! variants, distinct, sorted, limit, skip, and inspect. Each stage struct
//! owns its function values behind `Arc`, so a composed chain can be applied
//! to any number of independent segments.
//!
//! `apply` is lazy: it wraps the incoming stream in an adapter and pulls
//! nothing. Stages that need the whole input (`distinct`, `sorted`) or a
//! global element count (`limit`, `skip`) additionally implement the barrier
//! hooks the parallel runner uses to drain, concatenate, transform, and
//! re-split segments.

use crate::error::{Error, Result};
use crate::runner::{Cancellation, split_vec};
use crate::sequence::Element;
use crate::type_token::{AnyStream, PullStream, downcast_stream, erase, stream_of};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::hash::Hash;
use std::marker::PhantomData;
use std::sync::Arc;

/// The closed set of stage kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StageKind {
    Filter,
    Map,
    FlatMap,
    FilterMap,
    Inspect,
    Distinct,
    Sorted,
    Limit,
    Skip,
}

/// A type-erased, shareable pipeline stage.
pub(crate) trait DynStage: Send + Sync {
    fn kind(&self) -> StageKind;

    /// Stage name as reported in errors.
    fn name(&self) -> &'static str {
        match self.kind() {
            StageKind::Filter => "filter",
            StageKind::Map => "map",
            StageKind::FlatMap => "flat_map",
            StageKind::FilterMap => "filter_map",
            StageKind::Inspect => "inspect",
            StageKind::Distinct => "distinct",
            StageKind::Sorted => "sorted",
            StageKind::Limit => "limit",
            StageKind::Skip => "skip",
        }
    }

    /// Lazily wrap a type-erased input stream. Pulls nothing.
    fn apply(&self, input: AnyStream) -> AnyStream;

    /// Whether the stage can run on each segment independently.
    fn segment_local(&self) -> bool {
        matches!(
            self.kind(),
            StageKind::Filter
                | StageKind::Map
                | StageKind::FlatMap
                | StageKind::FilterMap
                | StageKind::Inspect
        )
    }

    /// Boundedness of the output given the boundedness of the input.
    fn output_bounded(&self, input_bounded: bool) -> bool {
        input_bounded || self.kind() == StageKind::Limit
    }

    /// Whether the stage must see a bounded input.
    fn requires_bounded(&self) -> bool {
        matches!(self.kind(), StageKind::Distinct | StageKind::Sorted)
    }

    /// Drain one segment's pending lazy work ahead of a barrier.
    ///
    /// Returns `None` after recording an error on `cancel`, or when another
    /// segment already cancelled the run.
    fn drain_input(&self, _segment: AnyStream, _cancel: &Cancellation) -> Option<AnyStream> {
        unreachable!("{} is not a barrier stage", self.name())
    }

    /// Barrier path: concatenate drained segments in order, apply this stage
    /// once, and split the materialized output into at most `n` chunks.
    fn apply_global(&self, _segments: Vec<AnyStream>, _n: usize) -> Result<Vec<AnyStream>> {
        unreachable!("{} is not a barrier stage", self.name())
    }

    /// Materialize the stage's output stream and split it into chunks.
    fn split_output(&self, _output: AnyStream, _n: usize) -> Result<Vec<AnyStream>> {
        unreachable!("{} is not a barrier stage", self.name())
    }
}

/* ---------------- barrier helpers ---------------- */

fn drain_as<T: Element>(segment: AnyStream, cancel: &Cancellation) -> Option<AnyStream> {
    let iter = downcast_stream::<T>(segment, "barrier input");
    let mut out = Vec::new();
    for item in iter {
        if cancel.is_cancelled() {
            return None;
        }
        match item {
            Ok(v) => out.push(v),
            Err(e) => {
                cancel.record(e);
                return None;
            }
        }
    }
    Some(stream_of(out))
}

fn concat_as<T: Element>(segments: Vec<AnyStream>) -> AnyStream {
    erase::<T>(Box::new(
        segments
            .into_iter()
            .flat_map(|s| downcast_stream::<T>(s, "barrier concat")),
    ))
}

fn split_as<T: Element>(output: AnyStream, n: usize) -> Result<Vec<AnyStream>> {
    let mut items = Vec::new();
    for item in downcast_stream::<T>(output, "barrier split") {
        items.push(item?);
    }
    Ok(split_vec(items, n).into_iter().map(stream_of).collect())
}

/* ---------------- segment-local stages ---------------- */

pub(crate) struct FilterStage<T> {
    pred: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> FilterStage<T> {
    pub(crate) fn new(pred: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self {
            pred: Arc::new(pred),
        }
    }
}

impl<T: Element> DynStage for FilterStage<T> {
    fn kind(&self) -> StageKind {
        StageKind::Filter
    }

    fn apply(&self, input: AnyStream) -> AnyStream {
        let inner = downcast_stream::<T>(input, "filter input");
        let pred = Arc::clone(&self.pred);
        erase::<T>(Box::new(FilterIter { inner, pred }))
    }
}

struct FilterIter<T> {
    inner: PullStream<T>,
    pred: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Iterator for FilterIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Err(e) => return Some(Err(e)),
                Ok(v) if (self.pred)(&v) => return Some(Ok(v)),
                Ok(_) => {}
            }
        }
    }
}

pub(crate) struct MapStage<I, O> {
    f: Arc<dyn Fn(I) -> O + Send + Sync>,
}

impl<I, O> MapStage<I, O> {
    pub(crate) fn new(f: impl Fn(I) -> O + Send + Sync + 'static) -> Self {
        Self { f: Arc::new(f) }
    }
}

impl<I: Element, O: Element> DynStage for MapStage<I, O> {
    fn kind(&self) -> StageKind {
        StageKind::Map
    }

    fn apply(&self, input: AnyStream) -> AnyStream {
        let inner = downcast_stream::<I>(input, "map input");
        let f = Arc::clone(&self.f);
        erase::<O>(Box::new(inner.map(move |item| item.map(|v| f(v)))))
    }
}

pub(crate) struct FlatMapStage<I, O> {
    f: Arc<dyn Fn(I) -> Vec<O> + Send + Sync>,
}

impl<I, O> FlatMapStage<I, O> {
    pub(crate) fn new(f: impl Fn(I) -> Vec<O> + Send + Sync + 'static) -> Self {
        Self { f: Arc::new(f) }
    }
}

impl<I: Element, O: Element> DynStage for FlatMapStage<I, O> {
    fn kind(&self) -> StageKind {
        StageKind::FlatMap
    }

    fn apply(&self, input: AnyStream) -> AnyStream {
        let inner = downcast_stream::<I>(input, "flat_map input");
        let f = Arc::clone(&self.f);
        erase::<O>(Box::new(FlatMapIter {
            inner,
            f,
            front: Vec::new().into_iter(),
        }))
    }
}

struct FlatMapIter<I, O> {
    inner: PullStream<I>,
    f: Arc<dyn Fn(I) -> Vec<O> + Send + Sync>,
    front: std::vec::IntoIter<O>,
}

impl<I, O> Iterator for FlatMapIter<I, O> {
    type Item = Result<O>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Exhaust the current sub-sequence before advancing upstream.
            if let Some(v) = self.front.next() {
                return Some(Ok(v));
            }
            match self.inner.next()? {
                Err(e) => return Some(Err(e)),
                Ok(v) => self.front = (self.f)(v).into_iter(),
            }
        }
    }
}

pub(crate) struct FilterMapStage<I, O> {
    f: Arc<dyn Fn(I) -> Option<O> + Send + Sync>,
}

impl<I, O> FilterMapStage<I, O> {
    pub(crate) fn new(f: impl Fn(I) -> Option<O> + Send + Sync + 'static) -> Self {
        Self { f: Arc::new(f) }
    }
}

impl<I: Element, O: Element> DynStage for FilterMapStage<I, O> {
    fn kind(&self) -> StageKind {
        StageKind::FilterMap
    }

    fn apply(&self, input: AnyStream) -> AnyStream {
        let inner = downcast_stream::<I>(input, "filter_map input");
        let f = Arc::clone(&self.f);
        erase::<O>(Box::new(FilterMapIter { inner, f }))
    }
}

struct FilterMapIter<I, O> {
    inner: PullStream<I>,
    f: Arc<dyn Fn(I) -> Option<O> + Send + Sync>,
}

impl<I, O> Iterator for FilterMapIter<I, O> {
    type Item = Result<O>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Err(e) => return Some(Err(e)),
                Ok(v) => {
                    if let Some(out) = (self.f)(v) {
                        return Some(Ok(out));
                    }
                }
            }
        }
    }
}

pub(crate) struct InspectStage<T> {
    f: Arc<dyn Fn(&T) + Send + Sync>,
}

impl<T> InspectStage<T> {
    pub(crate) fn new(f: impl Fn(&T) + Send + Sync + 'static) -> Self {
        Self { f: Arc::new(f) }
    }
}

impl<T: Element> DynStage for InspectStage<T> {
    fn kind(&self) -> StageKind {
        StageKind::Inspect
    }

    fn apply(&self, input: AnyStream) -> AnyStream {
        let inner = downcast_stream::<T>(input, "inspect input");
        let f = Arc::clone(&self.f);
        erase::<T>(Box::new(inner.map(move |item| {
            if let Ok(v) = &item {
                f(v);
            }
            item
        })))
    }
}

/* ---------------- fallible segment-local stages ---------------- */

pub(crate) struct TryMapStage<I, O> {
    f: Arc<dyn Fn(I) -> std::result::Result<O, String> + Send + Sync>,
}

impl<I, O> TryMapStage<I, O> {
    pub(crate) fn new(
        f: impl Fn(I) -> std::result::Result<O, String> + Send + Sync + 'static,
    ) -> Self {
        Self { f: Arc::new(f) }
    }
}

impl<I: Element, O: Element> DynStage for TryMapStage<I, O> {
    fn kind(&self) -> StageKind {
        StageKind::Map
    }

    fn apply(&self, input: AnyStream) -> AnyStream {
        let inner = downcast_stream::<I>(input, "map input");
        let f = Arc::clone(&self.f);
        erase::<O>(Box::new(TryMapIter { inner, f, index: 0 }))
    }
}

struct TryMapIter<I, O> {
    inner: PullStream<I>,
    f: Arc<dyn Fn(I) -> std::result::Result<O, String> + Send + Sync>,
    index: u64,
}

impl<I, O> Iterator for TryMapIter<I, O> {
    type Item = Result<O>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Err(e) => Some(Err(e)),
            Ok(v) => {
                let index = self.index;
                self.index += 1;
                Some((self.f)(v).map_err(|msg| Error::stage("map", index, msg)))
            }
        }
    }
}

pub(crate) struct TryFilterStage<T> {
    pred: Arc<dyn Fn(&T) -> std::result::Result<bool, String> + Send + Sync>,
}

impl<T> TryFilterStage<T> {
    pub(crate) fn new(
        pred: impl Fn(&T) -> std::result::Result<bool, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            pred: Arc::new(pred),
        }
    }
}

impl<T: Element> DynStage for TryFilterStage<T> {
    fn kind(&self) -> StageKind {
        StageKind::Filter
    }

    fn apply(&self, input: AnyStream) -> AnyStream {
        let inner = downcast_stream::<T>(input, "filter input");
        let pred = Arc::clone(&self.pred);
        erase::<T>(Box::new(TryFilterIter {
            inner,
            pred,
            index: 0,
        }))
    }
}

struct TryFilterIter<T> {
    inner: PullStream<T>,
    pred: Arc<dyn Fn(&T) -> std::result::Result<bool, String> + Send + Sync>,
    index: u64,
}

impl<T> Iterator for TryFilterIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Err(e) => return Some(Err(e)),
                Ok(v) => {
                    let index = self.index;
                    self.index += 1;
                    match (self.pred)(&v) {
                        Ok(true) => return Some(Ok(v)),
                        Ok(false) => {}
                        Err(msg) => return Some(Err(Error::stage("filter", index, msg))),
                    }
                }
            }
        }
    }
}

pub(crate) struct TryFlatMapStage<I, O> {
    f: Arc<dyn Fn(I) -> std::result::Result<Vec<O>, String> + Send + Sync>,
}

impl<I, O> TryFlatMapStage<I, O> {
    pub(crate) fn new(
        f: impl Fn(I) -> std::result::Result<Vec<O>, String> + Send + Sync + 'static,
    ) -> Self {
        Self { f: Arc::new(f) }
    }
}

impl<I: Element, O: Element> DynStage for TryFlatMapStage<I, O> {
    fn kind(&self) -> StageKind {
        StageKind::FlatMap
    }

    fn apply(&self, input: AnyStream) -> AnyStream {
        let inner = downcast_stream::<I>(input, "flat_map input");
        let f = Arc::clone(&self.f);
        erase::<O>(Box::new(TryFlatMapIter {
            inner,
            f,
            front: Vec::new().into_iter(),
            index: 0,
        }))
    }
}

struct TryFlatMapIter<I, O> {
    inner: PullStream<I>,
    f: Arc<dyn Fn(I) -> std::result::Result<Vec<O>, String> + Send + Sync>,
    front: std::vec::IntoIter<O>,
    index: u64,
}

impl<I, O> Iterator for TryFlatMapIter<I, O> {
    type Item = Result<O>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(v) = self.front.next() {
                return Some(Ok(v));
            }
            match self.inner.next()? {
                Err(e) => return Some(Err(e)),
                Ok(v) => {
                    let index = self.index;
                    self.index += 1;
                    match (self.f)(v) {
                        Ok(items) => self.front = items.into_iter(),
                        Err(msg) => return Some(Err(Error::stage("flat_map", index, msg))),
                    }
                }
            }
        }
    }
}

/* ---------------- barrier stages ---------------- */

pub(crate) struct DistinctStage<T, K> {
    key: Arc<dyn Fn(&T) -> K + Send + Sync>,
}

impl<T, K> DistinctStage<T, K> {
    pub(crate) fn new(key: impl Fn(&T) -> K + Send + Sync + 'static) -> Self {
        Self { key: Arc::new(key) }
    }
}

impl<T, K> DynStage for DistinctStage<T, K>
where
    T: Element,
    K: Element + Eq + Hash,
{
    fn kind(&self) -> StageKind {
        StageKind::Distinct
    }

    fn apply(&self, input: AnyStream) -> AnyStream {
        let inner = downcast_stream::<T>(input, "distinct input");
        let key = Arc::clone(&self.key);
        erase::<T>(Box::new(DistinctIter {
            inner,
            key,
            seen: HashSet::new(),
        }))
    }

    fn drain_input(&self, segment: AnyStream, cancel: &Cancellation) -> Option<AnyStream> {
        drain_as::<T>(segment, cancel)
    }

    fn apply_global(&self, segments: Vec<AnyStream>, n: usize) -> Result<Vec<AnyStream>> {
        self.split_output(self.apply(concat_as::<T>(segments)), n)
    }

    fn split_output(&self, output: AnyStream, n: usize) -> Result<Vec<AnyStream>> {
        split_as::<T>(output, n)
    }
}

struct DistinctIter<T, K> {
    inner: PullStream<T>,
    key: Arc<dyn Fn(&T) -> K + Send + Sync>,
    seen: HashSet<K>,
}

impl<T, K: Eq + Hash> Iterator for DistinctIter<T, K> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Err(e) => return Some(Err(e)),
                Ok(v) => {
                    if self.seen.insert((self.key)(&v)) {
                        return Some(Ok(v));
                    }
                }
            }
        }
    }
}

pub(crate) struct SortedStage<T> {
    cmp: Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>,
}

impl<T> SortedStage<T> {
    pub(crate) fn new(cmp: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        Self { cmp: Arc::new(cmp) }
    }
}

impl<T: Element> DynStage for SortedStage<T> {
    fn kind(&self) -> StageKind {
        StageKind::Sorted
    }

    fn apply(&self, input: AnyStream) -> AnyStream {
        let inner = downcast_stream::<T>(input, "sorted input");
        let cmp = Arc::clone(&self.cmp);
        erase::<T>(Box::new(SortedIter {
            cmp,
            upstream: Some(inner),
            drained: Vec::new().into_iter(),
            failed: false,
        }))
    }

    fn drain_input(&self, segment: AnyStream, cancel: &Cancellation) -> Option<AnyStream> {
        drain_as::<T>(segment, cancel)
    }

    fn apply_global(&self, segments: Vec<AnyStream>, n: usize) -> Result<Vec<AnyStream>> {
        self.split_output(self.apply(concat_as::<T>(segments)), n)
    }

    fn split_output(&self, output: AnyStream, n: usize) -> Result<Vec<AnyStream>> {
        split_as::<T>(output, n)
    }
}

/// The sort barrier: the whole upstream is materialized on the first pull.
struct SortedIter<T> {
    cmp: Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>,
    upstream: Option<PullStream<T>>,
    drained: std::vec::IntoIter<T>,
    failed: bool,
}

impl<T> Iterator for SortedIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if let Some(upstream) = self.upstream.take() {
            let mut buf = Vec::new();
            for item in upstream {
                match item {
                    Ok(v) => buf.push(v),
                    Err(e) => {
                        self.failed = true;
                        return Some(Err(e));
                    }
                }
            }
            // Stable sort: equal elements keep their source order.
            buf.sort_by(|a, b| (self.cmp)(a, b));
            self.drained = buf.into_iter();
        }
        self.drained.next().map(Ok)
    }
}

pub(crate) struct LimitStage<T> {
    n: usize,
    _t: PhantomData<fn(T)>,
}

impl<T> LimitStage<T> {
    pub(crate) fn new(n: usize) -> Self {
        Self { n, _t: PhantomData }
    }
}

impl<T: Element> DynStage for LimitStage<T> {
    fn kind(&self) -> StageKind {
        StageKind::Limit
    }

    fn apply(&self, input: AnyStream) -> AnyStream {
        let inner = downcast_stream::<T>(input, "limit input");
        erase::<T>(Box::new(LimitIter {
            inner,
            remaining: self.n,
        }))
    }

    fn drain_input(&self, segment: AnyStream, cancel: &Cancellation) -> Option<AnyStream> {
        drain_as::<T>(segment, cancel)
    }

    fn apply_global(&self, segments: Vec<AnyStream>, n: usize) -> Result<Vec<AnyStream>> {
        self.split_output(self.apply(concat_as::<T>(segments)), n)
    }

    fn split_output(&self, output: AnyStream, n: usize) -> Result<Vec<AnyStream>> {
        split_as::<T>(output, n)
    }
}

struct LimitIter<T> {
    inner: PullStream<T>,
    remaining: usize,
}

impl<T> Iterator for LimitIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        // Once satisfied, never pull upstream again.
        if self.remaining == 0 {
            return None;
        }
        let item = self.inner.next()?;
        self.remaining -= 1;
        Some(item)
    }
}

pub(crate) struct SkipStage<T> {
    n: usize,
    _t: PhantomData<fn(T)>,
}

impl<T> SkipStage<T> {
    pub(crate) fn new(n: usize) -> Self {
        Self { n, _t: PhantomData }
    }
}

impl<T: Element> DynStage for SkipStage<T> {
    fn kind(&self) -> StageKind {
        StageKind::Skip
    }

    fn apply(&self, input: AnyStream) -> AnyStream {
        let inner = downcast_stream::<T>(input, "skip input");
        erase::<T>(Box::new(SkipIter {
            inner,
            remaining: self.n,
        }))
    }

    fn drain_input(&self, segment: AnyStream, cancel: &Cancellation) -> Option<AnyStream> {
        drain_as::<T>(segment, cancel)
    }

    fn apply_global(&self, segments: Vec<AnyStream>, n: usize) -> Result<Vec<AnyStream>> {
        self.split_output(self.apply(concat_as::<T>(segments)), n)
    }

    fn split_output(&self, output: AnyStream, n: usize) -> Result<Vec<AnyStream>> {
        split_as::<T>(output, n)
    }
}

struct SkipIter<T> {
    inner: PullStream<T>,
    remaining: usize,
}

impl<T> Iterator for SkipIter<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            match self.inner.next()? {
                // An error inside the skipped prefix still aborts the run.
                Err(e) => return Some(Err(e)),
                Ok(_) => self.remaining -= 1,
            }
        }
        self.inner.next()
    }
}
