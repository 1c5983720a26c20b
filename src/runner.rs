//! Execution engine: sequential and parallel drivers.
//!
//! Sequential runs build one lazy pull chain on the calling thread and drive
//! it from the terminal operation. Parallel runs split a finite source into
//! ordered segments, evaluate segment-local stages concurrently under rayon,
//! treat global stages (distinct, sorted, limit, skip) as barriers, and
//! finally accumulate one collector state per segment before merging them in
//! ascending segment order.
//!
//! Before any element is pulled, the plan is validated: stages that must see
//! a bounded input, and eager terminals, reject chains that are still
//! unbounded at their position.

use crate::collector::Collector;
use crate::error::{Error, Result};
use crate::sequence::Element;
use crate::source::SourceNode;
use crate::stage::{DynStage, StageKind};
use crate::type_token::{AnyStream, PullStream, downcast_stream};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[cfg(feature = "metrics")]
use crate::metrics::MetricsCollector;

/// How a terminal operation executes the chain.
#[derive(Clone, Copy, Debug, Default)]
pub enum ExecMode {
    /// Everything runs on the calling thread, fully lazily.
    #[default]
    Sequential,
    /// Segment the input and reduce across a rayon worker pool.
    Parallel {
        /// Worker threads for the global pool; `None` keeps rayon's default.
        threads: Option<usize>,
        /// Upper bound on input segments; `None` uses the runner default.
        segments: Option<usize>,
    },
}

/// Drives a composed plan to completion.
pub struct Runner {
    pub mode: ExecMode,
    pub default_segments: usize,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            mode: ExecMode::Sequential,
            // Segment count tracks available hardware concurrency.
            default_segments: num_cpus::get().max(1),
        }
    }
}

/// A pipeline ready to execute: source, stage chain, and observability hooks.
pub(crate) struct Plan {
    pub(crate) source: SourceNode,
    pub(crate) stages: Vec<Arc<dyn DynStage>>,
    #[cfg(feature = "metrics")]
    pub(crate) metrics: Option<MetricsCollector>,
}

/// Best-effort cross-segment cancellation.
///
/// The first segment to fail records its error and flips the flag; the other
/// segments notice the flag at their next element and abandon their partial
/// accumulators.
pub(crate) struct Cancellation {
    flag: AtomicBool,
    first: Mutex<Option<Error>>,
}

impl Cancellation {
    pub(crate) fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
            first: Mutex::new(None),
        }
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub(crate) fn record(&self, err: Error) {
        let mut slot = self.first.lock().unwrap();
        if slot.is_none() {
            *slot = Some(err);
        }
        self.flag.store(true, Ordering::Relaxed);
    }

    pub(crate) fn take(&self) -> Option<Error> {
        self.first.lock().unwrap().take()
    }
}

impl Runner {
    /// Validate the plan and open it as one lazy pull stream.
    ///
    /// `eager` marks terminals that must drain the whole chain (`collect`,
    /// `count`, `fold`, ...); short-circuiting terminals pass `false` and may
    /// run over unbounded chains.
    pub(crate) fn open_pull<T: Element>(
        &self,
        plan: Plan,
        terminal: &'static str,
        eager: bool,
    ) -> Result<PullStream<T>> {
        validate(&plan, terminal, eager)?;
        let Plan { source, stages, .. } = plan;
        let mut stream = source.open();
        for stage in &stages {
            stream = stage.apply(stream);
        }
        Ok(downcast_stream::<T>(stream, "terminal"))
    }

    /// Drive the chain into a collector, honoring the execution mode.
    pub(crate) fn run_collect<T, C>(
        &self,
        plan: Plan,
        collector: &C,
        terminal: &'static str,
    ) -> Result<C::Out>
    where
        T: Element,
        C: Collector<T>,
    {
        match self.mode {
            ExecMode::Sequential => self.collect_sequential(plan, collector, terminal),
            ExecMode::Parallel { threads, segments } => {
                self.collect_parallel(plan, collector, terminal, threads, segments)
            }
        }
    }

    fn collect_sequential<T, C>(
        &self,
        plan: Plan,
        collector: &C,
        terminal: &'static str,
    ) -> Result<C::Out>
    where
        T: Element,
        C: Collector<T>,
    {
        #[cfg(feature = "metrics")]
        let metrics = plan.metrics.clone();

        let stream = self.open_pull::<T>(plan, terminal, true)?;

        #[cfg(feature = "metrics")]
        if let Some(m) = &metrics {
            m.record_start();
            m.increment("segments", 1);
        }
        let mut acc = collector.create();
        for item in stream {
            collector.add_input(&mut acc, item?);
        }
        let out = collector.finish(acc);

        #[cfg(feature = "metrics")]
        if let Some(m) = &metrics {
            m.record_end();
        }
        Ok(out)
    }

    fn collect_parallel<T, C>(
        &self,
        plan: Plan,
        collector: &C,
        terminal: &'static str,
        threads: Option<usize>,
        segments: Option<usize>,
    ) -> Result<C::Out>
    where
        T: Element,
        C: Collector<T>,
    {
        validate(&plan, terminal, true)?;
        if let Some(t) = threads {
            // ok() to ignore "already built" on repeated calls in tests
            rayon::ThreadPoolBuilder::new()
                .num_threads(t)
                .build_global()
                .ok();
        }
        let want = segments.unwrap_or(self.default_segments).max(1);

        #[cfg(feature = "metrics")]
        let metrics = plan.metrics.clone();
        #[cfg(feature = "metrics")]
        if let Some(m) = &metrics {
            m.record_start();
        }

        let (mut parts, rest) = split_input(plan, want)?;

        #[cfg(feature = "metrics")]
        if let Some(m) = &metrics {
            m.increment("segments", parts.len() as u64);
        }

        let cancel = Cancellation::new();
        for stage in &rest {
            if stage.segment_local() {
                // Cheap: wraps each segment lazily, no elements move yet.
                parts = parts.into_iter().map(|s| stage.apply(s)).collect();
            } else {
                // Barrier: evaluate pending work per segment concurrently,
                // then apply the global stage once over the ordered whole.
                let drained: Vec<Option<AnyStream>> = parts
                    .into_par_iter()
                    .map(|s| stage.drain_input(s, &cancel))
                    .collect();
                if let Some(e) = cancel.take() {
                    return Err(e);
                }
                let segs: Vec<AnyStream> = drained
                    .into_iter()
                    .map(|s| s.expect("segment drained without error"))
                    .collect();
                parts = stage.apply_global(segs, want)?;

                #[cfg(feature = "metrics")]
                if let Some(m) = &metrics {
                    m.increment("barriers", 1);
                }
            }
        }

        let accs: Vec<Option<C::Acc>> = parts
            .into_par_iter()
            .map(|seg| accumulate_segment::<T, C>(collector, seg, &cancel))
            .collect();
        if let Some(e) = cancel.take() {
            return Err(e);
        }

        // Merge in ascending segment order: deterministic per run.
        let mut merged: Option<C::Acc> = None;
        #[cfg(feature = "metrics")]
        let mut merges = 0u64;
        for acc in accs {
            let acc = acc.expect("segment accumulated without error");
            merged = Some(match merged {
                None => acc,
                Some(prev) => {
                    #[cfg(feature = "metrics")]
                    {
                        merges += 1;
                    }
                    collector.merge(prev, acc)?
                }
            });
        }
        let out = collector.finish(merged.unwrap_or_else(|| collector.create()));

        #[cfg(feature = "metrics")]
        if let Some(m) = &metrics {
            m.increment("merges", merges);
            m.record_end();
        }
        Ok(out)
    }
}

/// Check boundedness requirements before pulling anything.
fn validate(plan: &Plan, terminal: &'static str, eager: bool) -> Result<()> {
    let mut bounded = plan.source.finite;
    for stage in &plan.stages {
        if stage.requires_bounded() && !bounded {
            return Err(Error::unbounded(stage.name()));
        }
        bounded = stage.output_bounded(bounded);
    }
    if eager && !bounded {
        return Err(Error::unbounded(terminal));
    }
    Ok(())
}

/// Turn the plan's source into ordered segments and return the stages that
/// still need to run on them.
///
/// A finite source splits directly. An unbounded source is accepted only
/// when the chain contains a `limit`: the prefix through the first `limit`
/// runs sequentially (and lazily, so only `limit` elements are pulled) and
/// the materialized prefix is split instead.
fn split_input(plan: Plan, want: usize) -> Result<(Vec<AnyStream>, Vec<Arc<dyn DynStage>>)> {
    let Plan { source, stages, .. } = plan;
    if source.finite {
        let len = source.len.unwrap_or(1).max(1);
        let n = want.min(len);
        let parts = source.split(n).expect("finite source splits");
        return Ok((parts, stages));
    }

    let Some(cut) = stages
        .iter()
        .position(|s| s.kind() == StageKind::Limit)
    else {
        return Err(Error::unbounded("parallel split"));
    };
    let mut stream = source.open();
    for stage in &stages[..=cut] {
        stream = stage.apply(stream);
    }
    let parts = stages[cut].split_output(stream, want)?;
    Ok((parts, stages[cut + 1..].to_vec()))
}

/// Fold one segment into its own accumulator.
///
/// Returns `None` after recording an error, or when another segment already
/// cancelled the run; the partial accumulator is discarded either way.
fn accumulate_segment<T, C>(collector: &C, segment: AnyStream, cancel: &Cancellation) -> Option<C::Acc>
where
    T: Element,
    C: Collector<T>,
{
    let stream = downcast_stream::<T>(segment, "segment terminal");
    let mut acc = collector.create();
    for item in stream {
        if cancel.is_cancelled() {
            return None;
        }
        match item {
            Ok(v) => collector.add_input(&mut acc, v),
            Err(e) => {
                cancel.record(e);
                return None;
            }
        }
    }
    Some(acc)
}

/// Split an owned vector into at most `n` contiguous ordered chunks.
pub(crate) fn split_vec<T>(v: Vec<T>, n: usize) -> Vec<Vec<T>> {
    let len = v.len();
    if n <= 1 || len <= 1 {
        return vec![v];
    }
    let chunk = len.div_ceil(n);
    let mut out = Vec::with_capacity(n);
    let mut iter = v.into_iter();
    loop {
        let part: Vec<T> = iter.by_ref().take(chunk).collect();
        if part.is_empty() {
            break;
        }
        out.push(part);
    }
    out
}
