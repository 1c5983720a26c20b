//! Statistical collectors: `Summarizing`, `Averaging`.

use crate::collector::Collector;
use crate::error::Result;
use crate::sequence::Element;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/* ===================== Summarizing ===================== */

/// One-pass summary of a numeric stream.
///
/// `min`/`max` are `None` for an empty input; `mean` is `0.0` then.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: u64,
    pub sum: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: f64,
}

/// Accumulator behind [`Summarizing`].
///
/// The mean is maintained incrementally (`mean += (x - mean) / count`)
/// rather than derived from `sum / count` at the end, which keeps it
/// accurate when the running sum grows large.
#[derive(Clone, Copy, Debug, Default)]
pub struct SummaryAcc {
    count: u64,
    sum: f64,
    mean: f64,
    min: Option<OrderedFloat<f64>>,
    max: Option<OrderedFloat<f64>>,
}

impl SummaryAcc {
    #[allow(clippy::cast_precision_loss)]
    fn push(&mut self, x: f64) {
        self.count += 1;
        self.sum += x;
        self.mean += (x - self.mean) / self.count as f64;
        let x = OrderedFloat(x);
        self.min = Some(self.min.map_or(x, |m| m.min(x)));
        self.max = Some(self.max.map_or(x, |m| m.max(x)));
    }

    #[allow(clippy::cast_precision_loss)]
    fn join(self, other: Self) -> Self {
        if self.count == 0 {
            return other;
        }
        if other.count == 0 {
            return self;
        }
        let count = self.count + other.count;
        // Weighted update keeps the merged mean as stable as the running one.
        let mean = self.mean + (other.mean - self.mean) * (other.count as f64 / count as f64);
        Self {
            count,
            sum: self.sum + other.sum,
            mean,
            min: self.min.zip(other.min).map(|(a, b)| a.min(b)),
            max: self.max.zip(other.max).map(|(a, b)| a.max(b)),
        }
    }
}

/// Compute count, sum, min, max, and mean in a single pass.
///
/// Values must be convertible to `f64` via `Into<f64>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Summarizing;

impl Summarizing {
    /// Convenience constructor (same as `Default`).
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<V> Collector<V> for Summarizing
where
    V: Element + Into<f64>,
{
    type Acc = SummaryAcc;
    type Out = SummaryStats;

    fn create(&self) -> SummaryAcc {
        SummaryAcc::default()
    }

    fn add_input(&self, acc: &mut SummaryAcc, item: V) {
        acc.push(item.into());
    }

    fn merge(&self, a: SummaryAcc, b: SummaryAcc) -> Result<SummaryAcc> {
        Ok(a.join(b))
    }

    fn finish(&self, acc: SummaryAcc) -> SummaryStats {
        SummaryStats {
            count: acc.count,
            sum: acc.sum,
            min: acc.min.map(OrderedFloat::into_inner),
            max: acc.max.map(OrderedFloat::into_inner),
            mean: acc.mean,
        }
    }
}

/* ===================== Averaging ===================== */

/// Mean of all values as `f64`.
///
/// Values must be convertible into `f64` via `Into<f64>`.
///
/// - Accumulator: `(sum_f64, count_u64)`
/// - Output: `f64`
///
/// Empty input produces `0.0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Averaging;

impl Averaging {
    /// Convenience constructor (same as `Default`).
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<V> Collector<V> for Averaging
where
    V: Element + Into<f64>,
{
    type Acc = (f64, u64);
    type Out = f64;

    fn create(&self) -> (f64, u64) {
        (0.0, 0)
    }

    fn add_input(&self, acc: &mut (f64, u64), item: V) {
        acc.0 += item.into();
        acc.1 += 1;
    }

    fn merge(&self, a: (f64, u64), b: (f64, u64)) -> Result<(f64, u64)> {
        Ok((a.0 + b.0, a.1 + b.1))
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(&self, acc: (f64, u64)) -> f64 {
        if acc.1 == 0 { 0.0 } else { acc.0 / (acc.1 as f64) }
    }
}
