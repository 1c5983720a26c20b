//! Grouping and partitioning collectors.
//!
//! [`GroupingBy`] classifies elements into buckets by key and reduces every
//! bucket with a downstream collector in the same single pass: the key is
//! computed per element, the bucket's accumulator is created on first use
//! via the downstream supplier, and every bucket is finished at the end.
//! Nesting a `GroupingBy` as the downstream of another produces multi-level
//! maps.
//!
//! [`PartitioningBy`] is grouping specialized to a boolean key: exactly two
//! buckets, both always present even when empty, finished eagerly.

use crate::collector::Collector;
use crate::error::Result;
use crate::sequence::Element;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use super::ToList;

/* ===================== GroupingBy ===================== */

/// Group elements by key, reducing each bucket with a downstream collector.
///
/// Key iteration order of the resulting map is not guaranteed stable across
/// runs; sort the entries if a stable order matters.
pub struct GroupingBy<T, K, D> {
    key: Arc<dyn Fn(&T) -> K + Send + Sync>,
    downstream: D,
}

impl<T, K> GroupingBy<T, K, ToList> {
    /// Group into raw buckets: every key maps to a `Vec<T>` in source order.
    pub fn new(key: impl Fn(&T) -> K + Send + Sync + 'static) -> Self {
        Self::with(key, ToList::new())
    }
}

impl<T, K, D> GroupingBy<T, K, D> {
    /// Group with an explicit downstream collector applied per bucket.
    pub fn with(key: impl Fn(&T) -> K + Send + Sync + 'static, downstream: D) -> Self {
        Self {
            key: Arc::new(key),
            downstream,
        }
    }
}

impl<T, K, D> Collector<T> for GroupingBy<T, K, D>
where
    T: Element,
    K: Element + Eq + Hash,
    D: Collector<T>,
{
    type Acc = HashMap<K, D::Acc>;
    type Out = HashMap<K, D::Out>;

    fn create(&self) -> Self::Acc {
        HashMap::new()
    }

    fn add_input(&self, acc: &mut Self::Acc, item: T) {
        let key = (self.key)(&item);
        let bucket = acc
            .entry(key)
            .or_insert_with(|| self.downstream.create());
        self.downstream.add_input(bucket, item);
    }

    fn merge(&self, mut a: Self::Acc, b: Self::Acc) -> Result<Self::Acc> {
        for (key, bucket_b) in b {
            match a.remove(&key) {
                Some(bucket_a) => {
                    a.insert(key, self.downstream.merge(bucket_a, bucket_b)?);
                }
                None => {
                    a.insert(key, bucket_b);
                }
            }
        }
        Ok(a)
    }

    fn finish(&self, acc: Self::Acc) -> Self::Out {
        acc.into_iter()
            .map(|(key, bucket)| (key, self.downstream.finish(bucket)))
            .collect()
    }
}

/* ===================== PartitioningBy ===================== */

/// The two buckets produced by [`PartitioningBy`].
///
/// Both buckets are always present; an empty one holds the downstream
/// collector's empty result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partitioned<R> {
    /// Elements for which the predicate held.
    pub matched: R,
    /// Everything else.
    pub unmatched: R,
}

/// Split elements into two buckets by predicate, reducing each bucket with a
/// downstream collector.
pub struct PartitioningBy<T, D> {
    pred: Arc<dyn Fn(&T) -> bool + Send + Sync>,
    downstream: D,
}

impl<T> PartitioningBy<T, ToList> {
    /// Partition into raw buckets of `Vec<T>` in source order.
    pub fn new(pred: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self::with(pred, ToList::new())
    }
}

impl<T, D> PartitioningBy<T, D> {
    /// Partition with an explicit downstream collector applied per bucket.
    pub fn with(pred: impl Fn(&T) -> bool + Send + Sync + 'static, downstream: D) -> Self {
        Self {
            pred: Arc::new(pred),
            downstream,
        }
    }
}

impl<T, D> Collector<T> for PartitioningBy<T, D>
where
    T: Element,
    D: Collector<T>,
{
    type Acc = (D::Acc, D::Acc);
    type Out = Partitioned<D::Out>;

    fn create(&self) -> Self::Acc {
        (self.downstream.create(), self.downstream.create())
    }

    fn add_input(&self, acc: &mut Self::Acc, item: T) {
        if (self.pred)(&item) {
            self.downstream.add_input(&mut acc.0, item);
        } else {
            self.downstream.add_input(&mut acc.1, item);
        }
    }

    fn merge(&self, a: Self::Acc, b: Self::Acc) -> Result<Self::Acc> {
        Ok((
            self.downstream.merge(a.0, b.0)?,
            self.downstream.merge(a.1, b.1)?,
        ))
    }

    fn finish(&self, acc: Self::Acc) -> Self::Out {
        Partitioned {
            matched: self.downstream.finish(acc.0),
            unmatched: self.downstream.finish(acc.1),
        }
    }
}
