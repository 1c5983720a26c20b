//! Basic collectors: ToList, ToSet, Counting, Reduce, Reducing, Summing, Joining.

use crate::collector::Collector;
use crate::error::Result;
use crate::sequence::Element;
use std::collections::HashSet;
use std::hash::Hash;
use std::mem::take;
use std::ops::Add;
use std::sync::Arc;

/* ===================== ToList ===================== */

/// Collect elements into an ordered `Vec<T>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ToList;

impl ToList {
    /// Convenience constructor (same as `Default`).
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<T: Element> Collector<T> for ToList {
    type Acc = Vec<T>;
    type Out = Vec<T>;

    fn create(&self) -> Vec<T> {
        Vec::new()
    }

    fn add_input(&self, acc: &mut Vec<T>, item: T) {
        acc.push(item);
    }

    fn merge(&self, mut a: Vec<T>, b: Vec<T>) -> Result<Vec<T>> {
        a.extend(b);
        Ok(a)
    }

    fn finish(&self, acc: Vec<T>) -> Vec<T> {
        acc
    }
}

/* ===================== ToSet ===================== */

/// Collect elements into a deduplicated `HashSet<T>`.
///
/// Requires `T: Eq + Hash`. Iteration order of the result is unspecified.
#[derive(Clone, Copy, Debug, Default)]
pub struct ToSet;

impl ToSet {
    /// Convenience constructor (same as `Default`).
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<T> Collector<T> for ToSet
where
    T: Element + Eq + Hash,
{
    type Acc = HashSet<T>;
    type Out = HashSet<T>;

    fn create(&self) -> HashSet<T> {
        HashSet::new()
    }

    fn add_input(&self, acc: &mut HashSet<T>, item: T) {
        acc.insert(item);
    }

    fn merge(&self, mut a: HashSet<T>, b: HashSet<T>) -> Result<HashSet<T>> {
        if a.is_empty() {
            return Ok(b);
        }
        a.extend(b);
        Ok(a)
    }

    fn finish(&self, acc: HashSet<T>) -> HashSet<T> {
        acc
    }
}

/* ===================== Counting ===================== */

/// Count elements, discarding their values.
#[derive(Clone, Copy, Debug, Default)]
pub struct Counting;

impl Counting {
    /// Convenience constructor (same as `Default`).
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<T: Element> Collector<T> for Counting {
    type Acc = u64;
    type Out = u64;

    fn create(&self) -> u64 {
        0
    }

    fn add_input(&self, acc: &mut u64, _item: T) {
        *acc += 1;
    }

    fn merge(&self, a: u64, b: u64) -> Result<u64> {
        Ok(a + b)
    }

    fn finish(&self, acc: u64) -> u64 {
        acc
    }
}

/* ===================== Reduce ===================== */

/// Reduce with an identity and an associative binary operation.
///
/// The operation doubles as the combiner, so `op` must be associative (and
/// `identity` a true identity for it) for parallel runs to match sequential
/// ones.
#[derive(Clone)]
pub struct Reduce<T> {
    identity: T,
    op: Arc<dyn Fn(T, T) -> T + Send + Sync>,
}

impl<T> Reduce<T> {
    pub fn new(identity: T, op: impl Fn(T, T) -> T + Send + Sync + 'static) -> Self {
        Self {
            identity,
            op: Arc::new(op),
        }
    }
}

impl<T: Element> Collector<T> for Reduce<T> {
    type Acc = T;
    type Out = T;

    fn create(&self) -> T {
        self.identity.clone()
    }

    fn add_input(&self, acc: &mut T, item: T) {
        let prev = std::mem::replace(acc, self.identity.clone());
        *acc = (self.op)(prev, item);
    }

    fn merge(&self, a: T, b: T) -> Result<T> {
        Ok((self.op)(a, b))
    }

    fn finish(&self, acc: T) -> T {
        acc
    }
}

/* ===================== Reducing ===================== */

/// Reduce without an identity; yields `None` on empty input.
///
/// Backs `min_by`/`max_by` and any other "pick one of two" reduction. `op`
/// must be associative for parallel safety.
#[derive(Clone)]
pub struct Reducing<T> {
    op: Arc<dyn Fn(T, T) -> T + Send + Sync>,
}

impl<T> Reducing<T> {
    pub fn new(op: impl Fn(T, T) -> T + Send + Sync + 'static) -> Self {
        Self { op: Arc::new(op) }
    }
}

impl<T: Element> Collector<T> for Reducing<T> {
    type Acc = Option<T>;
    type Out = Option<T>;

    fn create(&self) -> Option<T> {
        None
    }

    fn add_input(&self, acc: &mut Option<T>, item: T) {
        *acc = Some(match acc.take() {
            None => item,
            Some(prev) => (self.op)(prev, item),
        });
    }

    fn merge(&self, a: Option<T>, b: Option<T>) -> Result<Option<T>> {
        Ok(match (a, b) {
            (Some(a), Some(b)) => Some((self.op)(a, b)),
            (a, None) => a,
            (None, b) => b,
        })
    }

    fn finish(&self, acc: Option<T>) -> Option<T> {
        acc
    }
}

/* ===================== Summing ===================== */

/// Sum of all elements.
///
/// Requires `T: Add<Output = T> + Default`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Summing;

impl Summing {
    /// Convenience constructor (same as `Default`).
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl<T> Collector<T> for Summing
where
    T: Element + Add<Output = T> + Default,
{
    type Acc = T;
    type Out = T;

    fn create(&self) -> T {
        T::default()
    }

    fn add_input(&self, acc: &mut T, item: T) {
        *acc = take(acc) + item;
    }

    fn merge(&self, a: T, b: T) -> Result<T> {
        Ok(a + b)
    }

    fn finish(&self, acc: T) -> T {
        acc
    }
}

/* ===================== Joining ===================== */

/// Concatenate strings, optionally with a separator between elements.
///
/// Buffers the pieces and joins once at finish, so merging partial results
/// never misplaces a separator.
#[derive(Clone, Debug, Default)]
pub struct Joining {
    separator: String,
}

impl Joining {
    /// Join with no separator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Join with `separator` between consecutive elements.
    #[must_use]
    pub fn with(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }
}

impl Collector<String> for Joining {
    type Acc = Vec<String>;
    type Out = String;

    fn create(&self) -> Vec<String> {
        Vec::new()
    }

    fn add_input(&self, acc: &mut Vec<String>, item: String) {
        acc.push(item);
    }

    fn merge(&self, mut a: Vec<String>, b: Vec<String>) -> Result<Vec<String>> {
        a.extend(b);
        Ok(a)
    }

    fn finish(&self, acc: Vec<String>) -> String {
        acc.join(&self.separator)
    }
}
