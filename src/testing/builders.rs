//! Fluent builder for test datasets.

use std::ops::RangeInclusive;

/// Builds test datasets from ranges, repeats, and explicit values.
///
/// ```
/// use rill::testing::DatasetBuilder;
///
/// let data = DatasetBuilder::new()
///     .range(1..=5)
///     .value(100)
///     .repeat(7, 3)
///     .build();
/// assert_eq!(data, vec![1, 2, 3, 4, 5, 100, 7, 7, 7]);
/// ```
#[derive(Default)]
pub struct DatasetBuilder<T> {
    items: Vec<T>,
}

impl<T> DatasetBuilder<T> {
    /// Start an empty dataset.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append one value.
    #[must_use]
    pub fn value(mut self, value: T) -> Self {
        self.items.push(value);
        self
    }

    /// Append every value from an iterable.
    #[must_use]
    pub fn values(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.items.extend(values);
        self
    }

    /// Append `count` clones of `value`.
    #[must_use]
    pub fn repeat(mut self, value: T, count: usize) -> Self
    where
        T: Clone,
    {
        self.items.extend(std::iter::repeat_n(value, count));
        self
    }

    /// Finish and return the dataset.
    #[must_use]
    pub fn build(self) -> Vec<T> {
        self.items
    }

    /// Number of values added so far.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was added yet.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> DatasetBuilder<T>
where
    T: Copy,
    RangeInclusive<T>: Iterator<Item = T>,
{
    /// Append every value of an inclusive range.
    #[must_use]
    pub fn range(mut self, range: RangeInclusive<T>) -> Self {
        self.items.extend(range);
        self
    }
}
