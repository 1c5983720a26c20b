//! Collector adapters: `Mapping`, `AndThen`.

use crate::collector::Collector;
use crate::error::Result;
use crate::sequence::Element;
use std::marker::PhantomData;
use std::sync::Arc;

/* ===================== Mapping ===================== */

/// Transform each element before handing it to a downstream collector.
pub struct Mapping<T, U, D> {
    f: Arc<dyn Fn(T) -> U + Send + Sync>,
    downstream: D,
}

impl<T, U, D> Mapping<T, U, D> {
    pub fn new(f: impl Fn(T) -> U + Send + Sync + 'static, downstream: D) -> Self {
        Self {
            f: Arc::new(f),
            downstream,
        }
    }
}

impl<T, U, D> Collector<T> for Mapping<T, U, D>
where
    T: Element,
    U: Element,
    D: Collector<U>,
{
    type Acc = D::Acc;
    type Out = D::Out;

    fn create(&self) -> Self::Acc {
        self.downstream.create()
    }

    fn add_input(&self, acc: &mut Self::Acc, item: T) {
        self.downstream.add_input(acc, (self.f)(item));
    }

    fn merge(&self, a: Self::Acc, b: Self::Acc) -> Result<Self::Acc> {
        self.downstream.merge(a, b)
    }

    fn finish(&self, acc: Self::Acc) -> Self::Out {
        self.downstream.finish(acc)
    }
}

/* ===================== AndThen ===================== */

/// Apply a final transform to another collector's result.
pub struct AndThen<C, F, R> {
    inner: C,
    f: F,
    _r: PhantomData<fn() -> R>,
}

impl<C, F, R> AndThen<C, F, R> {
    pub fn new(inner: C, f: F) -> Self {
        Self {
            inner,
            f,
            _r: PhantomData,
        }
    }
}

impl<T, C, F, R> Collector<T> for AndThen<C, F, R>
where
    T: Element,
    C: Collector<T>,
    F: Fn(C::Out) -> R + Send + Sync,
{
    type Acc = C::Acc;
    type Out = R;

    fn create(&self) -> Self::Acc {
        self.inner.create()
    }

    fn add_input(&self, acc: &mut Self::Acc, item: T) {
        self.inner.add_input(acc, item);
    }

    fn merge(&self, a: Self::Acc, b: Self::Acc) -> Result<Self::Acc> {
        self.inner.merge(a, b)
    }

    fn finish(&self, acc: Self::Acc) -> Self::Out {
        (self.f)(self.inner.finish(acc))
    }
}
