//! Store enhancer protocol
//!
//! An enhancer wraps the store-creation function itself. It calls the inner
//! creator to get a concrete store and returns a store built on top of it,
//! typically one with a different dispatcher (see
//! [`Store::with_dispatcher`]). State reads, subscriptions and reducer
//! replacement keep going to the inner store.

use crate::error::StoreError;
use crate::store::{BoxedReducer, Store};

/// Function that builds a store from a reducer and an optional preloaded state
pub type StoreCreator<S> = Box<dyn FnOnce(BoxedReducer<S>, Option<S>) -> Result<Store<S>, StoreError>>;

/// Transforms a store creator into another store creator
pub trait StoreEnhancer<S> {
    fn enhance(self, create: StoreCreator<S>) -> StoreCreator<S>;
}

/// Applies two enhancers, `outer` wrapping `inner`
///
/// `outer` sees the store produced by `inner`, so its dispatcher runs first.
pub struct Chain<A, B> {
    outer: A,
    inner: B,
}

impl<A, B> Chain<A, B> {
    pub fn new(outer: A, inner: B) -> Self {
        Self { outer, inner }
    }
}

impl<S, A, B> StoreEnhancer<S> for Chain<A, B>
where
    A: StoreEnhancer<S>,
    B: StoreEnhancer<S>,
{
    fn enhance(self, create: StoreCreator<S>) -> StoreCreator<S> {
        self.outer.enhance(self.inner.enhance(create))
    }
}
