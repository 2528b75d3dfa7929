//! Dispatcher handle
//!
//! A `Dispatcher` is the function an action is handed to. The base store
//! dispatcher runs the reducer; enhancers such as the middleware applier wrap
//! it into a new dispatcher with the same signature.
//!
//! Middleware receive a late-bound dispatcher that always points at the
//! fully composed chain, so actions dispatched from middleware re-enter the
//! chain from the beginning.

use crate::action::Action;
use crate::error::StoreError;
use std::sync::{Arc, OnceLock, Weak};

type DispatchFn = dyn Fn(Action) -> Result<Action, StoreError> + Send + Sync;

/// Cloneable, thread-safe handle to a dispatch function
#[derive(Clone)]
pub struct Dispatcher {
    dispatch_fn: Arc<DispatchFn>,
}

impl Dispatcher {
    /// Create a dispatcher from a dispatch function
    pub fn new<F>(dispatch_fn: F) -> Self
    where
        F: Fn(Action) -> Result<Action, StoreError> + Send + Sync + 'static,
    {
        Self {
            dispatch_fn: Arc::new(dispatch_fn),
        }
    }

    /// Dispatch an action
    ///
    /// Returns whatever the end of the chain returns; for the base store this
    /// is the action itself.
    pub fn dispatch(&self, action: Action) -> Result<Action, StoreError> {
        (self.dispatch_fn)(action)
    }

    fn downgrade(&self) -> Weak<DispatchFn> {
        Arc::downgrade(&self.dispatch_fn)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

/// A dispatcher that is bound after construction.
///
/// Holds only a weak reference to the bound dispatcher: the composed chain
/// owns the middleware, and the middleware own this slot.
#[derive(Clone, Default)]
pub(crate) struct LateDispatcher {
    slot: Arc<OnceLock<Weak<DispatchFn>>>,
}

impl LateDispatcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Bind to the final dispatcher. Later calls are ignored.
    pub(crate) fn bind(&self, dispatcher: &Dispatcher) {
        if self.slot.set(dispatcher.downgrade()).is_err() {
            log::warn!("Late dispatcher was already bound");
        }
    }

    pub(crate) fn dispatch(&self, action: Action) -> Result<Action, StoreError> {
        let weak = self.slot.get().ok_or(StoreError::IllegalState(
            "Dispatching while constructing your middleware is not allowed.",
        ))?;
        let dispatch_fn = weak
            .upgrade()
            .ok_or(StoreError::IllegalState("The store has been dropped."))?;
        dispatch_fn(action)
    }
}
