//! Middleware system
//!
//! Middleware sits between an action being dispatched and the reducer,
//! allowing side effects, async work, logging and other cross-cutting
//! concerns to be layered on without touching the store.
//!
//! ```text
//! dispatch(action) → m0 → m1 → … → mN → base dispatch → reducer → listeners
//! ```
//!
//! Each middleware is asked once, when the store is built, to produce a
//! wrapper that turns "the next dispatcher in the chain" into "this
//! middleware's dispatcher". Middleware declared first is outermost: it sees
//! every action first and decides whether and how to forward it.
//!
//! ## Example
//!
//! ```rust
//! use redux_store::middleware::{self, MiddlewareApi};
//! use redux_store::{create_store_with, Action, ApplyMiddleware, Dispatcher};
//!
//! struct Increment;
//!
//! // Swallows every action
//! let block_all =
//!     middleware::from_fn(|_api: &MiddlewareApi<u32>, _next: &Dispatcher, action| Ok(action));
//! let store = create_store_with(
//!     |count: &u32, action: &Action| Ok(if action.is::<Increment>() { count + 1 } else { *count }),
//!     None,
//!     ApplyMiddleware::new().with(block_all),
//! )?;
//!
//! store.dispatch(Action::new(Increment))?;
//! assert_eq!(store.state()?, 0);
//! # Ok::<(), redux_store::StoreError>(())
//! ```

use crate::action::Action;
use crate::dispatcher::{Dispatcher, LateDispatcher};
use crate::enhancer::{StoreCreator, StoreEnhancer};
use crate::error::StoreError;
use crate::store::Store;
use std::marker::PhantomData;
use std::sync::Arc;

pub mod logging;
pub mod thunk;

/// Turns the next dispatcher in the chain into this middleware's dispatcher
pub type DispatchWrapper = Box<dyn FnOnce(Dispatcher) -> Dispatcher + Send>;

/// What a middleware can do with the store: read state and dispatch
/// through the whole chain.
pub struct MiddlewareApi<S> {
    store: Store<S>,
    dispatcher: LateDispatcher,
}

impl<S> Clone for MiddlewareApi<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<S: Clone + Send + 'static> MiddlewareApi<S> {
    /// Current state of the store
    pub fn state(&self) -> Result<S, StoreError> {
        self.store.state()
    }

    /// Dispatch an action from the top of the middleware chain
    pub fn dispatch(&self, action: Action) -> Result<Action, StoreError> {
        self.dispatcher.dispatch(action)
    }

    /// A dispatcher handle for the top of the middleware chain, e.g. to hand
    /// to a spawned task
    pub fn dispatcher(&self) -> Dispatcher {
        let late = self.dispatcher.clone();
        Dispatcher::new(move |action| late.dispatch(action))
    }
}

/// Middleware trait - wraps the dispatcher of a store
///
/// `wrap` is called exactly once per store, while the store is being built,
/// never per action.
pub trait Middleware<S>: Send + Sync {
    fn wrap(&self, api: MiddlewareApi<S>) -> DispatchWrapper;
}

/// Middleware built from a per-action closure, see [`from_fn`]
pub struct FnMiddleware<S, F> {
    handler: Arc<F>,
    _state: PhantomData<fn() -> S>,
}

/// Build a middleware from a closure receiving the api, the next dispatcher
/// and the action
///
/// Forward with `next.dispatch(action)`, swallow by returning `Ok(action)`
/// without forwarding, or dispatch something else through `api`.
pub fn from_fn<S, F>(handler: F) -> FnMiddleware<S, F>
where
    F: Fn(&MiddlewareApi<S>, &Dispatcher, Action) -> Result<Action, StoreError>
        + Send
        + Sync
        + 'static,
{
    FnMiddleware {
        handler: Arc::new(handler),
        _state: PhantomData,
    }
}

impl<S, F> Middleware<S> for FnMiddleware<S, F>
where
    S: Send + 'static,
    F: Fn(&MiddlewareApi<S>, &Dispatcher, Action) -> Result<Action, StoreError>
        + Send
        + Sync
        + 'static,
{
    fn wrap(&self, api: MiddlewareApi<S>) -> DispatchWrapper {
        let handler = self.handler.clone();
        Box::new(move |next| Dispatcher::new(move |action| (*handler)(&api, &next, action)))
    }
}

/// Compose wrappers right to left: `w0(w1(…(wN(base))))`
///
/// No wrappers yields the base dispatcher itself.
pub fn compose(wrappers: Vec<DispatchWrapper>) -> impl FnOnce(Dispatcher) -> Dispatcher {
    move |base| {
        wrappers
            .into_iter()
            .rev()
            .fold(base, |next, wrap| wrap(next))
    }
}

/// Store enhancer that applies middleware to the store's dispatcher
///
/// Middleware runs in the order it was added.
///
/// ```rust
/// use redux_store::middleware::{logging::LoggingMiddleware, thunk::ThunkMiddleware};
/// use redux_store::{create_store_with, Action, ApplyMiddleware};
///
/// let enhancer = ApplyMiddleware::new()
///     .with(LoggingMiddleware::new())
///     .with(ThunkMiddleware::new());
/// let store = create_store_with(|n: &u32, _: &Action| Ok(*n), None, enhancer)?;
/// # Ok::<(), redux_store::StoreError>(())
/// ```
pub struct ApplyMiddleware<S> {
    middleware: Vec<Box<dyn Middleware<S>>>,
}

impl<S> ApplyMiddleware<S> {
    pub fn new() -> Self {
        Self {
            middleware: Vec::new(),
        }
    }

    /// Add middleware to the chain
    pub fn add_middleware(&mut self, middleware: Box<dyn Middleware<S>>) {
        self.middleware.push(middleware);
    }

    /// Builder form of [`ApplyMiddleware::add_middleware`]
    pub fn with<M: Middleware<S> + 'static>(mut self, middleware: M) -> Self {
        self.add_middleware(Box::new(middleware));
        self
    }

    pub fn len(&self) -> usize {
        self.middleware.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middleware.is_empty()
    }
}

impl<S> Default for ApplyMiddleware<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> From<Vec<Box<dyn Middleware<S>>>> for ApplyMiddleware<S> {
    fn from(middleware: Vec<Box<dyn Middleware<S>>>) -> Self {
        Self { middleware }
    }
}

impl<S: Clone + Send + 'static> StoreEnhancer<S> for ApplyMiddleware<S> {
    fn enhance(self, create: StoreCreator<S>) -> StoreCreator<S> {
        Box::new(move |reducer, preloaded_state| {
            let store = create(reducer, preloaded_state)?;
            let late = LateDispatcher::new();

            let chain: Vec<DispatchWrapper> = self
                .middleware
                .iter()
                .map(|middleware| {
                    middleware.wrap(MiddlewareApi {
                        store: store.clone(),
                        dispatcher: late.clone(),
                    })
                })
                .collect();
            log::debug!("Applying {} middleware", chain.len());

            let dispatcher = compose(chain)(store.dispatcher().clone());
            late.bind(&dispatcher);

            Ok(store.with_dispatcher(dispatcher))
        })
    }
}
