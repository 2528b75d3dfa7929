//! Thunk middleware
//!
//! Lets callers dispatch functions instead of plain actions. A [`Thunk`]
//! runs synchronously with access to the store's state and dispatcher; an
//! [`AsyncThunk`] is spawned on the tokio runtime and the dispatch returns
//! its [`ThunkHandle`] wrapped in an [`Action`].
//!
//! Actions dispatched from a thunk re-enter the middleware chain from the
//! top, so every middleware observes them.

use crate::action::Action;
use crate::dispatcher::Dispatcher;
use crate::error::StoreError;
use crate::middleware::{DispatchWrapper, Middleware, MiddlewareApi};
use std::future::Future;
use std::pin::Pin;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// BoxFuture type alias for async thunks
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Handle of a spawned [`AsyncThunk`], returned from dispatch as an action
pub type ThunkHandle = JoinHandle<Result<(), StoreError>>;

type ThunkFn<S> = Box<dyn FnOnce(&MiddlewareApi<S>) -> Result<Action, StoreError> + Send>;
type AsyncThunkFn<S> = Box<dyn FnOnce(MiddlewareApi<S>) -> BoxFuture<'static, Result<(), StoreError>> + Send>;

/// A synchronous function dispatched as an action
///
/// Its return value becomes the result of the dispatch.
pub struct Thunk<S> {
    run: ThunkFn<S>,
}

impl<S> Thunk<S> {
    pub fn new<F>(run: F) -> Self
    where
        F: FnOnce(&MiddlewareApi<S>) -> Result<Action, StoreError> + Send + 'static,
    {
        Self { run: Box::new(run) }
    }
}

/// An async function dispatched as an action
pub struct AsyncThunk<S> {
    run: AsyncThunkFn<S>,
}

impl<S> AsyncThunk<S> {
    pub fn new<F, Fut>(run: F) -> Self
    where
        F: FnOnce(MiddlewareApi<S>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), StoreError>> + Send + 'static,
    {
        Self {
            run: Box::new(move |api| Box::pin(run(api))),
        }
    }
}

/// ThunkMiddleware - runs [`Thunk`] and [`AsyncThunk`] actions instead of
/// forwarding them
///
/// All other actions pass through unchanged.
#[derive(Default)]
pub struct ThunkMiddleware {
    runtime: Option<Handle>,
}

impl ThunkMiddleware {
    /// Spawn async thunks on the runtime current at dispatch time
    pub fn new() -> Self {
        Self { runtime: None }
    }

    /// Spawn async thunks on a specific runtime
    pub fn with_runtime(runtime: Handle) -> Self {
        Self {
            runtime: Some(runtime),
        }
    }
}

fn spawn_thunk<S>(
    runtime: Option<&Handle>,
    thunk: AsyncThunk<S>,
    api: MiddlewareApi<S>,
) -> Result<ThunkHandle, StoreError> {
    let runtime = match runtime {
        Some(runtime) => runtime.clone(),
        None => Handle::try_current().map_err(|e| StoreError::Middleware(e.into()))?,
    };
    Ok(runtime.spawn((thunk.run)(api)))
}

impl<S: Clone + Send + 'static> Middleware<S> for ThunkMiddleware {
    fn wrap(&self, api: MiddlewareApi<S>) -> DispatchWrapper {
        let runtime = self.runtime.clone();
        Box::new(move |next: Dispatcher| {
            Dispatcher::new(move |action| {
                let action = match action.downcast::<Thunk<S>>() {
                    Ok(thunk) => {
                        log::trace!("Running thunk");
                        return (thunk.run)(&api);
                    }
                    Err(action) => action,
                };

                match action.downcast::<AsyncThunk<S>>() {
                    Ok(thunk) => {
                        log::trace!("Spawning async thunk");
                        let handle = spawn_thunk(runtime.as_ref(), thunk, api.clone())?;
                        Ok(Action::new(handle))
                    }
                    Err(action) => next.dispatch(action),
                }
            })
        })
    }
}
