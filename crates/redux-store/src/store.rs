use crate::action::{self, Action, Init};
use crate::dispatcher::Dispatcher;
use crate::enhancer::{StoreCreator, StoreEnhancer};
use crate::error::StoreError;
use crate::listener::{ListenerRegistry, Unsubscribe};
use parking_lot::{Mutex, ReentrantMutex};
use std::cell::{Cell, RefCell};
use std::sync::Arc;

/// Reducer - pure function that produces the next state from the current
/// state and an action
pub type BoxedReducer<S> = Arc<dyn Fn(&S, &Action) -> anyhow::Result<S> + Send + Sync>;

/// Everything guarded by the dispatch lock
struct Inner<S> {
    state: RefCell<S>,
    reducer: RefCell<BoxedReducer<S>>,
    /// Set while the reducer runs
    dispatching: Cell<bool>,
}

/// Clears the dispatching flag when the reducer returns, fails or panics
struct ReducerWindow<'a> {
    dispatching: &'a Cell<bool>,
}

impl<'a> ReducerWindow<'a> {
    fn enter(dispatching: &'a Cell<bool>) -> Self {
        dispatching.set(true);
        Self { dispatching }
    }
}

impl Drop for ReducerWindow<'_> {
    fn drop(&mut self) {
        self.dispatching.set(false);
    }
}

/// The dispatch/subscription engine shared by every handle of one store
///
/// The lock is reentrant so that a reducer calling back into its own store
/// on the same thread reaches the dispatching check and fails with
/// `IllegalState` instead of deadlocking. Callers on other threads block
/// until the running dispatch has committed.
struct StoreCore<S> {
    inner: ReentrantMutex<Inner<S>>,
    listeners: Arc<Mutex<ListenerRegistry>>,
}

impl<S: Clone + Send + 'static> StoreCore<S> {
    fn new(reducer: BoxedReducer<S>, state: S) -> Self {
        Self {
            inner: ReentrantMutex::new(Inner {
                state: RefCell::new(state),
                reducer: RefCell::new(reducer),
                dispatching: Cell::new(false),
            }),
            listeners: Arc::new(Mutex::new(ListenerRegistry::new())),
        }
    }

    fn state(&self) -> Result<S, StoreError> {
        let inner = self.inner.lock();
        if inner.dispatching.get() {
            return Err(StoreError::IllegalState(
                "You may not read the state while the reducer is executing. \
                 The reducer has already received the state as an argument.",
            ));
        }
        let state = inner.state.borrow().clone();
        Ok(state)
    }

    fn dispatch(&self, action: Action) -> Result<Action, StoreError> {
        if action::is_primitive_or_none(&action) {
            log::warn!("Rejected action of type {}", action.type_name());
            return Err(StoreError::InvalidAction {
                type_name: action.type_name(),
            });
        }

        {
            let inner = self.inner.lock();
            if inner.dispatching.get() {
                log::warn!("Reentrant dispatch of {} rejected", action.type_name());
                return Err(StoreError::IllegalState("Reducers may not dispatch actions."));
            }

            let _window = ReducerWindow::enter(&inner.dispatching);
            let reducer = inner.reducer.borrow().clone();
            let next = reducer(&inner.state.borrow(), &action);

            match next {
                Ok(next) => *inner.state.borrow_mut() = next,
                Err(err) => {
                    log::warn!("Reducer failed on {}: {:#}", action.type_name(), err);
                    return Err(StoreError::from_reducer(err));
                }
            }
        }

        // Notify outside the lock so listeners may read state or dispatch again
        let snapshot = self.listeners.lock().snapshot_and_freeze();
        log::trace!(
            "Notifying {} listener(s) after {}",
            snapshot.len(),
            action.type_name()
        );
        for slot in snapshot.iter() {
            slot.notify();
        }

        Ok(action)
    }

    fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) -> Unsubscribe {
        let id = self.listeners.lock().subscribe(Arc::new(listener));
        Unsubscribe::new(id, &self.listeners)
    }

    fn replace_reducer(&self, reducer: BoxedReducer<S>) -> Result<(), StoreError> {
        {
            let inner = self.inner.lock();
            if inner.dispatching.get() {
                return Err(StoreError::IllegalState(
                    "Reducers may not replace the reducer.",
                ));
            }
            *inner.reducer.borrow_mut() = reducer;
        }

        log::debug!("Reducer replaced, re-initialising state");
        self.dispatch(Action::new(Init))?;
        Ok(())
    }
}

/// Store - holds the state tree and serializes every change through the reducer
///
/// The only way to change the state is to dispatch an action. Handles are
/// cheap to clone; all clones refer to the same store.
///
/// # Example
///
/// ```rust
/// use redux_store::{Action, Store};
///
/// struct Increment;
///
/// let store = Store::new(|count: &u32, action: &Action| {
///     Ok(if action.is::<Increment>() { count + 1 } else { *count })
/// })?;
///
/// store.dispatch(Action::new(Increment))?;
/// assert_eq!(store.state()?, 1);
/// # Ok::<(), redux_store::StoreError>(())
/// ```
pub struct Store<S> {
    core: Arc<StoreCore<S>>,
    dispatcher: Dispatcher,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            core: self.core.clone(),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<S: Clone + Send + 'static> Store<S> {
    /// Create a store starting from `S::default()`
    pub fn new<R>(reducer: R) -> Result<Self, StoreError>
    where
        S: Default,
        R: Fn(&S, &Action) -> anyhow::Result<S> + Send + Sync + 'static,
    {
        Self::from_boxed(Arc::new(reducer), None)
    }

    /// Create a store starting from a preloaded state
    pub fn with_state<R>(reducer: R, preloaded_state: S) -> Result<Self, StoreError>
    where
        S: Default,
        R: Fn(&S, &Action) -> anyhow::Result<S> + Send + Sync + 'static,
    {
        Self::from_boxed(Arc::new(reducer), Some(preloaded_state))
    }

    /// Build the base store and run the init dispatch
    pub fn from_boxed(
        reducer: BoxedReducer<S>,
        preloaded_state: Option<S>,
    ) -> Result<Self, StoreError>
    where
        S: Default,
    {
        let core = Arc::new(StoreCore::new(reducer, preloaded_state.unwrap_or_default()));
        let base = core.clone();
        let dispatcher = Dispatcher::new(move |action| base.dispatch(action));

        log::debug!("Initialising store of {}", std::any::type_name::<S>());
        core.dispatch(Action::new(Init))?;

        Ok(Self { core, dispatcher })
    }

    /// Get a copy of the current state
    ///
    /// Fails with `IllegalState` when called from inside the reducer.
    pub fn state(&self) -> Result<S, StoreError> {
        self.core.state()
    }

    /// Dispatch an action through the store's dispatcher
    ///
    /// Returns the action on success, or whatever the middleware chain
    /// returned in its place.
    pub fn dispatch(&self, action: Action) -> Result<Action, StoreError> {
        self.dispatcher.dispatch(action)
    }

    /// Get the store's public dispatcher
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Register a listener called after every dispatch
    ///
    /// A listener added while a notification pass is running is first called
    /// on the next dispatch.
    pub fn subscribe<L>(&self, listener: L) -> Unsubscribe
    where
        L: Fn() + Send + Sync + 'static,
    {
        self.core.subscribe(listener)
    }

    /// Swap the reducer and dispatch [`Init`] so it can adopt the existing state
    pub fn replace_reducer<R>(&self, reducer: R) -> Result<(), StoreError>
    where
        R: Fn(&S, &Action) -> anyhow::Result<S> + Send + Sync + 'static,
    {
        self.core.replace_reducer(Arc::new(reducer))
    }

    /// Number of listeners that the next dispatch will notify
    pub fn listener_count(&self) -> usize {
        self.core.listeners.lock().len()
    }

    /// Replace the public dispatcher, keeping state, subscriptions and the
    /// reducer shared with this store
    ///
    /// Used by store enhancers.
    pub fn with_dispatcher(self, dispatcher: Dispatcher) -> Self {
        Self {
            core: self.core,
            dispatcher,
        }
    }
}

/// Create a store
///
/// The reducer is called once with [`Init`] before this returns.
pub fn create_store<S, R>(reducer: R, preloaded_state: Option<S>) -> Result<Store<S>, StoreError>
where
    S: Clone + Default + Send + 'static,
    R: Fn(&S, &Action) -> anyhow::Result<S> + Send + Sync + 'static,
{
    Store::from_boxed(Arc::new(reducer), preloaded_state)
}

/// Create a store through an enhancer, e.g. [`crate::ApplyMiddleware`]
pub fn create_store_with<S, R, E>(
    reducer: R,
    preloaded_state: Option<S>,
    enhancer: E,
) -> Result<Store<S>, StoreError>
where
    S: Clone + Default + Send + 'static,
    R: Fn(&S, &Action) -> anyhow::Result<S> + Send + Sync + 'static,
    E: StoreEnhancer<S>,
{
    let create: StoreCreator<S> = Box::new(Store::from_boxed);
    let create = enhancer.enhance(create);
    create(Arc::new(reducer), preloaded_state)
}
