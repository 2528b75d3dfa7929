//! # redux-store
//!
//! A single-process, in-memory state container. All state transitions go
//! through one reducer function, listeners are notified after each
//! transition, and the dispatch path can be intercepted by an ordered chain
//! of middleware.
//!
//! ## Design
//!
//! ```text
//! Action → Middleware Chain → Reducer → State → Listeners
//! ```
//!
//! - Dispatches are serialized by a lock held only while the reducer runs
//! - A reducer may not dispatch, read state or replace the reducer of its
//!   own store; doing so fails with [`StoreError::IllegalState`]
//! - Listeners run after the lock is released, over a snapshot of the
//!   subscriptions taken when the pass starts
//! - Middleware are applied through the store enhancer protocol, so state
//!   reads and subscriptions are unaffected by them
//!
//! ## Usage
//!
//! ```rust
//! use redux_store::middleware::thunk::ThunkMiddleware;
//! use redux_store::{create_store_with, Action, ApplyMiddleware};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Todo {
//!     id: usize,
//!     message: String,
//! }
//!
//! struct AddTodo(String);
//!
//! fn todos(state: &Vec<Todo>, action: &Action) -> anyhow::Result<Vec<Todo>> {
//!     let mut next = state.clone();
//!     if let Some(AddTodo(message)) = action.downcast_ref::<AddTodo>() {
//!         next.push(Todo { id: next.len() + 1, message: message.clone() });
//!     }
//!     Ok(next)
//! }
//!
//! let store = create_store_with(todos, None, ApplyMiddleware::new().with(ThunkMiddleware::new()))?;
//! let _unsubscribe = store.subscribe(|| println!("state changed"));
//!
//! store.dispatch(Action::new(AddTodo("Use Redux".to_string())))?;
//! assert_eq!(store.state()?.len(), 1);
//! # Ok::<(), redux_store::StoreError>(())
//! ```

pub mod action;
pub mod config;
mod dispatcher;
pub mod enhancer;
mod error;
mod listener;
pub mod middleware;
mod store;

// Re-export commonly used types
pub use action::{Action, Init};
pub use config::LoggingConfig;
pub use dispatcher::Dispatcher;
pub use enhancer::{StoreCreator, StoreEnhancer};
pub use error::{ConfigError, StoreError};
pub use listener::Unsubscribe;
pub use middleware::{ApplyMiddleware, Middleware, MiddlewareApi};
pub use store::{create_store, create_store_with, BoxedReducer, Store};
