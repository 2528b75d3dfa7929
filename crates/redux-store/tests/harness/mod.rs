//! Shared fixtures for the store integration tests: a todo list reducer in
//! two flavours, a handful of actions and a call counter for listeners.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use redux_store::middleware::thunk::{AsyncThunk, Thunk};
use redux_store::{Action, MiddlewareApi, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: u32,
    pub message: String,
}

impl Todo {
    pub fn new(id: u32, message: &str) -> Self {
        Self {
            id,
            message: message.to_string(),
        }
    }
}

pub type Todos = Vec<Todo>;

pub struct AddTodo(pub String);

impl AddTodo {
    pub fn action(message: &str) -> Action {
        Action::new(AddTodo(message.to_string()))
    }
}

pub struct Unknown;

pub fn unknown() -> Action {
    Action::new(Unknown)
}

/// An action carrying a callback that [`bound_fn_reducer`] runs mid-reduce
pub struct BoundFn(pub Box<dyn Fn() -> Result<(), StoreError> + Send>);

impl BoundFn {
    pub fn action(f: impl Fn() -> Result<(), StoreError> + Send + 'static) -> Action {
        Action::new(BoundFn(Box::new(f)))
    }
}

fn next_id(state: &[Todo]) -> u32 {
    state.iter().map(|todo| todo.id).max().map_or(1, |max| max + 1)
}

/// Appends new todos
pub fn todos(state: &Todos, action: &Action) -> anyhow::Result<Todos> {
    let mut next = state.clone();
    if let Some(AddTodo(message)) = action.downcast_ref::<AddTodo>() {
        next.push(Todo {
            id: next_id(state),
            message: message.clone(),
        });
    }
    Ok(next)
}

/// Prepends new todos
pub fn todos_reverse(state: &Todos, action: &Action) -> anyhow::Result<Todos> {
    let mut next = state.clone();
    if let Some(AddTodo(message)) = action.downcast_ref::<AddTodo>() {
        next.insert(
            0,
            Todo {
                id: next_id(state),
                message: message.clone(),
            },
        );
    }
    Ok(next)
}

pub fn bound_fn_reducer(state: &i32, action: &Action) -> anyhow::Result<i32> {
    if let Some(BoundFn(f)) = action.downcast_ref::<BoundFn>() {
        f()?;
    }
    Ok(*state)
}

/// Dispatches `AddTodo` only while the list is empty
pub fn add_todo_if_empty(message: &str) -> Action {
    let message = message.to_string();
    Action::new(Thunk::new(move |api: &MiddlewareApi<Todos>| {
        if api.state()?.is_empty() {
            api.dispatch(Action::new(AddTodo(message)))
        } else {
            Ok(unknown())
        }
    }))
}

/// Dispatches `AddTodo` from a spawned task
pub fn add_todo_async(message: &str) -> Action {
    let message = message.to_string();
    Action::new(AsyncThunk::new(move |api: MiddlewareApi<Todos>| async move {
        tokio::task::yield_now().await;
        api.dispatch(Action::new(AddTodo(message)))?;
        Ok::<(), StoreError>(())
    }))
}

/// Counts how often a listener fired
#[derive(Clone, Default)]
pub struct Calls(Arc<AtomicUsize>);

impl Calls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener(&self) -> impl Fn() + Send + Sync + 'static {
        let calls = self.0.clone();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}
