use redux_store::middleware::thunk::{AsyncThunk, Thunk};
use redux_store::{Action, MiddlewareApi, StoreError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: u32,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
}

impl TodoList {
    fn next_id(&self) -> u32 {
        self.todos.iter().map(|todo| todo.id).max().map_or(1, |max| max + 1)
    }
}

/// Add a todo to the end of the list
#[derive(Debug)]
pub struct AddTodo(pub String);

/// Remove the todo with the given id
#[derive(Debug)]
pub struct RemoveTodo(pub u32);

pub fn reduce(state: &TodoList, action: &Action) -> anyhow::Result<TodoList> {
    let mut next = state.clone();

    if let Some(AddTodo(message)) = action.downcast_ref::<AddTodo>() {
        if message.trim().is_empty() {
            anyhow::bail!("Todo message must not be empty");
        }
        next.todos.push(Todo {
            id: state.next_id(),
            message: message.clone(),
        });
    } else if let Some(RemoveTodo(id)) = action.downcast_ref::<RemoveTodo>() {
        next.todos.retain(|todo| todo.id != *id);
    }

    Ok(next)
}

/// Adds the todo only when the list is still empty
pub fn add_todo_if_empty(message: String) -> Action {
    Action::new(Thunk::new(move |api: &MiddlewareApi<TodoList>| {
        if api.state()?.todos.is_empty() {
            api.dispatch(Action::new(AddTodo(message)))
        } else {
            log::debug!("List not empty, skipping {:?}", message);
            Ok(Action::new(AddTodo(message)))
        }
    }))
}

/// Adds the todo from a spawned task
pub fn add_todo_later(message: String) -> Action {
    Action::new(AsyncThunk::new(move |api: MiddlewareApi<TodoList>| async move {
        tokio::task::yield_now().await;
        api.dispatch(Action::new(AddTodo(message)))?;
        Ok::<(), StoreError>(())
    }))
}
