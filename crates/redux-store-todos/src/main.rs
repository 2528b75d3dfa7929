use clap::Parser;
use redux_store::middleware::logging::LoggingMiddleware;
use redux_store::middleware::thunk::{ThunkHandle, ThunkMiddleware};
use redux_store::{create_store_with, Action, ApplyMiddleware, LoggingConfig};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

mod todos;

use todos::{AddTodo, RemoveTodo, TodoList};

#[derive(Parser, Debug)]
#[command(name = "redux-todos")]
#[command(about = "Build a todo list by dispatching actions through a redux store")]
#[command(version)]
struct Cli {
    /// Todo messages to add, in order
    messages: Vec<String>,

    /// Logging middleware config (defaults to .redux-store.toml in CWD or $HOME)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Add the first message only if the list is still empty
    #[arg(long)]
    if_empty: bool,

    /// Add each message from a spawned task
    #[arg(long)]
    deferred: bool,

    /// Remove the todo with this id after adding
    #[arg(long)]
    remove: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LoggingConfig::load_from(path)?,
        None => LoggingConfig::load(),
    };

    let store = create_store_with(
        todos::reduce,
        None,
        ApplyMiddleware::new()
            .with(LoggingMiddleware::with_config(config))
            .with(ThunkMiddleware::new()),
    )?;

    let changes = Arc::new(AtomicUsize::new(0));
    let counter = changes.clone();
    let unsubscribe = store.subscribe(move || {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    let mut messages = cli.messages.into_iter();
    if cli.if_empty {
        if let Some(first) = messages.next() {
            store.dispatch(todos::add_todo_if_empty(first))?;
        }
    }

    for message in messages {
        if cli.deferred {
            let action = store.dispatch(todos::add_todo_later(message))?;
            if let Ok(handle) = action.downcast::<ThunkHandle>() {
                handle.await??;
            }
        } else {
            store.dispatch(Action::new(AddTodo(message)))?;
        }
    }

    if let Some(id) = cli.remove {
        store.dispatch(Action::new(RemoveTodo(id)))?;
    }

    unsubscribe.unsubscribe();
    log::info!("State changed {} time(s)", changes.load(Ordering::Relaxed));

    let state: TodoList = store.state()?;
    println!("{}", serde_json::to_string_pretty(&state)?);

    Ok(())
}
