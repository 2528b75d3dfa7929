//! Middleware applied through the enhancer protocol, with the thunk
//! middleware driving sync and async dispatches.

mod harness;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use redux_store::enhancer::Chain;
use redux_store::middleware::logging::LoggingMiddleware;
use redux_store::middleware::thunk::{ThunkHandle, ThunkMiddleware};
use redux_store::middleware::{self, DispatchWrapper};
use redux_store::{
    create_store_with, Action, ApplyMiddleware, Dispatcher, Middleware, MiddlewareApi, Store,
};

use harness::{add_todo_async, add_todo_if_empty, todos, AddTodo, Calls, Todo, Todos};

/// Counts how often `wrap` is called
struct WrapSpy {
    wraps: Arc<AtomicUsize>,
}

impl Middleware<Todos> for WrapSpy {
    fn wrap(&self, _api: MiddlewareApi<Todos>) -> DispatchWrapper {
        self.wraps.fetch_add(1, Ordering::SeqCst);
        Box::new(|next| next)
    }
}

/// Counts every action that reaches it
fn action_spy(calls: &Calls) -> impl Middleware<Todos> {
    let calls = calls.clone();
    middleware::from_fn(move |_api: &MiddlewareApi<Todos>, next: &Dispatcher, action| {
        calls.hit();
        next.dispatch(action)
    })
}

fn thunk_store() -> Store<Todos> {
    create_store_with(todos, None, ApplyMiddleware::new().with(ThunkMiddleware::new())).unwrap()
}

async fn run_async(store: &Store<Todos>, action: Action) {
    let action = store.dispatch(action).unwrap();
    let handle = action
        .downcast::<ThunkHandle>()
        .unwrap_or_else(|action| panic!("expected a thunk handle, got {action:?}"));
    handle.await.unwrap().unwrap();
}

#[test]
fn test_wraps_dispatch_with_middleware_once() {
    let wraps = Arc::new(AtomicUsize::new(0));
    let store = create_store_with(
        todos,
        None,
        ApplyMiddleware::new()
            .with(WrapSpy {
                wraps: wraps.clone(),
            })
            .with(ThunkMiddleware::new()),
    )
    .unwrap();

    store.dispatch(AddTodo::action("Use Redux")).unwrap();
    store.dispatch(AddTodo::action("Flux FTW!")).unwrap();

    assert_eq!(wraps.load(Ordering::SeqCst), 1);
    assert_eq!(
        store.state().unwrap(),
        vec![Todo::new(1, "Use Redux"), Todo::new(2, "Flux FTW!")]
    );
}

#[tokio::test]
async fn test_passes_recursive_dispatches_through_the_chain() {
    let calls = Calls::new();
    let store = create_store_with(
        todos,
        None,
        ApplyMiddleware::new()
            .with(action_spy(&calls))
            .with(ThunkMiddleware::new()),
    )
    .unwrap();

    run_async(&store, add_todo_async("Use Redux")).await;

    // The thunk itself and the AddTodo it dispatched
    assert_eq!(calls.count(), 2);
    assert_eq!(store.state().unwrap(), vec![Todo::new(1, "Use Redux")]);
}

#[tokio::test]
async fn test_works_with_thunk_middleware() {
    let store = thunk_store();

    store.dispatch(add_todo_if_empty("Hello")).unwrap();
    assert_eq!(store.state().unwrap(), vec![Todo::new(1, "Hello")]);

    store.dispatch(add_todo_if_empty("Hello")).unwrap();
    assert_eq!(store.state().unwrap(), vec![Todo::new(1, "Hello")]);

    store.dispatch(AddTodo::action("World")).unwrap();
    assert_eq!(
        store.state().unwrap(),
        vec![Todo::new(1, "Hello"), Todo::new(2, "World")]
    );

    run_async(&store, add_todo_async("Maybe")).await;
    assert_eq!(
        store.state().unwrap(),
        vec![
            Todo::new(1, "Hello"),
            Todo::new(2, "World"),
            Todo::new(3, "Maybe"),
        ]
    );
}

#[test]
fn test_middleware_does_not_affect_subscriptions() {
    let store = thunk_store();
    let calls = Calls::new();
    store.subscribe(calls.listener());

    store.dispatch(add_todo_if_empty("Hello")).unwrap();
    store.dispatch(add_todo_if_empty("Hello")).unwrap();

    // Only the first thunk reached the reducer
    assert_eq!(calls.count(), 1);
    assert_eq!(store.listener_count(), 1);
}

#[test]
fn test_replace_reducer_passes_through_middleware_store() {
    let calls = Calls::new();
    let store = create_store_with(todos, None, ApplyMiddleware::new().with(action_spy(&calls)))
        .unwrap();
    store.dispatch(AddTodo::action("Hello")).unwrap();

    store.replace_reducer(harness::todos_reverse).unwrap();
    store.dispatch(AddTodo::action("World")).unwrap();

    // Init from replace_reducer goes to the inner store directly
    assert_eq!(calls.count(), 2);
    assert_eq!(
        store.state().unwrap(),
        vec![Todo::new(2, "World"), Todo::new(1, "Hello")]
    );
}

#[test]
fn test_chained_enhancers_run_outer_first() {
    let outer = Calls::new();
    let inner = Calls::new();
    let enhancer = Chain::new(
        ApplyMiddleware::new().with(action_spy(&outer)),
        ApplyMiddleware::new().with(action_spy(&inner)),
    );

    let store = create_store_with(todos, None, enhancer).unwrap();
    store.dispatch(AddTodo::action("Hello")).unwrap();

    assert_eq!((outer.count(), inner.count()), (1, 1));
    assert_eq!(store.state().unwrap(), vec![Todo::new(1, "Hello")]);
}

#[test]
fn test_logging_and_thunk_together() {
    let _ = env_logger::builder().is_test(true).try_init();

    let store = create_store_with(
        todos,
        None,
        ApplyMiddleware::new()
            .with(LoggingMiddleware::new())
            .with(ThunkMiddleware::new()),
    )
    .unwrap();

    store.dispatch(add_todo_if_empty("Hello")).unwrap();
    assert_eq!(store.state().unwrap(), vec![Todo::new(1, "Hello")]);
}

#[test]
fn test_rejected_actions_fail_through_middleware() {
    let calls = Calls::new();
    let store = create_store_with(todos, None, ApplyMiddleware::new().with(action_spy(&calls)))
        .unwrap();

    let err = store.dispatch(Action::new(42u32)).unwrap_err();

    assert!(err.is_invalid_action());
    assert_eq!(calls.count(), 1);
}
