use crate::config::LoggingConfig;
use crate::dispatcher::Dispatcher;
use crate::middleware::{DispatchWrapper, Middleware, MiddlewareApi};
use std::fmt::Debug;
use std::sync::Arc;

/// LoggingMiddleware - logs all actions passing through
pub struct LoggingMiddleware {
    config: Arc<LoggingConfig>,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self::with_config(LoggingConfig::default())
    }

    pub fn with_config(config: LoggingConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone + Debug + Send + 'static> Middleware<S> for LoggingMiddleware {
    fn wrap(&self, api: MiddlewareApi<S>) -> DispatchWrapper {
        let config = self.config.clone();
        Box::new(move |next: Dispatcher| {
            Dispatcher::new(move |action| {
                let type_name = action.type_name();
                if config.is_ignored(type_name) {
                    return next.dispatch(action);
                }

                log::log!(config.level, "Action: {}", type_name);
                let result = next.dispatch(action);

                match &result {
                    Ok(_) if config.log_state => match api.state() {
                        Ok(state) => log::log!(config.level, "State after {}: {:?}", type_name, state),
                        Err(e) => log::warn!("State unavailable after {}: {}", type_name, e),
                    },
                    Ok(_) => {}
                    Err(e) => log::log!(config.level, "Action {} failed: {}", type_name, e),
                }

                result
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::middleware::ApplyMiddleware;
    use crate::store::create_store_with;

    #[derive(Debug)]
    struct Increment;
    struct Tick;

    fn counter(state: &u32, action: &Action) -> anyhow::Result<u32> {
        Ok(if action.is::<Increment>() { state + 1 } else { *state })
    }

    #[test]
    fn test_logging_middleware_passes_actions_through() {
        let _ = env_logger::builder().is_test(true).try_init();

        let config = LoggingConfig {
            level: log::Level::Info,
            log_state: true,
            ignored_actions: vec![std::any::type_name::<Tick>().to_string()],
        };
        let store = create_store_with(
            counter,
            None,
            ApplyMiddleware::new().with(LoggingMiddleware::with_config(config)),
        )
        .unwrap();

        let action = store.dispatch(Action::new(Increment)).unwrap();
        assert!(action.is::<Increment>());
        store.dispatch(Action::new(Tick)).unwrap();

        assert_eq!(store.state().unwrap(), 1);
    }

    #[test]
    fn test_logging_middleware_propagates_errors() {
        let store = create_store_with(
            counter,
            None,
            ApplyMiddleware::new().with(LoggingMiddleware::new()),
        )
        .unwrap();

        let err = store.dispatch(Action::new(true)).unwrap_err();
        assert!(err.is_invalid_action());
    }
}
