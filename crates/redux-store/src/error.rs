//! Error types raised by the store

use thiserror::Error;

/// Errors that can occur while dispatching, reading state or building a store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The dispatched value is absent or a primitive scalar/text value.
    #[error("Actions must be structured values, got `{type_name}`")]
    InvalidAction { type_name: &'static str },

    /// The operation is not allowed in the store's current state
    /// (e.g. dispatching from within a reducer).
    #[error("Illegal state: {0}")]
    IllegalState(&'static str),

    /// The reducer failed; the committed state was left untouched.
    #[error("Reducer failed: {0}")]
    Reducer(#[source] anyhow::Error),

    /// A middleware failed while handling an action.
    #[error("Middleware failed: {0}")]
    Middleware(#[source] anyhow::Error),
}

impl StoreError {
    /// Convert a reducer failure into a store error.
    ///
    /// A reducer that bubbles up a `StoreError` (for example the
    /// `IllegalState` of a nested dispatch) surfaces that error as-is.
    pub(crate) fn from_reducer(err: anyhow::Error) -> Self {
        match err.downcast::<StoreError>() {
            Ok(store_err) => store_err,
            Err(other) => StoreError::Reducer(other),
        }
    }

    /// Returns true for [`StoreError::IllegalState`]
    pub fn is_illegal_state(&self) -> bool {
        matches!(self, StoreError::IllegalState(_))
    }

    /// Returns true for [`StoreError::InvalidAction`]
    pub fn is_invalid_action(&self) -> bool {
        matches!(self, StoreError::InvalidAction { .. })
    }
}

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
