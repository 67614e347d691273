//! Error types for the session store

/// Result type alias for session store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors returned by [`SessionStore`](crate::SessionStore)
///
/// Transport failures never show up here: the poll cycle absorbs them and
/// consumers simply keep the last known state.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// `initialize` was called a second time
    #[error("session store is already initialized")]
    AlreadyInitialized,

    /// An operation needing the default session ran before `initialize`
    #[error("session store is not initialized")]
    NotInitialized,

    /// The requested session id is not in the store
    #[error("unknown session: {0}")]
    UnknownSession(String),

    /// The store was built outside of a tokio runtime
    #[error("no tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}
