use thiserror::Error;

#[derive(Debug, Error)]
pub enum DialectError {
    #[cfg(feature = "libsql")]
    #[error(transparent)]
    Libsql(#[from] libsql::Error),

    /// Failure raised by a non-libSQL transport, passed through as-is.
    #[error(transparent)]
    Transport(Box<dyn std::error::Error + Send + Sync>),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transaction state error: {0}")]
    TransactionState(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Driver has been destroyed")]
    DriverDestroyed,

    #[error("Transport client is closed")]
    ClientClosed,

    #[error("Session is closed")]
    SessionClosed,
}

impl DialectError {
    /// Wrap an error produced by a custom [`crate::transport::TransportClient`].
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        DialectError::Transport(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, DialectError>;
