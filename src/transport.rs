//! Contracts the driver needs from the component that owns the physical connection.
//!
//! The crate ships one implementation over the `libsql` crate
//! ([`crate::client::LibsqlClient`]); anything else that can open sessions and run
//! statements can slot in by implementing these two traits.

use async_trait::async_trait;

use crate::error::Result;
use crate::results::RawResult;
use crate::types::Value;

/// How the client reaches the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportKind {
    /// Hrana over HTTP
    Http,
    /// Hrana over WebSocket
    WebSocket,
    /// In-process engine backed by a local file
    Embedded,
}

impl TransportKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TransportKind::Http => "http",
            TransportKind::WebSocket => "websocket",
            TransportKind::Embedded => "embedded",
        }
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owner of the physical connection. Must tolerate concurrent `open_session` calls.
#[async_trait]
pub trait TransportClient: Send + Sync {
    type Session: Session + 'static;

    fn kind(&self) -> TransportKind;

    /// Open a fresh logical connection scope (a Hrana stream, or a local connection).
    ///
    /// # Errors
    ///
    /// Returns the transport's failure unchanged.
    async fn open_session(&self) -> Result<Self::Session>;

    /// Close the client. Sessions opened afterwards must fail.
    ///
    /// # Errors
    ///
    /// Returns the transport's failure unchanged.
    async fn close(&self) -> Result<()>;
}

/// One logical connection scope; statements run in submission order.
#[async_trait]
pub trait Session: Send {
    /// Run one statement with positional parameters and collect its full result.
    ///
    /// # Errors
    ///
    /// Returns the transport's failure (network, SQL, constraint) unchanged.
    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<RawResult>;

    /// Close the session, releasing whatever the transport holds for it.
    ///
    /// # Errors
    ///
    /// Returns the transport's failure unchanged.
    async fn close(self) -> Result<()>
    where
        Self: Sized;
}
