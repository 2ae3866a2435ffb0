use std::time::Instant;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use tracing::{debug, trace, warn};

use crate::error::{DialectError, Result};
use crate::query::CompiledQuery;
use crate::results::{QueryResult, map_raw_result};
use crate::transport::Session;

/// Statement used to open every transaction.
///
/// `IMMEDIATE` takes the write lock up front so a write transaction cannot start as a
/// deferred reader and fail with `SQLITE_BUSY` on its first write.
pub const BEGIN_STATEMENT: &str = "BEGIN IMMEDIATE";
pub const COMMIT_STATEMENT: &str = "COMMIT";
pub const ROLLBACK_STATEMENT: &str = "ROLLBACK";

/// Incremental result delivery. Never produced; see [`DatabaseConnection::stream_query`].
pub type QueryStream = BoxStream<'static, Result<QueryResult>>;

/// Per-connection contract consumed by the query builder.
#[async_trait]
pub trait DatabaseConnection: Send {
    /// Execute a compiled statement and return its canonical result.
    ///
    /// # Errors
    ///
    /// Returns the transport's failure unchanged.
    async fn execute_query(&mut self, query: &CompiledQuery) -> Result<QueryResult>;

    /// Incrementally stream a result.
    ///
    /// # Errors
    ///
    /// Always fails with [`DialectError::UnsupportedOperation`]: the wire protocol has
    /// no incremental row delivery and buffering behind a stream would hide that.
    async fn stream_query(
        &mut self,
        query: &CompiledQuery,
        chunk_size: usize,
    ) -> Result<QueryStream>;
}

/// An open transaction on one session.
#[derive(Debug)]
pub struct ActiveTransaction {
    started_at: Instant,
    statements: u64,
}

impl ActiveTransaction {
    fn begin() -> Self {
        Self {
            started_at: Instant::now(),
            statements: 0,
        }
    }

    /// Statements executed inside this transaction so far.
    #[must_use]
    pub fn statements(&self) -> u64 {
        self.statements
    }
}

/// Transaction slot of a [`SessionConnection`].
#[derive(Debug, Default)]
pub enum TxState {
    #[default]
    Idle,
    InTransaction(ActiveTransaction),
}

/// Adapts one transport session to [`DatabaseConnection`].
///
/// Owns its session exclusively and tracks at most one transaction.
pub struct SessionConnection<S: Session> {
    // `None` only once `release` has taken the session.
    session: Option<S>,
    tx: TxState,
}

impl<S: Session> std::fmt::Debug for SessionConnection<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConnection")
            .field("open", &self.session.is_some())
            .field("tx", &self.tx)
            .finish()
    }
}

impl<S: Session> SessionConnection<S> {
    #[must_use]
    pub fn new(session: S) -> Self {
        Self {
            session: Some(session),
            tx: TxState::Idle,
        }
    }

    #[must_use]
    pub fn in_transaction(&self) -> bool {
        matches!(self.tx, TxState::InTransaction(_))
    }

    #[must_use]
    pub fn transaction(&self) -> Option<&ActiveTransaction> {
        match &self.tx {
            TxState::InTransaction(tx) => Some(tx),
            TxState::Idle => None,
        }
    }

    fn session_mut(&mut self) -> Result<&mut S> {
        self.session.as_mut().ok_or(DialectError::SessionClosed)
    }

    /// Open a transaction with [`BEGIN_STATEMENT`].
    ///
    /// # Errors
    ///
    /// [`DialectError::TransactionState`] if a transaction is already open; transport
    /// failures otherwise. The state is unchanged on error.
    pub async fn begin_transaction(&mut self) -> Result<()> {
        if let TxState::InTransaction(_) = self.tx {
            return Err(DialectError::TransactionState(
                "a transaction is already active on this connection".to_string(),
            ));
        }
        self.session_mut()?.execute(BEGIN_STATEMENT, &[]).await?;
        self.tx = TxState::InTransaction(ActiveTransaction::begin());
        debug!("transaction started");
        Ok(())
    }

    /// Commit the open transaction.
    ///
    /// # Errors
    ///
    /// [`DialectError::TransactionState`] if no transaction is open; transport failures
    /// otherwise. The transaction stays recorded as open when the COMMIT fails.
    pub async fn commit_transaction(&mut self) -> Result<()> {
        self.finish_transaction(COMMIT_STATEMENT).await
    }

    /// Roll back the open transaction.
    ///
    /// # Errors
    ///
    /// [`DialectError::TransactionState`] if no transaction is open; transport failures
    /// otherwise. The transaction stays recorded as open when the ROLLBACK fails.
    pub async fn rollback_transaction(&mut self) -> Result<()> {
        self.finish_transaction(ROLLBACK_STATEMENT).await
    }

    async fn finish_transaction(&mut self, statement: &'static str) -> Result<()> {
        let TxState::InTransaction(_) = self.tx else {
            return Err(DialectError::TransactionState(format!(
                "cannot {} without an active transaction",
                statement.to_lowercase()
            )));
        };
        self.session_mut()?.execute(statement, &[]).await?;
        if let TxState::InTransaction(tx) = std::mem::take(&mut self.tx) {
            debug!(
                statement,
                statements = tx.statements,
                elapsed = ?tx.started_at.elapsed(),
                "transaction finished"
            );
        }
        Ok(())
    }

    /// Close the session and consume the wrapper.
    ///
    /// # Errors
    ///
    /// Returns the transport's failure to close the session.
    pub async fn release(mut self) -> Result<()> {
        if self.in_transaction() {
            warn!("releasing connection with an open transaction; the engine discards it");
        }
        self.tx = TxState::Idle;
        match self.session.take() {
            Some(session) => session.close().await,
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<S: Session> DatabaseConnection for SessionConnection<S> {
    async fn execute_query(&mut self, query: &CompiledQuery) -> Result<QueryResult> {
        trace!(
            sql = %query.sql,
            params = query.parameters.len(),
            in_transaction = self.in_transaction(),
            "executing statement"
        );
        let session = self.session.as_mut().ok_or(DialectError::SessionClosed)?;
        let raw = session.execute(&query.sql, &query.parameters).await?;
        if let TxState::InTransaction(tx) = &mut self.tx {
            tx.statements += 1;
        }
        Ok(map_raw_result(raw))
    }

    async fn stream_query(
        &mut self,
        _query: &CompiledQuery,
        _chunk_size: usize,
    ) -> Result<QueryStream> {
        Err(DialectError::UnsupportedOperation(
            "the Hrana protocol does not support streaming results".to_string(),
        ))
    }
}

impl<S: Session> Drop for SessionConnection<S> {
    fn drop(&mut self) {
        if self.session.is_some() && self.in_transaction() {
            warn!("connection dropped with an open transaction; the engine discards it");
        }
    }
}
