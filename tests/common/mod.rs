//! Scripted in-memory transport for exercising the driver without a database.

#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use libsql_dialect::{DialectError, RawResult, Row, Session, TransportClient, TransportKind, Value};

#[derive(Debug, thiserror::Error)]
#[error("scripted failure for {0}")]
pub struct ScriptedError(pub String);

#[derive(Debug, Default)]
pub struct Shared {
    pub sessions_opened: usize,
    pub sessions_closed: usize,
    pub client_closes: usize,
    pub closed: bool,
    /// `(session id, sql)` in execution order
    pub log: Vec<(usize, String)>,
    /// Statements that fail with [`ScriptedError`]
    pub failing: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryClient {
    shared: Arc<Mutex<Shared>>,
}

impl MemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().expect("memory client lock")
    }

    pub fn fail_on(&self, sql: &str) {
        self.state().failing.push(sql.to_string());
    }

    pub fn statements(&self) -> Vec<String> {
        self.state().log.iter().map(|(_, sql)| sql.clone()).collect()
    }
}

#[async_trait]
impl TransportClient for MemoryClient {
    type Session = MemorySession;

    fn kind(&self) -> TransportKind {
        TransportKind::WebSocket
    }

    async fn open_session(&self) -> Result<MemorySession, DialectError> {
        let mut state = self.state();
        if state.closed {
            return Err(DialectError::ClientClosed);
        }
        state.sessions_opened += 1;
        Ok(MemorySession {
            id: state.sessions_opened,
            shared: Arc::clone(&self.shared),
        })
    }

    async fn close(&self) -> Result<(), DialectError> {
        let mut state = self.state();
        state.closed = true;
        state.client_closes += 1;
        Ok(())
    }
}

#[derive(Debug)]
pub struct MemorySession {
    pub id: usize,
    shared: Arc<Mutex<Shared>>,
}

#[async_trait]
impl Session for MemorySession {
    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<RawResult, DialectError> {
        let mut state = self.shared.lock().expect("memory client lock");
        if state.failing.iter().any(|f| f == sql) {
            return Err(DialectError::transport(ScriptedError(sql.to_string())));
        }
        state.log.push((self.id, sql.to_string()));
        // Echo parameters back as one row so callers can see what was bound.
        let columns = Arc::new((0..params.len()).map(|i| format!("p{i}")).collect::<Vec<_>>());
        let rows = if params.is_empty() {
            Vec::new()
        } else {
            vec![Row::new(columns, params.to_vec())]
        };
        Ok(RawResult::Rows {
            affected_row_count: u64::from(sql.starts_with("INSERT")),
            rows,
        })
    }

    async fn close(self) -> Result<(), DialectError> {
        self.shared.lock().expect("memory client lock").sessions_closed += 1;
        Ok(())
    }
}
