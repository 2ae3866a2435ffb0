use async_trait::async_trait;
use tracing::trace;

use crate::client::params::Params;
use crate::client::query::build_rows;
use crate::client::statement::{StatementKind, StatementShape};
use crate::error::Result;
use crate::results::RawResult;
use crate::transport::{Session, TransportKind};
use crate::types::Value;

/// One `libsql::Connection`: a local SQLite connection or a remote Hrana stream.
pub struct LibsqlSession {
    conn: libsql::Connection,
    kind: TransportKind,
}

impl LibsqlSession {
    #[must_use]
    pub fn new(conn: libsql::Connection, kind: TransportKind) -> Self {
        Self { conn, kind }
    }

    /// The underlying connection, for engine-specific calls.
    #[must_use]
    pub fn connection(&self) -> &libsql::Connection {
        &self.conn
    }
}

impl std::fmt::Debug for LibsqlSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LibsqlSession")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Session for LibsqlSession {
    /// Run one statement.
    ///
    /// The affected-row count is the statement's own count (`sqlite3_changes` locally,
    /// `affected_row_count` over Hrana), so trigger side effects are not included. Reads,
    /// DDL and transaction control report 0. `last_insert_rowid` is only reported for an
    /// `INSERT`/`REPLACE` that changed rows.
    async fn execute(&mut self, sql: &str, params: &[Value]) -> Result<RawResult> {
        let shape = StatementShape::of(sql);
        let params = Params::convert(params).into_vec();
        let inserts = shape.kind == StatementKind::Insert;

        if shape.is_plain_dml() {
            let rows_affected = self.conn.execute(sql, params).await?;
            let last_insert_rowid =
                (inserts && rows_affected > 0).then(|| self.conn.last_insert_rowid());
            trace!(rows_affected, "statement executed");
            return Ok(RawResult::Execution {
                rows_affected,
                last_insert_rowid,
                rows: Vec::new(),
            });
        }

        let rows = build_rows(self.conn.query(sql, params).await?).await?;
        if !shape.returning {
            return Ok(RawResult::Execution {
                rows_affected: 0,
                last_insert_rowid: None,
                rows,
            });
        }

        // Both engines settle the count once the rows are drained.
        let rows_affected = self.conn.changes();
        // The Hrana cursor does not carry the rowid back to the connection.
        let last_insert_rowid = (inserts
            && rows_affected > 0
            && self.kind == TransportKind::Embedded)
            .then(|| self.conn.last_insert_rowid());
        trace!(rows_affected, returned = rows.len(), "statement executed");
        Ok(RawResult::Execution {
            rows_affected,
            last_insert_rowid,
            rows,
        })
    }

    async fn close(self) -> Result<()> {
        drop(self.conn);
        Ok(())
    }
}
