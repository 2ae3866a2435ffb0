use serde::Serialize;

use super::row::Row;

/// Result record as produced by a transport session.
///
/// Transports disagree on field naming; both shapes seen in practice are accepted
/// and folded into [`QueryResult`] by [`map_raw_result`].
#[derive(Debug, Clone, PartialEq)]
pub enum RawResult {
    /// `{ affectedRowCount, rows }`, as returned by Hrana stream queries.
    Rows {
        affected_row_count: u64,
        rows: Vec<Row>,
    },
    /// `{ rowsAffected, lastInsertRowid, rows }`, as returned by direct SDK execution.
    Execution {
        rows_affected: u64,
        last_insert_rowid: Option<i64>,
        rows: Vec<Row>,
    },
}

/// Canonical result returned for every executed statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    /// Rows returned by the statement, in transport order
    pub rows: Vec<Row>,
    /// Rows inserted, updated or deleted by the statement
    pub num_affected_rows: u64,
    /// Rowid of the last inserted row, when the transport reports one
    pub insert_id: Option<i64>,
}

impl QueryResult {
    /// First row, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }
}

/// Normalize a transport result. Row contents pass through untouched.
#[must_use]
pub fn map_raw_result(raw: RawResult) -> QueryResult {
    match raw {
        RawResult::Rows {
            affected_row_count,
            rows,
        } => QueryResult {
            rows,
            num_affected_rows: affected_row_count,
            insert_id: None,
        },
        RawResult::Execution {
            rows_affected,
            last_insert_rowid,
            rows,
        } => QueryResult {
            rows,
            num_affected_rows: rows_affected,
            insert_id: last_insert_rowid,
        },
    }
}
