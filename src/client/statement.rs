/// What a statement does to the database, judged by its top-level keywords.
///
/// Quoted text, comments and parenthesised sub-expressions (CTE bodies, sub-selects) are
/// skipped, so `WITH x AS (SELECT ...) INSERT ...` classifies as an insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementShape {
    pub kind: StatementKind,
    /// `RETURNING` appears at the top level.
    pub returning: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// `SELECT`, `VALUES`, `PRAGMA`, `EXPLAIN`.
    Read,
    /// `INSERT` or `REPLACE`.
    Insert,
    /// `UPDATE` or `DELETE`.
    Write,
    /// DDL, transaction control and anything unrecognised.
    Other,
}

impl StatementShape {
    #[must_use]
    pub fn of(sql: &str) -> Self {
        let words = top_level_words(sql);
        let mut iter = words.iter().map(String::as_str);
        let main = match iter.next() {
            Some("WITH") => iter.find(|w| {
                matches!(
                    *w,
                    "SELECT" | "VALUES" | "INSERT" | "REPLACE" | "UPDATE" | "DELETE"
                )
            }),
            first => first,
        };
        let kind = match main {
            Some("SELECT" | "VALUES" | "PRAGMA" | "EXPLAIN") => StatementKind::Read,
            Some("INSERT" | "REPLACE") => StatementKind::Insert,
            Some("UPDATE" | "DELETE") => StatementKind::Write,
            _ => StatementKind::Other,
        };
        let returning = matches!(kind, StatementKind::Insert | StatementKind::Write)
            && words.iter().any(|w| w == "RETURNING");
        Self { kind, returning }
    }

    /// The statement changes rows and reports nothing back, so the engine's own
    /// per-statement count can be taken from a plain execute.
    #[must_use]
    pub fn is_plain_dml(&self) -> bool {
        matches!(self.kind, StatementKind::Insert | StatementKind::Write) && !self.returning
    }
}

/// Upper-cased bare words at parenthesis depth zero, outside literals and comments.
fn top_level_words(sql: &str) -> Vec<String> {
    let bytes = sql.as_bytes();
    let mut words = Vec::new();
    let mut depth = 0usize;
    let mut idx = 0;

    while idx < bytes.len() {
        let b = bytes[idx];
        match b {
            b'-' if bytes.get(idx + 1) == Some(&b'-') => {
                while idx < bytes.len() && bytes[idx] != b'\n' {
                    idx += 1;
                }
            }
            b'/' if bytes.get(idx + 1) == Some(&b'*') => {
                idx += 2;
                while idx < bytes.len()
                    && !(bytes[idx] == b'*' && bytes.get(idx + 1) == Some(&b'/'))
                {
                    idx += 1;
                }
                idx += 2;
            }
            b'\'' | b'"' | b'`' => idx = skip_quoted(bytes, idx, b),
            b'[' => idx = skip_quoted(bytes, idx, b']'),
            b'(' => {
                depth += 1;
                idx += 1;
            }
            b')' => {
                depth = depth.saturating_sub(1);
                idx += 1;
            }
            _ if b.is_ascii_alphabetic() || b == b'_' => {
                let start = idx;
                while idx < bytes.len() && (bytes[idx].is_ascii_alphanumeric() || bytes[idx] == b'_')
                {
                    idx += 1;
                }
                if depth == 0 {
                    words.push(sql[start..idx].to_ascii_uppercase());
                }
            }
            _ => idx += 1,
        }
    }

    words
}

/// Index just past the closing `close` of a literal opened at `start`. Doubled closers
/// are escapes.
fn skip_quoted(bytes: &[u8], start: usize, close: u8) -> usize {
    let mut idx = start + 1;
    while idx < bytes.len() {
        if bytes[idx] == close {
            if close != b']' && bytes.get(idx + 1) == Some(&close) {
                idx += 2;
                continue;
            }
            return idx + 1;
        }
        idx += 1;
    }
    idx
}
