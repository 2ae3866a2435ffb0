use std::sync::Arc;

use crate::client::params::from_libsql_value;
use crate::error::{DialectError, Result};
use crate::results::Row;

/// Drain `libsql::Rows` into owned rows sharing one column-name vector.
///
/// # Errors
///
/// Returns the libsql error from stepping the statement or reading a cell.
pub async fn build_rows(mut rows: libsql::Rows) -> Result<Vec<Row>> {
    let column_count = rows.column_count();
    let width = usize::try_from(column_count).map_err(DialectError::transport)?;

    let mut column_names = Vec::with_capacity(width);
    for i in 0..column_count {
        if let Some(name) = rows.column_name(i) {
            column_names.push(name.to_string());
        } else {
            column_names.push(format!("column_{i}"));
        }
    }
    let column_names = Arc::new(column_names);

    let mut out = Vec::new();
    while let Some(row) = rows.next().await? {
        let mut values = Vec::with_capacity(width);
        for i in 0..column_count {
            values.push(from_libsql_value(row.get_value(i)?));
        }
        out.push(Row::new(Arc::clone(&column_names), values));
    }

    Ok(out)
}
