//! Standard SQLite dialect components handed out by the dialect facade.

use crate::connection::DatabaseConnection;
use crate::driver::Driver;
use crate::error::Result;
use crate::query::CompiledQuery;
use crate::types::Value;

/// Engine capabilities the query builder consults.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteAdapter;

impl SqliteAdapter {
    /// DDL inside a transaction is not relied upon for SQLite migrations.
    #[must_use]
    pub fn supports_transactional_ddl(&self) -> bool {
        false
    }

    #[must_use]
    pub fn supports_returning(&self) -> bool {
        true
    }

    #[must_use]
    pub fn supports_create_if_not_exists(&self) -> bool {
        true
    }
}

/// Lexical rules for SQL emitted against SQLite.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteQueryCompiler;

impl SqliteQueryCompiler {
    /// Positional placeholder; SQLite binds `?` in order.
    #[must_use]
    pub fn placeholder(&self, _index: usize) -> &'static str {
        "?"
    }

    /// Quote an identifier, doubling embedded quotes.
    #[must_use]
    pub fn quote_identifier(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    #[must_use]
    pub fn default_insert_values(&self) -> &'static str {
        "default values"
    }

    pub fn compile(&self, sql: impl Into<String>, parameters: Vec<Value>) -> CompiledQuery {
        CompiledQuery::new(sql, parameters)
    }
}

/// A column as reported by `pragma_table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub has_default_value: bool,
    pub is_primary_key: bool,
}

/// A user table or view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetadata {
    pub name: String,
    pub is_view: bool,
    pub columns: Vec<ColumnMetadata>,
}

const TABLES_SQL: &str = "SELECT name, type FROM sqlite_master \
     WHERE type IN ('table', 'view') AND name NOT LIKE 'sqlite_%' ORDER BY name";
const COLUMNS_SQL: &str = "SELECT name, type, \"notnull\", dflt_value, pk \
     FROM pragma_table_info(?) ORDER BY cid";

/// Reads schema metadata through a connection borrowed from the driver.
#[derive(Debug)]
pub struct SqliteIntrospector<'d, D: Driver> {
    driver: &'d D,
}

impl<'d, D: Driver> SqliteIntrospector<'d, D> {
    #[must_use]
    pub fn new(driver: &'d D) -> Self {
        Self { driver }
    }

    /// All user tables and views with their columns, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns the driver's or transport's failure.
    pub async fn get_tables(&self) -> Result<Vec<TableMetadata>> {
        let mut conn = self.driver.acquire_connection().await?;
        let tables = read_tables(&mut conn).await;
        let released = self.driver.release_connection(conn).await;
        let tables = tables?;
        released?;
        Ok(tables)
    }
}

async fn read_tables<C: DatabaseConnection>(conn: &mut C) -> Result<Vec<TableMetadata>> {
    let listed = conn.execute_query(&CompiledQuery::raw(TABLES_SQL)).await?;
    let mut tables = Vec::with_capacity(listed.rows.len());
    for row in &listed.rows {
        let Some(name) = row.get("name").and_then(Value::as_text) else {
            continue;
        };
        let is_view = row.get("type").and_then(Value::as_text) == Some("view");

        let info = conn
            .execute_query(&CompiledQuery::new(
                COLUMNS_SQL,
                vec![Value::Text(name.to_string())],
            ))
            .await?;
        let columns = info
            .rows
            .iter()
            .map(|col| ColumnMetadata {
                name: col
                    .get("name")
                    .and_then(Value::as_text)
                    .unwrap_or_default()
                    .to_string(),
                data_type: col
                    .get("type")
                    .and_then(Value::as_text)
                    .unwrap_or_default()
                    .to_string(),
                is_nullable: col.get("notnull").and_then(Value::as_integer) == Some(0),
                has_default_value: col.get("dflt_value").is_some_and(|v| !v.is_null()),
                is_primary_key: col.get("pk").and_then(Value::as_integer).unwrap_or(0) > 0,
            })
            .collect();

        tables.push(TableMetadata {
            name: name.to_string(),
            is_view,
            columns,
        });
    }
    Ok(tables)
}
