//! Driver adapter that lets a SQL query builder run compiled statements and
//! transactions against libSQL, either a remote server speaking the Hrana protocol
//! or the embedded engine on a local file.
//!
//! The builder talks to [`Driver`] and [`DatabaseConnection`]. Each acquired
//! connection owns one transport session and at most one transaction, opened with
//! `BEGIN IMMEDIATE`. Results from every transport arrive as [`QueryResult`].
//!
//! ```rust,no_run
//! use libsql_dialect::prelude::*;
//!
//! # async fn run() -> Result<(), DialectError> {
//! let driver = LibsqlDialect::new(DialectConfig::url("file:books.db"))
//!     .create_driver()
//!     .await?;
//! let mut conn = driver.acquire_connection().await?;
//! driver.begin_transaction(&mut conn).await?;
//! let inserted = conn
//!     .execute_query(&CompiledQuery::new(
//!         "INSERT INTO book (title) VALUES (?) RETURNING id",
//!         vec!["Emma".into()],
//!     ))
//!     .await?;
//! driver.commit_transaction(&mut conn).await?;
//! driver.release_connection(conn).await?;
//! driver.destroy().await?;
//! # let _ = inserted;
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "libsql")]
pub mod client;
pub mod connection;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod prelude;
pub mod query;
pub mod results;
pub mod transport;
pub mod types;

#[cfg(feature = "libsql")]
pub use libsql;

#[cfg(feature = "libsql")]
pub use client::{LibsqlClient, LibsqlSession};
pub use connection::{DatabaseConnection, QueryStream, SessionConnection, TxState};
#[cfg(feature = "libsql")]
pub use dialect::{DialectConfig, LibsqlDialect, LibsqlDriver};
pub use driver::{ClientHandle, Driver, DriverState, SessionDriver};
pub use error::DialectError;
pub use query::CompiledQuery;
pub use results::{QueryResult, RawResult, Row, map_raw_result};
pub use transport::{Session, TransportClient, TransportKind};
pub use types::Value;
