//! Convenient imports for common functionality.

pub use crate::connection::{DatabaseConnection, SessionConnection};
pub use crate::driver::{Driver, SessionDriver};
pub use crate::error::DialectError;
pub use crate::query::CompiledQuery;
pub use crate::results::{QueryResult, Row};
pub use crate::transport::{Session, TransportClient, TransportKind};
pub use crate::types::Value;

#[cfg(feature = "libsql")]
pub use crate::client::LibsqlClient;
#[cfg(feature = "libsql")]
pub use crate::dialect::{DialectConfig, LibsqlDialect, LibsqlDriver};
