//! libSQL transport (embedded or remote over Hrana).
//!
//! - `connect`: the client that owns the `libsql::Database`
//! - `session`: one `libsql::Connection` per acquired driver connection
//! - `params`: binding of [`crate::Value`] parameters
//! - `query`: collecting `libsql::Rows` into [`crate::Row`]s
//! - `statement`: keyword classification deciding how a statement reports changes

pub mod connect;
pub mod params;
pub mod query;
pub mod session;
pub mod statement;

pub use connect::LibsqlClient;
pub use params::Params;
pub use query::build_rows;
pub use session::LibsqlSession;
pub use statement::{StatementKind, StatementShape};
