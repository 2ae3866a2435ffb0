//! Canonical result shapes returned to the query builder.
//!
//! - `row`: ordered key/value records passed through from the transport
//! - `mapper`: folds the transport's raw result shapes into [`QueryResult`]

pub mod mapper;
pub mod row;

pub use mapper::{QueryResult, RawResult, map_raw_result};
pub use row::Row;
