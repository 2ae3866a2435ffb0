use crate::types::Value;

/// A compiled statement handed over by the query builder.
///
/// The SQL text is final; positional `?` placeholders bind to `parameters` in order.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// The SQL text
    pub sql: String,
    /// The parameters to be bound to the statement
    pub parameters: Vec<Value>,
}

impl CompiledQuery {
    /// Create a new `CompiledQuery` with the given SQL text and parameters
    pub fn new(sql: impl Into<String>, parameters: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            parameters,
        }
    }

    /// Create a new `CompiledQuery` with no parameters
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            parameters: Vec::new(),
        }
    }
}
