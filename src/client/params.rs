use crate::types::Value;

/// Container for libsql parameters
pub struct Params(pub Vec<libsql::Value>);

impl Params {
    /// Convert from a slice of `Value` to libsql parameters
    #[must_use]
    pub fn convert(params: &[Value]) -> Params {
        Params(params.iter().map(to_libsql_value).collect())
    }

    /// Convert to owned vector for use with libsql API
    #[must_use]
    pub fn into_vec(self) -> Vec<libsql::Value> {
        self.0
    }
}

fn to_libsql_value(value: &Value) -> libsql::Value {
    match value {
        Value::Null => libsql::Value::Null,
        Value::Integer(i) => libsql::Value::Integer(*i),
        Value::Real(f) => libsql::Value::Real(*f),
        Value::Text(s) => libsql::Value::Text(s.clone()),
        Value::Blob(bytes) => libsql::Value::Blob(bytes.clone()),
    }
}

/// Cell values come back exactly as the engine stored them.
pub(crate) fn from_libsql_value(value: libsql::Value) -> Value {
    match value {
        libsql::Value::Null => Value::Null,
        libsql::Value::Integer(i) => Value::Integer(i),
        libsql::Value::Real(f) => Value::Real(f),
        libsql::Value::Text(s) => Value::Text(s),
        libsql::Value::Blob(bytes) => Value::Blob(bytes),
    }
}
