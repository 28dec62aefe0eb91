use chrono::{DateTime, Utc};

use crate::codec::Raw;

/// Dynamic CBOR value built by callers of
/// [`append_value`](crate::encode::append_value).
///
/// The union covers the shapes the dynamic appender can encode without
/// generated code. User-defined types go through the
/// [`Marshal`](crate::codec::Marshal) trait, or are spliced in pre-encoded
/// via the `Raw` variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// CBOR null.
    Null,
    /// CBOR undefined.
    Undefined,
    /// Boolean.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Binary32 float.
    F32(f32),
    /// Binary64 float.
    F64(f64),
    /// UTF-8 text string.
    Text(String),
    /// Byte string.
    Bytes(Vec<u8>),
    /// Tag(1) epoch timestamp.
    Time(DateTime<Utc>),
    /// Array of nested values.
    Array(Vec<Value>),
    /// Map of nested key/value pairs, emitted in the given order.
    Map(Vec<(Value, Value)>),
    /// A tag wrapping a nested value.
    Tagged(u64, Box<Value>),
    /// A pre-encoded CBOR item spliced in verbatim.
    Raw(Raw),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Self::Uint(u)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::F64(f)
    }
}

impl From<Vec<u8>> for Value {
    fn from(d: Vec<u8>) -> Self {
        Self::Bytes(d)
    }
}
