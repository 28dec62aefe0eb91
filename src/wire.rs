//! CBOR initial-byte layout: major types, additional info, simple values,
//! and the semantic tag numbers understood by the tagged helpers.

/// Major type 0: unsigned integer.
pub const MAJOR_UINT: u8 = 0;
/// Major type 1: negative integer (encoded as `-1 - n`).
pub const MAJOR_NEGINT: u8 = 1;
/// Major type 2: byte string.
pub const MAJOR_BYTES: u8 = 2;
/// Major type 3: UTF-8 text string.
pub const MAJOR_TEXT: u8 = 3;
/// Major type 4: array.
pub const MAJOR_ARRAY: u8 = 4;
/// Major type 5: map.
pub const MAJOR_MAP: u8 = 5;
/// Major type 6: semantic tag.
pub const MAJOR_TAG: u8 = 6;
/// Major type 7: simple values, floats, and break.
pub const MAJOR_SIMPLE: u8 = 7;

/// Largest value carried directly in the additional-info bits.
pub const ADDINFO_DIRECT: u8 = 23;
/// A one-byte unsigned argument follows.
pub const ADDINFO_U8: u8 = 24;
/// A big-endian u16 argument follows.
pub const ADDINFO_U16: u8 = 25;
/// A big-endian u32 argument follows.
pub const ADDINFO_U32: u8 = 26;
/// A big-endian u64 argument follows.
pub const ADDINFO_U64: u8 = 27;
/// Indefinite-length marker (bytes, text, array, map) or break.
pub const ADDINFO_INDEFINITE: u8 = 31;

/// Simple value `false` (0xf4).
pub const SIMPLE_FALSE: u8 = 20;
/// Simple value `true` (0xf5).
pub const SIMPLE_TRUE: u8 = 21;
/// Simple value `null` (0xf6).
pub const SIMPLE_NULL: u8 = 22;
/// Simple value `undefined` (0xf7).
pub const SIMPLE_UNDEFINED: u8 = 23;
/// IEEE 754 binary16 follows (0xf9).
pub const SIMPLE_FLOAT16: u8 = 25;
/// IEEE 754 binary32 follows (0xfa).
pub const SIMPLE_FLOAT32: u8 = 26;
/// IEEE 754 binary64 follows (0xfb).
pub const SIMPLE_FLOAT64: u8 = 27;
/// Break stop code terminating an indefinite-length item (0xff).
pub const SIMPLE_BREAK: u8 = 31;

/// Tag 0: RFC 3339 date/time text string.
pub const TAG_RFC3339: u64 = 0;
/// Tag 1: epoch timestamp (integer or float seconds).
pub const TAG_EPOCH: u64 = 1;
/// Tag 2: positive bignum.
pub const TAG_POS_BIGNUM: u64 = 2;
/// Tag 3: negative bignum.
pub const TAG_NEG_BIGNUM: u64 = 3;
/// Tag 4: decimal fraction `[exponent, mantissa]`.
pub const TAG_DECIMAL_FRACTION: u64 = 4;
/// Tag 5: bigfloat `[exponent, mantissa]`.
pub const TAG_BIGFLOAT: u64 = 5;
/// Tag 21: byte string, expected base64url when transported in text.
pub const TAG_BASE64URL: u64 = 21;
/// Tag 22: byte string, expected base64.
pub const TAG_BASE64: u64 = 22;
/// Tag 23: byte string, expected base16.
pub const TAG_BASE16: u64 = 23;
/// Tag 24: embedded CBOR data item carried in a byte string.
pub const TAG_EMBEDDED_CBOR: u64 = 24;
/// Tag 32: URI text string.
pub const TAG_URI: u64 = 32;
/// Tag 33: base64url-encoded text string.
pub const TAG_BASE64URL_TEXT: u64 = 33;
/// Tag 34: base64-encoded text string.
pub const TAG_BASE64_TEXT: u64 = 34;
/// Tag 35: regular expression pattern as text.
pub const TAG_REGEX: u64 = 35;
/// Tag 36: MIME message as text.
pub const TAG_MIME: u64 = 36;
/// Tag 37: UUID carried in a 16-byte byte string.
pub const TAG_UUID: u64 = 37;
/// Tag 55799: self-described CBOR (0xd9d9f7).
pub const TAG_SELF_DESCRIBE: u64 = 55799;

/// Recursion ceiling for structural walks over nested items.
pub(crate) const RECURSION_LIMIT: usize = 100_000;

/// Builds an initial byte from a major type and additional-info value.
#[inline]
#[must_use]
pub const fn initial_byte(major: u8, info: u8) -> u8 {
    (major << 5) | info
}

/// Extracts the major type (high 3 bits) from an initial byte.
#[inline]
#[must_use]
pub const fn major_type(b: u8) -> u8 {
    b >> 5
}

/// Extracts the additional info (low 5 bits) from an initial byte.
#[inline]
#[must_use]
pub const fn additional_info(b: u8) -> u8 {
    b & 0x1f
}

/// Coarse classification of the item starting at a given initial byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Kind {
    /// Empty input or an initial byte with no classification.
    Invalid,
    /// Major type 0.
    Uint,
    /// Major type 1.
    Int,
    /// Major type 2.
    Bytes,
    /// Major type 3.
    Text,
    /// Major type 4.
    Array,
    /// Major type 5.
    Map,
    /// Major type 6.
    Tag,
    /// Simple values 20/21.
    Bool,
    /// Simple value 22.
    Null,
    /// Simple value 23.
    Undefined,
    /// Binary16/binary32 follow byte.
    Float32,
    /// Binary64 follow byte.
    Float64,
}

impl core::fmt::Display for Kind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Self::Invalid => "<invalid>",
            Self::Uint => "uint",
            Self::Int => "int",
            Self::Bytes => "bytes",
            Self::Text => "text",
            Self::Array => "array",
            Self::Map => "map",
            Self::Tag => "tag",
            Self::Bool => "bool",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        };
        f.write_str(s)
    }
}

/// Classifies an initial byte.
#[must_use]
pub const fn kind_of(b: u8) -> Kind {
    match major_type(b) {
        MAJOR_UINT => Kind::Uint,
        MAJOR_NEGINT => Kind::Int,
        MAJOR_BYTES => Kind::Bytes,
        MAJOR_TEXT => Kind::Text,
        MAJOR_ARRAY => Kind::Array,
        MAJOR_MAP => Kind::Map,
        MAJOR_TAG => Kind::Tag,
        _ => match additional_info(b) {
            SIMPLE_FALSE | SIMPLE_TRUE => Kind::Bool,
            SIMPLE_NULL => Kind::Null,
            SIMPLE_UNDEFINED => Kind::Undefined,
            SIMPLE_FLOAT16 | SIMPLE_FLOAT32 => Kind::Float32,
            SIMPLE_FLOAT64 => Kind::Float64,
            _ => Kind::Invalid,
        },
    }
}

/// Classifies the next item in `b` without consuming anything.
#[must_use]
pub fn next_kind(b: &[u8]) -> Kind {
    match b.first() {
        Some(&ib) => kind_of(ib),
        None => Kind::Invalid,
    }
}
