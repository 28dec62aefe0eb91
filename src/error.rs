use core::fmt;

use crate::wire::Kind;

/// A structured reason for rejecting or failing to decode a CBOR item.
///
/// The enum is intentionally small and payload-light so errors stay cheap on
/// the hot decode path.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The remaining input is smaller than the header or body requires.
    ShortInput,
    /// The initial byte's major type is not the one the reader expects.
    InvalidPrefix {
        /// Major type the reader wanted.
        want: u8,
        /// Major type actually present.
        got: u8,
    },
    /// A decoding method was applied to an item of a different kind.
    TypeMismatch {
        /// Kind the method decodes.
        want: Kind,
        /// Kind actually encoded.
        got: Kind,
    },
    /// An in-range wire integer does not fit the requested signed width.
    IntOverflow {
        /// The decoded value.
        value: i64,
        /// The bit size it could not fit into.
        bits: u32,
    },
    /// An in-range wire integer does not fit the requested unsigned width.
    UintOverflow {
        /// The decoded value.
        value: u64,
        /// The bit size it could not fit into.
        bits: u32,
    },
    /// A negative integer was cast to an unsigned type.
    BelowZero {
        /// The offending value.
        value: i64,
    },
    /// A text string or text chunk contains invalid UTF-8.
    InvalidUtf8,
    /// `read_null` was applied to a non-null item.
    NotNull,
    /// Deterministic mode encountered an indefinite-length item.
    IndefiniteForbidden,
    /// Strict mode encountered a non-minimal integer or length header.
    NonCanonicalLength,
    /// Strict mode encountered a float not in its shortest canonical form.
    NonCanonicalFloat,
    /// A map contained two entries with identical encoded key bytes.
    DuplicateMapKey,
    /// An array or map size exceeds the configured ceiling.
    ContainerTooLarge,
    /// The nesting ceiling was hit while walking an item.
    MaxDepthExceeded,
    /// A dynamic appender or reader has no rule for the value.
    UnsupportedType,
    /// A fixed-shape array had the wrong element count.
    ArrayLength {
        /// Expected count.
        want: u32,
        /// Actual count.
        got: u32,
    },
    /// Reserved additional-info values 28..30 were encountered.
    InvalidAdditionalInfo {
        /// The reserved value.
        info: u8,
    },
    /// A tag-specific reader found a different tag number.
    TagMismatch {
        /// Tag the reader requires.
        want: u64,
        /// Tag actually present.
        got: u64,
    },
    /// A tag-37 payload was not exactly 16 bytes.
    UuidLength {
        /// Actual payload length.
        got: usize,
    },
    /// JSON input could not be parsed or did not match a wrapper contract.
    InvalidJson,
    /// A `$regex` pattern failed to compile.
    InvalidPattern,
    /// An RFC 3339 string failed to parse.
    InvalidTimestamp,
}

/// Error type shared by every appender and reader in the crate.
///
/// Readers return the untouched input slice alongside the error, so a failed
/// call never corrupts the caller's cursor. Higher layers may attach context
/// (`field name/entry 3/...`) via [`CborError::with_context`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CborError {
    kind: ErrorKind,
    context: Option<Box<str>>,
}

impl CborError {
    /// Constructs an error with no context.
    #[inline]
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Returns the structured reason.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Prepends a context segment, producing paths like `outer/inner`.
    #[must_use]
    pub fn with_context(mut self, ctx: &str) -> Self {
        self.context = Some(match self.context.take() {
            Some(old) => format!("{ctx}/{old}").into_boxed_str(),
            None => ctx.into(),
        });
        self
    }

    /// Returns the accumulated context path, if any.
    #[must_use]
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Reports whether the input stream is still usable after this error.
    ///
    /// Truncated or structurally malformed input is unrecoverable; kind and
    /// width mismatches leave the cursor positioned at a decodable item the
    /// caller can peek at and retry.
    #[must_use]
    pub const fn resumable(&self) -> bool {
        match self.kind {
            ErrorKind::InvalidPrefix { .. }
            | ErrorKind::TypeMismatch { .. }
            | ErrorKind::IntOverflow { .. }
            | ErrorKind::UintOverflow { .. }
            | ErrorKind::BelowZero { .. }
            | ErrorKind::NotNull
            | ErrorKind::ArrayLength { .. }
            | ErrorKind::TagMismatch { .. }
            | ErrorKind::UnsupportedType => true,
            _ => false,
        }
    }
}

impl From<ErrorKind> for CborError {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for CborError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::ShortInput => f.write_str("cbor: too few bytes left to read item")?,
            ErrorKind::InvalidPrefix { want, got } => {
                write!(f, "cbor: expected major type {want} but got {got}")?;
            }
            ErrorKind::TypeMismatch { want, got } => {
                write!(f, "cbor: attempted to decode {got} with method for {want}")?;
            }
            ErrorKind::IntOverflow { value, bits } => {
                write!(f, "cbor: {value} overflows int{bits}")?;
            }
            ErrorKind::UintOverflow { value, bits } => {
                write!(f, "cbor: {value} overflows uint{bits}")?;
            }
            ErrorKind::BelowZero { value } => {
                write!(f, "cbor: attempted to cast int {value} to unsigned")?;
            }
            ErrorKind::InvalidUtf8 => f.write_str("cbor: invalid UTF-8 in text string")?,
            ErrorKind::NotNull => f.write_str("cbor: not null")?,
            ErrorKind::IndefiniteForbidden => {
                f.write_str("cbor: indefinite-length item not allowed in deterministic mode")?;
            }
            ErrorKind::NonCanonicalLength => {
                f.write_str("cbor: non-canonical integer/length encoding")?;
            }
            ErrorKind::NonCanonicalFloat => f.write_str("cbor: non-canonical float encoding")?,
            ErrorKind::DuplicateMapKey => f.write_str("cbor: duplicate map key")?,
            ErrorKind::ContainerTooLarge => f.write_str("cbor: container too large")?,
            ErrorKind::MaxDepthExceeded => f.write_str("cbor: max depth exceeded")?,
            ErrorKind::UnsupportedType => f.write_str("cbor: unsupported type")?,
            ErrorKind::ArrayLength { want, got } => {
                write!(f, "cbor: wanted array of size {want}; got {got}")?;
            }
            ErrorKind::InvalidAdditionalInfo { info } => {
                write!(f, "cbor: reserved additional info value {info}")?;
            }
            ErrorKind::TagMismatch { want, got } => {
                write!(f, "cbor: expected tag {want} but got {got}")?;
            }
            ErrorKind::UuidLength { got } => {
                write!(f, "cbor: uuid payload must be 16 bytes, got {got}")?;
            }
            ErrorKind::InvalidJson => f.write_str("cbor: invalid JSON input")?,
            ErrorKind::InvalidPattern => f.write_str("cbor: regex pattern failed to compile")?,
            ErrorKind::InvalidTimestamp => f.write_str("cbor: invalid RFC 3339 timestamp")?,
        }
        if let Some(ctx) = &self.context {
            write!(f, " at {ctx}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CborError {}

#[inline]
pub(crate) fn short_input() -> CborError {
    CborError::new(ErrorKind::ShortInput)
}

#[inline]
pub(crate) fn bad_prefix(want: u8, got: u8) -> CborError {
    CborError::new(ErrorKind::InvalidPrefix { want, got })
}
