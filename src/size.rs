//! Worst-case encoded sizes for common shapes. For variable-length items
//! the total is the prefix constant plus the payload length.

/// Worst-case signed integer encoding.
pub const INT_SIZE: usize = 9;
/// Worst-case unsigned integer encoding.
pub const UINT_SIZE: usize = INT_SIZE;
/// Binary64 encoding.
pub const FLOAT64_SIZE: usize = 9;
/// Binary32 encoding.
pub const FLOAT32_SIZE: usize = 5;
/// Duration (nanoseconds as signed integer).
pub const DURATION_SIZE: usize = INT_SIZE;
/// Tag(1) header plus the widest payload (binary64 or full-width integer).
pub const TIME_SIZE: usize = 15;
/// Boolean.
pub const BOOL_SIZE: usize = 1;
/// Null.
pub const NULL_SIZE: usize = 1;
/// Worst-case definite map header for 32-bit counts.
pub const MAP_HEADER_SIZE: usize = 5;
/// Worst-case definite array header for 32-bit counts.
pub const ARRAY_HEADER_SIZE: usize = 5;
/// Worst-case byte-string length prefix for 32-bit lengths.
pub const BYTES_PREFIX_SIZE: usize = 5;
/// Worst-case text-string length prefix for 32-bit lengths.
pub const STR_PREFIX_SIZE: usize = 5;
/// Worst-case tag header for 32-bit tag numbers.
pub const TAG_PREFIX_SIZE: usize = 5;
