//! # helix-cbor
//!
//! An append-and-read CBOR (RFC 8949) codec co-designed with a derive-based
//! code generator.
//!
//! ## Design principles
//!
//! - **Appenders extend caller-owned buffers.** Every `append_*` function
//!   pushes exactly one item (or one header) onto a `Vec<u8>`; all length
//!   headers and tag numbers route through one canonical-width encoder.
//! - **Readers are zero-copy first.** Every `read_*` function consumes one
//!   item from the head of a slice and returns `(value, remainder)`;
//!   borrowed views alias the input and owned values are explicit.
//! - **The trust boundary is in the API.** Generated types get a Safe
//!   decode path (validated UTF-8, owned strings) and a Trusted one
//!   (zero-copy keys and strings) as separate methods, not a runtime flag.
//!
//! ## Feature flags
//!
//! - `derive` *(default)*: re-exports the [`Marshal`]/[`Unmarshal`] derive
//!   macros.
//! - `simdutf8`: SIMD-accelerated UTF-8 validation.
//! - `unsafe-str`: lets the Trusted path skip UTF-8 validation entirely;
//!   only enable when inputs are known well-formed.

#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap,
    clippy::missing_errors_doc
)]

mod canonical;
mod codec;
mod decode;
mod diag;
mod encode;
mod error;
mod float;
mod json;
mod number;
mod pool;
mod reader;
mod seq;
mod size;
mod utf8;
mod value;
mod walk;
mod wire;

pub use crate::canonical::{
    append_map_deterministic, append_map_str_deterministic, append_map_str_str_deterministic,
    append_raw_map_deterministic, RawPair,
};
pub use crate::codec::{
    from_slice, to_vec, Marshal, MarshalElem, Raw, Unmarshal, UnmarshalTrusted,
};
pub use crate::decode::{
    is_null, read_array_header, read_array_start, read_base16_bytes, read_base64_bytes,
    read_base64_text, read_base64url_bytes, read_base64url_text, read_big_int, read_bigfloat,
    read_bool, read_break, read_bytes, read_decimal_fraction, read_duration, read_embedded_cbor,
    read_f16, read_f32, read_f64, read_i16, read_i32, read_i64, read_i8, read_json_number,
    read_map_header, read_map_key_zc, read_map_start, read_map_str_str, read_mime_str, read_null,
    read_regex, read_regex_str, read_rfc3339_time, read_simple_value, read_str_trusted,
    read_str_zc, read_string, read_tag, read_time, read_u16, read_u32, read_u64, read_u8,
    read_uint_core, read_uri, read_uuid, strip_self_describe,
};
pub use crate::diag::diag;
pub use crate::encode::{
    append_array_header, append_array_header_indefinite, append_base16, append_base64,
    append_base64_text, append_base64url, append_base64url_text, append_big_int, append_bigfloat,
    append_bool, append_break, append_bytes, append_bytes_header_indefinite,
    append_decimal_fraction, append_duration, append_embedded_cbor, append_f16, append_f32,
    append_f64, append_float, append_float_canonical, append_int, append_map_header,
    append_map_header_indefinite, append_map_str_str, append_mime_str, append_null, append_regex,
    append_regex_str, append_rfc3339_time, append_self_describe, append_simple_value, append_str,
    append_str_from_bytes, append_str_slice, append_tag, append_tagged, append_text_header_indefinite,
    append_time, append_uint, append_uint_core, append_undefined, append_uri, append_uuid,
    append_value,
};
pub use crate::error::{CborError, ErrorKind};
pub use crate::json::{from_json, is_likely_json, to_json};
pub use crate::number::Number;
pub use crate::reader::{read_map_nodup, read_ordered_map, OrderedMap, Reader};
pub use crate::seq::{append_sequence, for_each_sequence, split_sequence};
pub use crate::value::Value;
pub use crate::walk::{skip, validate_document, validate_well_formed};
pub use crate::wire::{
    additional_info, initial_byte, kind_of, major_type, next_kind, Kind, MAJOR_ARRAY, MAJOR_BYTES,
    MAJOR_MAP, MAJOR_NEGINT, MAJOR_SIMPLE, MAJOR_TAG, MAJOR_TEXT, MAJOR_UINT,
};
pub use crate::size::{
    ARRAY_HEADER_SIZE, BOOL_SIZE, BYTES_PREFIX_SIZE, DURATION_SIZE, FLOAT32_SIZE, FLOAT64_SIZE,
    INT_SIZE, MAP_HEADER_SIZE, NULL_SIZE, STR_PREFIX_SIZE, TAG_PREFIX_SIZE, TIME_SIZE, UINT_SIZE,
};

#[cfg(feature = "derive")]
pub use helix_cbor_derive::{Marshal, Unmarshal};
