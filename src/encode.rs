//! Appenders: every function extends a caller-owned `Vec<u8>` with exactly
//! one CBOR item (or one header). All length headers and tag numbers route
//! through [`append_uint_core`], which keeps canonical shortest-form
//! encoding global.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use num_bigint::{BigInt, Sign};
use regex::Regex;
use uuid::Uuid;

use crate::error::CborError;
use crate::float::{f32_to_f16_bits, fits_f16};
use crate::value::Value;
use crate::wire::{
    initial_byte, ADDINFO_DIRECT, ADDINFO_INDEFINITE, ADDINFO_U16, ADDINFO_U32, ADDINFO_U64,
    ADDINFO_U8, MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_NEGINT, MAJOR_SIMPLE, MAJOR_TAG,
    MAJOR_TEXT, MAJOR_UINT, SIMPLE_BREAK, SIMPLE_FALSE, SIMPLE_FLOAT16, SIMPLE_FLOAT32,
    SIMPLE_FLOAT64, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED, TAG_BASE16, TAG_BASE64,
    TAG_BASE64URL, TAG_BASE64URL_TEXT, TAG_BASE64_TEXT, TAG_BIGFLOAT, TAG_DECIMAL_FRACTION,
    TAG_EMBEDDED_CBOR, TAG_EPOCH, TAG_MIME, TAG_NEG_BIGNUM, TAG_POS_BIGNUM, TAG_REGEX,
    TAG_RFC3339, TAG_SELF_DESCRIBE, TAG_URI, TAG_UUID,
};

/// Number of header bytes the canonical encoding of `u` occupies.
#[inline]
pub(crate) const fn header_len(u: u64) -> usize {
    if u <= ADDINFO_DIRECT as u64 {
        1
    } else if u <= u8::MAX as u64 {
        2
    } else if u <= u16::MAX as u64 {
        3
    } else if u <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Appends the canonical (shortest) header for an unsigned argument under
/// the given major type.
pub fn append_uint_core(b: &mut Vec<u8>, major: u8, u: u64) {
    if u <= u64::from(ADDINFO_DIRECT) {
        b.push(initial_byte(major, u as u8));
    } else if u <= u64::from(u8::MAX) {
        b.reserve(2);
        b.push(initial_byte(major, ADDINFO_U8));
        b.push(u as u8);
    } else if u <= u64::from(u16::MAX) {
        b.reserve(3);
        b.push(initial_byte(major, ADDINFO_U16));
        b.extend_from_slice(&(u as u16).to_be_bytes());
    } else if u <= u64::from(u32::MAX) {
        b.reserve(5);
        b.push(initial_byte(major, ADDINFO_U32));
        b.extend_from_slice(&(u as u32).to_be_bytes());
    } else {
        b.reserve(9);
        b.push(initial_byte(major, ADDINFO_U64));
        b.extend_from_slice(&u.to_be_bytes());
    }
}

/// Appends a definite-length map header.
pub fn append_map_header(b: &mut Vec<u8>, len: u32) {
    append_uint_core(b, MAJOR_MAP, u64::from(len));
}

/// Appends a definite-length array header.
pub fn append_array_header(b: &mut Vec<u8>, len: u32) {
    append_uint_core(b, MAJOR_ARRAY, u64::from(len));
}

/// Appends an indefinite-length array header (0x9f).
pub fn append_array_header_indefinite(b: &mut Vec<u8>) {
    b.push(initial_byte(MAJOR_ARRAY, ADDINFO_INDEFINITE));
}

/// Appends an indefinite-length map header (0xbf).
pub fn append_map_header_indefinite(b: &mut Vec<u8>) {
    b.push(initial_byte(MAJOR_MAP, ADDINFO_INDEFINITE));
}

/// Appends an indefinite-length text string header (0x7f).
pub fn append_text_header_indefinite(b: &mut Vec<u8>) {
    b.push(initial_byte(MAJOR_TEXT, ADDINFO_INDEFINITE));
}

/// Appends an indefinite-length byte string header (0x5f).
pub fn append_bytes_header_indefinite(b: &mut Vec<u8>) {
    b.push(initial_byte(MAJOR_BYTES, ADDINFO_INDEFINITE));
}

/// Appends a break stop code (0xff).
pub fn append_break(b: &mut Vec<u8>) {
    b.push(initial_byte(MAJOR_SIMPLE, SIMPLE_BREAK));
}

/// Appends `null`.
pub fn append_null(b: &mut Vec<u8>) {
    b.push(initial_byte(MAJOR_SIMPLE, SIMPLE_NULL));
}

/// Appends `undefined`.
pub fn append_undefined(b: &mut Vec<u8>) {
    b.push(initial_byte(MAJOR_SIMPLE, SIMPLE_UNDEFINED));
}

/// Appends a boolean.
pub fn append_bool(b: &mut Vec<u8>, v: bool) {
    b.push(initial_byte(
        MAJOR_SIMPLE,
        if v { SIMPLE_TRUE } else { SIMPLE_FALSE },
    ));
}

/// Appends a generic simple value.
///
/// Values 0..=23 are carried in the additional info; values 32..=255 follow
/// a 0xf8 prefix. 24..=31 are the float/break encodings and are not
/// produced here.
pub fn append_simple_value(b: &mut Vec<u8>, v: u8) {
    if v <= ADDINFO_DIRECT {
        b.push(initial_byte(MAJOR_SIMPLE, v));
    } else {
        b.reserve(2);
        b.push(initial_byte(MAJOR_SIMPLE, ADDINFO_U8));
        b.push(v);
    }
}

/// Appends a signed integer using canonical CBOR integer encoding.
///
/// Negative values encode `-1 - v` under major type 1.
pub fn append_int(b: &mut Vec<u8>, i: i64) {
    if i >= 0 {
        append_uint_core(b, MAJOR_UINT, i as u64);
    } else {
        // n = -1 - i without overflow: bitwise NOT in two's complement.
        let n = !(i as u64);
        append_uint_core(b, MAJOR_NEGINT, n);
    }
}

/// Appends an unsigned integer.
pub fn append_uint(b: &mut Vec<u8>, u: u64) {
    append_uint_core(b, MAJOR_UINT, u);
}

/// Appends an IEEE 754 binary64 float (0xfb).
pub fn append_f64(b: &mut Vec<u8>, f: f64) {
    b.reserve(9);
    b.push(initial_byte(MAJOR_SIMPLE, SIMPLE_FLOAT64));
    b.extend_from_slice(&f.to_bits().to_be_bytes());
}

/// Appends an IEEE 754 binary32 float (0xfa).
pub fn append_f32(b: &mut Vec<u8>, f: f32) {
    b.reserve(5);
    b.push(initial_byte(MAJOR_SIMPLE, SIMPLE_FLOAT32));
    b.extend_from_slice(&f.to_bits().to_be_bytes());
}

/// Appends an IEEE 754 binary16 float (0xf9), rounding to nearest even.
pub fn append_f16(b: &mut Vec<u8>, f: f32) {
    b.reserve(3);
    b.push(initial_byte(MAJOR_SIMPLE, SIMPLE_FLOAT16));
    b.extend_from_slice(&f32_to_f16_bits(f).to_be_bytes());
}

/// Appends a float as binary32 when the value survives narrowing, else
/// binary64.
pub fn append_float(b: &mut Vec<u8>, f: f64) {
    let narrow = f as f32;
    if f64::from(narrow) == f {
        append_f32(b, narrow);
    } else {
        append_f64(b, f);
    }
}

/// Appends the shortest-width float encoding that preserves the value.
///
/// `-0.0` is normalized to `+0.0` and NaN is rerouted to the binary16 NaN;
/// the payload of non-canonical NaNs is not preserved.
pub fn append_float_canonical(b: &mut Vec<u8>, f: f64) {
    let f = if f == 0.0 { 0.0 } else { f };
    if f.is_nan() {
        append_f16(b, f32::NAN);
        return;
    }
    if fits_f16(f) {
        append_f16(b, f as f32);
        return;
    }
    let narrow = f as f32;
    if f64::from(narrow) == f {
        append_f32(b, narrow);
        return;
    }
    append_f64(b, f);
}

/// Canonical encoding of a single float, used by strict-mode comparison.
pub(crate) fn canonical_float_bytes(f: f64) -> Vec<u8> {
    let mut out = Vec::with_capacity(9);
    append_float_canonical(&mut out, f);
    out
}

/// Appends a byte string: one header plus one payload copy, reserved in a
/// single step.
pub fn append_bytes(b: &mut Vec<u8>, data: &[u8]) {
    let len = data.len() as u64;
    b.reserve(header_len(len) + data.len());
    append_uint_core(b, MAJOR_BYTES, len);
    b.extend_from_slice(data);
}

/// Appends a text string: one header plus one payload copy, reserved in a
/// single step.
pub fn append_str(b: &mut Vec<u8>, s: &str) {
    let len = s.len() as u64;
    b.reserve(header_len(len) + s.len());
    append_uint_core(b, MAJOR_TEXT, len);
    b.extend_from_slice(s.as_bytes());
}

/// Appends a text string header and raw payload bytes.
///
/// The caller is responsible for the bytes being valid UTF-8.
pub fn append_str_from_bytes(b: &mut Vec<u8>, data: &[u8]) {
    append_uint_core(b, MAJOR_TEXT, data.len() as u64);
    b.extend_from_slice(data);
}

/// Appends a semantic tag header.
pub fn append_tag(b: &mut Vec<u8>, tag: u64) {
    append_uint_core(b, MAJOR_TAG, tag);
}

/// Appends a tag header followed by a pre-encoded item.
pub fn append_tagged(b: &mut Vec<u8>, tag: u64, item: &[u8]) {
    append_tag(b, tag);
    b.extend_from_slice(item);
}

/// Appends a tag(1) epoch timestamp.
///
/// Whole-second instants encode as a signed integer; otherwise as binary64
/// seconds with the nanosecond fraction folded in.
pub fn append_time(b: &mut Vec<u8>, t: &DateTime<Utc>) {
    append_tag(b, TAG_EPOCH);
    let sec = t.timestamp();
    let nsec = t.timestamp_subsec_nanos();
    if nsec == 0 {
        append_int(b, sec);
    } else {
        append_f64(b, sec as f64 + f64::from(nsec) / 1e9);
    }
}

/// Appends a duration as its total nanoseconds (signed integer).
pub fn append_duration(b: &mut Vec<u8>, d: TimeDelta) {
    append_int(b, d.num_nanoseconds().unwrap_or(i64::MAX));
}

/// Appends a tag(0) RFC 3339 date/time text string.
pub fn append_rfc3339_time(b: &mut Vec<u8>, t: &DateTime<Utc>) {
    append_tag(b, TAG_RFC3339);
    append_str(b, &t.to_rfc3339_opts(SecondsFormat::AutoSi, true));
}

/// Appends a tag(32) URI text string.
pub fn append_uri(b: &mut Vec<u8>, uri: &str) {
    append_tag(b, TAG_URI);
    append_str(b, uri);
}

/// Appends a tag(21) byte string (expected base64url transport).
pub fn append_base64url(b: &mut Vec<u8>, data: &[u8]) {
    append_tag(b, TAG_BASE64URL);
    append_bytes(b, data);
}

/// Appends a tag(22) byte string (expected base64 transport).
pub fn append_base64(b: &mut Vec<u8>, data: &[u8]) {
    append_tag(b, TAG_BASE64);
    append_bytes(b, data);
}

/// Appends a tag(23) byte string (expected base16 transport).
pub fn append_base16(b: &mut Vec<u8>, data: &[u8]) {
    append_tag(b, TAG_BASE16);
    append_bytes(b, data);
}

/// Appends a tag(33) base64url text string.
pub fn append_base64url_text(b: &mut Vec<u8>, s: &str) {
    append_tag(b, TAG_BASE64URL_TEXT);
    append_str(b, s);
}

/// Appends a tag(34) base64 text string.
pub fn append_base64_text(b: &mut Vec<u8>, s: &str) {
    append_tag(b, TAG_BASE64_TEXT);
    append_str(b, s);
}

/// Appends tag(24) with an embedded CBOR payload byte string.
pub fn append_embedded_cbor(b: &mut Vec<u8>, payload: &[u8]) {
    append_tag(b, TAG_EMBEDDED_CBOR);
    append_bytes(b, payload);
}

/// Appends tag(37) with the 16-byte UUID payload.
pub fn append_uuid(b: &mut Vec<u8>, uuid: Uuid) {
    append_tag(b, TAG_UUID);
    append_bytes(b, uuid.as_bytes());
}

/// Appends a tag(35) regular-expression pattern as text.
pub fn append_regex_str(b: &mut Vec<u8>, pattern: &str) {
    append_tag(b, TAG_REGEX);
    append_str(b, pattern);
}

/// Appends a tag(35) pattern from a compiled regex.
pub fn append_regex(b: &mut Vec<u8>, re: &Regex) {
    append_regex_str(b, re.as_str());
}

/// Appends a tag(36) MIME message as text.
pub fn append_mime_str(b: &mut Vec<u8>, mime: &str) {
    append_tag(b, TAG_MIME);
    append_str(b, mime);
}

/// Appends the self-describe CBOR tag (0xd9d9f7).
pub fn append_self_describe(b: &mut Vec<u8>) {
    append_tag(b, TAG_SELF_DESCRIBE);
}

/// Appends a bignum under tag 2 (non-negative) or tag 3 (negative).
///
/// Negative values encode the magnitude of `-1 - z`.
pub fn append_big_int(b: &mut Vec<u8>, z: &BigInt) {
    if z.sign() == Sign::Minus {
        let n = -z - 1u8;
        append_tag(b, TAG_NEG_BIGNUM);
        append_bytes(b, &n.magnitude().to_bytes_be());
    } else {
        append_tag(b, TAG_POS_BIGNUM);
        append_bytes(b, &z.magnitude().to_bytes_be());
    }
}

/// Encodes a big integer as the shortest CBOR integer, falling back to a
/// bignum only outside the 64-bit ranges.
pub(crate) fn append_int_or_bignum(b: &mut Vec<u8>, z: &BigInt) {
    if z.sign() != Sign::Minus {
        if let Ok(u) = u64::try_from(z) {
            append_uint(b, u);
            return;
        }
    } else if let Ok(i) = i64::try_from(z) {
        append_int(b, i);
        return;
    }
    append_big_int(b, z);
}

/// Appends a tag(4) decimal fraction `[exponent, mantissa]`.
pub fn append_decimal_fraction(b: &mut Vec<u8>, exponent: i64, mantissa: &BigInt) {
    append_tag(b, TAG_DECIMAL_FRACTION);
    append_array_header(b, 2);
    append_int(b, exponent);
    append_int_or_bignum(b, mantissa);
}

/// Appends a tag(5) bigfloat `[exponent, mantissa]`.
pub fn append_bigfloat(b: &mut Vec<u8>, exponent: i64, mantissa: &BigInt) {
    append_tag(b, TAG_BIGFLOAT);
    append_array_header(b, 2);
    append_int(b, exponent);
    append_int_or_bignum(b, mantissa);
}

/// Appends a slice of strings as an array of text strings.
pub fn append_str_slice<S: AsRef<str>>(b: &mut Vec<u8>, v: &[S]) {
    append_array_header(b, v.len() as u32);
    for s in v {
        append_str(b, s.as_ref());
    }
}

/// Appends a string-keyed string map in iteration order.
pub fn append_map_str_str(b: &mut Vec<u8>, m: &std::collections::HashMap<String, String>) {
    append_map_header(b, m.len() as u32);
    for (k, v) in m {
        append_str(b, k);
        append_str(b, v);
    }
}

/// Appends a dynamic [`Value`], dispatching on its variant.
///
/// # Errors
///
/// Returns `unsupported-type` when a nested value has no encoding rule.
pub fn append_value(b: &mut Vec<u8>, v: &Value) -> Result<(), CborError> {
    match v {
        Value::Null => append_null(b),
        Value::Undefined => append_undefined(b),
        Value::Bool(x) => append_bool(b, *x),
        Value::Int(x) => append_int(b, *x),
        Value::Uint(x) => append_uint(b, *x),
        Value::F32(x) => append_f32(b, *x),
        Value::F64(x) => append_f64(b, *x),
        Value::Text(s) => append_str(b, s),
        Value::Bytes(d) => append_bytes(b, d),
        Value::Time(t) => append_time(b, t),
        Value::Array(items) => {
            append_array_header(b, items.len() as u32);
            for item in items {
                append_value(b, item)?;
            }
        }
        Value::Map(entries) => {
            append_map_header(b, entries.len() as u32);
            for (k, val) in entries {
                append_value(b, k)?;
                append_value(b, val)?;
            }
        }
        Value::Tagged(tag, inner) => {
            append_tag(b, *tag);
            append_value(b, inner)?;
        }
        Value::Raw(raw) => crate::codec::Marshal::marshal_cbor(raw, b)?,
    }
    Ok(())
}
