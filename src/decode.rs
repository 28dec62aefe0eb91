//! Stateless readers: every function consumes exactly one CBOR item (or one
//! header) from the head of the input and returns the decoded value together
//! with the remaining bytes. On error the original input is left for the
//! caller, so a failed read never corrupts a cursor.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use num_bigint::BigInt;
use regex::Regex;
use uuid::Uuid;

use crate::error::{bad_prefix, short_input, CborError, ErrorKind};
use crate::float::f16_bits_to_f32;
use crate::utf8;
use crate::walk::skip;
use crate::wire::{
    additional_info, initial_byte, kind_of, major_type, Kind, ADDINFO_DIRECT, ADDINFO_INDEFINITE,
    ADDINFO_U16, ADDINFO_U32, ADDINFO_U64, ADDINFO_U8, MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP,
    MAJOR_NEGINT, MAJOR_SIMPLE, MAJOR_TAG, MAJOR_TEXT, MAJOR_UINT, SIMPLE_BREAK,
    SIMPLE_FLOAT16, SIMPLE_FLOAT32, SIMPLE_FLOAT64, SIMPLE_NULL, TAG_BASE16,
    TAG_BASE64, TAG_BASE64URL, TAG_BASE64URL_TEXT, TAG_BASE64_TEXT, TAG_BIGFLOAT,
    TAG_DECIMAL_FRACTION, TAG_EMBEDDED_CBOR, TAG_EPOCH, TAG_MIME, TAG_NEG_BIGNUM, TAG_POS_BIGNUM,
    TAG_REGEX, TAG_RFC3339, TAG_SELF_DESCRIBE, TAG_URI, TAG_UUID,
};

/// Reads an unsigned argument under the expected major type.
///
/// This backs both the integer readers and every length reader.
///
/// # Errors
///
/// `short-input` when the header or argument is truncated, `invalid-prefix`
/// on a major-type mismatch, `unsupported-type` on reserved or indefinite
/// additional info.
pub fn read_uint_core(b: &[u8], expected_major: u8) -> Result<(u64, &[u8]), CborError> {
    let (&ib, rest) = b.split_first().ok_or_else(short_input)?;
    let major = major_type(ib);
    if major != expected_major {
        return Err(bad_prefix(expected_major, major));
    }
    let info = additional_info(ib);
    match info {
        0..=ADDINFO_DIRECT => Ok((u64::from(info), rest)),
        ADDINFO_U8 => {
            let (&v, rest) = rest.split_first().ok_or_else(short_input)?;
            Ok((u64::from(v), rest))
        }
        ADDINFO_U16 => {
            let (v, rest) = split_be::<2>(rest)?;
            Ok((u64::from(u16::from_be_bytes(v)), rest))
        }
        ADDINFO_U32 => {
            let (v, rest) = split_be::<4>(rest)?;
            Ok((u64::from(u32::from_be_bytes(v)), rest))
        }
        ADDINFO_U64 => {
            let (v, rest) = split_be::<8>(rest)?;
            Ok((u64::from_be_bytes(v), rest))
        }
        _ => Err(ErrorKind::UnsupportedType.into()),
    }
}

#[inline]
fn split_be<const N: usize>(b: &[u8]) -> Result<([u8; N], &[u8]), CborError> {
    if b.len() < N {
        return Err(short_input());
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&b[..N]);
    Ok((out, &b[N..]))
}

#[inline]
fn split_payload(b: &[u8], len: u64) -> Result<(&[u8], &[u8]), CborError> {
    let len = usize::try_from(len).map_err(|_| short_input())?;
    if b.len() < len {
        return Err(short_input());
    }
    Ok(b.split_at(len))
}

/// Reads a definite-length map header.
///
/// # Errors
///
/// Fails on truncation, a non-map major type, or a count above `u32::MAX`.
pub fn read_map_header(b: &[u8]) -> Result<(u32, &[u8]), CborError> {
    read_container_header(b, MAJOR_MAP)
}

/// Reads a definite-length array header.
///
/// # Errors
///
/// Fails on truncation, a non-array major type, or a count above `u32::MAX`.
pub fn read_array_header(b: &[u8]) -> Result<(u32, &[u8]), CborError> {
    read_container_header(b, MAJOR_ARRAY)
}

fn read_container_header(b: &[u8], major: u8) -> Result<(u32, &[u8]), CborError> {
    let (len, rest) = read_uint_core(b, major)?;
    let len = u32::try_from(len).map_err(|_| {
        CborError::new(ErrorKind::UintOverflow {
            value: len,
            bits: 32,
        })
    })?;
    Ok((len, rest))
}

/// Reads a map start, distinguishing the indefinite form.
///
/// For an indefinite map the returned size is zero and the cursor is past
/// the 0xbf byte; the caller iterates until [`read_break`] consumes 0xff.
///
/// # Errors
///
/// Propagates the definite-header errors.
pub fn read_map_start(b: &[u8]) -> Result<(u32, bool, &[u8]), CborError> {
    read_container_start(b, MAJOR_MAP)
}

/// Reads an array start, distinguishing the indefinite form.
///
/// # Errors
///
/// Propagates the definite-header errors.
pub fn read_array_start(b: &[u8]) -> Result<(u32, bool, &[u8]), CborError> {
    read_container_start(b, MAJOR_ARRAY)
}

fn read_container_start(b: &[u8], major: u8) -> Result<(u32, bool, &[u8]), CborError> {
    let (&ib, rest) = b.split_first().ok_or_else(short_input)?;
    if ib == initial_byte(major, ADDINFO_INDEFINITE) {
        return Ok((0, true, rest));
    }
    let (len, rest) = read_container_header(b, major)?;
    Ok((len, false, rest))
}

/// Consumes a break stop code (0xff) if one is next.
///
/// # Errors
///
/// `short-input` on empty input.
pub fn read_break(b: &[u8]) -> Result<(bool, &[u8]), CborError> {
    let (&ib, rest) = b.split_first().ok_or_else(short_input)?;
    if ib == initial_byte(MAJOR_SIMPLE, SIMPLE_BREAK) {
        Ok((true, rest))
    } else {
        Ok((false, b))
    }
}

/// Reads a null item.
///
/// # Errors
///
/// `not-null` when the next item is anything else.
pub fn read_null(b: &[u8]) -> Result<&[u8], CborError> {
    let (&ib, rest) = b.split_first().ok_or_else(short_input)?;
    if ib != initial_byte(MAJOR_SIMPLE, SIMPLE_NULL) {
        return Err(ErrorKind::NotNull.into());
    }
    Ok(rest)
}

/// Reports whether the next item is null.
#[must_use]
pub fn is_null(b: &[u8]) -> bool {
    b.first() == Some(&initial_byte(MAJOR_SIMPLE, SIMPLE_NULL))
}

/// Reads a boolean.
///
/// # Errors
///
/// `type-mismatch` when the next item is not true or false.
pub fn read_bool(b: &[u8]) -> Result<(bool, &[u8]), CborError> {
    let (&ib, rest) = b.split_first().ok_or_else(short_input)?;
    match ib {
        0xf5 => Ok((true, rest)),
        0xf4 => Ok((false, rest)),
        _ => Err(ErrorKind::TypeMismatch {
            want: Kind::Bool,
            got: kind_of(ib),
        }
        .into()),
    }
}

/// Reads a signed integer under major type 0 or 1.
///
/// # Errors
///
/// `int-overflow` when the wire value exceeds `i64` range (a negative item
/// whose argument exceeds `i64::MAX` would compute `-1 - n` below
/// `i64::MIN`).
pub fn read_i64(b: &[u8]) -> Result<(i64, &[u8]), CborError> {
    let &ib = b.first().ok_or_else(short_input)?;
    match major_type(ib) {
        MAJOR_UINT => {
            let (u, rest) = read_uint_core(b, MAJOR_UINT)?;
            let v = i64::try_from(u).map_err(|_| {
                CborError::new(ErrorKind::IntOverflow {
                    value: u as i64,
                    bits: 64,
                })
            })?;
            Ok((v, rest))
        }
        MAJOR_NEGINT => {
            let (n, rest) = read_uint_core(b, MAJOR_NEGINT)?;
            if n > i64::MAX as u64 {
                return Err(ErrorKind::IntOverflow { value: -1, bits: 64 }.into());
            }
            Ok((-1 - n as i64, rest))
        }
        major => Err(bad_prefix(MAJOR_UINT, major)),
    }
}

/// Reads an `i32`, failing with `int-overflow` when the value does not fit.
///
/// # Errors
///
/// See [`read_i64`].
pub fn read_i32(b: &[u8]) -> Result<(i32, &[u8]), CborError> {
    let (v, rest) = read_i64(b)?;
    let v = i32::try_from(v)
        .map_err(|_| CborError::new(ErrorKind::IntOverflow { value: v, bits: 32 }))?;
    Ok((v, rest))
}

/// Reads an `i16`, failing with `int-overflow` when the value does not fit.
///
/// # Errors
///
/// See [`read_i64`].
pub fn read_i16(b: &[u8]) -> Result<(i16, &[u8]), CborError> {
    let (v, rest) = read_i64(b)?;
    let v = i16::try_from(v)
        .map_err(|_| CborError::new(ErrorKind::IntOverflow { value: v, bits: 16 }))?;
    Ok((v, rest))
}

/// Reads an `i8`, failing with `int-overflow` when the value does not fit.
///
/// # Errors
///
/// See [`read_i64`].
pub fn read_i8(b: &[u8]) -> Result<(i8, &[u8]), CborError> {
    let (v, rest) = read_i64(b)?;
    let v =
        i8::try_from(v).map_err(|_| CborError::new(ErrorKind::IntOverflow { value: v, bits: 8 }))?;
    Ok((v, rest))
}

/// Reads an unsigned integer under major type 0.
///
/// # Errors
///
/// `invalid-prefix` for any other major type, including negatives.
pub fn read_u64(b: &[u8]) -> Result<(u64, &[u8]), CborError> {
    read_uint_core(b, MAJOR_UINT)
}

/// Reads a `u32`, failing with `uint-overflow` when the value does not fit.
///
/// # Errors
///
/// See [`read_u64`].
pub fn read_u32(b: &[u8]) -> Result<(u32, &[u8]), CborError> {
    let (v, rest) = read_u64(b)?;
    let v = u32::try_from(v)
        .map_err(|_| CborError::new(ErrorKind::UintOverflow { value: v, bits: 32 }))?;
    Ok((v, rest))
}

/// Reads a `u16`, failing with `uint-overflow` when the value does not fit.
///
/// # Errors
///
/// See [`read_u64`].
pub fn read_u16(b: &[u8]) -> Result<(u16, &[u8]), CborError> {
    let (v, rest) = read_u64(b)?;
    let v = u16::try_from(v)
        .map_err(|_| CborError::new(ErrorKind::UintOverflow { value: v, bits: 16 }))?;
    Ok((v, rest))
}

/// Reads a `u8`, failing with `uint-overflow` when the value does not fit.
///
/// # Errors
///
/// See [`read_u64`].
pub fn read_u8(b: &[u8]) -> Result<(u8, &[u8]), CborError> {
    let (v, rest) = read_u64(b)?;
    let v =
        u8::try_from(v).map_err(|_| CborError::new(ErrorKind::UintOverflow { value: v, bits: 8 }))?;
    Ok((v, rest))
}

/// Reads a binary64 float (0xfb).
///
/// # Errors
///
/// `invalid-prefix` for any other item.
pub fn read_f64(b: &[u8]) -> Result<(f64, &[u8]), CborError> {
    let (&ib, rest) = b.split_first().ok_or_else(short_input)?;
    if ib != initial_byte(MAJOR_SIMPLE, SIMPLE_FLOAT64) {
        return Err(bad_prefix(MAJOR_SIMPLE, major_type(ib)));
    }
    let (bits, rest) = split_be::<8>(rest)?;
    Ok((f64::from_bits(u64::from_be_bytes(bits)), rest))
}

/// Reads a binary32 float (0xfa).
///
/// # Errors
///
/// `invalid-prefix` for any other item.
pub fn read_f32(b: &[u8]) -> Result<(f32, &[u8]), CborError> {
    let (&ib, rest) = b.split_first().ok_or_else(short_input)?;
    if ib != initial_byte(MAJOR_SIMPLE, SIMPLE_FLOAT32) {
        return Err(bad_prefix(MAJOR_SIMPLE, major_type(ib)));
    }
    let (bits, rest) = split_be::<4>(rest)?;
    Ok((f32::from_bits(u32::from_be_bytes(bits)), rest))
}

/// Reads a binary16 float (0xf9), widening to `f32`.
///
/// # Errors
///
/// `invalid-prefix` for any other item.
pub fn read_f16(b: &[u8]) -> Result<(f32, &[u8]), CborError> {
    let (&ib, rest) = b.split_first().ok_or_else(short_input)?;
    if ib != initial_byte(MAJOR_SIMPLE, SIMPLE_FLOAT16) {
        return Err(bad_prefix(MAJOR_SIMPLE, major_type(ib)));
    }
    let (bits, rest) = split_be::<2>(rest)?;
    Ok((f16_bits_to_f32(u16::from_be_bytes(bits)), rest))
}

/// Reads a definite-length text string zero-copy, without UTF-8 validation.
///
/// This is the raw view the Trusted path builds on; the returned slice
/// borrows the input.
///
/// # Errors
///
/// `invalid-prefix` for non-text items (including the indefinite form).
pub fn read_str_zc(b: &[u8]) -> Result<(&[u8], &[u8]), CborError> {
    let (len, rest) = read_uint_core(b, MAJOR_TEXT)?;
    split_payload(rest, len)
}

/// Reads a definite-length text string zero-copy as `&str`.
///
/// With the `unsafe-str` feature the UTF-8 check is skipped; the caller
/// asserts the input is trusted and outlives the view. Without the feature
/// this validates like the safe path.
///
/// # Errors
///
/// `invalid-utf8` when validation runs and fails.
pub fn read_str_trusted(b: &[u8]) -> Result<(&str, &[u8]), CborError> {
    let (raw, rest) = read_str_zc(b)?;
    let s = utf8::trusted(raw).map_err(|()| CborError::new(ErrorKind::InvalidUtf8))?;
    Ok((s, rest))
}

/// Reads a text string into an owned, UTF-8-validated `String`.
///
/// The indefinite form concatenates definite chunks until the break.
///
/// # Errors
///
/// `invalid-utf8` on malformed text, `invalid-prefix` on non-text items.
pub fn read_string(b: &[u8]) -> Result<(String, &[u8]), CborError> {
    let &ib = b.first().ok_or_else(short_input)?;
    if ib == initial_byte(MAJOR_TEXT, ADDINFO_INDEFINITE) {
        let mut out = Vec::new();
        let mut p = &b[1..];
        loop {
            let (brk, rest) = read_break(p)?;
            if brk {
                let s = utf8::validate(&out)
                    .map_err(|()| CborError::new(ErrorKind::InvalidUtf8))?
                    .to_owned();
                return Ok((s, rest));
            }
            let (chunk, rest) = read_str_zc(p)?;
            out.extend_from_slice(chunk);
            p = rest;
        }
    }
    let (raw, rest) = read_str_zc(b)?;
    let s = utf8::validate(raw)
        .map_err(|()| CborError::new(ErrorKind::InvalidUtf8))?
        .to_owned();
    Ok((s, rest))
}

/// Reads a byte string.
///
/// Definite-length payloads borrow the input; the indefinite form
/// concatenates chunks into an owned buffer.
///
/// # Errors
///
/// `invalid-prefix` on non-bytes items.
pub fn read_bytes(b: &[u8]) -> Result<(Cow<'_, [u8]>, &[u8]), CborError> {
    let &ib = b.first().ok_or_else(short_input)?;
    if ib == initial_byte(MAJOR_BYTES, ADDINFO_INDEFINITE) {
        let mut out = Vec::new();
        let mut p = &b[1..];
        loop {
            let (brk, rest) = read_break(p)?;
            if brk {
                return Ok((Cow::Owned(out), rest));
            }
            let (len, rest) = read_uint_core(p, MAJOR_BYTES)?;
            let (chunk, rest) = split_payload(rest, len)?;
            out.extend_from_slice(chunk);
            p = rest;
        }
    }
    let (len, rest) = read_uint_core(b, MAJOR_BYTES)?;
    let (payload, rest) = split_payload(rest, len)?;
    Ok((Cow::Borrowed(payload), rest))
}

/// Reads a map key, requiring a definite-length text string, zero-copy.
///
/// # Errors
///
/// `type-mismatch` for non-text keys.
pub fn read_map_key_zc(b: &[u8]) -> Result<(&[u8], &[u8]), CborError> {
    let &ib = b.first().ok_or_else(short_input)?;
    if major_type(ib) != MAJOR_TEXT {
        return Err(ErrorKind::TypeMismatch {
            want: Kind::Text,
            got: kind_of(ib),
        }
        .into());
    }
    read_str_zc(b)
}

/// Reads a simple value: 0..=23 directly or 32..=255 after a 0xf8 prefix.
///
/// Float encodings are not handled here.
///
/// # Errors
///
/// `unsupported-type` on float follow bytes or reserved encodings.
pub fn read_simple_value(b: &[u8]) -> Result<(u8, &[u8]), CborError> {
    let (&ib, rest) = b.split_first().ok_or_else(short_input)?;
    let major = major_type(ib);
    if major != MAJOR_SIMPLE {
        return Err(bad_prefix(MAJOR_SIMPLE, major));
    }
    match additional_info(ib) {
        SIMPLE_FLOAT16 | SIMPLE_FLOAT32 | SIMPLE_FLOAT64 => {
            Err(ErrorKind::UnsupportedType.into())
        }
        ADDINFO_U8 => {
            let (&v, rest) = rest.split_first().ok_or_else(short_input)?;
            Ok((v, rest))
        }
        info if info <= ADDINFO_DIRECT => Ok((info, rest)),
        _ => Err(ErrorKind::UnsupportedType.into()),
    }
}

/// Reads a semantic tag number (major type 6).
///
/// # Errors
///
/// `invalid-prefix` when the next item is not a tag.
pub fn read_tag(b: &[u8]) -> Result<(u64, &[u8]), CborError> {
    read_uint_core(b, MAJOR_TAG)
}

fn read_expected_tag(b: &[u8], want: u64) -> Result<&[u8], CborError> {
    let (tag, rest) = read_tag(b)?;
    if tag != want {
        return Err(ErrorKind::TagMismatch { want, got: tag }.into());
    }
    Ok(rest)
}

fn epoch_from_float(f: f64) -> DateTime<Utc> {
    let sec = f.floor();
    let mut ns = ((f - sec) * 1e9).round() as i64;
    let mut secs = sec as i64;
    if ns >= 1_000_000_000 {
        secs += 1;
        ns -= 1_000_000_000;
    }
    DateTime::from_timestamp(secs, ns as u32).unwrap_or_default()
}

/// Reads a tag(1) epoch timestamp wrapping an integer, binary16, binary32,
/// or binary64 payload.
///
/// Fractional payloads floor the seconds and round the nanoseconds into
/// `[0, 1e9)`. Binary16 has too little precision for modern instants; the
/// loss is tolerated.
///
/// # Errors
///
/// `tag-mismatch` for other tags, `unsupported-type` for other payloads.
pub fn read_time(b: &[u8]) -> Result<(DateTime<Utc>, &[u8]), CborError> {
    let o = read_expected_tag(b, TAG_EPOCH)?;
    let &ib = o.first().ok_or_else(short_input)?;
    match major_type(ib) {
        MAJOR_UINT | MAJOR_NEGINT => {
            let (sec, rest) = read_i64(o)?;
            let t = DateTime::from_timestamp(sec, 0).unwrap_or_default();
            Ok((t, rest))
        }
        MAJOR_SIMPLE => match additional_info(ib) {
            SIMPLE_FLOAT64 => {
                let (f, rest) = read_f64(o)?;
                Ok((epoch_from_float(f), rest))
            }
            SIMPLE_FLOAT32 => {
                let (f, rest) = read_f32(o)?;
                Ok((epoch_from_float(f64::from(f)), rest))
            }
            SIMPLE_FLOAT16 => {
                let (f, rest) = read_f16(o)?;
                Ok((epoch_from_float(f64::from(f)), rest))
            }
            _ => Err(ErrorKind::UnsupportedType.into()),
        },
        _ => Err(ErrorKind::UnsupportedType.into()),
    }
}

/// Reads a duration encoded as total nanoseconds.
///
/// # Errors
///
/// See [`read_i64`].
pub fn read_duration(b: &[u8]) -> Result<(TimeDelta, &[u8]), CborError> {
    let (ns, rest) = read_i64(b)?;
    Ok((TimeDelta::nanoseconds(ns), rest))
}

/// Reads a tag(0) RFC 3339 date/time string.
///
/// # Errors
///
/// `invalid-timestamp` when the payload does not parse.
pub fn read_rfc3339_time(b: &[u8]) -> Result<(DateTime<Utc>, &[u8]), CborError> {
    let o = read_expected_tag(b, TAG_RFC3339)?;
    let (s, rest) = read_string(o)?;
    let t = DateTime::parse_from_rfc3339(&s)
        .map_err(|_| CborError::new(ErrorKind::InvalidTimestamp))?;
    Ok((t.with_timezone(&Utc), rest))
}

/// Reads a tag(32) URI text string.
///
/// # Errors
///
/// `tag-mismatch` for other tags.
pub fn read_uri(b: &[u8]) -> Result<(String, &[u8]), CborError> {
    let o = read_expected_tag(b, TAG_URI)?;
    read_string(o)
}

/// Reads a tag(33) base64url text string.
///
/// # Errors
///
/// `tag-mismatch` for other tags.
pub fn read_base64url_text(b: &[u8]) -> Result<(String, &[u8]), CborError> {
    let o = read_expected_tag(b, TAG_BASE64URL_TEXT)?;
    read_string(o)
}

/// Reads a tag(34) base64 text string.
///
/// # Errors
///
/// `tag-mismatch` for other tags.
pub fn read_base64_text(b: &[u8]) -> Result<(String, &[u8]), CborError> {
    let o = read_expected_tag(b, TAG_BASE64_TEXT)?;
    read_string(o)
}

/// Reads a tag(21) byte string.
///
/// # Errors
///
/// `tag-mismatch` for other tags.
pub fn read_base64url_bytes(b: &[u8]) -> Result<(Cow<'_, [u8]>, &[u8]), CborError> {
    let o = read_expected_tag(b, TAG_BASE64URL)?;
    read_bytes(o)
}

/// Reads a tag(22) byte string.
///
/// # Errors
///
/// `tag-mismatch` for other tags.
pub fn read_base64_bytes(b: &[u8]) -> Result<(Cow<'_, [u8]>, &[u8]), CborError> {
    let o = read_expected_tag(b, TAG_BASE64)?;
    read_bytes(o)
}

/// Reads a tag(23) byte string.
///
/// # Errors
///
/// `tag-mismatch` for other tags.
pub fn read_base16_bytes(b: &[u8]) -> Result<(Cow<'_, [u8]>, &[u8]), CborError> {
    let o = read_expected_tag(b, TAG_BASE16)?;
    read_bytes(o)
}

/// Reads tag(24) with an embedded CBOR payload byte string.
///
/// # Errors
///
/// `tag-mismatch` for other tags.
pub fn read_embedded_cbor(b: &[u8]) -> Result<(Cow<'_, [u8]>, &[u8]), CborError> {
    let o = read_expected_tag(b, TAG_EMBEDDED_CBOR)?;
    read_bytes(o)
}

/// Reads tag(37) with a 16-byte UUID payload.
///
/// # Errors
///
/// `uuid-length` when the payload is not exactly 16 bytes.
pub fn read_uuid(b: &[u8]) -> Result<(Uuid, &[u8]), CborError> {
    let o = read_expected_tag(b, TAG_UUID)?;
    let (payload, rest) = read_bytes(o)?;
    let bytes: [u8; 16] = payload
        .as_ref()
        .try_into()
        .map_err(|_| CborError::new(ErrorKind::UuidLength { got: payload.len() }))?;
    Ok((Uuid::from_bytes(bytes), rest))
}

/// Reads a tag(35) regular-expression pattern as text.
///
/// # Errors
///
/// `tag-mismatch` for other tags.
pub fn read_regex_str(b: &[u8]) -> Result<(String, &[u8]), CborError> {
    let o = read_expected_tag(b, TAG_REGEX)?;
    read_string(o)
}

/// Reads a tag(35) pattern and compiles it.
///
/// # Errors
///
/// `invalid-pattern` when the contained pattern does not compile.
pub fn read_regex(b: &[u8]) -> Result<(Regex, &[u8]), CborError> {
    let (s, rest) = read_regex_str(b)?;
    let re = Regex::new(&s).map_err(|_| CborError::new(ErrorKind::InvalidPattern))?;
    Ok((re, rest))
}

/// Reads a tag(36) MIME message as text.
///
/// # Errors
///
/// `tag-mismatch` for other tags.
pub fn read_mime_str(b: &[u8]) -> Result<(String, &[u8]), CborError> {
    let o = read_expected_tag(b, TAG_MIME)?;
    read_string(o)
}

/// Consumes a self-describe tag (0xd9d9f7) if one is next.
///
/// # Errors
///
/// `short-input` on empty input.
pub fn strip_self_describe(b: &[u8]) -> Result<(&[u8], bool), CborError> {
    let &ib = b.first().ok_or_else(short_input)?;
    if major_type(ib) != MAJOR_TAG {
        return Ok((b, false));
    }
    let (tag, rest) = read_tag(b)?;
    if tag != TAG_SELF_DESCRIBE {
        return Ok((b, false));
    }
    Ok((rest, true))
}

/// Reads a bignum under tag 2 or 3.
///
/// The negative form decodes to `-(magnitude + 1)`.
///
/// # Errors
///
/// `tag-mismatch` for other tags.
pub fn read_big_int(b: &[u8]) -> Result<(BigInt, &[u8]), CborError> {
    let (tag, o) = read_tag(b)?;
    let (mag, rest) = read_bytes(o)?;
    let mag = BigInt::from_bytes_be(num_bigint::Sign::Plus, &mag);
    match tag {
        TAG_POS_BIGNUM => Ok((mag, rest)),
        TAG_NEG_BIGNUM => Ok((-mag - 1, rest)),
        got => Err(ErrorKind::TagMismatch {
            want: TAG_POS_BIGNUM,
            got,
        }
        .into()),
    }
}

/// Reads a CBOR integer (major 0/1) or bignum (tags 2/3) as a big integer.
fn read_int_or_bignum(b: &[u8]) -> Result<(BigInt, &[u8]), CborError> {
    let &ib = b.first().ok_or_else(short_input)?;
    match major_type(ib) {
        MAJOR_UINT => {
            let (u, rest) = read_u64(b)?;
            Ok((BigInt::from(u), rest))
        }
        MAJOR_NEGINT => {
            let (i, rest) = read_i64(b)?;
            Ok((BigInt::from(i), rest))
        }
        MAJOR_TAG => read_big_int(b),
        _ => Err(ErrorKind::UnsupportedType.into()),
    }
}

fn read_exp_mant(b: &[u8], want_tag: u64) -> Result<(i64, BigInt, &[u8]), CborError> {
    let o = read_expected_tag(b, want_tag)?;
    let (len, indefinite, mut p) = read_array_start(o)?;
    if !indefinite && len != 2 {
        return Err(ErrorKind::ArrayLength { want: 2, got: len }.into());
    }
    let (exp, rest) = read_i64(p)?;
    p = rest;
    let (mant, rest) = read_int_or_bignum(p)?;
    p = rest;
    if indefinite {
        let (brk, rest) = read_break(p)?;
        if !brk {
            return Err(ErrorKind::ArrayLength { want: 2, got: 3 }.into());
        }
        p = rest;
    }
    Ok((exp, mant, p))
}

/// Reads a tag(4) decimal fraction `[exponent, mantissa]`.
///
/// The array may be definite or indefinite; the indefinite form requires a
/// trailing break after exactly two elements.
///
/// # Errors
///
/// `array-shape` when the pair has the wrong element count.
pub fn read_decimal_fraction(b: &[u8]) -> Result<(i64, BigInt, &[u8]), CborError> {
    read_exp_mant(b, TAG_DECIMAL_FRACTION)
}

/// Reads a tag(5) bigfloat `[exponent, mantissa]`.
///
/// # Errors
///
/// `array-shape` when the pair has the wrong element count.
pub fn read_bigfloat(b: &[u8]) -> Result<(i64, BigInt, &[u8]), CborError> {
    read_exp_mant(b, TAG_BIGFLOAT)
}

/// Reads a string-keyed string map into `m`.
///
/// # Errors
///
/// Propagates header and string errors.
pub fn read_map_str_str<'a>(
    b: &'a [u8],
    m: &mut HashMap<String, String>,
) -> Result<&'a [u8], CborError> {
    let (len, mut p) = read_map_header(b)?;
    for _ in 0..len {
        let (key, rest) = read_string(p)?;
        let (val, rest) = read_string(rest)?;
        m.insert(key, val);
        p = rest;
    }
    Ok(p)
}

/// Reads a CBOR numeric item and renders it as a decimal string, the JSON
/// number interop form.
///
/// # Errors
///
/// `unsupported-type` for non-numeric items.
pub fn read_json_number(b: &[u8]) -> Result<(String, &[u8]), CborError> {
    match crate::wire::next_kind(b) {
        Kind::Uint => {
            let (v, rest) = read_u64(b)?;
            Ok((v.to_string(), rest))
        }
        Kind::Int => {
            let (v, rest) = read_i64(b)?;
            Ok((v.to_string(), rest))
        }
        Kind::Float32 => {
            let &ib = b.first().ok_or_else(short_input)?;
            let (v, rest) = if additional_info(ib) == SIMPLE_FLOAT16 {
                read_f16(b)?
            } else {
                read_f32(b)?
            };
            Ok((format!("{v}"), rest))
        }
        Kind::Float64 => {
            let (v, rest) = read_f64(b)?;
            Ok((format!("{v}"), rest))
        }
        _ => Err(ErrorKind::UnsupportedType.into()),
    }
}

/// Skips one item and returns the raw bytes it occupied plus the remainder.
pub(crate) fn split_item(b: &[u8]) -> Result<(&[u8], &[u8]), CborError> {
    let rest = skip(b)?;
    let consumed = b.len() - rest.len();
    Ok((&b[..consumed], rest))
}
