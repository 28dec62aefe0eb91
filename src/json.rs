//! Bidirectional JSON interop.
//!
//! JSON maps to CBOR naturally where it can; CBOR concepts with no JSON
//! equivalent travel as `$`-prefixed wrapper objects
//! (`{"$uuid": "..."}`), with `{"$tag": N, "$": value}` as the generic
//! escape hatch. Tags 0, 1 and 32 unwrap to plain JSON strings.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use chrono::{DateTime, SecondsFormat, Utc};
use num_bigint::BigInt;
use serde_json::{Map, Number, Value as Json};
use uuid::Uuid;

use crate::decode::{
    read_base16_bytes, read_base64_bytes, read_base64_text, read_base64url_bytes,
    read_base64url_text, read_big_int, read_bigfloat, read_bytes, read_decimal_fraction,
    read_embedded_cbor, read_f16, read_f32, read_f64, read_mime_str, read_regex_str,
    read_rfc3339_time, read_string, read_tag, read_time, read_u64, read_uint_core, read_uri,
    read_uuid, strip_self_describe,
};
use crate::diag::diag;
use crate::encode::{
    append_array_header, append_base16, append_base64, append_base64_text, append_base64url,
    append_base64url_text, append_bigfloat, append_bool, append_decimal_fraction,
    append_embedded_cbor, append_f64, append_int, append_map_header, append_mime_str, append_null,
    append_regex_str, append_rfc3339_time, append_self_describe, append_str, append_tag,
    append_time, append_uint, append_uri, append_uuid,
};
use crate::error::{short_input, CborError, ErrorKind};
use crate::wire::{
    additional_info, initial_byte, major_type, ADDINFO_INDEFINITE, ADDINFO_U8, MAJOR_ARRAY,
    MAJOR_BYTES, MAJOR_MAP, MAJOR_NEGINT, MAJOR_SIMPLE, MAJOR_TAG, MAJOR_TEXT, MAJOR_UINT,
    RECURSION_LIMIT, SIMPLE_BREAK, SIMPLE_FALSE, SIMPLE_FLOAT16, SIMPLE_FLOAT32, SIMPLE_FLOAT64,
    SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED, TAG_BASE16, TAG_BASE64, TAG_BASE64URL,
    TAG_BASE64URL_TEXT, TAG_BASE64_TEXT, TAG_BIGFLOAT, TAG_DECIMAL_FRACTION, TAG_EMBEDDED_CBOR,
    TAG_EPOCH, TAG_MIME, TAG_NEG_BIGNUM, TAG_POS_BIGNUM, TAG_REGEX, TAG_RFC3339,
    TAG_SELF_DESCRIBE, TAG_URI, TAG_UUID,
};

/// Reports whether `b` looks like JSON text rather than CBOR.
///
/// A heuristic, not a discriminator: the input must be valid UTF-8 and its
/// first non-whitespace byte must start a JSON value.
#[must_use]
pub fn is_likely_json(b: &[u8]) -> bool {
    if crate::utf8::validate(b).is_err() {
        return false;
    }
    let Some(&ch) = b
        .iter()
        .find(|&&c| !matches!(c, b' ' | b'\n' | b'\r' | b'\t'))
    else {
        return false;
    };
    matches!(ch, b'{' | b'[' | b'"' | b'-' | b'0'..=b'9' | b't' | b'f' | b'n')
}

/// Converts a JSON document into CBOR bytes using the wrapper convention.
///
/// # Errors
///
/// `invalid-json` on parse failures or wrapper contract violations.
pub fn from_json(js: &[u8]) -> Result<Vec<u8>, CborError> {
    let v: Json =
        serde_json::from_slice(js).map_err(|_| CborError::new(ErrorKind::InvalidJson))?;
    let mut out = Vec::new();
    json_to_cbor(&mut out, &v)?;
    Ok(out)
}

fn json_to_cbor(b: &mut Vec<u8>, v: &Json) -> Result<(), CborError> {
    match v {
        Json::Null => append_null(b),
        Json::Bool(x) => append_bool(b, *x),
        Json::Number(n) => append_json_number(b, n)?,
        Json::String(s) => append_str(b, s),
        Json::Array(items) => {
            append_array_header(b, items.len() as u32);
            for item in items {
                json_to_cbor(b, item)?;
            }
        }
        Json::Object(m) => {
            if try_wrapper(b, m)? {
                return Ok(());
            }
            append_map_header(b, m.len() as u32);
            for (k, vv) in m {
                append_str(b, k);
                json_to_cbor(b, vv)?;
            }
        }
    }
    Ok(())
}

/// Integer-looking JSON numbers become CBOR integers; everything else is
/// binary64.
fn append_json_number(b: &mut Vec<u8>, n: &Number) -> Result<(), CborError> {
    if let Some(i) = n.as_i64() {
        append_int(b, i);
        return Ok(());
    }
    if let Some(u) = n.as_u64() {
        append_uint(b, u);
        return Ok(());
    }
    let f = n.as_f64().ok_or_else(|| CborError::new(ErrorKind::InvalidJson))?;
    append_f64(b, f);
    Ok(())
}

fn invalid_json() -> CborError {
    CborError::new(ErrorKind::InvalidJson)
}

fn wrapper_str<'j>(m: &'j Map<String, Json>, key: &str) -> Result<&'j str, CborError> {
    m.get(key)
        .and_then(Json::as_str)
        .ok_or_else(invalid_json)
}

/// Recognizes a wrapper object and emits the tagged form.
///
/// Returns `Ok(false)` when `m` is a plain object.
fn try_wrapper(b: &mut Vec<u8>, m: &Map<String, Json>) -> Result<bool, CborError> {
    if m.len() == 2 && m.contains_key("$tag") {
        let tag = m
            .get("$tag")
            .and_then(Json::as_u64)
            .ok_or_else(invalid_json)?;
        let inner = m.get("$").ok_or_else(invalid_json)?;
        append_tag(b, tag);
        json_to_cbor(b, inner)?;
        return Ok(true);
    }
    if m.len() != 1 {
        return Ok(false);
    }
    let (key, v) = match m.iter().next() {
        Some(kv) => kv,
        None => return Ok(false),
    };
    match key.as_str() {
        "$rfc3339" => {
            let s = v.as_str().ok_or_else(invalid_json)?;
            let t = DateTime::parse_from_rfc3339(s)
                .map_err(|_| CborError::new(ErrorKind::InvalidTimestamp))?;
            append_rfc3339_time(b, &t.with_timezone(&Utc));
        }
        "$epoch" => {
            let f = v.as_f64().ok_or_else(invalid_json)?;
            let sec = f.floor();
            let mut ns = ((f - sec) * 1e9).round() as i64;
            let mut secs = sec as i64;
            if ns >= 1_000_000_000 {
                secs += 1;
                ns -= 1_000_000_000;
            }
            let t = DateTime::from_timestamp(secs, ns as u32).ok_or_else(invalid_json)?;
            append_time(b, &t);
        }
        "$decimal" => {
            let (exp, mant) = wrapper_exp_mant(v)?;
            append_decimal_fraction(b, exp, &mant);
        }
        "$bigfloat" => {
            let (exp, mant) = wrapper_exp_mant(v)?;
            append_bigfloat(b, exp, &mant);
        }
        "$base64url" => {
            let s = v.as_str().ok_or_else(invalid_json)?;
            let data = URL_SAFE_NO_PAD.decode(s).map_err(|_| invalid_json())?;
            append_base64url(b, &data);
        }
        "$base64" => {
            let s = v.as_str().ok_or_else(invalid_json)?;
            let data = STANDARD.decode(s).map_err(|_| invalid_json())?;
            append_base64(b, &data);
        }
        "$base16" => {
            let s = v.as_str().ok_or_else(invalid_json)?;
            let data = hex::decode(s).map_err(|_| invalid_json())?;
            append_base16(b, &data);
        }
        "$cbor" => {
            let s = v.as_str().ok_or_else(invalid_json)?;
            let data = STANDARD.decode(s).map_err(|_| invalid_json())?;
            append_embedded_cbor(b, &data);
        }
        "$uri" => {
            let s = v.as_str().ok_or_else(invalid_json)?;
            if s.is_empty() {
                return Err(invalid_json());
            }
            append_uri(b, s);
        }
        "$base64urlstr" => append_base64url_text(b, wrapper_str(m, "$base64urlstr")?),
        "$base64str" => append_base64_text(b, wrapper_str(m, "$base64str")?),
        "$regex" => {
            let s = v.as_str().ok_or_else(invalid_json)?;
            if s.is_empty() {
                return Err(invalid_json());
            }
            regex::Regex::new(s).map_err(|_| CborError::new(ErrorKind::InvalidPattern))?;
            append_regex_str(b, s);
        }
        "$mime" => {
            let s = v.as_str().ok_or_else(invalid_json)?;
            if s.is_empty() {
                return Err(invalid_json());
            }
            append_mime_str(b, s);
        }
        "$uuid" => {
            let s = v.as_str().ok_or_else(invalid_json)?;
            if s.len() != 36 {
                return Err(invalid_json());
            }
            let uuid = Uuid::parse_str(s).map_err(|_| invalid_json())?;
            append_uuid(b, uuid);
        }
        "$selfdescribe" => {
            if v.as_bool() != Some(true) {
                return Err(invalid_json());
            }
            append_self_describe(b);
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn wrapper_exp_mant(v: &Json) -> Result<(i64, BigInt), CborError> {
    let arr = v.as_array().ok_or_else(invalid_json)?;
    if arr.len() != 2 {
        return Err(invalid_json());
    }
    let exp = arr[0].as_i64().ok_or_else(invalid_json)?;
    let mant: BigInt = arr[1]
        .as_str()
        .ok_or_else(invalid_json)?
        .parse()
        .map_err(|_| invalid_json())?;
    Ok((exp, mant))
}

/// Converts the next CBOR item into JSON bytes and returns the remainder.
///
/// # Errors
///
/// Propagates structural errors; unrepresentable items fail with
/// `unsupported-type`.
pub fn to_json(b: &[u8]) -> Result<(Vec<u8>, &[u8]), CborError> {
    let (v, rest) = cbor_to_json(b, 0)?;
    let out = serde_json::to_vec(&v).map_err(|_| CborError::new(ErrorKind::InvalidJson))?;
    Ok((out, rest))
}

fn rfc3339_string(t: &DateTime<Utc>) -> Json {
    Json::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn float_json(f: f64) -> Json {
    match Number::from_f64(f) {
        Some(n) => Json::Number(n),
        None => Json::Null,
    }
}

#[allow(clippy::too_many_lines)]
fn cbor_to_json(b: &[u8], depth: usize) -> Result<(Json, &[u8]), CborError> {
    if depth > RECURSION_LIMIT {
        return Err(ErrorKind::MaxDepthExceeded.into());
    }
    let &ib = b.first().ok_or_else(short_input)?;
    let major = major_type(ib);
    let info = additional_info(ib);

    match major {
        MAJOR_UINT => {
            let (u, rest) = read_u64(b)?;
            Ok((Json::Number(Number::from(u)), rest))
        }
        MAJOR_NEGINT => {
            let (n, rest) = read_uint_core(b, MAJOR_NEGINT)?;
            let v = -1_i128 - i128::from(n);
            let out = match i64::try_from(v) {
                Ok(i) => Json::Number(Number::from(i)),
                Err(_) => Json::String(v.to_string()),
            };
            Ok((out, rest))
        }
        MAJOR_BYTES => {
            let (bs, rest) = read_bytes(b)?;
            Ok((Json::String(STANDARD.encode(bs)), rest))
        }
        MAJOR_TEXT => {
            let (s, rest) = read_string(b)?;
            Ok((Json::String(s), rest))
        }
        MAJOR_ARRAY => {
            let mut items = Vec::new();
            if info == ADDINFO_INDEFINITE {
                let mut p = &b[1..];
                loop {
                    let &next = p.first().ok_or_else(short_input)?;
                    if next == initial_byte(MAJOR_SIMPLE, SIMPLE_BREAK) {
                        return Ok((Json::Array(items), &p[1..]));
                    }
                    let (item, rest) = cbor_to_json(p, depth + 1)?;
                    items.push(item);
                    p = rest;
                }
            }
            let (len, mut p) = crate::decode::read_array_header(b)?;
            items.reserve(len as usize);
            for _ in 0..len {
                let (item, rest) = cbor_to_json(p, depth + 1)?;
                items.push(item);
                p = rest;
            }
            Ok((Json::Array(items), p))
        }
        MAJOR_MAP => {
            let mut out = Map::new();
            if info == ADDINFO_INDEFINITE {
                let mut p = &b[1..];
                loop {
                    let &next = p.first().ok_or_else(short_input)?;
                    if next == initial_byte(MAJOR_SIMPLE, SIMPLE_BREAK) {
                        return Ok((Json::Object(out), &p[1..]));
                    }
                    let (key, rest) = json_map_key(p)?;
                    let (val, rest) = cbor_to_json(rest, depth + 1)?;
                    out.insert(key, val);
                    p = rest;
                }
            }
            let (len, mut p) = crate::decode::read_map_header(b)?;
            for _ in 0..len {
                let (key, rest) = json_map_key(p)?;
                let (val, rest) = cbor_to_json(rest, depth + 1)?;
                out.insert(key, val);
                p = rest;
            }
            Ok((Json::Object(out), p))
        }
        MAJOR_TAG => tagged_to_json(b, depth),
        _ => match info {
            SIMPLE_FALSE => Ok((Json::Bool(false), &b[1..])),
            SIMPLE_TRUE => Ok((Json::Bool(true), &b[1..])),
            SIMPLE_NULL | SIMPLE_UNDEFINED => Ok((Json::Null, &b[1..])),
            SIMPLE_FLOAT16 => {
                let (f, rest) = read_f16(b)?;
                Ok((float_json(f64::from(f)), rest))
            }
            SIMPLE_FLOAT32 => {
                let (f, rest) = read_f32(b)?;
                Ok((float_json(f64::from(f)), rest))
            }
            SIMPLE_FLOAT64 => {
                let (f, rest) = read_f64(b)?;
                Ok((float_json(f), rest))
            }
            ADDINFO_U8 => {
                if b.len() < 2 {
                    return Err(short_input());
                }
                Ok((Json::Null, &b[2..]))
            }
            info if info < SIMPLE_FALSE => Ok((Json::Null, &b[1..])),
            _ => Err(ErrorKind::UnsupportedType.into()),
        },
    }
}

/// Text keys pass through; any other key kind renders via diagnostic
/// notation and becomes a JSON string key.
fn json_map_key(b: &[u8]) -> Result<(String, &[u8]), CborError> {
    if major_type(*b.first().ok_or_else(short_input)?) == MAJOR_TEXT {
        read_string(b)
    } else {
        diag(b)
    }
}

fn wrapper1(key: &str, v: Json) -> Json {
    let mut m = Map::new();
    m.insert(key.to_owned(), v);
    Json::Object(m)
}

fn tagged_to_json(b: &[u8], depth: usize) -> Result<(Json, &[u8]), CborError> {
    let (tag, after_tag) = read_tag(b)?;
    match tag {
        TAG_RFC3339 => {
            let (t, rest) = read_rfc3339_time(b)?;
            Ok((rfc3339_string(&t), rest))
        }
        TAG_EPOCH => {
            let (t, rest) = read_time(b)?;
            Ok((rfc3339_string(&t), rest))
        }
        TAG_POS_BIGNUM | TAG_NEG_BIGNUM => {
            let (z, rest) = read_big_int(b)?;
            Ok((Json::String(z.to_string()), rest))
        }
        TAG_DECIMAL_FRACTION => {
            let (exp, mant, rest) = read_decimal_fraction(b)?;
            let arr = Json::Array(vec![
                Json::Number(Number::from(exp)),
                Json::String(mant.to_string()),
            ]);
            Ok((wrapper1("$decimal", arr), rest))
        }
        TAG_BIGFLOAT => {
            let (exp, mant, rest) = read_bigfloat(b)?;
            let arr = Json::Array(vec![
                Json::Number(Number::from(exp)),
                Json::String(mant.to_string()),
            ]);
            Ok((wrapper1("$bigfloat", arr), rest))
        }
        TAG_BASE64URL => {
            let (bs, rest) = read_base64url_bytes(b)?;
            Ok((wrapper1("$base64url", Json::String(URL_SAFE_NO_PAD.encode(bs))), rest))
        }
        TAG_BASE64 => {
            let (bs, rest) = read_base64_bytes(b)?;
            Ok((wrapper1("$base64", Json::String(STANDARD.encode(bs))), rest))
        }
        TAG_BASE16 => {
            let (bs, rest) = read_base16_bytes(b)?;
            Ok((wrapper1("$base16", Json::String(hex::encode(bs))), rest))
        }
        TAG_EMBEDDED_CBOR => {
            let (payload, rest) = read_embedded_cbor(b)?;
            Ok((wrapper1("$cbor", Json::String(STANDARD.encode(payload))), rest))
        }
        TAG_URI => {
            let (s, rest) = read_uri(b)?;
            Ok((Json::String(s), rest))
        }
        TAG_BASE64URL_TEXT => {
            let (s, rest) = read_base64url_text(b)?;
            Ok((wrapper1("$base64urlstr", Json::String(s)), rest))
        }
        TAG_BASE64_TEXT => {
            let (s, rest) = read_base64_text(b)?;
            Ok((wrapper1("$base64str", Json::String(s)), rest))
        }
        TAG_REGEX => {
            let (s, rest) = read_regex_str(b)?;
            Ok((wrapper1("$regex", Json::String(s)), rest))
        }
        TAG_MIME => {
            let (s, rest) = read_mime_str(b)?;
            Ok((wrapper1("$mime", Json::String(s)), rest))
        }
        TAG_UUID => {
            let (u, rest) = read_uuid(b)?;
            Ok((wrapper1("$uuid", Json::String(u.hyphenated().to_string())), rest))
        }
        TAG_SELF_DESCRIBE => {
            let (rest, found) = strip_self_describe(b)?;
            if !found {
                return Err(ErrorKind::UnsupportedType.into());
            }
            Ok((wrapper1("$selfdescribe", Json::Bool(true)), rest))
        }
        _ => {
            let (inner, rest) = cbor_to_json(after_tag, depth + 1)?;
            let mut m = Map::new();
            m.insert("$tag".to_owned(), Json::Number(Number::from(tag)));
            m.insert("$".to_owned(), inner);
            Ok((Json::Object(m), rest))
        }
    }
}
