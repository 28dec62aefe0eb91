//! RFC 8949 §8 diagnostic notation rendering.

use std::io::Write as _;

use crate::decode::{read_bytes, read_f16, read_f32, read_f64, read_str_zc, read_tag};
use crate::error::{short_input, CborError, ErrorKind};
use crate::pool;
use crate::wire::{
    additional_info, initial_byte, major_type, ADDINFO_INDEFINITE, ADDINFO_U8, MAJOR_ARRAY,
    MAJOR_BYTES, MAJOR_MAP, MAJOR_NEGINT, MAJOR_SIMPLE, MAJOR_TAG, MAJOR_TEXT, MAJOR_UINT,
    RECURSION_LIMIT, SIMPLE_BREAK, SIMPLE_FALSE, SIMPLE_FLOAT16, SIMPLE_FLOAT32, SIMPLE_FLOAT64,
    SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED,
};

/// Renders the next CBOR item in diagnostic notation and returns the string
/// with the remaining bytes.
///
/// # Errors
///
/// Propagates structural errors from the underlying readers.
pub fn diag(b: &[u8]) -> Result<(String, &[u8]), CborError> {
    let mut buf = pool::get_buffer();
    match diag_item(&mut buf, b, 0) {
        Ok(rest) => {
            let s = String::from_utf8_lossy(&buf).into_owned();
            pool::put_buffer(buf);
            Ok((s, rest))
        }
        Err(err) => {
            pool::put_buffer(buf);
            Err(err)
        }
    }
}

fn diag_item<'a>(buf: &mut Vec<u8>, b: &'a [u8], depth: usize) -> Result<&'a [u8], CborError> {
    if depth > RECURSION_LIMIT {
        return Err(ErrorKind::MaxDepthExceeded.into());
    }
    let &ib = b.first().ok_or_else(short_input)?;
    let major = major_type(ib);
    let info = additional_info(ib);

    match major {
        MAJOR_UINT => {
            let (u, rest) = crate::decode::read_u64(b)?;
            let _ = write!(buf, "{u}");
            Ok(rest)
        }
        MAJOR_NEGINT => {
            let (n, rest) = crate::decode::read_uint_core(b, MAJOR_NEGINT)?;
            // Render through i128 so the full 64-bit negative range prints.
            let v = -1_i128 - i128::from(n);
            let _ = write!(buf, "{v}");
            Ok(rest)
        }
        MAJOR_BYTES => {
            if info == ADDINFO_INDEFINITE {
                buf.extend_from_slice(b"(_");
                let mut p = &b[1..];
                let mut first = true;
                loop {
                    let &next = p.first().ok_or_else(short_input)?;
                    if next == initial_byte(MAJOR_SIMPLE, SIMPLE_BREAK) {
                        buf.push(b')');
                        return Ok(&p[1..]);
                    }
                    buf.extend_from_slice(if first { b" " } else { b", " });
                    first = false;
                    let (chunk, rest) = read_bytes(p)?;
                    push_hex(buf, &chunk);
                    p = rest;
                }
            }
            let (bs, rest) = read_bytes(b)?;
            push_hex(buf, &bs);
            Ok(rest)
        }
        MAJOR_TEXT => {
            if info == ADDINFO_INDEFINITE {
                buf.extend_from_slice(b"(_");
                let mut p = &b[1..];
                let mut first = true;
                loop {
                    let &next = p.first().ok_or_else(short_input)?;
                    if next == initial_byte(MAJOR_SIMPLE, SIMPLE_BREAK) {
                        buf.push(b')');
                        return Ok(&p[1..]);
                    }
                    buf.extend_from_slice(if first { b" " } else { b", " });
                    first = false;
                    let (chunk, rest) = read_str_zc(p)?;
                    let s = crate::utf8::validate(chunk)
                        .map_err(|()| CborError::new(ErrorKind::InvalidUtf8))?;
                    push_quoted(buf, s);
                    p = rest;
                }
            }
            let (s, rest) = crate::decode::read_string(b)?;
            push_quoted(buf, &s);
            Ok(rest)
        }
        MAJOR_ARRAY => {
            if info == ADDINFO_INDEFINITE {
                buf.extend_from_slice(b"[_");
                let mut p = &b[1..];
                let mut first = true;
                loop {
                    let &next = p.first().ok_or_else(short_input)?;
                    if next == initial_byte(MAJOR_SIMPLE, SIMPLE_BREAK) {
                        buf.push(b']');
                        return Ok(&p[1..]);
                    }
                    buf.extend_from_slice(if first { b" " } else { b", " });
                    first = false;
                    p = diag_item(buf, p, depth + 1)?;
                }
            }
            let (len, mut p) = crate::decode::read_array_header(b)?;
            buf.push(b'[');
            for i in 0..len {
                if i > 0 {
                    buf.extend_from_slice(b", ");
                }
                p = diag_item(buf, p, depth + 1)?;
            }
            buf.push(b']');
            Ok(p)
        }
        MAJOR_MAP => {
            if info == ADDINFO_INDEFINITE {
                buf.extend_from_slice(b"{_");
                let mut p = &b[1..];
                let mut first = true;
                loop {
                    let &next = p.first().ok_or_else(short_input)?;
                    if next == initial_byte(MAJOR_SIMPLE, SIMPLE_BREAK) {
                        buf.push(b'}');
                        return Ok(&p[1..]);
                    }
                    buf.extend_from_slice(if first { b" " } else { b", " });
                    first = false;
                    p = diag_item(buf, p, depth + 1)?;
                    buf.extend_from_slice(b": ");
                    p = diag_item(buf, p, depth + 1)?;
                }
            }
            let (len, mut p) = crate::decode::read_map_header(b)?;
            buf.push(b'{');
            for i in 0..len {
                if i > 0 {
                    buf.extend_from_slice(b", ");
                }
                p = diag_item(buf, p, depth + 1)?;
                buf.extend_from_slice(b": ");
                p = diag_item(buf, p, depth + 1)?;
            }
            buf.push(b'}');
            Ok(p)
        }
        MAJOR_TAG => {
            let (tag, rest) = read_tag(b)?;
            let _ = write!(buf, "{tag}(");
            let rest = diag_item(buf, rest, depth + 1)?;
            buf.push(b')');
            Ok(rest)
        }
        _ => match info {
            SIMPLE_FALSE => {
                buf.extend_from_slice(b"false");
                Ok(&b[1..])
            }
            SIMPLE_TRUE => {
                buf.extend_from_slice(b"true");
                Ok(&b[1..])
            }
            SIMPLE_NULL => {
                buf.extend_from_slice(b"null");
                Ok(&b[1..])
            }
            SIMPLE_UNDEFINED => {
                buf.extend_from_slice(b"undefined");
                Ok(&b[1..])
            }
            SIMPLE_FLOAT16 => {
                let (f, rest) = read_f16(b)?;
                push_float(buf, f64::from(f));
                Ok(rest)
            }
            SIMPLE_FLOAT32 => {
                let (f, rest) = read_f32(b)?;
                push_float(buf, f64::from(f));
                Ok(rest)
            }
            SIMPLE_FLOAT64 => {
                let (f, rest) = read_f64(b)?;
                push_float(buf, f);
                Ok(rest)
            }
            ADDINFO_U8 => {
                let &v = b.get(1).ok_or_else(short_input)?;
                let _ = write!(buf, "simple({v})");
                Ok(&b[2..])
            }
            info if info < SIMPLE_FALSE => {
                let _ = write!(buf, "simple({info})");
                Ok(&b[1..])
            }
            _ => Err(ErrorKind::UnsupportedType.into()),
        },
    }
}

fn push_hex(buf: &mut Vec<u8>, data: &[u8]) {
    buf.extend_from_slice(b"h'");
    buf.extend_from_slice(hex::encode(data).as_bytes());
    buf.push(b'\'');
}

fn push_quoted(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for c in s.chars() {
        match c {
            '"' => buf.extend_from_slice(b"\\\""),
            '\\' => buf.extend_from_slice(b"\\\\"),
            '\n' => buf.extend_from_slice(b"\\n"),
            '\r' => buf.extend_from_slice(b"\\r"),
            '\t' => buf.extend_from_slice(b"\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(buf, "\\u{:04x}", c as u32);
            }
            c => {
                let mut enc = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut enc).as_bytes());
            }
        }
    }
    buf.push(b'"');
}

fn push_float(buf: &mut Vec<u8>, f: f64) {
    if f.is_infinite() {
        buf.extend_from_slice(if f > 0.0 { b"Infinity" } else { b"-Infinity" });
        return;
    }
    if f.is_nan() {
        buf.extend_from_slice(b"NaN");
        return;
    }
    let af = f.abs();
    if af == 0.0 || af < 1e15 {
        let _ = write!(buf, "{f}");
    } else {
        let _ = write!(buf, "{f:e}");
    }
}
