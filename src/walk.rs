//! Structural traversal: skip one item without decoding it, and the
//! well-formedness validator built on the same walk.

use crate::error::{short_input, CborError, ErrorKind};
use crate::utf8;
use crate::wire::{
    additional_info, initial_byte, major_type, ADDINFO_DIRECT, ADDINFO_INDEFINITE, ADDINFO_U16,
    ADDINFO_U32, ADDINFO_U64, ADDINFO_U8, MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_NEGINT,
    MAJOR_SIMPLE, MAJOR_TAG, MAJOR_TEXT, MAJOR_UINT, RECURSION_LIMIT, SIMPLE_BREAK, SIMPLE_FALSE,
    SIMPLE_FLOAT16, SIMPLE_FLOAT32, SIMPLE_FLOAT64, SIMPLE_NULL, SIMPLE_TRUE, SIMPLE_UNDEFINED,
};

/// Stack sentinel for a container that runs until its break byte.
const UNTIL_BREAK: usize = usize::MAX;

/// Skips over the next CBOR item and returns the remaining bytes.
///
/// The walk is structural: container headers are read, bodies are stepped
/// over, and each tag counts one nesting level. The traversal uses an
/// explicit stack of pending item counts, bounded by the recursion ceiling.
///
/// # Errors
///
/// `short-input` on truncation, `max-depth-exceeded` past the ceiling, and
/// `unsupported-type` on malformed simple values.
pub fn skip(b: &[u8]) -> Result<&[u8], CborError> {
    walk(b, false)
}

/// Validates that the next item is well-formed per RFC 8949 and returns the
/// remaining bytes.
///
/// On top of the structural walk this rejects reserved additional-info
/// values 28..=30, validates UTF-8 of every text payload and text chunk,
/// and requires indefinite-string chunks to repeat the outer major type.
///
/// # Errors
///
/// `invalid-additional-info`, `invalid-utf8`, plus everything [`skip`]
/// reports.
pub fn validate_well_formed(b: &[u8]) -> Result<&[u8], CborError> {
    walk(b, true)
}

/// Validates every item in `b` until the input is exhausted.
///
/// # Errors
///
/// See [`validate_well_formed`].
pub fn validate_document(mut b: &[u8]) -> Result<(), CborError> {
    while !b.is_empty() {
        b = validate_well_formed(b)?;
    }
    Ok(())
}

fn walk(b: &[u8], validate: bool) -> Result<&[u8], CborError> {
    let mut pos = b;
    let mut stack: Vec<usize> = Vec::new();
    stack.push(1);

    while let Some(top) = stack.last_mut() {
        if *top == 0 {
            stack.pop();
            continue;
        }
        if *top == UNTIL_BREAK {
            let &ib = pos.first().ok_or_else(short_input)?;
            if ib == initial_byte(MAJOR_SIMPLE, SIMPLE_BREAK) {
                pos = &pos[1..];
                stack.pop();
                continue;
            }
        } else {
            *top -= 1;
        }

        let (&ib, rest) = pos.split_first().ok_or_else(short_input)?;
        let major = major_type(ib);
        let info = additional_info(ib);

        if validate && (28..=30).contains(&info) {
            return Err(ErrorKind::InvalidAdditionalInfo { info }.into());
        }

        match major {
            MAJOR_UINT | MAJOR_NEGINT => {
                pos = skip_uint_arg(pos, info)?;
            }
            MAJOR_BYTES | MAJOR_TEXT => {
                if info == ADDINFO_INDEFINITE {
                    pos = skip_string_chunks(rest, major, validate)?;
                } else {
                    pos = skip_string_payload(pos, major, info, validate)?;
                }
            }
            MAJOR_ARRAY => {
                if info == ADDINFO_INDEFINITE {
                    push_level(&mut stack, UNTIL_BREAK)?;
                    pos = rest;
                } else {
                    let (len, after) = read_arg(pos, info)?;
                    let len = usize::try_from(len).map_err(|_| short_input())?;
                    push_level(&mut stack, len)?;
                    pos = after;
                }
            }
            MAJOR_MAP => {
                if info == ADDINFO_INDEFINITE {
                    push_level(&mut stack, UNTIL_BREAK)?;
                    pos = rest;
                } else {
                    let (len, after) = read_arg(pos, info)?;
                    let items = len.checked_mul(2).ok_or_else(short_input)?;
                    let items = usize::try_from(items).map_err(|_| short_input())?;
                    push_level(&mut stack, items)?;
                    pos = after;
                }
            }
            MAJOR_TAG => {
                let (_, after) = read_arg(pos, info)?;
                push_level(&mut stack, 1)?;
                pos = after;
            }
            _ => match info {
                SIMPLE_FALSE | SIMPLE_TRUE | SIMPLE_NULL | SIMPLE_UNDEFINED => pos = rest,
                SIMPLE_FLOAT16 => pos = take(pos, 3)?,
                SIMPLE_FLOAT32 => pos = take(pos, 5)?,
                SIMPLE_FLOAT64 => pos = take(pos, 9)?,
                ADDINFO_U8 => pos = take(pos, 2)?,
                info if info < SIMPLE_FALSE => pos = rest,
                _ => return Err(ErrorKind::UnsupportedType.into()),
            },
        }
    }

    Ok(pos)
}

fn push_level(stack: &mut Vec<usize>, level: usize) -> Result<(), CborError> {
    if stack.len() >= RECURSION_LIMIT {
        return Err(ErrorKind::MaxDepthExceeded.into());
    }
    stack.push(level);
    Ok(())
}

#[inline]
fn take(b: &[u8], n: usize) -> Result<&[u8], CborError> {
    if b.len() < n {
        return Err(short_input());
    }
    Ok(&b[n..])
}

/// Steps over the initial byte plus its unsigned argument.
fn skip_uint_arg(b: &[u8], info: u8) -> Result<&[u8], CborError> {
    match info {
        0..=ADDINFO_DIRECT => take(b, 1),
        ADDINFO_U8 => take(b, 2),
        ADDINFO_U16 => take(b, 3),
        ADDINFO_U32 => take(b, 5),
        ADDINFO_U64 => take(b, 9),
        _ => Err(ErrorKind::UnsupportedType.into()),
    }
}

/// Reads the unsigned argument following an initial byte at `b[0]`.
fn read_arg(b: &[u8], info: u8) -> Result<(u64, &[u8]), CborError> {
    let rest = &b[1..];
    match info {
        0..=ADDINFO_DIRECT => Ok((u64::from(info), rest)),
        ADDINFO_U8 => {
            let (&v, rest) = rest.split_first().ok_or_else(short_input)?;
            Ok((u64::from(v), rest))
        }
        ADDINFO_U16 => {
            if rest.len() < 2 {
                return Err(short_input());
            }
            let v = u16::from_be_bytes([rest[0], rest[1]]);
            Ok((u64::from(v), &rest[2..]))
        }
        ADDINFO_U32 => {
            if rest.len() < 4 {
                return Err(short_input());
            }
            let v = u32::from_be_bytes([rest[0], rest[1], rest[2], rest[3]]);
            Ok((u64::from(v), &rest[4..]))
        }
        ADDINFO_U64 => {
            if rest.len() < 8 {
                return Err(short_input());
            }
            let mut be = [0u8; 8];
            be.copy_from_slice(&rest[..8]);
            Ok((u64::from_be_bytes(be), &rest[8..]))
        }
        _ => Err(ErrorKind::UnsupportedType.into()),
    }
}

/// Steps over one definite string (header at `b[0]`), validating UTF-8 for
/// text when requested.
fn skip_string_payload(b: &[u8], major: u8, info: u8, validate: bool) -> Result<&[u8], CborError> {
    let (len, after) = read_arg(b, info)?;
    let len = usize::try_from(len).map_err(|_| short_input())?;
    if after.len() < len {
        return Err(short_input());
    }
    if validate && major == MAJOR_TEXT && utf8::validate(&after[..len]).is_err() {
        return Err(ErrorKind::InvalidUtf8.into());
    }
    Ok(&after[len..])
}

/// Steps over the chunk series of an indefinite string until its break.
///
/// Every chunk must be a definite-length string of the outer major type.
fn skip_string_chunks(mut p: &[u8], major: u8, validate: bool) -> Result<&[u8], CborError> {
    loop {
        let &ib = p.first().ok_or_else(short_input)?;
        if ib == initial_byte(MAJOR_SIMPLE, SIMPLE_BREAK) {
            return Ok(&p[1..]);
        }
        let chunk_major = major_type(ib);
        let chunk_info = additional_info(ib);
        if chunk_major != major || chunk_info == ADDINFO_INDEFINITE {
            return Err(ErrorKind::InvalidPrefix {
                want: major,
                got: chunk_major,
            }
            .into());
        }
        if validate && (28..=30).contains(&chunk_info) {
            return Err(ErrorKind::InvalidAdditionalInfo { info: chunk_info }.into());
        }
        p = skip_string_payload(p, major, chunk_info, validate)?;
    }
}
