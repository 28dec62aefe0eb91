//! CBOR sequences: zero or more concatenated items with no framing.
//! An empty sequence is the empty byte string.

use crate::decode::split_item;
use crate::error::CborError;

/// Appends pre-encoded items to `b`.
///
/// Each item must be a complete CBOR data item.
pub fn append_sequence<'x, I>(b: &mut Vec<u8>, items: I)
where
    I: IntoIterator<Item = &'x [u8]>,
{
    for item in items {
        b.extend_from_slice(item);
    }
}

/// Visits each item of the sequence in `b`.
///
/// The slice handed to `f` references `b` and holds exactly one item.
///
/// # Errors
///
/// Propagates traversal errors and the first error returned by `f`.
pub fn for_each_sequence<F>(b: &[u8], mut f: F) -> Result<(), CborError>
where
    F: FnMut(&[u8]) -> Result<(), CborError>,
{
    let mut p = b;
    while !p.is_empty() {
        let (item, rest) = split_item(p)?;
        f(item)?;
        p = rest;
    }
    Ok(())
}

/// Splits a sequence into per-item views referencing the original buffer.
///
/// # Errors
///
/// Propagates traversal errors.
pub fn split_sequence(b: &[u8]) -> Result<Vec<&[u8]>, CborError> {
    let mut out = Vec::new();
    let mut p = b;
    while !p.is_empty() {
        let (item, rest) = split_item(p)?;
        out.push(item);
        p = rest;
    }
    Ok(out)
}
