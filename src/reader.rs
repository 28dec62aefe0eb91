//! A slice-backed stateful reader with strict and deterministic acceptance
//! modes and a container-size ceiling, plus the duplicate-key and
//! wire-order map helpers that operate on raw slices.

use std::collections::HashSet;

use crate::decode::{
    read_array_header, read_array_start, read_bool, read_bytes, read_f32, read_f64, read_i64,
    read_map_header, read_map_start, read_string, read_u64, split_item,
};
use crate::encode::canonical_float_bytes;
use crate::error::{bad_prefix, short_input, CborError, ErrorKind};
use crate::walk::skip;
use crate::wire::{
    additional_info, initial_byte, major_type, ADDINFO_INDEFINITE, ADDINFO_U16, ADDINFO_U32,
    ADDINFO_U64, ADDINFO_U8, MAJOR_ARRAY, MAJOR_BYTES, MAJOR_MAP, MAJOR_NEGINT, MAJOR_SIMPLE,
    MAJOR_TEXT, MAJOR_UINT, SIMPLE_BREAK,
};

/// Cursor over a caller-owned buffer with per-instance acceptance modes.
///
/// - **strict**: every integer and length header must use the canonical
///   minimal width, and floats must match their canonical re-encoding byte
///   for byte.
/// - **deterministic**: indefinite-length containers and strings are
///   rejected.
/// - **`max_container`**: non-zero values bound array/map sizes before any
///   allocation happens.
///
/// Operations consume from the buffer head; on error the cursor does not
/// move.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
    strict: bool,
    deterministic: bool,
    max_container: u32,
}

impl<'a> Reader<'a> {
    /// Constructs a reader over `b` with both modes off and no size limit.
    #[must_use]
    pub const fn new(b: &'a [u8]) -> Self {
        Self {
            buf: b,
            strict: false,
            deterministic: false,
            max_container: 0,
        }
    }

    /// Enables or disables strict canonical-width checking.
    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    /// Enables or disables rejection of indefinite-length items.
    pub fn set_deterministic(&mut self, deterministic: bool) {
        self.deterministic = deterministic;
    }

    /// Sets the container-size ceiling; zero disables the limit.
    pub fn set_max_container_len(&mut self, max: u32) {
        self.max_container = max;
    }

    /// Returns the unread portion of the buffer.
    #[must_use]
    pub const fn remaining(&self) -> &'a [u8] {
        self.buf
    }

    fn check_canonical_header(&self, expected_major: u8) -> Result<(), CborError> {
        if !self.strict {
            return Ok(());
        }
        if is_non_canonical_header(self.buf, expected_major)? {
            return Err(ErrorKind::NonCanonicalLength.into());
        }
        Ok(())
    }

    fn check_container_len(&self, len: u32) -> Result<(), CborError> {
        if self.max_container > 0 && len > self.max_container {
            return Err(ErrorKind::ContainerTooLarge.into());
        }
        Ok(())
    }

    fn reject_indefinite(&self, major: u8) -> Result<(), CborError> {
        if !self.deterministic {
            return Ok(());
        }
        if let Some(&ib) = self.buf.first() {
            if major_type(ib) == major && additional_info(ib) == ADDINFO_INDEFINITE {
                return Err(ErrorKind::IndefiniteForbidden.into());
            }
        }
        Ok(())
    }

    /// Reads a definite array header.
    ///
    /// # Errors
    ///
    /// `non-canonical-length` in strict mode, `container-too-large` past the
    /// ceiling, plus the stateless header errors.
    pub fn read_array_header(&mut self) -> Result<u32, CborError> {
        self.check_canonical_header(MAJOR_ARRAY)?;
        let (len, rest) = read_array_header(self.buf)?;
        self.check_container_len(len)?;
        self.buf = rest;
        Ok(len)
    }

    /// Reads an array start, reporting whether it is indefinite.
    ///
    /// # Errors
    ///
    /// `indefinite-forbidden` in deterministic mode.
    pub fn read_array_start(&mut self) -> Result<(u32, bool), CborError> {
        self.reject_indefinite(MAJOR_ARRAY)?;
        let (len, indefinite, rest) = read_array_start(self.buf)?;
        if !indefinite {
            self.check_container_len(len)?;
        }
        self.buf = rest;
        Ok((len, indefinite))
    }

    /// Reads a definite map header.
    ///
    /// # Errors
    ///
    /// `non-canonical-length` in strict mode, `container-too-large` past the
    /// ceiling, plus the stateless header errors.
    pub fn read_map_header(&mut self) -> Result<u32, CborError> {
        self.check_canonical_header(MAJOR_MAP)?;
        let (len, rest) = read_map_header(self.buf)?;
        self.check_container_len(len)?;
        self.buf = rest;
        Ok(len)
    }

    /// Reads a map start, reporting whether it is indefinite.
    ///
    /// # Errors
    ///
    /// `indefinite-forbidden` in deterministic mode.
    pub fn read_map_start(&mut self) -> Result<(u32, bool), CborError> {
        self.reject_indefinite(MAJOR_MAP)?;
        let (len, indefinite, rest) = read_map_start(self.buf)?;
        if !indefinite {
            self.check_container_len(len)?;
        }
        self.buf = rest;
        Ok((len, indefinite))
    }

    /// Reads an owned text string.
    ///
    /// # Errors
    ///
    /// `non-canonical-length` in strict mode, `indefinite-forbidden` in
    /// deterministic mode, plus the stateless string errors.
    pub fn read_string(&mut self) -> Result<String, CborError> {
        self.check_canonical_header(MAJOR_TEXT)?;
        self.reject_indefinite(MAJOR_TEXT)?;
        let (s, rest) = read_string(self.buf)?;
        self.buf = rest;
        Ok(s)
    }

    /// Reads an owned byte string.
    ///
    /// # Errors
    ///
    /// `non-canonical-length` in strict mode, `indefinite-forbidden` in
    /// deterministic mode, plus the stateless byte-string errors.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>, CborError> {
        self.check_canonical_header(MAJOR_BYTES)?;
        self.reject_indefinite(MAJOR_BYTES)?;
        let (v, rest) = read_bytes(self.buf)?;
        let v = v.into_owned();
        self.buf = rest;
        Ok(v)
    }

    /// Reads a boolean.
    ///
    /// # Errors
    ///
    /// See the stateless [`read_bool`].
    pub fn read_bool(&mut self) -> Result<bool, CborError> {
        let (v, rest) = read_bool(self.buf)?;
        self.buf = rest;
        Ok(v)
    }

    /// Reads a signed integer.
    ///
    /// # Errors
    ///
    /// `non-canonical-length` in strict mode when the integer header is not
    /// minimal.
    pub fn read_i64(&mut self) -> Result<i64, CborError> {
        if self.strict {
            if let Some(&ib) = self.buf.first() {
                let major = major_type(ib);
                if (major == MAJOR_UINT || major == MAJOR_NEGINT)
                    && is_non_canonical_header(self.buf, major)?
                {
                    return Err(ErrorKind::NonCanonicalLength.into());
                }
            }
        }
        let (v, rest) = read_i64(self.buf)?;
        self.buf = rest;
        Ok(v)
    }

    /// Reads an unsigned integer.
    ///
    /// # Errors
    ///
    /// `non-canonical-length` in strict mode when the integer header is not
    /// minimal.
    pub fn read_u64(&mut self) -> Result<u64, CborError> {
        if self.strict {
            if let Some(&ib) = self.buf.first() {
                if major_type(ib) == MAJOR_UINT && is_non_canonical_header(self.buf, MAJOR_UINT)? {
                    return Err(ErrorKind::NonCanonicalLength.into());
                }
            }
        }
        let (v, rest) = read_u64(self.buf)?;
        self.buf = rest;
        Ok(v)
    }

    /// Reads a binary32 float.
    ///
    /// # Errors
    ///
    /// `non-canonical-float` in strict mode when the wire bytes differ from
    /// the value's canonical encoding.
    pub fn read_f32(&mut self) -> Result<f32, CborError> {
        let (v, rest) = read_f32(self.buf)?;
        if self.strict {
            self.check_canonical_float(f64::from(v), rest)?;
        }
        self.buf = rest;
        Ok(v)
    }

    /// Reads a binary64 float.
    ///
    /// # Errors
    ///
    /// `non-canonical-float` in strict mode when the wire bytes differ from
    /// the value's canonical encoding.
    pub fn read_f64(&mut self) -> Result<f64, CborError> {
        let (v, rest) = read_f64(self.buf)?;
        if self.strict {
            self.check_canonical_float(v, rest)?;
        }
        self.buf = rest;
        Ok(v)
    }

    fn check_canonical_float(&self, v: f64, rest: &[u8]) -> Result<(), CborError> {
        let consumed = self.buf.len() - rest.len();
        let canon = canonical_float_bytes(v);
        if canon.as_slice() != &self.buf[..consumed] {
            return Err(ErrorKind::NonCanonicalFloat.into());
        }
        Ok(())
    }

    /// Skips over the next item.
    ///
    /// # Errors
    ///
    /// See the stateless [`skip`].
    pub fn skip(&mut self) -> Result<(), CborError> {
        self.buf = skip(self.buf)?;
        Ok(())
    }
}

/// Reports whether the leading header of `b` uses a non-minimal argument
/// width for the given major type.
fn is_non_canonical_header(b: &[u8], expected_major: u8) -> Result<bool, CborError> {
    let &ib = b.first().ok_or_else(short_input)?;
    let major = major_type(ib);
    if major != expected_major {
        return Err(bad_prefix(expected_major, major));
    }
    let info = additional_info(ib);
    match info {
        // Direct values and indefinite form are canonical by construction;
        // deterministic mode handles indefinite separately.
        0..=23 | ADDINFO_INDEFINITE => Ok(false),
        ADDINFO_U8 => {
            let &v = b.get(1).ok_or_else(short_input)?;
            Ok(v <= 23)
        }
        ADDINFO_U16 => {
            if b.len() < 3 {
                return Err(short_input());
            }
            Ok(u16::from_be_bytes([b[1], b[2]]) <= u16::from(u8::MAX))
        }
        ADDINFO_U32 => {
            if b.len() < 5 {
                return Err(short_input());
            }
            Ok(u32::from_be_bytes([b[1], b[2], b[3], b[4]]) <= u32::from(u16::MAX))
        }
        ADDINFO_U64 => {
            if b.len() < 9 {
                return Err(short_input());
            }
            let mut be = [0u8; 8];
            be.copy_from_slice(&b[1..9]);
            Ok(u64::from_be_bytes(be) <= u64::from(u32::MAX))
        }
        info => Err(ErrorKind::InvalidAdditionalInfo { info }.into()),
    }
}

/// Decodes a map (definite or indefinite) and rejects duplicate keys.
///
/// Key identity is the raw encoded key bytes. Returns the bytes after the
/// map.
///
/// # Errors
///
/// `duplicate-map-key` on the first repeated key.
pub fn read_map_nodup(b: &[u8]) -> Result<&[u8], CborError> {
    let &ib = b.first().ok_or_else(short_input)?;
    if major_type(ib) != MAJOR_MAP {
        return Err(bad_prefix(MAJOR_MAP, major_type(ib)));
    }
    let mut seen: HashSet<&[u8]> = HashSet::new();
    if additional_info(ib) == ADDINFO_INDEFINITE {
        let mut p = &b[1..];
        loop {
            let &next = p.first().ok_or_else(short_input)?;
            if next == initial_byte(MAJOR_SIMPLE, SIMPLE_BREAK) {
                return Ok(&p[1..]);
            }
            let (raw_key, rest) = split_item(p)?;
            if !seen.insert(raw_key) {
                return Err(ErrorKind::DuplicateMapKey.into());
            }
            p = skip(rest)?;
        }
    }
    let (len, mut p) = read_map_header(b)?;
    seen.reserve(len as usize);
    for _ in 0..len {
        let (raw_key, rest) = split_item(p)?;
        if !seen.insert(raw_key) {
            return Err(ErrorKind::DuplicateMapKey.into());
        }
        p = skip(rest)?;
    }
    Ok(p)
}

/// A map read in wire order, with each raw key and value copied into one
/// contiguous scratch buffer owned by this value.
#[derive(Debug, Default, Clone)]
pub struct OrderedMap {
    scratch: Vec<u8>,
    spans: Vec<(std::ops::Range<usize>, std::ops::Range<usize>)>,
}

impl OrderedMap {
    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Reports whether the map was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Iterates `(raw key, raw value)` pairs in wire order.
    pub fn pairs(&self) -> impl Iterator<Item = (&[u8], &[u8])> + '_ {
        self.spans
            .iter()
            .map(|(k, v)| (&self.scratch[k.clone()], &self.scratch[v.clone()]))
    }

    fn push(&mut self, key: &[u8], value: &[u8]) {
        let ks = self.scratch.len();
        self.scratch.extend_from_slice(key);
        let ke = self.scratch.len();
        self.scratch.extend_from_slice(value);
        self.spans.push((ks..ke, ke..self.scratch.len()));
    }
}

/// Reads the next map (definite or indefinite) into an [`OrderedMap`]
/// preserving wire order, and returns it with the remaining bytes.
///
/// # Errors
///
/// Propagates header and traversal errors.
pub fn read_ordered_map(b: &[u8]) -> Result<(OrderedMap, &[u8]), CborError> {
    let &ib = b.first().ok_or_else(short_input)?;
    if major_type(ib) != MAJOR_MAP {
        return Err(bad_prefix(MAJOR_MAP, major_type(ib)));
    }
    let mut out = OrderedMap::default();
    if additional_info(ib) == ADDINFO_INDEFINITE {
        let mut p = &b[1..];
        loop {
            let &next = p.first().ok_or_else(short_input)?;
            if next == initial_byte(MAJOR_SIMPLE, SIMPLE_BREAK) {
                return Ok((out, &p[1..]));
            }
            let (raw_key, rest) = split_item(p)?;
            let (raw_val, rest) = split_item(rest)?;
            out.push(raw_key, raw_val);
            p = rest;
        }
    }
    let (len, mut p) = read_map_header(b)?;
    out.spans.reserve(len as usize);
    for _ in 0..len {
        let (raw_key, rest) = split_item(p)?;
        let (raw_val, rest) = split_item(rest)?;
        out.push(raw_key, raw_val);
        p = rest;
    }
    Ok((out, p))
}
