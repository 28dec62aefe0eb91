//! The marshal/unmarshal traits generated code targets, plus impls for the
//! shapes generic dispatch falls back on and the [`Raw`] splice type.

use std::borrow::Cow;
use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::decode::{
    is_null, read_bool, read_bytes, read_duration, read_f32, read_f64, read_i16, read_i32,
    read_i64, read_i8, read_map_start, read_string, read_time, read_u16, read_u32, read_u64,
    read_u8, split_item,
};
use crate::encode::{
    append_bool, append_bytes, append_duration, append_f32, append_f64, append_int,
    append_map_header, append_null, append_str, append_time, append_uint,
};
use crate::error::CborError;
use crate::size::{
    BOOL_SIZE, BYTES_PREFIX_SIZE, DURATION_SIZE, FLOAT32_SIZE, FLOAT64_SIZE, INT_SIZE,
    MAP_HEADER_SIZE, NULL_SIZE, STR_PREFIX_SIZE, TIME_SIZE, UINT_SIZE,
};

/// Types that can append their CBOR encoding to a caller-owned buffer.
pub trait Marshal {
    /// Appends the encoding of `self` to `b`.
    ///
    /// # Errors
    ///
    /// Returns an error when a nested value cannot be encoded.
    fn marshal_cbor(&self, b: &mut Vec<u8>) -> Result<(), CborError>;

    /// Worst-case encoded size, usable to reserve buffer capacity.
    fn size_hint(&self) -> usize {
        0
    }
}

/// Types that can decode themselves from the head of a buffer (the Safe
/// path: validated UTF-8, owned strings).
pub trait Unmarshal {
    /// Decodes one item into `self` and returns the remaining bytes.
    ///
    /// # Errors
    ///
    /// Returns an error without consuming input when decoding fails.
    fn unmarshal_cbor<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError>;
}

/// The Trusted decode path: zero-copy string reads whose UTF-8 validation
/// may be elided (see the `unsafe-str` feature).
///
/// Only use on input that is known well-formed and outlives the decode.
pub trait UnmarshalTrusted {
    /// Decodes one item into `self` and returns the remaining bytes.
    ///
    /// # Errors
    ///
    /// Returns an error without consuming input when decoding fails.
    fn unmarshal_cbor_trusted<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError>;
}

/// Encodes a value into a fresh buffer sized by its hint.
///
/// # Errors
///
/// Propagates marshal errors.
pub fn to_vec<T: Marshal>(v: &T) -> Result<Vec<u8>, CborError> {
    let mut b = Vec::with_capacity(v.size_hint());
    v.marshal_cbor(&mut b)?;
    Ok(b)
}

/// Decodes one item into a default-constructed value, returning it with the
/// remaining bytes.
///
/// # Errors
///
/// Propagates unmarshal errors.
pub fn from_slice<T: Default + Unmarshal>(b: &[u8]) -> Result<(T, &[u8]), CborError> {
    let mut v = T::default();
    let rest = v.unmarshal_cbor(b)?;
    Ok((v, rest))
}

/// A pre-encoded CBOR item.
///
/// Marshals by splicing its bytes verbatim (empty encodes null); unmarshals
/// by capturing the raw bytes of the next item (null captures empty).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Raw(pub Vec<u8>);

impl Raw {
    /// The raw item bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Reports whether no item is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Marshal for Raw {
    fn marshal_cbor(&self, b: &mut Vec<u8>) -> Result<(), CborError> {
        if self.0.is_empty() {
            append_null(b);
        } else {
            b.extend_from_slice(&self.0);
        }
        Ok(())
    }

    fn size_hint(&self) -> usize {
        self.0.len().max(NULL_SIZE)
    }
}

impl Unmarshal for Raw {
    fn unmarshal_cbor<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        let (item, rest) = split_item(b)?;
        self.0.clear();
        if !is_null(item) {
            self.0.extend_from_slice(item);
        }
        Ok(rest)
    }
}

impl UnmarshalTrusted for Raw {
    fn unmarshal_cbor_trusted<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        self.unmarshal_cbor(b)
    }
}

macro_rules! scalar_codec {
    ($ty:ty, $append:expr, $read:expr, $size:expr) => {
        impl Marshal for $ty {
            fn marshal_cbor(&self, b: &mut Vec<u8>) -> Result<(), CborError> {
                $append(b, *self);
                Ok(())
            }

            fn size_hint(&self) -> usize {
                $size
            }
        }

        impl Unmarshal for $ty {
            fn unmarshal_cbor<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
                let (v, rest) = $read(b)?;
                *self = v;
                Ok(rest)
            }
        }

        impl UnmarshalTrusted for $ty {
            fn unmarshal_cbor_trusted<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
                self.unmarshal_cbor(b)
            }
        }
    };
}

scalar_codec!(bool, append_bool, read_bool, BOOL_SIZE);
scalar_codec!(u8, |b: &mut Vec<u8>, v: u8| append_uint(b, u64::from(v)), read_u8, 2);
scalar_codec!(u16, |b: &mut Vec<u8>, v: u16| append_uint(b, u64::from(v)), read_u16, 3);
scalar_codec!(u32, |b: &mut Vec<u8>, v: u32| append_uint(b, u64::from(v)), read_u32, 5);
scalar_codec!(u64, append_uint, read_u64, UINT_SIZE);
scalar_codec!(i8, |b: &mut Vec<u8>, v: i8| append_int(b, i64::from(v)), read_i8, 2);
scalar_codec!(i16, |b: &mut Vec<u8>, v: i16| append_int(b, i64::from(v)), read_i16, 3);
scalar_codec!(i32, |b: &mut Vec<u8>, v: i32| append_int(b, i64::from(v)), read_i32, 5);
scalar_codec!(i64, append_int, read_i64, INT_SIZE);
scalar_codec!(f32, append_f32, read_f32, FLOAT32_SIZE);
scalar_codec!(f64, append_f64, read_f64, FLOAT64_SIZE);
scalar_codec!(TimeDelta, append_duration, read_duration, DURATION_SIZE);

impl Marshal for String {
    fn marshal_cbor(&self, b: &mut Vec<u8>) -> Result<(), CborError> {
        append_str(b, self);
        Ok(())
    }

    fn size_hint(&self) -> usize {
        STR_PREFIX_SIZE + self.len()
    }
}

impl Unmarshal for String {
    fn unmarshal_cbor<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        let (s, rest) = read_string(b)?;
        *self = s;
        Ok(rest)
    }
}

impl UnmarshalTrusted for String {
    fn unmarshal_cbor_trusted<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        let (s, rest) = crate::decode::read_str_trusted(b)?;
        self.clear();
        self.push_str(s);
        Ok(rest)
    }
}

impl Marshal for Vec<u8> {
    fn marshal_cbor(&self, b: &mut Vec<u8>) -> Result<(), CborError> {
        append_bytes(b, self);
        Ok(())
    }

    fn size_hint(&self) -> usize {
        BYTES_PREFIX_SIZE + self.len()
    }
}

impl Unmarshal for Vec<u8> {
    fn unmarshal_cbor<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        let (v, rest) = read_bytes(b)?;
        *self = v.into_owned();
        Ok(rest)
    }
}

impl UnmarshalTrusted for Vec<u8> {
    fn unmarshal_cbor_trusted<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        self.unmarshal_cbor(b)
    }
}

impl<'c> Marshal for Cow<'c, str> {
    fn marshal_cbor(&self, b: &mut Vec<u8>) -> Result<(), CborError> {
        append_str(b, self);
        Ok(())
    }

    fn size_hint(&self) -> usize {
        STR_PREFIX_SIZE + self.len()
    }
}

impl Marshal for DateTime<Utc> {
    fn marshal_cbor(&self, b: &mut Vec<u8>) -> Result<(), CborError> {
        append_time(b, self);
        Ok(())
    }

    fn size_hint(&self) -> usize {
        TIME_SIZE
    }
}

impl Unmarshal for DateTime<Utc> {
    fn unmarshal_cbor<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        let (t, rest) = read_time(b)?;
        *self = t;
        Ok(rest)
    }
}

impl UnmarshalTrusted for DateTime<Utc> {
    fn unmarshal_cbor_trusted<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        self.unmarshal_cbor(b)
    }
}

impl<T: Marshal> Marshal for Option<T> {
    fn marshal_cbor(&self, b: &mut Vec<u8>) -> Result<(), CborError> {
        match self {
            Some(v) => v.marshal_cbor(b),
            None => {
                append_null(b);
                Ok(())
            }
        }
    }

    fn size_hint(&self) -> usize {
        match self {
            Some(v) => v.size_hint(),
            None => NULL_SIZE,
        }
    }
}

impl<T: Default + Unmarshal> Unmarshal for Option<T> {
    fn unmarshal_cbor<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        if is_null(b) {
            *self = None;
            return Ok(&b[1..]);
        }
        let mut v = T::default();
        let rest = v.unmarshal_cbor(b)?;
        *self = Some(v);
        Ok(rest)
    }
}

impl<T: Default + UnmarshalTrusted> UnmarshalTrusted for Option<T> {
    fn unmarshal_cbor_trusted<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        if is_null(b) {
            *self = None;
            return Ok(&b[1..]);
        }
        let mut v = T::default();
        let rest = v.unmarshal_cbor_trusted(b)?;
        *self = Some(v);
        Ok(rest)
    }
}

impl<T: Marshal> Marshal for Box<T> {
    fn marshal_cbor(&self, b: &mut Vec<u8>) -> Result<(), CborError> {
        self.as_ref().marshal_cbor(b)
    }

    fn size_hint(&self) -> usize {
        self.as_ref().size_hint()
    }
}

impl<T: Unmarshal> Unmarshal for Box<T> {
    fn unmarshal_cbor<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        self.as_mut().unmarshal_cbor(b)
    }
}

impl<T: UnmarshalTrusted> UnmarshalTrusted for Box<T> {
    fn unmarshal_cbor_trusted<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        self.as_mut().unmarshal_cbor_trusted(b)
    }
}

impl<T: Marshal> Marshal for Vec<T>
where
    T: MarshalElem,
{
    fn marshal_cbor(&self, b: &mut Vec<u8>) -> Result<(), CborError> {
        crate::encode::append_array_header(b, self.len() as u32);
        for item in self {
            item.marshal_cbor(b)?;
        }
        Ok(())
    }

    fn size_hint(&self) -> usize {
        let elems: usize = self.iter().map(Marshal::size_hint).sum();
        crate::size::ARRAY_HEADER_SIZE + elems
    }
}

impl<T> Unmarshal for Vec<T>
where
    T: Default + Unmarshal + MarshalElem,
{
    fn unmarshal_cbor<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        let (len, indefinite, mut p) = crate::decode::read_array_start(b)?;
        self.clear();
        if !indefinite {
            self.reserve(len as usize);
        }
        let mut remaining = len;
        loop {
            if indefinite {
                let (brk, rest) = crate::decode::read_break(p)?;
                if brk {
                    return Ok(rest);
                }
            } else if remaining == 0 {
                return Ok(p);
            } else {
                remaining -= 1;
            }
            let mut item = T::default();
            p = item.unmarshal_cbor(p)?;
            self.push(item);
        }
    }
}

impl<T> UnmarshalTrusted for Vec<T>
where
    T: Default + UnmarshalTrusted + MarshalElem,
{
    fn unmarshal_cbor_trusted<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        let (len, indefinite, mut p) = crate::decode::read_array_start(b)?;
        self.clear();
        if !indefinite {
            self.reserve(len as usize);
        }
        let mut remaining = len;
        loop {
            if indefinite {
                let (brk, rest) = crate::decode::read_break(p)?;
                if brk {
                    return Ok(rest);
                }
            } else if remaining == 0 {
                return Ok(p);
            } else {
                remaining -= 1;
            }
            let mut item = T::default();
            p = item.unmarshal_cbor_trusted(p)?;
            self.push(item);
        }
    }
}

/// Marker keeping `Vec<T>` array encoding away from the `Vec<u8>`
/// byte-string impl.
pub trait MarshalElem {}

impl MarshalElem for bool {}
impl MarshalElem for u16 {}
impl MarshalElem for u32 {}
impl MarshalElem for u64 {}
impl MarshalElem for i8 {}
impl MarshalElem for i16 {}
impl MarshalElem for i32 {}
impl MarshalElem for i64 {}
impl MarshalElem for f32 {}
impl MarshalElem for f64 {}
impl MarshalElem for String {}
impl<T> MarshalElem for Option<T> {}
impl<T> MarshalElem for Box<T> {}

impl<V: Marshal> Marshal for HashMap<String, V> {
    fn marshal_cbor(&self, b: &mut Vec<u8>) -> Result<(), CborError> {
        append_map_header(b, self.len() as u32);
        for (k, v) in self {
            append_str(b, k);
            v.marshal_cbor(b)?;
        }
        Ok(())
    }

    fn size_hint(&self) -> usize {
        let entries: usize = self
            .iter()
            .map(|(k, v)| STR_PREFIX_SIZE + k.len() + v.size_hint())
            .sum();
        MAP_HEADER_SIZE + entries
    }
}

impl<V: Default + Unmarshal> Unmarshal for HashMap<String, V> {
    fn unmarshal_cbor<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        let (len, indefinite, mut p) = read_map_start(b)?;
        self.clear();
        let mut remaining = len;
        loop {
            if indefinite {
                let (brk, rest) = crate::decode::read_break(p)?;
                if brk {
                    return Ok(rest);
                }
            } else if remaining == 0 {
                return Ok(p);
            } else {
                remaining -= 1;
            }
            let (key, rest) = read_string(p)?;
            let mut val = V::default();
            p = val.unmarshal_cbor(rest)?;
            self.insert(key, val);
        }
    }
}

impl<V: Default + UnmarshalTrusted> UnmarshalTrusted for HashMap<String, V> {
    fn unmarshal_cbor_trusted<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        let (len, indefinite, mut p) = read_map_start(b)?;
        self.clear();
        let mut remaining = len;
        loop {
            if indefinite {
                let (brk, rest) = crate::decode::read_break(p)?;
                if brk {
                    return Ok(rest);
                }
            } else if remaining == 0 {
                return Ok(p);
            } else {
                remaining -= 1;
            }
            let (key, rest) = crate::decode::read_str_trusted(p)?;
            let mut val = V::default();
            p = val.unmarshal_cbor_trusted(rest)?;
            self.insert(key.to_owned(), val);
        }
    }
}

impl<V: Marshal> Marshal for HashMap<u64, V> {
    fn marshal_cbor(&self, b: &mut Vec<u8>) -> Result<(), CborError> {
        append_map_header(b, self.len() as u32);
        for (k, v) in self {
            append_uint(b, *k);
            v.marshal_cbor(b)?;
        }
        Ok(())
    }

    fn size_hint(&self) -> usize {
        let entries: usize = self.values().map(|v| UINT_SIZE + v.size_hint()).sum();
        MAP_HEADER_SIZE + entries
    }
}

impl<V: Default + Unmarshal> Unmarshal for HashMap<u64, V> {
    fn unmarshal_cbor<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        let (len, indefinite, mut p) = read_map_start(b)?;
        self.clear();
        let mut remaining = len;
        loop {
            if indefinite {
                let (brk, rest) = crate::decode::read_break(p)?;
                if brk {
                    return Ok(rest);
                }
            } else if remaining == 0 {
                return Ok(p);
            } else {
                remaining -= 1;
            }
            let (key, rest) = read_u64(p)?;
            let mut val = V::default();
            p = val.unmarshal_cbor(rest)?;
            self.insert(key, val);
        }
    }
}

impl<V: Default + UnmarshalTrusted> UnmarshalTrusted for HashMap<u64, V> {
    fn unmarshal_cbor_trusted<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        let (len, indefinite, mut p) = read_map_start(b)?;
        self.clear();
        let mut remaining = len;
        loop {
            if indefinite {
                let (brk, rest) = crate::decode::read_break(p)?;
                if brk {
                    return Ok(rest);
                }
            } else if remaining == 0 {
                return Ok(p);
            } else {
                remaining -= 1;
            }
            let (key, rest) = read_u64(p)?;
            let mut val = V::default();
            p = val.unmarshal_cbor_trusted(rest)?;
            self.insert(key, val);
        }
    }
}
