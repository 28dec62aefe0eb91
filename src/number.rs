//! A numeric sum type that preserves the originating wire kind.

use crate::codec::{Marshal, Unmarshal, UnmarshalTrusted};
use crate::decode::{read_f32, read_f64, read_i64, read_u64};
use crate::encode::{append_f32, append_f64, append_int, append_uint};
use crate::error::{CborError, ErrorKind};
use crate::size::{FLOAT32_SIZE, FLOAT64_SIZE, INT_SIZE, UINT_SIZE};
use crate::wire::{next_kind, Kind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum NumberKind {
    /// The zero value, equivalent to an integer zero.
    #[default]
    Invalid,
    Int,
    Uint,
    F32,
    F64,
}

/// A CBOR number that is an `i64`, `u64`, `f32`, or `f64` internally.
///
/// The value is stored as raw 64-bit bits tagged by kind; the default is an
/// integer zero. Coercions succeed only when they are exact.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Number {
    bits: u64,
    kind: NumberKind,
}

impl Number {
    /// Stores an `i64`.
    pub fn set_int(&mut self, i: i64) {
        if i == 0 {
            *self = Self::default();
            return;
        }
        self.kind = NumberKind::Int;
        self.bits = i as u64;
    }

    /// Stores a `u64`.
    pub fn set_uint(&mut self, u: u64) {
        self.kind = NumberKind::Uint;
        self.bits = u;
    }

    /// Stores an `f32`.
    pub fn set_f32(&mut self, f: f32) {
        self.kind = NumberKind::F32;
        self.bits = u64::from(f.to_bits());
    }

    /// Stores an `f64`.
    pub fn set_f64(&mut self, f: f64) {
        self.kind = NumberKind::F64;
        self.bits = f.to_bits();
    }

    /// Returns the stored `i64` when that is the underlying kind (the zero
    /// value counts).
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self.kind {
            NumberKind::Invalid | NumberKind::Int => Some(self.bits as i64),
            _ => None,
        }
    }

    /// Returns the stored `u64` when that is the underlying kind.
    #[must_use]
    pub fn as_uint(&self) -> Option<u64> {
        match self.kind {
            NumberKind::Uint => Some(self.bits),
            _ => None,
        }
    }

    /// Returns the stored float when the underlying kind is f32 or f64.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self.kind {
            NumberKind::F32 => Some(f64::from(f32::from_bits(self.bits as u32))),
            NumberKind::F64 => Some(f64::from_bits(self.bits)),
            _ => None,
        }
    }

    /// Returns the underlying wire kind; the zero value reports `Int`.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self.kind {
            NumberKind::Invalid | NumberKind::Int => Kind::Int,
            NumberKind::Uint => Kind::Uint,
            NumberKind::F32 => Kind::Float32,
            NumberKind::F64 => Kind::Float64,
        }
    }

    /// Coerces to `i64` without loss of precision.
    #[must_use]
    pub fn coerce_int(&self) -> Option<i64> {
        match self.kind {
            NumberKind::Invalid | NumberKind::Int => Some(self.bits as i64),
            NumberKind::Uint => i64::try_from(self.bits).ok(),
            NumberKind::F32 | NumberKind::F64 => {
                let f = self.coerce_float();
                if self.is_exact_int() && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
                    return Some(f as i64);
                }
                // Positive or negative zero coerce cleanly.
                if f == 0.0 {
                    return Some(0);
                }
                None
            }
        }
    }

    /// Coerces to `u64` without loss of precision.
    #[must_use]
    pub fn coerce_uint(&self) -> Option<u64> {
        match self.kind {
            NumberKind::Invalid | NumberKind::Int => {
                let i = self.bits as i64;
                u64::try_from(i).ok()
            }
            NumberKind::Uint => Some(self.bits),
            NumberKind::F32 | NumberKind::F64 => {
                let f = self.coerce_float();
                if self.is_exact_int() && f >= 0.0 && f <= u64::MAX as f64 {
                    return Some(f as u64);
                }
                if f == 0.0 {
                    return Some(0);
                }
                None
            }
        }
    }

    /// Returns the value as `f64`, losing precision for large integers.
    #[must_use]
    pub fn coerce_float(&self) -> f64 {
        match self.kind {
            NumberKind::Invalid => 0.0,
            NumberKind::Int => self.bits as i64 as f64,
            NumberKind::Uint => self.bits as f64,
            NumberKind::F32 => f64::from(f32::from_bits(self.bits as u32)),
            NumberKind::F64 => f64::from_bits(self.bits),
        }
    }

    /// Reports whether a stored float is an exact integer: its trailing
    /// mantissa zeros must cover the non-integral bits for its exponent.
    fn is_exact_int(&self) -> bool {
        let (e_bits, m_bits): (u32, u32) = match self.kind {
            NumberKind::Invalid | NumberKind::Int | NumberKind::Uint => return true,
            NumberKind::F32 => (8, 23),
            NumberKind::F64 => (11, 52),
        };

        let exp = ((self.bits >> m_bits) as i64) & ((1 << e_bits) - 1);
        let mant = self.bits & ((1u64 << m_bits) - 1);
        if exp == 0 && mant == 0 {
            return true;
        }

        let exp = exp - ((1 << (e_bits - 1)) - 1);
        if exp < 0 || exp == 1 << (e_bits - 1) {
            return false;
        }
        if exp >= i64::from(m_bits) {
            return true;
        }
        u64::from(mant.trailing_zeros()) >= u64::from(m_bits) - exp as u64
    }

}

impl core::fmt::Display for Number {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            NumberKind::Invalid => f.write_str("0"),
            NumberKind::Int => write!(f, "{}", self.bits as i64),
            NumberKind::Uint => write!(f, "{}", self.bits),
            NumberKind::F32 | NumberKind::F64 => write!(f, "{}", self.coerce_float()),
        }
    }
}

impl Marshal for Number {
    fn marshal_cbor(&self, b: &mut Vec<u8>) -> Result<(), CborError> {
        match self.kind {
            NumberKind::Invalid => append_int(b, 0),
            NumberKind::Int => append_int(b, self.bits as i64),
            NumberKind::Uint => append_uint(b, self.bits),
            NumberKind::F32 => append_f32(b, f32::from_bits(self.bits as u32)),
            NumberKind::F64 => append_f64(b, f64::from_bits(self.bits)),
        }
        Ok(())
    }

    fn size_hint(&self) -> usize {
        match self.kind {
            NumberKind::Invalid => 1,
            NumberKind::Int => INT_SIZE,
            NumberKind::Uint => UINT_SIZE,
            NumberKind::F32 => FLOAT32_SIZE,
            NumberKind::F64 => FLOAT64_SIZE,
        }
    }
}

impl Unmarshal for Number {
    fn unmarshal_cbor<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        match next_kind(b) {
            Kind::Uint => {
                let (u, rest) = read_u64(b)?;
                self.set_uint(u);
                Ok(rest)
            }
            Kind::Int => {
                let (i, rest) = read_i64(b)?;
                self.set_int(i);
                Ok(rest)
            }
            Kind::Float32 => {
                // Covers both the binary16 and binary32 follow bytes.
                let (f, rest) = match crate::decode::read_f16(b) {
                    Ok(v) => v,
                    Err(_) => read_f32(b)?,
                };
                self.set_f32(f);
                Ok(rest)
            }
            Kind::Float64 => {
                let (f, rest) = read_f64(b)?;
                self.set_f64(f);
                Ok(rest)
            }
            _ => Err(ErrorKind::UnsupportedType.into()),
        }
    }
}

impl UnmarshalTrusted for Number {
    fn unmarshal_cbor_trusted<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], CborError> {
        self.unmarshal_cbor(b)
    }
}
