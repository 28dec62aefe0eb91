//! Static type-shape analysis. Each field resolves to the concrete runtime
//! helper family its encode and decode paths will call; anything without a
//! dedicated shape falls through to the codec traits.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{GenericArgument, PathArguments, Type};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Scalar {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl Scalar {
    /// The `append_*` call for one value expression.
    pub(crate) fn append(self, b: &TokenStream, v: &TokenStream) -> TokenStream {
        match self {
            Self::Bool => quote!(::helix_cbor::append_bool(#b, #v)),
            Self::I8 | Self::I16 | Self::I32 => {
                quote!(::helix_cbor::append_int(#b, i64::from(#v)))
            }
            Self::I64 => quote!(::helix_cbor::append_int(#b, #v)),
            Self::U8 | Self::U16 | Self::U32 => {
                quote!(::helix_cbor::append_uint(#b, u64::from(#v)))
            }
            Self::U64 => quote!(::helix_cbor::append_uint(#b, #v)),
            Self::F32 => quote!(::helix_cbor::append_f32(#b, #v)),
            Self::F64 => quote!(::helix_cbor::append_f64(#b, #v)),
        }
    }

    /// The width-checked `read_*` helper.
    pub(crate) fn read_fn(self) -> TokenStream {
        match self {
            Self::Bool => quote!(::helix_cbor::read_bool),
            Self::I8 => quote!(::helix_cbor::read_i8),
            Self::I16 => quote!(::helix_cbor::read_i16),
            Self::I32 => quote!(::helix_cbor::read_i32),
            Self::I64 => quote!(::helix_cbor::read_i64),
            Self::U8 => quote!(::helix_cbor::read_u8),
            Self::U16 => quote!(::helix_cbor::read_u16),
            Self::U32 => quote!(::helix_cbor::read_u32),
            Self::U64 => quote!(::helix_cbor::read_u64),
            Self::F32 => quote!(::helix_cbor::read_f32),
            Self::F64 => quote!(::helix_cbor::read_f64),
        }
    }

    /// Worst-case encoded size of one value.
    pub(crate) fn size(self) -> TokenStream {
        match self {
            Self::Bool => quote!(::helix_cbor::BOOL_SIZE),
            Self::I8 | Self::U8 => quote!(2usize),
            Self::I16 | Self::U16 => quote!(3usize),
            Self::I32 | Self::U32 => quote!(5usize),
            Self::I64 => quote!(::helix_cbor::INT_SIZE),
            Self::U64 => quote!(::helix_cbor::UINT_SIZE),
            Self::F32 => quote!(::helix_cbor::FLOAT32_SIZE),
            Self::F64 => quote!(::helix_cbor::FLOAT64_SIZE),
        }
    }

    /// The default-value check used by omit-empty.
    pub(crate) fn is_empty(self, v: &TokenStream) -> TokenStream {
        match self {
            Self::Bool => quote!(!#v),
            Self::F32 => quote!(#v == 0.0f32),
            Self::F64 => quote!(#v == 0.0f64),
            _ => quote!(#v == 0),
        }
    }
}

/// The dispatch shape of one record field.
#[derive(Clone, Debug)]
pub(crate) enum Shape {
    Scalar(Scalar),
    /// `String`.
    Str,
    /// `Vec<u8>`, encoded as a byte string.
    Bytes,
    /// `chrono::DateTime<Utc>`, tag(1).
    Time,
    /// `chrono::TimeDelta`, nanoseconds integer.
    Duration,
    /// `helix_cbor::Raw`, spliced verbatim.
    Raw,
    /// `Vec<scalar>`, array header plus a scalar loop.
    VecScalar(Scalar),
    /// `Vec<String>`.
    VecStr,
    /// `HashMap<String, String>`.
    MapStrStr,
    /// `HashMap<String, scalar>`.
    MapStrScalar(Scalar),
    /// `HashMap<u64, u64>`.
    MapU64U64,
    /// `Option<T>`: null on `None`, the inner value otherwise, dispatched
    /// through the codec traits.
    Optional,
    /// Everything else: nested records and containers of records, through
    /// the codec traits.
    Other,
}

fn last_ident(ty: &Type) -> Option<String> {
    let Type::Path(tp) = ty else { return None };
    tp.path.segments.last().map(|seg| seg.ident.to_string())
}

fn single_generic_arg(ty: &Type) -> Option<&Type> {
    let Type::Path(tp) = ty else { return None };
    let seg = tp.path.segments.last()?;
    let PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    let mut iter = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    });
    let first = iter.next()?;
    if iter.next().is_some() {
        return None;
    }
    Some(first)
}

fn two_generic_args(ty: &Type) -> Option<(&Type, &Type)> {
    let Type::Path(tp) = ty else { return None };
    let seg = tp.path.segments.last()?;
    let PathArguments::AngleBracketed(args) = &seg.arguments else {
        return None;
    };
    let mut iter = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    });
    let k = iter.next()?;
    let v = iter.next()?;
    if iter.next().is_some() {
        return None;
    }
    Some((k, v))
}

fn scalar_of(ty: &Type) -> Option<Scalar> {
    match last_ident(ty)?.as_str() {
        "bool" => Some(Scalar::Bool),
        "i8" => Some(Scalar::I8),
        "i16" => Some(Scalar::I16),
        "i32" => Some(Scalar::I32),
        "i64" => Some(Scalar::I64),
        "u8" => Some(Scalar::U8),
        "u16" => Some(Scalar::U16),
        "u32" => Some(Scalar::U32),
        "u64" => Some(Scalar::U64),
        "f32" => Some(Scalar::F32),
        "f64" => Some(Scalar::F64),
        _ => None,
    }
}

pub(crate) fn classify(ty: &Type) -> Shape {
    if let Some(s) = scalar_of(ty) {
        return Shape::Scalar(s);
    }
    let Some(ident) = last_ident(ty) else {
        return Shape::Other;
    };
    match ident.as_str() {
        "String" => Shape::Str,
        "Raw" => Shape::Raw,
        "TimeDelta" => Shape::Duration,
        "DateTime" => Shape::Time,
        "Option" => Shape::Optional,
        "Vec" => match single_generic_arg(ty) {
            Some(inner) => match scalar_of(inner) {
                Some(Scalar::U8) => Shape::Bytes,
                Some(s) => Shape::VecScalar(s),
                None if last_ident(inner).as_deref() == Some("String") => Shape::VecStr,
                None => Shape::Other,
            },
            None => Shape::Other,
        },
        "HashMap" => match two_generic_args(ty) {
            Some((k, v)) => {
                let key = last_ident(k);
                match key.as_deref() {
                    Some("String") => match scalar_of(v) {
                        Some(s) => Shape::MapStrScalar(s),
                        None if last_ident(v).as_deref() == Some("String") => Shape::MapStrStr,
                        None => Shape::Other,
                    },
                    Some("u64") => {
                        if scalar_of(v) == Some(Scalar::U64) {
                            Shape::MapU64U64
                        } else {
                            Shape::Other
                        }
                    }
                    _ => Shape::Other,
                }
            }
            None => Shape::Other,
        },
        _ => Shape::Other,
    }
}
