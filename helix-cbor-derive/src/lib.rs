//! Procedural macro derives for `helix-cbor`.
//!
//! `#[derive(Marshal)]` emits a map-shaped `marshal_cbor` plus a worst-case
//! `size_hint`; `#[derive(Unmarshal)]` emits the Safe and Trusted decode
//! paths. Field behavior is controlled with `#[cbor(...)]` attributes:
//!
//! - `#[cbor(rename = "wire")]` sets the wire key (a `#[serde(rename)]` on
//!   the field is honored as a fallback).
//! - `#[cbor(omit_empty)]` drops the entry when the value is its default.
//! - `#[cbor(skip)]` leaves the field off the wire entirely.

#![deny(clippy::all)]

extern crate proc_macro;

mod attrs;
mod decode;
mod encode;
mod shape;

use proc_macro::TokenStream;
use syn::{parse_macro_input, spanned::Spanned, Data, DeriveInput};

use crate::decode::expand_unmarshal;
use crate::encode::expand_marshal;

/// Derive the `Marshal` trait for a named-field struct.
#[proc_macro_derive(Marshal, attributes(cbor))]
pub fn derive_marshal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = match &input.data {
        Data::Struct(data) => expand_marshal(&input.ident, &input.generics, data),
        Data::Enum(e) => Err(syn::Error::new(
            e.enum_token.span(),
            "Marshal derives map-shaped records; enums are not supported",
        )),
        Data::Union(u) => Err(syn::Error::new(
            u.union_token.span(),
            "Marshal is not supported for unions",
        )),
    };
    match out {
        Ok(ts) => TokenStream::from(ts),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

/// Derive the `Unmarshal` and `UnmarshalTrusted` traits for a named-field
/// struct.
#[proc_macro_derive(Unmarshal, attributes(cbor))]
pub fn derive_unmarshal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let out = match &input.data {
        Data::Struct(data) => expand_unmarshal(&input.ident, &input.generics, data),
        Data::Enum(e) => Err(syn::Error::new(
            e.enum_token.span(),
            "Unmarshal derives map-shaped records; enums are not supported",
        )),
        Data::Union(u) => Err(syn::Error::new(
            u.union_token.span(),
            "Unmarshal is not supported for unions",
        )),
    };
    match out {
        Ok(ts) => TokenStream::from(ts),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}
