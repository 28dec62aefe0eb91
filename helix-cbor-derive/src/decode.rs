use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, DataStruct, Fields, Generics, Ident};

use crate::attrs::parse_cbor_field_attrs;
use crate::shape::{classify, Shape};

pub(crate) fn expand_unmarshal(
    name: &Ident,
    generics: &Generics,
    data: &DataStruct,
) -> syn::Result<TokenStream> {
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new(
            data.fields.span(),
            "Unmarshal requires named fields",
        ));
    };

    let mut safe_arms = Vec::new();
    let mut trusted_arms = Vec::new();
    for field in &fields.named {
        let attr = parse_cbor_field_attrs(&field.attrs)?;
        if attr.skip {
            continue;
        }
        let ident = field.ident.clone().expect("named field");
        let key = attr
            .rename
            .map_or_else(|| ident.to_string(), |lit| lit.value());
        let shape = classify(&field.ty);
        let key_bytes = syn::LitByteStr::new(key.as_bytes(), field.span());

        let safe = field_case(&ident, &key, &shape, false);
        safe_arms.push(quote! { #key_bytes => { #safe } });
        let trusted = field_case(&ident, &key, &shape, true);
        trusted_arms.push(quote! { #key_bytes => { #trusted } });
    }

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let body_safe = decode_body(&safe_arms);
    let body_trusted = decode_body(&trusted_arms);

    Ok(quote! {
        impl #impl_generics ::helix_cbor::Unmarshal for #name #ty_generics #where_clause {
            fn unmarshal_cbor<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], ::helix_cbor::CborError> {
                #body_safe
            }
        }

        impl #impl_generics ::helix_cbor::UnmarshalTrusted for #name #ty_generics #where_clause {
            fn unmarshal_cbor_trusted<'a>(&mut self, b: &'a [u8]) -> Result<&'a [u8], ::helix_cbor::CborError> {
                #body_trusted
            }
        }
    })
}

/// The shared map-walking skeleton: read the map start, match each key by
/// its raw bytes, skip unknown keys, stop on count or break.
fn decode_body(arms: &[TokenStream]) -> TokenStream {
    quote! {
        let (len, indefinite, mut p) = ::helix_cbor::read_map_start(b)?;
        let mut remaining = len;
        loop {
            if indefinite {
                let (brk, rest) = ::helix_cbor::read_break(p)?;
                if brk {
                    return Ok(rest);
                }
            } else if remaining == 0 {
                return Ok(p);
            } else {
                remaining -= 1;
            }
            let (key, rest) = ::helix_cbor::read_map_key_zc(p)?;
            p = rest;
            match key {
                #(#arms)*
                _ => {
                    p = ::helix_cbor::skip(p)?;
                }
            }
        }
    }
}

/// One field's decode case. The Trusted variant differs only in its leaf
/// calls: zero-copy string reads and `unmarshal_cbor_trusted` for nested
/// values.
fn field_case(ident: &Ident, key: &str, shape: &Shape, trusted: bool) -> TokenStream {
    let ctx = key;
    match shape {
        Shape::Scalar(s) => {
            let read = s.read_fn();
            quote! {
                let (v, rest) = #read(p).map_err(|e| e.with_context(#ctx))?;
                self.#ident = v;
                p = rest;
            }
        }
        Shape::Str => {
            if trusted {
                quote! {
                    let (v, rest) =
                        ::helix_cbor::read_str_trusted(p).map_err(|e| e.with_context(#ctx))?;
                    self.#ident.clear();
                    self.#ident.push_str(v);
                    p = rest;
                }
            } else {
                quote! {
                    let (v, rest) =
                        ::helix_cbor::read_string(p).map_err(|e| e.with_context(#ctx))?;
                    self.#ident = v;
                    p = rest;
                }
            }
        }
        Shape::Bytes => quote! {
            let (v, rest) = ::helix_cbor::read_bytes(p).map_err(|e| e.with_context(#ctx))?;
            self.#ident = v.into_owned();
            p = rest;
        },
        Shape::Time => quote! {
            let (v, rest) = ::helix_cbor::read_time(p).map_err(|e| e.with_context(#ctx))?;
            self.#ident = v;
            p = rest;
        },
        Shape::Duration => quote! {
            let (v, rest) = ::helix_cbor::read_duration(p).map_err(|e| e.with_context(#ctx))?;
            self.#ident = v;
            p = rest;
        },
        Shape::VecScalar(s) => {
            let read = s.read_fn();
            container_loop(
                ident,
                ctx,
                quote! {
                    let (v, rest) = #read(p).map_err(|e| e.with_context(#ctx))?;
                    self.#ident.push(v);
                    p = rest;
                },
            )
        }
        Shape::VecStr => {
            let elem = if trusted {
                quote! {
                    let (v, rest) =
                        ::helix_cbor::read_str_trusted(p).map_err(|e| e.with_context(#ctx))?;
                    self.#ident.push(v.to_owned());
                    p = rest;
                }
            } else {
                quote! {
                    let (v, rest) =
                        ::helix_cbor::read_string(p).map_err(|e| e.with_context(#ctx))?;
                    self.#ident.push(v);
                    p = rest;
                }
            };
            container_loop(ident, ctx, elem)
        }
        Shape::MapStrStr => {
            let read_key = map_key_read(trusted, ctx);
            let elem = if trusted {
                quote! {
                    #read_key
                    let (v, rest) =
                        ::helix_cbor::read_str_trusted(p).map_err(|e| e.with_context(#ctx))?;
                    self.#ident.insert(k, v.to_owned());
                    p = rest;
                }
            } else {
                quote! {
                    #read_key
                    let (v, rest) =
                        ::helix_cbor::read_string(p).map_err(|e| e.with_context(#ctx))?;
                    self.#ident.insert(k, v);
                    p = rest;
                }
            };
            map_loop(ident, ctx, elem)
        }
        Shape::MapStrScalar(s) => {
            let read_key = map_key_read(trusted, ctx);
            let read = s.read_fn();
            map_loop(
                ident,
                ctx,
                quote! {
                    #read_key
                    let (v, rest) = #read(p).map_err(|e| e.with_context(#ctx))?;
                    self.#ident.insert(k, v);
                    p = rest;
                },
            )
        }
        Shape::MapU64U64 => map_loop(
            ident,
            ctx,
            quote! {
                let (k, rest) = ::helix_cbor::read_u64(p).map_err(|e| e.with_context(#ctx))?;
                let (v, rest) = ::helix_cbor::read_u64(rest).map_err(|e| e.with_context(#ctx))?;
                self.#ident.insert(k, v);
                p = rest;
            },
        ),
        Shape::Raw | Shape::Optional | Shape::Other => {
            if trusted {
                quote! {
                    p = ::helix_cbor::UnmarshalTrusted::unmarshal_cbor_trusted(&mut self.#ident, p)
                        .map_err(|e| e.with_context(#ctx))?;
                }
            } else {
                quote! {
                    p = ::helix_cbor::Unmarshal::unmarshal_cbor(&mut self.#ident, p)
                        .map_err(|e| e.with_context(#ctx))?;
                }
            }
        }
    }
}

fn map_key_read(trusted: bool, ctx: &str) -> TokenStream {
    if trusted {
        quote! {
            let (k, rest) =
                ::helix_cbor::read_str_trusted(p).map_err(|e| e.with_context(#ctx))?;
            let k = k.to_owned();
            p = rest;
        }
    } else {
        quote! {
            let (k, rest) = ::helix_cbor::read_string(p).map_err(|e| e.with_context(#ctx))?;
            p = rest;
        }
    }
}

/// Array walk over `elem`, handling both definite and indefinite forms.
fn container_loop(ident: &Ident, ctx: &str, elem: TokenStream) -> TokenStream {
    quote! {
        let (n, indef, rest) =
            ::helix_cbor::read_array_start(p).map_err(|e| e.with_context(#ctx))?;
        p = rest;
        self.#ident.clear();
        if !indef {
            self.#ident.reserve(n as usize);
        }
        let mut left = n;
        loop {
            if indef {
                let (brk, rest) = ::helix_cbor::read_break(p)?;
                if brk {
                    p = rest;
                    break;
                }
            } else if left == 0 {
                break;
            } else {
                left -= 1;
            }
            #elem
        }
    }
}

/// Map walk over `elem`, handling both definite and indefinite forms.
fn map_loop(ident: &Ident, ctx: &str, elem: TokenStream) -> TokenStream {
    quote! {
        let (n, indef, rest) =
            ::helix_cbor::read_map_start(p).map_err(|e| e.with_context(#ctx))?;
        p = rest;
        self.#ident.clear();
        let mut left = n;
        loop {
            if indef {
                let (brk, rest) = ::helix_cbor::read_break(p)?;
                if brk {
                    p = rest;
                    break;
                }
            } else if left == 0 {
                break;
            } else {
                left -= 1;
            }
            #elem
        }
    }
}
