use proc_macro2::TokenStream;
use quote::quote;
use syn::{spanned::Spanned, DataStruct, Fields, Generics, Ident};

use crate::attrs::parse_cbor_field_attrs;
use crate::shape::{classify, Shape};

struct EncodeField {
    key: String,
    omit_cond: Option<TokenStream>,
    value: TokenStream,
    size: TokenStream,
}

pub(crate) fn expand_marshal(
    name: &Ident,
    generics: &Generics,
    data: &DataStruct,
) -> syn::Result<TokenStream> {
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new(
            data.fields.span(),
            "Marshal requires named fields",
        ));
    };

    let mut out = Vec::new();
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
        let fref = quote!(self.#ident);

        let omit_cond = if attr.omit_empty {
            omit_condition(&shape, &fref)
        } else {
            None
        };
        let value = value_block(&shape, &fref);
        let size = size_part(&shape, &fref, key.len());
        out.push(EncodeField {
            key,
            omit_cond,
            value,
            size,
        });
    }

    let fixed_count = out.iter().filter(|f| f.omit_cond.is_none()).count() as u32;
    let count_adjust = out.iter().filter_map(|f| {
        f.omit_cond.as_ref().map(|cond| {
            quote! {
                if !(#cond) {
                    count += 1;
                }
            }
        })
    });

    let entries = out.iter().map(|f| {
        let key = &f.key;
        let value = &f.value;
        match &f.omit_cond {
            Some(cond) => quote! {
                if !(#cond) {
                    ::helix_cbor::append_str(b, #key);
                    #value
                }
            },
            None => quote! {
                ::helix_cbor::append_str(b, #key);
                #value
            },
        }
    });

    let sizes = out.iter().map(|f| &f.size);

    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::helix_cbor::Marshal for #name #ty_generics #where_clause {
            fn marshal_cbor(&self, b: &mut Vec<u8>) -> Result<(), ::helix_cbor::CborError> {
                let mut count: u32 = #fixed_count;
                #(#count_adjust)*
                ::helix_cbor::append_map_header(b, count);
                #(#entries)*
                Ok(())
            }

            fn size_hint(&self) -> usize {
                ::helix_cbor::MAP_HEADER_SIZE #(+ #sizes)*
            }
        }

        impl #impl_generics ::helix_cbor::MarshalElem for #name #ty_generics #where_clause {}
    })
}

fn omit_condition(shape: &Shape, fref: &TokenStream) -> Option<TokenStream> {
    match shape {
        Shape::Scalar(s) => Some(s.is_empty(&quote!(#fref))),
        Shape::Str
        | Shape::Bytes
        | Shape::Raw
        | Shape::VecScalar(_)
        | Shape::VecStr
        | Shape::MapStrStr
        | Shape::MapStrScalar(_)
        | Shape::MapU64U64 => Some(quote!(#fref.is_empty())),
        Shape::Time => {
            Some(quote!(#fref.timestamp() == 0 && #fref.timestamp_subsec_nanos() == 0))
        }
        Shape::Duration => Some(quote!(#fref.is_zero())),
        Shape::Optional => Some(quote!(#fref.is_none())),
        Shape::Other => None,
    }
}

fn value_block(shape: &Shape, fref: &TokenStream) -> TokenStream {
    match shape {
        Shape::Scalar(s) => {
            let call = s.append(&quote!(b), &quote!(#fref));
            quote!(#call;)
        }
        Shape::Str => quote!(::helix_cbor::append_str(b, &#fref);),
        Shape::Bytes => quote!(::helix_cbor::append_bytes(b, &#fref);),
        Shape::Time => quote!(::helix_cbor::append_time(b, &#fref);),
        Shape::Duration => quote!(::helix_cbor::append_duration(b, #fref);),
        Shape::VecScalar(s) => {
            let call = s.append(&quote!(b), &quote!(*v));
            quote! {
                ::helix_cbor::append_array_header(b, #fref.len() as u32);
                for v in &#fref {
                    #call;
                }
            }
        }
        Shape::VecStr => quote! {
            ::helix_cbor::append_array_header(b, #fref.len() as u32);
            for v in &#fref {
                ::helix_cbor::append_str(b, v);
            }
        },
        Shape::MapStrStr => quote!(::helix_cbor::append_map_str_str(b, &#fref);),
        Shape::MapStrScalar(s) => {
            let call = s.append(&quote!(b), &quote!(*v));
            quote! {
                ::helix_cbor::append_map_header(b, #fref.len() as u32);
                for (k, v) in &#fref {
                    ::helix_cbor::append_str(b, k);
                    #call;
                }
            }
        }
        Shape::MapU64U64 => quote! {
            ::helix_cbor::append_map_header(b, #fref.len() as u32);
            for (k, v) in &#fref {
                ::helix_cbor::append_uint(b, *k);
                ::helix_cbor::append_uint(b, *v);
            }
        },
        Shape::Raw | Shape::Optional | Shape::Other => {
            quote!(::helix_cbor::Marshal::marshal_cbor(&#fref, b)?;)
        }
    }
}

fn size_part(shape: &Shape, fref: &TokenStream, key_len: usize) -> TokenStream {
    let key = quote!(::helix_cbor::STR_PREFIX_SIZE + #key_len);
    let value = match shape {
        Shape::Scalar(s) => s.size(),
        Shape::Str => quote!(::helix_cbor::STR_PREFIX_SIZE + #fref.len()),
        Shape::Bytes => quote!(::helix_cbor::BYTES_PREFIX_SIZE + #fref.len()),
        Shape::Time => quote!(::helix_cbor::TIME_SIZE),
        Shape::Duration => quote!(::helix_cbor::DURATION_SIZE),
        Shape::VecScalar(s) => {
            let elem = s.size();
            quote!(::helix_cbor::ARRAY_HEADER_SIZE + #fref.len() * (#elem))
        }
        Shape::VecStr => {
            quote!(::helix_cbor::ARRAY_HEADER_SIZE + #fref.len() * ::helix_cbor::STR_PREFIX_SIZE)
        }
        Shape::MapStrStr => quote! {
            ::helix_cbor::MAP_HEADER_SIZE
                + #fref.len() * (2 * ::helix_cbor::STR_PREFIX_SIZE)
        },
        Shape::MapStrScalar(s) => {
            let elem = s.size();
            quote! {
                ::helix_cbor::MAP_HEADER_SIZE
                    + #fref.len() * (::helix_cbor::STR_PREFIX_SIZE + #elem)
            }
        }
        Shape::MapU64U64 => quote! {
            ::helix_cbor::MAP_HEADER_SIZE + #fref.len() * (2 * ::helix_cbor::UINT_SIZE)
        },
        Shape::Raw | Shape::Optional | Shape::Other => {
            quote!(::helix_cbor::Marshal::size_hint(&#fref))
        }
    };
    quote!((#key + #value))
}
