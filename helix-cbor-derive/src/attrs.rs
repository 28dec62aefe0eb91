use syn::{Attribute, LitStr};

#[derive(Default, Clone)]
pub(crate) struct CborFieldAttr {
    pub(crate) rename: Option<LitStr>,
    pub(crate) omit_empty: bool,
    pub(crate) skip: bool,
}

pub(crate) fn parse_cbor_field_attrs(attrs: &[Attribute]) -> syn::Result<CborFieldAttr> {
    let mut out = CborFieldAttr::default();
    let mut serde_rename: Option<LitStr> = None;

    for attr in attrs {
        if attr.path().is_ident("cbor") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if out.rename.is_some() {
                        return Err(meta.error("duplicate `cbor(rename=...)`"));
                    }
                    let lit: LitStr = meta.value()?.parse()?;
                    out.rename = Some(lit);
                    return Ok(());
                }
                if meta.path.is_ident("omit_empty") {
                    if out.omit_empty {
                        return Err(meta.error("duplicate `cbor(omit_empty)`"));
                    }
                    out.omit_empty = true;
                    return Ok(());
                }
                if meta.path.is_ident("skip") {
                    if out.skip {
                        return Err(meta.error("duplicate `cbor(skip)`"));
                    }
                    out.skip = true;
                    return Ok(());
                }
                Err(meta.error(
                    "unsupported `cbor(...)` field attribute (allowed: rename, omit_empty, skip)",
                ))
            })?;
            continue;
        }
        // A serde rename is honored when no cbor rename is given, so types
        // shared with serde keep one wire name.
        if attr.path().is_ident("serde") {
            let _ = attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("rename") {
                    if let Ok(v) = meta.value() {
                        if let Ok(lit) = v.parse::<LitStr>() {
                            serde_rename = Some(lit);
                        }
                    }
                }
                Ok(())
            });
        }
    }

    if out.rename.is_none() {
        out.rename = serde_rename;
    }
    Ok(out)
}
