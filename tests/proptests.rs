//! Property-based round-trip and ordering checks.
//!
//! Kept intentionally small in size and depth so CI stays fast.
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use std::collections::HashMap;

use helix_cbor::{
    append_bytes, append_float_canonical, append_int, append_map_str_str_deterministic,
    append_str, append_uint, is_likely_json, read_bytes, read_f16, read_f32, read_f64, read_i64,
    read_string, read_u64, skip, validate_well_formed,
};

proptest! {
    #[test]
    fn int_roundtrip(i in any::<i64>()) {
        let mut b = Vec::new();
        append_int(&mut b, i);
        let (v, rest) = read_i64(&b).unwrap();
        prop_assert_eq!(v, i);
        prop_assert!(rest.is_empty());
    }

    #[test]
    fn int_header_width_is_canonical(i in any::<i64>()) {
        let mut b = Vec::new();
        append_int(&mut b, i);
        let n = if i >= 0 { i as u64 } else { !(i as u64) };
        let want = match n {
            0..=23 => 1,
            24..=0xff => 2,
            0x100..=0xffff => 3,
            0x1_0000..=0xffff_ffff => 5,
            _ => 9,
        };
        prop_assert_eq!(b.len(), want);
    }

    #[test]
    fn uint_roundtrip(u in any::<u64>()) {
        let mut b = Vec::new();
        append_uint(&mut b, u);
        let (v, rest) = read_u64(&b).unwrap();
        prop_assert_eq!(v, u);
        prop_assert!(rest.is_empty());
    }

    #[test]
    fn string_roundtrip(s in ".{0,300}") {
        let mut b = Vec::new();
        append_str(&mut b, &s);
        let (v, rest) = read_string(&b).unwrap();
        prop_assert_eq!(v, s);
        prop_assert!(rest.is_empty());
    }

    #[test]
    fn bytes_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..300)) {
        let mut b = Vec::new();
        append_bytes(&mut b, &data);
        let (v, rest) = read_bytes(&b).unwrap();
        prop_assert_eq!(v.as_ref(), data.as_slice());
        prop_assert!(rest.is_empty());
    }

    #[test]
    fn float_canonical_roundtrips_and_validates(f in any::<f64>()) {
        let mut b = Vec::new();
        append_float_canonical(&mut b, f);
        let got = match b[0] {
            0xf9 => f64::from(read_f16(&b).unwrap().0),
            0xfa => f64::from(read_f32(&b).unwrap().0),
            _ => read_f64(&b).unwrap().0,
        };
        if f.is_nan() {
            prop_assert!(got.is_nan());
        } else if f == 0.0 {
            // -0 normalizes to +0.
            prop_assert_eq!(got, 0.0);
        } else {
            prop_assert_eq!(got, f);
        }
        prop_assert!(validate_well_formed(&b).unwrap().is_empty());
    }

    #[test]
    fn skip_agrees_with_readers(s in ".{0,40}", tail in proptest::collection::vec(any::<u8>(), 0..16)) {
        let mut b = Vec::new();
        append_str(&mut b, &s);
        let item_len = b.len();
        b.extend_from_slice(&tail);
        let rest = skip(&b).unwrap();
        prop_assert_eq!(rest.len(), b.len() - item_len);
        let (_, rest2) = read_string(&b).unwrap();
        prop_assert_eq!(rest, rest2);
    }

    #[test]
    fn validate_implies_skip_on_arbitrary_input(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        if validate_well_formed(&data).is_ok() {
            prop_assert!(skip(&data).is_ok());
        }
    }

    #[test]
    fn likely_json_is_always_utf8(data in proptest::collection::vec(any::<u8>(), 0..64)) {
        if is_likely_json(&data) {
            prop_assert!(std::str::from_utf8(&data).is_ok());
        }
    }

    #[test]
    fn deterministic_map_keys_strictly_increase(
        keys in proptest::collection::hash_set("[a-z]{0,40}", 0..24)
    ) {
        let m: HashMap<String, String> =
            keys.into_iter().map(|k| (k, "v".to_owned())).collect();
        let mut out = Vec::new();
        append_map_str_str_deterministic(&mut out, &m);

        let (len, mut p) = helix_cbor::read_map_header(&out).unwrap();
        let mut prev: Option<Vec<u8>> = None;
        for _ in 0..len {
            let rest = skip(p).unwrap();
            let key = p[..p.len() - rest.len()].to_vec();
            p = skip(rest).unwrap();
            if let Some(prev) = &prev {
                let increasing =
                    prev.len() < key.len() || (prev.len() == key.len() && prev < &key);
                prop_assert!(increasing);
            }
            prev = Some(key);
        }
        prop_assert!(p.is_empty());
    }
}
