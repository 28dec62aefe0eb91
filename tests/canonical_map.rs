use std::collections::HashMap;

use helix_cbor::{
    append_int, append_map_deterministic, append_map_str_str_deterministic,
    append_raw_map_deterministic, append_str, RawPair,
};

#[test]
fn deterministic_map_sorts_by_encoded_key() {
    // Input order {"b": 1, "a": 2} comes out a-first.
    let mut ka = Vec::new();
    append_str(&mut ka, "a");
    let mut kb = Vec::new();
    append_str(&mut kb, "b");
    let mut out = Vec::new();
    append_raw_map_deterministic(
        &mut out,
        &[
            RawPair { key: &kb, value: &[0x01] },
            RawPair { key: &ka, value: &[0x02] },
        ],
    );
    assert_eq!(hex::encode(&out), "a2616102616201");
}

#[test]
fn length_first_then_lexicographic() {
    // "z" encodes shorter than "aa", so it sorts first despite 'z' > 'a'.
    let mut m: HashMap<String, i64> = HashMap::new();
    m.insert("aa".to_owned(), 1);
    m.insert("z".to_owned(), 2);
    let mut out = Vec::new();
    append_map_deterministic(
        &mut out,
        m.iter(),
        |dst, k: &String| append_str(dst, k),
        |dst, v: &i64| {
            append_int(dst, *v);
            Ok(())
        },
    )
    .unwrap();
    assert_eq!(hex::encode(&out), "a2617a0262616101");
}

fn assert_keys_ascending(encoded: &[u8], len: usize) {
    let mut p = &encoded[1..]; // skip the one-byte map header used here
    let mut prev: Option<Vec<u8>> = None;
    for _ in 0..len {
        let rest = helix_cbor::skip(p).unwrap();
        let key = p[..p.len() - rest.len()].to_vec();
        p = helix_cbor::skip(rest).unwrap();
        if let Some(prev) = &prev {
            let ordered = prev.len() < key.len() || (prev.len() == key.len() && prev < &key);
            assert!(ordered, "keys out of order: {prev:?} then {key:?}");
        }
        prev = Some(key);
    }
    assert!(p.is_empty());
}

#[test]
fn str_str_deterministic_is_strictly_increasing() {
    let mut m = HashMap::new();
    for i in 0..20 {
        m.insert(format!("key{i:02}"), format!("v{i}"));
    }
    m.insert("a".to_owned(), "short".to_owned());
    m.insert("longerkeyname".to_owned(), "x".to_owned());
    let mut out = Vec::new();
    append_map_str_str_deterministic(&mut out, &m);
    assert_keys_ascending(&out, m.len());
}

#[test]
fn radix_bucket_matches_comparator_order() {
    // Keys of one shared 64-byte payload length land in the radix path;
    // check the result agrees with a plain sort of the encoded keys.
    let mut m: HashMap<String, i64> = HashMap::new();
    for i in 0..40 {
        m.insert(format!("{i:064}"), i64::from(i));
    }
    let mut out = Vec::new();
    append_map_deterministic(
        &mut out,
        m.iter(),
        |dst, k: &String| append_str(dst, k),
        |dst, v: &i64| {
            append_int(dst, *v);
            Ok(())
        },
    )
    .unwrap();

    let mut keys: Vec<Vec<u8>> = m
        .keys()
        .map(|k| {
            let mut e = Vec::new();
            append_str(&mut e, k);
            e
        })
        .collect();
    keys.sort();

    // Walk the emitted map and collect keys in order.
    let (len, mut p) = helix_cbor::read_map_header(&out).unwrap();
    assert_eq!(len as usize, m.len());
    let mut emitted = Vec::new();
    for _ in 0..len {
        let rest = helix_cbor::skip(p).unwrap();
        emitted.push(p[..p.len() - rest.len()].to_vec());
        p = helix_cbor::skip(rest).unwrap();
    }
    assert_eq!(emitted, keys);
}

#[test]
fn empty_map_is_a0() {
    let mut out = Vec::new();
    append_raw_map_deterministic(&mut out, &[]);
    assert_eq!(out, vec![0xa0]);
}

#[test]
fn duplicate_keys_accepted_at_write_time() {
    let mut key = Vec::new();
    append_str(&mut key, "a");
    let mut out = Vec::new();
    append_raw_map_deterministic(
        &mut out,
        &[
            RawPair { key: &key, value: &[0x01] },
            RawPair { key: &key, value: &[0x02] },
        ],
    );
    // Stable sort keeps insertion order for the equal keys.
    assert_eq!(hex::encode(&out), "a2616101616102");
}
