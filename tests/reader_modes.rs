use helix_cbor::{
    append_f16, append_float_canonical, read_map_nodup, read_ordered_map, ErrorKind, Reader,
};

#[test]
fn strict_rejects_noncanonical_array_length() {
    // Array of length 2 with a u8-width header.
    let b = hex::decode("9802").unwrap();
    let mut r = Reader::new(&b);
    r.set_strict(true);
    let err = r.read_array_header().unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::NonCanonicalLength);

    // Without strict mode the same header is accepted.
    let mut r = Reader::new(&b);
    assert_eq!(r.read_array_header().unwrap(), 2);
}

#[test]
fn strict_rejects_noncanonical_int() {
    let b = hex::decode("1817").unwrap(); // 23 in two bytes
    let mut r = Reader::new(&b);
    r.set_strict(true);
    let err = r.read_i64().unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::NonCanonicalLength);

    let mut r = Reader::new(&b);
    assert_eq!(r.read_i64().unwrap(), 23);
}

#[test]
fn deterministic_rejects_indefinite_array() {
    let b = hex::decode("9fff").unwrap();
    let mut r = Reader::new(&b);
    r.set_deterministic(true);
    let err = r.read_array_start().unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::IndefiniteForbidden);

    let mut r = Reader::new(&b);
    let (len, indefinite) = r.read_array_start().unwrap();
    assert_eq!(len, 0);
    assert!(indefinite);
}

#[test]
fn deterministic_rejects_indefinite_strings() {
    let text = hex::decode("7f6161ff").unwrap();
    let mut r = Reader::new(&text);
    r.set_deterministic(true);
    assert_eq!(
        *r.read_string().unwrap_err().kind(),
        ErrorKind::IndefiniteForbidden
    );

    let bytes = hex::decode("5f4101ff").unwrap();
    let mut r = Reader::new(&bytes);
    r.set_deterministic(true);
    assert_eq!(
        *r.read_bytes().unwrap_err().kind(),
        ErrorKind::IndefiniteForbidden
    );
}

#[test]
fn max_container_rejects_before_decoding() {
    let b = hex::decode("83010203").unwrap();
    let mut r = Reader::new(&b);
    r.set_max_container_len(2);
    let err = r.read_array_header().unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::ContainerTooLarge);
    // The cursor did not move.
    assert_eq!(r.remaining(), &b[..]);

    let mut r = Reader::new(&b);
    r.set_max_container_len(3);
    assert_eq!(r.read_array_header().unwrap(), 3);
}

#[test]
fn strict_float_must_be_canonical() {
    // 1.0 as binary64 is not the shortest form.
    let mut wide = Vec::new();
    wide.push(0xfb);
    wide.extend_from_slice(&1.0f64.to_bits().to_be_bytes());
    let mut r = Reader::new(&wide);
    r.set_strict(true);
    assert_eq!(
        *r.read_f64().unwrap_err().kind(),
        ErrorKind::NonCanonicalFloat
    );

    // 1/3 has no narrower form, so binary64 passes strict mode.
    let mut canon = Vec::new();
    append_float_canonical(&mut canon, 1.0 / 3.0);
    let mut r = Reader::new(&canon);
    r.set_strict(true);
    assert_eq!(r.read_f64().unwrap(), 1.0 / 3.0);
}

#[test]
fn strict_noncanonical_nan_payload_rejected() {
    // A quiet NaN with a payload does not equal the canonical f16 NaN.
    let mut b = Vec::new();
    b.push(0xfb);
    b.extend_from_slice(&0x7ff8_0000_0000_0001u64.to_be_bytes());
    let mut r = Reader::new(&b);
    r.set_strict(true);
    assert_eq!(
        *r.read_f64().unwrap_err().kind(),
        ErrorKind::NonCanonicalFloat
    );
}

#[test]
fn f16_reads_back_via_reader_strict() {
    let mut b = Vec::new();
    append_f16(&mut b, 1.0);
    assert_eq!(b, vec![0xf9, 0x3c, 0x00]);
}

#[test]
fn nodup_detects_duplicate_raw_keys() {
    // {"a": 1, "a": 2}
    let b = hex::decode("a2616101616102").unwrap();
    let err = read_map_nodup(&b).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::DuplicateMapKey);
}

#[test]
fn nodup_accepts_distinct_keys() {
    let b = hex::decode("a2616101616202").unwrap();
    let rest = read_map_nodup(&b).unwrap();
    assert!(rest.is_empty());
}

#[test]
fn nodup_indefinite_map() {
    // {_ "a": 1, "a": 2}
    let b = hex::decode("bf616101616102ff").unwrap();
    let err = read_map_nodup(&b).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::DuplicateMapKey);

    let ok = hex::decode("bf616101616202ff").unwrap();
    assert!(read_map_nodup(&ok).unwrap().is_empty());
}

#[test]
fn nodup_compares_raw_bytes_not_values() {
    // 1 and 0x1801 decode to the same integer but differ on the wire, so
    // they are distinct keys under raw-byte identity.
    let b = hex::decode("a201616118016162").unwrap();
    assert!(read_map_nodup(&b).unwrap().is_empty());
}

#[test]
fn ordered_map_preserves_wire_order() {
    // {"b": 1, "a": 2} stays b-first.
    let b = hex::decode("a2616201616102").unwrap();
    let (m, rest) = read_ordered_map(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(m.len(), 2);
    let pairs: Vec<_> = m.pairs().collect();
    assert_eq!(pairs[0], (&[0x61, 0x62][..], &[0x01][..]));
    assert_eq!(pairs[1], (&[0x61, 0x61][..], &[0x02][..]));
}

#[test]
fn ordered_map_owns_its_storage() {
    let b = hex::decode("a1616101").unwrap();
    let (m, _) = read_ordered_map(&b).unwrap();
    drop(b);
    let pairs: Vec<_> = m.pairs().collect();
    assert_eq!(pairs[0].0, &[0x61, 0x61]);
}

#[test]
fn reader_skip_and_remaining() {
    let b = hex::decode("83010203f6").unwrap();
    let mut r = Reader::new(&b);
    r.skip().unwrap();
    assert_eq!(r.remaining(), &[0xf6]);
}
