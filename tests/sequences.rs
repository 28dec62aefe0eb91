use helix_cbor::{
    append_int, append_sequence, append_str, for_each_sequence, skip, split_sequence,
    validate_document, validate_well_formed, ErrorKind,
};

#[test]
fn empty_sequence_is_empty_bytes() {
    let mut out = Vec::new();
    append_sequence(&mut out, std::iter::empty());
    assert!(out.is_empty());
    assert_eq!(split_sequence(&[]).unwrap().len(), 0);
}

#[test]
fn sequence_is_concatenation() {
    let mut a = Vec::new();
    append_int(&mut a, 1);
    let mut b = Vec::new();
    append_str(&mut b, "x");

    let mut seq = Vec::new();
    append_sequence(&mut seq, [a.as_slice(), b.as_slice()]);
    assert_eq!(seq.len(), a.len() + b.len());

    let items = split_sequence(&seq).unwrap();
    assert_eq!(items, vec![a.as_slice(), b.as_slice()]);
}

#[test]
fn for_each_visits_every_item() {
    let seq = hex::decode("0102616183040506").unwrap();
    let mut seen = Vec::new();
    for_each_sequence(&seq, |item| {
        seen.push(item.to_vec());
        Ok(())
    })
    .unwrap();
    assert_eq!(seen.len(), 4);
    assert_eq!(seen[2], vec![0x61, 0x61]);
    assert_eq!(seen[3], hex::decode("83040506").unwrap());
}

#[test]
fn skip_matches_item_boundaries() {
    // skip lands on the same remainder a reader would.
    let seq = hex::decode("83010203f6").unwrap();
    let rest = skip(&seq).unwrap();
    assert_eq!(rest, &[0xf6]);
}

#[test]
fn skip_walks_nested_and_indefinite() {
    // [_ {"a": [1, 2]}, 7(0)]
    let b = hex::decode("9fa16161820102c700ff").unwrap();
    let rest = skip(&b).unwrap();
    assert!(rest.is_empty());
}

#[test]
fn skip_short_input_fails() {
    let b = hex::decode("8301").unwrap();
    assert!(skip(&b).is_err());
}

#[test]
fn validate_implies_skip() {
    let cases = [
        "00",
        "6161",
        "83010203",
        "a2616101616202",
        "9f0102ff",
        "c11a514b67b0",
        "f97e00",
    ];
    for hex_str in cases {
        let b = hex::decode(hex_str).unwrap();
        let v = validate_well_formed(&b).unwrap();
        let s = skip(&b).unwrap();
        assert_eq!(v, s, "mismatch for {hex_str}");
    }
}

#[test]
fn validate_rejects_reserved_additional_info() {
    for info in 28..=30u8 {
        let b = [info]; // major 0 with reserved info
        let err = validate_well_formed(&b).unwrap_err();
        assert_eq!(*err.kind(), ErrorKind::InvalidAdditionalInfo { info });
    }
}

#[test]
fn validate_rejects_invalid_utf8_text() {
    let b = [0x62, 0xff, 0xfe];
    let err = validate_well_formed(&b).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::InvalidUtf8);

    // Chunked text validates every chunk.
    let b = [0x7f, 0x61, 0xff, 0xff];
    let err = validate_well_formed(&b).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::InvalidUtf8);
}

#[test]
fn validate_rejects_mismatched_chunk_major() {
    // Indefinite text with a byte-string chunk.
    let b = hex::decode("7f4101ff").unwrap();
    assert!(validate_well_formed(&b).is_err());
}

#[test]
fn validate_document_consumes_whole_sequence() {
    let seq = hex::decode("010262616183010203").unwrap();
    validate_document(&seq).unwrap();

    let bad = hex::decode("0162ff").unwrap();
    assert!(validate_document(&bad).is_err());
}

#[test]
fn deep_nesting_hits_ceiling_without_overflow() {
    // One hundred and fifty thousand nested indefinite arrays.
    let mut b = vec![0x9f; 150_000];
    b.push(0x01);
    b.extend(std::iter::repeat(0xff).take(150_000));
    let err = skip(&b).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::MaxDepthExceeded);
}
