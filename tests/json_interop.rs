use helix_cbor::{from_json, is_likely_json, to_json, ErrorKind};

fn roundtrip(js: &str) -> serde_json::Value {
    let cbor = from_json(js.as_bytes()).unwrap();
    let (out, rest) = to_json(&cbor).unwrap();
    assert!(rest.is_empty());
    serde_json::from_slice(&out).unwrap()
}

fn json(js: &str) -> serde_json::Value {
    serde_json::from_str(js).unwrap()
}

#[test]
fn scalars_roundtrip() {
    assert_eq!(roundtrip("null"), json("null"));
    assert_eq!(roundtrip("true"), json("true"));
    assert_eq!(roundtrip("false"), json("false"));
    assert_eq!(roundtrip("42"), json("42"));
    assert_eq!(roundtrip("-7"), json("-7"));
    assert_eq!(roundtrip("1.5"), json("1.5"));
    assert_eq!(roundtrip(r#""hello""#), json(r#""hello""#));
}

#[test]
fn integer_detection() {
    // No decimal or exponent: integer encoding.
    let cbor = from_json(b"42").unwrap();
    assert_eq!(cbor, vec![0x18, 0x2a]);
    // Fractional input lands on binary64.
    let cbor = from_json(b"1.5").unwrap();
    assert_eq!(cbor[0], 0xfb);
}

#[test]
fn arrays_and_objects_roundtrip() {
    assert_eq!(roundtrip("[1, 2, 3]"), json("[1,2,3]"));
    assert_eq!(
        roundtrip(r#"{"a": 1, "b": [true, null]}"#),
        json(r#"{"a":1,"b":[true,null]}"#)
    );
}

#[test]
fn uuid_wrapper_roundtrips_exactly() {
    let js = r#"{"$uuid":"00112233-4455-6677-8899-aabbccddeeff"}"#;
    assert_eq!(roundtrip(js), json(js));

    // On the wire: tag 37 + 16 bytes.
    let cbor = from_json(js.as_bytes()).unwrap();
    assert_eq!(cbor[0], 0xd8);
    assert_eq!(cbor[1], 37);
    assert_eq!(cbor[2], 0x50);
}

#[test]
fn uri_unwraps_to_plain_string() {
    let cbor = from_json(br#"{"$uri":"https://example.com"}"#).unwrap();
    let (out, _) = to_json(&cbor).unwrap();
    assert_eq!(
        serde_json::from_slice::<serde_json::Value>(&out).unwrap(),
        json(r#""https://example.com""#)
    );
}

#[test]
fn epoch_renders_as_utc_rfc3339() {
    let cbor = from_json(br#"{"$epoch": 1700000000}"#).unwrap();
    // Whole seconds go out as tag 1 + integer.
    assert_eq!(cbor[0], 0xc1);
    assert_eq!(cbor[1], 0x1a);
    let (out, _) = to_json(&cbor).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v, json(r#""2023-11-14T22:13:20Z""#));
}

#[test]
fn fractional_epoch_uses_float() {
    let cbor = from_json(br#"{"$epoch": 1700000000.5}"#).unwrap();
    assert_eq!(cbor[0], 0xc1);
    assert_eq!(cbor[1], 0xfb);
}

#[test]
fn rfc3339_wrapper_unwraps() {
    let cbor = from_json(br#"{"$rfc3339":"2023-11-14T22:13:20Z"}"#).unwrap();
    assert_eq!(cbor[0], 0xc0);
    let (out, _) = to_json(&cbor).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v, json(r#""2023-11-14T22:13:20Z""#));
}

#[test]
fn base64_wrappers_roundtrip() {
    for js in [
        r#"{"$base64url":"AQIDBA"}"#,
        r#"{"$base64":"AQIDBA=="}"#,
        r#"{"$base16":"01020304"}"#,
        r#"{"$base64urlstr":"aGVsbG8"}"#,
        r#"{"$base64str":"aGVsbG8="}"#,
    ] {
        assert_eq!(roundtrip(js), json(js), "failed for {js}");
    }
}

#[test]
fn embedded_cbor_wrapper() {
    // 0x00 is a complete CBOR item; base64 "AA==".
    let js = r#"{"$cbor":"AA=="}"#;
    let cbor = from_json(js.as_bytes()).unwrap();
    assert_eq!(cbor[0], 0xd8);
    assert_eq!(cbor[1], 24);
    assert_eq!(roundtrip(js), json(js));
}

#[test]
fn decimal_and_bigfloat_wrappers() {
    let js = r#"{"$decimal":[-2,"27315"]}"#;
    let cbor = from_json(js.as_bytes()).unwrap();
    assert_eq!(hex::encode(&cbor), "c48221196ab3");
    assert_eq!(roundtrip(js), json(js));

    let js = r#"{"$bigfloat":[-1,"3"]}"#;
    let cbor = from_json(js.as_bytes()).unwrap();
    assert_eq!(hex::encode(&cbor), "c5822003");
    assert_eq!(roundtrip(js), json(js));
}

#[test]
fn big_mantissa_becomes_bignum() {
    let js = r#"{"$decimal":[0,"18446744073709551616"]}"#;
    let cbor = from_json(js.as_bytes()).unwrap();
    // 2^64 requires a tag-2 bignum mantissa.
    assert!(cbor.windows(2).any(|w| w == [0xc2, 0x49]));
    assert_eq!(roundtrip(js), json(js));
}

#[test]
fn regex_and_mime_wrappers() {
    let js = r#"{"$regex":"^a+$"}"#;
    assert_eq!(roundtrip(js), json(js));
    let js = r#"{"$mime":"text/plain"}"#;
    assert_eq!(roundtrip(js), json(js));

    let err = from_json(br#"{"$regex":"("}"#).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::InvalidPattern);
}

#[test]
fn selfdescribe_wrapper() {
    let js = r#"{"$selfdescribe":true}"#;
    let cbor = from_json(js.as_bytes()).unwrap();
    assert_eq!(hex::encode(&cbor), "d9d9f7");
    assert_eq!(roundtrip(js), json(js));
}

#[test]
fn generic_tag_wrapper() {
    let js = r#"{"$tag":1234,"$":[1,2]}"#;
    let cbor = from_json(js.as_bytes()).unwrap();
    assert_eq!(hex::encode(&cbor), "d904d2820102");
    assert_eq!(roundtrip(js), json(js));
}

#[test]
fn unknown_tag_becomes_generic_wrapper() {
    let cbor = hex::decode("d8634101").unwrap(); // tag 99 + bytes
    let (out, _) = to_json(&cbor).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v, json(r#"{"$tag":99,"$":"AQ=="}"#));
}

#[test]
fn untagged_bytes_become_base64_string() {
    let cbor = hex::decode("43010203").unwrap();
    let (out, _) = to_json(&cbor).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v, json(r#""AQID""#));
}

#[test]
fn non_text_map_keys_render_diagnostically() {
    let cbor = hex::decode("a10102").unwrap(); // {1: 2}
    let (out, _) = to_json(&cbor).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v, json(r#"{"1":2}"#));
}

#[test]
fn bignum_tags_render_as_decimal_strings() {
    let cbor = hex::decode("c249010000000000000000").unwrap();
    let (out, _) = to_json(&cbor).unwrap();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v, json(r#""18446744073709551616""#));
}

#[test]
fn wrapper_payload_errors() {
    assert!(from_json(br#"{"$uuid":"not-a-uuid"}"#).is_err());
    assert!(from_json(br#"{"$uri":""}"#).is_err());
    assert!(from_json(br#"{"$selfdescribe":false}"#).is_err());
    assert!(from_json(br#"{"$decimal":[1]}"#).is_err());
    assert!(from_json(b"{bad json").is_err());
}

#[test]
fn dollar_keys_in_larger_objects_are_plain() {
    // Wrapper recognition requires the single-key form.
    let js = r#"{"$uri":"https://example.com","x":1}"#;
    let cbor = from_json(js.as_bytes()).unwrap();
    assert_eq!(roundtrip(js), json(js));
    // Encoded as a plain 2-entry map, not a tag.
    assert_eq!(cbor[0], 0xa2);
}

#[test]
fn likely_json_heuristic() {
    assert!(is_likely_json(b"{\"a\":1}"));
    assert!(is_likely_json(b"  [1]"));
    assert!(is_likely_json(b"\"s\""));
    assert!(is_likely_json(b"-1"));
    assert!(is_likely_json(b"42"));
    assert!(is_likely_json(b"true"));
    assert!(is_likely_json(b"null"));
    assert!(!is_likely_json(&[0xa1, 0x61, 0x61, 0x01]));
    assert!(!is_likely_json(&[0xff, 0xfe]));
    assert!(!is_likely_json(b""));
    assert!(!is_likely_json(b"   "));
}
