use chrono::{DateTime, TimeDelta, Utc};
use helix_cbor::{
    append_big_int, append_decimal_fraction, append_duration, append_embedded_cbor, append_mime_str,
    append_regex_str, append_rfc3339_time, append_time, append_uri, append_uuid, read_big_int,
    read_decimal_fraction, read_duration, read_embedded_cbor, read_mime_str, read_regex,
    read_regex_str, read_rfc3339_time, read_time, read_uri, read_uuid, strip_self_describe,
    append_self_describe, ErrorKind,
};
use num_bigint::BigInt;
use uuid::Uuid;

fn ts(secs: i64, nanos: u32) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, nanos).unwrap()
}

#[test]
fn whole_second_time_encodes_as_integer() {
    let t = ts(1_700_000_000, 0);
    let mut b = Vec::new();
    append_time(&mut b, &t);
    assert_eq!(b[0], 0xc1);
    assert_eq!(b[1], 0x1a);

    let (got, rest) = read_time(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(got, t);
}

#[test]
fn fractional_time_encodes_as_float_within_a_microsecond() {
    let t = ts(1_700_000_000, 123_456_789);
    let mut b = Vec::new();
    append_time(&mut b, &t);
    assert_eq!(b[0], 0xc1);
    assert_eq!(b[1], 0xfb);

    let (got, rest) = read_time(&b).unwrap();
    assert!(rest.is_empty());
    let delta = (got - t).num_microseconds().unwrap().abs();
    assert!(delta <= 1, "drift {delta}us");
}

#[test]
fn negative_epoch_time_roundtrips() {
    let t = ts(-1_000, 0);
    let mut b = Vec::new();
    append_time(&mut b, &t);
    let (got, _) = read_time(&b).unwrap();
    assert_eq!(got, t);
}

#[test]
fn time_from_f16_payload_tolerates_precision_loss() {
    // Tag 1 with a binary16 payload of 100.0 seconds.
    let b = [0xc1, 0xf9, 0x56, 0x40];
    let (got, rest) = read_time(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(got, ts(100, 0));
}

#[test]
fn time_requires_tag_1() {
    let b = [0xc0, 0x00];
    let err = read_time(&b).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::TagMismatch { want: 1, got: 0 });
}

#[test]
fn rfc3339_roundtrip() {
    let t = ts(1_700_000_000, 0);
    let mut b = Vec::new();
    append_rfc3339_time(&mut b, &t);
    assert_eq!(b[0], 0xc0);
    let (got, rest) = read_rfc3339_time(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(got, t);
}

#[test]
fn duration_roundtrip() {
    let d = TimeDelta::nanoseconds(1_234_567_890);
    let mut b = Vec::new();
    append_duration(&mut b, d);
    let (got, rest) = read_duration(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(got, d);
}

#[test]
fn uri_roundtrip() {
    let mut b = Vec::new();
    append_uri(&mut b, "https://example.com/x?y=1");
    let (got, rest) = read_uri(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(got, "https://example.com/x?y=1");
}

#[test]
fn uuid_requires_16_bytes() {
    let uuid = Uuid::from_bytes([7u8; 16]);
    let mut b = Vec::new();
    append_uuid(&mut b, uuid);
    let (got, rest) = read_uuid(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(got, uuid);

    // Tag 37 with a short payload is rejected.
    let b = hex::decode("d82543010203").unwrap();
    let err = read_uuid(&b).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::UuidLength { got: 3 });
}

#[test]
fn regex_roundtrip_and_compile() {
    let mut b = Vec::new();
    append_regex_str(&mut b, "^ab+c$");
    let (s, _) = read_regex_str(&b).unwrap();
    assert_eq!(s, "^ab+c$");
    let (re, rest) = read_regex(&b).unwrap();
    assert!(rest.is_empty());
    assert!(re.is_match("abbc"));

    let mut bad = Vec::new();
    append_regex_str(&mut bad, "(");
    assert_eq!(*read_regex(&bad).unwrap_err().kind(), ErrorKind::InvalidPattern);
}

#[test]
fn mime_roundtrip() {
    let mut b = Vec::new();
    append_mime_str(&mut b, "text/plain; charset=utf-8");
    let (s, rest) = read_mime_str(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(s, "text/plain; charset=utf-8");
}

#[test]
fn embedded_cbor_roundtrip() {
    let mut inner = Vec::new();
    helix_cbor::append_int(&mut inner, 5);
    let mut b = Vec::new();
    append_embedded_cbor(&mut b, &inner);
    let (payload, rest) = read_embedded_cbor(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(payload.as_ref(), inner.as_slice());
}

#[test]
fn self_describe_strip() {
    let mut b = Vec::new();
    append_self_describe(&mut b);
    helix_cbor::append_int(&mut b, 1);
    assert_eq!(&b[..3], &[0xd9, 0xd9, 0xf7]);

    let (rest, found) = strip_self_describe(&b).unwrap();
    assert!(found);
    assert_eq!(rest, &[0x01]);

    // No tag present: input returned untouched.
    let plain = [0x01];
    let (rest, found) = strip_self_describe(&plain).unwrap();
    assert!(!found);
    assert_eq!(rest, &plain);
}

#[test]
fn bignum_roundtrip() {
    let z: BigInt = "340282366920938463463374607431768211456".parse().unwrap();
    let mut b = Vec::new();
    append_big_int(&mut b, &z);
    assert_eq!(b[0], 0xc2);
    let (got, rest) = read_big_int(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(got, z);

    let neg = -z.clone();
    let mut b = Vec::new();
    append_big_int(&mut b, &neg);
    assert_eq!(b[0], 0xc3);
    let (got, _) = read_big_int(&b).unwrap();
    assert_eq!(got, neg);
}

#[test]
fn negative_bignum_is_minus_one_minus_magnitude() {
    // Tag 3 over magnitude 0x0100 means -(256 + 1).
    let b = hex::decode("c3420100").unwrap();
    let (got, _) = read_big_int(&b).unwrap();
    assert_eq!(got, BigInt::from(-257));
}

#[test]
fn decimal_fraction_roundtrip() {
    let mant = BigInt::from(27315);
    let mut b = Vec::new();
    append_decimal_fraction(&mut b, -2, &mant);
    assert_eq!(hex::encode(&b), "c48221196ab3");

    let (exp, got, rest) = read_decimal_fraction(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(exp, -2);
    assert_eq!(got, mant);
}

#[test]
fn decimal_fraction_indefinite_array_form() {
    // Tag 4 + [_ -2, 27315 ] with a break.
    let b = hex::decode("c49f21196ab3ff").unwrap();
    let (exp, mant, rest) = read_decimal_fraction(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(exp, -2);
    assert_eq!(mant, BigInt::from(27315));
}

#[test]
fn decimal_fraction_wrong_arity() {
    let b = hex::decode("c48121").unwrap();
    let err = read_decimal_fraction(&b).unwrap_err();
    assert_eq!(*err.kind(), ErrorKind::ArrayLength { want: 2, got: 1 });
}
