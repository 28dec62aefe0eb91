//! Diagnostic-notation renderings pinned to the RFC 8949 examples.

use helix_cbor::diag;

fn diag_hex(hex_str: &str) -> String {
    let bytes = hex::decode(hex_str).unwrap();
    let (s, rest) = diag(&bytes).unwrap();
    assert!(rest.is_empty(), "leftover bytes for {hex_str}");
    s
}

#[test]
fn rfc_diagnostic_seeds() {
    assert_eq!(diag_hex("6161"), r#""a""#);
    assert_eq!(diag_hex("00"), "0");
    assert_eq!(diag_hex("20"), "-1");
    assert_eq!(diag_hex("43010203"), "h'010203'");
    assert_eq!(diag_hex("83010203"), "[1, 2, 3]");
    assert_eq!(diag_hex("a2616101616202"), r#"{"a": 1, "b": 2}"#);
    assert_eq!(diag_hex("9f0102ff"), "[_ 1, 2]");
    assert_eq!(diag_hex("c11a514b67b0"), "1(1363896240)");
}

#[test]
fn diag_simple_values() {
    assert_eq!(diag_hex("f4"), "false");
    assert_eq!(diag_hex("f5"), "true");
    assert_eq!(diag_hex("f6"), "null");
    assert_eq!(diag_hex("f7"), "undefined");
    assert_eq!(diag_hex("f0"), "simple(16)");
    assert_eq!(diag_hex("f8ff"), "simple(255)");
}

#[test]
fn diag_floats() {
    assert_eq!(diag_hex("f97c00"), "Infinity");
    assert_eq!(diag_hex("f9fc00"), "-Infinity");
    assert_eq!(diag_hex("f97e00"), "NaN");
    assert_eq!(diag_hex("f93c00"), "1");
}

#[test]
fn diag_indefinite_forms() {
    assert_eq!(diag_hex("bf616101ff"), r#"{_ "a": 1}"#);
    assert_eq!(diag_hex("5f42010243030405ff"), "(_ h'0102', h'030405')");
    assert_eq!(diag_hex("7f61616162ff"), r#"(_ "a", "b")"#);
    assert_eq!(diag_hex("9fff"), "[_]");
}

#[test]
fn diag_nested_tags() {
    assert_eq!(diag_hex("c074323031332d30332d32315432303a30343a30305a"),
        r#"0("2013-03-21T20:04:00Z")"#);
    assert_eq!(diag_hex("d74401020304"), "23(h'01020304')");
}

#[test]
fn diag_returns_remainder() {
    let bytes = hex::decode("0001").unwrap();
    let (s, rest) = diag(&bytes).unwrap();
    assert_eq!(s, "0");
    assert_eq!(rest, &[0x01]);
}
