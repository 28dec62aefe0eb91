use std::collections::HashMap;

use helix_cbor::{
    to_vec, Marshal, Raw, Unmarshal, UnmarshalTrusted,
};

#[derive(Debug, Default, PartialEq, Marshal, Unmarshal)]
struct Person {
    name: String,
    #[cbor(omit_empty)]
    age: i64,
    data: Vec<u8>,
}

#[test]
fn person_omits_default_age() {
    let p = Person {
        name: "Bob".to_owned(),
        age: 0,
        data: vec![10, 11],
    };
    let b = to_vec(&p).unwrap();
    // Two entries: name and data; age is absent.
    assert_eq!(hex::encode(&b), "a2646e616d6563426f626464617461420a0b");

    let mut back = Person::default();
    let rest = back.unmarshal_cbor(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(back, p);

    let mut trusted = Person::default();
    let rest = trusted.unmarshal_cbor_trusted(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(trusted, p);
}

#[test]
fn person_keeps_nonzero_age() {
    let p = Person {
        name: "Ada".to_owned(),
        age: 36,
        data: Vec::new(),
    };
    let b = to_vec(&p).unwrap();
    assert_eq!(b[0], 0xa3);

    let mut back = Person::default();
    back.unmarshal_cbor(&b).unwrap();
    assert_eq!(back, p);
}

#[test]
fn unknown_keys_are_skipped() {
    // {"name": "Bob", "extra": [1, 2], "data": h''}
    let b = hex::decode("a3646e616d6563426f62656578747261820102646461746140").unwrap();
    let mut p = Person::default();
    let rest = p.unmarshal_cbor(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(p.name, "Bob");
    assert!(p.data.is_empty());
}

#[derive(Debug, Default, PartialEq, Marshal, Unmarshal)]
struct Scalars {
    b: bool,
    i8v: i8,
    i16v: i16,
    i32v: i32,
    i64v: i64,
    u8v: u8,
    u16v: u16,
    u32v: u32,
    u64v: u64,
    f32v: f32,
    f64v: f64,
}

#[test]
fn scalar_fields_roundtrip() {
    let s = Scalars {
        b: true,
        i8v: -8,
        i16v: -1600,
        i32v: 70_000,
        i64v: -9_000_000_000,
        u8v: 250,
        u16v: 65_000,
        u32v: 4_000_000_000,
        u64v: u64::MAX,
        f32v: 1.5,
        f64v: 1.0 / 3.0,
    };
    let b = to_vec(&s).unwrap();
    let mut back = Scalars::default();
    let rest = back.unmarshal_cbor(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(back, s);

    let mut trusted = Scalars::default();
    trusted.unmarshal_cbor_trusted(&b).unwrap();
    assert_eq!(trusted, s);
}

#[derive(Debug, Default, PartialEq, Marshal, Unmarshal)]
struct Inner {
    id: u64,
    label: String,
}

#[derive(Debug, Default, PartialEq, Marshal, Unmarshal)]
struct Containers {
    names: Vec<String>,
    counts: Vec<u32>,
    nested: Inner,
    #[cbor(omit_empty)]
    maybe: Option<Inner>,
    items: Vec<Inner>,
    tags: HashMap<String, String>,
    scores: HashMap<String, i64>,
    index: HashMap<u64, u64>,
    #[cbor(rename = "blob")]
    raw: Raw,
}

fn sample_containers() -> Containers {
    let mut tags = HashMap::new();
    tags.insert("env".to_owned(), "prod".to_owned());
    let mut scores = HashMap::new();
    scores.insert("x".to_owned(), -3);
    let mut index = HashMap::new();
    index.insert(7, 9);
    Containers {
        names: vec!["a".to_owned(), "bb".to_owned()],
        counts: vec![1, 2, 3],
        nested: Inner {
            id: 1,
            label: "one".to_owned(),
        },
        maybe: Some(Inner {
            id: 2,
            label: "two".to_owned(),
        }),
        items: vec![
            Inner {
                id: 3,
                label: "three".to_owned(),
            },
            Inner::default(),
        ],
        tags,
        scores,
        index,
        raw: Raw(vec![0x82, 0x01, 0x02]),
    }
}

#[test]
fn containers_roundtrip_safe_and_trusted() {
    let c = sample_containers();
    let b = to_vec(&c).unwrap();

    let mut back = Containers::default();
    let rest = back.unmarshal_cbor(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(back, c);

    let mut trusted = Containers::default();
    let rest = trusted.unmarshal_cbor_trusted(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(trusted, c);
}

#[test]
fn optional_none_emits_nothing_when_omitted() {
    let mut c = sample_containers();
    c.maybe = None;
    let b = to_vec(&c).unwrap();
    let mut back = Containers::default();
    back.unmarshal_cbor(&b).unwrap();
    assert_eq!(back.maybe, None);
}

#[derive(Debug, Default, PartialEq, Marshal, Unmarshal)]
struct Pointers {
    link: Option<Box<Inner>>,
}

#[test]
fn null_pointer_field_roundtrips() {
    let p = Pointers { link: None };
    let b = to_vec(&p).unwrap();
    // {"link": null}
    assert_eq!(hex::encode(&b), "a1646c696e6bf6");
    let mut back = Pointers {
        link: Some(Box::default()),
    };
    back.unmarshal_cbor(&b).unwrap();
    assert_eq!(back, p);

    let p = Pointers {
        link: Some(Box::new(Inner {
            id: 4,
            label: "x".to_owned(),
        })),
    };
    let b = to_vec(&p).unwrap();
    let mut back = Pointers::default();
    back.unmarshal_cbor(&b).unwrap();
    assert_eq!(back, p);
}

#[derive(Debug, Default, PartialEq, Marshal, Unmarshal)]
struct Renamed {
    #[cbor(rename = "n")]
    long_field_name: u64,
    #[cbor(skip)]
    scratch: u64,
}

#[test]
fn rename_and_skip() {
    let r = Renamed {
        long_field_name: 5,
        scratch: 99,
    };
    let b = to_vec(&r).unwrap();
    // {"n": 5}
    assert_eq!(hex::encode(&b), "a1616e05");
    let mut back = Renamed::default();
    back.unmarshal_cbor(&b).unwrap();
    assert_eq!(back.long_field_name, 5);
    assert_eq!(back.scratch, 0);
}

#[test]
fn size_hint_bounds_actual_encoding() {
    let c = sample_containers();
    let b = to_vec(&c).unwrap();
    assert!(c.size_hint() >= b.len(), "{} < {}", c.size_hint(), b.len());

    let p = Person {
        name: "Bob".to_owned(),
        age: 1,
        data: vec![1, 2, 3],
    };
    let b = to_vec(&p).unwrap();
    assert!(p.size_hint() >= b.len());
}

#[test]
fn decode_errors_carry_field_context() {
    // {"age": "oops"} has a text item where an integer belongs.
    let b = hex::decode("a163616765646f6f7073").unwrap();
    let mut p = Person::default();
    let err = p.unmarshal_cbor(&b).unwrap_err();
    assert_eq!(err.context(), Some("age"));
}

#[test]
fn decode_returns_leftover_bytes() {
    let p = Person {
        name: "Bob".to_owned(),
        age: 7,
        data: vec![1],
    };
    let mut b = to_vec(&p).unwrap();
    b.push(0xf6);
    let mut back = Person::default();
    let rest = back.unmarshal_cbor(&b).unwrap();
    assert_eq!(rest, &[0xf6]);
}

#[test]
fn decodes_indefinite_map_form() {
    // {_ "name": "Bob"}
    let b = hex::decode("bf646e616d6563426f62ff").unwrap();
    let mut p = Person::default();
    let rest = p.unmarshal_cbor(&b).unwrap();
    assert!(rest.is_empty());
    assert_eq!(p.name, "Bob");
}
