//! Field encoder and `Serialize` derivation tests.

use std::collections::BTreeMap;

use formpart::*;
use serde::Serialize;

fn f(name: &str, value: &str) -> Field {
    Field::new(name, value)
}

fn record(entries: Vec<(&str, StructuredValue)>) -> StructuredValue {
    StructuredValue::Nested(entries.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
}

#[derive(Serialize)]
struct Profile {
    name: String,
    age: u32,
    verified: bool,
    nickname: Option<String>,
    tags: Vec<String>,
}

fn jane() -> Profile {
    Profile {
        name: "Jane".into(),
        age: 34,
        verified: true,
        nickname: None,
        tags: vec!["admin".into(), "ops".into()],
    }
}

// ── Scalars ─────────────────────────────────────────────────

#[test]
fn scalars_keep_declaration_order() {
    let fields = encode(&jane(), ArrayEncoding::AccumulateValues).unwrap();
    assert_eq!(
        fields,
        vec![
            f("name", "Jane"),
            f("age", "34"),
            f("verified", "true"),
            f("tags", "admin"),
            f("tags", "ops"),
        ]
    );
}

#[test]
fn bool_false_is_literal() {
    let val = record(vec![("on", StructuredValue::Bool(false))]);
    let fields = encode_fields(&val, ArrayEncoding::default()).unwrap();
    assert_eq!(fields, vec![f("on", "false")]);
}

#[test]
fn numbers_render_as_plain_decimal() {
    #[derive(Serialize)]
    struct Nums {
        big: u64,
        negative: i64,
        ratio: f64,
        small: f32,
        huge: f64,
        tiny: f64,
        whole: f64,
        max: u64,
    }
    let fields = encode(
        &Nums {
            big: 1_234_567,
            negative: -42,
            ratio: 2.5,
            small: 0.1,
            huge: 1e21,
            tiny: 1e-7,
            whole: 3.0,
            max: u64::MAX,
        },
        ArrayEncoding::default(),
    )
    .unwrap();
    assert_eq!(
        fields,
        vec![
            f("big", "1234567"),
            f("negative", "-42"),
            f("ratio", "2.5"),
            f("small", "0.1"),
            f("huge", "1000000000000000000000"),
            f("tiny", "0.0000001"),
            f("whole", "3"),
            f("max", "18446744073709551615"),
        ]
    );
}

#[test]
fn text_is_passed_through_unchanged() {
    let val = record(vec![("bio", "line one\r\nline \"two\" & <three>".into())]);
    let fields = encode_fields(&val, ArrayEncoding::default()).unwrap();
    assert_eq!(fields[0].value, "line one\r\nline \"two\" & <three>");
}

#[test]
fn non_finite_float_is_rejected() {
    #[derive(Serialize)]
    struct Bad {
        x: f64,
    }
    let err = encode(&Bad { x: f64::NAN }, ArrayEncoding::default()).unwrap_err();
    assert!(matches!(err, EncodingError::SerializationFailure(_)));
}

// ── Optionals ───────────────────────────────────────────────

#[test]
fn absent_optional_emits_nothing() {
    let fields = encode(&jane(), ArrayEncoding::AccumulateValues).unwrap();
    assert!(fields.iter().all(|field| field.name != "nickname"));
}

#[test]
fn present_optional_emits_one_field() {
    let mut p = jane();
    p.nickname = Some("JJ".into());
    let fields = encode(&p, ArrayEncoding::AccumulateValues).unwrap();
    let nick: Vec<_> = fields.iter().filter(|field| field.name == "nickname").collect();
    assert_eq!(nick, vec![&f("nickname", "JJ")]);
}

// ── Arrays ──────────────────────────────────────────────────

#[test]
fn bracket_suffix_appends_once() {
    let fields = encode(&jane(), ArrayEncoding::BracketSuffix).unwrap();
    assert_eq!(&fields[3..], &[f("tags[]", "admin"), f("tags[]", "ops")]);
    // Scalars are never suffixed.
    assert_eq!(fields[0], f("name", "Jane"));
}

#[test]
fn empty_array_emits_nothing_under_either_strategy() {
    let val = record(vec![
        ("name", "Jane".into()),
        ("tags", StructuredValue::Array(vec![])),
    ]);
    for strategy in [ArrayEncoding::AccumulateValues, ArrayEncoding::BracketSuffix] {
        assert_eq!(encode_fields(&val, strategy).unwrap(), vec![f("name", "Jane")]);
    }
}

#[test]
fn absent_array_elements_are_skipped() {
    let val = record(vec![(
        "ids",
        StructuredValue::Array(vec![
            StructuredValue::Absent,
            7i64.into(),
            StructuredValue::Absent,
        ]),
    )]);
    let fields = encode_fields(&val, ArrayEncoding::BracketSuffix).unwrap();
    assert_eq!(fields, vec![f("ids[]", "7")]);

    let only_absent = record(vec![("ids", StructuredValue::Array(vec![StructuredValue::Absent]))]);
    assert!(encode_fields(&only_absent, ArrayEncoding::default()).unwrap().is_empty());
}

#[test]
fn array_of_arrays_is_unsupported_nesting() {
    #[derive(Serialize)]
    struct Grid {
        cells: Vec<Vec<u8>>,
    }
    let err = encode(&Grid { cells: vec![vec![1, 2]] }, ArrayEncoding::default()).unwrap_err();
    assert_eq!(
        err,
        EncodingError::UnsupportedNesting {
            field: "cells".into()
        }
    );
}

#[test]
fn array_of_records_uses_json_per_element() {
    #[derive(Serialize)]
    struct Item {
        id: u32,
    }
    #[derive(Serialize)]
    struct Order {
        items: Vec<Item>,
    }
    let fields = encode(
        &Order {
            items: vec![Item { id: 1 }, Item { id: 2 }],
        },
        ArrayEncoding::BracketSuffix,
    )
    .unwrap();
    assert_eq!(fields, vec![f("items[]", r#"{"id":1}"#), f("items[]", r#"{"id":2}"#)]);
}

// ── Nested records ──────────────────────────────────────────

#[test]
fn nested_record_becomes_one_json_field() {
    #[derive(Serialize)]
    struct Address {
        city: String,
        zip: Option<String>,
        lines: Vec<String>,
    }
    #[derive(Serialize)]
    struct User {
        name: String,
        address: Address,
    }
    let user = User {
        name: "Jane".into(),
        address: Address {
            city: "Oslo".into(),
            zip: None,
            lines: vec!["Main St 1".into()],
        },
    };
    let fields = encode(&user, ArrayEncoding::default()).unwrap();
    assert_eq!(
        fields,
        vec![
            f("name", "Jane"),
            f("address", r#"{"city":"Oslo","lines":["Main St 1"]}"#),
        ]
    );
}

#[test]
fn enum_variants() {
    #[derive(Serialize)]
    enum Role {
        Admin,
        Guest { until: u32 },
    }
    #[derive(Serialize)]
    struct Account {
        role: Role,
        previous: Role,
    }
    let fields = encode(
        &Account {
            role: Role::Admin,
            previous: Role::Guest { until: 5 },
        },
        ArrayEncoding::default(),
    )
    .unwrap();
    assert_eq!(
        fields,
        vec![f("role", "Admin"), f("previous", r#"{"Guest":{"until":5}}"#)]
    );
}

#[test]
fn map_root_keeps_iteration_order() {
    let mut map = BTreeMap::new();
    map.insert("b", 2);
    map.insert("a", 1);
    let fields = encode(&map, ArrayEncoding::default()).unwrap();
    assert_eq!(fields, vec![f("a", "1"), f("b", "2")]);
}

// ── Root handling ───────────────────────────────────────────

#[test]
fn bare_scalar_root_is_rejected() {
    let err = encode("hello", ArrayEncoding::default()).unwrap_err();
    assert_eq!(err, EncodingError::UnsupportedRoot { kind: "scalar" });
}

#[test]
fn bare_array_root_is_rejected() {
    let err = encode(&vec![1, 2], ArrayEncoding::default()).unwrap_err();
    assert_eq!(err, EncodingError::UnsupportedRoot { kind: "array" });
}

#[test]
fn absent_root_is_empty() {
    let none: Option<Profile> = None;
    assert!(encode(&none, ArrayEncoding::default()).unwrap().is_empty());
}

#[test]
fn empty_entry_name_is_rejected() {
    let mut map = BTreeMap::new();
    map.insert("", "x");
    let err = encode(&map, ArrayEncoding::default()).unwrap_err();
    assert_eq!(err, EncodingError::EmptyFieldName);
}

#[test]
fn non_text_map_key_is_rejected() {
    let mut map = BTreeMap::new();
    map.insert(vec![1u8], "x");
    let err = encode(&map, ArrayEncoding::default()).unwrap_err();
    assert!(matches!(err, EncodingError::SerializationFailure(_)));
}

#[test]
fn integer_map_keys_become_text() {
    let mut map = BTreeMap::new();
    map.insert(10u32, "ten");
    let fields = encode(&map, ArrayEncoding::default()).unwrap();
    assert_eq!(fields, vec![f("10", "ten")]);
}

// ── Derivation layer ────────────────────────────────────────

#[test]
fn to_structured_builds_closed_variants() {
    let val = to_structured(&jane()).unwrap();
    assert_eq!(val.get("name"), Some(&StructuredValue::Scalar("Jane".into())));
    assert_eq!(val.get("verified"), Some(&StructuredValue::Bool(true)));
    assert_eq!(val.get("nickname"), Some(&StructuredValue::Absent));
    assert_eq!(
        val.get("tags"),
        Some(&StructuredValue::Array(vec!["admin".into(), "ops".into()]))
    );
}

#[test]
fn json_value_input_is_supported() {
    let json = serde_json::json!({"name": "Jane", "tags": ["a", "b"], "gone": null});
    let fields = encode(&json, ArrayEncoding::BracketSuffix).unwrap();
    // serde_json::Value objects iterate in sorted key order.
    assert_eq!(
        fields,
        vec![f("name", "Jane"), f("tags[]", "a"), f("tags[]", "b")]
    );
}

#[test]
fn encoding_is_deterministic() {
    let a = encode(&jane(), ArrayEncoding::BracketSuffix).unwrap();
    let b = encode(&jane(), ArrayEncoding::BracketSuffix).unwrap();
    assert_eq!(a, b);
}
