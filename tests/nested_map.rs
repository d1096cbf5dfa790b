use std::collections::BTreeMap;

use flatbind::{BindErrorKind, Map, Value};
use indoc::indoc;
use pretty_assertions::assert_eq;

fn sample() -> Map {
    let json: serde_json::Value = serde_json::from_str(indoc! {r#"
        {
            "server": {
                "host": "localhost",
                "ports": [80, 443],
                "tls": { "enabled": true }
            },
            "name": "edge"
        }
    "#})
    .unwrap();

    match Value::from(json) {
        Value::Map(map) => map,
        other => panic!("expected a map, got {other:?}"),
    }
}

#[test]
fn get_walks_nested_maps() {
    let map = sample();

    assert_eq!(
        flatbind::get_from_nested_map(&map, &["server", "tls", "enabled"]).unwrap(),
        &Value::Bool(true)
    );
    assert_eq!(
        flatbind::get_from_nested_map(&map, &["server", "ports"]).unwrap(),
        &Value::List(vec![Value::Int(80), Value::Int(443)])
    );
}

#[test]
fn get_missing_key_is_not_found() {
    let map = sample();
    let err = flatbind::get_from_nested_map(&map, &["server", "port"]).unwrap_err();
    assert!(matches!(err.kind(), BindErrorKind::FieldNotFound(key) if key == "port"));
}

#[test]
fn get_through_a_scalar_is_an_invalid_path() {
    let map = sample();
    let err = flatbind::get_from_nested_map(&map, &["name", "first"]).unwrap_err();
    assert!(matches!(err.kind(), BindErrorKind::InvalidPath(at) if at == "name"));
    assert!(err.to_string().starts_with("invalid path"));
}

#[test]
fn set_creates_intermediate_maps() {
    let mut map = Map::new();
    flatbind::set_into_nested_map(&mut map, &["a", "b", "c"], Value::from("deep"));
    flatbind::set_into_nested_map(&mut map, &["a", "d"], Value::Int(1));

    assert_eq!(
        serde_json::Value::from(&Value::Map(map)),
        serde_json::json!({ "a": { "b": { "c": "deep" }, "d": 1 } })
    );
}

#[test]
fn set_overwrites_existing_leaf() {
    let mut map = sample();
    flatbind::set_into_nested_map(&mut map, &["server", "host"], Value::from("0.0.0.0"));
    assert_eq!(
        flatbind::get_from_nested_map(&map, &["server", "host"]).unwrap(),
        &Value::from("0.0.0.0")
    );
}

#[test]
fn stringify_map_renders_top_level_scalars() {
    let mut input = Map::new();
    input.insert("name".into(), Value::from("Alice"));
    input.insert("age".into(), Value::from(25));
    input.insert("number".into(), Value::from(8.2));
    input.insert("isStudent".into(), Value::from(true));
    input.insert(
        "hobbies".into(),
        Value::List(vec![Value::from("reading"), Value::from("swimming")]),
    );
    input.insert("nothing".into(), Value::Null);
    input.insert("nested".into(), Value::Map(Map::new()));

    let output: BTreeMap<String, String> = [
        ("name", "Alice"),
        ("age", "25"),
        ("number", "8.2"),
        ("isStudent", "true"),
        ("hobbies", r#"["reading","swimming"]"#),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v.to_owned()))
    .collect();

    assert_eq!(flatbind::stringify_map(&input), output);
}
