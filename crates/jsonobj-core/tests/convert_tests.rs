//! Free functions lifted over a single tree or an array of trees.

use jsonobj_core::{
    entries_of, get_with_default, parse_text, set_default_entry, to_json_text, to_parsed_json,
    to_plain_value, DumpOptions, Error, Lifted, Value,
};
use serde_json::json;

const ITEMS_JSON: &str = r#"{
    "k1": 1,
    "k2": "abc",
    "k3": {
        "x1": "foo",
        "x2": 17
    }
}"#;

fn two_trees() -> Value {
    Value::Array(vec![
        Value::Node(parse_text(r#"{"a": 1}"#).unwrap()),
        Value::Node(parse_text(r#"{"b": 2}"#).unwrap()),
    ])
}

#[test]
fn entries_follow_document_order() {
    let tree = Value::Node(parse_text(ITEMS_JSON).unwrap());
    let entries = entries_of(&tree).unwrap().single().unwrap();
    let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["k1", "k2", "k3"]);
    assert_eq!(entries[0].1, 1);
    assert_eq!(entries[1].1, "abc");
    let k3 = entries[2].1.as_node().expect("k3 is a node");
    assert_eq!(k3.attr("x1").unwrap(), "foo");
    assert_eq!(k3.attr("x2").unwrap(), 17);
}

#[test]
fn entries_over_many_trees() {
    let lifted = entries_of(&two_trees()).unwrap();
    let Lifted::Each(all) = lifted else {
        panic!("expected element-wise result");
    };
    assert_eq!(all.len(), 2);
    assert_eq!(all[0], vec![("a".to_string(), Value::from(1))]);
    assert_eq!(all[1], vec![("b".to_string(), Value::from(2))]);
}

#[test]
fn get_with_default_single_and_many() {
    let tree = Value::Node(parse_text(ITEMS_JSON).unwrap());
    assert_eq!(
        get_with_default(&tree, "k1", Value::Null).unwrap(),
        Lifted::Single(Value::from(1))
    );
    assert!(get_with_default(&tree, "e1", Value::Null)
        .unwrap()
        .single()
        .unwrap()
        .is_null());
    assert_eq!(
        get_with_default(&tree, "e2", "abc").unwrap(),
        Lifted::Single(Value::from("abc"))
    );
    assert_eq!(
        get_with_default(&two_trees(), "a", 0).unwrap().into_vec(),
        vec![Value::from(1), Value::from(0)]
    );
}

#[test]
fn set_default_entry_on_many_trees_gives_each_its_own_copy() {
    let trees = two_trees();
    let child = Value::Node(parse_text(r#"{"n": 0}"#).unwrap());
    set_default_entry(&trees, "c", child).unwrap();
    trees
        .at(0)
        .unwrap()
        .get("c")
        .unwrap()
        .node()
        .unwrap()
        .set("n", 1)
        .unwrap();
    assert_eq!(trees.at(1).unwrap().lookup(&"c.n".parse().unwrap()).unwrap(), 0);
    assert_eq!(trees.at(0).unwrap().lookup(&"c.n".parse().unwrap()).unwrap(), 1);
}

#[test]
fn lifting_over_non_objects_fails() {
    let mixed = Value::Array(vec![Value::from(1)]);
    assert!(matches!(entries_of(&mixed), Err(Error::TypeMismatch { .. })));
    assert!(matches!(
        get_with_default(&Value::from("s"), "k", 0),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn plain_value_of_array_of_trees() {
    let plain = to_plain_value(&two_trees()).unwrap();
    assert_eq!(plain, json!([{"a": 1}, {"b": 2}]));
    assert_eq!(to_plain_value(&Value::from(3)).unwrap(), json!(3));
}

#[test]
fn json_text_of_array_of_trees() {
    let text = to_json_text(&two_trees(), &DumpOptions::compact()).unwrap();
    assert_eq!(text, r#"[{"a":1},{"b":2}]"#);
}

#[test]
fn json_text_of_wrapper_is_an_array() {
    let tree = Value::Node(parse_text("[1, 2]").unwrap());
    assert_eq!(to_json_text(&tree, &DumpOptions::compact()).unwrap(), "[1,2]");
}

#[test]
fn parsed_json_is_tree_free() {
    let tree = Value::Node(parse_text(ITEMS_JSON).unwrap());
    let expected: serde_json::Value = serde_json::from_str(ITEMS_JSON).unwrap();
    assert_eq!(to_parsed_json(&tree).unwrap(), expected);
    assert_eq!(
        to_parsed_json(&two_trees()).unwrap(),
        json!([{"a": 1}, {"b": 2}])
    );
}
