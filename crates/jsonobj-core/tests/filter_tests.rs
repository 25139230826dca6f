//! Ready-made node filters.

use jsonobj_core::{filter, parse_text, DumpOptions};

fn dump(text: &str, node_filter: jsonobj_core::NodeFilter) -> String {
    parse_text(text)
        .unwrap()
        .to_json_text(&DumpOptions::compact().filter(node_filter))
        .unwrap()
}

#[test]
fn strip_keys_removes_names_at_every_depth() {
    let out = dump(
        r#"{"etag":"1","items":[{"etag":"2","id":1}],"meta":{"etag":"3","kind":"k"}}"#,
        filter::strip_keys(["etag"]),
    );
    assert_eq!(out, r#"{"items":[{"id":1}],"meta":{"kind":"k"}}"#);
}

#[test]
fn strip_keys_with_no_names_is_identity() {
    let src = r#"{"b":1,"a":2}"#;
    assert_eq!(dump(src, filter::strip_keys(Vec::<String>::new())), src);
}

#[test]
fn sort_keys_orders_every_object() {
    let out = dump(r#"{"b":{"z":1,"y":2},"a":[{"d":1,"c":2}]}"#, filter::sort_keys());
    assert_eq!(out, r#"{"a":[{"c":2,"d":1}],"b":{"y":2,"z":1}}"#);
}

#[test]
fn compose_applies_in_order() {
    let out = dump(
        r#"{"b":1,"secret":2,"a":3}"#,
        filter::compose(filter::strip_keys(["secret"]), filter::sort_keys()),
    );
    assert_eq!(out, r#"{"a":3,"b":1}"#);
}

#[test]
fn filters_see_children_already_filtered() {
    let only_nonempty = filter::from_fn(|map| {
        map.into_iter()
            .filter(|(_, v)| v.as_object().is_none_or(|o| !o.is_empty()))
            .collect()
    });
    let out = dump(
        r#"{"keep":1,"gone":{"etag":"x"}}"#,
        filter::compose(filter::strip_keys(["etag"]), only_nonempty),
    );
    assert_eq!(out, r#"{"keep":1}"#);
}
