//! Access paths: parsing, display and resolution.

use jsonobj_core::{parse_text, Error, Path, Segment};

#[test]
fn parses_mixed_segments() {
    let path = Path::parse(r#"knows[0].name["@id"]['x:y']"#).unwrap();
    assert_eq!(
        path.segments(),
        &[
            Segment::Attr("knows".to_string()),
            Segment::Index(0),
            Segment::Attr("name".to_string()),
            Segment::Key("@id".to_string()),
            Segment::Key("x:y".to_string()),
        ]
    );
}

#[test]
fn empty_path_resolves_to_root() {
    let tree = parse_text(r#"{"a": 1}"#).unwrap();
    assert!(Path::parse("").unwrap().is_empty());
    assert_eq!(tree.lookup("").unwrap().node().unwrap().keys(), vec!["a"]);
}

#[test]
fn quoted_keys_support_escapes() {
    let path = Path::parse(r#"["say \"hi\""]"#).unwrap();
    assert_eq!(path.segments(), &[Segment::Key("say \"hi\"".to_string())]);
}

#[test]
fn display_round_trips() {
    for src in [r#"a.b[2]["@id"].c"#, "[0].x", r#"["q\"uote"]"#] {
        let path = Path::parse(src).unwrap();
        assert_eq!(Path::parse(&path.to_string()).unwrap(), path);
    }
}

#[test]
fn malformed_paths_are_rejected() {
    for bad in [".a", "a..b", "a[", "a[x]", "a[1", "a.b-c", r#"a["open"#, "a]"] {
        assert!(
            matches!(Path::parse(bad), Err(Error::InvalidPath { .. })),
            "{bad} should not parse"
        );
    }
}

#[test]
fn resolution_reports_the_failing_access_kind() {
    let tree = parse_text(r#"{"@id": "x", "a": {"b": [1]}}"#).unwrap();
    assert_eq!(tree.lookup(r#"["@id"]"#).unwrap(), "x");
    assert_eq!(tree.lookup("a.b[0]").unwrap(), 1);
    assert!(matches!(tree.lookup("a.c"), Err(Error::AttributeNotFound(_))));
    assert!(matches!(tree.lookup(r#"a["c"]"#), Err(Error::KeyNotFound(_))));
    assert!(matches!(tree.lookup("a.b[5]"), Err(Error::IndexOutOfRange { .. })));
    assert!(matches!(tree.lookup("a.b.c"), Err(Error::TypeMismatch { .. })));
}
