//! Fixture-driven scenario tests with exact expected file bytes.

use pathmap::{PathMap, PathTrie};
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Deserialize)]
struct Scenario {
    description: String,
    entries: Vec<(String, Value)>,
    queries: Vec<Query>,
}

#[derive(Deserialize)]
struct Query {
    path: String,
    expect: Option<Value>,
}

fn load_scenarios() -> Vec<Scenario> {
    let json = r#"[
        {
            "description": "single leaf",
            "entries": [["/foo", "f"]],
            "queries": [
                {"path": "/foo", "expect": "f"},
                {"path": "/", "expect": null},
                {"path": "/foo/anything", "expect": null}
            ]
        },
        {
            "description": "leaf that is also an interior node",
            "entries": [["/foo", "f"], ["/foo/bar", "b"]],
            "queries": [
                {"path": "/foo", "expect": "f"},
                {"path": "/foo/bar", "expect": "b"}
            ]
        },
        {
            "description": "true payloads stay inline",
            "entries": [["/foo/bar", true]],
            "queries": [
                {"path": "/foo/bar", "expect": true},
                {"path": "/foo", "expect": null}
            ]
        },
        {
            "description": "escaped separator inside a segment",
            "entries": [["/fancy%2Fpaths", 1]],
            "queries": [
                {"path": "/fancy%2Fpaths", "expect": 1},
                {"path": "/fancy/paths", "expect": null}
            ]
        },
        {
            "description": "multibyte segments",
            "entries": [["/poems/\u03b5\u03bb\u03bb\u03b7\u03bd\u03b9\u03ba\u03ac", "poem"]],
            "queries": [
                {"path": "/poems/\u03b5\u03bb\u03bb\u03b7\u03bd\u03b9\u03ba\u03ac", "expect": "poem"}
            ]
        }
    ]"#;
    serde_json::from_str(json).expect("failed to parse scenario fixtures")
}

fn serialize(entries: &[(String, Value)]) -> String {
    let mut trie = PathTrie::new();
    for (path, payload) in entries {
        trie.insert(path, payload.clone()).unwrap();
    }
    trie.stringify().unwrap()
}

#[test]
fn test_scenario_lookups() {
    for scenario in load_scenarios() {
        let text = serialize(&scenario.entries);
        let map = PathMap::from_slice(text.as_bytes()).unwrap();
        for query in &scenario.queries {
            assert_eq!(
                map.find(&query.path).unwrap(),
                query.expect.clone(),
                "wrong result for {} in '{}'",
                query.path,
                scenario.description
            );
        }
    }
}

#[test]
fn test_single_leaf_bytes() {
    let text = serialize(&[("/foo".to_string(), json!("f"))]);
    assert_eq!(text, "\"f\"\n/foo:\n");
}

#[test]
fn test_leaf_and_interior_bytes() {
    let text = serialize(&[
        ("/foo".to_string(), json!("f")),
        ("/foo/bar".to_string(), json!("b")),
    ]);
    // "/foo" carries a self-reference to "f" and a child reference to "b"
    assert_eq!(text, "\"f\"\n\"b\"\n:/bar:4\n/foo:8\n");
}

#[test]
fn test_inline_true_bytes() {
    let text = serialize(&[("/foo/bar".to_string(), json!(true))]);
    assert_eq!(text, "/bar!\n/foo:\n");
    assert!(!text.lines().any(|l| l == "true"));
}

#[test]
fn test_escaped_separator_bytes() {
    let text = serialize(&[("/fancy%2Fpaths".to_string(), json!(1))]);
    assert_eq!(text, "1\n/fancy\\/paths:\n");
}

#[test]
fn test_multibyte_offsets_are_byte_counts() {
    let text = serialize(&[
        ("/poems/ελληνικά".to_string(), json!("ok")),
        ("/z".to_string(), json!("z")),
    ]);
    // The poems node line is 10 chars but 18 bytes, so the next line
    // starts at byte 24 (0x18)
    assert_eq!(text, "\"ok\"\n/ελληνικά:\n\"z\"\n/poems:5/z:18\n");
}

#[test]
fn test_trousers_catalogue_dedup() {
    let input = json!({
        "/women/trousers/yoga-pants/black": 1,
        "/women/trousers/yoga-pants/blue": 2,
        "/women/trousers/yoga-pants/brown": 3,
        "/women/trousers/zip-off-trousers/blue": 2,
        "/women/trousers/zip-off-trousers/black": 1,
        "/women/trousers/zip-off-trousers/brown": 3
    });

    let mut trie = PathTrie::new();
    trie.bulk_insert(
        input
            .as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    )
    .unwrap();
    let text = trie.stringify().unwrap();

    // Three payload lines, one shared colour node line, trousers, women,
    // root: seven lines in total.
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 7);
    for payload in ["1", "2", "3"] {
        assert_eq!(
            lines.iter().filter(|l| **l == payload).count(),
            1,
            "payload {payload} should appear exactly once"
        );
    }
    // The two colour subtrees are structurally identical and collapse to
    // one node line referencing the deduplicated leaves.
    assert_eq!(
        lines
            .iter()
            .filter(|l| **l == "/black:/blue:2/brown:4")
            .count(),
        1
    );

    let map = PathMap::from_slice(text.as_bytes()).unwrap();
    for (path, expect) in input.as_object().unwrap() {
        assert_eq!(map.find(path).unwrap().as_ref(), Some(expect));
    }
    assert_eq!(map.find("/women/trousers/yoga-pants").unwrap(), None);
}
