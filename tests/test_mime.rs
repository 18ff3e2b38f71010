use std::collections::{BTreeMap, HashSet};

use eventkit::error::Error;
use eventkit::mime::{MimeType, MimeTypeMap, parse_mime_type};
use proptest::prelude::*;

fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_invalid_mime_types() {
    for raw in ["app", "app/type/foo", "app+suffix", "application/json suffix", "/json", "application/"] {
        let result = parse_mime_type(raw, Some("utf-8"));
        assert!(
            matches!(result, Err(Error::InvalidMimeType { .. })),
            "{raw} should be rejected"
        );
    }
}

#[test]
fn test_malformed_parameters() {
    assert!(parse_mime_type("application/json; charset", Some("utf-8")).is_err());
    assert!(parse_mime_type("application/json; =utf-8", Some("utf-8")).is_err());
}

#[test]
fn test_valid_mime_types() {
    let cases = [
        ("application/json", "application", "json", None, params(&[("charset", "utf-8")])),
        (
            "application/cloudevents+json",
            "application",
            "cloudevents",
            Some("json"),
            params(&[("charset", "utf-8")]),
        ),
        (
            "application/cloudevents+json; charset=latin9",
            "application",
            "cloudevents",
            Some("json"),
            params(&[("charset", "latin9")]),
        ),
        (
            "application/cloudevents+json; charset=latin9; param=otherKey",
            "application",
            "cloudevents",
            Some("json"),
            params(&[("charset", "latin9"), ("param", "otherkey")]),
        ),
    ];

    for (raw, type_name, subtype, suffix, parameters) in cases {
        let mt = parse_mime_type(raw, Some("utf-8")).unwrap();
        assert_eq!(mt.type_name(), type_name, "{raw}");
        assert_eq!(mt.subtype(), subtype, "{raw}");
        assert_eq!(mt.suffix(), suffix, "{raw}");
        assert_eq!(mt.parameters(), &parameters, "{raw}");
    }
}

#[test]
fn test_mime_type_name() {
    let cases = [
        ("application/json", "application/json;charset=utf-8"),
        ("application/JSON", "application/json;charset=utf-8"),
        (
            "application/json ; param=value ; charset=latin9",
            "application/json;charset=latin9;param=value",
        ),
        (
            "application/json+suffix ; param=value ; charset=latin9",
            "application/json+suffix;charset=latin9;param=value",
        ),
    ];

    for (raw, name) in cases {
        assert_eq!(parse_mime_type(raw, Some("utf-8")).unwrap().name(), name);
    }
}

#[test]
fn test_mime_type_name_no_charset() {
    let mt = parse_mime_type("application/json", None).unwrap();
    assert_eq!(mt.name(), "application/json");
    assert_eq!(mt.charset(), None);
}

#[test]
fn test_charset() {
    let mt = parse_mime_type("application/json+suffix;charset=latin9", Some("utf-8")).unwrap();
    assert_eq!(mt.charset(), Some("latin9"));
}

#[test]
fn test_mime_type_equality() {
    let pairs = [
        ("application/json", "application/json;charset=utf-8"),
        (
            "application/JSON; param=value ; other=val",
            "application/json;other=val  ; param=value",
        ),
    ];

    for (left, right) in pairs {
        assert_eq!(
            parse_mime_type(left, Some("utf-8")).unwrap(),
            parse_mime_type(right, Some("utf-8")).unwrap()
        );
    }
}

#[test]
fn test_mime_type_hash_collides_for_equivalent_spellings() {
    let set: HashSet<MimeType> = ["application/JSON", "application/json; charset=UTF-8"]
        .into_iter()
        .map(|raw| raw.parse().unwrap())
        .collect();

    assert_eq!(set.len(), 1);
}

#[test]
fn test_is_json() {
    assert!("application/json".parse::<MimeType>().unwrap().is_json());
    assert!("application/cloudevents+json".parse::<MimeType>().unwrap().is_json());
    assert!(!"text/plain".parse::<MimeType>().unwrap().is_json());
}

#[test]
fn test_display_matches_name() {
    let mt: MimeType = "Text/Plain; Format=Flowed".parse().unwrap();
    assert_eq!(mt.to_string(), "text/plain;charset=utf-8;format=flowed");
    assert_eq!(mt.to_string(), mt.name());
}

#[test]
fn test_map_key_identity() {
    let mut map = MimeTypeMap::new();
    map.insert("application/json", "bar").unwrap();

    assert_eq!(*map.get("application/json;charset=utf-8").unwrap(), "bar");
    assert_eq!(map.keys().collect::<HashSet<_>>(), HashSet::from(["application/json;charset=utf-8"]));
}

#[test]
fn test_map_missing_key() {
    let map: MimeTypeMap<u8> = MimeTypeMap::new();

    assert!(matches!(map.get("application/json"), Err(Error::KeyNotFound(_))));
    assert!(matches!(map.get("not a mime"), Err(Error::InvalidMimeType { .. })));
    assert!(!map.contains_key("not a mime"));
}

#[test]
fn test_map_insert_replaces_equivalent_key() {
    let mut map = MimeTypeMap::new();

    assert!(map.insert("Application/JSON", 1).unwrap().is_none());
    assert_eq!(map.insert("application/json; charset=utf-8", 2).unwrap(), Some(1));
    assert_eq!(map.len(), 1);

    *map.get_mut("application/json").unwrap() += 1;
    assert_eq!(*map.get("application/json").unwrap(), 3);

    assert_eq!(map.remove("application/json").unwrap(), Some(3));
    assert!(map.is_empty());
}

fn case_variants(s: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), s.len()).prop_map(move |upper| {
        s.chars()
            .zip(upper)
            .map(|(c, up)| if up { c.to_ascii_uppercase() } else { c })
            .collect()
    })
}

proptest! {
    #[test]
    fn equivalent_spellings_normalize_identically(
        media in case_variants("application/cloudevents+json"),
        key in case_variants("charset"),
        value in case_variants("latin9"),
        swap in any::<bool>(),
        pad in "[ ]{0,3}",
    ) {
        let charset = format!("{pad}{key}{pad}={pad}{value}{pad}");
        let other = format!("{pad}param={pad}x");
        let raw = if swap {
            format!("{media}{pad};{charset};{other}")
        } else {
            format!("{media};{other};{charset}")
        };

        let parsed = parse_mime_type(&raw, Some("utf-8")).unwrap();
        let canonical = parse_mime_type("application/cloudevents+json;charset=latin9;param=x", Some("utf-8")).unwrap();
        prop_assert_eq!(&parsed, &canonical);

        let mut map = MimeTypeMap::new();
        map.insert(&raw, ()).unwrap();
        prop_assert!(map.contains_key(&canonical.name()));
    }
}
