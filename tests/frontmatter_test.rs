//! Frontmatter serialization and registry loading.

use std::io::Write;

use clipmark::{
    Error, FrontmatterDocument, Note, Property, PropertyType, TypeRegistry, serialize,
};

fn registry(json: &str) -> TypeRegistry {
    TypeRegistry::from_json(json).expect("registry should parse")
}

#[test]
fn test_multitext_json_array() {
    let props = [Property::new("tags", r#"["a","b"]"#)];
    let header = serialize(&props, |_| PropertyType::Multitext);
    let lines: Vec<_> = header.lines().collect();
    assert!(lines.contains(&"tags:"));
    assert!(lines.contains(&"  - \"a\""));
    assert!(lines.contains(&"  - \"b\""));
}

#[test]
fn test_number_digits_extracted() {
    let props = [Property::new("count", "abc123.5xyz")];
    let header = serialize(&props, |_| PropertyType::Number);
    assert!(header.lines().any(|l| l == "count: 123.5"));
}

#[test]
fn test_empty_list_is_empty_string() {
    assert_eq!(serialize(&[], |_| PropertyType::Text), "");
    assert!(FrontmatterDocument::new(&[], |_| PropertyType::Text).is_empty());
}

#[test]
fn test_block_bounded_by_rules() {
    let reg = registry(r#"{"tags": "multitext", "published": "date", "done": "checkbox"}"#);
    let props = vec![
        Property::new("title", "A \"quoted\" title"),
        Property::new("published", "2024-03-01"),
        Property::new("tags", "[[Rust, Lang]], clipping"),
        Property::new("done", "false"),
    ];
    let header = FrontmatterDocument::with_registry(&props, &reg).serialize();
    assert_eq!(
        header,
        "---\n\
         title: \"A \\\"quoted\\\" title\"\n\
         published: 2024-03-01\n\
         tags:\n  - \"[[Rust, Lang]]\"\n  - \"clipping\"\n\
         done: false\n\
         ---\n"
    );
}

#[test]
fn test_registry_from_settings_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"propertyTypes": [{{"name": "tags", "type": "multitext"}}, {{"name": "rating", "type": "number"}}]}}"#
    )
    .unwrap();

    let reg = TypeRegistry::from_path(file.path()).unwrap();
    assert_eq!(reg.type_of("tags"), PropertyType::Multitext);
    assert_eq!(reg.type_of("rating"), PropertyType::Number);
    assert_eq!(reg.type_of("author"), PropertyType::Text);
}

#[test]
fn test_registry_from_plain_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("types.json");
    std::fs::write(&path, r#"{"created": "datetime"}"#).unwrap();

    let reg = TypeRegistry::from_path(&path).unwrap();
    assert_eq!(reg.type_of("created"), PropertyType::Datetime);
}

#[test]
fn test_registry_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = TypeRegistry::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_registry_malformed_json() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{not json").unwrap();
    let err = TypeRegistry::from_path(file.path()).unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn test_properties_from_json() {
    let props: Vec<Property> = serde_json::from_str(
        r#"[{"id": "1", "name": "title", "value": "T"}, {"name": "done", "value": true}]"#,
    )
    .unwrap();
    let header = serialize(&props, |name| match name {
        "done" => PropertyType::Checkbox,
        _ => PropertyType::Text,
    });
    assert_eq!(header, "---\ntitle: \"T\"\ndone: true\n---\n");
}

#[test]
fn test_note_content() {
    let reg = registry(r#"{"tags": "multitext"}"#);
    let props = vec![
        Property::new("url", "https://example.com"),
        Property::new("tags", "web"),
    ];
    let note = Note::clip("<h1>Title</h1><p>Hello <mark>world</mark></p>", &props, &reg);
    assert_eq!(
        note.content(),
        "---\nurl: \"https://example.com\"\ntags:\n  - \"web\"\n---\nHello ==world=="
    );
}
