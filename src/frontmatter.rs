//! Typed property lists serialized as a YAML frontmatter block.
//!
//! Each property's type decides how its value is written:
//!
//! | type | output |
//! |---|---|
//! | text | `name: "value"` |
//! | multitext | `name:` then one `  - "item"` line per item |
//! | number | `name: 123.5` |
//! | checkbox | `name: true` |
//! | date, datetime | `name: 2024-01-01` |
//!
//! Empty values leave nothing after the colon. Types come from a
//! [`TypeRegistry`]; unknown names are text.
//!
//! ```
//! use clipmark::frontmatter::{Property, PropertyType, serialize};
//!
//! let props = vec![
//!     Property::new("title", "Hello"),
//!     Property::new("tags", "a, b"),
//! ];
//! let header = serialize(&props, |name| match name {
//!     "tags" => PropertyType::Multitext,
//!     _ => PropertyType::Text,
//! });
//! assert_eq!(header, "---\ntitle: \"Hello\"\ntags:\n  - \"a\"\n  - \"b\"\n---\n");
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::markdown::escape_double_quotes;

/// How a property value is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    Text,
    Multitext,
    Number,
    Checkbox,
    Date,
    Datetime,
}

impl std::str::FromStr for PropertyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "multitext" => Ok(Self::Multitext),
            "number" => Ok(Self::Number),
            "checkbox" => Ok(Self::Checkbox),
            "date" => Ok(Self::Date),
            "datetime" => Ok(Self::Datetime),
            other => Err(Error::InvalidProperty(format!("unknown property type `{other}`"))),
        }
    }
}

/// A raw property value. Checkboxes may carry a real boolean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Text(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Bool(true) => "true",
            Self::Bool(false) => "false",
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A named note property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub value: PropertyValue,
}

impl Property {
    /// A property whose id is its name.
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            value: value.into(),
        }
    }

    /// Parse a `name=value` pair.
    pub fn parse_pair(pair: &str) -> Result<Self> {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| Error::InvalidProperty(format!("expected NAME=VALUE, got `{pair}`")))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidProperty(format!("empty name in `{pair}`")));
        }
        Ok(Self::new(name, value))
    }
}

/// Property name to type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeRegistry {
    types: HashMap<String, PropertyType>,
}

#[derive(Deserialize)]
struct TypeEntry {
    name: String,
    #[serde(rename = "type")]
    kind: PropertyType,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RegistryFile {
    Settings {
        #[serde(rename = "propertyTypes")]
        property_types: Vec<TypeEntry>,
    },
    Map(HashMap<String, PropertyType>),
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse either `{"tags": "multitext"}` or
    /// `{"propertyTypes": [{"name": "tags", "type": "multitext"}]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let types = match serde_json::from_str::<RegistryFile>(json)? {
            RegistryFile::Settings { property_types } => property_types
                .into_iter()
                .map(|entry| (entry.name, entry.kind))
                .collect(),
            RegistryFile::Map(types) => types,
        };
        Ok(Self { types })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn insert(&mut self, name: impl Into<String>, kind: PropertyType) -> &mut Self {
        self.types.insert(name.into(), kind);
        self
    }

    /// The registered type, or [`PropertyType::Text`].
    pub fn type_of(&self, name: &str) -> PropertyType {
        self.types.get(name).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Properties with their types resolved, ready to serialize.
#[derive(Debug, Clone, Default)]
pub struct FrontmatterDocument {
    entries: Vec<(Property, PropertyType)>,
}

impl FrontmatterDocument {
    pub fn new(properties: &[Property], type_of: impl Fn(&str) -> PropertyType) -> Self {
        let entries = properties
            .iter()
            .map(|p| (p.clone(), type_of(&p.name)))
            .collect();
        Self { entries }
    }

    pub fn with_registry(properties: &[Property], registry: &TypeRegistry) -> Self {
        Self::new(properties, |name| registry.type_of(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The header block, or `""` when there is nothing to write.
    pub fn serialize(&self) -> String {
        let mut out = String::from("---\n");
        for (property, kind) in &self.entries {
            out.push_str(&property.name);
            out.push(':');
            write_value(&mut out, &property.value, *kind);
        }
        out.push_str("---\n");

        if out.trim() == "---\n---" {
            String::new()
        } else {
            out
        }
    }
}

/// Serialize `properties` with types from `type_of`.
pub fn serialize(properties: &[Property], type_of: impl Fn(&str) -> PropertyType) -> String {
    FrontmatterDocument::new(properties, type_of).serialize()
}

fn write_value(out: &mut String, value: &PropertyValue, kind: PropertyType) {
    let raw = value.as_str();
    match kind {
        PropertyType::Multitext => {
            out.push('\n');
            for item in multitext_items(raw) {
                out.push_str(&format!("  - \"{}\"\n", escape_double_quotes(&item)));
            }
        }
        PropertyType::Number => {
            let digits: String = raw
                .chars()
                .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
                .collect();
            match parse_float_prefix(&digits) {
                Some(number) => {
                    out.push_str(&format!(" {number}\n"));
                }
                None => out.push('\n'),
            }
        }
        PropertyType::Checkbox => {
            let checked = match value {
                PropertyValue::Bool(b) => *b,
                PropertyValue::Text(text) => text == "true",
            };
            out.push_str(&format!(" {checked}\n"));
        }
        PropertyType::Date | PropertyType::Datetime => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!(" {trimmed}\n"));
            }
        }
        PropertyType::Text => {
            if raw.trim().is_empty() {
                out.push('\n');
            } else {
                out.push_str(&format!(" \"{}\"\n", escape_double_quotes(raw)));
            }
        }
    }
}

/// Items of a multitext value: a JSON array, or comma-separated text where
/// commas inside `[[wikilinks]]` do not split.
pub fn multitext_items(raw: &str) -> Vec<String> {
    let items = match serde_json::from_str::<Vec<serde_json::Value>>(raw) {
        Ok(values) => values
            .into_iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Err(_) => split_outside_wikilinks(raw)
            .into_iter()
            .map(|s| s.trim().to_string())
            .collect::<Vec<_>>(),
    };
    items.into_iter().filter(|item| !item.is_empty()).collect()
}

/// A comma splits unless `]]` follows it with no `[` in between.
fn split_outside_wikilinks(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for (i, c) in raw.char_indices() {
        if c != ',' {
            continue;
        }
        let rest = &raw[i + 1..];
        let window = &rest[..rest.find('[').unwrap_or(rest.len())];
        if window.contains("]]") {
            continue;
        }
        parts.push(&raw[start..i]);
        start = i + 1;
    }
    parts.push(&raw[start..]);
    parts
}

/// Longest numeric prefix of `-?digits(.digits)?`, like `parseFloat`.
/// `None` when it holds no digit.
fn parse_float_prefix(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut pos = 0;
    let negative = bytes.first() == Some(&b'-');
    if negative {
        pos += 1;
    }
    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_part = &text[int_start..pos];

    let mut frac_part = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_part = &text[frac_start..end];
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let normalized = format!(
        "{}.{}",
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part }
    );
    let value: f64 = normalized.parse().ok()?;
    // No negative zero in output.
    Some(if negative && value != 0.0 { -value } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(name: &str, value: &str, kind: PropertyType) -> String {
        serialize(&[Property::new(name, value)], |_| kind)
    }

    #[test]
    fn test_text_escaped() {
        assert_eq!(
            one("title", "Say \"hi\"", PropertyType::Text),
            "---\ntitle: \"Say \\\"hi\\\"\"\n---\n"
        );
        assert_eq!(one("title", "  ", PropertyType::Text), "---\ntitle:\n---\n");
    }

    #[test]
    fn test_multitext_comma_split() {
        assert_eq!(
            one("tags", "a, b,,c", PropertyType::Multitext),
            "---\ntags:\n  - \"a\"\n  - \"b\"\n  - \"c\"\n---\n"
        );
    }

    #[test]
    fn test_multitext_keeps_wikilink_commas() {
        assert_eq!(
            multitext_items("[[Smith, John]], [[Doe, Jane]], plain"),
            vec!["[[Smith, John]]", "[[Doe, Jane]]", "plain"]
        );
    }

    #[test]
    fn test_multitext_json_array() {
        assert_eq!(multitext_items(r#"["x, y", "", "z"]"#), vec!["x, y", "z"]);
        assert_eq!(multitext_items("42"), vec!["42"]);
    }

    #[test]
    fn test_multitext_empty() {
        assert_eq!(one("tags", "[]", PropertyType::Multitext), "---\ntags:\n---\n");
    }

    #[test]
    fn test_number() {
        assert_eq!(one("count", "123.5", PropertyType::Number), "---\ncount: 123.5\n---\n");
        assert_eq!(one("count", "about 1,200 words", PropertyType::Number), "---\ncount: 1200\n---\n");
        assert_eq!(one("count", "1.2.3", PropertyType::Number), "---\ncount: 1.2\n---\n");
        assert_eq!(one("count", "-5", PropertyType::Number), "---\ncount: -5\n---\n");
        assert_eq!(one("count", "n/a", PropertyType::Number), "---\ncount:\n---\n");
        assert_eq!(one("count", "-", PropertyType::Number), "---\ncount:\n---\n");
    }

    #[test]
    fn test_checkbox() {
        assert_eq!(one("done", "true", PropertyType::Checkbox), "---\ndone: true\n---\n");
        assert_eq!(one("done", "yes", PropertyType::Checkbox), "---\ndone: false\n---\n");
        let props = [Property::new("done", true)];
        assert_eq!(serialize(&props, |_| PropertyType::Checkbox), "---\ndone: true\n---\n");
    }

    #[test]
    fn test_dates() {
        assert_eq!(one("created", " 2024-05-01 ", PropertyType::Date), "---\ncreated: 2024-05-01\n---\n");
        assert_eq!(one("created", "", PropertyType::Datetime), "---\ncreated:\n---\n");
    }

    #[test]
    fn test_no_properties_is_empty() {
        assert_eq!(serialize(&[], |_| PropertyType::Text), "");
    }

    #[test]
    fn test_registry_shapes() {
        let plain = TypeRegistry::from_json(r#"{"tags": "multitext", "count": "number"}"#).unwrap();
        assert_eq!(plain.type_of("tags"), PropertyType::Multitext);
        assert_eq!(plain.type_of("count"), PropertyType::Number);
        assert_eq!(plain.type_of("title"), PropertyType::Text);

        let settings = TypeRegistry::from_json(
            r#"{"propertyTypes": [{"name": "published", "type": "date"}]}"#,
        )
        .unwrap();
        assert_eq!(settings.type_of("published"), PropertyType::Date);
        assert_eq!(settings.len(), 1);
    }

    #[test]
    fn test_registry_rejects_unknown_type() {
        assert!(matches!(
            TypeRegistry::from_json(r#"{"tags": "colour"}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_parse_pair() {
        let p = Property::parse_pair("url=https://e.com/?a=b").unwrap();
        assert_eq!(p.name, "url");
        assert_eq!(p.value.as_str(), "https://e.com/?a=b");
        assert!(Property::parse_pair("novalue").is_err());
        assert!(Property::parse_pair("=x").is_err());
    }

    #[test]
    fn test_property_type_from_str() {
        assert_eq!("MultiText".parse::<PropertyType>().unwrap(), PropertyType::Multitext);
        assert!("colour".parse::<PropertyType>().is_err());
    }
}
