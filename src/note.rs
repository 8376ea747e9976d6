//! Note assembly: frontmatter header followed by the Markdown body.

use crate::frontmatter::{FrontmatterDocument, Property, TypeRegistry};
use crate::markdown::html_to_markdown;

/// A clipped page, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub header: String,
    pub body: String,
}

impl Note {
    /// Convert `html` and serialize `properties`. The source URL is taken
    /// from the `url` property.
    pub fn clip(html: &str, properties: &[Property], registry: &TypeRegistry) -> Self {
        let url = properties
            .iter()
            .find(|p| p.name == "url")
            .map(|p| p.value.as_str())
            .unwrap_or_default();

        let body = html_to_markdown(html, url);
        let header = FrontmatterDocument::with_registry(properties, registry).serialize();
        log::debug!("clipped note: {} header bytes, {} body bytes", header.len(), body.len());

        Self { header, body }
    }

    /// The exact file contents.
    pub fn content(&self) -> String {
        format!("{}{}", self.header, self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontmatter::PropertyType;

    #[test]
    fn test_clip_with_header() {
        let mut registry = TypeRegistry::new();
        registry.insert("tags", PropertyType::Multitext);
        let props = vec![
            Property::new("url", "https://example.com/post"),
            Property::new("tags", "web, clip"),
        ];
        let note = Note::clip("<h1>Post</h1><p>Body text</p>", &props, &registry);
        assert_eq!(
            note.content(),
            "---\nurl: \"https://example.com/post\"\ntags:\n  - \"web\"\n  - \"clip\"\n---\nBody text"
        );
    }

    #[test]
    fn test_clip_without_properties() {
        let note = Note::clip("<p>Only body</p>", &[], &TypeRegistry::new());
        assert_eq!(note.header, "");
        assert_eq!(note.content(), "Only body");
    }
}
