//! Footnote definitions collected during one conversion.

/// Insertion-ordered map from footnote id to its definition.
///
/// One context lives inside each [`Conversion`](super::Conversion) and is
/// dropped with it, so concurrent conversions never see each other's notes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FootnoteContext {
    entries: Vec<(String, String)>,
}

impl FootnoteContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a definition. The first definition for an id wins; returns
    /// whether this one was stored.
    pub fn insert(&mut self, id: impl Into<String>, definition: impl Into<String>) -> bool {
        let id = id.into();
        if self.contains(&id) {
            return false;
        }
        self.entries.push((id, definition.into()));
        true
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == id)
    }

    pub fn get(&self, id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == id)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `[^id]: definition` entries separated by blank lines.
    pub fn render(&self) -> String {
        self.iter()
            .map(|(id, def)| format!("[^{id}]: {def}"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
