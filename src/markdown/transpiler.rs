//! The HTML to Markdown transpiler.

use std::sync::LazyLock;

use crate::dom::{NodeRef, outer_html, parse_html};
use crate::error::Result;
use crate::rules::RuleSet;

use super::conversion::Conversion;
use super::postprocess;

const DIAGNOSTIC_PREFIX: &str = "Partial conversion completed with errors. Original HTML:\n\n";

/// Converts document trees to Markdown with a fixed [`RuleSet`].
///
/// A transpiler holds no per-call state; each call gets a fresh
/// [`Conversion`] with its own footnote context.
#[derive(Debug)]
pub struct Transpiler {
    rules: RuleSet,
}

impl Default for Transpiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Transpiler {
    /// A transpiler with the built-in rule library.
    pub fn new() -> Self {
        Self::with_rules(RuleSet::builtin())
    }

    pub fn with_rules(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Convert `root`, returning document-level failures as errors.
    pub fn try_transpile(&self, root: NodeRef<'_>, url: &str) -> Result<String> {
        log::debug!(
            "converting {} nodes to markdown for {url:?}",
            root.dom().len()
        );
        let mut conv = Conversion::new(&self.rules);
        let markdown = conv.convert(root)?;
        Ok(postprocess::finish(&markdown, conv.footnotes()))
    }

    /// Convert `root` to Markdown.
    ///
    /// Never fails: a document-level failure yields a diagnostic document
    /// embedding the serialized source instead.
    pub fn transpile(&self, root: NodeRef<'_>, url: &str) -> String {
        self.try_transpile(root, url)
            .unwrap_or_else(|err| diagnostic(url, &err, &outer_html(root)))
    }

    /// Parse `html` and convert it. The diagnostic document embeds `html`
    /// exactly as given.
    ///
    /// ```
    /// use clipmark::Transpiler;
    ///
    /// let md = Transpiler::new().transpile_html("<p>Hello <strong>world</strong></p>", "");
    /// assert_eq!(md, "Hello **world**");
    /// ```
    pub fn transpile_html(&self, html: &str, url: &str) -> String {
        let dom = parse_html(html);
        self.try_transpile(NodeRef::document(&dom), url)
            .unwrap_or_else(|err| diagnostic(url, &err, html))
    }
}

fn diagnostic(url: &str, err: &crate::Error, source: &str) -> String {
    log::warn!("partial conversion of {url:?}: {err}");
    format!("{DIAGNOSTIC_PREFIX}{source}")
}

static BUILTIN: LazyLock<Transpiler> = LazyLock::new(Transpiler::new);

/// Convert a tree with the built-in rules.
pub fn transpile(root: NodeRef<'_>, url: &str) -> String {
    BUILTIN.transpile(root, url)
}

/// Parse and convert an HTML string with the built-in rules.
///
/// ```
/// use clipmark::html_to_markdown;
///
/// let md = html_to_markdown("<h1>Title</h1><p>Hello <mark>world</mark></p>", "https://example.com");
/// assert_eq!(md, "Hello ==world==");
/// ```
pub fn html_to_markdown(html: &str, url: &str) -> String {
    BUILTIN.transpile_html(html, url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Dom;

    #[test]
    fn test_deep_tree_yields_diagnostic() {
        let html = format!("{}x{}", "<span>".repeat(300), "</span>".repeat(300));
        let md = html_to_markdown(&html, "");
        assert_eq!(md, format!("{DIAGNOSTIC_PREFIX}{html}"));
    }

    #[test]
    fn test_hand_built_tree() {
        let mut dom = Dom::new();
        let doc = dom.document();
        let p = dom.element(doc, "p", &[]);
        dom.text(p, "Hello ");
        let mark = dom.element(p, "mark", &[]);
        dom.text(mark, "world");

        assert_eq!(transpile(NodeRef::document(&dom), ""), "Hello ==world==");
    }

    #[test]
    fn test_transpiler_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Transpiler>();
    }

    #[test]
    fn test_footnotes_do_not_leak_between_calls() {
        let html = r#"<p>Text<aside role="doc-footnote" id="n1">Note.</aside></p>"#;
        let first = html_to_markdown(html, "");
        let second = html_to_markdown("<p>Plain</p>", "");
        assert!(first.contains("[^n1]: Note."));
        assert_eq!(second, "Plain");
    }
}
