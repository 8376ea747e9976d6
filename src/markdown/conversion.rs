//! Per-call conversion state and the post-order walk.

use crate::dom::predicates::{REMOVED_TAGS, in_code, in_preformatted, is_block};
use crate::dom::{NodeId, NodeKind, NodeRef};
use crate::error::{Error, Result};
use crate::rules::{RuleError, RuleSet, default_replacement};

use super::escape::{collapse_whitespace, escape_markdown};
use super::footnotes::FootnoteContext;

/// Deepest nesting the walk follows before giving up on the document.
pub const MAX_DEPTH: usize = 256;

/// State for converting one document.
///
/// Rules receive it mutably so they can convert subtrees themselves and
/// record footnote definitions.
pub struct Conversion<'r> {
    rules: &'r RuleSet,
    footnotes: FootnoteContext,
    skipped: Vec<NodeId>,
    depth: usize,
}

impl<'r> Conversion<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        Self {
            rules,
            footnotes: FootnoteContext::new(),
            skipped: Vec::new(),
            depth: 0,
        }
    }

    pub fn footnotes(&self) -> &FootnoteContext {
        &self.footnotes
    }

    pub fn footnotes_mut(&mut self) -> &mut FootnoteContext {
        &mut self.footnotes
    }

    pub fn into_footnotes(self) -> FootnoteContext {
        self.footnotes
    }

    /// Convert a node: its children first, then the node itself.
    pub fn convert(&mut self, node: NodeRef<'_>) -> Result<String> {
        if !node.exists() {
            return Err(Error::DanglingNode(node.id().0));
        }
        if self.depth >= MAX_DEPTH {
            return Err(Error::DepthExceeded { limit: MAX_DEPTH });
        }
        if self.skipped.contains(&node.id()) {
            return Ok(String::new());
        }

        self.depth += 1;
        let result = self.dispatch(node);
        self.depth -= 1;
        result
    }

    /// Convert and join the children of a node.
    pub fn convert_children(&mut self, node: NodeRef<'_>) -> Result<String> {
        let mut output = String::new();
        for child in node.children() {
            let converted = self.convert(child)?;
            join(&mut output, &converted);
        }
        Ok(output)
    }

    /// Like [`convert_children`](Self::convert_children), but the nodes in
    /// `skip` (at any depth) render as nothing.
    pub fn convert_children_without(
        &mut self,
        node: NodeRef<'_>,
        skip: &[NodeId],
    ) -> Result<String> {
        let mark = self.skipped.len();
        self.skipped.extend_from_slice(skip);
        let result = self.convert_children(node);
        self.skipped.truncate(mark);
        result
    }

    fn dispatch(&mut self, node: NodeRef<'_>) -> Result<String> {
        match node.kind() {
            Some(NodeKind::Element) => {}
            Some(NodeKind::Text) => return Ok(convert_text(node)),
            Some(NodeKind::Document) => {
                return match node.dom().body() {
                    Some(body) => self.convert(NodeRef::new(node.dom(), body)),
                    None => self.convert_children(node),
                };
            }
            _ => return Ok(String::new()),
        }

        if node.is_any(REMOVED_TAGS) {
            return Ok(String::new());
        }

        let rules = self.rules;
        let Some(rule) = rules.find(node) else {
            let content = self.convert_children(node)?;
            return Ok(default_replacement(node, &content));
        };

        let content = if rule.needs_content() {
            Some(self.convert_children(node)?)
        } else {
            None
        };

        match rule.replace(self, node, content.as_deref().unwrap_or("")) {
            Ok(output) => Ok(output),
            Err(RuleError::Document(err)) => Err(err),
            Err(err) => {
                log::debug!(
                    "rule {} fell back to default for <{}>: {err}",
                    rule.name(),
                    node.tag().unwrap_or_default()
                );
                let content = match content {
                    Some(content) => content,
                    None => self.convert_children(node)?,
                };
                Ok(default_replacement(node, &content))
            }
        }
    }
}

/// Append `replacement` to `output`, merging the newlines where they meet.
///
/// Trailing newlines of `output` and leading newlines of `replacement` become
/// a single separator of at most two newlines.
pub fn join(output: &mut String, replacement: &str) {
    let kept = output.trim_end_matches('\n').len();
    let trailing = output.len() - kept;
    let right = replacement.trim_start_matches('\n');
    let leading = replacement.len() - right.len();

    output.truncate(kept);
    output.extend(std::iter::repeat_n('\n', trailing.max(leading).min(2)));
    output.push_str(right);
}

fn convert_text(node: NodeRef<'_>) -> String {
    let raw = node.text().unwrap_or_default().replace('\0', "");
    if in_preformatted(&node) {
        return raw;
    }

    let mut text = collapse_whitespace(&raw);
    if at_block_edge(node.prev_sibling(), node.parent()) {
        text = text.trim_start_matches(' ').to_string();
    }
    if at_block_edge(node.next_sibling(), node.parent()) {
        text.truncate(text.trim_end_matches(' ').len());
    }

    if text.is_empty() || in_code(&node) {
        text
    } else {
        escape_markdown(&text)
    }
}

/// Whether whitespace next to `sibling` is insignificant: the sibling is a
/// block or a line break, or there is no sibling and the parent is a block.
fn at_block_edge(sibling: Option<NodeRef<'_>>, parent: Option<NodeRef<'_>>) -> bool {
    match sibling {
        Some(s) => s.is_element() && (is_block(&s) || s.is("br")),
        None => parent.is_none_or(|p| !p.is_element() || is_block(&p)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Dom, parse_html};

    #[test]
    fn test_join_merges_newlines() {
        let mut out = String::from("a\n");
        join(&mut out, "\n\n\nb");
        assert_eq!(out, "a\n\nb");

        let mut out = String::from("a");
        join(&mut out, "b");
        assert_eq!(out, "ab");

        let mut out = String::new();
        join(&mut out, "\n\nx\n\n");
        assert_eq!(out, "\n\nx\n\n");
    }

    #[test]
    fn test_text_whitespace_at_block_edges() {
        let dom = parse_html("<p>  Hello   <em>there</em>  </p>");
        let rules = RuleSet::new();
        let mut conv = Conversion::new(&rules);
        let p = NodeRef::document(&dom).find_tag("p").unwrap();
        assert_eq!(conv.convert_children(p).unwrap(), "Hello there");
    }

    #[test]
    fn test_text_escaped_outside_code() {
        let dom = parse_html("<p>a_b <code>c_d</code></p>");
        let rules = RuleSet::new();
        let mut conv = Conversion::new(&rules);
        let p = NodeRef::document(&dom).find_tag("p").unwrap();
        assert_eq!(conv.convert_children(p).unwrap(), "a\\_b c_d");
    }

    #[test]
    fn test_depth_limit() {
        let mut dom = Dom::new();
        let mut parent = dom.document();
        for _ in 0..300 {
            parent = dom.element(parent, "span", &[]);
        }
        dom.text(parent, "deep");

        let rules = RuleSet::new();
        let mut conv = Conversion::new(&rules);
        let err = conv.convert(NodeRef::document(&dom)).unwrap_err();
        assert!(matches!(err, Error::DepthExceeded { limit: MAX_DEPTH }));
    }

    #[test]
    fn test_dangling_node() {
        let dom = Dom::new();
        let rules = RuleSet::new();
        let mut conv = Conversion::new(&rules);
        let err = conv.convert(NodeRef::new(&dom, NodeId(42))).unwrap_err();
        assert!(matches!(err, Error::DanglingNode(42)));
    }

    #[test]
    fn test_skipped_nodes_render_empty() {
        let dom = parse_html("<div><p>keep</p><p><span id=\"x\">drop</span> tail</p></div>");
        let root = NodeRef::document(&dom);
        let div = root.find_tag("div").unwrap();
        let span = root.find_tag("span").unwrap();

        let rules = RuleSet::new();
        let mut conv = Conversion::new(&rules);
        let out = conv.convert_children_without(div, &[span.id()]).unwrap();
        assert_eq!(out, "\n\nkeep\n\ntail\n\n");
        // The skip list is scoped to the call.
        assert!(conv.convert_children(div).unwrap().contains("drop"));
    }
}
