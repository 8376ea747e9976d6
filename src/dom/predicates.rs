//! Shared tag classifications.

use super::NodeRef;

/// Elements rendered as blocks (surrounded by blank lines).
pub const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "audio",
    "blockquote",
    "body",
    "canvas",
    "center",
    "dd",
    "dir",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "frameset",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "html",
    "isindex",
    "li",
    "main",
    "menu",
    "nav",
    "noframes",
    "noscript",
    "ol",
    "output",
    "p",
    "pre",
    "section",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

/// Void elements: never have children, serialized without a closing tag.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Elements emitted as their serialized outer HTML when no rule claims them.
pub const KEPT_TAGS: &[&str] = &["iframe", "video", "audio", "sup", "sub", "svg", "math"];

/// Elements dropped with their whole subtree before any rule runs.
pub const REMOVED_TAGS: &[&str] = &["style", "script", "button"];

/// Tags whose text is taken verbatim rather than escaped.
pub const CODE_TAGS: &[&str] = &["code", "pre", "kbd", "samp"];

pub fn is_block(node: &NodeRef<'_>) -> bool {
    node.is_any(BLOCK_TAGS)
}

pub fn is_void(node: &NodeRef<'_>) -> bool {
    node.is_any(VOID_TAGS)
}

/// Whether the node sits inside (or is) a `pre` element.
pub fn in_preformatted(node: &NodeRef<'_>) -> bool {
    node.is("pre") || node.ancestors().any(|a| a.is("pre"))
}

/// Whether the node sits inside (or is) an element whose text is literal code.
pub fn in_code(node: &NodeRef<'_>) -> bool {
    node.is_any(CODE_TAGS) || node.ancestors().any(|a| a.is_any(CODE_TAGS))
}

/// Number of `ul`/`ol` ancestors.
pub fn list_depth(node: &NodeRef<'_>) -> usize {
    node.ancestors().filter(|a| a.is_any(&["ul", "ol"])).count()
}

#[cfg(test)]
mod tests {
    use super::super::parse_html;
    use super::*;

    #[test]
    fn test_list_depth() {
        let dom = parse_html("<ul><li>a<ol><li id=\"x\">b</li></ol></li></ul>");
        let root = NodeRef::document(&dom);
        let inner = root.find(|n| n.element_id() == Some("x")).unwrap();
        assert_eq!(list_depth(&inner), 2);
        let outer = root.find_tag("li").unwrap();
        assert_eq!(list_depth(&outer), 1);
    }

    #[test]
    fn test_code_context() {
        let dom = parse_html("<pre><code><span>x</span></code></pre><p>y</p>");
        let root = NodeRef::document(&dom);
        let span = root.find_tag("span").unwrap();
        assert!(in_preformatted(&span));
        assert!(in_code(&span));
        assert!(!in_code(&root.find_tag("p").unwrap()));
    }
}
