//! HTML serialization of subtrees (DOM `outerHTML`).

use super::arena::NodeData;
use super::node::NodeRef;
use super::predicates::is_void;

/// Serialize a node and its subtree.
pub fn outer_html(node: NodeRef<'_>) -> String {
    let mut out = String::new();
    write_node(&mut out, node, &|_| true);
    out
}

/// Serialize the children of a node (DOM `innerHTML`).
pub fn inner_html(node: NodeRef<'_>) -> String {
    let mut out = String::new();
    for child in node.children() {
        write_node(&mut out, child, &|_| true);
    }
    out
}

/// Serialize a subtree keeping only attributes accepted by `keep`.
///
/// The filter applies to every element of the subtree, not only the root.
pub fn outer_html_filtered(node: NodeRef<'_>, keep: &dyn Fn(&str) -> bool) -> String {
    let mut out = String::new();
    write_node(&mut out, node, keep);
    out
}

/// Pending work for [`write_node`]: a node to open or a tag to close.
enum Step<'a> {
    Open(NodeRef<'a>),
    Close(&'a str),
}

/// Iterative so that arbitrarily deep trees serialize without recursion.
fn write_node(out: &mut String, node: NodeRef<'_>, keep: &dyn Fn(&str) -> bool) {
    let mut stack = vec![Step::Open(node)];

    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Open(node) => node,
            Step::Close(tag) => {
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
                continue;
            }
        };
        let Some(dom_node) = node.dom().get(node.id()) else {
            continue;
        };

        match &dom_node.data {
            NodeData::Document => push_children(&mut stack, node),
            NodeData::Element { name, attrs, .. } => {
                let tag = name.local.as_ref();
                out.push('<');
                out.push_str(tag);
                for attr in attrs {
                    let attr_name = attr.qualified_name();
                    if !keep(&attr_name) {
                        continue;
                    }
                    out.push(' ');
                    out.push_str(&attr_name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(&attr.value));
                    out.push('"');
                }
                out.push('>');

                if !is_void(&node) {
                    stack.push(Step::Close(tag));
                    push_children(&mut stack, node);
                }
            }
            NodeData::Text(text) => out.push_str(&escape_text(text)),
            NodeData::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeData::Doctype(name) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(name);
                out.push('>');
            }
        }
    }
}

fn push_children<'a>(stack: &mut Vec<Step<'a>>, node: NodeRef<'a>) {
    let mark = stack.len();
    stack.extend(node.children().map(Step::Open));
    stack[mark..].reverse();
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('\u{a0}', "&nbsp;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::super::parse_html;
    use super::*;

    #[test]
    fn test_outer_html_roundtrips_markup() {
        let dom = parse_html(r#"<p><iframe src="https://example.com/embed" width="560"></iframe></p>"#);
        let iframe = NodeRef::document(&dom).find_tag("iframe").unwrap();
        assert_eq!(
            outer_html(iframe),
            r#"<iframe src="https://example.com/embed" width="560"></iframe>"#
        );
    }

    #[test]
    fn test_void_and_escaping() {
        let dom = parse_html(r#"<sup title="a&quot;b">1 &lt; 2<br></sup>"#);
        let sup = NodeRef::document(&dom).find_tag("sup").unwrap();
        assert_eq!(outer_html(sup), r#"<sup title="a&quot;b">1 &lt; 2<br></sup>"#);
        assert_eq!(inner_html(sup), "1 &lt; 2<br>");
    }

    #[test]
    fn test_filtered_attributes_apply_recursively() {
        let dom = parse_html(
            r#"<table class="wide" width="100"><tr id="r"><td rowspan="2" data-x="1">a</td></tr></table>"#,
        );
        let table = NodeRef::document(&dom).find_tag("table").unwrap();
        let html = outer_html_filtered(table, &|name| matches!(name, "width" | "rowspan"));
        assert_eq!(
            html,
            r#"<table width="100"><tbody><tr><td rowspan="2">a</td></tr></tbody></table>"#
        );
    }

    #[test]
    fn test_deep_tree_serializes() {
        let depth = 50_000;
        let html = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let dom = parse_html(&html);
        let outer = NodeRef::document(&dom).find_tag("div").unwrap();
        let serialized = outer_html(outer);
        assert_eq!(serialized, html);
    }
}
