//! Read-only node handles.
//!
//! A [`NodeRef`] pairs a tree with a node index. It is `Copy`, so rules pass
//! it around freely, and it exposes exactly what the rules need: tag,
//! attributes, classes, text, and navigation in every direction.

use std::fmt;

use super::arena::{Attribute, Dom, NodeData, NodeId};

/// Kind of node behind a [`NodeRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element,
    Text,
    Comment,
    Doctype,
}

/// Borrowed handle to one node of a [`Dom`].
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    dom: &'a Dom,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn new(dom: &'a Dom, id: NodeId) -> Self {
        Self { dom, id }
    }

    /// Handle to the document node of `dom`.
    pub fn document(dom: &'a Dom) -> Self {
        Self::new(dom, dom.document())
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn dom(&self) -> &'a Dom {
        self.dom
    }

    /// Whether the handle points at a node that exists.
    pub fn exists(&self) -> bool {
        self.dom.get(self.id).is_some()
    }

    fn data(&self) -> Option<&'a NodeData> {
        self.dom.get(self.id).map(|n| &n.data)
    }

    fn wrap(&self, id: NodeId) -> Option<Self> {
        id.is_some().then(|| Self::new(self.dom, id))
    }

    pub fn kind(&self) -> Option<NodeKind> {
        self.data().map(|d| match d {
            NodeData::Document => NodeKind::Document,
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            NodeData::Comment(_) => NodeKind::Comment,
            NodeData::Doctype(_) => NodeKind::Doctype,
        })
    }

    pub fn is_element(&self) -> bool {
        self.kind() == Some(NodeKind::Element)
    }

    pub fn is_text(&self) -> bool {
        self.kind() == Some(NodeKind::Text)
    }

    /// Lower-cased tag name, for elements.
    pub fn tag(&self) -> Option<&'a str> {
        match self.data()? {
            NodeData::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }

    /// Whether this is an element with the given tag (case-insensitive).
    pub fn is(&self, tag: &str) -> bool {
        self.tag().is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn is_any(&self, tags: &[&str]) -> bool {
        self.tag()
            .is_some_and(|t| tags.iter().any(|want| t.eq_ignore_ascii_case(want)))
    }

    pub fn attrs(&self) -> &'a [Attribute] {
        match self.data() {
            Some(NodeData::Element { attrs, .. }) => attrs,
            _ => &[],
        }
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.attrs()
            .iter()
            .find(|a| a.qualified_name().eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// The `id` attribute.
    pub fn element_id(&self) -> Option<&'a str> {
        self.attr("id")
    }

    pub fn classes(&self) -> &'a [String] {
        match self.data() {
            Some(NodeData::Element { classes, .. }) => classes,
            _ => &[],
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| c == class)
    }

    /// Text payload of a text leaf.
    pub fn text(&self) -> Option<&'a str> {
        match self.data()? {
            NodeData::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Concatenated text of every descendant text leaf (DOM `textContent`).
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        if let Some(text) = self.text() {
            out.push_str(text);
        }
        for node in self.descendants() {
            if let Some(text) = node.text() {
                out.push_str(text);
            }
        }
        out
    }

    pub fn parent(&self) -> Option<Self> {
        self.wrap(self.dom.get(self.id)?.parent)
    }

    pub fn parent_element(&self) -> Option<Self> {
        self.parent().filter(NodeRef::is_element)
    }

    pub fn prev_sibling(&self) -> Option<Self> {
        self.wrap(self.dom.get(self.id)?.prev_sibling)
    }

    pub fn next_sibling(&self) -> Option<Self> {
        self.wrap(self.dom.get(self.id)?.next_sibling)
    }

    pub fn prev_element_sibling(&self) -> Option<Self> {
        let mut current = self.prev_sibling();
        while let Some(node) = current {
            if node.is_element() {
                return Some(node);
            }
            current = node.prev_sibling();
        }
        None
    }

    pub fn next_element_sibling(&self) -> Option<Self> {
        let mut current = self.next_sibling();
        while let Some(node) = current {
            if node.is_element() {
                return Some(node);
            }
            current = node.next_sibling();
        }
        None
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let dom = self.dom;
        dom.children(self.id).map(move |id| NodeRef::new(dom, id))
    }

    pub fn element_children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        self.children().filter(NodeRef::is_element)
    }

    /// Element ancestors, nearest first. Excludes the node itself.
    pub fn ancestors(&self) -> Ancestors<'a> {
        Ancestors {
            next: self.parent_element(),
        }
    }

    /// Nearest inclusive ancestor satisfying `pred` (DOM `closest`).
    pub fn closest(&self, pred: impl Fn(&NodeRef<'a>) -> bool) -> Option<Self> {
        if self.is_element() && pred(self) {
            return Some(*self);
        }
        self.ancestors().find(|n| pred(n))
    }

    /// Descendants in document order. Excludes the node itself.
    pub fn descendants(&self) -> Descendants<'a> {
        let mut stack: Vec<NodeId> = self.dom.children(self.id).collect();
        stack.reverse();
        Descendants {
            dom: self.dom,
            stack,
        }
    }

    /// Levels of nesting below the node, 0 for a leaf.
    pub fn height(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.id, 0)];
        while let Some((id, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(self.dom.children(id).map(|child| (child, level + 1)));
        }
        deepest
    }

    /// First descendant element satisfying `pred`.
    pub fn find(&self, pred: impl Fn(&NodeRef<'a>) -> bool) -> Option<Self> {
        self.descendants().find(|n| n.is_element() && pred(n))
    }

    /// First descendant element with the given tag.
    pub fn find_tag(&self, tag: &str) -> Option<Self> {
        self.find(|n| n.is(tag))
    }

    /// Index among the parent's element children.
    pub fn element_index(&self) -> usize {
        self.parent()
            .map(|p| p.element_children().take_while(|c| c.id != self.id).count())
            .unwrap_or(0)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.dom, other.dom) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("tag", &self.tag())
            .finish()
    }
}

/// Iterator returned by [`NodeRef::ancestors`].
pub struct Ancestors<'a> {
    next: Option<NodeRef<'a>>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent_element();
        Some(current)
    }
}

/// Iterator returned by [`NodeRef::descendants`].
pub struct Descendants<'a> {
    dom: &'a Dom,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let mut children: Vec<_> = self.dom.children(id).collect();
        children.reverse();
        self.stack.extend(children);
        Some(NodeRef::new(self.dom, id))
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse_html;
    use super::*;

    #[test]
    fn test_navigation() {
        let dom = parse_html("<div id=\"outer\"><p>One <em>two</em> three</p><p>Four</p></div>");
        let em = NodeRef::new(&dom, dom.find_by_tag("em").unwrap());

        assert_eq!(em.parent_element().and_then(|p| p.tag()), Some("p"));
        assert_eq!(em.prev_sibling().and_then(|s| s.text()), Some("One "));
        assert_eq!(em.next_sibling().and_then(|s| s.text()), Some(" three"));

        let outer = em.closest(|n| n.element_id() == Some("outer")).unwrap();
        assert!(outer.is("div"));
        assert_eq!(outer.text_content(), "One two threeFour");
    }

    #[test]
    fn test_element_index_skips_text() {
        let dom = parse_html("<ol> <li>a</li> <li>b</li> <li>c</li> </ol>");
        let ol = NodeRef::new(&dom, dom.find_by_tag("ol").unwrap());
        let indices: Vec<_> = ol.element_children().map(|li| li.element_index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_height() {
        let dom = parse_html("<div><p>a<em>b</em></p><br></div>");
        let div = NodeRef::new(&dom, dom.find_by_tag("div").unwrap());
        assert_eq!(div.height(), 3);
        let br = NodeRef::new(&dom, dom.find_by_tag("br").unwrap());
        assert_eq!(br.height(), 0);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let dom = parse_html("<ul><li><ol><li id=\"leaf\">x</li></ol></li></ul>");
        let body = dom.body().unwrap();
        let leaf = NodeRef::new(&dom, body)
            .find(|n| n.element_id() == Some("leaf"))
            .unwrap();
        let tags: Vec<_> = leaf.ancestors().filter_map(|a| a.tag()).collect();
        assert_eq!(tags, vec!["ol", "li", "ul", "body", "html"]);
    }
}
