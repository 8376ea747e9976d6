//! Arena-backed document tree.
//!
//! html5ever parses into this tree through [`DomSink`](super::DomSink), and
//! callers with their own parser can build one directly with
//! [`Dom::element`] and [`Dom::text`]. Nodes live in one contiguous vector and
//! link to each other by index, so handing out read-only [`NodeRef`]s to the
//! rules is free.
//!
//! [`NodeRef`]: super::NodeRef

use html5ever::{LocalName, QualName, ns};

/// Index of a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel for "no node".
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Payload of a node.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
        /// Lower-cased local name, cached for rule predicates.
        tag: String,
        /// Whitespace-separated `class` tokens.
        classes: Vec<String>,
    },
    Text(String),
    Comment(String),
    Doctype(String),
}

/// An element attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// Attribute name as written in markup (`xlink:href`, `epub:type`, ...).
    pub fn qualified_name(&self) -> String {
        match &self.name.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name.local),
            None => self.name.local.to_string(),
        }
    }
}

/// A node with its tree links.
#[derive(Debug)]
pub struct DomNode {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl DomNode {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// The document tree.
pub struct Dom {
    nodes: Vec<DomNode>,
    document: NodeId,
}

impl Dom {
    /// Create an empty tree holding only the document node.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        dom.document = dom.alloc(DomNode::new(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: DomNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    pub fn get(&self, id: NodeId) -> Option<&DomNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut DomNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Number of nodes, the document node included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds nothing but the document node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        let classes = attrs
            .iter()
            .find(|a| a.name.local.as_ref() == "class")
            .map(|a| a.value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        let tag = name.local.as_ref().to_ascii_lowercase();

        self.alloc(DomNode::new(NodeData::Element {
            name,
            attrs,
            tag,
            classes,
        }))
    }

    pub fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(DomNode::new(NodeData::Text(text)))
    }

    pub fn create_comment(&mut self, text: String) -> NodeId {
        self.alloc(DomNode::new(NodeData::Comment(text)))
    }

    pub fn create_doctype(&mut self, name: String) -> NodeId {
        self.alloc(DomNode::new(NodeData::Doctype(name)))
    }

    /// Append `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = NodeId::NONE;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert `new_node` immediately before `sibling`.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Append text to `parent`, merging into a trailing text node.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(existing) = &mut last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Unlink a node from its parent and siblings.
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Iterate over the children of a node.
    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        Children {
            dom: self,
            current: first,
        }
    }

    /// First element with the given tag, in document order.
    pub fn find_by_tag(&self, tag: &str) -> Option<NodeId> {
        let mut stack = vec![self.document];
        while let Some(id) = stack.pop() {
            if self.tag(id).is_some_and(|t| t.eq_ignore_ascii_case(tag)) {
                return Some(id);
            }
            let mut children: Vec<_> = self.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        None
    }

    /// The `<body>` element, if the document has one.
    pub fn body(&self) -> Option<NodeId> {
        let html = self
            .children(self.document)
            .find(|&c| self.tag(c) == Some("html"))?;
        self.children(html).find(|&c| self.tag(c) == Some("body"))
    }

    /// Lower-cased tag name of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { tag, .. } => Some(tag.as_str()),
            _ => None,
        })
    }

    pub fn get_attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref().eq_ignore_ascii_case(attr_name))
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }
}

/// Tree-building helpers for callers that bring their own parser.
impl Dom {
    /// Create an HTML element under `parent`.
    ///
    /// ```
    /// use clipmark::dom::Dom;
    ///
    /// let mut dom = Dom::new();
    /// let p = dom.element(dom.document(), "p", &[("class", "lead")]);
    /// dom.text(p, "Hello");
    /// assert_eq!(dom.tag(p), Some("p"));
    /// ```
    pub fn element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let attrs = attrs
            .iter()
            .map(|(name, value)| Attribute {
                name: QualName::new(None, ns!(), LocalName::from(*name)),
                value: value.to_string(),
            })
            .collect();
        let name = QualName::new(None, ns!(html), LocalName::from(tag));
        let id = self.create_element(name, attrs);
        self.append(parent, id);
        id
    }

    /// Append a text leaf under `parent`.
    pub fn text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = self.create_text(text.to_string());
        self.append(parent, id);
        id
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the children of a node.
pub struct Children<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}
