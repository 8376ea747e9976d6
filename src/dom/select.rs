//! CSS selector matching over [`NodeRef`].
//!
//! Rules use this for the few predicates that read better as a selector
//! (`.katex-mathml annotation[encoding="application/x-tex"]`) than as
//! hand-written navigation.

use std::fmt;

use html5ever::{LocalName, Namespace};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::context::{MatchingContext, SelectorCaches};
use selectors::matching::{
    ElementSelectorFlags, MatchingForInvalidation, MatchingMode, NeedsSelectorFlags,
};
use selectors::parser::{ParseRelative, SelectorList, SelectorParseErrorKind};
use selectors::{OpaqueElement, SelectorImpl};

use super::arena::NodeData;
use super::node::NodeRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipSelectors;

#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct IdentStr(pub String);

impl precomputed_hash::PrecomputedHash for IdentStr {
    fn precomputed_hash(&self) -> u32 {
        self.0
            .bytes()
            .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(b as u32))
    }
}

impl AsRef<str> for IdentStr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IdentStr {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl cssparser::ToCss for IdentStr {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CssLocalName(pub LocalName);

impl precomputed_hash::PrecomputedHash for CssLocalName {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl cssparser::ToCss for CssLocalName {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(self.0.as_ref())
    }
}

impl From<&str> for CssLocalName {
    fn from(s: &str) -> Self {
        Self(LocalName::from(s))
    }
}

impl AsRef<str> for CssLocalName {
    fn as_ref(&self) -> &str {
        self.0.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct CssNamespace(pub Namespace);

impl precomputed_hash::PrecomputedHash for CssNamespace {
    fn precomputed_hash(&self) -> u32 {
        self.0.precomputed_hash()
    }
}

impl cssparser::ToCss for CssNamespace {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(self.0.as_ref())
    }
}

impl From<&str> for CssNamespace {
    fn from(s: &str) -> Self {
        Self(Namespace::from(s))
    }
}

impl<'i> selectors::parser::Parser<'i> for ClipSelectors {
    type Impl = ClipSelectors;
    type Error = SelectorParseErrorKind<'i>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PseudoElement {}

impl cssparser::ToCss for PseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = ClipSelectors;

    fn accepts_state_pseudo_classes(&self) -> bool {
        false
    }

    fn valid_after_slotted(&self) -> bool {
        false
    }
}

/// No dynamic state exists in a clipped page, so no pseudo-class matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NonTSPseudoClass {}

impl selectors::parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = ClipSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl cssparser::ToCss for NonTSPseudoClass {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl SelectorImpl for ClipSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = IdentStr;
    type Identifier = IdentStr;
    type LocalName = CssLocalName;
    type NamespaceUrl = CssNamespace;
    type NamespacePrefix = IdentStr;
    type BorrowedLocalName = CssLocalName;
    type BorrowedNamespaceUrl = CssNamespace;
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone)]
pub struct Selector {
    list: SelectorList<ClipSelectors>,
}

impl Selector {
    /// Parse a selector list. Returns `None` for invalid CSS.
    pub fn parse(css: &str) -> Option<Self> {
        let mut input = cssparser::ParserInput::new(css);
        let mut parser = cssparser::Parser::new(&mut input);
        SelectorList::parse(&ClipSelectors, &mut parser, ParseRelative::No)
            .ok()
            .map(|list| Self { list })
    }

    /// Whether `node` is an element matched by any selector of the list.
    pub fn matches(&self, node: &NodeRef<'_>) -> bool {
        if !node.is_element() {
            return false;
        }
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            MatchingMode::Normal,
            None,
            &mut caches,
            selectors::context::QuirksMode::NoQuirks,
            NeedsSelectorFlags::No,
            MatchingForInvalidation::No,
        );
        self.list.slice().iter().any(|selector| {
            selectors::matching::matches_selector(selector, 0, None, node, &mut context)
        })
    }
}

impl<'a> NodeRef<'a> {
    /// First descendant element matching `selector`.
    pub fn select_first(&self, selector: &Selector) -> Option<NodeRef<'a>> {
        self.descendants().find(|n| selector.matches(n))
    }

    /// Every descendant element matching `selector`, in document order.
    pub fn select_all(&self, selector: &Selector) -> Vec<NodeRef<'a>> {
        self.descendants().filter(|n| selector.matches(n)).collect()
    }
}

impl selectors::Element for NodeRef<'_> {
    type Impl = ClipSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self)
    }

    fn parent_element(&self) -> Option<Self> {
        NodeRef::parent_element(self)
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.prev_element_sibling()
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.next_element_sibling()
    }

    fn first_element_child(&self) -> Option<Self> {
        self.element_children().next()
    }

    fn is_html_element_in_html_document(&self) -> bool {
        matches!(
            self.dom().get(self.id()).map(|n| &n.data),
            Some(NodeData::Element { name, .. }) if name.ns == html5ever::ns!(html)
        )
    }

    fn has_local_name(&self, name: &CssLocalName) -> bool {
        self.tag()
            .is_some_and(|t| t.eq_ignore_ascii_case(name.0.as_ref()))
    }

    fn has_namespace(&self, ns: &CssNamespace) -> bool {
        matches!(
            self.dom().get(self.id()).map(|n| &n.data),
            Some(NodeData::Element { name, .. }) if name.ns == ns.0
        )
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }

    fn attr_matches(
        &self,
        ns: &NamespaceConstraint<&CssNamespace>,
        local_name: &CssLocalName,
        operation: &AttrSelectorOperation<&IdentStr>,
    ) -> bool {
        self.attrs().iter().any(|attr| {
            let ns_match = match ns {
                NamespaceConstraint::Any => true,
                NamespaceConstraint::Specific(ns) => attr.name.ns == ns.0,
            };
            ns_match
                && attr
                    .name
                    .local
                    .as_ref()
                    .eq_ignore_ascii_case(local_name.0.as_ref())
                && operation.eval_str(&attr.value)
        })
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pe {}
    }

    fn is_link(&self) -> bool {
        self.is("a") && self.has_attr("href")
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &IdentStr, case_sensitivity: CaseSensitivity) -> bool {
        self.element_id()
            .is_some_and(|own| case_sensitivity.eq(own.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &IdentStr, case_sensitivity: CaseSensitivity) -> bool {
        self.classes()
            .iter()
            .any(|c| case_sensitivity.eq(c.as_bytes(), name.0.as_bytes()))
    }

    fn imported_part(&self, _name: &IdentStr) -> Option<IdentStr> {
        None
    }

    fn is_part(&self, _name: &IdentStr) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.children().all(|child| match child.text() {
            Some(t) => t.trim().is_empty(),
            None => !child.is_element(),
        })
    }

    fn is_root(&self) -> bool {
        self.parent()
            .is_some_and(|p| p.kind() == Some(super::node::NodeKind::Document))
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn add_element_unique_hashes(&self, _filter: &mut selectors::bloom::BloomFilter) -> bool {
        false
    }

    fn has_custom_state(&self, _name: &IdentStr) -> bool {
        false
    }
}
