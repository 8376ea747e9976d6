//! Rule dispatch.
//!
//! A [`Rule`] pairs a predicate over a node with a replacement that turns the
//! node (and its converted children) into Markdown. A [`RuleSet`] keeps rules
//! sorted by descending priority; the first rule whose predicate holds is
//! applied. When none match, or the chosen rule fails, the node goes through
//! [`default_replacement`].
//!
//! # Example
//!
//! ```
//! use clipmark::rules::{Rule, RuleSet};
//! use clipmark::Transpiler;
//!
//! let mut rules = RuleSet::builtin();
//! rules.add(Rule::new("kbd", 450, |node| node.is("kbd"), |_, _, content| {
//!     Ok(format!("<kbd>{content}</kbd>"))
//! }));
//!
//! let transpiler = Transpiler::with_rules(rules);
//! assert_eq!(transpiler.transpile_html("<p>Press <kbd>Esc</kbd></p>", ""), "Press <kbd>Esc</kbd>");
//! ```

mod base;
mod callout;
mod code;
mod footnotes;
mod formatting;
mod lists;
mod math;
pub mod mathml;
mod media;
mod removals;
mod tables;

use std::fmt;

use thiserror::Error;

use crate::dom::predicates::{KEPT_TAGS, is_block};
use crate::dom::{NodeRef, outer_html};
use crate::error::Error;
use crate::markdown::Conversion;

/// Why a replacement did not produce output.
#[derive(Error, Debug)]
pub enum RuleError {
    /// The node turned out not to be what the rule handles.
    #[error("rule does not apply")]
    Declined,

    /// Markup the rule depends on is absent.
    #[error("missing {0}")]
    Missing(&'static str),

    #[error("MathML conversion failed: {0}")]
    MathMl(String),

    /// A nested walk failed for the whole document. Never swallowed.
    #[error(transparent)]
    Document(#[from] Error),
}

pub type RuleResult = std::result::Result<String, RuleError>;

type Filter = Box<dyn Fn(NodeRef<'_>) -> bool + Send + Sync>;
type Replacement = Box<dyn Fn(&mut Conversion<'_>, NodeRef<'_>, &str) -> RuleResult + Send + Sync>;

/// A named, prioritized conversion rule.
pub struct Rule {
    name: String,
    priority: i32,
    needs_content: bool,
    filter: Filter,
    replacement: Replacement,
}

impl Rule {
    /// Create a rule. The replacement receives the conversion state, the node
    /// and the node's converted children.
    pub fn new(
        name: impl Into<String>,
        priority: i32,
        filter: impl Fn(NodeRef<'_>) -> bool + Send + Sync + 'static,
        replacement: impl Fn(&mut Conversion<'_>, NodeRef<'_>, &str) -> RuleResult
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            priority,
            needs_content: true,
            filter: Box::new(filter),
            replacement: Box::new(replacement),
        }
    }

    /// Skip converting the children before calling the replacement, which
    /// then receives `""`. For rules that walk the subtree themselves.
    pub fn without_content(mut self) -> Self {
        self.needs_content = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn needs_content(&self) -> bool {
        self.needs_content
    }

    pub fn matches(&self, node: NodeRef<'_>) -> bool {
        (self.filter)(node)
    }

    pub fn replace(&self, conv: &mut Conversion<'_>, node: NodeRef<'_>, content: &str) -> RuleResult {
        (self.replacement)(conv, node, content)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

/// Rules ordered by descending priority.
///
/// Immutable once handed to a [`Transpiler`](crate::Transpiler), and
/// `Send + Sync`, so one set can serve any number of threads.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// An empty set: every node goes through the default rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// The clipper's full rule library.
    pub fn builtin() -> Self {
        let mut set = Self::new();
        removals::register(&mut set);
        footnotes::register(&mut set);
        callout::register(&mut set);
        lists::register(&mut set);
        tables::register(&mut set);
        media::register(&mut set);
        math::register(&mut set);
        formatting::register(&mut set);
        code::register(&mut set);
        base::register(&mut set);
        set
    }

    /// Insert a rule after every rule of greater or equal priority.
    pub fn add(&mut self, rule: Rule) -> &mut Self {
        let at = self
            .rules
            .iter()
            .position(|r| r.priority < rule.priority)
            .unwrap_or(self.rules.len());
        self.rules.insert(at, rule);
        self
    }

    /// Replace the rule with the same name (or add it if there is none).
    pub fn replace(&mut self, rule: Rule) -> &mut Self {
        self.remove(&rule.name);
        self.add(rule)
    }

    pub fn remove(&mut self, name: &str) -> Option<Rule> {
        let at = self.rules.iter().position(|r| r.name == name)?;
        Some(self.rules.remove(at))
    }

    /// The first rule whose predicate holds for `node`.
    pub fn find(&self, node: NodeRef<'_>) -> Option<&Rule> {
        self.rules.iter().find(|r| r.matches(node))
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Rendering for nodes no rule claims.
///
/// Kept tags become their outer HTML, block elements are set off by blank
/// lines, anything else passes its content through.
pub fn default_replacement(node: NodeRef<'_>, content: &str) -> String {
    if node.is_any(KEPT_TAGS) {
        let html = outer_html(node);
        return if is_block(&node) {
            format!("\n\n{html}\n\n")
        } else {
            html
        };
    }
    if is_block(&node) {
        format!("\n\n{}\n\n", content.trim_matches([' ', '\n']))
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn noop(name: &str, priority: i32) -> Rule {
        Rule::new(name, priority, |_| true, |_, _, _| Ok(String::new()))
    }

    #[test]
    fn test_sorted_by_descending_priority() {
        let mut set = RuleSet::new();
        set.add(noop("low", 1)).add(noop("high", 10)).add(noop("mid", 5));
        let names: Vec<_> = set.iter().map(Rule::name).collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_equal_priority_keeps_registration_order() {
        let mut set = RuleSet::new();
        set.add(noop("first", 5)).add(noop("second", 5));
        let names: Vec<_> = set.iter().map(Rule::name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_replace_by_name() {
        let mut set = RuleSet::new();
        set.add(noop("a", 5)).add(noop("b", 3));
        set.replace(noop("a", 1));
        let names: Vec<_> = set.iter().map(Rule::name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(set.get("a").map(Rule::priority), Some(1));
    }

    #[test]
    fn test_builtin_priorities_are_ordered() {
        let set = RuleSet::builtin();
        let priorities: Vec<_> = set.iter().map(Rule::priority).collect();
        assert!(priorities.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(set.iter().next().map(Rule::name), Some("removals"));
    }

    #[test]
    fn test_rule_set_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuleSet>();
    }

    #[test]
    fn test_default_replacement() {
        let dom = parse_html("<div>x</div><span>y</span><video src=\"v.mp4\"></video>");
        let root = NodeRef::document(&dom);

        let div = root.find_tag("div").unwrap();
        assert_eq!(default_replacement(div, "x"), "\n\nx\n\n");

        let span = root.find_tag("span").unwrap();
        assert_eq!(default_replacement(span, "y"), "y");

        let video = root.find_tag("video").unwrap();
        assert_eq!(default_replacement(video, ""), "<video src=\"v.mp4\"></video>");
    }
}
