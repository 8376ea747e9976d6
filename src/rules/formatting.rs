//! Obsidian inline formatting and card-style links.

use crate::dom::NodeRef;
use crate::markdown::{Conversion, escape_double_quotes};

use super::{Rule, RuleResult, RuleSet};

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

pub(super) fn register(set: &mut RuleSet) {
    set.add(Rule::new("complexLinkStructure", 500, is_complex_link, replace_complex_link).without_content());
    set.add(Rule::new("highlight", 450, |node| node.is("mark"), |_, _, content| {
        Ok(format!("=={content}=="))
    }));
    set.add(Rule::new(
        "strikethrough",
        440,
        |node| node.is_any(&["del", "s", "strike"]),
        |_, _, content| Ok(format!("~~{content}~~")),
    ));
}

/// An anchor wrapping a heading plus other content, as in article cards.
fn is_complex_link(node: NodeRef<'_>) -> bool {
    node.is("a") && node.children().nth(1).is_some() && node.children().any(|c| c.is_any(HEADINGS))
}

/// Heading text, the remaining card content, then a link to the target.
fn replace_complex_link(conv: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let heading = node.find(|n| n.is_any(HEADINGS));

    let (heading_text, skip) = match heading {
        Some(h) => (conv.convert_children(h)?, vec![h.id()]),
        None => (String::new(), Vec::new()),
    };
    let remaining = conv.convert_children_without(node, &skip)?;

    let mut markdown = format!(
        "{}\n\n{}\n\n",
        heading_text.trim_matches('\n'),
        remaining.trim_matches('\n')
    );
    if let Some(href) = node.attr("href").filter(|h| !h.is_empty()) {
        markdown.push_str(&format!("[View original]({href})"));
        if let Some(title) = node.attr("title").filter(|t| !t.is_empty()) {
            markdown.push_str(&format!(" \"{}\"", escape_double_quotes(title)));
        }
    }
    Ok(markdown)
}
