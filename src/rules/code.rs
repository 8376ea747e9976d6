//! Preformatted code blocks.

use crate::dom::NodeRef;
use crate::markdown::Conversion;

use super::{Rule, RuleError, RuleResult, RuleSet};

pub(super) fn register(set: &mut RuleSet) {
    set.add(Rule::new("preformattedCode", 430, |node| node.is("pre"), replace_pre).without_content());
}

/// Fenced block with the language from `data-lang`.
fn replace_pre(_: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let code = node.find_tag("code").ok_or(RuleError::Missing("code"))?;
    let language = code.attr("data-lang").unwrap_or_default();
    let text = code.text_content();
    let text = text.trim().replace('`', "\\`");
    Ok(format!("\n```{language}\n{text}\n```\n"))
}
