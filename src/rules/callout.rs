//! GitHub-style alerts as Obsidian callouts.

use crate::dom::NodeRef;
use crate::markdown::Conversion;

use super::{Rule, RuleResult, RuleSet};

const ALERT_CLASS: &str = "markdown-alert";
const TITLE_CLASS: &str = "markdown-alert-title";

pub(super) fn register(set: &mut RuleSet) {
    set.add(
        Rule::new(
            "callout",
            800,
            |node| node.is("div") && node.has_class(ALERT_CLASS),
            replace_callout,
        )
        .without_content(),
    );
}

fn replace_callout(conv: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let kind = node
        .classes()
        .iter()
        .filter_map(|c| c.strip_prefix("markdown-alert-"))
        .find(|suffix| !suffix.is_empty() && *suffix != "title")
        .map(str::to_uppercase)
        .unwrap_or_else(|| "NOTE".to_string());

    let titles: Vec<_> = node
        .descendants()
        .filter(|n| n.has_class(TITLE_CLASS))
        .map(|n| n.id())
        .collect();
    let body = conv.convert_children_without(node, &titles)?;

    Ok(format!(
        "\n\n> [!{kind}]\n> {}\n\n",
        body.trim().replace('\n', "\n> ")
    ))
}
