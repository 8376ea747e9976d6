//! Figures and embedded players.

use crate::dom::NodeRef;
use crate::markdown::{Conversion, collapse_whitespace};
use crate::patterns::{TWEET_ID_RE, TWITTER_HOST_RE, YOUTUBE_HOST_RE, YOUTUBE_ID_RE};

use super::{Rule, RuleError, RuleResult, RuleSet};

pub(super) fn register(set: &mut RuleSet) {
    set.add(Rule::new("figure", 600, |node| node.is("figure"), replace_figure).without_content());
    set.add(Rule::new("embedToMarkdown", 590, is_embed, replace_embed).without_content());
}

/// `![alt](src)` for the figure's image, with the caption as a quote below.
/// Figures without an image fall back to their content.
fn replace_figure(_: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let img = node.find_tag("img").ok_or(RuleError::Missing("img"))?;
    let alt = img.attr("alt").unwrap_or_default();
    let src = img.attr("src").unwrap_or_default();

    let caption = node
        .find_tag("figcaption")
        .map(|c| collapse_whitespace(&c.text_content()).trim().to_string())
        .unwrap_or_default();

    if caption.is_empty() {
        Ok(format!("\n\n![{alt}]({src})\n\n"))
    } else {
        Ok(format!("\n\n![{alt}]({src})\n> {caption}\n\n"))
    }
}

fn is_embed(node: NodeRef<'_>) -> bool {
    node.is("iframe")
        && node
            .attr("src")
            .is_some_and(|src| YOUTUBE_HOST_RE.is_match(src) || TWITTER_HOST_RE.is_match(src))
}

/// YouTube and X/Twitter iframes as embeddable links. An iframe whose id
/// cannot be found is kept as HTML.
fn replace_embed(_: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let src = node.attr("src").ok_or(RuleError::Missing("src"))?;

    if let Some(id) = YOUTUBE_ID_RE.captures(src).and_then(|c| c.get(1)) {
        return Ok(format!("![](https://www.youtube.com/watch?v={})", id.as_str()));
    }
    if let Some(id) = TWEET_ID_RE.captures(src).and_then(|c| c.get(1)) {
        return Ok(format!("![](https://x.com/i/status/{})", id.as_str()));
    }
    Err(RuleError::Declined)
}
