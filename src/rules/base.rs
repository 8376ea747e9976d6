//! CommonMark basics: ATX headings, `---` rules, `*` emphasis, inline links.

use crate::dom::NodeRef;
use crate::dom::predicates::in_preformatted;
use crate::markdown::{Conversion, calculate_inline_code_ticks, escape_double_quotes};

use super::{Rule, RuleResult, RuleSet};

const BASE_PRIORITY: i32 = 100;

pub(super) fn register(set: &mut RuleSet) {
    set.add(Rule::new("paragraph", BASE_PRIORITY, |node| node.is("p"), |_, _, content| {
        Ok(format!("\n\n{}\n\n", content.trim_matches([' ', '\n'])))
    }));
    set.add(Rule::new(
        "heading",
        BASE_PRIORITY,
        |node| heading_level(node).is_some(),
        replace_heading,
    ));
    set.add(Rule::new("blockquote", BASE_PRIORITY, |node| node.is("blockquote"), replace_blockquote));
    set.add(Rule::new("horizontalRule", BASE_PRIORITY, |node| node.is("hr"), |_, _, _| {
        Ok("\n\n---\n\n".to_string())
    }));
    set.add(Rule::new("lineBreak", BASE_PRIORITY, |node| node.is("br"), |_, _, _| {
        Ok("  \n".to_string())
    }));
    set.add(Rule::new(
        "emphasis",
        BASE_PRIORITY,
        |node| node.is_any(&["em", "i"]),
        |_, _, content| Ok(wrap_inline(content, "*")),
    ));
    set.add(Rule::new(
        "strong",
        BASE_PRIORITY,
        |node| node.is_any(&["strong", "b"]),
        |_, _, content| Ok(wrap_inline(content, "**")),
    ));
    set.add(Rule::new(
        "code",
        BASE_PRIORITY,
        |node| node.is("code") && !in_preformatted(&node),
        replace_inline_code,
    ));
    set.add(Rule::new(
        "inlineLink",
        BASE_PRIORITY,
        |node| node.is("a") && node.has_attr("href"),
        replace_link,
    ));
    set.add(Rule::new("image", BASE_PRIORITY, |node| node.is("img"), replace_image).without_content());
}

fn heading_level(node: NodeRef<'_>) -> Option<usize> {
    let tag = node.tag()?;
    let level = tag.strip_prefix('h')?.parse::<usize>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

fn replace_heading(_: &mut Conversion<'_>, node: NodeRef<'_>, content: &str) -> RuleResult {
    let level = heading_level(node).unwrap_or(1);
    let text = content.replace('\n', " ");
    Ok(format!("\n\n{} {}\n\n", "#".repeat(level), text.trim()))
}

fn replace_blockquote(_: &mut Conversion<'_>, _: NodeRef<'_>, content: &str) -> RuleResult {
    let quoted: Vec<_> = content
        .trim_matches('\n')
        .split('\n')
        .map(|line| format!("> {line}"))
        .collect();
    Ok(format!("\n\n{}\n\n", quoted.join("\n")))
}

/// Wrap with a delimiter, keeping flanking whitespace outside it.
/// Empty content stays empty.
fn wrap_inline(content: &str, delimiter: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return if content.is_empty() { String::new() } else { " ".to_string() };
    }
    let leading = if content.starts_with(char::is_whitespace) { " " } else { "" };
    let trailing = if content.ends_with(char::is_whitespace) { " " } else { "" };
    format!("{leading}{delimiter}{trimmed}{delimiter}{trailing}")
}

fn replace_inline_code(_: &mut Conversion<'_>, _: NodeRef<'_>, content: &str) -> RuleResult {
    if content.is_empty() {
        return Ok(String::new());
    }
    let code = content.replace("\r\n", " ").replace(['\n', '\r'], " ");
    let padded = code.starts_with('`')
        || code.ends_with('`')
        || (code.starts_with(' ') && code.ends_with(' ') && !code.trim().is_empty());
    let space = if padded { " " } else { "" };
    let ticks = "`".repeat(calculate_inline_code_ticks(&code));
    Ok(format!("{ticks}{space}{code}{space}{ticks}"))
}

fn title_suffix(node: NodeRef<'_>) -> String {
    node.attr("title")
        .filter(|t| !t.is_empty())
        .map(|t| format!(" \"{}\"", escape_double_quotes(t)))
        .unwrap_or_default()
}

fn replace_link(_: &mut Conversion<'_>, node: NodeRef<'_>, content: &str) -> RuleResult {
    let href = node
        .attr("href")
        .unwrap_or_default()
        .replace('(', "\\(")
        .replace(')', "\\)");
    Ok(format!("[{content}]({href}{})", title_suffix(node)))
}

fn replace_image(_: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let Some(src) = node.attr("src").filter(|s| !s.is_empty()) else {
        return Ok(String::new());
    };
    let alt = node.attr("alt").unwrap_or_default().replace('\n', " ");
    Ok(format!("![{alt}]({src}{})", title_suffix(node)))
}
