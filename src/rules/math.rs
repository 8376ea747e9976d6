//! Math from MathJax, KaTeX, MediaWiki and bare MathML, as `$…$` / `$$…$$`.

use std::sync::LazyLock;

use crate::dom::{NodeRef, Selector};
use crate::markdown::Conversion;

use super::mathml::mathml_to_latex;
use super::{Rule, RuleError, RuleResult, RuleSet};

static TEX_ANNOTATION: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse(r#"annotation[encoding="application/x-tex"]"#));
static KATEX_ANNOTATION: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse(r#".katex-mathml annotation[encoding="application/x-tex"]"#));
static KATEX_MATH: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse(".katex-mathml math"));

const MEDIAWIKI_CLASSES: &[&str] = &[
    "mwe-math-element",
    "mwe-math-fallback-image-inline",
    "mwe-math-fallback-image-display",
];

pub(super) fn register(set: &mut RuleSet) {
    set.add(Rule::new("MathJax", 560, |node| node.is("mjx-container"), replace_mathjax).without_content());
    set.add(
        Rule::new(
            "katex",
            550,
            |node| node.has_class("math") || node.has_class("katex"),
            replace_katex,
        )
        .without_content(),
    );
    set.add(
        Rule::new(
            "math",
            540,
            |node| node.is("math") || MEDIAWIKI_CLASSES.iter().any(|c| node.has_class(c)),
            replace_math,
        )
        .without_content(),
    );
}

fn select<'a>(node: NodeRef<'a>, selector: &LazyLock<Option<Selector>>) -> Option<NodeRef<'a>> {
    selector.as_ref().and_then(|s| node.select_first(s))
}

fn block(latex: &str) -> String {
    format!("\n$$\n{latex}\n$$\n")
}

fn is_display_block(node: NodeRef<'_>) -> bool {
    node.attr("display") == Some("block")
}

/// MathJax v3 keeps a MathML copy for screen readers.
fn replace_mathjax(_: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let math = node
        .find_tag("mjx-assistive-mml")
        .ok_or(RuleError::Missing("mjx-assistive-mml"))?
        .find_tag("math")
        .ok_or(RuleError::Missing("math"))?;
    let latex = mathml_to_latex(math)?;

    if is_display_block(math) {
        Ok(block(&latex))
    } else {
        Ok(format!("${latex}$"))
    }
}

fn replace_katex(_: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let latex = node
        .attr("data-latex")
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .or_else(|| {
            select(node, &KATEX_ANNOTATION)
                .map(|a| a.text_content())
                .filter(|l| !l.is_empty())
        })
        .unwrap_or_else(|| node.text_content().trim().to_string());

    let display = select(node, &KATEX_MATH).is_some_and(is_display_block);
    if node.has_class("math-inline") || !display {
        Ok(format!("${latex}$"))
    } else {
        Ok(block(&latex))
    }
}

/// First available LaTeX source for a math element or MediaWiki wrapper.
fn extract_latex(node: NodeRef<'_>) -> Result<String, RuleError> {
    if node.is("math") {
        let own = node
            .attr("data-latex")
            .filter(|l| !l.is_empty())
            .or_else(|| node.attr("alttext").filter(|l| !l.is_empty()));
        if let Some(latex) = own {
            return Ok(latex.trim().to_string());
        }
    }
    if let Some(alttext) = node
        .find(|n| n.is("math") && n.attr("alttext").is_some_and(|a| !a.is_empty()))
        .and_then(|m| m.attr("alttext"))
    {
        return Ok(alttext.trim().to_string());
    }
    if let Some(annotation) = select(node, &TEX_ANNOTATION) {
        let text = annotation.text_content();
        if !text.is_empty() {
            return Ok(text.trim().to_string());
        }
    }
    let math = if node.is("math") {
        Some(node)
    } else {
        node.find_tag("math")
    };
    if let Some(math) = math {
        return mathml_to_latex(math);
    }
    Ok(node
        .find_tag("img")
        .and_then(|img| img.attr("alt"))
        .unwrap_or_default()
        .to_string())
}

/// Display math for `display="block"`, MediaWiki display fallbacks and
/// equation wrappers right after a paragraph. Never inside tables.
fn is_block_math(node: NodeRef<'_>) -> bool {
    if node.closest(|n| n.is("table")).is_some() {
        return false;
    }
    if is_display_block(node) || node.has_class("mwe-math-fallback-image-display") {
        return true;
    }
    node.parent_element().is_some_and(|parent| {
        parent.has_class("mwe-math-element")
            && parent.prev_element_sibling().is_some_and(|prev| prev.is("p"))
    })
}

fn replace_math(_: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let latex = extract_latex(node)?.trim().to_string();

    if is_block_math(node) {
        return Ok(block(&latex));
    }

    let prev = node.prev_sibling();
    let next = node.next_sibling();
    let prev_char = prev.and_then(|n| n.text_content().chars().last());
    let next_char = next.and_then(|n| n.text_content().chars().next());

    let blank_text = |n: NodeRef<'_>| n.text().is_some_and(|t| !t.is_empty() && t.trim().is_empty());
    let start_of_line = prev.is_none_or(blank_text);
    let end_of_line = next.is_none_or(blank_text);
    let needs_space = |c: Option<char>| c.is_some_and(|c| !c.is_whitespace() && c != '$');

    let left = if !start_of_line && needs_space(prev_char) { " " } else { "" };
    let right = if !end_of_line && needs_space(next_char) { " " } else { "" };
    Ok(format!("{left}${latex}${right}"))
}
