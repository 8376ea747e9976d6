//! Footnote references, footnote lists and inline footnotes.

use crate::dom::NodeRef;
use crate::markdown::Conversion;
use crate::patterns::{CITE_NOTE_RE, TRAILING_BACKREF_RE};

use super::{Rule, RuleError, RuleResult, RuleSet};

pub(super) fn register(set: &mut RuleSet) {
    set.add(Rule::new("footnoteReference", 900, is_reference, replace_reference).without_content());
    set.add(Rule::new("footnotesList", 890, is_footnotes_list, replace_footnotes_list).without_content());
    set.add(Rule::new("inlineFootnote", 880, is_inline_footnote, replace_inline_footnote).without_content());
}

fn is_reference(node: NodeRef<'_>) -> bool {
    reference_id(node).is_some()
}

/// Footnote id a reference marker points at.
///
/// Recognizes `sup#fnref:N-k`, DPUB-ARIA/EPUB note references, and a `sup`
/// wrapping only such a note reference.
fn reference_id(node: NodeRef<'_>) -> Option<String> {
    if node.is("sup") {
        if let Some(id) = node.element_id().and_then(|id| id.strip_prefix("fnref:")) {
            let primary = id.split('-').next().unwrap_or(id);
            return Some(primary.to_lowercase());
        }
        let mut children = node.element_children();
        let only = children.next()?;
        if children.next().is_some() || node.text_content().trim() != only.text_content().trim() {
            return None;
        }
        return noteref_target(only);
    }
    noteref_target(node)
}

fn noteref_target(node: NodeRef<'_>) -> Option<String> {
    let is_noteref = node.attr("role") == Some("doc-noteref")
        || node.attr("epub:type").is_some_and(|t| t.split_whitespace().any(|t| t == "noteref"));
    if !is_noteref {
        return None;
    }
    let target = node.attr("href")?.rsplit_once('#')?.1;
    (!target.is_empty()).then(|| target.to_lowercase())
}

fn replace_reference(_: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    reference_id(node)
        .map(|id| format!("[^{id}]"))
        .ok_or(RuleError::Declined)
}

fn is_footnotes_list(node: NodeRef<'_>) -> bool {
    node.is("ol")
        && node
            .parent_element()
            .is_some_and(|p| p.element_id() == Some("footnotes"))
}

fn replace_footnotes_list(conv: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let mut entries = Vec::new();
    for (index, item) in node.element_children().enumerate() {
        let id = list_item_id(item).unwrap_or_else(|| (index + 1).to_string());

        let self_label: Vec<_> = item
            .find(|n| n.is("sup"))
            .filter(|sup| sup.text_content().trim() == id)
            .map(|sup| sup.id())
            .into_iter()
            .collect();

        let body = conv.convert_children_without(item, &self_label)?;
        let body = TRAILING_BACKREF_RE.replace(body.trim_matches('\n'), "");
        entries.push(format!("[^{}]: {}", id.to_lowercase(), body.trim()));
    }
    Ok(format!("\n\n{}\n\n", entries.join("\n\n")))
}

/// Id of one entry of a footnotes list.
///
/// `fn:<id>` item ids, then MediaWiki `cite_note-<id>` (item id, else a link
/// inside the item), then the raw item id.
fn list_item_id(item: NodeRef<'_>) -> Option<String> {
    let raw = item.element_id().filter(|id| !id.is_empty());
    if let Some(id) = raw.and_then(|id| id.strip_prefix("fn:")) {
        return Some(id.to_string());
    }

    let cite_note = |s: &str| {
        let last = s.rsplit('/').next().unwrap_or(s);
        CITE_NOTE_RE
            .captures(last)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };

    raw.and_then(cite_note)
        .or_else(|| {
            item.descendants()
                .filter_map(|n| n.attr("href"))
                .find_map(cite_note)
        })
        .or_else(|| raw.map(str::to_string))
}

fn is_inline_footnote(node: NodeRef<'_>) -> bool {
    matches!(node.attr("role"), Some("doc-footnote" | "doc-endnote"))
        || node.attr("epub:type").is_some_and(|t| {
            t.split_whitespace()
                .any(|t| matches!(t, "footnote" | "endnote" | "rearnote"))
        })
}

/// Record the note's body and leave a marker, unless a note reference
/// elsewhere in the document already marks it.
fn replace_inline_footnote(conv: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let id = match node.element_id().filter(|id| !id.is_empty()) {
        Some(id) => id.to_lowercase(),
        None => (conv.footnotes().len() + 1).to_string(),
    };

    let body = conv.convert_children(node)?;
    let body = TRAILING_BACKREF_RE.replace(body.trim_matches('\n'), "");
    conv.footnotes_mut().insert(id.as_str(), body.trim());

    let referenced = node.element_id().is_some_and(|own| {
        NodeRef::document(node.dom())
            .descendants()
            .any(|n| noteref_target(n).is_some_and(|target| target == own.to_lowercase()))
    });
    Ok(if referenced {
        String::new()
    } else {
        format!("[^{id}]")
    })
}

#[cfg(test)]
mod tests {
    use crate::html_to_markdown;

    #[test]
    fn test_reference_keeps_primary_number() {
        let md = html_to_markdown(r##"<p>Claim<sup id="fnref:12-2"><a href="#fn:12">12</a></sup></p>"##, "");
        assert_eq!(md, "Claim[^12]");
    }

    #[test]
    fn test_footnotes_list() {
        let html = r##"
            <p>Text<sup id="fnref:1"><a href="#fn:1">1</a></sup></p>
            <div id="footnotes"><ol>
              <li id="fn:1"><p>First note. <a href="#fnref:1" class="footnote-backref">↩︎</a></p></li>
              <li id="fn:Two"><p>Second note.</p></li>
            </ol></div>"##;
        let md = html_to_markdown(html, "");
        assert_eq!(md, "Text[^1]\n\n[^1]: First note.\n\n[^two]: Second note.");
    }

    #[test]
    fn test_mediawiki_cite_notes() {
        let html = r##"<div id="footnotes"><ol>
            <li id="cite_note-Smith2020-3"><sup>Smith2020-3</sup> Smith, 2020. ↩</li>
            <li><a href="/wiki/Page#cite_note-Jones">^</a> Jones.</li>
        </ol></div>"##;
        let md = html_to_markdown(html, "");
        assert_eq!(
            md,
            "[^smith2020-3]: Smith, 2020.\n\n[^jones]: [^](/wiki/Page#cite_note-Jones) Jones."
        );
    }

    #[test]
    fn test_inline_footnote_collected() {
        let html = r##"<p>Body text.</p><aside role="doc-footnote" id="Note-A"><p>Aside text.</p></aside>"##;
        let md = html_to_markdown(html, "");
        assert_eq!(md, "Body text.\n\n[^note-a]\n\n---\n\n[^note-a]: Aside text.");
    }

    #[test]
    fn test_noteref_marks_inline_footnote() {
        let html = r##"<p>Body<a role="doc-noteref" href="#n1">1</a>.</p><aside role="doc-endnote" id="n1">End.</aside>"##;
        let md = html_to_markdown(html, "");
        assert_eq!(md, "Body[^n1].\n\n---\n\n[^n1]: End.");
    }
}
