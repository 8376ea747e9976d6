//! Nodes that never reach the note.

use crate::dom::NodeRef;
use crate::patterns::DISPLAY_NONE_RE;

use super::{Rule, RuleSet};

pub(super) fn register(set: &mut RuleSet) {
    set.add(Rule::new("removals", 1000, is_removed, |_, _, _| Ok(String::new())).without_content());
}

/// Hidden elements and footnote back-reference links.
fn is_removed(node: NodeRef<'_>) -> bool {
    if !node.is_element() {
        return false;
    }
    node.attr("style")
        .is_some_and(|style| DISPLAY_NONE_RE.is_match(style))
        || node.attr("href").is_some_and(|href| href.contains("#fnref"))
        || node.has_class("footnote-backref")
}

#[cfg(test)]
mod tests {
    use crate::html_to_markdown;

    #[test]
    fn test_hidden_elements_removed() {
        let md = html_to_markdown(
            r#"<p>Shown</p><div style="color: red; display:none">Hidden</div>"#,
            "",
        );
        assert_eq!(md, "Shown");
    }

    #[test]
    fn test_display_substring_not_removed() {
        let md = html_to_markdown(r#"<p style="display: nonesuch">Shown</p>"#, "");
        assert_eq!(md, "Shown");
    }

    #[test]
    fn test_backrefs_removed() {
        let md = html_to_markdown(
            r##"<p>Note body <a href="#fnref:1">↩</a> <a class="footnote-backref" href="#r">^</a></p>"##,
            "",
        );
        assert_eq!(md, "Note body");
    }
}
