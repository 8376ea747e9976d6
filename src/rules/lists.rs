//! Lists with tab indentation, task items and arXiv enumerations.

use crate::dom::NodeRef;
use crate::dom::predicates::list_depth;
use crate::markdown::Conversion;
use crate::patterns::LTX_ITEM_LABEL_RE;

use super::{Rule, RuleResult, RuleSet};

pub(super) fn register(set: &mut RuleSet) {
    set.add(
        Rule::new(
            "arXivEnumerate",
            780,
            |node| node.is("ol") && node.has_class("ltx_enumerate"),
            replace_arxiv_enumerate,
        )
        .without_content(),
    );
    set.add(Rule::new("list", 700, |node| node.is_any(&["ul", "ol"]), replace_list));
    set.add(Rule::new("listItem", 690, |node| node.is("li"), replace_list_item));
}

fn replace_list(_: &mut Conversion<'_>, node: NodeRef<'_>, content: &str) -> RuleResult {
    let content = content.trim_matches('\n');
    if list_depth(&node) == 0 {
        Ok(format!("\n\n{content}\n\n"))
    } else {
        Ok(format!("\n{content}\n"))
    }
}

fn replace_list_item(_: &mut Conversion<'_>, node: NodeRef<'_>, content: &str) -> RuleResult {
    let depth = list_depth(&node);
    let indent = "\t".repeat(depth.saturating_sub(1));

    let marker = match node.parent_element().filter(|p| p.is("ol")) {
        Some(ol) => {
            let start = ol
                .attr("start")
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(1);
            format!("{}. ", start + node.element_index() as i64)
        }
        None => "- ".to_string(),
    };

    let task = match task_checkbox(node) {
        Some(checkbox) if checkbox.has_attr("checked") => "[x] ",
        Some(_) => "[ ] ",
        None => "",
    };

    let continuation = "\t".repeat(depth.max(1));
    let mut lines = content.lines().filter(|line| !line.trim().is_empty());
    let mut body = lines.next().unwrap_or_default().trim().to_string();
    for line in lines {
        body.push('\n');
        if !line.starts_with(&continuation) {
            body.push_str(&continuation);
        }
        body.push_str(line.trim_end());
    }

    let newline = if node.next_sibling().is_some() { "\n" } else { "" };
    Ok(format!("{indent}{marker}{task}{body}{newline}"))
}

/// The item's own checkbox: one not inside a nested list.
fn task_checkbox(item: NodeRef<'_>) -> Option<NodeRef<'_>> {
    item.descendants().find(|n| {
        n.is("input")
            && n.attr("type").is_some_and(|t| t.eq_ignore_ascii_case("checkbox"))
            && n.ancestors()
                .take_while(|a| *a != item)
                .all(|a| !a.is_any(&["ul", "ol"]))
    })
}

fn replace_arxiv_enumerate(conv: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let mut items = Vec::new();
    for (index, item) in node.element_children().enumerate() {
        let label: Vec<_> = item
            .element_children()
            .next()
            .filter(|first| {
                first.is("span")
                    && first.has_class("ltx_tag")
                    && first.has_class("ltx_tag_item")
                    && LTX_ITEM_LABEL_RE.is_match(&first.text_content())
            })
            .map(|label| label.id())
            .into_iter()
            .collect();
        let body = conv.convert_children_without(item, &label)?;
        items.push(format!("{}. {}", index + 1, body.trim()));
    }
    Ok(format!("\n\n{}\n\n", items.join("\n\n")))
}

#[cfg(test)]
mod tests {
    use crate::html_to_markdown;

    #[test]
    fn test_flat_bullets() {
        let md = html_to_markdown("<ul><li>One</li><li>Two</li></ul>", "");
        assert_eq!(md, "- One\n- Two");
    }

    #[test]
    fn test_ordered_with_start() {
        let md = html_to_markdown(r#"<ol start="4"><li>Four</li><li>Five</li></ol>"#, "");
        assert_eq!(md, "4. Four\n5. Five");
    }

    #[test]
    fn test_nested_indentation() {
        let html = "<ul><li>a<ul><li>b<ol><li>c</li></ol></li></ul></li><li>d</li></ul>";
        let md = html_to_markdown(html, "");
        assert_eq!(md, "- a\n\t- b\n\t\t1. c\n- d");
    }

    #[test]
    fn test_item_holding_only_a_list_shares_its_line() {
        let md = html_to_markdown("<ul><li><ul><li>x</li><li>y</li></ul></li></ul>", "");
        assert_eq!(md, "- - x\n\t- y");
    }

    #[test]
    fn test_multi_paragraph_item() {
        let html = "<ul><li><p>First</p><p>Second</p></li></ul>";
        let md = html_to_markdown(html, "");
        assert_eq!(md, "- First\n\tSecond");
    }

    #[test]
    fn test_task_items() {
        let html = r#"<ul>
            <li class="task-list-item"><input type="checkbox" checked disabled> Done</li>
            <li class="task-list-item"><input type="checkbox" disabled> Todo</li>
        </ul>"#;
        let md = html_to_markdown(html, "");
        assert_eq!(md, "- [x] Done\n- [ ] Todo");
    }

    #[test]
    fn test_nested_checkbox_belongs_to_inner_item() {
        let html = r#"<ul><li>Parent<ul><li><input type="checkbox"> Child</li></ul></li></ul>"#;
        let md = html_to_markdown(html, "");
        assert_eq!(md, "- Parent\n\t- [ ] Child");
    }

    #[test]
    fn test_arxiv_enumerate() {
        let html = r#"<ol class="ltx_enumerate">
            <li><span class="ltx_tag ltx_tag_item">1.</span><p>Alpha</p></li>
            <li><span class="ltx_tag ltx_tag_item">2.</span><p>Beta</p></li>
        </ol>"#;
        let md = html_to_markdown(html, "");
        assert_eq!(md, "1. Alpha\n\n2. Beta");
    }
}
