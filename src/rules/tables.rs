//! Tables: equation layouts, spanning cells kept as HTML, pipe tables.

use crate::dom::{NodeRef, outer_html_filtered};
use crate::markdown::Conversion;

use super::{Rule, RuleResult, RuleSet};

/// Attributes that survive in tables emitted as raw HTML.
const TABLE_ATTRIBUTES: &[&str] = &[
    "src", "href", "style", "align", "width", "height", "rowspan", "colspan", "bgcolor", "scope",
    "valign", "headers",
];

pub(super) fn register(set: &mut RuleSet) {
    set.add(Rule::new("equationTable", 650, is_equation_table, replace_equation_table).without_content());
    set.add(Rule::new("complexTable", 640, is_complex_table, replace_complex_table).without_content());
    set.add(Rule::new("table", 630, |node| node.is("table"), replace_pipe_table).without_content());
}

fn is_equation_table(node: NodeRef<'_>) -> bool {
    node.is("table") && (node.has_class("ltx_equation") || node.has_class("ltx_eqn_table"))
}

fn replace_equation_table(_: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let equations: Vec<_> = node
        .descendants()
        .filter(|n| n.is("math"))
        .filter_map(|math| {
            let tex = math.attr("alttext")?.trim();
            if math.closest(|a| a.has_class("ltx_eqn_inline")).is_some() {
                Some(format!("${tex}$"))
            } else {
                Some(format!("\n$$\n{tex}\n$$"))
            }
        })
        .collect();

    if equations.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("\n\n{}\n\n", equations.join("\n\n")))
}

fn is_complex_table(node: NodeRef<'_>) -> bool {
    node.is("table")
        && node
            .descendants()
            .any(|n| n.is_any(&["td", "th"]) && (n.has_attr("colspan") || n.has_attr("rowspan")))
}

fn replace_complex_table(_: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let html = outer_html_filtered(node, &|name| TABLE_ATTRIBUTES.contains(&name));
    Ok(format!("\n\n{html}\n\n"))
}

/// Rows belonging to this table, not to nested ones.
fn table_rows<'a>(table: NodeRef<'a>) -> Vec<NodeRef<'a>> {
    let mut rows = Vec::new();
    for child in table.element_children() {
        if child.is("tr") {
            rows.push(child);
        } else if child.is_any(&["thead", "tbody", "tfoot"]) {
            rows.extend(child.element_children().filter(|r| r.is("tr")));
        }
    }
    rows
}

fn replace_pipe_table(conv: &mut Conversion<'_>, node: NodeRef<'_>, _: &str) -> RuleResult {
    let mut rows = Vec::new();
    let mut columns = 0;

    for row in table_rows(node) {
        let mut cells = Vec::new();
        for cell in row.element_children().filter(|c| c.is_any(&["td", "th"])) {
            let text = conv.convert_children(cell)?;
            cells.push(text.replace('\n', " ").trim().replace('|', "\\|"));
        }
        if rows.is_empty() {
            columns = cells.len();
        }
        rows.push(format!("| {} |", cells.join(" | ")));
    }

    if rows.is_empty() {
        return Ok(String::new());
    }

    let separator = format!("| {} |", vec!["---"; columns].join(" | "));
    rows.insert(1, separator);
    Ok(format!("\n\n{}\n\n", rows.join("\n")))
}

#[cfg(test)]
mod tests {
    use crate::html_to_markdown;

    #[test]
    fn test_pipe_table() {
        let html = r#"<table>
            <thead><tr><th>Name</th><th>Notes</th></tr></thead>
            <tbody>
              <tr><td>a|b</td><td><p>line one</p><p>line two</p></td></tr>
            </tbody>
        </table>"#;
        let md = html_to_markdown(html, "");
        assert_eq!(
            md,
            "| Name | Notes |\n| --- | --- |\n| a\\|b | line one  line two |"
        );
    }

    #[test]
    fn test_rowspan_kept_as_html() {
        let html = r#"<table class="data" id="t"><tr><td rowspan="2" onclick="x()">A</td><td>B</td></tr><tr><td>C</td></tr></table>"#;
        let md = html_to_markdown(html, "");
        assert_eq!(
            md,
            r#"<table><tbody><tr><td rowspan="2">A</td><td>B</td></tr><tr><td>C</td></tr></tbody></table>"#
        );
        assert!(!md.contains("| A"));
    }

    #[test]
    fn test_equation_table() {
        let html = r#"<table class="ltx_equation"><tr>
            <td><math alttext=" E = mc^2 "></math></td>
            <td class="ltx_eqn_inline"><math alttext="x"></math></td>
        </tr></table>"#;
        let md = html_to_markdown(html, "");
        assert_eq!(md, "$$\nE = mc^2\n$$\n\n$x$");
    }
}
