//! Whole-document cleanup applied after the walk.

use crate::patterns::{BLANK_RUN_RE, EMPTY_LINK_RE, TITLE_LINE_RE};

use super::footnotes::FootnoteContext;

/// Finish a converted document: drop the title line and empty links,
/// collapse blank runs, append collected footnotes.
pub fn finish(markdown: &str, footnotes: &FootnoteContext) -> String {
    let markdown = markdown.trim_matches('\n');
    let markdown = strip_title(markdown);
    let markdown = remove_empty_links(markdown);
    let mut markdown = collapse_blank_lines(&markdown);

    if !footnotes.is_empty() {
        markdown.truncate(markdown.trim_end().len());
        markdown.push_str("\n\n---\n\n");
        markdown.push_str(&collapse_blank_lines(&footnotes.render()));
    }

    markdown.replace('\0', "").trim().to_string()
}

/// Drop a leading `# heading` line and the newlines after it.
pub fn strip_title(markdown: &str) -> &str {
    match TITLE_LINE_RE.find(markdown) {
        Some(m) => &markdown[m.end()..],
        None => markdown,
    }
}

/// Remove `[](url)` artifacts, with their surrounding newlines, unless they
/// are images (`![](url)`).
pub fn remove_empty_links(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len());
    let mut copied = 0;
    let mut pos = 0;

    while let Some(m) = EMPTY_LINK_RE.find_at(markdown, pos) {
        let bracket = m.start() + m.as_str().find('[').unwrap_or(0);
        if markdown[..bracket].ends_with('!') {
            pos = bracket + 1;
            continue;
        }
        out.push_str(&markdown[copied..m.start()]);
        copied = m.end();
        pos = m.end();
    }

    out.push_str(&markdown[copied..]);
    out
}

/// Collapse runs of three or more newlines to a blank line.
pub fn collapse_blank_lines(markdown: &str) -> String {
    BLANK_RUN_RE.replace_all(markdown, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_title() {
        assert_eq!(strip_title("# Title\n\nBody"), "Body");
        assert_eq!(strip_title("## Sub\n\nBody"), "## Sub\n\nBody");
        assert_eq!(strip_title("Intro\n# Title\n"), "Intro\n# Title\n");
    }

    #[test]
    fn test_remove_empty_links_keeps_images() {
        assert_eq!(remove_empty_links("a\n\n[](https://x.y)\n\nb"), "ab");
        assert_eq!(remove_empty_links("![](img.png)"), "![](img.png)");
        assert_eq!(
            remove_empty_links("![](img.png)\n[](https://x.y)"),
            "![](img.png)"
        );
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb\n\n\nc"), "a\n\nb\n\nc");
    }

    #[test]
    fn test_finish_appends_footnotes() {
        let mut notes = FootnoteContext::new();
        notes.insert("1", "A note.");
        assert_eq!(
            finish("\n\nText[^1]\n\n", &notes),
            "Text[^1]\n\n---\n\n[^1]: A note."
        );
    }

    #[test]
    fn test_finish_removes_nul() {
        assert_eq!(finish("a\0b", &FootnoteContext::new()), "ab");
    }
}
