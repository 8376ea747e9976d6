//! Pure markdown escaping utilities.
//!
//! These functions escape characters that would otherwise be read as Markdown
//! syntax, normalize whitespace in text leaves, and size inline code spans.

/// Escape special Markdown characters in a text leaf.
///
/// Anywhere in the text: backslash, `*`, `_`, backtick, `[` and `]`.
/// At the very start of the text only: `-`, `+ `, `=`, ATX heading markers,
/// `~~~`, `>`, and ordered-list markers like `1. `.
///
/// # Examples
///
/// ```
/// use clipmark::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("*bold*"), "\\*bold\\*");
/// assert_eq!(escape_markdown("[link]"), "\\[link\\]");
/// assert_eq!(escape_markdown("# not a heading"), "\\# not a heading");
/// assert_eq!(escape_markdown("a - b"), "a - b");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 10);
    for c in text.chars() {
        match c {
            '\\' | '*' | '_' | '`' | '[' | ']' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    if let Some(at) = leading_marker_escape(&result) {
        result.insert(at, '\\');
    }
    result
}

/// Byte offset at which a backslash must be inserted to neutralize a block
/// marker at the start of `text`.
fn leading_marker_escape(text: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    match bytes.first()? {
        b'-' | b'=' | b'>' => Some(0),
        b'+' if bytes.get(1) == Some(&b' ') => Some(0),
        b'~' if text.starts_with("~~~") => Some(0),
        b'#' => {
            let hashes = bytes.iter().take_while(|&&b| b == b'#').count();
            (hashes <= 6 && bytes.get(hashes) == Some(&b' ')).then_some(0)
        }
        b'0'..=b'9' => {
            let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
            (bytes.get(digits) == Some(&b'.') && bytes.get(digits + 1) == Some(&b' '))
                .then_some(digits)
        }
        _ => None,
    }
}

/// Collapse every run of ASCII whitespace into a single space.
///
/// Non-breaking spaces are content and survive.
pub fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                result.push(' ');
            }
            in_space = true;
        } else {
            result.push(c);
            in_space = false;
        }
    }
    result
}

/// Escape double quotes with a backslash, for quoted titles and YAML strings.
pub fn escape_double_quotes(text: &str) -> String {
    text.replace('"', "\\\"")
}

/// Calculate the minimum backtick count needed for inline code.
///
/// Returns the smallest number of backticks (at least 1) that doesn't
/// appear as a run in the content.
///
/// # Examples
///
/// ```
/// use clipmark::markdown::calculate_inline_code_ticks;
///
/// // Normal content needs 1 backtick
/// assert_eq!(calculate_inline_code_ticks("code"), 1);
///
/// // Content with backticks needs more
/// assert_eq!(calculate_inline_code_ticks("code with ` backtick"), 2);
/// ```
pub fn calculate_inline_code_ticks(content: &str) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == '`' {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }

    max_run + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_backslash() {
        assert_eq!(escape_markdown("a\\b"), "a\\\\b");
    }

    #[test]
    fn test_escape_emphasis() {
        assert_eq!(escape_markdown("*bold*"), "\\*bold\\*");
        assert_eq!(escape_markdown("snake_case"), "snake\\_case");
    }

    #[test]
    fn test_escape_links_and_code() {
        assert_eq!(escape_markdown("[link]"), "\\[link\\]");
        assert_eq!(escape_markdown("`code`"), "\\`code\\`");
    }

    #[test]
    fn test_pipes_and_angles_untouched() {
        assert_eq!(escape_markdown("a | b < c"), "a | b < c");
    }

    #[test]
    fn test_leading_markers() {
        assert_eq!(escape_markdown("- item"), "\\- item");
        assert_eq!(escape_markdown("+ item"), "\\+ item");
        assert_eq!(escape_markdown("+1"), "+1");
        assert_eq!(escape_markdown("=== "), "\\=== ");
        assert_eq!(escape_markdown("> quote"), "\\> quote");
        assert_eq!(escape_markdown("~~~"), "\\~~~");
        assert_eq!(escape_markdown("1984. A year"), "1984\\. A year");
        assert_eq!(escape_markdown("3.14"), "3.14");
    }

    #[test]
    fn test_heading_markers() {
        assert_eq!(escape_markdown("## two"), "\\## two");
        assert_eq!(escape_markdown("####### seven"), "####### seven");
        assert_eq!(escape_markdown("#hashtag"), "#hashtag");
        assert_eq!(escape_markdown("not # heading"), "not # heading");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
        assert_eq!(collapse_whitespace("  lead"), " lead");
        assert_eq!(collapse_whitespace("a\u{a0}\u{a0}b"), "a\u{a0}\u{a0}b");
    }

    #[test]
    fn test_escape_double_quotes() {
        assert_eq!(escape_double_quotes(r#"say "hi""#), r#"say \"hi\""#);
    }

    #[test]
    fn test_inline_code_ticks() {
        assert_eq!(calculate_inline_code_ticks("code"), 1);
        assert_eq!(calculate_inline_code_ticks("`"), 2);
        assert_eq!(calculate_inline_code_ticks("a `` b"), 3);
    }
}
