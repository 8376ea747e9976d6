//! Cached regex patterns.
//!
//! Uses LazyLock to compile patterns once on first use.

use regex_lite::Regex;
use std::sync::LazyLock;

// === Rule patterns ===

/// Inline `display: none`
pub static DISPLAY_NONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|;)\s*display\s*:\s*none\b").unwrap());

/// YouTube or X/Twitter embed hosts
pub static YOUTUBE_HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"youtube\.com|youtu\.be").unwrap());

pub static TWITTER_HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"twitter\.com|x\.com").unwrap());

/// Video id of a YouTube embed or watch URL
pub static YOUTUBE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:https?://)?(?:www\.)?(?:youtube\.com|youtu\.be)/(?:embed/|watch\?v=)?([a-zA-Z0-9_-]+)",
    )
    .unwrap()
});

/// Status id of an embedded tweet
pub static TWEET_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:twitter\.com|x\.com)/.*?(?:status|statuses)/(\d+)").unwrap()
});

/// MediaWiki footnote ids: `cite_note-<id>`
pub static CITE_NOTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"cite_note-(.+)").unwrap());

/// Back-reference arrow left at the end of a footnote body
pub static TRAILING_BACKREF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*↩\x{FE0E}?$").unwrap());

/// arXiv list item label, e.g. `3.`
pub static LTX_ITEM_LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+\.\s*$").unwrap());

// === Post-processing patterns ===

/// Leading `# Title` line, which duplicates the note title
pub static TITLE_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^# .+\n+").unwrap());

/// Empty link artifacts with their surrounding newlines
pub static EMPTY_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n*\[\]\([^)]+\)\n*").unwrap());

pub static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

// === Input decoding ===

/// `<meta charset="...">` or `<meta http-equiv=... content="...; charset=...">`
pub static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([a-zA-Z0-9_:.-]+)"#).unwrap()
});
