//! Input decoding.

use std::borrow::Cow;

use crate::patterns::META_CHARSET_RE;

/// Decode fetched HTML bytes.
///
/// This function:
/// 1. First tries UTF-8 (a BOM is handled by encoding_rs)
/// 2. If malformed, uses the `<meta charset>` declared near the top
/// 3. Falls back to Windows-1252, a superset of ISO-8859-1
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_html(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);
    if !malformed {
        return result;
    }

    if let Some(encoding) = sniff_charset(bytes) {
        log::debug!("decoding input as {}", encoding.name());
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// The encoding named by a `<meta charset>` in the first kilobyte.
fn sniff_charset(bytes: &[u8]) -> Option<&'static encoding_rs::Encoding> {
    let head = &bytes[..bytes.len().min(1024)];
    let (head, _, _) = encoding_rs::WINDOWS_1252.decode(head);
    let label = META_CHARSET_RE.captures(&head)?.get(1)?.as_str().to_string();
    encoding_rs::Encoding::for_label(label.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_borrowed() {
        let text = decode_html("<p>café</p>".as_bytes());
        assert!(matches!(text, Cow::Borrowed(_)));
        assert_eq!(text, "<p>café</p>");
    }

    #[test]
    fn test_utf8_bom() {
        let text = decode_html(b"\xEF\xBB\xBF<p>x</p>");
        assert_eq!(text, "<p>x</p>");
    }

    #[test]
    fn test_meta_charset_hint() {
        // "ä" in ISO-8859-2 is 0xE4; "ł" is 0xB3.
        let bytes = b"<meta charset=\"iso-8859-2\"><p>\xB3\xE4</p>";
        assert_eq!(decode_html(bytes), "<meta charset=\"iso-8859-2\"><p>łä</p>");
    }

    #[test]
    fn test_http_equiv_charset() {
        let bytes = b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=koi8-r\"><p>\xF0</p>";
        assert!(decode_html(bytes).contains("<p>П</p>"));
    }

    #[test]
    fn test_windows_1252_fallback() {
        assert_eq!(decode_html(b"caf\xE9 \x93q\x94"), "café \u{201C}q\u{201D}");
    }
}
