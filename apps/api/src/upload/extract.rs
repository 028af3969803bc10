/// Content extraction: the file bytes are read as text, not parsed.
///
/// Binary formats (PDF, DOC) come out garbled; the scorer's keyword matching
/// tolerates that, and the original text is preserved well enough for the
/// `parsed_content` column. What gets stripped is only content that breaks
/// downstream JSON handling: literal `\uXXXX` escape sequences and control
/// bytes.
pub fn extract_text(bytes: &[u8]) -> String {
    sanitize(&String::from_utf8_lossy(bytes))
}

/// Removes literal `\uXXXX` sequences and C0/C1 control characters
/// (U+0000–U+001F, U+007F–U+009F).
pub fn sanitize(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let chars: Vec<char> = content.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '\\'
            && i + 5 < chars.len()
            && chars[i + 1] == 'u'
            && chars[i + 2..i + 6].iter().all(|c| c.is_ascii_hexdigit())
        {
            i += 6;
            continue;
        }
        let c = chars[i];
        if !is_control(c) {
            out.push(c);
        }
        i += 1;
    }

    out
}

fn is_control(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(sanitize("Senior Rust Engineer"), "Senior Rust Engineer");
    }

    #[test]
    fn test_strips_unicode_escape_sequences() {
        assert_eq!(sanitize("abc\\u00e9def"), "abcdef");
        assert_eq!(sanitize("\\uFFFD start"), " start");
    }

    #[test]
    fn test_incomplete_escape_is_kept() {
        // `\uXY` with fewer than four hex digits is not an escape sequence
        assert_eq!(sanitize("abc\\u12"), "abc\\u12");
    }

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(sanitize("a\x00b\x1Fc\x7Fd"), "abcd");
        assert_eq!(sanitize("line1\nline2"), "line1line2");
    }

    #[test]
    fn test_lossy_read_of_invalid_utf8() {
        // Invalid bytes become U+FFFD, which survives sanitization
        let text = extract_text(&[b'o', b'k', 0xFF]);
        assert!(text.starts_with("ok"));
    }
}
