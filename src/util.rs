//! Text decoding and plain-text helpers shared by the passes.

use std::borrow::Cow;

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the hint encoding (from `<?xml encoding="..."?>`
///    or a `<meta charset>`)
/// 3. Falls back to Windows-1252 (what Word-era tooling tends to emit)
pub fn decode_text<'a>(bytes: &'a [u8], hint_encoding: Option<&str>) -> Cow<'a, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = hint_encoding
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the encoding name from an XML declaration or a meta charset.
///
/// Only the first 1024 bytes are inspected.
pub fn extract_declared_encoding(bytes: &[u8]) -> Option<&str> {
    let check_len = bytes.len().min(1024);
    let prefix = &bytes[..check_len];

    let after = value_after(prefix, b"encoding=").or_else(|| value_after(prefix, b"charset="))?;
    let (&first, rest) = after.split_first()?;

    let value = if first == b'"' || first == b'\'' {
        let end = rest.iter().position(|&b| b == first)?;
        &rest[..end]
    } else {
        let end = after
            .iter()
            .position(|b| !(b.is_ascii_alphanumeric() || *b == b'-' || *b == b'_'))
            .unwrap_or(after.len());
        &after[..end]
    };

    std::str::from_utf8(value).ok().filter(|s| !s.is_empty())
}

fn value_after<'a>(haystack: &'a [u8], needle: &[u8]) -> Option<&'a [u8]> {
    let pos = haystack
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))?;
    Some(&haystack[pos + needle.len()..])
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first `limit` characters of `text` (never splits a character).
pub fn take_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_pos, _)) => &text[..byte_pos],
        None => text,
    }
}
