//! Text codec for the `key=value` properties format.
//!
//! Text format:
//! ```text
//! # comment lines start with '#' or '!'
//! installer.version=2.0
//! install.dir = /opt/app
//! greeting : hello \
//!            world
//! ```
//!
//! Lines end in `\n`, `\r`, or `\r\n`.  A key ends at the first unescaped
//! `=`, `:`, or whitespace.  A line ending in an odd number of backslashes
//! continues on the next line.  Keys and values may contain the escapes
//! `\t \n \r \f \uXXXX`; any other escaped character stands for itself.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use thiserror::Error;

/// In-memory settings: ordered so encoded files are stable between runs.
pub type PropertyMap = BTreeMap<String, String>;

/// Errors that can occur while decoding properties text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PropertiesError {
    /// A `\u` escape was not followed by four hexadecimal digits.
    #[error("malformed \\uXXXX escape on line {line}")]
    MalformedUnicodeEscape { line: usize },

    /// A `\u` escape (or surrogate pair) does not name a Unicode scalar value.
    #[error("invalid code point U+{value:04X} on line {line}")]
    InvalidCodePoint { line: usize, value: u32 },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Decodes properties text into a [`PropertyMap`].
///
/// Comment and blank lines are skipped.  When a key appears more than once the
/// last occurrence wins.
///
/// # Errors
///
/// Returns [`PropertiesError`] if an escape sequence is malformed.
///
/// # Examples
///
/// ```rust
/// use settings_core::decode_properties;
///
/// let map = decode_properties("# installer\ninstaller.version=1.0\n").unwrap();
/// assert_eq!(map.get("installer.version").map(String::as_str), Some("1.0"));
/// ```
pub fn decode_properties(input: &str) -> Result<PropertyMap, PropertiesError> {
    let mut map = PropertyMap::new();
    for (line, text) in logical_lines(input) {
        let (key, value) = split_entry(&text, line)?;
        map.insert(key, value);
    }
    Ok(map)
}

/// Encodes `map` as properties text, one `key=value` line per entry.
///
/// `header`, when present, is written first as `#` comment lines.  Decoding
/// the output with [`decode_properties`] yields the same map.
///
/// # Examples
///
/// ```rust
/// use settings_core::{encode_properties, PropertyMap};
///
/// let mut map = PropertyMap::new();
/// map.insert("installer.version".to_string(), "1.0".to_string());
/// assert_eq!(encode_properties(&map, None), "installer.version=1.0\n");
/// ```
pub fn encode_properties(map: &PropertyMap, header: Option<&str>) -> String {
    let mut out = String::new();

    if let Some(header) = header {
        for line in header.lines() {
            out.push('#');
            out.push_str(line);
            out.push('\n');
        }
    }

    for (key, value) in map {
        escape_into(&mut out, key, true);
        out.push('=');
        escape_into(&mut out, value, false);
        out.push('\n');
    }
    out
}

// ── Line assembly ─────────────────────────────────────────────────────────────

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Splits `input` on `\n`, `\r`, and `\r\n`.
fn natural_lines(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&input[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&input[start..i]);
                i += 1;
                if i < bytes.len() && bytes[i] == b'\n' {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&input[start..]);
    }
    lines
}

/// Joins continued lines and drops comments.
///
/// Each logical line is paired with the 1-based number of the natural line it
/// started on, for error reporting.
fn logical_lines(input: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (idx, raw) in natural_lines(input).into_iter().enumerate() {
        let trimmed = raw.trim_start_matches(is_blank);

        // Comment markers only count at the start of a logical line.
        if pending.is_none()
            && (trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!'))
        {
            continue;
        }

        let (body, continues) = strip_continuation(trimmed);
        let entry = pending.get_or_insert_with(|| (idx + 1, String::new()));
        entry.1.push_str(body);

        if !continues {
            out.extend(pending.take());
        }
    }

    // Input ended while a continuation was pending.
    out.extend(pending.take());
    out
}

/// Removes a trailing continuation backslash, if the line has one.
fn strip_continuation(line: &str) -> (&str, bool) {
    let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
    if trailing % 2 == 1 {
        (&line[..line.len() - 1], true)
    } else {
        (line, false)
    }
}

// ── Entry parsing ─────────────────────────────────────────────────────────────

fn split_entry(line: &str, line_no: usize) -> Result<(String, String), PropertiesError> {
    let chars: Vec<char> = line.chars().collect();
    let limit = chars.len();

    let mut key_len = 0;
    let mut value_start = limit;
    let mut has_separator = false;
    let mut preceding_backslash = false;

    while key_len < limit {
        let c = chars[key_len];
        if (c == '=' || c == ':') && !preceding_backslash {
            value_start = key_len + 1;
            has_separator = true;
            break;
        }
        if is_blank(c) && !preceding_backslash {
            value_start = key_len + 1;
            break;
        }
        preceding_backslash = c == '\\' && !preceding_backslash;
        key_len += 1;
    }

    // Skip whitespace, consuming at most one '=' or ':' if none was seen yet.
    while value_start < limit {
        let c = chars[value_start];
        if !is_blank(c) {
            if !has_separator && (c == '=' || c == ':') {
                has_separator = true;
            } else {
                break;
            }
        }
        value_start += 1;
    }

    let key = unescape(&chars[..key_len], line_no)?;
    let value = unescape(&chars[value_start..], line_no)?;
    Ok((key, value))
}

fn unescape(chars: &[char], line_no: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if c != '\\' {
            out.push(c);
            continue;
        }

        let Some(&escaped) = chars.get(i) else {
            break;
        };
        i += 1;

        match escaped {
            'u' => {
                let unit = read_hex4(chars, &mut i, line_no)?;
                out.push(decode_code_unit(unit, chars, &mut i, line_no)?);
            }
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0c'),
            other => out.push(other),
        }
    }
    Ok(out)
}

fn read_hex4(chars: &[char], i: &mut usize, line_no: usize) -> Result<u32, PropertiesError> {
    let digits = chars
        .get(*i..*i + 4)
        .ok_or(PropertiesError::MalformedUnicodeEscape { line: line_no })?;

    let mut value = 0u32;
    for d in digits {
        let nibble = d
            .to_digit(16)
            .ok_or(PropertiesError::MalformedUnicodeEscape { line: line_no })?;
        value = (value << 4) | nibble;
    }
    *i += 4;
    Ok(value)
}

/// Turns a UTF-16 code unit into a `char`, pairing a high surrogate with a
/// following `\uXXXX` low surrogate.
fn decode_code_unit(
    unit: u32,
    chars: &[char],
    i: &mut usize,
    line_no: usize,
) -> Result<char, PropertiesError> {
    if (0xD800..=0xDBFF).contains(&unit) && chars.get(*i..*i + 2) == Some(&['\\', 'u'][..]) {
        let mut lookahead = *i + 2;
        let low = read_hex4(chars, &mut lookahead, line_no)?;
        if (0xDC00..=0xDFFF).contains(&low) {
            *i = lookahead;
            let combined = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
            return char::from_u32(combined).ok_or(PropertiesError::InvalidCodePoint {
                line: line_no,
                value: combined,
            });
        }
    }

    char::from_u32(unit).ok_or(PropertiesError::InvalidCodePoint {
        line: line_no,
        value: unit,
    })
}

// ── Encoding ──────────────────────────────────────────────────────────────────

fn escape_into(out: &mut String, text: &str, is_key: bool) {
    for (idx, c) in text.chars().enumerate() {
        match c {
            ' ' if idx == 0 || is_key => out.push_str("\\ "),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                // Control characters are all in the BMP, so one unit suffices.
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c => out.push(c),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(input: &str) -> PropertyMap {
        decode_properties(input).expect("decode must succeed")
    }

    fn value<'a>(map: &'a PropertyMap, key: &str) -> Option<&'a str> {
        map.get(key).map(String::as_str)
    }

    // ── Separators ────────────────────────────────────────────────────────────

    #[test]
    fn test_decode_equals_separator() {
        let map = decode("installer.version=1.0\n");
        assert_eq!(value(&map, "installer.version"), Some("1.0"));
    }

    #[test]
    fn test_decode_colon_and_whitespace_separators() {
        // Arrange
        let input = "a:1\nb 2\nc = 3\nd\t:\t4\n";

        // Act
        let map = decode(input);

        // Assert
        assert_eq!(value(&map, "a"), Some("1"));
        assert_eq!(value(&map, "b"), Some("2"));
        assert_eq!(value(&map, "c"), Some("3"));
        assert_eq!(value(&map, "d"), Some("4"));
    }

    #[test]
    fn test_decode_only_one_separator_is_consumed() {
        // The second '=' belongs to the value.
        let map = decode("key = =value\n");
        assert_eq!(value(&map, "key"), Some("=value"));
    }

    #[test]
    fn test_decode_key_without_value_maps_to_empty_string() {
        let map = decode("lonely\nempty=\n");
        assert_eq!(value(&map, "lonely"), Some(""));
        assert_eq!(value(&map, "empty"), Some(""));
    }

    #[test]
    fn test_decode_value_keeps_trailing_whitespace() {
        let map = decode("padded=value  \n");
        assert_eq!(value(&map, "padded"), Some("value  "));
    }

    // ── Comments and blank lines ──────────────────────────────────────────────

    #[test]
    fn test_decode_skips_comments_and_blank_lines() {
        // Arrange
        let input = "# hash comment\n! bang comment\n\n   \n   # indented comment\nkey=value\n";

        // Act
        let map = decode(input);

        // Assert
        assert_eq!(map.len(), 1);
        assert_eq!(value(&map, "key"), Some("value"));
    }

    #[test]
    fn test_decode_hash_inside_value_is_literal() {
        let map = decode("url=http://host/#anchor\n");
        assert_eq!(value(&map, "url"), Some("http://host/#anchor"));
    }

    // ── Line endings and continuations ────────────────────────────────────────

    #[test]
    fn test_decode_accepts_cr_lf_and_crlf() {
        let map = decode("a=1\rb=2\r\nc=3\nd=4");
        assert_eq!(map.len(), 4);
        assert_eq!(value(&map, "d"), Some("4"));
    }

    #[test]
    fn test_decode_joins_continuation_lines() {
        // Arrange – leading whitespace on the continued line is dropped
        let input = "greeting = hello \\\n          world\n";

        // Act
        let map = decode(input);

        // Assert
        assert_eq!(value(&map, "greeting"), Some("hello world"));
    }

    #[test]
    fn test_decode_even_backslashes_do_not_continue() {
        let map = decode("path=C:\\\\\nnext=1\n");
        assert_eq!(value(&map, "path"), Some("C:\\"));
        assert_eq!(value(&map, "next"), Some("1"));
    }

    #[test]
    fn test_decode_comment_marker_inside_continuation_is_content() {
        let map = decode("list=a,\\\n  #b\n");
        assert_eq!(value(&map, "list"), Some("a,#b"));
    }

    #[test]
    fn test_decode_continuation_at_end_of_input() {
        let map = decode("dangling=abc\\");
        assert_eq!(value(&map, "dangling"), Some("abc"));
    }

    // ── Escapes ───────────────────────────────────────────────────────────────

    #[test]
    fn test_decode_standard_escapes() {
        let map = decode("k=tab\\tnl\\ncr\\rff\\fx\\y\n");
        assert_eq!(value(&map, "k"), Some("tab\tnl\ncr\rff\x0cxy"));
    }

    #[test]
    fn test_decode_escaped_separator_in_key() {
        let map = decode("a\\=b\\:c\\ d=v\n");
        assert_eq!(value(&map, "a=b:c d"), Some("v"));
    }

    #[test]
    fn test_decode_unicode_escape() {
        let map = decode("name=caf\\u00e9\n");
        assert_eq!(value(&map, "name"), Some("café"));
    }

    #[test]
    fn test_decode_surrogate_pair_escape() {
        let map = decode("emoji=\\uD83D\\uDE00\n");
        assert_eq!(value(&map, "emoji"), Some("\u{1F600}"));
    }

    #[test]
    fn test_decode_malformed_unicode_escape_reports_line() {
        // Act
        let result = decode_properties("ok=1\nbad=\\u12G4\n");

        // Assert
        assert_eq!(
            result,
            Err(PropertiesError::MalformedUnicodeEscape { line: 2 })
        );
    }

    #[test]
    fn test_decode_truncated_unicode_escape_is_error() {
        let result = decode_properties("bad=\\u12");
        assert_eq!(
            result,
            Err(PropertiesError::MalformedUnicodeEscape { line: 1 })
        );
    }

    #[test]
    fn test_decode_lone_surrogate_is_invalid_code_point() {
        let result = decode_properties("bad=\\uD800\n");
        assert_eq!(
            result,
            Err(PropertiesError::InvalidCodePoint {
                line: 1,
                value: 0xD800
            })
        );
    }

    #[test]
    fn test_decode_duplicate_key_last_wins() {
        let map = decode("k=first\nk=second\n");
        assert_eq!(value(&map, "k"), Some("second"));
    }

    // ── Encoding ──────────────────────────────────────────────────────────────

    #[test]
    fn test_encode_writes_entries_in_key_order() {
        // Arrange
        let mut map = PropertyMap::new();
        map.insert("zeta".to_string(), "last".to_string());
        map.insert("alpha".to_string(), "first".to_string());

        // Act
        let text = encode_properties(&map, None);

        // Assert
        assert_eq!(text, "alpha=first\nzeta=last\n");
    }

    #[test]
    fn test_encode_writes_header_as_comments() {
        let map = PropertyMap::new();
        let text = encode_properties(&map, Some("line one\nline two"));
        assert_eq!(text, "#line one\n#line two\n");
    }

    #[test]
    fn test_encode_escapes_special_characters() {
        // Arrange
        let mut map = PropertyMap::new();
        map.insert("a key".to_string(), " lead=x:y#z!\\".to_string());

        // Act
        let text = encode_properties(&map, None);

        // Assert – key spaces always escaped, value only the leading one
        assert_eq!(text, "a\\ key=\\ lead\\=x\\:y\\#z\\!\\\\\n");
    }

    #[test]
    fn test_encode_escapes_line_breaks_and_controls() {
        let mut map = PropertyMap::new();
        map.insert("k".to_string(), "a\nb\tc\u{1}".to_string());
        assert_eq!(encode_properties(&map, None), "k=a\\nb\\tc\\u0001\n");
    }

    #[test]
    fn test_encode_keeps_non_ascii_as_utf8() {
        let mut map = PropertyMap::new();
        map.insert("name".to_string(), "café".to_string());
        assert_eq!(encode_properties(&map, None), "name=café\n");
    }

    #[test]
    fn test_encoded_tricky_map_decodes_to_same_map() {
        // Arrange – values that exercise every escaping rule at once
        let mut map = PropertyMap::new();
        map.insert("installer.version".to_string(), "2.0".to_string());
        map.insert(" spaced key ".to_string(), "  both ends  ".to_string());
        map.insert("multi".to_string(), "line1\r\nline2\\".to_string());
        map.insert("#not-a-comment".to_string(), "!still value".to_string());
        map.insert("empty".to_string(), String::new());
        map.insert("emoji".to_string(), "\u{1F600}".to_string());

        // Act
        let restored = decode_properties(&encode_properties(&map, Some("header"))).unwrap();

        // Assert
        assert_eq!(restored, map);
    }
}
