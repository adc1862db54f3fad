//! Text value normalization and per-platform escaping.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref LINE_WRAP_REGEX: Regex = Regex::new(r"\s*\r?\n\s*").unwrap();
}

/// Collapses soft line wraps: every whitespace run containing a line break
/// becomes a single space, and surrounding whitespace is trimmed.
pub fn remove_line_wraps(value: &str) -> String {
    LINE_WRAP_REGEX.replace_all(value, " ").trim().to_string()
}

/// Applies line-wrap normalization unless strict line breaks are requested.
pub fn normalize(value: String, strict_line_breaks: bool) -> String {
    if strict_line_breaks {
        value
    } else {
        remove_line_wraps(&value)
    }
}

/// Escapes a value for an Android `<string>` body.
pub fn escape_android(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '@' | '?' if i == 0 => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a value for a quoted Apple `.strings` literal.
pub fn escape_apple(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a Java `.properties` key: value escaping plus the separators
/// (`=`, `:`, whitespace) and the comment markers `#` and `!`.
pub fn escape_properties_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for c in key.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '=' | ':' | '#' | '!' | ' ' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Escapes a value for a Java `.properties` entry.
pub fn escape_properties(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ' ' if i == 0 => out.push_str("\\ "),
            _ => out.push(c),
        }
    }
    out
}

/// Turns a file-derived name into an identifier-safe resource key.
pub fn sanitize_key(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
