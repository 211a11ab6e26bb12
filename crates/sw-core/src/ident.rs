//! Identifier helpers shared by the annotation parser, scopes and templates.

use regex::Regex;
use std::sync::OnceLock;

static IDENT_RE: OnceLock<Regex> = OnceLock::new();
static WORD_RE: OnceLock<Regex> = OnceLock::new();

fn ident_regex() -> &'static Regex {
    IDENT_RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid regex"))
}

fn word_regex() -> &'static Regex {
    WORD_RE.get_or_init(|| Regex::new(r"[^A-Za-z]*([A-Za-z])([A-Za-z0-9]*)").expect("valid regex"))
}

/// Whether `s` is an identifier: `[A-Za-z][A-Za-z0-9_]*`.
pub fn is_ident(s: &str) -> bool {
    ident_regex().is_match(s)
}

/// The leading identifier of `s`, or `None` when `s` does not start with a letter.
///
/// ```
/// use sw_core::ident::leading_ident;
/// assert_eq!(leading_ident("mysql.dot"), Some("mysql"));
/// assert_eq!(leading_ident("go-sql-driver"), Some("go"));
/// assert_eq!(leading_ident("9lives"), None);
/// ```
pub fn leading_ident(s: &str) -> Option<&str> {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, c)) if c.is_ascii_alphabetic() => {}
        _ => return None,
    }
    let end = chars
        .find(|(_, c)| !(c.is_ascii_alphanumeric() || *c == '_'))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    Some(&s[..end])
}

/// Convert to PascalCase: every alphanumeric word is capitalized and the rest
/// dropped, e.g. `"user_id"` -> `"UserId"`.
pub fn pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for caps in word_regex().captures_iter(s) {
        out.push_str(&caps[1].to_ascii_uppercase());
        out.push_str(&caps[2].to_ascii_lowercase());
    }
    out
}

/// Convert to camelCase, e.g. `"user_id"` -> `"userId"`.
pub fn camel_case(s: &str) -> String {
    let pascal = pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "ident_test.rs"]
mod tests;
