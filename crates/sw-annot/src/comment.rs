//! SQL comment scanner.
//!
//! Recognizes `# ...\n`, `-- ...\n` and `/* ... */` comments while skipping
//! single and double quoted string literals (with backslash escapes), so that
//! comment-like text inside literals is left alone.

use crate::annotation::{Annotation, AnnotationRegistry};
use crate::error::{AnnotError, AnnotResult};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// A comment in statement source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    /// Byte offset of the comment start (`#`, `--` or `/*`).
    pub offset: usize,
    /// Byte length including delimiters and the terminating newline.
    pub length: usize,
    /// Trimmed content without delimiters.
    pub content: String,
    /// Parsed annotation when the content starts with the marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<Annotation>,
}

impl Comment {
    /// Offset of the first byte after the comment.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

enum Piece {
    Comment {
        offset: usize,
        end: usize,
        content: (usize, usize),
    },
    Semicolon(usize),
}

/// Single pass over `src`, reporting comments and top-level semicolons.
fn walk(src: &str, mut visit: impl FnMut(Piece)) -> AnnotResult<()> {
    let bytes = src.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    // Position after the next `c` at or after `from`, or `len`.
    let find_after = |from: usize, c: u8| -> Option<usize> {
        bytes[from..].iter().position(|&b| b == c).map(|p| from + p + 1)
    };

    while i < len {
        match bytes[i] {
            quote @ (b'\'' | b'"') => {
                let start = i;
                i += 1;
                let mut enclosed = false;
                while i < len {
                    if bytes[i] == quote {
                        enclosed = true;
                        i += 1;
                        break;
                    }
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                if !enclosed {
                    return Err(AnnotError::BadStringLiteral { offset: start });
                }
            }
            b'#' => {
                let offset = i;
                i = find_after(i, b'\n').unwrap_or(len);
                visit(Piece::Comment {
                    offset,
                    end: i,
                    content: (offset + 1, i),
                });
            }
            b'-' if bytes.get(i + 1) == Some(&b'-')
                && bytes.get(i + 2).map_or(true, |b| b.is_ascii_whitespace()) =>
            {
                let offset = i;
                i = find_after(i, b'\n').unwrap_or(len);
                visit(Piece::Comment {
                    offset,
                    end: i,
                    content: (offset + 2, i),
                });
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let offset = i;
                i += 2;
                loop {
                    match find_after(i, b'*') {
                        Some(next) if next < len => {
                            i = next;
                            if bytes[i] == b'/' {
                                i += 1;
                                break;
                            }
                        }
                        _ => return Err(AnnotError::MissingBlockEnd { offset }),
                    }
                }
                visit(Piece::Comment {
                    offset,
                    end: i,
                    content: (offset + 2, i - 2),
                });
            }
            b';' => {
                visit(Piece::Semicolon(i));
                i += 1;
            }
            _ => i += 1,
        }
    }
    Ok(())
}

/// Scan all comments in `src` without interpreting annotations.
pub fn scan_comments(src: &str) -> AnnotResult<Vec<Comment>> {
    let mut comments = Vec::new();
    walk(src, |piece| {
        if let Piece::Comment {
            offset,
            end,
            content: (from, to),
        } = piece
        {
            comments.push(Comment {
                offset,
                length: end - offset,
                content: src[from..to].trim().to_string(),
                annotation: None,
            });
        }
    })?;
    Ok(comments)
}

/// Scan comments and parse the annotation of every comment whose content
/// starts with `marker`.
pub fn scan_annotated(
    src: &str,
    registry: &AnnotationRegistry,
    marker: &str,
) -> AnnotResult<Vec<Comment>> {
    let mut comments = scan_comments(src)?;
    for comment in &mut comments {
        if let Some(body) = comment.content.strip_prefix(marker) {
            comment.annotation = Some(registry.parse(body)?);
        }
    }
    Ok(comments)
}

/// Split a file into statements at top-level `;`. Semicolons inside comments
/// and string literals do not split. Whitespace-only pieces are dropped.
pub fn split_statements(src: &str) -> AnnotResult<Vec<&str>> {
    let mut bounds = Vec::new();
    walk(src, |piece| {
        if let Piece::Semicolon(at) = piece {
            bounds.push(at);
        }
    })?;

    let mut statements = Vec::new();
    let mut start = 0;
    for end in bounds.into_iter().chain(std::iter::once(src.len())) {
        let piece = &src[start..end];
        if !piece.trim().is_empty() {
            statements.push(piece);
        }
        start = (end + 1).min(src.len());
    }
    Ok(statements)
}

/// Replace every comment with spaces, keeping newlines, so that byte offsets
/// and line/column positions in the result match `src`.
pub fn blank_comments(src: &str, comments: &[Comment]) -> String {
    let mut out = String::with_capacity(src.len());
    let mut cursor = 0;
    for comment in comments {
        out.push_str(&src[cursor..comment.offset]);
        push_blank(&mut out, &src[comment.offset..comment.end()]);
        cursor = comment.end();
    }
    out.push_str(&src[cursor..]);
    out
}

/// Text handed to the database engine for type resolution.
///
/// Like [`blank_comments`], but a bind enclosure whose content is only
/// parameter placeholders (`?`, `?1`, `$1`, `:name`, `@name`) becomes `NULL`,
/// which every engine accepts in any expression position. Enclosures holding
/// literals keep them so the engine infers the literal's type. Offsets are not
/// preserved.
pub fn engine_text(src: &str, comments: &[Comment]) -> String {
    let mut out = String::with_capacity(src.len());
    let mut cursor = 0;
    let mut i = 0;
    while i < comments.len() {
        let comment = &comments[i];
        out.push_str(&src[cursor..comment.offset]);
        cursor = comment.end();

        let enclosure = match (&comment.annotation, comments.get(i + 1)) {
            (Some(Annotation::Bind(_)), Some(enclosure)) => enclosure,
            _ => {
                push_blank(&mut out, &src[comment.offset..comment.end()]);
                i += 1;
                continue;
            }
        };
        let content = &src[comment.end()..enclosure.offset];
        if placeholder_regex().is_match(content) {
            out.push_str(" NULL ");
        } else {
            push_blank(&mut out, &src[comment.offset..comment.end()]);
            out.push_str(content);
            push_blank(&mut out, &src[enclosure.offset..enclosure.end()]);
        }
        cursor = enclosure.end();
        i += 2;
    }
    out.push_str(&src[cursor..]);
    out
}

fn push_blank(out: &mut String, comment: &str) {
    for c in comment.chars() {
        match c {
            '\n' | '\r' => out.push(c),
            _ => out.extend(std::iter::repeat(' ').take(c.len_utf8())),
        }
    }
}

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_RE.get_or_init(|| {
        let one = r"(\?[0-9]*|\$[0-9]+|[:@][A-Za-z_][0-9A-Za-z_]*)";
        Regex::new(&format!(r"^\s*{one}(\s*,\s*{one})*\s*$")).expect("valid regex")
    })
}

#[cfg(test)]
#[path = "comment_test.rs"]
mod tests;
