//! Comment ranges.
//!
//! Comments are not part of the syntax tree, so they are extracted from the
//! source text separately. Free-text search in comments ("find in comments"
//! for rename) consults these ranges.

use serde::{Deserialize, Serialize};

/// A range representing a comment in the source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRange {
    /// Start position (byte offset)
    pub pos: u32,
    /// End position (byte offset)
    pub end: u32,
    pub is_multi_line: bool,
}

impl CommentRange {
    pub fn new(pos: u32, end: u32, is_multi_line: bool) -> Self {
        CommentRange {
            pos,
            end,
            is_multi_line,
        }
    }

    /// Get the comment text from source.
    pub fn get_text<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.pos as usize..self.end as usize).unwrap_or("")
    }

    pub fn contains(&self, offset: u32) -> bool {
        self.pos <= offset && offset < self.end
    }
}

/// Extract all comment ranges from source text.
///
/// Quoted strings and template literals are skipped so that `"//"` inside a
/// literal is not mistaken for a comment. Regular expression literals are not
/// recognized.
pub fn get_comment_ranges(source: &str) -> Vec<CommentRange> {
    let mut comments = Vec::new();
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut pos = 0;

    while pos < len {
        let ch = bytes[pos];

        if ch == b'"' || ch == b'\'' || ch == b'`' {
            pos = skip_quoted(bytes, pos);
            continue;
        }

        if ch == b'/' && pos + 1 < len {
            let next = bytes[pos + 1];

            if next == b'/' {
                let start = pos as u32;
                pos += 2;
                while pos < len && bytes[pos] != b'\n' && bytes[pos] != b'\r' {
                    pos += 1;
                }
                comments.push(CommentRange::new(start, pos as u32, false));
                continue;
            } else if next == b'*' {
                let start = pos as u32;
                pos += 2;
                let mut closed = false;
                while pos + 1 < len {
                    if bytes[pos] == b'*' && bytes[pos + 1] == b'/' {
                        pos += 2;
                        closed = true;
                        break;
                    }
                    pos += 1;
                }
                if !closed {
                    // Unclosed comment runs to the end of the file.
                    pos = len;
                }
                comments.push(CommentRange::new(start, pos as u32, true));
                continue;
            }
        }

        pos += 1;
    }

    comments
}

/// Position just past the literal starting at `start`.
fn skip_quoted(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut pos = start + 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'\n' if quote != b'`' => return pos,
            c if c == quote => return pos + 1,
            _ => pos += 1,
        }
    }
    bytes.len()
}

/// The comment containing `offset`, if any. `comments` must be sorted by
/// position, as [`get_comment_ranges`] returns them.
pub fn comment_at(comments: &[CommentRange], offset: u32) -> Option<&CommentRange> {
    let idx = comments.partition_point(|c| c.end <= offset);
    comments.get(idx).filter(|c| c.contains(offset))
}

#[cfg(test)]
#[path = "../tests/comments_tests.rs"]
mod comments_tests;
