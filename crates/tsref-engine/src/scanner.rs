//! Possible-occurrence scanning.
//!
//! Before any semantic work, a file (or a container inside it) is searched
//! textually for the name. Every hit whose neighbours are not identifier
//! characters is a candidate; candidates are resolved one by one later.

use tsref_model::{
    FileId, NodeKind, Program, TextSpan, comment_at, is_identifier_part,
};

/// Offsets of `needle` inside `span` of `text`, on identifier boundaries.
///
/// Boundaries are checked against the whole text, not the span, so a span
/// that cuts through an identifier does not produce a false hit. After a hit
/// the scan resumes past the name, so overlapping hits of a repeating name
/// are not reported.
pub struct PossibleOccurrences<'t> {
    text: &'t str,
    needle: &'t str,
    pos: usize,
    end: usize,
}

pub fn possible_occurrences<'t>(
    text: &'t str,
    needle: &'t str,
    span: TextSpan,
) -> PossibleOccurrences<'t> {
    let end = (span.end as usize).min(text.len());
    let pos = if needle.is_empty() {
        end + 1
    } else {
        span.start as usize
    };
    PossibleOccurrences {
        text,
        needle,
        pos,
        end,
    }
}

impl Iterator for PossibleOccurrences<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        loop {
            if self.pos > self.end {
                return None;
            }
            let found = self.text.get(self.pos..)?.find(self.needle)?;
            let start = self.pos + found;
            if start > self.end {
                self.pos = self.end + 1;
                return None;
            }
            let hit_end = start + self.needle.len();
            self.pos = hit_end;
            let before = self.text[..start].chars().next_back();
            let after = self.text[hit_end..].chars().next();
            if before.is_some_and(is_identifier_part) || after.is_some_and(is_identifier_part) {
                continue;
            }
            return Some(start as u32);
        }
    }
}

/// Whether `offset` is inside a string literal token (not on its quotes).
pub fn is_in_string(program: &Program, file: FileId, offset: u32) -> bool {
    let Some(token) = program.touching_token(file, offset) else {
        return false;
    };
    match (program.kind(token), program.span(token)) {
        (Some(NodeKind::StringLiteral { .. }), Some(span)) => {
            span.start < offset && offset + 1 < span.end
        }
        _ => false,
    }
}

/// Whether `offset` is inside a comment other than a `/// <reference .../>`
/// directive.
pub fn is_in_non_reference_comment(program: &Program, file: FileId, offset: u32) -> bool {
    let Some(source) = program.file(file) else {
        return false;
    };
    let Some(comment) = comment_at(&source.comments, offset) else {
        return false;
    };
    !is_reference_directive(comment.get_text(&source.text))
}

fn is_reference_directive(comment: &str) -> bool {
    comment
        .strip_prefix("///")
        .is_some_and(|rest| rest.trim_start().starts_with("<reference"))
}

#[cfg(test)]
#[path = "../tests/scanner_tests.rs"]
mod scanner_tests;
