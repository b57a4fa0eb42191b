//! Document highlights: the occurrences of the symbol under the cursor in
//! one file, classified for the editor.

use crate::access::{is_definition, is_write_access_for_reference};
use crate::entries::{Entry, SymbolAndEntries};
use serde::Serialize;
use tsref_model::{FileId, Program, Range, TextSpan, TypeChecker};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightKind {
    Read,
    Write,
    Definition,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightSpan {
    pub text_span: TextSpan,
    pub range: Range,
    pub kind: HighlightKind,
}

/// Highlight spans for the entries of `groups` that lie in `file`, in
/// source order. Free-text matches are left out.
pub fn highlight_spans(
    program: &Program,
    checker: &dyn TypeChecker,
    file: FileId,
    groups: &[SymbolAndEntries],
) -> Vec<HighlightSpan> {
    let Some(source) = program.file(file) else {
        return Vec::new();
    };
    let mut spans: Vec<HighlightSpan> = Vec::new();
    for group in groups {
        for entry in &group.references {
            let Entry::Node { node, .. } = *entry else {
                continue;
            };
            if entry.file(program) != Some(file) {
                continue;
            }
            let Some(text_span) = entry.text_span(program) else {
                continue;
            };
            if spans.iter().any(|s| s.text_span == text_span) {
                continue;
            }
            let kind = if group
                .definition
                .as_ref()
                .is_some_and(|d| is_definition(program, checker, node, d))
            {
                HighlightKind::Definition
            } else if is_write_access_for_reference(program, node) {
                HighlightKind::Write
            } else {
                HighlightKind::Read
            };
            spans.push(HighlightSpan {
                text_span,
                range: source.line_map.span_to_range(text_span, &source.text),
                kind,
            });
        }
    }
    spans.sort_by_key(|s| s.text_span.start);
    spans
}

#[cfg(test)]
#[path = "../tests/highlights_tests.rs"]
mod highlights_tests;
