//! Reference groups and their serializable forms.
//!
//! The search core produces [`SymbolAndEntries`] groups holding raw
//! [`Entry`] values (syntax nodes or free-text spans). Hosts receive
//! [`ReferencedSymbol`] values instead, which carry:
//! - `definition`: what the group is about, with its location
//! - `references`: every occurrence with line text and access flags

use crate::access::{is_definition, is_write_access_for_reference};
use crate::utils::strip_quotes;
use serde::Serialize;
use tsref_model::{
    FileId, Location, NodeIndex, NodeKind, Program, Range, SymbolId, TextSpan, TypeChecker,
};

/// How a node entry was reached, which matters for rename prefix/suffix text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EntryKind {
    #[default]
    Node,
    StringLiteral,
    /// Searching for a local, found the property of a shorthand or
    /// binding element (`{ x }` while renaming the variable `x`).
    SearchedLocalFoundProperty,
    /// Searching for a property, found the local it binds.
    SearchedPropertyFoundLocal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entry {
    Node { node: NodeIndex, kind: EntryKind },
    /// A match in a comment or a string, with no syntax node of its own.
    Span {
        file: FileId,
        span: TextSpan,
        in_string: bool,
    },
}

impl Entry {
    pub fn node(node: NodeIndex) -> Entry {
        Entry::Node {
            node,
            kind: EntryKind::Node,
        }
    }

    pub fn with_kind(node: NodeIndex, kind: EntryKind) -> Entry {
        Entry::Node { node, kind }
    }

    pub fn as_node(&self) -> Option<NodeIndex> {
        match *self {
            Entry::Node { node, .. } => Some(node),
            Entry::Span { .. } => None,
        }
    }

    pub fn file(&self, program: &Program) -> Option<FileId> {
        match *self {
            Entry::Node { node, .. } => program.node(node).map(|n| n.file),
            Entry::Span { file, .. } => Some(file),
        }
    }

    /// The edited text span: quotes are excluded for string literals.
    pub fn text_span(&self, program: &Program) -> Option<TextSpan> {
        match *self {
            Entry::Node { node, .. } => reference_span(program, node),
            Entry::Span { span, .. } => Some(span),
        }
    }
}

/// Span of a reference node. String literals report their contents only.
pub fn reference_span(program: &Program, node: NodeIndex) -> Option<TextSpan> {
    let span = program.span(node)?;
    match program.kind(node)? {
        NodeKind::StringLiteral { .. } if span.len() >= 2 => {
            Some(TextSpan::new(span.start + 1, span.end - 1))
        }
        _ => Some(span),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Definition {
    Symbol(SymbolId),
    /// The label of a labeled statement.
    Label(NodeIndex),
    /// The first occurrence of a type keyword.
    Keyword(NodeIndex),
    /// The `this` keyword the search started from, or a `this` parameter.
    This(NodeIndex),
    String(NodeIndex),
}

/// One result group. `definition` is `None` for comment and string matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolAndEntries {
    pub definition: Option<Definition>,
    pub references: Vec<Entry>,
}

impl SymbolAndEntries {
    pub fn new(definition: Option<Definition>, references: Vec<Entry>) -> Self {
        SymbolAndEntries {
            definition,
            references,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DefinitionKind {
    Symbol,
    Label,
    Keyword,
    This,
    String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DefinitionInfo {
    pub kind: DefinitionKind,
    pub name: String,
    pub file_name: String,
    pub text_span: TextSpan,
    pub range: Range,
}

impl DefinitionInfo {
    /// Display form of a definition. Symbols without any declaration have
    /// no location and produce `None`.
    pub fn from_definition(
        program: &Program,
        checker: &dyn TypeChecker,
        definition: &Definition,
    ) -> Option<DefinitionInfo> {
        let (kind, name, node) = match *definition {
            Definition::Symbol(symbol) => {
                let decl = *checker.declarations(symbol).first()?;
                let name = strip_quotes(&program.symbol(symbol)?.name).to_string();
                let node = program.name_of_declaration(decl).unwrap_or(decl);
                (DefinitionKind::Symbol, name, node)
            }
            Definition::Label(node) => (
                DefinitionKind::Label,
                program.name_text(node)?.to_string(),
                node,
            ),
            Definition::Keyword(node) => (
                DefinitionKind::Keyword,
                program.name_text(node)?.to_string(),
                node,
            ),
            Definition::This(node) => (DefinitionKind::This, "this".to_string(), node),
            Definition::String(node) => (
                DefinitionKind::String,
                program.node_source(node).to_string(),
                node,
            ),
        };
        let file = program.source_file_of(node)?;
        let text_span = reference_span(program, node)?;
        Some(DefinitionInfo {
            kind,
            name,
            file_name: file.name.clone(),
            text_span,
            range: file.line_map.span_to_range(text_span, &file.text),
        })
    }
}

/// A reference as reported to hosts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntryInfo {
    #[serde(flatten)]
    pub location: Location,
    pub text_span: TextSpan,
    /// The full source line containing the reference.
    pub line_text: String,
    pub is_write_access: bool,
    pub is_definition: bool,
    pub is_in_string: bool,
}

impl ReferenceEntryInfo {
    pub fn from_entry(
        program: &Program,
        checker: &dyn TypeChecker,
        entry: &Entry,
        definition: Option<&Definition>,
    ) -> Option<ReferenceEntryInfo> {
        let file = program.file(entry.file(program)?)?;
        let text_span = entry.text_span(program)?;
        let (is_write_access, is_definition, is_in_string) = match *entry {
            Entry::Node { node, kind } => (
                is_write_access_for_reference(program, node),
                definition.is_some_and(|d| is_definition(program, checker, node, d)),
                kind == EntryKind::StringLiteral,
            ),
            Entry::Span { in_string, .. } => (false, false, in_string),
        };
        Some(ReferenceEntryInfo {
            location: Location::new(
                file.name.clone(),
                file.line_map.span_to_range(text_span, &file.text),
            ),
            text_span,
            line_text: file.line_map.line_text(text_span.start, &file.text).to_string(),
            is_write_access,
            is_definition,
            is_in_string,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencedSymbol {
    pub definition: Option<DefinitionInfo>,
    pub references: Vec<ReferenceEntryInfo>,
}

impl ReferencedSymbol {
    pub fn from_group(
        program: &Program,
        checker: &dyn TypeChecker,
        group: &SymbolAndEntries,
    ) -> ReferencedSymbol {
        ReferencedSymbol {
            definition: group
                .definition
                .as_ref()
                .and_then(|d| DefinitionInfo::from_definition(program, checker, d)),
            references: group
                .references
                .iter()
                .filter_map(|e| {
                    ReferenceEntryInfo::from_entry(program, checker, e, group.definition.as_ref())
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImplementationLocation {
    #[serde(flatten)]
    pub location: Location,
    pub text_span: TextSpan,
}

impl ImplementationLocation {
    /// A declaration is reported at its name; an implementing expression
    /// at its whole extent.
    pub fn from_node(program: &Program, node: NodeIndex) -> Option<ImplementationLocation> {
        let target = match program.kind(node)? {
            NodeKind::FunctionExpression { .. } | NodeKind::ClassExpression { .. } => node,
            _ => program.name_of_declaration(node).unwrap_or(node),
        };
        let file = program.source_file_of(target)?;
        let text_span = reference_span(program, target)?;
        Some(ImplementationLocation {
            location: Location::new(
                file.name.clone(),
                file.line_map.span_to_range(text_span, &file.text),
            ),
            text_span,
        })
    }
}

#[cfg(test)]
#[path = "../tests/entries_tests.rs"]
mod entries_tests;
