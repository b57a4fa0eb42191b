//! Rename support: prepare-rename checks, new-name validation and the
//! conversion of reference groups into rename locations with optional
//! prefix/suffix text.

use crate::entries::{Entry, EntryKind, SymbolAndEntries, reference_span};
use crate::error::FindReferencesError;
use crate::utils::{
    is_jump_statement_target, is_label_of_labeled_statement,
    is_literal_name_of_property_declaration_or_index_access, is_module_specifier_like,
    is_object_binding_element_without_property_name,
};
use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use serde::Serialize;
use thiserror::Error;
use tsref_model::{
    FileId, Location, ModifierFlags, NodeIndex, NodeKind, Program, Range, Symbol, SymbolFlags,
    SymbolId, TextSpan, TypeChecker, is_identifier_part, is_identifier_start,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenameError {
    #[error("You cannot rename this element.")]
    CannotRename,
    #[error("You cannot rename elements that are defined in the standard TypeScript library.")]
    StandardLibrary,
    #[error("You cannot rename elements that are defined in a 'node_modules' folder.")]
    NodeModules,
    #[error("'{name}' is not a valid identifier name")]
    InvalidIdentifier { name: String },
    #[error("'{name}' is not a valid private identifier name")]
    InvalidPrivateIdentifier { name: String },
    #[error("Rename target cannot be empty.")]
    EmptyName,
    #[error(transparent)]
    Search(#[from] FindReferencesError),
}

/// The kind of the renamed element, spelled like tsserver's `ScriptElementKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RenameSymbolKind {
    #[serde(rename = "let")]
    Let,
    #[serde(rename = "const")]
    Const,
    #[serde(rename = "var")]
    Var,
    #[serde(rename = "parameter")]
    Parameter,
    #[serde(rename = "function")]
    Function,
    #[serde(rename = "method")]
    Method,
    #[serde(rename = "property")]
    Property,
    #[serde(rename = "getter")]
    Getter,
    #[serde(rename = "setter")]
    Setter,
    #[serde(rename = "class")]
    Class,
    #[serde(rename = "interface")]
    Interface,
    #[serde(rename = "type")]
    TypeAlias,
    #[serde(rename = "enum")]
    Enum,
    #[serde(rename = "enum member")]
    EnumMember,
    #[serde(rename = "alias")]
    Alias,
    #[serde(rename = "type parameter")]
    TypeParameter,
    #[serde(rename = "label")]
    Label,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "unknown")]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrepareRenameInfo {
    pub display_name: String,
    /// Qualified name, e.g. `C.m` for a class member.
    pub full_display_name: String,
    pub kind: RenameSymbolKind,
    /// Comma-separated modifier keywords, e.g. `export,declare`.
    pub kind_modifiers: String,
    pub trigger_span: TextSpan,
    pub range: Range,
}

/// An edit site of a rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameLocation {
    #[serde(flatten)]
    pub location: Location,
    pub text_span: TextSpan,
    pub line_text: String,
    /// Inserted before the new name, e.g. `x: ` when `{ x }` becomes `{ x: y }`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix_text: Option<String>,
    /// Inserted after the new name, e.g. ` as x` when `export { x }`
    /// becomes `export { y as x }`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix_text: Option<String>,
}

impl RenameLocation {
    /// The text edit replacing this location with `new_name`, prefix and
    /// suffix folded in.
    pub fn to_edit(&self, new_name: &str) -> RenameEdit {
        let mut new_text = String::new();
        if let Some(prefix) = &self.prefix_text {
            new_text.push_str(prefix);
        }
        new_text.push_str(new_name);
        if let Some(suffix) = &self.suffix_text {
            new_text.push_str(suffix);
        }
        RenameEdit {
            location: self.location.clone(),
            text_span: self.text_span,
            new_text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameEdit {
    #[serde(flatten)]
    pub location: Location,
    pub text_span: TextSpan,
    pub new_text: String,
}

static RESERVED_WORDS: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
        "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
        "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this",
        "throw", "true", "try", "typeof", "var", "void", "while", "with",
        // strict mode
        "implements", "interface", "let", "package", "private", "protected", "public", "static",
        "yield",
    ]
    .into_iter()
    .collect()
});

/// Global names that parse as identifiers but are never renamed.
fn is_non_renamable_builtin(name: &str) -> bool {
    matches!(
        name,
        "undefined" | "NaN" | "Infinity" | "globalThis" | "arguments"
    )
}

fn is_standard_library_file(file_name: &str) -> bool {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    base.starts_with("lib.") && base.ends_with(".d.ts")
}

fn is_in_node_modules(file_name: &str) -> bool {
    file_name.starts_with("node_modules/") || file_name.contains("/node_modules/")
}

/// Check that the element at `offset` can be renamed and describe it.
pub fn prepare_rename(
    program: &Program,
    checker: &dyn TypeChecker,
    file: FileId,
    offset: u32,
) -> Result<PrepareRenameInfo, RenameError> {
    let node = program
        .touching_token(file, offset)
        .ok_or(RenameError::CannotRename)?;
    let kind = program.kind(node).ok_or(RenameError::CannotRename)?;
    let display_name = program
        .name_text(node)
        .ok_or(RenameError::CannotRename)?
        .to_string();
    if is_non_renamable_builtin(&display_name) || display_name == "default" {
        return Err(RenameError::CannotRename);
    }

    let symbol = match kind {
        NodeKind::Identifier { .. }
            if is_label_of_labeled_statement(program, node)
                || is_jump_statement_target(program, node) =>
        {
            None
        }
        NodeKind::Identifier { .. } | NodeKind::PrivateIdentifier { .. } => Some(
            checker
                .symbol_at_location(node)
                .ok_or(RenameError::CannotRename)?,
        ),
        NodeKind::StringLiteral { .. } => {
            if is_module_specifier_like(program, node) {
                return Err(RenameError::CannotRename);
            }
            match checker.symbol_at_location(node) {
                Some(symbol) => Some(symbol),
                // A string literal type member: renamed as text.
                None if checker.contextual_type(node).is_some() => None,
                None => return Err(RenameError::CannotRename),
            }
        }
        NodeKind::NumericLiteral { .. }
            if is_literal_name_of_property_declaration_or_index_access(program, node) =>
        {
            Some(
                checker
                    .symbol_at_location(node)
                    .ok_or(RenameError::CannotRename)?,
            )
        }
        _ => return Err(RenameError::CannotRename),
    };

    let (kind, kind_modifiers, full_display_name) = match symbol {
        Some(symbol) => {
            for &decl in checker.declarations(symbol) {
                let Some(source) = program.source_file_of(decl) else {
                    continue;
                };
                if is_standard_library_file(&source.name) {
                    return Err(RenameError::StandardLibrary);
                }
                if is_in_node_modules(&source.name) {
                    return Err(RenameError::NodeModules);
                }
            }
            let data = program.symbol(symbol).ok_or(RenameError::CannotRename)?;
            (
                symbol_kind(program, checker, symbol, data),
                kind_modifiers(program, checker, symbol),
                full_display_name(program, data, &display_name),
            )
        }
        None if matches!(kind, NodeKind::StringLiteral { .. }) => {
            (RenameSymbolKind::String, String::new(), display_name.clone())
        }
        None => (RenameSymbolKind::Label, String::new(), display_name.clone()),
    };

    let source = program.file(file).ok_or(RenameError::CannotRename)?;
    let trigger_span = reference_span(program, node).ok_or(RenameError::CannotRename)?;
    Ok(PrepareRenameInfo {
        display_name,
        full_display_name,
        kind,
        kind_modifiers,
        trigger_span,
        range: source.line_map.span_to_range(trigger_span, &source.text),
    })
}

fn symbol_kind(
    program: &Program,
    checker: &dyn TypeChecker,
    id: SymbolId,
    symbol: &Symbol,
) -> RenameSymbolKind {
    let flags = symbol.flags;
    let declarations = checker.declarations(id);
    if declarations
        .iter()
        .any(|&d| matches!(program.kind(d), Some(NodeKind::Parameter { .. })))
    {
        return RenameSymbolKind::Parameter;
    }
    if flags.contains(SymbolFlags::FUNCTION) {
        RenameSymbolKind::Function
    } else if flags.contains(SymbolFlags::CLASS) {
        RenameSymbolKind::Class
    } else if flags.contains(SymbolFlags::INTERFACE) {
        RenameSymbolKind::Interface
    } else if flags.contains(SymbolFlags::TYPE_ALIAS) {
        RenameSymbolKind::TypeAlias
    } else if flags.contains(SymbolFlags::ENUM) {
        RenameSymbolKind::Enum
    } else if flags.contains(SymbolFlags::ENUM_MEMBER) {
        RenameSymbolKind::EnumMember
    } else if flags.contains(SymbolFlags::METHOD) {
        RenameSymbolKind::Method
    } else if flags.contains(SymbolFlags::GET_ACCESSOR) {
        RenameSymbolKind::Getter
    } else if flags.contains(SymbolFlags::SET_ACCESSOR) {
        RenameSymbolKind::Setter
    } else if flags.contains(SymbolFlags::PROPERTY) {
        RenameSymbolKind::Property
    } else if flags.contains(SymbolFlags::TYPE_PARAMETER) {
        RenameSymbolKind::TypeParameter
    } else if flags.contains(SymbolFlags::ALIAS) {
        RenameSymbolKind::Alias
    } else if flags.contains(SymbolFlags::CONST) {
        RenameSymbolKind::Const
    } else if flags.contains(SymbolFlags::BLOCK_SCOPED_VARIABLE) {
        RenameSymbolKind::Let
    } else if flags.contains(SymbolFlags::FUNCTION_SCOPED_VARIABLE) {
        RenameSymbolKind::Var
    } else {
        RenameSymbolKind::Unknown
    }
}

fn kind_modifiers(program: &Program, checker: &dyn TypeChecker, symbol: SymbolId) -> String {
    const NAMED: [(ModifierFlags, &str); 5] = [
        (ModifierFlags::EXPORT, "export"),
        (ModifierFlags::AMBIENT, "declare"),
        (ModifierFlags::ABSTRACT, "abstract"),
        (ModifierFlags::STATIC, "static"),
        (ModifierFlags::DEFAULT, "default"),
    ];
    let flags = checker
        .declarations(symbol)
        .iter()
        .fold(ModifierFlags::empty(), |acc, &d| {
            acc | program.effective_modifiers(d)
        });
    NAMED
        .iter()
        .filter(|(flag, _)| flags.contains(*flag))
        .map(|(_, name)| *name)
        .collect::<Vec<_>>()
        .join(",")
}

/// `Outer.Inner.name`, skipping module symbols.
fn full_display_name(program: &Program, symbol: &Symbol, simple_name: &str) -> String {
    let mut parts = vec![simple_name.to_string()];
    let mut current = symbol.parent;
    for _ in 0..10 {
        let Some(parent) = current.and_then(|p| program.symbol(p)) else {
            break;
        };
        if !parent.is_module() && !parent.name.is_empty() {
            parts.push(parent.name.clone());
        }
        current = parent.parent;
    }
    parts.reverse();
    parts.join(".")
}

/// Validate `new_name` for the token being renamed. Private names come back
/// with their `#`.
pub fn validate_new_name(kind: &NodeKind, new_name: &str) -> Result<String, RenameError> {
    match kind {
        NodeKind::PrivateIdentifier { .. } => {
            let stripped = new_name.strip_prefix('#').unwrap_or(new_name);
            if !is_identifier_text(stripped) {
                return Err(RenameError::InvalidPrivateIdentifier {
                    name: new_name.to_string(),
                });
            }
            Ok(format!("#{stripped}"))
        }
        NodeKind::StringLiteral { .. } => {
            if new_name.is_empty() {
                return Err(RenameError::EmptyName);
            }
            Ok(new_name.to_string())
        }
        _ => {
            if new_name.is_empty() {
                return Err(RenameError::EmptyName);
            }
            if RESERVED_WORDS.contains(new_name) || !is_identifier_text(new_name) {
                return Err(RenameError::InvalidIdentifier {
                    name: new_name.to_string(),
                });
            }
            Ok(new_name.to_string())
        }
    }
}

fn is_identifier_text(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    is_identifier_start(first) && chars.all(is_identifier_part)
}

/// Flatten reference groups into rename locations, one per distinct span.
///
/// `original` is the token the rename started at; it decides prefix and
/// suffix text at shorthand, binding and specifier sites.
pub fn rename_locations(
    program: &Program,
    checker: &dyn TypeChecker,
    groups: &[SymbolAndEntries],
    original: NodeIndex,
    provide_prefix_and_suffix: bool,
) -> Vec<RenameLocation> {
    let mut seen: FxHashSet<(FileId, TextSpan)> = FxHashSet::default();
    let mut out = Vec::new();
    for entry in groups.iter().flat_map(|g| g.references.iter()) {
        let (Some(file_id), Some(text_span)) = (entry.file(program), entry.text_span(program))
        else {
            continue;
        };
        if !seen.insert((file_id, text_span)) {
            continue;
        }
        let Some(file) = program.file(file_id) else {
            continue;
        };
        let (prefix_text, suffix_text) = if provide_prefix_and_suffix {
            prefix_and_suffix_text(program, checker, entry, original)
        } else {
            (None, None)
        };
        out.push(RenameLocation {
            location: Location::new(
                file.name.clone(),
                file.line_map.span_to_range(text_span, &file.text),
            ),
            text_span,
            line_text: file.line_map.line_text(text_span.start, &file.text).to_string(),
            prefix_text,
            suffix_text,
        });
    }
    out
}

type PrefixAndSuffix = (Option<String>, Option<String>);

fn prefix_and_suffix_text(
    program: &Program,
    checker: &dyn TypeChecker,
    entry: &Entry,
    original: NodeIndex,
) -> PrefixAndSuffix {
    let Entry::Node { node, kind } = *entry else {
        return (None, None);
    };
    let Some(NodeKind::Identifier { text: name }) = program.kind(original) else {
        return (None, None);
    };
    let parent = program.parent(node);
    let prefix = |separator: &str| -> PrefixAndSuffix { (Some(format!("{name}{separator}")), None) };
    let suffix = |separator: &str| -> PrefixAndSuffix { (None, Some(format!("{separator}{name}"))) };

    let is_shorthand = matches!(
        program.kind(parent),
        Some(NodeKind::ShorthandPropertyAssignment { .. })
    );
    let is_binding_shorthand = is_object_binding_element_without_property_name(program, parent)
        && matches!(program.kind(parent), Some(NodeKind::BindingElement { name, .. }) if *name == node);
    if is_shorthand || is_binding_shorthand {
        return match kind {
            EntryKind::SearchedLocalFoundProperty => prefix(": "),
            EntryKind::SearchedPropertyFoundLocal => suffix(": "),
            // `{ x }` read as the property keeps the property name.
            _ if is_shorthand => suffix(": "),
            _ => prefix(": "),
        };
    }

    match program.kind(parent) {
        Some(NodeKind::ImportSpecifier { property_name, .. }) if property_name.is_none() => {
            // Started at the import itself: rename only the local binding.
            let original_parent = program.parent(original);
            let original_symbol =
                if matches!(program.kind(original_parent), Some(NodeKind::ExportSpecifier { .. })) {
                    checker.export_specifier_local_target(original_parent)
                } else {
                    checker.symbol_at_location(original)
                };
            let starts_here = original_symbol
                .is_some_and(|s| checker.declarations(s).contains(&parent));
            if starts_here {
                prefix(" as ")
            } else {
                (None, None)
            }
        }
        Some(NodeKind::ExportSpecifier { property_name, .. }) if property_name.is_none() => {
            let same_symbol = original == node
                || checker.symbol_at_location(original) == checker.symbol_at_location(node);
            if same_symbol {
                prefix(" as ")
            } else {
                suffix(" as ")
            }
        }
        _ => (None, None),
    }
}

#[cfg(test)]
#[path = "../tests/rename_tests.rs"]
mod rename_tests;
