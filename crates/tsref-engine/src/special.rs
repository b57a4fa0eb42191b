//! Searches for things that are not ordinary named symbols: labels, `this`,
//! `super`, type keywords, string literals and module specifiers.
//!
//! Each resolver is self-contained and returns finished groups; none of them
//! goes through scope reduction or import tracing.

use crate::entries::{Definition, Entry, EntryKind, SymbolAndEntries};
use crate::error::Result;
use crate::scanner::possible_occurrences;
use crate::session::SearchSession;
use crate::utils::{
    is_jump_statement_target, is_label_of_labeled_statement,
    is_literal_name_of_property_declaration_or_index_access, is_module_specifier_like,
    is_object_literal_method,
};
use tracing::trace;
use tsref_model::{
    FileId, NodeIndex, NodeKind, Program, SymbolId, TypeData, TypeKeyword,
};

/// Tokens at possible occurrences of `text` inside `container`.
fn possible_reference_nodes(
    program: &Program,
    file: FileId,
    text: &str,
    container: NodeIndex,
) -> Vec<NodeIndex> {
    let (Some(source), Some(span)) = (program.file(file), program.span(container)) else {
        return Vec::new();
    };
    possible_occurrences(&source.text, text, span)
        .filter_map(|pos| program.touching_token(file, pos))
        .collect()
}

fn file_of(program: &Program, node: NodeIndex) -> Option<FileId> {
    program.node(node).map(|n| n.file)
}

/// Dispatch for tokens that have a dedicated search. `None` means the token
/// is an ordinary name.
pub fn referenced_symbols_special(
    session: &SearchSession<'_>,
    node: NodeIndex,
) -> Result<Option<Vec<SymbolAndEntries>>> {
    let program = session.program;
    match program.kind(node) {
        Some(NodeKind::KeywordType { keyword }) => all_references_for_keyword(session, *keyword),
        Some(NodeKind::Identifier { text }) if is_jump_statement_target(program, node) => {
            Ok(jump_target_label(program, node, text)
                .map(|label| label_references(program, label)))
        }
        Some(NodeKind::Identifier { .. }) if is_label_of_labeled_statement(program, node) => {
            Ok(Some(label_references(program, node)))
        }
        Some(NodeKind::ThisKeyword) => references_for_this_keyword(session, node),
        Some(NodeKind::SuperKeyword) => Ok(references_for_super_keyword(program, node)),
        _ => Ok(None),
    }
}

/// Labels.
///
/// `break L` and `continue L` inside the labeled statement refer to `L`
/// unless a function or class boundary, or an inner statement labeled `L`,
/// hides it. `continue L` counts only when `L` labels a loop.
#[derive(Clone, Copy)]
struct JumpContext<'t> {
    label: &'t str,
    allow_continue: bool,
}

/// The label `break L`/`continue L` jumps to, within the same function.
fn jump_target_label(program: &Program, jump_label: NodeIndex, text: &str) -> Option<NodeIndex> {
    for ancestor in program.ancestors(jump_label) {
        let kind = program.kind(ancestor)?;
        if kind.is_function_like() || kind.is_class_like() {
            return None;
        }
        if let NodeKind::LabeledStatement { label, .. } = kind {
            if program.name_text(*label) == Some(text) {
                return Some(*label);
            }
        }
    }
    None
}

fn label_references(program: &Program, label: NodeIndex) -> Vec<SymbolAndEntries> {
    let mut references = vec![Entry::node(label)];
    let labeled = program.parent(label);
    if let (Some(text), Some(NodeKind::LabeledStatement { statement, .. })) =
        (program.name_text(label), program.kind(labeled))
    {
        let allow_continue = program
            .kind(*statement)
            .is_some_and(NodeKind::is_iteration_statement);
        let ctx = JumpContext {
            label: text,
            allow_continue,
        };
        collect_jumps(program, *statement, ctx, &mut references);
    }
    vec![SymbolAndEntries::new(
        Some(Definition::Label(label)),
        references,
    )]
}

fn collect_jumps(program: &Program, node: NodeIndex, ctx: JumpContext<'_>, out: &mut Vec<Entry>) {
    let Some(kind) = program.kind(node) else {
        return;
    };
    match kind {
        NodeKind::BreakStatement { label } if program.name_text(*label) == Some(ctx.label) => {
            out.push(Entry::node(*label));
        }
        NodeKind::ContinueStatement { label } if program.name_text(*label) == Some(ctx.label) => {
            if ctx.allow_continue {
                out.push(Entry::node(*label));
            }
        }
        NodeKind::LabeledStatement { label, .. } if program.name_text(*label) == Some(ctx.label) => {}
        _ if kind.is_function_like() || kind.is_class_like() => {}
        _ => {
            for child in kind.children() {
                collect_jumps(program, child, ctx, out);
            }
        }
    }
}

/// `this`.
///
/// The search space is the function, object literal or class that gives
/// `this` its meaning. In a class, a candidate must sit in a member with
/// the same staticness as the one the search started in.
fn references_for_this_keyword(
    session: &SearchSession<'_>,
    this_keyword: NodeIndex,
) -> Result<Option<Vec<SymbolAndEntries>>> {
    let program = session.program;
    let Some(container) = program.this_container(this_keyword) else {
        return Ok(None);
    };
    let Some(container_kind) = program.kind(container) else {
        return Ok(None);
    };
    let (search_space, is_static) = match container_kind {
        NodeKind::MethodDeclaration { .. } if is_object_literal_method(program, container) => {
            (program.parent(container), false)
        }
        NodeKind::MethodDeclaration { .. }
        | NodeKind::MethodSignature { .. }
        | NodeKind::PropertyDeclaration { .. }
        | NodeKind::PropertySignature { .. }
        | NodeKind::Constructor { .. }
        | NodeKind::GetAccessor { .. }
        | NodeKind::SetAccessor { .. } => (program.parent(container), program.is_static(container)),
        NodeKind::SourceFile { .. } => {
            let in_module = file_of(program, container).is_some_and(|f| program.is_module_file(f));
            if in_module || is_this_parameter(program, this_keyword) {
                return Ok(None);
            }
            (container, false)
        }
        NodeKind::FunctionDeclaration { .. } | NodeKind::FunctionExpression { .. } => {
            (container, false)
        }
        _ => return Ok(None),
    };
    let search_space_kind = program.kind(search_space);
    let is_script_search = matches!(search_space_kind, Some(NodeKind::SourceFile { .. }));

    let files: Vec<FileId> = if is_script_search {
        session.files().to_vec()
    } else {
        file_of(program, search_space).into_iter().collect()
    };

    let mut references = Vec::new();
    for file in files {
        session.check_cancellation()?;
        let Some(root) = program.file(file).map(|f| f.root) else {
            continue;
        };
        let scan_root = if is_script_search { root } else { search_space };
        for candidate in possible_reference_nodes(program, file, "this", scan_root) {
            if !matches!(program.kind(candidate), Some(NodeKind::ThisKeyword)) {
                continue;
            }
            let Some(candidate_container) = program.this_container(candidate) else {
                continue;
            };
            let matches = match search_space_kind {
                Some(NodeKind::FunctionDeclaration { .. } | NodeKind::FunctionExpression { .. }) => {
                    candidate_container == search_space
                }
                Some(
                    NodeKind::ClassDeclaration { .. }
                    | NodeKind::ClassExpression { .. }
                    | NodeKind::InterfaceDeclaration { .. }
                    | NodeKind::ObjectLiteralExpression { .. },
                ) => {
                    program.parent(candidate_container) == search_space
                        && program.is_static(candidate_container) == is_static
                }
                Some(NodeKind::SourceFile { .. }) => {
                    let candidate_kind = program.kind(candidate_container);
                    matches!(candidate_kind, Some(NodeKind::SourceFile { .. }))
                        && !program.is_module_file(file)
                        && !is_this_parameter(program, candidate)
                }
                _ => false,
            };
            if matches {
                references.push(Entry::node(candidate));
            }
        }
    }
    trace!(count = references.len(), "`this` references");
    let this_parameter = references
        .iter()
        .filter_map(Entry::as_node)
        .find(|&n| is_this_parameter(program, n));
    Ok(Some(vec![SymbolAndEntries::new(
        Some(Definition::This(this_parameter.unwrap_or(this_keyword))),
        references,
    )]))
}

fn is_this_parameter(program: &Program, node: NodeIndex) -> bool {
    matches!(
        program.kind(program.parent(node)),
        Some(NodeKind::Parameter { name, .. }) if *name == node
    )
}

/// `super`: uses in members of the same class with the same staticness.
fn references_for_super_keyword(
    program: &Program,
    super_keyword: NodeIndex,
) -> Option<Vec<SymbolAndEntries>> {
    let member = program.super_container(super_keyword)?;
    let is_static = program.is_static(member);
    let class = program.parent(member);
    let file = file_of(program, class)?;
    let references: Vec<Entry> = possible_reference_nodes(program, file, "super", class)
        .into_iter()
        .filter(|&node| matches!(program.kind(node), Some(NodeKind::SuperKeyword)))
        .filter(|&node| {
            program
                .super_container(node)
                .is_some_and(|m| program.is_static(m) == is_static && program.parent(m) == class)
        })
        .map(Entry::node)
        .collect();
    let definition = match program.declared_symbol(class) {
        Some(symbol) => Definition::Symbol(symbol),
        None => Definition::Keyword(super_keyword),
    };
    Some(vec![SymbolAndEntries::new(Some(definition), references)])
}

/// Every use of a type keyword, matched by kind alone.
fn all_references_for_keyword(
    session: &SearchSession<'_>,
    keyword: TypeKeyword,
) -> Result<Option<Vec<SymbolAndEntries>>> {
    let program = session.program;
    let mut references = Vec::new();
    for &file in session.files() {
        session.check_cancellation()?;
        let Some(root) = program.file(file).map(|f| f.root) else {
            continue;
        };
        references.extend(
            possible_reference_nodes(program, file, keyword.text(), root)
                .into_iter()
                .filter(|&n| {
                    matches!(program.kind(n), Some(NodeKind::KeywordType { keyword: k }) if *k == keyword)
                })
                .map(Entry::node),
        );
    }
    let Some(first) = references.first().and_then(Entry::as_node) else {
        return Ok(None);
    };
    Ok(Some(vec![SymbolAndEntries::new(
        Some(Definition::Keyword(first)),
        references,
    )]))
}

/// String literals with equal text.
///
/// When the literal has a contextual type, a candidate must share it or be
/// used as a property name; a contextual `string` type matches nothing.
pub fn references_for_string_literal(
    session: &SearchSession<'_>,
    node: NodeIndex,
) -> Result<Vec<SymbolAndEntries>> {
    let program = session.program;
    let checker = session.checker;
    let Some(text) = program.name_text(node) else {
        return Ok(Vec::new());
    };
    let contextual = checker.contextual_type(node);
    let is_plain_string = contextual.is_some_and(|ty| {
        matches!(
            program.types().get(ty),
            Some(TypeData::Primitive(TypeKeyword::String))
        )
    });
    let mut references = Vec::new();
    for &file in session.files() {
        session.check_cancellation()?;
        let Some(root) = program.file(file).map(|f| f.root) else {
            continue;
        };
        for candidate in possible_reference_nodes(program, file, text, root) {
            if !matches!(program.kind(candidate), Some(NodeKind::StringLiteral { text: t }) if t == text)
            {
                continue;
            }
            let accepted = match contextual {
                Some(ty) => {
                    !is_plain_string
                        && (checker.contextual_type(candidate) == Some(ty)
                            || is_literal_name_of_property_declaration_or_index_access(
                                program, candidate,
                            ))
                }
                None => true,
            };
            if accepted && !references.iter().any(|e: &Entry| e.as_node() == Some(candidate)) {
                references.push(Entry::with_kind(candidate, EntryKind::StringLiteral));
            }
        }
    }
    Ok(vec![SymbolAndEntries::new(
        Some(Definition::String(node)),
        references,
    )])
}

/// Module specifiers in `files` that resolve to `module`'s file.
pub fn module_references(
    session: &SearchSession<'_>,
    module: SymbolId,
) -> Result<Vec<SymbolAndEntries>> {
    let program = session.program;
    let Some(target) = program.symbol(module).and_then(|m| m.module_file) else {
        return Ok(Vec::new());
    };
    let mut references = Vec::new();
    for &file in session.files() {
        session.check_cancellation()?;
        let Some(root) = program.file(file).map(|f| f.root) else {
            continue;
        };
        for node in program.descendants(root) {
            if !is_module_specifier_like(program, node) {
                continue;
            }
            let resolved = program
                .name_text(node)
                .and_then(|text| program.module_file_for_specifier(file, text));
            if resolved == Some(target) {
                references.push(Entry::with_kind(node, EntryKind::StringLiteral));
            }
        }
    }
    Ok(vec![SymbolAndEntries::new(
        Some(Definition::Symbol(module)),
        references,
    )])
}

#[cfg(test)]
#[path = "../tests/special_tests.rs"]
mod special_tests;
