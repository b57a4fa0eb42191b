//! Implementation mode.
//!
//! Every reference the core would report is refined into the sites that
//! implement the searched symbol: declarations with a body or initializer,
//! classes naming it in a heritage clause, and function, class, object or
//! array expressions checked against a type that names it.

use crate::entries::{Entry, EntryKind};
use crate::session::SearchSession;
use crate::utils::is_in_ambient_context;
use tsref_model::{NodeIndex, NodeKind, Program, SymbolId, TypeChecker};

/// Add the implementation sites reached from `reference`, crediting them to
/// `symbol`.
pub fn add_implementation_references(
    session: &mut SearchSession<'_>,
    symbol: SymbolId,
    reference: NodeIndex,
) {
    let program = session.program;
    let checker = session.checker;

    if let Some(decl) = program.declaration_of_name(reference) {
        if is_implementation(program, decl) {
            session.add_reference(symbol, reference, EntryKind::Node);
            return;
        }
    }
    if !matches!(program.kind(reference), Some(NodeKind::Identifier { .. })) {
        return;
    }

    let parent = program.parent(reference);
    if matches!(
        program.kind(parent),
        Some(NodeKind::ShorthandPropertyAssignment { .. })
    ) {
        for decl in shorthand_value_declarations(program, checker, parent) {
            session.add_reference(symbol, decl, EntryKind::Node);
        }
    }

    if let Some(class) = containing_class_if_in_heritage_clause(program, reference) {
        session.add_reference(symbol, class, EntryKind::Node);
        return;
    }

    // The outermost type node around the reference, and what it annotates.
    let mut type_node = reference;
    loop {
        let up = program.parent(type_node);
        match program.kind(up) {
            Some(kind) if kind.is_type_node() || is_type_element(kind) => type_node = up,
            _ => break,
        }
    }
    let type_having = program.parent(type_node);
    let Some(kind) = program.kind(type_having) else {
        return;
    };
    if kind.type_annotation() != Some(type_node)
        || !session.mark_seen_containing_type_reference(type_having)
    {
        return;
    }

    let mut found = Vec::new();
    if let Some(initializer) = kind.initializer() {
        found.push(initializer);
    } else if let Some(body) = kind.body().filter(|_| kind.is_function_like()) {
        if matches!(program.kind(body), Some(NodeKind::Block { .. })) {
            for_each_return_expression(program, body, &mut |e| found.push(e));
        } else {
            found.push(body);
        }
    } else if let NodeKind::AsExpression { expression, .. } = kind {
        found.push(*expression);
    }
    for expression in found {
        if is_implementation_expression(program, expression) {
            session.add_reference(symbol, expression, EntryKind::Node);
        }
    }
}

fn is_type_element(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::PropertySignature { .. } | NodeKind::MethodSignature { .. }
    )
}

/// Whether a declaration provides a value rather than only a shape.
pub fn is_implementation(program: &Program, decl: NodeIndex) -> bool {
    let Some(kind) = program.kind(decl) else {
        return false;
    };
    if is_in_ambient_context(program, decl) {
        return !matches!(
            kind,
            NodeKind::InterfaceDeclaration { .. } | NodeKind::TypeAliasDeclaration { .. }
        );
    }
    match kind {
        NodeKind::VariableDeclaration { .. }
        | NodeKind::Parameter { .. }
        | NodeKind::PropertyDeclaration { .. }
        | NodeKind::PropertySignature { .. }
        | NodeKind::PropertyAssignment { .. }
        | NodeKind::BindingElement { .. }
        | NodeKind::EnumMember { .. } => kind.initializer().is_some(),
        NodeKind::ShorthandPropertyAssignment { .. } => false,
        _ if kind.is_function_like() => kind.body().is_some(),
        _ => kind.is_class_like() || matches!(kind, NodeKind::EnumDeclaration { .. }),
    }
}

/// Expressions that can stand as an implementation of an interface.
fn is_implementation_expression(program: &Program, node: NodeIndex) -> bool {
    match program.kind(node) {
        Some(NodeKind::ParenthesizedExpression { expression }) => {
            is_implementation_expression(program, *expression)
        }
        Some(
            NodeKind::ArrowFunction { .. }
            | NodeKind::FunctionExpression { .. }
            | NodeKind::ObjectLiteralExpression { .. }
            | NodeKind::ClassExpression { .. }
            | NodeKind::ArrayLiteralExpression { .. },
        ) => true,
        _ => false,
    }
}

/// For `I` in `class C implements I`, the class `C` (or interface).
fn containing_class_if_in_heritage_clause(program: &Program, node: NodeIndex) -> Option<NodeIndex> {
    let mut current = node;
    loop {
        match program.kind(current)? {
            NodeKind::Identifier { .. } | NodeKind::PropertyAccessExpression { .. } => {
                current = program.parent(current);
            }
            NodeKind::ExpressionWithTypeArguments { .. } => {
                let clause = program.parent(current);
                if !matches!(program.kind(clause), Some(NodeKind::HeritageClause { .. })) {
                    return None;
                }
                let owner = program.parent(clause);
                let kind = program.kind(owner)?;
                return (kind.is_class_like()
                    || matches!(kind, NodeKind::InterfaceDeclaration { .. }))
                .then_some(owner);
            }
            _ => return None,
        }
    }
}

/// Every `return` expression of a function body, not looking into nested
/// functions or classes.
fn for_each_return_expression(
    program: &Program,
    node: NodeIndex,
    visit: &mut dyn FnMut(NodeIndex),
) {
    let Some(kind) = program.kind(node) else {
        return;
    };
    match kind {
        NodeKind::ReturnStatement { expression } => {
            if expression.is_some() {
                visit(*expression);
            }
        }
        NodeKind::Block { .. }
        | NodeKind::IfStatement { .. }
        | NodeKind::DoStatement { .. }
        | NodeKind::WhileStatement { .. }
        | NodeKind::ForStatement { .. }
        | NodeKind::ForOfStatement { .. }
        | NodeKind::LabeledStatement { .. } => {
            for child in kind.children() {
                for_each_return_expression(program, child, visit);
            }
        }
        _ => {}
    }
}

/// Value declarations of the local a shorthand property reads.
pub fn shorthand_value_declarations(
    program: &Program,
    checker: &dyn TypeChecker,
    shorthand: NodeIndex,
) -> Vec<NodeIndex> {
    let Some(value) = checker.shorthand_assignment_value_symbol(shorthand) else {
        return Vec::new();
    };
    checker
        .declarations(value)
        .iter()
        .copied()
        .filter(|&d| {
            !matches!(
                program.kind(d),
                Some(
                    NodeKind::InterfaceDeclaration { .. }
                        | NodeKind::TypeAliasDeclaration { .. }
                        | NodeKind::TypeParameter { .. }
                )
            )
        })
        .collect()
}

/// Flatten implementation groups into distinct nodes, in result order.
pub fn flatten_implementations(groups: &[crate::entries::SymbolAndEntries]) -> Vec<NodeIndex> {
    let mut nodes: Vec<NodeIndex> = Vec::new();
    for entry in groups.iter().flat_map(|g| g.references.iter()) {
        if let Entry::Node { node, .. } = entry {
            if !nodes.contains(node) {
                nodes.push(*node);
            }
        }
    }
    nodes
}

#[cfg(test)]
#[path = "../tests/implementation_tests.rs"]
mod implementation_tests;
