//! Read/write and definition classification of reference nodes.

use crate::entries::Definition;
use crate::utils::is_in_ambient_context;
use tsref_model::{BinaryOperator, NodeIndex, NodeKind, Program, TypeChecker};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
    ReadWrite,
}

impl AccessKind {
    fn reversed(self) -> AccessKind {
        match self {
            AccessKind::Read => AccessKind::Write,
            AccessKind::Write => AccessKind::Read,
            AccessKind::ReadWrite => AccessKind::ReadWrite,
        }
    }
}

/// Whether a reference writes the symbol: declarations that bind a value,
/// assignment targets, update operands and destructuring targets.
pub fn is_write_access_for_reference(program: &Program, node: NodeIndex) -> bool {
    if program
        .declaration_of_name(node)
        .is_some_and(|decl| declaration_is_write_access(program, decl))
    {
        return true;
    }
    access_kind(program, node) != AccessKind::Read
}

/// Whether `node` names one of the declarations of the group's definition.
pub fn is_definition(
    program: &Program,
    checker: &dyn TypeChecker,
    node: NodeIndex,
    definition: &Definition,
) -> bool {
    match *definition {
        Definition::Symbol(symbol) => program
            .declaration_of_name(node)
            .is_some_and(|decl| checker.declarations(symbol).contains(&decl)),
        Definition::Label(label) => label == node,
        Definition::Keyword(_) | Definition::This(_) | Definition::String(_) => false,
    }
}

fn declaration_is_write_access(program: &Program, decl: NodeIndex) -> bool {
    if is_in_ambient_context(program, decl) {
        return true;
    }
    let Some(kind) = program.kind(decl) else {
        return false;
    };
    match kind {
        NodeKind::BindingElement { .. }
        | NodeKind::ClassDeclaration { .. }
        | NodeKind::ClassExpression { .. }
        | NodeKind::EnumDeclaration { .. }
        | NodeKind::EnumMember { .. }
        | NodeKind::ExportSpecifier { .. }
        | NodeKind::ImportClause { .. }
        | NodeKind::ImportSpecifier { .. }
        | NodeKind::InterfaceDeclaration { .. }
        | NodeKind::NamespaceImport { .. }
        | NodeKind::Parameter { .. }
        | NodeKind::ShorthandPropertyAssignment { .. }
        | NodeKind::TypeAliasDeclaration { .. }
        | NodeKind::TypeParameter { .. } => true,
        NodeKind::PropertyAssignment { .. } => {
            !is_destructuring_pattern_literal(program, program.parent(decl))
        }
        NodeKind::FunctionDeclaration { .. }
        | NodeKind::FunctionExpression { .. }
        | NodeKind::Constructor { .. }
        | NodeKind::MethodDeclaration { .. }
        | NodeKind::GetAccessor { .. }
        | NodeKind::SetAccessor { .. } => kind.body().is_some(),
        NodeKind::VariableDeclaration { .. } | NodeKind::PropertyDeclaration { .. } => {
            kind.initializer().is_some()
        }
        _ => false,
    }
}

/// An object or array literal written as an assignment target, directly or
/// nested inside one (`({ a: x } = o)`, `for ([a, b] of pairs)`).
fn is_destructuring_pattern_literal(program: &Program, literal: NodeIndex) -> bool {
    if !matches!(
        program.kind(literal),
        Some(NodeKind::ObjectLiteralExpression { .. } | NodeKind::ArrayLiteralExpression { .. })
    ) {
        return false;
    }
    let parent = program.parent(literal);
    match program.kind(parent) {
        Some(NodeKind::BinaryExpression {
            operator: BinaryOperator::Assign,
            left,
            ..
        }) => *left == literal,
        Some(NodeKind::ForOfStatement { initializer, .. }) => *initializer == literal,
        Some(NodeKind::PropertyAssignment { initializer, .. }) if *initializer == literal => {
            is_destructuring_pattern_literal(program, program.parent(parent))
        }
        Some(NodeKind::ArrayLiteralExpression { .. }) => {
            is_destructuring_pattern_literal(program, parent)
        }
        _ => false,
    }
}

/// How an expression position uses its value.
pub fn access_kind(program: &Program, node: NodeIndex) -> AccessKind {
    let parent = program.parent(node);
    let Some(kind) = program.kind(parent) else {
        return AccessKind::Read;
    };
    match kind {
        NodeKind::ParenthesizedExpression { .. } => access_kind(program, parent),
        NodeKind::PrefixUnaryExpression { operator, .. }
        | NodeKind::PostfixUnaryExpression { operator, .. } => {
            if operator.is_update() {
                write_or_read_write(program, parent)
            } else {
                AccessKind::Read
            }
        }
        NodeKind::BinaryExpression {
            operator, left, ..
        } => {
            if *left == node && operator.is_assignment() {
                if *operator == BinaryOperator::Assign {
                    AccessKind::Write
                } else {
                    write_or_read_write(program, parent)
                }
            } else {
                AccessKind::Read
            }
        }
        NodeKind::PropertyAccessExpression { name, .. } => {
            if *name == node {
                access_kind(program, parent)
            } else {
                AccessKind::Read
            }
        }
        NodeKind::PropertyAssignment { name, .. } => {
            let object_access = access_kind(program, program.parent(parent));
            if *name == node {
                object_access.reversed()
            } else {
                object_access
            }
        }
        NodeKind::ShorthandPropertyAssignment { .. } => access_kind(program, program.parent(parent)),
        NodeKind::ArrayLiteralExpression { .. } => access_kind(program, parent),
        NodeKind::ForOfStatement { initializer, .. } => {
            if *initializer == node {
                AccessKind::Write
            } else {
                AccessKind::Read
            }
        }
        _ => AccessKind::Read,
    }
}

/// `x++;` only writes; `y = x++` reads and writes.
fn write_or_read_write(program: &Program, expression: NodeIndex) -> AccessKind {
    let mut outer = program.parent(expression);
    while let Some(NodeKind::ParenthesizedExpression { .. }) = program.kind(outer) {
        outer = program.parent(outer);
    }
    if matches!(program.kind(outer), Some(NodeKind::ExpressionStatement { .. })) {
        AccessKind::Write
    } else {
        AccessKind::ReadWrite
    }
}

#[cfg(test)]
#[path = "../tests/access_tests.rs"]
mod access_tests;
