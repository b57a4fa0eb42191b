//! Scope reduction: the smallest region that can contain every named
//! reference to a symbol.
//!
//! Narrowing only skips work. A `Global` answer is always safe.

use crate::utils::{has_effective_modifier, is_object_binding_element_without_property_name};
use tracing::trace;
use tsref_model::{
    FileId, ModifierFlags, NodeIndex, NodeKind, Program, SymbolFlags, SymbolId, TypeChecker,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolScope {
    /// Every reference lies inside this node.
    Local(NodeIndex),
    /// Every local reference lies in this module file. Other files can only
    /// reach the symbol through imports.
    Module(FileId),
    Global,
}

pub fn symbol_scope(program: &Program, checker: &dyn TypeChecker, symbol: SymbolId) -> SymbolScope {
    let scope = compute_scope(program, checker, symbol);
    trace!(?symbol, ?scope, "symbol scope");
    scope
}

fn compute_scope(program: &Program, checker: &dyn TypeChecker, symbol_id: SymbolId) -> SymbolScope {
    let Some(symbol) = program.symbol(symbol_id) else {
        return SymbolScope::Global;
    };
    if matches!(
        program.kind(symbol.value_declaration),
        Some(NodeKind::FunctionExpression { .. } | NodeKind::ClassExpression { .. })
    ) {
        return SymbolScope::Local(symbol.value_declaration);
    }

    let declarations = checker.declarations(symbol_id);
    if declarations.is_empty() || symbol.flags.contains(SymbolFlags::TYPE_PARAMETER) {
        return SymbolScope::Global;
    }

    if symbol.has_flags(SymbolFlags::PROPERTY | SymbolFlags::METHOD) {
        let private = declarations
            .iter()
            .copied()
            .find(|&decl| is_private_member(program, decl));
        return match private.and_then(|decl| program.class_of_member(decl)) {
            Some(class) => SymbolScope::Local(class),
            None => SymbolScope::Global,
        };
    }

    if declarations
        .iter()
        .any(|&decl| is_object_binding_element_without_property_name(program, decl))
    {
        return SymbolScope::Global;
    }

    let exposed_by_parent = match symbol.parent {
        Some(parent) => {
            if !program.symbol(parent).is_some_and(|p| p.is_module()) {
                return SymbolScope::Global;
            }
            true
        }
        None => false,
    };

    let mut scope: Option<NodeIndex> = None;
    for &decl in declarations {
        let Some(container) = program.container_of(decl) else {
            return SymbolScope::Global;
        };
        if scope.is_some_and(|s| s != container) {
            return SymbolScope::Global;
        }
        if let Some(NodeKind::SourceFile { .. }) = program.kind(container) {
            let is_module = program
                .node(container)
                .is_some_and(|n| program.is_module_file(n.file));
            if !is_module {
                return SymbolScope::Global;
            }
        }
        scope = Some(container);
    }

    let Some(scope) = scope else {
        return SymbolScope::Global;
    };
    let Some(file) = program.node(scope).map(|n| n.file) else {
        return SymbolScope::Global;
    };
    if exposed_by_parent || matches!(program.kind(scope), Some(NodeKind::SourceFile { .. })) {
        SymbolScope::Module(file)
    } else {
        SymbolScope::Local(scope)
    }
}

/// `private p` or `#p`.
fn is_private_member(program: &Program, decl: NodeIndex) -> bool {
    if has_effective_modifier(program, decl, ModifierFlags::PRIVATE) {
        return true;
    }
    program
        .name_of_declaration(decl)
        .and_then(|name| program.kind(name))
        .is_some_and(|k| matches!(k, NodeKind::PrivateIdentifier { .. }))
}

#[cfg(test)]
#[path = "../tests/scope_tests.rs"]
mod scope_tests;
