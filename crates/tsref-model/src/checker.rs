//! The semantic query interface reference search consumes, and the
//! implementation [`Program`] provides from its binder and checker tables.

use crate::program::Program;
use crate::symbols::SymbolId;
use crate::syntax::{NodeIndex, NodeKind};
use crate::types::{TypeData, TypeId};
use rustc_hash::FxHashSet;

/// Semantic queries answered by the type checker.
///
/// Every lookup that can legitimately find nothing returns `None` or an
/// empty list; callers treat that as control flow.
pub trait TypeChecker {
    /// The symbol a name, keyword or literal token resolves to.
    fn symbol_at_location(&self, node: NodeIndex) -> Option<SymbolId>;

    fn declarations(&self, symbol: SymbolId) -> &[NodeIndex];

    fn type_at_location(&self, node: NodeIndex) -> Option<TypeId>;

    /// The instance type of a class or interface symbol.
    fn declared_type_of_symbol(&self, symbol: SymbolId) -> Option<TypeId>;

    fn type_symbol(&self, ty: TypeId) -> Option<SymbolId>;

    fn base_types(&self, ty: TypeId) -> Vec<TypeId>;

    fn union_members(&self, ty: TypeId) -> Option<Vec<TypeId>>;

    /// A property of a type, including inherited ones. On a union this is
    /// the synthesized union property.
    fn property_of_type(&self, ty: TypeId, name: &str) -> Option<SymbolId>;

    /// The declared symbols behind a synthesized one; `[symbol]` otherwise.
    fn root_symbols(&self, symbol: SymbolId) -> Vec<SymbolId>;

    /// The type an expression is expected to have from its position.
    fn contextual_type(&self, node: NodeIndex) -> Option<TypeId>;

    /// For `{ x }`, the symbol of the value `x` read by the shorthand.
    fn shorthand_assignment_value_symbol(&self, node: NodeIndex) -> Option<SymbolId>;

    fn immediate_aliased_symbol(&self, alias: SymbolId) -> Option<SymbolId>;

    /// For `export { a as b }`, the symbol `a` refers to.
    fn export_specifier_local_target(&self, specifier: NodeIndex) -> Option<SymbolId>;

    /// Follow an alias chain to the original symbol.
    fn aliased_symbol(&self, alias: SymbolId) -> Option<SymbolId> {
        let mut seen = FxHashSet::default();
        let mut current = self.immediate_aliased_symbol(alias)?;
        while seen.insert(current) {
            match self.immediate_aliased_symbol(current) {
                Some(next) => current = next,
                None => return Some(current),
            }
        }
        Some(current)
    }
}

impl Program {
    fn property_of_type_rec(
        &self,
        ty: TypeId,
        name: &str,
        visited: &mut FxHashSet<TypeId>,
    ) -> Option<SymbolId> {
        if !visited.insert(ty) {
            return None;
        }
        match self.types.get(ty)? {
            TypeData::Primitive(_) => None,
            TypeData::Union { properties, .. } => properties.get(name).copied(),
            TypeData::Object {
                symbol, properties, ..
            } => {
                if let Some(&prop) = properties.get(name) {
                    return Some(prop);
                }
                if let Some(&member) = symbol
                    .and_then(|s| self.symbols.get(s))
                    .and_then(|s| s.members.get(name))
                {
                    return Some(member);
                }
                self.base_types(ty)
                    .into_iter()
                    .find_map(|base| self.property_of_type_rec(base, name, visited))
            }
        }
    }

    fn enclosing_function_return_type(&self, node: NodeIndex) -> Option<TypeId> {
        let func = self.find_ancestor(node, NodeKind::is_function_like)?;
        let annotation = self.kind(func)?.type_annotation()?;
        self.type_at_location(annotation)
    }
}

impl TypeChecker for Program {
    fn symbol_at_location(&self, node: NodeIndex) -> Option<SymbolId> {
        if let Some(&sym) = self.resolutions.get(&node) {
            return Some(sym);
        }
        let decl = self.declaration_of_name(node)?;
        self.node_symbols.get(&decl).copied()
    }

    fn declarations(&self, symbol: SymbolId) -> &[NodeIndex] {
        self.symbols
            .get(symbol)
            .map_or(&[], |s| s.declarations.as_slice())
    }

    fn type_at_location(&self, node: NodeIndex) -> Option<TypeId> {
        if let Some(&ty) = self.node_types.get(&node) {
            return Some(ty);
        }
        match self.kind(node)? {
            NodeKind::ExpressionWithTypeArguments { expression: name }
            | NodeKind::TypeReference { type_name: name } => {
                let sym = self.symbol_at_location(*name)?;
                let sym = self.aliased_symbol(sym).unwrap_or(sym);
                self.declared_type_of_symbol(sym)
            }
            NodeKind::Identifier { .. } => {
                let sym = self.symbol_at_location(node)?;
                let sym = self.aliased_symbol(sym).unwrap_or(sym);
                let decl = self.symbols.get(sym)?.value_declaration;
                let annotation = self.kind(decl)?.type_annotation()?;
                self.type_at_location(annotation)
            }
            NodeKind::ParenthesizedExpression { expression } => self.type_at_location(*expression),
            _ => None,
        }
    }

    fn declared_type_of_symbol(&self, symbol: SymbolId) -> Option<TypeId> {
        self.declared_types.get(&symbol).copied()
    }

    fn type_symbol(&self, ty: TypeId) -> Option<SymbolId> {
        self.types.symbol_of(ty)
    }

    fn base_types(&self, ty: TypeId) -> Vec<TypeId> {
        let Some(TypeData::Object {
            symbol, base_types, ..
        }) = self.types.get(ty)
        else {
            return Vec::new();
        };
        if !base_types.is_empty() {
            return base_types.clone();
        }
        let Some(symbol) = symbol.and_then(|s| self.symbols.get(s)) else {
            return Vec::new();
        };
        let mut bases: Vec<TypeId> = Vec::new();
        for &decl in &symbol.declarations {
            for type_node in self.super_type_nodes(decl) {
                if let Some(base) = self.type_at_location(type_node) {
                    if !bases.contains(&base) {
                        bases.push(base);
                    }
                }
            }
        }
        bases
    }

    fn union_members(&self, ty: TypeId) -> Option<Vec<TypeId>> {
        self.types.union_members(ty).map(<[TypeId]>::to_vec)
    }

    fn property_of_type(&self, ty: TypeId, name: &str) -> Option<SymbolId> {
        self.property_of_type_rec(ty, name, &mut FxHashSet::default())
    }

    fn root_symbols(&self, symbol: SymbolId) -> Vec<SymbolId> {
        self.root_symbols
            .get(&symbol)
            .cloned()
            .unwrap_or_else(|| vec![symbol])
    }

    fn contextual_type(&self, node: NodeIndex) -> Option<TypeId> {
        if let Some(&ty) = self.contextual_types.get(&node) {
            return Some(ty);
        }
        let parent = self.parent(node);
        match self.kind(parent)? {
            NodeKind::VariableDeclaration {
                type_annotation,
                initializer,
                ..
            }
            | NodeKind::PropertyDeclaration {
                type_annotation,
                initializer,
                ..
            }
            | NodeKind::Parameter {
                type_annotation,
                initializer,
                ..
            } if *initializer == node => self.type_at_location(type_annotation.some()?),
            NodeKind::ReturnStatement { .. } => self.enclosing_function_return_type(parent),
            NodeKind::ArrowFunction { body, .. } if *body == node => {
                self.enclosing_function_return_type(node)
            }
            NodeKind::AsExpression { type_node, .. } => self.type_at_location(*type_node),
            NodeKind::ParenthesizedExpression { .. } => self.contextual_type(parent),
            NodeKind::PropertyAssignment { initializer, name } if *initializer == node => {
                let object = self.parent(parent);
                let object_type = self.contextual_type(object)?;
                let name = self.name_text(*name)?;
                let prop = self.property_of_type(object_type, name)?;
                let decl = self.symbols.get(prop)?.value_declaration;
                let annotation = self.kind(decl)?.type_annotation()?;
                self.type_at_location(annotation)
            }
            _ => None,
        }
    }

    fn shorthand_assignment_value_symbol(&self, node: NodeIndex) -> Option<SymbolId> {
        self.shorthand_values.get(&node).copied()
    }

    fn immediate_aliased_symbol(&self, alias: SymbolId) -> Option<SymbolId> {
        self.aliases.get(&alias).copied()
    }

    fn export_specifier_local_target(&self, specifier: NodeIndex) -> Option<SymbolId> {
        self.export_local_targets.get(&specifier).copied()
    }
}

#[cfg(test)]
#[path = "../tests/checker_tests.rs"]
mod checker_tests;
