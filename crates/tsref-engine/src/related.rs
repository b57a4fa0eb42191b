//! Relation matching: deciding whether a candidate symbol counts as the
//! searched one.
//!
//! A name can denote the searched symbol directly, through the root
//! symbols of a synthesized union property, through the property of the
//! object literal's contextual type, through a shorthand or binding element
//! pairing, or through a same-named member of a base class or interface.
//! [`for_each_related_symbol`] enumerates those candidates in a fixed order
//! and stops at the first one the callback accepts.

use crate::entries::EntryKind;
use crate::session::{Search, SearchSession};
use crate::utils::{
    containing_object_literal_element, is_object_binding_element_without_property_name,
    is_right_side_of_property_access,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;
use tsref_model::{
    ModifierFlags, NodeIndex, NodeKind, Program, SymbolFlags, SymbolId, TypeChecker,
};

/// One candidate offered to the callback of [`for_each_related_symbol`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelatedCandidate {
    pub symbol: SymbolId,
    /// A declared root of `symbol`, when `symbol` was reached by root
    /// expansion.
    pub root: Option<SymbolId>,
    /// A same-named member of a base type of `root`'s owner.
    pub base: Option<SymbolId>,
    pub kind: EntryKind,
}

impl RelatedCandidate {
    fn plain(symbol: SymbolId, kind: EntryKind) -> Self {
        RelatedCandidate {
            symbol,
            root: None,
            base: None,
            kind,
        }
    }

    /// The symbol compared against the search set.
    pub fn matched(&self) -> SymbolId {
        self.base.or(self.root).unwrap_or(self.symbol)
    }
}

/// Read-only context of a relation walk.
#[derive(Clone, Copy)]
pub struct RelationContext<'a> {
    pub program: &'a Program,
    pub checker: &'a dyn TypeChecker,
}

pub fn for_each_related_symbol<T>(
    ctx: RelationContext<'_>,
    symbol: SymbolId,
    location: NodeIndex,
    is_for_rename_populate: bool,
    only_include_binding_element_at_location: bool,
    cb: &mut dyn FnMut(RelatedCandidate) -> Option<T>,
    allow_base_types: &mut dyn FnMut(SymbolId) -> bool,
) -> Option<T> {
    let RelationContext { program, checker } = ctx;

    if let Some(element) = containing_object_literal_element(program, location) {
        let shorthand_value = match program.kind(element) {
            Some(NodeKind::ShorthandPropertyAssignment { .. }) => {
                checker.shorthand_assignment_value_symbol(element)
            }
            _ => None,
        };
        if let Some(value) = shorthand_value {
            if is_for_rename_populate {
                return cb(RelatedCandidate::plain(
                    value,
                    EntryKind::SearchedLocalFoundProperty,
                ));
            }
        }
        for property in contextual_property_symbols(ctx, element) {
            if let Some(found) = from_root(
                ctx,
                property,
                EntryKind::SearchedPropertyFoundLocal,
                cb,
                allow_base_types,
            ) {
                return Some(found);
            }
        }
        if let Some(value) = shorthand_value {
            if let Some(found) = cb(RelatedCandidate::plain(
                value,
                EntryKind::SearchedLocalFoundProperty,
            )) {
                return Some(found);
            }
        }
    }

    if let Some(found) = from_root(ctx, symbol, EntryKind::Node, cb, allow_base_types) {
        return Some(found);
    }

    let declarations = checker.declarations(symbol);
    let export_specifier = declarations
        .iter()
        .copied()
        .find(|&d| matches!(program.kind(d), Some(NodeKind::ExportSpecifier { .. })));
    let specifier_has_property_name = export_specifier.is_some_and(|spec| {
        matches!(
            program.kind(spec),
            Some(NodeKind::ExportSpecifier { property_name, .. }) if property_name.is_some()
        )
    });
    if !is_for_rename_populate || (export_specifier.is_some() && !specifier_has_property_name) {
        if let Some(local) = export_specifier.and_then(|s| checker.export_specifier_local_target(s))
        {
            if let Some(found) = cb(RelatedCandidate::plain(local, EntryKind::Node)) {
                return Some(found);
            }
        }
    }

    let binding_element_property = if !is_for_rename_populate {
        if only_include_binding_element_at_location {
            let parent = program.parent(location);
            if is_object_binding_element_without_property_name(program, parent) {
                property_symbol_from_binding_element(ctx, parent)
            } else {
                None
            }
        } else {
            property_of_own_binding_element(ctx, symbol)
        }
    } else if only_include_binding_element_at_location {
        property_of_own_binding_element(ctx, symbol)
    } else {
        None
    };
    binding_element_property.and_then(|property| {
        from_root(
            ctx,
            property,
            EntryKind::SearchedPropertyFoundLocal,
            cb,
            allow_base_types,
        )
    })
}

/// Offer every root of `symbol`, and for class and interface members the
/// same-named members of base types.
fn from_root<T>(
    ctx: RelationContext<'_>,
    symbol: SymbolId,
    kind: EntryKind,
    cb: &mut dyn FnMut(RelatedCandidate) -> Option<T>,
    allow_base_types: &mut dyn FnMut(SymbolId) -> bool,
) -> Option<T> {
    for root in ctx.checker.root_symbols(symbol) {
        let candidate = RelatedCandidate {
            symbol,
            root: Some(root),
            base: None,
            kind,
        };
        if let Some(found) = cb(candidate) {
            return Some(found);
        }
        let Some(root_symbol) = ctx.program.symbol(root) else {
            continue;
        };
        let owner = root_symbol
            .parent
            .filter(|&p| ctx.program.symbol(p).is_some_and(|s| s.flags.is_class_or_interface()));
        if let Some(owner) = owner {
            if allow_base_types(root) {
                let name = root_symbol.name.clone();
                let found = property_symbols_from_base_types(ctx, owner, &name, &mut |base| {
                    cb(RelatedCandidate {
                        base: Some(base),
                        ..candidate
                    })
                });
                if found.is_some() {
                    return found;
                }
            }
        }
    }
    None
}

/// Walk the `extends`/`implements` clauses of `owner` looking for members
/// called `name`. The first accepted one wins.
pub fn property_symbols_from_base_types<T>(
    ctx: RelationContext<'_>,
    owner: SymbolId,
    name: &str,
    cb: &mut dyn FnMut(SymbolId) -> Option<T>,
) -> Option<T> {
    let mut seen = FxHashSet::default();
    base_types_walk(ctx, owner, name, cb, &mut seen)
}

fn base_types_walk<T>(
    ctx: RelationContext<'_>,
    symbol: SymbolId,
    name: &str,
    cb: &mut dyn FnMut(SymbolId) -> Option<T>,
    seen: &mut FxHashSet<SymbolId>,
) -> Option<T> {
    let is_class_or_interface = ctx
        .program
        .symbol(symbol)
        .is_some_and(|s| s.flags.is_class_or_interface());
    if !is_class_or_interface || !seen.insert(symbol) {
        return None;
    }
    for &decl in ctx.checker.declarations(symbol) {
        for type_node in ctx.program.super_type_nodes(decl) {
            let Some(ty) = ctx.checker.type_at_location(type_node) else {
                continue;
            };
            let type_symbol = ctx.checker.type_symbol(ty);
            if type_symbol.is_some() {
                if let Some(property) = ctx.checker.property_of_type(ty, name) {
                    for root in ctx.checker.root_symbols(property) {
                        if let Some(found) = cb(root) {
                            return Some(found);
                        }
                    }
                }
            }
            if let Some(found) = type_symbol.and_then(|s| base_types_walk(ctx, s, name, cb, seen)) {
                return Some(found);
            }
        }
    }
    None
}

/// Properties of the contextual type that an object literal element
/// initializes. Unions answer with their synthesized property when they
/// have one, otherwise with each member's property.
fn contextual_property_symbols(ctx: RelationContext<'_>, element: NodeIndex) -> Vec<SymbolId> {
    let object = ctx.program.parent(element);
    let Some(name) = ctx
        .program
        .name_of_declaration(element)
        .and_then(|n| ctx.program.name_text(n))
    else {
        return Vec::new();
    };
    let Some(contextual) = ctx.checker.contextual_type(object) else {
        return Vec::new();
    };
    if let Some(property) = ctx.checker.property_of_type(contextual, name) {
        return vec![property];
    }
    ctx.checker
        .union_members(contextual)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|member| ctx.checker.property_of_type(member, name))
        .collect()
}

/// For `const { x } = o`, the property `x` of the type of the pattern.
fn property_symbol_from_binding_element(
    ctx: RelationContext<'_>,
    binding_element: NodeIndex,
) -> Option<SymbolId> {
    let pattern = ctx.program.parent(binding_element);
    let pattern_type = ctx.checker.type_at_location(pattern)?;
    let name = ctx.program.name_of_declaration(binding_element)?;
    ctx.checker
        .property_of_type(pattern_type, ctx.program.name_text(name)?)
}

fn property_of_own_binding_element(ctx: RelationContext<'_>, symbol: SymbolId) -> Option<SymbolId> {
    let binding_element = ctx
        .checker
        .declarations(symbol)
        .iter()
        .copied()
        .find(|&d| matches!(ctx.program.kind(d), Some(NodeKind::BindingElement { .. })))?;
    if !is_object_binding_element_without_property_name(ctx.program, binding_element) {
        return None;
    }
    property_symbol_from_binding_element(ctx, binding_element)
}

fn is_static_symbol(program: &Program, symbol: SymbolId) -> bool {
    program.symbol(symbol).is_some_and(|s| {
        program
            .effective_modifiers(s.value_declaration)
            .contains(ModifierFlags::STATIC)
    })
}

/// The symbols a search for `symbol` started at `location` accepts.
pub fn populate_search_symbol_set(
    session: &SearchSession<'_>,
    symbol: SymbolId,
    location: NodeIndex,
) -> Vec<SymbolId> {
    let ctx = RelationContext {
        program: session.program,
        checker: session.checker,
    };
    let is_rename = session.options.is_rename();
    let implementations = session.options.implementations;
    let mut result: Vec<SymbolId> = Vec::new();
    for_each_related_symbol::<()>(
        ctx,
        symbol,
        location,
        is_rename,
        !session.options.is_rename_with_prefix_and_suffix(),
        &mut |mut candidate| {
            if candidate
                .base
                .is_some_and(|base| is_static_symbol(ctx.program, symbol) != is_static_symbol(ctx.program, base))
            {
                candidate.base = None;
            }
            let matched = candidate.matched();
            if !result.contains(&matched) {
                result.push(matched);
            }
            None
        },
        &mut |_| !implementations,
    );
    result
}

/// The symbol a reference at `location` is credited to, or `None` when it
/// does not match `search`.
pub fn related_symbol(
    session: &mut SearchSession<'_>,
    search: &Search,
    reference_symbol: SymbolId,
    location: NodeIndex,
) -> Option<(SymbolId, EntryKind)> {
    let ctx = RelationContext {
        program: session.program,
        checker: session.checker,
    };
    let only_include = !session.options.is_rename() || session.options.provide_prefix_and_suffix_text_for_rename;
    let inherits_cache = &mut session.inherits_cache;
    for_each_related_symbol(
        ctx,
        reference_symbol,
        location,
        false,
        only_include,
        &mut |mut candidate| {
            if candidate.base.is_some_and(|base| {
                is_static_symbol(ctx.program, reference_symbol) != is_static_symbol(ctx.program, base)
            }) {
                candidate.base = None;
            }
            if !search.includes(candidate.matched()) {
                return None;
            }
            let is_synthetic = ctx
                .program
                .symbol(candidate.symbol)
                .is_some_and(|s| s.flags.contains(SymbolFlags::TRANSIENT));
            let credited = match candidate.root {
                Some(root) if !is_synthetic => root,
                _ => candidate.symbol,
            };
            Some((credited, candidate.kind))
        },
        &mut |root| {
            let Some(parents) = &search.parents else {
                return true;
            };
            let Some(owner) = ctx.program.symbol(root).and_then(|s| s.parent) else {
                return false;
            };
            parents
                .iter()
                .any(|&parent| explicitly_inherits_from(ctx, owner, parent, inherits_cache))
        },
    )
}

/// Whether `symbol` names `parent` in its heritage clauses, transitively.
///
/// The memo is seeded with `false` before recursing, so a cyclic hierarchy
/// answers `false` instead of looping.
pub fn explicitly_inherits_from(
    ctx: RelationContext<'_>,
    symbol: SymbolId,
    parent: SymbolId,
    cache: &mut FxHashMap<(SymbolId, SymbolId), bool>,
) -> bool {
    if symbol == parent {
        return true;
    }
    let key = (symbol, parent);
    if let Some(&cached) = cache.get(&key) {
        if !cached {
            trace!(?symbol, ?parent, "inheritance check cut at a pending or negative entry");
        }
        return cached;
    }
    cache.insert(key, false);
    let inherits = ctx.checker.declarations(symbol).iter().any(|&decl| {
        ctx.program.super_type_nodes(decl).into_iter().any(|type_node| {
            ctx.checker
                .type_at_location(type_node)
                .and_then(|ty| ctx.checker.type_symbol(ty))
                .is_some_and(|base| explicitly_inherits_from(ctx, base, parent, cache))
        })
    });
    cache.insert(key, inherits);
    inherits
}

/// For `a.b` in implementation mode, the class and interface types `a` may
/// have. `None` when unknown or when `a` is typed by `b`'s own owner.
pub fn parent_symbols_of_property_access(
    session: &SearchSession<'_>,
    location: NodeIndex,
    symbol: SymbolId,
) -> Option<Vec<SymbolId>> {
    let program = session.program;
    let checker = session.checker;
    if !is_right_side_of_property_access(program, location) {
        return None;
    }
    let access = program.parent(location);
    let Some(NodeKind::PropertyAccessExpression { expression, .. }) = program.kind(access) else {
        return None;
    };
    let lhs_type = checker.type_at_location(*expression)?;
    let candidates = match checker.union_members(lhs_type) {
        Some(members) => members,
        None => {
            let owner = program.symbol(symbol).and_then(|s| s.parent);
            if checker.type_symbol(lhs_type).is_some() && checker.type_symbol(lhs_type) == owner {
                return None;
            }
            vec![lhs_type]
        }
    };
    let parents: Vec<SymbolId> = candidates
        .into_iter()
        .filter_map(|ty| checker.type_symbol(ty))
        .filter(|&s| program.symbol(s).is_some_and(|s| s.flags.is_class_or_interface()))
        .collect();
    (!parents.is_empty()).then_some(parents)
}

#[cfg(test)]
#[path = "../tests/related_tests.rs"]
mod related_tests;
