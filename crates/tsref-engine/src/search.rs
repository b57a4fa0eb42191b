//! The search driver.
//!
//! A query runs in three phases that never loop back:
//!
//! 1. **resolve**: the touched token becomes a symbol, or is answered by one
//!    of the special resolvers in [`crate::special`].
//! 2. **expand**: scope reduction picks the region to scan; every export or
//!    import met while scanning queues further searches through the
//!    [`crate::imports::ImportTracer`], bounded by the per-file
//!    "already searched" guard of the session.
//! 3. **scan**: each region is scanned for possible occurrences, each
//!    occurrence is resolved and matched, and matches are recorded in the
//!    session's result groups.

use crate::entries::{EntryKind, SymbolAndEntries};
use crate::error::{FindReferencesError, Result};
use crate::implementation::add_implementation_references;
use crate::imports::{ExportInfo, ExportKind};
use crate::related::{populate_search_symbol_set, related_symbol};
use crate::scanner::{is_in_non_reference_comment, is_in_string, possible_occurrences};
use crate::scope::{SymbolScope, symbol_scope};
use crate::session::{ComingFrom, Search, SearchSession, SpecialSearchKind};
use crate::special::{module_references, referenced_symbols_special, references_for_string_literal};
use crate::utils::{
    is_call_expression_target, is_literal_name_of_property_declaration_or_index_access,
    is_module_specifier_like, is_new_expression_target,
};
use tracing::trace;
use tsref_model::{
    FileId, HeritageToken, ModifierFlags, NodeIndex, NodeKind, Program, SymbolFlags, SymbolId,
    TextSpan, TypeChecker,
};

/// Run a query for the token `node`. `Ok(None)` means nothing searchable
/// is there.
pub fn referenced_symbols(
    mut session: SearchSession<'_>,
    node: NodeIndex,
) -> Result<Option<Vec<SymbolAndEntries>>> {
    let program = session.program;
    let checker = session.checker;

    if !session.options.implementations {
        if let Some(special) = referenced_symbols_special(&session, node)? {
            trace!(groups = special.len(), "answered by a special resolver");
            return Ok(Some(special));
        }
    }

    let Some(symbol) = symbol_at(program, checker, node) else {
        if !session.options.implementations
            && matches!(program.kind(node), Some(NodeKind::StringLiteral { .. }))
        {
            if let Some(module) = module_of_specifier(program, node) {
                return module_references(&session, module).map(Some);
            }
            return references_for_string_literal(&session, node).map(Some);
        }
        trace!(?node, "no symbol at location");
        return Ok(None);
    };

    let Some(data) = program.symbol(symbol) else {
        return Err(FindReferencesError::invariant(format!(
            "checker returned unknown symbol {symbol:?}"
        )));
    };
    if data.is_module() {
        return module_references(&session, symbol).map(Some);
    }
    if data.name == "export=" {
        if let Some(module) = data.parent {
            return module_references(&session, module).map(Some);
        }
    }

    references_for_symbol(&mut session, symbol, node)?;
    Ok(Some(session.into_result()))
}

/// A `constructor` keyword stands for its class.
fn symbol_at(program: &Program, checker: &dyn TypeChecker, node: NodeIndex) -> Option<SymbolId> {
    if matches!(program.kind(node), Some(NodeKind::ConstructorKeyword)) {
        let class = program.parent(program.parent(node));
        return program
            .name_of_declaration(class)
            .and_then(|name| checker.symbol_at_location(name))
            .or_else(|| program.declared_symbol(class));
    }
    checker.symbol_at_location(node)
}

/// The module symbol of the file a specifier literal resolves to.
fn module_of_specifier(program: &Program, node: NodeIndex) -> Option<SymbolId> {
    if !is_module_specifier_like(program, node) {
        return None;
    }
    let from = program.node(node)?.file;
    let target = program.module_file_for_specifier(from, program.name_text(node)?)?;
    program.file(target)?.symbol
}

fn special_search_kind(program: &Program, node: NodeIndex) -> SpecialSearchKind {
    match program.kind(node) {
        Some(NodeKind::ConstructorKeyword | NodeKind::Constructor { .. }) => {
            SpecialSearchKind::Constructor
        }
        Some(NodeKind::Identifier { .. }) => {
            let parent = program.parent(node);
            if program.kind(parent).is_some_and(NodeKind::is_class_like)
                && program.declaration_of_name(node) == Some(parent)
            {
                SpecialSearchKind::Class
            } else {
                SpecialSearchKind::None
            }
        }
        _ => SpecialSearchKind::None,
    }
}

fn references_for_symbol(
    session: &mut SearchSession<'_>,
    original: SymbolId,
    node: NodeIndex,
) -> Result<()> {
    let program = session.program;
    let checker = session.checker;
    let prefix_and_suffix = session.options.is_rename_with_prefix_and_suffix();
    let symbol = skip_past_export_or_import_specifier_or_union(
        program,
        checker,
        original,
        node,
        !prefix_and_suffix,
    )?
    .unwrap_or(original);
    session.special_kind = special_search_kind(program, node);

    let export_specifier = if prefix_and_suffix {
        checker
            .declarations(symbol)
            .iter()
            .copied()
            .find(|&d| matches!(program.kind(d), Some(NodeKind::ExportSpecifier { .. })))
    } else {
        None
    };
    if let Some(specifier) = export_specifier {
        let Some(NodeKind::ExportSpecifier { name, .. }) = program.kind(specifier) else {
            return Ok(());
        };
        let search = session.create_search(Some(node), original, ComingFrom::Plain);
        return references_at_export_specifier(session, *name, symbol, specifier, &search, true, true);
    }

    let all_search_symbols = populate_search_symbol_set(session, symbol, node);
    trace!(?symbol, related = all_search_symbols.len(), "search symbol set");
    let search = session
        .create_search(Some(node), symbol, ComingFrom::Plain)
        .with_all_search_symbols(all_search_symbols);
    references_in_container_or_files(session, symbol, &search)
}

/// At `export { a }` the local `a` is searched; a member of an inline
/// object type inside a union is searched as the union's property.
fn skip_past_export_or_import_specifier_or_union(
    program: &Program,
    checker: &dyn TypeChecker,
    symbol: SymbolId,
    node: NodeIndex,
    use_local_symbol_for_export_specifier: bool,
) -> Result<Option<SymbolId>> {
    let parent = program.parent(node);
    if use_local_symbol_for_export_specifier
        && matches!(program.kind(parent), Some(NodeKind::ExportSpecifier { .. }))
    {
        return Ok(Some(local_symbol_for_export_specifier(
            program, checker, node, symbol, parent,
        )));
    }
    let transient = program
        .symbol(symbol)
        .is_some_and(|s| s.flags.contains(SymbolFlags::TRANSIENT));
    for &decl in checker.declarations(symbol) {
        let decl_parent = program.parent(decl);
        if decl_parent.is_none() {
            if transient || matches!(program.kind(decl), Some(NodeKind::SourceFile { .. })) {
                continue;
            }
            return Err(FindReferencesError::invariant(format!(
                "declaration {decl:?} of {symbol:?} has no parent"
            )));
        }
        let grandparent = program.parent(decl_parent);
        if matches!(program.kind(decl_parent), Some(NodeKind::TypeLiteral { .. }))
            && matches!(program.kind(grandparent), Some(NodeKind::UnionType { .. }))
        {
            let name = program.symbol(symbol).map(|s| s.name.as_str()).unwrap_or_default();
            if let Some(property) = checker
                .type_at_location(grandparent)
                .and_then(|ty| checker.property_of_type(ty, name))
            {
                return Ok(Some(property));
            }
        }
    }
    Ok(None)
}

/// `a` in `export { a }` or `export { a as b }` denotes the local `a`;
/// every other position of a specifier denotes the export itself.
fn local_symbol_for_export_specifier(
    program: &Program,
    checker: &dyn TypeChecker,
    reference: NodeIndex,
    reference_symbol: SymbolId,
    specifier: NodeIndex,
) -> SymbolId {
    let Some(NodeKind::ExportSpecifier { property_name, .. }) = program.kind(specifier) else {
        return reference_symbol;
    };
    let is_alias = if property_name.is_some() {
        *property_name == reference
    } else {
        export_declaration_specifier(program, specifier).is_none()
    };
    if is_alias {
        checker
            .export_specifier_local_target(specifier)
            .unwrap_or(reference_symbol)
    } else {
        reference_symbol
    }
}

/// The module specifier of the declaration an export specifier belongs to.
fn export_declaration_specifier(program: &Program, specifier: NodeIndex) -> Option<NodeIndex> {
    let declaration = program.parent(program.parent(specifier));
    match program.kind(declaration) {
        Some(NodeKind::ExportDeclaration {
            module_specifier, ..
        }) => module_specifier.some(),
        _ => None,
    }
}

fn references_in_container_or_files(
    session: &mut SearchSession<'_>,
    symbol: SymbolId,
    search: &Search,
) -> Result<()> {
    let program = session.program;
    let scope = if session.narrows_scope() {
        symbol_scope(program, session.checker, symbol)
    } else {
        SymbolScope::Global
    };
    match scope {
        SymbolScope::Local(container) => {
            let Some(file) = program.node(container).map(|n| n.file) else {
                return Ok(());
            };
            references_in_container(session, container, file, search, true)
        }
        SymbolScope::Module(file) => {
            let Some(root) = program.file(file).map(|f| f.root) else {
                return Ok(());
            };
            let add_here = session.includes_file(file);
            references_in_container(session, root, file, search, add_here)
        }
        SymbolScope::Global => {
            let files = session.files().to_vec();
            for file in files {
                session.check_cancellation()?;
                search_for_name(session, file, search)?;
            }
            Ok(())
        }
    }
}

/// Scan `file` only when its text contains the name at all.
fn search_for_name(session: &mut SearchSession<'_>, file: FileId, search: &Search) -> Result<()> {
    let contains = session
        .program
        .file(file)
        .is_some_and(|f| f.text.contains(search.text.as_str()));
    if contains {
        references_in_source_file(session, file, search, true)?;
    }
    Ok(())
}

fn references_in_source_file(
    session: &mut SearchSession<'_>,
    file: FileId,
    search: &Search,
    add_here: bool,
) -> Result<()> {
    let Some(root) = session.program.file(file).map(|f| f.root) else {
        return Ok(());
    };
    references_in_container(session, root, file, search, add_here)
}

fn references_in_container(
    session: &mut SearchSession<'_>,
    container: NodeIndex,
    file: FileId,
    search: &Search,
    add_here: bool,
) -> Result<()> {
    if !session.mark_searched_symbols(file, &search.all_search_symbols) {
        return Ok(());
    }
    session.check_cancellation()?;
    let program = session.program;
    let (Some(source), Some(span)) = (program.file(file), program.span(container)) else {
        return Ok(());
    };
    trace!(file = %source.name, text = %search.text, ?search.coming_from, "scanning");
    for position in possible_occurrences(&source.text, &search.text, span) {
        references_at_location(session, file, position, search, add_here)?;
    }
    Ok(())
}

/// Whether the token at `position` spells exactly the searched name.
fn is_valid_reference_position(
    program: &Program,
    token: NodeIndex,
    position: u32,
    text: &str,
) -> bool {
    let (Some(kind), Some(span)) = (program.kind(token), program.span(token)) else {
        return false;
    };
    match kind {
        NodeKind::Identifier { text: t } | NodeKind::PrivateIdentifier { text: t } => {
            span.start == position && t.len() == text.len()
        }
        NodeKind::StringLiteral { text: t } => {
            span.start + 1 == position
                && t.len() == text.len()
                && (is_literal_name_of_property_declaration_or_index_access(program, token)
                    || matches!(
                        program.kind(program.parent(token)),
                        Some(NodeKind::ImportSpecifier { .. } | NodeKind::ExportSpecifier { .. })
                    ))
        }
        NodeKind::NumericLiteral { text: t } => {
            span.start == position
                && t.len() == text.len()
                && is_literal_name_of_property_declaration_or_index_access(program, token)
        }
        _ => false,
    }
}

fn references_at_location(
    session: &mut SearchSession<'_>,
    file: FileId,
    position: u32,
    search: &Search,
    add_here: bool,
) -> Result<()> {
    let program = session.program;
    let checker = session.checker;
    let reference = program
        .touching_token(file, position)
        .filter(|&t| is_valid_reference_position(program, t, position, &search.text));
    let Some(reference) = reference else {
        let options = &session.options;
        if !options.implementations {
            let in_string = options.find_in_strings && is_in_string(program, file, position);
            let in_comment =
                options.find_in_comments && is_in_non_reference_comment(program, file, position);
            if in_string || in_comment {
                let span = TextSpan::from_len(position, search.text.len() as u32);
                session.add_string_or_comment_reference(file, span, in_string);
            }
        }
        return Ok(());
    };

    let Some(reference_symbol) = checker.symbol_at_location(reference) else {
        trace!(?reference, "candidate has no symbol");
        return Ok(());
    };

    let parent = program.parent(reference);
    match program.kind(parent) {
        // Reported through the single references of the import tracer.
        Some(NodeKind::ImportSpecifier { property_name, .. }) if *property_name == reference => {
            return Ok(());
        }
        Some(NodeKind::ExportSpecifier { .. }) => {
            return references_at_export_specifier(
                session,
                reference,
                reference_symbol,
                parent,
                search,
                add_here,
                false,
            );
        }
        _ => {}
    }

    let Some((related, kind)) = related_symbol(session, search, reference_symbol, reference) else {
        reference_for_shorthand_property(session, reference_symbol, search);
        return Ok(());
    };

    // Constructor and static `this` extras lie in the reference's own file.
    if add_here {
        match session.special_kind {
            SpecialSearchKind::None => add_reference(session, reference, related, kind),
            SpecialSearchKind::Constructor => {
                add_constructor_references(session, reference, search)
            }
            SpecialSearchKind::Class => {
                add_class_static_this_references(session, reference, search)
            }
        }
    }

    import_or_export_references(session, reference, reference_symbol, search)
}

/// Record a match. In implementation mode the match is refined into the
/// implementations it leads to.
fn add_reference(
    session: &mut SearchSession<'_>,
    node: NodeIndex,
    symbol: SymbolId,
    kind: EntryKind,
) {
    if session.options.implementations {
        add_implementation_references(session, symbol, node);
    } else {
        session.add_reference(symbol, node, kind);
    }
}

/// `{ x }` where the property itself did not match: the value read by the
/// shorthand may still be the searched symbol.
fn reference_for_shorthand_property(
    session: &mut SearchSession<'_>,
    reference_symbol: SymbolId,
    search: &Search,
) {
    let program = session.program;
    let Some(symbol) = program.symbol(reference_symbol) else {
        return;
    };
    let declaration = symbol.value_declaration;
    if symbol.flags.contains(SymbolFlags::TRANSIENT)
        || !matches!(
            program.kind(declaration),
            Some(NodeKind::ShorthandPropertyAssignment { .. })
        )
    {
        return;
    }
    let Some(value) = session.checker.shorthand_assignment_value_symbol(declaration) else {
        return;
    };
    if let Some(name) = program.name_of_declaration(declaration) {
        if search.includes(value) {
            add_reference(session, name, value, EntryKind::Node);
        }
    }
}

/// Constructor search: `new C()`, the constructor declarations, `new this()`
/// in static methods and `super()` calls of subclasses.
fn add_constructor_references(session: &mut SearchSession<'_>, reference: NodeIndex, search: &Search) {
    let program = session.program;
    if is_new_expression_target(program, reference) {
        add_reference(session, reference, search.symbol, EntryKind::Node);
    }
    let parent = program.parent(reference);
    let found = if program.kind(parent).is_some_and(NodeKind::is_class_like) {
        own_constructor_references(program, parent)
    } else if let Some(subclass) = class_extending(program, reference) {
        super_constructor_calls(program, subclass)
    } else {
        Vec::new()
    };
    for node in found {
        session.add_reference(search.symbol, node, EntryKind::Node);
    }
}

fn own_constructor_references(program: &Program, class: NodeIndex) -> Vec<NodeIndex> {
    let Some(kind) = program.kind(class) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for &member in kind.members() {
        if let Some(NodeKind::Constructor { keyword, .. }) = program.kind(member) {
            out.push(*keyword);
        }
    }
    for &member in kind.members() {
        let Some(NodeKind::MethodDeclaration { body, .. }) = program.kind(member) else {
            continue;
        };
        if !program.is_static(member) {
            continue;
        }
        out.extend(program.descendants(*body).filter(|&n| {
            matches!(program.kind(n), Some(NodeKind::ThisKeyword))
                && is_new_expression_target(program, n)
        }));
    }
    out
}

fn super_constructor_calls(program: &Program, class: NodeIndex) -> Vec<NodeIndex> {
    let Some(kind) = program.kind(class) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for &member in kind.members() {
        if let Some(NodeKind::Constructor { body, .. }) = program.kind(member) {
            out.extend(program.descendants(*body).filter(|&n| {
                matches!(program.kind(n), Some(NodeKind::SuperKeyword))
                    && is_call_expression_target(program, n)
            }));
        }
    }
    out
}

/// The class whose `extends` clause names `reference`.
fn class_extending(program: &Program, reference: NodeIndex) -> Option<NodeIndex> {
    let expression = program.parent(reference);
    let Some(NodeKind::ExpressionWithTypeArguments { expression: e }) = program.kind(expression)
    else {
        return None;
    };
    if *e != reference {
        return None;
    }
    let clause = program.parent(expression);
    let Some(NodeKind::HeritageClause {
        token: HeritageToken::Extends,
        ..
    }) = program.kind(clause)
    else {
        return None;
    };
    let class = program.parent(clause);
    program
        .kind(class)
        .is_some_and(NodeKind::is_class_like)
        .then_some(class)
}

/// Class search: the class name plus `this` inside its static methods and
/// accessors.
fn add_class_static_this_references(
    session: &mut SearchSession<'_>,
    reference: NodeIndex,
    search: &Search,
) {
    add_reference(session, reference, search.symbol, EntryKind::Node);
    let program = session.program;
    let class = program.parent(reference);
    if session.options.is_rename() || program.declaration_of_name(reference) != Some(class) {
        return;
    }
    let Some(kind) = program.kind(class).filter(|k| k.is_class_like()) else {
        return;
    };
    let mut found = Vec::new();
    for &member in kind.members() {
        let is_method_or_accessor = matches!(
            program.kind(member),
            Some(
                NodeKind::MethodDeclaration { .. }
                    | NodeKind::GetAccessor { .. }
                    | NodeKind::SetAccessor { .. }
            )
        );
        if !is_method_or_accessor || !program.is_static(member) {
            continue;
        }
        if let Some(body) = program.kind(member).and_then(NodeKind::body) {
            collect_this_keywords(program, body, &mut found);
        }
    }
    for node in found {
        session.add_reference(search.symbol, node, EntryKind::Node);
    }
}

/// `this` tokens below `node`, not entering nested functions or classes.
fn collect_this_keywords(program: &Program, node: NodeIndex, out: &mut Vec<NodeIndex>) {
    let Some(kind) = program.kind(node) else {
        return;
    };
    for child in kind.children() {
        match program.kind(child) {
            Some(NodeKind::ThisKeyword) => out.push(child),
            Some(k) if k.is_function_like() || k.is_class_like() => {}
            Some(_) => collect_this_keywords(program, child, out),
            None => {}
        }
    }
}

/// What an occurrence contributes to import/export tracing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ImportOrExport {
    /// The occurrence binds an import of `SymbolId`.
    Import(SymbolId),
    /// The occurrence exports `symbol`.
    Export { symbol: SymbolId, info: ExportInfo },
}

fn import_or_export_references(
    session: &mut SearchSession<'_>,
    reference: NodeIndex,
    reference_symbol: SymbolId,
    search: &Search,
) -> Result<()> {
    let found = import_or_export_symbol(
        session.program,
        session.checker,
        reference,
        reference_symbol,
        search.coming_from == ComingFrom::Export,
    );
    match found {
        Some(ImportOrExport::Import(imported)) => {
            if session.options.is_rename_with_prefix_and_suffix() {
                return Ok(());
            }
            search_for_imported_symbol(session, imported)
        }
        Some(ImportOrExport::Export { symbol, info }) => {
            search_for_imports_of_export(session, reference, symbol, &info)
        }
        None => Ok(()),
    }
}

fn import_or_export_symbol(
    program: &Program,
    checker: &dyn TypeChecker,
    node: NodeIndex,
    symbol: SymbolId,
    coming_from_export: bool,
) -> Option<ImportOrExport> {
    let export = export_of(program, node, symbol);
    if coming_from_export {
        return export;
    }
    export.or_else(|| import_of(program, checker, node, symbol))
}

fn export_of(program: &Program, node: NodeIndex, symbol: SymbolId) -> Option<ImportOrExport> {
    if let Some(decl) = program.declaration_of_name(node) {
        let modifiers = program.effective_modifiers(decl);
        if modifiers.contains(ModifierFlags::EXPORT) {
            let kind = if modifiers.contains(ModifierFlags::DEFAULT) {
                ExportKind::Default
            } else {
                ExportKind::Named
            };
            return export_info(program, symbol, kind)
                .map(|info| ImportOrExport::Export { symbol, info });
        }
    }

    // `export default x`, `export = x`, `export default (x)`.
    let parent = program.parent(node);
    let assignment = match program.kind(parent) {
        Some(NodeKind::ExportAssignment { .. }) => parent,
        Some(NodeKind::ParenthesizedExpression { .. }) => program.parent(parent),
        _ => return None,
    };
    let Some(NodeKind::ExportAssignment {
        is_export_equals, ..
    }) = program.kind(assignment)
    else {
        return None;
    };
    let exporting_module = program.source_file_of(assignment)?.symbol?;
    let kind = if *is_export_equals {
        ExportKind::ExportEquals
    } else {
        ExportKind::Default
    };
    Some(ImportOrExport::Export {
        symbol,
        info: ExportInfo {
            exporting_module,
            kind,
        },
    })
}

/// Export info for a symbol exported by a module.
pub fn export_info(program: &Program, symbol: SymbolId, kind: ExportKind) -> Option<ExportInfo> {
    let parent = program.symbol(symbol)?.parent?;
    program
        .symbol(parent)
        .is_some_and(|p| p.is_module())
        .then_some(ExportInfo {
            exporting_module: parent,
            kind,
        })
}

/// `a` in `import { a }`, `d` in `import d` or `ns` in `import * as ns`:
/// the imported symbol, when the local name does not rename it.
fn import_of(
    program: &Program,
    checker: &dyn TypeChecker,
    node: NodeIndex,
    symbol: SymbolId,
) -> Option<ImportOrExport> {
    let parent = program.parent(node);
    let is_import = match program.kind(parent) {
        // `a` of `import { a as b }` comes from the tracer's single references.
        Some(NodeKind::ImportSpecifier { property_name, .. }) => property_name.is_none(),
        Some(NodeKind::ImportClause { name, .. } | NodeKind::NamespaceImport { name }) => {
            *name == node
        }
        _ => false,
    };
    if !is_import {
        return None;
    }
    let imported = checker.immediate_aliased_symbol(symbol)?;
    let mut imported = skip_export_specifier_symbol(program, checker, imported);
    if program.symbol(imported)?.name == "export=" {
        imported = export_equals_local_symbol(program, checker, imported)?;
    }
    let local_name = program.symbol(symbol)?.name.as_str();
    match symbol_name_no_default(program, imported) {
        None => Some(ImportOrExport::Import(imported)),
        Some(name) if name == "default" || name == local_name => {
            Some(ImportOrExport::Import(imported))
        }
        Some(_) => None,
    }
}

/// `export { a }` without a module specifier re-exports the local `a`.
fn skip_export_specifier_symbol(
    program: &Program,
    checker: &dyn TypeChecker,
    symbol: SymbolId,
) -> SymbolId {
    for &decl in checker.declarations(symbol) {
        if let Some(NodeKind::ExportSpecifier { property_name, .. }) = program.kind(decl) {
            if property_name.is_none() && export_declaration_specifier(program, decl).is_none() {
                return checker.export_specifier_local_target(decl).unwrap_or(symbol);
            }
        }
    }
    symbol
}

fn export_equals_local_symbol(
    program: &Program,
    checker: &dyn TypeChecker,
    symbol: SymbolId,
) -> Option<SymbolId> {
    let data = program.symbol(symbol)?;
    if data.flags.contains(SymbolFlags::ALIAS) {
        return checker.immediate_aliased_symbol(symbol);
    }
    match program.kind(data.value_declaration)? {
        NodeKind::ExportAssignment { expression, .. } => checker.symbol_at_location(*expression),
        _ => None,
    }
}

/// A symbol's name, or for a `default` export the name of its declaration.
fn symbol_name_no_default(program: &Program, symbol: SymbolId) -> Option<&str> {
    let data = program.symbol(symbol)?;
    if data.name != "default" {
        return Some(data.name.as_str());
    }
    data.declarations.iter().find_map(|&decl| {
        let name = program.name_of_declaration(decl)?;
        match program.kind(name)? {
            NodeKind::Identifier { text } => Some(text.as_str()),
            _ => None,
        }
    })
}

/// Search the declaring files of an imported symbol.
fn search_for_imported_symbol(session: &mut SearchSession<'_>, symbol: SymbolId) -> Result<()> {
    let program = session.program;
    for &decl in session.checker.declarations(symbol) {
        let Some(file) = program.node(decl).map(|n| n.file) else {
            continue;
        };
        trace!(?symbol, ?file, "following import to its declaration");
        let search = session.create_search(Some(decl), symbol, ComingFrom::Import);
        let add_here = session.includes_file(file);
        references_in_source_file(session, file, &search, add_here)?;
    }
    Ok(())
}

fn search_for_imports_of_export(
    session: &mut SearchSession<'_>,
    export_location: NodeIndex,
    export_symbol: SymbolId,
    info: &ExportInfo,
) -> Result<()> {
    let program = session.program;
    let imports = session.import_searches(export_symbol, info)?;
    trace!(
        ?export_symbol,
        kind = ?info.kind,
        searches = imports.import_searches.len(),
        "following export to its importers"
    );

    for single in imports.single_references {
        if should_add_single_reference(session, single) {
            session.add_reference(export_symbol, single, EntryKind::Node);
        }
    }

    for (location, symbol) in imports.import_searches {
        let Some(file) = program.node(location).map(|n| n.file) else {
            continue;
        };
        let search = session.create_search(Some(location), symbol, ComingFrom::Export);
        references_in_source_file(session, file, &search, true)?;
    }

    if imports.indirect_users.is_empty() {
        return Ok(());
    }
    let indirect_search = match info.kind {
        ExportKind::Named => Some(session.create_search(
            Some(export_location),
            export_symbol,
            ComingFrom::Export,
        )),
        // Rename never touches `default`.
        ExportKind::Default if !session.options.is_rename() => Some(
            session
                .create_search(Some(export_location), export_symbol, ComingFrom::Export)
                .with_text("default"),
        ),
        ExportKind::Default | ExportKind::ExportEquals => None,
    };
    if let Some(search) = indirect_search {
        for file in imports.indirect_users {
            session.check_cancellation()?;
            search_for_name(session, file, &search)?;
        }
    }
    Ok(())
}

/// In rename, `default` and non-identifier names are never edited.
fn should_add_single_reference(session: &SearchSession<'_>, node: NodeIndex) -> bool {
    if !session.options.is_rename() {
        return true;
    }
    matches!(
        session.program.kind(node),
        Some(NodeKind::Identifier { text }) if text != "default"
    )
}

/// An occurrence inside `export { .. }`.
///
/// `always_get` starts tracing even when the specifier's local is not part
/// of the search; it is used when a rename with prefix and suffix text
/// starts at a re-exported name.
fn references_at_export_specifier(
    session: &mut SearchSession<'_>,
    reference: NodeIndex,
    reference_symbol: SymbolId,
    specifier: NodeIndex,
    search: &Search,
    add_here: bool,
    always_get: bool,
) -> Result<()> {
    let program = session.program;
    let checker = session.checker;
    let Some(NodeKind::ExportSpecifier {
        property_name,
        name,
    }) = program.kind(specifier)
    else {
        return Ok(());
    };
    let (property_name, name) = (*property_name, *name);
    let has_module_specifier = export_declaration_specifier(program, specifier).is_some();
    let local_symbol =
        local_symbol_for_export_specifier(program, checker, reference, reference_symbol, specifier);
    if !always_get && !search.includes(local_symbol) {
        return Ok(());
    }
    let is_rename = session.options.is_rename();
    let prefix_and_suffix = session.options.is_rename_with_prefix_and_suffix();

    if property_name.is_none() {
        // `export { default } from "m"` is never renamed.
        if add_here && !(is_rename && is_default_name(program, name)) {
            add_reference(session, reference, local_symbol, EntryKind::Node);
        }
    } else if reference == property_name {
        // With a module specifier, `a` of `export { a as b } from "m"` comes
        // from the single references of `m`'s export.
        if add_here && !has_module_specifier {
            add_reference(session, reference, local_symbol, EntryKind::Node);
        }
        if add_here && !is_rename && session.mark_seen_re_export_rhs(name) {
            if let Some(export_symbol) = program.declared_symbol(specifier) {
                add_reference(session, name, export_symbol, EntryKind::Node);
            }
        }
    } else if session.mark_seen_re_export_rhs(reference) && add_here {
        add_reference(session, reference, local_symbol, EntryKind::Node);
    }

    // For `export { foo as bar }` a prefix/suffix rename edits `foo` only.
    if !prefix_and_suffix || always_get {
        let kind = if is_default_name(program, reference) || is_default_name(program, name) {
            ExportKind::Default
        } else {
            ExportKind::Named
        };
        let export_symbol = program.declared_symbol(specifier).ok_or_else(|| {
            FindReferencesError::invariant(format!("export specifier {specifier:?} has no symbol"))
        })?;
        if let Some(info) = export_info(program, export_symbol, kind) {
            search_for_imports_of_export(session, reference, export_symbol, &info)?;
        }
    }

    // At `export { x } from "m"`, also search `m`'s `x`.
    if search.coming_from != ComingFrom::Export
        && has_module_specifier
        && property_name.is_none()
        && !prefix_and_suffix
    {
        if let Some(imported) = checker.export_specifier_local_target(specifier) {
            search_for_imported_symbol(session, imported)?;
        }
    }
    Ok(())
}

fn is_default_name(program: &Program, node: NodeIndex) -> bool {
    program.name_text(node) == Some("default")
}

#[cfg(test)]
#[path = "../tests/search_tests.rs"]
mod search_tests;
