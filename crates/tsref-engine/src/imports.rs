//! Import/export alias tracing.
//!
//! Given an exported symbol, the tracer finds every place another module
//! can observe it:
//! - `single_references`: names that refer to the export and need no
//!   further search, such as `a` in `import { a as b }`
//! - `import_searches`: local bindings created by an import or re-export,
//!   each searched in its own file
//! - `indirect_users`: files reaching the export through a namespace, a
//!   default import or a dynamic `import()`, searched by name
//!
//! [`ModuleImportTracer`] answers from the program snapshot. The map from a
//! module file to the declarations importing it is built once per tracer.

use crate::cancellation::CancellationToken;
use crate::error::Result;
use crate::utils::{file_statements, has_effective_modifier};
use indexmap::{IndexMap, IndexSet};
use once_cell::unsync::OnceCell;
use rustc_hash::{FxBuildHasher, FxHashSet};
use tracing::trace;
use tsref_model::{
    FileId, ModifierFlags, NodeIndex, NodeKind, Program, SymbolId, TypeChecker,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportKind {
    Named,
    /// `export default` or `export { x as default }`.
    Default,
    /// `export = x`.
    ExportEquals,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExportInfo {
    pub exporting_module: SymbolId,
    pub kind: ExportKind,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraceOptions {
    pub is_for_rename: bool,
    /// Rename emits `old as new` edits, so aliases are left alone.
    pub preserve_aliases: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportsResult {
    pub import_searches: Vec<(NodeIndex, SymbolId)>,
    pub single_references: Vec<NodeIndex>,
    pub indirect_users: Vec<FileId>,
}

pub trait ImportTracer {
    /// Importers of `export_symbol` among `files`.
    fn imports_of_export(
        &self,
        export_symbol: SymbolId,
        info: &ExportInfo,
        options: TraceOptions,
        files: &[FileId],
        cancellation: &dyn CancellationToken,
    ) -> Result<ImportsResult>;
}

type DirectImports = IndexMap<FileId, Vec<NodeIndex>, FxBuildHasher>;

pub struct ModuleImportTracer<'a> {
    program: &'a Program,
    checker: &'a dyn TypeChecker,
    direct_imports: OnceCell<DirectImports>,
}

impl<'a> ModuleImportTracer<'a> {
    pub fn new(program: &'a Program, checker: &'a dyn TypeChecker) -> Self {
        ModuleImportTracer {
            program,
            checker,
            direct_imports: OnceCell::new(),
        }
    }

    /// Imported module file -> declarations and `import()` calls that
    /// import it, in program order.
    fn direct_imports(&self) -> &DirectImports {
        self.direct_imports.get_or_init(|| {
            let mut map = DirectImports::default();
            for file in self.program.files() {
                for (importer, specifier) in imports_of_file(self.program, file.id) {
                    let Some(text) = self.program.name_text(specifier) else {
                        continue;
                    };
                    if let Some(target) = self.program.module_file_for_specifier(file.id, text) {
                        map.entry(target).or_default().push(importer);
                    }
                }
            }
            map
        })
    }

    fn importers_of(&self, file: FileId) -> &[NodeIndex] {
        self.direct_imports().get(&file).map_or(&[], Vec::as_slice)
    }

    fn file_of(&self, node: NodeIndex) -> Option<FileId> {
        self.program.node(node).map(|n| n.file)
    }
}

/// Top-level import and export declarations with a module specifier, then
/// every `import()` call, each with its specifier literal.
fn imports_of_file(program: &Program, file: FileId) -> Vec<(NodeIndex, NodeIndex)> {
    let Some(root) = program.file(file).map(|f| f.root) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for &statement in file_statements(program, root) {
        match program.kind(statement) {
            Some(
                NodeKind::ImportDeclaration {
                    module_specifier, ..
                }
                | NodeKind::ExportDeclaration {
                    module_specifier, ..
                },
            ) if is_string_literal(program, *module_specifier) => {
                out.push((statement, *module_specifier));
            }
            _ => {}
        }
    }
    for node in program.descendants(root) {
        if let Some(NodeKind::ImportCall { argument }) = program.kind(node) {
            if is_string_literal(program, *argument) {
                out.push((node, *argument));
            }
        }
    }
    out
}

fn is_string_literal(program: &Program, node: NodeIndex) -> bool {
    matches!(program.kind(node), Some(NodeKind::StringLiteral { .. }))
}

/// The direct importers and indirect users of one module export.
struct Importers<'t, 'a> {
    tracer: &'t ModuleImportTracer<'a>,
    kind: ExportKind,
    files: &'t [FileId],
    cancellation: &'t dyn CancellationToken,
    seen_direct: FxHashSet<NodeIndex>,
    direct: Vec<NodeIndex>,
    indirect: IndexSet<FileId, FxBuildHasher>,
}

impl Importers<'_, '_> {
    fn handle_direct_imports(&mut self, module_file: FileId) -> Result<()> {
        let tracer = self.tracer;
        let program = tracer.program;
        for &direct in tracer.importers_of(module_file) {
            if !self.seen_direct.insert(direct) {
                continue;
            }
            let Some(importer_file) = tracer.file_of(direct) else {
                continue;
            };
            if !self.files.contains(&importer_file) {
                continue;
            }
            if self.cancellation.is_cancellation_requested() {
                return Err(crate::error::FindReferencesError::Cancelled);
            }
            match program.kind(direct) {
                Some(NodeKind::ImportCall { .. }) => {
                    let transitive = program
                        .ancestors(direct)
                        .any(|a| has_effective_modifier(program, a, ModifierFlags::EXPORT));
                    self.add_indirect_user(importer_file, transitive);
                }
                Some(NodeKind::ImportDeclaration { import_clause, .. }) => {
                    self.direct.push(direct);
                    let (default_name, named_bindings) = match program.kind(*import_clause) {
                        Some(NodeKind::ImportClause {
                            name,
                            named_bindings,
                        }) => (*name, *named_bindings),
                        _ => (NodeIndex::NONE, NodeIndex::NONE),
                    };
                    if let Some(NodeKind::NamespaceImport { name }) = program.kind(named_bindings) {
                        self.handle_namespace_import(importer_file, *name);
                    } else if default_name.is_some() {
                        self.add_indirect_user(importer_file, false);
                    }
                }
                Some(NodeKind::ExportDeclaration { export_clause, .. }) => {
                    if export_clause.is_none() {
                        trace!(?importer_file, "following `export *`");
                        self.handle_direct_imports(importer_file)?;
                    } else {
                        self.direct.push(direct);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Namespace imports of an `export =` module are searched directly;
    /// otherwise the importing file uses the export as `ns.name`.
    fn handle_namespace_import(&mut self, file: FileId, name: NodeIndex) {
        if self.kind == ExportKind::ExportEquals {
            return;
        }
        let re_exported = self.namespace_is_re_exported(file, name);
        self.add_indirect_user(file, re_exported);
    }

    /// `import * as ns from "m"; export { ns };`
    fn namespace_is_re_exported(&self, file: FileId, name: NodeIndex) -> bool {
        let program = self.tracer.program;
        let checker = self.tracer.checker;
        let Some(namespace_symbol) = checker.symbol_at_location(name) else {
            return false;
        };
        let Some(root) = program.file(file).map(|f| f.root) else {
            return false;
        };
        file_statements(program, root).iter().any(|&statement| {
            let Some(NodeKind::ExportDeclaration {
                export_clause,
                module_specifier,
            }) = program.kind(statement)
            else {
                return false;
            };
            let Some(NodeKind::NamedExports { elements }) = program.kind(*export_clause) else {
                return false;
            };
            module_specifier.is_none()
                && elements
                    .iter()
                    .any(|&e| checker.export_specifier_local_target(e) == Some(namespace_symbol))
        })
    }

    fn add_indirect_user(&mut self, file: FileId, transitive: bool) {
        if !self.indirect.insert(file) || !transitive {
            return;
        }
        let importers: Vec<FileId> = self
            .tracer
            .importers_of(file)
            .iter()
            .filter_map(|&i| self.tracer.file_of(i))
            .filter(|f| self.files.contains(f))
            .collect();
        for importer in importers {
            self.add_indirect_user(importer, true);
        }
    }
}

/// Turns direct importers into single references and import searches.
struct SearchesFromDirectImports<'t> {
    program: &'t Program,
    checker: &'t dyn TypeChecker,
    export_symbol: SymbolId,
    export_name: String,
    kind: ExportKind,
    options: TraceOptions,
    result: ImportsResult,
}

impl SearchesFromDirectImports<'_> {
    fn add_search(&mut self, location: NodeIndex, symbol: Option<SymbolId>) {
        if let Some(symbol) = symbol {
            self.result.import_searches.push((location, symbol));
        }
    }

    fn is_name_match(&self, name: &str) -> bool {
        name == self.export_name || (self.kind != ExportKind::Named && name == "default")
    }

    fn handle_import(&mut self, decl: NodeIndex) {
        let program = self.program;
        match program.kind(decl) {
            Some(NodeKind::ExportDeclaration { export_clause, .. }) => {
                if let Some(NodeKind::NamedExports { elements }) = program.kind(*export_clause) {
                    self.search_for_named_import(elements);
                }
            }
            Some(NodeKind::ImportDeclaration { import_clause, .. }) => {
                let Some(NodeKind::ImportClause {
                    name,
                    named_bindings,
                }) = program.kind(*import_clause)
                else {
                    return;
                };
                match program.kind(*named_bindings) {
                    Some(NodeKind::NamespaceImport { name }) => {
                        if self.kind == ExportKind::ExportEquals {
                            let symbol = self.checker.symbol_at_location(*name);
                            self.add_search(*name, symbol);
                        }
                    }
                    Some(NodeKind::NamedImports { elements }) => {
                        if matches!(self.kind, ExportKind::Named | ExportKind::Default) {
                            self.search_for_named_import(elements);
                        }
                    }
                    _ => {}
                }
                if name.is_some() && matches!(self.kind, ExportKind::Default | ExportKind::ExportEquals) {
                    let local_name = program.name_text(*name).unwrap_or_default();
                    let export_local_name = program
                        .symbol(self.export_symbol)
                        .map(|s| s.name.as_str())
                        .unwrap_or_default();
                    if !self.options.is_for_rename || local_name == export_local_name {
                        let symbol = self.checker.symbol_at_location(*name);
                        self.add_search(*name, symbol);
                    }
                }
            }
            _ => {}
        }
    }

    fn search_for_named_import(&mut self, elements: &[NodeIndex]) {
        let program = self.program;
        for &element in elements {
            let (property_name, name) = match program.kind(element) {
                Some(
                    NodeKind::ImportSpecifier {
                        property_name,
                        name,
                    }
                    | NodeKind::ExportSpecifier {
                        property_name,
                        name,
                    },
                ) => (*property_name, *name),
                _ => continue,
            };
            let external = if property_name.is_some() {
                property_name
            } else {
                name
            };
            if !program
                .name_text(external)
                .is_some_and(|text| self.is_name_match(text))
            {
                continue;
            }
            if property_name.is_some() {
                self.result.single_references.push(property_name);
                let keeps_name = program.name_text(name) == Some(self.export_name.as_str());
                if !self.options.preserve_aliases || keeps_name {
                    let symbol = self.checker.symbol_at_location(name);
                    self.add_search(name, symbol);
                }
            } else {
                let symbol = self.checker.symbol_at_location(name);
                self.add_search(name, symbol);
            }
        }
    }
}

/// The name an export is imported by.
fn exported_name(program: &Program, export_symbol: SymbolId, info: &ExportInfo) -> String {
    match info.kind {
        ExportKind::Default => "default".to_string(),
        ExportKind::ExportEquals => "export=".to_string(),
        ExportKind::Named => program
            .symbol(info.exporting_module)
            .and_then(|module| {
                module
                    .exports
                    .iter()
                    .filter(|&(_, &s)| s == export_symbol)
                    .map(|(name, _)| name)
                    .min()
                    .cloned()
            })
            .or_else(|| program.symbol(export_symbol).map(|s| s.name.clone()))
            .unwrap_or_default(),
    }
}

impl ImportTracer for ModuleImportTracer<'_> {
    fn imports_of_export(
        &self,
        export_symbol: SymbolId,
        info: &ExportInfo,
        options: TraceOptions,
        files: &[FileId],
        cancellation: &dyn CancellationToken,
    ) -> Result<ImportsResult> {
        let Some(module_file) = self
            .program
            .symbol(info.exporting_module)
            .and_then(|m| m.module_file)
        else {
            return Ok(ImportsResult::default());
        };
        let mut importers = Importers {
            tracer: self,
            kind: info.kind,
            files,
            cancellation,
            seen_direct: FxHashSet::default(),
            direct: Vec::new(),
            indirect: IndexSet::default(),
        };
        importers.handle_direct_imports(module_file)?;

        let mut searches = SearchesFromDirectImports {
            program: self.program,
            checker: self.checker,
            export_symbol,
            export_name: exported_name(self.program, export_symbol, info),
            kind: info.kind,
            options,
            result: ImportsResult::default(),
        };
        for &decl in &importers.direct {
            searches.handle_import(decl);
        }
        let mut result = searches.result;
        result.indirect_users = importers.indirect.into_iter().collect();
        trace!(
            ?export_symbol,
            kind = ?info.kind,
            searches = result.import_searches.len(),
            single = result.single_references.len(),
            indirect = result.indirect_users.len(),
            "traced importers"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[path = "../tests/imports_tests.rs"]
mod imports_tests;
