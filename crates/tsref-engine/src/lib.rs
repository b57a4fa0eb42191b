//! Reference search over a TypeScript program snapshot.
//!
//! This crate provides:
//! - Find references, grouped by the symbol each occurrence is credited to
//! - Find implementations
//! - Rename: prepare-rename checks, rename locations and edits
//! - Document highlights
//!
//! All queries go through [`ReferenceFinder`], which borrows a
//! [`tsref_model::Program`] and answers from it without mutating it.

pub mod access;
pub mod cancellation;
pub mod entries;
pub mod error;
pub mod highlights;
pub mod implementation;
pub mod imports;
pub mod options;
pub mod related;
pub mod rename;
pub mod scanner;
pub mod scope;
pub mod search;
pub mod session;
pub mod special;
pub mod tracing_config;
pub mod utils;

pub use cancellation::{AtomicCancellationToken, CancellationToken, NeverCancelled};
pub use entries::{
    Definition, DefinitionInfo, DefinitionKind, Entry, EntryKind, ImplementationLocation,
    ReferenceEntryInfo, ReferencedSymbol, SymbolAndEntries,
};
pub use error::{FindReferencesError, Result};
pub use highlights::{HighlightKind, HighlightSpan};
pub use imports::{ImportTracer, ModuleImportTracer};
pub use options::{FindReferencesOptions, FindReferencesUse, RenameOptions};
pub use rename::{PrepareRenameInfo, RenameEdit, RenameError, RenameLocation, RenameSymbolKind};

use crate::implementation::{flatten_implementations, shorthand_value_declarations};
use crate::session::SearchSession;
use tracing::{debug, debug_span};
use tsref_model::{
    FileId, HeritageToken, NodeIndex, NodeKind, Position, Program, SymbolId, TypeChecker,
};

/// Entry point for every query.
///
/// By default the program is its own checker, imports are traced with a
/// [`ModuleImportTracer`] built per query, nothing cancels and every file
/// of the program is searched.
pub struct ReferenceFinder<'a> {
    program: &'a Program,
    checker: &'a dyn TypeChecker,
    tracer: Option<&'a dyn ImportTracer>,
    cancellation: &'a dyn CancellationToken,
    files: Option<Vec<FileId>>,
    narrow_scope: bool,
}

impl<'a> ReferenceFinder<'a> {
    pub fn new(program: &'a Program) -> Self {
        ReferenceFinder {
            program,
            checker: program,
            tracer: None,
            cancellation: &NeverCancelled,
            files: None,
            narrow_scope: true,
        }
    }

    pub fn with_checker(mut self, checker: &'a dyn TypeChecker) -> Self {
        self.checker = checker;
        self
    }

    pub fn with_tracer(mut self, tracer: &'a dyn ImportTracer) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn with_cancellation(mut self, cancellation: &'a dyn CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    /// Only report references in `files`.
    pub fn with_files(mut self, files: Vec<FileId>) -> Self {
        self.files = Some(files);
        self
    }

    /// With narrowing off every symbol is searched in every file. Results
    /// are the same; only the amount of scanning changes.
    pub fn with_scope_narrowing(mut self, narrow: bool) -> Self {
        self.narrow_scope = narrow;
        self
    }

    pub fn program(&self) -> &'a Program {
        self.program
    }

    /// Byte offset of a line/character position in `file`.
    pub fn offset_of(&self, file: FileId, position: Position) -> Option<u32> {
        let source = self.program.file(file)?;
        source.line_map.position_to_offset(position, &source.text)
    }

    fn run(
        &self,
        node: NodeIndex,
        options: FindReferencesOptions,
        files: Option<Vec<FileId>>,
    ) -> Result<Option<Vec<SymbolAndEntries>>> {
        let default_tracer;
        let tracer: &dyn ImportTracer = match self.tracer {
            Some(tracer) => tracer,
            None => {
                default_tracer = ModuleImportTracer::new(self.program, self.checker);
                &default_tracer
            }
        };
        let mut session = SearchSession::new(
            self.program,
            self.checker,
            tracer,
            self.cancellation,
            options,
        )
        .with_scope_narrowing(self.narrow_scope);
        if let Some(files) = files.or_else(|| self.files.clone()) {
            session = session.with_files(files);
        }
        search::referenced_symbols(session, node)
    }

    /// The raw reference groups for the token at `offset`.
    pub fn find_referenced_symbols(
        &self,
        file: FileId,
        offset: u32,
        options: &FindReferencesOptions,
    ) -> Result<Option<Vec<SymbolAndEntries>>> {
        let Some(node) = self.program.touching_token(file, offset) else {
            return Ok(None);
        };
        self.run(node, options.clone(), None)
    }

    pub fn find_references(&self, file: FileId, offset: u32) -> Result<Option<Vec<ReferencedSymbol>>> {
        self.find_references_with_options(file, offset, &FindReferencesOptions::references())
    }

    pub fn find_references_with_options(
        &self,
        file: FileId,
        offset: u32,
        options: &FindReferencesOptions,
    ) -> Result<Option<Vec<ReferencedSymbol>>> {
        let _span = debug_span!("find_references", file = file.0, offset).entered();
        let Some(groups) = self.find_referenced_symbols(file, offset, options)? else {
            return Ok(None);
        };
        let result: Vec<ReferencedSymbol> = groups
            .iter()
            .map(|group| ReferencedSymbol::from_group(self.program, self.checker, group))
            .collect();
        debug!(
            groups = result.len(),
            references = result.iter().map(|g| g.references.len()).sum::<usize>(),
            "find references done"
        );
        Ok(Some(result))
    }

    pub fn find_references_at_position(
        &self,
        file: FileId,
        position: Position,
    ) -> Result<Option<Vec<ReferencedSymbol>>> {
        let Some(offset) = self.offset_of(file, position) else {
            return Ok(None);
        };
        self.find_references(file, offset)
    }

    pub fn find_implementations(
        &self,
        file: FileId,
        offset: u32,
    ) -> Result<Option<Vec<ImplementationLocation>>> {
        let _span = debug_span!("find_implementations", file = file.0, offset).entered();
        let Some(node) = self.program.touching_token(file, offset) else {
            return Ok(None);
        };
        let Some(nodes) = self.implementation_nodes(node)? else {
            return Ok(None);
        };
        let locations: Vec<ImplementationLocation> = nodes
            .into_iter()
            .filter_map(|n| ImplementationLocation::from_node(self.program, n))
            .collect();
        debug!(implementations = locations.len(), "find implementations done");
        Ok(Some(locations))
    }

    pub fn find_implementations_at_position(
        &self,
        file: FileId,
        position: Position,
    ) -> Result<Option<Vec<ImplementationLocation>>> {
        let Some(offset) = self.offset_of(file, position) else {
            return Ok(None);
        };
        self.find_implementations(file, offset)
    }

    fn implementation_nodes(&self, node: NodeIndex) -> Result<Option<Vec<NodeIndex>>> {
        let program = self.program;
        let checker = self.checker;
        let parent = program.parent(node);
        // `{ x }` implements whatever `x` is declared as.
        if matches!(
            program.kind(parent),
            Some(NodeKind::ShorthandPropertyAssignment { .. })
        ) {
            return Ok(Some(shorthand_value_declarations(program, checker, parent)));
        }
        if matches!(program.kind(node), Some(NodeKind::SuperKeyword)) {
            let symbol = checker
                .symbol_at_location(node)
                .or_else(|| base_class_symbol(program, checker, node));
            let declaration = symbol
                .and_then(|s| program.symbol(s))
                .map(|s| s.value_declaration)
                .filter(|d| d.is_some());
            return Ok(declaration.map(|d| vec![d]));
        }
        let groups = self.run(node, FindReferencesOptions::implementations(), None)?;
        Ok(groups.map(|groups| flatten_implementations(&groups)))
    }

    /// Rename candidates, grouped like [`Self::find_references`].
    pub fn find_rename_candidates(
        &self,
        file: FileId,
        offset: u32,
        options: &RenameOptions,
    ) -> Result<Option<Vec<ReferencedSymbol>>> {
        self.find_references_with_options(file, offset, &FindReferencesOptions::from(options))
    }

    pub fn find_rename_locations(
        &self,
        file: FileId,
        offset: u32,
        options: &RenameOptions,
    ) -> Result<Option<Vec<RenameLocation>>> {
        let _span = debug_span!("find_rename_locations", file = file.0, offset).entered();
        let Some(node) = self.program.touching_token(file, offset) else {
            return Ok(None);
        };
        let Some(groups) = self.run(node, FindReferencesOptions::from(options), None)? else {
            return Ok(None);
        };
        let locations = rename::rename_locations(
            self.program,
            self.checker,
            &groups,
            node,
            options.provide_prefix_and_suffix_text_for_rename,
        );
        debug!(locations = locations.len(), "find rename locations done");
        Ok(Some(locations))
    }

    pub fn find_rename_locations_at_position(
        &self,
        file: FileId,
        position: Position,
        options: &RenameOptions,
    ) -> Result<Option<Vec<RenameLocation>>> {
        let Some(offset) = self.offset_of(file, position) else {
            return Ok(None);
        };
        self.find_rename_locations(file, offset, options)
    }

    pub fn prepare_rename(
        &self,
        file: FileId,
        offset: u32,
    ) -> std::result::Result<PrepareRenameInfo, RenameError> {
        rename::prepare_rename(self.program, self.checker, file, offset)
    }

    /// Check the element and the new name, then produce one edit per rename
    /// location.
    pub fn rename(
        &self,
        file: FileId,
        offset: u32,
        new_name: &str,
        options: &RenameOptions,
    ) -> std::result::Result<Vec<RenameEdit>, RenameError> {
        self.prepare_rename(file, offset)?;
        let kind = self
            .program
            .touching_token(file, offset)
            .and_then(|node| self.program.kind(node))
            .ok_or(RenameError::CannotRename)?;
        let new_name = rename::validate_new_name(kind, new_name)?;
        let locations = self
            .find_rename_locations(file, offset, options)?
            .ok_or(RenameError::CannotRename)?;
        Ok(locations.iter().map(|l| l.to_edit(&new_name)).collect())
    }

    /// Occurrences of the symbol at `offset` within `file` only.
    pub fn document_highlights(
        &self,
        file: FileId,
        offset: u32,
    ) -> Result<Option<Vec<HighlightSpan>>> {
        let _span = debug_span!("document_highlights", file = file.0, offset).entered();
        let Some(node) = self.program.touching_token(file, offset) else {
            return Ok(None);
        };
        let Some(groups) = self.run(node, FindReferencesOptions::references(), Some(vec![file]))?
        else {
            return Ok(None);
        };
        let spans = highlights::highlight_spans(self.program, self.checker, file, &groups);
        debug!(highlights = spans.len(), "document highlights done");
        Ok(Some(spans))
    }
}

/// The class named in the `extends` clause of the class owning `super`.
fn base_class_symbol(
    program: &Program,
    checker: &dyn TypeChecker,
    super_keyword: NodeIndex,
) -> Option<SymbolId> {
    let member = program.super_container(super_keyword)?;
    let class = program.class_of_member(member)?;
    let base = program
        .kind(class)?
        .heritage_clauses()
        .iter()
        .find_map(|&clause| match program.kind(clause)? {
            NodeKind::HeritageClause {
                token: HeritageToken::Extends,
                types,
            } => types.first().copied(),
            _ => None,
        })?;
    checker
        .type_at_location(base)
        .and_then(|ty| checker.type_symbol(ty))
}
