//! Per-query search state.
//!
//! A [`SearchSession`] is created when a query starts and dropped when it
//! returns. It owns every cache the search consults:
//! - the result groups, keyed by the symbol they are credited to
//! - the symbols already scanned for in each file
//! - the inheritance memo used by base-type matching
//! - markers for re-export and type-reference sites already reported

use crate::cancellation::{CancellationToken, ScanStep};
use crate::entries::{Definition, Entry, EntryKind, SymbolAndEntries};
use crate::error::Result;
use crate::imports::{ExportInfo, ImportTracer, ImportsResult, TraceOptions};
use crate::options::FindReferencesOptions;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::{SmallVec, smallvec};
use tracing::trace;
use tsref_model::{FileId, NodeIndex, Program, SymbolId, TextSpan, TypeChecker};

/// Which side of an import/export edge started a sub-search. Tracing never
/// walks back over the edge it arrived through.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComingFrom {
    #[default]
    Plain,
    Import,
    Export,
}

/// Extra references collected for class and constructor searches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpecialSearchKind {
    #[default]
    None,
    /// Started from a `constructor` keyword: also `new C()`, `super()` in
    /// subclasses and `new this()` in static methods.
    Constructor,
    /// Started from a class name: also `this` in static members.
    Class,
}

/// What to look for while scanning.
#[derive(Clone, Debug)]
pub struct Search {
    pub symbol: SymbolId,
    pub coming_from: ComingFrom,
    /// Spelling to scan for, without quotes.
    pub text: String,
    /// Only set in implementation mode for `a.b` lookups: the class and
    /// interface types of `a`.
    pub parents: Option<Vec<SymbolId>>,
    /// Symbols a candidate may resolve to and still count.
    pub all_search_symbols: SmallVec<[SymbolId; 4]>,
}

impl Search {
    pub fn includes(&self, symbol: SymbolId) -> bool {
        self.all_search_symbols.contains(&symbol)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Search {
        self.text = text.into();
        self
    }

    pub fn with_all_search_symbols(mut self, symbols: impl IntoIterator<Item = SymbolId>) -> Search {
        self.all_search_symbols = symbols.into_iter().collect();
        self
    }
}

pub struct SearchSession<'a> {
    pub program: &'a Program,
    pub checker: &'a dyn TypeChecker,
    tracer: &'a dyn ImportTracer,
    cancellation: &'a dyn CancellationToken,
    pub options: FindReferencesOptions,
    pub special_kind: SpecialSearchKind,
    narrow_scope: bool,
    files: Vec<FileId>,
    file_set: FxHashSet<FileId>,
    result: Vec<SymbolAndEntries>,
    group_of_symbol: FxHashMap<SymbolId, usize>,
    searched: FxHashMap<FileId, FxHashSet<SymbolId>>,
    /// `(subtype, supertype)` -> inherits. Seeded `false` before recursing.
    pub inherits_cache: FxHashMap<(SymbolId, SymbolId), bool>,
    seen_re_export_rhs: FxHashSet<NodeIndex>,
    seen_containing_type_reference: FxHashSet<NodeIndex>,
}

impl<'a> SearchSession<'a> {
    pub fn new(
        program: &'a Program,
        checker: &'a dyn TypeChecker,
        tracer: &'a dyn ImportTracer,
        cancellation: &'a dyn CancellationToken,
        options: FindReferencesOptions,
    ) -> Self {
        let files: Vec<FileId> = program.files().iter().map(|f| f.id).collect();
        SearchSession {
            program,
            checker,
            tracer,
            cancellation,
            options,
            special_kind: SpecialSearchKind::None,
            narrow_scope: true,
            file_set: files.iter().copied().collect(),
            files,
            result: Vec::new(),
            group_of_symbol: FxHashMap::default(),
            searched: FxHashMap::default(),
            inherits_cache: FxHashMap::default(),
            seen_re_export_rhs: FxHashSet::default(),
            seen_containing_type_reference: FxHashSet::default(),
        }
    }

    /// Restrict the query to `files`.
    pub fn with_files(mut self, files: Vec<FileId>) -> Self {
        self.file_set = files.iter().copied().collect();
        self.files = files;
        self
    }

    /// With narrowing off every symbol is searched in every file.
    pub fn with_scope_narrowing(mut self, narrow: bool) -> Self {
        self.narrow_scope = narrow;
        self
    }

    pub fn narrows_scope(&self) -> bool {
        self.narrow_scope
    }

    pub fn files(&self) -> &[FileId] {
        &self.files
    }

    pub fn includes_file(&self, file: FileId) -> bool {
        self.file_set.contains(&file)
    }

    pub fn check_cancellation(&self) -> Result<()> {
        ScanStep::poll(self.cancellation).into_result()
    }

    pub fn cancellation(&self) -> &'a dyn CancellationToken {
        self.cancellation
    }

    /// A search for `symbol`, scanning for its name unless overridden.
    /// `location` is the node the search started from, if any.
    pub fn create_search(
        &self,
        location: Option<NodeIndex>,
        symbol: SymbolId,
        coming_from: ComingFrom,
    ) -> Search {
        let text = self
            .program
            .symbol(symbol)
            .map(|s| crate::utils::strip_quotes(&s.name).to_string())
            .unwrap_or_default();
        let parents = match location {
            Some(location) if self.options.implementations => {
                crate::related::parent_symbols_of_property_access(self, location, symbol)
            }
            _ => None,
        };
        Search {
            symbol,
            coming_from,
            text,
            parents,
            all_search_symbols: smallvec![symbol],
        }
    }

    /// Record a reference credited to `search_symbol`. The group is created
    /// on first use.
    pub fn add_reference(&mut self, search_symbol: SymbolId, node: NodeIndex, kind: EntryKind) {
        let index = match self.group_of_symbol.get(&search_symbol) {
            Some(&index) => index,
            None => {
                let index = self.result.len();
                self.result.push(SymbolAndEntries::new(
                    Some(Definition::Symbol(search_symbol)),
                    Vec::new(),
                ));
                self.group_of_symbol.insert(search_symbol, index);
                index
            }
        };
        self.result[index].references.push(Entry::with_kind(node, kind));
    }

    /// Comment and string matches each get a group of their own.
    pub fn add_string_or_comment_reference(&mut self, file: FileId, span: TextSpan, in_string: bool) {
        self.result.push(SymbolAndEntries::new(
            None,
            vec![Entry::Span {
                file,
                span,
                in_string,
            }],
        ));
    }

    /// Mark `symbols` as searched in `file`. Returns `false` when all of them
    /// already were, in which case the scan can be skipped.
    pub fn mark_searched_symbols(&mut self, file: FileId, symbols: &[SymbolId]) -> bool {
        let seen = self.searched.entry(file).or_default();
        let mut any_new = false;
        for &symbol in symbols {
            any_new |= seen.insert(symbol);
        }
        if !any_new {
            trace!(?file, "symbols already searched in file");
        }
        any_new
    }

    pub fn mark_seen_re_export_rhs(&mut self, node: NodeIndex) -> bool {
        self.seen_re_export_rhs.insert(node)
    }

    pub fn mark_seen_containing_type_reference(&mut self, node: NodeIndex) -> bool {
        self.seen_containing_type_reference.insert(node)
    }

    pub fn import_searches(&self, export_symbol: SymbolId, info: &ExportInfo) -> Result<ImportsResult> {
        let options = TraceOptions {
            is_for_rename: self.options.is_rename(),
            preserve_aliases: self.options.is_rename_with_prefix_and_suffix(),
        };
        self.tracer
            .imports_of_export(export_symbol, info, options, &self.files, self.cancellation)
    }

    pub fn into_result(self) -> Vec<SymbolAndEntries> {
        self.result
    }
}

#[cfg(test)]
#[path = "../tests/session_tests.rs"]
mod session_tests;
