//! Materializing a [`Program`] snapshot.
//!
//! Hosts translate their parser and binder output through this builder;
//! tests use it to describe fixtures next to their source text. Nodes are
//! created bottom-up: a parent is added after its children, which gets its
//! children's parent links set and its span derived from theirs. Leaf spans
//! are located in the file text by `nth` occurrence, so fixtures read like
//! the code they describe.
//!
//! Mistakes are collected rather than panicking; the first one is reported
//! by [`ProgramBuilder::finish`].

use crate::comments::get_comment_ranges;
use crate::position::{LineMap, TextSpan};
use crate::program::{Program, SourceFile};
use crate::symbols::{Symbol, SymbolFlags, SymbolId};
use crate::syntax::{FileId, ModifierFlags, Node, NodeIndex, NodeKind, TypeKeyword};
use crate::types::{TypeData, TypeId};
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("occurrence {nth} of `{needle}` not found in {file}")]
    TextNotFound {
        file: String,
        needle: String,
        nth: usize,
    },
    #[error("unknown file id {0:?}")]
    UnknownFile(FileId),
    #[error("node {0:?} has no children to derive a span from")]
    NoSpan(NodeIndex),
    #[error("node {child:?} already has parent {parent:?}")]
    AlreadyParented { child: NodeIndex, parent: NodeIndex },
    #[error("node {node:?} in {file} is not attached to the file's tree")]
    Detached { file: String, node: NodeIndex },
    #[error("unknown symbol {0:?}")]
    UnknownSymbol(SymbolId),
    #[error("type {0:?} is not a union")]
    NotAUnion(TypeId),
}

#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
    explicit_module: FxHashMap<FileId, bool>,
    error: Option<BuildError>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail(&mut self, error: BuildError) {
        trace!(%error, "program builder error");
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    pub fn add_file(&mut self, name: &str, text: &str) -> FileId {
        let id = FileId(self.program.files.len() as u32);
        self.program.files.push(SourceFile {
            id,
            name: name.to_string(),
            text: text.to_string(),
            root: NodeIndex::NONE,
            line_map: LineMap::build(text),
            is_module: false,
            comments: get_comment_ranges(text),
            tokens: Vec::new(),
            symbol: None,
        });
        id
    }

    /// Force the module-ness of a file instead of inferring it from its
    /// import/export forms.
    pub fn set_module(&mut self, file: FileId, is_module: bool) {
        self.explicit_module.insert(file, is_module);
    }

    /// Span of the `nth` (0-based) occurrence of `needle` that is not part
    /// of a longer identifier.
    pub fn find_text(&mut self, file: FileId, needle: &str, nth: usize) -> TextSpan {
        let Some(source) = self.program.file(file) else {
            self.fail(BuildError::UnknownFile(file));
            return TextSpan::default();
        };
        let found = word_occurrences(&source.text, needle).nth(nth);
        match found {
            Some(start) => TextSpan::from_len(start as u32, needle.len() as u32),
            None => {
                let error = BuildError::TextNotFound {
                    file: source.name.clone(),
                    needle: needle.to_string(),
                    nth,
                };
                self.fail(error);
                TextSpan::default()
            }
        }
    }

    fn add_raw(&mut self, file: FileId, kind: NodeKind, span: TextSpan) -> NodeIndex {
        let children = kind.children();
        let idx = self.program.arena.add(Node {
            kind,
            span,
            parent: NodeIndex::NONE,
            file,
            modifiers: ModifierFlags::empty(),
        });
        for child in children {
            let Some(node) = self.program.arena.get_mut(child) else {
                continue;
            };
            if node.parent.is_some() {
                let parent = node.parent;
                self.fail(BuildError::AlreadyParented { child, parent });
                continue;
            }
            node.parent = idx;
        }
        idx
    }

    /// A leaf (or any node) at an explicit span.
    pub fn node_with_span(&mut self, file: FileId, kind: NodeKind, span: TextSpan) -> NodeIndex {
        self.add_raw(file, kind, span)
    }

    /// A node whose span covers its children.
    pub fn node(&mut self, file: FileId, kind: NodeKind) -> NodeIndex {
        let span = kind
            .children()
            .into_iter()
            .filter_map(|c| self.program.span(c))
            .reduce(TextSpan::cover);
        match span {
            Some(span) => self.add_raw(file, kind, span),
            None => {
                let idx = self.add_raw(file, kind, TextSpan::default());
                self.fail(BuildError::NoSpan(idx));
                idx
            }
        }
    }

    /// A node whose span covers its children and the `nth` occurrence of
    /// `anchor` (typically its leading keyword).
    pub fn node_at(&mut self, file: FileId, kind: NodeKind, anchor: &str, nth: usize) -> NodeIndex {
        let anchor_span = self.find_text(file, anchor, nth);
        let span = kind
            .children()
            .into_iter()
            .filter_map(|c| self.program.span(c))
            .fold(anchor_span, TextSpan::cover);
        self.add_raw(file, kind, span)
    }

    pub fn ident(&mut self, file: FileId, text: &str, nth: usize) -> NodeIndex {
        let span = self.find_text(file, text, nth);
        let kind = NodeKind::Identifier {
            text: text.to_string(),
        };
        self.add_raw(file, kind, span)
    }

    /// `#name`; `text` includes the `#`.
    pub fn private_ident(&mut self, file: FileId, text: &str, nth: usize) -> NodeIndex {
        let span = self.find_text(file, text, nth);
        let kind = NodeKind::PrivateIdentifier {
            text: text.to_string(),
        };
        self.add_raw(file, kind, span)
    }

    pub fn this_keyword(&mut self, file: FileId, nth: usize) -> NodeIndex {
        let span = self.find_text(file, "this", nth);
        self.add_raw(file, NodeKind::ThisKeyword, span)
    }

    pub fn super_keyword(&mut self, file: FileId, nth: usize) -> NodeIndex {
        let span = self.find_text(file, "super", nth);
        self.add_raw(file, NodeKind::SuperKeyword, span)
    }

    pub fn constructor_keyword(&mut self, file: FileId, nth: usize) -> NodeIndex {
        let span = self.find_text(file, "constructor", nth);
        self.add_raw(file, NodeKind::ConstructorKeyword, span)
    }

    pub fn keyword_type(&mut self, file: FileId, keyword: TypeKeyword, nth: usize) -> NodeIndex {
        let span = self.find_text(file, keyword.text(), nth);
        self.add_raw(file, NodeKind::KeywordType { keyword }, span)
    }

    pub fn number(&mut self, file: FileId, text: &str, nth: usize) -> NodeIndex {
        let span = self.find_text(file, text, nth);
        let kind = NodeKind::NumericLiteral {
            text: text.to_string(),
        };
        self.add_raw(file, kind, span)
    }

    /// A string literal whose unquoted text is `text`; the span includes the
    /// quotes. Single and double quotes are both matched.
    pub fn string(&mut self, file: FileId, text: &str, nth: usize) -> NodeIndex {
        let Some(source) = self.program.file(file) else {
            self.fail(BuildError::UnknownFile(file));
            return NodeIndex::NONE;
        };
        let double = format!("\"{text}\"");
        let single = format!("'{text}'");
        let mut starts: Vec<usize> = source
            .text
            .match_indices(&double)
            .chain(source.text.match_indices(&single))
            .map(|(i, _)| i)
            .collect();
        starts.sort_unstable();
        let span = match starts.get(nth) {
            Some(&start) => TextSpan::from_len(start as u32, double.len() as u32),
            None => {
                let error = BuildError::TextNotFound {
                    file: source.name.clone(),
                    needle: double,
                    nth,
                };
                self.fail(error);
                TextSpan::default()
            }
        };
        let kind = NodeKind::StringLiteral {
            text: text.to_string(),
        };
        self.add_raw(file, kind, span)
    }

    pub fn modifiers(&mut self, node: NodeIndex, flags: ModifierFlags) -> NodeIndex {
        if let Some(n) = self.program.arena.get_mut(node) {
            n.modifiers |= flags;
        }
        node
    }

    /// Close a file: its root spans the whole text and owns `statements`.
    pub fn finish_file(&mut self, file: FileId, statements: Vec<NodeIndex>) -> NodeIndex {
        let Some(len) = self.program.file(file).map(|f| f.text.len() as u32) else {
            self.fail(BuildError::UnknownFile(file));
            return NodeIndex::NONE;
        };
        let root = self.add_raw(
            file,
            NodeKind::SourceFile { statements },
            TextSpan::new(0, len),
        );
        if let Some(source) = self.program.files.get_mut(file.0 as usize) {
            source.root = root;
        }
        root
    }

    // Binder

    pub fn symbol(&mut self, name: &str, flags: SymbolFlags) -> SymbolId {
        self.program.symbols.alloc(Symbol::new(name, flags))
    }

    fn symbol_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        if self.program.symbols.get(id).is_none() {
            self.fail(BuildError::UnknownSymbol(id));
            return None;
        }
        self.program.symbols.get_mut(id)
    }

    /// Record `decl` as a declaration of `symbol`.
    pub fn declare(&mut self, symbol: SymbolId, decl: NodeIndex) {
        if let Some(sym) = self.symbol_mut(symbol) {
            sym.declarations.push(decl);
            if sym.value_declaration.is_none() && sym.flags.is_value() {
                sym.value_declaration = decl;
            }
        }
        self.program.node_symbols.insert(decl, symbol);
    }

    /// A symbol with a single declaration, in one call.
    pub fn declare_new(&mut self, name: &str, flags: SymbolFlags, decl: NodeIndex) -> SymbolId {
        let symbol = self.symbol(name, flags);
        self.declare(symbol, decl);
        symbol
    }

    /// Resolve a reference token to `symbol`.
    pub fn bind(&mut self, token: NodeIndex, symbol: SymbolId) {
        self.program.resolutions.insert(token, symbol);
    }

    pub fn bind_all(&mut self, tokens: &[NodeIndex], symbol: SymbolId) {
        for &token in tokens {
            self.bind(token, symbol);
        }
    }

    /// Make `member` a member of the class/interface/object `owner`.
    pub fn member(&mut self, owner: SymbolId, member: SymbolId) {
        let Some(name) = self.program.symbols.get(member).map(|m| m.name.clone()) else {
            self.fail(BuildError::UnknownSymbol(member));
            return;
        };
        if let Some(owner_sym) = self.symbol_mut(owner) {
            owner_sym.members.insert(name, member);
        }
        if let Some(member_sym) = self.symbol_mut(member) {
            member_sym.parent = Some(owner);
        }
    }

    /// The module symbol of `file`, created on first use.
    pub fn module_symbol(&mut self, file: FileId) -> SymbolId {
        if let Some(existing) = self.program.file(file).and_then(|f| f.symbol) {
            return existing;
        }
        let Some(name) = self.program.file(file).map(|f| format!("\"{}\"", f.name)) else {
            self.fail(BuildError::UnknownFile(file));
            return self.symbol("", SymbolFlags::VALUE_MODULE);
        };
        let mut symbol = Symbol::new(name, SymbolFlags::VALUE_MODULE);
        symbol.module_file = Some(file);
        let id = self.program.symbols.alloc(symbol);
        if let Some(source) = self.program.files.get_mut(file.0 as usize) {
            source.symbol = Some(id);
        }
        id
    }

    /// Export `symbol` from `file` under its own name.
    pub fn export(&mut self, file: FileId, symbol: SymbolId) {
        let Some(name) = self.program.symbols.get(symbol).map(|s| s.name.clone()) else {
            self.fail(BuildError::UnknownSymbol(symbol));
            return;
        };
        self.export_as(file, &name, symbol);
    }

    pub fn export_as(&mut self, file: FileId, name: &str, symbol: SymbolId) {
        let module = self.module_symbol(file);
        if let Some(module_sym) = self.symbol_mut(module) {
            module_sym.exports.insert(name.to_string(), symbol);
        }
        if let Some(sym) = self.symbol_mut(symbol) {
            sym.parent = Some(module);
        }
    }

    /// `alias` (an import binding or export specifier) stands for `target`.
    pub fn alias(&mut self, alias: SymbolId, target: SymbolId) {
        self.program.aliases.insert(alias, target);
    }

    pub fn export_target(&mut self, specifier: NodeIndex, target: SymbolId) {
        self.program.export_local_targets.insert(specifier, target);
    }

    pub fn shorthand_value(&mut self, shorthand: NodeIndex, value: SymbolId) {
        self.program.shorthand_values.insert(shorthand, value);
    }

    // Checker

    /// The instance type of a class or interface symbol.
    pub fn declared_type(&mut self, symbol: SymbolId) -> TypeId {
        let ty = self.program.types.alloc(TypeData::Object {
            symbol: Some(symbol),
            properties: FxHashMap::default(),
            base_types: Vec::new(),
        });
        self.program.declared_types.insert(symbol, ty);
        ty
    }

    pub fn object_type(&mut self, symbol: Option<SymbolId>, properties: &[(&str, SymbolId)]) -> TypeId {
        self.program.types.alloc(TypeData::Object {
            symbol,
            properties: properties
                .iter()
                .map(|(name, sym)| ((*name).to_string(), *sym))
                .collect(),
            base_types: Vec::new(),
        })
    }

    pub fn primitive_type(&mut self, keyword: TypeKeyword) -> TypeId {
        self.program.types.alloc(TypeData::Primitive(keyword))
    }

    pub fn union_type(&mut self, types: Vec<TypeId>) -> TypeId {
        self.program.types.alloc(TypeData::Union {
            types,
            properties: FxHashMap::default(),
        })
    }

    /// Synthesize the property `name` of a union from its declared roots.
    pub fn union_property(&mut self, union: TypeId, name: &str, roots: Vec<SymbolId>) -> SymbolId {
        let flags = SymbolFlags::PROPERTY | SymbolFlags::TRANSIENT;
        let mut symbol = Symbol::new(name, flags);
        for &root in &roots {
            if let Some(decls) = self.program.symbols.get(root).map(|r| r.declarations.clone()) {
                symbol.declarations.extend(decls);
            }
        }
        let id = self.program.symbols.alloc(symbol);
        self.program.root_symbols.insert(id, roots);
        match self.program.types.get_mut(union) {
            Some(TypeData::Union { properties, .. }) => {
                properties.insert(name.to_string(), id);
            }
            _ => self.fail(BuildError::NotAUnion(union)),
        }
        id
    }

    pub fn set_base_types(&mut self, ty: TypeId, bases: Vec<TypeId>) {
        if let Some(TypeData::Object { base_types, .. }) = self.program.types.get_mut(ty) {
            *base_types = bases;
        }
    }

    pub fn set_type(&mut self, node: NodeIndex, ty: TypeId) {
        self.program.node_types.insert(node, ty);
    }

    pub fn set_contextual_type(&mut self, node: NodeIndex, ty: TypeId) {
        self.program.contextual_types.insert(node, ty);
    }

    /// Validate and seal the snapshot.
    pub fn finish(mut self) -> Result<Program, BuildError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }
        let mut program = self.program;

        let mut tokens: Vec<Vec<NodeIndex>> = vec![Vec::new(); program.files.len()];
        for (i, node) in program.arena.nodes.iter().enumerate() {
            let idx = NodeIndex(i as u32);
            let Some(source) = program.files.get(node.file.0 as usize) else {
                return Err(BuildError::UnknownFile(node.file));
            };
            if node.parent.is_none() && idx != source.root {
                return Err(BuildError::Detached {
                    file: source.name.clone(),
                    node: idx,
                });
            }
            if node.kind.is_token() {
                tokens[node.file.0 as usize].push(idx);
            }
        }

        for (source, mut file_tokens) in program.files.iter_mut().zip(tokens) {
            file_tokens.sort_by_key(|&t| program.arena.get(t).map_or(0, |n| n.span.start));
            source.tokens = file_tokens;
            source.is_module = match self.explicit_module.get(&source.id) {
                Some(&explicit) => explicit,
                None => has_module_syntax(&program.arena, source.root),
            };
        }

        Ok(program)
    }
}

/// A file is a module when a top-level statement imports, exports, or
/// carries an `export` modifier.
fn has_module_syntax(arena: &crate::syntax::NodeArena, root: NodeIndex) -> bool {
    let Some(NodeKind::SourceFile { statements }) = arena.kind(root) else {
        return false;
    };
    statements.iter().any(|&stmt| {
        arena.get(stmt).is_some_and(|n| {
            n.modifiers.contains(ModifierFlags::EXPORT)
                || matches!(
                    n.kind,
                    NodeKind::ImportDeclaration { .. }
                        | NodeKind::ExportDeclaration { .. }
                        | NodeKind::ExportAssignment { .. }
                )
        })
    })
}

/// Byte offsets of `needle` in `text` that are not embedded in a longer
/// identifier.
fn word_occurrences<'a>(text: &'a str, needle: &'a str) -> impl Iterator<Item = usize> + 'a {
    text.match_indices(needle).filter_map(move |(start, _)| {
        let end = start + needle.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        let edge_ok = |c: Option<char>, word: Option<char>| match (c, word) {
            (Some(c), Some(w)) if crate::is_identifier_part(w) => !crate::is_identifier_part(c),
            _ => true,
        };
        (edge_ok(before, needle.chars().next()) && edge_ok(after, needle.chars().next_back()))
            .then_some(start)
    })
}

/// A [`ProgramBuilder`] bound to one file, so leaf constructors need only
/// their text. Binder and checker methods are reached through `Deref`.
pub struct FileBuilder<'b> {
    builder: &'b mut ProgramBuilder,
    file: FileId,
}

impl ProgramBuilder {
    /// Add a file and return a builder scoped to it.
    pub fn file(&mut self, name: &str, text: &str) -> FileBuilder<'_> {
        let file = self.add_file(name, text);
        FileBuilder {
            builder: self,
            file,
        }
    }

    /// Reopen an existing file.
    pub fn reopen(&mut self, file: FileId) -> FileBuilder<'_> {
        FileBuilder {
            builder: self,
            file,
        }
    }
}

impl FileBuilder<'_> {
    pub fn id(&self) -> FileId {
        self.file
    }

    pub fn ident(&mut self, text: &str, nth: usize) -> NodeIndex {
        self.builder.ident(self.file, text, nth)
    }

    pub fn private_ident(&mut self, text: &str, nth: usize) -> NodeIndex {
        self.builder.private_ident(self.file, text, nth)
    }

    pub fn this_keyword(&mut self, nth: usize) -> NodeIndex {
        self.builder.this_keyword(self.file, nth)
    }

    pub fn super_keyword(&mut self, nth: usize) -> NodeIndex {
        self.builder.super_keyword(self.file, nth)
    }

    pub fn constructor_keyword(&mut self, nth: usize) -> NodeIndex {
        self.builder.constructor_keyword(self.file, nth)
    }

    pub fn keyword_type(&mut self, keyword: TypeKeyword, nth: usize) -> NodeIndex {
        self.builder.keyword_type(self.file, keyword, nth)
    }

    pub fn number(&mut self, text: &str, nth: usize) -> NodeIndex {
        self.builder.number(self.file, text, nth)
    }

    pub fn string(&mut self, text: &str, nth: usize) -> NodeIndex {
        self.builder.string(self.file, text, nth)
    }

    pub fn node(&mut self, kind: NodeKind) -> NodeIndex {
        self.builder.node(self.file, kind)
    }

    pub fn node_at(&mut self, kind: NodeKind, anchor: &str, nth: usize) -> NodeIndex {
        self.builder.node_at(self.file, kind, anchor, nth)
    }

    pub fn module_symbol(&mut self) -> SymbolId {
        self.builder.module_symbol(self.file)
    }

    pub fn export(&mut self, symbol: SymbolId) {
        self.builder.export(self.file, symbol)
    }

    pub fn export_as(&mut self, name: &str, symbol: SymbolId) {
        self.builder.export_as(self.file, name, symbol)
    }

    pub fn finish(self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.builder.finish_file(self.file, statements)
    }
}

impl std::ops::Deref for FileBuilder<'_> {
    type Target = ProgramBuilder;

    fn deref(&self) -> &ProgramBuilder {
        self.builder
    }
}

impl std::ops::DerefMut for FileBuilder<'_> {
    fn deref_mut(&mut self) -> &mut ProgramBuilder {
        self.builder
    }
}

#[cfg(test)]
#[path = "../tests/builder_tests.rs"]
mod builder_tests;
