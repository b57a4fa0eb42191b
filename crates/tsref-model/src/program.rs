//! The program snapshot: every source file, the shared node arena, the symbol
//! table and the checker tables that answer semantic queries.
//!
//! A `Program` is immutable once built (see [`crate::builder`]); reference
//! search only ever reads it.

use crate::comments::CommentRange;
use crate::position::{LineMap, TextSpan};
use crate::symbols::{Symbol, SymbolId, SymbolTable};
use crate::syntax::{FileId, ModifierFlags, Node, NodeArena, NodeIndex, NodeKind};
use crate::types::{TypeId, TypeTable};
use rustc_hash::FxHashMap;

/// One file of the program.
#[derive(Debug)]
pub struct SourceFile {
    pub id: FileId,
    pub name: String,
    pub text: String,
    pub root: NodeIndex,
    pub line_map: LineMap,
    /// Whether the file is an external module (has imports or exports).
    /// Top-level declarations of a non-module file are global.
    pub is_module: bool,
    pub comments: Vec<CommentRange>,
    /// Token nodes sorted by start offset.
    pub tokens: Vec<NodeIndex>,
    /// The module symbol, for module files.
    pub symbol: Option<SymbolId>,
}

/// An immutable snapshot of a bound and checked program.
#[derive(Debug, Default)]
pub struct Program {
    pub(crate) arena: NodeArena,
    pub(crate) files: Vec<SourceFile>,
    pub(crate) symbols: SymbolTable,
    pub(crate) types: TypeTable,
    /// Declaration node -> declared symbol.
    pub(crate) node_symbols: FxHashMap<NodeIndex, SymbolId>,
    /// Name token -> the symbol it resolves to.
    pub(crate) resolutions: FxHashMap<NodeIndex, SymbolId>,
    /// Alias symbol -> immediately aliased symbol.
    pub(crate) aliases: FxHashMap<SymbolId, SymbolId>,
    pub(crate) declared_types: FxHashMap<SymbolId, TypeId>,
    pub(crate) node_types: FxHashMap<NodeIndex, TypeId>,
    pub(crate) contextual_types: FxHashMap<NodeIndex, TypeId>,
    /// Shorthand property assignment -> the value symbol it reads.
    pub(crate) shorthand_values: FxHashMap<NodeIndex, SymbolId>,
    /// Export specifier -> the local (or re-exported) symbol it exports.
    pub(crate) export_local_targets: FxHashMap<NodeIndex, SymbolId>,
    /// Transient symbol -> the declared symbols it was synthesized from.
    pub(crate) root_symbols: FxHashMap<SymbolId, Vec<SymbolId>>,
}

impl Program {
    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0 as usize)
    }

    pub fn file_by_name(&self, name: &str) -> Option<&SourceFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.arena.get(idx)
    }

    pub fn kind(&self, idx: NodeIndex) -> Option<&NodeKind> {
        self.arena.kind(idx)
    }

    pub fn parent(&self, idx: NodeIndex) -> NodeIndex {
        self.arena.parent(idx)
    }

    pub fn span(&self, idx: NodeIndex) -> Option<TextSpan> {
        self.node(idx).map(|n| n.span)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    pub fn source_file_of(&self, idx: NodeIndex) -> Option<&SourceFile> {
        self.node(idx).and_then(|n| self.file(n.file))
    }

    /// The symbol declared by a declaration node.
    pub fn declared_symbol(&self, decl: NodeIndex) -> Option<SymbolId> {
        self.node_symbols.get(&decl).copied()
    }

    /// Text of an identifier-like token, without quotes for literals.
    pub fn name_text(&self, idx: NodeIndex) -> Option<&str> {
        self.kind(idx).and_then(NodeKind::text)
    }

    /// Raw source text covered by a node.
    pub fn node_source(&self, idx: NodeIndex) -> &str {
        let Some(node) = self.node(idx) else {
            return "";
        };
        self.file(node.file)
            .and_then(|f| f.text.get(node.span.start as usize..node.span.end as usize))
            .unwrap_or("")
    }

    /// The token whose span contains `offset` (or ends exactly at it).
    pub fn touching_token(&self, file: FileId, offset: u32) -> Option<NodeIndex> {
        let source = self.file(file)?;
        let after = source
            .tokens
            .partition_point(|&t| self.span(t).is_some_and(|s| s.start <= offset));
        let candidate = *source.tokens.get(after.checked_sub(1)?)?;
        self.span(candidate)
            .filter(|s| s.touches(offset))
            .map(|_| candidate)
    }

    pub fn ancestors(&self, idx: NodeIndex) -> Ancestors<'_> {
        Ancestors {
            arena: &self.arena,
            current: self.parent(idx),
        }
    }

    pub fn find_ancestor(
        &self,
        idx: NodeIndex,
        mut pred: impl FnMut(&NodeKind) -> bool,
    ) -> Option<NodeIndex> {
        self.ancestors(idx)
            .find(|&a| self.kind(a).is_some_and(|k| pred(k)))
    }

    /// Pre-order walk of `root` and everything under it.
    pub fn descendants(&self, root: NodeIndex) -> Descendants<'_> {
        Descendants {
            arena: &self.arena,
            stack: root.some().into_iter().collect(),
        }
    }

    /// Modifiers of a declaration, including those written on an enclosing
    /// variable statement.
    pub fn effective_modifiers(&self, decl: NodeIndex) -> ModifierFlags {
        let Some(node) = self.node(decl) else {
            return ModifierFlags::empty();
        };
        let mut flags = node.modifiers;
        if matches!(node.kind, NodeKind::VariableDeclaration { .. }) {
            if let Some(stmt) = self.node(node.parent) {
                if matches!(stmt.kind, NodeKind::VariableStatement { .. }) {
                    flags |= stmt.modifiers;
                }
            }
        }
        flags
    }

    pub fn is_static(&self, decl: NodeIndex) -> bool {
        self.node(decl)
            .is_some_and(|n| n.modifiers.contains(ModifierFlags::STATIC))
    }

    /// The declaration that `name` names, if `name` sits in a declaration's
    /// name slot.
    pub fn declaration_of_name(&self, name: NodeIndex) -> Option<NodeIndex> {
        let parent = self.parent(name);
        let kind = self.kind(parent)?;
        (kind.declaration_name() == Some(name)).then_some(parent)
    }

    /// The name node of a declaration (the `constructor` keyword for
    /// constructors).
    pub fn name_of_declaration(&self, decl: NodeIndex) -> Option<NodeIndex> {
        self.kind(decl)?.declaration_name()
    }

    /// The class, class expression or interface a member belongs to.
    pub fn class_of_member(&self, member: NodeIndex) -> Option<NodeIndex> {
        let parent = self.parent(member);
        let kind = self.kind(parent)?;
        (kind.is_class_like() || matches!(kind, NodeKind::InterfaceDeclaration { .. }))
            .then_some(parent)
    }

    /// Nearest enclosing node that can own named declarations: the file, a
    /// function, method or accessor, a class, interface or enum.
    pub fn container_of(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.find_ancestor(idx, |k| {
            matches!(
                k,
                NodeKind::SourceFile { .. }
                    | NodeKind::MethodDeclaration { .. }
                    | NodeKind::MethodSignature { .. }
                    | NodeKind::FunctionDeclaration { .. }
                    | NodeKind::FunctionExpression { .. }
                    | NodeKind::GetAccessor { .. }
                    | NodeKind::SetAccessor { .. }
                    | NodeKind::ClassDeclaration { .. }
                    | NodeKind::InterfaceDeclaration { .. }
                    | NodeKind::EnumDeclaration { .. }
            )
        })
    }

    /// The node that determines what `this` means at `idx`. Arrow functions
    /// are transparent.
    pub fn this_container(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.find_ancestor(idx, |k| {
            matches!(
                k,
                NodeKind::FunctionDeclaration { .. }
                    | NodeKind::FunctionExpression { .. }
                    | NodeKind::PropertyDeclaration { .. }
                    | NodeKind::PropertySignature { .. }
                    | NodeKind::MethodDeclaration { .. }
                    | NodeKind::MethodSignature { .. }
                    | NodeKind::Constructor { .. }
                    | NodeKind::GetAccessor { .. }
                    | NodeKind::SetAccessor { .. }
                    | NodeKind::EnumDeclaration { .. }
                    | NodeKind::SourceFile { .. }
            )
        })
    }

    /// The class member that owns a `super` at `idx`. Arrow functions and
    /// nested function expressions are looked through.
    pub fn super_container(&self, idx: NodeIndex) -> Option<NodeIndex> {
        for ancestor in self.ancestors(idx) {
            match self.kind(ancestor)? {
                NodeKind::PropertyDeclaration { .. }
                | NodeKind::PropertySignature { .. }
                | NodeKind::MethodDeclaration { .. }
                | NodeKind::MethodSignature { .. }
                | NodeKind::Constructor { .. }
                | NodeKind::GetAccessor { .. }
                | NodeKind::SetAccessor { .. } => return Some(ancestor),
                NodeKind::SourceFile { .. } => return None,
                _ => {}
            }
        }
        None
    }

    /// Type nodes of every `extends`/`implements` clause of a class or
    /// interface declaration.
    pub fn super_type_nodes(&self, decl: NodeIndex) -> Vec<NodeIndex> {
        let Some(kind) = self.kind(decl) else {
            return Vec::new();
        };
        kind.heritage_clauses()
            .iter()
            .filter_map(|&clause| match self.kind(clause) {
                Some(NodeKind::HeritageClause { types, .. }) => Some(types.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Whether the source file is an external module.
    pub fn is_module_file(&self, file: FileId) -> bool {
        self.file(file).is_some_and(|f| f.is_module)
    }

    /// Resolve a module specifier written in `from` to a program file.
    ///
    /// Relative specifiers are joined with the importing file's directory;
    /// bare specifiers match a file by its extension-less path. `.ts`,
    /// `.tsx`, `.d.ts` and `.js` extensions and `/index` suffixes are
    /// ignored on both sides.
    pub fn module_file_for_specifier(&self, from: FileId, specifier: &str) -> Option<FileId> {
        let from_name = &self.file(from)?.name;
        let wanted = if specifier.starts_with("./") || specifier.starts_with("../") {
            let dir = from_name.rsplit_once('/').map_or("", |(d, _)| d);
            normalize_path(&format!("{dir}/{specifier}"))
        } else {
            normalize_path(specifier)
        };
        let wanted = strip_module_suffixes(&wanted);
        self.files
            .iter()
            .find(|f| strip_module_suffixes(&normalize_path(&f.name)) == wanted)
            .map(|f| f.id)
    }
}

fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

fn strip_module_suffixes(path: &str) -> &str {
    let path = [".d.ts", ".tsx", ".ts", ".js"]
        .iter()
        .find_map(|ext| path.strip_suffix(ext))
        .unwrap_or(path);
    path.strip_suffix("/index").unwrap_or(path)
}

/// Parent chain of a node, nearest first.
pub struct Ancestors<'a> {
    arena: &'a NodeArena,
    current: NodeIndex,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let current = self.current.some()?;
        self.current = self.arena.parent(current);
        Some(current)
    }
}

/// Pre-order traversal over a subtree.
pub struct Descendants<'a> {
    arena: &'a NodeArena,
    stack: Vec<NodeIndex>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let current = self.stack.pop()?;
        if let Some(kind) = self.arena.kind(current) {
            self.stack.extend(kind.children().into_iter().rev());
        }
        Some(current)
    }
}

#[cfg(test)]
#[path = "../tests/program_tests.rs"]
mod program_tests;
