//! Symbols produced by binding a program.
//!
//! Symbols live in a [`SymbolTable`] arena and are referenced by dense
//! [`SymbolId`] values. A symbol is never copied; identity is the id.

use crate::syntax::{FileId, NodeIndex};
use bitflags::bitflags;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Index of a symbol in the [`SymbolTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbolId(pub u32);

bitflags! {
    /// Semantic classification of a symbol.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SymbolFlags: u32 {
        const FUNCTION_SCOPED_VARIABLE = 1 << 0;
        const BLOCK_SCOPED_VARIABLE = 1 << 1;
        const PROPERTY = 1 << 2;
        const ENUM_MEMBER = 1 << 3;
        const FUNCTION = 1 << 4;
        const CLASS = 1 << 5;
        const INTERFACE = 1 << 6;
        const ENUM = 1 << 7;
        const VALUE_MODULE = 1 << 8;
        const TYPE_LITERAL = 1 << 9;
        const OBJECT_LITERAL = 1 << 10;
        const METHOD = 1 << 11;
        const CONSTRUCTOR = 1 << 12;
        const GET_ACCESSOR = 1 << 13;
        const SET_ACCESSOR = 1 << 14;
        const TYPE_PARAMETER = 1 << 15;
        const TYPE_ALIAS = 1 << 16;
        /// Import binding or export specifier.
        const ALIAS = 1 << 17;
        /// Synthesized by the checker (union properties, instantiations).
        const TRANSIENT = 1 << 18;
        /// Binding element without a property name, e.g. `x` in `const { x } = o`.
        const BINDING_ELEMENT = 1 << 19;
        /// Block-scoped variable declared with `const`, including `for (const x of ...)`.
        const CONST = 1 << 20;

        const VARIABLE = Self::FUNCTION_SCOPED_VARIABLE.bits() | Self::BLOCK_SCOPED_VARIABLE.bits();
        const ACCESSOR = Self::GET_ACCESSOR.bits() | Self::SET_ACCESSOR.bits();
        const CLASS_MEMBER = Self::METHOD.bits() | Self::ACCESSOR.bits() | Self::PROPERTY.bits();
        const VALUE = Self::VARIABLE.bits() | Self::PROPERTY.bits() | Self::ENUM_MEMBER.bits()
            | Self::OBJECT_LITERAL.bits() | Self::FUNCTION.bits() | Self::CLASS.bits()
            | Self::ENUM.bits() | Self::VALUE_MODULE.bits() | Self::METHOD.bits()
            | Self::ACCESSOR.bits();
        const TYPE = Self::CLASS.bits() | Self::INTERFACE.bits() | Self::ENUM.bits()
            | Self::ENUM_MEMBER.bits() | Self::TYPE_LITERAL.bits()
            | Self::TYPE_PARAMETER.bits() | Self::TYPE_ALIAS.bits();
    }
}

impl SymbolFlags {
    pub fn is_type(self) -> bool {
        self.intersects(SymbolFlags::TYPE)
    }

    pub fn is_value(self) -> bool {
        self.intersects(SymbolFlags::VALUE)
    }

    pub fn is_class_member(self) -> bool {
        self.intersects(SymbolFlags::CLASS_MEMBER)
    }

    pub fn is_class_or_interface(self) -> bool {
        self.intersects(SymbolFlags::CLASS | SymbolFlags::INTERFACE)
    }
}

/// A semantic entity.
#[derive(Clone, Debug)]
pub struct Symbol {
    pub name: String,
    pub flags: SymbolFlags,
    pub declarations: Vec<NodeIndex>,
    pub value_declaration: NodeIndex,
    /// Containing class, interface or module symbol.
    pub parent: Option<SymbolId>,
    /// Members of a class, interface or object literal, by name.
    pub members: FxHashMap<String, SymbolId>,
    /// Exports of a module symbol, by exported name.
    pub exports: FxHashMap<String, SymbolId>,
    /// The file a module symbol stands for.
    pub module_file: Option<FileId>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, flags: SymbolFlags) -> Self {
        Symbol {
            name: name.into(),
            flags,
            declarations: Vec::new(),
            value_declaration: NodeIndex::NONE,
            parent: None,
            members: FxHashMap::default(),
            exports: FxHashMap::default(),
            module_file: None,
        }
    }

    pub fn has_flags(&self, flags: SymbolFlags) -> bool {
        self.flags.intersects(flags)
    }

    pub fn is_module(&self) -> bool {
        self.module_file.is_some()
    }
}

/// Arena of symbols for one program snapshot.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(symbol);
        id
    }

    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: SymbolId) -> Option<&mut Symbol> {
        self.symbols.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SymbolId, &Symbol)> {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (SymbolId(i as u32), s))
    }
}
