//! In-memory program model for reference search.
//!
//! A [`Program`] is a bound and checked snapshot of every source file: one
//! shared syntax arena, a symbol table, a type table and the resolution
//! tables the [`TypeChecker`] interface answers from. Snapshots are built
//! with [`ProgramBuilder`] and are read-only afterwards.

pub mod builder;
pub mod checker;
pub mod comments;
pub mod position;
pub mod program;
pub mod symbols;
pub mod syntax;
pub mod types;

pub use builder::{BuildError, FileBuilder, ProgramBuilder};
pub use checker::TypeChecker;
pub use comments::{CommentRange, comment_at, get_comment_ranges};
pub use position::{LineMap, Location, Position, Range, TextSpan};
pub use program::{Program, SourceFile};
pub use symbols::{Symbol, SymbolFlags, SymbolId, SymbolTable};
pub use syntax::{
    BinaryOperator, FileId, HeritageToken, ModifierFlags, Node, NodeArena, NodeIndex, NodeKind,
    TypeKeyword, UnaryOperator,
};
pub use types::{TypeData, TypeId, TypeTable};

/// Whether `c` may start an identifier (`XID_Start`, `$` or `_`).
pub fn is_identifier_start(c: char) -> bool {
    c == '$' || c == '_' || unicode_ident::is_xid_start(c)
}

/// Whether `c` may continue an identifier (`XID_Continue`, `$`, ZWNJ or ZWJ).
pub fn is_identifier_part(c: char) -> bool {
    c == '$' || c == '\u{200C}' || c == '\u{200D}' || unicode_ident::is_xid_continue(c)
}
