//! Checker types, reduced to what reference search asks about: the symbol a
//! type stands for, its properties, its declared bases and union members.

use crate::symbols::SymbolId;
use crate::syntax::TypeKeyword;
use rustc_hash::FxHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

#[derive(Clone, Debug)]
pub enum TypeData {
    Primitive(TypeKeyword),
    /// Class/interface instance types, object literal types and anonymous
    /// type literals. Properties not listed here are looked up on the
    /// symbol's members and then on `base_types`.
    Object {
        symbol: Option<SymbolId>,
        properties: FxHashMap<String, SymbolId>,
        base_types: Vec<TypeId>,
    },
    /// A union with its synthesized (transient) properties.
    Union {
        types: Vec<TypeId>,
        properties: FxHashMap<String, SymbolId>,
    },
}

#[derive(Debug, Default)]
pub struct TypeTable {
    types: Vec<TypeData>,
}

impl TypeTable {
    pub fn alloc(&mut self, data: TypeData) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(data);
        id
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeData> {
        self.types.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: TypeId) -> Option<&mut TypeData> {
        self.types.get_mut(id.0 as usize)
    }

    pub fn symbol_of(&self, id: TypeId) -> Option<SymbolId> {
        match self.get(id)? {
            TypeData::Object { symbol, .. } => *symbol,
            _ => None,
        }
    }

    pub fn union_members(&self, id: TypeId) -> Option<&[TypeId]> {
        match self.get(id)? {
            TypeData::Union { types, .. } => Some(types),
            _ => None,
        }
    }
}
