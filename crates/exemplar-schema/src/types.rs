//! # Type Model
//!
//! The schema-derived tree of type descriptors, stored in an arena owned by
//! [`Schema`] and addressed by [`TypeId`]. The model mirrors the schema
//! document's shape but shares nothing with it; the schema document can be
//! dropped once the model is built.
//!
//! ```text
//! DocumentType ─ root ─▶ MapType ─ items ─▶ MapItemType(key) ─ value ─▶ ScalarType | MapType
//!              ─ root ─▶ ScalarType
//! ```
//!
//! ## Invariants
//!
//! - Every `TypeId` stored inside the model resolves within the same arena.
//! - Within one `MapType`, `MapItemType` keys are unique under the default
//!   [`DuplicateKeyPolicy`](crate::DuplicateKeyPolicy), and items keep schema
//!   source order.
//! - The model has no mutating API; it is read-only after construction.

use std::fmt;

use exemplar_core::{Key, Position, Scalar, ScalarKind};

/// Index of a type within its schema's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) usize);

impl TypeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// A primitive type inferred from a schema default.
///
/// The default is a type witness only; data values are never compared
/// against it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarType {
    pub(crate) kind: ScalarKind,
    pub(crate) default_value: Scalar,
}

impl ScalarType {
    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn default_value(&self) -> &Scalar {
        &self.default_value
    }
}

/// The allowed items of a map, in schema source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapType {
    pub(crate) items: Vec<TypeId>,
}

impl MapType {
    /// Ids of the `MapItemType`s of this map.
    pub fn items(&self) -> &[TypeId] {
        &self.items
    }
}

/// One allowed map item: its key and the type of its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapItemType {
    pub(crate) key: Key,
    pub(crate) value: TypeId,
    pub(crate) position: Position,
}

impl MapItemType {
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Type of the item's value: a `ScalarType` or a `MapType`.
    pub fn value(&self) -> TypeId {
        self.value
    }

    /// Where the item is declared in the schema document.
    pub fn position(&self) -> &Position {
        &self.position
    }
}

/// The type of a whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentType {
    pub(crate) root: TypeId,
    pub(crate) position: Position,
}

impl DocumentType {
    /// Type of the document's value.
    pub fn root(&self) -> TypeId {
        self.root
    }

    pub fn position(&self) -> &Position {
        &self.position
    }
}

/// A type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Document(DocumentType),
    Map(MapType),
    MapItem(MapItemType),
    Scalar(ScalarType),
}

impl Type {
    /// Lowercase variant name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Document(_) => "document",
            Self::Map(_) => "map",
            Self::MapItem(_) => "map item",
            Self::Scalar(_) => "scalar",
        }
    }
}

/// An immutable type model built from one schema document.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub(crate) types: Vec<Type>,
    pub(crate) document: DocumentType,
    pub(crate) document_id: TypeId,
}

impl Schema {
    /// The type of the schema document itself.
    pub fn document(&self) -> &DocumentType {
        &self.document
    }

    /// Arena id of [`Schema::document`].
    pub fn document_id(&self) -> TypeId {
        self.document_id
    }

    pub fn get(&self, id: TypeId) -> Option<&Type> {
        self.types.get(id.0)
    }

    /// The type of the document's value.
    pub fn root(&self) -> Option<&Type> {
        self.get(self.document.root)
    }

    pub fn map_type(&self, id: TypeId) -> Option<&MapType> {
        match self.get(id)? {
            Type::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn map_item_type(&self, id: TypeId) -> Option<&MapItemType> {
        match self.get(id)? {
            Type::MapItem(item) => Some(item),
            _ => None,
        }
    }

    pub fn scalar_type(&self, id: TypeId) -> Option<&ScalarType> {
        match self.get(id)? {
            Type::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Items of `map`, in schema source order.
    pub fn map_items<'a>(
        &'a self,
        map: &'a MapType,
    ) -> impl Iterator<Item = (TypeId, &'a MapItemType)> + 'a {
        map.items
            .iter()
            .filter_map(move |id| self.map_item_type(*id).map(|item| (*id, item)))
    }

    /// The first item of `map` whose key equals `key`.
    pub fn find_item(&self, map: &MapType, key: &Key) -> Option<(TypeId, &MapItemType)> {
        map.items.iter().find_map(|id| {
            self.map_item_type(*id)
                .filter(|item| item.key == *key)
                .map(|item| (*id, item))
        })
    }

    /// Whether `map` declares an item with this key.
    pub fn allows_key(&self, map: &MapType, key: &Key) -> bool {
        self.find_item(map, key).is_some()
    }

    /// Number of types in the arena, including the document type.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Always false: a built schema contains at least its document type.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
