// Item catalog - records, lookup interface and the in-memory store
//
// The SQLite-backed store lives in db.rs next to the importer.

pub mod memory;
pub mod predicate;
pub mod records;

#[cfg(test)]
pub(crate) mod fixtures;

pub use memory::MemoryCatalog;
pub use predicate::{check_predicates, Catalog, Predicate};
pub use records::{
    AgentRecord, CatalogRecord, ContainerRecord, Family, KnifeSkin, Side, SkinKind, SkinRecord,
    SkinType, StickerRecord, StickerType, ToolRecord,
};
