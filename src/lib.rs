// Item Resolver - Core Library
// Free-form item queries -> canonical market names. Exposes all modules for
// use in the CLI, the API server, and tests.

pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod formatter;
pub mod names;
pub mod resolver;
pub mod search;
pub mod selection;
pub mod tokenizer;

// Re-export commonly used types
pub use catalog::{
    check_predicates, AgentRecord, Catalog, CatalogRecord, ContainerRecord, Family, KnifeSkin,
    MemoryCatalog, Predicate, Side, SkinKind, SkinRecord, SkinType, StickerRecord, StickerType,
    ToolRecord,
};
pub use config::{init_logging, Config};
pub use db::{
    compute_record_hash, get_import_runs, import_csv, insert_records, load_csv, record_import,
    setup_database, verify_count, ImportRun, ImportStats, SqliteCatalog,
};
pub use error::{CatalogError, ResolveError};
pub use formatter::{compose, quality_variants, sticker_name, Markers};
pub use names::{Quality, QualitySet, MAX_SELECTABLE, SOUVENIR, STAR, STATTRAK};
pub use resolver::{
    resolve, resolve_agent, resolve_container, resolve_glove, resolve_knife, resolve_patch,
    resolve_sticker, resolve_text, resolve_tool, resolve_weapon,
};
pub use search::{
    find_by_name, listed_name, search_names, MAX_QUERY_LEN, MIN_QUERY_LEN, SEARCH_LIMIT,
};
pub use selection::Selection;
pub use tokenizer::{normalize, tokenize, Category, Query};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
