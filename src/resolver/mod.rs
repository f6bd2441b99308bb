// 🎯 Resolver - Free-form query -> canonical market names
//
// resolve(catalog, category, text) is a pure function of the query and the
// catalog snapshot it reads. One function per category grammar; the category
// enum is the dispatch table.

pub mod knife;
pub mod simple;
pub mod weapon;

use log::debug;

use crate::catalog::{Catalog, CatalogRecord, Family, Predicate, SkinRecord};
use crate::error::ResolveError;
use crate::tokenizer::{normalize, Category, Query};

pub use knife::resolve_knife;
pub use simple::{resolve_agent, resolve_container, resolve_patch, resolve_sticker, resolve_tool};
pub use weapon::{resolve_glove, resolve_weapon};

/// Resolve a query whose category is already known
///
/// `query_text` may include the category prefix or omit it. A leading token
/// equal to the prefix letter is read as the prefix, so `resolve(Tool, "t")`
/// lists every tool; pass `"t t"` to filter on the letter itself. Returns an
/// empty list when nothing matches; the caller applies its own result-count
/// limit.
pub fn resolve<C: Catalog + ?Sized>(
    catalog: &C,
    category: Category,
    query_text: &str,
) -> Result<Vec<String>, ResolveError> {
    let query = Query::new(category, query_text);

    let names = match category {
        Category::Weapon => resolve_weapon(catalog, &query)?,
        Category::Glove => resolve_glove(catalog, &query)?,
        Category::Knife => resolve_knife(catalog, &query)?,
        Category::Container => resolve_container(catalog, &query)?,
        Category::Agent => resolve_agent(catalog, &query)?,
        Category::Sticker => resolve_sticker(catalog, &query)?,
        Category::Patch => resolve_patch(catalog, &query)?,
        Category::Tool => resolve_tool(catalog, &query)?,
    };

    debug!(
        "resolved {} query '{}' ({} tokens) -> {} names",
        category,
        query.text(),
        query.body().len(),
        names.len()
    );
    Ok(names)
}

/// Classify raw text by prefix and entry grammar, then resolve it
pub fn resolve_text<C: Catalog + ?Sized>(
    catalog: &C,
    query_text: &str,
) -> Result<(Category, Vec<String>), ResolveError> {
    let category = Category::classify(query_text).ok_or_else(|| {
        ResolveError::malformed(
            &normalize(query_text),
            "unknown category prefix or query does not match its grammar",
        )
    })?;
    let names = resolve(catalog, category, query_text)?;
    Ok((category, names))
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// One containment test per name token
pub(crate) fn name_filters(tokens: &[String]) -> impl Iterator<Item = Predicate> + '_ {
    tokens.iter().map(|t| Predicate::contains(t))
}

pub(crate) fn find_skins<C: Catalog + ?Sized>(
    catalog: &C,
    predicates: &[Predicate],
) -> Result<Vec<SkinRecord>, ResolveError> {
    Ok(catalog
        .find(Family::Skin, predicates)?
        .into_iter()
        .filter_map(|record| match record {
            CatalogRecord::Skin(skin) => Some(skin),
            _ => None,
        })
        .collect())
}
