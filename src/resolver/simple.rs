// 📦 Containment Resolvers - Containers, tools, stickers, patches, agents
//
// No quality or marker dimension here: every body token must be contained in
// the record's name, and the result is the stored name (stickers get their
// market prefix).

use crate::catalog::{Catalog, CatalogRecord, Family, Predicate, Side, StickerType};
use crate::error::ResolveError;
use crate::formatter::sticker_name;
use crate::resolver::name_filters;
use crate::tokenizer::Query;

/// Run a lookup and render every record with `render`
fn find_names<C, F>(
    catalog: &C,
    family: Family,
    predicates: &[Predicate],
    render: F,
) -> Result<Vec<String>, ResolveError>
where
    C: Catalog + ?Sized,
    F: Fn(&CatalogRecord) -> String,
{
    Ok(catalog
        .find(family, predicates)?
        .iter()
        .map(render)
        .collect())
}

fn stored_name(record: &CatalogRecord) -> String {
    record.search_text().to_string()
}

pub fn resolve_container<C: Catalog + ?Sized>(
    catalog: &C,
    query: &Query,
) -> Result<Vec<String>, ResolveError> {
    let predicates: Vec<Predicate> = name_filters(query.body()).collect();
    find_names(catalog, Family::Container, &predicates, stored_name)
}

pub fn resolve_tool<C: Catalog + ?Sized>(
    catalog: &C,
    query: &Query,
) -> Result<Vec<String>, ResolveError> {
    let predicates: Vec<Predicate> = name_filters(query.body()).collect();
    find_names(catalog, Family::Tool, &predicates, stored_name)
}

/// Regular and tournament stickers; patches and charms are excluded
pub fn resolve_sticker<C: Catalog + ?Sized>(
    catalog: &C,
    query: &Query,
) -> Result<Vec<String>, ResolveError> {
    let mut predicates = vec![Predicate::StickerTypeIn(vec![
        StickerType::Regular,
        StickerType::Tournament,
    ])];
    predicates.extend(name_filters(query.body()));
    find_names(catalog, Family::Sticker, &predicates, |record| {
        sticker_name(record.search_text())
    })
}

/// Patch names already carry "Patch | " from ingestion
pub fn resolve_patch<C: Catalog + ?Sized>(
    catalog: &C,
    query: &Query,
) -> Result<Vec<String>, ResolveError> {
    let mut predicates = vec![Predicate::StickerTypeIn(vec![StickerType::Patch])];
    predicates.extend(name_filters(query.body()));
    find_names(catalog, Family::Sticker, &predicates, stored_name)
}

/// `a [t|ct] <name tokens...>`
///
/// A side token alone lists every agent of that side.
pub fn resolve_agent<C: Catalog + ?Sized>(
    catalog: &C,
    query: &Query,
) -> Result<Vec<String>, ResolveError> {
    let body = query.body();
    let mut predicates = Vec::new();

    let name_tokens = match body.first().and_then(|token| Side::parse(token)) {
        Some(side) => {
            predicates.push(Predicate::Side(side));
            &body[1..]
        }
        None => body,
    };
    predicates.extend(name_filters(name_tokens));

    find_names(catalog, Family::Agent, &predicates, stored_name)
}
