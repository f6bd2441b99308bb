// 🔍 Search - Prefix-less lookup over every catalog name
//
// No category grammar: each word of the query must be contained in the name.
// Results come back sorted by name across all families.

use crate::catalog::{Catalog, CatalogRecord, Family, Predicate, StickerType};
use crate::error::ResolveError;
use crate::formatter::{sticker_name, STICKER_PREFIX};
use crate::tokenizer::tokenize;

/// A search at or past this many hits is rejected as too broad
pub const SEARCH_LIMIT: usize = 20;

/// Accepted query length in characters, after trimming
pub const MIN_QUERY_LEN: usize = 3;
pub const MAX_QUERY_LEN: usize = 100;

/// The market name a record is listed under
pub fn listed_name(record: &CatalogRecord) -> String {
    match record {
        CatalogRecord::Sticker(sticker)
            if matches!(
                sticker.sticker_type,
                StickerType::Regular | StickerType::Tournament
            ) =>
        {
            sticker_name(&sticker.full_name)
        }
        other => other.search_text().to_string(),
    }
}

/// Every catalog name containing all words of `text`, sorted by name
pub fn search_names<C: Catalog + ?Sized>(
    catalog: &C,
    text: &str,
) -> Result<Vec<String>, ResolveError> {
    let words = tokenize(text);
    if words.is_empty() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for family in Family::ALL {
        let records = catalog.find(family, &prefilter(family, &words))?;
        names.extend(
            records
                .iter()
                .map(listed_name)
                .filter(|name| contains_all(name, &words)),
        );
    }

    names.sort();
    names.dedup();
    Ok(names)
}

/// Exact (case-sensitive) lookup of a listed name
pub fn find_by_name<C: Catalog + ?Sized>(
    catalog: &C,
    name: &str,
) -> Result<Option<String>, ResolveError> {
    let stored = name.strip_prefix(STICKER_PREFIX).unwrap_or(name);
    if stored.is_empty() {
        return Ok(None);
    }

    for family in Family::ALL {
        let needle = if family == Family::Sticker { stored } else { name };
        let found = catalog
            .find(family, &[Predicate::contains(needle)])?
            .iter()
            .map(listed_name)
            .find(|listed| listed == name);
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

/// Containment filters the store can apply before the listed-name check.
///
/// Sticker words that also occur in the listing prefix may match the prefix
/// rather than the stored name, so they are left to the final check.
fn prefilter(family: Family, words: &[String]) -> Vec<Predicate> {
    let prefix = STICKER_PREFIX.to_lowercase();
    words
        .iter()
        .filter(|word| family != Family::Sticker || !prefix.contains(word.as_str()))
        .map(|word| Predicate::contains(word))
        .collect()
}

fn contains_all(name: &str, words: &[String]) -> bool {
    let name = name.to_lowercase();
    words.iter().all(|word| name.contains(word.as_str()))
}
