// 🔪 Knife Resolver
//
// Grammar: k <name tokens...> [quality] [st]
//
// Both the quality and the StatTrak token are optional:
//
//   quality + st   -> "★ StatTrak™ {name} ({quality})"
//   quality        -> "★ {name} ({quality})"
//   st only        -> every quality variant of matching Vanilla knives, StatTrak
//   neither        -> every quality variant of matching Vanilla knives
//
// Without a quality the user cannot be asking for a patterned knife (those are
// always listed with a wear), so the search narrows to Vanilla models and
// expands each one into the wears the catalog sells it in.

use crate::catalog::{Catalog, Predicate, SkinType};
use crate::error::ResolveError;
use crate::formatter::{compose, quality_variants, Markers};
use crate::names::{Quality, ST_TOKEN};
use crate::resolver::{find_skins, name_filters};
use crate::tokenizer::Query;

/// What the query asked for once the optional tokens are located
#[derive(Debug, Clone, PartialEq, Eq)]
struct KnifeRequest {
    name_end: usize,
    quality: Option<Quality>,
    stattrak: bool,
}

impl KnifeRequest {
    fn from_query(query: &Query) -> Self {
        if let Some(q_idx) = query.quality_index() {
            return KnifeRequest {
                name_end: q_idx,
                quality: Quality::from_code(&query.tokens[q_idx]),
                stattrak: query.position_from(ST_TOKEN, q_idx).is_some(),
            };
        }

        match query.position_from(ST_TOKEN, 1) {
            Some(st_idx) => KnifeRequest {
                name_end: st_idx,
                quality: None,
                stattrak: true,
            },
            None => KnifeRequest {
                name_end: query.tokens.len(),
                quality: None,
                stattrak: false,
            },
        }
    }
}

pub fn resolve_knife<C: Catalog + ?Sized>(
    catalog: &C,
    query: &Query,
) -> Result<Vec<String>, ResolveError> {
    let request = KnifeRequest::from_query(query);

    let mut predicates = vec![Predicate::SkinType(SkinType::Knife)];
    match request.quality {
        Some(quality) => predicates.push(Predicate::Quality(quality)),
        None => predicates.push(Predicate::Vanilla),
    }
    if request.stattrak {
        predicates.push(Predicate::StatTrak(true));
    }
    predicates.extend(name_filters(&query.tokens[1..request.name_end]));

    let skins = find_skins(catalog, &predicates)?;
    let markers = if request.stattrak {
        Markers::star_stattrak()
    } else {
        Markers::star()
    };

    let names = match request.quality {
        Some(quality) => skins
            .iter()
            .map(|skin| compose(&skin.full_name, Some(quality), markers))
            .collect(),
        None => skins
            .iter()
            .flat_map(quality_variants)
            .map(|variant| format!("{}{}", markers.prefix(), variant))
            .collect(),
    };
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::fixture_catalog;
    use crate::tokenizer::Category;

    fn knife(text: &str) -> Vec<String> {
        resolve_knife(&fixture_catalog(), &Query::new(Category::Knife, text)).unwrap()
    }

    #[test]
    fn test_request_parsing() {
        let request = KnifeRequest::from_query(&Query::new(Category::Knife, "k m9 fade fn st"));
        assert_eq!(
            request,
            KnifeRequest {
                name_end: 3,
                quality: Some(Quality::FactoryNew),
                stattrak: true
            }
        );

        let request = KnifeRequest::from_query(&Query::new(Category::Knife, "k karambit st"));
        assert_eq!(request.name_end, 2);
        assert!(request.stattrak);
        assert_eq!(request.quality, None);

        let request = KnifeRequest::from_query(&Query::new(Category::Knife, "k karambit"));
        assert_eq!(request.name_end, 2);
        assert!(!request.stattrak);
    }

    #[test]
    fn test_quality_and_stattrak() {
        assert_eq!(
            knife("k m9 fn st"),
            vec![
                "★ StatTrak™ M9 Bayonet | Fade (Factory New)",
                "★ StatTrak™ M9 Bayonet | Marble Fade (Factory New)",
            ]
        );
    }

    #[test]
    fn test_quality_only() {
        assert_eq!(
            knife("k karambit mw"),
            vec![
                "★ Karambit | Fade (Minimal Wear)",
                "★ Karambit | Doppler (Minimal Wear)",
            ]
        );
    }

    #[test]
    fn test_quality_only_includes_non_stattrak_records() {
        assert_eq!(knife("k bayonet ft"), vec!["★ Bayonet (Field-Tested)"]);
    }

    #[test]
    fn test_stattrak_without_quality_expands_vanilla() {
        // Bayonet is Vanilla but not StatTrak eligible
        assert_eq!(knife("k bayonet st"), vec!["★ StatTrak™ M9 Bayonet"]);
    }

    #[test]
    fn test_neither_expands_every_vanilla_variant() {
        assert_eq!(
            knife("k bayonet"),
            vec![
                "★ M9 Bayonet",
                "★ Bayonet (Factory New)",
                "★ Bayonet (Minimal Wear)",
                "★ Bayonet (Field-Tested)",
            ]
        );
    }

    #[test]
    fn test_variant_count_matches_quality_flags() {
        // Bayonet is sold in three wears, Karambit Vanilla in none (bare name)
        assert_eq!(knife("k bayonet").iter().filter(|n| n.contains("★ Bayonet")).count(), 3);
        assert_eq!(knife("k karambit"), vec!["★ Karambit"]);
    }

    #[test]
    fn test_patterned_knives_need_a_quality() {
        assert!(knife("k karambit fade").is_empty());
        assert!(knife("k safari mesh").is_empty());
    }

    #[test]
    fn test_stattrak_token_between_name_tokens() {
        // name tokens stop at "st"; trailing tokens are ignored
        assert_eq!(knife("k karambit st extra"), vec!["★ StatTrak™ Karambit"]);
    }

    #[test]
    fn test_knife_query_never_returns_guns() {
        let names = knife("k safari mesh bs");
        assert_eq!(names, vec!["★ Navaja Knife | Safari Mesh (Battle-Scarred)"]);
    }
}
