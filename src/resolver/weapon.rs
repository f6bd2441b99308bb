// 🔫 Weapon / Glove Resolver
//
// Grammar: <prefix> <name tokens...> <quality> [st|sv]
// The quality token is located by scanning, not by position, because names
// have any number of tokens.

use crate::catalog::{Catalog, Predicate, SkinType};
use crate::error::ResolveError;
use crate::formatter::{compose, Markers};
use crate::names::{Quality, ST_TOKEN, SV_TOKEN};
use crate::resolver::{find_skins, name_filters};
use crate::tokenizer::Query;

/// First quality token after the prefix; mandatory for weapons and gloves
fn locate_quality(query: &Query) -> Result<(usize, Quality), ResolveError> {
    query
        .quality_index()
        .and_then(|idx| Quality::from_code(&query.tokens[idx]).map(|q| (idx, q)))
        .ok_or_else(|| {
            ResolveError::malformed(&query.text(), "missing quality token (fn, mw, ft, ww, bs)")
        })
}

pub fn resolve_weapon<C: Catalog + ?Sized>(
    catalog: &C,
    query: &Query,
) -> Result<Vec<String>, ResolveError> {
    let (q_idx, quality) = locate_quality(query)?;
    let stattrak = query.position_from(ST_TOKEN, q_idx).is_some();
    let souvenir = query.position_from(SV_TOKEN, q_idx).is_some();

    let mut predicates = vec![Predicate::Quality(quality), Predicate::SkinType(SkinType::Gun)];

    // Both markers typed: Souvenir wins, matching the formatter's precedence.
    let markers = if souvenir {
        predicates.push(Predicate::Souvenir(true));
        Markers::souvenir()
    } else if stattrak {
        predicates.push(Predicate::StatTrak(true));
        Markers::stattrak()
    } else {
        Markers::plain()
    };

    predicates.extend(name_filters(&query.tokens[1..q_idx]));

    let skins = find_skins(catalog, &predicates)?;
    Ok(skins
        .iter()
        .map(|skin| compose(&skin.full_name, Some(quality), markers))
        .collect())
}

/// Gloves always carry the star and never StatTrak or Souvenir
pub fn resolve_glove<C: Catalog + ?Sized>(
    catalog: &C,
    query: &Query,
) -> Result<Vec<String>, ResolveError> {
    let (q_idx, quality) = locate_quality(query)?;

    let mut predicates = vec![Predicate::Quality(quality), Predicate::SkinType(SkinType::Glove)];
    predicates.extend(name_filters(&query.tokens[1..q_idx]));

    let skins = find_skins(catalog, &predicates)?;
    Ok(skins
        .iter()
        .map(|skin| compose(&skin.full_name, Some(quality), Markers::star()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::fixture_catalog;
    use crate::names::STATTRAK;
    use crate::tokenizer::Category;

    fn weapon(text: &str) -> Result<Vec<String>, ResolveError> {
        resolve_weapon(&fixture_catalog(), &Query::new(Category::Weapon, text))
    }

    fn glove(text: &str) -> Vec<String> {
        resolve_glove(&fixture_catalog(), &Query::new(Category::Glove, text)).unwrap()
    }

    #[test]
    fn test_stattrak_query_marks_every_name() {
        let names = weapon("w ak-47 redline ft st").unwrap();
        assert!(!names.is_empty());
        for name in &names {
            assert!(name.starts_with(STATTRAK), "{}", name);
            assert!(name.ends_with("(Field-Tested)"), "{}", name);
        }
    }

    #[test]
    fn test_plain_query_lists_every_gun_in_quality() {
        let names = weapon("w ak-47 ft").unwrap();
        assert_eq!(
            names,
            vec![
                "AK-47 | Redline (Field-Tested)",
                "AK-47 | Asiimov (Field-Tested)",
                "AK-47 | Safari Mesh (Field-Tested)",
            ]
        );
    }

    #[test]
    fn test_quality_flag_filters_records() {
        // Redline is not sold Factory New, Asiimov neither
        let names = weapon("w ak-47 fn").unwrap();
        assert_eq!(names, vec!["AK-47 | Safari Mesh (Factory New)"]);
    }

    #[test]
    fn test_stattrak_excludes_non_stattrak_records() {
        let names = weapon("w ak-47 ww st").unwrap();
        assert_eq!(
            names,
            vec![
                "StatTrak™ AK-47 | Redline (Well-Worn)",
                "StatTrak™ AK-47 | Asiimov (Well-Worn)",
            ]
        );
    }

    #[test]
    fn test_souvenir_query() {
        let names = weapon("w dragon lore fn sv").unwrap();
        assert_eq!(names, vec!["Souvenir AWP | Dragon Lore (Factory New)"]);

        assert!(weapon("w redline ft sv").unwrap().is_empty());
    }

    #[test]
    fn test_both_markers_prefer_souvenir() {
        let names = weapon("w safari mesh bs st sv").unwrap();
        assert_eq!(names, vec!["Souvenir AK-47 | Safari Mesh (Battle-Scarred)"]);
    }

    #[test]
    fn test_token_order_is_irrelevant() {
        assert_eq!(
            weapon("w redline ak-47 ft").unwrap(),
            weapon("w ak-47 redline ft").unwrap()
        );
    }

    #[test]
    fn test_first_quality_token_wins() {
        // "mw" before "ft": the name part is only "ak-47"
        let names = weapon("w ak-47 mw ft").unwrap();
        assert!(names.iter().all(|n| n.ends_with("(Minimal Wear)")));
        assert!(names.contains(&"AK-47 | Redline (Minimal Wear)".to_string()));
    }

    #[test]
    fn test_marker_before_quality_is_a_name_token() {
        // "st" ahead of the quality is matched as text, not as StatTrak
        let names = weapon("w st ft").unwrap();
        assert!(names.iter().all(|n| !n.starts_with(STATTRAK)));
    }

    #[test]
    fn test_knives_and_gloves_never_match_weapon_queries() {
        assert!(weapon("w safari mesh ft").unwrap().iter().all(|n| n.starts_with("AK-47")));
        assert!(weapon("w gloves ft").unwrap().is_empty());
    }

    #[test]
    fn test_missing_quality_is_malformed() {
        let err = weapon("w ak-47 redline").unwrap_err();
        assert!(matches!(err, ResolveError::MalformedQuery { .. }));
    }

    #[test]
    fn test_glove_names_carry_star_only() {
        let names = glove("g gloves ft");
        assert_eq!(
            names,
            vec![
                "★ Sport Gloves | Pandora's Box (Field-Tested)",
                "★ Specialist Gloves | Crimson Kimono (Field-Tested)",
            ]
        );
        for name in &names {
            assert!(name.starts_with("★ "));
            assert!(!name.contains("StatTrak™"));
            assert!(!name.contains("Souvenir"));
        }
    }

    #[test]
    fn test_glove_quality_filter() {
        assert_eq!(
            glove("g kimono fn"),
            Vec::<String>::new(),
        );
        assert_eq!(
            glove("g pandora fn"),
            vec!["★ Sport Gloves | Pandora's Box (Factory New)"]
        );
    }
}
