//! Pool classification
//!
//! Splits the catalog into the normal and negative pools. Rows written before
//! pools existed carry no `pool_type`; for those the classifier falls back to
//! a fixed list of card names that were always treated as negative.

use crate::{Error, ItemCard, PoolType, Result};

/// Cards classified as negative when a catalog has no pool types.
pub const LEGACY_NEGATIVE_NAMES: [&str; 4] = [
    "Mass Silence",
    "Doomsday Judgment",
    "Dark Curse",
    "One Man Guard",
];

pub fn is_legacy_negative(name: &str) -> bool {
    LEGACY_NEGATIVE_NAMES.contains(&name)
}

/// Pool a card belongs to: its own `pool_type`, or the name list for rows
/// written before pools existed.
pub fn pool_of(card: &ItemCard) -> PoolType {
    match card.pool_type {
        Some(pool) => pool,
        None if is_legacy_negative(&card.name) => PoolType::Negative,
        None => PoolType::Normal,
    }
}

/// Select the candidate cards for a pool request.
///
/// Every card lands in exactly one pool through [`pool_of`], so typed and
/// untyped rows can share a catalog. The result is never empty for a
/// non-empty catalog: an empty pool falls back to the whole catalog.
pub fn classify(catalog: &[ItemCard], pool: PoolType) -> Result<Vec<&ItemCard>> {
    if catalog.is_empty() {
        return Err(Error::NoItemsAvailable);
    }

    let candidates: Vec<&ItemCard> = catalog
        .iter()
        .filter(|card| pool_of(card) == pool)
        .collect();
    if !candidates.is_empty() {
        return Ok(candidates);
    }

    Ok(catalog.iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CardId, NewCard};

    fn card(id: u64, name: &str, pool: Option<PoolType>) -> ItemCard {
        let mut new = NewCard::new(name, PoolType::Normal);
        new.pool_type = pool;
        new.into_card(CardId::new(id))
    }

    fn names<'a>(cards: &[&'a ItemCard]) -> Vec<&'a str> {
        cards.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_typed_catalog_partitions_by_pool() {
        let catalog = vec![
            card(1, "Legion Glory", Some(PoolType::Normal)),
            card(2, "Chain Lightning", Some(PoolType::Negative)),
            card(3, "Stealth Cloak", Some(PoolType::Normal)),
        ];

        let negative = classify(&catalog, PoolType::Negative).unwrap();
        assert_eq!(names(&negative), vec!["Chain Lightning"]);
        assert!(negative
            .iter()
            .all(|c| c.pool_type != Some(PoolType::Normal)));

        let normal = classify(&catalog, PoolType::Normal).unwrap();
        assert_eq!(names(&normal), vec!["Legion Glory", "Stealth Cloak"]);
    }

    #[test]
    fn test_untyped_catalog_uses_name_list() {
        let catalog = vec![
            card(1, "Doomsday Judgment", None),
            card(2, "Legion Glory", None),
            card(3, "Dark Curse", None),
            card(4, "Bard", None),
        ];

        let negative = classify(&catalog, PoolType::Negative).unwrap();
        assert_eq!(names(&negative), vec!["Doomsday Judgment", "Dark Curse"]);
        assert!(negative.iter().all(|c| is_legacy_negative(&c.name)));

        let normal = classify(&catalog, PoolType::Normal).unwrap();
        assert_eq!(names(&normal), vec!["Legion Glory", "Bard"]);
    }

    #[test]
    fn test_mixed_catalog_keeps_untyped_rows() {
        let catalog = vec![
            card(1, "Mass Silence", None),
            card(2, "Old Scroll", None),
            card(3, "Chain Lightning", Some(PoolType::Negative)),
            card(4, "Bard", Some(PoolType::Normal)),
            // An explicit pool wins over the name list
            card(5, "Dark Curse", Some(PoolType::Normal)),
        ];

        let negative = classify(&catalog, PoolType::Negative).unwrap();
        assert_eq!(names(&negative), vec!["Mass Silence", "Chain Lightning"]);

        let normal = classify(&catalog, PoolType::Normal).unwrap();
        assert_eq!(names(&normal), vec!["Old Scroll", "Bard", "Dark Curse"]);
        assert_eq!(negative.len() + normal.len(), catalog.len());
    }

    #[test]
    fn test_falls_back_to_whole_catalog() {
        let catalog = vec![card(1, "Bard", None), card(2, "Life Elixir", None)];
        let negative = classify(&catalog, PoolType::Negative).unwrap();
        assert_eq!(negative.len(), 2);

        // Only negative typed cards: a normal request still finds something
        let catalog = vec![card(1, "Mass Silence", Some(PoolType::Negative))];
        let normal = classify(&catalog, PoolType::Normal).unwrap();
        assert_eq!(names(&normal), vec!["Mass Silence"]);
    }

    #[test]
    fn test_empty_catalog() {
        assert_eq!(
            classify(&[], PoolType::Normal).unwrap_err(),
            Error::NoItemsAvailable
        );
    }
}
