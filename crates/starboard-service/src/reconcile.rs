//! Catalog reconciliation
//!
//! Makes sure every card of the special card table exists in the catalog.
//! Missing names are inserted; existing rows only ever have their image
//! patched. Rows are never deleted or duplicated, so running it again on the
//! same catalog changes nothing.

use serde::{Deserialize, Serialize};
use starboard_core::{ItemCard, Repository, Result};
use starboard_script::{CardDef, CardTable};

/// Prefix older catalogs stored in front of image file names
const LEGACY_IMAGE_PREFIX: &str = "static/images/";

/// What one reconciliation pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub inserted: usize,
    pub patched: usize,
    /// Entries that could not be written; logged and skipped
    pub failed: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.patched == 0
    }
}

/// Reconcile the stored catalog against `table`.
///
/// Only reading the catalog can fail; a failed write is counted and the pass
/// moves on to the next entry.
pub fn reconcile<R>(repo: &R, table: &CardTable) -> Result<ReconcileReport>
where
    R: Repository + ?Sized,
{
    let mut catalog = repo.cards()?;
    let mut report = ReconcileReport::default();

    for def in table.iter() {
        match catalog.iter().position(|card| card.name == def.name) {
            None => match repo.insert_card(def.to_new_card()) {
                Ok(card) => {
                    tracing::info!(card = %card.name, id = %card.id, "added missing card");
                    catalog.push(card);
                    report.inserted += 1;
                }
                Err(err) => {
                    tracing::warn!(card = %def.name, error = %err, "failed to add card");
                    report.failed += 1;
                }
            },
            Some(index) => {
                let Some(patched) = patch_image(&catalog[index], def) else {
                    continue;
                };
                match repo.save_card(&patched) {
                    Ok(()) => {
                        tracing::info!(
                            card = %patched.name,
                            image = %patched.image_path,
                            "patched card image"
                        );
                        report.patched += 1;
                    }
                    Err(err) => {
                        tracing::warn!(card = %def.name, error = %err, "failed to patch card");
                        report.failed += 1;
                    }
                }
            }
        }
    }

    Ok(report)
}

/// The card with a repaired image reference, or `None` if it is fine.
fn patch_image(card: &ItemCard, def: &CardDef) -> Option<ItemCard> {
    let image = if let Some(stripped) = card.image_path.trim().strip_prefix(LEGACY_IMAGE_PREFIX) {
        stripped.to_string()
    } else if !card.has_image() && !def.image.is_empty() {
        def.image.clone()
    } else {
        return None;
    };
    Some(ItemCard {
        image_path: image,
        ..card.clone()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use starboard_core::{NewCard, PoolType};
    use starboard_db::Store;
    use starboard_script::Loader;

    fn table() -> CardTable {
        let mut loader = Loader::new();
        loader
            .load_str(
                r#"(cards: [
                    (name: "Doomsday Judgment", image: "25.jpg", pool: Negative),
                    (name: "Universal Salvation", image: "24.jpg", pool: Normal),
                    (name: "Bard", pool: Normal),
                ])"#,
            )
            .unwrap();
        loader.finish()
    }

    #[test]
    fn test_fills_empty_catalog() {
        let store = Store::in_memory().unwrap();
        let report = reconcile(&store, &table()).unwrap();
        assert_eq!(report.inserted, 3);
        assert_eq!(report.patched, 0);

        let cards = store.load_cards().unwrap();
        let doom = cards.iter().find(|c| c.name == "Doomsday Judgment").unwrap();
        assert_eq!(doom.pool_type, Some(PoolType::Negative));
        assert_eq!(doom.image_path, "25.jpg");
    }

    #[test]
    fn test_twice_gives_identical_catalog() {
        let store = Store::in_memory().unwrap();
        reconcile(&store, &table()).unwrap();
        let first = store.load_cards().unwrap();

        let report = reconcile(&store, &table()).unwrap();
        assert!(report.is_noop());
        assert_eq!(store.load_cards().unwrap(), first);
    }

    #[test]
    fn test_only_empty_images_are_patched() {
        let store = Store::in_memory().unwrap();
        let mut legacy = NewCard::new("Doomsday Judgment", PoolType::Negative);
        legacy.pool_type = None;
        legacy.description = "kept".to_string();
        store.insert_card(legacy).unwrap();
        store
            .insert_card(NewCard::new("Universal Salvation", PoolType::Normal).with_image("custom.jpg"))
            .unwrap();

        let report = reconcile(&store, &table()).unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.patched, 1);

        let cards = store.load_cards().unwrap();
        assert_eq!(cards.len(), 3);
        let doom = &cards[0];
        assert_eq!(doom.image_path, "25.jpg");
        assert_eq!(doom.description, "kept");
        assert_eq!(doom.pool_type, None);
        assert_eq!(cards[1].image_path, "custom.jpg");
    }

    #[test]
    fn test_strips_legacy_image_prefix() {
        let store = Store::in_memory().unwrap();
        store
            .insert_card(
                NewCard::new("Universal Salvation", PoolType::Normal)
                    .with_image("static/images/24.jpg"),
            )
            .unwrap();

        let report = reconcile(&store, &table()).unwrap();
        assert_eq!(report.patched, 1);
        let salvation = store
            .load_cards()
            .unwrap()
            .into_iter()
            .find(|c| c.name == "Universal Salvation")
            .unwrap();
        assert_eq!(salvation.image_path, "24.jpg");
    }
}
