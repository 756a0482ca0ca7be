//! Schema upgrade
//!
//! Stored rows carry their `native_model` version. The upgrade moves first
//! generation students and cards to the current version, then records the
//! schema version so later startups skip the step.

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::{Store, CARDS, ITEMS, STUDENTS, TENANTS};
use native_db::transaction::RwTransaction;

/// Version written after a successful upgrade.
pub const CURRENT_SCHEMA: u32 = 2;

impl Store {
    /// Migrate stored rows to [`CURRENT_SCHEMA`].
    ///
    /// Returns `true` when an upgrade ran, `false` when the store was already
    /// current.
    pub fn upgrade(&self) -> Result<bool> {
        let from = self.schema_version()?.unwrap_or(1);
        if from >= CURRENT_SCHEMA {
            return Ok(false);
        }

        let rw = self.db.rw_transaction()?;
        rw.migrate::<StoredStudent>()?;
        rw.migrate::<StoredItemCard>()?;
        sync_sequences(&rw)?;
        rw.upsert(StoredSchemaVersion::new(CURRENT_SCHEMA))?;
        rw.commit()?;

        tracing::info!(from, to = CURRENT_SCHEMA, "upgraded schema");
        Ok(true)
    }
}

/// Move every sequence past the highest stored ID.
///
/// Rows written by the first schema predate the sequence table.
fn sync_sequences(rw: &RwTransaction<'_>) -> Result<()> {
    macro_rules! max_id {
        ($model:ty) => {{
            let scan = rw.scan().primary::<$model>()?;
            let iter = scan.all()?;
            let rows: std::result::Result<Vec<$model>, _> = iter.collect();
            let rows = rows.map_err(|e| Error::Database(e.to_string()))?;
            rows.iter().map(|row| row.id).max().unwrap_or(0)
        }};
    }

    let highest = [
        (STUDENTS, max_id!(StoredStudent)),
        (CARDS, max_id!(StoredItemCard)),
        (ITEMS, max_id!(StoredStudentItem)),
        (TENANTS, max_id!(StoredTenant)),
    ];
    for (table, max) in highest {
        let current: Option<StoredSequence> = rw.get().primary(table.to_string())?;
        let next = current.map(|s| s.next).unwrap_or(1).max(max + 1);
        rw.upsert(StoredSequence {
            table: table.to_string(),
            next,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use starboard_core::{classify, NewCard, PoolType, StudentId, TenantId};

    fn seed_first_generation(store: &Store) {
        let rw = store.db.rw_transaction().unwrap();
        rw.insert(v1::StoredStudent {
            id: 7,
            owner_id: 1,
            name: "Alice".to_string(),
            dorm_number: Some("101".to_string()),
            stars: 4,
            pick_count: 2,
        })
        .unwrap();
        rw.insert(v1::StoredItemCard {
            id: 3,
            name: "Mass Silence".to_string(),
            description: String::new(),
            effect_summary: String::new(),
            image_path: String::new(),
        })
        .unwrap();
        rw.commit().unwrap();
    }

    #[test]
    fn test_upgrade_migrates_first_generation_rows() {
        let store = Store::in_memory().unwrap();
        seed_first_generation(&store);

        assert!(store.upgrade().unwrap());
        assert_eq!(store.schema_version().unwrap(), Some(CURRENT_SCHEMA));

        let alice = store.load_student(StudentId::new(7)).unwrap().unwrap();
        assert_eq!(alice.stars, 4);
        assert_eq!(alice.pick_count, 2);
        assert_eq!(alice.immunity, 0);
        assert!(!alice.is_cursed);
        assert_eq!(store.load_students(TenantId::new(1)).unwrap().len(), 1);

        let cards = store.load_cards().unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].pool_type, None);
        assert_eq!(cards[0].weight, 1.0);
    }

    #[test]
    fn test_migrated_cards_stay_in_their_pool() {
        let store = Store::in_memory().unwrap();
        seed_first_generation(&store);
        store.upgrade().unwrap();
        store
            .insert_card(NewCard::new("Chain Lightning", PoolType::Negative))
            .unwrap();
        store.insert_card(NewCard::new("Bard", PoolType::Normal)).unwrap();

        let cards = store.load_cards().unwrap();
        let negative: Vec<&str> = classify(&cards, PoolType::Negative)
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(negative, vec!["Mass Silence", "Chain Lightning"]);
    }

    #[test]
    fn test_upgrade_runs_once() {
        let store = Store::in_memory().unwrap();
        seed_first_generation(&store);
        assert!(store.upgrade().unwrap());
        assert!(!store.upgrade().unwrap());
        assert_eq!(store.load_cards().unwrap().len(), 1);
    }

    #[test]
    fn test_new_rows_follow_migrated_ids() {
        let store = Store::in_memory().unwrap();
        seed_first_generation(&store);
        store.upgrade().unwrap();

        let card = store
            .insert_card(NewCard::new("Bard", PoolType::Normal))
            .unwrap();
        assert_eq!(card.id.raw(), 4);
        assert_eq!(store.load_cards().unwrap().len(), 2);
    }

    #[test]
    fn test_fresh_store_records_version() {
        let store = Store::in_memory().unwrap();
        assert_eq!(store.schema_version().unwrap(), None);
        store.upgrade().unwrap();
        assert!(!store.upgrade().unwrap());
    }
}
