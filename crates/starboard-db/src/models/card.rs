//! Card catalog models for database storage.

use super::v1;
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use starboard_core::{CardId, ItemCard, NewCard, PoolType};

/// Stored catalog card.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 3, version = 2, from = v1::StoredItemCard)]
#[native_db]
pub struct StoredItemCard {
    /// Primary key - card ID.
    #[primary_key]
    pub id: u64,
    pub name: String,
    pub description: String,
    pub effect_summary: String,
    pub image_path: String,
    /// `PoolType::code`; `None` for rows migrated from the first schema.
    pub pool_type: Option<u8>,
    pub weight: f64,
}

impl From<v1::StoredItemCard> for StoredItemCard {
    fn from(old: v1::StoredItemCard) -> Self {
        Self {
            id: old.id,
            name: old.name,
            description: old.description,
            effect_summary: old.effect_summary,
            image_path: old.image_path,
            pool_type: None,
            weight: 1.0,
        }
    }
}

impl From<StoredItemCard> for v1::StoredItemCard {
    fn from(new: StoredItemCard) -> Self {
        Self {
            id: new.id,
            name: new.name,
            description: new.description,
            effect_summary: new.effect_summary,
            image_path: new.image_path,
        }
    }
}

impl StoredItemCard {
    pub fn from_new(id: u64, card: NewCard) -> Self {
        Self::from_card(&card.into_card(CardId::new(id)))
    }

    pub fn from_card(card: &ItemCard) -> Self {
        Self {
            id: card.id.raw(),
            name: card.name.clone(),
            description: card.description.clone(),
            effect_summary: card.effect_summary.clone(),
            image_path: card.image_path.clone(),
            pool_type: card.pool_type.map(|p| p.code()),
            weight: card.weight,
        }
    }

    pub fn to_card(&self) -> ItemCard {
        ItemCard {
            id: CardId::new(self.id),
            name: self.name.clone(),
            description: self.description.clone(),
            effect_summary: self.effect_summary.clone(),
            pool_type: self.pool_type.and_then(PoolType::from_code),
            weight: self.weight,
            image_path: self.image_path.clone(),
        }
    }
}
