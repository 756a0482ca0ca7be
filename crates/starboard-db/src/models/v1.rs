//! First-generation rows, kept for migration.
//!
//! Students had no curse or immunity state and cards had no pool or weight.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredStudent {
    #[primary_key]
    pub id: u64,
    #[secondary_key]
    pub owner_id: u64,
    pub name: String,
    pub dorm_number: Option<String>,
    pub stars: i64,
    pub pick_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 3, version = 1)]
#[native_db]
pub struct StoredItemCard {
    #[primary_key]
    pub id: u64,
    pub name: String,
    pub description: String,
    pub effect_summary: String,
    pub image_path: String,
}
