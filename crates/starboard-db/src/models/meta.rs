//! Bookkeeping rows: ID sequences and the schema version.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Next free ID of one table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 5, version = 1)]
#[native_db]
pub struct StoredSequence {
    /// Table name.
    #[primary_key]
    pub table: String,
    pub next: u64,
}

/// Schema version of the stored rows. Single row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 6, version = 1)]
#[native_db]
pub struct StoredSchemaVersion {
    /// Always "schema".
    #[primary_key]
    pub id: String,
    pub version: u32,
}

impl StoredSchemaVersion {
    pub const KEY: &'static str = "schema";

    pub fn new(version: u32) -> Self {
        Self {
            id: Self::KEY.to_string(),
            version,
        }
    }
}
