//! Tenant models for database storage.

use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};
use starboard_core::{Tenant, TenantId};

/// Stored teacher account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredTenant {
    #[primary_key]
    pub id: u64,
    #[secondary_key(unique)]
    pub username: String,
    pub is_admin: bool,
}

impl StoredTenant {
    pub fn to_tenant(&self) -> Tenant {
        Tenant {
            id: TenantId::new(self.id),
            username: self.username.clone(),
            is_admin: self.is_admin,
        }
    }
}
