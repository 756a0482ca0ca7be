//! Starboard DB - Database layer using native_db
//!
//! Provides persistent storage for:
//! - Tenants and their student rosters
//! - The item card catalog
//! - Student inventory
//!
//! [`Store`] implements [`starboard_core::Repository`]. Call
//! [`Store::upgrade`] once after opening to migrate rows written by older
//! schema versions.

mod error;
mod migrate;
mod models;
mod queries;
mod repository;
mod store;

pub use error::{Error, Result};
pub use migrate::CURRENT_SCHEMA;
pub use store::Store;
