//! Database models for persistent storage.
//!
//! Rows that changed shape keep their previous version in [`v1`] so that
//! `native_db` can migrate stored data forward.

mod card;
mod meta;
mod student;
mod tenant;
pub mod v1;

pub use card::*;
pub use meta::*;
pub use student::*;
pub use tenant::*;
