//! Starboard Core - classroom reward engine
//!
//! This crate holds the storage-independent part of starboard:
//! - Domain rows (`Student`, `ItemCard`, `StudentItem`, `Tenant`)
//! - Pool classification and the weighted draw engine
//! - The closed catalog of card effects and their resolver
//! - The student ledger that applies effect mutations
//! - Injectable random sources (`GameRng`, `SequenceRng`)
//!
//! ## Draw pipeline
//!
//! ```text
//! catalog ──classify──▶ candidates ──draw──▶ card
//!                                              │
//!                                   CardEffect::from_name
//!                                              │
//! roster ──Ledger──▶ resolve(effect, acting) ──▶ mutations ──apply──▶ changed rows
//! ```
//!
//! Persistence is behind the [`Repository`] trait; `starboard-db` provides the
//! `native_db` implementation.

mod card;
mod draw;
pub mod effect;
mod error;
mod identity;
mod ledger;
mod picker;
mod pool;
mod repository;
mod rng;
pub mod roster;
mod student;

pub use card::{ItemCard, NewCard, PoolType};
pub use draw::{draw, effective_weight};
pub use effect::{
    resolve, CardEffect, ChainHop, LedgerMutation, Mutation, Outcome, Resolution, TargetRule,
};
pub use error::{Error, Result};
pub use identity::{CardId, ItemId, StudentId, TenantId};
pub use ledger::Ledger;
pub use picker::{pick_student, pick_weight};
pub use pool::{classify, is_legacy_negative, pool_of, LEGACY_NEGATIVE_NAMES};
pub use repository::Repository;
pub use rng::{GameRng, RandomSource, SequenceRng};
pub use roster::{RosterImport, RosterRow};
pub use student::{NewStudent, RosterStats, Student, StudentItem, StudentUpdate, Tenant};
