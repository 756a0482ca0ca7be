//! Starboard Service - request-level orchestration
//!
//! Wires the engine in `starboard-core` to a [`Repository`] and the special
//! card table:
//! - Startup: schema upgrade, catalog reconciliation, admin seeding
//! - The draw pipeline: classify, sample, record, resolve, apply, persist
//! - Roster, inventory and tenant operations with ownership checks
//!
//! ## Example
//!
//! ```no_run
//! use starboard_core::{PoolType, RosterRow};
//! use starboard_service::{Service, ServiceConfig};
//!
//! let service = Service::open(&ServiceConfig::default()).unwrap();
//! service.startup();
//!
//! let teacher = service.register_tenant("ms-lee").unwrap();
//! service
//!     .import_roster(teacher.id, &[RosterRow::new("Alice", Some("101"))])
//!     .unwrap();
//! let alice = service.students(teacher.id).unwrap()[0].id;
//! let outcome = service.draw_item(teacher.id, alice, PoolType::Normal).unwrap();
//! println!("{} drew {}", alice, outcome.card.name);
//! ```
//!
//! [`Repository`]: starboard_core::Repository

mod config;
mod error;
mod reconcile;
mod service;

pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use reconcile::{reconcile, ReconcileReport};
pub use service::{DrawOutcome, Service, StartupReport};
