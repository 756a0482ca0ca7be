//! Starboard Script - RON loader for the special card table
//!
//! The special card table lists every card the catalog must contain, with
//! its texts, image, pool and draw weight. A default table is embedded in the
//! crate; deployments can load their own from a RON file instead.

mod error;
mod loader;
mod schema;

pub use error::{Error, Result};
pub use loader::{CardTable, Loader, DEFAULT_TABLE};
pub use schema::CardDef;
