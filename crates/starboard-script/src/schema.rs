//! Special card schema

use serde::{Deserialize, Serialize};
use starboard_core::{NewCard, PoolType};

/// One entry of the special card table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDef {
    /// Catalog name; also selects the card effect
    pub name: String,
    /// Flavor text
    #[serde(default)]
    pub description: String,
    /// What the card does, in one line
    #[serde(default)]
    pub effect_summary: String,
    /// Image file name, relative to the image root
    #[serde(default)]
    pub image: String,
    pub pool: PoolType,
    /// Relative draw weight within the pool
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl CardDef {
    /// Catalog row to insert when the card is missing
    pub fn to_new_card(&self) -> NewCard {
        NewCard::new(self.name.clone(), self.pool)
            .with_text(self.description.clone(), self.effect_summary.clone())
            .with_image(self.image.clone())
            .with_weight(self.weight)
    }
}
