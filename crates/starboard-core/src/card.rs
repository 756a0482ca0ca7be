//! Item card catalog rows

use crate::CardId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pool a card is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolType {
    Normal,
    Negative,
}

impl PoolType {
    /// Parse a pool request the way the request layer sends it.
    ///
    /// Only `"negative"` (any case) selects the negative pool; every other
    /// value, including an empty string, falls back to the normal pool.
    pub fn from_request(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("negative") {
            PoolType::Negative
        } else {
            PoolType::Normal
        }
    }

    /// Legacy integer encoding (`1` normal, `0` negative)
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PoolType::Negative),
            1 => Some(PoolType::Normal),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            PoolType::Negative => 0,
            PoolType::Normal => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PoolType::Normal => "normal",
            PoolType::Negative => "negative",
        }
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemCard {
    pub id: CardId,
    /// Display and lookup key; unique within the catalog
    pub name: String,
    pub description: String,
    pub effect_summary: String,
    /// `None` for rows written before pools existed
    pub pool_type: Option<PoolType>,
    /// Relative probability mass within the pool
    pub weight: f64,
    pub image_path: String,
}

impl ItemCard {
    /// Whether the card has an image reference
    pub fn has_image(&self) -> bool {
        !self.image_path.trim().is_empty()
    }
}

/// A card that has not been stored yet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCard {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effect_summary: String,
    #[serde(default)]
    pub pool_type: Option<PoolType>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub image_path: String,
}

fn default_weight() -> f64 {
    1.0
}

impl NewCard {
    pub fn new(name: impl Into<String>, pool_type: PoolType) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            effect_summary: String::new(),
            pool_type: Some(pool_type),
            weight: 1.0,
            image_path: String::new(),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_image(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = image_path.into();
        self
    }

    pub fn with_text(
        mut self,
        description: impl Into<String>,
        effect_summary: impl Into<String>,
    ) -> Self {
        self.description = description.into();
        self.effect_summary = effect_summary.into();
        self
    }

    /// Attach the storage-assigned ID
    pub fn into_card(self, id: CardId) -> ItemCard {
        ItemCard {
            id,
            name: self.name,
            description: self.description,
            effect_summary: self.effect_summary,
            pool_type: self.pool_type,
            weight: self.weight,
            image_path: self.image_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_from_request() {
        assert_eq!(PoolType::from_request("negative"), PoolType::Negative);
        assert_eq!(PoolType::from_request(" Negative "), PoolType::Negative);
        assert_eq!(PoolType::from_request("normal"), PoolType::Normal);
        assert_eq!(PoolType::from_request("anything"), PoolType::Normal);
        assert_eq!(PoolType::from_request(""), PoolType::Normal);
    }

    #[test]
    fn test_pool_codes() {
        for pool in [PoolType::Normal, PoolType::Negative] {
            assert_eq!(PoolType::from_code(pool.code()), Some(pool));
        }
        assert_eq!(PoolType::from_code(7), None);
    }

    #[test]
    fn test_new_card_ron_defaults() {
        let card: NewCard = ron::from_str(r#"(name: "Bard")"#).unwrap();
        assert_eq!(card.weight, 1.0);
        assert_eq!(card.pool_type, None);
        assert!(card.image_path.is_empty());

        let stored = card.into_card(CardId::new(3));
        assert_eq!(stored.id, CardId::new(3));
        assert!(!stored.has_image());
    }
}
