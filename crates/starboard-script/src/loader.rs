//! RON card table loader

use crate::error::{Error, Result};
use crate::schema::CardDef;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

/// The special card table shipped with the crate
pub const DEFAULT_TABLE: &str = include_str!("../data/special_cards.ron");

/// Loaded card definitions, in file order
#[derive(Debug, Clone, Default)]
pub struct CardTable {
    cards: IndexMap<String, CardDef>,
}

impl CardTable {
    /// Parse the embedded default table
    pub fn embedded() -> Result<Self> {
        let mut loader = Loader::new();
        loader.load_str(DEFAULT_TABLE)?;
        Ok(loader.finish())
    }

    pub fn get(&self, name: &str) -> Option<&CardDef> {
        self.cards.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardDef> {
        self.cards.values()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Loader for RON card tables
pub struct Loader {
    table: CardTable,
}

impl Loader {
    /// Create a new loader
    pub fn new() -> Self {
        Self {
            table: CardTable::default(),
        }
    }

    /// Load a single RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let content = fs::read_to_string(path.as_ref())?;
        self.load_str(&content)
    }

    /// Load cards from a RON string
    pub fn load_str(&mut self, content: &str) -> Result<()> {
        #[derive(serde::Deserialize)]
        struct CardFile {
            cards: Vec<CardDef>,
        }

        let file: CardFile = ron::from_str(content)?;
        for mut card in file.cards {
            card.name = card.name.trim().to_string();
            validate(&card)?;
            if self.table.cards.contains_key(&card.name) {
                return Err(Error::DuplicateDefinition(card.name));
            }
            self.table.cards.insert(card.name.clone(), card);
        }
        Ok(())
    }

    /// Finish loading and return the card table
    pub fn finish(self) -> CardTable {
        self.table
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(card: &CardDef) -> Result<()> {
    if card.name.is_empty() {
        return Err(Error::InvalidSchema("card without a name".to_string()));
    }
    if !card.weight.is_finite() || card.weight < 0.0 {
        return Err(Error::InvalidSchema(format!(
            "card {} has weight {}",
            card.name, card.weight
        )));
    }
    Ok(())
}
