//! RON configuration for the service

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Service configuration
///
/// Every field has a default, so an empty `()` file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Database file; `None` keeps everything in memory
    #[serde(default)]
    pub database: Option<String>,
    /// Fixed seed for reproducible draws; `None` seeds from the clock
    #[serde(default)]
    pub rng_seed: Option<u64>,
    /// Username of the admin tenant seeded at startup
    #[serde(default = "default_admin")]
    pub admin_username: String,
    /// RON card table replacing the embedded one
    #[serde(default)]
    pub catalog_path: Option<String>,
}

fn default_admin() -> String {
    "admin".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            database: None,
            rng_seed: None,
            admin_username: default_admin(),
            catalog_path: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Parse configuration from a RON string
    pub fn parse(content: &str) -> Result<Self> {
        let config: ServiceConfig =
            ron::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from the process environment.
    ///
    /// `STARBOARD_CONFIG` names a RON file to start from; `STARBOARD_DB`,
    /// `STARBOARD_SEED` and `STARBOARD_ADMIN` override single fields.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup("STARBOARD_CONFIG") {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(db) = lookup("STARBOARD_DB") {
            config.database = Some(db);
        }
        if let Some(seed) = lookup("STARBOARD_SEED") {
            let seed = seed
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("STARBOARD_SEED is not a number: {}", seed)))?;
            config.rng_seed = Some(seed);
        }
        if let Some(admin) = lookup("STARBOARD_ADMIN") {
            config.admin_username = admin;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.admin_username.trim().is_empty() {
            return Err(Error::Config("admin_username is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ServiceConfig::parse("()").unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.admin_username, "admin");
    }

    #[test]
    fn test_parse_config() {
        let config = ServiceConfig::parse(
            r#"(
                database: Some("starboard.db"),
                rng_seed: Some(42),
                admin_username: "principal",
            )"#,
        )
        .unwrap();
        assert_eq!(config.database.as_deref(), Some("starboard.db"));
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.admin_username, "principal");
        assert_eq!(config.catalog_path, None);
    }

    #[test]
    fn test_blank_admin_rejected() {
        assert!(matches!(
            ServiceConfig::parse(r#"(admin_username: " ")"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_environment_overrides() {
        let vars: HashMap<&str, &str> = [
            ("STARBOARD_DB", "/tmp/stars.db"),
            ("STARBOARD_SEED", " 7 "),
            ("STARBOARD_ADMIN", "root"),
        ]
        .into_iter()
        .collect();
        let config =
            ServiceConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap();
        assert_eq!(config.database.as_deref(), Some("/tmp/stars.db"));
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.admin_username, "root");

        let bad = ServiceConfig::from_lookup(|key| {
            (key == "STARBOARD_SEED").then(|| "seven".to_string())
        });
        assert!(matches!(bad, Err(Error::Config(_))));
    }
}
