//! Generation configuration
//!
//! Every tunable used by the command-line front end lives here so a run can be
//! reproduced from a single TOML file plus a schema definition.

use serde::Deserialize;
use std::path::Path;

use crate::core::error::NpcError;

/// Configuration for a generation run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Number of NPCs generated per run
    pub npc_count: usize,

    /// Seed for the deterministic generator
    ///
    /// `None` seeds from operating-system entropy, so two runs differ.
    pub seed: Option<u64>,

    /// Separator placed between traits that share one output cell
    pub trait_delimiter: String,

    /// Check the generated group against the schema before printing it
    pub validate_output: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            npc_count: 10,
            seed: None,
            trait_delimiter: " & ".to_string(),
            validate_output: true,
        }
    }
}

impl GenerationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys keep their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, NpcError> {
        let config: GenerationConfig =
            toml::from_str(content).map_err(|e| NpcError::Config(e.to_string()))?;
        config.validate().map_err(NpcError::Config)?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load(path: &Path) -> Result<Self, NpcError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.trait_delimiter.is_empty() {
            return Err("trait_delimiter must not be empty".into());
        }

        // The delimiter must survive a round trip through a single output line
        if self.trait_delimiter.contains('\n') {
            return Err(format!(
                "trait_delimiter ({:?}) must not contain a newline",
                self.trait_delimiter
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GenerationConfig::new();
        assert_eq!(config.npc_count, 10);
        assert_eq!(config.seed, None);
        assert_eq!(config.trait_delimiter, " & ");
        assert!(config.validate_output);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GenerationConfig::from_toml_str("npc_count = 25\nseed = 7\n").unwrap();
        assert_eq!(config.npc_count, 25);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.trait_delimiter, " & ");
    }

    #[test]
    fn test_empty_delimiter_rejected() {
        let result = GenerationConfig::from_toml_str("trait_delimiter = \"\"\n");
        match result {
            Err(NpcError::Config(message)) => assert!(message.contains("trait_delimiter")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_newline_delimiter_rejected() {
        let config = GenerationConfig {
            trait_delimiter: "\n".to_string(),
            ..GenerationConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
