//! Layered configuration for the enrichment pipelines
//!
//! Sources, lowest to highest precedence:
//! 1. Built-in defaults (mirroring the public API limits)
//! 2. `vocab-enrich.toml` in the working directory, or an explicit `--config` file
//! 3. `VOCAB_ENRICH_*` environment variables (`__` separates nesting levels)
//!
//! CLI flags are applied on top by the binary.

use crate::error::{EnrichError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Base name of the optional config file looked up in the working directory
const DEFAULT_CONFIG_NAME: &str = "vocab-enrich";

/// Environment variable prefix
const ENV_PREFIX: &str = "VOCAB_ENRICH";

/// Thesaurus (Datamuse) settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThesaurusConfig {
    /// Endpoint receiving `rel_syn` / `rel_ant` queries
    pub base_url: String,

    /// Result cap per relation query
    pub max_results: usize,

    /// Pause after each successful call
    pub delay_ms: u64,

    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for ThesaurusConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.datamuse.com/words".to_string(),
            max_results: 12,
            delay_ms: 100,
            timeout_secs: 10,
        }
    }
}

/// Dictionary (dictionaryapi.dev) settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Entry endpoint; the word is appended as the last path segment
    pub base_url: String,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.dictionaryapi.dev/api/v2/entries/en".to_string(),
        }
    }
}

/// Concurrent definitions run settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DefinitionsConfig {
    /// Fetches allowed in flight at once
    pub max_workers: usize,

    /// Per-request timeout
    pub timeout_secs: u64,

    /// Write a checkpoint every N completed lookups (0 = only at the end)
    pub checkpoint_every: usize,

    /// Pause at the start of every fetch task
    pub throttle_ms: u64,
}

impl Default for DefinitionsConfig {
    fn default() -> Self {
        Self {
            max_workers: 6,
            timeout_secs: 4,
            checkpoint_every: 25,
            throttle_ms: 50,
        }
    }
}

/// Transport-level retry settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub total: u32,

    /// Exponential backoff factor in seconds
    pub backoff_factor: f64,

    /// Statuses that trigger a retry
    pub status_forcelist: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            total: 3,
            backoff_factor: 0.3,
            status_forcelist: vec![429, 500, 502, 503, 504],
        }
    }
}

/// Complete configuration for both pipelines
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnrichConfig {
    pub thesaurus: ThesaurusConfig,
    pub dictionary: DictionaryConfig,
    pub definitions: DefinitionsConfig,
    pub retry: RetryConfig,
}

impl EnrichConfig {
    /// Load configuration from defaults, an optional file, and the environment
    ///
    /// When `path` is given the file must exist; otherwise `vocab-enrich.toml`
    /// in the working directory is used if present. Values are not validated
    /// here: callers apply their overrides first, then call [`Self::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file_source = match path {
            Some(p) => {
                debug!("Loading configuration from {}", p.display());
                ::config::File::from(p).required(true)
            }
            None => ::config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let settings = ::config::Config::builder()
            .add_source(file_source)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("retry.status_forcelist"),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Reject values that would stall or break a run
    pub fn validate(&self) -> Result<()> {
        if self.definitions.max_workers == 0 {
            return Err(EnrichError::InvalidConfig(
                "definitions.max_workers must be at least 1".to_string(),
            ));
        }
        if self.definitions.timeout_secs == 0 || self.thesaurus.timeout_secs == 0 {
            return Err(EnrichError::InvalidConfig(
                "request timeouts must be at least 1 second".to_string(),
            ));
        }
        if self.retry.backoff_factor.is_nan() || self.retry.backoff_factor < 0.0 {
            return Err(EnrichError::InvalidConfig(format!(
                "retry.backoff_factor must be non-negative, got {}",
                self.retry.backoff_factor
            )));
        }
        Ok(())
    }
}

impl ThesaurusConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl DefinitionsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn throttle(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EnrichConfig::default();
        assert_eq!(config.thesaurus.max_results, 12);
        assert_eq!(config.thesaurus.delay_ms, 100);
        assert_eq!(config.definitions.max_workers, 6);
        assert_eq!(config.definitions.timeout_secs, 4);
        assert_eq!(config.definitions.checkpoint_every, 25);
        assert_eq!(config.retry.total, 3);
        assert_eq!(config.retry.status_forcelist, vec![429, 500, 502, 503, 504]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[definitions]\nmax_workers = 2\ncheckpoint_every = 5").unwrap();

        let config = EnrichConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.definitions.max_workers, 2);
        assert_eq!(config.definitions.checkpoint_every, 5);
        assert_eq!(config.definitions.timeout_secs, 4);
        assert_eq!(config.thesaurus, ThesaurusConfig::default());
    }

    #[test]
    fn test_invalid_file_value_can_be_overridden() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[definitions]\nmax_workers = 0").unwrap();

        let mut config = EnrichConfig::load(Some(file.path())).unwrap();
        assert!(config.validate().is_err());

        config.definitions.max_workers = 4;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let result = EnrichConfig::load(Some(Path::new("/nonexistent/vocab-enrich.toml")));
        assert!(matches!(result, Err(EnrichError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        let mut config = EnrichConfig::default();
        config.definitions.max_workers = 0;
        assert!(matches!(
            config.validate(),
            Err(EnrichError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_negative_backoff() {
        let mut config = EnrichConfig::default();
        config.retry.backoff_factor = -1.0;
        assert!(config.validate().is_err());
    }
}
