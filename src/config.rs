//! Configuration for paginators and the cache layer
//!
//! Configuration can be built in code or loaded from YAML. Every field has a
//! documented default, so an empty document is a valid configuration.
//!
//! ```yaml
//! cache:
//!   allow_cache: true
//!   ttl_seconds: 60
//! default_per_page: 10
//! default_page_size: 10
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default cache entry lifetime
pub const DEFAULT_TTL_SECONDS: u64 = 60;

/// Default number of documents per page
pub const DEFAULT_PAGE_SIZE: u64 = 10;

// ============================================================================
// Cache Config
// ============================================================================

/// Cache policy settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// When false, every lookup misses and every write is dropped
    pub allow_cache: bool,

    /// Lifetime of cache entries in seconds
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            allow_cache: true,
            ttl_seconds: DEFAULT_TTL_SECONDS,
        }
    }
}

impl CacheConfig {
    /// Caching disabled entirely
    pub fn disabled() -> Self {
        Self {
            allow_cache: false,
            ..Self::default()
        }
    }

    /// Override the TTL
    #[must_use]
    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.ttl_seconds == 0 {
            return Err(Error::invalid_config(
                "cache.ttl_seconds",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Pagination Config
// ============================================================================

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Cache policy shared by both paginators
    pub cache: CacheConfig,

    /// `per_page` used by offset requests that omit it
    pub default_per_page: u64,

    /// `page_size` used by cursor requests that omit it
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            default_per_page: DEFAULT_PAGE_SIZE,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Check every field
    pub fn validate(&self) -> Result<()> {
        self.cache.validate()?;
        if self.default_per_page == 0 {
            return Err(Error::invalid_config(
                "default_per_page",
                "must be greater than zero",
            ));
        }
        if self.default_page_size == 0 {
            return Err(Error::invalid_config(
                "default_page_size",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PaginationConfig::default();
        assert!(config.cache.allow_cache);
        assert_eq!(config.cache.ttl_seconds, 60);
        assert_eq!(config.default_per_page, 10);
        assert_eq!(config.default_page_size, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(
            PaginationConfig::from_yaml_str("").unwrap(),
            PaginationConfig::default()
        );
    }

    #[test]
    fn test_partial_yaml() {
        let config = PaginationConfig::from_yaml_str(
            r"
cache:
  allow_cache: false
default_per_page: 25
",
        )
        .unwrap();

        assert!(!config.cache.allow_cache);
        assert_eq!(config.cache.ttl_seconds, 60);
        assert_eq!(config.default_per_page, 25);
        assert_eq!(config.default_page_size, 10);
    }

    #[test]
    fn test_rejects_zero_ttl() {
        let err = PaginationConfig::from_yaml_str("cache:\n  ttl_seconds: 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "cache.ttl_seconds"));
    }

    #[test]
    fn test_rejects_zero_page_size() {
        let err = PaginationConfig::from_yaml_str("default_page_size: 0").unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { .. }));
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        let err = PaginationConfig::from_yaml_str("cache: [not, a, map]").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "cache:\n  ttl_seconds: 120").unwrap();

        let config = PaginationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.cache.ttl_seconds, 120);
    }

    #[test]
    fn test_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PaginationConfig::from_file(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
