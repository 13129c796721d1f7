//! Guard configuration.
//!
//! Every field has a default, so an empty JSON object is a valid document.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_schema_cache_ttl_secs() -> u64 {
    300
}

fn default_max_cache_entries() -> usize {
    100
}

fn default_suggestion_threshold() -> f64 {
    0.6
}

fn default_suggestion_limit() -> usize {
    3
}

fn default_field_suggestion_threshold() -> f64 {
    0.4
}

fn default_field_suggestion_limit() -> usize {
    10
}

fn default_pattern_suggestion_limit() -> usize {
    5
}

/// Tunables for schema caching, graph building and suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Seconds a cached schema graph stays fresh.
    #[serde(default = "default_schema_cache_ttl_secs")]
    pub schema_cache_ttl_secs: u64,

    /// Cached schema graphs kept before the oldest is evicted.
    #[serde(default = "default_max_cache_entries")]
    pub max_cache_entries: usize,

    /// Minimum similarity for suggestions attached to validation errors.
    #[serde(default = "default_suggestion_threshold")]
    pub suggestion_threshold: f64,

    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Minimum similarity for scored field suggestions.
    #[serde(default = "default_field_suggestion_threshold")]
    pub field_suggestion_threshold: f64,

    #[serde(default = "default_field_suggestion_limit")]
    pub field_suggestion_limit: usize,

    #[serde(default = "default_pattern_suggestion_limit")]
    pub pattern_suggestion_limit: usize,

    /// Adds `created_datetime` and `updated_datetime` to the system fields.
    #[serde(default)]
    pub datetime_system_fields: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            schema_cache_ttl_secs: default_schema_cache_ttl_secs(),
            max_cache_entries: default_max_cache_entries(),
            suggestion_threshold: default_suggestion_threshold(),
            suggestion_limit: default_suggestion_limit(),
            field_suggestion_threshold: default_field_suggestion_threshold(),
            field_suggestion_limit: default_field_suggestion_limit(),
            pattern_suggestion_limit: default_pattern_suggestion_limit(),
            datetime_system_fields: false,
        }
    }
}

impl GuardConfig {
    pub const TTL_RANGE_SECS: (u64, u64) = (60, 3600);
    pub const CACHE_ENTRIES_RANGE: (usize, usize) = (1, 1000);
    pub const LIMIT_MAX: usize = 100;

    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn schema_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.schema_cache_ttl_secs)
    }

    /// Sets the cache TTL in seconds.
    pub fn with_schema_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.schema_cache_ttl_secs = secs;
        self
    }

    pub fn with_max_cache_entries(mut self, entries: usize) -> Self {
        self.max_cache_entries = entries;
        self
    }

    pub fn with_datetime_system_fields(mut self, enabled: bool) -> Self {
        self.datetime_system_fields = enabled;
        self
    }

    /// Checks every value against its permitted range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min_ttl, max_ttl) = Self::TTL_RANGE_SECS;
        if !(min_ttl..=max_ttl).contains(&self.schema_cache_ttl_secs) {
            return Err(ConfigError::out_of_range(
                "schema_cache_ttl_secs",
                self.schema_cache_ttl_secs,
                min_ttl,
                max_ttl,
            ));
        }

        let (min_entries, max_entries) = Self::CACHE_ENTRIES_RANGE;
        if !(min_entries..=max_entries).contains(&self.max_cache_entries) {
            return Err(ConfigError::out_of_range(
                "max_cache_entries",
                self.max_cache_entries,
                min_entries,
                max_entries,
            ));
        }

        for (field, threshold) in [
            ("suggestion_threshold", self.suggestion_threshold),
            ("field_suggestion_threshold", self.field_suggestion_threshold),
        ] {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ConfigError::out_of_range(field, threshold, 0.0, 1.0));
            }
        }

        for (field, limit, min) in [
            ("suggestion_limit", self.suggestion_limit, 1),
            ("field_suggestion_limit", self.field_suggestion_limit, 1),
            ("pattern_suggestion_limit", self.pattern_suggestion_limit, 0),
        ] {
            if !(min..=Self::LIMIT_MAX).contains(&limit) {
                return Err(ConfigError::out_of_range(field, limit, min, Self::LIMIT_MAX));
            }
        }

        Ok(())
    }
}
