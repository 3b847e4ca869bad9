use serde::{Deserialize, Serialize};

use crate::error::{SkvError, SkvResult};

/// Tuning knobs for [`StructuredKv`](crate::StructuredKv).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuredKvConfig {
    /// How many read/commit cycles `set` and `delete` run before giving up
    /// with [`SkvError::Conflict`].
    pub max_commit_attempts: u32,
    /// Page size for the system-key scan behind `structure`, and the default
    /// page size handed out by `list_options`.
    pub list_batch_size: usize,
}

impl Default for StructuredKvConfig {
    fn default() -> Self {
        Self {
            max_commit_attempts: 8,
            list_batch_size: skv_store::DEFAULT_BATCH_SIZE,
        }
    }
}

impl StructuredKvConfig {
    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> SkvResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| SkvError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every operation fail.
    pub fn validate(&self) -> SkvResult<()> {
        if self.max_commit_attempts == 0 {
            return Err(SkvError::Config(
                "max_commit_attempts must be at least 1".into(),
            ));
        }
        if self.list_batch_size == 0 {
            return Err(SkvError::Config("list_batch_size must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StructuredKvConfig::default();
        assert_eq!(c.max_commit_attempts, 8);
        assert_eq!(c.list_batch_size, 500);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn toml_overrides_and_defaults() {
        let c = StructuredKvConfig::from_toml_str("max_commit_attempts = 32\n").unwrap();
        assert_eq!(c.max_commit_attempts, 32);
        assert_eq!(c.list_batch_size, 500);

        let c = StructuredKvConfig::from_toml_str("").unwrap();
        assert_eq!(c, StructuredKvConfig::default());
    }

    #[test]
    fn toml_rejects_zero_attempts() {
        let err = StructuredKvConfig::from_toml_str("max_commit_attempts = 0").unwrap_err();
        assert!(matches!(err, SkvError::Config(_)));
    }

    #[test]
    fn toml_rejects_wrong_types() {
        let err = StructuredKvConfig::from_toml_str("list_batch_size = \"big\"").unwrap_err();
        assert!(matches!(err, SkvError::Config(_)));
    }
}
