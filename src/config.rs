//! Fingerprinting configuration.
//!
//! Defaults match the behavior callers get from the crate-level functions;
//! a TOML document can override any subset of fields.

use crate::error::{validate_depth, FingerprintError, Result};
use crate::fingerprint::FingerprintKind;
use serde::{Deserialize, Serialize};

/// Default neighborhood depth
pub const DEFAULT_DEPTH: i64 = 5;

/// Default `find_similar` threshold
pub const DEFAULT_SIMILARITY_RATIO: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Maximum path length; negative values are rejected by [`FingerprintConfig::depth`]
    pub depth: i64,
    /// Tags whose text never counts as content
    pub excluded_tags: Vec<String>,
    /// Threshold for approximate key grouping
    pub similarity_ratio: f64,
    /// Shape of fingerprints built for matching
    pub kind: FingerprintKind,
    /// Shape of fingerprints used as index keys
    pub index_kind: FingerprintKind,
    /// Capacity of the compiled selector cache
    pub selector_cache_size: usize,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        FingerprintConfig {
            depth: DEFAULT_DEPTH,
            excluded_tags: vec!["script".to_string(), "style".to_string()],
            similarity_ratio: DEFAULT_SIMILARITY_RATIO,
            kind: FingerprintKind::Detailed,
            index_kind: FingerprintKind::Paths,
            selector_cache_size: 64,
        }
    }
}

impl FingerprintConfig {
    /// Load from TOML text, validating every field
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: FingerprintConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_depth(self.depth)?;
        if !(0.0..=1.0).contains(&self.similarity_ratio) {
            return Err(FingerprintError::Config(format!(
                "similarity_ratio must be within [0, 1], got {}",
                self.similarity_ratio
            )));
        }
        if self.selector_cache_size == 0 {
            return Err(FingerprintError::Config(
                "selector_cache_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Validated depth bound
    pub fn depth(&self) -> Result<usize> {
        validate_depth(self.depth)
    }

    /// Whether text under `tag` is ignored
    pub fn is_excluded(&self, tag: &str) -> bool {
        self.excluded_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FingerprintConfig::default();
        assert_eq!(config.depth().unwrap(), 5);
        assert!(config.is_excluded("script"));
        assert!(config.is_excluded("STYLE"));
        assert!(!config.is_excluded("p"));
        assert_eq!(config.kind, FingerprintKind::Detailed);
        assert_eq!(config.index_kind, FingerprintKind::Paths);
    }

    #[test]
    fn test_partial_toml() {
        let config = FingerprintConfig::from_toml("depth = 3\nkind = \"paths\"\n").unwrap();
        assert_eq!(config.depth, 3);
        assert_eq!(config.kind, FingerprintKind::Paths);
        assert_eq!(config.excluded_tags, vec!["script", "style"]);
    }

    #[test]
    fn test_negative_depth_rejected() {
        let err = FingerprintConfig::from_toml("depth = -2").unwrap_err();
        assert_eq!(err, FingerprintError::InvalidDepth(-2));
    }

    #[test]
    fn test_bad_ratio_rejected() {
        let err = FingerprintConfig::from_toml("similarity_ratio = 1.5").unwrap_err();
        assert!(matches!(err, FingerprintError::Config(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = FingerprintConfig::from_toml("depth = \"deep\"").unwrap_err();
        assert!(matches!(err, FingerprintError::Config(_)));
    }
}
