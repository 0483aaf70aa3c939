//! # CLI Configuration
//!
//! Optional YAML file holding the business profile of the issuing seller,
//! so that `einv encode` and `einv invoice` need not repeat it on every call:
//!
//! ```yaml
//! business:
//!   seller_name: Test Co
//!   vat_number: "123456789012345"
//! ```
//!
//! The file is located by `--config` or the `EINV_CONFIG` environment
//! variable. With neither set, an empty profile is used.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "EINV_CONFIG";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EinvConfig {
    /// Seller facts used when an invoice does not carry its own.
    #[serde(default)]
    pub business: BusinessProfile,
}

/// The issuing business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BusinessProfile {
    /// Registered business name.
    #[serde(default)]
    pub seller_name: Option<String>,
    /// VAT registration number.
    #[serde(default)]
    pub vat_number: Option<String>,
}

impl EinvConfig {
    /// Load from `path`, or return the empty configuration when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            tracing::debug!("no configuration file given; using defaults");
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse a YAML configuration document. An empty document is the
    /// default configuration.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        if let Some(vat) = &config.business.vat_number {
            einv_core::VatNumber::new(vat).context("business.vat_number")?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn none_is_default() {
        assert_eq!(EinvConfig::load(None).unwrap(), EinvConfig::default());
    }

    #[test]
    fn parses_business_profile() {
        let config = EinvConfig::from_yaml_str(
            "business:\n  seller_name: Test Co\n  vat_number: \"123456789012345\"\n",
        )
        .unwrap();
        assert_eq!(config.business.seller_name.as_deref(), Some("Test Co"));
        assert_eq!(config.business.vat_number.as_deref(), Some("123456789012345"));
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(EinvConfig::from_yaml_str("  \n").unwrap(), EinvConfig::default());
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(EinvConfig::from_yaml_str("business:\n  colour: blue\n").is_err());
        assert!(EinvConfig::from_yaml_str("database: {}\n").is_err());
    }

    #[test]
    fn rejects_malformed_vat_number() {
        assert!(EinvConfig::from_yaml_str("business:\n  vat_number: SA-1\n").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "business:\n  seller_name: File Co").unwrap();
        let config = EinvConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.business.seller_name.as_deref(), Some("File Co"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EinvConfig::load(Some(&dir.path().join("absent.yaml"))).is_err());
    }
}
