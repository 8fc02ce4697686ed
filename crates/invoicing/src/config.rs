//! Invoicing configuration.

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`InvoicingConfig::first_invoice_number`].
pub const FIRST_INVOICE_NUMBER_ENV: &str = "BILLBOOK_FIRST_INVOICE_NUMBER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoicingConfig {
    /// Number assigned to the first invoice created by a fresh store.
    pub first_invoice_number: u64,
}

impl Default for InvoicingConfig {
    fn default() -> Self {
        Self {
            first_invoice_number: 1,
        }
    }
}

impl InvoicingConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test fixtures).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        if let Some(raw) = lookup(FIRST_INVOICE_NUMBER_ENV) {
            config.first_invoice_number = raw
                .trim()
                .parse()
                .with_context(|| format!("{FIRST_INVOICE_NUMBER_ENV} must be an integer, got {raw:?}"))?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json).context("invalid invoicing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.first_invoice_number == 0 {
            bail!("first_invoice_number must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_one() {
        let config = InvoicingConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, InvoicingConfig::default());
        assert_eq!(config.first_invoice_number, 1);
    }

    #[test]
    fn reads_first_number_from_lookup() {
        let config = InvoicingConfig::from_lookup(|key| {
            (key == FIRST_INVOICE_NUMBER_ENV).then(|| " 1000 ".to_string())
        })
        .unwrap();
        assert_eq!(config.first_invoice_number, 1000);
    }

    #[test]
    fn rejects_non_numeric_first_number() {
        let err = InvoicingConfig::from_lookup(|_| Some("abc".to_string())).unwrap_err();
        assert!(err.to_string().contains(FIRST_INVOICE_NUMBER_ENV));
    }

    #[test]
    fn rejects_zero_first_number() {
        let err = InvoicingConfig::from_lookup(|_| Some("0".to_string())).unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        assert_eq!(InvoicingConfig::from_json("{}").unwrap(), InvoicingConfig::default());
        assert_eq!(
            InvoicingConfig::from_json(r#"{"first_invoice_number": 5}"#)
                .unwrap()
                .first_invoice_number,
            5
        );
        assert!(InvoicingConfig::from_json(r#"{"first_invoice_number": 0}"#).is_err());
    }
}
