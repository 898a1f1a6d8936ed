//! Validator configuration.

use mtb_foundation::{Config, FoundationError, Result};
use serde::{Deserialize, Serialize};

/// Default catalog versions assumed when an MTB file omits one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorConfig {
    /// Assumed when a [`crate::model::Coding`] on a diagnosis or specimen
    /// omits `icd10.version` (spec.md §3.2: "default version `2019`").
    #[serde(default = "default_icd10gm_version")]
    pub default_icd10gm_version: String,

    /// Assumed when a morphology or topography coding omits `version`.
    /// Unlike ICD-10-GM, spec.md does not mandate a default here; this is
    /// an operational default the validator's caller may override.
    #[serde(default = "default_icdo3_version")]
    pub default_icdo3_version: String,
}

fn default_icd10gm_version() -> String {
    crate::catalogs::DEFAULT_ICD10GM_VERSION.to_string()
}

fn default_icdo3_version() -> String {
    "2014".to_string()
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            default_icd10gm_version: default_icd10gm_version(),
            default_icdo3_version: default_icdo3_version(),
        }
    }
}

impl Config for ValidatorConfig {
    fn validate(&self) -> Result<()> {
        if crate::catalogs::parse_icd10gm_version(&self.default_icd10gm_version).is_err() {
            return Err(FoundationError::InvalidInput(format!(
                "default_icd10gm_version '{}' is not a valid ICD-10-GM version literal",
                self.default_icd10gm_version
            )));
        }
        if crate::catalogs::parse_icdo3_version(&self.default_icdo3_version).is_err() {
            return Err(FoundationError::InvalidInput(format!(
                "default_icdo3_version '{}' is not a valid ICD-O-3 version literal",
                self.default_icdo3_version
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ValidatorConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_malformed_version() {
        let config = ValidatorConfig {
            default_icd10gm_version: "nope".to_string(),
            ..ValidatorConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
