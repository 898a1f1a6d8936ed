//! The catalog interface consumed by the validator (spec.md §2.1, §6).
//!
//! Catalogs are read-only, process-wide lookups into external clinical code
//! systems. The validator never loads them — it only consumes an
//! implementation of [`Catalogs`] handed to it by the caller, which keeps
//! catalog-loading failures a collaborator concern (spec.md §7).

use crate::error::{CatalogError, Result};
use std::collections::HashSet;

/// Read-only access to the clinical code systems the validator checks
/// codings against.
pub trait Catalogs {
    /// ICD-10-GM diagnosis codes valid for `version`, or `None` if the
    /// version itself is unknown to the catalog.
    fn icd10gm_codes(&self, version: &str) -> Option<&HashSet<String>>;

    /// ICD-O-3 topography codes valid for `version`.
    fn icdo3_topography_codes(&self, version: &str) -> Option<&HashSet<String>>;

    /// ICD-O-3 morphology codes valid for `version`.
    fn icdo3_morphology_codes(&self, version: &str) -> Option<&HashSet<String>>;

    /// ATC medication codes. Unversioned, unlike the diagnosis catalogs.
    fn atc_codes(&self) -> &HashSet<String>;
}

/// Syntactic check that `version` looks like an ICD-10-GM version literal
/// (a four-digit year). Does not check the version is actually loaded —
/// that is [`Catalogs::icd10gm_codes`] returning `None`.
pub fn parse_icd10gm_version(version: &str) -> Result<String> {
    if version.len() == 4 && version.chars().all(|c| c.is_ascii_digit()) {
        Ok(version.to_string())
    } else {
        Err(CatalogError::UnparseableIcd10GmVersion(version.to_string()))
    }
}

/// Syntactic check that `version` looks like an ICD-O-3 version literal
/// (a four-digit year, optionally suffixed, e.g. `"2014"` or `"2014-GM"`).
pub fn parse_icdo3_version(version: &str) -> Result<String> {
    let year = &version.get(0..4).unwrap_or_default();
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Ok(version.to_string())
    } else {
        Err(CatalogError::UnparseableIcdO3Version(version.to_string()))
    }
}

/// Default ICD-10-GM version assumed when a [`crate::model::Coding`] omits one
/// (spec.md §3.2 "default version `2019` if omitted").
pub const DEFAULT_ICD10GM_VERSION: &str = "2019";

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures {
    //! In-memory [`Catalogs`] fixture for tests.

    use super::Catalogs;
    use std::collections::HashMap;
    use std::collections::HashSet;

    /// A [`Catalogs`] implementation backed entirely by in-memory maps,
    /// built via [`FakeCatalogs::builder`] or the convenience constructors.
    #[derive(Debug, Default, Clone)]
    pub struct FakeCatalogs {
        icd10gm: HashMap<String, HashSet<String>>,
        icdo3_topography: HashMap<String, HashSet<String>>,
        icdo3_morphology: HashMap<String, HashSet<String>>,
        atc: HashSet<String>,
    }

    impl FakeCatalogs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_icd10gm(mut self, version: impl Into<String>, codes: &[&str]) -> Self {
            self.icd10gm
                .insert(version.into(), codes.iter().map(|c| c.to_string()).collect());
            self
        }

        pub fn with_icdo3_topography(mut self, version: impl Into<String>, codes: &[&str]) -> Self {
            self.icdo3_topography
                .insert(version.into(), codes.iter().map(|c| c.to_string()).collect());
            self
        }

        pub fn with_icdo3_morphology(mut self, version: impl Into<String>, codes: &[&str]) -> Self {
            self.icdo3_morphology
                .insert(version.into(), codes.iter().map(|c| c.to_string()).collect());
            self
        }

        pub fn with_atc(mut self, codes: &[&str]) -> Self {
            self.atc = codes.iter().map(|c| c.to_string()).collect();
            self
        }

        /// A fixture preloaded with the codes used by the end-to-end test
        /// scenarios: ICD-10-GM `C25.0` (v2019), ICD-O-3-M `8140/3` (v2014),
        /// and ATC `L01BC02`.
        pub fn standard() -> Self {
            Self::new()
                .with_icd10gm("2019", &["C25.0"])
                .with_icdo3_topography("2014", &["C25.0"])
                .with_icdo3_morphology("2014", &["8140/3"])
                .with_atc(&["L01BC02"])
        }
    }

    impl Catalogs for FakeCatalogs {
        fn icd10gm_codes(&self, version: &str) -> Option<&HashSet<String>> {
            self.icd10gm.get(version)
        }

        fn icdo3_topography_codes(&self, version: &str) -> Option<&HashSet<String>> {
            self.icdo3_topography.get(version)
        }

        fn icdo3_morphology_codes(&self, version: &str) -> Option<&HashSet<String>> {
            self.icdo3_morphology.get(version)
        }

        fn atc_codes(&self) -> &HashSet<String> {
            &self.atc
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_parsing() {
        assert!(parse_icd10gm_version("2019").is_ok());
        assert!(parse_icd10gm_version("abcd").is_err());
        assert!(parse_icdo3_version("2014").is_ok());
        assert!(parse_icdo3_version("2014-GM").is_ok());
        assert!(parse_icdo3_version("xx").is_err());
    }
}
