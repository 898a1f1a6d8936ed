//! Errors internal to the validation process.
//!
//! The validator itself never surfaces a [`std::error::Error`] to its caller
//! — every failure becomes an [`crate::Issue`] instead (see the crate-level
//! docs). The one place an ordinary, fallible `Result` is useful is parsing
//! a catalog version literal, which is why this module exists at all: the
//! `and_then`-style chained checks in [`crate::validation`] need something
//! to chain *on*.

use thiserror::Error;

/// Failure parsing a catalog version literal (e.g. an ICD-10-GM or
/// ICD-O-3 version string).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The version string is not syntactically a year/version literal.
    #[error("'{0}' is not a recognized ICD-10-GM version")]
    UnparseableIcd10GmVersion(String),

    /// The version string is not syntactically a known ICD-O-3 version.
    #[error("'{0}' is not a recognized ICD-O-3 version")]
    UnparseableIcdO3Version(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
