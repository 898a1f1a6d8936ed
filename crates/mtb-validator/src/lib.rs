//! Structural and referential validation for Molecular Tumor Board case files.
//!
//! An MTB file (see [`model::MTBFile`]) is a patient's full molecular tumor
//! board record: diagnosis, prior and ongoing therapies, specimens, NGS
//! reports, recommendations, and the requests and claims that follow from
//! them. This crate checks one such file for internal consistency —
//! required fields, catalog membership, cross-references between records,
//! and numeric/temporal invariants — and reports every violation it finds
//! rather than stopping at the first one.
//!
//! The entry point is [`check`], which takes an [`model::MTBFile`] and a
//! [`ValidationContext`] built over a [`Catalogs`] implementation, and
//! returns either the file back unchanged or a [`DataQualityReport`]
//! listing every [`Issue`] found.
//!
//! # Example
//!
//! ```rust
//! use mtb_validator::catalogs::fixtures::FakeCatalogs;
//! use mtb_validator::{check, ValidationContext, ValidatorConfig};
//!
//! # fn example(mtbfile: mtb_validator::model::MTBFile) {
//! let catalogs = FakeCatalogs::standard();
//! let config = ValidatorConfig::default();
//! let ctx = ValidationContext::build(&mtbfile, &catalogs, &config);
//! match check(mtbfile, &ctx) {
//!     Ok(_validated) => println!("file is consistent"),
//!     Err(report) => println!("{} issue(s) found", report.issues.as_slice().len()),
//! }
//! # }
//! ```

pub mod catalogs;
pub mod config;
pub mod context;
pub mod error;
pub mod issue;
pub mod model;
pub mod orchestrator;
pub mod severity;
pub mod validation;
pub mod validators;

pub use catalogs::Catalogs;
pub use config::ValidatorConfig;
pub use context::ValidationContext;
pub use error::CatalogError;
pub use issue::{DataQualityReport, Issue, Issues, Location};
pub use model::MTBFile;
pub use orchestrator::check;
pub use severity::Severity;
