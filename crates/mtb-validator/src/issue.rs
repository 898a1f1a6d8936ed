//! The issue and report model (spec.md §3.1, §4.1).

use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// Where in the submitted MTB file an issue was found.
///
/// `entity_id` may be empty for coding-level errors that are not bound to a
/// single record id (e.g. a catalog miss surfaced from inside a nested
/// coding rather than from the owning record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub entity_type: String,
    pub id: String,
    pub attribute: String,
}

impl Location {
    pub fn new(
        entity_type: impl Into<String>,
        id: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
            attribute: attribute.into(),
        }
    }
}

/// A single, immutable data-quality finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
    pub location: Location,
}

/// Builder returned by [`info`], [`warning`], [`error`], [`fatal`]; finalized
/// by [`IssueBuilder::at`] which attaches the [`Location`].
///
/// There are exactly these four severities — no other constructor exists,
/// matching spec.md §4.1 ("No other severity levels exist").
pub struct IssueBuilder {
    severity: Severity,
    message: String,
}

impl IssueBuilder {
    pub fn at(
        self,
        entity_type: impl Into<String>,
        id: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Issue {
        Issue {
            severity: self.severity,
            message: self.message,
            location: Location::new(entity_type, id, attribute),
        }
    }
}

pub fn info(message: impl Into<String>) -> IssueBuilder {
    IssueBuilder {
        severity: Severity::Info,
        message: message.into(),
    }
}

pub fn warning(message: impl Into<String>) -> IssueBuilder {
    IssueBuilder {
        severity: Severity::Warning,
        message: message.into(),
    }
}

pub fn error(message: impl Into<String>) -> IssueBuilder {
    IssueBuilder {
        severity: Severity::Error,
        message: message.into(),
    }
}

pub fn fatal(message: impl Into<String>) -> IssueBuilder {
    IssueBuilder {
        severity: Severity::Fatal,
        message: message.into(),
    }
}

/// A non-empty list of [`Issue`]s.
///
/// Constructing a [`DataQualityReport`] from an empty list is a programmer
/// error (spec.md §9 "Non-empty issue list"); [`Issues::from_vec`] is the
/// only fallible constructor and the orchestrator is the only caller that
/// needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Issue>", into = "Vec<Issue>")]
pub struct Issues(Vec<Issue>);

impl Issues {
    /// Wrap `issues`, or `None` if it is empty.
    pub fn from_vec(issues: Vec<Issue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            Some(Self(issues))
        }
    }

    /// Wrap a single issue — always non-empty by construction.
    pub fn one(issue: Issue) -> Self {
        Self(vec![issue])
    }

    pub fn as_slice(&self) -> &[Issue] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Issue> {
        self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.0.iter()
    }

    /// Concatenate, preserving left-to-right order (spec.md §4.2 accumulating product).
    pub fn extend(&mut self, other: Issues) {
        self.0.extend(other.0);
    }
}

impl TryFrom<Vec<Issue>> for Issues {
    type Error = &'static str;

    fn try_from(value: Vec<Issue>) -> Result<Self, Self::Error> {
        Self::from_vec(value).ok_or("an Issues list must contain at least one Issue")
    }
}

impl From<Issues> for Vec<Issue> {
    fn from(value: Issues) -> Self {
        value.0
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A non-empty collection of issues surfaced for a single MTB file.
///
/// Produced only when [`crate::orchestrator::check`] found at least one
/// issue; otherwise the validated file itself is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQualityReport {
    pub patient_id: String,
    pub issues: Issues,
}

impl DataQualityReport {
    pub fn new(patient_id: impl Into<String>, issues: Issues) -> Self {
        Self {
            patient_id: patient_id.into(),
            issues,
        }
    }

    /// Any issue at [`Severity::Fatal`].
    pub fn has_fatal(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Fatal)
    }

    /// Any issue at [`Severity::Error`] or [`Severity::Fatal`].
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity >= Severity::Error)
    }

    /// Every issue is [`Severity::Info`].
    pub fn has_only_infos(&self) -> bool {
        self.issues.iter().all(|i| i.severity == Severity::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_attaches_location() {
        let issue = error("Missing BirthDate").at("Patient", "P1", "birthdate");
        assert_eq!(issue.severity, Severity::Error);
        assert_eq!(issue.location.entity_type, "Patient");
        assert_eq!(issue.location.id, "P1");
        assert_eq!(issue.location.attribute, "birthdate");
    }

    #[test]
    fn issues_from_empty_vec_is_none() {
        assert!(Issues::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn report_predicates() {
        let issues =
            Issues::from_vec(vec![fatal("boom").at("Diagnosis", "D1", "histologyReports")])
                .unwrap();
        let report = DataQualityReport::new("P1", issues);
        assert!(report.has_fatal());
        assert!(report.has_errors());
        assert!(!report.has_only_infos());
    }

    #[test]
    fn only_infos() {
        let issues = Issues::from_vec(vec![info("fyi").at("Patient", "P1", "insurance")]).unwrap();
        let report = DataQualityReport::new("P1", issues);
        assert!(!report.has_fatal());
        assert!(!report.has_errors());
        assert!(report.has_only_infos());
    }
}
