//! Validation primitives (spec.md §4.2).
//!
//! Every per-record validator in [`crate::validators`] is built from these.
//! The central idea is accumulation, not short-circuiting: a failed check
//! produces one [`Issue`], and [`all_of`] runs every check regardless of
//! whether earlier ones failed, collecting the full set. [`and_then`] is the
//! one exception, reserved for checks that literally cannot run without a
//! value only a prior check can unwrap (e.g. validating the contents of an
//! `Option` that may be absent).

use crate::issue::{Issue, IssueBuilder};

/// The result of one or more checks against a single record: either clean,
/// or a non-empty set of issues. Built on plain `Vec` rather than
/// [`crate::issue::Issues`] because intermediate validation results are
/// frequently empty (i.e. "no issues yet"), unlike the final report.
pub type Validated = Vec<Issue>;

/// Run every check in `checks`, accumulating all issues produced.
///
/// This is the products-not-sums composition spec.md §4.2 describes: each
/// closure is independent and every one of them runs, even if an earlier
/// one already failed.
pub fn all_of(checks: impl IntoIterator<Item = Validated>) -> Validated {
    checks.into_iter().flatten().collect()
}

/// Run `check`, and only if it passed, run `next` against `value`.
///
/// Use this instead of [`all_of`] when `next` needs data that only exists
/// once `value` has passed `check` (the dependent-chain case spec.md calls
/// out explicitly, e.g. validating a period's `end` only once its `start`
/// is known to be present).
pub fn and_then<T>(check: Validated, value: T, next: impl FnOnce(T) -> Validated) -> Validated {
    if check.is_empty() {
        next(value)
    } else {
        check
    }
}

/// Apply `validate_one` to every element of `items`, accumulating issues
/// across the whole collection.
pub fn validate_each<T>(items: &[T], validate_one: impl Fn(&T) -> Validated) -> Validated {
    items.iter().flat_map(validate_one).collect()
}

/// A field that must be present, at [`crate::issue::error`] severity if absent.
pub fn must_be_defined<T>(
    value: &Option<T>,
    issue: impl FnOnce() -> IssueBuilder,
    at: impl FnOnce(IssueBuilder) -> Issue,
) -> Validated {
    if value.is_some() {
        Vec::new()
    } else {
        vec![at(issue())]
    }
}

/// A field that should be present, but whose absence is only a [`crate::issue::warning`].
pub fn should_be_defined<T>(
    value: &Option<T>,
    issue: impl FnOnce() -> IssueBuilder,
    at: impl FnOnce(IssueBuilder) -> Issue,
) -> Validated {
    must_be_defined(value, issue, at)
}

/// A field whose absence is merely worth an [`crate::issue::info`] note.
pub fn could_be_defined<T>(
    value: &Option<T>,
    issue: impl FnOnce() -> IssueBuilder,
    at: impl FnOnce(IssueBuilder) -> Issue,
) -> Validated {
    must_be_defined(value, issue, at)
}

/// A field that must be absent (used where presence signals a contradiction,
/// e.g. a rejected-consent patient carrying diagnosis data).
pub fn must_be_undefined<T>(
    value: &Option<T>,
    issue: impl FnOnce() -> IssueBuilder,
    at: impl FnOnce(IssueBuilder) -> Issue,
) -> Validated {
    if value.is_none() {
        Vec::new()
    } else {
        vec![at(issue())]
    }
}

/// A collection that must not be empty.
pub fn must_not_be_empty<T>(
    items: &[T],
    issue: impl FnOnce() -> IssueBuilder,
    at: impl FnOnce(IssueBuilder) -> Issue,
) -> Validated {
    if items.is_empty() {
        vec![at(issue())]
    } else {
        Vec::new()
    }
}

/// `actual` must equal `expected`.
pub fn must_equal<T: PartialEq>(
    actual: &T,
    expected: &T,
    issue: impl FnOnce() -> IssueBuilder,
    at: impl FnOnce(IssueBuilder) -> Issue,
) -> Validated {
    if actual == expected {
        Vec::new()
    } else {
        vec![at(issue())]
    }
}

/// `value` must be a member of `allowed`.
pub fn must_be_in<T: PartialEq>(
    value: &T,
    allowed: &[T],
    issue: impl FnOnce() -> IssueBuilder,
    at: impl FnOnce(IssueBuilder) -> Issue,
) -> Validated {
    if allowed.iter().any(|a| a == value) {
        Vec::new()
    } else {
        vec![at(issue())]
    }
}

/// `value` must lie in the inclusive range `[lo, hi]`.
pub fn must_be_in_interval<T: PartialOrd>(
    value: &T,
    lo: &T,
    hi: &T,
    issue: impl FnOnce() -> IssueBuilder,
    at: impl FnOnce(IssueBuilder) -> Issue,
) -> Validated {
    if value >= lo && value <= hi {
        Vec::new()
    } else {
        vec![at(issue())]
    }
}

/// `before` must not be later than `after` (used for period start/end pairs).
pub fn must_not_be_after<T: PartialOrd>(
    before: &T,
    after: &T,
    issue: impl FnOnce() -> IssueBuilder,
    at: impl FnOnce(IssueBuilder) -> Issue,
) -> Validated {
    if before <= after {
        Vec::new()
    } else {
        vec![at(issue())]
    }
}

/// `value` must match `pattern` in its entirety.
pub fn must_match(
    value: &str,
    pattern: &regex::Regex,
    issue: impl FnOnce() -> IssueBuilder,
    at: impl FnOnce(IssueBuilder) -> Issue,
) -> Validated {
    if pattern.is_match(value) {
        Vec::new()
    } else {
        vec![at(issue())]
    }
}

/// Run a fallible parse and surface its error as an issue, discarding the
/// parsed value. Used for catalog version literals (spec.md §6,
/// `parse_icd10gm_version` / `parse_icdo3_version`).
pub fn if_throws<T, E: std::fmt::Display>(
    result: Result<T, E>,
    issue: impl FnOnce(&E) -> IssueBuilder,
    at: impl FnOnce(IssueBuilder) -> Issue,
) -> Validated {
    match result {
        Ok(_) => Vec::new(),
        Err(e) => vec![at(issue(&e))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::error;

    #[test]
    fn all_of_accumulates_every_failure() {
        let a: Option<u8> = None;
        let b: Option<u8> = None;
        let result = all_of([
            must_be_defined(&a, || error("missing a"), |b| b.at("X", "1", "a")),
            must_be_defined(&b, || error("missing b"), |b| b.at("X", "1", "b")),
        ]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn and_then_skips_dependent_check_on_failure() {
        let start: Option<u32> = None;
        let check = must_be_defined(&start, || error("missing start"), |b| {
            b.at("X", "1", "start")
        });
        let result = and_then(check, start, |start| {
            // would panic on unwrap if reached
            vec![error(format!("{:?}", start)).at("X", "1", "end")]
        });
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].message, "missing start");
    }

    #[test]
    fn must_be_in_interval_boundaries() {
        let issue = || error("out of range");
        let at = |b: IssueBuilder| b.at("Specimen", "S1", "tumorCellContent");
        assert!(must_be_in_interval(&0.0_f64, &0.0, &1.0, issue, at).is_empty());
        assert!(must_be_in_interval(&1.0_f64, &0.0, &1.0, issue, at).is_empty());
        assert!(!must_be_in_interval(&1.0001_f64, &0.0, &1.0, issue, at).is_empty());
    }
}
