//! The MTB-file orchestrator (spec.md §4.4).

use crate::catalogs::Catalogs;
use crate::context::ValidationContext;
use crate::issue::{error, fatal, info, warning, DataQualityReport, Issue, Issues};
use crate::model::{ConsentStatus, MTBFile};
use crate::severity::Severity;
use crate::validation::{all_of, validate_each, Validated};
use crate::validators;

/// Validate `mtbfile`, returning it unchanged if it is usable, or a
/// non-empty [`DataQualityReport`] otherwise.
///
/// Logs a debug span on entry (patient id, consent status) and an info
/// event with the resulting issue count, per the ambient logging contract —
/// the returned value is the only thing callers may rely on; these are
/// observability only.
pub fn check<C: Catalogs>(
    mtbfile: MTBFile,
    ctx: &ValidationContext<C>,
) -> Result<MTBFile, DataQualityReport> {
    let patient_id = mtbfile.patient.id.clone();
    let span = tracing::debug_span!(
        "check",
        patient_id = %patient_id,
        consent_status = ?mtbfile.consent.status,
    );
    let _guard = span.enter();

    let issues = match mtbfile.consent.status {
        ConsentStatus::Rejected => check_rejected(&mtbfile),
        ConsentStatus::Active => check_active(&mtbfile, ctx),
    };

    match Issues::from_vec(issues) {
        None => {
            tracing::info!(patient_id = %patient_id, issue_count = 0, "file accepted");
            Ok(mtbfile)
        }
        Some(issues) => {
            tracing::info!(patient_id = %patient_id, issue_count = issues.as_slice().len(), "file rejected or flagged");
            Err(DataQualityReport::new(patient_id, issues))
        }
    }
}

fn check_rejected(file: &MTBFile) -> Validated {
    all_of([
        validators::validate_patient(&file.patient),
        // Consent and episode have no catalogs-dependent checks, so a
        // context-free `ValidationContext` is unnecessary here; their
        // validators only need the patient id, which is available directly.
        consent_patient_ref(file),
        episode_patient_ref_and_period(file),
        undefined_slot_check(file.diagnoses.is_some(), "diagnoses", &file.patient.id),
        undefined_slot_check(
            file.previous_guideline_therapies.is_some(),
            "previousGuidelineTherapies",
            &file.patient.id,
        ),
        undefined_slot_check(
            file.last_guideline_therapy.is_some(),
            "lastGuidelineTherapy",
            &file.patient.id,
        ),
        undefined_slot_check(file.ecog_status.is_some(), "ecogStatus", &file.patient.id),
        undefined_slot_check(file.specimens.is_some(), "specimens", &file.patient.id),
        undefined_slot_check(
            file.histology_reports.is_some(),
            "histologyReports",
            &file.patient.id,
        ),
        undefined_slot_check(
            file.mol_patho_findings.is_some(),
            "molPathoFindings",
            &file.patient.id,
        ),
        undefined_slot_check(file.ngs_reports.is_some(), "ngsReports", &file.patient.id),
        undefined_slot_check(file.care_plans.is_some(), "carePlans", &file.patient.id),
        undefined_slot_check(
            file.recommendations.is_some(),
            "recommendations",
            &file.patient.id,
        ),
        undefined_slot_check(
            file.counselling_requests.is_some(),
            "counsellingRequests",
            &file.patient.id,
        ),
        undefined_slot_check(
            file.rebiopsy_requests.is_some(),
            "rebiopsyRequests",
            &file.patient.id,
        ),
        undefined_slot_check(
            file.histology_reevaluation_requests.is_some(),
            "histologyReevaluationRequests",
            &file.patient.id,
        ),
        undefined_slot_check(
            file.study_inclusion_requests.is_some(),
            "studyInclusionRequests",
            &file.patient.id,
        ),
        undefined_slot_check(file.claims.is_some(), "claims", &file.patient.id),
        undefined_slot_check(
            file.claim_responses.is_some(),
            "claimResponses",
            &file.patient.id,
        ),
        undefined_slot_check(
            file.molecular_therapies.is_some(),
            "molecularTherapies",
            &file.patient.id,
        ),
        undefined_slot_check(file.responses.is_some(), "responses", &file.patient.id),
    ])
}

/// spec.md §4.4 Rejected branch: any presence of an otherwise-optional
/// top-level slot is Fatal.
fn undefined_slot_check(is_present: bool, slot_name: &str, patient_id: &str) -> Validated {
    if is_present {
        vec![
            fatal("Data must not be defined for Consent 'Rejected'").at(
                "MTBFile",
                patient_id,
                slot_name,
            ),
        ]
    } else {
        Vec::new()
    }
}

fn consent_patient_ref(file: &MTBFile) -> Validated {
    if file.consent.patient_ref == file.patient.id {
        Vec::new()
    } else {
        vec![fatal(format!(
            "Reference to patient '{}' does not match file patient '{}'",
            file.consent.patient_ref, file.patient.id
        ))
        .at("Consent", &file.consent.id, "patient")]
    }
}

fn episode_patient_ref_and_period(file: &MTBFile) -> Validated {
    let mut issues = Vec::new();
    if file.episode.patient_ref != file.patient.id {
        issues.push(
            fatal(format!(
                "Reference to patient '{}' does not match file patient '{}'",
                file.episode.patient_ref, file.patient.id
            ))
            .at("MTBEpisode", &file.episode.id, "patient"),
        );
    }
    if file.episode.period.start.is_none() {
        issues.push(
            error("Missing Period start").at(
                "MTBEpisode",
                &file.episode.id,
                "period",
            ),
        );
    } else if let (Some(start), Some(end)) = (file.episode.period.start, file.episode.period.end)
    {
        if end < start {
            issues.push(
                error("Period end must not precede period start").at(
                    "MTBEpisode",
                    &file.episode.id,
                    "period",
                ),
            );
        }
    }
    issues
}

fn check_active<C: Catalogs>(file: &MTBFile, ctx: &ValidationContext<C>) -> Validated {
    all_of([
        validators::validate_patient(&file.patient),
        validators::validate_consent(&file.consent, ctx),
        validators::validate_episode(&file.episode, ctx),
        required_nonempty_collection(
            &file.diagnoses,
            "diagnoses",
            &file.patient.id,
            Severity::Error,
            |d| validators::validate_diagnosis(d, ctx),
        ),
        required_nonempty_collection(
            &file.previous_guideline_therapies,
            "previousGuidelineTherapies",
            &file.patient.id,
            Severity::Warning,
            |t| validators::validate_previous_guideline_therapy(t, ctx),
        ),
        match &file.last_guideline_therapy {
            None => vec![
                error("Missing LastGuidelineTherapy").at(
                    "MTBFile",
                    &file.patient.id,
                    "lastGuidelineTherapy",
                ),
            ],
            Some(t) => validators::validate_last_guideline_therapy(t, ctx),
        },
        required_nonempty_collection(
            &file.ecog_status,
            "ecogStatus",
            &file.patient.id,
            Severity::Warning,
            |e| validators::validate_ecog_status(e, ctx),
        ),
        required_nonempty_collection(
            &file.specimens,
            "specimens",
            &file.patient.id,
            Severity::Warning,
            |s| validators::validate_specimen(s, ctx),
        ),
        required_nonempty_collection(
            &file.histology_reports,
            "histologyReports",
            &file.patient.id,
            Severity::Warning,
            |h| validators::validate_histology_report(h, ctx),
        ),
        required_nonempty_collection(
            &file.mol_patho_findings,
            "molPathoFindings",
            &file.patient.id,
            Severity::Warning,
            |f| validators::validate_molecular_pathology_finding(f, ctx),
        ),
        required_nonempty_collection(
            &file.ngs_reports,
            "ngsReports",
            &file.patient.id,
            Severity::Warning,
            |r| validators::validate_somatic_ngs_report(r, ctx),
        ),
        required_nonempty_collection(
            &file.care_plans,
            "carePlans",
            &file.patient.id,
            Severity::Warning,
            |c| validators::validate_care_plan(c, ctx),
        ),
        required_nonempty_collection(
            &file.recommendations,
            "recommendations",
            &file.patient.id,
            Severity::Warning,
            |r| validators::validate_therapy_recommendation(r, ctx),
        ),
        required_nonempty_collection(
            &file.claims,
            "claims",
            &file.patient.id,
            Severity::Warning,
            |c| validators::validate_claim(c, ctx),
        ),
        required_nonempty_collection(
            &file.claim_responses,
            "claimResponses",
            &file.patient.id,
            Severity::Warning,
            |r| validators::validate_claim_response(r, ctx),
        ),
        optional_collection(&file.counselling_requests, |r| {
            validators::validate_genetic_counselling_request(r, ctx)
        }),
        optional_collection(&file.rebiopsy_requests, |r| {
            validators::validate_rebiopsy_request(r, ctx)
        }),
        optional_collection(&file.histology_reevaluation_requests, |r| {
            validators::validate_histology_reevaluation_request(r, ctx)
        }),
        optional_collection(&file.study_inclusion_requests, |r| {
            validators::validate_study_inclusion_request(r, ctx)
        }),
        match &file.molecular_therapies {
            None => Vec::new(),
            Some(therapies) if therapies.is_empty() => {
                vec![warning("Missing MolecularTherapies").at(
                    "MTBFile",
                    &file.patient.id,
                    "molecularTherapies",
                )]
            }
            Some(therapies) => validate_each(therapies, |t| {
                validators::validate_molecular_therapy(t, ctx)
            }),
        },
        optional_collection(&file.responses, |r| validators::validate_response(r, ctx)),
    ])
}

/// A top-level slot that, per spec.md §4.4, must be *both* present and
/// non-empty: missing and empty each emit one issue at `severity`, then the
/// element validator runs over whatever elements are present.
fn required_nonempty_collection<T>(
    slot: &Option<Vec<T>>,
    slot_name: &str,
    patient_id: &str,
    severity: Severity,
    validate_one: impl Fn(&T) -> Validated,
) -> Validated {
    match slot {
        None => vec![slot_issue(severity, slot_name, patient_id, "missing")],
        Some(items) if items.is_empty() => {
            vec![slot_issue(severity, slot_name, patient_id, "empty")]
        }
        Some(items) => validate_each(items, validate_one),
    }
}

fn slot_issue(
    severity: Severity,
    slot_name: &str,
    patient_id: &str,
    state: &str,
) -> Issue {
    let message = format!("{slot_name} must not be {state}");
    let builder = match severity {
        Severity::Error => error(message),
        Severity::Warning => warning(message),
        Severity::Info => info(message),
        Severity::Fatal => fatal(message),
    };
    builder.at("MTBFile", patient_id, slot_name)
}

/// A top-level slot that is entirely optional: absence produces no issue,
/// presence is validated element-wise.
fn optional_collection<T>(slot: &Option<Vec<T>>, validate_one: impl Fn(&T) -> Validated) -> Validated {
    match slot {
        None => Vec::new(),
        Some(items) => validate_each(items, validate_one),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::fixtures::FakeCatalogs;
    use crate::config::ValidatorConfig;
    use crate::model::*;

    fn minimal_active_file() -> MTBFile {
        MTBFile {
            patient: Patient {
                id: "P1".into(),
                gender: None,
                birth_date: Some(chrono::NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()),
                insurance: Some("AOK".into()),
                date_of_death: None,
            },
            consent: Consent {
                id: "C1".into(),
                patient_ref: "P1".into(),
                status: ConsentStatus::Active,
            },
            episode: MTBEpisode {
                id: "E1".into(),
                patient_ref: "P1".into(),
                period: Period {
                    start: Some(chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
                    end: None,
                },
            },
            diagnoses: Some(vec![Diagnosis {
                id: "D1".into(),
                patient_ref: "P1".into(),
                recorded_on: Some(chrono::Utc::now().date_naive()),
                icd10: Some(Coding::new("C25.0", "2019")),
                icd_o3_t: None,
                histology_report_refs: None,
            }]),
            previous_guideline_therapies: None,
            last_guideline_therapy: None,
            ecog_status: None,
            specimens: None,
            histology_reports: None,
            mol_patho_findings: None,
            ngs_reports: None,
            care_plans: None,
            recommendations: None,
            counselling_requests: None,
            rebiopsy_requests: None,
            histology_reevaluation_requests: None,
            study_inclusion_requests: None,
            claims: None,
            claim_responses: None,
            molecular_therapies: None,
            responses: None,
        }
    }

    #[test]
    fn rejected_consent_with_diagnoses_is_fatal() {
        let mut file = minimal_active_file();
        file.consent.status = ConsentStatus::Rejected;
        let catalogs = FakeCatalogs::standard();
        let config = ValidatorConfig::default();
        let ctx = ValidationContext::build(&file, &catalogs, &config);
        let result = check(file, &ctx);
        let report = result.expect_err("expected a report");
        assert!(report
            .issues
            .iter()
            .any(|i| i.location.attribute == "diagnoses"
                && i.message.starts_with("Data must not be defined for Consent")));
    }

    #[test]
    fn missing_last_guideline_therapy_is_error() {
        let file = minimal_active_file();
        let catalogs = FakeCatalogs::standard();
        let config = ValidatorConfig::default();
        let ctx = ValidationContext::build(&file, &catalogs, &config);
        let report = check(file, &ctx).expect_err("expected a report");
        assert!(report
            .issues
            .iter()
            .any(|i| i.location.attribute == "lastGuidelineTherapy"));
    }
}
