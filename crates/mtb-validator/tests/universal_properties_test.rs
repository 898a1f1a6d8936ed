//! The cross-cutting properties every [`check`] invocation must satisfy,
//! independent of any one scenario.

use mtb_validator::catalogs::fixtures::FakeCatalogs;
use mtb_validator::model::*;
use mtb_validator::{check, ValidationContext, ValidatorConfig};

fn today() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

fn minimal_rejected_file() -> MTBFile {
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
            status: ConsentStatus::Rejected,
        },
        episode: MTBEpisode {
            id: "E1".into(),
            patient_ref: "P1".into(),
            period: Period {
                start: Some(chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
                end: None,
            },
        },
        diagnoses: None,
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

fn valid_active_file_with_two_diagnoses() -> MTBFile {
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
        diagnoses: Some(vec![
            Diagnosis {
                id: "D1".into(),
                patient_ref: "P1".into(),
                recorded_on: Some(today()),
                icd10: Some(Coding::new("C25.0", "2019")),
                icd_o3_t: None,
                histology_report_refs: None,
            },
            Diagnosis {
                id: "D2".into(),
                patient_ref: "P_other".into(),
                recorded_on: Some(today()),
                icd10: Some(Coding::new("C25.0", "2019")),
                icd_o3_t: None,
                histology_report_refs: None,
            },
        ]),
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
fn purity_repeated_calls_agree() {
    let file = minimal_rejected_file();
    let config = ValidatorConfig::default();
    let catalogs = FakeCatalogs::standard();
    let ctx1 = ValidationContext::build(&file, &catalogs, &config);
    let result1 = check(file.clone(), &ctx1);
    let ctx2 = ValidationContext::build(&file, &catalogs, &config);
    let result2 = check(file, &ctx2);
    assert_eq!(result1, result2);
}

#[test]
fn identity_on_valid_input_returns_the_exact_file() {
    let file = minimal_rejected_file();
    let config = ValidatorConfig::default();
    let catalogs = FakeCatalogs::standard();
    let ctx = ValidationContext::build(&file, &catalogs, &config);
    let expected = file.clone();
    assert_eq!(check(file, &ctx), Ok(expected));
}

#[test]
fn accumulation_reports_every_independent_violation() {
    // A patient back-reference mismatch on the second diagnosis (Fatal) and
    // a missing required collection (Warning) are unrelated rules; both
    // must surface in the same report.
    let file = valid_active_file_with_two_diagnoses();
    let config = ValidatorConfig::default();
    let catalogs = FakeCatalogs::standard();
    let ctx = ValidationContext::build(&file, &catalogs, &config);
    let report = check(file, &ctx).expect_err("expected a report");
    assert!(report
        .issues
        .iter()
        .any(|i| i.location.entity_type == "Diagnosis"
            && i.location.id == "D2"
            && i.location.attribute == "patient"));
    // The first diagnosis and patient back-reference are fine, but several
    // required-but-empty collections (previousGuidelineTherapies, specimens,
    // etc.) each contribute their own independent issue too.
    assert!(report.issues.iter().any(|i| i.location.attribute == "specimens"));
}

#[test]
fn reference_equality_unknown_foreign_key_is_fatal() {
    let mut file = valid_active_file_with_two_diagnoses();
    file.diagnoses.as_mut().unwrap()[1].patient_ref = "P1".into();
    file.care_plans = Some(vec![CarePlan {
        id: "CP1".into(),
        patient_ref: "P1".into(),
        diagnosis_ref: "D1".into(),
        issued_on: None,
        recommendations: Some(vec!["R_missing".into()]),
        counselling_req: None,
        rebiopsy_reqs: None,
    }]);
    let config = ValidatorConfig::default();
    let catalogs = FakeCatalogs::standard();
    let ctx = ValidationContext::build(&file, &catalogs, &config);
    let report = check(file, &ctx).expect_err("expected a report");
    assert!(report.issues.iter().any(|i| {
        i.location.entity_type == "CarePlan"
            && i.location.attribute == "recommendations"
            && i.severity == mtb_validator::Severity::Fatal
    }));
}

#[test]
fn patient_back_reference_mismatch_is_fatal_at_patient_attribute() {
    let file = valid_active_file_with_two_diagnoses();
    let config = ValidatorConfig::default();
    let catalogs = FakeCatalogs::standard();
    let ctx = ValidationContext::build(&file, &catalogs, &config);
    let report = check(file, &ctx).expect_err("expected a report");
    assert!(report.issues.iter().any(|i| {
        i.location.entity_type == "Diagnosis"
            && i.location.id == "D2"
            && i.location.attribute == "patient"
            && i.severity == mtb_validator::Severity::Fatal
    }));
}

#[test]
fn consent_rejected_with_empty_body_is_ok() {
    let file = minimal_rejected_file();
    let config = ValidatorConfig::default();
    let catalogs = FakeCatalogs::standard();
    let ctx = ValidationContext::build(&file, &catalogs, &config);
    let expected = file.clone();
    assert_eq!(check(file, &ctx), Ok(expected));
}

#[test]
fn consent_rejected_with_present_body_is_fatal_with_expected_prefix() {
    let mut file = minimal_rejected_file();
    file.diagnoses = Some(vec![]);
    let config = ValidatorConfig::default();
    let catalogs = FakeCatalogs::standard();
    let ctx = ValidationContext::build(&file, &catalogs, &config);
    let report = check(file, &ctx).expect_err("expected a report");
    assert!(report
        .issues
        .iter()
        .any(|i| i.message.starts_with("Data must not be defined for Consent")));
}

#[test]
fn numeric_range_violation_is_exactly_one_error() {
    let mut file = valid_active_file_with_two_diagnoses();
    file.diagnoses.as_mut().unwrap()[1].patient_ref = "P1".into();
    file.specimens = Some(vec![Specimen {
        id: "S1".into(),
        patient_ref: "P1".into(),
        icd10: Coding::new("C25.0", "2019"),
        type_: Some(SpecimenType::Tumor),
        collection: Some("core".into()),
    }]);
    file.histology_reports = Some(vec![HistologyReport {
        id: "H1".into(),
        patient_ref: "P1".into(),
        specimen_ref: "S1".into(),
        issued_on: Some(today()),
        morphology: Some(Coding::new("8140/3", "2014")),
        tumor_content: Some(TumorCellContent {
            specimen_ref: "S1".into(),
            method: TccMethod::Histologic,
            value: 1.0001,
        }),
    }]);
    let config = ValidatorConfig::default();
    let catalogs = FakeCatalogs::standard();
    let ctx = ValidationContext::build(&file, &catalogs, &config);
    let report = check(file, &ctx).expect_err("expected a report");
    let tumor_content_issues: Vec<_> = report
        .issues
        .iter()
        .filter(|i| i.location.entity_type == "HistologyReport" && i.location.attribute == "tumorContent")
        .collect();
    assert_eq!(tumor_content_issues.len(), 1, "{tumor_content_issues:?}");
    assert_eq!(tumor_content_issues[0].severity, mtb_validator::Severity::Error);
}
