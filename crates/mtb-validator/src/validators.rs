//! Per-record validators (spec.md §4.3).
//!
//! Every validator here shares the same shape: destructure the record,
//! build an accumulating product of checks (patient back-reference first,
//! then field-level and cross-reference checks), and leave it to the
//! orchestrator to decide what happens to the original record on success.

use crate::catalogs::{parse_icd10gm_version, parse_icdo3_version, Catalogs};
use crate::context::ValidationContext;
use crate::issue::{error, fatal, info, warning};
use crate::model::*;
use crate::validation::{
    all_of, and_then, could_be_defined, if_throws, must_be_defined, must_be_in_interval,
    must_equal, should_be_defined, validate_each, Validated,
};

fn check_patient_ref<C: Catalogs>(
    entity_type: &str,
    id: &str,
    patient_ref: &str,
    ctx: &ValidationContext<C>,
) -> Validated {
    if patient_ref == ctx.patient_id {
        Vec::new()
    } else {
        vec![fatal(format!(
            "Reference to patient '{patient_ref}' does not match file patient '{}'",
            ctx.patient_id
        ))
        .at(entity_type, id, "patient")]
    }
}

fn check_diagnosis_ref<C: Catalogs>(
    entity_type: &str,
    id: &str,
    diagnosis_ref: &str,
    ctx: &ValidationContext<C>,
) -> Validated {
    if ctx.diagnosis_ids.contains(diagnosis_ref) {
        Vec::new()
    } else {
        vec![
            fatal(format!("Referenced Diagnosis '{diagnosis_ref}' does not exist"))
                .at(entity_type, id, "diagnosis"),
        ]
    }
}

fn check_specimen_ref<C: Catalogs>(
    entity_type: &str,
    id: &str,
    specimen_ref: &str,
    ctx: &ValidationContext<C>,
) -> Validated {
    if ctx.specimen_ids.contains(specimen_ref) {
        Vec::new()
    } else {
        vec![
            fatal(format!("Referenced Specimen '{specimen_ref}' does not exist"))
                .at(entity_type, id, "specimen"),
        ]
    }
}

fn validate_medication_code<C: Catalogs>(
    code: &str,
    ctx: &ValidationContext<C>,
    entity_type: &str,
    id: &str,
    attribute: &str,
) -> Validated {
    if ctx.catalogs.atc_codes().contains(code) {
        Vec::new()
    } else {
        vec![error(format!("Medication code '{code}' not found in ATC catalog"))
            .at(entity_type, id, attribute)]
    }
}

fn validate_icd10_coding<C: Catalogs>(
    coding: &Coding,
    ctx: &ValidationContext<C>,
    entity_type: &str,
    id: &str,
    attribute: &str,
) -> Validated {
    let version = coding
        .version
        .clone()
        .unwrap_or_else(|| ctx.config.default_icd10gm_version.clone());
    let parsed = parse_icd10gm_version(&version);
    and_then(
        if_throws(
            parsed.clone(),
            |e| error(e.to_string()),
            |b| b.at(entity_type, id, attribute),
        ),
        parsed,
        |parsed| {
            let Ok(version) = parsed else {
                return Vec::new();
            };
            match ctx.catalogs.icd10gm_codes(&version) {
                Some(codes) if codes.contains(&coding.code) => Vec::new(),
                _ => vec![error(format!(
                    "ICD-10-GM code '{}' not found in catalog version '{version}'",
                    coding.code
                ))
                .at(entity_type, id, attribute)],
            }
        },
    )
}

fn validate_icdo3_coding<C: Catalogs>(
    coding: &Coding,
    ctx: &ValidationContext<C>,
    catalog: impl for<'c> Fn(&'c C, &str) -> Option<&'c std::collections::HashSet<String>>,
    entity_type: &str,
    id: &str,
    attribute: &str,
) -> Validated {
    let version = coding
        .version
        .clone()
        .unwrap_or_else(|| ctx.config.default_icdo3_version.clone());
    let parsed = parse_icdo3_version(&version);
    and_then(
        if_throws(
            parsed.clone(),
            |e| error(e.to_string()),
            |b| b.at(entity_type, id, attribute),
        ),
        parsed,
        |parsed| {
            let Ok(version) = parsed else {
                return Vec::new();
            };
            match catalog(ctx.catalogs, &version) {
                Some(codes) if codes.contains(&coding.code) => Vec::new(),
                _ => vec![error(format!(
                    "ICD-O-3 code '{}' not found in catalog version '{version}'",
                    coding.code
                ))
                .at(entity_type, id, attribute)],
            }
        },
    )
}

fn validate_tumor_cell_content(
    tcc: &TumorCellContent,
    expected_method: TccMethod,
    entity_type: &str,
    id: &str,
) -> Validated {
    all_of([
        must_equal(
            &tcc.method,
            &expected_method,
            || error(format!("TumorCellContent method must be {expected_method:?}")),
            |b| b.at(entity_type, id, "tumorContent"),
        ),
        must_be_in_interval(
            &tcc.value,
            &0.0,
            &1.0,
            || {
                error(format!(
                    "TumorCellContent value '{}' is out of range [0.0,1.0]",
                    tcc.value
                ))
            },
            |b| b.at(entity_type, id, "tumorContent"),
        ),
    ])
}

fn therapy_line_check(entity_type: &str, id: &str, line: Option<u8>) -> Validated {
    match line {
        None => vec![warning("Missing TherapyLine").at(entity_type, id, "therapyLine")],
        Some(value) => must_be_in_interval(
            &value,
            &0,
            &9,
            || error(format!("TherapyLine '{value}' is out of range [0,9]")),
            |b| b.at(entity_type, id, "therapyLine"),
        ),
    }
}

fn nct_pattern() -> &'static regex::Regex {
    static PATTERN: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| regex::Regex::new(r"^NCT\d{8}$").expect("static NCT pattern"))
}

pub fn validate_patient(patient: &Patient) -> Validated {
    let id = &patient.id;
    all_of([
        must_be_defined(
            &patient.birth_date,
            || error("Missing BirthDate"),
            |b| b.at("Patient", id, "birthdate"),
        ),
        should_be_defined(
            &patient.insurance,
            || warning("Missing Insurance"),
            |b| b.at("Patient", id, "insurance"),
        ),
        could_be_defined(
            &patient.date_of_death,
            || info("Missing DateOfDeath"),
            |b| b.at("Patient", id, "dateOfDeath"),
        ),
        date_of_death_checks(patient),
    ])
}

fn date_of_death_checks(patient: &Patient) -> Validated {
    let Some(date_of_death) = patient.date_of_death else {
        return Vec::new();
    };
    let mut issues = Vec::new();
    let today = chrono::Utc::now().date_naive();
    if date_of_death > today {
        issues.push(
            error("DateOfDeath must not be in the future").at("Patient", &patient.id, "dateOfDeath"),
        );
    }
    if let Some(birth_date) = patient.birth_date {
        if date_of_death <= birth_date {
            issues.push(
                error("DateOfDeath must be strictly after BirthDate")
                    .at("Patient", &patient.id, "dateOfDeath"),
            );
        }
    }
    issues
}

pub fn validate_consent<C: Catalogs>(consent: &Consent, ctx: &ValidationContext<C>) -> Validated {
    check_patient_ref("Consent", &consent.id, &consent.patient_ref, ctx)
}

pub fn validate_episode<C: Catalogs>(
    episode: &MTBEpisode,
    ctx: &ValidationContext<C>,
) -> Validated {
    all_of([
        check_patient_ref("MTBEpisode", &episode.id, &episode.patient_ref, ctx),
        and_then(
            must_be_defined(
                &episode.period.start,
                || error("Missing Period start"),
                |b| b.at("MTBEpisode", &episode.id, "period"),
            ),
            episode.period.start,
            |start| {
                let (Some(start), Some(end)) = (start, episode.period.end) else {
                    return Vec::new();
                };
                if end < start {
                    vec![
                        error("Period end must not precede period start")
                            .at("MTBEpisode", &episode.id, "period"),
                    ]
                } else {
                    Vec::new()
                }
            },
        ),
    ])
}

pub fn validate_diagnosis<C: Catalogs>(d: &Diagnosis, ctx: &ValidationContext<C>) -> Validated {
    all_of([
        check_patient_ref("Diagnosis", &d.id, &d.patient_ref, ctx),
        and_then(
            must_be_defined(
                &d.icd10,
                || error("Missing ICD-10-GM coding"),
                |b| b.at("Diagnosis", &d.id, "icd10"),
            ),
            d.icd10.clone(),
            |icd10| match icd10 {
                Some(coding) => validate_icd10_coding(&coding, ctx, "Diagnosis", &d.id, "icd10"),
                None => Vec::new(),
            },
        ),
        match &d.icd_o3_t {
            None => vec![info("Missing ICD-O-3-T coding").at("Diagnosis", &d.id, "icdO3T")],
            Some(coding) => validate_icdo3_coding(
                coding,
                ctx,
                C::icdo3_topography_codes,
                "Diagnosis",
                &d.id,
                "icdO3T",
            ),
        },
        validate_each(
            d.histology_report_refs.as_deref().unwrap_or(&[]),
            |href| {
                if ctx.histology_ids.contains(href) {
                    Vec::new()
                } else {
                    vec![fatal(format!(
                        "Referenced HistologyReport '{href}' does not exist"
                    ))
                    .at("Diagnosis", &d.id, "histologyReports")]
                }
            },
        ),
    ])
}

pub fn validate_previous_guideline_therapy<C: Catalogs>(
    t: &PreviousGuidelineTherapy,
    ctx: &ValidationContext<C>,
) -> Validated {
    all_of([
        check_patient_ref("PreviousGuidelineTherapy", &t.id, &t.patient_ref, ctx),
        check_diagnosis_ref("PreviousGuidelineTherapy", &t.id, &t.diagnosis_ref, ctx),
        therapy_line_check("PreviousGuidelineTherapy", &t.id, t.therapy_line),
        validate_each(t.medication.as_deref().unwrap_or(&[]), |code| {
            validate_medication_code(code, ctx, "PreviousGuidelineTherapy", &t.id, "medication")
        }),
    ])
}

pub fn validate_last_guideline_therapy<C: Catalogs>(
    t: &LastGuidelineTherapy,
    ctx: &ValidationContext<C>,
) -> Validated {
    all_of([
        check_patient_ref("LastGuidelineTherapy", &t.id, &t.patient_ref, ctx),
        check_diagnosis_ref("LastGuidelineTherapy", &t.id, &t.diagnosis_ref, ctx),
        therapy_line_check("LastGuidelineTherapy", &t.id, t.therapy_line),
        validate_each(t.medication.as_deref().unwrap_or(&[]), |code| {
            validate_medication_code(code, ctx, "LastGuidelineTherapy", &t.id, "medication")
        }),
        should_be_defined(
            &t.reason_stopped,
            || warning("Missing ReasonStopped"),
            |b| b.at("LastGuidelineTherapy", &t.id, "reasonStopped"),
        ),
        // spec.md §9 open question (a): index over `Response.therapy_ref`, not
        // the self-referential `therapy_refs` union, so this check can fail.
        if ctx.responded_therapy_refs.contains(&t.id) {
            Vec::new()
        } else {
            vec![warning("Missing Response").at("LastGuidelineTherapy", &t.id, "response")]
        },
    ])
}

pub fn validate_ecog_status<C: Catalogs>(e: &ECOGStatus, ctx: &ValidationContext<C>) -> Validated {
    check_patient_ref("ECOGStatus", &e.id, &e.patient_ref, ctx)
}

pub fn validate_specimen<C: Catalogs>(s: &Specimen, ctx: &ValidationContext<C>) -> Validated {
    all_of([
        check_patient_ref("Specimen", &s.id, &s.patient_ref, ctx),
        validate_icd10_coding(&s.icd10, ctx, "Specimen", &s.id, "icd10"),
        diagnosis_justifies_specimen(s, ctx),
        should_be_defined(
            &s.type_,
            || warning("Missing specimen type"),
            |b| b.at("Specimen", &s.id, "type"),
        ),
        should_be_defined(
            &s.collection,
            || warning("Missing collection method"),
            |b| b.at("Specimen", &s.id, "collection"),
        ),
    ])
}

fn diagnosis_justifies_specimen<C: Catalogs>(
    s: &Specimen,
    ctx: &ValidationContext<C>,
) -> Validated {
    if ctx.icd10_codes.contains(&s.icd10.code) {
        Vec::new()
    } else {
        vec![fatal(format!(
            "No Diagnosis with ICD-10-GM code '{}' exists for this patient",
            s.icd10.code
        ))
        .at("Specimen", &s.id, "icd10")]
    }
}

pub fn validate_histology_report<C: Catalogs>(
    h: &HistologyReport,
    ctx: &ValidationContext<C>,
) -> Validated {
    all_of([
        check_patient_ref("HistologyReport", &h.id, &h.patient_ref, ctx),
        check_specimen_ref("HistologyReport", &h.id, &h.specimen_ref, ctx),
        must_be_defined(
            &h.issued_on,
            || error("Missing IssuedOn"),
            |b| b.at("HistologyReport", &h.id, "issuedOn"),
        ),
        and_then(
            must_be_defined(
                &h.morphology,
                || error("Missing Morphology"),
                |b| b.at("HistologyReport", &h.id, "morphology"),
            ),
            h.morphology.clone(),
            |morphology| match morphology {
                Some(coding) => validate_icdo3_coding(
                    &coding,
                    ctx,
                    C::icdo3_morphology_codes,
                    "HistologyReport",
                    &h.id,
                    "morphology",
                ),
                None => Vec::new(),
            },
        ),
        and_then(
            must_be_defined(
                &h.tumor_content,
                || error("Missing TumorCellContent"),
                |b| b.at("HistologyReport", &h.id, "tumorContent"),
            ),
            h.tumor_content.clone(),
            |tumor_content| match tumor_content {
                Some(tcc) => validate_tumor_cell_content(
                    &tcc,
                    TccMethod::Histologic,
                    "HistologyReport",
                    &h.id,
                ),
                None => Vec::new(),
            },
        ),
    ])
}

pub fn validate_molecular_pathology_finding<C: Catalogs>(
    f: &MolecularPathologyFinding,
    ctx: &ValidationContext<C>,
) -> Validated {
    all_of([
        check_patient_ref("MolecularPathologyFinding", &f.id, &f.patient_ref, ctx),
        check_specimen_ref("MolecularPathologyFinding", &f.id, &f.specimen_ref, ctx),
        could_be_defined(
            &f.issued_on,
            || info("Missing IssuedOn"),
            |b| b.at("MolecularPathologyFinding", &f.id, "issuedOn"),
        ),
    ])
}

fn brcaness_check(value: Option<f64>, entity_type: &str, id: &str) -> Validated {
    match value {
        None => vec![info("Missing BRCAness").at(entity_type, id, "brcaness")],
        Some(v) => must_be_in_interval(
            &v,
            &0.0,
            &1.0,
            || error(format!("BRCAness value '{v}' is out of range [0.0,1.0]")),
            |b| b.at(entity_type, id, "brcaness"),
        ),
    }
}

fn msi_check(value: Option<f64>, entity_type: &str, id: &str) -> Validated {
    match value {
        None => vec![info("Missing MSI").at(entity_type, id, "msi")],
        Some(v) => must_be_in_interval(
            &v,
            &0.0,
            &2.0,
            || error(format!("MSI value '{v}' is out of range [0.0,2.0]")),
            |b| b.at(entity_type, id, "msi"),
        ),
    }
}

pub fn validate_somatic_ngs_report<C: Catalogs>(
    r: &SomaticNGSReport,
    ctx: &ValidationContext<C>,
) -> Validated {
    all_of([
        check_patient_ref("SomaticNGSReport", &r.id, &r.patient_ref, ctx),
        check_specimen_ref("SomaticNGSReport", &r.id, &r.specimen_ref, ctx),
        validate_tumor_cell_content(
            &r.tumor_content,
            TccMethod::Bioinformatic,
            "SomaticNGSReport",
            &r.id,
        ),
        brcaness_check(r.brcaness, "SomaticNGSReport", &r.id),
        msi_check(r.msi, "SomaticNGSReport", &r.id),
        must_be_in_interval(
            &r.tmb.value,
            &0.0,
            &1_000_000.0,
            || {
                error(format!(
                    "TMB value '{}' is out of range [0.0,1000000.0]",
                    r.tmb.value
                ))
            },
            |b| b.at("SomaticNGSReport", &r.id, "tmb"),
        ),
    ])
}

pub fn validate_care_plan<C: Catalogs>(c: &CarePlan, ctx: &ValidationContext<C>) -> Validated {
    all_of([
        check_patient_ref("CarePlan", &c.id, &c.patient_ref, ctx),
        check_diagnosis_ref("CarePlan", &c.id, &c.diagnosis_ref, ctx),
        match &c.recommendations {
            None => vec![error("Missing TherapyRecommendations").at("CarePlan", &c.id, "recommendations")],
            Some(recs) => validate_each(recs, |rec_id| {
                if ctx.recommendation_ids.contains(rec_id) {
                    Vec::new()
                } else {
                    vec![fatal(format!(
                        "Referenced TherapyRecommendation '{rec_id}' does not exist"
                    ))
                    .at("CarePlan", &c.id, "recommendations")]
                }
            }),
        },
        match &c.counselling_req {
            None => Vec::new(),
            Some(req_id) => {
                if ctx.counselling_req_ids.contains(req_id) {
                    Vec::new()
                } else {
                    vec![fatal(format!(
                        "Referenced GeneticCounsellingRequest '{req_id}' does not exist"
                    ))
                    .at("CarePlan", &c.id, "counsellingRequest")]
                }
            }
        },
        validate_each(c.rebiopsy_reqs.as_deref().unwrap_or(&[]), |req_id| {
            if ctx.rebiopsy_req_ids.contains(req_id) {
                Vec::new()
            } else {
                vec![fatal(format!(
                    "Referenced RebiopsyRequest '{req_id}' does not exist"
                ))
                .at("CarePlan", &c.id, "rebiopsyRequests")]
            }
        }),
    ])
}

pub fn validate_therapy_recommendation<C: Catalogs>(
    r: &TherapyRecommendation,
    ctx: &ValidationContext<C>,
) -> Validated {
    all_of([
        check_patient_ref("TherapyRecommendation", &r.id, &r.patient_ref, ctx),
        could_be_defined(
            &r.issued_on,
            || info("Missing IssuedOn"),
            |b| b.at("TherapyRecommendation", &r.id, "issuedOn"),
        ),
        validate_each(&r.medication, |code| {
            validate_medication_code(code, ctx, "TherapyRecommendation", &r.id, "medication")
        }),
    ])
}

pub fn validate_genetic_counselling_request<C: Catalogs>(
    r: &GeneticCounsellingRequest,
    ctx: &ValidationContext<C>,
) -> Validated {
    all_of([
        check_patient_ref("GeneticCounsellingRequest", &r.id, &r.patient_ref, ctx),
        could_be_defined(
            &r.issued_on,
            || info("Missing IssuedOn"),
            |b| b.at("GeneticCounsellingRequest", &r.id, "issuedOn"),
        ),
    ])
}

pub fn validate_rebiopsy_request<C: Catalogs>(
    r: &RebiopsyRequest,
    ctx: &ValidationContext<C>,
) -> Validated {
    all_of([
        check_patient_ref("RebiopsyRequest", &r.id, &r.patient_ref, ctx),
        check_specimen_ref("RebiopsyRequest", &r.id, &r.specimen_ref, ctx),
        could_be_defined(
            &r.issued_on,
            || info("Missing IssuedOn"),
            |b| b.at("RebiopsyRequest", &r.id, "issuedOn"),
        ),
    ])
}

pub fn validate_histology_reevaluation_request<C: Catalogs>(
    r: &HistologyReevaluationRequest,
    ctx: &ValidationContext<C>,
) -> Validated {
    all_of([
        check_patient_ref("HistologyReevaluationRequest", &r.id, &r.patient_ref, ctx),
        check_specimen_ref("HistologyReevaluationRequest", &r.id, &r.specimen_ref, ctx),
        could_be_defined(
            &r.issued_on,
            || info("Missing IssuedOn"),
            |b| b.at("HistologyReevaluationRequest", &r.id, "issuedOn"),
        ),
    ])
}

pub fn validate_study_inclusion_request<C: Catalogs>(
    r: &StudyInclusionRequest,
    ctx: &ValidationContext<C>,
) -> Validated {
    all_of([
        check_patient_ref("StudyInclusionRequest", &r.id, &r.patient_ref, ctx),
        check_diagnosis_ref("StudyInclusionRequest", &r.id, &r.diagnosis_ref, ctx),
        crate::validation::must_match(
            &r.nct_number,
            nct_pattern(),
            || error(format!("NCT number '{}' does not match NCT\\d{{8}}", r.nct_number)),
            |b| b.at("StudyInclusionRequest", &r.id, "nctNumber"),
        ),
        could_be_defined(
            &r.issued_on,
            || info("Missing IssuedOn"),
            |b| b.at("StudyInclusionRequest", &r.id, "issuedOn"),
        ),
    ])
}

pub fn validate_claim<C: Catalogs>(c: &Claim, ctx: &ValidationContext<C>) -> Validated {
    all_of([
        check_patient_ref("Claim", &c.id, &c.patient_ref, ctx),
        if ctx.recommendation_ids.contains(&c.therapy_rec_ref) {
            Vec::new()
        } else {
            vec![fatal(format!(
                "Referenced TherapyRecommendation '{}' does not exist",
                c.therapy_rec_ref
            ))
            .at("Claim", &c.id, "therapyRecommendation")]
        },
    ])
}

pub fn validate_claim_response<C: Catalogs>(
    r: &ClaimResponse,
    ctx: &ValidationContext<C>,
) -> Validated {
    all_of([
        check_patient_ref("ClaimResponse", &r.id, &r.patient_ref, ctx),
        if ctx.claim_ids.contains(&r.claim_ref) {
            Vec::new()
        } else {
            vec![fatal(format!("Referenced Claim '{}' does not exist", r.claim_ref))
                .at("ClaimResponse", &r.id, "claim")]
        },
        should_be_defined(
            &r.reason,
            || warning("Missing Reason"),
            |b| b.at("ClaimResponse", &r.id, "reason"),
        ),
    ])
}

pub fn validate_molecular_therapy<C: Catalogs>(
    t: &MolecularTherapy,
    ctx: &ValidationContext<C>,
) -> Validated {
    all_of([
        check_patient_ref("MolecularTherapy", &t.id, &t.patient_ref, ctx),
        validate_each(&t.history, |record| {
            validate_molecular_therapy_record(record, ctx)
        }),
    ])
}

fn validate_molecular_therapy_record<C: Catalogs>(
    record: &MolecularTherapyRecord,
    ctx: &ValidationContext<C>,
) -> Validated {
    all_of([
        check_patient_ref("MolecularTherapy", record.id(), record.patient_ref(), ctx),
        if ctx.recommendation_ids.contains(record.based_on_rec_ref()) {
            Vec::new()
        } else {
            vec![fatal(format!(
                "Referenced TherapyRecommendation '{}' does not exist",
                record.based_on_rec_ref()
            ))
            .at("MolecularTherapy", record.id(), "basedOn")]
        },
        validate_each(record.medication().unwrap_or(&[]), |code| {
            validate_medication_code(code, ctx, "MolecularTherapy", record.id(), "medication")
        }),
    ])
}

pub fn validate_response<C: Catalogs>(r: &Response, ctx: &ValidationContext<C>) -> Validated {
    all_of([
        check_patient_ref("Response", &r.id, &r.patient_ref, ctx),
        if ctx.therapy_refs.contains(&r.therapy_ref) {
            Vec::new()
        } else {
            vec![fatal(format!("Referenced therapy '{}' does not exist", r.therapy_ref))
                .at("Response", &r.id, "therapy")]
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::fixtures::FakeCatalogs;
    use crate::config::ValidatorConfig;

    fn ctx_fixture<'a>(
        catalogs: &'a FakeCatalogs,
        config: &'a ValidatorConfig,
    ) -> ValidationContext<'a, FakeCatalogs> {
        ValidationContext {
            catalogs,
            config,
            patient_id: "P1".into(),
            diagnosis_ids: ["D1".to_string()].into_iter().collect(),
            histology_ids: Default::default(),
            specimen_ids: Default::default(),
            recommendation_ids: Default::default(),
            counselling_req_ids: Default::default(),
            rebiopsy_req_ids: Default::default(),
            claim_ids: Default::default(),
            icd10_codes: ["C25.0".to_string()].into_iter().collect(),
            therapy_refs: Default::default(),
            responded_therapy_refs: Default::default(),
        }
    }

    #[test]
    fn patient_missing_birthdate_is_error() {
        let patient = Patient {
            id: "P1".into(),
            gender: None,
            birth_date: None,
            insurance: Some("AOK".into()),
            date_of_death: None,
        };
        let issues = validate_patient(&patient);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].location.attribute, "birthdate");
        assert_eq!(issues[0].message, "Missing BirthDate");
    }

    #[test]
    fn diagnosis_ref_to_unknown_diagnosis_is_fatal() {
        let catalogs = FakeCatalogs::standard();
        let config = ValidatorConfig::default();
        let ctx = ctx_fixture(&catalogs, &config);
        let issues = check_diagnosis_ref("PreviousGuidelineTherapy", "T1", "D_missing", &ctx);
        assert_eq!(issues.len(), 1);
    }

    #[test]
    fn therapy_line_boundaries() {
        assert!(therapy_line_check("X", "1", Some(0)).is_empty());
        assert!(therapy_line_check("X", "1", Some(9)).is_empty());
        assert!(!therapy_line_check("X", "1", Some(10)).is_empty());
    }

    #[test]
    fn nct_number_pattern() {
        let catalogs = FakeCatalogs::standard();
        let config = ValidatorConfig::default();
        let ctx = ctx_fixture(&catalogs, &config);
        let valid = StudyInclusionRequest {
            id: "S1".into(),
            patient_ref: "P1".into(),
            diagnosis_ref: "D1".into(),
            nct_number: "NCT00000000".into(),
            issued_on: None,
        };
        let invalid = StudyInclusionRequest {
            nct_number: "NCT1234567".into(),
            ..valid.clone()
        };
        assert!(validate_study_inclusion_request(&valid, &ctx)
            .into_iter()
            .all(|i| i.location.attribute != "nctNumber"));
        assert!(validate_study_inclusion_request(&invalid, &ctx)
            .into_iter()
            .any(|i| i.location.attribute == "nctNumber"));
    }
}
