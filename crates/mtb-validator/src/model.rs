//! The MTB file's domain entities (spec.md §3.2).
//!
//! These are value objects: the validator only ever reads them. Every
//! entity that isn't itself a top-level singleton (`patient`, `consent`,
//! `episode`) carries a `patient_ref` that must equal `patient.id`
//! (spec.md §3.2 "Invariants").

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type Id = String;

/// A coded value from an external catalog (ICD-10-GM, ICD-O-3 topography or
/// morphology). `version` is optional on ICD-10-GM codings, where a missing
/// version falls back to [`crate::catalogs::DEFAULT_ICD10GM_VERSION`];
/// ICD-O-3 codings must always carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coding {
    pub code: String,
    pub version: Option<String>,
}

impl Coding {
    pub fn new(code: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            version: Some(version.into()),
        }
    }
}

/// HL7 administrative gender. Absence of `Patient.gender` is not flagged;
/// presence of a value outside this set is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: Id,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub insurance: Option<String>,
    pub date_of_death: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ConsentStatus {
    Active,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consent {
    pub id: Id,
    pub patient_ref: Id,
    pub status: ConsentStatus,
}

/// An open or closed date range. `end`, when present, must not precede
/// `start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MTBEpisode {
    pub id: Id,
    pub patient_ref: Id,
    pub period: Period,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub id: Id,
    pub patient_ref: Id,
    pub recorded_on: Option<NaiveDate>,
    pub icd10: Option<Coding>,
    pub icd_o3_t: Option<Coding>,
    pub histology_report_refs: Option<Vec<Id>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviousGuidelineTherapy {
    pub id: Id,
    pub patient_ref: Id,
    pub diagnosis_ref: Id,
    pub therapy_line: Option<u8>,
    pub medication: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastGuidelineTherapy {
    pub id: Id,
    pub patient_ref: Id,
    pub diagnosis_ref: Id,
    pub therapy_line: Option<u8>,
    pub medication: Option<Vec<String>>,
    pub period: Period,
    pub reason_stopped: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ECOGStatus {
    pub id: Id,
    pub patient_ref: Id,
    pub value: Option<u8>,
}

/// Closed set of specimen types; spec.md's distillation leaves `type` a
/// free string, but every recorded bwHC specimen is one of these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecimenType {
    Tumor,
    Normal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specimen {
    pub id: Id,
    pub patient_ref: Id,
    pub icd10: Coding,
    #[serde(rename = "type")]
    pub type_: Option<SpecimenType>,
    pub collection: Option<String>,
}

/// Which measurement discipline produced a [`TumorCellContent`] reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TccMethod {
    Histologic,
    Bioinformatic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TumorCellContent {
    pub specimen_ref: Id,
    pub method: TccMethod,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistologyReport {
    pub id: Id,
    pub patient_ref: Id,
    pub specimen_ref: Id,
    pub issued_on: Option<NaiveDate>,
    pub morphology: Option<Coding>,
    pub tumor_content: Option<TumorCellContentPlaceholder>,
}

/// [`HistologyReport::tumor_content`] and [`SomaticNGSReport::tumor_content`]
/// serialize identically; this alias keeps the field typed as the real
/// [`TumorCellContent`] without duplicating the struct.
pub type TumorCellContentPlaceholder = TumorCellContent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MolecularPathologyFinding {
    pub id: Id,
    pub patient_ref: Id,
    pub specimen_ref: Id,
    pub issued_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tmb {
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SomaticNGSReport {
    pub id: Id,
    pub patient_ref: Id,
    pub specimen_ref: Id,
    pub issued_on: NaiveDate,
    pub tumor_content: TumorCellContent,
    pub brcaness: Option<f64>,
    pub msi: Option<f64>,
    pub tmb: Tmb,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarePlan {
    pub id: Id,
    pub patient_ref: Id,
    pub diagnosis_ref: Id,
    pub issued_on: Option<NaiveDate>,
    pub recommendations: Option<Vec<Id>>,
    pub counselling_req: Option<Id>,
    pub rebiopsy_reqs: Option<Vec<Id>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TherapyRecommendation {
    pub id: Id,
    pub patient_ref: Id,
    pub issued_on: Option<NaiveDate>,
    pub medication: Vec<String>,
    pub priority: Option<u8>,
    pub level_of_evidence: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneticCounsellingRequest {
    pub id: Id,
    pub patient_ref: Id,
    pub issued_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebiopsyRequest {
    pub id: Id,
    pub patient_ref: Id,
    pub specimen_ref: Id,
    pub issued_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistologyReevaluationRequest {
    pub id: Id,
    pub patient_ref: Id,
    pub specimen_ref: Id,
    pub issued_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyInclusionRequest {
    pub id: Id,
    pub patient_ref: Id,
    pub diagnosis_ref: Id,
    pub nct_number: String,
    pub issued_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: Id,
    pub patient_ref: Id,
    pub therapy_rec_ref: Id,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    pub id: Id,
    pub patient_ref: Id,
    pub claim_ref: Id,
    pub reason: Option<String>,
}

/// One status entry in a [`MolecularTherapy`]'s history. Modeled as a tagged
/// union per spec.md §9 ("pattern matching on sum types"): only the variants
/// that carry medication (`Stopped`/`Completed`/`Ongoing`) have a
/// `medication` field at all — `NotDone` structurally cannot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MolecularTherapyRecord {
    NotDone {
        id: Id,
        patient_ref: Id,
        based_on_rec_ref: Id,
    },
    Stopped {
        id: Id,
        patient_ref: Id,
        based_on_rec_ref: Id,
        medication: Vec<String>,
    },
    Completed {
        id: Id,
        patient_ref: Id,
        based_on_rec_ref: Id,
        medication: Vec<String>,
    },
    Ongoing {
        id: Id,
        patient_ref: Id,
        based_on_rec_ref: Id,
        medication: Vec<String>,
    },
}

impl MolecularTherapyRecord {
    pub fn id(&self) -> &str {
        match self {
            Self::NotDone { id, .. }
            | Self::Stopped { id, .. }
            | Self::Completed { id, .. }
            | Self::Ongoing { id, .. } => id,
        }
    }

    pub fn patient_ref(&self) -> &str {
        match self {
            Self::NotDone { patient_ref, .. }
            | Self::Stopped { patient_ref, .. }
            | Self::Completed { patient_ref, .. }
            | Self::Ongoing { patient_ref, .. } => patient_ref,
        }
    }

    pub fn based_on_rec_ref(&self) -> &str {
        match self {
            Self::NotDone {
                based_on_rec_ref, ..
            }
            | Self::Stopped {
                based_on_rec_ref, ..
            }
            | Self::Completed {
                based_on_rec_ref, ..
            }
            | Self::Ongoing {
                based_on_rec_ref, ..
            } => based_on_rec_ref,
        }
    }

    pub fn medication(&self) -> Option<&[String]> {
        match self {
            Self::NotDone { .. } => None,
            Self::Stopped { medication, .. }
            | Self::Completed { medication, .. }
            | Self::Ongoing { medication, .. } => Some(medication.as_slice()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MolecularTherapy {
    pub id: Id,
    pub patient_ref: Id,
    pub history: Vec<MolecularTherapyRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub id: Id,
    pub patient_ref: Id,
    pub therapy_ref: Id,
}

/// The whole submitted case file. Every optional top-level slot is absent
/// in a `Rejected`-consent file (spec.md §4.4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MTBFile {
    pub patient: Patient,
    pub consent: Consent,
    pub episode: MTBEpisode,
    pub diagnoses: Option<Vec<Diagnosis>>,
    pub previous_guideline_therapies: Option<Vec<PreviousGuidelineTherapy>>,
    pub last_guideline_therapy: Option<LastGuidelineTherapy>,
    pub ecog_status: Option<Vec<ECOGStatus>>,
    pub specimens: Option<Vec<Specimen>>,
    pub histology_reports: Option<Vec<HistologyReport>>,
    pub mol_patho_findings: Option<Vec<MolecularPathologyFinding>>,
    pub ngs_reports: Option<Vec<SomaticNGSReport>>,
    pub care_plans: Option<Vec<CarePlan>>,
    pub recommendations: Option<Vec<TherapyRecommendation>>,
    pub counselling_requests: Option<Vec<GeneticCounsellingRequest>>,
    pub rebiopsy_requests: Option<Vec<RebiopsyRequest>>,
    pub histology_reevaluation_requests: Option<Vec<HistologyReevaluationRequest>>,
    pub study_inclusion_requests: Option<Vec<StudyInclusionRequest>>,
    pub claims: Option<Vec<Claim>>,
    pub claim_responses: Option<Vec<ClaimResponse>>,
    pub molecular_therapies: Option<Vec<MolecularTherapy>>,
    pub responses: Option<Vec<Response>>,
}
