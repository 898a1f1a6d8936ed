//! Cross-reference context threaded through every record validator
//! (spec.md §9 "typeclass-style implicits / context injection").
//!
//! Built once per [`crate::orchestrator::check`] call, before any record is
//! validated, so that referential-integrity checks are simple set lookups
//! rather than repeated scans of the file.

use crate::catalogs::Catalogs;
use crate::config::ValidatorConfig;
use crate::model::MTBFile;
use std::collections::HashSet;

/// Catalog handle plus the indexes derived from one [`MTBFile`].
pub struct ValidationContext<'a, C: Catalogs> {
    pub catalogs: &'a C,
    pub config: &'a ValidatorConfig,
    pub patient_id: String,
    pub diagnosis_ids: HashSet<String>,
    pub histology_ids: HashSet<String>,
    pub specimen_ids: HashSet<String>,
    pub recommendation_ids: HashSet<String>,
    pub counselling_req_ids: HashSet<String>,
    pub rebiopsy_req_ids: HashSet<String>,
    pub claim_ids: HashSet<String>,
    pub icd10_codes: HashSet<String>,
    pub therapy_refs: HashSet<String>,
    /// `Response.therapy_ref` values across the file — used to answer "does
    /// a Response exist for this therapy" (spec.md §9 open question (a)),
    /// not to be confused with `therapy_refs` above.
    pub responded_therapy_refs: HashSet<String>,
}

impl<'a, C: Catalogs> ValidationContext<'a, C> {
    /// Build every index from `file` in one pass. Called only on the
    /// `Active`-consent branch of the orchestrator — a `Rejected` file has
    /// nothing to index against.
    pub fn build(file: &MTBFile, catalogs: &'a C, config: &'a ValidatorConfig) -> Self {
        let diagnosis_ids = ids(&file.diagnoses, |d| d.id.clone());
        let histology_ids = ids(&file.histology_reports, |h| h.id.clone());
        let specimen_ids = ids(&file.specimens, |s| s.id.clone());
        let recommendation_ids = ids(&file.recommendations, |r| r.id.clone());
        let counselling_req_ids = ids(&file.counselling_requests, |r| r.id.clone());
        let rebiopsy_req_ids = ids(&file.rebiopsy_requests, |r| r.id.clone());
        let claim_ids = ids(&file.claims, |c| c.id.clone());

        let icd10_codes = file
            .diagnoses
            .iter()
            .flatten()
            .filter_map(|d| d.icd10.as_ref())
            .map(|c| c.code.clone())
            .collect();

        let mut therapy_refs: HashSet<String> = file
            .previous_guideline_therapies
            .iter()
            .flatten()
            .map(|t| t.id.clone())
            .collect();
        if let Some(last) = &file.last_guideline_therapy {
            therapy_refs.insert(last.id.clone());
        }
        for therapy in file.molecular_therapies.iter().flatten() {
            for record in &therapy.history {
                therapy_refs.insert(record.id().to_string());
            }
        }

        let responded_therapy_refs = ids(&file.responses, |r| r.therapy_ref.clone());

        Self {
            catalogs,
            config,
            patient_id: file.patient.id.clone(),
            diagnosis_ids,
            histology_ids,
            specimen_ids,
            recommendation_ids,
            counselling_req_ids,
            rebiopsy_req_ids,
            claim_ids,
            icd10_codes,
            therapy_refs,
            responded_therapy_refs,
        }
    }
}

fn ids<T>(items: &Option<Vec<T>>, id_of: impl Fn(&T) -> String) -> HashSet<String> {
    items.iter().flatten().map(id_of).collect()
}
