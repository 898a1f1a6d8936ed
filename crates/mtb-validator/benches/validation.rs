use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mtb_validator::catalogs::fixtures::FakeCatalogs;
use mtb_validator::model::*;
use mtb_validator::{check, ValidationContext, ValidatorConfig};

fn today() -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

fn minimal_valid_file() -> MTBFile {
    MTBFile {
        patient: Patient {
            id: "P1".into(),
            gender: Some(Gender::Male),
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
                start: Some(today()),
                end: None,
            },
        },
        diagnoses: Some(vec![Diagnosis {
            id: "D1".into(),
            patient_ref: "P1".into(),
            recorded_on: Some(today()),
            icd10: Some(Coding::new("C25.0", "2019")),
            icd_o3_t: Some(Coding::new("C25.0", "2014")),
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

/// Builds a file with `n` previous guideline therapies, exercising the
/// per-record `all_of`/`validate_each` accumulation at scale.
fn file_with_therapies(n: usize) -> MTBFile {
    let mut file = minimal_valid_file();
    file.previous_guideline_therapies = Some(
        (0..n)
            .map(|i| PreviousGuidelineTherapy {
                id: format!("PGT{i}"),
                patient_ref: "P1".into(),
                diagnosis_ref: "D1".into(),
                therapy_line: Some((i % 10) as u8),
                medication: Some(vec!["L01BC02".into()]),
            })
            .collect(),
    );
    file
}

fn bench_minimal_file(c: &mut Criterion) {
    let catalogs = FakeCatalogs::standard();
    let config = ValidatorConfig::default();
    let file = minimal_valid_file();

    c.bench_function("check_minimal_file", |b| {
        b.iter(|| {
            let ctx = ValidationContext::build(black_box(&file), &catalogs, &config);
            black_box(check(file.clone(), &ctx))
        });
    });
}

fn bench_therapy_scaling(c: &mut Criterion) {
    let catalogs = FakeCatalogs::standard();
    let config = ValidatorConfig::default();

    let mut group = c.benchmark_group("check_with_therapies");
    for count in [1, 10, 50, 200].iter() {
        let file = file_with_therapies(*count);
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| {
                let ctx = ValidationContext::build(black_box(&file), &catalogs, &config);
                black_box(check(file.clone(), &ctx))
            });
        });
    }
    group.finish();
}

fn bench_batch_validation(c: &mut Criterion) {
    let catalogs = FakeCatalogs::standard();
    let config = ValidatorConfig::default();

    let mut group = c.benchmark_group("batch_validation");
    for batch_size in [10, 50, 100].iter() {
        let files: Vec<_> = (0..*batch_size).map(|_| minimal_valid_file()).collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            batch_size,
            |b, _| {
                b.iter(|| {
                    for file in &files {
                        let ctx = ValidationContext::build(black_box(file), &catalogs, &config);
                        black_box(check(file.clone(), &ctx)).ok();
                    }
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_minimal_file,
    bench_therapy_scaling,
    bench_batch_validation
);
criterion_main!(benches);
