//! Per-patient classification and cohort aggregation.

use crate::constants::{FEVER_THRESHOLD_F, HIGH_RISK_THRESHOLD};
use crate::parser::ParsedVitals;
use crate::record::PatientRecord;
use crate::scoring::RiskScore;
use serde::Serialize;
use std::collections::BTreeSet;
use triage_types::PatientId;

/// The classification of a single identified patient.
#[derive(Clone, Debug, PartialEq)]
pub struct PatientAssessment {
    pub id: PatientId,
    pub vitals: ParsedVitals,
    pub score: RiskScore,
}

impl PatientAssessment {
    /// Parses and scores one record.
    ///
    /// Returns `None` for records without a usable identifier; they are excluded from every
    /// output list.
    pub fn evaluate(record: &PatientRecord) -> Option<Self> {
        let id = record.id.clone()?;
        let vitals = ParsedVitals::parse(record);
        let score = RiskScore::from_vitals(&vitals);
        Some(Self { id, vitals, score })
    }

    pub fn is_high_risk(&self) -> bool {
        self.score.total() >= HIGH_RISK_THRESHOLD
    }

    pub fn has_fever(&self) -> bool {
        self.vitals
            .temperature_f
            .is_some_and(|t| t >= FEVER_THRESHOLD_F)
    }

    pub fn has_data_quality_issue(&self) -> bool {
        self.vitals.has_missing()
    }
}

/// Aggregated identifiers for a whole patient collection.
///
/// Each list is deduplicated and sorted ascending. Serialises as a JSON object with the three
/// list fields in declaration order, which is also the submission payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AssessmentResult {
    pub high_risk_patients: Vec<String>,
    pub fever_patients: Vec<String>,
    pub data_quality_issues: Vec<String>,
}

/// Accumulates category membership while folding over records.
#[derive(Default)]
struct Cohort {
    high_risk: BTreeSet<PatientId>,
    fever: BTreeSet<PatientId>,
    data_quality: BTreeSet<PatientId>,
}

impl Cohort {
    fn add(&mut self, assessment: PatientAssessment) {
        if assessment.has_data_quality_issue() {
            self.data_quality.insert(assessment.id.clone());
        }
        if assessment.is_high_risk() {
            self.high_risk.insert(assessment.id.clone());
        }
        if assessment.has_fever() {
            self.fever.insert(assessment.id);
        }
    }

    fn finish(self) -> AssessmentResult {
        fn into_list(ids: BTreeSet<PatientId>) -> Vec<String> {
            ids.into_iter().map(PatientId::into_inner).collect()
        }

        AssessmentResult {
            high_risk_patients: into_list(self.high_risk),
            fever_patients: into_list(self.fever),
            data_quality_issues: into_list(self.data_quality),
        }
    }
}

/// Classifies every record and aggregates the results.
pub fn assess_patients<'a>(
    records: impl IntoIterator<Item = &'a PatientRecord>,
) -> AssessmentResult {
    let mut cohort = Cohort::default();
    let mut skipped = 0usize;

    for record in records {
        match PatientAssessment::evaluate(record) {
            Some(assessment) => {
                tracing::debug!(
                    patient = %assessment.id,
                    bp = assessment.score.blood_pressure,
                    temp = assessment.score.temperature,
                    age = assessment.score.age,
                    total = assessment.score.total(),
                    "scored patient"
                );
                cohort.add(assessment);
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!("skipped {} record(s) without an identifier", skipped);
    }

    cohort.finish()
}

/// Classifies raw upstream JSON entries.
///
/// Entries that are not JSON objects are skipped with a warning.
pub fn assess_values(values: &[serde_json::Value]) -> AssessmentResult {
    let records: Vec<PatientRecord> = values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let record = PatientRecord::from_json(value);
            if record.is_none() {
                tracing::warn!("skipping patient entry {} (not a JSON object)", index);
            }
            record
        })
        .collect();

    assess_patients(&records)
}
