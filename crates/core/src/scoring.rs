//! Risk scoring from parsed vitals.
//!
//! Sub-scores follow fixed clinical bands. Missing values always score zero.

use crate::constants::{
    FEVER_THRESHOLD_F, HIGH_FEVER_MIN_F, LOW_FEVER_MAX_F, NORMAL_TEMP_MAX_F, SENIOR_AGE_YEARS,
};
use crate::parser::ParsedVitals;

/// Per-category sub-scores for one patient.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RiskScore {
    /// Blood pressure, 0-4.
    pub blood_pressure: u8,
    /// Temperature, 0-2.
    pub temperature: u8,
    /// Age, 0-2.
    pub age: u8,
}

impl RiskScore {
    /// Scores a patient's parsed vitals.
    pub fn from_vitals(vitals: &ParsedVitals) -> Self {
        Self {
            blood_pressure: blood_pressure_score(vitals.systolic, vitals.diastolic),
            temperature: temperature_score(vitals.temperature_f),
            age: age_score(vitals.age_years),
        }
    }

    /// Composite score, 0-8.
    pub fn total(&self) -> u8 {
        self.blood_pressure + self.temperature + self.age
    }
}

/// Blood pressure sub-score.
///
/// The bands overlap: a reading is checked against every band and scored at the most severe
/// one it satisfies, so systolic and diastolic can each pull the score up independently.
/// Readings that satisfy no band score 0.
pub fn blood_pressure_score(systolic: Option<u16>, diastolic: Option<u16>) -> u8 {
    let (Some(s), Some(d)) = (systolic, diastolic) else {
        return 0;
    };

    let bands = [
        // Normal
        (s < 120 && d < 80, 1),
        // Elevated
        ((120..=129).contains(&s) && d < 80, 2),
        // Stage 1
        ((130..=139).contains(&s) || (80..=89).contains(&d), 3),
        // Stage 2
        (s >= 140 || d >= 90, 4),
    ];

    bands
        .into_iter()
        .filter_map(|(satisfied, score)| satisfied.then_some(score))
        .max()
        .unwrap_or(0)
}

/// Temperature sub-score. Values between the published bands score 0.
pub fn temperature_score(temperature_f: Option<f64>) -> u8 {
    match temperature_f {
        Some(t) if t <= NORMAL_TEMP_MAX_F => 0,
        Some(t) if (FEVER_THRESHOLD_F..=LOW_FEVER_MAX_F).contains(&t) => 1,
        Some(t) if t >= HIGH_FEVER_MIN_F => 2,
        _ => 0,
    }
}

/// Age sub-score. Under 40 and 40-65 share the same score.
pub fn age_score(age_years: Option<i64>) -> u8 {
    match age_years {
        Some(age) if age > SENIOR_AGE_YEARS => 2,
        Some(_) => 1,
        None => 0,
    }
}
