//! # Triage Core
//!
//! Core business logic for vital-sign triage.
//!
//! This crate contains pure, synchronous data operations:
//! - Parsing loosely typed vital-sign fields (blood pressure, temperature, age)
//! - Scoring parsed vitals against fixed clinical bands
//! - Aggregating patients into high-risk, fever and data-quality lists
//!
//! Nothing here fails on bad data: a malformed field is reported as absent and flagged, and a
//! record without an identifier is skipped.
//!
//! **No transport concerns**: fetching records, retries and submission belong in
//! `triage-client`.

pub mod assessment;
pub mod constants;
pub mod parser;
pub mod record;
pub mod scoring;

pub use assessment::{assess_patients, assess_values, AssessmentResult, PatientAssessment};
pub use parser::ParsedVitals;
pub use record::{PatientRecord, RawValue};
pub use scoring::RiskScore;
pub use triage_types::PatientId;
