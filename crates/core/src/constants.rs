//! Constants used throughout the triage core crate.
//!
//! Record field names and the clinical thresholds that drive scoring live here so that the
//! parser and the classifier agree on them.

/// Primary identifier field of a patient record.
pub const PATIENT_ID_FIELD: &str = "patient_id";

/// Fallback identifier field, used when `patient_id` is missing or empty.
pub const ID_FIELD: &str = "id";

/// Raw blood pressure field, usually `"systolic/diastolic"`.
pub const BLOOD_PRESSURE_FIELD: &str = "blood_pressure";

/// Raw body temperature field, in degrees Fahrenheit.
pub const TEMPERATURE_FIELD: &str = "temperature";

/// Raw age field, in years.
pub const AGE_FIELD: &str = "age";

/// Composite score at or above which a patient is high risk.
pub const HIGH_RISK_THRESHOLD: u8 = 4;

/// Temperature (°F) at or above which a patient has a fever.
pub const FEVER_THRESHOLD_F: f64 = 99.6;

/// Upper bound (inclusive) of a normal temperature.
pub const NORMAL_TEMP_MAX_F: f64 = 99.5;

/// Upper bound (inclusive) of a low-grade fever.
pub const LOW_FEVER_MAX_F: f64 = 100.9;

/// Lower bound (inclusive) of a high fever.
pub const HIGH_FEVER_MIN_F: f64 = 101.0;

/// Ages strictly above this score as elderly.
pub const SENIOR_AGE_YEARS: i64 = 65;
