//! Patient record boundary types.
//!
//! Upstream records are loosely typed JSON: the same logical field may arrive as a number, a
//! string, `null`, or something else entirely. This module converts them into a
//! [`PatientRecord`] whose vitals are [`RawValue`]s, so downstream parsing dispatches on an
//! explicit tag instead of inspecting JSON types.

use crate::constants::{
    AGE_FIELD, BLOOD_PRESSURE_FIELD, ID_FIELD, PATIENT_ID_FIELD, TEMPERATURE_FIELD,
};
use serde_json::{Map, Value};
use triage_types::PatientId;

/// A raw vital-sign value as received from upstream.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    /// Explicit `null`, or the field was missing from the record.
    Null,
    /// Any JSON number.
    Number(f64),
    /// Any JSON string, possibly freeform or malformed.
    Text(String),
    /// Booleans, arrays and objects.
    Unsupported,
}

impl RawValue {
    /// Reads a field out of a JSON object, mapping a missing key to [`RawValue::Null`].
    pub fn from_field(object: &Map<String, Value>, key: &str) -> Self {
        object.get(key).map(RawValue::from).unwrap_or(RawValue::Null)
    }
}

impl From<&Value> for RawValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => RawValue::Null,
            Value::Number(n) => n.as_f64().map_or(RawValue::Unsupported, RawValue::Number),
            Value::String(s) => RawValue::Text(s.clone()),
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => RawValue::Unsupported,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_owned())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

/// One patient record, reduced to the fields the classifier reads.
#[derive(Clone, Debug, PartialEq)]
pub struct PatientRecord {
    /// Resolved identifier; `None` when the record carries no usable one.
    pub id: Option<PatientId>,
    pub blood_pressure: RawValue,
    pub temperature: RawValue,
    pub age: RawValue,
}

impl PatientRecord {
    /// Builds a record directly from its parts.
    pub fn new(
        id: Option<PatientId>,
        blood_pressure: impl Into<RawValue>,
        temperature: impl Into<RawValue>,
        age: impl Into<RawValue>,
    ) -> Self {
        Self {
            id,
            blood_pressure: blood_pressure.into(),
            temperature: temperature.into(),
            age: age.into(),
        }
    }

    /// Converts one upstream JSON entry into a record.
    ///
    /// Returns `None` if the entry is not a JSON object. A record whose identifier is
    /// unusable is still returned (with `id: None`) so callers can decide how to report it.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;

        let id = usable_id(object.get(PATIENT_ID_FIELD))
            .or_else(|| usable_id(object.get(ID_FIELD)));

        Some(Self {
            id,
            blood_pressure: RawValue::from_field(object, BLOOD_PRESSURE_FIELD),
            temperature: RawValue::from_field(object, TEMPERATURE_FIELD),
            age: RawValue::from_field(object, AGE_FIELD),
        })
    }
}

/// Resolve an identifier field.
///
/// Non-empty strings are taken verbatim. Non-zero numbers are rendered with their JSON text.
/// Everything else (`null`, empty string, zero, booleans, containers) is unusable.
fn usable_id(value: Option<&Value>) -> Option<PatientId> {
    match value? {
        Value::String(s) => PatientId::new(s.as_str()).ok(),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => {
            PatientId::new(n.to_string()).ok()
        }
        _ => None,
    }
}
