//! Field parsing for raw vital signs.
//!
//! Each parser turns one [`RawValue`] into a normalised optional number. Parsers never fail:
//! anything that cannot be read is reported as `None`, which the classifier treats as a
//! zero contribution and a data quality issue.

use crate::record::{PatientRecord, RawValue};
use regex::Regex;
use std::sync::LazyLock;

/// Runs of one to three decimal digits (any script), matched greedily left to right.
static SHORT_DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{1,3}").expect("digit run pattern is valid"));

/// An optionally negative decimal number, e.g. `-3`, `98.6`, `101.`.
static DECIMAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+\.?\d*").expect("decimal pattern is valid"));

/// A single decimal digit of any script.
static DIGIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d$").expect("digit pattern is valid"));

fn is_decimal_digit(c: char) -> bool {
    c.is_ascii_digit() || DIGIT.is_match(c.encode_utf8(&mut [0; 4]))
}

/// Numeric value of a decimal digit of any script.
///
/// Decimal digits are always encoded as contiguous, ascending `0..=9` blocks, and adjacent
/// blocks are whole, so the value is the distance back to the start of the run modulo 10.
fn digit_value(c: char) -> Option<u32> {
    if let Some(value) = c.to_digit(10) {
        return Some(value);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut offset = 0;
    let mut code = c as u32;
    while let Some(prev) = code.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        offset += 1;
        code -= 1;
    }
    Some(offset % 10)
}

/// Rewrites digits of any script as ASCII so the result can go through `str::parse`.
fn fold_digits(matched: &str) -> String {
    matched
        .chars()
        .map(|c| {
            digit_value(c)
                .and_then(|d| char::from_digit(d, 10))
                .unwrap_or(c)
        })
        .collect()
}

/// Normalised vitals for one patient.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParsedVitals {
    pub systolic: Option<u16>,
    pub diastolic: Option<u16>,
    pub temperature_f: Option<f64>,
    pub age_years: Option<i64>,
}

impl ParsedVitals {
    /// Parses all three vital fields of a record.
    pub fn parse(record: &PatientRecord) -> Self {
        let (systolic, diastolic) = parse_blood_pressure(&record.blood_pressure);
        Self {
            systolic,
            diastolic,
            temperature_f: parse_temperature(&record.temperature),
            age_years: parse_age(&record.age),
        }
    }

    /// Both halves of the blood pressure reading, if both parsed.
    pub fn blood_pressure(&self) -> Option<(u16, u16)> {
        self.systolic.zip(self.diastolic)
    }

    /// True when any vital failed to parse.
    pub fn has_missing(&self) -> bool {
        self.blood_pressure().is_none() || self.temperature_f.is_none() || self.age_years.is_none()
    }
}

/// Parses a blood pressure reading into `(systolic, diastolic)`.
///
/// Only text can hold a reading, since two numbers are needed. The first two runs of one to
/// three digits are taken; any further runs are ignored. With fewer than two runs both
/// values are absent.
pub fn parse_blood_pressure(raw: &RawValue) -> (Option<u16>, Option<u16>) {
    let RawValue::Text(text) = raw else {
        return (None, None);
    };

    let mut runs = SHORT_DIGIT_RUN
        .find_iter(text)
        .map(|m| fold_digits(m.as_str()).parse::<u16>().ok());

    match (runs.next().flatten(), runs.next().flatten()) {
        (Some(systolic), Some(diastolic)) => (Some(systolic), Some(diastolic)),
        _ => (None, None),
    }
}

/// Parses a temperature in degrees Fahrenheit.
pub fn parse_temperature(raw: &RawValue) -> Option<f64> {
    match raw {
        RawValue::Number(value) => Some(*value),
        RawValue::Text(text) => fold_digits(DECIMAL.find(text)?.as_str()).parse::<f64>().ok(),
        RawValue::Null | RawValue::Unsupported => None,
    }
}

/// Parses an age in whole years.
///
/// Numbers are truncated toward zero. Text yields its first run of one to three digits.
pub fn parse_age(raw: &RawValue) -> Option<i64> {
    match raw {
        RawValue::Number(value) if value.is_finite() => Some(value.trunc() as i64),
        RawValue::Text(text) => fold_digits(SHORT_DIGIT_RUN.find(text)?.as_str()).parse().ok(),
        RawValue::Number(_) | RawValue::Null | RawValue::Unsupported => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_owned())
    }

    #[test]
    fn test_blood_pressure_well_formed() {
        assert_eq!(parse_blood_pressure(&text("120/80")), (Some(120), Some(80)));
        assert_eq!(parse_blood_pressure(&text("118/76")), (Some(118), Some(76)));
    }

    #[test]
    fn test_blood_pressure_freeform_separators() {
        assert_eq!(parse_blood_pressure(&text("BP 150 over 95")), (Some(150), Some(95)));
        assert_eq!(parse_blood_pressure(&text("130/85/72")), (Some(130), Some(85)));
    }

    #[test]
    fn test_blood_pressure_long_runs_split_into_three_digits() {
        assert_eq!(parse_blood_pressure(&text("1234/80")), (Some(123), Some(4)));
    }

    #[test]
    fn test_blood_pressure_incomplete_readings() {
        assert_eq!(parse_blood_pressure(&text("120")), (None, None));
        assert_eq!(parse_blood_pressure(&text("150/")), (None, None));
        assert_eq!(parse_blood_pressure(&text("/90")), (None, None));
        assert_eq!(parse_blood_pressure(&text("INVALID")), (None, None));
        assert_eq!(parse_blood_pressure(&text("N/A")), (None, None));
        assert_eq!(parse_blood_pressure(&text("")), (None, None));
    }

    #[test]
    fn test_blood_pressure_non_text() {
        assert_eq!(parse_blood_pressure(&RawValue::Null), (None, None));
        assert_eq!(parse_blood_pressure(&RawValue::Number(120.0)), (None, None));
        assert_eq!(parse_blood_pressure(&RawValue::Unsupported), (None, None));
    }

    #[test]
    fn test_temperature_numbers_and_text() {
        assert_eq!(parse_temperature(&RawValue::Number(98.6)), Some(98.6));
        assert_eq!(parse_temperature(&text("101.2 F")), Some(101.2));
        assert_eq!(parse_temperature(&text("temp: 99.6")), Some(99.6));
        assert_eq!(parse_temperature(&text("-3")), Some(-3.0));
        assert_eq!(parse_temperature(&text("100.")), Some(100.0));
    }

    #[test]
    fn test_temperature_unparseable() {
        assert_eq!(parse_temperature(&text("TEMP_ERROR")), None);
        assert_eq!(parse_temperature(&text("")), None);
        assert_eq!(parse_temperature(&RawValue::Null), None);
        assert_eq!(parse_temperature(&RawValue::Unsupported), None);
    }

    #[test]
    fn test_age_numbers_truncate() {
        assert_eq!(parse_age(&RawValue::Number(70.0)), Some(70));
        assert_eq!(parse_age(&RawValue::Number(45.9)), Some(45));
        assert_eq!(parse_age(&RawValue::Number(-3.5)), Some(-3));
        assert_eq!(parse_age(&RawValue::Number(f64::NAN)), None);
    }

    #[test]
    fn test_age_text() {
        assert_eq!(parse_age(&text("45 years")), Some(45));
        assert_eq!(parse_age(&text("age 1024")), Some(102));
        assert_eq!(parse_age(&text("fifty-three")), None);
        assert_eq!(parse_age(&text("unknown")), None);
        assert_eq!(parse_age(&RawValue::Null), None);
        assert_eq!(parse_age(&RawValue::Unsupported), None);
    }

    #[test]
    fn test_fullwidth_digits() {
        assert_eq!(parse_blood_pressure(&text("１５０/９５")), (Some(150), Some(95)));
        assert_eq!(parse_temperature(&text("１０１.２ F")), Some(101.2));
        assert_eq!(parse_age(&text("４５ years")), Some(45));
    }

    #[test]
    fn test_other_script_digits() {
        // Arabic-Indic
        assert_eq!(parse_blood_pressure(&text("١٢٠/٨٠")), (Some(120), Some(80)));
        // Devanagari
        assert_eq!(parse_age(&text("७०")), Some(70));
    }

    #[test]
    fn test_digit_value_in_adjacent_blocks() {
        // Mathematical digits are five back-to-back 0-9 blocks starting at U+1D7CE.
        assert_eq!(digit_value('\u{1D7CE}'), Some(0));
        assert_eq!(digit_value('\u{1D7D8}'), Some(0));
        assert_eq!(digit_value('\u{1D7E1}'), Some(9));
        assert_eq!(digit_value('7'), Some(7));
        assert_eq!(digit_value('a'), None);
        assert_eq!(digit_value('/'), None);
    }

    #[test]
    fn test_parsed_vitals_flags_missing_fields() {
        let complete = PatientRecord::new(None, "118/76", 98.2, 30.0);
        let vitals = ParsedVitals::parse(&complete);
        assert_eq!(vitals.blood_pressure(), Some((118, 76)));
        assert!(!vitals.has_missing());

        let partial = PatientRecord::new(None, "118/", 98.2, 30.0);
        assert!(ParsedVitals::parse(&partial).has_missing());

        let no_age = PatientRecord::new(None, "118/76", 98.2, RawValue::Null);
        assert!(ParsedVitals::parse(&no_age).has_missing());
    }
}
