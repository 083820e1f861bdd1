//! Shared identifier types for the triage workspace.

/// Errors that can occur when creating validated identifier types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty
    #[error("identifier cannot be empty")]
    Empty,
}

/// A patient identifier as supplied by the upstream API.
///
/// The wrapped string is guaranteed to be non-empty. Unlike most text inputs it is kept
/// verbatim (no trimming), because the identifier is echoed back to the submission endpoint
/// and must match what the upstream sent.
///
/// Ordering is byte-wise on the UTF-8 encoding, which is the same as ordering by code point.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatientId(String);

impl PatientId {
    /// Creates a new `PatientId` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `Err(TextError::Empty)` if the input is the empty string.
    pub fn new(input: impl Into<String>) -> Result<Self, TextError> {
        let value = input.into();
        if value.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(value))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier, returning the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PatientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for PatientId {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for PatientId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PatientId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PatientId::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_empty() {
        assert_eq!(PatientId::new(""), Err(TextError::Empty));
    }

    #[test]
    fn test_new_keeps_input_verbatim() {
        let id = PatientId::new(" DEMO001 ").unwrap();
        assert_eq!(id.as_str(), " DEMO001 ");
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut ids: Vec<PatientId> = ["DEMO010", "DEMO002", "B", "a"]
            .into_iter()
            .map(|s| PatientId::new(s).unwrap())
            .collect();
        ids.sort();

        let sorted: Vec<&str> = ids.iter().map(PatientId::as_str).collect();
        assert_eq!(sorted, vec!["B", "DEMO002", "DEMO010", "a"]);
    }

    #[test]
    fn test_serde_as_plain_string() {
        let id = PatientId::new("DEMO001").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"DEMO001\"");

        let back: PatientId = serde_json::from_str("\"DEMO001\"").unwrap();
        assert_eq!(back, id);

        let err = serde_json::from_str::<PatientId>("\"\"");
        assert!(err.is_err());
    }
}
