//! Case-insensitive column-name resolution.

use std::collections::HashMap;

/// Maps column names case-insensitively while preserving the original
/// spelling, so adapters and validators can resolve `patientid` against a
/// frame whose header reads `PatientID`.
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveLookup {
    /// Uppercase name -> original name.
    inner: HashMap<String, String>,
}

impl CaseInsensitiveLookup {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            inner: names
                .into_iter()
                .map(|name| (name.as_ref().to_uppercase(), name.as_ref().to_string()))
                .collect(),
        }
    }

    /// Resolves `name` to the original column spelling, if present.
    pub fn get(&self, name: impl AsRef<str>) -> Option<&str> {
        self.inner
            .get(&name.as_ref().to_uppercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.inner.contains_key(&name.as_ref().to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_case_insensitively() {
        let lookup = CaseInsensitiveLookup::new(["PatientID", "AdmissionDate"]);

        assert_eq!(lookup.get("patientid"), Some("PatientID"));
        assert_eq!(lookup.get("PATIENTID"), Some("PatientID"));
        assert_eq!(lookup.get("AdmissionDate"), Some("AdmissionDate"));
        assert_eq!(lookup.get("DischargeDate"), None);
        assert!(lookup.contains("admissiondate"));
    }
}
