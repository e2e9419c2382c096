//! The fixed-shape record produced by information extraction.
//!
//! The model is asked for exactly five keys. Whatever comes back is projected
//! onto this struct at the parse boundary: missing keys become `None` (or an
//! empty list for `tech_stack`), extra keys the model invented are silently
//! dropped, and non-string entries are skipped. Downstream consumers can rely
//! on the shape without re-validating it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Marker stored in [`ResumeRecord::error`] when the model call or response
/// parsing fails and no field-level recovery is possible.
pub const EXTRACTION_FAILED: &str = "Extraction failed";

/// A structured resume record.
///
/// The five recognised keys are always present in serialised output;
/// `error` appears only on failure and `file_name` only in batch output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    #[serde(default)]
    pub tech_stack: Vec<String>,

    /// Set when extraction degraded to a default record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Source file name, set only by directory batch processing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Default for ResumeRecord {
    fn default() -> Self {
        Self {
            full_name: None,
            phone_number: None,
            email: None,
            location: None,
            tech_stack: Vec::new(),
            error: None,
            file_name: None,
        }
    }
}

impl ResumeRecord {
    /// The all-null record returned when extraction fails.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Project a parsed model reply onto the five recognised keys.
    ///
    /// Keys the model omitted default to `None` / empty; keys it invented are
    /// dropped; `tech_stack` entries that are not strings are skipped.
    pub fn from_model_value(value: &Value) -> Self {
        fn scalar(value: &Value, key: &str) -> Option<String> {
            value.get(key).and_then(Value::as_str).map(str::to_owned)
        }

        let tech_stack = value
            .get("tech_stack")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            full_name: scalar(value, "full_name"),
            phone_number: scalar(value, "phone_number"),
            email: scalar(value, "email"),
            location: scalar(value, "location"),
            tech_stack,
            error: None,
            file_name: None,
        }
    }

    /// Tag the record with its source file name (batch mode).
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// True when this record is a degraded default rather than a real result.
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}
