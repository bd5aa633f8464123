// src/applications/form.rs
//! Field values, the attached résumé and per-field errors of one application form

use crate::applications::validation::FieldError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field names shared by both application forms.
pub mod fields {
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const RESUME: &str = "resume";
    pub const COVER_LETTER: &str = "coverLetter";
    pub const LINKEDIN: &str = "linkedin";
    pub const DESIRED_ROLE: &str = "desiredRole";
    pub const PREFERRED_INDUSTRY: &str = "preferredIndustry";
    pub const AVAILABILITY: &str = "availability";
    pub const MESSAGE: &str = "message";
    pub const CONSENT: &str = "consent";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Text(String),
}

/// Metadata of a file picked by the candidate. The bytes are never kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFormState {
    #[serde(default)]
    fields: BTreeMap<String, FieldValue>,
    #[serde(default)]
    file: Option<UploadedFile>,
    #[serde(default, skip_deserializing)]
    errors: BTreeMap<String, FieldError>,
}

impl ApplicationFormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, field: &str, value: impl Into<String>) -> Self {
        self.set_text(field, value);
        self
    }

    pub fn with_flag(mut self, field: &str, value: bool) -> Self {
        self.set_flag(field, value);
        self
    }

    pub fn with_file(mut self, file: UploadedFile) -> Self {
        self.attach_file(file);
        self
    }

    /// Editing a field clears any error shown next to it.
    pub fn set_text(&mut self, field: &str, value: impl Into<String>) {
        self.fields
            .insert(field.to_string(), FieldValue::Text(value.into()));
        self.errors.remove(field);
    }

    pub fn set_flag(&mut self, field: &str, value: bool) {
        self.fields.insert(field.to_string(), FieldValue::Flag(value));
        self.errors.remove(field);
    }

    pub fn attach_file(&mut self, file: UploadedFile) {
        self.file = Some(file);
        self.errors.remove(fields::RESUME);
    }

    /// Text value of a field, empty when unset or a flag.
    pub fn text(&self, field: &str) -> &str {
        match self.fields.get(field) {
            Some(FieldValue::Text(value)) => value,
            _ => "",
        }
    }

    /// Flag value of a field. A text value of "true"/"on" also counts as checked.
    pub fn flag(&self, field: &str) -> bool {
        match self.fields.get(field) {
            Some(FieldValue::Flag(value)) => *value,
            Some(FieldValue::Text(value)) => matches!(value.trim(), "true" | "on" | "yes"),
            None => false,
        }
    }

    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    pub fn errors(&self) -> &BTreeMap<String, FieldError> {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    /// Replace the errors of the given fields with a fresh validation outcome.
    pub(crate) fn record_errors(
        &mut self,
        checked: &[&str],
        errors: &BTreeMap<String, FieldError>,
    ) {
        for field in checked {
            self.errors.remove(*field);
        }
        self.errors
            .extend(errors.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}
