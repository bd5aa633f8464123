// src/applications/validation.rs
//! Synchronous field checks backing the wizard steps

use crate::applications::form::{fields, ApplicationFormState, UploadedFile};
use crate::utils::mime_from_extension;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// 5MB upload ceiling.
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 3] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldErrorKind {
    Required,
    InvalidEmail,
    FileTooLarge,
    FileType,
    ConsentRequired,
}

impl FieldErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::FileTooLarge => "FILE_TOO_LARGE",
            Self::FileType => "FILE_TYPE",
            Self::ConsentRequired => "CONSENT_REQUIRED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.kind.code())
    }
}

pub type FieldErrors = BTreeMap<String, FieldError>;

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

fn label(field: &str) -> &str {
    match field {
        fields::FIRST_NAME => "First name",
        fields::LAST_NAME => "Last name",
        fields::EMAIL => "Email",
        fields::PHONE => "Phone number",
        fields::RESUME => "Resume",
        fields::DESIRED_ROLE => "Desired role",
        fields::PREFERRED_INDUSTRY => "Preferred industry",
        other => other,
    }
}

pub fn check_required(form: &ApplicationFormState, field: &str, errors: &mut FieldErrors) {
    if form.text(field).trim().is_empty() {
        errors.insert(
            field.to_string(),
            FieldError::new(FieldErrorKind::Required, format!("{} is required", label(field))),
        );
    }
}

pub fn check_email(form: &ApplicationFormState, errors: &mut FieldErrors) {
    let email = form.text(fields::EMAIL);
    if email.trim().is_empty() {
        check_required(form, fields::EMAIL, errors);
    } else if !is_valid_email(email) {
        errors.insert(
            fields::EMAIL.to_string(),
            FieldError::new(
                FieldErrorKind::InvalidEmail,
                "Please enter a valid email address",
            ),
        );
    }
}

pub fn check_consent(form: &ApplicationFormState, errors: &mut FieldErrors) {
    if !form.flag(fields::CONSENT) {
        errors.insert(
            fields::CONSENT.to_string(),
            FieldError::new(
                FieldErrorKind::ConsentRequired,
                "You must agree to the privacy policy to continue",
            ),
        );
    }
}

/// Size and type checks for one picked file. A missing content type falls
/// back to the file extension.
pub fn validate_file(file: &UploadedFile) -> Result<(), FieldError> {
    if file.size > MAX_FILE_SIZE {
        return Err(FieldError::new(
            FieldErrorKind::FileTooLarge,
            format!(
                "File too large: {:.1}MB (max 5MB)",
                file.size as f64 / 1024.0 / 1024.0
            ),
        ));
    }

    let content_type = if file.content_type.trim().is_empty() {
        mime_from_extension(&file.file_name).unwrap_or_default()
    } else {
        file.content_type.trim()
    };
    let essence = content_type.split(';').next().unwrap_or_default().trim();

    if !ALLOWED_MIME_TYPES.contains(&essence) {
        return Err(FieldError::new(
            FieldErrorKind::FileType,
            "Please upload a PDF, DOC or DOCX file",
        ));
    }
    Ok(())
}

pub fn check_resume(form: &ApplicationFormState, errors: &mut FieldErrors) {
    let result = match form.file() {
        Some(file) => validate_file(file),
        None => Err(FieldError::new(
            FieldErrorKind::Required,
            "Please upload your resume",
        )),
    };
    if let Err(error) = result {
        errors.insert(fields::RESUME.to_string(), error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf(size: u64) -> UploadedFile {
        UploadedFile {
            file_name: "cv.pdf".to_string(),
            content_type: "application/pdf".to_string(),
            size,
        }
    }

    #[test]
    fn test_email_pattern() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("  jane.doe+jobs@example.co.uk "));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
    }

    #[test]
    fn test_email_check_distinguishes_missing_and_malformed() {
        let mut errors = FieldErrors::new();
        check_email(&ApplicationFormState::new(), &mut errors);
        assert_eq!(errors[fields::EMAIL].kind, FieldErrorKind::Required);

        let mut errors = FieldErrors::new();
        let form = ApplicationFormState::new().with_text(fields::EMAIL, "not-an-email");
        check_email(&form, &mut errors);
        assert_eq!(errors[fields::EMAIL].kind, FieldErrorKind::InvalidEmail);
    }

    #[test]
    fn test_file_size_limit() {
        assert!(validate_file(&pdf(MAX_FILE_SIZE)).is_ok());
        let err = validate_file(&pdf(MAX_FILE_SIZE + 1)).unwrap_err();
        assert_eq!(err.kind, FieldErrorKind::FileTooLarge);
    }

    #[test]
    fn test_file_type_allow_list() {
        let docx = UploadedFile {
            file_name: "cv.docx".to_string(),
            content_type: String::new(),
            size: 10,
        };
        assert!(validate_file(&docx).is_ok());

        let png = UploadedFile {
            file_name: "me.png".to_string(),
            content_type: "image/png".to_string(),
            size: 10,
        };
        assert_eq!(validate_file(&png).unwrap_err().kind, FieldErrorKind::FileType);

        let with_params = UploadedFile {
            content_type: "application/msword; charset=binary".to_string(),
            ..pdf(10)
        };
        assert!(validate_file(&with_params).is_ok());
    }

    #[test]
    fn test_consent_must_be_checked() {
        let mut errors = FieldErrors::new();
        check_consent(&ApplicationFormState::new(), &mut errors);
        assert_eq!(errors[fields::CONSENT].kind, FieldErrorKind::ConsentRequired);

        let mut errors = FieldErrors::new();
        check_consent(
            &ApplicationFormState::new().with_flag(fields::CONSENT, true),
            &mut errors,
        );
        assert!(errors.is_empty());
    }
}
