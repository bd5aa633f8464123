// src/applications/mod.rs
//! Candidate application forms: field state, validation and the step wizards

pub mod form;
pub mod validation;
pub mod wizard;

pub use form::{fields, ApplicationFormState, FieldValue, UploadedFile};
pub use validation::{FieldError, FieldErrorKind, FieldErrors, ALLOWED_MIME_TYPES, MAX_FILE_SIZE};
pub use wizard::{validate_step, Phase, Receipt, Wizard, WizardError, WizardKind, WizardStep};
