// src/applications/wizard.rs
//! Three-step application wizards with validation-gated forward moves and a
//! simulated, cancellable submission delay

use crate::applications::form::{fields, ApplicationFormState};
use crate::applications::validation::{
    check_consent, check_email, check_required, check_resume, FieldErrors,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WizardKind {
    JobApplication {
        #[serde(rename = "jobId")]
        job_id: u32,
    },
    General,
}

impl fmt::Display for WizardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JobApplication { job_id } => write!(f, "application for job {}", job_id),
            Self::General => f.write_str("general application"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WizardStep {
    Personal,
    Background,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 3] = [Self::Personal, Self::Background, Self::Review];

    /// 1-based position shown in the progress indicator.
    pub fn number(&self) -> u8 {
        match self {
            Self::Personal => 1,
            Self::Background => 2,
            Self::Review => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.number() == number)
    }

    pub fn next(&self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(&self) -> Option<Self> {
        self.number().checked_sub(1).and_then(Self::from_number)
    }

    pub fn title(&self, kind: WizardKind) -> &'static str {
        match (self, kind) {
            (Self::Personal, _) => "Personal Information",
            (Self::Background, WizardKind::JobApplication { .. }) => "Resume & Experience",
            (Self::Background, WizardKind::General) => "Career Preferences",
            (Self::Review, _) => "Review & Submit",
        }
    }

    /// Fields whose errors this step owns.
    pub fn fields(&self, kind: WizardKind) -> &'static [&'static str] {
        match (self, kind) {
            (Self::Personal, _) => &[
                fields::FIRST_NAME,
                fields::LAST_NAME,
                fields::EMAIL,
                fields::PHONE,
            ],
            (Self::Background, WizardKind::JobApplication { .. }) => &[fields::RESUME],
            (Self::Background, WizardKind::General) => &[
                fields::DESIRED_ROLE,
                fields::PREFERRED_INDUSTRY,
                fields::RESUME,
            ],
            (Self::Review, _) => &[fields::CONSENT],
        }
    }
}

/// Check one step of a form without touching its recorded errors.
pub fn validate_step(kind: WizardKind, step: WizardStep, form: &ApplicationFormState) -> FieldErrors {
    let mut errors = FieldErrors::new();
    match step {
        WizardStep::Personal => {
            check_required(form, fields::FIRST_NAME, &mut errors);
            check_required(form, fields::LAST_NAME, &mut errors);
            check_email(form, &mut errors);
            check_required(form, fields::PHONE, &mut errors);
        }
        WizardStep::Background => {
            if kind == WizardKind::General {
                check_required(form, fields::DESIRED_ROLE, &mut errors);
                check_required(form, fields::PREFERRED_INDUSTRY, &mut errors);
            }
            check_resume(form, &mut errors);
        }
        WizardStep::Review => check_consent(form, &mut errors),
    }
    errors
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub reference: Uuid,
    #[serde(flatten)]
    pub kind: WizardKind,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "detail", rename_all = "camelCase")]
pub enum Phase {
    Editing(WizardStep),
    Submitting,
    Submitted(Receipt),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    Validation { step: WizardStep, errors: FieldErrors },
    InvalidTransition { from: WizardStep, to: WizardStep },
    NotOnReviewStep(WizardStep),
    NotEditing,
    Cancelled,
}

impl WizardError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::InvalidTransition { .. } => "INVALID_STEP_TRANSITION",
            Self::NotOnReviewStep(_) => "NOT_ON_REVIEW_STEP",
            Self::NotEditing => "ALREADY_SUBMITTED",
            Self::Cancelled => "SUBMISSION_CANCELLED",
        }
    }
}

impl fmt::Display for WizardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { step, errors } => write!(
                f,
                "Step {} has {} invalid field(s)",
                step.number(),
                errors.len()
            ),
            Self::InvalidTransition { from, to } => write!(
                f,
                "Cannot move from step {} to step {}",
                from.number(),
                to.number()
            ),
            Self::NotOnReviewStep(step) => {
                write!(f, "Submission is only possible from the review step (at step {})", step.number())
            }
            Self::NotEditing => f.write_str("Application is already submitting or submitted"),
            Self::Cancelled => f.write_str("Submission was cancelled"),
        }
    }
}

impl std::error::Error for WizardError {}

/// Puts the wizard back on the review step if the submission future is
/// dropped or cancelled before the delay elapses.
struct SubmittingGuard<'w> {
    phase: &'w mut Phase,
    armed: bool,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            *self.phase = Phase::Editing(WizardStep::Review);
        }
    }
}

#[derive(Debug, Clone)]
pub struct Wizard {
    kind: WizardKind,
    phase: Phase,
    form: ApplicationFormState,
}

impl Wizard {
    pub fn new(kind: WizardKind) -> Self {
        Self::with_form(kind, ApplicationFormState::new())
    }

    pub fn with_form(kind: WizardKind, form: ApplicationFormState) -> Self {
        Self {
            kind,
            phase: Phase::Editing(WizardStep::Personal),
            form,
        }
    }

    pub fn kind(&self) -> WizardKind {
        self.kind
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Current step while editing.
    pub fn step(&self) -> Option<WizardStep> {
        match self.phase {
            Phase::Editing(step) => Some(step),
            _ => None,
        }
    }

    pub fn form(&self) -> &ApplicationFormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ApplicationFormState {
        &mut self.form
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.phase, Phase::Submitted(_))
    }

    fn editing_step(&self) -> Result<WizardStep, WizardError> {
        self.step().ok_or(WizardError::NotEditing)
    }

    fn check_step(&mut self, step: WizardStep) -> Result<(), WizardError> {
        let errors = validate_step(self.kind, step, &self.form);
        self.form.record_errors(step.fields(self.kind), &errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(WizardError::Validation { step, errors })
        }
    }

    /// Validate the current step and move forward on success.
    pub fn next(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.editing_step()?;
        let Some(target) = step.next() else {
            return Err(WizardError::InvalidTransition {
                from: step,
                to: step,
            });
        };
        self.check_step(step)?;
        debug!("{}: step {} -> {}", self.kind, step.number(), target.number());
        self.phase = Phase::Editing(target);
        Ok(target)
    }

    /// Jump back to any earlier step. Never validates.
    pub fn back_to(&mut self, target: WizardStep) -> Result<(), WizardError> {
        let step = self.editing_step()?;
        if target >= step {
            return Err(WizardError::InvalidTransition {
                from: step,
                to: target,
            });
        }
        self.phase = Phase::Editing(target);
        Ok(())
    }

    pub fn back(&mut self) -> Result<WizardStep, WizardError> {
        let step = self.editing_step()?;
        let target = step.previous().ok_or(WizardError::InvalidTransition {
            from: step,
            to: step,
        })?;
        self.back_to(target)?;
        Ok(target)
    }

    /// Validate every step at once. On success the wizard sits on the review
    /// step; on failure it returns to the first step with errors.
    pub fn validate_all(&mut self) -> Result<(), WizardError> {
        self.editing_step()?;
        let mut first_failure = None;
        for step in WizardStep::ALL {
            if self.check_step(step).is_err() && first_failure.is_none() {
                first_failure = Some(step);
            }
        }
        match first_failure {
            Some(step) => {
                self.phase = Phase::Editing(step);
                Err(WizardError::Validation {
                    step,
                    errors: self.form.errors().clone(),
                })
            }
            None => {
                self.phase = Phase::Editing(WizardStep::Review);
                Ok(())
            }
        }
    }

    /// Submit from the review step: wait out the delay, then mark submitted.
    pub async fn submit(&mut self, delay: Duration) -> Result<Receipt, WizardError> {
        self.submit_until(delay, std::future::pending::<()>()).await
    }

    /// Like [`Wizard::submit`], but the wait ends early when `cancelled`
    /// resolves. A cancelled or dropped submission leaves the wizard editing
    /// the review step and never reaches the submitted phase.
    pub async fn submit_until<F>(&mut self, delay: Duration, cancelled: F) -> Result<Receipt, WizardError>
    where
        F: Future<Output = ()>,
    {
        let step = self.editing_step()?;
        if step != WizardStep::Review {
            return Err(WizardError::NotOnReviewStep(step));
        }
        self.check_step(WizardStep::Review)?;

        let kind = self.kind;
        self.phase = Phase::Submitting;
        info!("Submitting {} (simulated, {}ms)", kind, delay.as_millis());

        let mut guard = SubmittingGuard {
            phase: &mut self.phase,
            armed: true,
        };

        tokio::select! {
            _ = tokio::time::sleep(delay) => {
                let receipt = Receipt {
                    reference: Uuid::new_v4(),
                    kind,
                    submitted_at: Utc::now(),
                };
                guard.armed = false;
                *guard.phase = Phase::Submitted(receipt.clone());
                info!("Submitted {} as {}", kind, receipt.reference);
                Ok(receipt)
            }
            _ = cancelled => {
                warn!("Submission of {} cancelled", kind);
                Err(WizardError::Cancelled)
            }
        }
    }
}
