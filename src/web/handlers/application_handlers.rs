// src/web/handlers/application_handlers.rs

use crate::applications::{validate_step, ApplicationFormState, Receipt, Wizard, WizardError, WizardKind, WizardStep};
use crate::catalog;
use crate::core::ServerSettings;
use crate::web::types::*;

use rocket::form::Form;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{Shutdown, State};
use tracing::{error, info, warn};

fn unknown_job(job_id: u32) -> ApiError {
    StandardErrorResponse::new(
        format!("Job {} is not open for applications", job_id),
        "JOB_NOT_FOUND".to_string(),
        vec!["Submit a general application instead".to_string()],
    )
    .with_status(Status::NotFound)
}

fn wizard_error(e: WizardError) -> ApiError {
    let code = e.code().to_string();
    match e {
        WizardError::Validation { step, errors } => StandardErrorResponse::new(
            format!("Please fix the highlighted fields on step {}", step.number()),
            code,
            vec![
                "Required fields cannot be empty".to_string(),
                "Upload a PDF, DOC or DOCX resume of at most 5MB".to_string(),
            ],
        )
        .with_field_errors(errors)
        .with_status(Status::UnprocessableEntity),
        WizardError::Cancelled => StandardErrorResponse::new(
            WizardError::Cancelled.to_string(),
            code,
            vec!["Try submitting again in a few moments".to_string()],
        )
        .with_status(Status::ServiceUnavailable),
        other => {
            StandardErrorResponse::new(other.to_string(), code, vec![]).with_status(Status::Conflict)
        }
    }
}

pub async fn validate_step_handler(
    request: Json<ValidateStepRequest>,
) -> Result<Json<DataResponse<StepValidation>>, ApiError> {
    let request = request.into_inner();
    let kind = match request.job_id {
        Some(job_id) if catalog::find(job_id).is_none() => return Err(unknown_job(job_id)),
        Some(job_id) => WizardKind::JobApplication { job_id },
        None => WizardKind::General,
    };

    let Some(step) = WizardStep::from_number(request.step) else {
        return Err(StandardErrorResponse::new(
            format!("Step {} does not exist", request.step),
            "INVALID_STEP".to_string(),
            vec!["Steps are numbered 1 to 3".to_string()],
        )
        .with_status(Status::BadRequest));
    };

    let errors = validate_step(kind, step, &request.form);
    let valid = errors.is_empty();
    info!(
        "Validated step {} of {}: {} error(s)",
        step.number(),
        kind,
        errors.len()
    );

    Ok(Json(DataResponse::success(
        if valid {
            format!("{} is complete", step.title(kind))
        } else {
            format!("{} has errors", step.title(kind))
        },
        StepValidation {
            step: step.number(),
            valid,
            next_step: valid.then(|| step.next()).flatten().map(|s| s.number()),
            errors,
        },
    )))
}

async fn submit_application(
    kind: WizardKind,
    form: ApplicationFormState,
    settings: &ServerSettings,
    shutdown: Shutdown,
) -> Result<Json<DataResponse<Receipt>>, ApiError> {
    let mut wizard = Wizard::with_form(kind, form);

    if let Err(e) = wizard.validate_all() {
        warn!("Rejected {}: {}", kind, e);
        return Err(wizard_error(e));
    }

    match wizard.submit_until(settings.submit_delay, shutdown).await {
        Ok(receipt) => Ok(Json(DataResponse::success(
            "Thank you! Your application has been received".to_string(),
            receipt,
        ))),
        Err(e) => {
            error!("Submission of {} failed: {}", kind, e);
            Err(wizard_error(e))
        }
    }
}

pub async fn job_application_handler(
    job_id: u32,
    upload: Form<ApplicationUpload<'_>>,
    settings: &State<ServerSettings>,
    shutdown: Shutdown,
) -> Result<Json<DataResponse<Receipt>>, ApiError> {
    let job = catalog::find(job_id).ok_or_else(|| unknown_job(job_id))?;
    info!("Application received for job {} ({})", job.id, job.title);
    submit_application(
        WizardKind::JobApplication { job_id },
        upload.to_form_state(),
        settings,
        shutdown,
    )
    .await
}

pub async fn general_application_handler(
    upload: Form<ApplicationUpload<'_>>,
    settings: &State<ServerSettings>,
    shutdown: Shutdown,
) -> Result<Json<DataResponse<Receipt>>, ApiError> {
    info!("General application received");
    submit_application(WizardKind::General, upload.to_form_state(), settings, shutdown).await
}
