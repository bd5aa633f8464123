// src/web/types.rs - Request forms and the standard response envelope

use crate::applications::{fields, ApplicationFormState, FieldErrors, UploadedFile, MAX_FILE_SIZE};
use crate::catalog::{parse_filter, DetailTab, JobDetail, SearchError, SearchRequest, SortKey, TabContent};
use crate::types::job_posting::{FilterCategory, FilterSelection};
use crate::utils::normalize_whitespace;
use rocket::form::{self, error::ErrorKind, FromForm};
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};

// ===== Requests =====

/// Listing query string: `search`, `location`, `sort`, `page` and one
/// repeated key per facet category.
#[derive(Debug, Default, FromForm)]
pub struct JobsQuery {
    pub search: Option<String>,
    pub location: Option<String>,
    pub sort: Option<String>,
    pub page: Option<usize>,
    #[field(name = "jobTypes")]
    pub job_types: Option<Vec<String>>,
    pub industries: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
    pub locations: Option<Vec<String>>,
    pub cities: Option<Vec<String>>,
    pub experience: Option<Vec<String>>,
    /// Generic `<category>:<value>` facets, repeatable.
    pub filter: Option<Vec<String>>,
}

impl JobsQuery {
    pub fn into_search_request(self) -> Result<SearchRequest, SearchError> {
        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => SortKey::default(),
            Some(raw) => raw.parse()?,
        };

        let mut filters = FilterSelection::new();
        for (category, values) in [
            (FilterCategory::JobTypes, self.job_types),
            (FilterCategory::Industries, self.industries),
            (FilterCategory::Categories, self.categories),
            (FilterCategory::Locations, self.locations),
            (FilterCategory::Cities, self.cities),
            (FilterCategory::Experience, self.experience),
        ] {
            for value in values.unwrap_or_default() {
                let value = normalize_whitespace(&value);
                if !value.is_empty() {
                    filters.insert(category, value);
                }
            }
        }

        for raw in self.filter.unwrap_or_default() {
            let (category, value) = parse_filter(&raw)?;
            if !value.is_empty() {
                filters.insert(category, value);
            }
        }

        Ok(SearchRequest::default()
            .with_search(self.search.unwrap_or_default())
            .with_location(self.location.unwrap_or_default())
            .with_filters(filters)
            .with_sort(sort)
            .with_page(self.page.unwrap_or(1)))
    }
}

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ValidateStepRequest {
    /// Present for the job-specific wizard, absent for the general one.
    #[serde(default)]
    pub job_id: Option<u32>,
    pub step: u8,
    #[serde(flatten)]
    pub form: ApplicationFormState,
}

/// Multipart body of both application forms.
#[derive(FromForm)]
pub struct ApplicationUpload<'f> {
    #[field(name = "firstName")]
    pub first_name: Option<String>,
    #[field(name = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[field(name = "coverLetter")]
    pub cover_letter: Option<String>,
    pub linkedin: Option<String>,
    #[field(name = "desiredRole")]
    pub desired_role: Option<String>,
    #[field(name = "preferredIndustry")]
    pub preferred_industry: Option<String>,
    pub availability: Option<String>,
    pub message: Option<String>,
    pub consent: bool,
    /// Kept as a result so an upload cut off at the size limit is still
    /// reported against the résumé field.
    pub resume: form::Result<'f, TempFile<'f>>,
}

impl ApplicationUpload<'_> {
    /// Copy the submitted values into form state. Only the résumé's
    /// metadata is kept.
    pub fn to_form_state(&self) -> ApplicationFormState {
        let mut form = ApplicationFormState::new();
        for (field, value) in [
            (fields::FIRST_NAME, &self.first_name),
            (fields::LAST_NAME, &self.last_name),
            (fields::EMAIL, &self.email),
            (fields::PHONE, &self.phone),
            (fields::COVER_LETTER, &self.cover_letter),
            (fields::LINKEDIN, &self.linkedin),
            (fields::DESIRED_ROLE, &self.desired_role),
            (fields::PREFERRED_INDUSTRY, &self.preferred_industry),
            (fields::AVAILABILITY, &self.availability),
            (fields::MESSAGE, &self.message),
        ] {
            if let Some(value) = value {
                form.set_text(field, value.as_str());
            }
        }
        form.set_flag(fields::CONSENT, self.consent);

        match &self.resume {
            Ok(resume) if resume.len() > 0 => form.attach_file(UploadedFile {
                file_name: resume
                    .raw_name()
                    .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str().to_string())
                    .unwrap_or_default(),
                content_type: resume
                    .content_type()
                    .map(|ct| ct.to_string())
                    .unwrap_or_default(),
                size: resume.len(),
            }),
            Ok(_) => {}
            Err(errors) => {
                if let Some(limit) = oversized_upload(errors) {
                    form.attach_file(UploadedFile {
                        file_name: String::new(),
                        content_type: String::new(),
                        size: limit.saturating_add(1),
                    });
                }
            }
        }
        form
    }
}

/// The byte limit an upload ran into, if the errors say it was too long.
fn oversized_upload(errors: &form::Errors<'_>) -> Option<u64> {
    errors.iter().find_map(|error| match error.kind {
        ErrorKind::InvalidLength { max, .. } => Some(max.unwrap_or(MAX_FILE_SIZE)),
        _ => None,
    })
}

// ===== Responses =====

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Error,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<FieldErrors>,
}

/// Error half of every fallible handler.
pub type ApiError = (Status, Json<StandardErrorResponse>);

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            suggestions,
            field_errors: None,
        }
    }

    pub fn with_field_errors(mut self, field_errors: FieldErrors) -> Self {
        self.field_errors = Some(field_errors);
        self
    }

    pub fn with_status(self, status: Status) -> ApiError {
        (status, Json(self))
    }
}

/// A posting with its similar jobs and the content of the selected tab.
#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct JobDetailView<'a> {
    #[serde(flatten)]
    pub detail: JobDetail<'a>,
    #[serde(flatten)]
    pub section: TabContent<'a>,
}

impl<'a> JobDetailView<'a> {
    pub fn new(detail: JobDetail<'a>, tab: DetailTab) -> Self {
        let section = detail.tab(tab);
        Self { detail, section }
    }
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct StepValidation {
    pub step: u8,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<u8>,
    pub errors: FieldErrors,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct RouteEntry {
    pub title: String,
    pub path: String,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SiteMap {
    pub navigation: Vec<RouteEntry>,
    pub footer: Vec<RouteEntry>,
}
