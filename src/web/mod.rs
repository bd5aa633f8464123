// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use crate::applications::{fields, FieldError, FieldErrorKind, FieldErrors, Receipt};
use crate::catalog::{FacetCounts, SearchResults};
use crate::consent::{Consent, ConsentChoice, ConsentPolicy, ConsentStatus};
use crate::core::ServerSettings;
use crate::share::{ContactLinks, ShareLinks};
use crate::site::SiteRoute;
use anyhow::Result;
use chrono::Months;
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::{CookieJar, Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, Shutdown, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

// Catalog

#[get("/jobs?<query..>")]
pub async fn list_jobs(
    query: JobsQuery,
) -> Result<Json<DataResponse<SearchResults<'static>>>, ApiError> {
    handlers::list_jobs_handler(query).await
}

#[get("/jobs/facets")]
pub async fn job_facets() -> Json<DataResponse<&'static FacetCounts>> {
    handlers::facets_handler().await
}

#[get("/jobs/<id>?<tab>")]
pub async fn job_detail(
    id: &str,
    tab: Option<&str>,
    settings: &State<ServerSettings>,
) -> Result<Json<DataResponse<JobDetailView<'static>>>, ApiError> {
    handlers::job_detail_handler(id, tab, settings).await
}

#[get("/jobs/<id>/share")]
pub async fn job_share_links(
    id: &str,
    settings: &State<ServerSettings>,
) -> Result<Json<DataResponse<ShareLinks>>, ApiError> {
    handlers::share_links_handler(id, settings).await
}

// Applications

#[post("/applications/validate", data = "<request>")]
pub async fn validate_application_step(
    request: Json<ValidateStepRequest>,
) -> Result<Json<DataResponse<types::StepValidation>>, ApiError> {
    handlers::validate_step_handler(request).await
}

#[post("/applications/jobs/<job_id>", data = "<upload>")]
pub async fn apply_for_job(
    job_id: u32,
    upload: Form<ApplicationUpload<'_>>,
    settings: &State<ServerSettings>,
    shutdown: Shutdown,
) -> Result<Json<DataResponse<Receipt>>, ApiError> {
    handlers::job_application_handler(job_id, upload, settings, shutdown).await
}

#[post("/applications/general", data = "<upload>")]
pub async fn apply_general(
    upload: Form<ApplicationUpload<'_>>,
    settings: &State<ServerSettings>,
    shutdown: Shutdown,
) -> Result<Json<DataResponse<Receipt>>, ApiError> {
    handlers::general_application_handler(upload, settings, shutdown).await
}

// Cookie consent

#[get("/consent")]
pub async fn consent_status(
    cookies: &CookieJar<'_>,
    policy: &State<ConsentPolicy>,
) -> Json<DataResponse<ConsentStatus>> {
    handlers::consent_status_handler(cookies, policy).await
}

#[post("/consent", data = "<choice>")]
pub async fn save_consent(
    choice: Json<ConsentChoice>,
    cookies: &CookieJar<'_>,
    policy: &State<ConsentPolicy>,
) -> Json<DataResponse<Consent>> {
    handlers::save_consent_handler(choice, cookies, policy).await
}

// Site

#[get("/routes")]
pub async fn site_map() -> Json<DataResponse<SiteMap>> {
    handlers::site_map_handler().await
}

#[get("/routes/resolve?<path>")]
pub async fn resolve_route(path: String) -> Json<DataResponse<SiteRoute>> {
    handlers::resolve_route_handler(path).await
}

#[get("/contact")]
pub async fn contact(settings: &State<ServerSettings>) -> Json<DataResponse<ContactLinks>> {
    handlers::contact_handler(settings).await
}

#[get("/health")]
pub async fn health() -> Json<TextResponse> {
    handlers::health_handler().await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec![
            "Check your request JSON format".to_string(),
            "Verify all required fields are present".to_string(),
        ],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Resource not found".to_string(),
        "NOT_FOUND".to_string(),
        vec!["Check the URL and try again".to_string()],
    ))
}

#[rocket::catch(413)]
pub fn payload_too_large(request: &Request<'_>) -> Json<StandardErrorResponse> {
    Json(payload_too_large_response(request.uri().path().as_str()))
}

/// Application uploads carry the same résumé error the form check reports.
pub fn payload_too_large_response(path: &str) -> StandardErrorResponse {
    let response = StandardErrorResponse::new(
        "Upload is too large".to_string(),
        "PAYLOAD_TOO_LARGE".to_string(),
        vec!["Resumes must be at most 5MB".to_string()],
    );
    let is_upload =
        path.starts_with("/api/applications/jobs/") || path == "/api/applications/general";
    if !is_upload {
        return response;
    }
    let error = FieldError::new(
        FieldErrorKind::FileTooLarge,
        "File too large (max 5MB)",
    );
    response.with_field_errors(FieldErrors::from([(fields::RESUME.to_string(), error)]))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be processed".to_string(),
        "UNPROCESSABLE".to_string(),
        vec!["Verify field names and value types".to_string()],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec![
            "Try again in a few moments".to_string(),
            "Contact support if the problem persists".to_string(),
        ],
    ))
}

/// Assemble the API without launching it.
pub fn build_rocket(settings: ServerSettings) -> Rocket<Build> {
    // Room for a 5MB résumé plus the other form fields; the 5MB rule
    // itself is enforced by form validation.
    let limits = Limits::default()
        .limit("file", 8.mebibytes())
        .limit("data-form", 10.mebibytes());

    let figment = rocket::Config::figment()
        .merge(("port", settings.port))
        .merge(("limits", limits));

    let policy = ConsentPolicy {
        reprompt_after: Months::new(settings.consent_reprompt_months),
    };

    rocket::custom(figment)
        .attach(Cors)
        .manage(settings)
        .manage(policy)
        .register(
            "/api",
            catchers![
                bad_request,
                not_found,
                payload_too_large,
                unprocessable,
                internal_error
            ],
        )
        .mount(
            "/api",
            routes![
                list_jobs,
                job_facets,
                job_detail,
                job_share_links,
                validate_application_step,
                apply_for_job,
                apply_general,
                consent_status,
                save_consent,
                site_map,
                resolve_route,
                contact,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(settings: ServerSettings) -> Result<()> {
    info!("Starting job board API server");
    info!("Public site: {}", settings.base_url);
    info!(
        "Simulated delays: submit {}ms, detail {}ms",
        settings.submit_delay.as_millis(),
        settings.detail_delay.as_millis()
    );

    build_rocket(settings)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;

    Ok(())
}
