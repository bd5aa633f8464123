// src/web/handlers/job_handlers.rs

use crate::catalog::{self, parse_job_id, DetailTab, FacetCounts, SearchError, SearchResults};
use crate::core::ServerSettings;
use crate::share::{job_share_links, ShareLinks};
use crate::web::types::*;

use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

fn job_not_found(raw_id: &str) -> ApiError {
    StandardErrorResponse::new(
        format!("Job '{}' was not found", raw_id),
        "JOB_NOT_FOUND".to_string(),
        vec![
            "The position may have been filled or removed".to_string(),
            "Browse all open positions at /jobs".to_string(),
        ],
    )
    .with_status(Status::NotFound)
}

pub async fn list_jobs_handler(
    query: JobsQuery,
) -> Result<Json<DataResponse<SearchResults<'static>>>, ApiError> {
    let request = match query.into_search_request() {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected job search: {}", e);
            let suggestion = match e {
                SearchError::UnknownSortKey(_) => {
                    "Use one of: newest, oldest, salary-high, salary-low, title"
                }
                SearchError::UnknownFilterCategory(_) => {
                    "Use <category>:<value> with jobTypes, industries, categories, locations, cities or experience"
                }
            };
            return Err(StandardErrorResponse::new(
                e.to_string(),
                e.code().to_string(),
                vec![suggestion.to_string()],
            )
            .with_status(Status::BadRequest));
        }
    };

    let results = catalog::search(catalog::jobs(), &request);
    info!(
        "Job search search={:?} location={:?} filters={} sort={} -> {} result(s), page {}/{}",
        request.search,
        request.location,
        results.active_filters.len(),
        request.sort,
        results.total,
        results.page,
        results.total_pages
    );

    let message = if results.total == 0 {
        "No jobs match your search. Try clearing some filters".to_string()
    } else {
        format!("Found {} job(s)", results.total)
    };
    Ok(Json(DataResponse::success(message, results)))
}

pub async fn facets_handler() -> Json<DataResponse<&'static FacetCounts>> {
    Json(DataResponse::success(
        "Filter facets".to_string(),
        catalog::facet_counts(),
    ))
}

pub async fn job_detail_handler(
    id: &str,
    tab: Option<&str>,
    settings: &State<ServerSettings>,
) -> Result<Json<DataResponse<JobDetailView<'static>>>, ApiError> {
    let tab = match tab.map(str::parse::<DetailTab>) {
        None => DetailTab::Description,
        Some(Ok(tab)) => tab,
        Some(Err(e)) => {
            return Err(StandardErrorResponse::new(
                e,
                "INVALID_TAB".to_string(),
                vec!["Use one of: description, requirements, benefits".to_string()],
            )
            .with_status(Status::BadRequest));
        }
    };

    // Stand-in for fetching the posting from a backend.
    if !settings.detail_delay.is_zero() {
        tokio::time::sleep(settings.detail_delay).await;
    }

    match parse_job_id(id).and_then(catalog::lookup) {
        Some(detail) => {
            info!(
                "Job detail {} with {} similar job(s)",
                detail.job.id,
                detail.similar_jobs.len()
            );
            Ok(Json(DataResponse::success(
                detail.job.title.clone(),
                JobDetailView::new(detail, tab),
            )))
        }
        None => {
            info!("Job detail not found: {}", id);
            Err(job_not_found(id))
        }
    }
}

pub async fn share_links_handler(
    id: &str,
    settings: &State<ServerSettings>,
) -> Result<Json<DataResponse<ShareLinks>>, ApiError> {
    let job = parse_job_id(id)
        .and_then(catalog::find)
        .ok_or_else(|| job_not_found(id))?;

    Ok(Json(DataResponse::success(
        format!("Share links for {}", job.title),
        job_share_links(&settings.base_url, job),
    )))
}
