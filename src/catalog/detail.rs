// src/catalog/detail.rs
//! Single-posting lookup, detail tabs and similar-job recommendations

use crate::catalog::dataset;
use crate::types::job_posting::JobPosting;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MAX_SIMILAR_JOBS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailTab {
    Description,
    Requirements,
    Benefits,
}

impl FromStr for DetailTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "description" => Ok(Self::Description),
            "requirements" => Ok(Self::Requirements),
            "benefits" => Ok(Self::Benefits),
            other => Err(format!("Unknown tab: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "tab", content = "content", rename_all = "lowercase")]
pub enum TabContent<'a> {
    Description(&'a str),
    Requirements(&'a [String]),
    Benefits(&'a [String]),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail<'a> {
    pub job: &'a JobPosting,
    pub similar_jobs: Vec<&'a JobPosting>,
}

impl<'a> JobDetail<'a> {
    pub fn tab(&self, tab: DetailTab) -> TabContent<'a> {
        match tab {
            DetailTab::Description => TabContent::Description(&self.job.full_description),
            DetailTab::Requirements => TabContent::Requirements(&self.job.requirements),
            DetailTab::Benefits => TabContent::Benefits(&self.job.benefits),
        }
    }
}

/// Parse a route segment as a job id. Anything that is not a decimal
/// integer is treated the same as an unknown id.
pub fn parse_job_id(segment: &str) -> Option<u32> {
    let segment = segment.trim();
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Other postings sharing the category or industry, in dataset order.
pub fn similar_jobs<'a>(job: &JobPosting, all: &'a [JobPosting]) -> Vec<&'a JobPosting> {
    all.iter()
        .filter(|other| other.id != job.id)
        .filter(|other| other.category == job.category || other.industry == job.industry)
        .take(MAX_SIMILAR_JOBS)
        .collect()
}

pub fn lookup_in(id: u32, all: &[JobPosting]) -> Option<JobDetail<'_>> {
    let job = all.iter().find(|job| job.id == id)?;
    Some(JobDetail {
        job,
        similar_jobs: similar_jobs(job, all),
    })
}

pub fn lookup(id: u32) -> Option<JobDetail<'static>> {
    lookup_in(id, dataset::jobs())
}
