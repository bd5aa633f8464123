// src/catalog/dataset.rs
//! The bundled job postings and their facet counts, built once at first use

use crate::types::job_posting::{FilterCategory, JobPosting};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

const JOBS_JSON: &str = include_str!("../../data/jobs.json");

static JOBS: LazyLock<Vec<JobPosting>> = LazyLock::new(|| {
    let jobs: Vec<JobPosting> =
        serde_json::from_str(JOBS_JSON).expect("bundled data/jobs.json is valid");
    debug!("Loaded {} job postings", jobs.len());
    jobs
});

static FACET_COUNTS: LazyLock<FacetCounts> = LazyLock::new(|| FacetCounts::from_jobs(jobs()));

/// All job postings, in dataset order.
pub fn jobs() -> &'static [JobPosting] {
    &JOBS
}

pub fn facet_counts() -> &'static FacetCounts {
    &FACET_COUNTS
}

/// Linear scan by id.
pub fn find(id: u32) -> Option<&'static JobPosting> {
    jobs().iter().find(|job| job.id == id)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Distinct values per facet category with the number of postings carrying each.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FacetCounts {
    #[serde(flatten)]
    counts: BTreeMap<FilterCategory, Vec<FacetCount>>,
}

impl FacetCounts {
    pub fn from_jobs(jobs: &[JobPosting]) -> Self {
        let mut counts = BTreeMap::new();
        for category in FilterCategory::ALL {
            let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
            for job in jobs {
                *tally.entry(job.facet_value(category)).or_default() += 1;
            }
            let values = tally
                .into_iter()
                .map(|(value, count)| FacetCount {
                    value: value.to_string(),
                    count,
                })
                .collect();
            counts.insert(category, values);
        }
        Self { counts }
    }

    pub fn get(&self, category: FilterCategory) -> &[FacetCount] {
        self.counts.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn count(counts: &FacetCounts, category: FilterCategory, value: &str) -> usize {
        counts
            .get(category)
            .iter()
            .find(|facet| facet.value == value)
            .map_or(0, |facet| facet.count)
    }

    #[test]
    fn test_fixture_loads_with_unique_ids() {
        let ids: HashSet<u32> = jobs().iter().map(|job| job.id).collect();
        assert_eq!(jobs().len(), 12);
        assert_eq!(ids.len(), jobs().len());
    }

    #[test]
    fn test_fixture_salary_ranges_are_ordered() {
        for job in jobs() {
            assert!(job.salary.min <= job.salary.max, "job {}", job.id);
            assert!(job.posted_date <= job.closing_date, "job {}", job.id);
        }
    }

    #[test]
    fn test_find_by_id() {
        assert_eq!(find(1).map(|j| j.title.as_str()), Some("CNC Machine Operator"));
        assert_eq!(find(2).map(|j| j.title.as_str()), Some("Industrial Electrician"));
        assert!(find(0).is_none());
        assert!(find(999).is_none());
    }

    #[test]
    fn test_facet_counts_cover_every_posting() {
        let counts = facet_counts();
        for category in FilterCategory::ALL {
            let total: usize = counts.get(category).iter().map(|f| f.count).sum();
            assert_eq!(total, jobs().len(), "category {}", category);
        }
        assert_eq!(count(counts, FilterCategory::Industries, "Automation"), 3);
        assert_eq!(count(counts, FilterCategory::Industries, "Mining"), 0);
    }
}
