// src/catalog/search.rs
//! Text/location search, facet filtering, sorting and pagination over postings

use crate::types::job_posting::{ActiveFilter, FilterCategory, FilterSelection, JobPosting};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    SalaryHigh,
    SalaryLow,
    Title,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        Self::Newest,
        Self::Oldest,
        Self::SalaryHigh,
        Self::SalaryLow,
        Self::Title,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::SalaryHigh => "salary-high",
            Self::SalaryLow => "salary-low",
            Self::Title => "title",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| SearchError::UnknownSortKey(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    UnknownSortKey(String),
    UnknownFilterCategory(String),
}

impl SearchError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownSortKey(_) => "INVALID_SORT",
            Self::UnknownFilterCategory(_) => "INVALID_FILTER",
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSortKey(key) => write!(
                f,
                "Unknown sort key '{}'. Use newest, oldest, salary-high, salary-low or title",
                key
            ),
            Self::UnknownFilterCategory(category) => {
                write!(f, "Unknown filter category '{}'", category)
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// Parse a generic `<category>:<value>` facet filter, e.g. `industries:Automation`.
pub fn parse_filter(raw: &str) -> Result<(FilterCategory, &str), SearchError> {
    let unknown = || SearchError::UnknownFilterCategory(raw.to_string());
    let (category, value) = raw.split_once(':').ok_or_else(unknown)?;
    let category = category.parse::<FilterCategory>().map_err(|_| unknown())?;
    Ok((category, value.trim()))
}

/// Everything the listing page needs to reproduce a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub filters: FilterSelection,
    #[serde(default)]
    pub sort: SortKey,
    #[serde(default = "first_page")]
    pub page: usize,
}

fn first_page() -> usize {
    1
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            search: String::new(),
            location: String::new(),
            filters: FilterSelection::default(),
            sort: SortKey::default(),
            page: first_page(),
        }
    }
}

impl SearchRequest {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_filters(mut self, filters: FilterSelection) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Reset search text, location, facets, sort order and page.
    pub fn clear_filters(&mut self) {
        *self = Self::default();
    }

    /// True when the job passes the text, location and facet predicates.
    pub fn matches(&self, job: &JobPosting) -> bool {
        matches_text(job, &self.search)
            && matches_location(job, &self.location)
            && matches_facets(job, &self.filters)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults<'a> {
    pub jobs: Vec<&'a JobPosting>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub has_previous: bool,
    pub has_next: bool,
    pub sort: SortKey,
    pub active_filters: Vec<ActiveFilter>,
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Literal substring match; only the empty query matches everything.
fn matches_text(job: &JobPosting, query: &str) -> bool {
    let query = query.to_lowercase();
    if query.is_empty() {
        return true;
    }
    contains_ci(&job.title, &query)
        || contains_ci(&job.company, &query)
        || contains_ci(&job.description, &query)
        || job.tags.iter().any(|tag| contains_ci(tag, &query))
}

fn matches_location(job: &JobPosting, query: &str) -> bool {
    let query = query.to_lowercase();
    if query.is_empty() {
        return true;
    }
    [&job.location, &job.city, &job.state, &job.country]
        .into_iter()
        .any(|field| contains_ci(field, &query))
}

fn matches_facets(job: &JobPosting, filters: &FilterSelection) -> bool {
    filters
        .categories()
        .all(|(category, values)| values.contains(job.facet_value(category)))
}

pub fn filter<'a>(jobs: &'a [JobPosting], request: &SearchRequest) -> Vec<&'a JobPosting> {
    jobs.iter().filter(|job| request.matches(job)).collect()
}

/// Stable sort: postings that compare equal keep their prior order.
pub fn sort(jobs: &mut [&JobPosting], key: SortKey) {
    match key {
        SortKey::Newest => jobs.sort_by_key(|job| Reverse(job.posted_date)),
        SortKey::Oldest => jobs.sort_by_key(|job| job.posted_date),
        SortKey::SalaryHigh => jobs.sort_by_key(|job| Reverse(job.salary.max)),
        SortKey::SalaryLow => jobs.sort_by_key(|job| job.salary.min),
        SortKey::Title => jobs.sort_by(|a, b| a.title.cmp(&b.title)),
    }
}

pub fn total_pages(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE).max(1)
}

pub fn clamp_page(page: usize, total: usize) -> usize {
    page.clamp(1, total_pages(total))
}

/// The page window of an already filtered and sorted list.
pub fn paginate<'s, T>(items: &'s [T], page: usize) -> &'s [T] {
    let page = clamp_page(page, items.len());
    let start = ((page - 1) * PAGE_SIZE).min(items.len());
    let end = (start + PAGE_SIZE).min(items.len());
    &items[start..end]
}

pub fn search<'a>(jobs: &'a [JobPosting], request: &SearchRequest) -> SearchResults<'a> {
    let mut matched = filter(jobs, request);
    sort(&mut matched, request.sort);

    let total = matched.len();
    let page = clamp_page(request.page, total);
    let total_pages = total_pages(total);
    let visible = paginate(&matched, page).to_vec();

    SearchResults {
        jobs: visible,
        total,
        page,
        total_pages,
        page_size: PAGE_SIZE,
        has_previous: page > 1,
        has_next: page < total_pages,
        sort: request.sort,
        active_filters: request.filters.active_filters(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::dataset::jobs;
    use crate::types::job_posting::FilterCategory;
    use std::collections::BTreeSet;

    fn ids(results: &[&JobPosting]) -> Vec<u32> {
        results.iter().map(|job| job.id).collect()
    }

    #[test]
    fn test_text_search_matches_any_field() {
        let request = SearchRequest::default().with_search("cnc");
        let matched = filter(jobs(), &request);
        assert!(ids(&matched).contains(&1));
        assert!(!ids(&matched).contains(&2));

        for job in &matched {
            let hit = job.title.to_lowercase().contains("cnc")
                || job.company.to_lowercase().contains("cnc")
                || job.description.to_lowercase().contains("cnc")
                || job.tags.iter().any(|t| t.to_lowercase().contains("cnc"));
            assert!(hit, "job {} does not contain the query", job.id);
        }
    }

    #[test]
    fn test_text_search_hits_tags_and_company() {
        let by_tag = filter(jobs(), &SearchRequest::default().with_search("field service"));
        assert_eq!(ids(&by_tag), vec![12]);

        let by_company = filter(jobs(), &SearchRequest::default().with_search("roboline"));
        assert_eq!(ids(&by_company), vec![5, 10]);
    }

    #[test]
    fn test_query_whitespace_is_part_of_the_match() {
        let padded = filter(jobs(), &SearchRequest::default().with_search(" operator"));
        assert_eq!(ids(&padded), vec![1, 6, 7]);
        for job in &padded {
            let hit = job.title.to_lowercase().contains(" operator")
                || job.company.to_lowercase().contains(" operator")
                || job.description.to_lowercase().contains(" operator")
                || job.tags.iter().any(|t| t.to_lowercase().contains(" operator"));
            assert!(hit, "job {} does not contain the query", job.id);
        }

        let blank = filter(jobs(), &SearchRequest::default().with_search("  "));
        assert!(blank.is_empty());
        let blank_location = filter(jobs(), &SearchRequest::default().with_location("  "));
        assert!(blank_location.is_empty());
    }

    #[test]
    fn test_location_search_is_anded_with_text() {
        let request = SearchRequest::default()
            .with_search("robot")
            .with_location("columbus");
        assert_eq!(ids(&filter(jobs(), &request)), vec![12]);

        let by_state = filter(jobs(), &SearchRequest::default().with_location("mi"));
        assert_eq!(ids(&by_state), vec![5, 9, 10]);
        assert!(by_state.iter().all(|job| job.state == "MI"));
    }

    #[test]
    fn test_industry_facet_selects_automation_postings() {
        let filters = FilterSelection::new().with(FilterCategory::Industries, "Automation");
        let request = SearchRequest::default().with_filters(filters);
        let matched: BTreeSet<u32> = filter(jobs(), &request).iter().map(|j| j.id).collect();
        assert_eq!(matched, BTreeSet::from([5, 10, 12]));
    }

    #[test]
    fn test_facets_or_within_and_across_categories() {
        let filters = FilterSelection::new()
            .with(FilterCategory::JobTypes, "Contract")
            .with(FilterCategory::JobTypes, "Temporary")
            .with(FilterCategory::Cities, "Detroit");
        let request = SearchRequest::default().with_filters(filters.clone());
        let matched = filter(jobs(), &request);
        assert_eq!(ids(&matched), vec![9]);

        for job in matched {
            for (category, values) in filters.categories() {
                assert!(values.contains(job.facet_value(category)));
            }
        }
    }

    #[test]
    fn test_sort_salary_high_is_non_increasing() {
        let request = SearchRequest::default().with_sort(SortKey::SalaryHigh);
        let results = search(jobs(), &request);
        let maxima: Vec<u32> = results.jobs.iter().map(|j| j.salary.max).collect();
        assert!(maxima.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_sort_salary_low_is_non_decreasing() {
        let mut all: Vec<&JobPosting> = jobs().iter().collect();
        sort(&mut all, SortKey::SalaryLow);
        assert!(all.windows(2).all(|w| w[0].salary.min <= w[1].salary.min));
    }

    #[test]
    fn test_sort_title_is_non_decreasing() {
        let mut all: Vec<&JobPosting> = jobs().iter().collect();
        sort(&mut all, SortKey::Title);
        assert!(all.windows(2).all(|w| w[0].title <= w[1].title));
    }

    #[test]
    fn test_sort_by_date_both_directions() {
        let mut all: Vec<&JobPosting> = jobs().iter().collect();
        sort(&mut all, SortKey::Newest);
        assert_eq!(all.first().map(|j| j.id), Some(5));
        sort(&mut all, SortKey::Oldest);
        assert_eq!(all.first().map(|j| j.id), Some(11));
    }

    #[test]
    fn test_pages_concatenate_to_full_result() {
        let request = SearchRequest::default().with_sort(SortKey::Title);
        let mut expected = filter(jobs(), &request);
        sort(&mut expected, request.sort);

        let first = search(jobs(), &request.clone().with_page(1));
        let mut collected = first.jobs.clone();
        for page in 2..=first.total_pages {
            collected.extend(search(jobs(), &request.clone().with_page(page)).jobs);
        }
        assert_eq!(ids(&collected), ids(&expected));
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.jobs.len(), PAGE_SIZE);
    }

    #[test]
    fn test_page_is_clamped() {
        let high = search(jobs(), &SearchRequest::default().with_page(40));
        assert_eq!(high.page, 2);
        assert!(!high.has_next);
        assert!(high.has_previous);

        let zero = search(jobs(), &SearchRequest::default().with_page(0));
        assert_eq!(zero.page, 1);

        let empty = search(jobs(), &SearchRequest::default().with_search("astronaut"));
        assert_eq!(empty.total, 0);
        assert_eq!(empty.page, 1);
        assert_eq!(empty.total_pages, 1);
        assert!(empty.jobs.is_empty());
    }

    #[test]
    fn test_clear_filters_restores_full_newest_listing() {
        let mut request = SearchRequest::default()
            .with_search("cnc")
            .with_location("ohio")
            .with_sort(SortKey::Title)
            .with_page(2)
            .with_filters(FilterSelection::new().with(FilterCategory::Cities, "Akron"));
        request.clear_filters();
        assert_eq!(request, SearchRequest::default());

        let mut matched = filter(jobs(), &request);
        sort(&mut matched, request.sort);
        assert_eq!(matched.len(), jobs().len());
        assert!(matched
            .windows(2)
            .all(|w| w[0].posted_date >= w[1].posted_date));
    }

    #[test]
    fn test_active_filters_reported() {
        let filters = FilterSelection::new().with(FilterCategory::Experience, "Entry Level");
        let results = search(jobs(), &SearchRequest::default().with_filters(filters));
        assert_eq!(results.active_filters.len(), 1);
        assert_eq!(results.active_filters[0].value, "Entry Level");
    }

    #[test]
    fn test_generic_filter_parsing() {
        assert_eq!(
            parse_filter("industries:Automation"),
            Ok((FilterCategory::Industries, "Automation"))
        );
        assert_eq!(
            parse_filter("jobTypes: Full-time"),
            Ok((FilterCategory::JobTypes, "Full-time"))
        );
        for bad in ["salary:high", "Automation"] {
            let err = parse_filter(bad).unwrap_err();
            assert_eq!(err.code(), "INVALID_FILTER");
        }
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("salary-high".parse::<SortKey>(), Ok(SortKey::SalaryHigh));
        assert_eq!(" title ".parse::<SortKey>(), Ok(SortKey::Title));
        let err = "cheapest".parse::<SortKey>().unwrap_err();
        assert_eq!(err.code(), "INVALID_SORT");
    }
}
