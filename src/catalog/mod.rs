// src/catalog/mod.rs
//! Read-only job catalog: bundled postings, search and detail lookup

pub mod dataset;
pub mod detail;
pub mod search;

pub use dataset::{facet_counts, find, jobs, FacetCount, FacetCounts};
pub use detail::{lookup, parse_job_id, similar_jobs, DetailTab, JobDetail, TabContent};
pub use search::{parse_filter, search, SearchError, SearchRequest, SearchResults, SortKey, PAGE_SIZE};
