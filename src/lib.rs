//! Job board backend for a recruitment agency: a bundled job catalog with
//! search and filtering, candidate application wizards, cookie-consent
//! handling and the HTTP API serving them.

pub mod applications;
pub mod catalog;
pub mod catalog_cli;
pub mod consent;
pub mod core;
pub mod share;
pub mod site;
pub mod types;
pub mod utils;
pub mod web;

pub use catalog::{search, SearchRequest, SearchResults, SortKey};
pub use types::job_posting::{FilterCategory, FilterSelection, JobPosting};
pub use web::{build_rocket, start_web_server};
