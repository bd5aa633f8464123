// src/site.rs
//! Navigation routes of the public site and their bookmarkable query strings

use crate::catalog::detail::parse_job_id;
use serde::Serialize;
use std::fmt;
use url::form_urlencoded;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", rename_all = "camelCase")]
pub enum SiteRoute {
    Home,
    About,
    Jobs { search: String, location: String },
    JobDetail { id: u32 },
    GeneralApplication,
    Contact,
    Privacy,
    Terms,
    /// Any path the site does not serve, including unparsable job ids.
    NotFound { path: String },
}

impl SiteRoute {
    pub fn jobs() -> Self {
        Self::Jobs {
            search: String::new(),
            location: String::new(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::About => "About Us",
            Self::Jobs { .. } => "Find Jobs",
            Self::JobDetail { .. } => "Job Details",
            Self::GeneralApplication => "Submit Your Resume",
            Self::Contact => "Contact",
            Self::Privacy => "Privacy Policy",
            Self::Terms => "Terms of Service",
            Self::NotFound { .. } => "Page Not Found",
        }
    }

    /// Render as a path with query string. Empty search fields are omitted.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::About => "/about".to_string(),
            Self::Jobs { search, location } => {
                let mut query = form_urlencoded::Serializer::new(String::new());
                if !search.is_empty() {
                    query.append_pair("search", search);
                }
                if !location.is_empty() {
                    query.append_pair("location", location);
                }
                let query = query.finish();
                if query.is_empty() {
                    "/jobs".to_string()
                } else {
                    format!("/jobs?{}", query)
                }
            }
            Self::JobDetail { id } => format!("/jobs/{}", id),
            Self::GeneralApplication => "/apply".to_string(),
            Self::Contact => "/contact".to_string(),
            Self::Privacy => "/privacy".to_string(),
            Self::Terms => "/terms".to_string(),
            Self::NotFound { path } => path.clone(),
        }
    }

    /// Map a path (optionally with query string) to a page.
    pub fn parse(path_and_query: &str) -> Self {
        let not_found = || Self::NotFound {
            path: path_and_query.to_string(),
        };
        let Ok(base) = Url::parse("http://site.invalid/") else {
            return not_found();
        };
        let Ok(url) = base.join(path_and_query) else {
            return not_found();
        };

        let segments: Vec<&str> = url
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["about"] => Self::About,
            ["jobs"] => {
                let mut search = String::new();
                let mut location = String::new();
                for (key, value) in url.query_pairs() {
                    match key.as_ref() {
                        "search" => search = value.into_owned(),
                        "location" => location = value.into_owned(),
                        _ => {}
                    }
                }
                Self::Jobs { search, location }
            }
            ["jobs", id] => match parse_job_id(id) {
                Some(id) => Self::JobDetail { id },
                None => not_found(),
            },
            ["apply"] => Self::GeneralApplication,
            ["contact"] => Self::Contact,
            ["privacy"] => Self::Privacy,
            ["terms"] => Self::Terms,
            _ => not_found(),
        }
    }

    /// Entries shown in the header navigation.
    pub fn navigation() -> Vec<SiteRoute> {
        vec![
            Self::Home,
            Self::jobs(),
            Self::About,
            Self::GeneralApplication,
            Self::Contact,
        ]
    }

    /// Entries shown in the footer.
    pub fn footer() -> Vec<SiteRoute> {
        vec![Self::Privacy, Self::Terms]
    }
}

impl fmt::Display for SiteRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
