// src/types/job_posting.rs
//! Job posting records and the facet vocabulary used to filter them

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

// ===== Job Posting =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: u32,
    pub title: String,
    pub company: String,
    pub location: String,
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub category: String,
    pub industry: String,
    pub experience: ExperienceLevel,
    pub description: String,
    /// HTML fragment rendered on the detail page.
    pub full_description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub tags: Vec<String>,
    pub salary: SalaryRange,
    pub posted_date: NaiveDate,
    pub closing_date: NaiveDate,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub urgent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: u32,
    pub max: u32,
    pub currency: String,
}

impl JobPosting {
    /// The posting's value for a facet category.
    pub fn facet_value(&self, category: FilterCategory) -> &str {
        match category {
            FilterCategory::JobTypes => self.job_type.as_str(),
            FilterCategory::Industries => &self.industry,
            FilterCategory::Categories => &self.category,
            FilterCategory::Locations => &self.location,
            FilterCategory::Cities => &self.city,
            FilterCategory::Experience => self.experience.as_str(),
        }
    }
}

impl fmt::Display for JobPosting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.company)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Temporary,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullTime => "Full-time",
            Self::PartTime => "Part-time",
            Self::Contract => "Contract",
            Self::Temporary => "Temporary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[serde(rename = "Entry Level")]
    Entry,
    #[serde(rename = "Mid Level")]
    Mid,
    #[serde(rename = "Senior Level")]
    Senior,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entry => "Entry Level",
            Self::Mid => "Mid Level",
            Self::Senior => "Senior Level",
        }
    }
}

// ===== Facets =====

/// A named filter category. Declaration order is the display order of
/// active-filter chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterCategory {
    JobTypes,
    Industries,
    Categories,
    Locations,
    Cities,
    Experience,
}

impl FilterCategory {
    pub const ALL: [FilterCategory; 6] = [
        Self::JobTypes,
        Self::Industries,
        Self::Categories,
        Self::Locations,
        Self::Cities,
        Self::Experience,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JobTypes => "jobTypes",
            Self::Industries => "industries",
            Self::Categories => "categories",
            Self::Locations => "locations",
            Self::Cities => "cities",
            Self::Experience => "experience",
        }
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown filter category: {}", s))
    }
}

/// Removable chip shown for each selected facet value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveFilter {
    pub category: FilterCategory,
    pub value: String,
}

/// Selected facet values per category. Only membership matters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(flatten)]
    selected: BTreeMap<FilterCategory, BTreeSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: FilterCategory, value: impl Into<String>) -> Self {
        self.insert(category, value);
        self
    }

    pub fn insert(&mut self, category: FilterCategory, value: impl Into<String>) {
        self.selected.entry(category).or_default().insert(value.into());
    }

    /// Returns true when the value was present and has been removed.
    pub fn remove(&mut self, category: FilterCategory, value: &str) -> bool {
        let Some(values) = self.selected.get_mut(&category) else {
            return false;
        };
        let removed = values.remove(value);
        if values.is_empty() {
            self.selected.remove(&category);
        }
        removed
    }

    /// Checkbox semantics: select when absent, deselect when present.
    pub fn toggle(&mut self, category: FilterCategory, value: &str) {
        if !self.remove(category, value) {
            self.insert(category, value);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.values().all(|v| v.is_empty())
    }

    pub fn contains(&self, category: FilterCategory, value: &str) -> bool {
        self.selected
            .get(&category)
            .is_some_and(|values| values.contains(value))
    }

    /// Non-empty categories with their selected values.
    pub fn categories(&self) -> impl Iterator<Item = (FilterCategory, &BTreeSet<String>)> {
        self.selected
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(category, values)| (*category, values))
    }

    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        self.categories()
            .flat_map(|(category, values)| {
                values.iter().map(move |value| ActiveFilter {
                    category,
                    value: value.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut selection = FilterSelection::new();
        selection.toggle(FilterCategory::Industries, "Automation");
        assert!(selection.contains(FilterCategory::Industries, "Automation"));

        selection.toggle(FilterCategory::Industries, "Automation");
        assert!(selection.is_empty());
        assert!(selection.active_filters().is_empty());
    }

    #[test]
    fn test_active_filters_follow_category_order() {
        let selection = FilterSelection::new()
            .with(FilterCategory::Experience, "Senior Level")
            .with(FilterCategory::JobTypes, "Contract")
            .with(FilterCategory::JobTypes, "Full-time");

        let chips: Vec<_> = selection
            .active_filters()
            .into_iter()
            .map(|f| format!("{}={}", f.category, f.value))
            .collect();
        assert_eq!(
            chips,
            vec![
                "jobTypes=Contract",
                "jobTypes=Full-time",
                "experience=Senior Level"
            ]
        );
    }

    #[test]
    fn test_filter_category_parsing() {
        assert_eq!(
            "industries".parse::<FilterCategory>(),
            Ok(FilterCategory::Industries)
        );
        assert_eq!(
            "JOBTYPES".parse::<FilterCategory>(),
            Ok(FilterCategory::JobTypes)
        );
        assert!("salary".parse::<FilterCategory>().is_err());
    }

    #[test]
    fn test_enum_labels_match_serde() {
        let json = serde_json::to_string(&JobType::FullTime).unwrap();
        assert_eq!(json, format!("\"{}\"", JobType::FullTime.as_str()));
        let json = serde_json::to_string(&ExperienceLevel::Mid).unwrap();
        assert_eq!(json, format!("\"{}\"", ExperienceLevel::Mid.as_str()));
    }
}
