// src/catalog_cli.rs
use crate::catalog::{
    self, parse_filter, search::filter, search::sort, SearchRequest, SortKey, TabContent,
};
use crate::types::job_posting::{FilterCategory, FilterSelection, JobPosting};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "job-catalog")]
#[command(about = "Browse the job board catalog from the terminal")]
pub struct CatalogCli {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Search and filter postings, one page at a time
    Search {
        #[command(flatten)]
        filters: FilterArgs,
        /// Page number (clamped to the available pages)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show one posting with its similar jobs
    Show { id: u32 },
    /// List facet values with their posting counts
    Facets,
    /// Write every matching posting as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output file, stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
pub struct FilterArgs {
    /// Text matched against title, company, description and tags
    #[arg(long, short = 'q', default_value = "")]
    pub search: String,
    /// Text matched against location, city, state and country
    #[arg(long, short = 'l', default_value = "")]
    pub location: String,
    #[arg(long = "job-type")]
    pub job_types: Vec<String>,
    #[arg(long = "industry")]
    pub industries: Vec<String>,
    #[arg(long = "category")]
    pub categories: Vec<String>,
    #[arg(long = "in-location")]
    pub locations: Vec<String>,
    #[arg(long = "city")]
    pub cities: Vec<String>,
    #[arg(long = "experience")]
    pub experience: Vec<String>,
    /// Any facet as <category>:<value>, e.g. industries:Automation
    #[arg(long = "filter")]
    pub generic: Vec<String>,
    /// newest, oldest, salary-high, salary-low or title
    #[arg(long, default_value = "newest")]
    pub sort: String,
}

impl FilterArgs {
    pub fn to_request(&self) -> Result<SearchRequest> {
        let sort: SortKey = self.sort.parse()?;
        let mut filters = FilterSelection::new();
        for (category, values) in [
            (FilterCategory::JobTypes, &self.job_types),
            (FilterCategory::Industries, &self.industries),
            (FilterCategory::Categories, &self.categories),
            (FilterCategory::Locations, &self.locations),
            (FilterCategory::Cities, &self.cities),
            (FilterCategory::Experience, &self.experience),
        ] {
            for value in values {
                filters.insert(category, value.as_str());
            }
        }
        for raw in &self.generic {
            let (category, value) = parse_filter(raw)?;
            filters.insert(category, value);
        }
        Ok(SearchRequest::default()
            .with_search(self.search.as_str())
            .with_location(self.location.as_str())
            .with_filters(filters)
            .with_sort(sort))
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: u32,
    title: &'a str,
    company: &'a str,
    location: &'a str,
    job_type: &'a str,
    category: &'a str,
    industry: &'a str,
    experience: &'a str,
    salary_min: u32,
    salary_max: u32,
    currency: &'a str,
    posted_date: String,
    closing_date: String,
}

impl<'a> From<&'a JobPosting> for CsvRow<'a> {
    fn from(job: &'a JobPosting) -> Self {
        Self {
            id: job.id,
            title: &job.title,
            company: &job.company,
            location: &job.location,
            job_type: job.job_type.as_str(),
            category: &job.category,
            industry: &job.industry,
            experience: job.experience.as_str(),
            salary_min: job.salary.min,
            salary_max: job.salary.max,
            currency: &job.salary.currency,
            posted_date: job.posted_date.to_string(),
            closing_date: job.closing_date.to_string(),
        }
    }
}

/// Write postings as CSV with a header row.
pub fn write_csv<W: Write>(writer: W, jobs: &[&JobPosting]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for job in jobs {
        csv.serialize(CsvRow::from(*job))
            .with_context(|| format!("Failed to write job {}", job.id))?;
    }
    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}

fn print_summary(job: &JobPosting) {
    let mut badges = String::new();
    if job.featured {
        badges.push_str(" [featured]");
    }
    if job.urgent {
        badges.push_str(" [urgent]");
    }
    println!(
        "#{:<3} {} - {} ({}, {}){}",
        job.id,
        job.title,
        job.company,
        job.location,
        job.job_type.as_str(),
        badges
    );
    println!(
        "      {} {}-{} | posted {}",
        job.salary.currency, job.salary.min, job.salary.max, job.posted_date
    );
}

pub fn handle_catalog_command(cli: CatalogCli) -> Result<()> {
    match cli.command {
        CatalogCommand::Search { filters, page } => {
            let request = filters.to_request()?.with_page(page);
            let results = catalog::search(catalog::jobs(), &request);
            if results.total == 0 {
                println!("No jobs match your search.");
                return Ok(());
            }
            for job in &results.jobs {
                print_summary(job);
            }
            println!(
                "Page {}/{} - {} job(s) total",
                results.page, results.total_pages, results.total
            );
            for chip in &results.active_filters {
                println!("  filter {}: {}", chip.category, chip.value);
            }
        }

        CatalogCommand::Show { id } => {
            let Some(detail) = catalog::lookup(id) else {
                anyhow::bail!("Job {} not found", id);
            };
            print_summary(detail.job);
            for tab in [
                catalog::DetailTab::Description,
                catalog::DetailTab::Requirements,
                catalog::DetailTab::Benefits,
            ] {
                match detail.tab(tab) {
                    TabContent::Description(text) => println!("\n{}", text),
                    TabContent::Requirements(items) => {
                        println!("\nRequirements:");
                        items.iter().for_each(|item| println!("  - {}", item));
                    }
                    TabContent::Benefits(items) => {
                        println!("\nBenefits:");
                        items.iter().for_each(|item| println!("  - {}", item));
                    }
                }
            }
            if !detail.similar_jobs.is_empty() {
                println!("\nSimilar jobs:");
                for job in &detail.similar_jobs {
                    println!("  #{} {} - {}", job.id, job.title, job.company);
                }
            }
        }

        CatalogCommand::Facets => {
            let counts = catalog::facet_counts();
            for category in FilterCategory::ALL {
                println!("{}:", category);
                for facet in counts.get(category) {
                    println!("  {:<24} {}", facet.value, facet.count);
                }
            }
        }

        CatalogCommand::Export { filters, output } => {
            let request = filters.to_request()?;
            let mut matched = filter(catalog::jobs(), &request);
            sort(&mut matched, request.sort);

            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("Failed to create {}", path.display()))?;
                    write_csv(file, &matched)?;
                    info!("Exported {} job(s) to {}", matched.len(), path.display());
                }
                None => write_csv(std::io::stdout().lock(), &matched)?,
            }
        }
    }

    Ok(())
}
