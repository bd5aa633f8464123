// src/types/mod.rs
pub mod job_posting;

pub use job_posting::{
    ActiveFilter, ExperienceLevel, FilterCategory, FilterSelection, JobPosting, JobType,
    SalaryRange,
};
