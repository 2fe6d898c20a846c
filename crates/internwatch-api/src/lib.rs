// HTTP client for the internship tracker's read-only API
pub mod tracker;

// Re-export common types
pub use tracker::{
    CompaniesResponse, CompanyEntry, JobsResponse, ScraperStatusResponse, StatsResponse,
    TrackerClient, TrackerError, TrackerJob, DEFAULT_JOB_LIMIT, DEFAULT_TRACKER_BASE,
};
