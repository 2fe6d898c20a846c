use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Job posting model - the star of the show
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub company: String,
    pub title: String,
    pub location: Option<String>,
    pub remote: bool,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub url: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub first_seen_at: Option<DateTime<Utc>>,
    /// Set when the posting first appeared today (device-local calendar day).
    /// Annotated once per sync cycle, not at render time.
    #[serde(default)]
    pub is_new: bool,
}

/// A company and how many openings it currently lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub job_count: u32,
}

/// Aggregate counters reported by the tracker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total_jobs: u32,
    pub active_jobs: u32,
    pub jobs_by_company: HashMap<String, u32>,
    pub jobs_by_category: HashMap<String, u32>,
    pub alerts_sent_today: u32,
}

/// Scrape schedule as the tracker reports it
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ScraperStatus {
    pub last_scrape_at: Option<DateTime<Utc>>,
    pub next_scrape_at: Option<DateTime<Utc>>,
    pub scrape_interval_hours: Option<i64>,
}
