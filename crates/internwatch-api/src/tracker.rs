use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default tracker instance - the India internship tracker runs on 8001
pub const DEFAULT_TRACKER_BASE: &str = "http://localhost:8001";

/// How many jobs the dashboard asks for in one page
pub const DEFAULT_JOB_LIMIT: u32 = 500;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    ParseError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

/// HTTP client for the internship tracker's read API.
///
/// Four endpoints, all idempotent GETs, no auth. Each fetch is one
/// request/response; callers decide when to re-poll.
pub struct TrackerClient {
    client: reqwest::Client,
    base_url: String,
}

impl TrackerClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_TRACKER_BASE.to_string())
    }

    /// Point the client at a non-default tracker instance
    pub fn with_base_url(base_url: String) -> Self {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("internwatch/0.1.0"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /stats - tracker-wide counters
    pub async fn get_stats(&self) -> Result<StatsResponse> {
        let url = format!("{}/stats", self.base_url);
        debug!("fetching {}", url);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, "/stats").await?;

        let stats: StatsResponse = parse_json(response).await?;
        Ok(stats)
    }

    /// GET /jobs?limit=N - the active job listing, newest first
    pub async fn get_jobs(&self, limit: u32) -> Result<JobsResponse> {
        let url = format!("{}/jobs", self.base_url);
        debug!("fetching {} (limit {})", url, limit);

        let response = self
            .client
            .get(&url)
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;
        let response = check_status(response, "/jobs").await?;

        let jobs: JobsResponse = parse_json(response).await?;
        Ok(jobs)
    }

    /// GET /companies - companies with openings, ranked by job count
    pub async fn get_companies(&self) -> Result<CompaniesResponse> {
        let url = format!("{}/companies", self.base_url);
        debug!("fetching {}", url);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, "/companies").await?;

        let companies: CompaniesResponse = parse_json(response).await?;
        Ok(companies)
    }

    /// GET /scraper-status - last run and next scheduled run of the scraper
    pub async fn get_scraper_status(&self) -> Result<ScraperStatusResponse> {
        let url = format!("{}/scraper-status", self.base_url);
        debug!("fetching {}", url);

        let response = self.client.get(&url).send().await?;
        let response = check_status(response, "/scraper-status").await?;

        let status: ScraperStatusResponse = parse_json(response).await?;
        Ok(status)
    }
}

impl Default for TrackerClient {
    fn default() -> Self {
        Self::new()
    }
}

async fn check_status(response: reqwest::Response, resource: &str) -> Result<reqwest::Response> {
    if response.status() == 404 {
        return Err(TrackerError::NotFound(resource.to_string()));
    }

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(TrackerError::RequestFailed(format!(
            "Status {}: {}",
            status, body
        )));
    }

    Ok(response)
}

/// Body read and decode are split so a malformed payload surfaces as
/// [`TrackerError::ParseError`] while transport failures stay `NetworkError`.
async fn parse_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response.text().await?;
    let value = serde_json::from_str(&body)?;
    Ok(value)
}

/// One job listing as the tracker serves it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerJob {
    pub id: String,
    pub company: String,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub url: String,
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub first_seen_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsResponse {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub skip: u32,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub jobs: Vec<TrackerJob>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyEntry {
    pub name: String,
    #[serde(default)]
    pub job_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompaniesResponse {
    #[serde(default)]
    pub companies: Vec<CompanyEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub total_jobs: u32,
    #[serde(default)]
    pub active_jobs: u32,
    #[serde(default)]
    pub jobs_by_company: HashMap<String, u32>,
    #[serde(default)]
    pub jobs_by_category: HashMap<String, u32>,
    #[serde(default)]
    pub alerts_sent_today: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperStatusResponse {
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub last_scrape_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "flexible_timestamp")]
    pub next_scrape_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub hours_until_next: Option<i64>,
    #[serde(default)]
    pub minutes_until_next: Option<i64>,
    #[serde(default)]
    pub scrape_interval_hours: Option<i64>,
}

/// The tracker emits ISO-8601 timestamps but is sloppy about offsets:
/// scraper-status attaches "+00:00" while /jobs serializes naive datetimes.
/// Accept both, treating naive values as UTC.
fn flexible_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    raw.parse::<NaiveDateTime>()
        .map(|naive| Some(naive.and_utc()))
        .map_err(serde::de::Error::custom)
}
