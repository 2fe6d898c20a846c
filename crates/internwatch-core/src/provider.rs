// Tracker provider implementation - bridges the API client with the TrackerSource trait
use async_trait::async_trait;
use internwatch_api::{
    CompanyEntry, ScraperStatusResponse, StatsResponse, TrackerClient, TrackerError, TrackerJob,
};

use crate::{
    models::{Company, Job, ScraperStatus, Stats},
    sync::TrackerSource,
    Error, Result,
};

/// Wrapper around TrackerClient that implements TrackerSource
pub struct TrackerProvider {
    client: TrackerClient,
    job_limit: u32,
}

impl TrackerProvider {
    pub fn new(base_url: String, job_limit: u32) -> Self {
        Self {
            client: TrackerClient::with_base_url(base_url),
            job_limit,
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

#[async_trait]
impl TrackerSource for TrackerProvider {
    async fn fetch_stats(&self) -> Result<Stats> {
        let stats = self.client.get_stats().await.map_err(tracker_to_core)?;
        Ok(stats_to_model(stats))
    }

    async fn fetch_jobs(&self) -> Result<Vec<Job>> {
        let page = self
            .client
            .get_jobs(self.job_limit)
            .await
            .map_err(tracker_to_core)?;
        Ok(page.jobs.into_iter().map(tracker_to_job).collect())
    }

    async fn fetch_companies(&self) -> Result<Vec<Company>> {
        let response = self
            .client
            .get_companies()
            .await
            .map_err(tracker_to_core)?;
        Ok(response.companies.into_iter().map(entry_to_company).collect())
    }

    async fn fetch_scraper_status(&self) -> Result<ScraperStatus> {
        let status = self
            .client
            .get_scraper_status()
            .await
            .map_err(tracker_to_core)?;
        Ok(status_to_model(status))
    }
}

fn tracker_to_core(err: TrackerError) -> Error {
    match err {
        TrackerError::NotFound(resource) => Error::NotFound(resource),
        other => Error::ApiError(other.to_string()),
    }
}

/// Convert a tracker wire job to our internal Job model
fn tracker_to_job(wire: TrackerJob) -> Job {
    Job {
        id: wire.id,
        company: wire.company,
        title: wire.title,
        location: wire.location,
        remote: wire.remote,
        category: wire.category,
        tags: wire.tags,
        url: wire.url,
        posted_at: wire.posted_at,
        first_seen_at: wire.first_seen_at,
        is_new: false, // annotated by the state container at load time
    }
}

fn entry_to_company(entry: CompanyEntry) -> Company {
    Company {
        name: entry.name,
        job_count: entry.job_count,
    }
}

fn stats_to_model(wire: StatsResponse) -> Stats {
    Stats {
        total_jobs: wire.total_jobs,
        active_jobs: wire.active_jobs,
        jobs_by_company: wire.jobs_by_company,
        jobs_by_category: wire.jobs_by_category,
        alerts_sent_today: wire.alerts_sent_today,
    }
}

fn status_to_model(wire: ScraperStatusResponse) -> ScraperStatus {
    // hours_until_next / minutes_until_next are snapshots of the server's
    // clock at response time; we recompute remaining time locally instead
    ScraperStatus {
        last_scrape_at: wire.last_scrape_at,
        next_scrape_at: wire.next_scrape_at,
        scrape_interval_hours: wire.scrape_interval_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_job_maps_field_for_field() {
        let wire = TrackerJob {
            id: "a1".to_string(),
            company: "Acme".to_string(),
            title: "Backend Intern".to_string(),
            location: Some("Bangalore".to_string()),
            remote: true,
            category: Some("backend".to_string()),
            tags: vec!["python".to_string()],
            url: "https://acme.example/jobs/a1".to_string(),
            posted_at: None,
            first_seen_at: None,
        };

        let job = tracker_to_job(wire);
        assert_eq!(job.id, "a1");
        assert_eq!(job.company, "Acme");
        assert!(job.remote);
        assert_eq!(job.tags, vec!["python"]);
        assert!(!job.is_new);
    }

    #[test]
    fn not_found_keeps_its_identity_through_mapping() {
        let err = tracker_to_core(TrackerError::NotFound("/companies".to_string()));
        assert!(matches!(err, Error::NotFound(_)));

        let err = tracker_to_core(TrackerError::RequestFailed("Status 500: boom".to_string()));
        assert!(matches!(err, Error::ApiError(_)));
    }
}
