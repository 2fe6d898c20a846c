//! Periodic fetch-all orchestration.
//!
//! One sync cycle fetches the four tracker resources concurrently. Every
//! resource has its own error boundary: a failed fetch leaves the previous
//! value in state (stale beats blank) and gets reported, never propagated.
//! Overlapping cycles are tolerated, not prevented; each resource write is
//! a last-write-wins replacement of a single slot.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Local;
#[cfg(test)]
use mockall::automock;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::models::{Company, Job, ScraperStatus, Stats};
use crate::state::SharedState;
use crate::Result;

/// Cadence of the scheduled background sync
pub const SYNC_INTERVAL: Duration = Duration::from_secs(60);

/// Read access to the four tracker resources, each independently fallible
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TrackerSource: Send + Sync {
    async fn fetch_stats(&self) -> Result<Stats>;
    async fn fetch_jobs(&self) -> Result<Vec<Job>>;
    async fn fetch_companies(&self) -> Result<Vec<Company>>;
    async fn fetch_scraper_status(&self) -> Result<ScraperStatus>;
}

/// What kicked off a sync cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOrigin {
    Scheduled,
    Manual,
}

/// How one resource fared within a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceOutcome {
    Updated,
    Failed(String),
}

impl ResourceOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, ResourceOutcome::Failed(_))
    }
}

/// Per-resource outcomes of one full sync cycle
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub stats: ResourceOutcome,
    pub jobs: ResourceOutcome,
    pub companies: ResourceOutcome,
    pub scraper_status: ResourceOutcome,
}

impl SyncReport {
    pub fn resources(&self) -> [(&'static str, &ResourceOutcome); 4] {
        [
            ("stats", &self.stats),
            ("jobs", &self.jobs),
            ("companies", &self.companies),
            ("scraper-status", &self.scraper_status),
        ]
    }

    /// Nothing in state moved this cycle
    pub fn is_total_failure(&self) -> bool {
        self.resources().iter().all(|(_, outcome)| outcome.is_failed())
    }

    pub fn failed_count(&self) -> usize {
        self.resources()
            .iter()
            .filter(|(_, outcome)| outcome.is_failed())
            .count()
    }
}

/// Orchestrates sync cycles against a [`TrackerSource`], writing results
/// into the shared dashboard state
pub struct SyncEngine {
    source: Arc<dyn TrackerSource>,
    state: SharedState,
}

impl SyncEngine {
    pub fn new(source: Arc<dyn TrackerSource>, state: SharedState) -> Self {
        Self { source, state }
    }

    pub fn state(&self) -> SharedState {
        Arc::clone(&self.state)
    }

    /// Run one full sync cycle.
    ///
    /// The four fetches run concurrently and each writes its own state
    /// slot the moment it resolves, so completion order between them never
    /// matters. The last-refreshed stamp moves on every cycle, failed or
    /// not, because the user asked "when did we last try", not "when did
    /// we last succeed".
    pub async fn sync_all(&self) -> SyncReport {
        let stats = async {
            match self.source.fetch_stats().await {
                Ok(stats) => {
                    self.state.write().unwrap().set_stats(stats);
                    ResourceOutcome::Updated
                }
                Err(e) => ResourceOutcome::Failed(e.to_string()),
            }
        };

        let jobs = async {
            match self.source.fetch_jobs().await {
                Ok(jobs) => {
                    debug!("loaded {} jobs", jobs.len());
                    self.state.write().unwrap().replace_jobs(jobs, Local::now());
                    ResourceOutcome::Updated
                }
                Err(e) => ResourceOutcome::Failed(e.to_string()),
            }
        };

        let companies = async {
            match self.source.fetch_companies().await {
                Ok(companies) => {
                    self.state.write().unwrap().set_companies(companies);
                    ResourceOutcome::Updated
                }
                Err(e) => ResourceOutcome::Failed(e.to_string()),
            }
        };

        let scraper_status = async {
            match self.source.fetch_scraper_status().await {
                Ok(status) => {
                    self.state.write().unwrap().set_scraper_status(status);
                    ResourceOutcome::Updated
                }
                Err(e) => ResourceOutcome::Failed(e.to_string()),
            }
        };

        let (stats, jobs, companies, scraper_status) =
            tokio::join!(stats, jobs, companies, scraper_status);

        self.state.write().unwrap().mark_refreshed(Local::now());

        let report = SyncReport {
            stats,
            jobs,
            companies,
            scraper_status,
        };
        for (resource, outcome) in report.resources() {
            if let ResourceOutcome::Failed(reason) = outcome {
                warn!("{} fetch failed, keeping previous value: {}", resource, reason);
            }
        }
        report
    }

    /// Spawn the background sync loop: one cycle immediately, then one per
    /// `every`. Reports go to `reports`; the loop ends when the receiver
    /// hangs up.
    pub fn spawn_periodic(
        engine: Arc<SyncEngine>,
        every: Duration,
        reports: mpsc::Sender<(SyncOrigin, SyncReport)>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let report = engine.sync_all().await;
                if reports.send((SyncOrigin::Scheduled, report)).await.is_err() {
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DashboardState;
    use chrono::Utc;

    fn intern_job(id: &str, first_seen_today: bool) -> Job {
        Job {
            id: id.to_string(),
            company: "Acme".to_string(),
            title: "Backend Intern".to_string(),
            location: Some("Bangalore".to_string()),
            remote: false,
            category: Some("eng".to_string()),
            tags: Vec::new(),
            url: format!("https://jobs.example/{id}"),
            posted_at: None,
            first_seen_at: first_seen_today.then(Utc::now),
            is_new: false,
        }
    }

    fn healthy_source(jobs: Vec<Job>) -> MockTrackerSource {
        let mut source = MockTrackerSource::new();
        source
            .expect_fetch_stats()
            .returning(|| Ok(Stats { active_jobs: 1, ..Stats::default() }));
        source
            .expect_fetch_jobs()
            .returning(move || Ok(jobs.clone()));
        source.expect_fetch_companies().returning(|| {
            Ok(vec![Company { name: "Acme".to_string(), job_count: 1 }])
        });
        source.expect_fetch_scraper_status().returning(|| {
            Ok(ScraperStatus {
                last_scrape_at: Some(Utc::now()),
                next_scrape_at: Some(Utc::now() + chrono::Duration::hours(1)),
                scrape_interval_hours: Some(6),
            })
        });
        source
    }

    #[tokio::test]
    async fn successful_cycle_fills_every_slot() {
        let state = DashboardState::shared();
        let engine = SyncEngine::new(
            Arc::new(healthy_source(vec![intern_job("1", true)])),
            Arc::clone(&state),
        );

        let report = engine.sync_all().await;

        assert_eq!(report.failed_count(), 0);
        let state = state.read().unwrap();
        assert_eq!(state.jobs().len(), 1);
        assert!(state.jobs()[0].is_new);
        assert_eq!(state.new_today(), 1);
        assert_eq!(state.companies().len(), 1);
        assert!(state.stats().is_some());
        assert!(state.next_scrape_at().is_some());
        assert!(state.last_refreshed().is_some());
    }

    #[tokio::test]
    async fn one_failed_resource_does_not_block_the_others() {
        let mut source = MockTrackerSource::new();
        source
            .expect_fetch_stats()
            .returning(|| Err(crate::Error::ApiError("Status 500: boom".to_string())));
        source
            .expect_fetch_jobs()
            .returning(|| Ok(vec![intern_job("1", false)]));
        source
            .expect_fetch_companies()
            .returning(|| Ok(Vec::new()));
        source
            .expect_fetch_scraper_status()
            .returning(|| Ok(ScraperStatus::default()));

        let state = DashboardState::shared();
        let engine = SyncEngine::new(Arc::new(source), Arc::clone(&state));
        let report = engine.sync_all().await;

        assert!(report.stats.is_failed());
        assert_eq!(report.jobs, ResourceOutcome::Updated);
        assert_eq!(report.failed_count(), 1);
        assert!(!report.is_total_failure());
        assert_eq!(state.read().unwrap().jobs().len(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_the_stale_value() {
        let state = DashboardState::shared();
        state
            .write()
            .unwrap()
            .set_stats(Stats { active_jobs: 42, ..Stats::default() });

        let mut source = MockTrackerSource::new();
        source
            .expect_fetch_stats()
            .returning(|| Err(crate::Error::ApiError("connection refused".to_string())));
        source.expect_fetch_jobs().returning(|| Ok(Vec::new()));
        source.expect_fetch_companies().returning(|| Ok(Vec::new()));
        source
            .expect_fetch_scraper_status()
            .returning(|| Ok(ScraperStatus::default()));

        let engine = SyncEngine::new(Arc::new(source), Arc::clone(&state));
        engine.sync_all().await;

        // Previous stats survive the failed fetch
        assert_eq!(state.read().unwrap().stats().map(|s| s.active_jobs), Some(42));
    }

    #[tokio::test]
    async fn total_failure_is_detected_and_state_is_untouched() {
        let mut source = MockTrackerSource::new();
        source
            .expect_fetch_stats()
            .returning(|| Err(crate::Error::ApiError("down".to_string())));
        source
            .expect_fetch_jobs()
            .returning(|| Err(crate::Error::ApiError("down".to_string())));
        source
            .expect_fetch_companies()
            .returning(|| Err(crate::Error::ApiError("down".to_string())));
        source
            .expect_fetch_scraper_status()
            .returning(|| Err(crate::Error::ApiError("down".to_string())));

        let state = DashboardState::shared();
        state
            .write()
            .unwrap()
            .replace_jobs(vec![intern_job("1", false)], Local::now());

        let engine = SyncEngine::new(Arc::new(source), Arc::clone(&state));
        let report = engine.sync_all().await;

        assert!(report.is_total_failure());
        assert_eq!(report.failed_count(), 4);
        // Loaded data is never cleared by a failed cycle
        assert_eq!(state.read().unwrap().jobs().len(), 1);
        // The attempt still counts as a refresh
        assert!(state.read().unwrap().last_refreshed().is_some());
    }

    /// Source whose jobs fetch takes a configurable amount of time
    struct DelayedSource {
        jobs: Vec<Job>,
        delay: Duration,
    }

    #[async_trait]
    impl TrackerSource for DelayedSource {
        async fn fetch_stats(&self) -> Result<Stats> {
            Ok(Stats::default())
        }

        async fn fetch_jobs(&self) -> Result<Vec<Job>> {
            tokio::time::sleep(self.delay).await;
            Ok(self.jobs.clone())
        }

        async fn fetch_companies(&self) -> Result<Vec<Company>> {
            Ok(Vec::new())
        }

        async fn fetch_scraper_status(&self) -> Result<ScraperStatus> {
            Ok(ScraperStatus::default())
        }
    }

    #[tokio::test]
    async fn overlapping_cycles_resolve_to_the_last_write() {
        let state = DashboardState::shared();

        let slow = SyncEngine::new(
            Arc::new(DelayedSource {
                jobs: vec![intern_job("slow", false)],
                delay: Duration::from_millis(80),
            }),
            Arc::clone(&state),
        );
        let fast = SyncEngine::new(
            Arc::new(DelayedSource {
                jobs: vec![intern_job("fast", false)],
                delay: Duration::from_millis(1),
            }),
            Arc::clone(&state),
        );

        // Both cycles run at once; the slow one's jobs write lands last
        let slow_task = tokio::spawn(async move { slow.sync_all().await });
        let fast_task = tokio::spawn(async move { fast.sync_all().await });

        let (slow_report, fast_report) = tokio::join!(slow_task, fast_task);
        assert_eq!(slow_report.unwrap().failed_count(), 0);
        assert_eq!(fast_report.unwrap().failed_count(), 0);

        let state = state.read().unwrap();
        assert_eq!(state.jobs().len(), 1);
        assert_eq!(state.jobs()[0].id, "slow");
    }

    #[tokio::test]
    async fn periodic_loop_syncs_immediately_then_repeats() {
        let state = DashboardState::shared();
        let engine = Arc::new(SyncEngine::new(
            Arc::new(healthy_source(vec![intern_job("1", false)])),
            state,
        ));

        let (tx, mut rx) = mpsc::channel(4);
        let handle = SyncEngine::spawn_periodic(engine, Duration::from_millis(20), tx);

        let (origin, first) = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for first cycle")
            .expect("channel closed early");
        assert_eq!(origin, SyncOrigin::Scheduled);
        assert_eq!(first.failed_count(), 0);

        tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for second cycle")
            .expect("channel closed early");

        // Hanging up the receiver stops the loop
        drop(rx);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("loop did not stop after receiver hang-up")
            .expect("sync loop panicked");
    }
}
