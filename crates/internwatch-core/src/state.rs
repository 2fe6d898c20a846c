//! Process-wide dashboard state behind typed accessors.
//!
//! One `DashboardState` lives behind an `Arc<RwLock<..>>` shared by the
//! sync engine, the countdown ticker and the presentation layer. Writers
//! touch exactly one slot at a time so overlapping sync cycles degrade to
//! last-write-wins instead of corrupting each other.

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Local, Utc};

use crate::classify::{is_internship, is_today_at};
use crate::filter::{filter_jobs, FilterState};
use crate::models::{Company, Job, ScraperStatus, Stats};

/// How many companies the dashboard actually shows; the full ranked list
/// stays in state regardless
pub const COMPANY_DISPLAY_LIMIT: usize = 20;

pub type SharedState = Arc<RwLock<DashboardState>>;

#[derive(Debug, Default)]
pub struct DashboardState {
    jobs: Vec<Job>,
    companies: Vec<Company>,
    stats: Option<Stats>,
    scraper_status: Option<ScraperStatus>,
    filters: FilterState,
    new_today: usize,
    last_refreshed: Option<DateTime<Local>>,
}

impl DashboardState {
    pub fn shared() -> SharedState {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    /// The display slice of the ranked company list
    pub fn top_companies(&self) -> &[Company] {
        let end = self.companies.len().min(COMPANY_DISPLAY_LIMIT);
        &self.companies[..end]
    }

    pub fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    pub fn scraper_status(&self) -> Option<ScraperStatus> {
        self.scraper_status
    }

    /// The countdown ticker reads only this field
    pub fn next_scrape_at(&self) -> Option<DateTime<Utc>> {
        self.scraper_status.and_then(|status| status.next_scrape_at)
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Count of jobs first seen today, recomputed on every jobs load
    pub fn new_today(&self) -> usize {
        self.new_today
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }

    /// Wholesale replacement of the job collection. Every incoming record
    /// gets its `is_new` flag annotated against `reference` and the
    /// new-today counter is recomputed from this load, never carried over.
    pub fn replace_jobs(&mut self, jobs: Vec<Job>, reference: DateTime<Local>) {
        self.jobs = jobs;
        for job in &mut self.jobs {
            job.is_new = is_today_at(job.first_seen_at, reference);
        }
        self.new_today = self.jobs.iter().filter(|job| job.is_new).count();
    }

    pub fn set_companies(&mut self, companies: Vec<Company>) {
        self.companies = companies;
    }

    pub fn set_stats(&mut self, stats: Stats) {
        self.stats = Some(stats);
    }

    pub fn set_scraper_status(&mut self, status: ScraperStatus) {
        self.scraper_status = Some(status);
    }

    pub fn set_category_filter(&mut self, category: impl Into<String>) {
        self.filters.category = category.into();
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filters.search_term = term.into();
    }

    pub fn set_india_only(&mut self, india_only: bool) {
        self.filters.india_only = india_only;
    }

    pub fn mark_refreshed(&mut self, at: DateTime<Local>) {
        self.last_refreshed = Some(at);
    }

    /// Current filter chain output, cloned so callers can drop the lock
    /// before rendering
    pub fn filtered_jobs(&self) -> Vec<Job> {
        filter_jobs(&self.jobs, &self.filters)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Distinct categories among internship postings, sorted, for the
    /// category tab row
    pub fn visible_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .jobs
            .iter()
            .filter(|job| is_internship(job))
            .filter_map(|job| job.category.clone())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, title: &str, category: Option<&str>, first_seen_at: Option<DateTime<Utc>>) -> Job {
        Job {
            id: id.to_string(),
            company: "Acme".to_string(),
            title: title.to_string(),
            location: Some("Bangalore".to_string()),
            remote: false,
            category: category.map(|c| c.to_string()),
            tags: Vec::new(),
            url: format!("https://jobs.example/{id}"),
            posted_at: None,
            first_seen_at,
            is_new: false,
        }
    }

    #[test]
    fn replacing_jobs_annotates_and_counts_new_today() {
        let mut state = DashboardState::default();
        let reference = Local::now();
        let today = reference.with_timezone(&Utc);
        let last_week = today - chrono::Duration::days(7);

        state.replace_jobs(
            vec![
                job("1", "Backend Intern", Some("eng"), Some(today)),
                job("2", "Data Intern", Some("data"), Some(last_week)),
                job("3", "Platform Intern", None, None),
            ],
            reference,
        );

        assert_eq!(state.jobs().len(), 3);
        assert!(state.jobs()[0].is_new);
        assert!(!state.jobs()[1].is_new);
        assert!(!state.jobs()[2].is_new);
        assert_eq!(state.new_today(), 1);
    }

    #[test]
    fn replacement_is_wholesale_not_a_merge() {
        let mut state = DashboardState::default();
        let reference = Local::now();
        state.replace_jobs(vec![job("1", "Old Intern", None, None)], reference);
        state.replace_jobs(vec![job("2", "New Intern", None, None)], reference);

        assert_eq!(state.jobs().len(), 1);
        assert_eq!(state.jobs()[0].id, "2");
    }

    #[test]
    fn replacing_jobs_leaves_other_slots_alone() {
        let mut state = DashboardState::default();
        state.set_companies(vec![Company { name: "Acme".to_string(), job_count: 4 }]);
        state.set_stats(Stats { active_jobs: 4, ..Stats::default() });

        state.replace_jobs(vec![job("1", "Intern", None, None)], Local::now());

        assert_eq!(state.companies().len(), 1);
        assert_eq!(state.stats().map(|s| s.active_jobs), Some(4));
    }

    #[test]
    fn top_companies_is_capped_but_full_list_is_kept() {
        let mut state = DashboardState::default();
        let companies: Vec<Company> = (0..30)
            .map(|i| Company { name: format!("Company {i}"), job_count: 30 - i })
            .collect();
        state.set_companies(companies);

        assert_eq!(state.companies().len(), 30);
        assert_eq!(state.top_companies().len(), COMPANY_DISPLAY_LIMIT);
        assert_eq!(state.top_companies()[0].name, "Company 0");
    }

    #[test]
    fn company_focus_flow_resets_category_but_not_locality() {
        let mut state = DashboardState::default();
        state.set_category_filter("eng");
        state.set_india_only(true);

        // What the presentation layer does when a company card is activated
        state.set_search_term("Acme");
        state.set_category_filter(crate::filter::CATEGORY_ALL);

        assert_eq!(state.filters().search_term, "Acme");
        assert_eq!(state.filters().category, "all");
        assert!(state.filters().india_only);
    }

    #[test]
    fn filtered_jobs_reflects_current_filters() {
        let mut state = DashboardState::default();
        state.replace_jobs(
            vec![
                job("1", "Backend Intern", Some("eng"), None),
                job("2", "Data Intern", Some("data"), None),
                job("3", "Staff Engineer", Some("eng"), None),
            ],
            Local::now(),
        );

        state.set_category_filter("eng");
        let filtered = state.filtered_jobs();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "1");
    }

    #[test]
    fn visible_categories_are_distinct_sorted_and_gated() {
        let mut state = DashboardState::default();
        state.replace_jobs(
            vec![
                job("1", "Backend Intern", Some("eng"), None),
                job("2", "Data Intern", Some("data"), None),
                job("3", "Another Intern", Some("eng"), None),
                job("4", "Staff Engineer", Some("platform"), None),
            ],
            Local::now(),
        );

        assert_eq!(state.visible_categories(), vec!["data", "eng"]);
    }

    #[test]
    fn ticker_field_reads_through_to_scraper_status() {
        let mut state = DashboardState::default();
        assert!(state.next_scrape_at().is_none());

        let next = Utc::now() + chrono::Duration::hours(2);
        state.set_scraper_status(ScraperStatus {
            last_scrape_at: None,
            next_scrape_at: Some(next),
            scrape_interval_hours: Some(6),
        });
        assert_eq!(state.next_scrape_at(), Some(next));
    }
}
