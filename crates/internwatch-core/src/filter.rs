use serde::{Deserialize, Serialize};

use crate::classify::{is_india_location, is_internship};
use crate::models::Job;

/// Sentinel meaning "no category filter"
pub const CATEGORY_ALL: &str = "all";

/// The user-facing filters, applied on top of the internship gate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Exact category match, or [`CATEGORY_ALL`]
    pub category: String,
    /// Free-text needle, matched against company, title and location
    pub search_term: String,
    /// Keep only postings the India heuristic accepts
    pub india_only: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: CATEGORY_ALL.to_string(),
            search_term: String::new(),
            india_only: false,
        }
    }
}

impl FilterState {
    pub fn category_active(&self) -> bool {
        self.category != CATEGORY_ALL
    }

    /// Search term as actually matched: trimmed and lowercased
    pub fn normalized_search(&self) -> String {
        self.search_term.trim().to_lowercase()
    }
}

/// Run the filter chain over a job list, preserving input order.
///
/// The internship gate always applies first; category, search and the
/// India toggle then narrow the survivors. A whitespace-only search term
/// matches everything, and a job with no category only survives the
/// category filter when it is set to [`CATEGORY_ALL`].
pub fn filter_jobs<'a>(jobs: &'a [Job], filters: &FilterState) -> Vec<&'a Job> {
    let term = filters.normalized_search();
    jobs.iter()
        .filter(|job| is_internship(job))
        .filter(|job| {
            !filters.category_active() || job.category.as_deref() == Some(filters.category.as_str())
        })
        .filter(|job| term.is_empty() || matches_search(job, &term))
        .filter(|job| !filters.india_only || is_india_location(job.location.as_deref()))
        .collect()
}

fn matches_search(job: &Job, term: &str) -> bool {
    job.company.to_lowercase().contains(term)
        || job.title.to_lowercase().contains(term)
        || job
            .location
            .as_deref()
            .map(|location| location.to_lowercase().contains(term))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str, company: &str, title: &str, location: Option<&str>, category: Option<&str>) -> Job {
        Job {
            id: id.to_string(),
            company: company.to_string(),
            title: title.to_string(),
            location: location.map(|l| l.to_string()),
            remote: false,
            category: category.map(|c| c.to_string()),
            tags: Vec::new(),
            url: format!("https://jobs.example/{id}"),
            posted_at: None,
            first_seen_at: None,
            is_new: false,
        }
    }

    fn sample_jobs() -> Vec<Job> {
        vec![
            job("1", "Acme", "Software Intern", Some("Bangalore"), Some("software_engineering")),
            job("2", "Acme", "Senior Engineer", Some("Bangalore"), Some("software_engineering")),
            job("3", "Globex", "Data Science Internship", Some("London, UK"), Some("data_science")),
            job("4", "Initech", "Summer 2026 Analyst", None, None),
        ]
    }

    fn ids<'a>(filtered: &'a [&'a Job]) -> Vec<&'a str> {
        filtered.iter().map(|j| j.id.as_str()).collect()
    }

    #[test]
    fn default_filters_keep_every_internship() {
        let jobs = sample_jobs();
        let filtered = filter_jobs(&jobs, &FilterState::default());
        // Job 2 falls to the internship gate; order is preserved
        assert_eq!(ids(&filtered), vec!["1", "3", "4"]);
    }

    #[test]
    fn category_filter_is_an_exact_match() {
        let jobs = sample_jobs();
        let filters = FilterState {
            category: "data_science".to_string(),
            ..FilterState::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &filters)), vec!["3"]);
    }

    #[test]
    fn uncategorized_jobs_only_survive_category_all() {
        let jobs = sample_jobs();
        let filters = FilterState {
            category: "software_engineering".to_string(),
            ..FilterState::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &filters)), vec!["1"]);
    }

    #[test]
    fn search_matches_company_title_and_location() {
        let jobs = sample_jobs();

        let by_company = FilterState {
            search_term: "globex".to_string(),
            ..FilterState::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &by_company)), vec!["3"]);

        let by_title = FilterState {
            search_term: "ANALYST".to_string(),
            ..FilterState::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &by_title)), vec!["4"]);

        let by_location = FilterState {
            search_term: "bangalore".to_string(),
            ..FilterState::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &by_location)), vec!["1"]);
    }

    #[test]
    fn whitespace_search_matches_everything() {
        let jobs = sample_jobs();
        let filters = FilterState {
            search_term: "   ".to_string(),
            ..FilterState::default()
        };
        assert_eq!(ids(&filter_jobs(&jobs, &filters)), vec!["1", "3", "4"]);
    }

    #[test]
    fn india_toggle_drops_international_postings() {
        let jobs = sample_jobs();
        let filters = FilterState {
            india_only: true,
            ..FilterState::default()
        };
        // Job 3 is in London; job 4 has no location and passes
        assert_eq!(ids(&filter_jobs(&jobs, &filters)), vec!["1", "4"]);
    }

    #[test]
    fn filters_compose() {
        let jobs = sample_jobs();
        let filters = FilterState {
            category: "software_engineering".to_string(),
            search_term: "intern".to_string(),
            india_only: true,
        };
        assert_eq!(ids(&filter_jobs(&jobs, &filters)), vec!["1"]);
    }

    #[test]
    fn filtering_twice_changes_nothing() {
        let jobs = sample_jobs();
        let filters = FilterState {
            search_term: "intern".to_string(),
            ..FilterState::default()
        };

        let once: Vec<Job> = filter_jobs(&jobs, &filters).into_iter().cloned().collect();
        let twice = filter_jobs(&once, &filters);
        assert_eq!(ids(&twice), once.iter().map(|j| j.id.as_str()).collect::<Vec<_>>());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let filtered = filter_jobs(&[], &FilterState::default());
        assert!(filtered.is_empty());
    }
}
