// TUI application state and event handling
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use internwatch_core::countdown::CountdownDisplay;
use internwatch_core::models::{Company, Job, ScraperStatus, Stats};
use internwatch_core::state::SharedState;
use internwatch_core::sync::{SyncOrigin, SyncReport};
use internwatch_core::CATEGORY_ALL;
use ratatui::widgets::ListState;

/// How long a success banner stays up
pub const SUCCESS_NOTICE_TTL: Duration = Duration::from_secs(3);
/// How long an error banner stays up
pub const ERROR_NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,    // Navigating the job list
    Searching, // Typing in the search box
    Companies, // Navigating the company list
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient status-bar banner, auto-dismissed after its TTL
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    expires_at: Instant,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Success,
            expires_at: Instant::now() + SUCCESS_NOTICE_TTL,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Error,
            expires_at: Instant::now() + ERROR_NOTICE_TTL,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

pub struct App {
    state: SharedState,
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub search_input: String,
    /// Filtered jobs, snapshotted from shared state after each change
    pub jobs: Vec<Job>,
    pub selected_index: usize,
    pub list_state: ListState,
    /// Top companies by open positions
    pub companies: Vec<Company>,
    pub company_index: usize,
    pub company_state: ListState,
    /// Category tabs: index 0 is "all", the rest map into `categories`
    pub categories: Vec<String>,
    pub category_cursor: usize,
    pub stats: Option<Stats>,
    pub scraper_status: Option<ScraperStatus>,
    pub new_today: usize,
    pub india_only: bool,
    pub last_refreshed: Option<DateTime<Local>>,
    pub countdown: CountdownDisplay,
    pub notice: Option<Notice>,
    pub refresh_in_flight: bool,
}

impl App {
    pub fn new(state: SharedState) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        let mut company_state = ListState::default();
        company_state.select(Some(0));

        let mut app = Self {
            state,
            should_quit: false,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            jobs: Vec::new(),
            selected_index: 0,
            list_state,
            companies: Vec::new(),
            company_index: 0,
            company_state,
            categories: Vec::new(),
            category_cursor: 0,
            stats: None,
            scraper_status: None,
            new_today: 0,
            india_only: false,
            last_refreshed: None,
            countdown: CountdownDisplay::Idle,
            notice: None,
            refresh_in_flight: false,
        };
        app.refresh_snapshot();
        app
    }

    /// Pull a fresh view of everything the dashboard renders out of shared
    /// state. Kept as one short read-lock scope.
    pub fn refresh_snapshot(&mut self) {
        let mut category_vanished = false;
        {
            let state = self.state.read().unwrap();
            self.jobs = state.filtered_jobs();
            self.companies = state.top_companies().to_vec();
            self.categories = state.visible_categories();
            self.stats = state.stats().cloned();
            self.scraper_status = state.scraper_status();
            self.new_today = state.new_today();
            self.last_refreshed = state.last_refreshed();
            self.india_only = state.filters().india_only;
            self.search_input = state.filters().search_term.clone();
            self.category_cursor = match state.filters().category.as_str() {
                CATEGORY_ALL => 0,
                current => match self.categories.iter().position(|c| c == current) {
                    Some(i) => i + 1,
                    None => {
                        category_vanished = true;
                        0
                    }
                },
            };
        }

        // The cursor fell back to "all", so the shared filter must follow;
        // otherwise the list stays narrowed by a category no tab shows.
        if category_vanished {
            let mut state = self.state.write().unwrap();
            state.set_category_filter(CATEGORY_ALL);
            self.jobs = state.filtered_jobs();
        }

        if self.jobs.is_empty() {
            self.selected_index = 0;
            self.list_state.select(None);
        } else {
            self.selected_index = self.selected_index.min(self.jobs.len() - 1);
            self.list_state.select(Some(self.selected_index));
        }
        if self.companies.is_empty() {
            self.company_index = 0;
            self.company_state.select(None);
        } else {
            self.company_index = self.company_index.min(self.companies.len() - 1);
            self.company_state.select(Some(self.company_index));
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Searching;
    }

    pub fn enter_normal_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn enter_companies_mode(&mut self) {
        self.input_mode = InputMode::Companies;
    }

    pub fn selected_job(&self) -> Option<&Job> {
        self.jobs.get(self.selected_index)
    }

    pub fn selected_company(&self) -> Option<&Company> {
        self.companies.get(self.company_index)
    }

    pub fn next_job(&mut self) {
        if !self.jobs.is_empty() {
            self.selected_index = (self.selected_index + 1).min(self.jobs.len() - 1);
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn previous_job(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    pub fn next_company(&mut self) {
        if !self.companies.is_empty() {
            self.company_index = (self.company_index + 1).min(self.companies.len() - 1);
            self.company_state.select(Some(self.company_index));
        }
    }

    pub fn previous_company(&mut self) {
        if self.company_index > 0 {
            self.company_index -= 1;
            self.company_state.select(Some(self.company_index));
        }
    }

    /// Category the cursor currently points at
    pub fn current_category(&self) -> &str {
        if self.category_cursor == 0 {
            CATEGORY_ALL
        } else {
            &self.categories[self.category_cursor - 1]
        }
    }

    pub fn next_category(&mut self) {
        if self.category_cursor < self.categories.len() {
            self.category_cursor += 1;
        } else {
            self.category_cursor = 0; // wrap back to "all"
        }
        self.apply_category();
    }

    pub fn previous_category(&mut self) {
        if self.category_cursor > 0 {
            self.category_cursor -= 1;
        } else {
            self.category_cursor = self.categories.len();
        }
        self.apply_category();
    }

    fn apply_category(&mut self) {
        let category = self.current_category().to_string();
        self.state.write().unwrap().set_category_filter(category);
        self.refresh_snapshot();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search_input.push(c);
        self.apply_search();
    }

    pub fn pop_search_char(&mut self) {
        self.search_input.pop();
        self.apply_search();
    }

    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.apply_search();
    }

    /// Filters apply on every keystroke, not on Enter
    fn apply_search(&mut self) {
        let term = self.search_input.clone();
        self.state.write().unwrap().set_search_term(term);
        self.refresh_snapshot();
    }

    pub fn toggle_india_only(&mut self) {
        let toggled = !self.india_only;
        self.state.write().unwrap().set_india_only(toggled);
        self.refresh_snapshot();
    }

    /// Company-card activation: search for that company's exact name and
    /// drop any category filter. The locality toggle is left alone.
    pub fn focus_selected_company(&mut self) {
        let Some(company) = self.selected_company() else {
            return;
        };
        let name = company.name.clone();
        {
            let mut state = self.state.write().unwrap();
            state.set_search_term(name);
            state.set_category_filter(CATEGORY_ALL);
        }
        self.refresh_snapshot();
        self.selected_index = 0;
        if !self.jobs.is_empty() {
            self.list_state.select(Some(0));
        }
        self.enter_normal_mode();
    }

    /// Returns false when a manual refresh is already running; the trigger
    /// stays disabled until the cycle reports back
    pub fn begin_manual_refresh(&mut self) -> bool {
        if self.refresh_in_flight {
            return false;
        }
        self.refresh_in_flight = true;
        true
    }

    /// Fold a finished sync cycle into the view
    pub fn apply_report(&mut self, origin: SyncOrigin, report: &SyncReport) {
        if origin == SyncOrigin::Manual {
            // Re-enabled unconditionally, success or not
            self.refresh_in_flight = false;
        }
        self.refresh_snapshot();

        if report.is_total_failure() {
            self.notice = Some(Notice::error(
                "Failed to load data. Is the tracker API running?",
            ));
        } else if origin == SyncOrigin::Manual {
            self.notice = Some(Notice::success("Data refreshed successfully!"));
        }
    }

    pub fn set_countdown(&mut self, display: CountdownDisplay) {
        self.countdown = display;
    }

    /// Drop the banner once its TTL has passed
    pub fn tick_notice(&mut self, now: Instant) {
        if let Some(notice) = &self.notice {
            if notice.is_expired(now) {
                self.notice = None;
            }
        }
    }
}
