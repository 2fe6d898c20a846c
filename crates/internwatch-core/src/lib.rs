// Core business logic lives here - the brain of the operation
pub mod classify;
pub mod config;
pub mod countdown;
pub mod display;
pub mod error;
pub mod filter;
pub mod models;
pub mod provider;
pub mod state;
pub mod sync;

pub use config::Config;
pub use countdown::{CountdownDisplay, CountdownTicker};
pub use error::Error;
pub use filter::{filter_jobs, FilterState, CATEGORY_ALL};
pub use models::{Company, Job, ScraperStatus, Stats};
pub use provider::TrackerProvider;
pub use state::{DashboardState, SharedState};
pub use sync::{ResourceOutcome, SyncEngine, SyncOrigin, SyncReport, TrackerSource};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
