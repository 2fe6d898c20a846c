use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use internwatch_core::{
    classify, display, filter_jobs, Config, CountdownDisplay, DashboardState, FilterState, Job,
    SyncEngine, TrackerProvider, TrackerSource, CATEGORY_ALL,
};

#[derive(Parser)]
#[command(name = "internwatch")]
#[command(version, about = "Terminal dashboard for internship postings in India", long_about = None)]
struct Cli {
    /// Base URL of the tracker API
    #[arg(long, env = "INTERNWATCH_API_URL", global = true)]
    api_url: Option<String>,

    /// Seconds between scheduled dashboard refreshes
    #[arg(long)]
    refresh_interval: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// List current internship openings and exit
    Jobs {
        /// Only show one category (e.g. "software_engineering")
        #[arg(long)]
        category: Option<String>,
        /// Substring match against company, title and location
        #[arg(long)]
        search: Option<String>,
        /// Keep only India-friendly locations
        #[arg(long)]
        india_only: bool,
        /// Emit JSON instead of formatted lines
        #[arg(long)]
        json: bool,
    },
    /// Show tracker stats and the scraper schedule
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging - helps when things go sideways. The dashboard
    // owns the terminal, so it logs nothing unless RUST_LOG insists.
    let default_filter = if cli.command.is_none() {
        "internwatch=error"
    } else {
        "internwatch=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;
    let base_url = cli.api_url.unwrap_or_else(|| config.tracker.base_url.clone());
    let provider = Arc::new(TrackerProvider::new(base_url, config.tracker.job_limit));
    tracing::info!("using tracker at {}", provider.base_url());

    match cli.command {
        Some(Commands::Jobs {
            category,
            search,
            india_only,
            json,
        }) => list_jobs(&provider, category, search, india_only, json).await,
        Some(Commands::Status) => show_status(&provider).await,
        None => {
            let refresh_interval = cli
                .refresh_interval
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.sync.refresh_interval());
            let state = DashboardState::shared();
            let engine = Arc::new(SyncEngine::new(provider, state));
            internwatch_tui::run_tui(engine, refresh_interval).await
        }
    }
}

/// One-shot listing for scripts and quick checks. Same classification and
/// filter chain as the dashboard, minus the terminal takeover.
async fn list_jobs(
    provider: &TrackerProvider,
    category: Option<String>,
    search: Option<String>,
    india_only: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut jobs = provider.fetch_jobs().await?;
    annotate_new_today(&mut jobs);

    let filters = FilterState {
        category: category.unwrap_or_else(|| CATEGORY_ALL.to_string()),
        search_term: search.unwrap_or_default(),
        india_only,
    };
    let visible = filter_jobs(&jobs, &filters);

    if json {
        println!("{}", serde_json::to_string_pretty(&visible)?);
        return Ok(());
    }

    if visible.is_empty() {
        println!("No internships matched.");
        return Ok(());
    }

    for job in &visible {
        let new_marker = if job.is_new { " NEW" } else { "" };
        let remote_marker = if job.remote { " [Remote]" } else { "" };
        println!("{} - {}{}{}", job.company, job.title, new_marker, remote_marker);
        println!(
            "    {} | {} | {}",
            display::display_location(job.location.as_deref()),
            display::format_category(job.category.as_deref()),
            job.url
        );
    }
    println!();
    println!("{} internship(s)", visible.len());
    Ok(())
}

/// The dashboard annotates `is_new` when jobs land in the state container;
/// the one-shot path has no container, so it stamps the fetch directly.
fn annotate_new_today(jobs: &mut [Job]) {
    for job in jobs {
        job.is_new = classify::is_today(job.first_seen_at);
    }
}

async fn show_status(provider: &TrackerProvider) -> anyhow::Result<()> {
    let stats = provider.fetch_stats().await?;
    let status = provider.fetch_scraper_status().await?;
    let now = Utc::now();

    println!("Tracker:      {}", provider.base_url());
    println!("Active jobs:  {}", stats.active_jobs);
    println!("Total seen:   {}", stats.total_jobs);
    println!("Companies:    {}", stats.jobs_by_company.len());
    println!("Alerts today: {}", stats.alerts_sent_today);
    println!(
        "Last scrape:  {}",
        display::relative_time_label(status.last_scrape_at, now)
    );
    println!(
        "Next scrape:  {}",
        CountdownDisplay::for_target(status.next_scrape_at, now)
    );
    Ok(())
}
