// TUI event loop and terminal management
use crate::{App, InputMode, Notice};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use internwatch_core::countdown::CountdownTicker;
use internwatch_core::sync::{SyncEngine, SyncOrigin, SyncReport};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::debug;

/// How long the input thread waits before re-checking for shutdown
const INPUT_POLL: Duration = Duration::from_millis(100);

type ReportsTx = mpsc::Sender<(SyncOrigin, SyncReport)>;

/// Run the dashboard until the user quits.
///
/// The loop has three event sources: keyboard input bridged from a
/// blocking reader thread, reports from finished sync cycles, and the
/// one-second countdown feed. The scheduled sync loop and the countdown
/// ticker are owned here and die with this function.
pub async fn run_tui(engine: Arc<SyncEngine>, refresh_interval: Duration) -> anyhow::Result<()> {
    let state = engine.state();
    let mut app = App::new(Arc::clone(&state));

    let (reports_tx, mut reports_rx) = mpsc::channel(8);
    let sync_task =
        SyncEngine::spawn_periodic(Arc::clone(&engine), refresh_interval, reports_tx.clone());

    let ticker = CountdownTicker::spawn(state);
    let mut countdown_rx = ticker.subscribe();

    let (input_tx, mut input_rx) = mpsc::channel(32);
    std::thread::spawn(move || input_reader(input_tx));

    debug!("dashboard starting, refresh every {:?}", refresh_interval);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    loop {
        app.tick_notice(Instant::now());
        terminal.draw(|f| crate::ui::render(f, &mut app))?;

        tokio::select! {
            Some(event) = input_rx.recv() => {
                if let Event::Key(key) = event {
                    if key.kind == KeyEventKind::Press {
                        handle_key(&mut app, &engine, &reports_tx, key.code);
                    }
                }
            }
            Some((origin, report)) = reports_rx.recv() => {
                app.apply_report(origin, &report);
            }
            changed = countdown_rx.changed() => {
                if changed.is_ok() {
                    let display = countdown_rx.borrow_and_update().clone();
                    app.set_countdown(display);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    sync_task.abort();
    drop(ticker);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}

fn handle_key(app: &mut App, engine: &Arc<SyncEngine>, reports_tx: &ReportsTx, code: KeyCode) {
    match app.input_mode {
        InputMode::Searching => match code {
            KeyCode::Enter | KeyCode::Esc => {
                app.enter_normal_mode();
            }
            KeyCode::Char(c) => {
                app.push_search_char(c);
            }
            KeyCode::Backspace => {
                app.pop_search_char();
            }
            _ => {}
        },
        InputMode::Companies => match code {
            KeyCode::Esc | KeyCode::Char('c') => {
                app.enter_normal_mode();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.next_company();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.previous_company();
            }
            KeyCode::Enter => {
                app.focus_selected_company();
            }
            KeyCode::Char('q') => {
                app.quit();
            }
            _ => {}
        },
        InputMode::Normal => match code {
            KeyCode::Char('q') => {
                app.quit();
            }
            KeyCode::Char('/') => {
                app.enter_search_mode();
            }
            KeyCode::Char('c') => {
                app.enter_companies_mode();
            }
            KeyCode::Char('i') => {
                app.toggle_india_only();
            }
            KeyCode::Tab => {
                app.next_category();
            }
            KeyCode::BackTab => {
                app.previous_category();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.next_job();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                app.previous_job();
            }
            KeyCode::Char('x') => {
                app.clear_search();
            }
            KeyCode::Char('r') => {
                trigger_manual_refresh(app, engine, reports_tx);
            }
            KeyCode::Enter => {
                // Open the apply link in the browser
                if let Some(job) = app.selected_job() {
                    let url = job.url.clone();
                    if let Err(e) = open::that(&url) {
                        app.notice = Some(Notice::error(format!("Failed to open browser: {}", e)));
                    }
                }
            }
            KeyCode::Char('y') => {
                copy_selected_url(app);
            }
            _ => {}
        },
    }
}

/// Kick off an on-demand sync cycle unless one is already in flight. The
/// report comes back through the same channel as scheduled cycles.
fn trigger_manual_refresh(app: &mut App, engine: &Arc<SyncEngine>, reports_tx: &ReportsTx) {
    if !app.begin_manual_refresh() {
        return;
    }
    let engine = Arc::clone(engine);
    let reports = reports_tx.clone();
    tokio::spawn(async move {
        let report = engine.sync_all().await;
        let _ = reports.send((SyncOrigin::Manual, report)).await;
    });
}

fn copy_selected_url(app: &mut App) {
    let Some(job) = app.selected_job() else {
        return;
    };
    let url = job.url.clone();
    match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(url)) {
        Ok(()) => app.notice = Some(Notice::success("Link copied to clipboard")),
        Err(e) => app.notice = Some(Notice::error(format!("Clipboard error: {}", e))),
    }
}

/// Blocking crossterm reads bridged onto the async loop. Exits once the
/// receiving side hangs up.
fn input_reader(tx: mpsc::Sender<Event>) {
    loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(INPUT_POLL) {
            Ok(true) => match event::read() {
                Ok(event) => {
                    if tx.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {}
            Err(_) => break,
        }
    }
}
