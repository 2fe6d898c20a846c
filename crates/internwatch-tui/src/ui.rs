// UI rendering logic
use crate::{App, InputMode, NoticeKind};
use chrono::Utc;
use internwatch_core::countdown::CountdownDisplay;
use internwatch_core::display::{
    display_location, format_category, relative_day_label, relative_time_label, sanitize_text,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn render(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Stats header
            Constraint::Length(3), // Scraper status + countdown
            Constraint::Length(3), // Search input + locality toggle
            Constraint::Length(1), // Category tabs
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_stats_header(frame, app, chunks[0]);
    render_scraper_bar(frame, app, chunks[1]);
    render_search_bar(frame, app, chunks[2]);
    render_category_tabs(frame, app, chunks[3]);

    // Main content: job list on the left, detail + companies on the right
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[4]);

    render_jobs_list(frame, app, content_chunks[0]);

    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Percentage(45)])
        .split(content_chunks[1]);

    render_job_detail(frame, app, right_chunks[0]);
    render_companies(frame, app, right_chunks[1]);

    render_status_bar(frame, app, chunks[5]);
}

fn render_stats_header(frame: &mut Frame, app: &App, area: Rect) {
    let boxes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let active_jobs = app.stats.as_ref().map(|s| s.active_jobs).unwrap_or(0);
    // Companies counted the way the stats endpoint sees them, not the
    // ranked list length
    let company_count = app
        .stats
        .as_ref()
        .map(|s| s.jobs_by_company.len())
        .unwrap_or(0);
    let alerts = app.stats.as_ref().map(|s| s.alerts_sent_today).unwrap_or(0);

    stat_box(frame, boxes[0], "Active Jobs", &active_jobs.to_string(), Color::Cyan);
    stat_box(frame, boxes[1], "New Today", &app.new_today.to_string(), Color::Green);
    stat_box(frame, boxes[2], "Companies", &company_count.to_string(), Color::Magenta);
    stat_box(frame, boxes[3], "Alerts Sent", &alerts.to_string(), Color::Yellow);
}

fn stat_box(frame: &mut Frame, area: Rect, label: &str, value: &str, color: Color) {
    let line = Line::from(vec![
        Span::styled(value, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(" "),
        Span::styled(label, Style::default().fg(Color::Gray)),
    ]);
    let widget = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_scraper_bar(frame: &mut Frame, app: &App, area: Rect) {
    let last_scrape = match app.scraper_status.as_ref().and_then(|s| s.last_scrape_at) {
        Some(ts) => relative_time_label(Some(ts), Utc::now()),
        None => "No data yet".to_string(),
    };

    let countdown_style = match &app.countdown {
        CountdownDisplay::Overdue => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        CountdownDisplay::Counting(_) => {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        }
        CountdownDisplay::Idle => Style::default().fg(Color::DarkGray),
    };

    let line = Line::from(vec![
        Span::styled("Last scrape: ", Style::default().fg(Color::Gray)),
        Span::raw(last_scrape),
        Span::raw("   "),
        Span::styled("Next scrape: ", Style::default().fg(Color::Gray)),
        Span::styled(app.countdown.to_string(), countdown_style),
    ]);

    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Scraper"),
    );
    frame.render_widget(widget, area);
}

fn render_search_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(22)])
        .split(area);

    let (search_style, title) = if app.input_mode == InputMode::Searching {
        (Style::default().fg(Color::Yellow), "Search (Esc to stop)")
    } else {
        (Style::default(), "Search (/)")
    };

    let mut search_text = app.search_input.clone();
    if app.input_mode == InputMode::Searching {
        search_text.push('_');
    }
    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(search_style),
    );
    frame.render_widget(search, chunks[0]);

    let (toggle_text, toggle_style) = if app.india_only {
        ("India only: ON", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
    } else {
        ("India only: OFF", Style::default().fg(Color::Gray))
    };
    let toggle = Paragraph::new(toggle_text).style(toggle_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Locality (i)"),
    );
    frame.render_widget(toggle, chunks[1]);
}

fn render_category_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        " All Categories ",
        tab_style(app.category_cursor == 0),
    )];
    for (i, category) in app.categories.iter().enumerate() {
        spans.push(Span::raw("|"));
        spans.push(Span::styled(
            format!(" {} ", format_category(Some(category))),
            tab_style(app.category_cursor == i + 1),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn tab_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn render_jobs_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let title = format!("Internships ({})", app.jobs.len());

    if app.jobs.is_empty() {
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No Internships Found",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("Try adjusting your filters or search terms"),
        ];
        let term = app.search_input.trim();
        if !term.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("Searching for: \"{}\"", sanitize_text(term)),
                Style::default().fg(Color::Yellow),
            )));
        }
        let empty = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .jobs
        .iter()
        .map(|job| {
            let mut spans = vec![
                Span::styled(
                    sanitize_text(&job.company),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(" - "),
                Span::raw(sanitize_text(&job.title)),
            ];
            if job.is_new {
                spans.push(Span::styled(
                    " NEW",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ));
            }
            if job.remote {
                spans.push(Span::styled(" [Remote]", Style::default().fg(Color::Gray)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_job_detail(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Details");

    let Some(job) = app.selected_job() else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            sanitize_text(&job.company),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            sanitize_text(&job.title),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Location:   ", Style::default().fg(Color::Gray)),
            Span::raw(display_location(job.location.as_deref())),
        ]),
        Line::from(vec![
            Span::styled("Category:   ", Style::default().fg(Color::Gray)),
            Span::raw(format_category(job.category.as_deref())),
        ]),
        Line::from(vec![
            Span::styled("First seen: ", Style::default().fg(Color::Gray)),
            Span::raw(relative_day_label(job.first_seen_at, Utc::now())),
        ]),
    ];

    if job.remote {
        lines.push(Line::from(vec![
            Span::styled("Remote:     ", Style::default().fg(Color::Gray)),
            Span::raw("yes"),
        ]));
    }

    if !job.tags.is_empty() {
        let tags = job
            .tags
            .iter()
            .map(|t| sanitize_text(t))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(Line::from(vec![
            Span::styled("Tags:       ", Style::default().fg(Color::Gray)),
            Span::raw(tags),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        sanitize_text(&job.url),
        Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
    )));
    lines.push(Line::from(Span::styled(
        "Enter: open in browser   y: copy link",
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_companies(frame: &mut Frame, app: &mut App, area: Rect) {
    let active = app.input_mode == InputMode::Companies;
    let title = if active {
        "Top Companies (Enter to focus, Esc to leave)"
    } else {
        "Top Companies (c)"
    };

    if app.companies.is_empty() {
        let empty = Paragraph::new("No companies with openings yet")
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .companies
        .iter()
        .map(|company| {
            let positions = if company.job_count == 1 {
                "position"
            } else {
                "positions"
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    sanitize_text(&company.name),
                    Style::default().fg(Color::Magenta),
                ),
                Span::raw(format!(" - {} {}", company.job_count, positions)),
            ]))
        })
        .collect();

    let border_style = if active {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(border_style),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.company_state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(40)])
        .split(area);

    let hints = if app.refresh_in_flight {
        "q quit  / search  i india  Tab category  c companies  Refreshing..."
    } else {
        "q quit  / search  i india  Tab category  c companies  r refresh"
    };
    frame.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(Color::DarkGray))),
        chunks[0],
    );

    let right = match &app.notice {
        Some(notice) => {
            let style = match notice.kind {
                NoticeKind::Success => Style::default().fg(Color::Green),
                NoticeKind::Error => Style::default().fg(Color::Red),
            };
            Span::styled(notice.text.clone(), style)
        }
        None => match app.last_refreshed {
            Some(at) => Span::styled(
                format!("Last updated {}", at.format("%H:%M:%S")),
                Style::default().fg(Color::Gray),
            ),
            None => Span::raw(""),
        },
    };
    frame.render_widget(Paragraph::new(right), chunks[1]);
}
