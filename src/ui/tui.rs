use std::io;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::{
    auth,
    error::ConsoleError,
    gateway::Gateway,
    output::resolved_label,
    time::{format_timestamp, now_utc},
    types::{AuthConfig, Incident, IncidentDetail, IncidentUpdate, Severity},
};
use crate::pipeline::{
    fetch::{fetch_incident_detail, hide_incident, update_incident},
    filter::TimeRange,
    poller::{LoadOrigin, Poller},
};
use crate::ui::app::{Action, App, AuthField, AuthMode, DetailView, EditField, Screen};

/// Results of background work spawned on behalf of the dashboard.
enum TaskEvent {
    AuthConfig(AuthConfig),
    Auth(Result<(), ConsoleError>),
    Detail {
        generation: u64,
        result: Result<IncidentDetail, ConsoleError>,
    },
    Saved {
        generation: u64,
        update: IncidentUpdate,
        result: Result<(), ConsoleError>,
    },
    Hidden {
        generation: u64,
        id: String,
        result: Result<(), ConsoleError>,
    },
}

pub async fn run_dashboard(gateway: Gateway, config: &AppConfig) -> Result<()> {
    let mut app = App::new(
        TimeRange::from_label(&config.default_time_range),
        config.page_size,
    );
    let interval = Duration::from_secs(config.poll_interval_secs);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let outcome = event_loop(&mut terminal, &mut app, gateway, interval).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    outcome
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    gateway: Gateway,
    interval: Duration,
) -> Result<()> {
    let (mut poller, mut poll_rx) = Poller::new(gateway.clone(), interval);
    let (task_tx, mut task_rx) = mpsc::unbounded_channel::<TaskEvent>();

    {
        let gw = gateway.clone();
        let tx = task_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(TaskEvent::AuthConfig(auth::fetch_auth_config(&gw).await));
        });
    }

    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        let now = now_utc();
        terminal.draw(|f| draw(f, app, now))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    let action = handle_key(app, key, now);
                    if action == Action::Quit {
                        break;
                    }
                    dispatch(action, app, &mut poller, &gateway, &task_tx);
                }
            }
        }

        while let Ok(ev) = poll_rx.try_recv() {
            app.list_result(ev, poller.generation(), now_utc());
        }
        while let Ok(ev) = task_rx.try_recv() {
            let follow_up = apply_task_event(app, ev);
            dispatch(follow_up, app, &mut poller, &gateway, &task_tx);
        }

        if app.screen == Screen::Auth && poller.is_running() {
            poller.stop();
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
            app.tick = app.tick.wrapping_add(1);
        }
    }

    poller.stop();
    Ok(())
}

fn apply_task_event(app: &mut App, ev: TaskEvent) -> Action {
    match ev {
        TaskEvent::AuthConfig(cfg) => {
            app.set_allow_signup(cfg.allow_signup);
            Action::None
        }
        TaskEvent::Auth(result) => app.auth_result(result),
        TaskEvent::Detail { generation, result } => {
            app.detail_result(generation, result);
            Action::None
        }
        TaskEvent::Saved {
            generation,
            update,
            result,
        } => {
            app.save_result(generation, &update, result);
            Action::None
        }
        TaskEvent::Hidden {
            generation,
            id,
            result,
        } => {
            app.hide_result(generation, &id, result);
            Action::None
        }
    }
}

fn dispatch(
    action: Action,
    app: &mut App,
    poller: &mut Poller,
    gateway: &Gateway,
    tx: &mpsc::UnboundedSender<TaskEvent>,
) {
    let gw = gateway.clone();
    let tx = tx.clone();
    match action {
        Action::None | Action::Quit => {}
        Action::Login { id, password } => {
            tokio::spawn(async move {
                let result = auth::login(&gw, &id, &password).await.map(|_| ());
                let _ = tx.send(TaskEvent::Auth(result));
            });
        }
        Action::Register { id, password } => {
            tokio::spawn(async move {
                let result = auth::register(&gw, &id, &password).await.map(|_| ());
                let _ = tx.send(TaskEvent::Auth(result));
            });
        }
        Action::Logout => {
            poller.stop();
            tokio::spawn(async move { auth::logout(&gw).await });
        }
        Action::LoadList => {
            if !poller.is_running() {
                poller.start();
            }
            poller.load_now(LoadOrigin::Foreground);
            app.log("[DATA] refreshing incidents");
        }
        Action::LoadDetail { generation, id } => {
            tokio::spawn(async move {
                let result = fetch_incident_detail(&gw, &id).await;
                let _ = tx.send(TaskEvent::Detail { generation, result });
            });
        }
        Action::Save {
            generation,
            id,
            update,
        } => {
            tokio::spawn(async move {
                let result = update_incident(&gw, &id, &update).await;
                let _ = tx.send(TaskEvent::Saved {
                    generation,
                    update,
                    result,
                });
            });
        }
        Action::Hide { generation, id } => {
            tokio::spawn(async move {
                let result = hide_incident(&gw, &id).await;
                let _ = tx.send(TaskEvent::Hidden {
                    generation,
                    id,
                    result,
                });
            });
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: DateTime<Utc>) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if app.dismiss_notice() {
        return Action::None;
    }
    if app.show_help {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.toggle_help();
        }
        return Action::None;
    }
    match app.screen {
        Screen::Auth => handle_auth_key(app, key),
        Screen::List => handle_list_key(app, key, now),
        Screen::Detail => handle_detail_key(app, key),
    }
}

fn handle_auth_key(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Enter => app.submit_auth(),
        KeyCode::Tab | KeyCode::Up | KeyCode::Down => {
            app.next_auth_field();
            Action::None
        }
        KeyCode::F(2) => {
            app.toggle_auth_mode();
            Action::None
        }
        KeyCode::Backspace => {
            app.auth_backspace();
            Action::None
        }
        KeyCode::Char(c) => {
            app.auth_input(c);
            Action::None
        }
        _ => Action::None,
    }
}

fn handle_list_key(app: &mut App, key: KeyEvent, now: DateTime<Utc>) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Up | KeyCode::Char('k') => {
            app.select_prev(now);
            Action::None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.select_next(now);
            Action::None
        }
        KeyCode::Left | KeyCode::Char('[') => {
            app.prev_page();
            Action::None
        }
        KeyCode::Right | KeyCode::Char(']') => {
            app.next_page(now);
            Action::None
        }
        KeyCode::Char('t') => {
            app.cycle_time_range();
            Action::None
        }
        KeyCode::Char('s') => {
            app.cycle_status_filter();
            Action::None
        }
        KeyCode::Char('r') => app.begin_load(),
        KeyCode::Enter => app.open_selected(now, false),
        KeyCode::Char('e') => app.open_selected(now, true),
        KeyCode::Char('L') => app.logout(),
        KeyCode::Char('?') => {
            app.toggle_help();
            Action::None
        }
        _ => Action::None,
    }
}

fn handle_detail_key(app: &mut App, key: KeyEvent) -> Action {
    let (editing, confirming) = app
        .detail
        .as_ref()
        .map(|v| (v.editing, v.confirm_hide))
        .unwrap_or((false, false));

    if confirming {
        return match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.answer_hide(true),
            _ => app.answer_hide(false),
        };
    }

    if editing {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return app.save();
        }
        match key.code {
            KeyCode::Esc => app.cancel_edit(),
            KeyCode::Tab => app.next_edit_field(),
            KeyCode::Enter => app.edit_enter(),
            KeyCode::Backspace => app.edit_backspace(),
            KeyCode::Char(c) => app.edit_input(c),
            _ => {}
        }
        return Action::None;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => {
            app.back_to_list();
            Action::None
        }
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('e') => {
            app.start_edit();
            Action::None
        }
        KeyCode::Char('h') => {
            app.request_hide();
            Action::None
        }
        KeyCode::Char('r') => app.reload_detail(),
        KeyCode::Up => {
            app.scroll_detail(false);
            Action::None
        }
        KeyCode::Down => {
            app.scroll_detail(true);
            Action::None
        }
        KeyCode::Char('?') => {
            app.toggle_help();
            Action::None
        }
        _ => Action::None,
    }
}

fn draw(f: &mut Frame<'_>, app: &App, now: DateTime<Utc>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(4),
            ]
            .as_ref(),
        )
        .split(f.size());

    draw_header(f, layout[0], app);
    match app.screen {
        Screen::Auth => draw_auth(f, layout[1], app),
        Screen::List => draw_list(f, layout[1], app, now),
        Screen::Detail => draw_detail(f, layout[1], app),
    }
    draw_footer(f, layout[2], app, now);

    if app.show_help {
        draw_help_modal(f);
    }
    if let Some(notice) = &app.notice {
        draw_notice(f, notice);
    }
}

fn draw_header(f: &mut Frame<'_>, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " RCA CONSOLE ",
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    )];
    if app.screen != Screen::Auth {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            app.time_range.label(),
            Style::default().fg(Color::Cyan),
        ));
        spans.push(Span::raw(" | status: "));
        spans.push(Span::styled(
            app.status_filter.as_str(),
            Style::default().fg(Color::Yellow),
        ));
    }
    if app.loading {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} loading", spinner(app.tick)),
            Style::default().fg(Color::Magenta),
        ));
    }
    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Red)));
    f.render_widget(header, area);
}

fn draw_auth(f: &mut Frame<'_>, area: Rect, app: &App) {
    let area = centered_rect(60, 70, area);
    let form = &app.auth;
    let title = match form.mode {
        AuthMode::Login => " Sign in ",
        AuthMode::Register => " Create account ",
    };
    let field_style = |field: AuthField| {
        if form.field == field {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        }
    };
    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("ID:       "),
            Span::styled(format!("{:<24}", form.id), field_style(AuthField::Id)),
        ]),
        Line::from(vec![
            Span::raw("Password: "),
            Span::styled(
                format!("{:<24}", "*".repeat(form.password.chars().count())),
                field_style(AuthField::Password),
            ),
        ]),
        Line::from(""),
    ];
    if form.submitting {
        lines.push(Line::from(Span::styled(
            format!("{} contacting server", spinner(app.tick)),
            Style::default().fg(Color::Magenta),
        )));
    }
    if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            err.as_str(),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter submit | Tab switch field | Esc quit",
        Style::default().fg(Color::DarkGray),
    )));
    if form.allow_signup {
        lines.push(Line::from(Span::styled(
            "F2 toggle sign in / create account",
            Style::default().fg(Color::DarkGray),
        )));
    }
    let widget = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(widget, area);
}

fn draw_list(f: &mut Frame<'_>, area: Rect, app: &App, now: DateTime<Utc>) {
    let visible_len = app.visible(now).len();
    let pages = app.total_pages(now);
    let title = if pages == 0 {
        " Incidents ".to_string()
    } else {
        format!(" Incidents ({} match) page {}/{} ", visible_len, app.page, pages)
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if let Some(err) = &app.error {
        let widget = Paragraph::new(vec![
            Line::from(Span::styled(err.as_str(), Style::default().fg(Color::Red))),
            Line::from(Span::styled("Press r to retry", Style::default().fg(Color::DarkGray))),
        ])
        .block(block);
        f.render_widget(widget, area);
        return;
    }

    let items = app.page_items(now);
    if items.is_empty() {
        let msg = if app.loading {
            "Loading incidents..."
        } else {
            "No incidents match the current filters."
        };
        let widget = Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(widget, area);
        return;
    }

    let rows: Vec<ListItem> = items.iter().map(incident_row).collect();
    let list = List::new(rows)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("➤ ");
    let mut state = ListState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn incident_row(incident: &Incident) -> ListItem<'static> {
    let badge = incident.display_severity();
    let color = badge_color(incident);
    ListItem::new(Line::from(vec![
        Span::styled(
            format!("{:<12} ", incident.incident_id),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("{:<19} ", format_timestamp(incident.fired_at.as_deref())),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("~ "),
        Span::styled(
            format!("{:<19} ", resolved_label(incident)),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(format!("{:<9}", badge), Style::default().fg(color)),
        Span::raw(incident.alarm_title.clone()),
    ]))
}

fn draw_detail(f: &mut Frame<'_>, area: Rect, app: &App) {
    let Some(view) = &app.detail else {
        return;
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Incident {} ", view.incident_id));

    if view.loading && view.detail.is_none() {
        let widget = Paragraph::new(format!("{} loading detail", spinner(app.tick))).block(block);
        f.render_widget(widget, area);
        return;
    }
    if let Some(err) = &view.error {
        let widget = Paragraph::new(vec![
            Line::from(Span::styled(err.as_str(), Style::default().fg(Color::Red))),
            Line::from(Span::styled(
                "r retry | Esc back",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(block);
        f.render_widget(widget, area);
        return;
    }

    let lines = if view.editing {
        edit_lines(view)
    } else {
        view.detail.as_ref().map(detail_lines).unwrap_or_default()
    };
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((view.scroll, 0))
        .block(block);
    f.render_widget(widget, area);

    if view.confirm_hide {
        let popup = centered_rect(50, 20, f.size());
        let para = Paragraph::new("Hide this report from the list? (y/n)")
            .block(Block::default().title(" Confirm ").borders(Borders::ALL));
        f.render_widget(Clear, popup);
        f.render_widget(para, popup);
    }
}

fn detail_lines(detail: &IncidentDetail) -> Vec<Line<'static>> {
    let incident = &detail.incident;
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                incident.alarm_title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(
                format!("[{}]", incident.display_severity()),
                Style::default().fg(badge_color(incident)),
            ),
        ]),
        Line::from(format!(
            "Fired: {}   Resolved: {}   Status: {}",
            format_timestamp(incident.fired_at.as_deref()),
            resolved_label(incident),
            if detail.status.is_empty() { "-" } else { detail.status.as_str() }
        )),
        Line::from(""),
        section("Summary"),
    ];
    lines.extend(text_lines(&detail.analysis_summary, "No summary available."));
    lines.push(Line::from(""));
    lines.push(section("Detailed analysis"));
    lines.extend(text_lines(&detail.analysis_detail, "No detailed analysis available."));
    lines.push(Line::from(""));
    lines.push(section("Similar incidents"));
    if detail.similar_incidents.is_empty() {
        lines.push(Line::from(Span::styled(
            "None found",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for similar in &detail.similar_incidents {
        let score = similar
            .score
            .map(|s| format!(" ({}% similar)", s))
            .unwrap_or_default();
        lines.push(Line::from(format!(
            "- {} {}{}",
            similar.incident_id, similar.alarm_title, score
        )));
    }
    lines
}

fn edit_lines(view: &DetailView) -> Vec<Line<'static>> {
    let Some(form) = &view.form else {
        return vec![];
    };
    let label = |field: EditField| {
        let style = if view.field == field {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan)
        };
        Span::styled(format!("{}:", field.label()), style)
    };
    let mut lines = vec![
        Line::from(vec![
            label(EditField::Title),
            Span::raw(format!(" {}", form.incident.alarm_title)),
        ]),
        Line::from(vec![
            label(EditField::Severity),
            Span::styled(
                format!(" {} (space to change)", form.incident.severity),
                Style::default().fg(severity_color(form.incident.severity)),
            ),
        ]),
        Line::from(vec![label(EditField::Status), Span::raw(format!(" {}", form.status))]),
        Line::from(""),
        Line::from(label(EditField::Summary)),
    ];
    lines.extend(text_lines(&form.analysis_summary, ""));
    lines.push(Line::from(""));
    lines.push(Line::from(label(EditField::Detail)));
    lines.extend(text_lines(&form.analysis_detail, ""));
    if view.saving {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "saving...",
            Style::default().fg(Color::Magenta),
        )));
    }
    lines
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))
}

fn text_lines(text: &str, fallback: &str) -> Vec<Line<'static>> {
    if text.trim().is_empty() {
        if fallback.is_empty() {
            return vec![Line::from("")];
        }
        return vec![Line::from(Span::styled(
            fallback.to_string(),
            Style::default().fg(Color::DarkGray),
        ))];
    }
    text.lines().map(|l| Line::from(l.to_string())).collect()
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &App, now: DateTime<Utc>) {
    let keys = match app.screen {
        Screen::Auth => "Enter submit  Tab field  F2 mode  Esc quit",
        Screen::List => {
            if app.total_pages(now) > 1 {
                "↑/↓ move  ←/→ page  t range  s status  Enter open  e edit  r refresh  L logout  ? help  q quit"
            } else {
                "↑/↓ move  t range  s status  Enter open  e edit  r refresh  L logout  ? help  q quit"
            }
        }
        Screen::Detail => match &app.detail {
            Some(v) if v.editing => "Tab field  Enter newline/next  Ctrl-S save  Esc cancel",
            _ => "e edit  h hide  r reload  ↑/↓ scroll  Esc back  q quit",
        },
    };
    let last_log = app.logs.last().cloned().unwrap_or_default();
    let lines = vec![
        Line::from(vec![
            Span::styled("Keys: ", Style::default().fg(Color::Cyan)),
            Span::raw(keys),
        ]),
        Line::from(vec![
            Span::styled("Log: ", Style::default().fg(Color::Green)),
            Span::styled(last_log, Style::default().fg(Color::Yellow)),
        ]),
    ];
    let footer = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn draw_notice(f: &mut Frame<'_>, notice: &str) {
    let area = centered_rect(50, 20, f.size());
    let para = Paragraph::new(vec![
        Line::from(notice.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "press any key",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().title(" Notice ").borders(Borders::ALL));
    f.render_widget(Clear, area);
    f.render_widget(para, area);
}

fn draw_help_modal(f: &mut Frame<'_>) {
    let area = centered_rect(70, 60, f.size());
    let content = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from("↑/↓   : move selection"),
        Line::from("←/→   : previous / next page"),
        Line::from("t     : cycle time range"),
        Line::from("s     : cycle status filter (all/ongoing/resolved)"),
        Line::from("Enter : open incident detail"),
        Line::from("e     : open incident in edit mode"),
        Line::from("h     : hide incident (detail view)"),
        Line::from("r     : refresh"),
        Line::from("L     : sign out"),
        Line::from("?     : toggle this help"),
        Line::from("q/ESC : quit"),
    ];
    let para = Paragraph::new(content).block(
        Block::default()
            .title("Help (press ? to close)")
            .borders(Borders::ALL),
    );
    f.render_widget(Clear, area);
    f.render_widget(para, area);
}

fn badge_color(incident: &Incident) -> Color {
    if incident.is_resolved() {
        Color::Green
    } else {
        severity_color(incident.severity)
    }
}

fn severity_color(sev: Severity) -> Color {
    match sev {
        Severity::Info => Color::Blue,
        Severity::Warning => Color::Yellow,
        Severity::Critical => Color::Red,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1]);

    vertical[1]
}

fn spinner(tick: usize) -> &'static str {
    const FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];
    FRAMES[tick % FRAMES.len()]
}
