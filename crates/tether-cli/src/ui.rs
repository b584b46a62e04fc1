use std::io;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use tether_core::{
    clamped_index, visible_indices, wrap_down, wrap_up, FeedbackKind, FetchState, FocusTarget,
    PanelState,
};

use crate::panels::{open_panel, PanelKeyResult, PanelKind, PanelSurface};
use crate::prefs;
use crate::records::RecordRow;

pub struct RunOptions {
    pub daemon_url: String,
    pub panel: Option<String>,
}

struct TuiGuard;

impl Drop for TuiGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
    }
}

struct App {
    daemon_url: String,
    home_selected: usize,
    open: Option<Box<dyn PanelSurface>>,
    should_quit: bool,
}

impl App {
    fn new(daemon_url: String) -> Self {
        Self {
            daemon_url,
            home_selected: 0,
            open: None,
            should_quit: false,
        }
    }

    fn open_panel(&mut self, kind: PanelKind) {
        // Preferences are re-read on every open; they are the only state
        // that survives a close/reopen cycle.
        let prefs = prefs::load();
        self.open = Some(open_panel(kind, &self.daemon_url, prefs));
    }

    fn close_panel(&mut self) {
        if let Some(panel) = self.open.take() {
            panel.close();
        }
    }
}

pub fn run(options: RunOptions) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, crossterm::cursor::Hide)?;
    let _guard = TuiGuard; // Restores the terminal on exit or panic

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(options.daemon_url);
    let startup_panel = options
        .panel
        .as_deref()
        .and_then(PanelKind::from_name)
        .or_else(|| {
            prefs::load()
                .default_panel
                .as_deref()
                .and_then(PanelKind::from_name)
        });
    if let Some(kind) = startup_panel {
        app.open_panel(kind);
    }

    run_app(&mut terminal, &mut app)?;
    app.close_panel();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        if let Some(panel) = app.open.as_mut() {
            panel.drain_events();
        }

        terminal.draw(|f| draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(app, key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    match app.open.as_mut() {
        Some(panel) => match panel.handle_key(key) {
            PanelKeyResult::Close => app.close_panel(),
            PanelKeyResult::Handled => {}
        },
        None => handle_home_keys(app, key),
    }
}

fn handle_home_keys(app: &mut App, key: KeyEvent) {
    let count = PanelKind::ALL.len();
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => {
            app.home_selected = wrap_up(app.home_selected, count);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.home_selected = wrap_down(app.home_selected, count);
        }
        KeyCode::Enter => {
            app.open_panel(PanelKind::ALL[app.home_selected]);
        }
        KeyCode::Char(c) => {
            if let Some(digit) = c.to_digit(10) {
                let idx = digit as usize;
                if (1..=count).contains(&idx) {
                    app.open_panel(PanelKind::ALL[idx - 1]);
                }
            }
        }
        _ => {}
    }
}

fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    match app.open.as_ref() {
        Some(panel) => panel.render(f, area),
        None => render_home(f, app),
    }
}

fn render_home(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled("tether", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  ·  "),
        Span::raw(app.daemon_url.as_str()),
    ]))
    .alignment(Alignment::Left);
    f.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = PanelKind::ALL
        .iter()
        .enumerate()
        .map(|(idx, kind)| {
            ListItem::new(Line::from(format!("{}  {}", idx + 1, kind.label())))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Panels"))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut list_state = ListState::default();
    list_state.select(Some(app.home_selected));
    f.render_stateful_widget(list, chunks[1], &mut list_state);

    let hints = Paragraph::new("↑↓/kj move · Enter open · 1-5 open · q quit")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hints, chunks[2]);
}

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

fn spinner() -> &'static str {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    SPINNER_FRAMES[(millis / 120) as usize % SPINNER_FRAMES.len()]
}

/// Render one open panel: header, search bar, section lists (plus the
/// detail pane while open), status footer. Pure presentation; every list
/// access goes through the visible indices and the clamp.
pub fn render_panel<R: RecordRow>(f: &mut Frame, area: Rect, state: &PanelState<R>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(area);

    render_header(f, chunks[0], state);
    render_search(f, chunks[1], state);
    render_body(f, chunks[2], state);
    render_footer(f, chunks[3], state);
}

fn render_header<R: RecordRow>(f: &mut Frame, area: Rect, state: &PanelState<R>) {
    let mut spans = vec![
        Span::styled(
            state.config.title,
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  ·  "),
        Span::raw(state.fetch.label()),
    ];
    if state.fetch == FetchState::Error {
        spans.push(Span::styled(
            "  stale data shown, retrying",
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_search<R: RecordRow>(f: &mut Frame, area: Rect, state: &PanelState<R>) {
    let title = if state.search_active {
        "Search (esc to clear)"
    } else {
        "Search (/)"
    };
    let style = if state.search_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let search = Paragraph::new(state.search_query.as_str())
        .block(Block::default().borders(Borders::ALL).title(title).border_style(style));
    f.render_widget(search, area);
}

fn render_body<R: RecordRow>(f: &mut Frame, area: Rect, state: &PanelState<R>) {
    let (list_area, detail_area) = if state.detail.is_some() {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        (split[0], Some(split[1]))
    } else {
        (area, None)
    };

    let section_count = state.sections.len().max(1);
    let constraints: Vec<Constraint> = (0..section_count)
        .map(|_| Constraint::Ratio(1, section_count as u32))
        .collect();
    let section_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(list_area);

    for (idx, section) in state.sections.iter().enumerate() {
        let visible = visible_indices(
            &state.items,
            idx,
            &state.search_query,
            state.config.search_fields,
        );
        let focused = state.focus == FocusTarget::Section(idx);
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let items: Vec<ListItem> = visible
            .iter()
            .map(|&item_idx| ListItem::new(Line::from(state.items[item_idx].row())))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{} ({})", section.name, visible.len()))
                    .border_style(border_style),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut list_state = ListState::default();
        if focused {
            list_state.select(clamped_index(section.selected, visible.len()));
        }
        f.render_stateful_widget(list, section_areas[idx], &mut list_state);
    }

    if let Some(detail_area) = detail_area {
        let focused = state.focus == FocusTarget::Detail;
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let lines: Vec<Line> = state
            .detail_record()
            .map(|record| record.detail_lines())
            .unwrap_or_default()
            .into_iter()
            .map(Line::from)
            .collect();
        let detail = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Detail")
                    .border_style(border_style),
            );
        f.render_widget(detail, detail_area);
    }
}

fn render_footer<R: RecordRow>(f: &mut Frame, area: Rect, state: &PanelState<R>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let status: Line = if let Some(id) = state.confirming.as_deref() {
        let action = state.config.destructive_action().unwrap_or("confirm");
        Line::from(Span::styled(
            format!("{action} '{id}'? Enter/y to confirm, Esc/n to cancel"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ))
    } else if state.busy {
        Line::from(Span::styled(
            format!("{} working…", spinner()),
            Style::default().fg(Color::Cyan),
        ))
    } else if let Some(feedback) = state.feedback.as_ref() {
        let style = match feedback.kind {
            FeedbackKind::Success => Style::default().fg(Color::Green),
            FeedbackKind::Error => Style::default().fg(Color::Red),
        };
        Line::from(Span::styled(feedback.message.clone(), style))
    } else if let Some(message) = state.error_message.as_deref() {
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        ))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(status), rows[0]);

    let hints = if state.confirming.is_some() {
        "Enter/y confirm · Esc/n cancel".to_string()
    } else if state.search_active {
        "type to filter · ↑↓ move · Tab section · Esc clear".to_string()
    } else if state.focus == FocusTarget::Detail {
        "Esc close detail · Tab cycle".to_string()
    } else {
        let mut parts = vec![
            "↑↓/kj move".to_string(),
            "Tab section".to_string(),
            "/ search".to_string(),
        ];
        if state.config.has_detail {
            parts.push("Enter detail".to_string());
        }
        for binding in state.config.actions {
            parts.push(format!("{} {}", binding.key, binding.action));
        }
        parts.push("q close".to_string());
        parts.join(" · ")
    };
    f.render_widget(
        Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
        rows[1],
    );
}
