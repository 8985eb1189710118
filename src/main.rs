use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Borders, Chart, Clear, Dataset as ChartDataset, GraphType, Paragraph,
};

use nfl_yearly_terminal::cohort::rank_cohort;
use nfl_yearly_terminal::config::DashboardConfig;
use nfl_yearly_terminal::dataset::{install_dataset, load_dataset};
use nfl_yearly_terminal::export::{default_export_path, export_workbook, write_figure_json};
use nfl_yearly_terminal::figure::{Panel, X_AXIS_TITLE};
use nfl_yearly_terminal::palette::parse_hex;
use nfl_yearly_terminal::state::{AppState, Focus};
use nfl_yearly_terminal::stats::{StatMetric, format_stat_value};

struct App {
    state: AppState,
    config: DashboardConfig,
    should_quit: bool,
}

impl App {
    fn new(state: AppState, config: DashboardConfig) -> Self {
        Self {
            state,
            config,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        if self.state.help_overlay {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.state.help_overlay = false;
            }
            return;
        }
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Tab => self.state.toggle_focus(),
            KeyCode::Char(' ') | KeyCode::Enter => self.state.toggle_current(),
            KeyCode::Char('r') => self.state.reset_selection(),
            KeyCode::Char('c') => self.state.clear_selection(),
            KeyCode::PageDown | KeyCode::Char(']') => self.state.scroll_panels_down(),
            KeyCode::PageUp | KeyCode::Char('[') => self.state.scroll_panels_up(),
            KeyCode::Char('p') => self.state.cycle_panels_per_page(),
            KeyCode::Char('e') => self.export_json(),
            KeyCode::Char('x') => self.export_xlsx(),
            KeyCode::Char('?') => self.state.help_overlay = true,
            _ => {}
        }
    }

    fn export_json(&mut self) {
        let Some(figure) = self.state.figure.clone() else {
            self.state.push_log("[WARN] No figure to export");
            return;
        };
        let path = default_export_path(&self.config.export_dir, "json");
        let result = write_figure_json(&path, &figure);
        self.finish_export(result.map(|r| (r.path, r.series_rows)));
    }

    fn export_xlsx(&mut self) {
        let Some(figure) = self.state.figure.clone() else {
            self.state.push_log("[WARN] No figure to export");
            return;
        };
        let path = default_export_path(&self.config.export_dir, "xlsx");
        let result = export_workbook(&path, &self.state.cohort, &figure);
        self.finish_export(result.map(|r| (r.path, r.series_rows)));
    }

    fn finish_export(&mut self, result: Result<(std::path::PathBuf, usize)>) {
        self.state.export.last_updated = Some(Instant::now());
        match result {
            Ok((path, rows)) => {
                let shown = path.display().to_string();
                self.state.export.failed = false;
                self.state.export.message = format!("Exported {rows} points");
                self.state.export.path = Some(shown.clone());
                self.state.push_log(format!("[INFO] Export written to {shown}"));
            }
            Err(err) => {
                self.state.export.failed = true;
                self.state.export.message = format!("Export failed: {err:#}");
                self.state.export.path = None;
                self.state.push_log(format!("[ERR] Export failed: {err:#}"));
            }
        }
    }
}

fn main() -> Result<()> {
    let config = DashboardConfig::load();

    // Load before taking over the terminal so startup errors stay readable.
    let dataset = load_dataset(&config.seasonal_data)
        .with_context(|| format!("load seasonal data {}", config.seasonal_data.display()))?;
    let dataset = install_dataset(dataset)?;
    let metric = StatMetric::from_key(&config.cohort_metric)?;
    let cohort = rank_cohort(dataset.records(), &config.cohort_metric, config.cohort_limit)?;

    let report = &dataset.report;
    let mut state = AppState::new(
        cohort,
        metric,
        dataset.records(),
        report.season_range_label(),
    );
    state.push_log(format!(
        "[INFO] Loaded {} rows ({} skipped), {} players from {}",
        report.rows_read,
        report.rows_skipped,
        report.players,
        dataset.source.display()
    ));
    state.push_log(format!(
        "[INFO] Cohort: top {} by {}",
        state.cohort.len(),
        metric.label()
    ));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new(state, config);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.state.export.clear_if_done_for(Instant::now(), 8);
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(1)])
        .split(chunks[1]);
    render_player_list(frame, body[0], &app.state);
    render_panels(frame, body[1], &app.state);

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> Text<'static> {
    let selected = if state.selection.is_empty() {
        "none".to_string()
    } else {
        state.selection.names().join(", ")
    };
    let mut second = vec![Span::raw(format!("Selected: {selected}"))];
    if let Some(status) = state.export.status_line() {
        let style = if state.export.failed {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        second.push(Span::raw(" | "));
        second.push(Span::styled(status, style));
    }
    Text::from(vec![Line::from(state.title()), Line::from(second)])
}

fn footer_text(state: &AppState) -> String {
    let focus = match state.focus {
        Focus::Players => "players",
        Focus::Panels => "panels",
    };
    format!(
        "[{focus}] j/k Move | Space Toggle | Tab Focus | [/] Scroll | p Panels/page | r Reset | c Clear | e JSON | x XLSX | ? Help | q Quit"
    )
}

fn render_player_list(frame: &mut Frame, area: Rect, state: &AppState) {
    let title = format!(
        "Top {} by {}",
        state.cohort.len(),
        state.cohort_metric.label()
    );
    let border_style = if state.focus == Focus::Players {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible = inner.height as usize;
    let (start, end) = visible_range(state.cursor, state.cohort.len(), visible);
    let figure = state.figure.as_ref();
    let lines = state.cohort[start..end]
        .iter()
        .enumerate()
        .map(|(offset, entry)| {
            let idx = start + offset;
            let selected = state.selection.contains(&entry.display_name);
            let marker = if selected { "[x]" } else { "[ ]" };
            let text = format!(
                "{marker} {:>3}. {:<20} {:>7}",
                entry.rank,
                truncate(&entry.display_name, 20),
                format_stat_value(Some(entry.total.round()))
            );
            let mut style = Style::default();
            if let Some(color) = figure
                .and_then(|f| f.color_of(&entry.display_name))
                .and_then(hex_color)
            {
                style = style.fg(color);
            }
            if idx == state.cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::from(Span::styled(text, style))
        })
        .collect::<Vec<_>>();

    if lines.is_empty() {
        frame.render_widget(Paragraph::new("No players loaded"), inner);
        return;
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_panels(frame: &mut Frame, area: Rect, state: &AppState) {
    let panels = state.visible_panels();
    if panels.is_empty() {
        let block = Block::default().title("Panels").borders(Borders::ALL);
        frame.render_widget(Paragraph::new("No figure").block(block), area);
        return;
    }
    let constraints = panels
        .iter()
        .map(|_| Constraint::Ratio(1, panels.len() as u32))
        .collect::<Vec<_>>();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);
    let focused = state.focus == Focus::Panels;
    let total = state.panel_count();
    for (panel, rect) in panels.iter().zip(rows.iter()) {
        render_panel(frame, *rect, panel, total, focused);
    }
}

fn render_panel(frame: &mut Frame, area: Rect, panel: &Panel, total: usize, focused: bool) {
    let title = format!("{}/{} {}", panel.row, total, panel.title);
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let points = panel
        .series
        .iter()
        .map(|s| {
            s.points
                .iter()
                .filter_map(|p| p.value.map(|v| (f64::from(p.season), v)))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    if points.iter().all(|p| p.is_empty()) {
        frame.render_widget(Paragraph::new("No data for selection").block(block), area);
        return;
    }

    let (x_min, x_max) = bounds(points.iter().flatten().map(|p| p.0), 1.0);
    let (y_min, y_max) = bounds(points.iter().flatten().map(|p| p.1), 0.0);
    let y_min = y_min.min(0.0);
    let y_max = if y_max <= y_min { y_min + 1.0 } else { y_max * 1.05 };

    let mut datasets = Vec::new();
    for (series, data) in panel.series.iter().zip(points.iter()) {
        let style = Style::default().fg(hex_color(series.color).unwrap_or(Color::White));
        let mut line = ChartDataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(style)
            .data(data);
        if let Some(name) = &series.legend_name {
            line = line.name(name.clone());
        }
        datasets.push(line);
        datasets.push(
            ChartDataset::default()
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(style)
                .data(data),
        );
    }

    let chart = Chart::new(datasets)
        .block(block)
        .hidden_legend_constraints((Constraint::Ratio(1, 1), Constraint::Ratio(1, 1)))
        .x_axis(
            Axis::default()
                .title(X_AXIS_TITLE)
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{x_min:.0}")),
                    Span::raw(format!("{x_max:.0}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format_stat_value(Some(y_min.round()))),
                    Span::raw(format_stat_value(Some(y_max.round()))),
                ]),
        );
    frame.render_widget(chart, area);
}

/// Min/max of the values, widened by `pad` when they collapse to one point.
fn bounds(values: impl Iterator<Item = f64>, pad: f64) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - pad, hi + pad);
    }
    (lo, hi)
}

fn hex_color(token: &str) -> Option<Color> {
    parse_hex(token).map(|(r, g, b)| Color::Rgb(r, g, b))
}

fn truncate(raw: &str, max: usize) -> String {
    if raw.chars().count() <= max {
        return raw.to_string();
    }
    let mut out = raw.chars().take(max.saturating_sub(1)).collect::<String>();
    out.push('…');
    out
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(70, 80, area);
    frame.render_widget(Clear, popup_area);

    let mut lines = vec!["NFL Statistics Explained".to_string(), String::new()];
    lines.extend(
        StatMetric::ALL
            .iter()
            .map(|m| format!("  {:<16} {}", m.label(), m.description())),
    );
    lines.extend([
        String::new(),
        "Keys:".to_string(),
        "  j/k or ↑/↓   Move cursor / scroll panels".to_string(),
        "  Tab          Switch focus (players / panels)".to_string(),
        "  Space/Enter  Toggle player".to_string(),
        "  r / c        Reset to top two / clear selection".to_string(),
        "  [ / ]        Scroll panels".to_string(),
        "  p            Panels per page".to_string(),
        "  e / x        Export figure JSON / workbook".to_string(),
        "  ?            Toggle help".to_string(),
        "  q            Quit".to_string(),
    ]);

    let help = Paragraph::new(lines.join("\n"))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
