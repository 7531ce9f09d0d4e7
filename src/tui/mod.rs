//! Ratatui-based terminal UI.
//!
//! The TUI lists CSV files found under the working directory, loads the chosen
//! one, and renders its chart, table preview and summary. File reads and
//! prediction calls run on worker threads; their results come back over a
//! channel and go through `UploadSession`, which drops anything stale.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use plotters::style::RGBColor;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table},
};
use tracing::debug;

use crate::cli::picker::{discover_csv_files, pretty_path};
use crate::config::PreviewConfig;
use crate::domain::{ChartData, SeriesSource, UploadedFile};
use crate::error::{AppError, IngestError, PredictionError};
use crate::predict::{PredictionOutcome, Predictor};
use crate::report::file_summary;
use crate::session::{Completion, PredictionState, UploadSession, UploadToken};

mod plotters_chart;

use plotters_chart::SeriesChart;

/// Start the TUI.
pub fn run(config: PreviewConfig) -> Result<(), AppError> {
    let predictor: Option<Arc<dyn Predictor>> = match &config.predict {
        Some(predict) => Some(Arc::new(predict.build_client()?)),
        None => None,
    };

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config.mime.clone(), predictor);
    if let Some(path) = config.file {
        app.open(path);
    }
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Results reported back by worker threads.
enum WorkerEvent {
    Upload(UploadToken, Result<UploadedFile, IngestError>),
    Prediction(UploadToken, Result<PredictionOutcome, PredictionError>),
}

struct App {
    session: UploadSession,
    predictor: Option<Arc<dyn Predictor>>,
    mime: Option<String>,
    files: Vec<PathBuf>,
    selected_file: usize,
    path_input: String,
    editing_path: bool,
    table_offset: usize,
    status: String,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
}

impl App {
    fn new(mime: Option<String>, predictor: Option<Arc<dyn Predictor>>) -> Self {
        let (tx, rx) = mpsc::channel();
        let files = discover_csv_files();
        let status = if files.is_empty() {
            "No .csv files found here. Press o to type a path.".to_string()
        } else {
            format!("Found {} CSV file(s).", files.len())
        };
        Self {
            session: UploadSession::new(),
            predictor,
            mime,
            files,
            selected_file: 0,
            path_input: String::new(),
            editing_path: false,
            table_offset: 0,
            status,
            tx,
            rx,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if self.drain_workers() {
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Apply finished worker results. Returns whether anything changed.
    fn drain_workers(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.rx.try_recv() {
            match event {
                WorkerEvent::Upload(token, result) => {
                    if self.session.complete_upload(token, result) == Completion::Applied {
                        changed = true;
                        self.after_upload();
                    }
                }
                WorkerEvent::Prediction(token, result) => {
                    if self.session.complete_prediction(token, result) == Completion::Applied {
                        changed = true;
                        self.status = match self.session.prediction() {
                            Some(PredictionState::Ready(p)) => format!("Prediction ready ({} points).", p.len()),
                            _ => "Prediction unavailable; showing local data.".to_string(),
                        };
                    }
                }
            }
        }
        changed
    }

    fn after_upload(&mut self) {
        if let Some(err) = self.session.error() {
            self.status = err.to_string();
            return;
        }
        self.table_offset = 0;
        if let Some(file) = self.session.file() {
            self.status = format!("Loaded {}.", file.name());
        }
        self.start_prediction();
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_path {
            self.handle_path_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                self.selected_file = self.selected_file.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected_file + 1 < self.files.len() {
                    self.selected_file += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(path) = self.files.get(self.selected_file).cloned() {
                    self.open(path);
                }
            }
            KeyCode::Char('o') => {
                self.editing_path = true;
                self.status = "Type a path. Enter to load, Esc to cancel.".to_string();
            }
            KeyCode::Char('x') => {
                self.session.remove();
                self.table_offset = 0;
                self.status = "File removed.".to_string();
            }
            KeyCode::Char('p') => {
                if self.session.file().is_none() {
                    self.status = "No file loaded.".to_string();
                } else if self.predictor.is_none() {
                    self.status = "Prediction disabled (--no-predict).".to_string();
                } else {
                    self.start_prediction();
                }
            }
            KeyCode::Char('r') => {
                self.files = discover_csv_files();
                self.selected_file = self.selected_file.min(self.files.len().saturating_sub(1));
                self.status = format!("Found {} CSV file(s).", self.files.len());
            }
            KeyCode::Char('j') | KeyCode::PageDown => {
                let rows = self.session.table().map(|t| t.rows.len()).unwrap_or(0);
                if self.table_offset + 1 < rows {
                    self.table_offset += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::PageUp => {
                self.table_offset = self.table_offset.saturating_sub(1);
            }
            _ => {}
        }

        false
    }

    fn handle_path_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_path = false;
                self.path_input.clear();
                self.status = "Canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_path = false;
                let input = std::mem::take(&mut self.path_input);
                let trimmed = input.trim();
                if trimmed.is_empty() {
                    self.status = "No path entered.".to_string();
                } else {
                    let path = PathBuf::from(trimmed);
                    self.open(path);
                }
            }
            KeyCode::Backspace => {
                self.path_input.pop();
            }
            KeyCode::Char(c) => {
                self.path_input.push(c);
            }
            _ => {}
        }
    }

    /// Read and validate `path` on a worker thread.
    fn open(&mut self, path: PathBuf) {
        let token = self.session.begin_upload();
        self.status = format!("Reading {}...", pretty_path(&path));

        let tx = self.tx.clone();
        let mime = self.mime.clone();
        thread::spawn(move || {
            let result = crate::io::ingest::ingest_path(&path, mime.as_deref());
            // The receiver is gone only when the app is shutting down.
            let _ = tx.send(WorkerEvent::Upload(token, result));
        });
    }

    fn start_prediction(&mut self) {
        let Some(predictor) = self.predictor.clone() else {
            return;
        };
        let Some(file) = self.session.file().cloned() else {
            return;
        };
        let Some(token) = self.session.begin_prediction() else {
            return;
        };
        debug!(name = file.name(), "starting prediction");

        let tx = self.tx.clone();
        thread::spawn(move || {
            let result = predictor.predict(&file);
            let _ = tx.send(WorkerEvent::Prediction(token, result));
        });
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("csvp", Style::default().fg(Color::Cyan)),
            Span::raw(" - CSV preview"),
        ]));

        let info = match self.session.file() {
            Some(file) => {
                let s = file_summary(file);
                format!(
                    "file: {} | rows: {} | size: {} | format: {}",
                    s.name, s.rows, s.size, s.format
                )
            }
            None if self.session.is_reading() => "reading...".to_string(),
            None => "no file loaded".to_string(),
        };
        lines.push(Line::from(Span::styled(info, Style::default().fg(Color::Gray))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(32), Constraint::Min(0)])
            .split(area);

        self.draw_files(frame, columns[0]);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        self.draw_chart(frame, rows[0]);
        self.draw_table(frame, rows[1]);
    }

    fn draw_files(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .files
            .iter()
            .map(|p| ListItem::new(pretty_path(p)))
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Files").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if !self.files.is_empty() {
            state.select(Some(self.selected_file));
        }
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing_path {
            let hint = Paragraph::new(format!("path: {}_", self.path_input))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 1,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(2),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chart = self.session.chart();
        let block = Block::default().title(chart_title(chart.as_ref(), self.session.prediction())).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let message = match &chart {
            None if self.session.is_reading() => Some(("Reading file...", Color::Yellow)),
            None => Some(("Load a CSV file to see its chart.", Color::Gray)),
            Some(c) if c.is_empty() => Some(("No data available.", Color::Gray)),
            Some(_) => None,
        };
        if let Some((text, color)) = message {
            frame.render_widget(Paragraph::new(text).style(Style::default().fg(color)), inner);
            return;
        }
        let Some(chart) = chart else { return };

        let (points, x_bounds, y_bounds) = chart_series(&chart);
        let line_color = match chart.source {
            SeriesSource::Prediction => RGBColor(0, 255, 255),
            SeriesSource::Local => RGBColor(144, 202, 249),
        };
        let widget = SeriesChart {
            points: &points,
            labels: &chart.labels,
            x_bounds,
            y_bounds,
            y_label: "value",
            line_color,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_table(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Content Preview").borders(Borders::ALL);
        let Some(table) = self.session.table() else {
            frame.render_widget(block, area);
            return;
        };

        let columns = table
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(table.headers.len()))
            .max()
            .unwrap_or(0)
            .max(1);
        let widths = vec![Constraint::Min(8); columns];

        let header = Row::new(table.headers.iter().map(|h| Cell::from(h.as_str())))
            .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
        let rows = table
            .rows
            .iter()
            .skip(self.table_offset)
            .map(|r| Row::new(r.iter().map(|c| Cell::from(c.as_str()))));

        let widget = Table::new(rows, widths).header(header).block(block.title_bottom(format!(
            " rows {}-{} of {} ",
            (self.table_offset + 1).min(table.rows.len()),
            table.rows.len(),
            table.rows.len()
        )));
        frame.render_widget(widget, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  Enter load  o path  x remove  p predict  j/k scroll  r rescan  q quit";
        let mut spans = vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
        ];
        match (self.session.error(), self.session.prediction_notice()) {
            (Some(err), _) => spans.push(Span::styled(err, Style::default().fg(Color::Red))),
            (None, Some(notice)) => spans.push(Span::styled(notice, Style::default().fg(Color::Red))),
            (None, None) => spans.push(Span::styled(&self.status, Style::default().fg(Color::Yellow))),
        }
        let p = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn chart_title(chart: Option<&ChartData>, prediction: Option<&PredictionState>) -> String {
    let base = chart.map(|c| c.source.display_name()).unwrap_or("Chart");
    match prediction {
        Some(PredictionState::Loading) => format!("{base} (loading prediction...)"),
        _ => base.to_string(),
    }
}

/// Build `(index, value)` points and padded bounds for Plotters.
fn chart_series(chart: &ChartData) -> (Vec<(f64, f64)>, [f64; 2], [f64; 2]) {
    let points: Vec<(f64, f64)> = chart
        .values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect();

    // A single point still needs a non-empty x range.
    let x_max = (points.len() as f64 - 1.0).max(1.0);
    let x_bounds = [-0.5, x_max + 0.5];

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in &points {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }
    if y_max <= y_min {
        y_min -= 1.0;
        y_max += 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    (points, x_bounds, [y_min - pad, y_max + pad])
}
