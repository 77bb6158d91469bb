//! Ratatui-based terminal UI.
//!
//! Three tabs mirror the three endpoints. Each tab has its own filter panel
//! and its own last report; a fetch blocks until the API answers, then the
//! tab is redrawn. Collection paging state lives on the collection tab and is
//! only moved by the next/previous keys.

use std::io;
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
    widgets::{Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs, Wrap},
};

use crate::app::pipeline::{Report, fetch_report};
use crate::config::Settings;
use crate::data::UnleashClient;
use crate::domain::{
    Blockchain, LIMIT_MAX, LIMIT_MIN, PageState, QueryParams, ReportKind, SortOrder, TimeRange,
};
use crate::error::AppError;
use crate::report::{CollectionReport, TrendItem, TrendMetric, TrendReport, WalletReport};

mod plotters_chart;

use plotters_chart::TrendPlottersChart;

/// Start the TUI.
pub fn run(settings: &Settings) -> Result<(), AppError> {
    let client = UnleashClient::new(settings)?;
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(client);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
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

/// Editable filter rows in the settings panel, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterField {
    Blockchain,
    TimeRange,
    SortBy,
    SortOrder,
    Limit,
}

const FILTER_FIELDS: [FilterField; 5] = [
    FilterField::Blockchain,
    FilterField::TimeRange,
    FilterField::SortBy,
    FilterField::SortOrder,
    FilterField::Limit,
];

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Quit,
    Fetch,
}

/// Filters, paging, and last result for one endpoint.
struct TabState {
    kind: ReportKind,
    blockchain: Blockchain,
    time_range: TimeRange,
    sort_index: usize,
    sort_order: SortOrder,
    limit: u32,
    page: PageState,
    report: Option<Report>,
    error: Option<String>,
    selected_item: usize,
}

impl TabState {
    fn new(kind: ReportKind) -> Self {
        Self {
            kind,
            blockchain: Blockchain::Ethereum,
            time_range: TimeRange::Day,
            sort_index: 0,
            sort_order: SortOrder::Desc,
            limit: kind.default_limit(),
            page: PageState::default(),
            report: None,
            error: None,
            selected_item: 0,
        }
    }

    fn sort_by(&self) -> &'static str {
        let fields = self.kind.sort_fields();
        fields[self.sort_index % fields.len()]
    }

    fn query(&self) -> Result<QueryParams, AppError> {
        QueryParams::new(self.blockchain, self.time_range, self.sort_by(), self.sort_order, self.limit)
    }

    fn adjust(&mut self, field: FilterField, delta: i32) {
        let forward = delta >= 0;
        match field {
            FilterField::Blockchain => {
                self.blockchain = if forward { self.blockchain.next() } else { self.blockchain.prev() };
            }
            FilterField::TimeRange => {
                self.time_range = if forward { self.time_range.next() } else { self.time_range.prev() };
            }
            FilterField::SortBy => {
                let n = self.kind.sort_fields().len();
                self.sort_index = if forward {
                    (self.sort_index + 1) % n
                } else {
                    (self.sort_index + n - 1) % n
                };
            }
            FilterField::SortOrder => {
                self.sort_order = if forward { self.sort_order.next() } else { self.sort_order.prev() };
            }
            FilterField::Limit => {
                let next = i64::from(self.limit) + i64::from(delta);
                self.limit = next.clamp(i64::from(LIMIT_MIN), i64::from(LIMIT_MAX)) as u32;
            }
        }
    }

    /// Apply a filter edit. The shown report no longer matches the filters, so
    /// it is dropped and paging restarts from the first page.
    fn change_filter(&mut self, field: FilterField, delta: i32) {
        self.adjust(field, delta);
        self.page = PageState::default();
        self.report = None;
        self.error = None;
        self.selected_item = 0;
    }

    /// Page to fetch for `n` / `p`, or `None` when paging does not apply.
    ///
    /// Forward paging reads the page and limit the shown report was fetched
    /// with, never the current filter panel.
    fn paged(&self, forward: bool) -> Option<PageState> {
        if self.kind != ReportKind::Collection {
            return None;
        }
        let target = if forward {
            match &self.report {
                Some(Report::Collection(c)) if c.has_next => c.page.next(c.cards.len(), c.query.limit),
                _ => return None,
            }
        } else {
            self.page.prev()
        };
        (target != self.page).then_some(target)
    }

    fn item_count(&self) -> usize {
        self.report.as_ref().map(Report::len).unwrap_or(0)
    }

    fn select_item(&mut self, delta: i32) {
        let n = self.item_count();
        if n == 0 {
            self.selected_item = 0;
            return;
        }
        let cur = self.selected_item.min(n - 1);
        self.selected_item = if delta >= 0 {
            (cur + 1).min(n - 1)
        } else {
            cur.saturating_sub(1)
        };
    }

    /// Store the outcome of a fetch. Errors replace the previous report.
    fn apply(&mut self, result: Result<Report, AppError>) {
        match result {
            Ok(report) => {
                if let Report::Collection(c) = &report {
                    self.page = c.page;
                }
                self.report = Some(report);
                self.error = None;
                self.selected_item = 0;
            }
            Err(err) => {
                self.report = None;
                self.error = Some(err.to_string());
                self.selected_item = 0;
            }
        }
    }
}

struct App {
    client: UnleashClient,
    tabs: Vec<TabState>,
    active: usize,
    selected_field: usize,
    status: String,
    status_is_error: bool,
}

impl App {
    fn new(client: UnleashClient) -> Self {
        let status = format!("API: {} | Enter to fetch", client.base_url());
        Self {
            client,
            tabs: ReportKind::ALL.iter().map(|&k| TabState::new(k)).collect(),
            active: 0,
            selected_field: 0,
            status,
            status_is_error: false,
        }
    }

    fn tab(&self) -> &TabState {
        &self.tabs[self.active]
    }

    fn tab_mut(&mut self) -> &mut TabState {
        &mut self.tabs[self.active]
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                self.redraw(terminal)?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match self.handle_key(key.code) {
                        Action::Quit => break,
                        Action::Fetch => {
                            // Show the pending state before blocking on the request.
                            self.set_status(format!("Fetching {}...", self.tab().kind.display_name()), false);
                            self.redraw(terminal)?;
                            self.fetch_active();
                        }
                        Action::None => {}
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

    fn redraw<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        terminal
            .draw(|f| self.draw(f))
            .map(|_| ())
            .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))
    }

    fn set_status(&mut self, status: String, is_error: bool) {
        self.status = status;
        self.status_is_error = is_error;
    }

    fn handle_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
            KeyCode::Tab => self.active = (self.active + 1) % self.tabs.len(),
            KeyCode::BackTab => self.active = (self.active + self.tabs.len() - 1) % self.tabs.len(),
            KeyCode::Char(c @ '1'..='3') => self.active = (c as usize) - ('1' as usize),
            KeyCode::Up => self.selected_field = self.selected_field.saturating_sub(1),
            KeyCode::Down => self.selected_field = (self.selected_field + 1).min(FILTER_FIELDS.len() - 1),
            KeyCode::Left => self.adjust_selected(-1),
            KeyCode::Right => self.adjust_selected(1),
            KeyCode::Char('-') => self.adjust_limit(-10),
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_limit(10),
            KeyCode::Char('j') => self.tab_mut().select_item(1),
            KeyCode::Char('k') => self.tab_mut().select_item(-1),
            KeyCode::Enter | KeyCode::Char('f') => return Action::Fetch,
            KeyCode::Char('n') => return self.change_page(true),
            KeyCode::Char('p') => return self.change_page(false),
            _ => {}
        }
        Action::None
    }

    fn adjust_selected(&mut self, delta: i32) {
        let field = FILTER_FIELDS[self.selected_field];
        self.tab_mut().change_filter(field, delta);
    }

    fn adjust_limit(&mut self, delta: i32) {
        self.tab_mut().change_filter(FilterField::Limit, delta);
    }

    fn change_page(&mut self, forward: bool) -> Action {
        if self.tab().kind != ReportKind::Collection {
            return Action::None;
        }
        match self.tab().paged(forward) {
            Some(page) => {
                self.tab_mut().page = page;
                Action::Fetch
            }
            None => {
                let msg = if forward { "No further pages." } else { "Already on the first page." };
                self.set_status(msg.to_string(), false);
                Action::None
            }
        }
    }

    fn fetch_active(&mut self) {
        let tab = self.tab();
        let kind = tab.kind;
        let page = tab.page;
        let result = tab.query().and_then(|q| fetch_report(&self.client, kind, q, page));

        let status = match &result {
            Ok(report) => (format!("{}: {} result(s).", kind.display_name(), report.len()), false),
            Err(err) => {
                tracing::warn!(kind = ?kind, error = %err, "fetch failed");
                (err.to_string(), true)
            }
        };
        self.tab_mut().apply(result);
        self.set_status(status.0, status.1);
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_tabs(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<Line> = ReportKind::ALL
            .iter()
            .enumerate()
            .map(|(i, k)| Line::from(format!("{} {}", i + 1, k.display_name())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.active)
            .block(Block::default().borders(Borders::ALL).title("NFT Gaming Analytics"))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(34), Constraint::Min(0)])
            .split(area);

        self.draw_settings(frame, chunks[0]);
        self.draw_results(frame, chunks[1]);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let tab = self.tab();
        let mut items: Vec<ListItem> = FILTER_FIELDS
            .iter()
            .map(|f| {
                let value = match f {
                    FilterField::Blockchain => tab.blockchain.to_string(),
                    FilterField::TimeRange => tab.time_range.to_string(),
                    FilterField::SortBy => tab.sort_by().to_string(),
                    FilterField::SortOrder => tab.sort_order.to_string(),
                    FilterField::Limit => tab.limit.to_string(),
                };
                ListItem::new(format!("{}: {value}", filter_label(*f)))
            })
            .collect();

        if tab.kind == ReportKind::Collection {
            items.push(ListItem::new(Line::from(Span::styled(
                format!("Page: {} (offset {})", tab.page.display_number(), tab.page.offset()),
                Style::default().fg(Color::Gray),
            ))));
        }

        let list = List::new(items)
            .block(Block::default().title("Filters").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_results(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let tab = self.tab();
        let block = Block::default().title(tab.kind.display_name()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if let Some(err) = &tab.error {
            let msg = Paragraph::new(err.as_str())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(msg, inner);
            return;
        }

        match &tab.report {
            None => {
                let msg = Paragraph::new("No data yet. Adjust filters and press Enter to fetch.")
                    .style(Style::default().fg(Color::Yellow));
                frame.render_widget(msg, inner);
            }
            Some(Report::Wallet(r)) => draw_wallet(frame, inner, r, tab.selected_item),
            Some(Report::Collection(r)) => draw_collections(frame, inner, r, tab.selected_item),
            Some(Report::Trend(r)) => draw_trends(frame, inner, r, tab.selected_item),
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.tab().kind {
            ReportKind::Collection => "Tab switch  ↑/↓ field  ←/→ adjust  Enter fetch  n/p page  j/k select  q quit",
            ReportKind::Trend => "Tab switch  ↑/↓ field  ←/→ adjust  Enter fetch  j/k game  q quit",
            ReportKind::Wallet => "Tab switch  ↑/↓ field  ←/→ adjust  +/- limit  Enter fetch  j/k row  q quit",
        };
        let status_color = if self.status_is_error { Color::Red } else { Color::Yellow };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(status_color)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn filter_label(field: FilterField) -> &'static str {
    match field {
        FilterField::Blockchain => "Blockchain",
        FilterField::TimeRange => "Time Range",
        FilterField::SortBy => "Sort By",
        FilterField::SortOrder => "Sort Order",
        FilterField::Limit => "Results",
    }
}

fn draw_wallet(frame: &mut ratatui::Frame<'_>, area: Rect, report: &WalletReport, selected: usize) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(chunks[0]);
    for (rect, metric) in cards.iter().zip(&report.headline) {
        let color = match metric.value {
            Some(v) if v > 0.0 => Color::Green,
            Some(_) => Color::Red,
            None => Color::Gray,
        };
        let p = Paragraph::new(Span::styled(
            metric.display.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .block(Block::default().title(metric.label.clone()).borders(Borders::ALL));
        frame.render_widget(p, *rect);
    }

    if report.rows.is_empty() {
        frame.render_widget(Paragraph::new("No rows returned."), chunks[1]);
        return;
    }

    let widths: Vec<Constraint> = report
        .columns
        .iter()
        .map(|c| {
            let longest = report
                .rows
                .iter()
                .map(|r| r.field(c).text().chars().count())
                .max()
                .unwrap_or(0)
                .max(c.chars().count());
            Constraint::Length(longest.min(24) as u16)
        })
        .collect();

    let header = Row::new(report.columns.iter().map(|c| {
        Cell::from(c.clone()).style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    }));
    let rows = report
        .rows
        .iter()
        .map(|r| Row::new(report.columns.iter().map(|c| Cell::from(r.field(c).text()))));

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::White));
    let mut state = TableState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(table, chunks[1], &mut state);
}

fn draw_collections(frame: &mut ratatui::Frame<'_>, area: Rect, report: &CollectionReport, selected: usize) {
    const CARDS_PER_ROW: usize = 3;
    const CARD_HEIGHT: u16 = 4;

    let more = if report.has_next { " | n: next page" } else { "" };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Percentage(55), Constraint::Min(0)])
        .split(area);

    frame.render_widget(
        Paragraph::new(format!(
            "Page {} | {} collection(s){more}",
            report.page.display_number(),
            report.cards.len()
        ))
        .style(Style::default().fg(Color::Gray)),
        chunks[0],
    );

    if report.cards.is_empty() {
        frame.render_widget(Paragraph::new("No collections returned."), chunks[1]);
        return;
    }

    // Scroll the grid so the selected card's row stays visible.
    let grid = chunks[1];
    let visible_rows = (grid.height / CARD_HEIGHT).max(1) as usize;
    let selected_row = selected / CARDS_PER_ROW;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    let row_rects = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(grid);

    for (slot, row_rect) in row_rects.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 3); CARDS_PER_ROW])
            .split(*row_rect);
        for (col, rect) in cols.iter().enumerate() {
            let idx = (first_row + slot) * CARDS_PER_ROW + col;
            let Some(card) = report.cards.get(idx) else {
                continue;
            };
            let border = if idx == selected {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            let text = Text::from(vec![
                Line::from(Span::styled(
                    format!("{}: {}", card.sort_field, card.sort_value),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
            ]);
            let p = Paragraph::new(text).block(
                Block::default()
                    .title(card.title.clone())
                    .borders(Borders::ALL)
                    .border_style(border),
            );
            frame.render_widget(p, *rect);
        }
    }

    let Some(card) = report.cards.get(selected) else {
        return;
    };
    let details: Vec<ListItem> = card
        .details
        .iter()
        .map(|(field, value)| ListItem::new(format!("{field}: {value}")))
        .collect();
    let list = List::new(details).block(
        Block::default()
            .title(format!("Details: {}", card.title))
            .borders(Borders::ALL),
    );
    frame.render_widget(list, chunks[2]);
}

fn draw_trends(frame: &mut ratatui::Frame<'_>, area: Rect, report: &TrendReport, selected: usize) {
    if report.items.is_empty() {
        frame.render_widget(Paragraph::new("No trend items returned."), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(0)])
        .split(area);

    let items: Vec<ListItem> = report.items.iter().map(|i| ListItem::new(i.title.clone())).collect();
    let list = List::new(items)
        .block(Block::default().title("Games").borders(Borders::ALL))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
        .highlight_symbol("» ");
    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    if let Some(item) = report.items.get(selected) {
        draw_trend_item(frame, chunks[1], item);
    }
}

fn draw_trend_item(frame: &mut ratatui::Frame<'_>, area: Rect, item: &TrendItem) {
    if item.metrics.is_empty() {
        frame.render_widget(Paragraph::new(format!("{}: no trend metrics.", item.title)), area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    // Latest value + delta cards.
    let n = item.metrics.len() as u32;
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, n); n as usize])
        .split(chunks[0]);
    for (rect, metric) in cards.iter().zip(&item.metrics) {
        let mut spans = vec![Span::styled(
            metric.latest.value_display(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let (Some(delta), Some(text)) = (metric.latest.delta_pct, metric.latest.delta_display()) {
            let (arrow, color) = if delta >= 0.0 { ("▲", Color::Green) } else { ("▼", Color::Red) };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(format!("{arrow} {text}"), Style::default().fg(color)));
        }
        let p = Paragraph::new(Line::from(spans))
            .block(Block::default().title(metric.label.clone()).borders(Borders::ALL));
        frame.render_widget(p, *rect);
    }

    // Charts in a two-column grid.
    let rows = item.metrics.len().div_ceil(2);
    let row_rects = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(chunks[1]);
    for (r, row_rect) in row_rects.iter().enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 2); 2])
            .split(*row_rect);
        for (c, rect) in cols.iter().enumerate() {
            if let Some(metric) = item.metrics.get(r * 2 + c) {
                draw_chart(frame, *rect, item, metric, r * 2 + c);
            }
        }
    }
}

fn draw_chart(frame: &mut ratatui::Frame<'_>, area: Rect, item: &TrendItem, metric: &TrendMetric, index: usize) {
    let block = Block::default()
        .title(format!("{} Trend", metric.label))
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(Clear, inner);

    let Some(data) = chart_data(item, metric) else {
        frame.render_widget(
            Paragraph::new("No dated values to chart.").style(Style::default().fg(Color::Yellow)),
            inner,
        );
        return;
    };

    let widget = TrendPlottersChart {
        segments: &data.segments,
        x_bounds: data.x_bounds,
        y_bounds: data.y_bounds,
        y_label: &metric.label,
        color: SERIES_COLORS[index % SERIES_COLORS.len()],
        fmt_x: fmt_axis_date,
        fmt_y: fmt_axis_value,
    };
    frame.render_widget(widget, inner);
}

/// High-contrast palette for terminal readability (cyan, green, magenta, yellow).
const SERIES_COLORS: [RGBColor; 4] = [
    RGBColor(0, 255, 255),
    RGBColor(0, 255, 0),
    RGBColor(255, 0, 255),
    RGBColor(255, 255, 0),
];

/// Chart-ready segments and bounds for one metric.
#[derive(Debug, Clone, PartialEq)]
struct ChartData {
    segments: Vec<Vec<(f64, f64)>>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Split a metric into contiguous dated runs and compute padded bounds.
///
/// Returns `None` when no position has both a date and a value.
fn chart_data(item: &TrendItem, metric: &TrendMetric) -> Option<ChartData> {
    let mut segments: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();

    for (date, value) in item.dates.iter().zip(&metric.series.values) {
        match (date, value) {
            (Some(d), Some(v)) => current.push((d.and_utc().timestamp() as f64, *v)),
            _ => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    if segments.is_empty() {
        return None;
    }

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in segments.iter().flatten() {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    // A single date still needs a non-empty x range.
    if x_max <= x_min {
        x_min -= 86_400.0;
        x_max += 86_400.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-9);
    let (y_min, y_max) = if y_max <= y_min {
        (y_min - 1.0, y_max + 1.0)
    } else {
        (y_min - pad, y_max + pad)
    };

    Some(ChartData {
        segments,
        x_bounds: [x_min, x_max],
        y_bounds: [y_min, y_max],
    })
}

fn fmt_axis_date(v: f64) -> String {
    chrono::DateTime::from_timestamp(v as i64, 0)
        .map(|d| d.format("%m-%d").to_string())
        .unwrap_or_default()
}

fn fmt_axis_value(v: f64) -> String {
    crate::report::format_number(Some(v), false)
}
