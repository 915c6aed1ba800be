use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset as ChartDataset, GraphType, Paragraph, Row,
        Table,
    },
    Frame, Terminal,
};
use std::io;

use balance_dashboard::{
    build_views, AnalyticsSummary, ChangeStatus, DashboardViews, Dataset, Selection,
    SelectionEvent, TableView,
};

const BAR_WIDTH: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Trend,
    Growth,
    Structure,
    Summary,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Trend => Page::Growth,
            Page::Growth => Page::Structure,
            Page::Structure => Page::Summary,
            Page::Summary => Page::Trend,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Trend => Page::Summary,
            Page::Growth => Page::Trend,
            Page::Structure => Page::Growth,
            Page::Summary => Page::Structure,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Trend => "Trend",
            Page::Growth => "Growth",
            Page::Structure => "Structure",
            Page::Summary => "Table & Summary",
        }
    }
}

pub struct App {
    pub dataset: Dataset,
    pub selection: Selection,
    pub views: DashboardViews,
    pub summary: Option<AnalyticsSummary>,
    pub current_page: Page,
}

impl App {
    pub fn new(dataset: Dataset) -> Self {
        let selection = Selection::all_years(&dataset);
        let views = build_views(&dataset, &selection);
        let summary = AnalyticsSummary::compute(&dataset);

        Self {
            dataset,
            selection,
            views,
            summary,
            current_page: Page::Trend,
        }
    }

    /// Apply one control change and rebuild every view input together.
    /// The previous `DashboardViews` generation is dropped on assignment.
    pub fn dispatch(&mut self, event: SelectionEvent) {
        self.selection.apply(&self.dataset, event);
        self.views = build_views(&self.dataset, &self.selection);
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => app.next_page(),
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char(c @ '1'..='9') => {
                    let idx = c as usize - '1' as usize;
                    if let Some(&year) = app.dataset.years().get(idx) {
                        app.dispatch(SelectionEvent::ToggleYear(year));
                    }
                }
                KeyCode::Char('a') => app.dispatch(SelectionEvent::SelectAllYears),
                KeyCode::Char('n') => app.dispatch(SelectionEvent::ClearYears),
                KeyCode::Char('u') => app.dispatch(SelectionEvent::ToggleUnits),
                KeyCode::Char('m') => app.dispatch(SelectionEvent::CycleMetric),
                KeyCode::Char('t') => app.dispatch(SelectionEvent::ToggleTrend),
                KeyCode::Char('s') => app.dispatch(SelectionEvent::CycleStructureYear),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with page tabs
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Trend => render_trend(f, chunks[1], app),
        Page::Growth => render_growth(f, chunks[1], app),
        Page::Structure => render_structure(f, chunks[1], app),
        Page::Summary => render_summary_page(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Trend, Page::Growth, Page::Structure, Page::Summary];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!(
            "Years: {}/{}",
            app.selection.years.len(),
            app.dataset.years().len()
        ),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        app.selection.units.label(),
        Style::default().fg(Color::Cyan),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        app.selection.metric.label(),
        Style::default().fg(Color::Green),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        if app.selection.show_trend {
            "trend on"
        } else {
            "trend off"
        },
        Style::default().fg(Color::Magenta),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Balance Dashboard "),
    );

    f.render_widget(header, area);
}

fn render_trend(f: &mut Frame, area: Rect, app: &App) {
    let trend = &app.views.trend;

    if trend.years.is_empty() {
        let empty = Paragraph::new("  No years selected (press 1-8 or 'a')")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", trend.title)),
            );
        f.render_widget(empty, area);
        return;
    }

    // Owned (x, y) point sets; the chart datasets borrow them
    let point_sets: Vec<Vec<(f64, f64)>> = trend
        .series
        .iter()
        .map(|series| {
            trend
                .years
                .iter()
                .zip(series.points.iter())
                .map(|(&year, &value)| (year as f64, value))
                .collect()
        })
        .collect();

    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for points in &point_sets {
        for &(_, y) in points {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    if min_y == max_y {
        min_y -= 1.0;
        max_y += 1.0;
    }
    let pad = (max_y - min_y) * 0.05;
    let (min_y, max_y) = (min_y - pad, max_y + pad);

    let first_year = *trend.years.first().unwrap_or(&0) as f64;
    let last_year = *trend.years.last().unwrap_or(&0) as f64;
    let (min_x, max_x) = if first_year == last_year {
        (first_year - 1.0, last_year + 1.0)
    } else {
        (first_year, last_year)
    };

    let datasets: Vec<ChartDataset> = trend
        .series
        .iter()
        .zip(point_sets.iter())
        .map(|(series, points)| {
            let marker = if series.label == "Trend" {
                symbols::Marker::Dot
            } else {
                symbols::Marker::Braille
            };
            ChartDataset::default()
                .name(series.label.clone())
                .marker(marker)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(hex_color(series.color)))
                .data(points)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", trend.title)),
        )
        .x_axis(
            Axis::default()
                .title(trend.x_title)
                .style(Style::default().fg(Color::Gray))
                .bounds([min_x, max_x])
                .labels(vec![
                    Span::raw(format!("{}", min_x as i64)),
                    Span::raw(format!("{}", max_x as i64)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(trend.y_title.clone())
                .style(Style::default().fg(Color::Gray))
                .bounds([min_y, max_y])
                .labels(vec![
                    Span::raw(format!("{:.1}", min_y)),
                    Span::raw(format!("{:.1}", max_y)),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_growth(f: &mut Frame, area: Rect, app: &App) {
    let growth = &app.views.growth;

    if growth.years.is_empty() {
        let empty = Paragraph::new("  No years selected (press 1-8 or 'a')")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", growth.title)),
            );
        f.render_widget(empty, area);
        return;
    }

    // Scale bars against the largest magnitude on screen
    let max_abs = growth
        .series
        .iter()
        .flat_map(|s| s.bars.iter())
        .map(|b| b.value.abs())
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let mut lines = vec![Line::from("")];
    for (idx, year) in growth.years.iter().enumerate() {
        lines.push(Line::from(Span::styled(
            format!("  {}", year),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));

        for series in &growth.series {
            let bar = &series.bars[idx];
            let len = ((bar.value.abs() / max_abs) * BAR_WIDTH as f64).round() as usize;
            let len = if bar.value != 0.0 { len.max(1) } else { 0 };
            let color = hex_color(bar.color);

            lines.push(Line::from(vec![
                Span::raw(format!("    {:<16}", series.label)),
                Span::styled("█".repeat(len), Style::default().fg(color)),
                Span::raw(" ".repeat(BAR_WIDTH.saturating_sub(len) + 1)),
                Span::styled(format!("{:>+7.1}%", bar.value), Style::default().fg(color)),
            ]));
        }
        lines.push(Line::from(""));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", growth.title)),
    );

    f.render_widget(paragraph, area);
}

fn render_structure(f: &mut Frame, area: Rect, app: &App) {
    let structure = &app.views.structure;

    let mut lines = vec![Line::from("")];
    if structure.slices.is_empty() {
        lines.push(Line::from(Span::styled(
            "  Selected year is not in the dataset",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for slice in &structure.slices {
        let color = hex_color(slice.color);
        let share = slice.share.unwrap_or(0.0);
        let len = ((share / 100.0) * (BAR_WIDTH * 2) as f64).round() as usize;

        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<20}", slice.label),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{:>8} thousand RUB  ", slice.value)),
            Span::styled(
                match slice.share {
                    Some(s) => format!("{:.1}%", s),
                    None => "—".to_string(),
                },
                Style::default().fg(color),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled("█".repeat(len), Style::default().fg(color)),
        ]));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "  Press 's' to cycle the structure year",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", structure.title)),
    );

    f.render_widget(paragraph, area);
}

fn render_summary_page(f: &mut Frame, area: Rect, app: &App) {
    let table_height = app.views.table.rows.len() as u16 + 4;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(table_height), Constraint::Min(0)])
        .split(area);

    render_metrics_table(f, chunks[0], &app.views.table);
    render_summary_text(f, chunks[1], app);
}

fn render_metrics_table(f: &mut Frame, area: Rect, table: &TableView) {
    let header_cells = [
        "Metric".to_string(),
        format!("{}", table.current_year),
        format!("{}", table.baseline_year),
        "Change".to_string(),
        "Status".to_string(),
    ]
    .into_iter()
    .map(|h| {
        Cell::from(h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = table.rows.iter().map(|row| {
        let color = status_color(row.status);
        let change_text = match row.change {
            Some(v) if v > 0.0 => format!("+{:.1}%", v),
            Some(v) => format!("{:.1}%", v),
            None => "—".to_string(),
        };

        let cells = vec![
            Cell::from(row.label),
            Cell::from(row.current.clone()),
            Cell::from(row.baseline.clone()),
            Cell::from(change_text).style(Style::default().fg(color)),
            Cell::from(row.status.label()).style(Style::default().fg(color)),
        ];

        Row::new(cells).height(1)
    });

    let widget = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Key Metrics ({}) ", table.unit_label)),
    );

    f.render_widget(widget, area);
}

fn render_summary_text(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from("")];

    match &app.summary {
        Some(summary) => {
            for section in summary.sections() {
                lines.push(Line::from(Span::styled(
                    format!("  {}", section.heading),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(format!("  {}", section.body)));
                lines.push(Line::from(""));
            }
        }
        None => {
            lines.push(Line::from(Span::styled(
                "  No growth data available",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Analytics Summary "),
    );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let years = app.selection.sorted_years();
    let years_text = if years.is_empty() {
        "none".to_string()
    } else {
        years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(",")
    };

    let status_spans = vec![
        Span::styled(
            format!(" [{}] ", years_text),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("| "),
        Span::styled("1-8", Style::default().fg(Color::Yellow)),
        Span::raw(" Years | "),
        Span::styled("a/n", Style::default().fg(Color::Yellow)),
        Span::raw(" All/None | "),
        Span::styled("u", Style::default().fg(Color::Yellow)),
        Span::raw(" Units | "),
        Span::styled("m", Style::default().fg(Color::Yellow)),
        Span::raw(" Metric | "),
        Span::styled("t", Style::default().fg(Color::Yellow)),
        Span::raw(" Trend | "),
        Span::styled("s", Style::default().fg(Color::Yellow)),
        Span::raw(" Year | "),
        Span::styled("Tab", Style::default().fg(Color::Yellow)),
        Span::raw(" Page | "),
        Span::styled("q", Style::default().fg(Color::Red)),
        Span::raw(" Quit"),
    ];

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn status_color(status: ChangeStatus) -> Color {
    match status {
        ChangeStatus::Positive => Color::Green,
        ChangeStatus::Negative => Color::Red,
        ChangeStatus::Neutral => Color::Gray,
    }
}

/// Map a "#RRGGBB" palette entry to a terminal color.
fn hex_color(hex: &str) -> Color {
    let parse = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
    };
    match (parse(1..3), parse(3..5), parse(5..7)) {
        (Some(r), Some(g), Some(b)) if hex.starts_with('#') => Color::Rgb(r, g, b),
        _ => Color::White,
    }
}
