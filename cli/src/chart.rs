use std::{io, time::Duration};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fuelmate_core::format::{format_currency, format_number};
use fuelmate_core::units::efficiency_label;
use fuelmate_core::{EfficiencyPoint, MonthlyStat, Settings, Vehicle};
use ratatui::{
    prelude::*,
    widgets::{
        Bar, BarChart, BarGroup, Block, BorderType, Borders, Gauge, Padding, Paragraph, Sparkline,
    },
};

const MONTHS_PER_PAGE: usize = 6;

// --- THEME ---
struct Theme {
    primary: Color,
    muted: Color,
    text: Color,
    cost: Color,
    fuel: Color,
    distance: Color,
}

const THEME: Theme = Theme {
    primary: Color::Cyan,
    muted: Color::DarkGray,
    text: Color::White,
    cost: Color::Red,
    fuel: Color::Blue,
    distance: Color::Green,
};

pub struct ChartApp {
    /// Oldest month first.
    pub months: Vec<MonthlyStat>,
    pub trend: Vec<EfficiencyPoint>,
    pub page: usize,
}

impl ChartApp {
    pub fn new(mut months: Vec<MonthlyStat>, trend: Vec<EfficiencyPoint>) -> Self {
        months.reverse();
        let mut app = Self { months, trend, page: 0 };
        app.page = app.page_count().saturating_sub(1);
        app
    }

    pub fn page_count(&self) -> usize {
        self.months.len().div_ceil(MONTHS_PER_PAGE)
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
        }
    }

    pub fn previous_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
        }
    }

    pub fn current_months(&self) -> &[MonthlyStat] {
        let start = self.page * MONTHS_PER_PAGE;
        let end = (start + MONTHS_PER_PAGE).min(self.months.len());
        &self.months[start.min(end)..end]
    }
}

pub fn run(
    vehicle: &Vehicle,
    months: Vec<MonthlyStat>,
    trend: Vec<EfficiencyPoint>,
    settings: &Settings,
) -> Result<()> {
    if months.is_empty() {
        println!("Add fuel entries to generate monthly reports.");
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = ChartApp::new(months, trend);

    loop {
        terminal.draw(|f| ui(f, &app, vehicle, settings))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Left | KeyCode::Char('h') => app.previous_page(),
                        KeyCode::Right | KeyCode::Char('l') => app.next_page(),
                        _ => {}
                    }
                }
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

fn ui(frame: &mut Frame, app: &ChartApp, vehicle: &Vehicle, settings: &Settings) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Chart + sidebar
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    let months = app.current_months();
    let (Some(first), Some(last)) = (months.first(), months.last()) else {
        frame.render_widget(
            Paragraph::new("No data available").alignment(Alignment::Center),
            main_layout[1],
        );
        return;
    };

    // --- Header ---
    let header_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(30)])
        .split(main_layout[0]);

    let title = Paragraph::new(Span::styled(
        vehicle.name.to_uppercase(),
        Style::default().fg(THEME.primary).add_modifier(Modifier::BOLD),
    ))
    .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(title, header_layout[0]);

    let range = format!(" {} - {} ", first.label(), last.label());
    let arrow = |enabled: bool| Style::default().fg(if enabled { THEME.text } else { THEME.muted });
    let nav_text = Line::from(vec![
        Span::styled(" < ", arrow(app.page > 0)),
        Span::styled(range, Style::default().fg(THEME.text).add_modifier(Modifier::BOLD)),
        Span::styled(" > ", arrow(app.page + 1 < app.page_count())),
    ]);
    let nav = Paragraph::new(nav_text)
        .alignment(Alignment::Right)
        .block(Block::default().padding(Padding::new(0, 0, 1, 0)));
    frame.render_widget(nav, header_layout[1]);
    frame.render_widget(
        Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(THEME.muted)),
        main_layout[0],
    );

    // --- Content ---
    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(70),
            Constraint::Length(1),
            Constraint::Percentage(30),
        ])
        .split(main_layout[1]);

    draw_chart(frame, months, content_chunks[0], settings);
    draw_info_panel(frame, app, months, content_chunks[2], settings);

    let help = Line::from(vec![
        Span::styled("NAV: ", Style::default().fg(THEME.muted)),
        Span::styled("←/→ ", Style::default().fg(THEME.text)),
        Span::raw("  "),
        Span::styled("QUIT: ", Style::default().fg(THEME.muted)),
        Span::styled("q", Style::default().fg(THEME.text)),
    ]);
    let footer = Paragraph::new(help)
        .alignment(Alignment::Center)
        .style(Style::default().fg(THEME.muted));
    frame.render_widget(footer, main_layout[2]);
}

/// Scales `value` to 0..=100 against the largest value on the page.
fn relative(value: f64, max: f64) -> u64 {
    if max > 0.0 {
        (value / max * 100.0).round() as u64
    } else {
        0
    }
}

fn draw_chart(frame: &mut Frame, months: &[MonthlyStat], area: Rect, settings: &Settings) {
    let max_cost = months.iter().map(|m| m.total_cost).fold(0.0, f64::max);
    let max_fuel = months.iter().map(|m| m.total_fuel).fold(0.0, f64::max);
    let max_distance = months.iter().map(|m| m.total_distance).fold(0.0, f64::max);

    let mut bars: Vec<Bar> = Vec::new();
    for month in months {
        bars.push(
            Bar::default()
                .value(relative(month.total_cost, max_cost))
                .style(Style::default().fg(THEME.cost))
                .text_value(format_number(month.total_cost.round())),
        );
        bars.push(
            Bar::default()
                .label(Line::from(month.label()))
                .value(relative(month.total_fuel, max_fuel))
                .style(Style::default().fg(THEME.fuel))
                .text_value(format_number(month.total_fuel.round())),
        );
        bars.push(
            Bar::default()
                .value(relative(month.total_distance, max_distance))
                .style(Style::default().fg(THEME.distance))
                .text_value(format_number(month.total_distance.round())),
        );
        // Spacer
        bars.push(Bar::default().value(0).text_value(String::new()));
    }

    let chart_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(THEME.muted))
        .title(format!(
            " Cost ({}) / Fuel ({}) / Distance ({}) ",
            settings.currency, settings.volume_unit, settings.distance_unit
        ));

    let chart = BarChart::default()
        .block(chart_block)
        .bar_width(5)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars))
        .max(100);

    frame.render_widget(chart, area);
}

fn draw_info_panel(
    frame: &mut Frame,
    app: &ChartApp,
    months: &[MonthlyStat],
    area: Rect,
    settings: &Settings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Totals
            Constraint::Length(3),  // Efficiency gauge
            Constraint::Min(3),     // Trend
        ])
        .split(area);

    let cost: f64 = months.iter().map(|m| m.total_cost).sum();
    let fuel: f64 = months.iter().map(|m| m.total_fuel).sum();
    let distance: f64 = months.iter().map(|m| m.total_distance).sum();
    let label = efficiency_label(settings.distance_unit, settings.volume_unit);
    let latest_efficiency = months.iter().rev().find_map(|m| m.efficiency);

    let bold = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);
    let info_text = vec![
        Line::from(vec![Span::styled("Overview", Style::default().add_modifier(Modifier::BOLD))]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Cost:     ", Style::default().fg(THEME.muted)),
            Span::styled(format_currency(cost, settings.currency), bold(THEME.cost)),
        ]),
        Line::from(vec![
            Span::styled("Fuel:     ", Style::default().fg(THEME.muted)),
            Span::styled(
                format!("{} {}", format_number(fuel), settings.volume_unit),
                bold(THEME.fuel),
            ),
        ]),
        Line::from(vec![
            Span::styled("Distance: ", Style::default().fg(THEME.muted)),
            Span::styled(
                format!("{} {}", format_number(distance), settings.distance_unit),
                bold(THEME.distance),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Latest:   ", Style::default().fg(THEME.muted)),
            Span::styled(
                latest_efficiency
                    .map(|e| format!("{:.2} {}", e, label))
                    .unwrap_or_else(|| "-".to_string()),
                Style::default().fg(THEME.text),
            ),
        ]),
    ];
    let info_block = Paragraph::new(info_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(THEME.muted))
            .title(" Summary "),
    );
    frame.render_widget(info_block, chunks[0]);

    // Latest month against the best month on record
    let best = app.months.iter().filter_map(|m| m.efficiency).fold(0.0, f64::max);
    let ratio = match latest_efficiency {
        Some(e) if best > 0.0 => (e / best).clamp(0.0, 1.0),
        _ => 0.0,
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(" vs Best Month ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted)),
        )
        .gauge_style(Style::default().fg(if ratio < 0.8 { THEME.cost } else { THEME.distance }))
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    frame.render_widget(gauge, chunks[1]);

    let trend: Vec<u64> = app.trend.iter().map(|p| (p.efficiency * 100.0).round() as u64).collect();
    let sparkline = Sparkline::default()
        .block(
            Block::default()
                .title(" Efficiency Trend ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(THEME.muted)),
        )
        .data(trend.iter().copied())
        .style(Style::default().fg(THEME.primary));
    frame.render_widget(sparkline, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn month(year: i32, m: u32) -> MonthlyStat {
        MonthlyStat::new(year, m, Utc::now())
    }

    #[test]
    fn test_starts_on_latest_page() {
        // Newest first, as the monthly report returns them
        let months: Vec<MonthlyStat> = (1..=8).rev().map(|m| month(2024, m)).collect();
        let app = ChartApp::new(months, Vec::new());
        assert_eq!(app.page_count(), 2);
        assert_eq!(app.page, 1);
        let current = app.current_months();
        assert_eq!(current.len(), 2);
        assert_eq!(current[0].month, 7);
        assert_eq!(current[1].month, 8);
    }

    #[test]
    fn test_paging_is_clamped() {
        let months: Vec<MonthlyStat> = (1..=8).rev().map(|m| month(2024, m)).collect();
        let mut app = ChartApp::new(months, Vec::new());
        app.next_page();
        assert_eq!(app.page, 1);
        app.previous_page();
        app.previous_page();
        assert_eq!(app.page, 0);
        assert_eq!(app.current_months()[0].month, 1);
    }

    #[test]
    fn test_relative_scale() {
        assert_eq!(relative(50.0, 200.0), 25);
        assert_eq!(relative(5.0, 0.0), 0);
    }
}
