use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use daytint::app::App;
use daytint::clock::TimeOfDay;
use daytint::palette::Period;
use daytint::target::StyleSlot;

use super::colors;

const LABEL_WIDTH: usize = 16;
const MINUTES_PER_DAY: i64 = 24 * 60;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Timeline ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::MUTED));

    let columns = (area.width as usize).saturating_sub(2 + LABEL_WIDTH).max(1);
    let times: Vec<TimeOfDay> = (0..columns).map(|c| column_time(c, columns)).collect();
    let palettes: Vec<_> = times.iter().map(|t| app.table.blended_at(*t)).collect();

    let mut lines = Vec::new();
    lines.push(period_labels(&times));

    for slot in StyleSlot::ALL {
        let mut spans = vec![Span::styled(
            format!(" {:<width$}", slot.variable(), width = LABEL_WIDTH - 1),
            Style::default().fg(colors::LABEL),
        )];
        spans.extend(
            palettes
                .iter()
                .map(|p| Span::styled(" ", Style::default().bg(slot.color_in(p).into()))),
        );
        lines.push(Line::from(spans));
    }

    lines.push(cursor_marker(app.cursor(), columns));

    f.render_widget(Paragraph::new(lines).block(block), area);
}

/// Time at the left edge of column `col` when the day spans `columns` cells.
fn column_time(col: usize, columns: usize) -> TimeOfDay {
    TimeOfDay::from_minutes(col as i64 * MINUTES_PER_DAY / columns as i64)
}

/// Column holding `time`.
fn column_of(time: TimeOfDay, columns: usize) -> usize {
    let col = time.minutes_since_midnight() * columns as i64 / MINUTES_PER_DAY;
    (col as usize).min(columns - 1)
}

fn period_labels(times: &[TimeOfDay]) -> Line<'static> {
    let mut row = vec![' '; times.len()];
    let mut previous = None;
    for (col, time) in times.iter().enumerate() {
        let period = Period::ALL
            .into_iter()
            .find(|p| time.sample() < p.end())
            .unwrap_or(Period::Dusk);
        if previous != Some(period) {
            for (i, ch) in period.name().chars().enumerate() {
                if let Some(cell) = row.get_mut(col + i) {
                    *cell = ch;
                }
            }
            previous = Some(period);
        }
    }

    Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH)),
        Span::styled(row.into_iter().collect::<String>(), Style::default().fg(colors::ACCENT)),
    ])
}

fn cursor_marker(cursor: TimeOfDay, columns: usize) -> Line<'static> {
    let col = column_of(cursor, columns);
    Line::from(vec![
        Span::raw(" ".repeat(LABEL_WIDTH + col)),
        Span::styled(format!("▲ {}", cursor), Style::default().fg(colors::CURSOR)),
    ])
}
