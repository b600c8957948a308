pub mod colors;
pub mod swatches;
pub mod timeline;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use daytint::app::App;
use daytint::scheduler::Visibility;

pub fn render(f: &mut Frame, app: &App) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),     // top: applied + cursor swatches
            Constraint::Min(8),        // timeline
            Constraint::Length(1),     // status bar
        ])
        .split(f.area());

    swatches::render(f, app, outer[0]);
    timeline::render(f, app, outer[1]);
    render_status_bar(f, app, outer[2]);
}

fn render_status_bar(f: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    use ratatui::style::{Color, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::Paragraph;

    let mut spans = vec![
        Span::styled(" [q]", Style::default().fg(Color::DarkGray)),
        Span::raw("uit "),
        Span::styled("[r]", Style::default().fg(Color::DarkGray)),
        Span::raw("efresh "),
        Span::styled("[h/l]", Style::default().fg(Color::DarkGray)),
        Span::raw("scrub "),
        Span::styled("[0]", Style::default().fg(Color::DarkGray)),
        Span::raw("now "),
        Span::raw(format!(" {} ", app.now)),
    ];

    if app.visibility == Visibility::Hidden {
        spans.push(Span::styled("hidden ", Style::default().fg(colors::HIDDEN)));
    }
    if let Some(ref status) = app.status {
        spans.push(Span::styled(status.clone(), Style::default().fg(colors::CURSOR)));
    }

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(colors::STATUS_BG).fg(Color::White)),
        area,
    );
}
