use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use daytint::app::App;
use daytint::palette::Palette;
use daytint::target::StyleSlot;

use super::colors;

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let live_title = format!(" Applied ({}) ", app.applies);
    render_palette(f, &live_title, app.live.as_ref(), halves[0]);

    let position = app.cursor_position();
    let cursor_title = format!(
        " {} {} → {} {:.0}% ",
        app.cursor(),
        position.current,
        position.next,
        position.factor * 100.0
    );
    render_palette(f, &cursor_title, Some(&app.cursor_palette()), halves[1]);
}

fn render_palette(f: &mut Frame, title: &str, palette: Option<&Palette>, area: Rect) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::MUTED));

    let Some(palette) = palette else {
        let waiting = Paragraph::new(Line::from(Span::styled(
            "  Waiting for first apply",
            Style::default().fg(colors::MUTED),
        )))
        .block(block);
        f.render_widget(waiting, area);
        return;
    };

    let lines: Vec<Line> = StyleSlot::ALL
        .iter()
        .map(|slot| {
            let color = slot.color_in(palette);
            Line::from(vec![
                Span::raw(" "),
                Span::styled("      ", Style::default().bg(color.into())),
                Span::styled(
                    format!(" {:<16}", slot.variable()),
                    Style::default().fg(colors::LABEL),
                ),
                Span::styled(color.to_hex(), Style::default().add_modifier(Modifier::BOLD)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;
    use ratatui::Terminal;
    use daytint::clock::TimeOfDay;
    use daytint::palette::{PaletteTable, Period};

    fn row_text(backend: &TestBackend, row: u16) -> String {
        let buf = backend.buffer();
        (0..buf.area.width)
            .map(|x| buf[(x, row)].symbol().to_string())
            .collect()
    }

    #[test]
    fn applied_swatch_uses_palette_background() {
        let table = PaletteTable::default();
        let mut app = App::new(table.clone(), TimeOfDay::MIDNIGHT);
        app.on_palette_applied(*table.palette(Period::Night));

        let backend = TestBackend::new(80, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, &app, f.area())).unwrap();

        let backend = terminal.backend();
        // Row 1 is the first slot; the swatch starts after the border and a space.
        assert_eq!(backend.buffer()[(2, 1)].bg, Color::Rgb(0x1a, 0x1a, 0x2e));
        assert!(row_text(backend, 1).contains("--color-black"));
        assert!(row_text(backend, 4).contains("#16213e"));
        assert!(row_text(backend, 0).contains("Applied (1)"));
    }

    #[test]
    fn waits_until_something_was_applied() {
        let app = App::new(PaletteTable::default(), TimeOfDay::new(6, 30).unwrap());

        let backend = TestBackend::new(80, 6);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, &app, f.area())).unwrap();

        assert!(row_text(terminal.backend(), 1).contains("Waiting for first apply"));
        assert!(row_text(terminal.backend(), 0).contains("6:30 dawn → morning 50%"));
    }
}
