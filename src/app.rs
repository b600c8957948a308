use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::clock::TimeOfDay;
use crate::palette::{locate, Palette, PaletteTable, PeriodPosition};
use crate::scheduler::Visibility;

/// Minutes the timeline cursor moves per key press.
pub const SCRUB_STEP: i64 = 15;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Refresh,
}

/// State of the terminal preview.
pub struct App {
    pub table: PaletteTable,
    pub should_quit: bool,

    // Clock reading as of the last tick.
    pub now: TimeOfDay,

    // Last palette the scheduler applied, and how many it has applied.
    pub live: Option<Palette>,
    pub applies: u64,

    // Timeline cursor. None follows the clock.
    pub scrub: Option<TimeOfDay>,

    pub visibility: Visibility,

    // One-line message for the status bar.
    pub status: Option<String>,
}

impl App {
    pub fn new(table: PaletteTable, now: TimeOfDay) -> Self {
        Self {
            table,
            should_quit: false,
            now,
            live: None,
            applies: 0,
            scrub: None,
            visibility: Visibility::Visible,
            status: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('r') => return Action::Refresh,
            KeyCode::Char('l') | KeyCode::Right => self.scrub_by(SCRUB_STEP),
            KeyCode::Char('h') | KeyCode::Left => self.scrub_by(-SCRUB_STEP),
            KeyCode::Char('L') | KeyCode::PageDown => self.scrub_by(60),
            KeyCode::Char('H') | KeyCode::PageUp => self.scrub_by(-60),
            KeyCode::Char('0') | KeyCode::Home => self.scrub = None,
            _ => {}
        }
        Action::None
    }

    fn scrub_by(&mut self, minutes: i64) {
        self.scrub = Some(self.cursor().add_minutes(minutes));
    }

    /// Time under the timeline cursor.
    pub fn cursor(&self) -> TimeOfDay {
        self.scrub.unwrap_or(self.now)
    }

    pub fn cursor_position(&self) -> PeriodPosition {
        locate(self.cursor().sample())
    }

    pub fn cursor_palette(&self) -> Palette {
        self.table.blended_at(self.cursor())
    }

    pub fn on_tick(&mut self, now: TimeOfDay) {
        self.now = now;
    }

    pub fn on_palette_applied(&mut self, palette: Palette) {
        self.live = Some(palette);
        self.applies += 1;
    }

    pub fn on_focus(&mut self, visibility: Visibility) {
        self.visibility = visibility;
    }

    pub fn on_table_reloaded(&mut self, table: PaletteTable) {
        self.table = table;
        self.status = Some("config reloaded".to_string());
    }

    pub fn on_config_error(&mut self, message: String) {
        self.status = Some(message);
    }
}

#[cfg(test)]
#[path = "../tests/helpers/mod.rs"]
#[allow(dead_code)]
mod helpers;

#[cfg(test)]
mod tests {
    use super::*;
    use super::helpers::*;
    use crate::palette::Period;

    fn app_at(hour: u32, minute: u32) -> App {
        App::new(PaletteTable::default(), at(hour, minute))
    }

    #[test]
    fn quit_keys() {
        let mut app = app_at(12, 0);
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = app_at(12, 0);
        app.handle_key(ctrl('c'));
        assert!(app.should_quit);
    }

    #[test]
    fn r_requests_a_refresh() {
        let mut app = app_at(12, 0);
        assert_eq!(app.handle_key(key(KeyCode::Char('r'))), Action::Refresh);
        assert_eq!(app.handle_key(key(KeyCode::Char('x'))), Action::None);
    }

    #[test]
    fn cursor_follows_clock_until_scrubbed() {
        let mut app = app_at(6, 30);
        assert_eq!(app.cursor(), at(6, 30));
        app.on_tick(at(6, 31));
        assert_eq!(app.cursor(), at(6, 31));

        app.handle_key(key(KeyCode::Right));
        app.on_tick(at(6, 32));
        assert_eq!(app.cursor(), at(6, 46));

        app.handle_key(key(KeyCode::Home));
        assert_eq!(app.cursor(), at(6, 32));
    }

    #[test]
    fn scrubbing_wraps_around_midnight() {
        let mut app = app_at(0, 10);
        app.handle_key(key(KeyCode::Left));
        assert_eq!(app.cursor(), at(23, 55));
        assert_eq!(app.cursor_position().current, Period::Dusk);

        app.handle_key(key(KeyCode::PageDown));
        assert_eq!(app.cursor(), at(0, 55));
        assert_eq!(app.cursor_position().current, Period::Night);
    }

    #[test]
    fn cursor_palette_uses_the_table() {
        let app = app_at(6, 30);
        assert_eq!(app.cursor_palette().red.to_hex(), "#259cb0");
    }

    #[test]
    fn applied_palettes_are_counted() {
        let mut app = app_at(0, 0);
        let palette = *app.table.palette(Period::Night);
        app.on_palette_applied(palette);
        app.on_palette_applied(palette);
        assert_eq!(app.live, Some(palette));
        assert_eq!(app.applies, 2);
    }

    #[test]
    fn reload_swaps_table_and_reports() {
        let mut app = app_at(0, 0);
        let dusk = *app.table.palette(Period::Dusk);
        app.on_table_reloaded(PaletteTable::default().with_palette(Period::Night, dusk));
        assert_eq!(app.cursor_palette(), dusk);
        assert_eq!(app.status.as_deref(), Some("config reloaded"));
    }

    #[test]
    fn focus_changes_are_tracked() {
        let mut app = app_at(0, 0);
        app.on_focus(Visibility::Hidden);
        assert_eq!(app.visibility, Visibility::Hidden);
    }
}
