use std::sync::{Arc, Mutex};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::clock::{Clock, TimeOfDay};
use crate::palette::Palette;
use crate::target::StyleTarget;

/// Shorthand for a valid time of day.
pub fn at(hour: u32, minute: u32) -> TimeOfDay {
    TimeOfDay::new(hour, minute).unwrap()
}

/// A plain key press.
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

/// A Ctrl+<c> key press.
pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

/// A clock the test can move while something else holds it.
#[derive(Clone)]
pub struct ManualClock(Arc<Mutex<TimeOfDay>>);

impl ManualClock {
    pub fn new(time: TimeOfDay) -> Self {
        Self(Arc::new(Mutex::new(time)))
    }

    pub fn set(&self, time: TimeOfDay) {
        *self.0.lock().unwrap() = time;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> TimeOfDay {
        *self.0.lock().unwrap()
    }
}

/// Records every palette it receives.
#[derive(Clone, Default)]
pub struct RecordingTarget(Arc<Mutex<Vec<Palette>>>);

impl RecordingTarget {
    pub fn palettes(&self) -> Vec<Palette> {
        self.0.lock().unwrap().clone()
    }
}

impl StyleTarget for RecordingTarget {
    fn apply(&mut self, palette: &Palette) -> color_eyre::eyre::Result<()> {
        self.0.lock().unwrap().push(*palette);
        Ok(())
    }
}
