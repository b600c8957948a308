use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use color_eyre::eyre::{eyre, Result};
use crossterm::event::{self, Event, KeyEvent};

use crate::palette::Palette;
use crate::scheduler::Visibility;
use crate::target::StyleTarget;

/// Unified application event.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Focus(Visibility),
    PaletteApplied(Palette),
    ConfigChanged(PathBuf),
    Tick,
}

/// Spawn a thread that polls crossterm key and focus events and sends them to the channel.
pub fn spawn_input_reader(tx: mpsc::Sender<AppEvent>) {
    std::thread::spawn(move || loop {
        if event::poll(Duration::from_millis(50)).unwrap_or(false) {
            let app_event = match event::read() {
                Ok(Event::Key(key)) => AppEvent::Key(key),
                Ok(Event::FocusGained) => AppEvent::Focus(Visibility::Visible),
                Ok(Event::FocusLost) => AppEvent::Focus(Visibility::Hidden),
                _ => continue,
            };
            if tx.send(app_event).is_err() {
                break;
            }
        }
    });
}

/// Spawn a tick timer that sends Tick events at the given interval.
pub fn spawn_tick_timer(tx: mpsc::Sender<AppEvent>, interval: Duration) {
    std::thread::spawn(move || loop {
        std::thread::sleep(interval);
        if tx.send(AppEvent::Tick).is_err() {
            break;
        }
    });
}

/// Forwards every applied palette to the UI loop.
pub struct ChannelTarget {
    tx: mpsc::Sender<AppEvent>,
}

impl ChannelTarget {
    pub fn new(tx: mpsc::Sender<AppEvent>) -> Self {
        Self { tx }
    }
}

impl StyleTarget for ChannelTarget {
    fn apply(&mut self, palette: &Palette) -> Result<()> {
        self.tx
            .send(AppEvent::PaletteApplied(*palette))
            .map_err(|_| eyre!("preview window closed"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TimeOfDay;
    use crate::palette::blended_palette;

    #[test]
    fn channel_target_forwards_palettes() {
        let (tx, rx) = mpsc::channel();
        let mut target = ChannelTarget::new(tx);
        let palette = blended_palette(TimeOfDay::MIDNIGHT);
        target.apply(&palette).unwrap();
        match rx.try_recv().unwrap() {
            AppEvent::PaletteApplied(p) => assert_eq!(p, palette),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn channel_target_fails_once_receiver_is_gone() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let mut target = ChannelTarget::new(tx);
        assert!(target.apply(&blended_palette(TimeOfDay::MIDNIGHT)).is_err());
    }
}
