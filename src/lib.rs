//! Time-of-day color palettes, blended and written to CSS style variables.

pub mod app;
pub mod clock;
pub mod color;
pub mod config;
pub mod events;
pub mod palette;
pub mod scheduler;
pub mod target;
pub mod tint;

pub use clock::{Clock, FixedClock, SystemClock, TimeOfDay};
pub use color::{ColorError, Rgb};
pub use palette::{blended_palette, locate, Palette, PaletteTable, Period, PeriodPosition};
pub use scheduler::{SchedulerHandle, Visibility};
pub use target::{apply_palette, StyleSheet, StyleTarget};
pub use tint::{Applied, Tinter, Trigger};
