//! Chrome colors for the preview. Palette colors come from the app.

use ratatui::style::Color;

pub const LABEL: Color = Color::Rgb(160, 160, 160);
pub const MUTED: Color = Color::Rgb(100, 100, 100);
pub const ACCENT: Color = Color::Rgb(120, 120, 180);
pub const CURSOR: Color = Color::Rgb(255, 220, 150);
pub const HIDDEN: Color = Color::Rgb(230, 160, 60);
pub const STATUS_BG: Color = Color::Rgb(60, 55, 50);
