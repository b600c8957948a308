//! Presentation targets for a blended palette.
//!
//! A palette is applied by assigning its four colors to four named style
//! variables. Targets decide where those variables live: an in-memory sheet,
//! a stylesheet file, or several of those at once.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;

use crate::color::Rgb;
use crate::palette::Palette;

/// The named style variables a palette is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleSlot {
    Black,
    Red,
    Border,
    BgAlt,
}

impl StyleSlot {
    pub const ALL: [StyleSlot; 4] = [StyleSlot::Black, StyleSlot::Red, StyleSlot::Border, StyleSlot::BgAlt];

    /// CSS custom property name.
    pub fn variable(self) -> &'static str {
        match self {
            StyleSlot::Black => "--color-black",
            StyleSlot::Red => "--color-red",
            StyleSlot::Border => "--color-border",
            StyleSlot::BgAlt => "--color-bg-alt",
        }
    }

    pub fn color_in(self, palette: &Palette) -> Rgb {
        match self {
            StyleSlot::Black => palette.black,
            StyleSlot::Red => palette.red,
            StyleSlot::Border => palette.border,
            StyleSlot::BgAlt => palette.bg_alt,
        }
    }
}

/// Anything a palette can be applied to.
pub trait StyleTarget {
    fn apply(&mut self, palette: &Palette) -> Result<()>;
}

impl<T: StyleTarget + ?Sized> StyleTarget for Box<T> {
    fn apply(&mut self, palette: &Palette) -> Result<()> {
        (**self).apply(palette)
    }
}

/// Apply `palette` to a target.
pub fn apply_palette<T: StyleTarget + ?Sized>(target: &mut T, palette: &Palette) -> Result<()> {
    target.apply(palette)
}

// ── In-memory style scope ───────────────────────────────────────────

/// Ordered custom properties, like a `:root` rule's declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSheet {
    properties: Vec<(String, String)>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, overwriting in place if it already exists.
    pub fn set_property(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.properties.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value.to_string();
        } else {
            self.properties.push((name.to_string(), value.to_string()));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn render(&self, formatter: &dyn StyleFormatter) -> String {
        formatter.format(self)
    }
}

impl StyleTarget for StyleSheet {
    fn apply(&mut self, palette: &Palette) -> Result<()> {
        for slot in StyleSlot::ALL {
            self.set_property(slot.variable(), &slot.color_in(palette).to_hex());
        }
        Ok(())
    }
}

// ── Formatters ──────────────────────────────────────────────────────

/// Trait for rendering a style sheet.
/// Implement this to add new output formats.
pub trait StyleFormatter {
    fn format(&self, sheet: &StyleSheet) -> String;
}

/// A single CSS rule holding every property.
#[derive(Debug, Clone)]
pub struct CssFormatter {
    pub selector: String,
}

impl Default for CssFormatter {
    fn default() -> Self {
        Self {
            selector: ":root".to_string(),
        }
    }
}

impl StyleFormatter for CssFormatter {
    fn format(&self, sheet: &StyleSheet) -> String {
        let mut output = format!("{} {{\n", self.selector);
        for (name, value) in sheet.properties() {
            output.push_str(&format!("  {}: {};\n", name, value));
        }
        output.push_str("}\n");
        output
    }
}

/// A flat JSON object of property name to value.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter;

impl StyleFormatter for JsonFormatter {
    fn format(&self, sheet: &StyleSheet) -> String {
        let map: serde_json::Map<String, serde_json::Value> = sheet
            .properties()
            .map(|(n, v)| (n.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        let mut output = serde_json::Value::Object(map).to_string();
        output.push('\n');
        output
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Css,
    Json,
}

impl OutputFormat {
    pub fn formatter(self, selector: &str) -> Box<dyn StyleFormatter + Send> {
        match self {
            OutputFormat::Css => Box::new(CssFormatter {
                selector: selector.to_string(),
            }),
            OutputFormat::Json => Box::new(JsonFormatter),
        }
    }
}

// ── File target ─────────────────────────────────────────────────────

/// Keeps a stylesheet file on disk in sync with the applied palette.
pub struct StylesheetFile {
    path: PathBuf,
    formatter: Box<dyn StyleFormatter + Send>,
    sheet: StyleSheet,
    last_written: Option<String>,
}

impl StylesheetFile {
    pub fn new(path: impl Into<PathBuf>, formatter: Box<dyn StyleFormatter + Send>) -> Self {
        Self {
            path: path.into(),
            formatter,
            sheet: StyleSheet::new(),
            last_written: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sheet(&self) -> &StyleSheet {
        &self.sheet
    }
}

impl StyleTarget for StylesheetFile {
    fn apply(&mut self, palette: &Palette) -> Result<()> {
        self.sheet.apply(palette)?;
        let content = self.sheet.render(self.formatter.as_ref());
        if self.last_written.as_deref() == Some(content.as_str()) && self.path.exists() {
            return Ok(());
        }
        write_atomic(&self.path, &content)?;
        tracing::debug!(path = %self.path.display(), "stylesheet written");
        self.last_written = Some(content);
        Ok(())
    }
}

/// Write through a sibling temp file so readers never see a partial file.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, content).wrap_err_with(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).wrap_err_with(|| format!("Failed to replace {}", path.display()))?;
    Ok(())
}

// ── Fan-out ─────────────────────────────────────────────────────────

/// Applies to every target in order, even when an earlier one fails.
/// The first failure is returned.
#[derive(Default)]
pub struct Fanout {
    targets: Vec<Box<dyn StyleTarget + Send>>,
}

impl Fanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, target: impl StyleTarget + Send + 'static) {
        self.targets.push(Box::new(target));
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl StyleTarget for Fanout {
    fn apply(&mut self, palette: &Palette) -> Result<()> {
        let mut first_err = None;
        for target in &mut self.targets {
            if let Err(e) = target.apply(palette) {
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
