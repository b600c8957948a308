//! JSON configuration file.
//!
//! Every field is optional. Palette overrides replace whole periods and are
//! validated when the file is loaded, so a bad color never reaches the blend.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Event as NotifyEvent, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Deserialize;
use thiserror::Error;

use crate::color::{ColorError, Rgb};
use crate::palette::{Palette, PaletteTable, Period};
use crate::scheduler::DEFAULT_INTERVAL;
use crate::target::OutputFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("palette {period}.{slot}: {source}")]
    Color {
        period: Period,
        slot: &'static str,
        #[source]
        source: ColorError,
    },
    #[error("interval_secs must be at least 1")]
    Interval,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields, default)]
struct RawConfig {
    interval_secs: Option<u64>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    selector: Option<String>,
    palettes: BTreeMap<Period, RawPalette>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPalette {
    black: String,
    red: String,
    border: String,
    bg_alt: String,
}

impl RawPalette {
    fn validate(&self, period: Period) -> Result<Palette, ConfigError> {
        let color = |slot: &'static str, value: &str| {
            Rgb::from_hex(value).map_err(|source| ConfigError::Color {
                period,
                slot,
                source,
            })
        };
        Ok(Palette {
            black: color("black", &self.black)?,
            red: color("red", &self.red)?,
            border: color("border", &self.border)?,
            bg_alt: color("bg_alt", &self.bg_alt)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub interval: Duration,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub selector: String,
    pub table: PaletteTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            output: None,
            format: OutputFormat::Css,
            selector: ":root".to_string(),
            table: PaletteTable::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(text)?;
        let defaults = Config::default();

        let interval = match raw.interval_secs {
            Some(0) => return Err(ConfigError::Interval),
            Some(secs) => Duration::from_secs(secs),
            None => defaults.interval,
        };

        let mut table = defaults.table;
        for (period, palette) in &raw.palettes {
            table = table.with_palette(*period, palette.validate(*period)?);
        }

        Ok(Self {
            interval,
            output: raw.output,
            format: raw.format.unwrap_or(defaults.format),
            selector: raw.selector.unwrap_or(defaults.selector),
            table,
        })
    }
}

/// Watch a config file and call `on_change` whenever it is written or replaced.
///
/// The parent directory is watched so editors that save via rename are seen.
pub fn watch_config<F>(path: &Path, on_change: F) -> notify::Result<RecommendedWatcher>
where
    F: Fn(&Path) + Send + 'static,
{
    let file_name = path.file_name().map(|n| n.to_os_string());
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let target = path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<NotifyEvent>| {
        if let Ok(event) = res {
            if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                let touched = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                if touched {
                    on_change(&target);
                }
            }
        }
    })?;
    watcher.watch(&dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
