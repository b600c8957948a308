use std::fmt;

use color_eyre::eyre::Result;

use crate::clock::{Clock, TimeOfDay};
use crate::palette::{locate, Palette, PaletteTable, PeriodPosition};
use crate::target::{apply_palette, StyleTarget};

/// Why a palette was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Timer,
    Visible,
    Manual,
    Reload,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Startup => write!(f, "startup"),
            Trigger::Timer => write!(f, "timer"),
            Trigger::Visible => write!(f, "visible"),
            Trigger::Manual => write!(f, "manual"),
            Trigger::Reload => write!(f, "reload"),
        }
    }
}

/// The outcome of one apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Applied {
    pub time: TimeOfDay,
    pub position: PeriodPosition,
    pub palette: Palette,
    pub trigger: Trigger,
}

/// Reads the clock, blends, and writes the result to a target.
pub struct Tinter<C, T> {
    table: PaletteTable,
    clock: C,
    target: T,
    applied: u64,
}

impl<C: Clock, T: StyleTarget> Tinter<C, T> {
    pub fn new(table: PaletteTable, clock: C, target: T) -> Self {
        Self {
            table,
            clock,
            target,
            applied: 0,
        }
    }

    /// Compute the palette for the current clock reading and apply it.
    ///
    /// The count of applies only advances when the target accepted the write.
    pub fn refresh(&mut self, trigger: Trigger) -> Result<Applied> {
        let time = self.clock.now();
        let position = locate(time.sample());
        let palette = self.table.blend_position(&position);

        apply_palette(&mut self.target, &palette)?;
        self.applied += 1;

        tracing::info!(
            period = %position.current,
            factor = position.factor,
            %trigger,
            "applied palette at {}:{:02}",
            time.hour(),
            time.minute(),
        );

        Ok(Applied {
            time,
            position,
            palette,
            trigger,
        })
    }

    pub fn replace_table(&mut self, table: PaletteTable) {
        self.table = table;
    }

    pub fn table(&self) -> &PaletteTable {
        &self.table
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn applied(&self) -> u64 {
        self.applied
    }

    pub fn into_target(self) -> T {
        self.target
    }
}
