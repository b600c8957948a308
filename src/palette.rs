//! Time-of-day palettes and the interpolation between them.
//!
//! The day is split into six periods, each bound to one [`Palette`]. For a
//! given time the active period's palette is blended toward the next period's
//! palette in proportion to how far the time is through the active period, so
//! colors drift continuously and land on the next palette at the boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::TimeOfDay;
use crate::color::Rgb;

/// The four style colors that change over the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Palette {
    pub black: Rgb,
    pub red: Rgb,
    pub border: Rgb,
    pub bg_alt: Rgb,
}

impl Palette {
    /// Blend every color toward `other` with the same factor.
    pub fn blend(&self, other: &Palette, factor: f64) -> Palette {
        Palette {
            black: self.black.blend(other.black, factor),
            red: self.red.blend(other.red, factor),
            border: self.border.blend(other.border, factor),
            bg_alt: self.bg_alt.blend(other.bg_alt, factor),
        }
    }
}

/// A segment of the day, `[start, end)` in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Night,
    Dawn,
    Morning,
    Afternoon,
    Evening,
    Dusk,
}

impl Period {
    /// All periods in day order.
    pub const ALL: [Period; 6] = [
        Period::Night,
        Period::Dawn,
        Period::Morning,
        Period::Afternoon,
        Period::Evening,
        Period::Dusk,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn start(self) -> f64 {
        match self.index() {
            0 => 0.0,
            i => BOUNDARIES[i - 1],
        }
    }

    pub fn end(self) -> f64 {
        BOUNDARIES[self.index()]
    }

    /// The period after this one; dusk wraps to night.
    pub fn next(self) -> Period {
        Period::ALL[(self.index() + 1) % Period::ALL.len()]
    }

    pub fn name(self) -> &'static str {
        match self {
            Period::Night => "night",
            Period::Dawn => "dawn",
            Period::Morning => "morning",
            Period::Afternoon => "afternoon",
            Period::Evening => "evening",
            Period::Dusk => "dusk",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// End hour of each period, in `Period::ALL` order.
const BOUNDARIES: [f64; 6] = [5.0, 8.0, 12.0, 17.0, 21.0, 24.0];

// ── Built-in palettes ───────────────────────────────────────────────

const NIGHT: Palette = Palette {
    black: Rgb::from_u24(0x1a1a2e),
    red: Rgb::from_u24(0x8e44ad),
    border: Rgb::from_u24(0x2c2c54),
    bg_alt: Rgb::from_u24(0x16213e),
};

const DAWN: Palette = Palette {
    black: Rgb::from_u24(0x2c3e50),
    red: Rgb::from_u24(0x3498db),
    border: Rgb::from_u24(0xd5dbdb),
    bg_alt: Rgb::from_u24(0xfdf2e9),
};

const MORNING: Palette = Palette {
    black: Rgb::from_u24(0x2c3e50),
    red: Rgb::from_u24(0x16a085),
    border: Rgb::from_u24(0xd0d7de),
    bg_alt: Rgb::from_u24(0xf4f9f9),
};

const AFTERNOON: Palette = Palette {
    black: Rgb::from_u24(0x222222),
    red: Rgb::from_u24(0xc0392b),
    border: Rgb::from_u24(0xdddddd),
    bg_alt: Rgb::from_u24(0xf7f7f7),
};

const EVENING: Palette = Palette {
    black: Rgb::from_u24(0x2d3436),
    red: Rgb::from_u24(0xd35400),
    border: Rgb::from_u24(0xe0c9a6),
    bg_alt: Rgb::from_u24(0xfbeee0),
};

const DUSK: Palette = Palette {
    black: Rgb::from_u24(0x34495e),
    red: Rgb::from_u24(0x9b59b6),
    border: Rgb::from_u24(0xbdc3c7),
    bg_alt: Rgb::from_u24(0xecf0f1),
};

/// Where a time falls in the day cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodPosition {
    pub current: Period,
    pub next: Period,
    /// Progress through `current`, in [0, 1].
    pub factor: f64,
}

/// Locate the period containing `sample` (fractional hours).
///
/// Samples at or past 24 fall back to the end of dusk, heading into night.
pub fn locate(sample: f64) -> PeriodPosition {
    let mut start = 0.0;
    for (i, &end) in BOUNDARIES.iter().enumerate() {
        if sample < end {
            let current = Period::ALL[i];
            let factor = ((sample - start) / (end - start)).clamp(0.0, 1.0);
            return PeriodPosition {
                current,
                next: current.next(),
                factor,
            };
        }
        start = end;
    }

    PeriodPosition {
        current: Period::Dusk,
        next: Period::Night,
        factor: 1.0,
    }
}

/// One palette per period.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteTable {
    palettes: [Palette; 6],
}

impl Default for PaletteTable {
    fn default() -> Self {
        Self {
            palettes: [NIGHT, DAWN, MORNING, AFTERNOON, EVENING, DUSK],
        }
    }
}

impl PaletteTable {
    pub fn palette(&self, period: Period) -> &Palette {
        &self.palettes[period.index()]
    }

    /// Copy of this table with one period's palette replaced.
    pub fn with_palette(mut self, period: Period, palette: Palette) -> Self {
        self.palettes[period.index()] = palette;
        self
    }

    /// Blended palette for a position computed by [`locate`].
    pub fn blend_position(&self, position: &PeriodPosition) -> Palette {
        self.palette(position.current)
            .blend(self.palette(position.next), position.factor)
    }

    /// Compute the blended palette for a time of day.
    pub fn blended_at(&self, time: TimeOfDay) -> Palette {
        self.blend_position(&locate(time.sample()))
    }
}

/// Blended palette for `time` using the built-in table.
pub fn blended_palette(time: TimeOfDay) -> Palette {
    PaletteTable::default().blended_at(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(hour: u32, minute: u32) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    fn assert_close(actual: &Palette, expected: &Palette, tolerance: u8) {
        let pairs = [
            (actual.black, expected.black),
            (actual.red, expected.red),
            (actual.border, expected.border),
            (actual.bg_alt, expected.bg_alt),
        ];
        for (a, e) in pairs {
            for (x, y) in [(a.r, e.r), (a.g, e.g), (a.b, e.b)] {
                assert!(x.abs_diff(y) <= tolerance, "{a} not within {tolerance} of {e}");
            }
        }
    }

    #[test]
    fn periods_partition_the_day() {
        let mut expected_start = 0.0;
        for period in Period::ALL {
            assert_eq!(period.start(), expected_start);
            assert!(period.end() > period.start());
            expected_start = period.end();
        }
        assert_eq!(expected_start, 24.0);
    }

    #[test]
    fn next_wraps_from_dusk_to_night() {
        assert_eq!(Period::Night.next(), Period::Dawn);
        assert_eq!(Period::Dusk.next(), Period::Night);
    }

    #[test]
    fn midnight_is_exactly_night() {
        let pos = locate(0.0);
        assert_eq!(pos.current, Period::Night);
        assert_eq!(pos.factor, 0.0);
        assert_eq!(blended_palette(TimeOfDay::MIDNIGHT), NIGHT);
    }

    #[test]
    fn half_past_six_is_halfway_through_dawn() {
        let pos = locate(at(6, 30).sample());
        assert_eq!(pos.current, Period::Dawn);
        assert_eq!(pos.next, Period::Morning);
        assert!((pos.factor - 0.5).abs() < 1e-12);

        let p = blended_palette(at(6, 30));
        assert_eq!(p.black.to_hex(), "#2c3e50");
        assert_eq!(p.red.to_hex(), "#259cb0");
    }

    #[test]
    fn last_minute_of_the_day_approaches_night() {
        let pos = locate(at(23, 59).sample());
        assert_eq!(pos.current, Period::Dusk);
        assert_eq!(pos.next, Period::Night);
        assert!((pos.factor - 0.994).abs() < 0.001);
        assert_close(&blended_palette(at(23, 59)), &NIGHT, 2);
    }

    #[test]
    fn boundary_starts_the_next_period_fresh() {
        let pos = locate(8.0);
        assert_eq!(pos.current, Period::Morning);
        assert_eq!(pos.factor, 0.0);
        assert_eq!(blended_palette(at(8, 0)), MORNING);
    }

    #[test]
    fn approaching_a_boundary_converges_on_the_next_palette() {
        let table = PaletteTable::default();
        for period in Period::ALL {
            let just_before = period.end() - 1e-9;
            let blended = table.blend_position(&locate(just_before));
            assert_close(&blended, table.palette(period.next()), 1);
        }
    }

    #[test]
    fn out_of_range_sample_falls_back_to_dusk() {
        let pos = locate(24.0);
        assert_eq!(pos.current, Period::Dusk);
        assert_eq!(pos.next, Period::Night);
        assert_eq!(pos.factor, 1.0);
        assert_eq!(locate(31.5), pos);
    }

    #[test]
    fn with_palette_replaces_one_period() {
        let custom = Palette {
            black: Rgb::new(0, 0, 0),
            red: Rgb::new(255, 0, 0),
            border: Rgb::new(1, 1, 1),
            bg_alt: Rgb::new(2, 2, 2),
        };
        let table = PaletteTable::default().with_palette(Period::Night, custom);
        assert_eq!(*table.palette(Period::Night), custom);
        assert_eq!(*table.palette(Period::Dawn), DAWN);
        assert_eq!(table.blended_at(TimeOfDay::MIDNIGHT), custom);
    }

    proptest! {
        #[test]
        fn every_minute_has_one_position(minutes in 0i64..1440) {
            let t = TimeOfDay::from_minutes(minutes);
            let pos = locate(t.sample());
            prop_assert!((0.0..=1.0).contains(&pos.factor));
            prop_assert_eq!(pos.next, pos.current.next());
            let owners: Vec<_> = Period::ALL
                .iter()
                .filter(|p| p.start() <= t.sample() && t.sample() < p.end())
                .collect();
            prop_assert_eq!(owners, vec![&pos.current]);
        }
    }
}
