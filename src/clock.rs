use std::fmt;
use std::str::FromStr;

use chrono::Timelike;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    #[error("hour out of range: {0} (expected 0-23)")]
    Hour(u32),
    #[error("minute out of range: {0} (expected 0-59)")]
    Minute(u32),
    #[error("invalid time {0:?} (expected HH:MM)")]
    Format(String),
}

/// A wall-clock reading with minute resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { hour: 0, minute: 0 };

    pub fn new(hour: u32, minute: u32) -> Result<Self, TimeError> {
        if hour > 23 {
            return Err(TimeError::Hour(hour));
        }
        if minute > 59 {
            return Err(TimeError::Minute(minute));
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    /// Wrap an arbitrary minute count (negative included) onto the 24h dial.
    pub fn from_minutes(total: i64) -> Self {
        let m = total.rem_euclid(24 * 60);
        Self {
            hour: (m / 60) as u8,
            minute: (m % 60) as u8,
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    pub fn minutes_since_midnight(&self) -> i64 {
        self.hour as i64 * 60 + self.minute as i64
    }

    /// Fractional hours, `hour + minute / 60`, in [0, 24).
    pub fn sample(&self) -> f64 {
        self.hour as f64 + self.minute as f64 / 60.0
    }

    pub fn add_minutes(&self, delta: i64) -> Self {
        Self::from_minutes(self.minutes_since_midnight() + delta)
    }
}

/// Formats as `H:MM`: hour unpadded, minute zero-padded.
impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format_err = || TimeError::Format(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(format_err)?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if h.is_empty() || m.len() != 2 || !digits(h) || !digits(m) {
            return Err(format_err());
        }
        let hour: u32 = h.parse().map_err(|_| format_err())?;
        let minute: u32 = m.parse().map_err(|_| format_err())?;
        TimeOfDay::new(hour, minute)
    }
}

/// Source of the current time of day.
pub trait Clock {
    fn now(&self) -> TimeOfDay;
}

/// The host's local wall clock, read fresh on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> TimeOfDay {
        let now = chrono::Local::now();
        TimeOfDay {
            hour: now.hour() as u8,
            minute: now.minute() as u8,
        }
    }
}

/// A clock pinned to one reading. Used by `show --at` and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub TimeOfDay);

impl Clock for FixedClock {
    fn now(&self) -> TimeOfDay {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> TimeOfDay {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_fields() {
        assert_eq!(TimeOfDay::new(24, 0), Err(TimeError::Hour(24)));
        assert_eq!(TimeOfDay::new(12, 60), Err(TimeError::Minute(60)));
        assert!(TimeOfDay::new(23, 59).is_ok());
    }

    #[test]
    fn sample_is_fractional_hours() {
        assert_eq!(TimeOfDay::new(6, 30).unwrap().sample(), 6.5);
        assert_eq!(TimeOfDay::MIDNIGHT.sample(), 0.0);
        let late = TimeOfDay::new(23, 59).unwrap().sample();
        assert!(late < 24.0 && late > 23.98);
    }

    #[test]
    fn display_zero_pads_minutes_only() {
        assert_eq!(TimeOfDay::new(6, 5).unwrap().to_string(), "6:05");
        assert_eq!(TimeOfDay::new(17, 40).unwrap().to_string(), "17:40");
    }

    #[test]
    fn parses_hh_mm() {
        assert_eq!("06:30".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(6, 30).unwrap());
        assert_eq!("6:30".parse::<TimeOfDay>().unwrap(), TimeOfDay::new(6, 30).unwrap());
        assert_eq!("24:00".parse::<TimeOfDay>(), Err(TimeError::Hour(24)));
        for bad in ["630", "6:3", ":30", "six:30", "6:30:00"] {
            assert!(bad.parse::<TimeOfDay>().is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn signed_parts_are_rejected() {
        for bad in ["+6:30", "6:+3", "-1:30", "6:-3"] {
            assert_eq!(
                bad.parse::<TimeOfDay>(),
                Err(TimeError::Format(bad.to_string())),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn minute_arithmetic_wraps_the_dial() {
        let t = TimeOfDay::new(23, 50).unwrap();
        assert_eq!(t.add_minutes(15), TimeOfDay::new(0, 5).unwrap());
        assert_eq!(TimeOfDay::MIDNIGHT.add_minutes(-1), TimeOfDay::new(23, 59).unwrap());
    }

    #[test]
    fn fixed_clock_returns_its_reading() {
        let t = TimeOfDay::new(9, 15).unwrap();
        assert_eq!(FixedClock(t).now(), t);
    }
}
