//! Remaining-time decomposition and its zero-padded rendering.

use std::fmt;

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Labels of the four display fields, in display order.
pub const LABELS: [&str; 4] = ["Days", "Hours", "Minutes", "Seconds"];

/// Whole days, hours, minutes and seconds left until the target.
///
/// Built by truncation: 1.9 seconds left shows as `01` seconds.
///
/// # Examples
///
/// ```rust
/// use countdown_tea::remaining::RemainingDuration;
///
/// let left = RemainingDuration::from_millis(90_061_000);
/// assert_eq!(left.padded(), ["01", "01", "01", "01"]);
/// assert_eq!(left.to_string(), "01:01:01:01");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemainingDuration {
    /// Whole days.
    pub days: u64,
    /// Hours past the whole days, `0..24`.
    pub hours: u8,
    /// Minutes past the whole hours, `0..60`.
    pub minutes: u8,
    /// Seconds past the whole minutes, `0..60`.
    pub seconds: u8,
}

impl RemainingDuration {
    /// All fields zero.
    pub const ZERO: Self = Self {
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// Decomposes a millisecond difference. Zero or negative gives [`Self::ZERO`].
    pub fn from_millis(diff: i64) -> Self {
        if diff <= 0 {
            return Self::ZERO;
        }
        let days = diff / MILLIS_PER_DAY;
        let hours = (diff % MILLIS_PER_DAY) / MILLIS_PER_HOUR;
        let minutes = (diff % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
        let seconds = (diff % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;

        Self {
            days: days as u64,
            hours: hours as u8,
            minutes: minutes as u8,
            seconds: seconds as u8,
        }
    }

    /// Whether every field is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// The four fields zero-padded to at least two digits.
    pub fn padded(&self) -> [String; 4] {
        [
            format!("{:02}", self.days),
            format!("{:02}", self.hours),
            format!("{:02}", self.minutes),
            format!("{:02}", self.seconds),
        ]
    }

    /// The padded fields paired with their labels.
    pub fn labeled(&self) -> [(&'static str, String); 4] {
        let [days, hours, minutes, seconds] = self.padded();
        [
            (LABELS[0], days),
            (LABELS[1], hours),
            (LABELS[2], minutes),
            (LABELS[3], seconds),
        ]
    }
}

impl fmt::Display for RemainingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.days, self.hours, self.minutes, self.seconds
        )
    }
}
