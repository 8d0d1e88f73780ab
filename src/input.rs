//! User-entered countdown target and its conversion to an absolute instant.
//!
//! A [`TimerInput`] holds exactly what the user typed: a date, a 12-hour clock
//! time and an AM/PM [`Meridiem`]. [`TimerInput::target_instant`] turns that
//! into a [`TargetInstant`] in the local time zone.
//!
//! # Examples
//!
//! ```rust
//! use countdown_tea::input::{Meridiem, TimerInput};
//!
//! let input = TimerInput::new("2030-06-01", "12:00", Meridiem::Am);
//! let time = input.parse_time().unwrap();
//! assert_eq!(time.hour_24(input.meridiem), 0); // midnight
//! ```

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while interpreting a [`TimerInput`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// No date has been entered.
    #[error("no date selected")]
    MissingDate,
    /// No time has been entered.
    #[error("no time selected")]
    MissingTime,
    /// The date text is not a `YYYY-MM-DD` calendar date.
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
    /// The time text is not an `HH:MM` clock time.
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),
    /// The meridiem text is neither AM nor PM.
    #[error("invalid meridiem '{0}', expected AM or PM")]
    InvalidMeridiem(String),
    /// The local wall-clock time does not exist, even an hour later.
    #[error("{0} does not exist in the local time zone")]
    NonexistentLocalTime(NaiveDateTime),
}

/// The AM/PM designator of a 12-hour clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Meridiem {
    /// Before noon.
    #[default]
    #[serde(rename = "AM", alias = "am")]
    Am,
    /// After noon.
    #[serde(rename = "PM", alias = "pm")]
    Pm,
}

impl Meridiem {
    /// Returns the other designator.
    pub fn toggle(self) -> Self {
        match self {
            Meridiem::Am => Meridiem::Pm,
            Meridiem::Pm => Meridiem::Am,
        }
    }

    /// Converts an hour as typed into 24-hour form.
    ///
    /// `12 AM` becomes `0` and `1..=11 PM` gain twelve hours. Every other
    /// hour, including 24-hour values such as `0` or `17`, passes through.
    pub fn to_24_hour(self, hour: u32) -> u32 {
        match self {
            Meridiem::Am if hour == 12 => 0,
            Meridiem::Pm if hour < 12 => hour + 12,
            _ => hour,
        }
    }

    /// The label shown in the selector.
    pub fn as_str(self) -> &'static str {
        match self {
            Meridiem::Am => "AM",
            Meridiem::Pm => "PM",
        }
    }
}

impl fmt::Display for Meridiem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Meridiem {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" | "A" => Ok(Meridiem::Am),
            "PM" | "P" => Ok(Meridiem::Pm),
            _ => Err(InputError::InvalidMeridiem(s.to_string())),
        }
    }
}

/// A clock time exactly as entered, before the meridiem is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    /// Hour as typed, `0..=23`.
    pub hour: u32,
    /// Minute, `0..=59`.
    pub minute: u32,
}

impl ClockTime {
    /// The hour in 24-hour form under `meridiem`.
    pub fn hour_24(self, meridiem: Meridiem) -> u32 {
        meridiem.to_24_hour(self.hour)
    }
}

impl FromStr for ClockTime {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InputError::InvalidTime(s.to_string());
        let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u32 = hour.parse().map_err(|_| invalid())?;
        let minute: u32 = minute.parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }
        Ok(Self { hour, minute })
    }
}

/// The absolute instant a countdown runs towards, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetInstant(i64);

impl TargetInstant {
    /// Wraps an instant given in milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Milliseconds since the Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Signed milliseconds left between `now` and this instant.
    pub fn millis_from(self, now: i64) -> i64 {
        self.0.saturating_sub(now)
    }

    /// The instant as a local date-time, if it is representable.
    pub fn to_local(self) -> Option<DateTime<Local>> {
        Local.timestamp_millis_opt(self.0).single()
    }
}

impl fmt::Display for TargetInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_local() {
            Some(local) => write!(f, "{}", local.format("%Y-%m-%d %I:%M %p")),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// The target date and time as entered by the user.
///
/// Empty `date` or `time` text means the field has not been chosen yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TimerInput {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    /// Clock time, `HH:MM`.
    pub time: String,
    /// AM/PM designator applied to `time`.
    pub meridiem: Meridiem,
}

impl TimerInput {
    /// Creates an input from raw field values.
    pub fn new(date: impl Into<String>, time: impl Into<String>, meridiem: Meridiem) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            meridiem,
        }
    }

    /// Whether a date has been entered.
    pub fn has_date(&self) -> bool {
        !self.date.trim().is_empty()
    }

    /// Whether a time has been entered.
    pub fn has_time(&self) -> bool {
        !self.time.trim().is_empty()
    }

    /// Parses the date field.
    pub fn parse_date(&self) -> Result<NaiveDate, InputError> {
        if !self.has_date() {
            return Err(InputError::MissingDate);
        }
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| InputError::InvalidDate(self.date.clone()))
    }

    /// Parses the time field.
    pub fn parse_time(&self) -> Result<ClockTime, InputError> {
        if !self.has_time() {
            return Err(InputError::MissingTime);
        }
        self.time.parse()
    }

    /// Combines date, time and meridiem into a local instant at zero seconds.
    pub fn target_instant(&self) -> Result<TargetInstant, InputError> {
        self.target_instant_in(&Local)
    }

    /// Like [`target_instant`](Self::target_instant), with the wall clock
    /// read in `tz`.
    ///
    /// A time repeated by a fall-back transition takes its earlier instance.
    /// A time skipped by a spring-forward transition moves one hour later.
    pub fn target_instant_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<TargetInstant, InputError> {
        let date = self.parse_date()?;
        let time = self.parse_time()?;
        let naive_time = NaiveTime::from_hms_opt(time.hour_24(self.meridiem), time.minute, 0)
            .ok_or_else(|| InputError::InvalidTime(self.time.clone()))?;
        let naive = date.and_time(naive_time);

        let instant = tz
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| tz.from_local_datetime(&(naive + TimeDelta::hours(1))).earliest())
            .ok_or(InputError::NonexistentLocalTime(naive))?;

        Ok(TargetInstant(instant.timestamp_millis()))
    }

    /// Clears date and time and resets the meridiem.
    pub fn clear(&mut self, meridiem: Meridiem) {
        self.date.clear();
        self.time.clear();
        self.meridiem = meridiem;
    }
}
