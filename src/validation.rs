//! Field-keyed validation of a [`TimerInput`].
//!
//! Validation never fails fast. Every field is checked and the messages are
//! collected into a [`ValidationErrors`] map, one message per field. A later
//! check on the same field replaces the earlier message rather than adding to
//! it, so a target in the past reports only the "future" message on `time`.

use crate::input::{InputError, TargetInstant, TimerInput};
use std::collections::BTreeMap;
use std::fmt;

/// Shown when the date field is empty.
pub const MSG_SELECT_DATE: &str = "Please select a date.";
/// Shown when the time field is empty.
pub const MSG_SELECT_TIME: &str = "Please select a time.";
/// Shown when the date text is not a calendar date.
pub const MSG_INVALID_DATE: &str = "Please enter a valid date (YYYY-MM-DD).";
/// Shown when the time text is not a clock time.
pub const MSG_INVALID_TIME: &str = "Please enter a valid time (HH:MM).";
/// Shown when the combined target is not after the current instant.
pub const MSG_FUTURE: &str = "Please select a future date and time.";

/// An input field that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// The target date.
    Date,
    /// The target time (and, through it, the combined instant).
    Time,
}

impl Field {
    /// Lower-case field key.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Time => "time",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation messages keyed by field. Empty means the input is valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    /// An empty, valid result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the message for `field`, replacing any earlier one.
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// The message for `field`, if it failed.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether `field` failed.
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Removes every message.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Failing fields and their messages, date first.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Checks `input` against the instant `now` (epoch milliseconds).
///
/// # Examples
///
/// ```rust
/// use countdown_tea::input::{Meridiem, TimerInput};
/// use countdown_tea::validation::{validate, Field};
///
/// let errors = validate(&TimerInput::default(), 0);
/// assert!(errors.contains(Field::Date));
/// assert!(errors.contains(Field::Time));
///
/// let past = TimerInput::new("2000-01-01", "10:00", Meridiem::Am);
/// let errors = validate(&past, i64::MAX);
/// assert_eq!(errors.get(Field::Time), Some("Please select a future date and time."));
/// ```
pub fn validate(input: &TimerInput, now: i64) -> ValidationErrors {
    validate_target(input, now).err().unwrap_or_default()
}

/// Like [`validate`], but hands back the combined instant when it is valid.
pub fn validate_target(input: &TimerInput, now: i64) -> Result<TargetInstant, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    match input.parse_date() {
        Err(InputError::MissingDate) => errors.insert(Field::Date, MSG_SELECT_DATE),
        Err(_) => errors.insert(Field::Date, MSG_INVALID_DATE),
        Ok(_) => {}
    }
    match input.parse_time() {
        Err(InputError::MissingTime) => errors.insert(Field::Time, MSG_SELECT_TIME),
        Err(_) => errors.insert(Field::Time, MSG_INVALID_TIME),
        Ok(_) => {}
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    match input.target_instant() {
        Ok(target) if target.as_millis() > now => Ok(target),
        Ok(_) => {
            errors.insert(Field::Time, MSG_FUTURE);
            Err(errors)
        }
        Err(_) => {
            errors.insert(Field::Time, MSG_INVALID_TIME);
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Meridiem;

    const FAR_FUTURE: &str = "2999-12-31";

    #[test]
    fn test_missing_date() {
        let input = TimerInput::new("", "10:00", Meridiem::Am);
        let errors = validate(&input, 0);
        assert_eq!(errors.get(Field::Date), Some(MSG_SELECT_DATE));
        assert!(!errors.contains(Field::Time));
    }

    #[test]
    fn test_missing_time() {
        let input = TimerInput::new(FAR_FUTURE, "", Meridiem::Pm);
        let errors = validate(&input, 0);
        assert_eq!(errors.get(Field::Time), Some(MSG_SELECT_TIME));
        assert!(!errors.contains(Field::Date));
    }

    #[test]
    fn test_missing_both() {
        let errors = validate(&TimerInput::default(), 0);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_past_target_reports_future_on_time() {
        let input = TimerInput::new("2001-01-01", "10:00", Meridiem::Am);
        let target = input.target_instant().unwrap();

        let errors = validate(&input, target.as_millis() + 1);
        assert_eq!(errors.get(Field::Time), Some(MSG_FUTURE));
        assert!(!errors.contains(Field::Date));
    }

    #[test]
    fn test_target_equal_to_now_is_rejected() {
        let input = TimerInput::new("2030-01-01", "10:00", Meridiem::Am);
        let target = input.target_instant().unwrap();

        let errors = validate(&input, target.as_millis());
        assert_eq!(errors.get(Field::Time), Some(MSG_FUTURE));

        let errors = validate(&input, target.as_millis() - 1);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_malformed_fields() {
        let input = TimerInput::new("31/12/2030", "ten", Meridiem::Am);
        let errors = validate(&input, 0);
        assert_eq!(errors.get(Field::Date), Some(MSG_INVALID_DATE));
        assert_eq!(errors.get(Field::Time), Some(MSG_INVALID_TIME));
    }

    #[test]
    fn test_insert_overwrites() {
        let mut errors = ValidationErrors::new();
        errors.insert(Field::Time, MSG_SELECT_TIME);
        errors.insert(Field::Time, MSG_FUTURE);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Time), Some(MSG_FUTURE));
    }

    #[test]
    fn test_validate_target_returns_instant() {
        let input = TimerInput::new("2030-01-01", "10:00", Meridiem::Am);
        let target = input.target_instant().unwrap();
        assert_eq!(validate_target(&input, 0), Ok(target));
        assert!(validate_target(&input, target.as_millis()).is_err());
    }

    #[test]
    fn test_display() {
        let errors = validate(&TimerInput::default(), 0);
        assert_eq!(
            errors.to_string(),
            "date: Please select a date.; time: Please select a time."
        );
    }
}
