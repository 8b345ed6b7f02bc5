//! Counting down to the next 25th of the month.

use time::{Date, Month};

use crate::Error;

/// The day of the month the salaries arrive and the month resets.
pub const CUTOFF_DAY: u8 = 25;

/// The number of days from `today` until the next 25th.
///
/// Before the 25th this is the distance to the 25th of the current month.
/// From the 25th onwards it is the number of calendar days until the 25th of
/// the following month, rolling December over into January of the next year.
/// The result is always at least one.
///
/// # Errors
/// Returns [Error::InvalidDate] if the next 25th is past the last supported date.
pub fn calculate_days_until_25(today: Date) -> Result<i64, Error> {
    if today.day() < CUTOFF_DAY {
        return Ok(i64::from(CUTOFF_DAY - today.day()));
    }

    let (year, month) = match today.month() {
        Month::December => (today.year() + 1, Month::January),
        month => (today.year(), month.next()),
    };

    let next_cutoff = Date::from_calendar_date(year, month, CUTOFF_DAY)
        .map_err(|error| Error::InvalidDate(error.to_string()))?;

    Ok((next_cutoff - today).whole_days())
}
