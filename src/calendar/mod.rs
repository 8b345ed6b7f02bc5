//! The school-day calendar.
//!
//! This module answers two questions for the rest of the app:
//! - How much will the school canteen cost this month?
//! - How many days are left until the next 25th, when the salaries come in?

mod cutoff;
mod school_days;

pub use cutoff::{CUTOFF_DAY, calculate_days_until_25};
pub use school_days::{
    HolidayInterval, PUBLIC_HOLIDAYS, SCHOOL_HOLIDAYS, calculate_girls_food, canteen_cost,
    count_canteen_days, is_school_day,
};

use time::Month;

use crate::Error;

/// Convert a month number (1 for January through 12 for December) to a [Month].
///
/// # Errors
/// Returns [Error::InvalidDate] if `month` is not in the range 1-12.
pub fn month_from_number(month: u8) -> Result<Month, Error> {
    Month::try_from(month).map_err(|error| Error::InvalidDate(error.to_string()))
}

#[cfg(test)]
mod month_from_number_tests {
    use time::Month;

    use crate::{Error, calendar::month_from_number};

    #[test]
    fn converts_valid_month_numbers() {
        assert_eq!(month_from_number(1), Ok(Month::January));
        assert_eq!(month_from_number(12), Ok(Month::December));
    }

    #[test]
    fn rejects_out_of_range_month_numbers() {
        assert!(matches!(month_from_number(0), Err(Error::InvalidDate(_))));
        assert!(matches!(month_from_number(13), Err(Error::InvalidDate(_))));
    }
}
