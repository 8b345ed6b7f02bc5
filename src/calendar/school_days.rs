//! School holidays, public holidays and the canteen cost derived from them.

use time::{Date, Month, Weekday, macros::date};

use crate::Error;

/// A closed range of dates during which there is no school.
///
/// School resumes the day after `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HolidayInterval {
    /// The first day of the holiday.
    pub start: Date,
    /// The last day of the holiday.
    pub end: Date,
}

impl HolidayInterval {
    const fn new(start: Date, end: Date) -> Self {
        Self { start, end }
    }

    /// Whether `date` falls within the holiday, bounds included.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Zone C (Versailles / Ile-de-France) school holidays for the 2025-2026 school year.
pub const SCHOOL_HOLIDAYS: [HolidayInterval; 6] = [
    // Toussaint
    HolidayInterval::new(date!(2025 - 10 - 18), date!(2025 - 11 - 02)),
    // Noël
    HolidayInterval::new(date!(2025 - 12 - 20), date!(2026 - 01 - 04)),
    // Hiver
    HolidayInterval::new(date!(2026 - 02 - 21), date!(2026 - 03 - 08)),
    // Printemps
    HolidayInterval::new(date!(2026 - 04 - 18), date!(2026 - 05 - 03)),
    // Pont de l'Ascension
    HolidayInterval::new(date!(2026 - 05 - 14), date!(2026 - 05 - 17)),
    // Été
    HolidayInterval::new(date!(2026 - 07 - 04), date!(2026 - 08 - 31)),
];

/// French public holidays during the 2025-2026 school year.
pub const PUBLIC_HOLIDAYS: [Date; 11] = [
    date!(2025 - 11 - 01),
    date!(2025 - 11 - 11),
    date!(2025 - 12 - 25),
    date!(2026 - 01 - 01),
    date!(2026 - 04 - 06),
    date!(2026 - 05 - 01),
    date!(2026 - 05 - 08),
    date!(2026 - 05 - 14),
    date!(2026 - 05 - 25),
    date!(2026 - 07 - 14),
    date!(2026 - 08 - 15),
];

/// The price of a single canteen meal in cents.
const MEAL_PRICE_CENTS: i64 = 510;

/// Both girls eat at the canteen.
const MEALS_PER_DAY: i64 = 2;

/// Whether there is school on `date`.
///
/// A school day is a weekday that is neither a public holiday nor inside a
/// school holiday.
pub fn is_school_day(date: Date) -> bool {
    if matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday) {
        return false;
    }

    if PUBLIC_HOLIDAYS.contains(&date) {
        return false;
    }

    !SCHOOL_HOLIDAYS
        .iter()
        .any(|holiday| holiday.contains(date))
}

/// Count the days in `month` of `year` on which the canteen serves lunch.
///
/// The canteen is closed on Wednesdays, so only school days on the other
/// weekdays are counted.
///
/// # Errors
/// Returns [Error::InvalidDate] if `year` is outside the supported date range.
pub fn count_canteen_days(year: i32, month: Month) -> Result<u8, Error> {
    let mut date = Date::from_calendar_date(year, month, 1)
        .map_err(|error| Error::InvalidDate(error.to_string()))?;
    let mut count = 0;

    loop {
        if date.weekday() != Weekday::Wednesday && is_school_day(date) {
            count += 1;
        }

        match date.next_day() {
            Some(next_day) if next_day.month() == month => date = next_day,
            _ => break,
        }
    }

    Ok(count)
}

/// Calculate the girls' school canteen bill for `month` of `year`.
///
/// Two meals are paid for on every canteen day, which works out to 10.20 per
/// day. The amount is computed in whole cents so it is always exact to two
/// decimal places.
///
/// # Errors
/// Returns [Error::InvalidDate] if `year` is outside the supported date range.
pub fn calculate_girls_food(year: i32, month: Month) -> Result<f64, Error> {
    count_canteen_days(year, month).map(canteen_cost)
}

/// The canteen bill for `days` canteen days, exact to the cent.
pub fn canteen_cost(days: u8) -> f64 {
    let cents = i64::from(days) * MEALS_PER_DAY * MEAL_PRICE_CENTS;

    cents as f64 / 100.0
}


#[cfg(test)]
mod canteen_tests {
    use time::Month;

    use super::{calculate_girls_food, canteen_cost, count_canteen_days};

    #[test]
    fn october_2025() {
        // School days before Toussaint, excluding Wednesdays:
        // 2, 3, 6, 7, 9, 10, 13, 14, 16, 17.
        assert_eq!(count_canteen_days(2025, Month::October), Ok(10));
        assert_eq!(calculate_girls_food(2025, Month::October), Ok(102.0));
    }

    #[test]
    fn november_2025_skips_armistice() {
        // Four weeks of four canteen days starting on the 3rd, minus the 11th.
        assert_eq!(count_canteen_days(2025, Month::November), Ok(15));
        assert_eq!(calculate_girls_food(2025, Month::November), Ok(153.0));
    }

    #[test]
    fn summer_holiday_month_costs_nothing() {
        assert_eq!(count_canteen_days(2026, Month::August), Ok(0));
        assert_eq!(calculate_girls_food(2026, Month::August), Ok(0.0));
    }

    #[test]
    fn amount_is_rounded_to_cents() {
        let amount = calculate_girls_food(2025, Month::September).unwrap();

        assert_eq!((amount * 100.0).round() / 100.0, amount);
    }

    #[test]
    fn cost_is_two_meals_per_day() {
        assert_eq!(canteen_cost(0), 0.0);
        assert_eq!(canteen_cost(1), 10.2);
        assert_eq!(canteen_cost(3), 30.6);
    }

    #[test]
    fn is_idempotent() {
        let first = calculate_girls_food(2026, Month::March);
        let second = calculate_girls_food(2026, Month::March);

        assert_eq!(first, second);
    }
}
