//! Modified Julian Date → fractional calendar year.

use crate::julian::{jd_to_calendar, mjd_to_jd};

/// Cumulative day count at the start of each month in a common year.
const DAYS_BEFORE_MONTH: [u32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in the given calendar year (365 or 366).
pub fn days_in_year(year: i32) -> f64 {
    if is_leap_year(year) { 366.0 } else { 365.0 }
}

/// Ordinal day of the year, carrying the day fraction.
///
/// Jan 1 at 00:00 is `1.0`; Dec 31 at 12:00 of a common year is `365.5`.
pub fn day_of_year(year: i32, month: u32, day: f64) -> f64 {
    let idx = month.clamp(1, 12) as usize - 1;
    let mut before = DAYS_BEFORE_MONTH[idx];
    if month > 2 && is_leap_year(year) {
        before += 1;
    }
    before as f64 + day
}

/// Convert a Modified Julian Date to a fractional calendar year.
///
/// The integer part is the calendar year containing the date; the fraction
/// is the elapsed part of that year (leap years divide by 366). Non-finite
/// input returns NaN.
pub fn mjd_to_year(mjd: f64) -> f64 {
    if !mjd.is_finite() {
        return f64::NAN;
    }
    let (year, month, day) = jd_to_calendar(mjd_to_jd(mjd));
    year as f64 + (day_of_year(year, month, day) - 1.0) / days_in_year(year)
}

/// Element-wise [`mjd_to_year`].
pub fn mjds_to_years(mjds: &[f64]) -> Vec<f64> {
    mjds.iter().map(|&mjd| mjd_to_year(mjd)).collect()
}
