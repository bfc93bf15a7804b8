//! Calendar and epoch conversions for catalog cross-matching.
//!
//! This crate provides:
//! - Julian Date ↔ calendar conversions
//! - Modified Julian Date ↔ Julian Date
//! - MJD → fractional calendar year, the epoch unit used by proper motions

pub mod julian;
pub mod year;

pub use julian::{J2000_JD, MJD_OFFSET, calendar_to_jd, jd_to_calendar, jd_to_mjd, mjd_to_jd};
pub use year::{day_of_year, days_in_year, is_leap_year, mjd_to_year, mjds_to_years};
