//! Julian Date ↔ calendar conversions.
//!
//! Uses the Meeus algorithm (Astronomical Algorithms, ch. 7). Dates before
//! 1582-Oct-15 are interpreted on the Julian calendar, later dates on the
//! Gregorian calendar.

/// Julian Date of the Modified Julian Date zero point (1858-Nov-17 00:00).
pub const MJD_OFFSET: f64 = 2_400_000.5;

/// Julian Date of J2000.0 (2000-Jan-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// First Julian Day number of the Gregorian calendar (1582-Oct-15).
const GREGORIAN_START_JDN: f64 = 2_299_161.0;

/// Convert a Modified Julian Date to a Julian Date.
pub fn mjd_to_jd(mjd: f64) -> f64 {
    mjd + MJD_OFFSET
}

/// Convert a Julian Date to a Modified Julian Date.
pub fn jd_to_mjd(jd: f64) -> f64 {
    jd - MJD_OFFSET
}

/// Convert a calendar date to a Julian Date.
///
/// `day` carries the fraction of the day, so `1.5` is noon on the first.
pub fn calendar_to_jd(year: i32, month: u32, day: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year - 1, month + 12)
    } else {
        (year, month)
    };

    let gregorian = (year, month, day) >= (1582, 10, 15.0);
    let b = if gregorian {
        let a = (y as f64 / 100.0).floor();
        2.0 - a + (a / 4.0).floor()
    } else {
        0.0
    };

    (365.25 * (y as f64 + 4716.0)).floor() + (30.6001 * (m as f64 + 1.0)).floor() + day + b
        - 1524.5
}

/// Convert a Julian Date to `(year, month, day_with_fraction)`.
pub fn jd_to_calendar(jd: f64) -> (i32, u32, f64) {
    let jd = jd + 0.5;
    let z = jd.trunc();
    let f = jd - z;

    let a = if z < GREGORIAN_START_JDN {
        z
    } else {
        let alpha = ((z - 1_867_216.25) / 36_524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    };

    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = b - d - (30.6001 * e).floor() + f;
    let month = if e < 14.0 { e - 1.0 } else { e - 13.0 };
    let year = if month > 2.0 { c - 4716.0 } else { c - 4715.0 };

    (year as i32, month as u32, day)
}
