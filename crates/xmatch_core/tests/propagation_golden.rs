//! Regression values for epoch propagation, Gaia DR2 (J2015.5) back to
//! SDSS observation dates.

use xmatch_core::{
    Epoch, EpochRange, MatchError, ProperMotionRow, mjd_to_year, propagate_row, propagate_rows,
};

/// Same tolerance as numpy's `isclose` defaults.
fn is_close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-8 + 1e-5 * b.abs()
}

fn fixture_rows() -> Vec<ProperMotionRow> {
    let ra = [1.0, f64::NAN, 1.1];
    let dec = [3.0, f64::NAN, 2.3];
    let pmra = [3.0, f64::NAN, 8.5];
    let pmdec = [2.0, f64::NAN, 1.7];
    (0..3)
        .map(|i| ProperMotionRow {
            ra: ra[i],
            dec: dec[i],
            pmra: pmra[i],
            pmdec: pmdec[i],
            goodpm: true,
        })
        .collect()
}

fn fixture_range() -> EpochRange {
    EpochRange::new(
        Epoch::Year(2015.5),
        Epoch::MjdPerRow(vec![55_568.0, 55_614.0, 55_530.0]),
    )
}

#[test]
fn sequence_golden() {
    let out = propagate_rows(&fixture_rows(), &fixture_range()).expect("valid input");
    assert_eq!(out.len(), 3);

    assert!(is_close(out.ra[0], 0.99999624), "ra[0] = {}", out.ra[0]);
    assert!(is_close(out.dec[0], 2.9999975), "dec[0] = {}", out.dec[0]);
    assert!(is_close(out.ra[2], 1.099987), "ra[2] = {}", out.ra[2]);
    assert!(is_close(out.dec[2], 2.2999974), "dec[2] = {}", out.dec[2]);
}

#[test]
fn sequence_golden_exact_formula() {
    let out = propagate_rows(&fixture_rows(), &fixture_range()).expect("valid input");
    // MJD 55568 is 2011-Jan-01 00:00, exactly 4.5 years before J2015.5.
    let expected_ra = 1.0 - 4.5 * 3.0 / 3_600_000.0 / 3.0_f64.to_radians().cos();
    let expected_dec = 3.0 - 4.5 * 2.0 / 3_600_000.0;
    assert!((out.ra[0] - expected_ra).abs() < 1e-14);
    assert!((out.dec[0] - expected_dec).abs() < 1e-14);

    let dt = mjd_to_year(55_530.0) - 2015.5;
    let expected_ra = 1.1 + dt * 8.5 / 3_600_000.0 / 2.3_f64.to_radians().cos();
    assert!((out.ra[2] - expected_ra).abs() < 1e-14);
}

#[test]
fn nan_row_stays_nan_and_others_are_finite() {
    let out = propagate_rows(&fixture_rows(), &fixture_range()).expect("valid input");
    assert!(out.ra[1].is_nan());
    assert!(out.dec[1].is_nan());
    let finite = out.ra.iter().filter(|v| !v.is_nan()).count();
    assert_eq!(finite, 2);
}

#[test]
fn single_row_golden() {
    let row = ProperMotionRow {
        ra: 1.0,
        dec: 3.0,
        pmra: 3.0,
        pmdec: 2.0,
        goodpm: true,
    };
    let range = EpochRange::new(Epoch::Year(2015.5), Epoch::Mjd(55_568.0));
    let (ra, dec) = propagate_row(&row, &range).expect("valid input");
    assert!(is_close(ra, 0.99999624), "ra = {ra}");
    assert!(is_close(dec, 2.9999975), "dec = {dec}");
}

#[test]
fn single_row_with_untrusted_pm_is_an_error() {
    let row = ProperMotionRow {
        ra: 1.0,
        dec: 3.0,
        pmra: 3.0,
        pmdec: 2.0,
        goodpm: false,
    };
    let range = EpochRange::new(Epoch::Year(2015.5), Epoch::Mjd(55_568.0));
    assert_eq!(
        propagate_row(&row, &range),
        Err(MatchError::UnusableProperMotion)
    );
}

#[test]
fn year_and_mjd_forms_agree() {
    let rows = fixture_rows();
    let by_mjd = propagate_rows(&rows, &fixture_range()).expect("valid input");
    let years: Vec<f64> = [55_568.0, 55_614.0, 55_530.0]
        .iter()
        .map(|&m| mjd_to_year(m))
        .collect();
    let by_year = propagate_rows(
        &rows,
        &EpochRange::new(Epoch::Year(2015.5), Epoch::YearPerRow(years)),
    )
    .expect("valid input");
    assert_eq!(by_mjd.ra[0], by_year.ra[0]);
    assert_eq!(by_mjd.dec[2], by_year.dec[2]);
}
