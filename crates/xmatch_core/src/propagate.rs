//! Linear proper-motion propagation of catalog positions between epochs.
//!
//! Positions move by `Δt · μ` on a flat sky: `Δdec = Δt · μδ` and
//! `Δra = Δt · μα* / cos(dec)`, with μ in mas/yr and Δt in years. The
//! approximation is good for the few-arcsecond shifts of a decade-scale
//! epoch change away from the poles.
//!
//! Both ends of an [`EpochRange`] are given either as fractional years or as
//! MJDs (converted with [`xmatch_time::mjd_to_year`]), and either once for
//! every row or per row.

use rayon::prelude::*;
use xmatch_time::mjd_to_year;

use crate::catalog::{CatalogRow, columns};
use crate::error::{EpochSide, MatchError};
use crate::table::{Column, Table};

/// Milliarcseconds per degree.
pub const MAS_PER_DEG: f64 = 3_600_000.0;

/// One end of an epoch range, in whichever representation the caller has.
#[derive(Debug, Clone, PartialEq)]
pub enum Epoch {
    /// Fractional year applied to every row.
    Year(f64),
    /// Modified Julian Date applied to every row.
    Mjd(f64),
    /// Fractional year per row.
    YearPerRow(Vec<f64>),
    /// Modified Julian Date per row.
    MjdPerRow(Vec<f64>),
}

impl Epoch {
    fn resolve(&self, rows: usize) -> Result<Years, MatchError> {
        Ok(match self {
            Self::Year(y) => Years::Uniform(*y),
            Self::Mjd(mjd) => Years::Uniform(mjd_to_year(*mjd)),
            Self::YearPerRow(ys) => {
                check_row_count(ys, rows)?;
                Years::PerRow(ys.clone())
            }
            Self::MjdPerRow(mjds) => {
                check_row_count(mjds, rows)?;
                Years::PerRow(mjds.iter().map(|&m| mjd_to_year(m)).collect())
            }
        })
    }
}

fn check_row_count(values: &[f64], rows: usize) -> Result<(), MatchError> {
    if values.len() != rows {
        return Err(MatchError::LengthMismatch {
            expected: rows,
            found: values.len(),
        });
    }
    Ok(())
}

enum Years {
    Uniform(f64),
    PerRow(Vec<f64>),
}

impl Years {
    fn at(&self, i: usize) -> f64 {
        match self {
            Self::Uniform(y) => *y,
            Self::PerRow(ys) => ys[i],
        }
    }
}

/// Source and target epochs of a propagation.
///
/// A side left as `None` is a contract violation reported as
/// [`MatchError::MissingEpoch`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EpochRange {
    pub from: Option<Epoch>,
    pub to: Option<Epoch>,
}

impl EpochRange {
    pub fn new(from: Epoch, to: Epoch) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn with_from(mut self, from: Epoch) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_to(mut self, to: Epoch) -> Self {
        self.to = Some(to);
        self
    }

    fn resolve(&self, rows: usize) -> Result<(Years, Years), MatchError> {
        let to = self
            .to
            .as_ref()
            .ok_or(MatchError::MissingEpoch(EpochSide::To))?
            .resolve(rows)?;
        let from = self
            .from
            .as_ref()
            .ok_or(MatchError::MissingEpoch(EpochSide::From))?
            .resolve(rows)?;
        Ok((from, to))
    }
}

/// Position and proper motion of one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProperMotionRow {
    /// Degrees.
    pub ra: f64,
    /// Degrees.
    pub dec: f64,
    /// μα* = μα·cos δ, mas/yr.
    pub pmra: f64,
    /// mas/yr.
    pub pmdec: f64,
    pub goodpm: bool,
}

impl From<&CatalogRow> for ProperMotionRow {
    fn from(row: &CatalogRow) -> Self {
        Self {
            ra: row.ra,
            dec: row.dec,
            pmra: row.pmra,
            pmdec: row.pmdec,
            goodpm: row.goodpm,
        }
    }
}

impl ProperMotionRow {
    fn check_declination(&self) -> Result<(), MatchError> {
        if self.goodpm && self.dec.is_finite() && self.dec.abs() >= 90.0 {
            return Err(MatchError::DeclinationOutOfRange(self.dec));
        }
        Ok(())
    }

    fn shifted(&self, dt_years: f64) -> (f64, f64) {
        let pmra_deg_yr = self.pmra / MAS_PER_DEG / self.dec.to_radians().cos();
        let pmdec_deg_yr = self.pmdec / MAS_PER_DEG;
        (self.ra + dt_years * pmra_deg_yr, self.dec + dt_years * pmdec_deg_yr)
    }
}

/// Propagated positions, row-aligned with the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Propagated {
    pub ra: Vec<f64>,
    pub dec: Vec<f64>,
}

impl Propagated {
    pub fn len(&self) -> usize {
        self.ra.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ra.is_empty()
    }
}

/// Move a single row from `range.from` to `range.to`.
///
/// Unlike [`propagate_rows`], a row whose proper motion is not usable is an
/// error here: [`MatchError::UnusableProperMotion`]. Per-row epochs must
/// hold exactly one value.
pub fn propagate_row(row: &ProperMotionRow, range: &EpochRange) -> Result<(f64, f64), MatchError> {
    let (from, to) = range.resolve(1)?;
    if !row.goodpm {
        return Err(MatchError::UnusableProperMotion);
    }
    row.check_declination()?;
    Ok(row.shifted(to.at(0) - from.at(0)))
}

/// Move every row from `range.from` to `range.to`.
///
/// Rows with `goodpm == false` keep their position. NaN inputs give NaN
/// outputs for the affected row only. Rows are independent and evaluated in
/// parallel.
pub fn propagate_rows(
    rows: &[ProperMotionRow],
    range: &EpochRange,
) -> Result<Propagated, MatchError> {
    let (from, to) = range.resolve(rows.len())?;
    if let Some(bad) = rows.iter().find(|r| r.check_declination().is_err()) {
        return Err(MatchError::DeclinationOutOfRange(bad.dec));
    }

    let (ra, dec): (Vec<f64>, Vec<f64>) = rows
        .par_iter()
        .enumerate()
        .map(|(i, row)| {
            if row.goodpm {
                row.shifted(to.at(i) - from.at(i))
            } else {
                (row.ra, row.dec)
            }
        })
        .unzip();
    Ok(Propagated { ra, dec })
}

/// Names of the table columns read by [`propagate_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationColumns<'a> {
    pub ra: &'a str,
    pub dec: &'a str,
    pub pmra: &'a str,
    pub pmdec: &'a str,
    pub goodpm: &'a str,
}

impl Default for PropagationColumns<'_> {
    fn default() -> Self {
        Self {
            ra: columns::RA,
            dec: columns::DEC,
            pmra: columns::PMRA,
            pmdec: columns::PMDEC,
            goodpm: columns::GOODPM,
        }
    }
}

/// [`propagate_rows`] over the named columns of a table.
///
/// The `goodpm` column may be boolean or integer (1 = usable).
pub fn propagate_table(
    table: &Table,
    range: &EpochRange,
    cols: &PropagationColumns<'_>,
) -> Result<Propagated, MatchError> {
    let ra = table.float_column(cols.ra)?;
    let dec = table.float_column(cols.dec)?;
    let pmra = table.float_column(cols.pmra)?;
    let pmdec = table.float_column(cols.pmdec)?;
    let goodpm: Vec<bool> = match table.column(cols.goodpm)? {
        Column::Bool(v) => v.clone(),
        Column::Int(v) => v.iter().map(|&flag| flag == 1).collect(),
        _ => {
            return Err(MatchError::ColumnType {
                column: cols.goodpm.to_string(),
                expected: "bool or int",
            });
        }
    };

    let rows: Vec<ProperMotionRow> = (0..table.len())
        .map(|i| ProperMotionRow {
            ra: ra[i],
            dec: dec[i],
            pmra: pmra[i],
            pmdec: pmdec[i],
            goodpm: goodpm[i],
        })
        .collect();
    propagate_rows(&rows, range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good(ra: f64, dec: f64, pmra: f64, pmdec: f64) -> ProperMotionRow {
        ProperMotionRow {
            ra,
            dec,
            pmra,
            pmdec,
            goodpm: true,
        }
    }

    #[test]
    fn one_year_on_equator() {
        let row = good(100.0, 0.0, 3600.0, -3600.0);
        let range = EpochRange::new(Epoch::Year(2015.5), Epoch::Year(2016.5));
        let (ra, dec) = propagate_row(&row, &range).unwrap();
        assert!((ra - 100.001).abs() < 1e-12);
        assert!((dec + 0.001).abs() < 1e-12);
    }

    #[test]
    fn ra_rate_scales_with_secant_dec() {
        let row = good(100.0, 60.0, 3600.0, 0.0);
        let range = EpochRange::new(Epoch::Year(2000.0), Epoch::Year(2001.0));
        let (ra, dec) = propagate_row(&row, &range).unwrap();
        // sec(60°) = 2
        assert!((ra - 100.002).abs() < 1e-12, "ra = {ra}");
        assert_eq!(dec, 60.0);
    }

    #[test]
    fn backwards_in_time() {
        let row = good(1.0, 3.0, 3.0, 2.0);
        let range = EpochRange::new(Epoch::Year(2015.5), Epoch::Mjd(55_568.0));
        let (ra, dec) = propagate_row(&row, &range).unwrap();
        assert!(ra < 1.0);
        assert!(dec < 3.0);
    }

    #[test]
    fn missing_epochs() {
        let row = good(1.0, 1.0, 1.0, 1.0);
        let only_from = EpochRange::default().with_from(Epoch::Year(2015.5));
        assert_eq!(
            propagate_row(&row, &only_from).unwrap_err(),
            MatchError::MissingEpoch(EpochSide::To)
        );
        let only_to = EpochRange::default().with_to(Epoch::Mjd(55_000.0));
        assert_eq!(
            propagate_rows(&[row], &only_to).unwrap_err(),
            MatchError::MissingEpoch(EpochSide::From)
        );
    }

    #[test]
    fn single_row_rejects_bad_pm() {
        let mut row = good(1.0, 1.0, 1.0, 1.0);
        row.goodpm = false;
        let range = EpochRange::new(Epoch::Year(2015.5), Epoch::Year(2010.0));
        assert_eq!(
            propagate_row(&row, &range).unwrap_err(),
            MatchError::UnusableProperMotion
        );
    }

    #[test]
    fn sequence_passes_bad_pm_through() {
        let mut bad = good(5.0, 6.0, 100.0, 100.0);
        bad.goodpm = false;
        let rows = [good(5.0, 6.0, 100.0, 100.0), bad];
        let range = EpochRange::new(Epoch::Year(2000.0), Epoch::Year(2010.0));
        let out = propagate_rows(&rows, &range).unwrap();
        assert_ne!(out.ra[0], 5.0);
        assert_eq!((out.ra[1], out.dec[1]), (5.0, 6.0));
    }

    #[test]
    fn per_row_epoch_length_is_checked() {
        let rows = [good(1.0, 1.0, 1.0, 1.0); 3];
        let range = EpochRange::new(Epoch::Year(2015.5), Epoch::MjdPerRow(vec![55_000.0; 2]));
        assert_eq!(
            propagate_rows(&rows, &range).unwrap_err(),
            MatchError::LengthMismatch {
                expected: 3,
                found: 2
            }
        );
        let single = EpochRange::new(Epoch::YearPerRow(vec![2000.0, 2001.0]), Epoch::Year(2015.5));
        assert!(matches!(
            propagate_row(&rows[0], &single),
            Err(MatchError::LengthMismatch { expected: 1, .. })
        ));
    }

    #[test]
    fn pole_is_rejected_only_when_moving() {
        let range = EpochRange::new(Epoch::Year(2000.0), Epoch::Year(2001.0));
        let pole = good(0.0, 90.0, 1.0, 1.0);
        assert_eq!(
            propagate_row(&pole, &range).unwrap_err(),
            MatchError::DeclinationOutOfRange(90.0)
        );
        let parked = ProperMotionRow {
            goodpm: false,
            ..pole
        };
        let out = propagate_rows(&[parked], &range).unwrap();
        assert_eq!(out.dec, vec![90.0]);
    }

    #[test]
    fn zero_interval_is_identity() {
        let row = good(12.3, -45.6, 500.0, -250.0);
        let range = EpochRange::new(Epoch::Year(2015.5), Epoch::Year(2015.5));
        assert_eq!(propagate_row(&row, &range).unwrap(), (12.3, -45.6));
    }

    #[test]
    fn table_form_accepts_integer_flags() {
        let table = Table::new()
            .with_column("ra", Column::Float(vec![10.0, 20.0]))
            .and_then(|t| t.with_column("dec", Column::Float(vec![0.0, 0.0])))
            .and_then(|t| t.with_column("pmra", Column::Float(vec![3600.0, 3600.0])))
            .and_then(|t| t.with_column("pmdec", Column::Float(vec![0.0, 0.0])))
            .and_then(|t| t.with_column("goodpm", Column::Int(vec![1, 0])))
            .unwrap();
        let range = EpochRange::new(Epoch::Year(2000.0), Epoch::Year(2002.0));
        let out = propagate_table(&table, &range, &PropagationColumns::default()).unwrap();
        assert!((out.ra[0] - 10.002).abs() < 1e-12);
        assert_eq!(out.ra[1], 20.0);
    }

    #[test]
    fn table_form_rejects_text_flags() {
        let table = Table::new()
            .with_column("ra", Column::Float(vec![10.0]))
            .and_then(|t| t.with_column("dec", Column::Float(vec![0.0])))
            .and_then(|t| t.with_column("pmra", Column::Float(vec![1.0])))
            .and_then(|t| t.with_column("pmdec", Column::Float(vec![1.0])))
            .and_then(|t| t.with_column("goodpm", Column::Text(vec!["yes".into()])))
            .unwrap();
        let range = EpochRange::new(Epoch::Year(2000.0), Epoch::Year(2002.0));
        assert!(matches!(
            propagate_table(&table, &range, &PropagationColumns::default()),
            Err(MatchError::ColumnType { .. })
        ));
    }
}
