//! Catalog rows and match candidates, and their table layout.

use crate::error::MatchError;
use crate::table::{Column, Table};

/// Standard column names of a catalog table.
pub mod columns {
    pub const ID: &str = "id";
    pub const RA: &str = "ra";
    pub const DEC: &str = "dec";
    pub const PMRA: &str = "pmra";
    pub const PMDEC: &str = "pmdec";
    pub const GOODPM: &str = "goodpm";
    pub const EPOCH: &str = "epoch";
    pub const SOURCE_ID: &str = "source_id";
    pub const SEPARATION: &str = "separation";
}

/// One source observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogRow {
    /// Grouping identifier; not unique before deduplication.
    pub id: i64,
    /// Right ascension in degrees, `[0, 360)`.
    pub ra: f64,
    /// Declination in degrees, `[-90, 90]`.
    pub dec: f64,
    /// Proper motion in RA (μα·cos δ), mas/yr. NaN when not measured.
    pub pmra: f64,
    /// Proper motion in Dec, mas/yr. NaN when not measured.
    pub pmdec: f64,
    /// Whether the proper motion can be used to move the epoch.
    pub goodpm: bool,
    /// Observation epoch, as MJD or fractional year depending on the catalog.
    pub epoch: f64,
}

impl CatalogRow {
    /// Build a catalog table from rows, in order.
    pub fn into_table(rows: &[CatalogRow]) -> Table {
        let cols = [
            (columns::ID, Column::Int(rows.iter().map(|r| r.id).collect())),
            (columns::RA, Column::Float(rows.iter().map(|r| r.ra).collect())),
            (columns::DEC, Column::Float(rows.iter().map(|r| r.dec).collect())),
            (columns::PMRA, Column::Float(rows.iter().map(|r| r.pmra).collect())),
            (columns::PMDEC, Column::Float(rows.iter().map(|r| r.pmdec).collect())),
            (columns::GOODPM, Column::Bool(rows.iter().map(|r| r.goodpm).collect())),
            (columns::EPOCH, Column::Float(rows.iter().map(|r| r.epoch).collect())),
        ];
        Table::from_columns(rows.len(), named(cols))
    }
}

/// Read the standard catalog columns back as rows.
pub fn catalog_rows(table: &Table) -> Result<Vec<CatalogRow>, MatchError> {
    let id = table.int_column(columns::ID)?;
    let ra = table.float_column(columns::RA)?;
    let dec = table.float_column(columns::DEC)?;
    let pmra = table.float_column(columns::PMRA)?;
    let pmdec = table.float_column(columns::PMDEC)?;
    let goodpm = table.bool_column(columns::GOODPM)?;
    let epoch = table.float_column(columns::EPOCH)?;

    Ok((0..table.len())
        .map(|i| CatalogRow {
            id: id[i],
            ra: ra[i],
            dec: dec[i],
            pmra: pmra[i],
            pmdec: pmdec[i],
            goodpm: goodpm[i],
            epoch: epoch[i],
        })
        .collect())
}

/// A primary/secondary pairing produced by a positional cross-match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchCandidate {
    /// Identifier of the primary-catalog row; duplicated when ambiguous.
    pub primary_id: i64,
    /// Identifier of the matched secondary-catalog source.
    pub secondary_id: i64,
    /// Angular distance between the pair, in arcseconds.
    pub separation_arcsec: f64,
}

/// Lay out candidates as a table with `id`, `source_id` and `separation` columns.
pub fn candidates_to_table(candidates: &[MatchCandidate]) -> Table {
    let cols = [
        (
            columns::ID,
            Column::Int(candidates.iter().map(|c| c.primary_id).collect()),
        ),
        (
            columns::SOURCE_ID,
            Column::Int(candidates.iter().map(|c| c.secondary_id).collect()),
        ),
        (
            columns::SEPARATION,
            Column::Float(candidates.iter().map(|c| c.separation_arcsec).collect()),
        ),
    ];
    Table::from_columns(candidates.len(), named(cols))
}

fn named<const N: usize>(cols: [(&str, Column); N]) -> Vec<(String, Column)> {
    cols.into_iter()
        .map(|(name, column)| (name.to_string(), column))
        .collect()
}
