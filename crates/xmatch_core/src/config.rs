//! Cross-match run configuration.

use crate::catalog::columns;
use crate::error::MatchError;

/// Gaia DR2 reference epoch (J2015.5).
pub const GAIA_DR2_EPOCH_YEAR: f64 = 2015.5;

/// Configuration of a [`CrossMatch`](crate::CrossMatch) run.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Epoch of the reference catalog, as a fractional year.
    pub reference_epoch_year: f64,
    /// Search radius handed to the cross-match service, in arcseconds.
    pub search_radius_arcsec: f64,
    /// Grouping id column of the candidate table.
    pub id_column: String,
    /// Separation column of the candidate table, in arcseconds.
    pub separation_column: String,
    /// Upper bound on deduplication passes.
    pub max_dedup_passes: usize,
    /// Name under which the propagated secondary table is uploaded.
    pub upload_table: String,
    /// Reference-source `(ra, dec)` columns of the candidate table, in
    /// degrees. When set, the separation column is recomputed from these and
    /// the propagated positions instead of trusting the service's value.
    pub reference_position_columns: Option<(String, String)>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            reference_epoch_year: GAIA_DR2_EPOCH_YEAR,
            search_radius_arcsec: 1.0,
            id_column: columns::ID.to_string(),
            separation_column: columns::SEPARATION.to_string(),
            max_dedup_passes: 16,
            upload_table: "xmatch_upload".to_string(),
            reference_position_columns: None,
        }
    }
}

impl MatchConfig {
    pub(crate) fn validate(&self) -> Result<(), MatchError> {
        if !self.reference_epoch_year.is_finite() {
            return Err(MatchError::InvalidConfig(
                "reference_epoch_year must be finite",
            ));
        }
        if !(self.search_radius_arcsec.is_finite() && self.search_radius_arcsec > 0.0) {
            return Err(MatchError::InvalidConfig(
                "search_radius_arcsec must be positive",
            ));
        }
        if self.id_column.is_empty() {
            return Err(MatchError::InvalidConfig("id_column must not be empty"));
        }
        if self.separation_column.is_empty() {
            return Err(MatchError::InvalidConfig(
                "separation_column must not be empty",
            ));
        }
        if self.max_dedup_passes == 0 {
            return Err(MatchError::InvalidConfig(
                "max_dedup_passes must be greater than zero",
            ));
        }
        if self.upload_table.is_empty() {
            return Err(MatchError::InvalidConfig("upload_table must not be empty"));
        }
        if let Some((ra, dec)) = &self.reference_position_columns {
            if ra.is_empty() || dec.is_empty() {
                return Err(MatchError::InvalidConfig(
                    "reference_position_columns must not be empty",
                ));
            }
        }
        Ok(())
    }
}
