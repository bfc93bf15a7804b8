//! End-to-end cross-match: propagate, match, deduplicate, merge, persist.
//!
//! The positional match itself and table persistence are external
//! collaborators behind [`CrossMatchService`] and [`TableSink`]. Nothing
//! talks to a collaborator until [`CrossMatch::run`] is called, and a session
//! opened by a run is always closed by the same run.

use log::{debug, info, warn};
use xmatch_frames::angular_separations_arcsec;

use crate::catalog::columns;
use crate::config::MatchConfig;
use crate::dedup::{check_duplicates, deduplicate_until_unique};
use crate::error::MatchError;
use crate::propagate::{Epoch, EpochRange, PropagationColumns, propagate_table};
use crate::table::{Column, Table};

/// Column holding right ascension moved to the reference epoch.
pub const RA_PROPAGATED: &str = "ra_prop";
/// Column holding declination moved to the reference epoch.
pub const DEC_PROPAGATED: &str = "dec_prop";

/// Remote positional cross-match against a reference catalog.
///
/// Implementations own authentication and job submission. The returned
/// table has one row per candidate pair and carries the configured id and
/// separation columns. Its separation is used as is unless
/// [`MatchConfig::reference_position_columns`] is set, in which case the
/// table must also echo [`RA_PROPAGATED`] / [`DEC_PROPAGATED`] and carry the
/// reference position.
pub trait CrossMatchService {
    type Session;

    fn open_session(&mut self) -> Result<Self::Session, MatchError>;

    fn crossmatch(
        &mut self,
        session: &Self::Session,
        upload_name: &str,
        upload: &Table,
        radius_arcsec: f64,
    ) -> Result<Table, MatchError>;

    fn close_session(&mut self, session: Self::Session) -> Result<(), MatchError>;
}

/// Destination of the merged match table.
pub trait TableSink {
    fn write(&mut self, table: Table) -> Result<(), MatchError>;
}

/// Counts from one [`CrossMatch::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchSummary {
    /// Rows uploaded to the service.
    pub uploaded: usize,
    /// Candidate rows returned by the service.
    pub candidates: usize,
    /// Rows removed by deduplication.
    pub removed: usize,
    /// Deduplication passes performed.
    pub passes: usize,
    /// Secondary rows without any candidate.
    pub unmatched: usize,
    /// Rows handed to the sink.
    pub written: usize,
}

/// Cross-match pipeline over a query service and a table sink.
#[derive(Debug)]
pub struct CrossMatch<S, W> {
    config: MatchConfig,
    service: S,
    sink: W,
}

impl<S: CrossMatchService, W: TableSink> CrossMatch<S, W> {
    pub fn new(config: MatchConfig, service: S, sink: W) -> Result<Self, MatchError> {
        config.validate()?;
        Ok(Self {
            config,
            service,
            sink,
        })
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Release the collaborators.
    pub fn into_parts(self) -> (S, W) {
        (self.service, self.sink)
    }

    /// Match a secondary catalog against the reference catalog.
    ///
    /// `secondary` must carry the standard catalog columns with `epoch` as
    /// MJD per row, and the configured id column. Its positions are moved to
    /// the reference epoch into [`RA_PROPAGATED`] / [`DEC_PROPAGATED`] before
    /// upload. The sink receives the full outer join of the propagated
    /// secondary table with the deduplicated candidates on the id column, so
    /// secondary rows without a candidate are kept with absent match cells.
    pub fn run(&mut self, secondary: Table) -> Result<MatchSummary, MatchError> {
        let upload = self.propagate_to_reference(secondary)?;
        upload.int_column(&self.config.id_column)?;
        let uploaded = upload.len();
        info!(
            "propagated {uploaded} rows to epoch {}",
            self.config.reference_epoch_year
        );

        let mut matched = self.query(&upload)?;
        let candidates = matched.len();
        info!("cross-match returned {candidates} candidate rows");

        if let Some((ra, dec)) = &self.config.reference_position_columns {
            recompute_separation(&mut matched, ra, dec, &self.config.separation_column)?;
            debug!("recomputed separations from {ra}/{dec}");
        }

        let id_column = self.config.id_column.as_str();
        matched.sort_by_int_column(id_column)?;
        let duplicates = check_duplicates(&matched, id_column)?;
        debug!("{} adjacent duplicate pairs before deduplication", duplicates.len());

        let passes = deduplicate_until_unique(
            &mut matched,
            id_column,
            &self.config.separation_column,
            self.config.max_dedup_passes,
        )?;
        let removed = candidates - matched.len();
        info!("removed {removed} duplicate matches in {passes} passes");

        let matched_ids = matched.int_column(id_column)?;
        let unmatched = upload
            .int_column(id_column)?
            .iter()
            .filter(|&id| matched_ids.binary_search(id).is_err())
            .count();
        let merged = upload.outer_join(&matched, id_column)?;
        let written = merged.len();
        debug!("{unmatched} secondary rows have no match");

        self.sink.write(merged)?;
        info!("wrote {written} rows");

        Ok(MatchSummary {
            uploaded,
            candidates,
            removed,
            passes,
            unmatched,
            written,
        })
    }

    fn propagate_to_reference(&self, mut table: Table) -> Result<Table, MatchError> {
        let epochs = table.float_column(columns::EPOCH)?.to_vec();
        let range = EpochRange::new(
            Epoch::MjdPerRow(epochs),
            Epoch::Year(self.config.reference_epoch_year),
        );
        let moved = propagate_table(&table, &range, &PropagationColumns::default())?;
        table.add_column(RA_PROPAGATED, Column::Float(moved.ra))?;
        table.add_column(DEC_PROPAGATED, Column::Float(moved.dec))?;
        Ok(table)
    }

    fn query(&mut self, upload: &Table) -> Result<Table, MatchError> {
        let session = self.service.open_session()?;
        let result = self.service.crossmatch(
            &session,
            &self.config.upload_table,
            upload,
            self.config.search_radius_arcsec,
        );
        if let Err(e) = self.service.close_session(session) {
            warn!("failed to close cross-match session: {e}");
        }
        result
    }
}

/// Replace `separation` with the angle between the propagated upload
/// position and the reference position of each candidate row.
fn recompute_separation(
    matched: &mut Table,
    ra: &str,
    dec: &str,
    separation: &str,
) -> Result<(), MatchError> {
    let arcsec = angular_separations_arcsec(
        matched.float_column(RA_PROPAGATED)?,
        matched.float_column(DEC_PROPAGATED)?,
        matched.float_column(ra)?,
        matched.float_column(dec)?,
    )?;
    matched.add_column(separation, Column::Float(arcsec))
}
