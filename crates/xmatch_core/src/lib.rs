//! Epoch propagation and duplicate resolution for catalog cross-matching.
//!
//! A secondary catalog observed at per-source epochs is moved to the epoch
//! of a reference catalog with its proper motions, matched by position
//! through an external service, and the resulting candidate table is
//! reduced to the closest match per id.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`table`] | Column-addressable in-memory [`Table`] and its outer join |
//! | [`catalog`] | [`CatalogRow`], [`MatchCandidate`] and their column layout |
//! | [`propagate`] | [`propagate_row`] / [`propagate_rows`] over an [`EpochRange`] |
//! | [`dedup`] | [`check_duplicates`], [`deduplicate`] |
//! | [`matcher`] | [`CrossMatch`] pipeline over collaborator traits |
//!
//! Everything except [`matcher`] is pure and does not log.

pub mod catalog;
pub mod config;
pub mod dedup;
pub mod error;
pub mod matcher;
pub mod propagate;
pub mod table;

pub use catalog::{CatalogRow, MatchCandidate, candidates_to_table, catalog_rows, columns};
pub use config::{GAIA_DR2_EPOCH_YEAR, MatchConfig};
pub use dedup::{DedupReport, check_duplicates, deduplicate, deduplicate_until_unique};
pub use error::{EpochSide, ErrorKind, MatchError};
pub use matcher::{
    CrossMatch, CrossMatchService, DEC_PROPAGATED, MatchSummary, RA_PROPAGATED, TableSink,
};
pub use propagate::{
    Epoch, EpochRange, MAS_PER_DEG, PropagationColumns, Propagated, ProperMotionRow,
    propagate_row, propagate_rows, propagate_table,
};
pub use table::{Column, Table};

/// Angular separation re-exported so callers need only this crate.
pub use xmatch_frames::{angular_separation_arcsec, angular_separations_arcsec};
/// Epoch conversion re-exported so callers need only this crate.
pub use xmatch_time::{mjd_to_year, mjds_to_years};
