//! Duplicate resolution after a positional cross-match.
//!
//! A cross-match returns one row per (primary, candidate) pair, so a primary
//! id with several candidates appears several times. Tables must be sorted
//! by the id column so that duplicates are adjacent; only adjacent pairs are
//! compared.

use crate::error::MatchError;
use crate::table::Table;

/// Outcome of one [`deduplicate`] pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupReport {
    /// Row indices marked for removal, ascending, relative to the input table.
    /// An index may appear twice when both of its neighbour pairs marked it.
    pub marked: Vec<usize>,
    /// Number of rows removed.
    pub removed: usize,
}

/// Ids of every adjacent pair of rows sharing an id.
///
/// A group of `k` rows reports its id `k - 1` times. The table is not
/// modified.
pub fn check_duplicates(table: &Table, id_column: &str) -> Result<Vec<i64>, MatchError> {
    let ids = table.int_column(id_column)?;
    Ok(ids
        .windows(2)
        .filter(|pair| pair[0] == pair[1])
        .map(|pair| pair[0])
        .collect())
}

/// Remove redundant matches, keeping the closer row of each adjacent pair.
///
/// For each adjacent pair `(i, i + 1)` with equal ids, the row with the
/// larger separation is marked; on a tie (or NaN difference) row `i` is
/// marked so the later row survives. Marks are sorted and removed in
/// ascending order, each index shifted down by the number of rows already
/// removed.
pub fn deduplicate(
    table: &mut Table,
    id_column: &str,
    separation_column: &str,
) -> Result<DedupReport, MatchError> {
    let ids = table.int_column(id_column)?;
    let separation = table.float_column(separation_column)?;

    let mut marked: Vec<usize> = Vec::new();
    for i in 0..ids.len().saturating_sub(1) {
        if ids[i + 1] != ids[i] {
            continue;
        }
        let diff = separation[i + 1] - separation[i];
        marked.push(if diff > 0.0 { i + 1 } else { i });
    }
    marked.sort_unstable();

    // Every pair (i, i + 1) marks an index >= i, so the n-th sorted mark is
    // always >= n and the shifted index stays in range.
    for (removed, &index) in marked.iter().enumerate() {
        table.remove_row(index - removed);
    }

    Ok(DedupReport {
        removed: marked.len(),
        marked,
    })
}

/// Run [`deduplicate`] until no adjacent duplicate ids remain.
///
/// Returns the number of passes performed (zero for an already unique
/// table). Fails with [`MatchError::DedupDidNotConverge`] if duplicates
/// remain after `max_passes` passes.
pub fn deduplicate_until_unique(
    table: &mut Table,
    id_column: &str,
    separation_column: &str,
    max_passes: usize,
) -> Result<usize, MatchError> {
    // Validate the separation column even when there is nothing to remove.
    table.float_column(separation_column)?;

    let mut passes = 0;
    while !check_duplicates(table, id_column)?.is_empty() {
        if passes == max_passes {
            return Err(MatchError::DedupDidNotConverge { passes });
        }
        deduplicate(table, id_column, separation_column)?;
        passes += 1;
    }
    Ok(passes)
}
