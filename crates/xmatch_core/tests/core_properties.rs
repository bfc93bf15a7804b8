//! Property tests for propagation and duplicate resolution.

use proptest::prelude::*;
use xmatch_core::{
    Column, Epoch, EpochRange, ProperMotionRow, Table, check_duplicates, deduplicate,
    deduplicate_until_unique, propagate_rows,
};

fn arb_row() -> impl Strategy<Value = ProperMotionRow> {
    (
        0.0f64..360.0,
        -89.0f64..89.0,
        -500.0f64..500.0,
        -500.0f64..500.0,
        any::<bool>(),
    )
        .prop_map(|(ra, dec, pmra, pmdec, goodpm)| ProperMotionRow {
            ra,
            dec,
            pmra,
            pmdec,
            goodpm,
        })
}

/// Sorted ids with small groups, plus a separation per row.
fn arb_matches() -> impl Strategy<Value = (Vec<i64>, Vec<f64>)> {
    prop::collection::vec((0i64..6, 0u8..4), 0..24).prop_map(|pairs| {
        let mut ids: Vec<i64> = pairs.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        // Coarse separations so ties are common.
        let seps = pairs.iter().map(|(_, s)| *s as f64 * 0.25).collect();
        (ids, seps)
    })
}

fn match_table(ids: &[i64], seps: &[f64]) -> Table {
    Table::new()
        .with_column("extra_id", Column::Int(ids.to_vec()))
        .and_then(|t| t.with_column("dist", Column::Float(seps.to_vec())))
        .expect("equal lengths")
}

fn distinct(ids: &[i64]) -> Vec<i64> {
    let mut d = ids.to_vec();
    d.dedup();
    d
}

proptest! {
    #[test]
    fn untrusted_pm_rows_do_not_move(
        rows in prop::collection::vec(arb_row(), 0..32),
        to_year in 1990.0f64..2030.0,
    ) {
        let range = EpochRange::new(Epoch::Year(2015.5), Epoch::Year(to_year));
        let out = propagate_rows(&rows, &range).unwrap();
        for (i, row) in rows.iter().enumerate() {
            if !row.goodpm {
                prop_assert_eq!(out.ra[i], row.ra);
                prop_assert_eq!(out.dec[i], row.dec);
            }
        }
    }

    #[test]
    fn nan_inputs_give_nan_outputs(
        mut rows in prop::collection::vec(arb_row(), 1..16),
        pick in 0usize..16,
    ) {
        let i = pick % rows.len();
        rows[i].goodpm = true;
        rows[i].pmra = f64::NAN;
        rows[i].pmdec = f64::NAN;
        let range = EpochRange::new(Epoch::Year(2015.5), Epoch::Mjd(55_000.0));
        let out = propagate_rows(&rows, &range).unwrap();
        prop_assert!(out.ra[i].is_nan());
        prop_assert!(out.dec[i].is_nan());
    }

    #[test]
    fn one_pass_leaves_one_row_per_id((ids, seps) in arb_matches()) {
        let mut table = match_table(&ids, &seps);
        deduplicate(&mut table, "extra_id", "dist").unwrap();
        let left = table.int_column("extra_id").unwrap().to_vec();
        prop_assert_eq!(left, distinct(&ids));
    }

    #[test]
    fn repeated_passes_reach_a_fixed_point((ids, seps) in arb_matches()) {
        let mut table = match_table(&ids, &seps);
        let largest_group = ids
            .chunk_by(|a, b| a == b)
            .map(|g| g.len())
            .max()
            .unwrap_or(0);
        let passes =
            deduplicate_until_unique(&mut table, "extra_id", "dist", largest_group.max(1))
                .unwrap();
        prop_assert!(passes <= largest_group.saturating_sub(1));
        prop_assert!(check_duplicates(&table, "extra_id").unwrap().is_empty());

        let before = table.clone();
        let report = deduplicate(&mut table, "extra_id", "dist").unwrap();
        prop_assert_eq!(report.removed, 0);
        prop_assert_eq!(table, before);
    }

    #[test]
    fn pair_keeps_strictly_closer_row(a in 0.0f64..10.0, b in 0.0f64..10.0) {
        let mut table = match_table(&[1, 1], &[a, b]);
        deduplicate(&mut table, "extra_id", "dist").unwrap();
        let kept = table.float_column("dist").unwrap()[0];
        // Later row wins unless the earlier one is strictly closer.
        let expected = if b - a > 0.0 { a } else { b };
        prop_assert_eq!(kept, expected);
    }
}
