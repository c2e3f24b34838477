use common::{Orientation, Sort};
use nalgebra::DMatrix;

/// Whether screen-space ordering is opposite to value ordering for this
/// sort/orientation pair.
///
/// In a horizontal descending race position 1 sits at the bottom of the
/// axis while the largest bar belongs at the top (and vice versa for a
/// vertical ascending race), so the rank has to be mirrored before it can
/// be used as a coordinate.
#[inline(always)]
pub fn flip_required(sort: Sort, orientation: Orientation) -> bool {
    matches!(
        (sort, orientation),
        (Sort::Desc, Orientation::Horizontal) | (Sort::Asc, Orientation::Vertical)
    )
}

/// Rank every row of `values` by descending value.
///
/// Rank 1 is the largest value; equal values take their ranks in
/// first-seen column order. `NaN` cells rank `NaN` and do not count.
/// Ranks beyond `n_visible + 1` clamp to `n_visible + 1` so off-screen
/// categories park just outside the visible window, and the whole table is
/// mirrored via `n_visible + 1 - rank` when [`flip_required`] says so.
///
/// This runs on the *original* observation rows; pass the result through
/// [`crate::interpolate_values`] so positions glide between periods.
pub fn rank_rows(
    values: &DMatrix<f64>,
    n_visible: usize,
    sort: Sort,
    orientation: Orientation,
) -> DMatrix<f64> {
    let (n_rows, n_cols) = values.shape();
    let clip = (n_visible + 1) as f64;
    let flip = flip_required(sort, orientation);

    let mut ranks = DMatrix::from_element(n_rows, n_cols, f64::NAN);
    let mut order: Vec<usize> = Vec::with_capacity(n_cols);
    for r in 0..n_rows {
        order.clear();
        order.extend((0..n_cols).filter(|&c| values[(r, c)].is_finite()));
        // Stable sort keeps column order among equal values ("first" ties)
        order.sort_by(|&a, &b| {
            values[(r, b)]
                .partial_cmp(&values[(r, a)])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        for (pos, &c) in order.iter().enumerate() {
            let rank = ((pos + 1) as f64).min(clip);
            ranks[(r, c)] = if flip { clip - rank } else { rank };
        }
    }
    ranks
}

/// The constant-rank table used by fixed-order races.
///
/// Every row is the static sequence `1..=n_cols`, reversed when
/// [`flip_required`] applies. No values are consulted; the caller freezes
/// the column ordering up front.
pub fn fixed_ranks(
    n_rows: usize,
    n_cols: usize,
    sort: Sort,
    orientation: Orientation,
) -> DMatrix<f64> {
    let flip = flip_required(sort, orientation);
    DMatrix::from_fn(n_rows, n_cols, |_, c| {
        if flip {
            (n_cols - c) as f64
        } else {
            (c + 1) as f64
        }
    })
}
