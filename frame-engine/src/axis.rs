use common::{ChartError, PeriodAxis, Result};
use nalgebra::DMatrix;

const WIDEN_RATIO: f64 = 0.01;

/// The value-axis window for `frame`.
///
/// With `fixed == false` the window covers only the data observed up to and
/// including `frame` and grows with the playhead; with `fixed == true` it
/// spans the whole table and stays constant for the animation. `NaN` cells
/// are skipped; a window with no finite value is a data-shape error.
pub fn value_window(values: &DMatrix<f64>, frame: usize, fixed: bool) -> Result<(f64, f64)> {
    let upper = if fixed {
        values.nrows()
    } else {
        frame.min(values.nrows().saturating_sub(1)) + 1
    };

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for r in 0..upper {
        for c in 0..values.ncols() {
            let v = values[(r, c)];
            if v.is_finite() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
    }
    if lo > hi {
        return Err(ChartError::DataShape(format!(
            "no finite values in the first {} frames",
            upper
        )));
    }
    Ok(widen(lo, hi))
}

/// The period-axis window for `frame`, as plain numeric bounds.
///
/// Same playhead rule as [`value_window`]. Datetime positions are seconds
/// since the epoch; label positions are row indices.
pub fn period_window(axis: &PeriodAxis, frame: usize, fixed: bool) -> Result<(f64, f64)> {
    if axis.is_empty() {
        return Err(ChartError::DataShape("period axis is empty".to_string()));
    }
    let upper = if fixed {
        axis.len()
    } else {
        frame.min(axis.len() - 1) + 1
    };

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for i in 0..upper {
        let p = axis.position(i);
        lo = lo.min(p);
        hi = hi.max(p);
    }
    Ok(widen(lo, hi))
}

// A zero-width window gives the plotting backend a zero-size range, so pad
// it by a small ratio of its magnitude
fn widen(lo: f64, hi: f64) -> (f64, f64) {
    if hi - lo > 0.0 {
        return (lo, hi);
    }
    let pad = if hi == 0.0 { 0.5 } else { hi.abs() * WIDEN_RATIO };
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 2, &[
            1.0, 4.0, //
            2.0, f64::NAN, //
            0.5, 9.0,
        ])
    }

    #[test]
    fn window_grows_with_playhead() {
        let v = values();
        assert_eq!(value_window(&v, 0, false).unwrap(), (1.0, 4.0));
        assert_eq!(value_window(&v, 1, false).unwrap(), (1.0, 4.0));
        assert_eq!(value_window(&v, 2, false).unwrap(), (0.5, 9.0));
    }

    #[test]
    fn fixed_window_spans_all_frames() {
        let v = values();
        for frame in 0..3 {
            assert_eq!(value_window(&v, frame, true).unwrap(), (0.5, 9.0));
        }
    }

    #[test]
    fn frame_past_end_clamps() {
        let v = values();
        assert_eq!(value_window(&v, 100, false).unwrap(), (0.5, 9.0));
    }

    #[test]
    fn degenerate_window_widens() {
        let v = DMatrix::from_row_slice(1, 2, &[3.0, 3.0]);
        let (lo, hi) = value_window(&v, 0, false).unwrap();
        assert!(lo < 3.0 && hi > 3.0);

        let z = DMatrix::from_row_slice(1, 1, &[0.0]);
        let (lo, hi) = value_window(&z, 0, false).unwrap();
        assert!(lo < 0.0 && hi > 0.0);
    }

    #[test]
    fn all_nan_window_is_an_error() {
        let v = DMatrix::from_row_slice(2, 1, &[f64::NAN, 1.0]);
        assert!(matches!(
            value_window(&v, 0, false),
            Err(ChartError::DataShape(_))
        ));
        assert!(value_window(&v, 1, false).is_ok());
    }

    #[test]
    fn period_window_follows_playhead() {
        let axis = PeriodAxis::Numeric(vec![10.0, 20.0, 30.0]);
        assert_eq!(period_window(&axis, 1, false).unwrap(), (10.0, 20.0));
        assert_eq!(period_window(&axis, 0, true).unwrap(), (10.0, 30.0));
    }
}
