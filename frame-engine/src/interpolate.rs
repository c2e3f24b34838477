use chrono::Duration;
use common::{ChartError, PeriodAxis, Result, Table};
use nalgebra::DMatrix;

/// Expand a sparse observation table into a dense per-frame table.
///
/// Row `i` of the input sits at dense position `i * steps_per_period`; the
/// gaps in between fill by linear interpolation, so an `n`-row table yields
/// `(n - 1) * steps_per_period + 1` frames. The period axis is either
/// interpolated alongside the values (datetime and numeric axes only) or
/// forward-filled so intermediate frames repeat the most recent label.
pub fn interpolate(
    table: &Table,
    steps_per_period: usize,
    interpolate_period: bool,
) -> Result<Table> {
    if steps_per_period < 1 {
        return Err(ChartError::Configuration(
            "`steps_per_period` must be at least 1".to_string(),
        ));
    }
    if interpolate_period && !table.axis().is_orderable() {
        return Err(ChartError::Configuration(
            "`interpolate_period` requires a datetime or numeric axis".to_string(),
        ));
    }

    let values = interpolate_values(table.values(), steps_per_period);
    let axis = dense_axis(table.axis(), steps_per_period, interpolate_period);
    Table::new(axis, table.columns().to_vec(), values)
}

/// Linearly interpolate a value matrix over dense integer positions.
///
/// Row `i` maps to position `i * steps_per_period`. `NaN` cells are bridged
/// by interpolating between the surrounding finite observations; leading and
/// trailing gaps fill from the nearest finite observation. A column with no
/// finite value at all stays `NaN`.
pub fn interpolate_values(values: &DMatrix<f64>, steps_per_period: usize) -> DMatrix<f64> {
    let n = values.nrows();
    if n == 0 {
        return values.clone();
    }
    let dense_rows = (n - 1) * steps_per_period + 1;
    let mut out = DMatrix::from_element(dense_rows, values.ncols(), f64::NAN);

    for c in 0..values.ncols() {
        let known: Vec<(usize, f64)> = (0..n)
            .filter_map(|i| {
                let v = values[(i, c)];
                v.is_finite().then_some((i * steps_per_period, v))
            })
            .collect();
        if known.is_empty() {
            warn!("column {} has no finite values, leaving it NaN", c);
            continue;
        }

        let last = known[known.len() - 1];
        let mut seg = 0;
        for k in 0..dense_rows {
            out[(k, c)] = if k <= known[0].0 {
                known[0].1
            } else if k >= last.0 {
                last.1
            } else {
                while known[seg + 1].0 < k {
                    seg += 1;
                }
                let (x0, y0) = known[seg];
                let (x1, y1) = known[seg + 1];
                y0 + (y1 - y0) * (k - x0) as f64 / (x1 - x0) as f64
            };
        }
    }

    out
}

fn dense_axis(axis: &PeriodAxis, steps_per_period: usize, interpolate_period: bool) -> PeriodAxis {
    let n = axis.len();
    let dense_rows = (n - 1) * steps_per_period + 1;

    if !interpolate_period {
        // Repeat the most recent period's label until the next one lands
        return match axis {
            PeriodAxis::DateTime(v) => PeriodAxis::DateTime(
                (0..dense_rows).map(|k| v[k / steps_per_period]).collect(),
            ),
            PeriodAxis::Numeric(v) => PeriodAxis::Numeric(
                (0..dense_rows).map(|k| v[k / steps_per_period]).collect(),
            ),
            PeriodAxis::Labels(v) => PeriodAxis::Labels(
                (0..dense_rows)
                    .map(|k| v[k / steps_per_period].clone())
                    .collect(),
            ),
        };
    }

    match axis {
        // Evenly spaced instants spanning first to last, regardless of how
        // the original periods were spaced
        PeriodAxis::DateTime(v) => {
            if dense_rows == 1 {
                return PeriodAxis::DateTime(v.clone());
            }
            let first = v[0];
            let span = (v[n - 1] - first).num_microseconds().unwrap_or(i64::MAX) as f64;
            PeriodAxis::DateTime(
                (0..dense_rows)
                    .map(|k| {
                        let offset = (span * k as f64 / (dense_rows - 1) as f64).round() as i64;
                        first + Duration::microseconds(offset)
                    })
                    .collect(),
            )
        }
        // Segment-by-segment linear interpolation between adjacent periods
        PeriodAxis::Numeric(v) => PeriodAxis::Numeric(
            (0..dense_rows)
                .map(|k| {
                    let i = k / steps_per_period;
                    let r = k % steps_per_period;
                    if r == 0 {
                        v[i]
                    } else {
                        v[i] + (v[i + 1] - v[i]) * r as f64 / steps_per_period as f64
                    }
                })
                .collect(),
        ),
        // Rejected by `interpolate` before we get here
        PeriodAxis::Labels(v) => PeriodAxis::Labels(
            (0..dense_rows)
                .map(|k| v[k / steps_per_period].clone())
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use round::round;

    use super::*;

    fn table(axis: PeriodAxis, rows: usize, cols: usize, data: &[f64]) -> Table {
        let names = (0..cols).map(|c| format!("c{}", c)).collect();
        Table::new(axis, names, DMatrix::from_row_slice(rows, cols, data)).unwrap()
    }

    #[test]
    fn row_count_property() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let t = table(
            PeriodAxis::Numeric(vec![0.0, 1.0, 2.0, 3.0]),
            4,
            1,
            &[0.0, 1.0, 2.0, 3.0],
        );
        let dense = interpolate(&t, 3, true).unwrap();
        assert_eq!(dense.nrows(), (4 - 1) * 3 + 1);
    }

    #[test]
    fn endpoints_are_exact() {
        let t = table(
            PeriodAxis::Numeric(vec![0.0, 1.0, 2.0]),
            3,
            2,
            &[1.0, 10.0, 5.0, 20.0, 9.0, 30.0],
        );
        let dense = interpolate(&t, 7, true).unwrap();
        let last = dense.nrows() - 1;
        assert_eq!(dense.values()[(0, 0)], 1.0);
        assert_eq!(dense.values()[(0, 1)], 10.0);
        assert_eq!(dense.values()[(last, 0)], 9.0);
        assert_eq!(dense.values()[(last, 1)], 30.0);
        assert_eq!(dense.axis().position(0), 0.0);
        assert_eq!(dense.axis().position(last), 2.0);
    }

    #[test]
    fn two_rows_subdivide() {
        // [(A=1,B=2),(A=3,B=4)] with 2 steps -> (1,2),(2,3),(3,4)
        let t = table(
            PeriodAxis::Numeric(vec![0.0, 1.0]),
            2,
            2,
            &[1.0, 2.0, 3.0, 4.0],
        );
        let dense = interpolate(&t, 2, true).unwrap();
        assert_eq!(dense.nrows(), 3);
        assert_eq!(dense.values()[(0, 0)], 1.0);
        assert_eq!(dense.values()[(0, 1)], 2.0);
        assert_eq!(dense.values()[(1, 0)], 2.0);
        assert_eq!(dense.values()[(1, 1)], 3.0);
        assert_eq!(dense.values()[(2, 0)], 3.0);
        assert_eq!(dense.values()[(2, 1)], 4.0);
    }

    #[test]
    fn single_row_yields_single_frame() {
        let t = table(PeriodAxis::Numeric(vec![5.0]), 1, 1, &[42.0]);
        let dense = interpolate(&t, 10, true).unwrap();
        assert_eq!(dense.nrows(), 1);
        assert_eq!(dense.values()[(0, 0)], 42.0);
    }

    #[test]
    fn datetime_axis_spaces_evenly() {
        // Matches the canonical example: one day at 4 steps yields 6h spacing
        let d0 = NaiveDate::from_ymd_opt(2020, 3, 29).unwrap();
        let d1 = NaiveDate::from_ymd_opt(2020, 3, 30).unwrap();
        let axis = PeriodAxis::DateTime(vec![
            d0.and_hms_opt(0, 0, 0).unwrap(),
            d1.and_hms_opt(0, 0, 0).unwrap(),
        ]);
        let t = table(axis, 2, 1, &[0.0, 4.0]);
        let dense = interpolate(&t, 4, true).unwrap();
        assert_eq!(dense.nrows(), 5);
        match dense.axis() {
            PeriodAxis::DateTime(v) => {
                assert_eq!(v[1], d0.and_hms_opt(6, 0, 0).unwrap());
                assert_eq!(v[2], d0.and_hms_opt(12, 0, 0).unwrap());
                assert_eq!(v[3], d0.and_hms_opt(18, 0, 0).unwrap());
                assert_eq!(v[4], d1.and_hms_opt(0, 0, 0).unwrap());
            }
            other => panic!("expected datetime axis, got {:?}", other),
        }
    }

    #[test]
    fn label_axis_forward_fills() {
        let axis = PeriodAxis::Labels(vec!["q1".to_string(), "q2".to_string()]);
        let t = table(axis, 2, 1, &[1.0, 2.0]);
        let dense = interpolate(&t, 2, false).unwrap();
        assert_eq!(dense.axis().label(0, None), "q1");
        assert_eq!(dense.axis().label(1, None), "q1");
        assert_eq!(dense.axis().label(2, None), "q2");
    }

    #[test]
    fn label_axis_rejects_period_interpolation() {
        let axis = PeriodAxis::Labels(vec!["q1".to_string(), "q2".to_string()]);
        let t = table(axis, 2, 1, &[1.0, 2.0]);
        let err = interpolate(&t, 2, true).unwrap_err();
        assert!(matches!(err, ChartError::Configuration(_)));
    }

    #[test]
    fn zero_steps_rejected() {
        let t = table(PeriodAxis::Numeric(vec![0.0, 1.0]), 2, 1, &[1.0, 2.0]);
        assert!(matches!(
            interpolate(&t, 0, true),
            Err(ChartError::Configuration(_))
        ));
    }

    #[test]
    fn nan_gaps_bridge_linearly() {
        let vals = DMatrix::from_row_slice(3, 1, &[1.0, f64::NAN, 3.0]);
        let dense = interpolate_values(&vals, 2);
        let got: Vec<f64> = (0..5).map(|k| round(dense[(k, 0)], 6)).collect();
        assert_eq!(got, vec![1.0, 1.5, 2.0, 2.5, 3.0]);
    }

    #[test]
    fn edge_gaps_fill_nearest() {
        let vals = DMatrix::from_row_slice(3, 1, &[f64::NAN, 2.0, f64::NAN]);
        let dense = interpolate_values(&vals, 1);
        assert_eq!(dense[(0, 0)], 2.0);
        assert_eq!(dense[(1, 0)], 2.0);
        assert_eq!(dense[(2, 0)], 2.0);
    }

    #[test]
    fn all_nan_column_stays_nan() {
        let vals = DMatrix::from_row_slice(2, 2, &[1.0, f64::NAN, 2.0, f64::NAN]);
        let dense = interpolate_values(&vals, 2);
        assert_eq!(dense[(1, 0)], 1.5);
        assert!(dense[(1, 1)].is_nan());
    }
}
