use common::Result;
use frame_engine::value_window;
use nalgebra::DMatrix;
use plotters::prelude::*;

use crate::chart::{backend_err, Area, Chart};

const MIN_RADIUS: f64 = 3.0;
const MAX_RADIUS: f64 = 20.0;

/// Draw one frame of an animated bubble chart: one bubble per category at
/// `(x, y)` for the playhead row, radius scaled by the size table when
/// one was supplied.
pub(crate) fn draw(
    chart: &Chart,
    x: &DMatrix<f64>,
    size: Option<&DMatrix<f64>>,
    area: &Area<'_>,
    frame: usize,
) -> Result<()> {
    let cfg = &chart.cfg;
    let (xlo, xhi) = value_window(x, frame, cfg.fixed_max)?;
    let (ylo, yhi) = value_window(&chart.values, frame, cfg.fixed_max)?;

    // radii are normalised against the whole animation, not the playhead,
    // so a bubble's size is comparable across frames
    let size_scale = size.map(|s| {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for v in s.iter().copied().filter(|v| v.is_finite()) {
            lo = lo.min(v);
            hi = hi.max(v);
        }
        (lo, hi)
    });
    let radius = |c: usize| -> i32 {
        match (size, size_scale) {
            (Some(s), Some((lo, hi))) if hi > lo => {
                let v = s[(frame, c)];
                if v.is_finite() {
                    let t = (v - lo) / (hi - lo);
                    (MIN_RADIUS + t * (MAX_RADIUS - MIN_RADIUS)).round() as i32
                } else {
                    MIN_RADIUS as i32
                }
            }
            _ => 5,
        }
    };

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(28)
        .y_label_area_size(48);
    if let Some(title) = &cfg.title {
        builder.caption(title, ("sans-serif", 20).into_font());
    }
    let mut cc = builder
        .build_cartesian_2d(xlo..xhi, ylo..yhi)
        .map_err(backend_err)?;
    cc.configure_mesh()
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&|v| format!("{:.1}", v))
        .y_label_formatter(&|v| format!("{:.1}", v))
        .draw()
        .map_err(backend_err)?;

    for c in 0..chart.values.ncols() {
        let color = chart.colors[c];
        let px = x[(frame, c)];
        let py = chart.values[(frame, c)];
        let series = if px.is_finite() && py.is_finite() {
            vec![Circle::new((px, py), radius(c), color.mix(0.7).filled())]
        } else {
            vec![]
        };
        cc.draw_series(series)
            .map_err(backend_err)?
            .label(chart.columns[c].clone())
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
    }
    cc.configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()
        .map_err(backend_err)?;

    chart.draw_period_label(area, frame)
}
