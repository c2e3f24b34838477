use common::{PeriodAxis, Result};
use frame_engine::{period_window, value_window};
use plotters::prelude::*;

use crate::chart::{backend_err, Area, Chart};

/// Draw one frame of an animated scatter chart: one dot per category at
/// the playhead, with the trail of earlier frames faded behind it.
pub(crate) fn draw(chart: &Chart, area: &Area<'_>, frame: usize) -> Result<()> {
    let cfg = &chart.cfg;
    let (xlo, xhi) = period_window(&chart.axis, frame, cfg.fixed_max)?;
    let (ylo, yhi) = value_window(&chart.values, frame, cfg.fixed_max)?;

    let datetime_axis = matches!(chart.axis, PeriodAxis::DateTime(_));
    let x_fmt = move |v: &f64| {
        if datetime_axis {
            match chrono::DateTime::from_timestamp(*v as i64, 0) {
                Some(dt) => dt.format("%d/%m/%y").to_string(),
                None => format!("{:.0}", v),
            }
        } else {
            format!("{:.1}", v)
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
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&|v| format!("{:.0}", v))
        .draw()
        .map_err(backend_err)?;

    for c in 0..chart.values.ncols() {
        let color = chart.colors[c];
        // trail
        cc.draw_series((0..frame).filter_map(|k| {
            let v = chart.values[(k, c)];
            v.is_finite().then(|| {
                Circle::new((chart.axis.position(k), v), 2, color.mix(0.3).filled())
            })
        }))
        .map_err(backend_err)?;
        // playhead dot carries the legend entry
        let head = chart.values[(frame, c)];
        let series = if head.is_finite() {
            vec![Circle::new((chart.axis.position(frame), head), 4, color.filled())]
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
