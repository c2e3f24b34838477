use common::Result;
use plotters::element::Pie;
use plotters::prelude::*;

use crate::chart::{backend_err, Area, Chart};

/// Draw one frame of an animated pie chart from the playhead row.
///
/// Categories with a missing or non-positive value at the playhead are
/// left out of the pie for that frame.
pub(crate) fn draw(chart: &Chart, area: &Area<'_>, frame: usize) -> Result<()> {
    let mut sizes: Vec<f64> = vec![];
    let mut colors: Vec<RGBColor> = vec![];
    let mut labels: Vec<String> = vec![];
    for c in 0..chart.values.ncols() {
        let v = chart.values[(frame, c)];
        if v.is_finite() && v > 0.0 {
            sizes.push(v);
            colors.push(chart.colors[c]);
            labels.push(chart.columns[c].clone());
        }
    }

    if let Some(title) = &chart.cfg.title {
        let style = ("sans-serif", 20).into_font().color(&BLACK);
        area.draw(&Text::new(title.clone(), (10, 10), style))
            .map_err(backend_err)?;
    }

    if !sizes.is_empty() {
        let (w, h) = area.dim_in_pixel();
        let center = ((w / 2) as i32, (h / 2) as i32);
        let radius = 0.4 * w.min(h) as f64;
        let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
        pie.label_style(("sans-serif", 14).into_font().color(&BLACK));
        area.draw(&pie).map_err(backend_err)?;
    }

    chart.draw_period_label(area, frame)
}
