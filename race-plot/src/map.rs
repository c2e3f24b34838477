use common::Result;
use frame_engine::value_window;
use plotters::prelude::*;

use crate::chart::{backend_err, Area, Chart, GeoShape};

const MARGIN: f64 = 10.0;
const LOW: RGBColor = RGBColor(229, 237, 247);
const HIGH: RGBColor = RGBColor(13, 42, 99);
const MISSING: RGBColor = RGBColor(210, 210, 210);

/// Draw one frame of an animated choropleth: each category's polygons are
/// filled with a colour scaled by its value at the playhead.
///
/// The colour scale spans the whole animation so a region's shade is
/// comparable across frames.
pub(crate) fn draw(
    chart: &Chart,
    shapes: &[GeoShape],
    area: &Area<'_>,
    frame: usize,
) -> Result<()> {
    let (gmin, gmax) = value_window(&chart.values, frame, true)?;

    // fit the shapes' bounding box into the pixel area, preserving aspect
    // ratio, with geographic north up
    let mut bx = (f64::INFINITY, f64::NEG_INFINITY);
    let mut by = (f64::INFINITY, f64::NEG_INFINITY);
    for shape in shapes {
        for ring in &shape.rings {
            for &(x, y) in ring {
                bx = (bx.0.min(x), bx.1.max(x));
                by = (by.0.min(y), by.1.max(y));
            }
        }
    }
    if !(bx.0.is_finite() && by.0.is_finite()) {
        return Ok(());
    }
    let (w, h) = area.dim_in_pixel();
    let span_x = (bx.1 - bx.0).max(f64::EPSILON);
    let span_y = (by.1 - by.0).max(f64::EPSILON);
    let scale = ((w as f64 - 2.0 * MARGIN) / span_x).min((h as f64 - 2.0 * MARGIN) / span_y);
    let to_px = |x: f64, y: f64| -> (i32, i32) {
        (
            (MARGIN + (x - bx.0) * scale) as i32,
            (h as f64 - MARGIN - (y - by.0) * scale) as i32,
        )
    };

    for shape in shapes {
        let fill = match chart.columns.iter().position(|c| c == &shape.name) {
            Some(c) => {
                let v = chart.values[(frame, c)];
                if v.is_finite() {
                    let t = ((v - gmin) / (gmax - gmin)).clamp(0.0, 1.0);
                    lerp(LOW, HIGH, t)
                } else {
                    MISSING
                }
            }
            None => MISSING,
        };
        for ring in &shape.rings {
            let px: Vec<(i32, i32)> = ring.iter().map(|&(x, y)| to_px(x, y)).collect();
            area.draw(&Polygon::new(px.clone(), fill.filled()))
                .map_err(backend_err)?;
            let mut outline = px;
            if let Some(&first) = outline.first() {
                outline.push(first);
            }
            area.draw(&PathElement::new(outline, WHITE.stroke_width(1)))
                .map_err(backend_err)?;
        }
    }

    chart.draw_period_label(area, frame)
}

fn lerp(a: RGBColor, b: RGBColor, t: f64) -> RGBColor {
    let ch = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(ch(a.0, b.0), ch(a.1, b.1), ch(a.2, b.2))
}
