use common::{Orientation, Result};
use frame_engine::value_window;
use nalgebra::DMatrix;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::chart::{backend_err, Area, Chart};

/// Draw one frame of a bar-chart race.
///
/// Only categories whose interpolated rank lies strictly inside
/// `(0, n_visible + 1)` are drawn; the rank is the bar's position on the
/// category axis, so bars glide (and may momentarily overlap) while ranks
/// swap between periods.
pub(crate) fn draw(
    chart: &Chart,
    ranks: &DMatrix<f64>,
    area: &Area<'_>,
    frame: usize,
) -> Result<()> {
    let cfg = &chart.cfg;
    let hi_rank = (chart.n_visible + 1) as f64;

    let mut bars: Vec<(usize, f64, f64)> = vec![];
    for c in 0..chart.values.ncols() {
        let r = ranks[(frame, c)];
        let v = chart.values[(frame, c)];
        if r.is_finite() && v.is_finite() && r > 0.0 && r < hi_rank {
            bars.push((c, r, v));
        }
    }

    let (wlo, whi) = value_window(&chart.values, frame, cfg.fixed_max)?;
    let lo = wlo.min(0.0);
    let hi = whi + (whi - lo).abs() * 0.1;
    let pos_range = 0.2..(chart.n_visible as f64 + 0.8);

    let mut builder = ChartBuilder::on(area);
    builder.margin(10);
    if let Some(title) = &cfg.title {
        builder.caption(title, ("sans-serif", 20).into_font());
    }

    let name_style = ("sans-serif", 12).into_font().color(&BLACK);
    let value_style = ("sans-serif", 12)
        .into_font()
        .color(&RGBColor(60, 60, 60));

    match cfg.orientation {
        Orientation::Horizontal => {
            let mut cc = builder
                .x_label_area_size(24)
                .y_label_area_size(10)
                .build_cartesian_2d(lo..hi, pos_range)
                .map_err(backend_err)?;
            cc.configure_mesh()
                .disable_y_mesh()
                .y_labels(0)
                .x_labels(8)
                .x_label_formatter(&|v| format!("{:.0}", v))
                .draw()
                .map_err(backend_err)?;

            for &(c, r, v) in &bars {
                let color = chart.colors[c];
                cc.draw_series(std::iter::once(Rectangle::new(
                    [(0.0, r - 0.4), (v, r + 0.4)],
                    color.filled(),
                )))
                .map_err(backend_err)?;
                cc.draw_series(std::iter::once(Rectangle::new(
                    [(0.0, r - 0.4), (v, r + 0.4)],
                    WHITE.stroke_width(1),
                )))
                .map_err(backend_err)?;

                let name = chart.columns[c].clone();
                cc.draw_series(std::iter::once(
                    EmptyElement::at((v, r))
                        + Text::new(
                            name,
                            (-4, 0),
                            name_style.pos(Pos::new(HPos::Right, VPos::Center)),
                        ),
                ))
                .map_err(backend_err)?;
                if cfg.label_bars {
                    cc.draw_series(std::iter::once(
                        EmptyElement::at((v, r))
                            + Text::new(
                                format!("{:.0}", v),
                                (4, 0),
                                value_style.pos(Pos::new(HPos::Left, VPos::Center)),
                            ),
                    ))
                    .map_err(backend_err)?;
                }
            }

            if let Some(agg) = cfg.perpendicular_bar {
                let visible: Vec<f64> = bars.iter().map(|&(_, _, v)| v).collect();
                if let Some(stat) = agg.apply(&visible) {
                    let half = (hi - lo) * 0.002;
                    cc.draw_series(std::iter::once(Rectangle::new(
                        [
                            (stat - half, 0.2),
                            (stat + half, chart.n_visible as f64 + 0.8),
                        ],
                        RGBColor(110, 110, 110).filled(),
                    )))
                    .map_err(backend_err)?;
                }
            }
        }
        Orientation::Vertical => {
            let mut cc = builder
                .x_label_area_size(10)
                .y_label_area_size(40)
                .build_cartesian_2d(pos_range, lo..hi)
                .map_err(backend_err)?;
            cc.configure_mesh()
                .disable_x_mesh()
                .x_labels(0)
                .y_labels(8)
                .y_label_formatter(&|v| format!("{:.0}", v))
                .draw()
                .map_err(backend_err)?;

            for &(c, r, v) in &bars {
                let color = chart.colors[c];
                cc.draw_series(std::iter::once(Rectangle::new(
                    [(r - 0.4, 0.0), (r + 0.4, v)],
                    color.filled(),
                )))
                .map_err(backend_err)?;
                cc.draw_series(std::iter::once(Rectangle::new(
                    [(r - 0.4, 0.0), (r + 0.4, v)],
                    WHITE.stroke_width(1),
                )))
                .map_err(backend_err)?;

                let name = chart.columns[c].clone();
                cc.draw_series(std::iter::once(
                    EmptyElement::at((r, v))
                        + Text::new(
                            name,
                            (0, -16),
                            name_style.pos(Pos::new(HPos::Center, VPos::Bottom)),
                        ),
                ))
                .map_err(backend_err)?;
                if cfg.label_bars {
                    cc.draw_series(std::iter::once(
                        EmptyElement::at((r, v))
                            + Text::new(
                                format!("{:.0}", v),
                                (0, -4),
                                value_style.pos(Pos::new(HPos::Center, VPos::Bottom)),
                            ),
                    ))
                    .map_err(backend_err)?;
                }
            }

            if let Some(agg) = cfg.perpendicular_bar {
                let visible: Vec<f64> = bars.iter().map(|&(_, _, v)| v).collect();
                if let Some(stat) = agg.apply(&visible) {
                    let half = (hi - lo) * 0.002;
                    cc.draw_series(std::iter::once(Rectangle::new(
                        [
                            (0.2, stat - half),
                            (chart.n_visible as f64 + 0.8, stat + half),
                        ],
                        RGBColor(110, 110, 110).filled(),
                    )))
                    .map_err(backend_err)?;
                }
            }
        }
    }

    chart.draw_period_label(area, frame)
}
