use common::{ChartError, FixedOrder, PeriodAxis, Result, Table};
use frame_engine::{fixed_ranks, interpolate, interpolate_values, rank_rows};
use nalgebra::DMatrix;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::ChartConfig;
use crate::palette::colors_for;
use crate::{bubble, line, map, pie, race, scatter};

pub(crate) type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub(crate) fn backend_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Backend(e.to_string())
}

/// Polygon geometry for one category of a choropleth map
#[derive(Debug, Clone)]
pub struct GeoShape {
    /// Category name, must match a table column
    pub name: String,
    /// Closed rings of (x, y) vertices
    pub rings: Vec<Vec<(f64, f64)>>,
}

/// Chart kind plus whatever per-kind data the draw routine needs.
///
/// Dispatch is a plain tagged variant; each arm calls a free draw function
/// over the shared config and dense tables.
pub(crate) enum Kind {
    Race {
        ranks: DMatrix<f64>,
    },
    Line,
    Scatter,
    Pie,
    Bubble {
        x: DMatrix<f64>,
        size: Option<DMatrix<f64>>,
    },
    Map {
        shapes: Vec<GeoShape>,
    },
}

impl Kind {
    fn label(&self) -> &'static str {
        match self {
            Kind::Race { .. } => "bar race",
            Kind::Line => "line race",
            Kind::Scatter => "scatter",
            Kind::Pie => "pie",
            Kind::Bubble { .. } => "bubble",
            Kind::Map { .. } => "map",
        }
    }
}

/// One prepared chart: dense per-frame tables plus immutable rendering
/// configuration.
///
/// The interpolation and rank engines run exactly once, here, at
/// construction; afterwards the chart only serves read-only frame-indexed
/// lookups to the draw routines.
pub struct Chart {
    pub(crate) kind: Kind,
    pub(crate) cfg: ChartConfig,
    pub(crate) name: String,
    pub(crate) columns: Vec<String>,
    pub(crate) colors: Vec<RGBColor>,
    /// Dense period axis, one entry per frame
    pub(crate) axis: PeriodAxis,
    /// Dense values, one row per frame
    pub(crate) values: DMatrix<f64>,
    pub(crate) n_visible: usize,
}

impl Chart {
    /// Build a bar-chart race.
    ///
    /// Ranks are computed on the original observation rows and then
    /// interpolated separately so bar positions glide between periods.
    /// Fixed-order modes freeze the column ordering up front and broadcast
    /// a constant rank row instead of ranking per period.
    pub fn race(table: &Table, cfg: ChartConfig) -> Result<Self> {
        cfg.validate()?;

        let (table, n_visible, ranks) = match &cfg.fixed_order {
            FixedOrder::None => {
                let n_visible = cfg.n_visible.resolve(table.ncols())?;
                let ranks = rank_rows(table.values(), n_visible, cfg.sort, cfg.orientation);
                (table.clone(), n_visible, ranks)
            }
            FixedOrder::LastPeriod => {
                let n_visible = cfg.n_visible.resolve(table.ncols())?.min(table.ncols());
                let order = last_period_order(table, n_visible);
                let table = table.select_columns(&order)?;
                let ranks = fixed_ranks(table.nrows(), table.ncols(), cfg.sort, cfg.orientation);
                (table, n_visible, ranks)
            }
            FixedOrder::Explicit(names) => {
                let table = table.select_columns(names)?;
                let ranks = fixed_ranks(table.nrows(), table.ncols(), cfg.sort, cfg.orientation);
                (table, names.len(), ranks)
            }
        };

        let dense_ranks = interpolate_values(&ranks, cfg.steps_per_period);
        let dense = interpolate(&table, cfg.steps_per_period, cfg.interpolate_period)?;
        info!(
            "prepared bar race: {} categories, {} frames",
            dense.ncols(),
            dense.nrows()
        );

        Ok(Self::assemble(
            Kind::Race { ranks: dense_ranks },
            cfg,
            dense,
            n_visible,
        ))
    }

    /// Build an animated line race
    pub fn line(table: &Table, cfg: ChartConfig) -> Result<Self> {
        Self::simple(table, cfg, Kind::Line)
    }

    /// Build an animated scatter chart
    pub fn scatter(table: &Table, cfg: ChartConfig) -> Result<Self> {
        Self::simple(table, cfg, Kind::Scatter)
    }

    /// Build an animated pie chart
    pub fn pie(table: &Table, cfg: ChartConfig) -> Result<Self> {
        Self::simple(table, cfg, Kind::Pie)
    }

    /// Build an animated bubble chart from paired x/y tables plus an
    /// optional size table.
    ///
    /// All tables must share period count and category columns; they are
    /// interpolated with the same steps so their frames stay aligned.
    pub fn bubble(x: &Table, y: &Table, size: Option<&Table>, cfg: ChartConfig) -> Result<Self> {
        cfg.validate()?;
        if x.nrows() != y.nrows() || x.columns() != y.columns() {
            return Err(ChartError::DataShape(
                "bubble x and y tables must share period count and categories".to_string(),
            ));
        }
        if let Some(s) = size {
            if s.nrows() != x.nrows() || s.columns() != x.columns() {
                return Err(ChartError::DataShape(
                    "bubble size table must share period count and categories".to_string(),
                ));
            }
        }

        let dense_x = interpolate(x, cfg.steps_per_period, cfg.interpolate_period)?;
        let dense_y = interpolate_values(y.values(), cfg.steps_per_period);
        let dense_size = size.map(|s| interpolate_values(s.values(), cfg.steps_per_period));
        let n_visible = cfg.n_visible.resolve(x.ncols())?;

        let kind = Kind::Bubble {
            x: dense_x.values().clone(),
            size: dense_size,
        };
        let name = cfg.title.clone().unwrap_or_else(|| kind.label().to_string());
        let columns = dense_x.columns().to_vec();
        let colors = colors_for(columns.len(), &cfg.palette);
        Ok(Self {
            kind,
            name,
            columns,
            colors,
            axis: dense_x.axis().clone(),
            values: dense_y,
            n_visible,
            cfg,
        })
    }

    /// Build an animated choropleth map.
    ///
    /// Every table column must have matching polygon geometry.
    pub fn map(table: &Table, shapes: Vec<GeoShape>, cfg: ChartConfig) -> Result<Self> {
        cfg.validate()?;
        for col in table.columns() {
            if !shapes.iter().any(|s| &s.name == col) {
                return Err(ChartError::DataShape(format!(
                    "no geometry supplied for category `{}`",
                    col
                )));
            }
        }
        Self::simple(table, cfg, Kind::Map { shapes })
    }

    fn simple(table: &Table, cfg: ChartConfig, kind: Kind) -> Result<Self> {
        cfg.validate()?;
        let n_visible = cfg.n_visible.resolve(table.ncols())?;
        let dense = interpolate(table, cfg.steps_per_period, cfg.interpolate_period)?;
        Ok(Self::assemble(kind, cfg, dense, n_visible))
    }

    fn assemble(kind: Kind, cfg: ChartConfig, dense: Table, n_visible: usize) -> Self {
        let name = cfg.title.clone().unwrap_or_else(|| kind.label().to_string());
        let columns = dense.columns().to_vec();
        let colors = colors_for(columns.len(), &cfg.palette);
        Self {
            kind,
            name,
            columns,
            colors,
            axis: dense.axis().clone(),
            values: dense.values().clone(),
            n_visible,
            cfg,
        }
    }

    /// Total frames in the animation
    #[inline(always)]
    pub fn frame_count(&self) -> usize {
        self.values.nrows()
    }

    /// The chart's display name (title, or the kind when untitled)
    #[inline(always)]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rendering configuration
    #[inline(always)]
    pub fn config(&self) -> &ChartConfig {
        &self.cfg
    }

    /// Draw one frame onto the given drawing area
    pub fn draw_frame(&self, area: &Area<'_>, frame: usize) -> Result<()> {
        if frame >= self.frame_count() {
            return Err(ChartError::DataShape(format!(
                "frame {} out of range, chart has {} frames",
                frame,
                self.frame_count()
            )));
        }
        area.fill(&WHITE).map_err(backend_err)?;
        match &self.kind {
            Kind::Race { ranks } => race::draw(self, ranks, area, frame),
            Kind::Line => line::draw(self, area, frame),
            Kind::Scatter => scatter::draw(self, area, frame),
            Kind::Pie => pie::draw(self, area, frame),
            Kind::Bubble { x, size } => bubble::draw(self, x, size.as_ref(), area, frame),
            Kind::Map { shapes } => map::draw(self, shapes, area, frame),
        }
    }

    pub(crate) fn period_text(&self, frame: usize) -> String {
        self.axis.label(frame, self.cfg.period_fmt.as_deref())
    }

    // The configured summary callback applied to this frame's values
    pub(crate) fn summary_text(&self, frame: usize) -> Option<String> {
        self.cfg.period_summary.as_ref().map(|summary| {
            let row: Vec<f64> = self.values.row(frame).iter().copied().collect();
            summary.call(&self.period_text(frame), &row)
        })
    }

    // Large period annotation in the lower right corner, plus the optional
    // per-frame summary line in the upper left
    pub(crate) fn draw_period_label(&self, area: &Area<'_>, frame: usize) -> Result<()> {
        let (w, h) = area.dim_in_pixel();
        if self.cfg.period_label {
            let style = ("sans-serif", 24).into_font().color(&RGBColor(90, 90, 90));
            area.draw(&Text::new(
                self.period_text(frame),
                ((w as f64 * 0.72) as i32, (h as f64 * 0.82) as i32),
                style,
            ))
            .map_err(backend_err)?;
        }
        if let Some(text) = self.summary_text(frame) {
            let style = ("sans-serif", 16).into_font().color(&RGBColor(90, 90, 90));
            area.draw(&Text::new(
                text,
                ((w as f64 * 0.05) as i32, (h as f64 * 0.06) as i32),
                style,
            ))
            .map_err(backend_err)?;
        }
        Ok(())
    }
}

// Categories ordered by their final period's value, largest first, ties in
// column order, truncated to the visible window
fn last_period_order(table: &Table, n_visible: usize) -> Vec<String> {
    let last = table.nrows() - 1;
    let mut order: Vec<usize> = (0..table.ncols()).collect();
    order.sort_by(|&a, &b| {
        let va = table.values()[(last, a)];
        let vb = table.values()[(last, b)];
        match (va.is_finite(), vb.is_finite()) {
            (true, true) => vb.partial_cmp(&va).unwrap_or(std::cmp::Ordering::Equal),
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            (false, false) => std::cmp::Ordering::Equal,
        }
    });
    order
        .into_iter()
        .take(n_visible)
        .map(|i| table.columns()[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use common::{NumVisible, Orientation, Sort};

    use super::*;

    fn table(rows: usize, cols: usize, data: &[f64]) -> Table {
        let axis = PeriodAxis::Numeric((0..rows).map(|i| i as f64).collect());
        let names = (0..cols).map(|c| format!("c{}", c)).collect();
        Table::new(axis, names, DMatrix::from_row_slice(rows, cols, data)).unwrap()
    }

    #[test]
    fn race_frame_count_matches_interpolation() {
        let t = table(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let cfg = ChartConfig {
            steps_per_period: 4,
            ..ChartConfig::default()
        };
        let chart = Chart::race(&t, cfg).unwrap();
        assert_eq!(chart.frame_count(), (3 - 1) * 4 + 1);
    }

    #[test]
    fn fixed_order_ranks_are_constant() {
        // c1 leads early, c0 leads at the end; a frozen ordering must not care
        let t = table(3, 2, &[1.0, 9.0, 5.0, 5.0, 9.0, 1.0]);
        let cfg = ChartConfig {
            steps_per_period: 3,
            fixed_order: FixedOrder::LastPeriod,
            sort: Sort::Desc,
            orientation: Orientation::Vertical,
            ..ChartConfig::default()
        };
        let chart = Chart::race(&t, cfg).unwrap();
        assert_eq!(chart.columns, vec!["c0".to_string(), "c1".to_string()]);
        match &chart.kind {
            Kind::Race { ranks } => {
                for f in 0..chart.frame_count() {
                    assert_eq!(ranks[(f, 0)], 1.0);
                    assert_eq!(ranks[(f, 1)], 2.0);
                }
            }
            _ => panic!("expected a race"),
        }
    }

    #[test]
    fn explicit_order_sets_visible_count() {
        let t = table(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let cfg = ChartConfig {
            fixed_order: FixedOrder::Explicit(vec!["c2".to_string(), "c0".to_string()]),
            ..ChartConfig::default()
        };
        let chart = Chart::race(&t, cfg).unwrap();
        assert_eq!(chart.n_visible, 2);
        assert_eq!(chart.columns, vec!["c2".to_string(), "c0".to_string()]);
    }

    #[test]
    fn explicit_order_unknown_category_fails() {
        let t = table(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let cfg = ChartConfig {
            fixed_order: FixedOrder::Explicit(vec!["nope".to_string()]),
            ..ChartConfig::default()
        };
        assert!(matches!(
            Chart::race(&t, cfg),
            Err(ChartError::DataShape(_))
        ));
    }

    #[test]
    fn limited_window_keeps_all_columns() {
        let t = table(2, 4, &[1.0, 2.0, 3.0, 4.0, 4.0, 3.0, 2.0, 1.0]);
        let cfg = ChartConfig {
            n_visible: NumVisible::Limit(2),
            ..ChartConfig::default()
        };
        let chart = Chart::race(&t, cfg).unwrap();
        // Off-screen categories keep their columns, parked at the clip rank
        assert_eq!(chart.columns.len(), 4);
        assert_eq!(chart.n_visible, 2);
    }

    #[test]
    fn period_summary_reads_frame_values() {
        use crate::config::PeriodSummary;

        let t = table(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let cfg = ChartConfig {
            steps_per_period: 2,
            period_summary: Some(PeriodSummary::new(|period, values| {
                let total: f64 = values.iter().filter(|v| v.is_finite()).sum();
                format!("{}: total {:.0}", period, total)
            })),
            ..ChartConfig::default()
        };
        let chart = Chart::race(&t, cfg).unwrap();
        assert_eq!(chart.summary_text(0).unwrap(), "0: total 3");
        let last = chart.frame_count() - 1;
        assert_eq!(chart.summary_text(last).unwrap(), "1: total 7");

        let plain = Chart::race(&t, ChartConfig::default()).unwrap();
        assert!(plain.summary_text(0).is_none());
    }

    #[test]
    fn bubble_rejects_mismatched_tables() {
        let x = table(3, 2, &[1.0; 6]);
        let y = table(2, 2, &[1.0; 4]);
        assert!(matches!(
            Chart::bubble(&x, &y, None, ChartConfig::default()),
            Err(ChartError::DataShape(_))
        ));
    }

    #[test]
    fn map_requires_geometry_for_every_category() {
        let t = table(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let shapes = vec![GeoShape {
            name: "c0".to_string(),
            rings: vec![vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]],
        }];
        assert!(matches!(
            Chart::map(&t, shapes, ChartConfig::default()),
            Err(ChartError::DataShape(_))
        ));
    }
}
