use std::path::Path;

use common::{ChartError, Result};
use frame_engine::{FrameClock, FrameDraw, Synchronizer};
use plotters::prelude::*;

use crate::chart::{backend_err, Area, Chart};

// Adapts a chart plus its sub-area to the synchronizer's drawing seam
struct SubChart<'c, 'b> {
    chart: &'c Chart,
    area: Area<'b>,
}

impl<'c, 'b> FrameDraw for SubChart<'c, 'b> {
    fn name(&self) -> &str {
        self.chart.name()
    }

    fn frame_count(&self) -> usize {
        self.chart.frame_count()
    }

    fn draw_frame(&mut self, frame: usize) -> Result<()> {
        self.chart.draw_frame(&self.area, frame)
    }
}

/// Render several charts into one animated GIF, stacked vertically and
/// advancing in lock-step.
///
/// The shared frame count is the minimum over the charts and the frame
/// interval comes from the first chart's configuration, so charts meant to
/// play together should be built with the same period count and
/// `steps_per_period`.
pub fn animate_multiple(
    charts: &[&Chart],
    filename: &Path,
    size: (u32, u32),
    title: Option<&str>,
) -> Result<()> {
    let first = charts.first().ok_or_else(|| {
        ChartError::Configuration("at least one chart is required".to_string())
    })?;
    match filename.extension().and_then(|e| e.to_str()) {
        Some("gif") => {}
        _ => {
            return Err(ChartError::Backend(format!(
                "combined animations render to gif, got `{}`",
                filename.display()
            )))
        }
    }

    let cfg = first.config();
    let clock = FrameClock::new(cfg.period_length_ms, cfg.steps_per_period)?;
    let root = BitMapBackend::gif(filename, size, clock.interval_ms)
        .map_err(backend_err)?
        .into_drawing_area();
    let canvas = match title {
        Some(t) => root
            .titled(t, ("sans-serif", 30).into_font())
            .map_err(backend_err)?,
        None => root.clone(),
    };

    let areas = canvas.split_evenly((charts.len(), 1));
    let mut sync = Synchronizer::new();
    for (&chart, area) in charts.iter().zip(areas) {
        sync.register(Box::new(SubChart { chart, area }));
    }

    info!(
        "rendering {} charts, {} shared frames, to {}",
        charts.len(),
        sync.frame_count(),
        filename.display()
    );
    for frame in 0..sync.frame_count() {
        sync.advance(frame)?;
        root.present().map_err(backend_err)?;
    }
    Ok(())
}
