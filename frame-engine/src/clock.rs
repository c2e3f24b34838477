use common::{ChartError, Result};

/// Translates the period configuration into the per-frame tick interval.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    /// Milliseconds between consecutive frames
    pub interval_ms: u32,
}

impl FrameClock {
    /// Derive the frame interval from how long one period plays and how
    /// many interpolation steps it contains
    pub fn new(period_length_ms: u32, steps_per_period: usize) -> Result<Self> {
        if period_length_ms == 0 {
            return Err(ChartError::Configuration(
                "`period_length_ms` must be greater than zero".to_string(),
            ));
        }
        if steps_per_period == 0 {
            return Err(ChartError::Configuration(
                "`steps_per_period` must be at least 1".to_string(),
            ));
        }
        let interval_ms = ((period_length_ms as f64 / steps_per_period as f64).round() as u32).max(1);
        Ok(Self { interval_ms })
    }

    /// Frames per second implied by the interval
    #[inline(always)]
    pub fn fps(&self) -> f64 {
        1000.0 / self.interval_ms as f64
    }
}

/// The seam between the frame clock and anything that can render a frame.
pub trait FrameDraw {
    /// Identifies the chart in synchronization errors
    fn name(&self) -> &str;

    /// Total frames this chart can draw
    fn frame_count(&self) -> usize;

    /// Draw the given frame, fully, before the clock moves on
    fn draw_frame(&mut self, frame: usize) -> Result<()>;
}

/// Drives several independently prepared charts from one frame counter.
///
/// Playback is fully synchronous: every registered chart draws frame `i`
/// before frame `i + 1` begins. The shared frame count is the minimum over
/// all charts, so a shorter chart truncates playback rather than being
/// padded or looped — callers wanting full-length playback must build their
/// charts from tables of equal period count and equal steps per period.
pub struct Synchronizer<'a> {
    charts: Vec<Box<dyn FrameDraw + 'a>>,
}

impl<'a> Default for Synchronizer<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Synchronizer<'a> {
    /// An empty synchronizer
    pub fn new() -> Self {
        Self { charts: vec![] }
    }

    /// Register another chart to drive
    pub fn register(&mut self, chart: Box<dyn FrameDraw + 'a>) {
        self.charts.push(chart);
    }

    /// The shared frame count: the minimum over all registered charts
    pub fn frame_count(&self) -> usize {
        self.charts
            .iter()
            .map(|c| c.frame_count())
            .min()
            .unwrap_or(0)
    }

    /// Fan one frame index out to every chart.
    ///
    /// A failing chart stops the tick and is reported with the frame index
    /// and chart name so a length mismatch is diagnosable.
    pub fn advance(&mut self, frame: usize) -> Result<()> {
        for chart in &mut self.charts {
            let name = chart.name().to_string();
            chart.draw_frame(frame).map_err(|e| {
                ChartError::DataShape(format!(
                    "frame {}: chart `{}` failed: {} (ensure all charts share period count and steps_per_period)",
                    frame, name, e
                ))
            })?;
        }
        Ok(())
    }

    /// Play every shared frame once, in order
    pub fn run(&mut self) -> Result<()> {
        let frames = self.frame_count();
        debug!("synchronizing {} charts over {} frames", self.charts.len(), frames);
        for frame in 0..frames {
            self.advance(frame)?;
        }
        Ok(())
    }
}
