use std::fmt;
use std::sync::Arc;

use common::{ChartError, FixedOrder, NumVisible, Orientation, Result, Sort};
use plotters::style::RGBColor;

use crate::palette::DARK24;

/// A summary statistic drawn as a thin bar perpendicular to the race bars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Mean,
    Median,
    Min,
    Max,
}

impl Aggregate {
    /// Apply the statistic to the given values; `None` when empty
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        match self {
            Aggregate::Mean => Some(values.iter().sum::<f64>() / values.len() as f64),
            Aggregate::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    Some((sorted[mid - 1] + sorted[mid]) / 2.0)
                } else {
                    Some(sorted[mid])
                }
            }
            Aggregate::Min => values.iter().cloned().reduce(f64::min),
            Aggregate::Max => values.iter().cloned().reduce(f64::max),
        }
    }
}

/// A caller-supplied summary line recomputed and drawn onto the axes each
/// frame.
///
/// The function receives the frame's period label and the frame's values,
/// one per category in column order with `NaN` marking missing cells, and
/// returns the text to render.
#[derive(Clone)]
pub struct PeriodSummary(Arc<dyn Fn(&str, &[f64]) -> String + Send + Sync>);

impl PeriodSummary {
    /// Wrap a summary function
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &[f64]) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub(crate) fn call(&self, period: &str, values: &[f64]) -> String {
        (self.0)(period, values)
    }
}

impl fmt::Debug for PeriodSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PeriodSummary(..)")
    }
}

/// Rendering configuration shared by every chart kind.
///
/// Immutable once the chart is built; validation happens at construction so
/// a bad configuration never makes it to the first frame.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Interpolation steps between consecutive periods
    pub steps_per_period: usize,
    /// Milliseconds one period takes to play
    pub period_length_ms: u32,
    /// Visible window size for races
    pub n_visible: NumVisible,
    /// Bar sorting direction
    pub sort: Sort,
    /// Bar orientation
    pub orientation: Orientation,
    /// Category ordering policy for races
    pub fixed_order: FixedOrder,
    /// Hold the axis limits constant over the whole animation
    pub fixed_max: bool,
    /// Interpolate the period axis itself (datetime/numeric axes only)
    pub interpolate_period: bool,
    /// Write each bar's value next to it
    pub label_bars: bool,
    /// Show the current period as a large label on the axes
    pub period_label: bool,
    /// chrono format string for datetime period labels
    pub period_fmt: Option<String>,
    /// Optional summary bar drawn across the race
    pub perpendicular_bar: Option<Aggregate>,
    /// Optional summary line recomputed from each frame's values
    pub period_summary: Option<PeriodSummary>,
    /// Line stroke width for line races
    pub line_width: u32,
    /// Chart title
    pub title: Option<String>,
    /// Output dimensions in pixels
    pub size: (u32, u32),
    /// Category colors, cycled as needed
    pub palette: Vec<RGBColor>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            steps_per_period: 10,
            period_length_ms: 500,
            n_visible: NumVisible::All,
            sort: Sort::Desc,
            orientation: Orientation::Horizontal,
            fixed_order: FixedOrder::None,
            fixed_max: false,
            interpolate_period: true,
            label_bars: true,
            period_label: true,
            period_fmt: None,
            perpendicular_bar: None,
            period_summary: None,
            line_width: 2,
            title: None,
            size: (960, 540),
            palette: DARK24.to_vec(),
        }
    }
}

impl ChartConfig {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.steps_per_period < 1 {
            return Err(ChartError::Configuration(
                "`steps_per_period` must be at least 1".to_string(),
            ));
        }
        if self.period_length_ms == 0 {
            return Err(ChartError::Configuration(
                "`period_length_ms` must be greater than zero".to_string(),
            ));
        }
        if self.palette.is_empty() {
            return Err(ChartError::Configuration(
                "`palette` must contain at least one color".to_string(),
            ));
        }
        if self.size.0 == 0 || self.size.1 == 0 {
            return Err(ChartError::Configuration(
                "`size` must be non-zero in both dimensions".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ChartConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let mut cfg = ChartConfig::default();
        cfg.steps_per_period = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ChartConfig::default();
        cfg.period_length_ms = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ChartConfig::default();
        cfg.palette.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn aggregates() {
        let vals = [1.0, 2.0, 3.0, 10.0];
        assert_eq!(Aggregate::Mean.apply(&vals), Some(4.0));
        assert_eq!(Aggregate::Median.apply(&vals), Some(2.5));
        assert_eq!(Aggregate::Min.apply(&vals), Some(1.0));
        assert_eq!(Aggregate::Max.apply(&vals), Some(10.0));
        assert_eq!(Aggregate::Mean.apply(&[]), None);
    }
}
