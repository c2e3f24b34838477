use std::str::FromStr;

use crate::{ChartError, Result};

/// Direction in which bars are sorted in a race
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    /// Smallest value first
    Asc,
    /// Largest value first
    Desc,
}

impl FromStr for Sort {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(Sort::Asc),
            "desc" => Ok(Sort::Desc),
            other => Err(ChartError::Configuration(format!(
                "`sort` must be \"asc\" or \"desc\", got \"{}\"",
                other
            ))),
        }
    }
}

/// Orientation of the bars in a race
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Bars run left to right, stacked vertically
    Horizontal,
    /// Bars run bottom to top, side by side
    Vertical,
}

impl FromStr for Orientation {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "h" | "horizontal" => Ok(Orientation::Horizontal),
            "v" | "vertical" => Ok(Orientation::Vertical),
            other => Err(ChartError::Configuration(format!(
                "`orientation` must be \"h\" or \"v\", got \"{}\"",
                other
            ))),
        }
    }
}

/// How many categories are drawn inside the visible window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumVisible {
    /// Show every category
    All,
    /// Show at most this many categories, the rest sit just off-screen
    Limit(usize),
}

impl NumVisible {
    /// Resolve to a concrete count for a table with `n_categories` columns
    pub fn resolve(&self, n_categories: usize) -> Result<usize> {
        match self {
            NumVisible::All => Ok(n_categories),
            NumVisible::Limit(0) => Err(ChartError::Configuration(
                "`n_visible` must be greater than zero".to_string(),
            )),
            NumVisible::Limit(n) => Ok(*n),
        }
    }
}

/// Category ordering policy for bar races.
///
/// The two fixed variants bypass per-row ranking entirely and broadcast a
/// single static ordering to every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixedOrder {
    /// Re-rank every period according to the values (the default)
    None,
    /// Freeze the ordering at the final period's ranking
    LastPeriod,
    /// Use exactly this category ordering for the whole animation
    Explicit(Vec<String>),
}

impl Default for FixedOrder {
    fn default() -> Self {
        FixedOrder::None
    }
}
