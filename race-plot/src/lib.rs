//! Plotters-backed rendering for animated chart races.
//!
//! A [`Chart`] runs the frame-engine once at construction and caches the
//! dense per-frame tables; rendering then replays those tables one frame at
//! a time into a GIF, a PNG frame sequence, or an embeddable HTML tag.

#[macro_use]
extern crate log;

mod bubble;
mod chart;
mod config;
mod export;
mod line;
mod map;
mod multi;
mod palette;
mod pie;
mod race;
mod scatter;

pub use chart::{Chart, GeoShape};
pub use config::{Aggregate, ChartConfig, PeriodSummary};
pub use export::{export, export_html, Output};
pub use multi::animate_multiple;
pub use palette::{colors_for, DARK24};
