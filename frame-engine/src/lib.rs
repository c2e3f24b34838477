//! The frame-synthesis core: expands sparse period-indexed observations into
//! dense per-frame tables and drives synchronized playback over them.
//!
//! The pipeline is raw table -> [`interpolate`] -> dense table ->
//! [`rank_rows`] (race charts) / [`value_window`] (all charts) -> per-frame
//! draw calls fanned out by the [`Synchronizer`].

#[macro_use]
extern crate log;

mod axis;
mod clock;
mod interpolate;
mod rank;

pub use axis::{period_window, value_window};
pub use clock::{FrameClock, FrameDraw, Synchronizer};
pub use interpolate::{interpolate, interpolate_values};
pub use rank::{fixed_ranks, flip_required, rank_rows};
