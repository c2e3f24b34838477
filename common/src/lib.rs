//! Shared data model and configuration for animated chart races

#![deny(unused_imports, unused_crate_dependencies)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod config;
mod error;
mod table;

pub use config::{FixedOrder, NumVisible, Orientation, Sort};
pub use error::{ChartError, Result};
pub use table::{PeriodAxis, Table};
