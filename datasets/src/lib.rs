//! Sample period tables fetched from the public `pandas_alive` data
//! repository, for the demo binaries and for quick experiments.

#![deny(unused_imports, unused_crate_dependencies)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

use std::str::FromStr;

use common::{ChartError, Result, Table};

const DATA_ROOT: &str = "https://raw.githubusercontent.com/JackMcKew/pandas_alive/master/data";

/// The bundled sample datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    /// Daily covid-19 deaths by country
    Covid19,
    /// Urban population by region, yearly
    UrbanPop,
}

impl Dataset {
    /// The dataset's file stem in the data repository
    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::Covid19 => "covid19",
            Dataset::UrbanPop => "urban_pop",
        }
    }

    /// Full download URL for the dataset's csv
    pub fn url(&self) -> String {
        format!("{}/{}.csv", DATA_ROOT, self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "covid19" => Ok(Dataset::Covid19),
            "urban_pop" => Ok(Dataset::UrbanPop),
            _ => Err(ChartError::Configuration(format!(
                "unknown dataset `{}`, expected `covid19` or `urban_pop`",
                s
            ))),
        }
    }
}

/// Download a sample dataset and parse it into a [`Table`].
///
/// The first csv column becomes the period axis, the remaining numeric
/// columns become categories.
pub fn load_dataset(dataset: Dataset) -> Result<Table> {
    let url = dataset.url();
    info!("fetching dataset `{}` from {}", dataset.as_str(), url);
    let response = ureq::get(&url)
        .call()
        .map_err(|e| ChartError::Backend(format!("fetching `{}`: {}", url, e)))?;
    Table::from_csv(response.into_reader())
}
