#[macro_use]
extern crate log;

use std::path::PathBuf;

use common::NumVisible;
use dialoguer::{theme::ColorfulTheme, Select};
use race_plot::{export, Chart, ChartConfig, Output};

fn main() {
    std::env::set_var("RUST_BACKTRACE", "1");

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let kinds = ["bar race", "line race", "scatter", "pie"];
    let e = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select chart kind")
        .items(&kinds)
        .default(0)
        .interact()
        .unwrap();

    info!("loading covid19 dataset");
    let table = datasets::load_dataset(datasets::Dataset::Covid19).unwrap();
    info!(
        "got {} periods across {} countries",
        table.nrows(),
        table.ncols()
    );

    let cfg = ChartConfig {
        n_visible: NumVisible::Limit(10),
        title: Some("COVID-19 deaths by country".to_string()),
        ..ChartConfig::default()
    };
    let chart = match e {
        0 => Chart::race(&table, cfg),
        1 => Chart::line(&table, cfg),
        2 => Chart::scatter(&table, cfg),
        3 => Chart::pie(&table, cfg),
        _ => panic!("invalid selection"),
    }
    .unwrap();

    let out = PathBuf::from("covid19.gif");
    export(&chart, &Output::File(out.clone())).unwrap();
    info!("wrote {}", out.display());
}
