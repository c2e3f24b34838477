#[macro_use]
extern crate log;

use std::path::Path;

use common::NumVisible;
use dialoguer::{theme::ColorfulTheme, Select};
use race_plot::{animate_multiple, Chart, ChartConfig};

fn main() {
    std::env::set_var("RUST_BACKTRACE", "1");

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    let sets = ["covid19", "urban_pop"];
    let e = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select dataset")
        .items(&sets)
        .default(0)
        .interact()
        .unwrap();
    let dataset: datasets::Dataset = sets[e].parse().unwrap();

    info!("loading dataset `{}`", sets[e]);
    let table = datasets::load_dataset(dataset).unwrap();
    // daily change pairs with the cumulative race below it
    let daily = table.diff();

    let race_cfg = ChartConfig {
        n_visible: NumVisible::Limit(10),
        title: Some("Total".to_string()),
        ..ChartConfig::default()
    };
    let line_cfg = ChartConfig {
        title: Some("Change per period".to_string()),
        ..ChartConfig::default()
    };
    let race = Chart::race(&table, race_cfg).unwrap();
    let line = Chart::line(&daily, line_cfg).unwrap();

    let out = Path::new("combined.gif");
    animate_multiple(
        &[&race, &line],
        out,
        (960, 1080),
        Some(sets[e]),
    )
    .unwrap();
    info!("wrote {}", out.display());
}
