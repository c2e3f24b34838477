use std::path::{Path, PathBuf};

use base64::Engine as _;
use common::{ChartError, Result};
use frame_engine::FrameClock;
use plotters::prelude::*;

use crate::chart::{backend_err, Chart};

/// Where a rendered animation goes.
///
/// The file extension selects the writer; there is no ambient output-type
/// state, every render names its destination explicitly.
#[derive(Debug, Clone)]
pub enum Output {
    /// Write to disk, format chosen by the file extension
    File(PathBuf),
    /// Return an HTML `<img>` tag with the animation embedded as base64
    Html,
}

/// Render the chart's full animation.
///
/// Returns the embed markup for [`Output::Html`], `None` for file outputs.
pub fn export(chart: &Chart, output: &Output) -> Result<Option<String>> {
    match output {
        Output::File(path) => {
            match extension(path)? {
                "gif" => render_gif(chart, path)?,
                "png" => render_png_frames(chart, path)?,
                other => {
                    return Err(ChartError::Backend(format!(
                        "unsupported output extension `{}`, expected `gif` or `png`",
                        other
                    )))
                }
            }
            Ok(None)
        }
        Output::Html => export_html(chart).map(Some),
    }
}

/// Render to an in-memory HTML `<img>` tag with the GIF base64-embedded.
///
/// The intermediate GIF lives in a uniquely named temp file, so concurrent
/// exports in the same process cannot overwrite each other.
pub fn export_html(chart: &Chart) -> Result<String> {
    let file = tempfile::Builder::new()
        .prefix("race-")
        .suffix(".gif")
        .tempfile()
        .map_err(|e| ChartError::Backend(format!("creating temp gif: {}", e)))?;
    render_gif(chart, file.path())?;
    let bytes = std::fs::read(file.path())
        .map_err(|e| ChartError::Backend(format!("reading rendered gif: {}", e)))?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("<img src=\"data:image/gif;base64,{}\"/>", encoded))
}

fn render_gif(chart: &Chart, path: &Path) -> Result<()> {
    let cfg = chart.config();
    let clock = FrameClock::new(cfg.period_length_ms, cfg.steps_per_period)?;
    info!(
        "rendering {} frames to {} at {:.1} fps",
        chart.frame_count(),
        path.display(),
        clock.fps()
    );
    let area = BitMapBackend::gif(path, cfg.size, clock.interval_ms)
        .map_err(backend_err)?
        .into_drawing_area();
    for frame in 0..chart.frame_count() {
        chart.draw_frame(&area, frame)?;
        area.present().map_err(backend_err)?;
    }
    Ok(())
}

// One numbered still per frame, next to the requested path
fn render_png_frames(chart: &Chart, path: &Path) -> Result<()> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ChartError::Configuration(format!("invalid path `{}`", path.display())))?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    for frame in 0..chart.frame_count() {
        let frame_path = dir.join(format!("{}_{:04}.png", stem, frame));
        let area =
            BitMapBackend::new(&frame_path, chart.config().size).into_drawing_area();
        chart.draw_frame(&area, frame)?;
        area.present().map_err(backend_err)?;
    }
    Ok(())
}

fn extension(path: &Path) -> Result<&str> {
    path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
        ChartError::Configuration(format!(
            "output path `{}` has no file extension",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use chrono::NaiveDate;
    use common::{PeriodAxis, Table};
    use nalgebra::DMatrix;

    use super::*;
    use crate::chart::GeoShape;
    use crate::config::ChartConfig;

    fn axis(n: usize) -> PeriodAxis {
        PeriodAxis::DateTime(
            (0..n)
                .map(|i| {
                    NaiveDate::from_ymd_opt(2020, 1, 1 + i as u32)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap()
                })
                .collect(),
        )
    }

    // a font-free chart so rendering does not depend on the host's
    // text stack
    fn map_chart() -> Chart {
        let table = Table::new(
            axis(3),
            vec!["a".to_string(), "b".to_string()],
            DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 2.0, 3.0, 3.0, 4.0]),
        )
        .unwrap();
        let shapes = vec![
            GeoShape {
                name: "a".to_string(),
                rings: vec![vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]],
            },
            GeoShape {
                name: "b".to_string(),
                rings: vec![vec![(1.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0)]],
            },
        ];
        let cfg = ChartConfig {
            steps_per_period: 2,
            period_label: false,
            size: (80, 60),
            ..ChartConfig::default()
        };
        Chart::map(&table, shapes, cfg).unwrap()
    }

    #[test]
    fn unknown_extension_is_rejected() {
        if let Err(_) = pretty_env_logger::try_init() {}
        let chart = map_chart();
        let out = Output::File(PathBuf::from("anim.webm"));
        assert!(matches!(
            export(&chart, &out),
            Err(ChartError::Backend(_))
        ));
    }

    #[test]
    fn missing_extension_is_rejected() {
        if let Err(_) = pretty_env_logger::try_init() {}
        let chart = map_chart();
        let out = Output::File(PathBuf::from("anim"));
        assert!(matches!(
            export(&chart, &out),
            Err(ChartError::Configuration(_))
        ));
    }

    #[test]
    fn gif_export_writes_file() {
        if let Err(_) = pretty_env_logger::try_init() {}
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        let chart = map_chart();
        let result = export(&chart, &Output::File(path.clone())).unwrap();
        assert!(result.is_none());
        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn html_export_embeds_gif() {
        if let Err(_) = pretty_env_logger::try_init() {}
        let chart = map_chart();
        let html = export_html(&chart).unwrap();
        assert!(html.starts_with("<img src=\"data:image/gif;base64,"));
        assert!(html.ends_with("\"/>"));
    }

    #[test]
    fn concurrent_html_exports_do_not_collide() {
        if let Err(_) = pretty_env_logger::try_init() {}
        let handles: Vec<_> = (0..2)
            .map(|_| std::thread::spawn(|| export_html(&map_chart()).unwrap()))
            .collect();
        for handle in handles {
            let html = handle.join().unwrap();
            assert!(html.starts_with("<img src=\"data:image/gif;base64,"));
            assert!(html.len() > 100);
        }
    }
}
