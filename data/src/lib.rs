pub mod candle;
pub mod chart;
pub mod config;
pub mod fixture;
pub mod log;
pub mod sample;
pub mod series;
pub mod stats;
pub mod theme;
pub mod util;

pub use candle::{Candle, CandleTime};
pub use config::{ChartSize, ScaleFactor};
pub use series::{BoxData, BoxSeries, Label, PieEntry, Series, SeriesError};
pub use stats::BoxStats;
pub use theme::Theme;

use std::path::PathBuf;

const APP_DIR: &str = "ukx-charts";

/// Root of the files the binary writes, `UKX_CHARTS_DATA_PATH` overrides the user data dir.
pub fn data_path(path_name: Option<&str>) -> PathBuf {
    let root = match std::env::var("UKX_CHARTS_DATA_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => dirs_next::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR),
    };

    match path_name {
        Some(name) => root.join(name),
        None => root,
    }
}

pub fn get_data_path(path_name: &str) -> PathBuf {
    data_path(Some(path_name))
}
