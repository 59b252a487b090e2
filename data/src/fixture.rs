//! JSON fixtures: chart data and theme files read from disk.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::Theme;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, Error> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    from_str(&text).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn from_str<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(text)
}

/// A preset name (`dark`, `light`, `nord`) or the path of a theme file.
pub fn theme(name_or_path: &str) -> Result<Theme, Error> {
    match Theme::preset(name_or_path) {
        Some(theme) => Ok(theme),
        None => load(name_or_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Candle, Series};

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load::<Series>("/definitely/not/here.json").unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }

    #[test]
    fn reads_candles_from_disk() {
        let path = std::env::temp_dir().join(format!("ukx-candles-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"[{"time": 0, "open": 1, "high": 3, "low": 1, "close": 2, "volume": 5}]"#,
        )
        .unwrap();

        let candles: Vec<Candle> = load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].high, 3.0);
    }

    #[test]
    fn malformed_json_is_reported() {
        let path = std::env::temp_dir().join(format!("ukx-broken-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        let err = load::<Series>(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, Error::Json { .. }));
    }

    #[test]
    fn theme_presets_need_no_file() {
        assert_eq!(theme("nord").unwrap(), crate::theme::Preset::Nord.theme());
        assert!(matches!(theme("no-such-theme.json"), Err(Error::Io { .. })));
    }
}
