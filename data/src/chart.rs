use serde::{Deserialize, Serialize};

pub mod bar;
pub mod boxplot;
pub mod candlestick;

pub use bar::BarOptions;
pub use boxplot::BoxPlotOptions;
pub use candlestick::CandlestickOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    #[default]
    Line,
    Bar,
    Pie,
    Box,
    Candlestick,
}

impl Kind {
    pub const ALL: [Kind; 5] = [Kind::Line, Kind::Bar, Kind::Pie, Kind::Box, Kind::Candlestick];
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Line => write!(f, "line"),
            Kind::Bar => write!(f, "bar"),
            Kind::Pie => write!(f, "pie"),
            Kind::Box => write!(f, "box"),
            Kind::Candlestick => write!(f, "candlestick"),
        }
    }
}

impl std::str::FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.to_string() == s.to_ascii_lowercase())
            .ok_or_else(|| {
                let names: Vec<String> = Kind::ALL.iter().map(ToString::to_string).collect();
                format!("unknown chart kind `{s}`, expected one of {}", names.join(", "))
            })
    }
}
