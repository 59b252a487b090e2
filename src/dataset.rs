//! Chart input for the binary: a fixture file or generated sample data, tagged
//! with the chart kind it feeds.

use std::path::Path;

use data::chart::Kind;
use data::{BoxData, Candle, PieEntry, Series, fixture, sample};

#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Line(Series),
    Bar(Series),
    Pie(Vec<PieEntry>),
    Box(BoxData),
    Candlestick(Vec<Candle>),
}

impl Dataset {
    pub fn load(kind: Kind, path: impl AsRef<Path>) -> Result<Self, fixture::Error> {
        let path = path.as_ref();
        log::info!("Loading {kind} data from {}", path.display());

        Ok(match kind {
            Kind::Line => Dataset::Line(fixture::load(path)?),
            Kind::Bar => Dataset::Bar(fixture::load(path)?),
            Kind::Pie => Dataset::Pie(fixture::load(path)?),
            Kind::Box => Dataset::Box(fixture::load(path)?),
            Kind::Candlestick => Dataset::Candlestick(fixture::load(path)?),
        })
    }

    /// Deterministic sample data, `count` points where the kind has a length.
    pub fn sample(kind: Kind, count: usize, seed: u64) -> Self {
        match kind {
            Kind::Line => Dataset::Line(sample::price_series(count, seed)),
            Kind::Bar => Dataset::Bar(sample::volumes(seed)),
            Kind::Pie => Dataset::Pie(sample::allocation(seed)),
            Kind::Box => Dataset::Box(sample::price_distribution(count, seed)),
            Kind::Candlestick => Dataset::Candlestick(sample::candles(count, seed)),
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Dataset::Line(_) => Kind::Line,
            Dataset::Bar(_) => Kind::Bar,
            Dataset::Pie(_) => Kind::Pie,
            Dataset::Box(_) => Kind::Box,
            Dataset::Candlestick(_) => Kind::Candlestick,
        }
    }
}
