//! Deterministic demo data: random walks seeded so renders are reproducible.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{BoxData, BoxSeries, Candle, PieEntry, Series};

const START_PRICE: f64 = 64_000.0;
/// Largest relative move of one step.
const VOLATILITY: f64 = 0.012;
const HOUR_MS: i64 = 3_600_000;

fn start_time() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_704_067_200_000).unwrap_or_default()
}

/// Hourly OHLCV candles starting at 2024-01-01 00:00 UTC.
pub fn candles(count: usize, seed: u64) -> Vec<Candle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = start_time().timestamp_millis();

    let mut close = START_PRICE;
    (0..count)
        .map(|i| {
            let open = close;
            close = open * (1.0 + rng.random_range(-VOLATILITY..VOLATILITY));

            let high = open.max(close) * (1.0 + rng.random_range(0.0..VOLATILITY / 2.0));
            let low = open.min(close) * (1.0 - rng.random_range(0.0..VOLATILITY / 2.0));
            let volume = rng.random_range(50.0..1_500.0);

            Candle::new(start + i as i64 * HOUR_MS, open, high, low, close).with_volume(volume)
        })
        .collect()
}

/// Daily closing prices labelled `MM-DD`.
pub fn price_series(count: usize, seed: u64) -> Series {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = start_time();

    let mut price = START_PRICE;
    let mut x = Vec::with_capacity(count);
    let mut y = Vec::with_capacity(count);
    for day in 0..count {
        let date = start + Duration::days(day as i64);
        x.push(date.format("%m-%d").to_string());
        y.push((price * 100.0).round() / 100.0);
        price *= 1.0 + rng.random_range(-VOLATILITY * 2.0..VOLATILITY * 2.0);
    }

    Series::new(x, y)
}

/// Trading volume per weekday.
pub fn volumes(seed: u64) -> Series {
    let mut rng = StdRng::seed_from_u64(seed);
    let days = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    let y: Vec<f64> = days
        .iter()
        .map(|_| rng.random_range(2.0e5..4.5e6_f64).round())
        .collect();

    Series::new(days, y)
}

/// Portfolio allocation by asset.
pub fn allocation(seed: u64) -> Vec<PieEntry> {
    let mut rng = StdRng::seed_from_u64(seed);
    ["BTC", "ETH", "SOL", "ADA", "Other"]
        .into_iter()
        .map(|label| PieEntry::new(label, rng.random_range(5.0..60.0_f64).round()))
        .collect()
}

/// Daily closes of three assets, one box per asset.
pub fn price_distribution(count: usize, seed: u64) -> BoxData {
    let mut rng = StdRng::seed_from_u64(seed);
    let assets = [("BTC", 64_000.0), ("ETH", 3_400.0), ("SOL", 140.0)];

    let series = assets
        .into_iter()
        .map(|(label, base)| {
            let mut price: f64 = base;
            let values = (0..count.max(1))
                .map(|_| {
                    price *= 1.0 + rng.random_range(-VOLATILITY * 3.0..VOLATILITY * 3.0);
                    price
                })
                .collect::<Vec<_>>();
            // Normalise to the first asset so all boxes share one axis.
            let scale = assets[0].1 / base;
            BoxSeries::new(label, values.into_iter().map(|v| v * scale).collect::<Vec<_>>())
        })
        .collect::<Vec<_>>();

    BoxData::from(series)
}
