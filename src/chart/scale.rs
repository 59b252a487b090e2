//! Value to pixel projection shared by every chart.

/// Share of the average price a candlestick price axis spans at least.
const MIN_VISIBLE_RANGE: f64 = 0.02;
const PRICE_PADDING_BOTTOM: f64 = 0.12;
const PRICE_PADDING_TOP: f64 = 0.08;

/// Linear map from `[min, max]` onto `[px_start, px_end]`. Pixel ranges may be
/// inverted, as Y axes are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    min: f64,
    max: f64,
    px_start: f32,
    px_end: f32,
}

impl LinearScale {
    pub fn new(min: f64, max: f64, px_start: f32, px_end: f32) -> Self {
        let (min, max) = guard_domain(min, max);
        Self {
            min,
            max,
            px_start,
            px_end,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn to_px(&self, value: f64) -> f32 {
        let ratio = (value - self.min) / (self.max - self.min);
        self.px_start + (ratio as f32) * (self.px_end - self.px_start)
    }

    pub fn invert(&self, px: f32) -> f64 {
        let span = self.px_end - self.px_start;
        if span == 0.0 {
            return (self.min + self.max) / 2.0;
        }
        let ratio = f64::from((px - self.px_start) / span);
        self.min + ratio * (self.max - self.min)
    }

    /// `intervals + 1` evenly spaced values from `min` to `max`.
    pub fn ticks(&self, intervals: usize) -> Vec<f64> {
        if intervals == 0 {
            return vec![self.min];
        }
        let step = (self.max - self.min) / intervals as f64;
        (0..=intervals).map(|i| self.min + step * i as f64).collect()
    }

    /// Widens the domain by `fraction` of its span on both ends.
    pub fn padded(self, fraction: f64) -> Self {
        let pad = (self.max - self.min) * fraction;
        Self::new(self.min - pad, self.max + pad, self.px_start, self.px_end)
    }
}

/// Substitutes a usable domain for flat, reversed or non-finite bounds.
///
/// A flat domain `v` becomes `[v - s/2, v + s/2]` with `s = max(|v|·0.1, 1)`,
/// which centres the values.
pub fn guard_domain(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let (min, max) = if min > max { (max, min) } else { (min, max) };

    if min == max {
        let span = (max.abs() * 0.1).max(1.0);
        (max - span / 2.0, max + span / 2.0)
    } else {
        (min, max)
    }
}

/// Candlestick price axis: at least 2 % of the average price tall, padded 12 %
/// below the lowest low and 8 % above the highest high.
pub fn price_bounds(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let range = max - min;
    let average = (min + max) / 2.0;
    let effective = range.max(average * MIN_VISIBLE_RANGE);

    if effective <= 0.0 {
        return guard_domain(min, max);
    }

    (
        min - effective * PRICE_PADDING_BOTTOM,
        max + effective * PRICE_PADDING_TOP,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn maps_and_inverts() {
        let scale = LinearScale::new(0.0, 100.0, 200.0, 0.0);

        assert_eq!(scale.to_px(0.0), 200.0);
        assert_eq!(scale.to_px(100.0), 0.0);
        assert_eq!(scale.to_px(25.0), 150.0);
        assert_eq!(scale.invert(150.0), 25.0);
    }

    #[test]
    fn flat_domain_is_centred() {
        assert_eq!(guard_domain(5.0, 5.0), (4.5, 5.5));
        assert_eq!(guard_domain(100.0, 100.0), (95.0, 105.0));
        assert_eq!(guard_domain(f64::NAN, 1.0), (0.0, 1.0));
        assert_eq!(guard_domain(3.0, 1.0), (1.0, 3.0));

        let scale = LinearScale::new(5.0, 5.0, 100.0, 0.0);
        assert_eq!(scale.to_px(5.0), 50.0);
    }

    #[test]
    fn ticks_span_the_domain() {
        let ticks = LinearScale::new(0.0, 60.0, 0.0, 1.0).ticks(6);

        assert_eq!(ticks, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
    }

    #[test]
    fn padding_is_symmetric() {
        let scale = LinearScale::new(10.0, 20.0, 0.0, 1.0).padded(0.1);

        assert_eq!((scale.min(), scale.max()), (9.0, 21.0));
    }

    #[test]
    fn price_bounds_are_asymmetric() {
        let (lower, upper) = price_bounds(90.0, 110.0);
        assert!((lower - 87.6).abs() < 1e-9);
        assert!((upper - 111.6).abs() < 1e-9);

        // flat prices still span 2 % of the price
        let (lower, upper) = price_bounds(100.0, 100.0);
        assert!((lower - 99.76).abs() < 1e-9);
        assert!((upper - 100.16).abs() < 1e-9);

        assert_eq!(price_bounds(0.0, 0.0), (-0.5, 0.5));
    }

    proptest! {
        #[test]
        fn projection_stays_in_range(
            a in -1e9f64..1e9,
            b in -1e9f64..1e9,
            t in 0.0f64..=1.0,
        ) {
            let scale = LinearScale::new(a, b, 300.0, 20.0);
            let value = scale.min() + (scale.max() - scale.min()) * t;
            let px = scale.to_px(value);

            prop_assert!(px.is_finite());
            prop_assert!((19.9..=300.1).contains(&px));
        }
    }
}
