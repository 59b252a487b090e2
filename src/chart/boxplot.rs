use data::chart::BoxPlotOptions;
use data::stats::BoxStats;
use data::util::format_currency_tick;
use data::{BoxData, BoxSeries, Theme};
use iced_core::{Color, Point, Rectangle, Size, Vector};

use super::scale::LinearScale;
use super::{Margins, font_size, placeholder};
use crate::scene::{Align, Baseline, Fill, Primitive, Scene, Shadow, Stroke, Text};

const MARGINS: Margins = Margins::new(60.0, 40.0, 50.0, 80.0);

const GRID_INTERVALS: usize = 6;
const DOMAIN_PADDING: f64 = 0.1;

const MAX_BOX_WIDTH: f32 = 80.0;
const BOX_SHARE: f32 = 0.6;
const CAP_SHARE: f32 = 0.4;

const WHISKER_WIDTH: f32 = 2.0;
const MEDIAN_WIDTH: f32 = 3.0;
const DIAMOND: f32 = 6.0;
const OUTLIER_RADIUS: f32 = 4.0;
const LEGEND_SPACING: f32 = 80.0;

pub fn draw(size: Size, data: &BoxData, options: &BoxPlotOptions, theme: &Theme) -> Scene {
    if data.series().is_empty() {
        return placeholder(size, "No data available", theme);
    }

    let plots: Vec<(&BoxSeries, BoxStats)> = data
        .series()
        .iter()
        .filter_map(|series| BoxStats::from_values(&series.values).map(|stats| (series, stats)))
        .collect();

    if plots.is_empty() {
        return placeholder(size, "No valid data", theme);
    }

    let fs = font_size(size, 0.02);
    let plot = MARGINS.plot_area(size);
    let bottom = plot.y + plot.height;

    let (min, max) = plots
        .iter()
        .map(|(_, stats)| stats.extent())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (a, b)| {
            (lo.min(a), hi.max(b))
        });
    let y_scale = LinearScale::new(min, max, bottom, plot.y).padded(DOMAIN_PADDING);

    let mut scene = Scene::new(size);
    scene.fill_background(options.background.unwrap_or(theme.background));

    if let Some(title) = &options.title {
        scene.text(
            Text::new(title.clone(), Point::new(size.width / 2.0, 10.0), theme.text, fs + 2.0)
                .align(Align::Center)
                .bold(),
        );
    }

    draw_grid(&mut scene, plot, &y_scale, fs, theme);
    draw_legend(&mut scene, Point::new(plot.x, plot.y - 30.0), fs, theme);

    let spacing = plot.width / (plots.len() + 1) as f32;
    let box_width = (spacing * BOX_SHARE).min(MAX_BOX_WIDTH);

    for (i, (series, stats)) in plots.iter().enumerate() {
        let x = plot.x + spacing * (i + 1) as f32;
        let color = series
            .color
            .or(options.color)
            .unwrap_or(theme.bullish);

        draw_box(&mut scene, x, box_width, stats, &y_scale, color, theme);

        scene.text(
            Text::new(series.label.clone(), Point::new(x, bottom + 10.0), theme.text, fs)
                .align(Align::Center)
                .bold(),
        );
    }

    scene
}

fn draw_grid(scene: &mut Scene, plot: Rectangle, y_scale: &LinearScale, fs: f32, theme: &Theme) {
    for value in y_scale.ticks(GRID_INTERVALS) {
        let y = y_scale.to_px(value);

        scene.line(
            Point::new(plot.x, y),
            Point::new(plot.x + plot.width, y),
            Stroke::solid(theme.grid, 1.0),
        );
        scene.text(
            Text::new(
                format_currency_tick(value),
                Point::new(plot.x - 10.0, y),
                theme.text_secondary,
                fs - 2.0,
            )
            .align(Align::End)
            .baseline(Baseline::Middle)
            .monospace(),
        );
    }
}

fn draw_legend(scene: &mut Scene, origin: Point, fs: f32, theme: &Theme) {
    let Point { x, y } = origin;
    let label = |text: &str, x: f32| {
        Text::new(text, Point::new(x, y), theme.text_secondary, fs - 2.0).baseline(Baseline::Middle)
    };

    scene.line(
        Point::new(x, y),
        Point::new(x + 20.0, y),
        Stroke::solid(theme.median, MEDIAN_WIDTH),
    );
    scene.text(label("Median", x + 25.0));

    let x = x + LEGEND_SPACING;
    scene.polygon(
        diamond(Point::new(x + 10.0, y), 5.0),
        theme.accent,
        Some(Stroke::solid(theme.accent_border, 1.5)),
    );
    scene.text(label("Mean", x + 25.0));

    let x = x + LEGEND_SPACING;
    scene.circle(Point::new(x + 10.0, y), OUTLIER_RADIUS, theme.bullish);
    scene.text(label("Outliers", x + 25.0));
}

fn draw_box(
    scene: &mut Scene,
    x: f32,
    width: f32,
    stats: &BoxStats,
    y_scale: &LinearScale,
    color: Color,
    theme: &Theme,
) {
    let whisker = Stroke::solid(color, WHISKER_WIDTH);
    let cap = width * CAP_SHARE / 2.0;

    let lower = y_scale.to_px(stats.lower_whisker);
    let upper = y_scale.to_px(stats.upper_whisker);
    let q1 = y_scale.to_px(stats.q1);
    let q3 = y_scale.to_px(stats.q3);

    scene.line(Point::new(x, lower), Point::new(x, q1), whisker);
    scene.line(Point::new(x, q3), Point::new(x, upper), whisker);
    scene.line(Point::new(x - cap, lower), Point::new(x + cap, lower), whisker);
    scene.line(Point::new(x - cap, upper), Point::new(x + cap, upper), whisker);

    scene.push(Primitive::Rect {
        bounds: Rectangle {
            x: x - width / 2.0,
            y: q3,
            width,
            height: q1 - q3,
        },
        fill: Fill::vertical(q3, q1, Color { a: 0.6, ..color }, Color { a: 0.8, ..color }),
        radius: 0.0,
        stroke: Some(Stroke::solid(color, 2.0)),
        shadow: Some(Shadow {
            color: theme.shadow,
            blur: 8.0,
            offset: Vector::new(0.0, 2.0),
        }),
    });

    let median = y_scale.to_px(stats.median);
    scene.line(
        Point::new(x - width / 2.0, median),
        Point::new(x + width / 2.0, median),
        Stroke::solid(theme.median, MEDIAN_WIDTH),
    );

    scene.polygon(
        diamond(Point::new(x, y_scale.to_px(stats.mean)), DIAMOND),
        theme.accent,
        Some(Stroke::solid(theme.accent_border, 1.5)),
    );

    for outlier in &stats.outliers {
        scene.circle(Point::new(x, y_scale.to_px(*outlier)), OUTLIER_RADIUS, color);
    }
}

fn diamond(center: Point, size: f32) -> Vec<Point> {
    vec![
        Point::new(center.x, center.y - size),
        Point::new(center.x + size, center.y),
        Point::new(center.x, center.y + size),
        Point::new(center.x - size, center.y),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Size = Size::new(600.0, 400.0);
    const RED: Color = Color::from_rgb8(200, 30, 30);

    fn sample() -> BoxData {
        let mut values: Vec<f64> = (1..=9).map(f64::from).collect();
        values.push(100.0);
        BoxData::Single(BoxSeries::new("BTC", values).with_color(RED))
    }

    #[test]
    fn outlier_is_drawn_above_the_box() {
        let scene = draw(SIZE, &sample(), &BoxPlotOptions::default(), &Theme::default());

        let outliers: Vec<Point> = scene
            .circles()
            .filter(|(_, _, fill)| **fill == Fill::Solid(RED))
            .map(|(center, _, _)| center)
            .collect();
        assert_eq!(outliers.len(), 1);

        let (iqr_box, _) = scene
            .rects()
            .find(|(_, fill)| matches!(fill, Fill::Linear { .. }))
            .unwrap();
        assert!(outliers[0].y < iqr_box.y);
        assert!(scene.has_text("BTC"));
    }

    #[test]
    fn legend_and_grid() {
        let scene = draw(SIZE, &sample(), &BoxPlotOptions::default(), &Theme::default());

        for label in ["Median", "Mean", "Outliers"] {
            assert!(scene.has_text(label));
        }
        let ticks = scene.texts().filter(|t| t.content.starts_with('$')).count();
        assert_eq!(ticks, GRID_INTERVALS + 1);
    }

    #[test]
    fn boxes_share_the_width() {
        let data = BoxData::from(vec![
            BoxSeries::new("BTC", vec![1.0, 2.0, 3.0]),
            BoxSeries::new("ETH", vec![2.0, 3.0, 4.0]),
        ]);
        let scene = draw(SIZE, &data, &BoxPlotOptions::default(), &Theme::default());

        let boxes: Vec<Rectangle> = scene
            .rects()
            .filter(|(_, fill)| matches!(fill, Fill::Linear { .. }))
            .map(|(bounds, _)| bounds)
            .collect();
        assert_eq!(boxes.len(), 2);

        let spacing = (SIZE.width - 120.0) / 3.0;
        assert!((boxes[0].width - (spacing * 0.6).min(80.0)).abs() < 1e-4);
        assert!((boxes[0].center_x() - (80.0 + spacing)).abs() < 1e-3);
    }

    #[test]
    fn series_without_values_are_skipped() {
        let data = BoxData::from(vec![
            BoxSeries::new("empty", vec![]),
            BoxSeries::new("BTC", vec![1.0, 2.0]),
        ]);
        let scene = draw(SIZE, &data, &BoxPlotOptions::default(), &Theme::default());

        assert!(!scene.has_text("empty"));
        assert!(scene.has_text("BTC"));
    }

    #[test]
    fn empty_states() {
        let theme = Theme::default();
        let options = BoxPlotOptions::default();

        let none = draw(SIZE, &BoxData::from(vec![]), &options, &theme);
        assert!(none.has_text("No data available"));

        let invalid = BoxData::Single(BoxSeries::new("x", vec![f64::NAN]));
        assert!(draw(SIZE, &invalid, &options, &theme).has_text("No valid data"));
    }

    #[test]
    fn identical_values_stay_finite() {
        let data = BoxData::Single(BoxSeries::new("flat", vec![42.0; 5]));
        let scene = draw(SIZE, &data, &BoxPlotOptions::default(), &Theme::default());

        assert!(scene.is_finite());
    }
}
