use data::chart::BarOptions;
use data::util::abbr_large_numbers;
use data::{Series, Theme};
use iced_core::{Point, Rectangle, Size};

use super::Margins;
use super::scale::LinearScale;
use crate::scene::{Align, Baseline, Fill, Scene, Stroke, Text};

const MARGINS: Margins = Margins::new(40.0, 20.0, 40.0, 80.0);

const BAR_SHARE: f32 = 0.8;
/// Headroom above the tallest bar for its value label.
const HEADROOM: f64 = 1.1;
const Y_TICKS: usize = 5;

const LABEL_SIZE: f32 = 12.0;
const TITLE_SIZE: f32 = 16.0;

pub fn draw(size: Size, series: &Series, options: &BarOptions, theme: &Theme) -> Scene {
    let plot = MARGINS.plot_area(size);
    let bottom = plot.y + plot.height;

    let mut scene = Scene::new(size);
    scene.fill_background(theme.background);

    if let Some(title) = &options.title {
        scene.text(
            Text::new(title.clone(), Point::new(size.width / 2.0, 20.0), theme.text, TITLE_SIZE)
                .align(Align::Center)
                .baseline(Baseline::Middle)
                .bold(),
        );
    }

    let axis = Stroke::solid(theme.text_secondary, 1.0);
    scene.line(Point::new(plot.x, plot.y), Point::new(plot.x, bottom), axis);
    scene.line(Point::new(plot.x, bottom), Point::new(plot.x + plot.width, bottom), axis);

    let points = match series.points() {
        Ok(points) => points,
        Err(err) => {
            log::debug!("bar chart drawn without bars: {err}");
            return scene;
        }
    };

    let max = points.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    let y_scale = LinearScale::new(0.0, max * HEADROOM, bottom, plot.y);
    let baseline = y_scale.to_px(0.0).clamp(plot.y, bottom);

    for i in 1..=Y_TICKS {
        let value = y_scale.max() * i as f64 / Y_TICKS as f64;
        let y = y_scale.to_px(value);

        scene.line(Point::new(plot.x - 5.0, y), Point::new(plot.x, y), axis);
        scene.text(
            Text::new(
                abbr_large_numbers(value),
                Point::new(plot.x - 10.0, y),
                theme.text_secondary,
                LABEL_SIZE,
            )
            .align(Align::End)
            .baseline(Baseline::Middle),
        );
    }

    let slot = plot.width / points.len() as f32;
    let bar_width = slot * BAR_SHARE;
    let spacing = slot - bar_width;

    for (i, (label, value)) in points.iter().enumerate() {
        let x = plot.x + spacing / 2.0 + i as f32 * slot;
        let y = y_scale.to_px(*value).clamp(plot.y, bottom);
        let top = y.min(baseline);

        scene.fill_rect(
            Rectangle {
                x,
                y: top,
                width: bar_width,
                height: (baseline - y).abs(),
            },
            Fill::vertical(top, y.max(baseline), options.color_top, options.color_bottom),
        );

        let center = x + bar_width / 2.0;
        scene.text(
            Text::new(abbr_large_numbers(*value), Point::new(center, top - 5.0), theme.text, LABEL_SIZE)
                .align(Align::Center)
                .baseline(Baseline::Bottom),
        );
        scene.text(
            Text::new(label.to_string(), Point::new(center, bottom + 15.0), theme.text_secondary, LABEL_SIZE)
                .align(Align::Center)
                .baseline(Baseline::Middle),
        );
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Size = Size::new(500.0, 300.0);

    fn bars(scene: &Scene) -> Vec<Rectangle> {
        scene
            .rects()
            .filter(|(_, fill)| matches!(fill, Fill::Linear { .. }))
            .map(|(bounds, _)| bounds)
            .collect()
    }

    #[test]
    fn bars_fill_eighty_percent_of_their_slot() {
        let series = Series::new(["BTC", "ETH", "SOL", "ADA"], vec![1200.0, 800.0, 400.0, 100.0]);
        let scene = draw(SIZE, &series, &BarOptions::default(), &Theme::default());

        let bars = bars(&scene);
        assert_eq!(bars.len(), 4);

        let slot = (SIZE.width - 100.0) / 4.0;
        assert!((bars[0].width - slot * 0.8).abs() < 1e-4);
        assert!((bars[0].x - (80.0 + slot * 0.1)).abs() < 1e-4);

        // tallest bar reaches 1/1.1 of the plot height
        let plot_height = SIZE.height - 80.0;
        assert!((bars[0].height - plot_height / 1.1).abs() < 1e-3);

        assert!(scene.has_text("1.2K"));
        assert!(scene.has_text("BTC"));
    }

    #[test]
    fn five_y_ticks() {
        let series = Series::new(["a"], vec![50.0]);
        let scene = draw(SIZE, &series, &BarOptions::default(), &Theme::default());

        for tick in ["11", "22", "33", "44", "55"] {
            assert!(scene.has_text(tick), "missing tick {tick}");
        }
    }

    #[test]
    fn empty_series_draws_axes_only() {
        let theme = Theme::default();
        let options = BarOptions::default().with_title("Weekly volume");
        let scene = draw(SIZE, &Series::default(), &options, &theme);

        assert!(bars(&scene).is_empty());
        assert_eq!(scene.lines().count(), 2);
        assert!(scene.has_text("Weekly volume"));
    }

    #[test]
    fn zero_values_stay_finite() {
        let series = Series::new(["a", "b"], vec![0.0, 0.0]);
        let scene = draw(SIZE, &series, &BarOptions::default(), &Theme::default());

        assert!(scene.is_finite());
        assert_eq!(bars(&scene).len(), 2);
    }
}
