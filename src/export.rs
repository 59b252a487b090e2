//! Headless rendering: one dataset drawn on a one-canvas board, with an optional
//! view (zoom, pan, pointer) replayed through the same handles the window uses.

use std::path::Path;

use data::chart::{BarOptions, BoxPlotOptions, CandlestickOptions};
use data::{ChartSize, ScaleFactor, Theme, fixture};
use iced_core::{Point, Size};

use crate::chart::{self, Board, bar, candlestick, line};
use crate::dataset::Dataset;
use crate::scene::{Scene, svg};

const CANVAS_ID: &str = "chart";

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Fixture(#[from] fixture::Error),
    #[error("{kind} chart could not be drawn on a {width}x{height} canvas")]
    NotDrawn {
        kind: data::chart::Kind,
        width: f32,
        height: f32,
    },
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// How a chart is drawn, beyond its data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Request {
    pub size: ChartSize,
    pub theme: Theme,
    pub title: Option<String>,
    /// Candlestick zoom factor, clamped like wheel zooming.
    pub zoom: Option<f32>,
    /// Candlestick pan offset in pixels.
    pub pan: Option<f32>,
    /// Pointer position, for the hover state of interactive charts.
    pub hover: Option<Point>,
}

pub fn scene(dataset: &Dataset, request: &Request) -> Result<Scene, Error> {
    let size = Size::from(request.size);
    let theme = &request.theme;

    let mut board = Board::new();
    board.add_canvas(CANVAS_ID, size);

    match dataset {
        Dataset::Line(series) => match request.hover {
            Some(hover) => {
                board.present(CANVAS_ID, line::draw(size, series, theme, Some(hover)));
            }
            None => chart::draw_line_graph(&mut board, CANVAS_ID, series, theme),
        },
        Dataset::Bar(series) => {
            let mut options = BarOptions::with_colors(theme.accent, theme.accent_border);
            options.title.clone_from(&request.title);
            board.present(CANVAS_ID, bar::draw(size, series, &options, theme));
        }
        Dataset::Pie(entries) => {
            let colors = theme.series_palette();
            let chart = chart::draw_pie_chart(&mut board, CANVAS_ID, entries.clone(), colors, theme);

            if let Some(mut chart) = chart
                && let Some(hover) = request.hover
                && chart.on_cursor_moved(hover)
            {
                board.present(CANVAS_ID, chart.draw(theme));
            }
        }
        Dataset::Box(data) => {
            let options = BoxPlotOptions {
                title: request.title.clone(),
                ..BoxPlotOptions::default()
            };
            chart::draw_box_plot(&mut board, CANVAS_ID, data, &options, theme);
        }
        Dataset::Candlestick(candles) => {
            chart::draw_candlestick_chart(
                &mut board,
                CANVAS_ID,
                candles,
                &CandlestickOptions::default(),
                theme,
            );

            let has_view =
                request.zoom.is_some() || request.pan.is_some() || request.hover.is_some();

            if has_view && let Some(mut chart) = chart::add_candlestick_interactivity(&board, CANVAS_ID)
            {
                if let Some(zoom) = request.zoom {
                    chart.set_zoom(zoom);
                }
                if let Some(pan) = request.pan {
                    chart.pan_to(pan);
                }
                if let Some(hover) = request.hover {
                    chart.handle(candlestick::Event::CursorMoved(hover));
                }
                board.present(CANVAS_ID, chart.draw(theme));
            }
        }
    }

    match board.scene(CANVAS_ID) {
        Some(scene) if !scene.is_empty() => Ok(scene.clone()),
        _ => Err(Error::NotDrawn {
            kind: dataset.kind(),
            width: size.width,
            height: size.height,
        }),
    }
}

pub fn svg(dataset: &Dataset, request: &Request, scale: ScaleFactor) -> Result<String, Error> {
    let scene = scene(dataset, request)?;
    Ok(svg::render(&scene, scale))
}

pub fn write(path: &Path, svg: &str) -> Result<(), Error> {
    std::fs::write(path, svg).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;

    log::info!("Wrote {} bytes to {}", svg.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use data::chart::Kind;

    fn request(width: f32, height: f32) -> Request {
        Request {
            size: ChartSize::new(width, height),
            ..Request::default()
        }
    }

    #[test]
    fn every_sample_exports() {
        for kind in Kind::ALL {
            let scene = scene(&Dataset::sample(kind, 40, 7), &request(800.0, 400.0)).unwrap();
            assert!(!scene.is_empty(), "{kind} drew nothing");
            assert!(scene.is_finite(), "{kind} drew non-finite geometry");
        }
    }

    #[test]
    fn undrawable_canvas_is_an_error() {
        let result = scene(&Dataset::sample(Kind::Line, 10, 1), &request(0.0, 400.0));

        assert!(matches!(result, Err(Error::NotDrawn { kind: Kind::Line, .. })));
    }

    #[test]
    fn bar_title_is_drawn() {
        let request = Request {
            title: Some("Daily volume".to_string()),
            ..request(800.0, 400.0)
        };
        let scene = scene(&Dataset::sample(Kind::Bar, 0, 1), &request).unwrap();

        assert!(scene.has_text("Daily volume"));
    }

    #[test]
    fn svg_is_scaled() {
        let svg = svg(
            &Dataset::sample(Kind::Pie, 0, 2),
            &request(400.0, 200.0),
            ScaleFactor::from(2.0),
        )
        .unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains(r#"width="800""#));
        assert!(svg.contains(r#"viewBox="0 0 400 200""#));
    }

    #[test]
    fn candlestick_hover_adds_tooltip() {
        let dataset = Dataset::sample(Kind::Candlestick, 30, 3);
        let plain = scene(&dataset, &request(800.0, 400.0)).unwrap();

        let hovered = scene(
            &dataset,
            &Request {
                hover: Some(Point::new(400.0, 120.0)),
                ..request(800.0, 400.0)
            },
        )
        .unwrap();

        assert!(!plain.texts().any(|text| text.content.starts_with("O: ")));
        assert!(hovered.texts().any(|text| text.content.starts_with("O: ")));
    }
}
