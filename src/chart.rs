//! Chart renderers and the board of named canvases they draw on.
//!
//! Every renderer has a pure core, `draw(size, data, ..) -> Scene`, plus a board
//! entry point that looks the canvas up by id and stores the result. A missing
//! canvas, or one without a drawable area, is logged and left untouched.

pub mod bar;
pub mod boxplot;
pub mod candlestick;
pub mod line;
pub mod pie;
pub mod scale;

use data::chart::{BarOptions, BoxPlotOptions, CandlestickOptions};
use data::{BoxData, Candle, ChartSize, PieEntry, Series, Theme};
use iced_core::{Color, Point, Rectangle, Size};
use rustc_hash::FxHashMap;

use crate::scene::{Align, Baseline, Scene, Text};

pub use candlestick::CandlestickChart;
pub use line::LineChart;
pub use pie::PieChart;

/// Space kept free around a plot for axes, labels and legends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Area left for the plot, never negative.
    pub fn plot_area(&self, size: Size) -> Rectangle {
        Rectangle {
            x: self.left,
            y: self.top,
            width: (size.width - self.left - self.right).max(0.0),
            height: (size.height - self.top - self.bottom).max(0.0),
        }
    }
}

/// Font size that follows the canvas, never below 10 px.
pub fn font_size(size: Size, ratio: f32) -> f32 {
    (size.width.min(size.height) * ratio).round().max(10.0)
}

/// Background with a centred message, the empty state of every chart.
pub fn placeholder(size: Size, message: &str, theme: &Theme) -> Scene {
    let mut scene = Scene::new(size);
    scene.fill_background(theme.background);
    scene.text(
        Text::new(
            message,
            Point::new(size.width / 2.0, size.height / 2.0),
            theme.text_secondary,
            font_size(size, 0.02),
        )
        .align(Align::Center)
        .baseline(Baseline::Middle),
    );
    scene
}

/// Candles last drawn on a canvas, kept so interactivity can be attached later.
#[derive(Debug, Clone)]
struct CandleBinding {
    candles: Vec<Candle>,
    options: CandlestickOptions,
}

#[derive(Debug, Clone)]
pub struct Canvas {
    size: Size,
    scene: Scene,
    candles: Option<CandleBinding>,
}

impl Canvas {
    fn new(size: Size) -> Self {
        Self {
            size,
            scene: Scene::new(size),
            candles: None,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn is_drawable(&self) -> bool {
        ChartSize::from(self.size).is_drawable()
    }
}

/// Named canvases, looked up by id the way a page looks up its elements.
#[derive(Debug, Default)]
pub struct Board {
    canvases: FxHashMap<String, Canvas>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a blank canvas, replacing any canvas with the same id.
    pub fn add_canvas(&mut self, id: impl Into<String>, size: Size) {
        self.canvases.insert(id.into(), Canvas::new(size));
    }

    pub fn canvas(&self, id: &str) -> Option<&Canvas> {
        self.canvases.get(id)
    }

    pub fn scene(&self, id: &str) -> Option<&Scene> {
        self.canvases.get(id).map(Canvas::scene)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.canvases.keys().map(String::as_str)
    }

    /// Changes a canvas' size, its scene is kept until the next draw.
    pub fn resize(&mut self, id: &str, size: Size) -> bool {
        match self.canvases.get_mut(id) {
            Some(canvas) => {
                canvas.size = size;
                true
            }
            None => {
                log::error!("Canvas element with ID \"{id}\" not found.");
                false
            }
        }
    }

    /// Replaces a canvas' scene with one rendered elsewhere, e.g. by a chart handle.
    pub fn present(&mut self, id: &str, scene: Scene) -> bool {
        match self.target(id) {
            Some(canvas) => {
                canvas.scene = scene;
                true
            }
            None => false,
        }
    }

    fn target(&mut self, id: &str) -> Option<&mut Canvas> {
        let Some(canvas) = self.canvases.get_mut(id) else {
            log::error!("Canvas element with ID \"{id}\" not found.");
            return None;
        };

        if !canvas.is_drawable() {
            log::error!(
                "Canvas \"{id}\" has no drawable area ({}x{})",
                canvas.size.width,
                canvas.size.height
            );
            return None;
        }

        Some(canvas)
    }
}

pub fn draw_line_graph(board: &mut Board, id: &str, series: &Series, theme: &Theme) {
    if let Some(canvas) = board.target(id) {
        canvas.scene = line::draw(canvas.size, series, theme, None);
        canvas.candles = None;
    }
}

pub fn draw_bar_chart(
    board: &mut Board,
    id: &str,
    series: &Series,
    color_top: Color,
    color_bottom: Color,
    theme: &Theme,
) {
    if let Some(canvas) = board.target(id) {
        let options = BarOptions::with_colors(color_top, color_bottom);
        canvas.scene = bar::draw(canvas.size, series, &options, theme);
        canvas.candles = None;
    }
}

/// Draws the pie and hands back the long-lived chart that owns its hover state.
pub fn draw_pie_chart(
    board: &mut Board,
    id: &str,
    dataset: Vec<PieEntry>,
    colors: Vec<Color>,
    theme: &Theme,
) -> Option<PieChart> {
    let canvas = board.target(id)?;

    let chart = PieChart::new(canvas.size, dataset, colors);
    canvas.scene = chart.draw(theme);
    canvas.candles = None;

    Some(chart)
}

pub fn draw_box_plot(
    board: &mut Board,
    id: &str,
    data: &BoxData,
    options: &BoxPlotOptions,
    theme: &Theme,
) {
    if let Some(canvas) = board.target(id) {
        canvas.scene = boxplot::draw(canvas.size, data, options, theme);
        canvas.candles = None;
    }
}

pub fn draw_candlestick_chart(
    board: &mut Board,
    id: &str,
    candles: &[Candle],
    options: &CandlestickOptions,
    theme: &Theme,
) {
    if let Some(canvas) = board.target(id) {
        canvas.scene = candlestick::draw(canvas.size, candles, options, theme);
        canvas.candles = Some(CandleBinding {
            candles: candles.to_vec(),
            options: *options,
        });
    }
}

/// Binds zoom, pan and hover to the candles last drawn on `id`.
///
/// `None` when the canvas is missing or has not been drawn with candles yet.
pub fn add_candlestick_interactivity(board: &Board, id: &str) -> Option<CandlestickChart> {
    let Some(canvas) = board.canvas(id) else {
        log::error!("Canvas element with ID \"{id}\" not found.");
        return None;
    };

    let Some(binding) = &canvas.candles else {
        log::warn!("Canvas \"{id}\" has no candlestick chart to make interactive");
        return None;
    };

    Some(CandlestickChart::new(
        binding.candles.clone(),
        binding.options,
        canvas.size,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_canvas_is_a_no_op() {
        let mut board = Board::new();
        board.add_canvas("chart", Size::new(400.0, 200.0));

        draw_line_graph(&mut board, "nope", &Series::new(["a"], vec![1.0]), &Theme::default());

        assert!(board.scene("chart").is_some_and(Scene::is_empty));
        assert!(board.scene("nope").is_none());
    }

    #[test]
    fn zero_sized_canvas_is_not_drawn() {
        let mut board = Board::new();
        board.add_canvas("flat", Size::new(0.0, 200.0));

        draw_box_plot(
            &mut board,
            "flat",
            &BoxData::from(vec![]),
            &BoxPlotOptions::default(),
            &Theme::default(),
        );

        assert!(board.scene("flat").is_some_and(Scene::is_empty));
    }

    #[test]
    fn interactivity_needs_drawn_candles() {
        let mut board = Board::new();
        board.add_canvas("candles", Size::new(400.0, 200.0));
        assert!(add_candlestick_interactivity(&board, "candles").is_none());
        assert!(add_candlestick_interactivity(&board, "missing").is_none());

        let candles = data::sample::candles(24, 1);
        draw_candlestick_chart(
            &mut board,
            "candles",
            &candles,
            &CandlestickOptions::default(),
            &Theme::default(),
        );

        let chart = add_candlestick_interactivity(&board, "candles").unwrap();
        assert_eq!(chart.candles().len(), 24);

        draw_line_graph(&mut board, "candles", &data::sample::price_series(5, 1), &Theme::default());
        assert!(add_candlestick_interactivity(&board, "candles").is_none());
    }

    #[test]
    fn placeholder_is_centred() {
        let scene = placeholder(Size::new(400.0, 200.0), "No data available", &Theme::default());

        let text = scene.texts().next().unwrap();
        assert_eq!(text.content, "No data available");
        assert_eq!(text.position, Point::new(200.0, 100.0));
        assert_eq!(text.align, Align::Center);
    }

    #[test]
    fn margins_never_go_negative() {
        let area = Margins::new(30.0, 90.0, 60.0, 90.0).plot_area(Size::new(100.0, 50.0));

        assert_eq!((area.width, area.height), (0.0, 0.0));
    }
}
