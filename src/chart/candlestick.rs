//! OHLCV candlestick chart with a volume panel, current price marker and a
//! crosshair tooltip.
//!
//! [`render`] is pure: it takes the view state explicitly, so the interactive
//! [`CandlestickChart`] handle and the tests draw through the same path.

mod view;

pub use view::{CandlestickChart, Cursor, Event, ViewState, visible_window};

use data::chart::CandlestickOptions;
use data::util::{format_price, format_volume};
use data::{Candle, Theme};
use iced_core::{Color, Point, Rectangle, Size, Vector};

use super::scale::{LinearScale, price_bounds};
use super::{Margins, font_size, placeholder};
use crate::scene::{Align, Baseline, Primitive, Scene, Shadow, Stroke, Text, text_width};

const MARGINS: Margins = Margins::new(30.0, 90.0, 60.0, 90.0);

const CANDLE_SPACING: f32 = 2.0;
const MIN_CANDLE_WIDTH: f32 = 2.0;
const MIN_BODY_HEIGHT: f32 = 2.0;
const MIN_WICK_LENGTH: f32 = 0.5;
const PANEL_GAP: f32 = 10.0;

const PRICE_INTERVALS: usize = 6;
const X_LABEL_TARGET: usize = 8;
const DASH: f32 = 5.0;

const TOOLTIP_PADDING: f32 = 12.0;
const TOOLTIP_OFFSET: f32 = 15.0;
const PRICE_TAG_PADDING: f32 = 6.0;

/// Panels of a candlestick canvas. Only the candle width depends on the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panels {
    pub plot: Rectangle,
    pub price: Rectangle,
    pub volume: Rectangle,
}

impl Panels {
    pub fn new(size: Size, options: &CandlestickOptions) -> Self {
        let plot = MARGINS.plot_area(size);
        let volume_share = plot.height * options.volume_ratio();

        let price = Rectangle {
            height: plot.height - volume_share,
            ..plot
        };
        let volume = Rectangle {
            x: plot.x,
            y: price.y + price.height + PANEL_GAP,
            width: plot.width,
            height: (volume_share - PANEL_GAP).max(0.0),
        };

        Self {
            plot,
            price,
            volume,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub panels: Panels,
    pub count: usize,
    pub candle_width: f32,
    pub y_scale: LinearScale,
    pub max_volume: f64,
    pub font_size: f32,
}

impl Layout {
    pub fn slot(&self) -> f32 {
        self.candle_width + CANDLE_SPACING
    }

    /// Left edge of the `index`-th candle.
    pub fn candle_x(&self, index: usize) -> f32 {
        self.panels.price.x + index as f32 * self.slot()
    }

    pub fn candle_center(&self, index: usize) -> f32 {
        self.candle_x(index) + self.candle_width / 2.0
    }

    pub fn candle_at(&self, x: f32) -> Option<usize> {
        let offset = x - self.panels.price.x;
        if offset < 0.0 {
            return None;
        }
        let index = (offset / self.slot()).floor() as usize;
        (index < self.count).then_some(index)
    }

    /// Price projected into the price panel, never outside it.
    pub fn price_y(&self, price: f64) -> f32 {
        let panel = self.panels.price;
        self.y_scale
            .to_px(price)
            .clamp(panel.y, panel.y + panel.height)
    }
}

/// Geometry for `candles` on a canvas of `size`, `None` without candles.
pub fn layout(size: Size, candles: &[Candle], options: &CandlestickOptions) -> Option<Layout> {
    if candles.is_empty() {
        return None;
    }

    let panels = Panels::new(size, options);
    let count = candles.len();

    let candle_width = ((panels.price.width - (count - 1) as f32 * CANDLE_SPACING) / count as f32)
        .max(MIN_CANDLE_WIDTH);

    let (low, high) = candles
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
            (lo.min(c.low), hi.max(c.high))
        });
    let (lower, upper) = price_bounds(low, high);
    let price = panels.price;
    let y_scale = LinearScale::new(lower, upper, price.y + price.height, price.y);

    let max_volume = candles
        .iter()
        .map(|c| c.volume)
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);

    Some(Layout {
        panels,
        count,
        candle_width,
        y_scale,
        max_volume,
        font_size: font_size(size, 0.018),
    })
}

/// Static chart of every candle.
pub fn draw(size: Size, candles: &[Candle], options: &CandlestickOptions, theme: &Theme) -> Scene {
    render(size, &ViewState::default(), candles, options, theme)
}

/// Draws the window of `candles` selected by the zoom and pan of `state`, plus
/// the crosshair and tooltip when hovering.
pub fn render(
    size: Size,
    state: &ViewState,
    candles: &[Candle],
    options: &CandlestickOptions,
    theme: &Theme,
) -> Scene {
    let window = visible_window(candles.len(), state.zoom, state.pan_x, size.width);
    let visible = &candles[window];

    let Some(layout) = layout(size, visible, options) else {
        return placeholder(size, "No data available", theme);
    };

    let mut scene = Scene::new(size);
    scene.fill_background(options.background.unwrap_or(theme.background));

    draw_price_axis(&mut scene, &layout, theme);
    draw_candles(&mut scene, &layout, visible, theme);
    draw_volume(&mut scene, &layout, visible, theme);
    draw_time_axis(&mut scene, &layout, visible, theme);
    draw_price_tag(&mut scene, &layout, visible, theme);

    if let Some(cursor) = state.hover {
        draw_crosshair(&mut scene, &layout, cursor, theme);
        if let Some(candle) = layout.candle_at(cursor.x).and_then(|i| visible.get(i)) {
            draw_tooltip(&mut scene, &layout, cursor, candle, theme);
        }
    }

    scene
}

fn draw_price_axis(scene: &mut Scene, layout: &Layout, theme: &Theme) {
    let price = layout.panels.price;
    let fs = layout.font_size;
    let right = scene.size().width - 20.0;

    for value in layout.y_scale.ticks(PRICE_INTERVALS) {
        let y = layout.y_scale.to_px(value);

        scene.line(
            Point::new(price.x, y),
            Point::new(right, y),
            Stroke::solid(theme.grid, 1.0),
        );

        let label_y = y.clamp(
            price.y + fs / 2.0,
            (price.y + price.height - fs / 2.0).max(price.y + fs / 2.0),
        );
        scene.text(
            Text::new(
                format_price(value),
                Point::new(price.x - 15.0, label_y),
                theme.text_secondary,
                fs,
            )
            .align(Align::End)
            .baseline(Baseline::Middle),
        );
    }
}

fn draw_candles(scene: &mut Scene, layout: &Layout, candles: &[Candle], theme: &Theme) {
    let width = layout.candle_width;

    for (i, candle) in candles.iter().enumerate() {
        let color = if candle.is_bullish() {
            theme.bullish
        } else {
            theme.bearish
        };
        let x = layout.candle_x(i);
        let center = layout.candle_center(i);

        let high = layout.price_y(candle.high);
        let low = layout.price_y(candle.low);
        if low - high > MIN_WICK_LENGTH {
            scene.line(
                Point::new(center, high),
                Point::new(center, low),
                Stroke::solid(color, (width * 0.1).max(1.0)),
            );
        }

        let open = layout.price_y(candle.open);
        let close = layout.price_y(candle.close);
        let mut top = open.min(close);
        let mut height = (open - close).abs();
        if height < MIN_BODY_HEIGHT {
            top = (open + close) / 2.0 - MIN_BODY_HEIGHT / 2.0;
            height = MIN_BODY_HEIGHT;
        }

        scene.fill_rect(
            Rectangle {
                x,
                y: top,
                width,
                height,
            },
            color,
        );
    }
}

fn draw_volume(scene: &mut Scene, layout: &Layout, candles: &[Candle], theme: &Theme) {
    let panel = layout.panels.volume;
    if panel.height <= 0.0 {
        return;
    }

    if layout.max_volume > 0.0 {
        for (i, candle) in candles.iter().enumerate() {
            if !(candle.volume.is_finite() && candle.volume > 0.0) {
                continue;
            }
            let color = if candle.is_bullish() {
                theme.bullish
            } else {
                theme.bearish
            };
            let height = (candle.volume / layout.max_volume) as f32 * panel.height;

            scene.fill_rect(
                Rectangle {
                    x: layout.candle_x(i),
                    y: panel.y + panel.height - height,
                    width: layout.candle_width,
                    height,
                },
                Color { a: 0.5, ..color },
            );
        }
    }

    if let Some(last) = candles.last() {
        scene.text(Text::new(
            format!("Volume {}", format_volume(last.volume)),
            Point::new(panel.x, panel.y + 5.0),
            theme.text_secondary,
            layout.font_size,
        ));
    }
}

fn draw_time_axis(scene: &mut Scene, layout: &Layout, candles: &[Candle], theme: &Theme) {
    let plot = layout.panels.plot;
    let interval = (candles.len() / X_LABEL_TARGET).max(1);
    let last = candles.len() - 1;

    for (i, candle) in candles.iter().enumerate() {
        if i % interval != 0 && i != last {
            continue;
        }
        let label = candle.time.axis_label();
        if label.is_empty() {
            continue;
        }

        scene.text(
            Text::new(
                label,
                Point::new(layout.candle_center(i), plot.y + plot.height + 5.0),
                theme.text_secondary,
                layout.font_size,
            )
            .align(Align::Center),
        );
    }
}

/// Dashed line at the last close with the price boxed in the right gutter.
fn draw_price_tag(scene: &mut Scene, layout: &Layout, candles: &[Candle], theme: &Theme) {
    let Some(last) = candles.last() else {
        return;
    };
    let price = layout.panels.price;
    let fs = layout.font_size;
    let y = layout.price_y(last.close);
    let right = price.x + price.width;

    scene.line(
        Point::new(price.x, y),
        Point::new(right, y),
        Stroke::dashed(theme.bullish, 1.0, DASH, DASH),
    );

    let content = format_price(last.close);
    let height = fs + PRICE_TAG_PADDING * 2.0;
    scene.fill_rect(
        Rectangle {
            x: right,
            y: y - height / 2.0,
            width: text_width(&content, fs) + PRICE_TAG_PADDING * 2.0,
            height,
        },
        theme.bullish,
    );
    scene.text(
        Text::new(content, Point::new(right + PRICE_TAG_PADDING, y), Color::BLACK, fs)
            .baseline(Baseline::Middle),
    );
}

fn draw_crosshair(scene: &mut Scene, layout: &Layout, cursor: Point, theme: &Theme) {
    let price = layout.panels.price;
    let stroke = Stroke::dashed(theme.crosshair, 1.0, DASH, DASH);

    scene.line(
        Point::new(cursor.x, price.y),
        Point::new(cursor.x, price.y + price.height),
        stroke,
    );
    scene.line(
        Point::new(price.x, cursor.y),
        Point::new(price.x + price.width, cursor.y),
        stroke,
    );
}

fn draw_tooltip(scene: &mut Scene, layout: &Layout, cursor: Point, candle: &Candle, theme: &Theme) {
    let price = layout.panels.price;
    let fs = layout.font_size;
    let line_height = fs + 4.0;

    let lines = [
        format!("O: {}", format_price(candle.open)),
        format!("H: {}", format_price(candle.high)),
        format!("L: {}", format_price(candle.low)),
        format!("C: {}", format_price(candle.close)),
        format!("V: {}", format_volume(candle.volume)),
    ];
    let widest = lines
        .iter()
        .map(|line| text_width(line, fs))
        .fold(0.0, f32::max);

    let width = widest + TOOLTIP_PADDING * 2.0;
    let height = lines.len() as f32 * line_height + TOOLTIP_PADDING * 2.0;

    let mut x = cursor.x + TOOLTIP_OFFSET;
    if x + width > price.x + price.width {
        x = cursor.x - width - TOOLTIP_OFFSET;
    }
    let y = (cursor.y - height / 2.0).clamp(
        price.y,
        (price.y + price.height - height).max(price.y),
    );

    scene.push(Primitive::Rect {
        bounds: Rectangle {
            x,
            y,
            width,
            height,
        },
        fill: theme.tooltip.into(),
        radius: 6.0,
        stroke: Some(Stroke::solid(theme.tooltip_border, 1.0)),
        shadow: Some(Shadow {
            color: theme.shadow,
            blur: 10.0,
            offset: Vector::new(0.0, 2.0),
        }),
    });

    let close_color = if candle.is_bullish() {
        theme.bullish
    } else {
        theme.bearish
    };

    for (i, line) in lines.into_iter().enumerate() {
        let color = if i == 3 { close_color } else { theme.tooltip_text };
        scene.text(
            Text::new(
                line,
                Point::new(x + TOOLTIP_PADDING, y + TOOLTIP_PADDING + i as f32 * line_height),
                color,
                fs,
            )
            .monospace(),
        );
    }
}
