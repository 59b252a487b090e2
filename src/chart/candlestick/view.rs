use std::ops::Range;

use data::chart::CandlestickOptions;
use data::chart::candlestick::{MAX_ZOOM, MIN_VISIBLE_CANDLES, MIN_ZOOM};
use data::{Candle, Theme};
use iced_core::{Point, Size};

use super::{Panels, render};
use crate::scene::Scene;

const ZOOM_IN: f32 = 1.1;
const ZOOM_OUT: f32 = 0.9;

/// Pointer input the chart reacts to, already translated from the windowing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Positive `delta_y` scrolls down and zooms out.
    WheelScrolled { delta_y: f32 },
    ButtonPressed(Point),
    ButtonReleased,
    CursorMoved(Point),
    CursorLeft,
    DoubleClicked,
    TouchStarted(Vec<Point>),
    TouchMoved(Vec<Point>),
    TouchEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Crosshair,
    Grab,
    Grabbing,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub zoom: f32,
    pub pan_x: f32,
    pub dragging: bool,
    pub last_x: f32,
    pub pinch_distance: Option<f32>,
    pub hover: Option<Point>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            dragging: false,
            last_x: 0.0,
            pinch_distance: None,
            hover: None,
        }
    }
}

impl ViewState {
    pub fn cursor(&self) -> Cursor {
        if self.dragging {
            Cursor::Grabbing
        } else if self.hover.is_some() {
            Cursor::Crosshair
        } else if self.zoom > 1.0 {
            Cursor::Grab
        } else {
            Cursor::Default
        }
    }

    fn set_zoom(&mut self, zoom: f32) -> bool {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let changed = zoom != self.zoom;
        self.zoom = zoom;
        changed
    }

    fn drag_to(&mut self, x: f32) -> bool {
        let delta = x - self.last_x;
        self.pan_x += delta;
        self.last_x = x;
        delta != 0.0
    }
}

/// Range of candles shown at `zoom`, shifted by a pan of `pan_x` px on a
/// canvas `width` px wide.
pub fn visible_window(total: usize, zoom: f32, pan_x: f32, width: f32) -> Range<usize> {
    if total == 0 {
        return 0..0;
    }

    let zoom = if zoom.is_finite() && zoom > 0.0 {
        f64::from(zoom)
    } else {
        1.0
    };
    let count = ((total as f64 / zoom).ceil() as usize)
        .max(MIN_VISIBLE_CANDLES)
        .min(total);

    // any pan past a full history width pins the window to an edge
    let span = total as f64;
    let shift = if width > 0.0 && pan_x.is_finite() {
        (f64::from(pan_x) / f64::from(width) * span).floor().clamp(-span, span)
    } else {
        0.0
    };

    let centre = (total / 2) as f64 - shift;
    let start = (centre - (count / 2) as f64).clamp(0.0, (total - count) as f64) as usize;

    start..start + count
}

/// Candlestick chart bound to its candle history, with zoom, pan and hover.
#[derive(Debug, Clone)]
pub struct CandlestickChart {
    candles: Vec<Candle>,
    options: CandlestickOptions,
    size: Size,
    state: ViewState,
}

impl CandlestickChart {
    pub fn new(candles: Vec<Candle>, options: CandlestickOptions, size: Size) -> Self {
        Self {
            candles,
            options,
            size,
            state: ViewState::default(),
        }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn options(&self) -> &CandlestickOptions {
        &self.options
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    /// Sets the zoom directly, clamped like wheel and pinch zooming.
    pub fn set_zoom(&mut self, zoom: f32) -> bool {
        zoom.is_finite() && self.state.set_zoom(zoom)
    }

    pub fn pan_to(&mut self, pan_x: f32) -> bool {
        let changed = pan_x.is_finite() && pan_x != self.state.pan_x;
        if changed {
            self.state.pan_x = pan_x;
        }
        changed
    }

    pub fn visible_range(&self) -> Range<usize> {
        visible_window(
            self.candles.len(),
            self.state.zoom,
            self.state.pan_x,
            self.size.width,
        )
    }

    /// Applies an input event, true when the chart needs a redraw.
    pub fn handle(&mut self, event: Event) -> bool {
        let panels = Panels::new(self.size, &self.options);
        let state = &mut self.state;

        match event {
            Event::WheelScrolled { delta_y } => {
                let factor = if delta_y > 0.0 { ZOOM_OUT } else { ZOOM_IN };
                state.set_zoom(state.zoom * factor)
            }
            Event::ButtonPressed(point) => {
                let plot = panels.plot;
                if point.x >= plot.x && point.x <= plot.x + plot.width {
                    state.dragging = true;
                    state.last_x = point.x;
                }
                false
            }
            Event::ButtonReleased => {
                state.dragging = false;
                false
            }
            Event::CursorMoved(point) => {
                if state.dragging {
                    state.drag_to(point.x)
                } else if panels.price.contains(point) {
                    state.hover = Some(point);
                    true
                } else {
                    state.hover.take().is_some()
                }
            }
            Event::CursorLeft => {
                state.dragging = false;
                state.hover.take().is_some()
            }
            Event::DoubleClicked => {
                let changed = state.zoom != 1.0 || state.pan_x != 0.0;
                state.zoom = 1.0;
                state.pan_x = 0.0;
                changed
            }
            Event::TouchStarted(fingers) => {
                match fingers.as_slice() {
                    [finger] => {
                        state.dragging = true;
                        state.last_x = finger.x;
                        state.pinch_distance = None;
                    }
                    [a, b, ..] => {
                        state.dragging = false;
                        state.pinch_distance = Some(a.distance(*b));
                    }
                    [] => {}
                }
                false
            }
            Event::TouchMoved(fingers) => match fingers.as_slice() {
                [finger] if state.dragging => state.drag_to(finger.x),
                [a, b, ..] => {
                    let distance = a.distance(*b);
                    let changed = match state.pinch_distance {
                        Some(previous) if previous > 0.0 => {
                            state.set_zoom(state.zoom * distance / previous)
                        }
                        _ => false,
                    };
                    state.pinch_distance = Some(distance);
                    changed
                }
                _ => false,
            },
            Event::TouchEnded => {
                state.dragging = false;
                state.pinch_distance = None;
                false
            }
        }
    }

    pub fn draw(&self, theme: &Theme) -> Scene {
        render(self.size, &self.state, &self.candles, &self.options, theme)
    }
}
