//! Pie chart with hover highlight and tooltip.
//!
//! [`PieChart`] is long-lived: it keeps the slices, their angles and the hover
//! state between pointer events, and redraws only when the highlighted slice
//! changes.

use std::f32::consts::TAU;

use data::theme::lighten;
use data::util::format_value;
use data::{PieEntry, Theme};
use iced_core::{Color, Point, Rectangle, Size};

use super::placeholder;
use crate::scene::{Align, Baseline, Primitive, Scene, Shadow, Stroke, Text, clamp_into, text_width};

/// Highlighted slices are blended this far toward white.
const HIGHLIGHT: f32 = 0.25;
const LABEL_RADIUS: f32 = 0.75;

const TOOLTIP_OFFSET: f32 = 10.0;
const TOOLTIP_SIZE: f32 = 12.0;
const TOOLTIP_PADDING: f32 = 8.0;
const SWATCH: f32 = 10.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    pub color: Color,
    /// Radians clockwise from +X, the first slice starts at 0.
    pub start_angle: f32,
    pub end_angle: f32,
}

impl Slice {
    fn contains(&self, angle: f32) -> bool {
        self.start_angle <= angle && angle < self.end_angle
    }

    fn mid_angle(&self) -> f32 {
        (self.start_angle + self.end_angle) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hover {
    #[default]
    Idle,
    Hovering(usize),
}

/// Contents and placement of the hover tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub label: String,
    pub value: String,
    pub percent: String,
    pub color: Color,
    pub bounds: Rectangle,
}

#[derive(Debug, Clone)]
pub struct PieChart {
    size: Size,
    center: Point,
    radius: f32,
    colors: Vec<Color>,
    slices: Vec<Slice>,
    total: f64,
    hover: Hover,
    cursor: Option<Point>,
}

impl PieChart {
    pub fn new(size: Size, dataset: Vec<PieEntry>, colors: Vec<Color>) -> Self {
        let colors = if colors.is_empty() {
            Theme::default().series_palette()
        } else {
            colors
        };

        let mut chart = Self {
            size,
            center: Point::ORIGIN,
            radius: 0.0,
            colors,
            slices: Vec::new(),
            total: 0.0,
            hover: Hover::Idle,
            cursor: None,
        };
        chart.resize(size);
        chart.update_data(dataset);
        chart
    }

    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    pub fn hover(&self) -> Hover {
        self.hover
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Replaces the dataset, angles restart from 0 in input order.
    pub fn update_data(&mut self, dataset: Vec<PieEntry>) {
        let weight = |value: f64| if value.is_finite() { value.max(0.0) } else { 0.0 };

        self.total = dataset.iter().map(|entry| weight(entry.value)).sum();

        let mut cumulative = 0.0;
        let slices = dataset
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let start = self.angle_of(cumulative);
                cumulative += weight(entry.value);

                Slice {
                    color: self.colors[i % self.colors.len()],
                    start_angle: start,
                    end_angle: self.angle_of(cumulative),
                    label: entry.label,
                    value: entry.value,
                }
            })
            .collect();

        self.slices = slices;
        self.hover = Hover::Idle;
        self.cursor = None;
    }

    /// Refits the pie to a new canvas size, the highlight is kept.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.center = Point::new(size.width / 2.0, size.height / 2.0);
        self.radius = size.width.min(size.height).max(0.0) / 2.0;
    }

    /// Hit-tests the cursor, true when the highlighted slice changed.
    pub fn on_cursor_moved(&mut self, point: Point) -> bool {
        self.cursor = Some(point);

        let hover = match self.slice_at(point) {
            Some(index) => Hover::Hovering(index),
            None => Hover::Idle,
        };

        let changed = hover != self.hover;
        self.hover = hover;
        changed
    }

    pub fn on_cursor_left(&mut self) -> bool {
        self.cursor = None;
        std::mem::take(&mut self.hover) != Hover::Idle
    }

    fn angle_of(&self, cumulative: f64) -> f32 {
        if self.total > 0.0 {
            (cumulative / self.total * std::f64::consts::TAU) as f32
        } else {
            0.0
        }
    }

    fn slice_at(&self, point: Point) -> Option<usize> {
        let dx = point.x - self.center.x;
        let dy = point.y - self.center.y;
        if dx.hypot(dy) > self.radius {
            return None;
        }

        let mut angle = dy.atan2(dx);
        if angle < 0.0 {
            angle += TAU;
        }
        if angle >= TAU {
            angle = 0.0;
        }

        self.slices.iter().position(|slice| slice.contains(angle))
    }

    fn share(&self, slice: &Slice) -> f64 {
        if self.total > 0.0 && slice.value.is_finite() {
            (slice.value.max(0.0) / self.total * 100.0).round()
        } else {
            0.0
        }
    }

    pub fn tooltip(&self) -> Option<Tooltip> {
        let Hover::Hovering(index) = self.hover else {
            return None;
        };
        let slice = self.slices.get(index)?;
        let cursor = self.cursor?;

        let label = slice.label.clone();
        let value = format!("Value: {}", format_value(slice.value));
        let percent = format!("{}%", self.share(slice));

        let widest = [&label, &value, &percent]
            .iter()
            .map(|line| text_width(line, TOOLTIP_SIZE))
            .fold(0.0, f32::max);
        let bounds = Rectangle {
            x: cursor.x + TOOLTIP_OFFSET,
            y: cursor.y + TOOLTIP_OFFSET,
            width: widest + SWATCH + TOOLTIP_PADDING * 3.0,
            height: (TOOLTIP_SIZE + 4.0) * 3.0 + TOOLTIP_PADDING * 2.0,
        };

        Some(Tooltip {
            label,
            value,
            percent,
            color: slice.color,
            bounds: clamp_into(bounds, Rectangle::with_size(self.size)),
        })
    }

    pub fn draw(&self, theme: &Theme) -> Scene {
        if self.slices.is_empty() || self.total <= 0.0 {
            return placeholder(self.size, "No data available", theme);
        }

        let mut scene = Scene::new(self.size);
        scene.fill_background(theme.background);

        for (i, slice) in self.slices.iter().enumerate() {
            if slice.end_angle <= slice.start_angle {
                continue;
            }
            let color = if self.hover == Hover::Hovering(i) {
                lighten(slice.color, HIGHLIGHT)
            } else {
                slice.color
            };
            scene.wedge(
                self.center,
                self.radius,
                (slice.start_angle, slice.end_angle),
                color,
            );
        }

        let font_size = (self.size.width / 27.0).max(10.0);
        for slice in &self.slices {
            let share = self.share(slice);
            if share <= 0.0 {
                continue;
            }

            let mid = slice.mid_angle();
            let anchor = Point::new(
                self.center.x + mid.cos() * self.radius * LABEL_RADIUS,
                self.center.y + mid.sin() * self.radius * LABEL_RADIUS,
            );

            scene.text(
                Text::new(format!("{share}%"), anchor, theme.text, font_size)
                    .align(Align::Center)
                    .baseline(Baseline::Middle)
                    .bold(),
            );
            scene.text(
                Text::new(
                    slice.label.clone(),
                    Point::new(anchor.x, anchor.y - font_size),
                    theme.text,
                    font_size,
                )
                .align(Align::Center)
                .baseline(Baseline::Middle),
            );
        }

        if let Some(tooltip) = self.tooltip() {
            draw_tooltip(&mut scene, &tooltip, theme);
        }

        scene
    }
}

fn draw_tooltip(scene: &mut Scene, tooltip: &Tooltip, theme: &Theme) {
    let bounds = tooltip.bounds;

    scene.push(Primitive::Rect {
        bounds,
        fill: theme.tooltip.into(),
        radius: 4.0,
        stroke: Some(Stroke::solid(theme.tooltip_border, 1.0)),
        shadow: Some(Shadow {
            color: theme.shadow,
            blur: 8.0,
            offset: iced_core::Vector::new(0.0, 2.0),
        }),
    });

    let line_height = TOOLTIP_SIZE + 4.0;
    let left = bounds.x + TOOLTIP_PADDING;
    let top = bounds.y + TOOLTIP_PADDING;

    scene.fill_rect(
        Rectangle {
            x: left,
            y: top + (line_height - SWATCH) / 2.0,
            width: SWATCH,
            height: SWATCH,
        },
        tooltip.color,
    );

    let text_x = left + SWATCH + TOOLTIP_PADDING;
    scene.text(
        Text::new(tooltip.label.clone(), Point::new(text_x, top), theme.tooltip_text, TOOLTIP_SIZE).bold(),
    );
    scene.text(Text::new(
        tooltip.value.clone(),
        Point::new(text_x, top + line_height),
        theme.tooltip_text,
        TOOLTIP_SIZE,
    ));
    scene.text(Text::new(
        tooltip.percent.clone(),
        Point::new(text_x, top + line_height * 2.0),
        theme.tooltip_text,
        TOOLTIP_SIZE,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Fill;
    use std::f32::consts::PI;

    const SIZE: Size = Size::new(400.0, 400.0);

    fn chart(values: &[(&str, f64)]) -> PieChart {
        let dataset = values.iter().map(|(l, v)| PieEntry::new(*l, *v)).collect();
        PieChart::new(SIZE, dataset, vec![Color::from_rgb8(0, 0, 200), Color::from_rgb8(200, 0, 0)])
    }

    fn point_at(angle: f32, distance: f32) -> Point {
        Point::new(200.0 + angle.cos() * distance, 200.0 + angle.sin() * distance)
    }

    #[test]
    fn angles_follow_shares() {
        let chart = chart(&[("A", 40.0), ("B", 60.0)]);
        let slices = chart.slices();

        assert_eq!(slices[0].start_angle, 0.0);
        assert!((slices[0].end_angle - 0.8 * PI).abs() < 1e-5);
        assert!((slices[1].start_angle - 0.8 * PI).abs() < 1e-5);
        assert!((slices[1].end_angle - TAU).abs() < 1e-5);
    }

    #[test]
    fn update_restarts_from_zero_in_input_order() {
        let mut chart = chart(&[("A", 40.0), ("B", 60.0)]);
        chart.on_cursor_moved(point_at(0.1, 50.0));

        chart.update_data(vec![
            PieEntry::new("small", 1.0),
            PieEntry::new("big", 3.0),
        ]);

        let slices = chart.slices();
        assert_eq!(slices[0].label, "small");
        assert_eq!(slices[0].start_angle, 0.0);
        assert!((slices[0].end_angle - PI / 2.0).abs() < 1e-5);
        assert_eq!(chart.hover(), Hover::Idle);
    }

    #[test]
    fn colours_cycle() {
        let chart = chart(&[("a", 1.0), ("b", 1.0), ("c", 1.0)]);

        assert_eq!(chart.slices()[2].color, chart.slices()[0].color);
    }

    #[test]
    fn hover_transitions() {
        let mut chart = chart(&[("A", 40.0), ("B", 60.0)]);

        assert!(chart.on_cursor_moved(point_at(0.5, 100.0)));
        assert_eq!(chart.hover(), Hover::Hovering(0));
        assert!(!chart.on_cursor_moved(point_at(0.6, 120.0)));

        assert!(chart.on_cursor_moved(point_at(PI, 100.0)));
        assert_eq!(chart.hover(), Hover::Hovering(1));

        assert!(chart.on_cursor_moved(point_at(PI, 250.0)));
        assert_eq!(chart.hover(), Hover::Idle);

        chart.on_cursor_moved(point_at(0.5, 100.0));
        assert!(chart.on_cursor_left());
        assert!(!chart.on_cursor_left());
    }

    #[test]
    fn highlighted_slice_is_lightened() {
        let mut chart = chart(&[("A", 40.0), ("B", 60.0)]);
        chart.on_cursor_moved(point_at(0.5, 100.0));

        let scene = chart.draw(&Theme::default());
        let (_, _, fill) = scene.wedges().next().unwrap();
        assert_eq!(*fill, Fill::Solid(lighten(Color::from_rgb8(0, 0, 200), 0.25)));

        let tooltip = chart.tooltip().unwrap();
        assert_eq!(tooltip.label, "A");
        assert_eq!(tooltip.value, "Value: 40");
        assert_eq!(tooltip.percent, "40%");
        assert!(scene.has_text("Value: 40"));
    }

    #[test]
    fn tooltip_stays_inside() {
        let mut chart = chart(&[("A", 40.0), ("B", 60.0)]);
        chart.on_cursor_moved(Point::new(395.0, 205.0));

        let bounds = chart.tooltip().unwrap().bounds;
        assert!(bounds.x + bounds.width <= SIZE.width);
        assert!(bounds.y + bounds.height <= SIZE.height);
    }

    #[test]
    fn resize_keeps_highlight() {
        let mut chart = chart(&[("A", 40.0), ("B", 60.0)]);
        chart.on_cursor_moved(point_at(0.5, 100.0));

        chart.resize(Size::new(800.0, 300.0));
        assert_eq!(chart.hover(), Hover::Hovering(0));
        assert_eq!(chart.size(), Size::new(800.0, 300.0));
    }

    #[test]
    fn tiny_shares_have_no_label() {
        let scene = chart(&[("whale", 1000.0), ("dust", 1.0)]).draw(&Theme::default());

        assert!(scene.has_text("100%"));
        assert!(!scene.has_text("0%"));
        assert!(!scene.has_text("dust"));
    }

    #[test]
    fn empty_or_zero_data_shows_placeholder() {
        let theme = Theme::default();

        assert!(chart(&[]).draw(&theme).has_text("No data available"));
        assert!(chart(&[("a", 0.0), ("b", 0.0)]).draw(&theme).has_text("No data available"));
    }
}
