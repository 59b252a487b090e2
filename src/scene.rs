//! Display list a chart renders into.
//!
//! Renderers never touch pixels: they push [`Primitive`]s onto a [`Scene`] sized like
//! the target canvas. Backends replay the list, [`svg`] into a document and
//! [`crate::widget`] into an iced canvas frame. Tests inspect the list directly.

pub mod svg;

use iced_core::{Color, Point, Rectangle, Size, Vector};

/// Average glyph advance as a share of the font size.
const CHAR_WIDTH_RATIO: f32 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Color),
    /// Linear gradient between two points, stops ordered by offset in `0..=1`.
    Linear {
        start: Point,
        end: Point,
        stops: Vec<(f32, Color)>,
    },
}

impl Fill {
    pub fn vertical(top: f32, bottom: f32, from: Color, to: Color) -> Self {
        Fill::Linear {
            start: Point::new(0.0, top),
            end: Point::new(0.0, bottom),
            stops: vec![(0.0, from), (1.0, to)],
        }
    }

    /// Solid colour, or the first stop of a gradient.
    pub fn color(&self) -> Color {
        match self {
            Fill::Solid(color) => *color,
            Fill::Linear { stops, .. } => stops.first().map_or(Color::TRANSPARENT, |(_, c)| *c),
        }
    }
}

impl From<Color> for Fill {
    fn from(color: Color) -> Self {
        Fill::Solid(color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
    /// Dash and gap lengths, solid when `None`.
    pub dash: Option<[f32; 2]>,
}

impl Stroke {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Color, width: f32, dash: f32, gap: f32) -> Self {
        Self {
            color,
            width,
            dash: Some([dash, gap]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub color: Color,
    pub blur: f32,
    pub offset: Vector,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Baseline {
    #[default]
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Font {
    #[default]
    Sans,
    Monospace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub content: String,
    pub position: Point,
    pub color: Color,
    pub size: f32,
    pub align: Align,
    pub baseline: Baseline,
    pub font: Font,
    pub bold: bool,
}

impl Text {
    pub fn new(content: impl Into<String>, position: Point, color: Color, size: f32) -> Self {
        Self {
            content: content.into(),
            position,
            color,
            size,
            align: Align::Start,
            baseline: Baseline::Top,
            font: Font::Sans,
            bold: false,
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn monospace(mut self) -> Self {
        self.font = Font::Monospace;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn width(&self) -> f32 {
        text_width(&self.content, self.size)
    }

    /// Approximate box the text covers once aligned.
    pub fn bounds(&self) -> Rectangle {
        let width = self.width();
        let x = match self.align {
            Align::Start => self.position.x,
            Align::Center => self.position.x - width / 2.0,
            Align::End => self.position.x - width,
        };
        let y = match self.baseline {
            Baseline::Top => self.position.y,
            Baseline::Middle => self.position.y - self.size / 2.0,
            Baseline::Bottom => self.position.y - self.size,
        };

        Rectangle {
            x,
            y,
            width,
            height: self.size,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect {
        bounds: Rectangle,
        fill: Fill,
        radius: f32,
        stroke: Option<Stroke>,
        shadow: Option<Shadow>,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
    },
    Circle {
        center: Point,
        radius: f32,
        fill: Fill,
    },
    Polygon {
        points: Vec<Point>,
        fill: Fill,
        stroke: Option<Stroke>,
    },
    /// Pie slice from `start_angle` to `end_angle`, radians clockwise from +X.
    Wedge {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        fill: Fill,
    },
    Text(Text),
}

impl Primitive {
    /// Every coordinate the primitive is drawn with.
    pub fn coordinates(&self) -> Vec<f32> {
        match self {
            Primitive::Rect { bounds, radius, .. } => {
                vec![bounds.x, bounds.y, bounds.width, bounds.height, *radius]
            }
            Primitive::Line { from, to, stroke } => vec![from.x, from.y, to.x, to.y, stroke.width],
            Primitive::Circle { center, radius, .. } => vec![center.x, center.y, *radius],
            Primitive::Polygon { points, .. } => points.iter().flat_map(|p| [p.x, p.y]).collect(),
            Primitive::Wedge {
                center,
                radius,
                start_angle,
                end_angle,
                ..
            } => vec![center.x, center.y, *radius, *start_angle, *end_angle],
            Primitive::Text(text) => vec![text.position.x, text.position.y, text.size],
        }
    }
}

/// Ordered drawing commands for one canvas.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    size: Size,
    primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            primitives: Vec::new(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn bounds(&self) -> Rectangle {
        Rectangle::with_size(self.size)
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn fill_background(&mut self, color: Color) {
        self.fill_rect(self.bounds(), color);
    }

    pub fn fill_rect(&mut self, bounds: Rectangle, fill: impl Into<Fill>) {
        self.push(Primitive::Rect {
            bounds,
            fill: fill.into(),
            radius: 0.0,
            stroke: None,
            shadow: None,
        });
    }

    pub fn line(&mut self, from: Point, to: Point, stroke: Stroke) {
        self.push(Primitive::Line { from, to, stroke });
    }

    pub fn circle(&mut self, center: Point, radius: f32, fill: impl Into<Fill>) {
        self.push(Primitive::Circle {
            center,
            radius,
            fill: fill.into(),
        });
    }

    pub fn polygon(&mut self, points: Vec<Point>, fill: impl Into<Fill>, stroke: Option<Stroke>) {
        self.push(Primitive::Polygon {
            points,
            fill: fill.into(),
            stroke,
        });
    }

    pub fn wedge(&mut self, center: Point, radius: f32, angles: (f32, f32), fill: impl Into<Fill>) {
        self.push(Primitive::Wedge {
            center,
            radius,
            start_angle: angles.0,
            end_angle: angles.1,
            fill: fill.into(),
        });
    }

    pub fn text(&mut self, text: Text) {
        self.push(Primitive::Text(text));
    }

    pub fn texts(&self) -> impl Iterator<Item = &Text> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text(text) => Some(text),
            _ => None,
        })
    }

    pub fn has_text(&self, content: &str) -> bool {
        self.texts().any(|t| t.content == content)
    }

    pub fn lines(&self) -> impl Iterator<Item = (Point, Point, &Stroke)> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Line { from, to, stroke } => Some((*from, *to, stroke)),
            _ => None,
        })
    }

    pub fn circles(&self) -> impl Iterator<Item = (Point, f32, &Fill)> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Circle {
                center,
                radius,
                fill,
            } => Some((*center, *radius, fill)),
            _ => None,
        })
    }

    pub fn rects(&self) -> impl Iterator<Item = (Rectangle, &Fill)> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Rect { bounds, fill, .. } => Some((*bounds, fill)),
            _ => None,
        })
    }

    pub fn wedges(&self) -> impl Iterator<Item = (f32, f32, &Fill)> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Wedge {
                start_angle,
                end_angle,
                fill,
                ..
            } => Some((*start_angle, *end_angle, fill)),
            _ => None,
        })
    }

    /// Whether every coordinate of every primitive is a finite number.
    pub fn is_finite(&self) -> bool {
        self.primitives
            .iter()
            .all(|p| p.coordinates().iter().all(|v| v.is_finite()))
    }
}

/// Estimated advance of `content` set at `size` px.
pub fn text_width(content: &str, size: f32) -> f32 {
    content.chars().count() as f32 * size * CHAR_WIDTH_RATIO
}

/// Moves `bounds` the least distance needed to lie inside `area`.
pub fn clamp_into(bounds: Rectangle, area: Rectangle) -> Rectangle {
    let max_x = (area.x + area.width - bounds.width).max(area.x);
    let max_y = (area.y + area.height - bounds.height).max(area.y);

    Rectangle {
        x: bounds.x.clamp(area.x, max_x),
        y: bounds.y.clamp(area.y, max_y),
        ..bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aligned_text_bounds() {
        let text = Text::new("abcd", Point::new(100.0, 50.0), Color::WHITE, 10.0)
            .align(Align::End)
            .baseline(Baseline::Middle);

        let bounds = text.bounds();
        assert_eq!(bounds.width, 24.0);
        assert_eq!(bounds.x, 76.0);
        assert_eq!(bounds.y, 45.0);
    }

    #[test]
    fn clamping_keeps_boxes_inside() {
        let area = Rectangle::new(Point::ORIGIN, Size::new(100.0, 100.0));

        let moved = clamp_into(Rectangle::new(Point::new(90.0, -5.0), Size::new(30.0, 20.0)), area);
        assert_eq!((moved.x, moved.y), (70.0, 0.0));

        let oversized = clamp_into(Rectangle::new(Point::new(50.0, 50.0), Size::new(300.0, 20.0)), area);
        assert_eq!(oversized.x, 0.0);
    }

    #[test]
    fn finiteness_covers_all_primitives() {
        let mut scene = Scene::new(Size::new(10.0, 10.0));
        scene.fill_background(Color::BLACK);
        scene.circle(Point::new(1.0, 2.0), 3.0, Color::WHITE);
        assert!(scene.is_finite());

        scene.line(Point::ORIGIN, Point::new(f32::NAN, 0.0), Stroke::solid(Color::WHITE, 1.0));
        assert!(!scene.is_finite());
    }
}
