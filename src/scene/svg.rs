//! SVG export of a [`Scene`].

use std::f32::consts::{PI, TAU};

use data::ScaleFactor;
use iced_core::{Color, Point};
use svg::{Document, Node};
use svg::node::element::path::Data;
use svg::node::element::{
    Circle, Definitions, Element, Filter, Line, LinearGradient, Path, Polygon, Rectangle, Stop,
    Text as SvgText,
};

use super::{Align, Baseline, Fill, Font, Primitive, Scene, Shadow, Stroke, Text};

/// Builds `scene` as a standalone SVG document. The view box keeps the
/// scene's logical size, `scale` multiplies the output width and height.
pub fn document(scene: &Scene, scale: ScaleFactor) -> Document {
    let scale = f32::from(scale);
    let size = scene.size();

    let mut defs = Defs::default();
    let mut document = Document::new()
        .set("xmlns", "http://www.w3.org/2000/svg")
        .set("width", (size.width * scale).round())
        .set("height", (size.height * scale).round())
        .set(
            "viewBox",
            format!("0 0 {} {}", round(size.width), round(size.height)),
        );

    let mut body = Vec::with_capacity(scene.primitives().len());
    for primitive in scene.primitives() {
        if let Some(node) = element(&mut defs, primitive) {
            body.push(node);
        }
    }

    if !defs.is_empty() {
        document = document.add(defs.node);
    }
    for node in body {
        document = document.add(node);
    }

    document
}

pub fn render(scene: &Scene, scale: ScaleFactor) -> String {
    document(scene, scale).to_string()
}

/// Gradients and shadow filters referenced by id from the body.
struct Defs {
    node: Definitions,
    next_id: usize,
}

impl Default for Defs {
    fn default() -> Self {
        Self {
            node: Definitions::new(),
            next_id: 0,
        }
    }
}

impl Defs {
    fn is_empty(&self) -> bool {
        self.next_id == 0
    }

    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }

    fn gradient(&mut self, start: Point, end: Point, stops: &[(f32, Color)]) -> String {
        let id = self.id("gradient");

        let mut gradient = LinearGradient::new()
            .set("id", id.as_str())
            .set("gradientUnits", "userSpaceOnUse")
            .set("x1", round(start.x))
            .set("y1", round(start.y))
            .set("x2", round(end.x))
            .set("y2", round(end.y));
        for (offset, color) in stops {
            let mut stop = Stop::new()
                .set("offset", round(*offset))
                .set("stop-color", hex(*color));
            if let Some(alpha) = opacity(*color) {
                stop = stop.set("stop-opacity", round(alpha));
            }
            gradient = gradient.add(stop);
        }

        self.push(gradient);
        format!("url(#{id})")
    }

    fn shadow(&mut self, shadow: &Shadow) -> String {
        let id = self.id("shadow");

        let mut drop = Element::new("feDropShadow");
        drop.assign("dx", round(shadow.offset.x));
        drop.assign("dy", round(shadow.offset.y));
        drop.assign("stdDeviation", round(shadow.blur / 2.0));
        drop.assign("flood-color", hex(shadow.color));
        drop.assign("flood-opacity", round(shadow.color.a));

        let filter = Filter::new()
            .set("id", id.as_str())
            .set("x", "-20%")
            .set("y", "-20%")
            .set("width", "140%")
            .set("height", "140%")
            .add(drop);

        self.push(filter);
        format!("url(#{id})")
    }

    fn push(&mut self, node: impl Node) {
        self.node.append(node);
    }
}

fn element(defs: &mut Defs, primitive: &Primitive) -> Option<Box<dyn Node>> {
    let node: Box<dyn Node> = match primitive {
        Primitive::Rect {
            bounds,
            fill,
            radius,
            stroke,
            shadow,
        } => {
            let mut rect = Rectangle::new()
                .set("x", round(bounds.x))
                .set("y", round(bounds.y))
                .set("width", round(bounds.width.max(0.0)))
                .set("height", round(bounds.height.max(0.0)));
            if *radius > 0.0 {
                rect = rect.set("rx", round(*radius));
            }
            rect = paint(rect, defs, fill);
            if let Some(stroke) = stroke {
                rect = outline(rect, stroke);
            }
            if let Some(shadow) = shadow {
                rect = rect.set("filter", defs.shadow(shadow));
            }
            Box::new(rect)
        }
        Primitive::Line { from, to, stroke } => {
            let line = Line::new()
                .set("x1", round(from.x))
                .set("y1", round(from.y))
                .set("x2", round(to.x))
                .set("y2", round(to.y));
            Box::new(outline(line, stroke))
        }
        Primitive::Circle {
            center,
            radius,
            fill,
        } => {
            let circle = Circle::new()
                .set("cx", round(center.x))
                .set("cy", round(center.y))
                .set("r", round(*radius));
            Box::new(paint(circle, defs, fill))
        }
        Primitive::Polygon {
            points,
            fill,
            stroke,
        } => {
            let points = points
                .iter()
                .map(|point| format!("{},{}", round(point.x), round(point.y)))
                .collect::<Vec<_>>()
                .join(" ");
            let mut polygon = paint(Polygon::new().set("points", points), defs, fill);
            if let Some(stroke) = stroke {
                polygon = outline(polygon, stroke);
            }
            Box::new(polygon)
        }
        Primitive::Wedge {
            center,
            radius,
            start_angle,
            end_angle,
            fill,
        } => {
            let sweep = end_angle - start_angle;
            if sweep <= 0.0 {
                return None;
            }

            if sweep >= TAU - 1e-4 {
                let circle = Circle::new()
                    .set("cx", round(center.x))
                    .set("cy", round(center.y))
                    .set("r", round(*radius));
                Box::new(paint(circle, defs, fill))
            } else {
                let from = (
                    center.x + radius * start_angle.cos(),
                    center.y + radius * start_angle.sin(),
                );
                let to = (
                    center.x + radius * end_angle.cos(),
                    center.y + radius * end_angle.sin(),
                );
                let large_arc = if sweep > PI { 1.0 } else { 0.0 };

                let data = Data::new()
                    .move_to(vec![round(center.x), round(center.y)])
                    .line_to(vec![round(from.0), round(from.1)])
                    .elliptical_arc_to(vec![
                        round(*radius),
                        round(*radius),
                        0.0,
                        large_arc,
                        1.0,
                        round(to.0),
                        round(to.1),
                    ])
                    .close();
                Box::new(paint(Path::new().set("d", data), defs, fill))
            }
        }
        Primitive::Text(text) => Box::new(label(text)),
    };

    Some(node)
}

fn paint<T: Node>(mut node: T, defs: &mut Defs, fill: &Fill) -> T {
    match fill {
        Fill::Solid(color) if *color == Color::TRANSPARENT => node.assign("fill", "none"),
        Fill::Solid(color) => {
            node.assign("fill", hex(*color));
            if let Some(alpha) = opacity(*color) {
                node.assign("fill-opacity", round(alpha));
            }
        }
        Fill::Linear { start, end, stops } => {
            node.assign("fill", defs.gradient(*start, *end, stops));
        }
    }
    node
}

fn outline<T: Node>(mut node: T, stroke: &Stroke) -> T {
    node.assign("stroke", hex(stroke.color));
    node.assign("stroke-width", round(stroke.width));
    if let Some(alpha) = opacity(stroke.color) {
        node.assign("stroke-opacity", round(alpha));
    }
    if let Some([dash, gap]) = stroke.dash {
        node.assign("stroke-dasharray", format!("{},{}", round(dash), round(gap)));
    }
    node
}

fn label(text: &Text) -> SvgText {
    let anchor = match text.align {
        Align::Start => "start",
        Align::Center => "middle",
        Align::End => "end",
    };
    let baseline = match text.baseline {
        Baseline::Top => "hanging",
        Baseline::Middle => "central",
        Baseline::Bottom => "alphabetic",
    };
    let family = match text.font {
        Font::Sans => "sans-serif",
        Font::Monospace => "monospace",
    };

    let mut node = SvgText::new(text.content.as_str())
        .set("x", round(text.position.x))
        .set("y", round(text.position.y))
        .set("font-family", family)
        .set("font-size", round(text.size))
        .set("text-anchor", anchor)
        .set("dominant-baseline", baseline)
        .set("fill", hex(text.color));
    if let Some(alpha) = opacity(text.color) {
        node = node.set("fill-opacity", round(alpha));
    }
    if text.bold {
        node = node.set("font-weight", "bold");
    }
    node
}

fn hex(color: Color) -> String {
    let [r, g, b, _] = color.into_rgba8();
    format!("#{r:02x}{g:02x}{b:02x}")
}

fn opacity(color: Color) -> Option<f32> {
    (color.a < 1.0).then_some(color.a.max(0.0))
}

/// Two decimals at most. Non-finite values collapse to zero.
fn round(value: f32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Fill, Stroke, Text};
    use iced_core::{Rectangle, Size, Vector};

    fn scene() -> Scene {
        let mut scene = Scene::new(Size::new(200.0, 100.0));
        scene.fill_background(Color::from_rgb8(26, 27, 30));
        scene.line(
            Point::new(0.0, 50.0),
            Point::new(200.0, 50.0),
            Stroke::dashed(Color::from_rgba8(255, 255, 255, 0.5), 1.0, 5.0, 5.0),
        );
        scene.fill_rect(
            Rectangle::new(Point::new(10.0, 10.0), Size::new(20.0, 80.0)),
            Fill::vertical(10.0, 90.0, Color::WHITE, Color::BLACK),
        );
        scene.text(Text::new("A & B", Point::new(100.0, 20.0), Color::WHITE, 12.0).align(Align::Center));
        scene
    }

    #[test]
    fn document_size_uses_scale() {
        let svg = render(&scene(), ScaleFactor::from(2.0));

        assert!(svg.contains("<svg"));
        assert!(svg.contains(r#"width="400""#));
        assert!(svg.contains(r#"height="200""#));
        assert!(svg.contains(r#"viewBox="0 0 200 100""#));
        assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn primitives_are_serialised() {
        let svg = render(&scene(), ScaleFactor::default());

        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains(r##"fill="#1a1b1e""##));
        assert!(svg.contains(r#"stroke-dasharray="5,5""#));
        assert!(svg.contains(r#"stroke-opacity="0.5""#));
        assert!(svg.contains(r#"id="gradient1""#));
        assert!(svg.contains(r#"fill="url(#gradient1)""#));
        assert!(svg.contains("A &amp; B"));
        assert!(svg.contains(r#"text-anchor="middle""#));
    }

    #[test]
    fn shadows_become_filters() {
        let mut scene = Scene::new(Size::new(100.0, 100.0));
        scene.push(Primitive::Rect {
            bounds: Rectangle::new(Point::new(10.0, 10.0), Size::new(50.0, 20.0)),
            fill: Fill::Solid(Color::WHITE),
            radius: 4.0,
            stroke: None,
            shadow: Some(Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
                blur: 6.0,
                offset: Vector::new(0.0, 2.0),
            }),
        });

        let svg = render(&scene, ScaleFactor::default());

        assert!(svg.contains("<feDropShadow"));
        assert!(svg.contains(r#"stdDeviation="3""#));
        assert!(svg.contains(r#"filter="url(#shadow1)""#));
        assert!(svg.contains(r#"rx="4""#));
    }

    #[test]
    fn wedges_become_arcs_or_circles() {
        let mut scene = Scene::new(Size::new(100.0, 100.0));
        scene.wedge(Point::new(50.0, 50.0), 40.0, (0.0, PI / 2.0), Color::WHITE);
        scene.wedge(Point::new(50.0, 50.0), 40.0, (0.0, TAU), Color::BLACK);
        scene.wedge(Point::new(50.0, 50.0), 40.0, (1.0, 1.0), Color::BLACK);

        let svg = render(&scene, ScaleFactor::default());

        assert!(svg.contains("M50,50"));
        assert!(svg.contains("L90,50"));
        assert!(svg.contains("A40,40,0,0,1,50,90"));
        assert_eq!(svg.matches("<circle").count(), 1);
        assert_eq!(svg.matches("<path").count(), 1);
    }

    #[test]
    fn coordinates_are_rounded() {
        assert_eq!(round(1.0), 1.0);
        assert_eq!(round(1.256), 1.26);
        assert_eq!(round(-0.001), 0.0);
        assert_eq!(round(f32::NAN), 0.0);
    }
}
