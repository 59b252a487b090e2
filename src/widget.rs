//! iced canvas backend: replays a [`Scene`] into a frame, and canvas programs that
//! turn mouse and touch input into chart events.

use data::Theme as ChartTheme;
use iced::widget::canvas::{self, LineDash, Path, Stroke};
use iced::{Element, Event, Length, Point, Radians, Rectangle, Renderer, Size, Theme, mouse, touch};
use iced_core::mouse::{Click, click::Kind as ClickKind};
use rustc_hash::FxHashMap;

use crate::chart::candlestick::{self, Cursor};
use crate::chart::{CandlestickChart, LineChart, PieChart};
use crate::scene::{self, Align, Baseline, Fill, Primitive, Scene};

#[derive(Debug, Clone)]
pub enum Message {
    Candlestick { size: Size, event: candlestick::Event },
    CursorMoved { size: Size, position: Point },
    CursorLeft { size: Size },
}

/// Draws every primitive of `scene` onto `frame`, in order.
pub fn paint(frame: &mut canvas::Frame, scene: &Scene) {
    for primitive in scene.primitives() {
        match primitive {
            Primitive::Rect {
                bounds,
                fill,
                radius,
                stroke,
                shadow,
            } => {
                let path = |bounds: Rectangle| {
                    if *radius > 0.0 {
                        Path::rounded_rectangle(bounds.position(), bounds.size(), (*radius).into())
                    } else {
                        Path::rectangle(bounds.position(), bounds.size())
                    }
                };

                // canvas frames have no blur, an offset copy stands in for the shadow
                if let Some(shadow) = shadow {
                    frame.fill(&path(*bounds + shadow.offset), shadow.color);
                }
                frame.fill(&path(*bounds), to_fill(fill));
                if let Some(stroke) = stroke {
                    stroke_path(frame, &path(*bounds), stroke);
                }
            }
            Primitive::Line { from, to, stroke } => {
                stroke_path(frame, &Path::line(*from, *to), stroke);
            }
            Primitive::Circle {
                center,
                radius,
                fill,
            } => {
                frame.fill(&Path::circle(*center, *radius), to_fill(fill));
            }
            Primitive::Polygon {
                points,
                fill,
                stroke,
            } => {
                let Some((first, rest)) = points.split_first() else {
                    continue;
                };
                let path = Path::new(|builder| {
                    builder.move_to(*first);
                    for point in rest {
                        builder.line_to(*point);
                    }
                    builder.close();
                });

                frame.fill(&path, to_fill(fill));
                if let Some(stroke) = stroke {
                    stroke_path(frame, &path, stroke);
                }
            }
            Primitive::Wedge {
                center,
                radius,
                start_angle,
                end_angle,
                fill,
            } => {
                let path = Path::new(|builder| {
                    builder.move_to(*center);
                    builder.arc(canvas::path::Arc {
                        center: *center,
                        radius: *radius,
                        start_angle: Radians(*start_angle),
                        end_angle: Radians(*end_angle),
                    });
                    builder.close();
                });
                frame.fill(&path, to_fill(fill));
            }
            Primitive::Text(text) => frame.fill_text(to_text(text)),
        }
    }
}

fn to_fill(fill: &Fill) -> canvas::Fill {
    match fill {
        Fill::Solid(color) => (*color).into(),
        Fill::Linear { start, end, stops } => {
            let gradient = stops.iter().fold(
                canvas::gradient::Linear::new(*start, *end),
                |gradient, (offset, color)| gradient.add_stop(*offset, *color),
            );

            canvas::Fill {
                style: canvas::Style::Gradient(canvas::Gradient::Linear(gradient)),
                ..canvas::Fill::default()
            }
        }
    }
}

fn stroke_path(frame: &mut canvas::Frame, path: &Path, stroke: &scene::Stroke) {
    let segments: &[f32] = match &stroke.dash {
        Some(dash) => dash,
        None => &[],
    };

    frame.stroke(
        path,
        Stroke::with_color(
            Stroke {
                width: stroke.width,
                line_dash: LineDash {
                    segments,
                    offset: 0,
                },
                ..Default::default()
            },
            stroke.color,
        ),
    );
}

fn to_text(text: &scene::Text) -> canvas::Text {
    let font = match text.font {
        scene::Font::Sans => iced::Font::DEFAULT,
        scene::Font::Monospace => iced::Font::MONOSPACE,
    };
    let align_x = match text.align {
        Align::Start => iced::Alignment::Start,
        Align::Center => iced::Alignment::Center,
        Align::End => iced::Alignment::End,
    };
    let align_y = match text.baseline {
        Baseline::Top => iced::Alignment::Start,
        Baseline::Middle => iced::Alignment::Center,
        Baseline::Bottom => iced::Alignment::End,
    };

    canvas::Text {
        content: text.content.clone(),
        position: text.position,
        color: text.color,
        size: text.size.into(),
        font: if text.bold {
            iced::Font {
                weight: iced::font::Weight::Bold,
                ..font
            }
        } else {
            font
        },
        align_x: align_x.into(),
        align_y: align_y.into(),
        ..Default::default()
    }
}

fn geometry(renderer: &Renderer, size: Size, scene: &Scene) -> Vec<canvas::Geometry> {
    let mut frame = canvas::Frame::new(renderer, size);
    paint(&mut frame, scene);
    vec![frame.into_geometry()]
}

/// A chart without interaction, redrawn only when its size changes.
pub struct Static<F> {
    draw: F,
}

impl<F> canvas::Program<Message> for Static<F>
where
    F: Fn(Size) -> Scene,
{
    type State = canvas::Cache;

    fn draw(
        &self,
        cache: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let content = cache.draw(renderer, bounds.size(), |frame| {
            paint(frame, &(self.draw)(frame.size()));
        });

        vec![content]
    }
}

pub fn static_chart<'a, F>(draw: F) -> Element<'a, Message>
where
    F: Fn(Size) -> Scene + 'a,
{
    canvas(Static { draw })
}

/// Pointer state the candlestick canvas keeps between events.
#[derive(Default)]
pub struct Gesture {
    last_click: Option<Click>,
    fingers: FxHashMap<touch::Finger, Point>,
}

impl Gesture {
    /// Registers a left click, double when it follows the previous one closely.
    fn click(&mut self, position: Point) -> ClickKind {
        let click = Click::new(position, mouse::Button::Left, self.last_click.take());
        let kind = click.kind();
        self.last_click = Some(click);
        kind
    }

    fn fingers(&self) -> Vec<Point> {
        let mut fingers: Vec<(u64, Point)> = self
            .fingers
            .iter()
            .map(|(finger, point)| (finger.0, *point))
            .collect();
        fingers.sort_by_key(|(id, _)| *id);
        fingers.into_iter().map(|(_, point)| point).collect()
    }
}

pub struct Candlestick<'a> {
    chart: &'a CandlestickChart,
    theme: &'a ChartTheme,
}

impl Candlestick<'_> {
    fn translate(
        &self,
        gesture: &mut Gesture,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<candlestick::Event> {
        let relative = |position: Point| Point::new(position.x - bounds.x, position.y - bounds.y);
        let state = self.chart.state();

        match event {
            Event::Mouse(mouse_event) => match mouse_event {
                mouse::Event::CursorMoved { .. } => match cursor.position_in(bounds) {
                    Some(position) => Some(candlestick::Event::CursorMoved(position)),
                    // drags keep panning outside the canvas
                    None if state.dragging => cursor
                        .position()
                        .map(|position| candlestick::Event::CursorMoved(relative(position))),
                    None if state.hover.is_some() => Some(candlestick::Event::CursorLeft),
                    None => None,
                },
                mouse::Event::CursorLeft => Some(candlestick::Event::CursorLeft),
                mouse::Event::ButtonPressed(mouse::Button::Left) => {
                    let position = cursor.position_in(bounds)?;

                    match gesture.click(position) {
                        ClickKind::Double => Some(candlestick::Event::DoubleClicked),
                        _ => Some(candlestick::Event::ButtonPressed(position)),
                    }
                }
                mouse::Event::ButtonReleased(mouse::Button::Left) if state.dragging => {
                    Some(candlestick::Event::ButtonReleased)
                }
                mouse::Event::WheelScrolled { delta } => {
                    cursor.position_in(bounds)?;
                    let y = match delta {
                        mouse::ScrollDelta::Lines { y, .. } | mouse::ScrollDelta::Pixels { y, .. } => *y,
                    };
                    // iced scrolls up with a positive delta, pages the other way round
                    (y != 0.0).then_some(candlestick::Event::WheelScrolled { delta_y: -y })
                }
                _ => None,
            },
            Event::Touch(touch_event) => match touch_event {
                touch::Event::FingerPressed { id, position } => {
                    if !bounds.contains(*position) {
                        return None;
                    }
                    gesture.fingers.insert(*id, relative(*position));
                    Some(candlestick::Event::TouchStarted(gesture.fingers()))
                }
                touch::Event::FingerMoved { id, position } => {
                    let finger = gesture.fingers.get_mut(id)?;
                    *finger = relative(*position);
                    Some(candlestick::Event::TouchMoved(gesture.fingers()))
                }
                touch::Event::FingerLifted { id, .. } | touch::Event::FingerLost { id, .. } => {
                    gesture.fingers.remove(id)?;
                    if gesture.fingers.is_empty() {
                        Some(candlestick::Event::TouchEnded)
                    } else {
                        Some(candlestick::Event::TouchStarted(gesture.fingers()))
                    }
                }
            },
            _ => None,
        }
    }
}

impl canvas::Program<Message> for Candlestick<'_> {
    type State = Gesture;

    fn update(
        &self,
        gesture: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let event = self.translate(gesture, event, bounds, cursor)?;

        Some(
            canvas::Action::publish(Message::Candlestick {
                size: bounds.size(),
                event,
            })
            .and_capture(),
        )
    }

    fn draw(
        &self,
        _gesture: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let chart = self.chart;
        let scene = candlestick::render(
            bounds.size(),
            chart.state(),
            chart.candles(),
            chart.options(),
            self.theme,
        );

        geometry(renderer, bounds.size(), &scene)
    }

    fn mouse_interaction(
        &self,
        _gesture: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if !cursor.is_over(bounds) && !self.chart.state().dragging {
            return mouse::Interaction::default();
        }

        match self.chart.state().cursor() {
            Cursor::Grabbing => mouse::Interaction::Grabbing,
            Cursor::Crosshair => mouse::Interaction::Crosshair,
            Cursor::Grab => mouse::Interaction::Grab,
            Cursor::Default => mouse::Interaction::default(),
        }
    }
}

pub fn candlestick<'a>(chart: &'a CandlestickChart, theme: &'a ChartTheme) -> Element<'a, Message> {
    canvas(Candlestick { chart, theme })
}

/// Hover-only input shared by the pie and line canvases.
fn hover_message(event: &Event, bounds: Rectangle, cursor: mouse::Cursor, hovering: bool) -> Option<Message> {
    let size = bounds.size();

    match event {
        Event::Mouse(mouse::Event::CursorMoved { .. }) => match cursor.position_in(bounds) {
            Some(position) => Some(Message::CursorMoved { size, position }),
            None if hovering => Some(Message::CursorLeft { size }),
            None => None,
        },
        Event::Mouse(mouse::Event::CursorLeft) if hovering => Some(Message::CursorLeft { size }),
        _ => None,
    }
}

pub struct Pie<'a> {
    chart: &'a PieChart,
    theme: &'a ChartTheme,
}

impl canvas::Program<Message> for Pie<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        let hovering = self.chart.hover() != crate::chart::pie::Hover::Idle;
        hover_message(event, bounds, cursor, hovering).map(canvas::Action::publish)
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let scene = if self.chart.size() == bounds.size() {
            self.chart.draw(self.theme)
        } else {
            let mut chart = self.chart.clone();
            chart.resize(bounds.size());
            chart.draw(self.theme)
        };

        geometry(renderer, bounds.size(), &scene)
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) && self.chart.hover() != crate::chart::pie::Hover::Idle {
            mouse::Interaction::Pointer
        } else {
            mouse::Interaction::default()
        }
    }
}

pub fn pie<'a>(chart: &'a PieChart, theme: &'a ChartTheme) -> Element<'a, Message> {
    canvas(Pie { chart, theme })
}

pub struct Line<'a> {
    chart: &'a LineChart,
}

impl canvas::Program<Message> for Line<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: &Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> Option<canvas::Action<Message>> {
        hover_message(event, bounds, cursor, self.chart.cursor().is_some()).map(canvas::Action::publish)
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        geometry(renderer, bounds.size(), &self.chart.draw(bounds.size()))
    }

    fn mouse_interaction(
        &self,
        _state: &Self::State,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> mouse::Interaction {
        if cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

pub fn line(chart: &LineChart) -> Element<'_, Message> {
    canvas(Line { chart })
}

fn canvas<'a, P>(program: P) -> Element<'a, Message>
where
    P: canvas::Program<Message> + 'a,
{
    iced::widget::canvas(program)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use data::chart::CandlestickOptions;

    fn chart() -> CandlestickChart {
        CandlestickChart::new(
            data::sample::candles(40, 5),
            CandlestickOptions::default(),
            Size::new(800.0, 400.0),
        )
    }

    fn press() -> Event {
        Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left))
    }

    #[test]
    fn second_quick_click_is_a_double_click() {
        let mut gesture = Gesture::default();

        assert_eq!(gesture.click(Point::new(100.0, 80.0)), ClickKind::Single);
        assert_eq!(gesture.click(Point::new(100.0, 80.0)), ClickKind::Double);
    }

    #[test]
    fn double_press_translates_to_reset() {
        let chart = chart();
        let theme = ChartTheme::default();
        let program = Candlestick {
            chart: &chart,
            theme: &theme,
        };
        let bounds = Rectangle::new(Point::new(10.0, 20.0), Size::new(800.0, 400.0));
        let cursor = mouse::Cursor::Available(Point::new(410.0, 220.0));
        let mut gesture = Gesture::default();

        assert_eq!(
            program.translate(&mut gesture, &press(), bounds, cursor),
            Some(candlestick::Event::ButtonPressed(Point::new(400.0, 200.0)))
        );
        assert_eq!(
            program.translate(&mut gesture, &press(), bounds, cursor),
            Some(candlestick::Event::DoubleClicked)
        );
    }

    #[test]
    fn press_outside_the_canvas_is_ignored() {
        let chart = chart();
        let theme = ChartTheme::default();
        let program = Candlestick {
            chart: &chart,
            theme: &theme,
        };
        let bounds = Rectangle::new(Point::ORIGIN, Size::new(800.0, 400.0));
        let cursor = mouse::Cursor::Available(Point::new(900.0, 100.0));

        assert_eq!(program.translate(&mut Gesture::default(), &press(), bounds, cursor), None);
    }
}
