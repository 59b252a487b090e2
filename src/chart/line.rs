use data::util::{format_price, format_value};
use data::{Label, Series, Theme};
use iced_core::{Point, Rectangle, Size};

use super::scale::LinearScale;
use super::{Margins, placeholder};
use crate::scene::{Align, Baseline, Primitive, Scene, Stroke, Text, clamp_into, text_width};

const MARGINS: Margins = Margins::new(20.0, 20.0, 30.0, 70.0);

const GRID_LINES: usize = 4;
const LINE_WIDTH: f32 = 3.0;
const POINT_RADIUS: f32 = 5.0;

const LABEL_SIZE: f32 = 11.0;
const LABEL_GAP: f32 = 8.0;

/// Distance from a marker centre within which the cursor snaps to it.
const SNAP_RADIUS: f32 = 10.0;
const TOOLTIP_SIZE: f32 = 12.0;
const TOOLTIP_PADDING: f32 = 8.0;

pub fn draw(size: Size, series: &Series, theme: &Theme, hover: Option<Point>) -> Scene {
    let points = match series.points() {
        Ok(points) => points,
        Err(err) => {
            log::debug!("line chart skipped: {err}");
            return placeholder(size, "No chart data", theme);
        }
    };

    let plot = MARGINS.plot_area(size);
    let (min, max) = series.extent().unwrap_or((0.0, 1.0));
    let y_scale = LinearScale::new(min, max, plot.y + plot.height, plot.y);

    let positions: Vec<Point> = points
        .iter()
        .enumerate()
        .map(|(i, (_, value))| Point::new(x_position(plot, i, points.len()), y_scale.to_px(*value)))
        .collect();

    let mut scene = Scene::new(size);
    scene.fill_background(theme.background);

    for i in 0..GRID_LINES {
        let y = plot.y + plot.height * i as f32 / (GRID_LINES - 1) as f32;
        scene.line(
            Point::new(plot.x, y),
            Point::new(plot.x + plot.width, y),
            Stroke::solid(theme.grid, 1.0),
        );
    }

    for pair in positions.windows(2) {
        scene.line(pair[0], pair[1], Stroke::solid(theme.line, LINE_WIDTH));
    }

    for position in &positions {
        scene.circle(*position, POINT_RADIUS, theme.point);
    }

    let labels: Vec<&Label> = points.iter().map(|(label, _)| *label).collect();
    draw_x_labels(&mut scene, size, plot, &labels, &positions, theme);
    draw_extent_labels(&mut scene, plot, min, max, &y_scale, theme);

    if let Some(cursor) = hover {
        draw_hover(&mut scene, plot, cursor, &points, &positions, theme);
    }

    scene
}

fn x_position(plot: Rectangle, index: usize, count: usize) -> f32 {
    if count < 2 {
        plot.center_x()
    } else {
        plot.x + plot.width * index as f32 / (count - 1) as f32
    }
}

/// Every `stride`-th label so neighbours never overlap.
fn label_stride(widest: f32, count: usize, plot_width: f32) -> usize {
    let per_point = plot_width / count.saturating_sub(1).max(1) as f32;
    if per_point <= 0.0 {
        return count.max(1);
    }
    (((widest + LABEL_GAP) / per_point).ceil() as usize).max(1)
}

fn draw_x_labels(
    scene: &mut Scene,
    size: Size,
    plot: Rectangle,
    labels: &[&Label],
    positions: &[Point],
    theme: &Theme,
) {
    let texts: Vec<String> = labels.iter().map(ToString::to_string).collect();
    let widest = texts
        .iter()
        .map(|t| text_width(t, LABEL_SIZE))
        .fold(0.0, f32::max);

    let stride = label_stride(widest, texts.len(), plot.width);
    let mut shown: Vec<usize> = (0..texts.len()).step_by(stride).collect();

    let last = texts.len() - 1;
    if let Some(&previous) = shown.last().filter(|&&previous| previous != last) {
        let room = positions[last].x - positions[previous].x;
        let needed = (text_width(&texts[previous], LABEL_SIZE) + text_width(&texts[last], LABEL_SIZE))
            / 2.0
            + LABEL_GAP;
        if room >= needed {
            shown.push(last);
        }
    }

    let y = plot.y + plot.height + LABEL_GAP;
    for index in shown {
        let half = text_width(&texts[index], LABEL_SIZE) / 2.0;
        let x = positions[index].x.clamp(half, (size.width - half).max(half));

        scene.text(
            Text::new(texts[index].clone(), Point::new(x, y), theme.text_secondary, LABEL_SIZE)
                .align(Align::Center),
        );
    }
}

fn draw_extent_labels(
    scene: &mut Scene,
    plot: Rectangle,
    min: f64,
    max: f64,
    y_scale: &LinearScale,
    theme: &Theme,
) {
    let extents = if min == max { vec![max] } else { vec![max, min] };

    for value in extents {
        scene.text(
            Text::new(
                format_price(value),
                Point::new(plot.x - LABEL_GAP, y_scale.to_px(value)),
                theme.text_secondary,
                LABEL_SIZE,
            )
            .align(Align::End)
            .baseline(Baseline::Middle),
        );
    }
}

fn draw_hover(
    scene: &mut Scene,
    plot: Rectangle,
    cursor: Point,
    points: &[(&Label, f64)],
    positions: &[Point],
    theme: &Theme,
) {
    let guide_x = cursor.x.clamp(plot.x, plot.x + plot.width);
    scene.line(
        Point::new(guide_x, plot.y),
        Point::new(guide_x, plot.y + plot.height),
        Stroke::dashed(theme.crosshair, 1.0, 4.0, 4.0),
    );

    let Some((index, distance)) = nearest(positions, cursor) else {
        return;
    };
    if distance > SNAP_RADIUS {
        return;
    }

    let (label, value) = points[index];
    let anchor = positions[index];
    let content = format!("{label}: {}", format_value(value));

    let bounds = Rectangle {
        x: anchor.x + SNAP_RADIUS,
        y: anchor.y - SNAP_RADIUS - TOOLTIP_SIZE - TOOLTIP_PADDING * 2.0,
        width: text_width(&content, TOOLTIP_SIZE) + TOOLTIP_PADDING * 2.0,
        height: TOOLTIP_SIZE + TOOLTIP_PADDING * 2.0,
    };
    let bounds = clamp_into(bounds, scene.bounds());

    scene.push(Primitive::Rect {
        bounds,
        fill: theme.tooltip.into(),
        radius: 4.0,
        stroke: Some(Stroke::solid(theme.tooltip_border, 1.0)),
        shadow: None,
    });
    scene.text(
        Text::new(
            content,
            Point::new(bounds.x + TOOLTIP_PADDING, bounds.y + TOOLTIP_PADDING),
            theme.tooltip_text,
            TOOLTIP_SIZE,
        )
        .monospace(),
    );
}

/// Index of the marker closest to `cursor`, with its distance.
fn nearest(positions: &[Point], cursor: Point) -> Option<(usize, f32)> {
    positions
        .iter()
        .map(|p| p.distance(cursor))
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Line chart with its hover state, for widgets that redraw on pointer moves.
#[derive(Debug, Clone)]
pub struct LineChart {
    series: Series,
    theme: Theme,
    cursor: Option<Point>,
}

impl LineChart {
    pub fn new(series: Series, theme: Theme) -> Self {
        Self {
            series,
            theme,
            cursor: None,
        }
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn set_series(&mut self, series: Series) {
        self.series = series;
        self.cursor = None;
    }

    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    pub fn on_cursor_moved(&mut self, point: Point) -> bool {
        if self.cursor == Some(point) {
            return false;
        }
        self.cursor = Some(point);
        true
    }

    pub fn on_cursor_left(&mut self) -> bool {
        self.cursor.take().is_some()
    }

    pub fn draw(&self, size: Size) -> Scene {
        draw(size, &self.series, &self.theme, self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Fill;

    const SIZE: Size = Size::new(400.0, 200.0);

    fn series() -> Series {
        Series::new(["Mon", "Tue", "Wed", "Thu"], vec![10.0, 30.0, 20.0, 40.0])
    }

    #[test]
    fn markers_and_segments() {
        let theme = Theme::default();
        let scene = draw(SIZE, &series(), &theme, None);

        let segments = scene.lines().filter(|(_, _, s)| s.color == theme.line).count();
        let markers = scene.circles().count();
        assert_eq!((markers, segments), (4, 3));
        assert!(scene.has_text("Mon"));
        assert!(scene.has_text("Thu"));
    }

    #[test]
    fn single_point_is_centred() {
        let scene = draw(SIZE, &Series::new(["only"], vec![5.0]), &Theme::default(), None);

        let (center, _, _) = scene.circles().next().unwrap();
        let plot = MARGINS.plot_area(SIZE);
        assert_eq!(center, Point::new(plot.center_x(), plot.center_y()));
    }

    #[test]
    fn invalid_series_shows_placeholder() {
        let theme = Theme::default();
        for series in [
            Series::default(),
            Series::new(["a", "b"], vec![1.0]),
            Series::new(["a", "b"], vec![1.0, f64::NAN]),
        ] {
            let scene = draw(SIZE, &series, &theme, None);
            assert!(scene.has_text("No chart data"));
            assert_eq!(scene.circles().count(), 0);
        }
    }

    #[test]
    fn crowded_labels_are_thinned() {
        let labels: Vec<String> = (0..60).map(|i| format!("label-{i:02}")).collect();
        let values: Vec<f64> = (0..60).map(f64::from).collect();
        let scene = draw(SIZE, &Series::new(labels, values), &Theme::default(), None);

        let shown = scene.texts().filter(|t| t.content.starts_with("label-")).count();
        assert!(shown < 60);
        assert!(scene.has_text("label-00"));

        let mut xs: Vec<f32> = scene
            .texts()
            .filter(|t| t.content.starts_with("label-"))
            .map(|t| t.position.x)
            .collect();
        xs.sort_by(f32::total_cmp);
        let width = text_width("label-00", LABEL_SIZE);
        assert!(xs.windows(2).all(|w| w[1] - w[0] >= width));
    }

    #[test]
    fn hover_snaps_to_nearby_point() {
        let theme = Theme::default();
        let plain = draw(SIZE, &series(), &theme, None);
        let (first, _, _) = plain.circles().next().unwrap();

        let snapped = draw(SIZE, &series(), &theme, Some(Point::new(first.x + 4.0, first.y - 3.0)));
        assert!(snapped.has_text("Mon: 10"));
        assert!(snapped.lines().any(|(_, _, s)| s.dash.is_some()));
        assert!(
            snapped
                .rects()
                .any(|(_, fill)| *fill == Fill::Solid(theme.tooltip))
        );

        let between = draw(SIZE, &series(), &theme, Some(Point::new(first.x + 50.0, first.y)));
        assert!(!between.texts().any(|t| t.content.contains(": ")));
    }

    #[test]
    fn hover_far_above_a_marker_does_not_snap() {
        let theme = Theme::default();
        let plain = draw(SIZE, &series(), &theme, None);
        let (first, _, _) = plain.circles().next().unwrap();

        let above = draw(SIZE, &series(), &theme, Some(Point::new(first.x, first.y - 40.0)));
        assert!(!above.texts().any(|t| t.content.contains(": ")));
        assert!(above.lines().any(|(_, _, s)| s.dash.is_some()));

        let diagonal = draw(SIZE, &series(), &theme, Some(Point::new(first.x + 5.0, first.y + 7.0)));
        assert!(diagonal.has_text("Mon: 10"));
    }

    #[test]
    fn tooltip_stays_inside_canvas() {
        let theme = Theme::default();
        let plain = draw(SIZE, &series(), &theme, None);
        let (last, _, _) = plain.circles().last().unwrap();

        let scene = draw(SIZE, &series(), &theme, Some(last));
        let (tooltip, _) = scene
            .rects()
            .find(|(_, fill)| **fill == Fill::Solid(theme.tooltip))
            .unwrap();

        assert!(tooltip.x >= 0.0 && tooltip.x + tooltip.width <= SIZE.width);
        assert!(tooltip.y >= 0.0 && tooltip.y + tooltip.height <= SIZE.height);
    }

    #[test]
    fn hover_state_reports_redraws() {
        let mut chart = LineChart::new(series(), Theme::default());

        assert!(chart.on_cursor_moved(Point::new(10.0, 10.0)));
        assert!(!chart.on_cursor_moved(Point::new(10.0, 10.0)));
        assert!(chart.on_cursor_left());
        assert!(!chart.on_cursor_left());
    }
}
