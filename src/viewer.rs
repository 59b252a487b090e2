//! Desktop window showing one chart, with the chart's pointer interactions live.

use data::Theme as ChartTheme;
use data::chart::{BarOptions, BoxPlotOptions, CandlestickOptions};
use data::{BoxData, Series};
use iced::widget::container;
use iced::{Element, Size, Theme};

use crate::chart::{CandlestickChart, LineChart, PieChart, bar, boxplot};
use crate::dataset::Dataset;
use crate::widget::{self, Message};

const WINDOW_SIZE: Size = Size::new(1000.0, 600.0);

#[derive(Debug, Clone)]
pub enum Chart {
    Line(LineChart),
    Bar {
        series: Series,
        options: BarOptions,
    },
    Pie(PieChart),
    Box {
        data: BoxData,
        options: BoxPlotOptions,
    },
    Candlestick(CandlestickChart),
}

impl Chart {
    pub fn new(dataset: Dataset, theme: &ChartTheme, title: Option<String>) -> Self {
        match dataset {
            Dataset::Line(series) => Chart::Line(LineChart::new(series, *theme)),
            Dataset::Bar(series) => Chart::Bar {
                series,
                options: BarOptions {
                    title,
                    ..BarOptions::with_colors(theme.accent, theme.accent_border)
                },
            },
            Dataset::Pie(entries) => {
                Chart::Pie(PieChart::new(WINDOW_SIZE, entries, theme.series_palette()))
            }
            Dataset::Box(data) => Chart::Box {
                data,
                options: BoxPlotOptions {
                    title,
                    ..BoxPlotOptions::default()
                },
            },
            Dataset::Candlestick(candles) => Chart::Candlestick(CandlestickChart::new(
                candles,
                CandlestickOptions::default(),
                WINDOW_SIZE,
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Viewer {
    chart: Chart,
    theme: ChartTheme,
    title: String,
}

impl Viewer {
    pub fn new(chart: Chart, theme: ChartTheme, title: impl Into<String>) -> Self {
        Self {
            chart,
            theme,
            title: title.into(),
        }
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    /// Applies a canvas message, true when the chart state changed.
    pub fn update(&mut self, message: Message) -> bool {
        match (&mut self.chart, message) {
            (Chart::Candlestick(chart), Message::Candlestick { size, event }) => {
                if chart.size() != size {
                    chart.resize(size);
                }
                chart.handle(event)
            }
            (Chart::Line(chart), Message::CursorMoved { position, .. }) => {
                chart.on_cursor_moved(position)
            }
            (Chart::Line(chart), Message::CursorLeft { .. }) => chart.on_cursor_left(),
            (Chart::Pie(chart), Message::CursorMoved { size, position }) => {
                if chart.size() != size {
                    chart.resize(size);
                }
                chart.on_cursor_moved(position)
            }
            (Chart::Pie(chart), Message::CursorLeft { .. }) => chart.on_cursor_left(),
            (_, message) => {
                log::debug!("Ignoring {message:?} for a chart without that interaction");
                false
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let theme = &self.theme;

        let content = match &self.chart {
            Chart::Line(chart) => widget::line(chart),
            Chart::Pie(chart) => widget::pie(chart, theme),
            Chart::Candlestick(chart) => widget::candlestick(chart, theme),
            Chart::Bar { series, options } => {
                widget::static_chart(move |size| bar::draw(size, series, options, theme))
            }
            Chart::Box { data, options } => {
                widget::static_chart(move |size| boxplot::draw(size, data, options, theme))
            }
        };

        container(content).padding(8).into()
    }

    pub fn title(&self) -> String {
        self.title.clone()
    }

    /// Light or dark window chrome, following the chart background.
    pub fn theme(&self) -> Theme {
        let bg = self.theme.background;
        let luminance = 0.2126 * bg.r + 0.7152 * bg.g + 0.0722 * bg.b;

        if luminance < 0.5 {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

pub fn run(viewer: Viewer) -> iced::Result {
    log::info!("Opening viewer \"{}\"", viewer.title);

    iced::application(
        move || viewer.clone(),
        |viewer: &mut Viewer, message: Message| {
            viewer.update(message);
        },
        Viewer::view,
    )
    .title(Viewer::title)
    .theme(Viewer::theme)
    .window_size(WINDOW_SIZE)
    .run()
}
