pub mod chart;
pub mod dataset;
pub mod export;
pub mod logger;
pub mod scene;
pub mod viewer;
pub mod widget;

pub use chart::{
    Board, add_candlestick_interactivity, draw_bar_chart, draw_box_plot, draw_candlestick_chart,
    draw_line_graph, draw_pie_chart,
};
pub use scene::Scene;
