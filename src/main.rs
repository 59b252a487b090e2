use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use data::chart::Kind;
use data::{ChartSize, ScaleFactor, Theme, fixture};
use iced::Point;
use log::LevelFilter;

use ukx_charts::dataset::Dataset;
use ukx_charts::export::{self, Request};
use ukx_charts::logger;
use ukx_charts::viewer::{self, Chart, Viewer};

#[derive(Parser, Debug)]
#[command(name = "ukx-charts", version, about = "Render and explore UKX wallet charts")]
struct Cli {
    /// off, error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "info", value_parser = parse_level)]
    log_level: LevelFilter,

    /// Log to stderr only
    #[arg(long, global = true)]
    no_log_file: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Draw a chart to SVG
    Render {
        #[command(flatten)]
        source: Source,

        /// Output file, stdout when omitted
        #[arg(long, short)]
        output: Option<PathBuf>,

        #[arg(long, default_value_t = 800.0)]
        width: f32,

        #[arg(long, default_value_t = 400.0)]
        height: f32,

        /// Output pixel density, 0.5 to 4
        #[arg(long, default_value_t = 1.0)]
        scale: f32,

        /// Candlestick zoom factor
        #[arg(long)]
        zoom: Option<f32>,

        /// Candlestick pan offset in pixels
        #[arg(long, allow_negative_numbers = true)]
        pan: Option<f32>,

        /// Pointer position as X,Y
        #[arg(long, value_parser = parse_point)]
        hover: Option<Point>,
    },
    /// Open a chart in a window
    View {
        #[command(flatten)]
        source: Source,
    },
}

#[derive(Args, Debug)]
struct Source {
    /// line, bar, pie, box or candlestick
    kind: Kind,

    /// JSON fixture to load
    #[arg(long, short, conflicts_with = "sample")]
    input: Option<PathBuf>,

    /// Number of generated points
    #[arg(long, default_value_t = 60)]
    sample: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Preset name (dark, light, nord) or theme file
    #[arg(long, default_value = "dark")]
    theme: String,

    #[arg(long)]
    title: Option<String>,
}

impl Source {
    fn dataset(&self) -> Result<Dataset, fixture::Error> {
        match &self.input {
            Some(path) => Dataset::load(self.kind, path),
            None => Ok(Dataset::sample(self.kind, self.sample, self.seed)),
        }
    }

    fn theme(&self) -> Result<Theme, fixture::Error> {
        fixture::theme(&self.theme)
    }
}

fn parse_level(text: &str) -> Result<LevelFilter, String> {
    data::log::parse_level(text).map_err(|err| err.to_string())
}

fn parse_point(text: &str) -> Result<Point, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got `{text}`"))?;

    let coord = |value: &str| {
        value
            .trim()
            .parse::<f32>()
            .map_err(|err| format!("invalid coordinate `{value}`: {err}"))
    };

    Ok(Point::new(coord(x)?, coord(y)?))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    logger::setup(cli.log_level, !cli.no_log_file)?;

    match cli.command {
        Command::Render {
            source,
            output,
            width,
            height,
            scale,
            zoom,
            pan,
            hover,
        } => {
            let dataset = source.dataset()?;
            let request = Request {
                size: ChartSize::new(width, height),
                theme: source.theme()?,
                title: source.title,
                zoom,
                pan,
                hover,
            };

            let svg = export::svg(&dataset, &request, ScaleFactor::from(scale))?;

            match output {
                Some(path) => export::write(&path, &svg)?,
                None => std::io::stdout().lock().write_all(svg.as_bytes())?,
            }
        }
        Command::View { source } => {
            let dataset = source.dataset()?;
            let theme = source.theme()?;
            let title = source
                .title
                .clone()
                .unwrap_or_else(|| format!("UKX {} chart", dataset.kind()));

            let chart = Chart::new(dataset, &theme, source.title);
            viewer::run(Viewer::new(chart, theme, title))?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_parse() {
        assert_eq!(parse_point("120, 45.5"), Ok(Point::new(120.0, 45.5)));
        assert!(parse_point("120").is_err());
        assert!(parse_point("a,b").is_err());
    }

    #[test]
    fn render_arguments() {
        let cli = Cli::try_parse_from([
            "ukx-charts",
            "render",
            "candlestick",
            "--zoom",
            "2",
            "--pan",
            "-40",
            "--hover",
            "300,120",
            "--no-log-file",
        ])
        .unwrap();

        assert!(cli.no_log_file);
        assert_eq!(cli.log_level, LevelFilter::Info);
        let Command::Render {
            source, zoom, pan, hover, ..
        } = cli.command
        else {
            panic!("expected render");
        };
        assert_eq!(source.kind, Kind::Candlestick);
        assert_eq!((zoom, pan), (Some(2.0), Some(-40.0)));
        assert_eq!(hover, Some(Point::new(300.0, 120.0)));
    }

    #[test]
    fn input_and_sample_conflict() {
        let result = Cli::try_parse_from([
            "ukx-charts",
            "view",
            "pie",
            "--input",
            "pie.json",
            "--sample",
            "10",
        ]);

        assert!(result.is_err());
    }
}
