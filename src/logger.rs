use std::io;

use log::LevelFilter;

/// Crates whose logs are capped at `Warn` whatever the requested level.
const NOISY_TARGETS: [&str; 4] = ["wgpu_core", "wgpu_hal", "naga", "iced_wgpu"];

/// Logs to stderr and, when the data dir is writable, to the log file.
/// Stdout stays free for rendered SVG.
pub fn setup(level: LevelFilter, to_file: bool) -> Result<(), data::log::Error> {
    let mut dispatch = dispatch(level).chain(io::stderr());

    if to_file {
        match data::log::file() {
            Ok(file) => dispatch = dispatch.chain(file),
            Err(err) => eprintln!("Log file unavailable, logging to stderr only: {err}"),
        }
    }

    dispatch.apply()?;
    Ok(())
}

fn dispatch(level: LevelFilter) -> fern::Dispatch {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level);

    for target in NOISY_TARGETS {
        dispatch = dispatch.level_for(target, level.min(LevelFilter::Warn));
    }

    dispatch
}
