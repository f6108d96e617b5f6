//! Instafilter
//!
//! Pick a photo, run it through one of seven filters driven by a single
//! intensity slider, and share the result.
//!
//! # Architecture
//! - `config`: persisted preferences and the filter-change counter
//! - `logic`: session state, intensity mapping, loading and sharing
//! - `cli`: the desktop command-line surface
//! - Rendering is delegated to the `image-effect` engine

pub mod cli;
pub mod config;
pub mod logic;

use anyhow::Result;
use clap::Parser;

/// Initializes the logger for desktop platforms.
///
/// Sets up a custom logger format with timestamp, log level, file name, line number,
/// and log message. Defaults to `info` unless `RUST_LOG` says otherwise.
pub fn init_logger() {
    use std::io::Write;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = chrono::Local::now().format("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

/// Main entry point for the desktop binary.
pub async fn desktop_main() -> Result<()> {
    let args = cli::Cli::parse();

    init_logger();
    log::debug!("start...");

    config::init()?;
    cli::run(args).await?;

    log::debug!("exit...");
    Ok(())
}
