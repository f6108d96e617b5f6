use crate::{
    config,
    logic::{
        ConfigUsageStore, DesktopReviewPrompt, FilePicker, FileShare, FilterSession, ImagePicker,
        SessionState, ShareService, UsageCounter,
    },
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use image_effect::{CpuEngine, FilterKind, RenderEngine};
use log::{info, warn};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};
use strum::IntoEnumIterator;

#[derive(Parser, Debug)]
#[command(name = "instafilter", version, about = "Apply a photo filter and share the result")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter a photo and write the result as PNG
    Apply {
        /// Photo to filter
        input: PathBuf,

        /// Filter to switch to, counts as a filter change
        #[arg(short, long, value_parser = parse_filter)]
        filter: Option<FilterKind>,

        /// Slider position between 0 and 1
        #[arg(short, long)]
        intensity: Option<f32>,

        /// Where to write the result, defaults to `<input>-<filter>.png`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the available filters and their adjustable parameters
    Filters,

    /// Show how many filter changes have been recorded
    Stats,
}

fn parse_filter(name: &str) -> Result<FilterKind, String> {
    FilterKind::from_str(name).map_err(|_| {
        let names = FilterKind::iter()
            .map(|kind| kind.to_string())
            .collect::<Vec<_>>();
        format!("unknown filter `{name}`, expected one of: {}", names.join(", "))
    })
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Apply {
            input,
            filter,
            intensity,
            output,
        } => apply(input, filter, intensity, output).await,
        Command::Filters => {
            list_filters(&CpuEngine::new());
            Ok(())
        }
        Command::Stats => {
            let conf = config::all();
            println!("filter changes: {}", conf.usage.filter_count);
            println!("review threshold: {}", conf.preference.review_threshold);
            println!("config: {}", conf.config_path.display());
            Ok(())
        }
    }
}

async fn apply(
    input: PathBuf,
    filter: Option<FilterKind>,
    intensity: Option<f32>,
    output: Option<PathBuf>,
) -> Result<()> {
    let conf = config::all();
    let usage = UsageCounter::new(ConfigUsageStore, conf.preference.review_threshold);

    // The slider position is the starting state, only a filter switch is a change
    let intensity = intensity
        .filter(|value| !value.is_nan())
        .unwrap_or_else(|| conf.preference.intensity());
    let state = SessionState::new(conf.preference.filter(), intensity);
    let mut session = FilterSession::new(CpuEngine::new(), DesktopReviewPrompt, usage, state);

    let Some(bytes) = FilePicker::new(&input).pick_one()? else {
        return Ok(());
    };

    if !session.select_image(bytes).await {
        warn!("{} is not a readable photo", input.display());
        return Ok(());
    }

    if let Some(kind) = filter {
        session.set_filter(kind);
    }

    let Some(payload) = session.share_payload()? else {
        warn!("nothing rendered for {}", input.display());
        return Ok(());
    };

    let output = output.unwrap_or_else(|| default_output(&input, session.state().filter));
    FileShare::new(&output).share(&payload)?;

    info!(
        "{} at {:.2} -> {}",
        session.state().filter.title(),
        session.state().intensity,
        output.display()
    );
    Ok(())
}

fn default_output(input: &Path, kind: FilterKind) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    input.with_file_name(format!("{stem}-{kind}.png"))
}

fn list_filters<E: RenderEngine>(engine: &E) {
    for kind in FilterKind::iter() {
        let roles = engine
            .parameter_roles(kind)
            .iter()
            .map(|role| role.to_string())
            .collect::<Vec<_>>();
        println!("{:<14} {:<14} {}", kind.to_string(), kind.title(), roles.join(", "));
    }
}
