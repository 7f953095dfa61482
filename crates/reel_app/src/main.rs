//! Story Reel command-line front end.
//!
//! Usage:
//!   story-reel <FOLDER> --description "Summer holiday"
//!
//! Finds every photo and video under FOLDER, builds the story and moves
//! it into the configured output folder.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use reel_core::config::{ConfigManager, Settings};
use reel_core::discovery::discover_media;
use reel_core::logging::{init_tracing, LogLevel};
use reel_core::orchestrator::{RunCallbacks, StoryRunner};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "story-reel")]
#[command(version)]
#[command(about = "Build one chronological story video from a folder of photos and clips")]
struct Args {
    /// Folder with photos and videos (searched recursively)
    folder: PathBuf,

    /// Short event description, used in the output file name
    #[arg(short, long, value_parser = non_blank)]
    description: String,

    /// Settings file, created with defaults if missing
    #[arg(short, long, default_value = "story-reel.toml")]
    config: PathBuf,

    /// Output folder (overrides the settings file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// ffmpeg executable (overrides the settings file)
    #[arg(long)]
    ffmpeg: Option<String>,

    /// Keep the working directory when the run fails
    #[arg(long)]
    keep_work_dir: bool,

    /// Log every tool line and debug details
    #[arg(short, long)]
    verbose: bool,
}

/// The description names the output file, so it must have some text.
fn non_blank(value: &str) -> std::result::Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("description must not be blank".to_string());
    }
    Ok(trimmed.to_string())
}

/// Command-line flags win over the settings file.
fn apply_overrides(mut settings: Settings, args: &Args) -> Settings {
    if let Some(ref output) = args.output {
        settings.paths.output_folder = output.to_string_lossy().into_owned();
    }
    if let Some(ref ffmpeg) = args.ffmpeg {
        settings.tools.ffmpeg = ffmpeg.clone();
    }
    if args.keep_work_dir {
        settings.paths.keep_failed_work_dir = true;
    }
    if args.verbose {
        settings.logging.level = LogLevel::Debug;
        settings.logging.compact = false;
    }
    settings
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = ConfigManager::new(&args.config);
    config
        .load_or_create()
        .with_context(|| format!("Failed to load settings from {}", args.config.display()))?;
    *config.settings_mut() = apply_overrides(config.settings().clone(), &args);
    config
        .ensure_dirs_exist()
        .context("Failed to create output or log folder")?;
    let settings = config.settings().clone();

    init_tracing(settings.logging.level);
    tracing::debug!("Settings: {:?}", settings);

    let found = discover_media(&args.folder, &settings.discovery)
        .with_context(|| format!("Failed to scan {}", args.folder.display()))?;
    println!(
        "Found {} photo(s) and {} video(s)",
        found.photos.len(),
        found.videos.len()
    );
    for skipped in &found.skipped {
        eprintln!("Could not read {}", skipped.display());
    }

    let runner = StoryRunner::new(settings);
    let callbacks = RunCallbacks {
        progress: Some(Box::new(|completed: u64, total: u64| {
            println!("  [{}/{}]", completed, total);
        })),
        step: Some(Box::new(|step: &str, _percent: u32, description: &str| {
            println!("==> {}: {}", step, description);
        })),
        ..RunCallbacks::default()
    };

    let result = runner.run(found.into_request(&args.description), callbacks);

    for failure in &result.failures {
        eprintln!("Left out {}: {}", failure.path.display(), failure.message);
    }
    if let Some(ref log) = result.log_path {
        println!("Log: {}", log.display());
    }

    if !result.success {
        if let Some(ref dir) = result.kept_work_dir {
            eprintln!("Working files kept in {}", dir.display());
        }
        bail!(result
            .error
            .unwrap_or_else(|| "Story could not be built".to_string()));
    }

    match result.output_path {
        Some(path) => println!("Story saved to {}", path.display()),
        None => println!("Nothing could be converted, no story written"),
    }
    Ok(())
}
