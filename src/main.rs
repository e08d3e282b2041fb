// Year-at-a-glance wallpaper generator
// Main entry point

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use clap::Parser;

use yearglance::models::config::WallpaperConfig;
use yearglance::models::geometry::ScreenGeometry;
use yearglance::services::background::NativeGradientRenderer;
use yearglance::services::event_index::{EventProvider, NoCalendars};
use yearglance::services::icalendar::IcsDirectoryProvider;
use yearglance::services::output::{FileSink, OutputSink};
use yearglance::services::wallpaper::WallpaperGenerator;
use yearglance::utils::date::{Clock, FixedClock, SystemClock};

#[derive(Parser, Debug)]
#[command(version, about = "Render a year-at-a-glance calendar wallpaper")]
struct Args {
    /// Configuration file (TOML); defaults to the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of .ics files to read calendars from
    #[arg(long)]
    ics_dir: Option<PathBuf>,

    /// Background photo (PNG or JPEG); a file:// prefix is accepted
    #[arg(long)]
    photo: Option<String>,

    /// Where to write the result; defaults to the temp directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output width in pixels
    #[arg(long, default_value_t = 1179, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    /// Output height in pixels
    #[arg(long, default_value_t = 2556, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    /// Pretend it is this date (YYYY-MM-DD) or instant (YYYY-MM-DDTHH:MM:SS)
    #[arg(long, value_parser = parse_now)]
    now: Option<NaiveDateTime>,

    /// Write the computed plan as JSON instead of a PNG
    #[arg(long)]
    plan_json: bool,
}

fn parse_now(value: &str) -> Result<NaiveDateTime, String> {
    if let Ok(instant) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Ok(instant);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| FixedClock::on(date).0)
        .map_err(|err| format!("expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS: {}", err))
}

async fn run<P: EventProvider, C: Clock>(
    args: &Args,
    config: &WallpaperConfig,
    provider: P,
    clock: C,
) -> Result<PathBuf> {
    let screen = ScreenGeometry::new(args.width as f32, args.height as f32);
    let generator = WallpaperGenerator::new(config, provider, NativeGradientRenderer, clock);
    let wallpaper = generator.generate(screen, args.photo.as_deref()).await;

    if args.plan_json {
        let json = serde_json::to_vec_pretty(&wallpaper.plan).context("Failed to serialize plan")?;
        let sink = match &args.output {
            Some(path) => FileSink::new(path),
            None => FileSink::new(std::env::temp_dir().join("wallpaper_auto.json")),
        };
        return sink.write(&json);
    }

    let sink = match &args.output {
        Some(path) => FileSink::new(path),
        None => FileSink::temp(),
    };
    wallpaper.write_png(&sink)
}

async fn run_with_clock<P: EventProvider>(
    args: &Args,
    config: &WallpaperConfig,
    provider: P,
) -> Result<PathBuf> {
    match args.now {
        Some(now) => run(args, config, provider, FixedClock(now)).await,
        None => run(args, config, provider, SystemClock).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting yearglance");

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(WallpaperConfig::default_path);
    let config = WallpaperConfig::load(&config_path)
        .with_context(|| format!("Invalid configuration {}", config_path.display()))?;

    let written = match &args.ics_dir {
        Some(dir) => run_with_clock(&args, &config, IcsDirectoryProvider::new(dir)).await?,
        None => {
            log::info!("No calendar directory given, rendering without events");
            run_with_clock(&args, &config, NoCalendars).await?
        }
    };

    println!("{}", written.display());
    Ok(())
}
