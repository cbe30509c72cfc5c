/// vex - V3XV0ID player console
use anyhow::Context;
use clap::{Parser, Subcommand};
use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vex_console::{report, ConsoleConfig, Simulation, DEFAULT_LOG_FILTER};
use vex_core::{Catalog, Mood};

#[derive(Parser)]
#[command(name = "vex")]
#[command(about = "V3XV0ID player tooling: catalog, storage uploads and playback simulation", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./vex.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the track catalog
    Catalog {
        /// Only tracks with this mood
        #[arg(short, long)]
        mood: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show where a track is played from
    Url {
        /// Track ID
        track_id: String,
    },
    /// Compare the catalog with the storage bucket
    Status,
    /// Upload a directory of audio files to the storage bucket
    Upload {
        /// Directory to upload (defaults to upload.music_dir)
        dir: Option<PathBuf>,

        /// Pause between files in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },
    /// Run the playback session against a simulated flaky element
    Simulate {
        /// Number of steps to run
        #[arg(long)]
        steps: Option<usize>,

        /// Random seed
        #[arg(long)]
        seed: Option<u64>,

        /// Probability of a fault per step, 0 to 1
        #[arg(long)]
        fault_rate: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The site keeps its Supabase credentials in .env.local
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ConsoleConfig::load(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Catalog { mood, json } => list_catalog(mood.as_deref(), json)?,
        Commands::Url { track_id } => show_track(&config, &track_id)?,
        Commands::Status => show_status(&config).await?,
        Commands::Upload { dir, delay_ms } => upload(&config, dir, delay_ms).await?,
        Commands::Simulate {
            steps,
            seed,
            fault_rate,
        } => simulate(&config, steps, seed, fault_rate)?,
    }

    Ok(())
}

fn list_catalog(mood: Option<&str>, json: bool) -> anyhow::Result<()> {
    let catalog = Catalog::builtin();

    let tracks = match mood {
        Some(mood) => {
            let mood: Mood = mood.parse()?;
            catalog.by_mood(mood)
        }
        None => catalog.iter().collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tracks)?);
    } else {
        for track in &tracks {
            println!("{}", report::track_line(track));
        }
        println!("{} tracks", tracks.len());
    }

    Ok(())
}

fn show_track(config: &ConsoleConfig, track_id: &str) -> anyhow::Result<()> {
    let catalog = Catalog::builtin();
    let track = catalog.require(track_id)?;
    let resolver = config.resolver();

    println!("{}", report::track_details(track, resolver.as_ref()));
    Ok(())
}

async fn show_status(config: &ConsoleConfig) -> anyhow::Result<()> {
    let client = config.storage_client()?;
    tracing::info!(url = %client.url(), bucket = %client.bucket(), "Checking bucket");

    let status = client.upload_status(&Catalog::builtin()).await;
    print!("{}", report::upload_status(&status));
    Ok(())
}

async fn upload(
    config: &ConsoleConfig,
    dir: Option<PathBuf>,
    delay_ms: Option<u64>,
) -> anyhow::Result<()> {
    let client = config.storage_client()?;
    let dir = dir.unwrap_or_else(|| config.upload.music_dir.clone());
    let delay = Duration::from_millis(delay_ms.unwrap_or(config.upload.delay_ms));

    tracing::info!(dir = %dir.display(), bucket = %client.bucket(), "Uploading music");

    let summary = client
        .upload()
        .upload_directory(&dir, delay, |progress| {
            println!(
                "[{}/{}] {}",
                progress.file_index + 1,
                progress.total_files,
                progress.current_file
            );
        })
        .await?;

    print!("{}", report::batch_summary(&summary));

    if !summary.is_complete() {
        anyhow::bail!("{} uploads failed", summary.failed.len());
    }
    Ok(())
}

fn simulate(
    config: &ConsoleConfig,
    steps: Option<usize>,
    seed: Option<u64>,
    fault_rate: Option<f64>,
) -> anyhow::Result<()> {
    let seed = seed
        .or(config.simulation.seed)
        .unwrap_or_else(|| rand::thread_rng().gen());
    let steps = steps.unwrap_or(config.simulation.steps);
    let fault_rate = fault_rate.unwrap_or(config.simulation.fault_rate);

    tracing::info!(seed, "Simulation seed");

    let simulation = Simulation::new(
        Catalog::builtin(),
        config.resolver(),
        config.playback.clone(),
        seed,
        fault_rate,
    )?;

    let report = simulation.run(steps);
    print!("{}", report::simulation(&report));
    Ok(())
}
