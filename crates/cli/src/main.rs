use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{ProfileId, ProfileStore};
use pipeline::{FeatureEncoder, GenreVocabulary};
use server::{
    render_json, render_table, ErrorBody, Recommendation, RecommendationOrchestrator,
    UploadRequest,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::info;

/// reel-match - Movie recommendations from your IMDb ratings
#[derive(Parser)]
#[command(name = "reel-match")]
#[command(about = "Recommend movies by nearest-neighbour similarity to your IMDb ratings", long_about = None)]
struct Cli {
    /// Directory holding imdb_movies.csv and the stored profiles
    #[arg(short, long, default_value = "data/processed")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an IMDb ratings export, replacing the profile's stored ratings
    Upload {
        /// CSV export to upload
        #[arg(long)]
        file: PathBuf,

        /// Profile to store the ratings under
        #[arg(long, default_value = "default")]
        profile: ProfileId,

        /// JSON genre vocabulary ({"version": N, "genres": [...]})
        #[arg(long)]
        genres: Option<PathBuf>,
    },

    /// Get movie recommendations for a profile
    Recommend {
        /// Profile to recommend for
        #[arg(long, default_value = "default")]
        profile: ProfileId,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List stored profiles
    Profiles,

    /// Run benchmark to test performance
    Benchmark {
        /// Profile to recommend for
        #[arg(long, default_value = "default")]
        profile: ProfileId,

        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let store = ProfileStore::open(&cli.data_dir)
        .with_context(|| format!("Failed to open data directory {}", cli.data_dir.display()))?;
    info!("Using data directory {}", cli.data_dir.display());
    let orchestrator = RecommendationOrchestrator::new(store);

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Upload {
            file,
            profile,
            genres,
        } => handle_upload(orchestrator, file, profile, genres).await?,
        Commands::Recommend { profile, json } => {
            handle_recommend(orchestrator, profile, json).await?
        }
        Commands::Profiles => handle_profiles(&orchestrator)?,
        Commands::Benchmark {
            profile,
            requests,
            concurrent,
        } => handle_benchmark(orchestrator, profile, requests, concurrent).await?,
    }

    Ok(())
}

/// Handle the 'upload' command
async fn handle_upload(
    orchestrator: RecommendationOrchestrator,
    file: PathBuf,
    profile: ProfileId,
    genres: Option<PathBuf>,
) -> Result<()> {
    let orchestrator = match genres {
        Some(path) => {
            let vocabulary = GenreVocabulary::from_path(&path)?;
            println!(
                "{} Loaded genre vocabulary v{} ({} genres)",
                "✓".green(),
                vocabulary.version(),
                vocabulary.len()
            );
            orchestrator.with_encoder(FeatureEncoder::new().with_vocabulary(vocabulary))
        }
        None => orchestrator,
    };

    let request = read_upload(&file)?;
    let start = Instant::now();
    let result = tokio::task::spawn_blocking(move || orchestrator.upload(&profile, &request))
        .await
        .context("Upload task panicked")?;

    match result {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            println!("{} Uploaded in {:?}", "✓".green(), start.elapsed());
            Ok(())
        }
        Err(err) => {
            let body = serde_json::to_string(&ErrorBody::from(&err))?;
            eprintln!("{} {}", err.status_code().to_string().red(), body);
            Err(anyhow!(err))
        }
    }
}

/// Build an upload request from a file on disk
fn read_upload(path: &Path) -> Result<UploadRequest> {
    let contents =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(UploadRequest::new(filename, contents))
}

/// Handle the 'recommend' command
async fn handle_recommend(
    orchestrator: RecommendationOrchestrator,
    profile: ProfileId,
    json: bool,
) -> Result<()> {
    let recommendations =
        tokio::task::spawn_blocking(move || orchestrator.get_recommendations(&profile))
            .await
            .context("Recommendation task panicked")??;

    if json {
        println!("{}", render_json(&recommendations)?);
    } else {
        print_recommendations(&recommendations);
    }
    Ok(())
}

/// Handle the 'profiles' command
fn handle_profiles(orchestrator: &RecommendationOrchestrator) -> Result<()> {
    let profiles = orchestrator.list_profiles()?;
    if profiles.is_empty() {
        println!("No profiles stored yet. Upload ratings with `reel-match upload --file <csv>`.");
        return Ok(());
    }

    println!("{}", "Stored profiles:".bold().blue());
    for profile in profiles {
        println!("{}{}", "• ".green(), profile);
    }
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    orchestrator: RecommendationOrchestrator,
    profile: ProfileId,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if requests == 0 {
        bail!("Benchmark needs at least one request");
    }

    // Reference run; every timed run must reproduce it exactly
    let reference = {
        let orchestrator = orchestrator.clone();
        let profile = profile.clone();
        tokio::task::spawn_blocking(move || orchestrator.get_recommendations(&profile))
            .await
            .context("Recommendation task panicked")??
    };
    println!(
        "Benchmarking {} requests ({} concurrent), {} recommendations each",
        requests,
        concurrent.max(1),
        reference.len()
    );

    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();

    let mut handles = Vec::with_capacity(requests);
    for _ in 0..requests {
        let orchestrator = orchestrator.clone();
        let profile = profile.clone();
        let permits = permits.clone();
        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            tokio::task::spawn_blocking(move || {
                let start = Instant::now();
                let recommendations = orchestrator.get_recommendations(&profile)?;
                Ok::<_, anyhow::Error>((start.elapsed(), recommendations))
            })
            .await?
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    let mut mismatches = 0usize;
    for handle in handles {
        let (elapsed, recommendations) = handle.await??;
        if recommendations != reference {
            mismatches += 1;
        }
        timings.push(elapsed);
    }
    let wall_time = wall_clock.elapsed();

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let p50 = percentile(&timings, 0.50);
    let p95 = percentile(&timings, 0.95);
    let p99 = percentile(&timings, 0.99);
    let throughput = requests as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!("Throughput: {:.2} requests/second", throughput);

    if mismatches > 0 {
        bail!(
            "{} of {} runs returned different recommendations",
            mismatches,
            requests
        );
    }
    println!("{} All runs returned identical recommendations", "✓".green());
    Ok(())
}

/// Nearest-rank percentile of sorted timings
fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let index = ((sorted.len() as f64 * p) as usize).min(sorted.len() - 1);
    sorted[index]
}

/// Helper function to format and print recommendations
fn print_recommendations(recommendations: &[Recommendation]) {
    println!("{}", "Movie Recommendations:".bold().blue());
    if recommendations.is_empty() {
        println!("No movies passed the filters.");
        return;
    }
    print!("{}", render_table(recommendations));
}
