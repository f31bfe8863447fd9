mod remote;
mod simulate;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use reqwest::Client;
use rtp_core::CalibratedState;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Convergence harness: plays rounds against uniform thresholds and writes
/// the running win rate.
#[derive(Parser)]
#[command(name = "rtp-sim")]
struct Args {
    /// Target win rate in (0, 1] for local mode
    #[arg(long, default_value_t = 0.5)]
    rtp: f64,

    /// Number of buckets for local mode
    #[arg(long, default_value_t = 10_000)]
    partition_size: usize,

    /// Number of rounds to play
    #[arg(long, default_value_t = 10_000)]
    trials: u64,

    /// Seed for outcomes and thresholds
    #[arg(long)]
    seed: Option<u64>,

    /// Base URL of a running rtp-server; outcomes come from its /get endpoint
    #[arg(long)]
    url: Option<String>,

    /// Concurrent request tasks in remote mode
    #[arg(long, default_value_t = 8)]
    concurrency: u64,

    /// CSV output path (default: convergence_<rtp>.csv)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Keep every n-th point of the series
    #[arg(long, default_value_t = 1)]
    every: u64,
}

fn rng_from(seed: Option<u64>, stream: u64) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s.wrapping_add(stream)),
        None => StdRng::from_entropy(),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut threshold_rng = rng_from(args.seed, 1);

    let (target, sim) = match &args.url {
        Some(url) => {
            let client = match Client::builder().timeout(Duration::from_secs(5)).build() {
                Ok(c) => c,
                Err(e) => {
                    tracing::error!(error = %e, "failed to build HTTP client");
                    std::process::exit(1);
                }
            };
            let status = match remote::fetch_status(&client, url).await {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, url = %url, "failed to query server status");
                    std::process::exit(1);
                }
            };
            tracing::info!(
                url = %url,
                rtp = status.target,
                gamma = status.gamma,
                partition_size = status.partition_size,
                trials = args.trials,
                concurrency = args.concurrency,
                "simulating against server"
            );
            let outcomes =
                match remote::fetch_outcomes(&client, url, args.trials, args.concurrency).await {
                    Ok(o) => o,
                    Err(e) => {
                        tracing::error!(error = %e, "failed to fetch outcomes");
                        std::process::exit(1);
                    }
                };
            let sim = simulate::run(outcomes, status.partition_size, args.every, &mut threshold_rng);
            (status.target, sim)
        }
        None => {
            let state = match CalibratedState::initialize(args.rtp, args.partition_size) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "invalid generator configuration");
                    std::process::exit(1);
                }
            };
            tracing::info!(
                rtp = args.rtp,
                gamma = state.gamma(),
                partition_size = args.partition_size,
                trials = args.trials,
                "simulating locally"
            );
            let mut sample_rng = rng_from(args.seed, 0);
            let outcomes = (0..args.trials).map(|_| state.sample(&mut sample_rng));
            let sim = simulate::run(outcomes, args.partition_size, args.every, &mut threshold_rng);
            (args.rtp, sim)
        }
    };

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| simulate::default_output(target));
    let written = File::create(&output)
        .and_then(|f| simulate::write_csv(&sim, target, BufWriter::new(f)));
    if let Err(e) = written {
        tracing::error!(error = %e, path = %output.display(), "failed to write series");
        std::process::exit(1);
    }

    tracing::info!(
        trials = sim.trials,
        wins = sim.wins,
        win_rate = format!("{:.4}", sim.win_rate()),
        rtp = target,
        deviation = format!("{:+.4}", sim.win_rate() - target),
        path = %output.display(),
        "convergence series written"
    );
}
