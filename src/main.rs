use std::{path::PathBuf, process};

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use tokio::signal;

use parallel_saxpy::{RunConfig, RunReport, SaxpyError, Session, VectorStore, vectors};

/// Iterative SAXPY over worker threads
#[derive(Parser)]
#[command(name = "parallel-saxpy", version, about)]
struct Cli {
    /// Vector size
    #[arg(short = 'p', long)]
    size: Option<usize>,

    /// Seed of the vector generator
    #[arg(short = 's', long)]
    seed: Option<u64>,

    /// Number of worker threads
    #[arg(short = 'n', long)]
    threads: Option<usize>,

    /// Maximum iterations
    #[arg(short = 'i', long = "iters")]
    max_iters: Option<usize>,

    /// JSON file with run parameters, flags given explicitly take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print the full vectors before and after the run
    #[arg(long)]
    dump: bool,
}

impl Cli {
    fn run_config(&self) -> anyhow::Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::from_json_file(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => RunConfig::default(),
        };

        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(max_iters) = self.max_iters {
            config.max_iters = max_iters;
        }

        Ok(config)
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.run_config()?;
    config.validate().context("rejected run parameters")?;

    println!(
        "p = {}, seed = {}, n_threads = {}, max_iters = {}",
        config.size, config.seed, config.threads, config.max_iters
    );

    let store = VectorStore::random(config.size, config.seed)
        .context("failed to initialize vectors")?;
    if cli.dump {
        println!("{}", store.dump());
    }

    let session = Session::start(config, store)?;
    let cancel = session.cancel_token();

    let completed = tokio::select! {
        res = session.wait() => res.context("run failed")?,
        _ = signal::ctrl_c() => {
            warn!("received SIGINT, cancelling workers");
            cancel.cancel();
            return Err(SaxpyError::Cancelled.into());
        }
    };

    let report = RunReport::new(config, &completed);
    if cli.dump {
        let y = completed.store.into_y();
        println!("RES: final vector Y= {}", vectors::format_vector(&y));
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    info!("wrapping up");
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
