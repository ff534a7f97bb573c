//! CLI interface for the movie recommender

use std::io::{self, Write};

use anyhow::Result;
use clap::{Parser, Subcommand};
use movie_recommender::config::AppConfig;
use movie_recommender::loader::{self, ArtifactSummary};
use movie_recommender::{present, Recommender};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "movierec")]
#[command(about = "Pick a movie, get similar titles from a nearest-neighbor index", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a JSON summary of the loaded artifacts
    Info,
    /// List all titles in catalog order
    Titles,
    /// Recommend titles similar to one movie
    Recommend {
        /// Exact movie title as it appears in the catalog
        title: String,
    },
    /// Pick movies from a numbered list and print recommendations
    Interactive,
    /// Start the HTTP API server
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "0.0.0.0:3000")]
        addr: String,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let paths = cli.config.artifact_paths()?;
    let k = cli.config.count();
    // Loaded once; every command below borrows this context.
    let ctx = loader::load(&paths)?;

    match cli.command {
        Commands::Info => {
            println!("{}", ArtifactSummary::new(&paths, &ctx).to_json()?);
        }
        Commands::Titles => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            present::write_titles(&ctx, &mut out)?;
            out.flush()?;
        }
        Commands::Recommend { title } => {
            // Failures propagate so `main` exits non-zero with `Error: ...`.
            let recs = Recommender::new(&ctx).recommend_title(&title, k)?;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            present::write_recommendations(&recs, &mut out)?;
            out.flush()?;
        }
        Commands::Interactive => {
            let stdin = io::stdin();
            present::run_interactive(&ctx, k, stdin.lock(), &mut io::stdout().lock())?;
        }
        Commands::Serve { addr } => {
            movie_recommender::server::start(&addr, ctx, k).await?;
        }
    }
    Ok(())
}
