mod logging;
mod print;
mod serve;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{eyre, Result};
use indicatif::{ProgressBar, ProgressStyle};

use pedigree_core::{
    lineage::find_horse, materialize, Config, HorseId, RecordStore, StartupQuery,
    SupabaseStore,
};

#[derive(Parser)]
#[command(name = "pedigree")]
#[command(about = "Horse registry with ancestry trees and shareable links", long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive terminal UI (default)
    Tui {
        /// Open this horse's details on startup
        #[arg(long)]
        id: Option<String>,
        /// Open read-only, as a received share link would
        #[arg(long, requires = "id")]
        shared: bool,
    },
    /// Serve read-only pages for shared links
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Do not open a browser
        #[arg(long)]
        no_open: bool,
    },
    /// List all registered horses
    List,
    /// Print the ancestry tree of a horse
    Tree {
        /// Horse id
        id: String,
        /// Generations to show, root included
        #[arg(short, long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        depth: Option<usize>,
    },
    /// Print the default configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    let default_command = Commands::Tui {
        id: None,
        shared: false,
    };
    match cli.command.unwrap_or(default_command) {
        Commands::Tui { id, shared } => {
            logging::init_file(&config.log)?;
            let store = SupabaseStore::from_config(&config.store)?;
            let query = StartupQuery {
                id: id.map(HorseId::from),
                shared,
            };
            tui::run(config, store, query).await?;
        }
        Commands::Serve { port, no_open } => {
            logging::init_stderr(&config.log);
            let store: Arc<dyn RecordStore> = Arc::new(SupabaseStore::from_config(&config.store)?);
            let mut serve_config = serve::ServeConfig::from_config(&config);
            if let Some(port) = port {
                serve_config.port = port;
            }
            if no_open {
                serve_config.open_browser = false;
            }
            serve::start_server(serve_config, store).await?;
        }
        Commands::List => {
            logging::init_stderr(&config.log);
            let store = SupabaseStore::from_config(&config.store)?;
            let horses = with_spinner("Loading horses...", store.fetch_all()).await?;
            print!("{}", print::horse_table(&horses));
        }
        Commands::Tree { id, depth } => {
            logging::init_stderr(&config.log);
            let store = SupabaseStore::from_config(&config.store)?;
            let horses = with_spinner("Loading horses...", store.fetch_all()).await?;

            let id = HorseId::from(id);
            let depth = depth.unwrap_or(config.lineage.max_depth);
            let tree = materialize(find_horse(&horses, &id), &horses, depth)
                .ok_or_else(|| eyre!("No horse with id '{}'", id))?;
            print!("{}", print::ancestry(&tree));
        }
        Commands::Config => {
            print!("{}", Config::default_config_string());
        }
    }

    Ok(())
}

/// Await `future` while showing a spinner on stderr.
async fn with_spinner<T>(message: &str, future: impl std::future::Future<Output = T>) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));

    let output = future.await;
    spinner.finish_and_clear();
    output
}
