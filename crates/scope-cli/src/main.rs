use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use scope_core::Species;
use scope_data::Config;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "scope", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory with ortholog and synonym tables (default: ~/.local/share/scope/orthology)
    #[arg(long, global = true)]
    orthology_dir: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Look up features of a dataset matching a query
    ///
    /// Matches genes, regulons, cluster labels, and annotations whose name
    /// contains the query, ignoring case. Results are ranked so an exact
    /// match comes first, then prefix matches, then the rest in dataset
    /// order. Synonymous gene names are reported once under their canonical
    /// name.
    ///
    /// Prefix the query with a species code and a backslash (for example
    /// `hsap\TRIM3`) to search that species' genes and list their orthologs
    /// in the dataset. Supported codes: hsap, mmus, dmel.
    ///
    /// A relative dataset path that does not exist is looked up in the
    /// configured data directory.
    Lookup {
        /// Path to the dataset file (JSON)
        dataset: PathBuf,
        /// Query text, optionally prefixed with `<species>\`
        query: String,
        /// Print the feature columns as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show what a dataset's search index contains
    Index {
        /// Path to the dataset file (JSON)
        dataset: PathBuf,
        /// Build the cross-species index for queries written in this species
        #[arg(long)]
        cross_species: Option<Species>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Print one setting, or the config file if no key is given
    Get {
        /// Setting name (orthology_dir, data_dir, index_cache_capacity, query_cache_capacity)
        key: Option<String>,
    },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults if it does not exist
    Init,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Lookup {
            dataset,
            query,
            json,
        } => {
            let config = Config::load_with_orthology_dir(cli.orthology_dir)?;
            commands::run_lookup(&config, &dataset, &query, json)?;
        }
        Commands::Index {
            dataset,
            cross_species,
        } => {
            let config = Config::load_with_orthology_dir(cli.orthology_dir)?;
            commands::show_index(&config, &dataset, cross_species)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show_config(cli.orthology_dir)?,
            ConfigAction::Get { key } => commands::config::get_config(key)?,
            ConfigAction::Path => commands::config::show_path()?,
            ConfigAction::Example => commands::config::show_example()?,
            ConfigAction::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
