//! Command-line front end for the catalog.
//!
//! Owns the store lifecycle: constructed here, passed by reference into
//! the engines, shared with the auto-persist task only for long-lived
//! commands. No global state.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use agora_common::{Config, PendingSubmission};
use agora_engine::{
    academics_by_connection, get_academic, network_data, search, SearchCriteria,
};
use agora_enrich::{confirm, Depth, Enricher};
use agora_store::{bootstrap, spawn_autosave, CatalogStore, FileBackend, HttpSeedSource, SeedSource};
use ai_client::ProviderClient;

#[derive(Parser)]
#[command(name = "agora")]
#[command(about = "Local catalog of academics with AI enrichment")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a record from the text provider and merge it on confirmation
    Enrich {
        /// Academic to ask the provider about
        topic: String,

        /// How much detail to request
        #[arg(long, default_value = "medium")]
        depth: Depth,

        /// Names the provider should not bring up (repeatable)
        #[arg(long = "exclude")]
        exclusions: Vec<String>,

        /// Merge without the interactive confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Print one record resolved by key, exact name, or substring
    Show { name: String },

    /// Search the catalog (all supplied filters must match)
    Search {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        discipline: Option<String>,
        #[arg(long)]
        tradition: Option<String>,
        #[arg(long)]
        era: Option<String>,
        #[arg(long)]
        methodology: Option<String>,
        #[arg(long)]
        theme: Option<String>,
    },

    /// List records that declare a connection to the given name
    Connections { name: String },

    /// Emit the nodes-and-links graph view as JSON
    Network,

    /// Manage favorites
    Fav {
        #[command(subcommand)]
        action: FavAction,
    },

    /// Manage the pending-submission queue
    Pending {
        #[command(subcommand)]
        action: PendingAction,
    },

    /// Show recent novelty tiles
    Tiles,

    /// Write the catalog as JSON to stdout
    Export,

    /// Replace the catalog from a JSON file
    Import { file: PathBuf },

    /// Delete all collections (a pre-clear safety copy is kept)
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Bootstrap an empty catalog from the configured seed dataset
    Seed,
}

#[derive(Subcommand)]
enum FavAction {
    Add { name: String },
    Rm { name: String },
    List,
}

#[derive(Subcommand)]
enum PendingAction {
    List,
    /// Remove a queued submission by its position
    Rm { index: usize },
    /// Queue a contribution for review
    Add {
        academic_name: String,
        kind: String,
        /// Free-form JSON payload
        #[arg(default_value = "{}")]
        payload: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("agora=info".parse()?))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let backend = FileBackend::new(&config.data_dir, config.storage_budget_bytes)
        .context("opening data directory")?;
    let mut store = CatalogStore::new(Box::new(backend));
    if !store.load()? {
        let seed = config.seed_url.as_deref().map(HttpSeedSource::new);
        let seed_ref = seed.as_ref().map(|s| s as &dyn SeedSource);
        bootstrap(&mut store, seed_ref).await?;
    }

    match cli.command {
        Commands::Enrich {
            topic,
            depth,
            exclusions,
            yes,
        } => run_enrich(store, &config, &topic, depth, &exclusions, yes).await?,

        Commands::Show { name } => match get_academic(&store, &name) {
            Some(academic) => println!("{}", serde_json::to_string_pretty(academic)?),
            None => println!("No academic found matching '{name}'."),
        },

        Commands::Search {
            name,
            discipline,
            tradition,
            era,
            methodology,
            theme,
        } => {
            let criteria = SearchCriteria {
                name,
                discipline,
                tradition,
                era,
                methodology,
                theme,
            };
            let hits = search(&store, &criteria);
            if hits.is_empty() {
                println!("No matches.");
            }
            for academic in hits {
                let disciplines = academic.primary_discipline().unwrap_or("Unknown");
                println!("{}  [{disciplines}]", academic.name);
            }
        }

        Commands::Connections { name } => {
            for academic in academics_by_connection(&store, &name) {
                println!("{}", academic.name);
            }
        }

        Commands::Network => {
            println!("{}", serde_json::to_string_pretty(&network_data(&store))?)
        }

        Commands::Fav { action } => match action {
            FavAction::Add { name } => {
                if store.add_favorite(&name)? {
                    println!("Added to favorites.");
                } else {
                    println!("No such academic '{name}'.");
                }
            }
            FavAction::Rm { name } => {
                if store.remove_favorite(&name)? {
                    println!("Removed from favorites.");
                } else {
                    println!("'{name}' was not a favorite.");
                }
            }
            FavAction::List => {
                for key in store.favorites() {
                    println!("{key}");
                }
            }
        },

        Commands::Pending { action } => match action {
            PendingAction::List => {
                for (index, submission) in store.pending().iter().enumerate() {
                    println!(
                        "{index}: {} ({}) {}",
                        submission.academic_name, submission.kind, submission.payload
                    );
                }
            }
            PendingAction::Rm { index } => {
                if store.remove_pending(index)? {
                    println!("Removed submission {index}.");
                } else {
                    println!("No submission at position {index}.");
                }
            }
            PendingAction::Add {
                academic_name,
                kind,
                payload,
            } => {
                let payload =
                    serde_json::from_str(&payload).context("payload must be valid JSON")?;
                store.push_pending(PendingSubmission {
                    academic_name,
                    kind,
                    payload,
                })?;
                println!("Queued for review.");
            }
        },

        Commands::Tiles => {
            for tile in store.tiles() {
                println!("[{}] {}", tile.date.format("%Y-%m-%d %H:%M"), tile.title);
            }
        }

        Commands::Export => println!("{}", store.export_json()?),

        Commands::Import { file } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let count = store.import_json(&json)?;
            println!("Imported {count} records.");
        }

        Commands::Clear { yes } => {
            if yes || confirm_on_stdin("Delete the whole catalog?")? {
                store.clear()?;
                println!("Catalog cleared. A pre-clear backup was kept.");
            }
        }

        Commands::Seed => {
            let url = config
                .seed_url
                .clone()
                .ok_or_else(|| anyhow!("AGORA_SEED_URL is not set"))?;
            let seed = HttpSeedSource::new(url);
            bootstrap(&mut store, Some(&seed)).await?;
            println!("Catalog now holds {} records.", store.len());
        }
    }

    Ok(())
}

async fn run_enrich(
    store: CatalogStore,
    config: &Config,
    topic: &str,
    depth: Depth,
    exclusions: &[String],
    yes: bool,
) -> Result<()> {
    let mut client = ProviderClient::new(config.provider_endpoints.clone());
    if let Some(key) = &config.provider_api_key {
        client = client.with_api_key(key);
    }
    let enricher = Enricher::new(client, &config.provider_model, config.max_tokens);

    // The generation can take a while; keep the periodic persist running.
    let store = Arc::new(Mutex::new(store));
    let autosave = spawn_autosave(
        store.clone(),
        Duration::from_secs(config.autosave_period_secs),
    );

    info!(topic, %depth, "requesting enrichment");
    let candidate = enricher.enrich(topic, depth, exclusions).await?;

    println!("{}", serde_json::to_string_pretty(&candidate)?);
    if yes || confirm_on_stdin("Merge this record into the catalog?")? {
        let mut guard = store
            .lock()
            .map_err(|_| anyhow!("store lock poisoned"))?;
        let report = confirm(&mut guard, candidate)?;
        if report.created {
            println!("Created '{}'.", report.key);
        } else {
            println!("Merged into existing '{}'.", report.key);
        }
        for name in report.reciprocal_links {
            println!("Linked back from {name}.");
        }
    } else {
        println!("Discarded.");
    }

    autosave.abort();
    Ok(())
}

fn confirm_on_stdin(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
