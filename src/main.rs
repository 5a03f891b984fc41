use anyhow::Context;
use clap::{Parser, Subcommand};
use rxlink::{CatalogStore, DrugAnswerer, EngineConfig, MatchTier};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Look up drugs and their side effects from free text
#[derive(Parser, Debug)]
#[command(name = "rxlink")]
#[command(about = "Drug name resolution and side-effect lookup", long_about = None)]
struct Args {
    /// JSON config file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV bulk source
    #[arg(long)]
    source: Option<PathBuf>,

    /// Catalog cache artifact
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Match lexically only
    #[arg(long)]
    no_embedder: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a free-text mention to a catalog drug name
    Resolve { query: String },
    /// General information about a drug
    Info { drug: String },
    /// All side effects of a drug
    SideEffects { drug: String },
    /// Drugs related to a drug
    Related { drug: String },
    /// Side effects of a drug relevant to a symptom
    Symptom { drug: String, symptom: String },
    /// Resolve the drug in a question and answer it
    Ask {
        query: String,
        #[arg(long)]
        symptom: Option<String>,
    },
    /// Rebuild the catalog cache from the bulk source
    Rebuild,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(source) = args.source {
        config.source_path = source;
    }
    if let Some(cache) = args.cache {
        config.cache_path = cache;
    }
    if args.no_embedder {
        config.use_embedder = false;
    }
    config.validate()?;

    let load = || {
        let answerer = DrugAnswerer::from_config(&config);
        info!(
            "Catalog ready: {} drugs, embedding oracle {}",
            answerer.catalog().len(),
            if answerer.resolver().has_oracle() { "on" } else { "off" }
        );
        answerer
    };

    let response = match args.command {
        Command::Resolve { query } => match load().resolver().resolve_with_score(&query) {
            Some(r) => {
                let tier = match r.tier {
                    MatchTier::Lexical => "lexical",
                    MatchTier::Semantic => "semantic",
                };
                format!("{} ({} match, score {:.3})", r.name, tier, r.score)
            }
            None => "I could not find a known drug in your question.".to_string(),
        },
        Command::Info { drug } => load().drug_info(&drug),
        Command::SideEffects { drug } => load().side_effects(&drug),
        Command::Related { drug } => load().related_drugs(&drug),
        Command::Symptom { drug, symptom } => load().side_effects_for_symptom(&drug, &symptom),
        Command::Ask { query, symptom } => load().answer(&query, symptom.as_deref()),
        Command::Rebuild => {
            let store = CatalogStore::new(&config.source_path, &config.cache_path);
            format!("Rebuilt catalog with {} drugs", store.rebuild().len())
        }
    };

    println!("{}", response);
    Ok(())
}
