//! Zoya command-line interface.
//!
//! A terminal front end for the Zoya study library: keeps a JSON card
//! collection on disk and runs spaced-repetition review sessions over it.

mod review;
mod store;
mod transfer;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use zoya_core::{due_cards, Card, CardId};

use crate::store::CardStore;

/// Zoya - spaced-repetition study CLI
#[derive(Parser, Debug)]
#[command(name = "zoya")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Card collection file (defaults to ZOYA_FILE, then ./zoya_cards.json)
    #[arg(long, global = true)]
    file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every card with its scheduling state
    List,
    /// Show collection totals and what is due
    Stats,
    /// Add a card
    Add(AddArgs),
    /// Remove a card by id
    Remove {
        /// Card id (UUID string or numeric)
        id: String,
    },
    /// Review everything currently due
    Review {
        /// Shuffle the due cards before starting
        #[arg(long)]
        shuffle: bool,
    },
    /// Import cards from a JSON file (bare array or {"cards": [...]})
    Import {
        /// File to read
        path: PathBuf,
    },
    /// Export the collection as a versioned JSON envelope
    Export {
        /// File to write
        path: PathBuf,
    },
    /// Export term/explanation pairs for fine-tuning datasets
    ExportDataset {
        /// File to write
        path: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct AddArgs {
    /// The term on the front of the card
    #[arg(long)]
    term: String,

    /// Chinese translation
    #[arg(long)]
    translation: Option<String>,

    /// Word roots or etymology
    #[arg(long)]
    roots: Option<String>,

    /// Synonym (repeatable)
    #[arg(long = "synonym")]
    synonyms: Vec<String>,

    /// Plain-language explanation
    #[arg(long)]
    layman: Option<String>,

    /// Example usage
    #[arg(long)]
    example: Option<String>,

    /// Example sentence (repeatable)
    #[arg(long = "sentence")]
    sentences: Vec<String>,

    /// Dictionary definition
    #[arg(long)]
    definition: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let path = store::resolve_path(cli.file);
    let mut store = CardStore::load(&path)
        .with_context(|| format!("failed to load collection from {}", path.display()))?;

    match cli.command {
        Commands::List => cmd_list(&store),
        Commands::Stats => cmd_stats(&store),
        Commands::Add(args) => cmd_add(&mut store, args)?,
        Commands::Remove { id } => cmd_remove(&mut store, &id)?,
        Commands::Review { shuffle } => review::run(&mut store, shuffle)?,
        Commands::Import { path } => cmd_import(&mut store, &path)?,
        Commands::Export { path } => cmd_export(&store, &path)?,
        Commands::ExportDataset { path } => cmd_export_dataset(&store, &path)?,
    }
    Ok(())
}

fn cmd_list(store: &CardStore) {
    if store.cards().is_empty() {
        println!("No cards yet. Add one with: zoya add --term <TERM>");
        return;
    }
    let now = store::now_ms();
    for card in store.cards() {
        let status = if card.is_new() {
            "new".to_string()
        } else {
            match card.next_review_date {
                Some(date) if date > now => format!("due {}", date.format("%Y-%m-%d")),
                _ => "due now".to_string(),
            }
        };
        println!(
            "{:<38} {:<24} rep {:>3}  ease {:.2}  interval {:>3}d  {}",
            card.id.to_string(),
            card.term,
            card.repetition,
            card.ease_factor,
            card.interval,
            status
        );
    }
}

fn cmd_stats(store: &CardStore) {
    let now = store::now_ms();
    let cards = store.cards();
    let due = due_cards(cards, now);
    let new = cards.iter().filter(|card| card.is_new()).count();

    println!("{} card(s): {} new, {} due now", cards.len(), new, due.len());
    if due.is_empty() {
        if let Some(next) = cards
            .iter()
            .filter_map(|card| card.next_review_date)
            .filter(|date| *date > now)
            .min()
        {
            println!("Next review {}", next.format("%Y-%m-%d %H:%M"));
        }
    }
}

fn cmd_add(store: &mut CardStore, args: AddArgs) -> anyhow::Result<()> {
    if args.term.trim().is_empty() {
        anyhow::bail!("term must not be empty");
    }

    let mut card = Card::new(
        CardId::Text(Uuid::new_v4().to_string()),
        args.term.trim(),
        store::now_ms(),
    );
    card.chinese_translation = args.translation.filter(|t| !t.is_empty());
    card.roots = args.roots.unwrap_or_else(|| "N/A".into());
    card.synonyms = args.synonyms;
    card.layman = args
        .layman
        .unwrap_or_else(|| "No explanation provided.".into());
    card.example = args
        .example
        .unwrap_or_else(|| "No example provided.".into());
    card.sentences = args.sentences;
    card.definition = args
        .definition
        .unwrap_or_else(|| "No definition provided.".into());

    let id = card.id.clone();
    store.add(card);
    store.save()?;
    println!("Added card {id}");
    Ok(())
}

fn cmd_remove(store: &mut CardStore, id: &str) -> anyhow::Result<()> {
    let removed = store.remove(id)?;
    store.save()?;
    println!("Removed \"{}\" ({})", removed.term, removed.id);
    Ok(())
}

fn cmd_import(store: &mut CardStore, path: &Path) -> anyhow::Result<()> {
    let count = transfer::import_file(store, path)
        .with_context(|| format!("failed to import {}", path.display()))?;
    store.save()?;
    println!("Successfully imported {count} card(s)!");
    Ok(())
}

fn cmd_export(store: &CardStore, path: &Path) -> anyhow::Result<()> {
    let count = transfer::export_file(store, path)?;
    println!("Exported {count} card(s) to {}", path.display());
    Ok(())
}

fn cmd_export_dataset(store: &CardStore, path: &Path) -> anyhow::Result<()> {
    let count = transfer::export_dataset(store, path)?;
    println!("Exported {count} training pair(s) to {}", path.display());
    Ok(())
}
