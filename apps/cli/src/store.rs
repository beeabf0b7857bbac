//! JSON-file persistence for the card collection.
//!
//! The whole collection lives in one file as a JSON array of cards, read
//! and written in full. Review progress is saved after every grade, so the
//! file is never more than one card behind.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use zoya_core::Card;

/// Collection file used when neither `--file` nor `ZOYA_FILE` is set.
pub const DEFAULT_FILE: &str = "zoya_cards.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid card collection: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no card with id {0}")]
    CardNotFound(String),
}

/// Owns the card collection and its backing file.
#[derive(Debug)]
pub struct CardStore {
    path: PathBuf,
    cards: Vec<Card>,
}

impl CardStore {
    /// Load the collection from `path`. A missing file is an empty
    /// collection, not an error.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let cards = if path.exists() {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str(&raw)?
        } else {
            Vec::new()
        };
        tracing::debug!("loaded {} cards from {}", cards.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            cards,
        })
    }

    /// Write the whole collection back to disk, pretty-printed.
    pub fn save(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.cards)?;
        fs::write(&self.path, json)?;
        tracing::debug!("saved {} cards to {}", self.cards.len(), self.path.display());
        Ok(())
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn add(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Replace the stored card carrying the same id.
    pub fn update(&mut self, card: Card) -> Result<(), StoreError> {
        match self.cards.iter_mut().find(|c| c.id == card.id) {
            Some(slot) => {
                *slot = card;
                Ok(())
            }
            None => Err(StoreError::CardNotFound(card.id.to_string())),
        }
    }

    /// Remove the card whose id renders as `id`; numeric ids match their
    /// decimal form.
    pub fn remove(&mut self, id: &str) -> Result<Card, StoreError> {
        match self.cards.iter().position(|c| c.id.to_string() == id) {
            Some(index) => Ok(self.cards.remove(index)),
            None => Err(StoreError::CardNotFound(id.to_string())),
        }
    }
}

/// Resolve the collection path: the `--file` flag wins, then `ZOYA_FILE`,
/// then [DEFAULT_FILE] in the working directory.
pub fn resolve_path(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os("ZOYA_FILE").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE))
}

/// Current time truncated to whole milliseconds, the resolution stored on
/// disk.
pub fn now_ms() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
