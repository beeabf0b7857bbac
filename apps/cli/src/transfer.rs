//! Collection import and export.
//!
//! Import accepts what other Zoya instances wrote: either a bare JSON
//! array of cards or the versioned `{"cards": [...]}` envelope. Cards in
//! either shape may be content-only drafts; missing ids and scheduling
//! fields are filled in the same way the in-app editor fills them. Export
//! always writes the envelope.

use std::fs;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use zoya_core::{Card, CardId, DEFAULT_EASE_FACTOR};

use crate::store::{self, CardStore};

/// Version tag written into export envelopes.
pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("transfer error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON format: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no valid cards found in file")]
    NoCards,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportEnvelope<'a> {
    version: &'static str,
    exported_at: String,
    cards: &'a [Card],
}

/// Decode a content field, falling back to the field's default when the
/// file holds a wrong-typed value. Rejecting the whole file for a bad
/// synonym list would strand otherwise usable decks.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Incoming card before defaulting. Everything is optional so that
/// content-only drafts (the shape AI generators produce) import cleanly;
/// content fields additionally tolerate wrong-typed values. Scheduling
/// state stays strictly typed: it feeds the algorithm, so a malformed
/// interval or date rejects the file instead of being coerced.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedCard {
    #[serde(default)]
    id: Option<CardId>,
    #[serde(default, deserialize_with = "lenient")]
    term: String,
    #[serde(default, deserialize_with = "lenient")]
    chinese_translation: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    roots: String,
    #[serde(default, deserialize_with = "lenient")]
    synonyms: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    layman: String,
    #[serde(default, deserialize_with = "lenient")]
    example: String,
    #[serde(default, deserialize_with = "lenient")]
    sentences: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    definition: String,
    #[serde(default)]
    interval: u32,
    #[serde(default)]
    repetition: u32,
    #[serde(default)]
    ease_factor: Option<f64>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    next_review_date: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    created_at: Option<DateTime<Utc>>,
}

impl ImportedCard {
    /// Fill in whatever the draft left out. Ids are minted from the import
    /// instant plus the card's position, the same scheme manual creation
    /// used before UUIDs.
    fn into_card(self, now: DateTime<Utc>, index: usize) -> Card {
        Card {
            id: self
                .id
                .unwrap_or_else(|| CardId::Number(now.timestamp_millis() + index as i64)),
            term: self.term,
            chinese_translation: self.chinese_translation,
            roots: if self.roots.is_empty() {
                "N/A".into()
            } else {
                self.roots
            },
            synonyms: self.synonyms,
            layman: self.layman,
            example: self.example,
            sentences: self.sentences,
            definition: self.definition,
            interval: self.interval,
            repetition: self.repetition,
            ease_factor: self
                .ease_factor
                .filter(|ef| *ef != 0.0)
                .unwrap_or(DEFAULT_EASE_FACTOR),
            next_review_date: self.next_review_date,
            created_at: self.created_at.or(Some(now)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImportFile {
    Bare(Vec<ImportedCard>),
    Envelope { cards: Vec<ImportedCard> },
}

/// Read cards from `path` and append them to the store. Returns how many
/// cards came in.
pub fn import_file(store: &mut CardStore, path: &Path) -> Result<usize, TransferError> {
    let raw = fs::read_to_string(path)?;
    let cards = parse_import(&raw, store::now_ms())?;
    let count = cards.len();
    for card in cards {
        store.add(card);
    }
    Ok(count)
}

fn parse_import(raw: &str, now: DateTime<Utc>) -> Result<Vec<Card>, TransferError> {
    let parsed: ImportFile = serde_json::from_str(raw)?;
    let items = match parsed {
        ImportFile::Bare(items) => items,
        ImportFile::Envelope { cards } => cards,
    };
    if items.is_empty() {
        return Err(TransferError::NoCards);
    }
    Ok(items
        .into_iter()
        .enumerate()
        .map(|(index, item)| item.into_card(now, index))
        .collect())
}

/// Write the whole collection to `path` as a versioned envelope. Returns
/// how many cards went out.
pub fn export_file(store: &CardStore, path: &Path) -> Result<usize, TransferError> {
    let envelope = ExportEnvelope {
        version: EXPORT_VERSION,
        exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        cards: store.cards(),
    };
    fs::write(path, serde_json::to_string_pretty(&envelope)?)?;
    Ok(store.cards().len())
}

#[derive(Debug, Serialize)]
struct DatasetPair {
    input_text: String,
    output_text: String,
}

fn dataset_pair(card: &Card) -> DatasetPair {
    let suffix = card
        .chinese_translation
        .as_ref()
        .filter(|t| !t.is_empty())
        .map(|t| format!(" ({t})"))
        .unwrap_or_default();
    DatasetPair {
        input_text: format!("Explain the term \"{}\"{}", card.term, suffix),
        output_text: format!(
            "Term: {}{}\nRoots: {}\nLayman Explanation: {}\nExample: {}\nDefinition: {}",
            card.term, suffix, card.roots, card.layman, card.example, card.definition
        ),
    }
}

/// Write the collection as instruction/response pairs for fine-tuning
/// datasets, one pair per card.
pub fn export_dataset(store: &CardStore, path: &Path) -> Result<usize, TransferError> {
    let pairs: Vec<DatasetPair> = store.cards().iter().map(dataset_pair).collect();
    fs::write(path, serde_json::to_string_pretty(&pairs)?)?;
    Ok(pairs.len())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn import_accepts_a_bare_array() {
        let raw = r#"[
            {"term": "ephemeral"},
            {"id": 7, "term": "laconic", "easeFactor": 1.9}
        ]"#;
        let cards = parse_import(raw, at(1_700_000_000_000)).unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].id, CardId::Number(1_700_000_000_000));
        assert_eq!(cards[0].ease_factor, DEFAULT_EASE_FACTOR);
        assert_eq!(cards[0].roots, "N/A");
        assert_eq!(cards[0].created_at, Some(at(1_700_000_000_000)));
        assert_eq!(cards[1].id, CardId::Number(7));
        assert_eq!(cards[1].ease_factor, 1.9);
    }

    #[test]
    fn import_accepts_the_versioned_envelope() {
        let raw = r#"{
            "version": "1.0",
            "exportedAt": "2024-04-01T00:00:00.000Z",
            "cards": [{
                "id": "u-1",
                "term": "sonder",
                "interval": 6,
                "repetition": 2,
                "easeFactor": 2.36,
                "nextReviewDate": 1712000000000
            }]
        }"#;
        let cards = parse_import(raw, at(0)).unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, CardId::Text("u-1".into()));
        assert_eq!(cards[0].interval, 6);
        assert_eq!(cards[0].repetition, 2);
        assert_eq!(cards[0].ease_factor, 2.36);
        assert_eq!(cards[0].next_review_date, Some(at(1_712_000_000_000)));
    }

    #[test]
    fn import_rejects_zero_cards() {
        assert!(matches!(parse_import("[]", at(0)), Err(TransferError::NoCards)));
        assert!(matches!(
            parse_import(r#"{"cards": []}"#, at(0)),
            Err(TransferError::NoCards)
        ));
    }

    #[test]
    fn import_rejects_unrecognized_shapes() {
        assert!(matches!(
            parse_import(r#"{"decks": []}"#, at(0)),
            Err(TransferError::Parse(_))
        ));
        assert!(matches!(
            parse_import("not json", at(0)),
            Err(TransferError::Parse(_))
        ));
    }

    #[test]
    fn zero_ease_factor_falls_back_to_default() {
        let cards = parse_import(r#"[{"term": "anew", "easeFactor": 0}]"#, at(0)).unwrap();
        assert_eq!(cards[0].ease_factor, DEFAULT_EASE_FACTOR);
    }

    #[test]
    fn wrong_typed_content_fields_fall_back_to_defaults() {
        let raw = r#"[{
            "term": "ephemeral",
            "synonyms": "fleeting, transient",
            "sentences": {"first": "It faded."},
            "roots": 42,
            "layman": null
        }]"#;
        let cards = parse_import(raw, at(1_700_000_000_000)).unwrap();

        assert_eq!(cards[0].term, "ephemeral");
        assert!(cards[0].synonyms.is_empty());
        assert!(cards[0].sentences.is_empty());
        assert_eq!(cards[0].roots, "N/A");
        assert_eq!(cards[0].layman, "");
    }

    #[test]
    fn wrong_typed_scheduling_state_still_rejects_the_file() {
        assert!(matches!(
            parse_import(r#"[{"term": "anew", "interval": "six"}]"#, at(0)),
            Err(TransferError::Parse(_))
        ));
        assert!(matches!(
            parse_import(r#"[{"term": "anew", "nextReviewDate": "tomorrow"}]"#, at(0)),
            Err(TransferError::Parse(_))
        ));
    }

    #[test]
    fn export_then_import_round_trips_scheduling_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = CardStore::load(&dir.path().join("source.json")).unwrap();
        let mut card = Card::new(CardId::Text("u-9".into()), "petrichor", at(1_700_000_000_000));
        card.roots = "petra + ichor".into();
        card.interval = 15;
        card.repetition = 3;
        card.ease_factor = 2.6;
        card.next_review_date = Some(at(1_701_296_000_000));
        source.add(card.clone());

        let exported = dir.path().join("deck.json");
        assert_eq!(export_file(&source, &exported).unwrap(), 1);

        let mut target = CardStore::load(&dir.path().join("target.json")).unwrap();
        assert_eq!(import_file(&mut target, &exported).unwrap(), 1);
        assert_eq!(target.cards(), [card]);
    }

    #[test]
    fn export_writes_the_envelope_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut source = CardStore::load(&dir.path().join("source.json")).unwrap();
        source.add(Card::new(CardId::Number(1), "ephemeral", at(0)));

        let path = dir.path().join("deck.json");
        export_file(&source, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["version"], "1.0");
        assert!(value["exportedAt"].as_str().unwrap().ends_with('Z'));
        assert_eq!(value["cards"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn dataset_pairs_carry_the_explanation_layout() {
        let mut card = Card::new(CardId::Number(1), "sonder", at(0));
        card.chinese_translation = Some("怅然".into());
        card.roots = "N/A".into();
        card.layman = "The feeling that passersby have lives as vivid as yours.".into();
        card.example = "A sudden sonder hit her on the platform.".into();
        card.definition = "The realization that each passerby is the hero of their own story.".into();

        let pair = dataset_pair(&card);
        assert_eq!(pair.input_text, "Explain the term \"sonder\" (怅然)");
        assert!(pair.output_text.starts_with("Term: sonder (怅然)\nRoots: N/A\n"));
        assert!(pair.output_text.contains("\nLayman Explanation: The feeling"));
        assert!(pair.output_text.ends_with("hero of their own story."));

        let plain = dataset_pair(&Card::new(CardId::Number(2), "laconic", at(0)));
        assert_eq!(plain.input_text, "Explain the term \"laconic\"");
    }
}
