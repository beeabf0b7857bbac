//! Core types for the Zoya study application.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SrsError};

/// Ease factor assigned to cards that have never been graded.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Floor the ease factor is clamped to after a successful review.
pub const MIN_EASE_FACTOR: f64 = 1.3;

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

/// Recall grade for a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Again,
    Hard,
    Good,
    Easy,
}

impl Grade {
    /// Convert to the numeric value used in prompts and exports (0-3).
    pub fn to_value(self) -> u8 {
        match self {
            Self::Again => 0,
            Self::Hard => 1,
            Self::Good => 2,
            Self::Easy => 3,
        }
    }

    /// Create from a numeric value, rejecting anything outside 0-3.
    pub fn from_value(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Again),
            1 => Ok(Self::Hard),
            2 => Ok(Self::Good),
            3 => Ok(Self::Easy),
            _ => Err(SrsError::InvalidGrade(value)),
        }
    }

    /// Map onto the five-point SM-2 quality scale. A lapse never reaches
    /// the ease-factor update, so `Again` sits at the bottom of the scale.
    pub fn quality(self) -> u8 {
        match self {
            Self::Again => 0,
            Self::Hard => 3,
            Self::Good => 4,
            Self::Easy => 5,
        }
    }
}

/// Card identifier. Cards created by hand in older collections carry
/// numeric ids (epoch timestamps); newer cards carry UUID strings. Both
/// shapes round-trip through JSON as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A study card: user-facing content plus the scheduling state the review
/// algorithm maintains.
///
/// The wire format is a camelCase JSON object. Scheduling fields missing
/// from the input take their new-card defaults, so content-only drafts
/// (for example AI-generated ones) deserialize cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chinese_translation: Option<String>,
    #[serde(default)]
    pub roots: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub layman: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub sentences: Vec<String>,
    #[serde(default)]
    pub definition: String,

    // Scheduling state. Written only by the scheduler after creation.
    #[serde(default)]
    pub interval: u32,
    #[serde(default)]
    pub repetition: u32,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_review_date: Option<DateTime<Utc>>,
    #[serde(
        default,
        with = "chrono::serde::ts_milliseconds_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Card {
    /// Create an unscheduled card. Scheduling fields start at their
    /// defaults; the first grading assigns a real review date.
    pub fn new(id: CardId, term: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id,
            term: term.into(),
            chinese_translation: None,
            roots: String::new(),
            synonyms: Vec::new(),
            layman: String::new(),
            example: String::new(),
            sentences: Vec::new(),
            definition: String::new(),
            interval: 0,
            repetition: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            next_review_date: None,
            created_at: Some(now),
        }
    }

    /// True while the card has never been graded.
    pub fn is_new(&self) -> bool {
        self.interval == 0 && self.repetition == 0
    }
}
