//! Core study library for Zoya.
//!
//! Provides:
//! - Spaced-repetition scheduling (an SM-2 variant)
//! - Due-card selection and ordering
//! - The review session state machine
//! - Shared types (Card, CardId, Grade)
//!
//! Everything here is pure and synchronous; persistence and any user
//! interface belong to the applications built on top.

pub mod error;
pub mod scheduler;
pub mod session;
pub mod types;

pub use error::{Result, SrsError};
pub use scheduler::{calculate_next_review, due_cards};
pub use session::ReviewSession;
pub use types::{Card, CardId, Grade, DEFAULT_EASE_FACTOR, MIN_EASE_FACTOR};
