//! Spaced-repetition scheduling, an SM-2 variant.
//!
//! Two pure operations: grading a single card and selecting the ordered
//! set of cards currently due. The caller supplies the clock and owns all
//! persistence.

use chrono::{DateTime, Duration, Utc};

use crate::types::{Card, Grade, MIN_EASE_FACTOR};

/// Apply a review grade to a card, producing its next scheduling state.
///
/// `Again` is a lapse: the repetition streak resets and the card comes
/// back tomorrow, with the ease factor left untouched. A successful grade
/// grows the interval (1 day, then 6, then `interval * ease_factor`
/// rounded to the nearest day) and shifts the ease factor on the SM-2
/// quality scale, never below the 1.3 floor.
///
/// `now` is captured once per review; the returned card is due exactly
/// `interval` days after it, saturating at the calendar's maximum when the
/// interval has grown past the representable range. All non-scheduling
/// fields carry over unchanged.
pub fn calculate_next_review(card: &Card, grade: Grade, now: DateTime<Utc>) -> Card {
    let mut interval = card.interval;
    let mut repetition = card.repetition;
    let mut ease_factor = card.ease_factor;

    match grade {
        Grade::Again => {
            repetition = 0;
            interval = 1;
        }
        Grade::Hard | Grade::Good | Grade::Easy => {
            interval = match repetition {
                0 => 1,
                1 => 6,
                // Grown from the ease factor as it stood before this review.
                _ => (f64::from(interval) * ease_factor).round() as u32,
            };
            repetition += 1;

            let q = f64::from(grade.quality());
            ease_factor += 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
            if ease_factor < MIN_EASE_FACTOR {
                ease_factor = MIN_EASE_FACTOR;
            }
        }
    }

    Card {
        interval,
        repetition,
        ease_factor,
        next_review_date: Some(
            now.checked_add_signed(Duration::days(i64::from(interval)))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        ),
        ..card.clone()
    }
}

/// Select the cards eligible for review at `now`, most urgent first.
///
/// A card is due when it has no scheduled review date yet or when that
/// date has passed. Unscheduled cards sort ahead of everything else, then
/// the most overdue; ties keep their collection order. The collection
/// itself is left untouched.
pub fn due_cards(cards: &[Card], now: DateTime<Utc>) -> Vec<&Card> {
    let mut due: Vec<&Card> = cards
        .iter()
        .filter(|card| match card.next_review_date {
            None => true,
            Some(date) => date <= now,
        })
        .collect();
    due.sort_by_key(|card| card.next_review_date.map_or(0, |date| date.timestamp_millis()));
    due
}
