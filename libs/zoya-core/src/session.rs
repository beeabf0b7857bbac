//! Review session state machine.
//!
//! A session owns the queue of due cards for one sitting. Grading the
//! current card runs the scheduler and hands the updated card back so the
//! caller can persist it immediately; an abandoned session therefore loses
//! nothing. A lapsed card stays in the queue and comes around again within
//! the same sitting; any other grade retires it. The session is complete
//! once the queue empties.

use chrono::{DateTime, Utc};

use crate::error::{Result, SrsError};
use crate::scheduler::calculate_next_review;
use crate::types::{Card, Grade};

#[derive(Debug, Clone)]
pub struct ReviewSession {
    queue: Vec<Card>,
    position: usize,
    reviewed: u32,
    lapses: u32,
}

impl ReviewSession {
    /// Start a session over the due cards, front-most first. Refused when
    /// nothing is due.
    pub fn start(due: Vec<Card>) -> Result<Self> {
        if due.is_empty() {
            return Err(SrsError::NothingDue);
        }
        Ok(Self {
            queue: due,
            position: 0,
            reviewed: 0,
            lapses: 0,
        })
    }

    /// The card currently up for review, `None` once the session is done.
    pub fn current(&self) -> Option<&Card> {
        self.queue.get(self.position)
    }

    /// Cards still waiting in this sitting, the current one included.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_complete(&self) -> bool {
        self.queue.is_empty()
    }

    /// Grades handed out so far, lapses included.
    pub fn reviewed(&self) -> u32 {
        self.reviewed
    }

    /// How many of those grades were lapses.
    pub fn lapses(&self) -> u32 {
        self.lapses
    }

    /// Grade the current card and advance the queue. Returns the updated
    /// card for the caller to write back to its store.
    ///
    /// On `Again` the updated card replaces its queue slot, so a later
    /// pass within this sitting grades the reset state, and the session
    /// moves to the next card, wrapping around. Any other grade removes
    /// the card; when the position falls off the end it resets to the
    /// front.
    pub fn grade_current(&mut self, grade: Grade, now: DateTime<Utc>) -> Result<Card> {
        let card = match self.queue.get(self.position) {
            Some(card) => card,
            None => return Err(SrsError::SessionComplete),
        };

        let updated = calculate_next_review(card, grade, now);
        self.reviewed += 1;

        match grade {
            Grade::Again => {
                self.lapses += 1;
                self.queue[self.position] = updated.clone();
                self.position = (self.position + 1) % self.queue.len();
            }
            Grade::Hard | Grade::Good | Grade::Easy => {
                self.queue.remove(self.position);
                if self.position >= self.queue.len() {
                    self.position = 0;
                }
            }
        }

        Ok(updated)
    }
}
