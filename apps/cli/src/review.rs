//! Interactive review session.
//!
//! Thin terminal glue over [zoya_core::ReviewSession]: show the front of
//! the card, flip on Enter, take a grade, persist the updated card before
//! moving on. Quitting mid-session loses nothing because every grade is
//! saved as it happens.

use std::io::{self, BufRead, Write};

use rand::seq::SliceRandom;
use zoya_core::{due_cards, Card, Grade, ReviewSession};

use crate::store::{now_ms, CardStore};

/// What the user asked for at the grade prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptAction {
    Grade(Grade),
    Quit,
}

/// Parse one line of grade input: the numeric grades 0-3, each grade's
/// name or first letter, or q to quit. `None` means ask again.
fn parse_prompt(line: &str) -> Option<PromptAction> {
    let input = line.trim().to_ascii_lowercase();
    match input.as_str() {
        "q" | "quit" => Some(PromptAction::Quit),
        "a" | "again" => Some(PromptAction::Grade(Grade::Again)),
        "h" | "hard" => Some(PromptAction::Grade(Grade::Hard)),
        "g" | "good" => Some(PromptAction::Grade(Grade::Good)),
        "e" | "easy" => Some(PromptAction::Grade(Grade::Easy)),
        _ => input
            .parse::<u8>()
            .ok()
            .and_then(|value| Grade::from_value(value).ok())
            .map(PromptAction::Grade),
    }
}

pub fn run(store: &mut CardStore, shuffle: bool) -> anyhow::Result<()> {
    let mut due: Vec<Card> = due_cards(store.cards(), now_ms())
        .into_iter()
        .cloned()
        .collect();
    if shuffle {
        due.shuffle(&mut rand::thread_rng());
    }

    let mut session = match ReviewSession::start(due) {
        Ok(session) => session,
        Err(_) => {
            println!("No cards due for review! Great job!");
            return Ok(());
        }
    };

    tracing::debug!("starting session with {} cards", session.remaining());
    println!(
        "{} card(s) to review. Enter flips, a/h/g/e or 0-3 grades, q quits.",
        session.remaining()
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();

    while let Some(card) = session.current().cloned() {
        println!();
        println!("── {} ──", card.term);
        if !wait_for_flip(&mut input)? {
            break;
        }
        print_back(&card);

        match read_grade(&mut input)? {
            PromptAction::Quit => break,
            PromptAction::Grade(grade) => {
                let updated = session.grade_current(grade, now_ms())?;
                store.update(updated)?;
                store.save()?;
            }
        }
    }

    if session.is_complete() {
        println!();
        println!(
            "Review session complete! {} review(s), {} lapse(s).",
            session.reviewed(),
            session.lapses()
        );
    } else {
        println!(
            "Progress saved. {} card(s) still due.",
            session.remaining()
        );
    }
    Ok(())
}

/// Wait for Enter; false on end of input.
fn wait_for_flip(input: &mut impl BufRead) -> io::Result<bool> {
    print!("[Enter] to flip ");
    io::stdout().flush()?;
    let mut line = String::new();
    Ok(input.read_line(&mut line)? != 0)
}

fn read_grade(input: &mut impl BufRead) -> io::Result<PromptAction> {
    loop {
        print!("(a)gain (h)ard (g)ood (e)asy (q)uit > ");
        io::stdout().flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Ok(PromptAction::Quit);
        }
        match parse_prompt(&line) {
            Some(action) => return Ok(action),
            None => println!("Unrecognized grade."),
        }
    }
}

fn print_back(card: &Card) {
    if let Some(translation) = card.chinese_translation.as_deref() {
        println!("  {translation}");
    }
    if !card.definition.is_empty() {
        println!("  {}", card.definition);
    }
    if !card.layman.is_empty() {
        println!("  In plain terms: {}", card.layman);
    }
    if !card.example.is_empty() {
        println!("  Example: {}", card.example);
    }
    for sentence in &card.sentences {
        println!("  - {sentence}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_words_map_to_grades() {
        assert_eq!(parse_prompt("a"), Some(PromptAction::Grade(Grade::Again)));
        assert_eq!(parse_prompt("hard"), Some(PromptAction::Grade(Grade::Hard)));
        assert_eq!(parse_prompt("G"), Some(PromptAction::Grade(Grade::Good)));
        assert_eq!(parse_prompt("Easy"), Some(PromptAction::Grade(Grade::Easy)));
    }

    #[test]
    fn numeric_grades_are_accepted() {
        assert_eq!(parse_prompt("0"), Some(PromptAction::Grade(Grade::Again)));
        assert_eq!(parse_prompt("3"), Some(PromptAction::Grade(Grade::Easy)));
    }

    #[test]
    fn out_of_range_numbers_are_refused() {
        assert_eq!(parse_prompt("4"), None);
        assert_eq!(parse_prompt("255"), None);
        assert_eq!(parse_prompt("-1"), None);
    }

    #[test]
    fn quit_is_case_insensitive() {
        assert_eq!(parse_prompt("q"), Some(PromptAction::Quit));
        assert_eq!(parse_prompt("QUIT"), Some(PromptAction::Quit));
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(parse_prompt("  g \n"), Some(PromptAction::Grade(Grade::Good)));
        assert_eq!(parse_prompt("   "), None);
    }
}
