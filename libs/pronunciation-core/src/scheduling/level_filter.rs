//! Narrow the corpus to phrases near the user's level.

use crate::types::Phrase;

/// Initial half-width of the level window.
pub const INITIAL_LEVEL_WINDOW: u32 = 80;
/// Widest half-width tried before giving up on level filtering.
pub const MAX_LEVEL_WINDOW: u32 = 1000;

/// Phrases within a window around `user_level`, doubling the window until
/// something matches. Phrases without a level always pass.
///
/// Falls back to the whole corpus when even the widest window is empty.
pub fn filter_by_level(phrases: &[Phrase], user_level: u32) -> Vec<&Phrase> {
    let mut window = INITIAL_LEVEL_WINDOW;

    loop {
        let filtered: Vec<&Phrase> = phrases
            .iter()
            .filter(|p| within_window(p, user_level, window))
            .collect();

        if !filtered.is_empty() {
            return filtered;
        }
        if window >= MAX_LEVEL_WINDOW {
            return phrases.iter().collect();
        }
        window = (window * 2).min(MAX_LEVEL_WINDOW);
    }
}

fn within_window(phrase: &Phrase, user_level: u32, window: u32) -> bool {
    match phrase.level {
        Some(level) => level.abs_diff(user_level) <= window,
        None => true,
    }
}
