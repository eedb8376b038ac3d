use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Failures at which the game is lost. Matches the last gallows image, `/img/6.jpg`.
pub const MAX_FAILURES: u32 = 6;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The game is already won or lost.
    Finished,
    /// This letter was guessed before.
    AlreadyTried,
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::Finished => f.write_str("game is already over"),
            GameError::AlreadyTried => f.write_str("letter was already tried"),
        }
    }
}

impl std::error::Error for GameError {}

/// `Ok(true)` on a hit, `Ok(false)` on a miss.
pub type GuessResult = Result<bool, GameError>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    /// Upper-case word to guess.
    pub word: String,
    pub hint: String,
    pub hits: BTreeSet<char>,
    pub misses: BTreeSet<char>,
    /// Every letter tried, in order.
    pub tried: Vec<char>,
    pub failures: u32,
}

impl Game {
    pub fn new(word: &str, hint: &str) -> Game {
        Game {
            word: word.trim().to_uppercase(),
            hint: hint.to_string(),
            hits: BTreeSet::new(),
            misses: BTreeSet::new(),
            tried: vec![],
            failures: 0,
        }
    }

    /// Try a single letter; misses cost one failure.
    pub fn guess_letter(&mut self, letter: char) -> GuessResult {
        if self.is_finished() {
            return Err(GameError::Finished);
        }
        let letter = upper(letter);
        if self.tried.contains(&letter) {
            return Err(GameError::AlreadyTried);
        }
        self.tried.push(letter);
        if self.word.contains(letter) {
            self.hits.insert(letter);
            Ok(true)
        } else {
            self.misses.insert(letter);
            self.failures += 1;
            Ok(false)
        }
    }

    /// Try the whole word. A correct guess reveals every letter.
    pub fn guess_word(&mut self, attempt: &str) -> GuessResult {
        if self.is_finished() {
            return Err(GameError::Finished);
        }
        if attempt.trim().to_uppercase() == self.word {
            self.hits.extend(self.word.chars());
            Ok(true)
        } else {
            self.failures += 1;
            Ok(false)
        }
    }

    /// The word with unrevealed letters as `_`, letters separated by spaces.
    pub fn masked_word(&self) -> String {
        self.word
            .chars()
            .map(|c| if self.hits.contains(&c) { c } else { '_' })
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn too_many_failures(&self) -> bool {
        self.failures >= MAX_FAILURES
    }

    pub fn word_discovered(&self) -> bool {
        self.word.chars().all(|c| self.hits.contains(&c))
    }

    pub fn is_finished(&self) -> bool {
        self.too_many_failures() || self.word_discovered()
    }
}

fn upper(letter: char) -> char {
    letter.to_uppercase().next().unwrap_or(letter)
}

/// Keyboard letters, `A` to `Z` with `Ñ` after `N`.
pub fn alphabet() -> Vec<char> {
    let mut letters = Vec::with_capacity(27);
    for letter in 'A'..='Z' {
        letters.push(letter);
        if letter == 'N' {
            letters.push('Ñ');
        }
    }
    letters
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_reveal_letters_and_misses_count() {
        let mut game = Game::new("casa", "Lugar donde vives.");
        assert_eq!(game.masked_word(), "_ _ _ _");

        assert_eq!(game.guess_letter('a'), Ok(true));
        assert_eq!(game.masked_word(), "_ A _ A");
        assert_eq!(game.guess_letter('Z'), Ok(false));
        assert_eq!(game.failures, 1);
        assert_eq!(game.tried, vec!['A', 'Z']);
        assert!(game.misses.contains(&'Z'));
    }

    #[test]
    fn repeated_letter_is_not_penalised_twice() {
        let mut game = Game::new("SOL", "");
        assert_eq!(game.guess_letter('x'), Ok(false));
        assert_eq!(game.guess_letter('X'), Err(GameError::AlreadyTried));
        assert_eq!(game.failures, 1);
    }

    #[test]
    fn discovering_every_letter_finishes_the_game() {
        let mut game = Game::new("MAR", "");
        for letter in ['m', 'a', 'r'] {
            assert_eq!(game.guess_letter(letter), Ok(true));
        }
        assert!(game.word_discovered());
        assert!(game.is_finished());
        assert_eq!(game.guess_letter('b'), Err(GameError::Finished));
    }

    #[test]
    fn losing_after_max_failures() {
        let mut game = Game::new("RIO", "");
        for letter in "BCDEFG".chars() {
            game.guess_letter(letter).unwrap();
        }
        assert!(game.too_many_failures());
        assert!(!game.word_discovered());
        assert_eq!(game.guess_word("rio"), Err(GameError::Finished));
    }

    #[test]
    fn word_guess_is_case_insensitive() {
        let mut game = Game::new("Montaña", "");
        assert_eq!(game.guess_word("perro"), Ok(false));
        assert_eq!(game.failures, 1);
        assert_eq!(game.guess_word(" montaña "), Ok(true));
        assert_eq!(game.masked_word(), "M O N T A Ñ A");
    }

    #[test]
    fn enye_is_a_guessable_letter() {
        let mut game = Game::new("PIÑA", "");
        assert_eq!(game.guess_letter('ñ'), Ok(true));
        assert_eq!(game.masked_word(), "_ _ Ñ _");
    }

    #[test]
    fn alphabet_has_enye_after_n() {
        let letters = alphabet();
        assert_eq!(letters.len(), 27);
        let n = letters.iter().position(|&c| c == 'N').unwrap();
        assert_eq!(letters[n + 1], 'Ñ');
        assert_eq!(letters[n + 2], 'O');
    }
}
