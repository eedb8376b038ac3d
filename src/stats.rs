use serde::{Deserialize, Serialize};

use crate::game::Game;

/// Running totals across the games played by the admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStats {
    pub games_played: u32,
    pub words_played: Vec<String>,
    pub words_guessed: Vec<String>,
    pub words_failed: Vec<String>,
    pub letters_hit: Vec<char>,
    pub letters_missed: Vec<char>,
}

impl Default for GameStats {
    fn default() -> Self {
        GameStats {
            games_played: 0,
            words_played: vec![],
            words_guessed: vec![],
            words_failed: vec![],
            letters_hit: vec![],
            letters_missed: vec![],
        }
    }
}

impl GameStats {
    pub fn new() -> GameStats {
        GameStats::default()
    }

    pub fn new_game(&mut self, word: &str) {
        self.games_played += 1;
        self.words_played.push(word.to_string());
    }

    /// Fold a finished game into the totals. Unfinished games are ignored.
    pub fn record(&mut self, game: &Game) {
        if !game.is_finished() {
            return;
        }
        if game.word_discovered() {
            self.words_guessed.push(game.word.clone());
        } else {
            self.words_failed.push(game.word.clone());
        }
        self.letters_hit.extend(game.hits.iter().copied());
        self.letters_missed.extend(game.misses.iter().copied());
    }
}
