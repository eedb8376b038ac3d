use serde::{Deserialize, Serialize};

use crate::game::Game;

/// Index into `Duel::scores`: 0 is player 1, 1 is player 2.
pub type Seat = usize;

/// Two players taking turns: one picks the word, the other guesses it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Duel {
    pub scores: [u32; 2],
    /// Starts at 1 and advances after every settled game.
    pub turn: u32,
}

impl Default for Duel {
    fn default() -> Self {
        Duel {
            scores: [0, 0],
            turn: 1,
        }
    }
}

impl Duel {
    pub fn new() -> Duel {
        Duel::default()
    }

    /// On odd turns player 2 sets the word.
    pub fn setter(&self) -> Seat {
        if self.turn % 2 != 0 {
            1
        } else {
            0
        }
    }

    pub fn guesser(&self) -> Seat {
        1 - self.setter()
    }

    /// Award the finished game and move to the next turn. Returns the winner.
    pub fn settle(&mut self, game: &Game) -> Option<Seat> {
        if !game.is_finished() {
            return None;
        }
        let winner = if game.word_discovered() {
            self.guesser()
        } else {
            self.setter()
        };
        self.scores[winner] += 1;
        self.turn += 1;
        Some(winner)
    }
}

/// "Jugador 1" / "Jugador 2".
pub fn seat_name(seat: Seat) -> String {
    format!("Jugador {}", seat + 1)
}
