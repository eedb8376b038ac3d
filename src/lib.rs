pub mod client;
pub mod config;
pub mod duel;
pub mod game;
pub mod pages;
pub mod stats;
pub mod tables;
pub mod words;

pub use duel::Duel;
pub use game::Game;
pub use stats::GameStats;
pub use tables::{Table, TableId, Tables};
pub use words::WordBank;
