use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::duel::Duel;
use crate::game::Game;
use crate::stats::GameStats;

/// Matches the lifetime of the `fallos` cookie.
pub const IDLE_LIMIT: Duration = Duration::from_secs(120 * 60);
pub const MAX_TABLES: usize = 10_000;

pub type TableId = u128;

/// Everything one browser session plays with.
#[derive(Debug, Default, Clone)]
pub struct Table {
    pub game: Option<Game>,
    /// Present while two players share the table.
    pub duel: Option<Duel>,
    /// Set once the current game's result has been counted.
    pub settled: bool,
}

impl Table {
    pub fn new() -> Table {
        Table::default()
    }

    /// Replace the game, keeping any duel in progress.
    pub fn start(&mut self, game: Game) {
        self.game = Some(game);
        self.settled = false;
    }

    pub fn failures(&self) -> u32 {
        self.game.as_ref().map_or(0, |g| g.failures)
    }

    /// Settle a finished game into the duel, and into `stats` when given.
    /// Runs once per game.
    pub fn settle(&mut self, stats: Option<&mut GameStats>) -> bool {
        let Some(game) = &self.game else {
            return false;
        };
        if self.settled || !game.is_finished() {
            return false;
        }
        if let Some(stats) = stats {
            stats.record(game);
        }
        if let Some(duel) = &mut self.duel {
            duel.settle(game);
        }
        self.settled = true;
        true
    }
}

#[derive(Debug)]
struct Entry {
    table: Table,
    last_used: Instant,
}

/// Live tables by id. Idle tables are dropped, and the count is capped so
/// clients that never send their session cookie back cannot grow it forever.
#[derive(Debug)]
pub struct Tables {
    entries: BTreeMap<TableId, Entry>,
    idle_limit: Duration,
    max_tables: usize,
}

impl Default for Tables {
    fn default() -> Self {
        Tables::with_limits(IDLE_LIMIT, MAX_TABLES)
    }
}

impl Tables {
    pub fn new() -> Tables {
        Tables::default()
    }

    pub fn with_limits(idle_limit: Duration, max_tables: usize) -> Tables {
        Tables {
            entries: BTreeMap::new(),
            idle_limit,
            max_tables: max_tables.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: TableId) -> bool {
        self.entries.contains_key(&id)
    }

    /// The table under `id`, marking it used.
    pub fn get_mut(&mut self, id: TableId, now: Instant) -> Option<&mut Table> {
        let entry = self.entries.get_mut(&id)?;
        entry.last_used = now;
        Some(&mut entry.table)
    }

    /// The table under `id`, created after making room if it is new.
    pub fn open(&mut self, id: TableId, now: Instant) -> &mut Table {
        if !self.entries.contains_key(&id) {
            self.prune(now);
            while self.entries.len() >= self.max_tables {
                let Some(oldest) = self
                    .entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.last_used)
                    .map(|(id, _)| *id)
                else {
                    break;
                };
                self.entries.remove(&oldest);
                log::debug!("evicted table {oldest}");
            }
        }
        let entry = self.entries.entry(id).or_insert_with(|| Entry {
            table: Table::new(),
            last_used: now,
        });
        entry.last_used = now;
        &mut entry.table
    }

    pub fn close(&mut self, id: TableId) -> Option<Table> {
        self.entries.remove(&id).map(|entry| entry.table)
    }

    /// Drop tables idle longer than the limit. Returns how many went.
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        let limit = self.idle_limit;
        self.entries
            .retain(|_, entry| now.saturating_duration_since(entry.last_used) <= limit);
        let dropped = before - self.entries.len();
        if dropped > 0 {
            log::debug!("pruned {dropped} idle tables");
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_once() {
        let mut stats = GameStats::new();
        let mut table = Table::new();
        table.duel = Some(Duel::new());
        table.start(Game::new("TIA", ""));
        assert!(!table.settle(Some(&mut stats)));

        table.game.as_mut().unwrap().guess_word("tia").unwrap();
        assert!(table.settle(Some(&mut stats)));
        assert!(!table.settle(Some(&mut stats)));
        assert_eq!(stats.words_guessed, vec!["TIA"]);
        assert_eq!(table.duel.as_ref().unwrap().scores, [1, 0]);
    }

    #[test]
    fn settling_without_stats_still_scores_the_duel() {
        let mut table = Table::new();
        table.duel = Some(Duel::new());
        let mut game = Game::new("MAR", "");
        game.guess_word("mar").unwrap();
        table.start(game);
        assert!(table.settle(None));
        assert_eq!(table.duel.as_ref().unwrap().scores, [1, 0]);
    }

    #[test]
    fn new_game_resets_settlement() {
        let mut stats = GameStats::new();
        let mut table = Table::new();
        let mut game = Game::new("TIO", "");
        game.guess_word("tio").unwrap();
        table.start(game);
        assert!(table.settle(Some(&mut stats)));
        table.start(Game::new("MAR", ""));
        assert!(!table.settled);
        assert_eq!(table.failures(), 0);
    }

    #[test]
    fn idle_tables_are_dropped_when_a_new_one_opens() {
        let start = Instant::now();
        let mut tables = Tables::new();
        for id in 0..500 {
            tables.open(id, start);
        }
        assert_eq!(tables.len(), 500);

        let later = start + IDLE_LIMIT + Duration::from_secs(60);
        tables.get_mut(7, later);
        tables.open(1_000, later);
        assert_eq!(tables.len(), 2);
        assert!(tables.contains(7));
        assert!(tables.contains(1_000));
    }

    #[test]
    fn least_recently_used_table_makes_room_at_the_cap() {
        let start = Instant::now();
        let mut tables = Tables::with_limits(IDLE_LIMIT, 3);
        for id in 0..3 {
            tables.open(id, start + Duration::from_secs(id as u64));
        }
        tables.get_mut(0, start + Duration::from_secs(10));
        tables.open(3, start + Duration::from_secs(11));
        assert_eq!(tables.len(), 3);
        assert!(tables.contains(0));
        assert!(!tables.contains(1));
    }

    #[test]
    fn reopening_keeps_the_table() {
        let now = Instant::now();
        let mut tables = Tables::with_limits(IDLE_LIMIT, 1);
        tables.open(9, now).start(Game::new("SOL", ""));
        assert!(tables.open(9, now).game.is_some());
        assert!(tables.close(9).is_some());
        assert!(tables.is_empty());
    }
}
