//! Best-score persistence gateway
//!
//! The storage boundary is a plain string key-value store (LocalStorage in a
//! browser, a map in tests). Values are decimal integers; anything absent or
//! malformed reads back as zero. Writes are write-through with last-write-wins
//! semantics - no locking, concurrent writers simply race.

use std::collections::HashMap;

/// Minimal string key-value store.
pub trait KvStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store used by tests and headless embedders.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    map: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.map.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.map.remove(key);
    }
}

/// Gateway owning one best-score integer per game key. The best value
/// outlives sessions; it only moves up.
#[derive(Debug, Clone)]
pub struct ScoreGateway<S: KvStore> {
    store: S,
}

impl<S: KvStore> ScoreGateway<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read the persisted best for a game. Absent or malformed values are
    /// zero, not errors.
    pub fn load(&self, game_key: &str) -> u32 {
        self.store
            .get(game_key)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(0)
    }

    /// Record a final score. Writes through only when it beats the stored
    /// best; returns whether a write happened.
    pub fn record(&mut self, game_key: &str, score: u32) -> bool {
        let best = self.load(game_key);
        if score <= best {
            return false;
        }
        self.store.set(game_key, &score.to_string());
        log::info!("New best for {game_key}: {score} (was {best})");
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
}

impl Default for ScoreGateway<MemoryStore> {
    fn default() -> Self {
        Self::new(MemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reads_zero() {
        let gw = ScoreGateway::default();
        assert_eq!(gw.load("snake.best"), 0);
    }

    #[test]
    fn test_malformed_reads_zero() {
        let mut store = MemoryStore::new();
        store.set("runner.best", "not a number");
        let gw = ScoreGateway::new(store);
        assert_eq!(gw.load("runner.best"), 0);
    }

    #[test]
    fn test_record_keeps_max() {
        let mut gw = ScoreGateway::default();
        assert!(gw.record("snake.best", 5));
        assert_eq!(gw.load("snake.best"), 5);

        // Lower or equal final score leaves the best alone.
        assert!(!gw.record("snake.best", 4));
        assert!(!gw.record("snake.best", 5));
        assert_eq!(gw.load("snake.best"), 5);

        assert!(gw.record("snake.best", 9));
        assert_eq!(gw.load("snake.best"), 9);
    }

    #[test]
    fn test_last_write_wins() {
        let mut store = MemoryStore::new();
        store.set("k", "1");
        store.set("k", "2");
        assert_eq!(store.get("k").as_deref(), Some("2"));
    }
}
