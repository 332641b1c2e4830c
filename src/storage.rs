//! Local key-value persistence: high score, leaderboard, first-play flag,
//! recent words and audio settings.
//!
//! All records are small JSON / plain strings behind a `KeyValueStore`, which is
//! `window.localStorage` in the browser and a `HashMap` everywhere else.
//! Storage problems are logged and otherwise ignored; they never stop a game.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::audio::AudioSettings;
use crate::words::MAX_RECENT_WORDS;

pub const HIGH_SCORE_KEY: &str = "typingmaniac_highscore";
pub const HAS_PLAYED_KEY: &str = "typingmaniac_hasplayed";
pub const LEADERBOARD_KEY: &str = "typingmaniac_leaderboard";
pub const RECENT_WORDS_KEY: &str = "recentWords";
pub const AUDIO_SETTINGS_KEY: &str = "typingmaniac_audiosettings";

/// Entries kept on the local leaderboard.
pub const MAX_LEADERBOARD_ENTRIES: usize = 5;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key)
    }
}

/// In-memory store (native builds and tests).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// `window.localStorage` (WASM only).
#[cfg(target_arch = "wasm32")]
pub struct BrowserStore {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl BrowserStore {
    /// `None` when storage is unavailable (private mode, sandboxed iframe).
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()?;
        Some(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if self.storage.set_item(key, value).is_err() {
            log::warn!("localStorage write failed for '{}'", key);
        }
    }

    fn remove(&mut self, key: &str) {
        let _ = self.storage.remove_item(key);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub score: u64,
    pub level: u32,
    /// Locale date string at the time the score was set.
    pub date: String,
}

/// Typed access to every persisted record.
pub struct Records<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Records<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn high_score(&self) -> u64 {
        self.store
            .get(HIGH_SCORE_KEY)
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Stores `score` only if it beats the current high score.
    pub fn set_high_score(&mut self, score: u64) -> bool {
        if score > self.high_score() {
            self.store.set(HIGH_SCORE_KEY, &score.to_string());
            log::info!("New high score: {}", score);
            return true;
        }
        false
    }

    pub fn has_played_before(&self) -> bool {
        self.store.get(HAS_PLAYED_KEY).as_deref() == Some("true")
    }

    pub fn mark_as_played(&mut self) {
        self.store.set(HAS_PLAYED_KEY, "true");
    }

    pub fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let Some(json) = self.store.get(LEADERBOARD_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str(&json) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Ignoring unreadable leaderboard: {}", e);
                Vec::new()
            }
        }
    }

    /// Insert a finished game. Returns the 0-based rank, or `None` when the
    /// score did not make the top `MAX_LEADERBOARD_ENTRIES`.
    pub fn add_to_leaderboard(&mut self, score: u64, level: u32, date: &str) -> Option<usize> {
        let mut board = self.leaderboard();
        board.push(LeaderboardEntry { score, level, date: date.to_string() });
        // stable sort: earlier entries win ties
        board.sort_by(|a, b| b.score.cmp(&a.score));
        board.truncate(MAX_LEADERBOARD_ENTRIES);

        match serde_json::to_string(&board) {
            Ok(json) => self.store.set(LEADERBOARD_KEY, &json),
            Err(e) => log::warn!("Leaderboard not saved: {}", e),
        }

        board.iter().position(|e| e.score == score && e.date == date)
    }

    pub fn is_new_high_score(&self, score: u64) -> bool {
        match self.leaderboard().first() {
            Some(best) => score > best.score,
            None => score > 0,
        }
    }

    pub fn recent_words(&self) -> Vec<String> {
        self.store
            .get(RECENT_WORDS_KEY)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    /// Persist the tail of `words` (at most `MAX_RECENT_WORDS`).
    pub fn save_recent_words(&mut self, words: &[String]) {
        let tail = &words[words.len().saturating_sub(MAX_RECENT_WORDS)..];
        if let Ok(json) = serde_json::to_string(tail) {
            self.store.set(RECENT_WORDS_KEY, &json);
        }
    }

    pub fn clear_recent_words(&mut self) {
        self.store.remove(RECENT_WORDS_KEY);
    }

    /// Stored fields are layered over the defaults.
    pub fn audio_settings(&self) -> AudioSettings {
        self.store
            .get(AUDIO_SETTINGS_KEY)
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save_audio_settings(&mut self, settings: &AudioSettings) {
        if let Ok(json) = serde_json::to_string(settings) {
            self.store.set(AUDIO_SETTINGS_KEY, &json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Records<MemoryStore> {
        Records::new(MemoryStore::new())
    }

    #[test]
    fn high_score_only_increases() {
        let mut r = records();
        assert_eq!(r.high_score(), 0);
        assert!(r.set_high_score(120));
        assert!(!r.set_high_score(80));
        assert!(!r.set_high_score(120));
        assert_eq!(r.high_score(), 120);
    }

    #[test]
    fn corrupt_high_score_reads_as_zero() {
        let mut store = MemoryStore::new();
        store.set(HIGH_SCORE_KEY, "lots");
        assert_eq!(Records::new(store).high_score(), 0);
    }

    #[test]
    fn played_flag() {
        let mut r = records();
        assert!(!r.has_played_before());
        r.mark_as_played();
        assert!(r.has_played_before());
    }

    #[test]
    fn corrupt_leaderboard_is_empty() {
        let mut store = MemoryStore::new();
        store.set(LEADERBOARD_KEY, "[{oops");
        assert!(Records::new(store).leaderboard().is_empty());
    }
}
