//! Typing Maniac core crate.
//!
//! Words fall down a canvas playfield; type them before they reach the danger
//! zone. The rules engine (`game`) is plain Rust and runs natively in tests;
//! `web` wires it to the DOM, Web Audio and `localStorage`.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod config;
pub mod game;
pub mod storage;
pub mod web;
pub mod words;

pub use config::{ConfigError, GameConfig};
pub use game::{FallingWord, Game, GameData, GameEvent, GameState, Key, LevelSummary, PowerStack, PowerType};
pub use storage::{KeyValueStore, LeaderboardEntry, MemoryStore, Records};
pub use web::{game_snapshot, high_score, leaderboard_json, start_game, start_game_with_config, toggle_mute};
pub use words::{WordListError, WordPool};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    let _ = console_log::init_with_level(log::Level::Info);
}
