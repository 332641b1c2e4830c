//! Gameplay rules engine.
//!
//! Words spawn at the top of the playfield and fall toward the danger zone.
//! The player types them; completions build score, combo and the progress
//! meter, misses fill the limit meter. Collected power tokens are activated by
//! typing their name.
//!
//! The engine is pure: no DOM, no clock. The browser shell (`crate::web`)
//! feeds it keys and frame deltas, then drains `GameEvent`s for audio,
//! persistence and logging.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::config::GameConfig;
use crate::words::WordPool;

pub mod combo;
pub mod countdown;
pub mod power;

pub use combo::{ComboLevel, ComboTable};
pub use countdown::{Countdown, CountdownStep};
pub use power::{PowerStack, PowerType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameState {
    Playing,
    LevelComplete,
    GameOver,
}

/// A word on its way down.
#[derive(Clone, Debug, PartialEq)]
pub struct FallingWord {
    pub text: String,
    pub x: f64,
    pub y: f64,
    /// Pixels per frame at 60 fps.
    pub speed: f64,
    pub frozen: bool,
    pub power: Option<PowerType>,
}

impl FallingWord {
    pub fn new(text: impl Into<String>, x: f64, y: f64, speed: f64) -> Self {
        Self { text: text.into(), x, y, speed, frozen: false, power: None }
    }

    pub fn with_power(mut self, power: PowerType) -> Self {
        self.power = Some(power);
        self
    }
}

/// Keys the engine understands (mapped from `KeyboardEvent.key`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Letter(char),
    Digit(char),
    Backspace,
    Enter,
    Space,
    Escape,
}

impl Key {
    pub fn from_dom(key: &str) -> Option<Key> {
        match key {
            "Backspace" => Some(Key::Backspace),
            "Enter" => Some(Key::Enter),
            " " | "Spacebar" => Some(Key::Space),
            "Escape" | "Esc" => Some(Key::Escape),
            _ => {
                let mut chars = key.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                if c.is_ascii_alphabetic() {
                    Some(Key::Letter(c))
                } else if c.is_ascii_digit() {
                    Some(Key::Digit(c))
                } else {
                    None
                }
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Keypress,
    WordSpawned { word: String, power: Option<PowerType> },
    WordCompleted {
        word: String,
        points: u64,
        combo: u32,
        combo_label: Option<String>,
        power: Option<PowerType>,
    },
    WordMissed { word: String },
    PowerCollected(PowerType),
    PowerActivated(PowerType),
    PowerExpired(PowerType),
    LevelComplete { level: u32 },
    LevelStarted { level: u32 },
    GameOver { score: u64, level: u32 },
    Reset,
}

/// Snapshot handed to the HUD (and to JS as JSON).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    pub score: u64,
    pub level: u32,
    pub limit_pct: f64,
    pub progress_pct: f64,
    pub power_stack: Vec<PowerType>,
    pub words_completed: u32,
    pub words_missed: u32,
    pub input: String,
    pub game_state: GameState,
    pub combo: u32,
    pub active_power: Option<PowerType>,
}

/// End-of-level bonus breakdown.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelSummary {
    pub accuracy: f64,
    pub accuracy_bonus: u64,
    pub error_free_bonus: u64,
    pub total: u64,
}

pub struct Game {
    config: GameConfig,
    combo_table: ComboTable,
    words_pool: WordPool,
    rng: Pcg32,

    words: Vec<FallingWord>,
    input: String,
    state: GameState,

    score: u64,
    level: u32,
    limit_pct: f64,
    progress_pct: f64,
    words_completed: u32,
    words_missed: u32,
    combo: u32,

    power_stack: PowerStack,
    active_power: Option<PowerType>,
    power_timer_ms: f64,
    slow_factor: f64,
    spawn_timer_ms: f64,

    events: Vec<GameEvent>,
}

impl Game {
    pub fn new(config: GameConfig, words_pool: WordPool, seed: u64) -> Self {
        let combo_table = ComboTable::from_config(&config.combo);
        let power_stack = PowerStack::new(config.powers.max_stack);
        Self {
            config,
            combo_table,
            words_pool,
            rng: Pcg32::seed_from_u64(seed),
            words: Vec::new(),
            input: String::new(),
            state: GameState::Playing,
            score: 0,
            level: 1,
            limit_pct: 0.0,
            progress_pct: 0.0,
            words_completed: 0,
            words_missed: 0,
            combo: 0,
            power_stack,
            active_power: None,
            power_timer_ms: 0.0,
            slow_factor: 1.0,
            spawn_timer_ms: 0.0,
            events: Vec::new(),
        }
    }

    // --- Accessors ------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
    pub fn state(&self) -> GameState {
        self.state
    }
    pub fn words(&self) -> &[FallingWord] {
        &self.words
    }
    pub fn input(&self) -> &str {
        &self.input
    }
    pub fn score(&self) -> u64 {
        self.score
    }
    pub fn level(&self) -> u32 {
        self.level
    }
    pub fn limit_pct(&self) -> f64 {
        self.limit_pct
    }
    pub fn progress_pct(&self) -> f64 {
        self.progress_pct
    }
    pub fn combo(&self) -> u32 {
        self.combo
    }
    pub fn words_completed(&self) -> u32 {
        self.words_completed
    }
    pub fn words_missed(&self) -> u32 {
        self.words_missed
    }
    pub fn power_stack(&self) -> &PowerStack {
        &self.power_stack
    }
    pub fn active_power(&self) -> Option<PowerType> {
        self.active_power
    }
    pub fn slow_factor(&self) -> f64 {
        self.slow_factor
    }
    pub fn power_timer_ms(&self) -> f64 {
        self.power_timer_ms
    }
    pub fn word_pool(&self) -> &WordPool {
        &self.words_pool
    }
    pub fn combo_table(&self) -> &ComboTable {
        &self.combo_table
    }

    pub fn snapshot(&self) -> GameData {
        GameData {
            score: self.score,
            level: self.level,
            limit_pct: self.limit_pct,
            progress_pct: self.progress_pct,
            power_stack: self.power_stack.as_slice().to_vec(),
            words_completed: self.words_completed,
            words_missed: self.words_missed,
            input: self.input.clone(),
            game_state: self.state,
            combo: self.combo,
            active_power: self.active_power,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Place a word directly (scripted levels, tests).
    pub fn push_word(&mut self, word: FallingWord) {
        self.words.push(word);
    }

    // --- Input ----------------------------------------------------------------

    pub fn handle_key(&mut self, key: Key) {
        match self.state {
            GameState::GameOver => {
                if key == Key::Space {
                    self.reset();
                }
            }
            GameState::LevelComplete => {
                if matches!(key, Key::Enter | Key::Space) {
                    self.continue_after_level_complete();
                }
            }
            GameState::Playing => self.handle_playing_key(key),
        }
    }

    fn handle_playing_key(&mut self, key: Key) {
        match key {
            Key::Digit(d) if self.config.debug.power_hotkeys => {
                let slot = d.to_digit(10).unwrap_or(0) as usize;
                if let Some(power) = slot.checked_sub(1).and_then(|i| PowerType::ALL.get(i).copied()) {
                    if self.power_stack.push(power) {
                        self.events.push(GameEvent::PowerCollected(power));
                    }
                }
            }
            Key::Backspace => {
                self.input.pop();
            }
            Key::Escape => self.input.clear(),
            Key::Letter(c) if c.is_ascii_alphabetic() => {
                self.input.push(c.to_ascii_lowercase());
                self.events.push(GameEvent::Keypress);
                self.check_word_match();
            }
            _ => {}
        }
    }

    /// Power names take precedence over falling words.
    pub fn check_word_match(&mut self) {
        if let Some(power) = PowerType::from_typed(&self.input) {
            if self.power_stack.contains(power) {
                self.activate_power(power);
                self.input.clear();
                return;
            }
        }
        if let Some(idx) = self.target_index() {
            if self.words[idx].text == self.input {
                self.complete_word(idx);
            }
        }
    }

    /// Lowest on-screen word whose text starts with the current input.
    /// Nothing is targeted until at least one letter is typed.
    pub fn target_index(&self) -> Option<usize> {
        if self.input.is_empty() {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        for (i, w) in self.words.iter().enumerate() {
            if !w.text.starts_with(self.input.as_str()) {
                continue;
            }
            if best.is_none_or(|(_, y)| w.y > y) {
                best = Some((i, w.y));
            }
        }
        best.map(|(i, _)| i)
    }

    /// Number of letters of word `idx` already typed (0 unless it is the target).
    pub fn matched_len(&self, idx: usize) -> usize {
        if self.input.is_empty() || self.target_index() != Some(idx) {
            0
        } else {
            self.input.len()
        }
    }

    // --- Powers ---------------------------------------------------------------

    pub fn activate_power(&mut self, power: PowerType) {
        self.power_stack.take(power);
        self.active_power = Some(power);
        for w in &mut self.words {
            w.frozen = false;
        }
        self.slow_factor = 1.0;
        self.power_timer_ms = 0.0;

        match power {
            PowerType::Fire => {
                self.score += self.words.len() as u64 * self.config.scoring.fire_points_per_word;
                self.words.clear();
            }
            PowerType::Ice => {
                for w in &mut self.words {
                    w.frozen = true;
                }
                self.power_timer_ms = self.config.powers.ice_duration;
            }
            PowerType::Slow => {
                self.slow_factor = self.config.powers.slow_factor;
                self.power_timer_ms = self.config.powers.slow_duration;
            }
            PowerType::Wind => {
                self.limit_pct = 0.0;
            }
        }
        log::info!("Power activated: {}", power.name());
        self.events.push(GameEvent::PowerActivated(power));
    }

    // --- Scoring --------------------------------------------------------------

    fn complete_word(&mut self, idx: usize) {
        let word = self.words.remove(idx);
        self.combo += 1;

        let combo_level = self.combo_table.level_for(self.combo);
        let multiplier = combo_level.map(|l| l.multiplier).unwrap_or(1.0);
        let combo_label = combo_level.map(|l| l.text.clone());
        let base = word.text.len() as u64 * self.config.scoring.points_per_letter;
        let points = (base as f64 * multiplier).floor() as u64;

        self.score += points;
        self.words_completed += 1;
        self.progress_pct = (self.progress_pct + self.config.progress_pct_per_word(self.level)).min(100.0);

        if let Some(power) = word.power {
            if self.power_stack.is_full() {
                log::debug!("power stack full; {} dropped", power.name());
            } else if self.power_stack.push(power) {
                self.events.push(GameEvent::PowerCollected(power));
            }
        }
        self.input.clear();
        self.events.push(GameEvent::WordCompleted {
            word: word.text,
            points,
            combo: self.combo,
            combo_label,
            power: word.power,
        });

        if self.progress_pct >= 100.0 && self.state == GameState::Playing {
            self.state = GameState::LevelComplete;
            log::info!("Level {} complete (score {})", self.level, self.score);
            self.events.push(GameEvent::LevelComplete { level: self.level });
        }
    }

    pub fn accuracy(&self) -> f64 {
        let total = self.words_completed + self.words_missed;
        if total == 0 {
            return 100.0;
        }
        self.words_completed as f64 / total as f64 * 100.0
    }

    pub fn level_summary(&self) -> LevelSummary {
        let accuracy = self.accuracy();
        let accuracy_bonus = (accuracy / 100.0 * self.level as f64 * 10.0).floor() as u64;
        let error_free_bonus = if self.words_missed == 0 { self.level as u64 * 20 } else { 0 };
        LevelSummary {
            accuracy,
            accuracy_bonus,
            error_free_bonus,
            total: accuracy_bonus + error_free_bonus,
        }
    }

    // --- Frame update ---------------------------------------------------------

    pub fn tick(&mut self, delta_ms: f64) {
        if self.state != GameState::Playing {
            return;
        }
        self.update_power_timer(delta_ms);
        self.spawn_words(delta_ms);
        self.move_words(delta_ms);
        self.check_missed_words();
    }

    fn update_power_timer(&mut self, delta_ms: f64) {
        if self.power_timer_ms <= 0.0 {
            return;
        }
        self.power_timer_ms -= delta_ms;
        if self.power_timer_ms > 0.0 {
            return;
        }
        self.power_timer_ms = 0.0;
        self.slow_factor = 1.0;
        for w in &mut self.words {
            w.frozen = false;
        }
        if let Some(expired) = self.active_power.take() {
            self.events.push(GameEvent::PowerExpired(expired));
        }
    }

    fn spawn_words(&mut self, delta_ms: f64) {
        if self.active_power == Some(PowerType::Ice) {
            return;
        }
        self.spawn_timer_ms += delta_ms;
        if self.spawn_timer_ms >= self.config.spawn_delay_ms(self.level) {
            self.spawn_timer_ms = 0.0;
            self.spawn_word();
        }
    }

    fn spawn_word(&mut self) {
        let length = self.config.word_length(self.level);
        let Some(text) = self.words_pool.pick(length, &mut self.rng) else {
            log::warn!("Word pool is empty; nothing to spawn");
            return;
        };
        let speed = self.config.fall_speed(self.level, self.rng.random::<f64>());

        let power = if self.rng.random::<f64>() < self.config.power_drop_rate(self.level) {
            Some(PowerType::ALL[self.rng.random_range(0..PowerType::ALL.len())])
        } else {
            None
        };

        let arena = &self.config.arena;
        let x = self.rng.random::<f64>() * (arena.width - arena.spawn_margin_right) + arena.spawn_margin_left;
        let y = arena.spawn_y;

        log::debug!("spawn '{}' speed={:.2} power={:?}", text, speed, power);
        self.events.push(GameEvent::WordSpawned { word: text.clone(), power });
        self.words.push(FallingWord { text, x, y, speed, frozen: false, power });
    }

    fn move_words(&mut self, delta_ms: f64) {
        let frames = 60.0 * delta_ms / 1000.0;
        for w in &mut self.words {
            if !w.frozen {
                w.y += w.speed * self.slow_factor * frames;
            }
        }
    }

    fn check_missed_words(&mut self) {
        let line = self.config.arena.danger_zone_y - self.config.arena.word_height;
        let (missed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.words).into_iter().partition(|w| w.y >= line);
        self.words = kept;

        for word in missed {
            self.words_missed += 1;
            self.combo = 0;
            self.limit_pct += self.config.difficulty.limit_pct_per_missed;
            self.events.push(GameEvent::WordMissed { word: word.text });
            if self.limit_pct >= 100.0 {
                self.limit_pct = 100.0;
                if self.state != GameState::GameOver {
                    self.state = GameState::GameOver;
                    log::info!("Game over at level {} with score {}", self.level, self.score);
                    self.events.push(GameEvent::GameOver { score: self.score, level: self.level });
                }
            }
        }
    }

    // --- Transitions ----------------------------------------------------------

    fn clear_round(&mut self) {
        self.words.clear();
        self.input.clear();
        self.limit_pct = 0.0;
        self.progress_pct = 0.0;
        self.words_completed = 0;
        self.words_missed = 0;
        self.combo = 0;
        self.spawn_timer_ms = 0.0;
        self.active_power = None;
        self.power_timer_ms = 0.0;
        self.slow_factor = 1.0;
    }

    /// Full restart after a game over; the power stack is emptied too.
    pub fn reset(&mut self) {
        self.clear_round();
        self.score = 0;
        self.level = 1;
        self.power_stack.clear();
        self.state = GameState::Playing;
        log::info!("Game reset");
        self.events.push(GameEvent::Reset);
    }

    /// Bank the level bonus and start the next level. Collected powers carry over.
    pub fn continue_after_level_complete(&mut self) {
        if self.state != GameState::LevelComplete {
            return;
        }
        self.score += self.level_summary().total;
        self.level += 1;
        self.clear_round();
        self.state = GameState::Playing;
        log::info!("Level {} started", self.level);
        self.events.push(GameEvent::LevelStarted { level: self.level });
    }
}
