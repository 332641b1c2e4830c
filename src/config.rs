//! Data-driven game balance.
//!
//! Every tunable of the rules engine lives here so a JSON file (same section
//! layout as `gameConfig.json`) can override any subset of it. Missing fields
//! fall back to the built-in defaults below.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Frames per second the difficulty numbers were tuned at.
pub const TUNED_FPS: f64 = 60.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Playfield geometry, in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArenaConfig {
    pub width: f64,
    pub height: f64,
    /// Words whose bottom edge reaches this line are missed.
    pub danger_zone_y: f64,
    /// Rendered height of a word; the bottom edge is `y + word_height`.
    pub word_height: f64,
    pub spawn_y: f64,
    pub spawn_margin_left: f64,
    pub spawn_margin_right: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 1650.0,
            height: 1080.0,
            danger_zone_y: 930.0,
            word_height: 42.0,
            spawn_y: -45.0,
            spawn_margin_left: 30.0,
            spawn_margin_right: 225.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordsPerLevel {
    pub min_level: u32,
    pub max_level: u32,
    pub words: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProgressionConfig {
    pub words_per_level: Vec<WordsPerLevel>,
    /// Used when no `words_per_level` row covers the level.
    pub progress_pct_per_word: f64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            words_per_level: Vec::new(),
            progress_pct_per_word: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringConfig {
    pub points_per_letter: u64,
    pub fire_points_per_word: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_letter: 10,
            fire_points_per_word: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComboLevelConfig {
    pub min_words: u32,
    pub text: String,
    pub multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComboConfig {
    pub levels: Vec<ComboLevelConfig>,
}

impl Default for ComboConfig {
    fn default() -> Self {
        let row = |min_words, text: &str, multiplier| ComboLevelConfig {
            min_words,
            text: text.to_string(),
            multiplier,
        };
        Self {
            levels: vec![
                row(1, "GOOD", 1.2),
                row(3, "GREAT", 1.5),
                row(5, "PERFECT", 2.0),
                row(8, "FANTASTIC", 3.0),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DifficultyConfig {
    /// Pixels per frame at 60 fps.
    pub base_fall_speed: f64,
    pub speed_increase_per_level: f64,
    /// Total width of the random speed band, centered on 1.0.
    pub speed_jitter: f64,
    /// Frames at 60 fps.
    pub spawn_delay_base: f64,
    pub spawn_delay_decrease_per_level: f64,
    pub min_spawn_delay: f64,
    pub limit_pct_per_missed: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            base_fall_speed: 1.5,
            speed_increase_per_level: 0.15,
            speed_jitter: 0.4,
            spawn_delay_base: 90.0,
            spawn_delay_decrease_per_level: 5.0,
            min_spawn_delay: 30.0,
            limit_pct_per_missed: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PowersConfig {
    pub drop_rate_base: f64,
    pub drop_rate_increase_per_level: f64,
    pub drop_rate_max: f64,
    /// Milliseconds.
    pub ice_duration: f64,
    /// Milliseconds.
    pub slow_duration: f64,
    pub slow_factor: f64,
    pub max_stack: usize,
}

impl Default for PowersConfig {
    fn default() -> Self {
        Self {
            drop_rate_base: 0.05,
            drop_rate_increase_per_level: 0.02,
            drop_rate_max: 0.25,
            ice_duration: 5000.0,
            slow_duration: 5000.0,
            slow_factor: 0.3,
            max_stack: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WordGenerationConfig {
    pub base_word_length: usize,
    pub word_length_increase_per_levels: u32,
    pub max_word_length: usize,
}

impl Default for WordGenerationConfig {
    fn default() -> Self {
        Self {
            base_word_length: 4,
            word_length_increase_per_levels: 3,
            max_word_length: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DebugConfig {
    /// Keys 1..4 push fire/ice/wind/slow onto the power stack.
    pub power_hotkeys: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub arena: ArenaConfig,
    pub progression: ProgressionConfig,
    pub scoring: ScoringConfig,
    pub combo: ComboConfig,
    pub difficulty: DifficultyConfig,
    pub powers: PowersConfig,
    pub word_generation: WordGenerationConfig,
    pub debug: DebugConfig,
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if self.arena.danger_zone_y <= self.arena.spawn_y {
            return invalid(format!(
                "dangerZoneY ({}) must be below spawnY ({})",
                self.arena.danger_zone_y, self.arena.spawn_y
            ));
        }
        if self.arena.width <= self.arena.spawn_margin_right {
            return invalid("arena width must exceed spawnMarginRight".into());
        }
        if self.powers.max_stack == 0 {
            return invalid("maxStack must be at least 1".into());
        }
        if !(self.powers.slow_factor > 0.0 && self.powers.slow_factor <= 1.0) {
            return invalid(format!("slowFactor {} outside (0, 1]", self.powers.slow_factor));
        }
        for (name, ms) in [
            ("iceDuration", self.powers.ice_duration),
            ("slowDuration", self.powers.slow_duration),
        ] {
            if !(ms.is_finite() && ms > 0.0) {
                return invalid(format!("{name} must be a positive number of ms, got {ms}"));
            }
        }
        if self.difficulty.min_spawn_delay <= 0.0 {
            return invalid("minSpawnDelay must be positive".into());
        }
        for row in &self.progression.words_per_level {
            if row.words == 0 {
                return invalid(format!(
                    "wordsPerLevel row {}..={} has zero words",
                    row.min_level, row.max_level
                ));
            }
        }
        let mut prev: Option<u32> = None;
        for level in &self.combo.levels {
            if !(level.multiplier.is_finite() && level.multiplier > 0.0) {
                return invalid(format!("combo '{}' has bad multiplier", level.text));
            }
            if let Some(p) = prev {
                if level.min_words <= p {
                    return invalid("combo levels must be ascending by minWords".into());
                }
            }
            prev = Some(level.min_words);
        }
        Ok(())
    }

    pub fn words_per_level(&self, level: u32) -> Option<u32> {
        self.progression
            .words_per_level
            .iter()
            .find(|w| level >= w.min_level && level <= w.max_level)
            .map(|w| w.words)
    }

    pub fn progress_pct_per_word(&self, level: u32) -> f64 {
        match self.words_per_level(level) {
            Some(words) => 100.0 / words as f64,
            None => self.progression.progress_pct_per_word,
        }
    }

    /// Milliseconds between spawns.
    pub fn spawn_delay_ms(&self, level: u32) -> f64 {
        let d = &self.difficulty;
        let frames = (d.spawn_delay_base - level as f64 * d.spawn_delay_decrease_per_level)
            .max(d.min_spawn_delay);
        frames * (1000.0 / TUNED_FPS)
    }

    /// `jitter` is a uniform sample in [0, 1).
    pub fn fall_speed(&self, level: u32, jitter: f64) -> f64 {
        let d = &self.difficulty;
        let base = d.base_fall_speed + level.saturating_sub(1) as f64 * d.speed_increase_per_level;
        base * (1.0 - d.speed_jitter / 2.0 + jitter * d.speed_jitter)
    }

    pub fn power_drop_rate(&self, level: u32) -> f64 {
        let p = &self.powers;
        (p.drop_rate_base + level.saturating_sub(1) as f64 * p.drop_rate_increase_per_level)
            .min(p.drop_rate_max)
    }

    pub fn word_length(&self, level: u32) -> usize {
        let w = &self.word_generation;
        let every = w.word_length_increase_per_levels.max(1);
        (w.base_word_length + (level.saturating_sub(1) / every) as usize).min(w.max_word_length)
    }
}
