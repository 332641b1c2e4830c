//! Combo threshold table: consecutive completions -> score multiplier + label.

use crate::config::ComboConfig;

const COMBO_COLORS: [&str; 4] = ["#4CAF50", "#2196F3", "#FF9800", "#E91E63"];

#[derive(Clone, Debug, PartialEq)]
pub struct ComboLevel {
    pub min_words: u32,
    pub text: String,
    pub multiplier: f64,
    pub color: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ComboTable {
    levels: Vec<ComboLevel>, // ascending by min_words (validated in config)
}

impl ComboTable {
    pub fn from_config(config: &ComboConfig) -> Self {
        let levels = config
            .levels
            .iter()
            .enumerate()
            .map(|(i, l)| ComboLevel {
                min_words: l.min_words,
                text: l.text.clone(),
                multiplier: l.multiplier,
                color: Self::color(i),
            })
            .collect();
        Self { levels }
    }

    /// Highest level reached by `count` consecutive completions.
    pub fn level_for(&self, count: u32) -> Option<&ComboLevel> {
        self.levels.iter().rev().find(|l| count >= l.min_words)
    }

    pub fn multiplier_for(&self, count: u32) -> f64 {
        self.level_for(count).map(|l| l.multiplier).unwrap_or(1.0)
    }

    pub fn color(index: usize) -> &'static str {
        COMBO_COLORS.get(index).copied().unwrap_or("#ffffff")
    }

    pub fn levels(&self) -> &[ComboLevel] {
        &self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ComboTable {
        ComboTable::from_config(&ComboConfig::default())
    }

    #[test]
    fn no_level_before_first_threshold() {
        assert!(table().level_for(0).is_none());
        assert_eq!(table().multiplier_for(0), 1.0);
    }

    #[test]
    fn picks_highest_reached_level() {
        let t = table();
        assert_eq!(t.level_for(1).unwrap().text, "GOOD");
        assert_eq!(t.level_for(2).unwrap().text, "GOOD");
        assert_eq!(t.level_for(4).unwrap().text, "GREAT");
        assert_eq!(t.level_for(7).unwrap().text, "PERFECT");
        assert_eq!(t.level_for(42).unwrap().text, "FANTASTIC");
        assert_eq!(t.multiplier_for(8), 3.0);
    }

    #[test]
    fn colors_cycle_then_default() {
        assert_eq!(table().level_for(3).unwrap().color, "#2196F3");
        assert_eq!(ComboTable::color(9), "#ffffff");
    }
}
