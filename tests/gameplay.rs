// Native integration tests driving the rules engine through its public API,
// the same way the browser shell does: keys in, frame deltas in, events out.

use proptest::prelude::*;
use typing_maniac::storage::{MemoryStore, Records};
use typing_maniac::{FallingWord, Game, GameConfig, GameEvent, GameState, Key, PowerType, WordPool};

fn new_game() -> Game {
    Game::new(GameConfig::default(), WordPool::builtin(), 2024)
}

fn debug_game() -> Game {
    let mut config = GameConfig::default();
    config.debug.power_hotkeys = true;
    Game::new(config, WordPool::builtin(), 2024)
}

fn type_str(game: &mut Game, text: &str) {
    for c in text.chars() {
        game.handle_key(Key::Letter(c));
    }
}

/// Complete `n` words placed high on the screen.
fn complete_words(game: &mut Game, n: usize) {
    for i in 0..n {
        let text = ["amber", "bloom", "cider", "dream", "ember", "fable", "ghost", "heart", "ivory"][i % 9];
        game.push_word(FallingWord::new(text, 100.0, 10.0, 1.0));
        type_str(game, text);
    }
}

#[test]
fn nine_words_complete_a_level() {
    let mut game = new_game();
    complete_words(&mut game, 8);
    assert_eq!(game.state(), GameState::Playing);
    assert!((game.progress_pct() - 96.0).abs() < 1e-9);

    complete_words(&mut game, 1);
    assert_eq!(game.state(), GameState::LevelComplete);
    assert_eq!(game.progress_pct(), 100.0);
    let events = game.drain_events();
    assert!(events.contains(&GameEvent::LevelComplete { level: 1 }));

    // frozen while the summary is up
    game.tick(10_000.0);
    assert!(game.words().is_empty());
}

#[test]
fn words_stay_put_outside_playing() {
    let mut game = new_game();
    complete_words(&mut game, 9);
    assert_eq!(game.state(), GameState::LevelComplete);
    game.push_word(FallingWord::new("still", 200.0, 300.0, 2.0));
    game.tick(1000.0);
    assert_eq!(game.words().len(), 1);
    assert_eq!(game.words()[0].y, 300.0);

    let mut game = new_game();
    for i in 0..10 {
        game.push_word(FallingWord::new(format!("x{i}"), 0.0, 2000.0, 1.0));
    }
    game.tick(16.0);
    assert_eq!(game.state(), GameState::GameOver);
    game.push_word(FallingWord::new("still", 200.0, 300.0, 2.0));
    game.tick(1000.0);
    assert_eq!(game.words().len(), 1);
    assert_eq!(game.words()[0].y, 300.0);
}

#[test]
fn full_power_stack_drops_new_tokens_silently() {
    let mut game = debug_game();
    for _ in 0..6 {
        game.handle_key(Key::Digit('3'));
    }
    game.handle_key(Key::Digit('1'));
    assert_eq!(game.power_stack().len(), 6);
    game.drain_events();

    game.push_word(FallingWord::new("comet", 0.0, 10.0, 1.0).with_power(PowerType::Ice));
    type_str(&mut game, "comet");
    assert_eq!(game.words_completed(), 1);
    assert_eq!(game.power_stack().len(), 6);
    assert!(game.power_stack().iter().all(|p| p == PowerType::Wind));
    assert!(!game
        .drain_events()
        .iter()
        .any(|e| matches!(e, GameEvent::PowerCollected(_))));
}

#[test]
fn first_letter_picks_the_target() {
    let mut game = new_game();
    game.push_word(FallingWord::new("amber", 0.0, 100.0, 1.0));
    game.push_word(FallingWord::new("bloom", 0.0, 400.0, 1.0));
    assert_eq!(game.target_index(), None);
    game.handle_key(Key::Letter('a'));
    assert_eq!(game.target_index(), Some(0));
    game.handle_key(Key::Escape);
    assert_eq!(game.target_index(), None);
}

#[test]
fn continuing_banks_bonus_and_keeps_powers() {
    let mut game = debug_game();
    game.handle_key(Key::Digit('2'));
    complete_words(&mut game, 9);
    assert_eq!(game.state(), GameState::LevelComplete);

    let before = game.score();
    let summary = game.level_summary();
    // perfect level 1: accuracy 10 + error free 20
    assert_eq!(summary.total, 30);

    game.handle_key(Key::Letter('x'));
    assert_eq!(game.state(), GameState::LevelComplete);
    game.handle_key(Key::Enter);

    assert_eq!(game.state(), GameState::Playing);
    assert_eq!(game.level(), 2);
    assert_eq!(game.score(), before + 30);
    assert_eq!(game.progress_pct(), 0.0);
    assert_eq!(game.combo(), 0);
    assert_eq!(game.power_stack().as_slice(), &[PowerType::Ice]);
    assert!(game.drain_events().contains(&GameEvent::LevelStarted { level: 2 }));
}

#[test]
fn combo_tiers_multiply_points() {
    let mut game = new_game();
    let mut points = Vec::new();
    for i in 0..8 {
        let text = ["amber", "bloom", "cider", "dream", "ember", "fable", "ghost", "heart"][i];
        game.push_word(FallingWord::new(text, 0.0, 0.0, 1.0));
        type_str(&mut game, text);
        for e in game.drain_events() {
            if let GameEvent::WordCompleted { points: p, combo_label, .. } = e {
                points.push((p, combo_label));
            }
        }
    }
    // 5 letters = 50 base
    let got: Vec<u64> = points.iter().map(|(p, _)| *p).collect();
    assert_eq!(got, vec![60, 60, 75, 75, 100, 100, 100, 150]);
    assert_eq!(points[7].1.as_deref(), Some("FANTASTIC"));
}

#[test]
fn game_over_then_space_restarts_everything() {
    let mut game = debug_game();
    game.handle_key(Key::Digit('1'));
    for i in 0..10 {
        game.push_word(FallingWord::new(format!("x{i}"), 0.0, 2000.0, 1.0));
    }
    game.tick(16.0);
    assert_eq!(game.state(), GameState::GameOver);
    assert_eq!(game.limit_pct(), 100.0);

    game.handle_key(Key::Enter);
    assert_eq!(game.state(), GameState::GameOver);
    game.handle_key(Key::Space);
    assert_eq!(game.state(), GameState::Playing);
    assert!(game.power_stack().is_empty());
    assert_eq!(game.words_missed(), 0);
    assert!(game.drain_events().contains(&GameEvent::Reset));
}

#[test]
fn wind_saves_a_nearly_lost_game() {
    let mut game = debug_game();
    game.handle_key(Key::Digit('3'));
    for i in 0..9 {
        game.push_word(FallingWord::new(format!("x{i}"), 0.0, 2000.0, 1.0));
    }
    game.tick(16.0);
    assert!((game.limit_pct() - 90.0).abs() < 1e-9);

    type_str(&mut game, "wind");
    assert_eq!(game.limit_pct(), 0.0);
    assert!(game.input().is_empty());
    assert!(game.drain_events().contains(&GameEvent::PowerActivated(PowerType::Wind)));
}

#[test]
fn slow_then_fire_cancels_the_timer() {
    let mut game = debug_game();
    game.handle_key(Key::Digit('4'));
    game.handle_key(Key::Digit('1'));
    type_str(&mut game, "slow");
    assert_eq!(game.slow_factor(), 0.3);
    type_str(&mut game, "fire");
    assert_eq!(game.slow_factor(), 1.0);
    assert_eq!(game.power_timer_ms(), 0.0);
    assert_eq!(game.active_power(), Some(PowerType::Fire));
}

#[test]
fn spawned_words_are_remembered_for_persistence() {
    let mut game = new_game();
    let delay = game.config().spawn_delay_ms(1);
    for _ in 0..5 {
        game.tick(delay + 1.0);
    }
    let spawned: Vec<String> = game
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::WordSpawned { word, .. } => Some(word),
            _ => None,
        })
        .collect();
    assert_eq!(spawned.len(), 5);
    assert_eq!(game.word_pool().recent(), spawned);

    let mut records = Records::new(MemoryStore::new());
    records.save_recent_words(&game.word_pool().recent());
    let mut pool = WordPool::builtin();
    pool.restore_recent(records.recent_words());
    assert_eq!(pool.recent(), spawned);
}

#[test]
fn snapshot_serializes_for_the_hud() {
    let mut game = new_game();
    type_str(&mut game, "ab");
    let json = serde_json::to_value(game.snapshot()).unwrap();
    assert_eq!(json["level"], 1);
    assert_eq!(json["input"], "ab");
    assert_eq!(json["gameState"], "playing");
    assert_eq!(json["powerStack"], serde_json::json!([]));
}

#[test]
fn custom_config_changes_balance() {
    let json = r#"{ "scoring": { "pointsPerLetter": 1 }, "combo": { "levels": [] } }"#;
    let config = GameConfig::from_json(json).unwrap();
    let mut game = Game::new(config, WordPool::builtin(), 3);
    game.push_word(FallingWord::new("tree", 0.0, 0.0, 1.0));
    type_str(&mut game, "tree");
    assert_eq!(game.score(), 4);
}

proptest! {
    #[test]
    fn meters_and_stack_stay_in_bounds(
        ops in proptest::collection::vec(0u8..11, 0..200),
        ticks in proptest::collection::vec(0.0f64..100.0, 0..200),
    ) {
        let mut game = debug_game();
        for (i, op) in ops.iter().enumerate() {
            match op {
                0..=3 => game.handle_key(Key::Digit(char::from(b'1' + op))),
                4 => type_str(&mut game, "fi"),
                5 => game.handle_key(Key::Space),
                6 => game.handle_key(Key::Enter),
                7 => game.handle_key(Key::Backspace),
                8 => {
                    // completion, sometimes carrying a power
                    let word = FallingWord::new("tree", 100.0, 10.0, 1.0);
                    let word = if i % 2 == 0 { word.with_power(PowerType::Slow) } else { word };
                    game.push_word(word);
                    game.handle_key(Key::Escape);
                    type_str(&mut game, "tree");
                }
                9 => game.push_word(FallingWord::new("gone", 0.0, 2000.0, 1.0)),
                _ => game.push_word(FallingWord::new("rock", 0.0, 500.0, 3.0)),
            }
            if let Some(dt) = ticks.get(i) {
                game.tick(*dt);
            }
            prop_assert!(game.power_stack().len() <= 6);
            prop_assert!((0.0..=100.0).contains(&game.limit_pct()));
            prop_assert!((0.0..=100.0).contains(&game.progress_pct()));
            prop_assert!(game.input().chars().all(|c| c.is_ascii_lowercase()));
        }
    }
}
