// Persistence tests against the in-memory store.

use typing_maniac::audio::AudioSettings;
use typing_maniac::storage::{
    AUDIO_SETTINGS_KEY, KeyValueStore, LEADERBOARD_KEY, MAX_LEADERBOARD_ENTRIES, MemoryStore, Records,
};

fn records() -> Records<MemoryStore> {
    Records::new(MemoryStore::new())
}

#[test]
fn leaderboard_keeps_top_five_descending() {
    let mut r = records();
    for (i, score) in [300, 100, 500, 200, 400].into_iter().enumerate() {
        r.add_to_leaderboard(score, 1, &format!("day {i}"));
    }
    assert_eq!(r.add_to_leaderboard(50, 1, "day 5"), None);
    assert_eq!(r.add_to_leaderboard(450, 3, "day 6"), Some(1));

    let board = r.leaderboard();
    assert_eq!(board.len(), MAX_LEADERBOARD_ENTRIES);
    let scores: Vec<u64> = board.iter().map(|e| e.score).collect();
    assert_eq!(scores, vec![500, 450, 400, 300, 200]);
    assert_eq!(board[1].level, 3);
}

#[test]
fn leaderboard_json_shape() {
    let mut r = records();
    r.add_to_leaderboard(120, 2, "1/2/2026");
    let raw = r.store().get(LEADERBOARD_KEY).unwrap();
    assert_eq!(raw, r#"[{"score":120,"level":2,"date":"1/2/2026"}]"#);
}

#[test]
fn new_high_score_against_leaderboard() {
    let mut r = records();
    assert!(!r.is_new_high_score(0));
    assert!(r.is_new_high_score(1));
    r.add_to_leaderboard(200, 1, "today");
    assert!(!r.is_new_high_score(200));
    assert!(r.is_new_high_score(201));
}

#[test]
fn recent_words_keep_only_the_tail() {
    let mut r = records();
    let words: Vec<String> = (0..60).map(|i| format!("w{i}")).collect();
    r.save_recent_words(&words);
    let loaded = r.recent_words();
    assert_eq!(loaded.len(), 50);
    assert_eq!(loaded.first().map(String::as_str), Some("w10"));
    r.clear_recent_words();
    assert!(r.recent_words().is_empty());
}

#[test]
fn audio_settings_round_trip_over_defaults() {
    let mut store = MemoryStore::new();
    store.set(AUDIO_SETTINGS_KEY, r#"{"masterVolume":0.25}"#);
    let mut r = Records::new(store);
    let mut s = r.audio_settings();
    assert_eq!(s.master_volume, 0.25);
    assert_eq!(s, AudioSettings { master_volume: 0.25, ..AudioSettings::default() });

    s.toggle_mute();
    r.save_audio_settings(&s);
    assert!(r.audio_settings().muted);
}
