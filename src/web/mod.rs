//! Browser shell: canvas, HUD overlays, keyboard input and the frame loop.
//!
//! All state lives in a thread-local `App`; the keydown listener and the
//! `requestAnimationFrame` callback borrow it for the duration of one call.
//! Game events drained each frame drive sound effects and persistence.

pub mod render;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, window};

use crate::audio::{AudioManager, Sfx};
use crate::config::GameConfig;
use crate::game::{Countdown, CountdownStep, Game, GameEvent, Key, LevelSummary};
use crate::game::countdown::GO_LABEL;
use crate::storage::{KeyValueStore, MemoryStore, Records};
use crate::words::WordPool;

pub const CANVAS_WIDTH: u32 = 1920;
pub const CANVAS_HEIGHT: u32 = 1080;

/// Longest frame step fed to the game (tab switches, breakpoints).
const MAX_FRAME_DELTA_MS: f64 = 100.0;

const HUD_STYLE: &str = "position:fixed; font-family:'Fira Code', monospace; font-size:15px; padding:4px 8px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:45; letter-spacing:0.5px;";

type Store = Box<dyn KeyValueStore>;

enum Phase {
    Countdown(Countdown),
    Running,
}

struct App {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    game: Game,
    phase: Phase,
    last_ts: Option<f64>,
    audio: AudioManager,
    records: Records<Store>,
    summary: Option<LevelSummary>,
    high_score: u64,
    new_high_score: bool,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    start_with_config(GameConfig::default())
}

/// Start with a (partial) JSON balance override.
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    start_with_config(config)
}

fn start_with_config(config: GameConfig) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let canvas = ensure_canvas(&doc)?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    ensure_hud(&doc)?;

    let records = open_records();
    let mut pool = WordPool::builtin();
    pool.restore_recent(records.recent_words());
    let seed = js_sys::Date::now() as u64;
    let game = Game::new(config, pool, seed);

    if records.has_played_before() {
        log::info!("Welcome back; high score {}", records.high_score());
    } else {
        log::info!("First game in this browser");
    }

    let app = App {
        canvas,
        ctx,
        game,
        phase: Phase::Countdown(Countdown::new()),
        last_ts: None,
        audio: AudioManager::new(records.audio_settings()),
        high_score: records.high_score(),
        records,
        summary: None,
        new_high_score: false,
    };

    let first_start = APP.with(|cell| cell.replace(Some(app)).is_none());
    if first_start {
        install_keyboard(&doc)?;
        start_loop();
    }
    Ok(())
}

fn ensure_canvas(doc: &Document) -> Result<HtmlCanvasElement, JsValue> {
    if let Some(el) = doc.get_element_by_id("tm-canvas") {
        return Ok(el.dyn_into()?);
    }
    let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
    c.set_id("tm-canvas");
    c.set_width(CANVAS_WIDTH);
    c.set_height(CANVAS_HEIGHT);
    c.set_attribute("style", "position:fixed; left:50%; top:50%; transform:translate(-50%,-50%); max-width:100vw; max-height:100vh; background:#1a1a2e; z-index:20;").ok();
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
    body.append_child(&c)?;
    Ok(c)
}

fn ensure_hud(doc: &Document) -> Result<(), JsValue> {
    let Some(body) = doc.body() else {
        return Ok(());
    };
    let overlays = [
        ("tm-score", "top:10px; left:12px;"),
        ("tm-level", "top:10px; left:180px;"),
        ("tm-meters", "top:10px; left:300px;"),
        ("tm-powers", "top:10px; right:12px;"),
        ("tm-input", "bottom:40px; left:50%; transform:translateX(-50%); font-size:20px;"),
    ];
    for (id, placement) in overlays {
        if doc.get_element_by_id(id).is_some() {
            continue;
        }
        let div = doc.create_element("div")?;
        div.set_id(id);
        div.set_attribute("style", &format!("{HUD_STYLE} {placement}")).ok();
        body.append_child(&div)?;
    }
    Ok(())
}

fn open_records() -> Records<Store> {
    #[cfg(target_arch = "wasm32")]
    if let Some(store) = crate::storage::BrowserStore::open() {
        return Records::new(Box::new(store));
    }
    log::warn!("localStorage unavailable; records will not persist");
    Records::new(Box::new(MemoryStore::new()))
}

fn install_keyboard(doc: &Document) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
        let Some(key) = Key::from_dom(&evt.key()) else {
            return;
        };
        if matches!(key, Key::Space | Key::Backspace) {
            evt.prevent_default();
        }
        APP.with(|cell| {
            if let Some(app) = cell.borrow_mut().as_mut() {
                on_key(app, key);
            }
        });
    }) as Box<dyn FnMut(_)>);
    doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn on_key(app: &mut App, key: Key) {
    if matches!(app.phase, Phase::Countdown(_)) {
        return;
    }
    app.game.handle_key(key);
    process_events(app);
}

fn start_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        APP.with(|cell| {
            if let Some(app) = cell.borrow_mut().as_mut() {
                app_tick(app, ts);
            }
        });
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(f: &FrameCallback) {
    let Some(w) = window() else { return };
    if let Some(cb) = f.borrow().as_ref() {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn app_tick(app: &mut App, ts: f64) {
    let delta = match app.last_ts {
        Some(prev) => (ts - prev).clamp(0.0, MAX_FRAME_DELTA_MS),
        None => 0.0,
    };
    app.last_ts = Some(ts);

    let step = match &mut app.phase {
        Phase::Countdown(countdown) => countdown.tick(delta),
        Phase::Running => {
            app.game.tick(delta);
            None
        }
    };
    match step {
        Some(CountdownStep::Step(GO_LABEL)) => app.audio.play(Sfx::Go),
        Some(CountdownStep::Step(_)) => app.audio.play(Sfx::Countdown),
        Some(CountdownStep::Finished) => {
            log::info!("Round started at level {}", app.game.level());
            app.phase = Phase::Running;
        }
        None => {}
    }

    process_events(app);

    let countdown = match &app.phase {
        Phase::Countdown(c) => c.label(),
        Phase::Running => None,
    };
    let overlay = render::Overlay {
        countdown,
        summary: app.summary,
        high_score: app.high_score,
        new_high_score: app.new_high_score,
    };
    render::draw(
        &app.ctx,
        app.canvas.width() as f64,
        app.canvas.height() as f64,
        &app.game,
        &overlay,
    );
    update_hud(app);
}

fn process_events(app: &mut App) {
    for event in app.game.drain_events() {
        match event {
            GameEvent::Keypress => app.audio.play(Sfx::Keypress),
            GameEvent::WordSpawned { .. } => {
                let recent = app.game.word_pool().recent();
                app.records.save_recent_words(&recent);
            }
            GameEvent::WordCompleted { word, points, combo, combo_label, .. } => {
                app.audio.play(Sfx::WordComplete);
                if let Some(sfx) = Sfx::for_combo(combo, combo_label.is_some()) {
                    app.audio.play(sfx);
                }
                log::debug!("'{}' +{} (combo {} {:?})", word, points, combo, combo_label);
            }
            GameEvent::WordMissed { word } => {
                app.audio.play(Sfx::WordMissed);
                log::debug!("missed '{}'", word);
            }
            GameEvent::PowerCollected(p) => log::info!("Collected {}", p.name()),
            GameEvent::PowerActivated(p) => app.audio.play(Sfx::Power(p)),
            GameEvent::PowerExpired(p) => log::info!("{} wore off", p.name()),
            GameEvent::LevelComplete { .. } => {
                app.audio.play(Sfx::LevelComplete);
                app.summary = Some(app.game.level_summary());
            }
            GameEvent::LevelStarted { .. } => app.summary = None,
            GameEvent::GameOver { score, level } => {
                app.audio.play(Sfx::GameOver);
                record_game_over(app, score, level);
            }
            GameEvent::Reset => {
                app.summary = None;
                app.new_high_score = false;
                app.phase = Phase::Countdown(Countdown::new());
            }
        }
    }
}

fn record_game_over(app: &mut App, score: u64, level: u32) {
    app.new_high_score = app.records.set_high_score(score);
    app.high_score = app.records.high_score();
    let date: String = js_sys::Date::new_0()
        .to_locale_date_string("default", &JsValue::UNDEFINED)
        .into();
    match app.records.add_to_leaderboard(score, level, &date) {
        Some(rank) => log::info!("Leaderboard rank #{}", rank + 1),
        None => log::info!("Score {} did not make the leaderboard", score),
    }
    app.records.mark_as_played();
}

fn update_hud(app: &App) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let game = &app.game;
    if let Some(el) = doc.get_element_by_id("tm-score") {
        el.set_text_content(Some(&format!("Score: {}", game.score())));
    }
    if let Some(el) = doc.get_element_by_id("tm-level") {
        el.set_text_content(Some(&format!("Level {}", game.level())));
    }
    if let Some(el) = doc.get_element_by_id("tm-meters") {
        el.set_text_content(Some(&format!(
            "Limit {:.0}% | Progress {:.0}%",
            game.limit_pct(),
            game.progress_pct()
        )));
    }
    if let Some(el) = doc.get_element_by_id("tm-powers") {
        let mut html = String::new();
        for p in game.power_stack().iter() {
            html.push_str(&format!(
                "<span style='color:{};margin-left:6px;'>{} {}</span>",
                p.color(),
                p.symbol(),
                p.name()
            ));
        }
        if html.is_empty() {
            html.push_str("<span style='color:#6b6b6b;'>no powers</span>");
        }
        el.set_inner_html(&html);
    }
    if let Some(el) = doc.get_element_by_id("tm-input") {
        el.set_text_content(Some(&game.input().to_uppercase()));
    }
}

fn with_app<T>(f: impl FnOnce(&mut App) -> T) -> Option<T> {
    APP.with(|cell| cell.borrow_mut().as_mut().map(f))
}

/// Current `GameData` as JSON (empty string before `start_game`).
#[wasm_bindgen]
pub fn game_snapshot() -> String {
    with_app(|app| serde_json::to_string(&app.game.snapshot()).unwrap_or_default()).unwrap_or_default()
}

/// Returns the new muted state.
#[wasm_bindgen]
pub fn toggle_mute() -> bool {
    with_app(|app| {
        let muted = app.audio.settings.toggle_mute();
        app.records.save_audio_settings(&app.audio.settings);
        muted
    })
    .unwrap_or(false)
}

#[wasm_bindgen]
pub fn set_master_volume(vol: f32) {
    with_app(|app| {
        app.audio.settings.set_master_volume(vol);
        app.records.save_audio_settings(&app.audio.settings);
    });
}

#[wasm_bindgen]
pub fn set_sfx_volume(vol: f32) {
    with_app(|app| {
        app.audio.settings.set_sfx_volume(vol);
        app.records.save_audio_settings(&app.audio.settings);
    });
}

#[wasm_bindgen]
pub fn high_score() -> u64 {
    with_app(|app| app.high_score).unwrap_or_else(|| open_records().high_score())
}

#[wasm_bindgen]
pub fn leaderboard_json() -> String {
    let board = with_app(|app| app.records.leaderboard()).unwrap_or_else(|| open_records().leaderboard());
    serde_json::to_string(&board).unwrap_or_else(|_| "[]".to_string())
}
