//! Canvas drawing for the playfield. Flat colors only, no sprites.

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::game::{FallingWord, Game, GameState, LevelSummary};

const BACKGROUND: &str = "#1a1a2e";
const PANEL: &str = "#16213e";
const DANGER: &str = "rgba(255,82,82,0.85)";
const MATCHED: &str = "#4CAF50";
const TARGET: &str = "#4fc3f7";
const FROZEN: &str = "#a8e6ff";
const PLAIN: &str = "#ffffff";

const WORD_FONT: &str = "bold 36px 'Fira Code', monospace";
const PLATE_PAD: f64 = 8.0;

/// Extra state the shell wants drawn on top of the game.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay<'a> {
    pub countdown: Option<&'a str>,
    pub summary: Option<LevelSummary>,
    pub high_score: u64,
    pub new_high_score: bool,
}

pub fn draw(ctx: &CanvasRenderingContext2d, width: f64, height: f64, game: &Game, overlay: &Overlay) {
    let arena = &game.config().arena;

    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, width, height);
    ctx.set_fill_style_str(PANEL);
    ctx.fill_rect(arena.width, 0.0, width - arena.width, height);

    // danger line
    ctx.set_fill_style_str(DANGER);
    ctx.fill_rect(0.0, arena.danger_zone_y, arena.width, 3.0);

    draw_meters(ctx, game, arena.width, width, height);

    ctx.set_font(WORD_FONT);
    ctx.set_text_baseline("top");
    ctx.set_text_align("left");
    let target = game.target_index();
    for (i, word) in game.words().iter().enumerate() {
        let matched = if target == Some(i) { game.matched_len(i) } else { 0 };
        draw_word(ctx, word, target == Some(i), matched);
    }

    draw_input(ctx, game.input(), arena.width / 2.0, arena.danger_zone_y + 40.0);

    if let Some(label) = overlay.countdown {
        draw_banner(ctx, width, height, label, None);
    }
    match game.state() {
        GameState::LevelComplete => {
            let detail = overlay.summary.map(|s| {
                format!(
                    "Accuracy {:.0}%  +{} accuracy  +{} error-free   (Enter to continue)",
                    s.accuracy, s.accuracy_bonus, s.error_free_bonus
                )
            });
            let title = format!("LEVEL {} COMPLETE", game.level());
            draw_banner(ctx, width, height, &title, detail.as_deref());
        }
        GameState::GameOver => {
            let detail = if overlay.new_high_score {
                format!("NEW HIGH SCORE {}   (Space to play again)", game.score())
            } else {
                format!("Score {}   Best {}   (Space to play again)", game.score(), overlay.high_score)
            };
            draw_banner(ctx, width, height, "GAME OVER", Some(&detail));
        }
        GameState::Playing => {}
    }
}

fn text_width(ctx: &CanvasRenderingContext2d, text: &str) -> f64 {
    ctx.measure_text(text).map(|m| m.width()).unwrap_or(0.0)
}

fn draw_word(ctx: &CanvasRenderingContext2d, word: &FallingWord, is_target: bool, matched: usize) {
    let total = text_width(ctx, &word.text);

    if let Some(power) = word.power {
        ctx.set_fill_style_str(power.color());
        rounded_rect(ctx, word.x - PLATE_PAD, word.y - PLATE_PAD / 2.0, total + PLATE_PAD * 2.0, 44.0, 10.0).ok();
        ctx.fill();
    }

    let rest = if is_target {
        TARGET
    } else if word.frozen {
        FROZEN
    } else {
        PLAIN
    };

    let mut x = word.x;
    for (i, ch) in word.text.char_indices() {
        let s = &word.text[i..i + ch.len_utf8()];
        ctx.set_fill_style_str(if i < matched { MATCHED } else { rest });
        ctx.fill_text(s, x, word.y).ok();
        x += text_width(ctx, s);
    }
}

fn draw_input(ctx: &CanvasRenderingContext2d, input: &str, cx: f64, y: f64) {
    let w = 420.0;
    ctx.set_fill_style_str("rgba(0,0,0,0.45)");
    rounded_rect(ctx, cx - w / 2.0, y, w, 60.0, 12.0).ok();
    ctx.fill();
    ctx.set_fill_style_str("#ffd166");
    ctx.set_text_align("center");
    ctx.fill_text(&input.to_uppercase(), cx, y + 12.0).ok();
    ctx.set_text_align("left");
}

fn draw_meters(ctx: &CanvasRenderingContext2d, game: &Game, left: f64, width: f64, height: f64) {
    let bar_w = 48.0;
    let bar_h = height * 0.6;
    let top = height * 0.2;
    let gap = (width - left - bar_w * 2.0) / 3.0;

    let meters = [
        ("LIMIT", game.limit_pct(), "#ff5252"),
        ("PROGRESS", game.progress_pct(), "#4CAF50"),
    ];
    ctx.set_font("14px 'Fira Code', monospace");
    ctx.set_text_align("center");
    ctx.set_text_baseline("top");
    for (i, (label, pct, color)) in meters.iter().enumerate() {
        let x = left + gap + i as f64 * (bar_w + gap);
        ctx.set_fill_style_str("#0f0f1e");
        ctx.fill_rect(x, top, bar_w, bar_h);
        let filled = bar_h * (pct / 100.0).clamp(0.0, 1.0);
        ctx.set_fill_style_str(color);
        ctx.fill_rect(x, top + bar_h - filled, bar_w, filled);
        ctx.set_fill_style_str(PLAIN);
        ctx.fill_text(label, x + bar_w / 2.0, top + bar_h + 10.0).ok();
    }
}

fn draw_banner(ctx: &CanvasRenderingContext2d, width: f64, height: f64, title: &str, detail: Option<&str>) {
    let cy = height / 2.0;
    ctx.set_fill_style_str("rgba(0,0,0,0.55)");
    ctx.fill_rect(0.0, cy - 110.0, width, 220.0);

    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    ctx.set_fill_style_str(PLAIN);
    ctx.set_font("bold 72px 'Fira Code', monospace");
    ctx.fill_text(title, width / 2.0, cy - 20.0).ok();
    if let Some(detail) = detail {
        ctx.set_font("24px 'Fira Code', monospace");
        ctx.fill_text(detail, width / 2.0, cy + 50.0).ok();
    }
    ctx.set_text_align("left");
    ctx.set_text_baseline("top");
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) -> Result<(), JsValue> {
    let r = r.min(w / 2.0).min(h / 2.0);
    ctx.begin_path();
    ctx.move_to(x + r, y);
    ctx.arc_to(x + w, y, x + w, y + h, r)?;
    ctx.arc_to(x + w, y + h, x, y + h, r)?;
    ctx.arc_to(x, y + h, x, y, r)?;
    ctx.arc_to(x, y, x + w, y, r)?;
    ctx.close_path();
    Ok(())
}
