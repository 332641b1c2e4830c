//! Procedural sound effects via the Web Audio API.
//!
//! Every effect is a short list of oscillator tones (see `Sfx::tones`), so no
//! audio files ship with the game. Settings persist through `storage`.

use serde::{Deserialize, Serialize};
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::game::PowerType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudioSettings {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 0.7,
            music_volume: 0.5,
            muted: false,
        }
    }
}

impl AudioSettings {
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Returns the new muted state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume * self.sfx_volume }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Triangle,
    Sawtooth,
}

impl Wave {
    fn oscillator_type(self) -> OscillatorType {
        match self {
            Wave::Sine => OscillatorType::Sine,
            Wave::Triangle => OscillatorType::Triangle,
            Wave::Sawtooth => OscillatorType::Sawtooth,
        }
    }
}

/// One oscillator note. Times are seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    pub duration: f64,
    pub wave: Wave,
    pub volume: f32,
    /// Offset from "now" at which the note starts.
    pub delay: f64,
    /// Random pitch added on playback, 0..jitter Hz.
    pub jitter: f32,
}

impl Tone {
    const fn new(freq: f32, duration: f64, wave: Wave, volume: f32, delay: f64) -> Self {
        Self { freq, duration, wave, volume, delay, jitter: 0.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sfx {
    Keypress,
    WordComplete,
    WordMissed,
    Power(PowerType),
    LevelComplete,
    GameOver,
    /// Carries the current combo count; higher counts pitch up.
    Combo(u32),
    Countdown,
    Go,
}

impl Sfx {
    /// Combo jingle for a completion; only once a combo level is reached.
    pub fn for_combo(combo: u32, has_level: bool) -> Option<Sfx> {
        has_level.then_some(Sfx::Combo(combo))
    }

    pub fn tones(self) -> Vec<Tone> {
        use Wave::*;
        match self {
            Sfx::Keypress => vec![Tone { jitter: 200.0, ..Tone::new(800.0, 0.05, Sine, 0.3, 0.0) }],
            Sfx::WordComplete | Sfx::Go => {
                let dur = if self == Sfx::Go { 0.3 } else { 0.15 };
                chord(&[523.0, 659.0, 784.0], dur, Sine)
            }
            Sfx::WordMissed => vec![
                Tone::new(200.0, 0.2, Sawtooth, 0.4, 0.0),
                Tone::new(150.0, 0.15, Sawtooth, 0.3, 0.05),
            ],
            Sfx::Power(PowerType::Fire) => (0..5)
                .map(|i| Tone::new(300.0 + i as f32 * 100.0, 0.1, Sawtooth, 0.4, i as f64 * 0.03))
                .collect(),
            Sfx::Power(PowerType::Ice) => (0..4)
                .map(|i| Tone::new(1200.0 - i as f32 * 150.0, 0.2, Sine, 0.3, i as f64 * 0.04))
                .collect(),
            Sfx::Power(PowerType::Wind) => (0..6)
                .map(|i| {
                    let f = 400.0 + (i as f32).sin() * 200.0;
                    Tone::new(f, 0.15, Triangle, 0.25, i as f64 * 0.025)
                })
                .collect(),
            Sfx::Power(PowerType::Slow) => vec![
                Tone::new(600.0, 0.3, Sine, 0.3, 0.0),
                Tone::new(400.0, 0.4, Sine, 0.25, 0.1),
            ],
            Sfx::LevelComplete => [523.0, 659.0, 784.0, 1047.0]
                .iter()
                .enumerate()
                .flat_map(|(i, &f)| {
                    let at = i as f64 * 0.15;
                    [Tone::new(f, 0.3, Sine, 0.4, at), Tone::new(f * 1.5, 0.25, Triangle, 0.2, at)]
                })
                .collect(),
            Sfx::GameOver => [392.0, 349.0, 330.0, 262.0]
                .iter()
                .enumerate()
                .map(|(i, &f)| Tone::new(f, 0.4, Sawtooth, 0.35, i as f64 * 0.2))
                .collect(),
            Sfx::Combo(count) => {
                const FREQS: [f32; 4] = [440.0, 494.0, 523.0, 587.0];
                let f = FREQS[(count as usize).min(FREQS.len() - 1)];
                vec![Tone::new(f, 0.12, Sine, 0.35, 0.0), Tone::new(f * 1.5, 0.1, Triangle, 0.2, 0.0)]
            }
            Sfx::Countdown => vec![Tone::new(440.0, 0.15, Sine, 0.4, 0.0)],
        }
    }
}

fn chord(freqs: &[f32], duration: f64, wave: Wave) -> Vec<Tone> {
    freqs
        .iter()
        .enumerate()
        .map(|(i, &f)| Tone::new(f, duration, wave, 1.0, i as f64 * 0.03))
        .collect()
}

/// Plays `Sfx` through oscillators. Without an `AudioContext` every call is a no-op.
pub struct AudioManager {
    ctx: Option<AudioContext>,
    pub settings: AudioSettings,
}

impl AudioManager {
    pub fn new(settings: AudioSettings) -> Self {
        // Creation is deferred: browsers refuse contexts before a user gesture.
        Self { ctx: None, settings }
    }

    fn context(&mut self) -> Option<&AudioContext> {
        if self.ctx.is_none() {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(_) => {
                    log::warn!("Failed to create AudioContext - audio disabled");
                    return None;
                }
            }
        }
        let ctx = self.ctx.as_ref()?;
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    pub fn play(&mut self, sfx: Sfx) {
        let vol = self.settings.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = self.context() else { return };
        for tone in sfx.tones() {
            play_tone(ctx, &tone, vol);
        }
    }
}

fn create_osc(ctx: &AudioContext, freq: f32, wave: Wave) -> Option<(OscillatorNode, GainNode)> {
    let osc = ctx.create_oscillator().ok()?;
    let gain = ctx.create_gain().ok()?;
    osc.set_type(wave.oscillator_type());
    osc.frequency().set_value(freq);
    osc.connect_with_audio_node(&gain).ok()?;
    gain.connect_with_audio_node(&ctx.destination()).ok()?;
    Some((osc, gain))
}

fn play_tone(ctx: &AudioContext, tone: &Tone, vol: f32) {
    let freq = tone.freq + js_sys::Math::random() as f32 * tone.jitter;
    let Some((osc, gain)) = create_osc(ctx, freq, tone.wave) else {
        return;
    };
    let t = ctx.current_time() + tone.delay;
    gain.gain().set_value_at_time(tone.volume * vol * 0.3, t).ok();
    gain.gain()
        .exponential_ramp_to_value_at_time(0.001, t + tone.duration)
        .ok();
    osc.start_with_when(t).ok();
    osc.stop_with_when(t + tone.duration).ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_setters_clamp() {
        let mut s = AudioSettings::default();
        s.set_master_volume(3.0);
        s.set_sfx_volume(-1.0);
        assert_eq!(s.master_volume, 1.0);
        assert_eq!(s.sfx_volume, 0.0);
    }

    #[test]
    fn mute_silences_sfx() {
        let mut s = AudioSettings::default();
        assert!((s.effective_sfx_volume() - 0.7).abs() < 1e-6);
        assert!(s.toggle_mute());
        assert_eq!(s.effective_sfx_volume(), 0.0);
    }

    #[test]
    fn partial_settings_json_keeps_defaults() {
        let s: AudioSettings = serde_json::from_str(r#"{ "muted": true }"#).unwrap();
        assert!(s.muted);
        assert_eq!(s.sfx_volume, 0.7);
    }

    #[test]
    fn combo_jingle_follows_combo_count() {
        assert_eq!(Sfx::for_combo(1, false), None);
        assert_eq!(Sfx::for_combo(1, true), Some(Sfx::Combo(1)));
        let pitch = |n| Sfx::for_combo(n, true).map(|s| s.tones()[0].freq);
        assert_eq!(pitch(2), Some(523.0));
        assert_eq!(pitch(9), Some(587.0));
    }

    #[test]
    fn tone_tables() {
        assert_eq!(Sfx::WordComplete.tones().len(), 3);
        assert_eq!(Sfx::LevelComplete.tones().len(), 8);
        assert_eq!(Sfx::Power(PowerType::Fire).tones().last().map(|t| t.freq), Some(700.0));
        assert_eq!(Sfx::Combo(0).tones()[0].freq, 440.0);
        assert_eq!(Sfx::Combo(12).tones()[0].freq, 587.0);
        let over = Sfx::GameOver.tones();
        assert!((over[3].delay - 0.6).abs() < 1e-9);
    }
}
