//! Pre-round "3, 2, 1, Start typing!" sequence.

pub const GO_LABEL: &str = "Start typing!";

const SEQUENCE: [(&str, f64); 4] = [("3", 800.0), ("2", 800.0), ("1", 800.0), (GO_LABEL, 1000.0)];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownStep {
    /// A new label became current.
    Step(&'static str),
    Finished,
}

#[derive(Clone, Debug, Default)]
pub struct Countdown {
    index: usize,
    elapsed_ms: f64,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current label, or `None` once the sequence has run out.
    pub fn label(&self) -> Option<&'static str> {
        SEQUENCE.get(self.index).map(|(label, _)| *label)
    }

    pub fn is_finished(&self) -> bool {
        self.index >= SEQUENCE.len()
    }

    /// Fraction of the current step elapsed, 0..=1.
    pub fn phase(&self) -> f64 {
        match SEQUENCE.get(self.index) {
            Some((_, dur)) => (self.elapsed_ms / dur).clamp(0.0, 1.0),
            None => 1.0,
        }
    }

    /// Advance by `delta_ms`. Reports at most one transition per call; a very
    /// large delta carries over into the following ticks.
    pub fn tick(&mut self, delta_ms: f64) -> Option<CountdownStep> {
        let (_, dur) = *SEQUENCE.get(self.index)?;
        self.elapsed_ms += delta_ms;
        if self.elapsed_ms < dur {
            return None;
        }
        self.elapsed_ms -= dur;
        self.index += 1;
        Some(match self.label() {
            Some(label) => CountdownStep::Step(label),
            None => CountdownStep::Finished,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_through_all_labels() {
        let mut c = Countdown::new();
        assert_eq!(c.label(), Some("3"));
        assert_eq!(c.tick(500.0), None);
        assert_eq!(c.tick(300.0), Some(CountdownStep::Step("2")));
        assert_eq!(c.tick(800.0), Some(CountdownStep::Step("1")));
        assert_eq!(c.tick(800.0), Some(CountdownStep::Step(GO_LABEL)));
        assert!(!c.is_finished());
        assert_eq!(c.tick(1000.0), Some(CountdownStep::Finished));
        assert!(c.is_finished());
        assert_eq!(c.tick(1000.0), None);
    }

    #[test]
    fn big_delta_carries_over() {
        let mut c = Countdown::new();
        assert_eq!(c.tick(1700.0), Some(CountdownStep::Step("2")));
        assert_eq!(c.tick(0.0), Some(CountdownStep::Step("1")));
        assert!((c.phase() - 100.0 / 800.0).abs() < 1e-9);
    }
}
