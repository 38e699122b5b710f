//! Randomness seam for word-pair and role selection.
//!
//! Every random decision in a session goes through [`RandomSource::pick`], so a
//! test (or a replay) can drive assignment with a known sequence of indices.

use rand::Rng;

pub trait RandomSource {
    /// Uniformly picks an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Replays a fixed list of picks, wrapping each value into range and cycling
/// once the list runs out.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    picks: Vec<usize>,
    cursor: usize,
}

impl ScriptedRandom {
    pub fn new(picks: impl Into<Vec<usize>>) -> Self {
        Self { picks: picks.into(), cursor: 0 }
    }

    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn pick(&mut self, len: usize) -> usize {
        if self.picks.is_empty() {
            return 0;
        }

        let value = self.picks[self.cursor % self.picks.len()];
        self.cursor += 1;
        value % len
    }
}
