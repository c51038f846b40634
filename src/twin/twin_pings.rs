//! Twin pings: resonance CV reaches filter A unattenuated and the output is
//! not limited.

use super::{curve_amount, knob_frames, seeded_engines, DualFilter, Modulations, Patch};
use crate::ripples::engine::RipplesEngine;
use crate::utils::random::DEFAULT_SEED;

#[derive(Debug, Clone)]
pub struct TwinPings {
    engine_a: RipplesEngine,
    engine_b: RipplesEngine,
}

impl Default for TwinPings {
    fn default() -> Self {
        Self::new()
    }
}

impl TwinPings {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Voice whose dither is derived from `seed`. Give each channel of a
    /// polyphonic host its own seed.
    pub fn with_seed(seed: u32) -> Self {
        let (engine_a, engine_b) = seeded_engines(seed);

        Self { engine_a, engine_b }
    }
}

impl DualFilter for TwinPings {
    fn init(&mut self, sample_rate: f32) {
        self.engine_a.set_sample_rate(sample_rate);
        self.engine_b.set_sample_rate(sample_rate);
    }

    fn render(&mut self, patch: &Patch, modulations: &Modulations) -> f32 {
        let (mut frame_a, mut frame_b) = knob_frames(patch);
        let curve = curve_amount(patch, modulations);

        frame_b.res_cv = modulations.resonance * patch.resonance_cv_amount;
        frame_b.freq_cv = modulations.frequency_b;
        frame_b.fm_cv = modulations.fm_b;
        frame_b.input = modulations.input;
        self.engine_b.process(&mut frame_b);

        frame_a.res_cv = modulations.resonance;
        frame_a.freq_cv = modulations.frequency_a;
        frame_a.fm_cv = modulations.fm_a;
        frame_a.input = modulations.input;
        frame_a.b_output = frame_b.output;
        self.engine_a.process(&mut frame_a);

        frame_a.output - curve * frame_b.output
    }
}
