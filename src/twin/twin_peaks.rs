//! Twin peaks: filter B shares its FM source with filter A unless its own
//! FM input is patched, and the output is limited to the rails.

use super::{curve_amount, knob_frames, seeded_engines, DualFilter, Modulations, Patch};
use crate::ripples::engine::RipplesEngine;
use crate::utils::random::DEFAULT_SEED;
use crate::ripples::FilterMode;

/// Output limit in volts.
pub const OUTPUT_LIMIT: f32 = 12.0;

#[derive(Debug, Clone)]
pub struct TwinPeaks {
    engine_a: RipplesEngine,
    engine_b: RipplesEngine,
}

impl Default for TwinPeaks {
    fn default() -> Self {
        Self::new()
    }
}

impl TwinPeaks {
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Voice whose dither is derived from `seed`. Give each channel of a
    /// polyphonic host its own seed.
    pub fn with_seed(seed: u32) -> Self {
        let (engine_a, engine_b) = seeded_engines(seed);

        Self { engine_a, engine_b }
    }

    /// Panel defaults: A at the bottom of its range, B at the top, fully
    /// subtracted, with some resonance.
    pub fn default_patch() -> Patch {
        Patch {
            frequency_a: crate::ripples::FREQ_KNOB_MIN,
            frequency_b: crate::ripples::FREQ_KNOB_MAX,
            resonance: 0.6,
            fm_global_a: 1.0,
            fm_global_b: 1.0,
            curve: 1.0,
            filter_type: FilterMode::Lp3,
            ..Default::default()
        }
    }
}

impl DualFilter for TwinPeaks {
    fn init(&mut self, sample_rate: f32) {
        self.engine_a.set_sample_rate(sample_rate);
        self.engine_b.set_sample_rate(sample_rate);
    }

    fn render(&mut self, patch: &Patch, modulations: &Modulations) -> f32 {
        let (mut frame_a, mut frame_b) = knob_frames(patch);
        let curve = curve_amount(patch, modulations);
        let res_cv = modulations.resonance * patch.resonance_cv_amount;

        frame_b.res_cv = res_cv;
        frame_b.freq_cv = modulations.frequency_b;
        frame_b.fm_cv = if modulations.fm_b_patched {
            modulations.fm_b
        } else {
            modulations.fm_a
        };
        frame_b.input = modulations.input;
        self.engine_b.process(&mut frame_b);

        frame_a.res_cv = res_cv;
        frame_a.freq_cv = modulations.frequency_a;
        frame_a.fm_cv = modulations.fm_a;
        frame_a.input = modulations.input;
        frame_a.b_output = frame_b.output;
        self.engine_a.process(&mut frame_a);

        (frame_a.output - curve * frame_b.output).clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT)
    }
}
