//! Dual-filter voices built from two Ripples engines.
//!
//! Filter B runs first and its output modulates the frequency of filter A.
//! The voice output subtracts a variable amount of B from A, turning the
//! pair into a twin-peak resonator when both filters resonate.
//!
//! A voice renders a single channel. Hosts with polyphonic signals keep one
//! voice per channel, each created with its own seed so the channels
//! self-oscillate independently.

pub mod twin_peaks;
pub mod twin_pings;

use crate::ripples::engine::{freq_knob_position, RipplesEngine};
use crate::ripples::{FilterMode, Frame};

/// Mixed into the seed of filter B so it never dithers like filter A.
const ENGINE_B_SEED: u32 = 0x5eed;

pub trait DualFilter {
    fn init(&mut self, sample_rate: f32);

    fn render(&mut self, patch: &Patch, modulations: &Modulations) -> f32;
}

/// Knob and switch settings.
#[derive(Debug, Clone)]
pub struct Patch {
    /// Cutoff of filter A in Hz
    /// Range: 20.0 - 20000.0
    pub frequency_a: f32,

    /// Cutoff of filter B in Hz
    /// Range: 20.0 - 20000.0
    pub frequency_b: f32,

    /// Resonance of both filters
    /// Range: 0.0 - 1.0
    pub resonance: f32,

    /// Attenuverter of the resonance CV
    /// Range: -1.0 - 1.0
    pub resonance_cv_amount: f32,

    /// Range: -1.0 - 1.0
    pub track_a: f32,
    /// Range: -1.0 - 1.0
    pub track_b: f32,

    /// Depth of the audio-rate FM of each filter
    /// Range: -1.0 - 1.0
    pub fm_global_a: f32,
    pub fm_global_b: f32,

    /// Attenuverters of the FM inputs
    /// Range: -1.0 - 1.0
    pub fm_cv_a: f32,
    pub fm_cv_b: f32,

    /// Amount of filter B modulating filter A
    /// Range: -1.0 - 1.0
    pub xfm: f32,

    /// Slope of both filters
    pub filter_type: FilterMode,

    /// Amount of filter B subtracted from filter A
    /// Range: 0.0 - 1.0
    pub curve: f32,

    /// Attenuverter of the curve CV
    /// Range: -1.0 - 1.0
    pub curve_cv_amount: f32,
}

impl Default for Patch {
    fn default() -> Self {
        Self {
            frequency_a: crate::ripples::FREQ_KNOB_MAX,
            frequency_b: crate::ripples::FREQ_KNOB_MAX,
            resonance: 0.0,
            resonance_cv_amount: 0.0,
            track_a: 0.0,
            track_b: 0.0,
            fm_global_a: 0.0,
            fm_global_b: 0.0,
            fm_cv_a: 0.0,
            fm_cv_b: 0.0,
            xfm: 0.0,
            filter_type: FilterMode::Lp4,
            curve: 1.0,
            curve_cv_amount: 0.0,
        }
    }
}

/// Input voltages for one sample.
#[derive(Debug, Default, Clone)]
pub struct Modulations {
    pub input: f32,
    pub resonance: f32,
    pub frequency_a: f32,
    pub frequency_b: f32,
    pub fm_a: f32,
    pub fm_b: f32,
    pub fm_b_patched: bool,
    pub curve: f32,
}

/// Engines A and B for a voice seeded with `seed`.
fn seeded_engines(seed: u32) -> (RipplesEngine, RipplesEngine) {
    (
        RipplesEngine::with_seed(seed),
        RipplesEngine::with_seed(seed ^ ENGINE_B_SEED),
    )
}

/// Frames of filter A and B with the knob settings of `patch` applied.
fn knob_frames(patch: &Patch) -> (Frame, Frame) {
    let frame_a = Frame {
        res_knob: patch.resonance,
        freq_knob: freq_knob_position(patch.frequency_a),
        fm_knob: patch.fm_cv_a,
        fm_global_knob: patch.fm_global_a,
        track_knob: patch.track_a,
        xfm_knob: patch.xfm,
        mode: patch.filter_type,
        ..Default::default()
    };

    let frame_b = Frame {
        res_knob: patch.resonance,
        freq_knob: freq_knob_position(patch.frequency_b),
        fm_knob: patch.fm_cv_b,
        fm_global_knob: patch.fm_global_b,
        track_knob: patch.track_b,
        mode: patch.filter_type,
        ..Default::default()
    };

    (frame_a, frame_b)
}

/// Amount of filter B subtracted from the output.
#[inline]
fn curve_amount(patch: &Patch, modulations: &Modulations) -> f32 {
    (patch.curve + patch.curve_cv_amount * modulations.curve * 0.1).clamp(0.0, 1.0)
}
