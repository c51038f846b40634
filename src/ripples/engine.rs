//! Single channel of the Ripples filter.
//!
//! Converts knobs and CVs into the control signals of the filter core,
//! runs the core at the oversampled rate between the anti-aliasing filters
//! and writes the decimated outputs back into the [`Frame`].

// Based on GPL-licensed code (c) 2020 by Tyler Coy

#[allow(unused_imports)]
use num_traits::float::Float;

use super::aa_filter::AaFilter;
use super::device::v_to_i_converter;
use super::ladder::Ladder;
use super::*;
use crate::utils::float4::Float4;
use crate::utils::random::{Random, DEFAULT_SEED};

/// Sample rate assumed until [`RipplesEngine::set_sample_rate`] is called,
/// also substituted for unusable rates.
pub const MIN_SAMPLE_RATE: f32 = 1.0;

pub const MAX_SAMPLE_RATE: f32 = 768_000.0;

#[derive(Debug, Clone)]
pub struct RipplesEngine {
    sample_time: f32,
    aa_filter: AaFilter,
    ladder: Ladder,
    random: Random,
}

impl Default for RipplesEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RipplesEngine {
    /// Engine with the default dither seed. Engines sharing a seed dither
    /// identically, so hosts running one engine per channel should use
    /// [`RipplesEngine::with_seed`] with a different seed for each channel.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    pub fn with_seed(seed: u32) -> Self {
        let mut engine = Self {
            sample_time: 1.0,
            aa_filter: AaFilter::new(),
            ladder: Ladder::new(),
            random: Random::new(seed),
        };
        engine.set_sample_rate(MIN_SAMPLE_RATE);

        engine
    }

    /// Seeds the dither generator. Engines with different seeds self-oscillate
    /// with unrelated phases.
    pub fn seed(&mut self, seed: u32) {
        self.random.seed(seed);
    }

    /// Recomputes all filter coefficients for `sample_rate` in Hz and
    /// resets the filter state.
    ///
    /// Must not be called concurrently with [`RipplesEngine::process`].
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let sample_rate = if sample_rate.is_finite() && sample_rate >= MIN_SAMPLE_RATE {
            sample_rate.min(MAX_SAMPLE_RATE)
        } else {
            log::warn!(
                "Unsupported sample rate {}, using {} Hz",
                sample_rate,
                MIN_SAMPLE_RATE
            );
            MIN_SAMPLE_RATE
        };

        self.sample_time = 1.0 / sample_rate;
        self.aa_filter.init(sample_rate);

        let oversampling_factor = self.aa_filter.oversampling_factor();
        self.ladder.init(sample_rate * oversampling_factor as f32);

        log::debug!(
            "Sample rate {} Hz, oversampling factor {}",
            sample_rate,
            oversampling_factor
        );
    }

    #[inline]
    pub fn oversampling_factor(&self) -> usize {
        self.aa_filter.oversampling_factor()
    }

    /// Voltages of the four filter cells.
    #[inline]
    pub fn cell_voltage(&self) -> Float4 {
        self.ladder.cell_voltage()
    }

    /// Renders one sample. Reads the knobs, CVs and input of `frame` and
    /// sets its outputs.
    pub fn process(&mut self, frame: &mut Frame) {
        // Add noise to the input to bootstrap self-oscillation.
        let input = frame.input + DITHER_AMPLITUDE * (self.random.get_float() - 0.5);

        let v_oct = frequency_cv(frame);

        let i_reso = v_to_i_converter(
            RES_AMP_R,
            frame.res_cv,
            RES_INPUT_R,
            frame.res_knob * RES_KNOB_V,
            RES_KNOB_R,
        );

        // Pack and upsample the inputs.
        let oversampling_factor = self.aa_filter.oversampling_factor();
        let timestep = self.sample_time / oversampling_factor as f32;
        let inputs = Float4::new(input, v_oct, i_reso, 0.0) * oversampling_factor as f32;
        let mut outputs = Float4::ZERO;

        for i in 0..oversampling_factor {
            let upsampled = self
                .aa_filter
                .process_up(if i == 0 { inputs } else { Float4::ZERO });
            let core = self.ladder.process(upsampled, timestep);
            outputs = self.aa_filter.process_down(core);
        }

        let [bp2, lp2, lp3, lp4] = outputs.0;
        frame.bp2 = bp2;
        frame.lp2 = lp2;
        frame.lp3 = lp3;
        frame.lp4 = lp4;
        frame.output = match frame.mode {
            FilterMode::Lp2 => lp2,
            FilterMode::Lp3 => lp3,
            FilterMode::Lp4 => lp4,
        };
    }
}

/// Equivalent 1V/octave control of the frame, relative to the maximum
/// cutoff. Never positive: the frequency knob sets the upper limit.
#[inline]
pub fn frequency_cv(frame: &Frame) -> f32 {
    let mut v_oct = (frame.freq_knob - 1.0) * FREQ_KNOB_VOLTAGE;
    v_oct += frame.freq_cv;
    v_oct += frame.fm_cv * frame.fm_knob;
    v_oct += frame.fm_global_knob
        * (frame.track_knob * frame.input + frame.xfm_knob * frame.b_output);
    v_oct.min(0.0)
}

/// Maps a cutoff frequency in Hz to the position of the frequency knob.
#[inline]
pub fn freq_knob_position(frequency: f32) -> f32 {
    crate::utils::rescale(
        frequency.log2(),
        FREQ_KNOB_MIN.log2(),
        FREQ_KNOB_MAX.log2(),
        0.0,
        1.0,
    )
}
