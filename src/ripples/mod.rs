//! Emulation of the Ripples four-pole resonant filter.
//!
//! The filter core is simulated as a small nonlinear ODE system integrated
//! at an oversampled rate. Control voltages are converted to currents with
//! models of the hardware voltage-to-current converters, and resonance is
//! injected through an OTA model.
//!
//! Circuit values below are the component values of the hardware. Derived
//! constants are computed from them so the relationships stay visible.

// Based on GPL-licensed code (c) 2020 by Tyler Coy

pub mod aa_filter;
pub mod device;
pub mod engine;
pub mod ladder;

const M_PI_F: f32 = core::f32::consts::PI;

// Frequency knob
pub const FREQ_KNOB_MIN: f32 = 20.0;
pub const FREQ_KNOB_MAX: f32 = 20000.0;
/// Span of the frequency knob in octaves, `log2(FREQ_KNOB_MAX / FREQ_KNOB_MIN)`.
pub const FREQ_KNOB_VOLTAGE: f32 = 9.965_784;

// Frequency CV amplifier. The 2164's gain constant is -33mV/dB; multiplied
// by 6dB/V it gives the nominal gain of the amplifier.
pub const VCA_GAIN_CONSTANT: f32 = -33e-3;
/// `20 * log10(2)`
pub const PLUS_6DB: f32 = 6.020_6;
pub const FREQ_AMP_GAIN: f32 = VCA_GAIN_CONSTANT * PLUS_6DB;
pub const FREQ_INPUT_R: f32 = 100e3;
pub const FREQ_AMP_R: f32 = -FREQ_AMP_GAIN * FREQ_INPUT_R;
pub const FREQ_AMP_C: f32 = 560e-12;

// Resonance CV amplifier
pub const RES_INPUT_R: f32 = 22e3;
pub const RES_KNOB_V: f32 = 12.0;
pub const RES_KNOB_R: f32 = 62e3;
pub const RES_AMP_R: f32 = 47e3;
pub const RES_AMP_C: f32 = 560e-12;

// Gain CV amplifier
pub const GAIN_AMP_R: f32 = 47e3;
pub const GAIN_AMP_C: f32 = 560e-12;

// Filter core
pub const FILTER_MAX_CUTOFF: f32 = FREQ_KNOB_MAX;
pub const FILTER_CELL_R: f32 = 33e3;
pub const FILTER_CELL_RC: f32 = 1.0 / (2.0 * M_PI_F * FILTER_MAX_CUTOFF);
pub const FILTER_CELL_C: f32 = FILTER_CELL_RC / FILTER_CELL_R;
pub const FILTER_INPUT_R: f32 = 100e3;
pub const FILTER_INPUT_GAIN: f32 = FILTER_CELL_R / FILTER_INPUT_R;
pub const FILTER_CELL_SELF_MODULATION: f32 = 0.01;

// Filter core feedback path
pub const FEEDBACK_RT: f32 = 22e3;
pub const FEEDBACK_RB: f32 = 1e3;
pub const FEEDBACK_R: f32 = FEEDBACK_RT + FEEDBACK_RB;
pub const FEEDBACK_GAIN: f32 = FEEDBACK_RB / FEEDBACK_R;

// Filter core feedforward path
pub const FEEDFORWARD_RT: f32 = 300e3;
pub const FEEDFORWARD_RB: f32 = 1e3;
pub const FEEDFORWARD_R: f32 = FEEDFORWARD_RT + FEEDFORWARD_RB;
pub const FEEDFORWARD_GAIN: f32 = FEEDFORWARD_RB / FEEDFORWARD_R;
pub const FEEDFORWARD_C: f32 = 220e-9;

// Filter output amplifiers
pub const LP2_GAIN: f32 = -100e3 / 39e3;
pub const LP3_GAIN: f32 = -100e3 / 36e3;
pub const LP4_GAIN: f32 = -100e3 / 33e3;
pub const BP2_GAIN: f32 = -100e3 / 39e3;

/// Saturation voltage at the collector of the V-to-I converter transistors.
pub const VTOI_COLLECTOR_VSAT: f32 = -10.0;

/// Opamp saturation voltage.
pub const OPAMP_SAT_V: f32 = 10.6;

/// Amplitude of the noise added to the input to bootstrap self-oscillation.
pub const DITHER_AMPLITUDE: f32 = 1e-6;

/// Low-pass output routed to [`Frame::output`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// 2-pole, 12dB/octave
    Lp2,
    /// 3-pole, 18dB/octave
    Lp3,
    /// 4-pole, 24dB/octave
    #[default]
    Lp4,
}

impl FilterMode {
    /// Converts the position of a three-way switch (-1, 0, 1) to a mode.
    /// Values in between are rounded, values outside are clamped.
    pub fn from_switch(value: f32) -> Self {
        if value < -0.5 {
            Self::Lp2
        } else if value < 0.5 {
            Self::Lp3
        } else {
            Self::Lp4
        }
    }

    /// Number of poles of the selected output.
    pub fn poles(self) -> usize {
        match self {
            Self::Lp2 => 2,
            Self::Lp3 => 3,
            Self::Lp4 => 4,
        }
    }
}

/// Per-sample input and output of [`engine::RipplesEngine::process`].
#[derive(Debug, Default, Clone)]
pub struct Frame {
    /// Resonance knob
    /// Range: 0.0 - 1.0
    pub res_knob: f32,

    /// Frequency knob position, logarithmic between 20Hz and 20kHz
    /// Range: 0.0 - 1.0
    pub freq_knob: f32,

    /// Attenuverter for `fm_cv`
    /// Range: -1.0 - 1.0
    pub fm_knob: f32,

    /// Depth of the audio-rate FM bus (`track_knob` and `xfm_knob` sources)
    /// Range: -1.0 - 1.0
    pub fm_global_knob: f32,

    /// Amount of the filter input fed back to its own frequency
    /// Range: -1.0 - 1.0
    pub track_knob: f32,

    /// Amount of `b_output` modulating the frequency
    /// Range: -1.0 - 1.0
    pub xfm_knob: f32,

    /// Selects the low-pass output copied to `output`.
    pub mode: FilterMode,

    /// Resonance CV in volts.
    pub res_cv: f32,

    /// Frequency CV in volts, 1V/octave.
    pub freq_cv: f32,

    /// FM CV in volts, scaled by `fm_knob`.
    pub fm_cv: f32,

    /// Audio input in volts.
    pub input: f32,

    /// Gain CV in volts. Kept for host parity, the output VCA is not modelled.
    pub gain_cv: f32,
    pub gain_cv_present: bool,

    /// Output of a partner filter used as cross-FM source.
    pub b_output: f32,

    /// 2-pole band-pass output
    pub bp2: f32,
    /// 2-pole low-pass output
    pub lp2: f32,
    /// 3-pole low-pass output
    pub lp3: f32,
    /// 4-pole low-pass output
    pub lp4: f32,
    /// Low-pass output selected by `mode`
    pub output: f32,
}
