//! Anti-aliasing filters for the oversampled filter core.
//!
//! The same low-pass cascade is used for interpolation and decimation. The
//! upsampling side is fed with zero-stuffed input: the host sample scaled by
//! the oversampling factor on the first sub-sample and zero on the others,
//! which keeps the DC gain of the interpolator at unity.

#[allow(unused_imports)]
use num_traits::float::Float;

use crate::utils::filter::Biquad;
use crate::utils::float4::Float4;

const M_PI_F: f32 = core::f32::consts::PI;

/// Number of second order sections per filter (12th order).
pub const AA_FILTER_SECTIONS: usize = 6;

/// The filter core runs at this rate or above.
pub const MIN_OVERSAMPLED_RATE: f32 = 176_400.0;

pub const MAX_OVERSAMPLING_FACTOR: usize = 16;

/// Minimum attenuation in dB from the host Nyquist frequency upwards.
pub const STOPBAND_ATTENUATION: f32 = 60.0;

/// Stopband edge relative to the oversampled rate when no oversampling
/// takes place, keeping the prewarped edge finite.
const MAX_STOPBAND_RATIO: f32 = 0.45;

#[derive(Debug, Clone)]
pub struct AaFilter {
    oversampling_factor: usize,
    up: [Biquad; AA_FILTER_SECTIONS],
    down: [Biquad; AA_FILTER_SECTIONS],
}

impl Default for AaFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl AaFilter {
    pub fn new() -> Self {
        Self {
            oversampling_factor: 1,
            up: Default::default(),
            down: Default::default(),
        }
    }

    /// Chooses the oversampling factor for `sample_rate`, designs the
    /// filters and clears their history.
    ///
    /// Both filters are inverse Chebyshev low-passes: flat passband,
    /// equiripple stopband starting at the host Nyquist frequency.
    pub fn init(&mut self, sample_rate: f32) {
        self.oversampling_factor = oversampling_factor_for(sample_rate);

        let stopband_ratio =
            f32::min(0.5 / self.oversampling_factor as f32, MAX_STOPBAND_RATIO);
        let ws = (M_PI_F * stopband_ratio).tan();

        let order = (2 * AA_FILTER_SECTIONS) as f32;
        let epsilon = 1.0 / (10.0f32.powf(STOPBAND_ATTENUATION / 10.0) - 1.0).sqrt();
        let mu = (1.0 / epsilon).asinh() / order;

        for (n, (up, down)) in self.up.iter_mut().zip(self.down.iter_mut()).enumerate() {
            // Pole pair of the Chebyshev prototype, inverted around ws.
            let theta = M_PI_F * (2 * n + 1) as f32 / (2.0 * order);
            let sigma = mu.sinh() * theta.sin();
            let omega = mu.cosh() * theta.cos();
            let radius = sigma.hypot(omega);

            let wp = ws / radius;
            let q = radius / (2.0 * sigma);
            let wz = ws / theta.cos();

            up.set_lowpass_notch(wp, q, wz);
            up.reset();
            down.set_lowpass_notch(wp, q, wz);
            down.reset();
        }
    }

    #[inline]
    pub fn oversampling_factor(&self) -> usize {
        self.oversampling_factor
    }

    /// Interpolation filter, called once per oversampled tick.
    #[inline]
    pub fn process_up(&mut self, in_: Float4) -> Float4 {
        self.up.iter_mut().fold(in_, |x, section| section.process(x))
    }

    /// Decimation filter, called once per oversampled tick. The value
    /// returned on the last tick of a group is the decimated sample.
    #[inline]
    pub fn process_down(&mut self, in_: Float4) -> Float4 {
        self.down.iter_mut().fold(in_, |x, section| section.process(x))
    }
}

/// Smallest power of two bringing `sample_rate` to at least
/// [`MIN_OVERSAMPLED_RATE`], capped at [`MAX_OVERSAMPLING_FACTOR`].
pub fn oversampling_factor_for(sample_rate: f32) -> usize {
    let mut factor = 1;
    while factor < MAX_OVERSAMPLING_FACTOR && sample_rate * (factor as f32) < MIN_OVERSAMPLED_RATE
    {
        factor *= 2;
    }
    factor
}
