//! Four-lane RC one-pole filters and biquad sections.

use crate::utils::float4::Float4;

const M_PI_F: f32 = core::f32::consts::PI;

/// Bank of four first-order RC filters, one per lane, discretized with the
/// bilinear transform. Each lane has its own cutoff.
///
/// Every call to [`RcFilter::process`] updates both the low-pass and the
/// high-pass response, which are then read with [`RcFilter::lowpass`] and
/// [`RcFilter::highpass`].
#[derive(Debug, Default, Clone)]
pub struct RcFilter {
    c: Float4,
    x: Float4,
    y: Float4,
}

impl RcFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.x = Float4::ZERO;
        self.y = Float4::ZERO;
    }

    /// Sets the cutoffs as angular frequencies in radians per sample.
    #[inline]
    pub fn set_cutoff(&mut self, w: Float4) {
        self.c = Float4::splat(2.0) / w;
    }

    /// Sets the cutoffs as normalized frequencies (cutoff / sample rate).
    #[inline]
    pub fn set_cutoff_freq(&mut self, f: Float4) {
        self.set_cutoff(f * (2.0 * M_PI_F));
    }

    #[inline]
    pub fn process(&mut self, in_: Float4) {
        let y = (in_ + self.x - self.y * (Float4::splat(1.0) - self.c)) / (self.c + 1.0);
        self.x = in_;
        self.y = y;
    }

    #[inline]
    pub fn lowpass(&self) -> Float4 {
        self.y
    }

    #[inline]
    pub fn highpass(&self) -> Float4 {
        self.x - self.y
    }
}

/// Second order section in transposed direct form II, shared coefficients
/// across the four lanes.
#[derive(Debug, Default, Clone)]
pub struct Biquad {
    b: [f32; 3],
    a: [f32; 2],
    state_1: Float4,
    state_2: Float4,
}

impl Biquad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.state_1 = Float4::ZERO;
        self.state_2 = Float4::ZERO;
    }

    /// Low-pass section with a transmission zero, unity gain at DC.
    ///
    /// `wp` and `q` place the pole pair, `wz` the zero pair on the frequency
    /// axis. Frequencies are prewarped, `w = tan(pi * f / sample_rate)`, and
    /// the section is discretized with the bilinear transform.
    pub fn set_lowpass_notch(&mut self, wp: f32, q: f32, wz: f32) {
        let wp2 = wp * wp;
        let wz2 = wz * wz;
        let gain = wp2 / wz2;
        let a0 = 1.0 + wp / q + wp2;

        let b0 = gain * (1.0 + wz2) / a0;
        let b1 = gain * 2.0 * (wz2 - 1.0) / a0;
        self.b = [b0, b1, b0];
        self.a = [2.0 * (wp2 - 1.0) / a0, (1.0 - wp / q + wp2) / a0];
    }

    #[inline]
    pub fn process(&mut self, in_: Float4) -> Float4 {
        let [b0, b1, b2] = self.b;
        let [a1, a2] = self.a;
        let out = in_ * b0 + self.state_1;
        self.state_1 = in_ * b1 - out * a1 + self.state_2;
        self.state_2 = in_ * b2 - out * a2;
        out
    }
}
