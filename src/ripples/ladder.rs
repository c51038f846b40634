//! Filter core running at the oversampled rate.
//!
//! Four cascaded one-pole cells with a resonance loop from the last cell
//! back into the first, simulated by integrating their cell voltages with
//! RK2. The control signals are smoothed by RC filters emulating the
//! bandwidth of the CV amplifiers.

// Based on GPL-licensed code (c) 2020 by Tyler Coy

#[allow(unused_imports)]
use num_traits::float::Float;

use super::device::ota_vca;
use super::*;
use crate::utils::filter::RcFilter;
use crate::utils::float4::Float4;
use crate::utils::rk::step_rk2;

#[derive(Debug, Default, Clone)]
pub struct Ladder {
    cell_voltage: Float4,
    rc_filters: RcFilter,
}

impl Ladder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the RC filter cutoffs for `oversampled_rate` and zeroes the
    /// cell voltages.
    pub fn init(&mut self, oversampled_rate: f32) {
        self.cell_voltage = Float4::ZERO;

        let freq_cut = 1.0 / (2.0 * M_PI_F * FREQ_AMP_R * FREQ_AMP_C);
        let res_cut = 1.0 / (2.0 * M_PI_F * RES_AMP_R * RES_AMP_C);
        let gain_cut = 1.0 / (2.0 * M_PI_F * GAIN_AMP_R * GAIN_AMP_C);
        let ff_cut = 1.0 / (2.0 * M_PI_F * FEEDFORWARD_R * FEEDFORWARD_C);

        let cutoffs = Float4::new(ff_cut, freq_cut, res_cut, gain_cut);
        self.rc_filters.set_cutoff_freq(cutoffs / oversampled_rate);
        self.rc_filters.reset();
    }

    /// Cell voltages `(v0, v1, v2, v3)`, from the input cell to the last.
    #[inline]
    pub fn cell_voltage(&self) -> Float4 {
        self.cell_voltage
    }

    /// Advances the core by `timestep` seconds.
    ///
    /// `inputs` holds `(input, v_oct, i_reso, i_vca)`, the result
    /// `(bp2, lp2, lp3, lp4)`.
    #[inline]
    pub fn process(&mut self, inputs: Float4, timestep: f32) -> Float4 {
        self.rc_filters.process(inputs);

        let control = self.rc_filters.lowpass();
        let v_oct = control[1];
        let i_reso = control[2];

        // The highpassed input feeds forward into the resonance VCA.
        let feedforward = self.rc_filters.highpass()[0];

        // -A / RC
        let rad_per_s = -v_oct.exp2() / FILTER_CELL_RC;

        let input = inputs[0];
        self.cell_voltage = step_rk2(timestep, self.cell_voltage, |vout: Float4| {
            // vin is (v3, v0, v1, v2).
            let vin = vout.rotate();

            let vp = feedforward * FEEDFORWARD_GAIN;
            let vn = vout[3] * FEEDBACK_GAIN;
            let res = FILTER_CELL_R * ota_vca(vp, vn, i_reso);
            let in_ = input * FILTER_INPUT_GAIN + res;

            // vin is now (in, v0, v1, v2), and vin + vout is the voltage
            // across each cell.
            let vsum = vin.with_first(in_) + vout;
            let dvout = vsum * rad_per_s;

            // Self-modulation adds some even-order harmonics.
            dvout * (vsum * FILTER_CELL_SELF_MODULATION + 1.0)
        });

        self.cell_voltage = self.cell_voltage.clamp(-OPAMP_SAT_V, OPAMP_SAT_V);

        let [lp1, lp2, lp3, lp4] = self.cell_voltage.0;
        Float4::new(
            (lp1 + lp2) * BP2_GAIN,
            lp2 * LP2_GAIN,
            lp3 * LP3_GAIN,
            lp4 * LP4_GAIN,
        )
    }
}
