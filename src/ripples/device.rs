//! Component models of the nonlinear circuits around the filter core.

// Based on GPL-licensed code (c) 2020 by Tyler Coy

#[allow(unused_imports)]
use num_traits::float::Float;

use super::VTOI_COLLECTOR_VSAT;

/// Resistance of an unconnected second input of [`v_to_i_converter`].
pub const OPEN_INPUT_R: f32 = 1e12;

/// Silicon temperature in Celsius.
const TEMPERATURE: f32 = 40.0;
const K_OVER_Q: f32 = 8.617_333e-5;
const KELVIN: f32 = 273.15;

/// Thermal voltage of the OTA's input pair.
pub const THERMAL_VOLTAGE: f32 = K_OVER_Q * (TEMPERATURE + KELVIN);

/// Input range of the tanh approximant, `2 * sqrt(3)`. The approximant
/// peaks here, so clamping keeps it monotonic and below 1.
const Z_LIMIT: f32 = 3.464_101_6;

/// Model of the nonlinear CV voltage-to-current converters.
///
/// - `rfb`: amplifier feedback resistor
/// - `vc`, `rc`: CV voltage and its input resistor
/// - `vp`, `rp`: knob voltage and its input resistor, use `0.0` and
///   [`OPEN_INPUT_R`] when the converter has a single input
///
/// Returns the output current in amperes, never negative.
#[inline]
pub fn v_to_i_converter(rfb: f32, vc: f32, rc: f32, vp: f32, rp: f32) -> f32 {
    // Nominal voltage at the BJT collector, ignoring nonlinearity.
    let vnom = -(vc * rfb / rc + vp * rfb / rp);

    // Naive clipping.
    let vout = f32::max(vnom, VTOI_COLLECTOR_VSAT);

    // Voltage at the opamp's negative terminal, with the three resistors
    // weighted as conductances.
    let nrc = rp * rfb;
    let nrp = rc * rfb;
    let nrfb = rc * rp;
    let vneg = (vc * nrc + vp * nrp + vout * nrfb) / (nrc + nrp + nrfb);

    let iout = (vneg - vout) / rfb;

    f32::max(iout, 0.0)
}

/// Model of an LM13700 OTA used as VCA, neglecting linearizing diodes.
///
/// `vp` and `vn` are the voltages at the positive and negative input
/// terminals, `i_abc` the amplifier bias current. Returns the output current
///
/// `i_out = i_abc * tanh((vp - vn) / (2 * Vt))`
///
/// with tanh replaced by a clamped Padé approximant.
/// See <http://www.openmusiclabs.com/files/otadist.pdf> for the derivation.
#[inline]
pub fn ota_vca(vp: f32, vn: f32, i_abc: f32) -> f32 {
    let vi = vp - vn;
    let z = (vi / (2.0 * THERMAL_VOLTAGE)).clamp(-Z_LIMIT, Z_LIMIT);

    i_abc * tanh_pade(z)
}

/// [3/4] Padé approximant of tanh, accurate for `|z| <= 2 * sqrt(3)`.
#[inline]
pub fn tanh_pade(z: f32) -> f32 {
    let z2 = z * z;
    let q = 12.0 + z2;
    12.0 * z * q / (36.0 * z2 + q * q)
}
