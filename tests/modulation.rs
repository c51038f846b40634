//! Modulation sources and signal measurements

/// Returns a sine in range -1.0..1.0
#[allow(dead_code)]
pub fn sine(sample_no: usize, frequency: f32, sample_rate: f32) -> f32 {
    (2.0 * std::f32::consts::PI * frequency * sample_no as f32 / sample_rate).sin()
}

/// Root mean square of a signal.
#[allow(dead_code)]
pub fn rms(samples: &[f32]) -> f32 {
    let sum: f32 = samples.iter().map(|x| x * x).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Largest absolute value of a signal.
#[allow(dead_code)]
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0, |acc, x| f32::max(acc, x.abs()))
}
