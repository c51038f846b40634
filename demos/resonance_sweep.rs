//! Renders a sawtooth through the filter while sweeping the resonance from
//! zero into self-oscillation, and the cutoff down over three octaves.
//!
//! Writes `out/resonance_sweep.wav`.

use hound::{SampleFormat, WavSpec, WavWriter};
use simple_logger::SimpleLogger;

use mi_ripples_dsp::ripples::engine::{freq_knob_position, RipplesEngine};
use mi_ripples_dsp::ripples::{FilterMode, Frame};

const SAMPLE_RATE: u32 = 48000;
const DURATION: f32 = 8.0;
const FREQUENCY: f32 = 55.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()?;

    let mut engine = RipplesEngine::new();
    engine.set_sample_rate(SAMPLE_RATE as f32);

    let samples = (DURATION * SAMPLE_RATE as f32) as usize;
    let phase_increment = FREQUENCY / SAMPLE_RATE as f32;
    let mut phase = 0.0;

    std::fs::create_dir_all("out")?;
    let spec = WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create("out/resonance_sweep.wav", spec)?;

    let mut frame = Frame {
        mode: FilterMode::Lp4,
        ..Default::default()
    };

    for n in 0..samples {
        let position = n as f32 / samples as f32;

        phase += phase_increment;
        if phase >= 1.0 {
            phase -= 1.0;
        }

        frame.input = 5.0 * (2.0 * phase - 1.0);
        frame.res_knob = position;
        frame.freq_knob = freq_knob_position(4000.0 * (-3.0 * position).exp2());
        engine.process(&mut frame);

        if n % SAMPLE_RATE as usize == 0 {
            log::info!(
                "t = {:.0}s, resonance {:.2}, lp4 {:.3}V",
                n as f32 / SAMPLE_RATE as f32,
                frame.res_knob,
                frame.lp4
            );
        }

        // Output voltages are scaled down to the range of the file format.
        writer.write_sample(frame.lp4 * 0.1)?;
        writer.write_sample(frame.bp2 * 0.1)?;
    }

    writer.finalize()?;
    log::info!("Wrote out/resonance_sweep.wav");

    Ok(())
}
