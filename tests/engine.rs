//! Tests for the Ripples engine

mod modulation;

use mi_ripples_dsp::ripples::engine::*;
use mi_ripples_dsp::ripples::*;
use mi_ripples_dsp::utils::random::DEFAULT_SEED;

const SAMPLE_RATE: f32 = 48000.0;

fn engine() -> RipplesEngine {
    let mut engine = RipplesEngine::new();
    engine.set_sample_rate(SAMPLE_RATE);
    engine
}

/// Renders `samples` samples, taking the input from `input` and collecting
/// the bp2, lp2 and lp4 outputs.
fn render(
    engine: &mut RipplesEngine,
    frame: &mut Frame,
    samples: usize,
    input: impl Fn(usize) -> f32,
) -> (Vec<f32>, Vec<f32>, Vec<f32>) {
    let mut bp2 = Vec::with_capacity(samples);
    let mut lp2 = Vec::with_capacity(samples);
    let mut lp4 = Vec::with_capacity(samples);

    for n in 0..samples {
        frame.input = input(n);
        engine.process(frame);
        bp2.push(frame.bp2);
        lp2.push(frame.lp2);
        lp4.push(frame.lp4);
    }

    (bp2, lp2, lp4)
}

#[test]
fn oversampling_at_48k() {
    assert_eq!(engine().oversampling_factor(), 4);
}

#[test]
fn stays_within_opamp_rails() {
    let cases = [
        // (input, res_knob, freq_knob, freq_cv, res_cv)
        (10.0, 1.0, 1.0, 0.0, 0.0),
        (-10.0, 1.0, 0.5, 0.0, 10.0),
        (0.0, 1.0, 0.0, -5.0, 10.0),
        (10.0, 0.0, 0.0, 10.0, 0.0),
        (5.0, 0.5, 0.8, 2.0, -10.0),
    ];

    for (input, res_knob, freq_knob, freq_cv, res_cv) in cases {
        let mut engine = engine();
        let mut frame = Frame {
            input,
            res_knob,
            freq_knob,
            freq_cv,
            res_cv,
            fm_knob: 1.0,
            fm_cv: -1.0,
            ..Default::default()
        };

        for _ in 0..100_000 {
            engine.process(&mut frame);
            let cells = engine.cell_voltage();
            assert!(cells.is_finite());
            assert!(cells.max_abs() <= OPAMP_SAT_V);
            assert!(frame.bp2.is_finite() && frame.lp4.is_finite());
        }
    }
}

#[test]
fn dc_response() {
    let mut engine = engine();
    let input = 5.0;
    let mut frame = Frame {
        freq_knob: 1.0,
        res_knob: 0.0,
        ..Default::default()
    };

    let (_, lp2, lp4) = render(&mut engine, &mut frame, 4800, |_| input);

    let expected_lp4 = input * FILTER_INPUT_GAIN * LP4_GAIN;
    let expected_lp2 = input * FILTER_INPUT_GAIN * LP2_GAIN;
    let lp4 = lp4[lp4.len() - 1];
    let lp2 = lp2[lp2.len() - 1];

    assert!((lp4 - expected_lp4).abs() < 5e-3, "lp4 = {lp4}");
    assert!((lp2 - expected_lp2).abs() < 5e-3, "lp2 = {lp2}");
}

#[test]
fn self_oscillation() {
    let resonances = [0.0, 0.5, 0.9, 0.95, 1.0];
    let mut levels = Vec::new();

    for res_knob in resonances {
        let mut engine = engine();
        let mut frame = Frame {
            freq_knob: 0.5,
            res_knob,
            ..Default::default()
        };

        let (bp2, lp2, _) = render(&mut engine, &mut frame, 60000, |_| 0.0);
        wav_writer::write(
            format!("engine/self_oscillation_{res_knob}.wav"),
            &lp2,
            SAMPLE_RATE as u32,
        )
        .ok();

        levels.push((modulation::rms(&bp2[48000..]), modulation::rms(&lp2[48000..])));
    }

    // Below the threshold only the dither is left.
    assert!(levels[0].1 < 1e-3);
    assert!(levels[1].1 < 1e-3);

    // Above it the oscillation grows with the loop gain.
    assert!(levels[2].1 > 0.5);
    for pair in levels[2..].windows(2) {
        assert!(pair[1].0 > pair[0].0, "{levels:?}");
        assert!(pair[1].1 > pair[0].1, "{levels:?}");
    }
}

#[test]
fn lowpass_response() {
    let frequency = 1000.0;
    let amplitude = 5.0;
    let sine = |n| amplitude * modulation::sine(n, frequency, SAMPLE_RATE);

    // Cutoff at the top of the range: the tone passes.
    let mut engine_open = engine();
    let mut frame = Frame {
        freq_knob: 1.0,
        ..Default::default()
    };
    let (_, lp2_open, lp4_open) = render(&mut engine_open, &mut frame, 4800, sine);

    // Cutoff around 630Hz: the tone is attenuated, the more poles the more.
    let mut engine_closed = engine();
    let mut frame = Frame {
        freq_knob: 0.5,
        ..Default::default()
    };
    let (_, lp2_closed, lp4_closed) = render(&mut engine_closed, &mut frame, 4800, sine);

    wav_writer::write("engine/lp4_open.wav", &lp4_open, SAMPLE_RATE as u32).ok();
    wav_writer::write("engine/lp4_closed.wav", &lp4_closed, SAMPLE_RATE as u32).ok();

    let settled = 2400..;
    let lp4_open = modulation::peak(&lp4_open[settled.clone()]);
    let lp2_open = modulation::peak(&lp2_open[settled.clone()]);
    let lp4_closed = modulation::peak(&lp4_closed[settled.clone()]);
    let lp2_closed = modulation::peak(&lp2_closed[settled]);

    let passband = amplitude * FILTER_INPUT_GAIN * LP4_GAIN.abs();
    assert!((lp4_open - passband).abs() < 0.1 * passband, "{lp4_open}");
    assert!(lp2_open > 0.9 * amplitude * FILTER_INPUT_GAIN * LP2_GAIN.abs());

    assert!(lp4_closed < 0.2 * lp4_open, "{lp4_closed}");
    assert!(lp4_closed < lp2_closed);
    assert!(lp2_closed < lp2_open);
}

#[test]
fn frequency_cv_is_never_positive() {
    let mut frame = Frame {
        freq_knob: 1.0,
        ..Default::default()
    };
    assert_eq!(frequency_cv(&frame), 0.0);

    frame.freq_cv = 3.0;
    assert_eq!(frequency_cv(&frame), 0.0);

    frame.freq_knob = 0.0;
    frame.freq_cv = 0.0;
    assert!((frequency_cv(&frame) + FREQ_KNOB_VOLTAGE).abs() < 1e-5);

    frame.freq_knob = 0.5;
    frame.fm_cv = -2.0;
    frame.fm_knob = 0.5;
    assert!((frequency_cv(&frame) + 0.5 * FREQ_KNOB_VOLTAGE + 1.0).abs() < 1e-5);
}

#[test]
fn audio_rate_fm_bus() {
    let mut frame = Frame {
        freq_knob: 0.5,
        input: 2.0,
        b_output: -4.0,
        track_knob: 0.5,
        xfm_knob: 0.25,
        ..Default::default()
    };
    let base = -0.5 * FREQ_KNOB_VOLTAGE;

    // Silent without global depth.
    assert!((frequency_cv(&frame) - base).abs() < 1e-5);

    frame.fm_global_knob = 1.0;
    assert!((frequency_cv(&frame) - (base + 1.0 - 1.0)).abs() < 1e-5);

    frame.fm_global_knob = -1.0;
    frame.b_output = 0.0;
    assert!((frequency_cv(&frame) - (base - 1.0)).abs() < 1e-5);
}

#[test]
fn frequency_knob_mapping() {
    assert!(freq_knob_position(FREQ_KNOB_MIN).abs() < 1e-6);
    assert!((freq_knob_position(FREQ_KNOB_MAX) - 1.0).abs() < 1e-6);
    assert!((freq_knob_position(632.455_5) - 0.5).abs() < 1e-4);
}

#[test]
fn mode_selects_output() {
    let mut engine = engine();

    for mode in [FilterMode::Lp2, FilterMode::Lp3, FilterMode::Lp4] {
        let mut frame = Frame {
            freq_knob: 0.7,
            res_knob: 0.3,
            input: 1.0,
            mode,
            ..Default::default()
        };
        engine.process(&mut frame);

        let expected = match mode.poles() {
            2 => frame.lp2,
            3 => frame.lp3,
            _ => frame.lp4,
        };
        assert_eq!(frame.output, expected);
    }
}

#[test]
fn filter_mode_from_switch() {
    assert_eq!(FilterMode::from_switch(-1.0), FilterMode::Lp2);
    assert_eq!(FilterMode::from_switch(0.0), FilterMode::Lp3);
    assert_eq!(FilterMode::from_switch(1.0), FilterMode::Lp4);
    assert_eq!(FilterMode::from_switch(-3.0), FilterMode::Lp2);
    assert_eq!(FilterMode::from_switch(0.4), FilterMode::Lp3);
    assert_eq!(FilterMode::from_switch(7.0), FilterMode::Lp4);
}

#[test]
fn set_sample_rate_resets_cells() {
    let mut engine = engine();
    let mut frame = Frame {
        freq_knob: 1.0,
        input: 4.0,
        ..Default::default()
    };

    for _ in 0..100 {
        engine.process(&mut frame);
    }
    assert!(engine.cell_voltage().max_abs() > 1.0);

    engine.set_sample_rate(SAMPLE_RATE);
    assert_eq!(engine.cell_voltage().max_abs(), 0.0);
}

#[test]
fn unsupported_sample_rates_fall_back() {
    for sample_rate in [0.0, -48000.0, f32::NAN, f32::INFINITY] {
        let mut engine = RipplesEngine::new();
        engine.set_sample_rate(sample_rate);

        assert_eq!(
            engine.oversampling_factor(),
            mi_ripples_dsp::ripples::aa_filter::oversampling_factor_for(MIN_SAMPLE_RATE)
        );

        let mut frame = Frame {
            freq_knob: 0.2,
            input: 1.0,
            ..Default::default()
        };
        for _ in 0..100 {
            engine.process(&mut frame);
            assert!(frame.lp4.is_finite());
        }
    }
}

#[test]
fn channels_are_independent() {
    let mut engine_a = engine();
    let mut engine_b = engine();
    let mut engine_c = engine();

    let mut frame_a = Frame {
        freq_knob: 0.6,
        res_knob: 0.7,
        ..Default::default()
    };
    let mut frame_b = frame_a.clone();
    let mut frame_c = Frame {
        freq_knob: 0.2,
        input: -3.0,
        ..Default::default()
    };

    for n in 0..2000 {
        frame_a.input = modulation::sine(n, 220.0, SAMPLE_RATE);
        frame_b.input = frame_a.input;

        engine_a.process(&mut frame_a);
        engine_c.process(&mut frame_c);
        engine_b.process(&mut frame_b);

        assert_eq!(frame_a.lp4, frame_b.lp4);
        assert_eq!(frame_a.bp2, frame_b.bp2);
    }
}

#[test]
fn seeds_set_the_dither() {
    let oscillate = |mut engine: RipplesEngine| {
        engine.set_sample_rate(SAMPLE_RATE);
        let mut frame = Frame {
            freq_knob: 0.5,
            res_knob: 1.0,
            ..Default::default()
        };
        let (_, lp2, _) = render(&mut engine, &mut frame, 24000, |_| 0.0);
        lp2
    };

    let mut reseeded = RipplesEngine::new();
    reseeded.seed(7);

    assert_eq!(
        oscillate(RipplesEngine::new()),
        oscillate(RipplesEngine::with_seed(DEFAULT_SEED))
    );

    let seeded = oscillate(RipplesEngine::with_seed(7));
    assert_eq!(seeded, oscillate(reseeded));

    let other = oscillate(RipplesEngine::with_seed(8));
    assert_ne!(&seeded[12000..], &other[12000..]);
}
