//! Integration tests for the EQ pipeline
//!
//! These tests verify the complete path from parameter settings through
//! coefficient design to processed audio, including the documented
//! frequency-response scenarios.

use crossbeam::channel::bounded;
use std::sync::Arc;
use virelai_core::domain::{
    magnitude_curve_db, render_update, update_chains, BandSlot, ChainSettings, EqParams,
    PeakBandSettings, Slope, StageChain,
};
use virelai_infra::audio::{EqController, EqProcessor};

fn generate_sine_wave(frequency: f32, sample_rate: u32, duration_ms: f32) -> Vec<f32> {
    let num_samples = (sample_rate as f32 * duration_ms / 1000.0) as usize;
    (0..num_samples)
        .map(|i| 2.0 * std::f32::consts::PI * frequency * i as f32 / sample_rate as f32)
        .map(|phase| phase.sin())
        .collect()
}

fn rms(samples: &[f32]) -> f32 {
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
}

fn chain_for(settings: &ChainSettings, sample_rate: f64) -> StageChain {
    let mut chain = StageChain::new();
    render_update(settings, sample_rate)
        .unwrap()
        .apply_to(&mut chain);
    chain
}

fn magnitude_db(chain: &StageChain, freq: f64, sample_rate: f64) -> f64 {
    20.0 * chain.magnitude_at(freq, sample_rate).log10()
}

// ============================================================================
// FREQUENCY RESPONSE SCENARIOS
// ============================================================================

#[test]
fn test_band_cut_scenario_at_44100() {
    // HP 100 Hz at 24 dB/oct plus LP 15 kHz at 12 dB/oct
    let mut settings = ChainSettings::default();
    settings.high_pass.cutoff_hz = 100.0;
    settings.high_pass.slope = Slope::Db24;
    settings.low_pass.cutoff_hz = 15_000.0;
    settings.low_pass.slope = Slope::Db12;
    let chain = chain_for(&settings, 44_100.0);

    // Mid band is untouched
    let mid = magnitude_db(&chain, 1000.0, 44_100.0);
    assert!(mid.abs() < 0.5, "1 kHz at {mid} dB");

    // 20 Hz sits 2.32 octaves below a 4th-order high-pass
    let low = magnitude_db(&chain, 20.0, 44_100.0);
    assert!((low + 55.7).abs() < 3.0, "20 Hz at {low} dB");

    // Both cutoffs read -3 dB
    let hp_edge = magnitude_db(&chain, 100.0, 44_100.0);
    assert!((hp_edge + 3.0).abs() < 0.2, "100 Hz at {hp_edge} dB");
    let lp_edge = magnitude_db(&chain, 15_000.0, 44_100.0);
    assert!((lp_edge + 3.0).abs() < 0.2, "15 kHz at {lp_edge} dB");
}

#[test]
fn test_peak_boost_is_local_maximum() {
    let mut settings = ChainSettings::default();
    settings.mid_peak = PeakBandSettings {
        freq_hz: 1000.0,
        gain_db: 6.0,
        q: 1.0,
    };
    let chain = chain_for(&settings, 48_000.0);

    let center = magnitude_db(&chain, 1000.0, 48_000.0);
    assert!((center - 6.0).abs() < 0.05, "center at {center} dB");

    // Response decays monotonically moving away from the center
    let above: Vec<f64> = [1000.0, 1500.0, 2500.0, 5000.0]
        .iter()
        .map(|&f| magnitude_db(&chain, f, 48_000.0))
        .collect();
    for pair in above.windows(2) {
        assert!(pair[0] > pair[1], "not decaying above center: {above:?}");
    }
    let below: Vec<f64> = [1000.0, 700.0, 400.0, 150.0]
        .iter()
        .map(|&f| magnitude_db(&chain, f, 48_000.0))
        .collect();
    for pair in below.windows(2) {
        assert!(pair[0] > pair[1], "not decaying below center: {below:?}");
    }
}

#[test]
fn test_display_curve_matches_point_queries() {
    let mut settings = ChainSettings::default();
    settings.high_pass.cutoff_hz = 200.0;
    settings.high_pass.slope = Slope::Db36;
    let chain = chain_for(&settings, 48_000.0);

    let curve = magnitude_curve_db(&chain, 48_000.0, 101);
    // First column is 20 Hz, last is 20 kHz
    assert!((curve[0] - magnitude_db(&chain, 20.0, 48_000.0)).abs() < 1e-9);
    assert!((curve[100] - magnitude_db(&chain, 20_000.0, 48_000.0)).abs() < 1e-9);
}

// ============================================================================
// STABILITY AND STATE
// ============================================================================

#[test]
fn test_impulse_response_decays_for_every_slope() {
    for slope in [Slope::Db12, Slope::Db24, Slope::Db36, Slope::Db48] {
        let mut settings = ChainSettings::default();
        settings.high_pass.cutoff_hz = 100.0;
        settings.high_pass.slope = slope;
        settings.low_pass.cutoff_hz = 10_000.0;
        settings.low_pass.slope = slope;
        settings.mid_peak.gain_db = 12.0;
        let mut chain = chain_for(&settings, 48_000.0);

        let mut impulse = vec![0.0_f32; 48_000];
        impulse[0] = 1.0;
        chain.process(&mut impulse);

        for sample in &impulse {
            assert!(sample.is_finite());
        }
        // Tail of a stable filter's impulse response is essentially zero
        let tail = rms(&impulse[40_000..]);
        assert!(tail < 1e-6, "slope {slope:?} tail rms {tail}");
    }
}

#[test]
fn test_reapplying_same_settings_changes_nothing() {
    let mut settings = ChainSettings::default();
    settings.high_pass.cutoff_hz = 80.0;
    settings.mid_peak.gain_db = -4.0;

    let update_a = render_update(&settings, 48_000.0).unwrap();
    let update_b = render_update(&settings, 48_000.0).unwrap();
    assert_eq!(update_a, update_b);

    let mut chain = StageChain::new();
    update_a.apply_to(&mut chain);
    let before: Vec<f64> = (0..20)
        .map(|i| chain.magnitude_at(50.0 * (i + 1) as f64, 48_000.0))
        .collect();
    update_b.apply_to(&mut chain);
    let after: Vec<f64> = (0..20)
        .map(|i| chain.magnitude_at(50.0 * (i + 1) as f64, 48_000.0))
        .collect();
    assert_eq!(before, after);
}

#[test]
fn test_slope_change_bypasses_exactly_the_right_sections() {
    let mut settings = ChainSettings::default();
    settings.high_pass.slope = Slope::Db48;
    let mut chain = chain_for(&settings, 48_000.0);

    settings.high_pass.slope = Slope::Db24;
    render_update(&settings, 48_000.0)
        .unwrap()
        .apply_to(&mut chain);

    for section in 0..2 {
        assert!(!chain.stage(BandSlot::HighPass, section).unwrap().is_bypassed());
    }
    for section in 2..4 {
        assert!(chain.stage(BandSlot::HighPass, section).unwrap().is_bypassed());
    }
}

#[test]
fn test_stereo_channels_stay_matched() {
    let mut settings = ChainSettings::default();
    settings.high_pass.cutoff_hz = 150.0;
    settings.low_pass.cutoff_hz = 12_000.0;
    settings.low_peak.gain_db = 3.0;

    let mut left = StageChain::new();
    let mut right = StageChain::new();
    update_chains(&settings, 48_000.0, &mut left, &mut right).unwrap();

    let mut left_buf = generate_sine_wave(440.0, 48_000, 200.0);
    let mut right_buf = left_buf.clone();
    left.process(&mut left_buf);
    right.process(&mut right_buf);
    assert_eq!(left_buf, right_buf);
}

// ============================================================================
// END TO END THROUGH THE PROCESSOR
// ============================================================================

#[test]
fn test_processor_applies_controller_updates() {
    let params = Arc::new(EqParams::default());
    let (tx, rx) = bounded(16);
    let mut controller = EqController::new(Arc::clone(&params), tx, 48_000.0);
    let mut processor = EqProcessor::new(rx);

    params.set_hp_cutoff(2000.0);
    params.set_hp_slope(Slope::Db48);
    controller.prime();

    // 100 Hz tone, 4.3 octaves below a 48 dB/oct high-pass
    let mono = generate_sine_wave(100.0, 48_000, 1000.0);
    let mut stereo: Vec<f32> = mono.iter().flat_map(|&s| [s, s]).collect();
    processor.process_interleaved(&mut stereo, 2);

    let settled = &stereo[stereo.len() / 2..];
    let level = rms(settled);
    assert!(level < 0.005, "residual rms {level}");
}

#[test]
fn test_processor_passes_mid_band_through() {
    let params = Arc::new(EqParams::default());
    let (tx, rx) = bounded(16);
    let mut controller = EqController::new(Arc::clone(&params), tx, 48_000.0);
    let mut processor = EqProcessor::new(rx);
    controller.prime();

    let mono = generate_sine_wave(1000.0, 48_000, 500.0);
    let mut stereo: Vec<f32> = mono.iter().flat_map(|&s| [s, s]).collect();
    let reference = rms(&stereo);
    processor.process_interleaved(&mut stereo, 2);

    let settled = &stereo[stereo.len() / 2..];
    let level = rms(settled);
    assert!((level - reference).abs() < 0.02, "rms {level} vs {reference}");
}
