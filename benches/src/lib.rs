//! Helper utilities for benchmarks

use virelai_core::domain::chain::StageChain;
use virelai_core::domain::params::{ChainSettings, Slope};
use virelai_core::domain::updater::render_update;

/// Generate a stereo interleaved mix of sine tones
pub fn generate_test_buffer(sample_rate: u32, frames: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(frames * 2);
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let s = 0.3 * (2.0 * std::f32::consts::PI * 110.0 * t).sin()
            + 0.3 * (2.0 * std::f32::consts::PI * 1000.0 * t).sin()
            + 0.2 * (2.0 * std::f32::consts::PI * 7500.0 * t).sin();
        data.push(s);
        data.push(s);
    }
    data
}

/// A chain with every band doing real work
pub fn configured_chain(sample_rate_hz: f64) -> StageChain {
    let settings = working_settings();
    let mut chain = StageChain::new();
    if let Ok(update) = render_update(&settings, sample_rate_hz) {
        update.apply_to(&mut chain);
    }
    chain
}

/// Settings with all five bands active at realistic values
pub fn working_settings() -> ChainSettings {
    let mut settings = ChainSettings::default();
    settings.high_pass.cutoff_hz = 80.0;
    settings.high_pass.slope = Slope::Db24;
    settings.low_pass.cutoff_hz = 16_000.0;
    settings.low_pass.slope = Slope::Db24;
    settings.low_peak.gain_db = 2.5;
    settings.mid_peak.gain_db = -3.0;
    settings.high_peak.gain_db = 4.0;
    settings
}

/// Calculate RMS level
pub fn calc_rms(buffer: &[f32]) -> f32 {
    let sum_sq: f32 = buffer.iter().map(|&s| s * s).sum();
    (sum_sq / buffer.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_test_buffer() {
        let buffer = generate_test_buffer(48000, 512);
        assert_eq!(buffer.len(), 1024);
        assert!(buffer.iter().all(|&s| s.abs() <= 1.0));
    }

    #[test]
    fn test_configured_chain_shapes_the_signal() {
        let chain = configured_chain(48000.0);
        // High peak boosts 4 dB around 4 kHz
        let db = 20.0 * chain.magnitude_at(4000.0, 48000.0).log10();
        assert!(db > 2.0, "4 kHz at {db} dB");
    }
}
