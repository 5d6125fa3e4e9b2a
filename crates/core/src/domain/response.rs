//! Magnitude response curves
//!
//! Samples a chain's combined transfer function along a logarithmic
//! frequency axis for display. Reads coefficients only, so it works on
//! any chain copy without touching audio state.

use crate::domain::chain::StageChain;

/// Display axis bounds
pub const CURVE_FREQ_MIN_HZ: f64 = 20.0;
pub const CURVE_FREQ_MAX_HZ: f64 = 20_000.0;
pub const CURVE_DB_MIN: f64 = -24.0;
pub const CURVE_DB_MAX: f64 = 24.0;

/// Frequency of a curve column, log-spaced across the display axis
pub fn curve_frequency(column: usize, width: usize) -> f64 {
    let t = if width <= 1 {
        0.0
    } else {
        column as f64 / (width - 1) as f64
    };
    CURVE_FREQ_MIN_HZ * (CURVE_FREQ_MAX_HZ / CURVE_FREQ_MIN_HZ).powf(t)
}

/// Combined chain magnitude in dB at `width` log-spaced frequencies
/// from 20 Hz to 20 kHz inclusive
pub fn magnitude_curve_db(chain: &StageChain, sample_rate_hz: f64, width: usize) -> Vec<f64> {
    (0..width)
        .map(|column| {
            let freq = curve_frequency(column, width);
            20.0 * chain.magnitude_at(freq, sample_rate_hz).log10()
        })
        .collect()
}
