//! Filter coefficient design for the EQ chain
//!
//! Pure functions that turn user-facing band settings into second-order
//! section (biquad) coefficients:
//! - Peaking (bell) boost/cut sections via the RBJ cookbook formulas
//! - Butterworth high-pass / low-pass cascades realized as up to four
//!   biquad sections, for 12/24/36/48 dB per octave roll-off
//!
//! Design math runs in f64 and is truncated to f32 for the processing
//! path. No clamping happens here beyond validity checks; range
//! restriction is the parameter store's job.

use crate::domain::params::Slope;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DspError>;

/// Errors produced by coefficient design and chain configuration
#[derive(Debug, Error)]
pub enum DspError {
    /// A design input is outside its valid domain (non-positive or
    /// above-Nyquist frequency, non-positive Q or sample rate)
    #[error("invalid filter parameter: {0}")]
    InvalidFilterParameter(String),

    /// A stage index does not exist in the addressed chain slot
    #[error("section index {0} out of range")]
    SectionOutOfRange(usize),
}

/// Maximum number of cascaded sections in a shelving slot (48 dB/oct)
pub const MAX_CASCADE_SECTIONS: usize = 4;

/// Direction of a shelving cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    HighPass,
    LowPass,
}

/// Biquad filter coefficients
///
/// Normalized so a0 = 1; five taps per second-order section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiquadCoeffs {
    /// Numerator coefficients
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    /// Denominator coefficients (a0 is normalized to 1.0)
    pub a1: f32,
    pub a2: f32,
}

impl Default for BiquadCoeffs {
    fn default() -> Self {
        // Unity gain (no filtering)
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
        }
    }
}

impl BiquadCoeffs {
    /// Calculate coefficients for a peaking EQ section
    ///
    /// Boosts or cuts a band around `center_hz`. `linear_gain` is the
    /// linear-scale gain at the center frequency (`10^(dB/20)`); the
    /// dB-to-linear conversion is the caller's responsibility.
    ///
    /// # Errors
    /// Rejects a non-positive sample rate, a center frequency outside
    /// `(0, nyquist)`, and non-positive Q or gain.
    pub fn peaking(sample_rate_hz: f64, center_hz: f64, q: f64, linear_gain: f64) -> Result<Self> {
        if sample_rate_hz <= 0.0 {
            return Err(DspError::InvalidFilterParameter(format!(
                "sample rate must be positive, got {sample_rate_hz}"
            )));
        }
        let nyquist = sample_rate_hz / 2.0;
        if center_hz <= 0.0 || center_hz >= nyquist {
            return Err(DspError::InvalidFilterParameter(format!(
                "center frequency {center_hz} Hz outside (0, {nyquist})"
            )));
        }
        if q <= 0.0 {
            return Err(DspError::InvalidFilterParameter(format!(
                "Q must be positive, got {q}"
            )));
        }
        if linear_gain <= 0.0 {
            return Err(DspError::InvalidFilterParameter(format!(
                "linear gain must be positive, got {linear_gain}"
            )));
        }

        let a = linear_gain.sqrt();
        let w0 = 2.0 * PI * center_hz / sample_rate_hz;
        let cos_w0 = w0.cos();
        let sin_w0 = w0.sin();
        let alpha = sin_w0 / (2.0 * q);

        let b0 = 1.0 + alpha * a;
        let b1 = -2.0 * cos_w0;
        let b2 = 1.0 - alpha * a;

        let a0 = 1.0 + alpha / a;
        let a1 = -2.0 * cos_w0;
        let a2 = 1.0 - alpha / a;

        // Normalize by a0
        Ok(Self {
            b0: (b0 / a0) as f32,
            b1: (b1 / a0) as f32,
            b2: (b2 / a0) as f32,
            a1: (a1 / a0) as f32,
            a2: (a2 / a0) as f32,
        })
    }

    /// Magnitude response of this section at `freq_hz`
    ///
    /// Evaluates the standard IIR frequency-response formula
    /// `|H(e^{jw})|` with `w = 2*pi*f/sr`.
    #[must_use]
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate_hz: f64) -> f64 {
        let w = 2.0 * PI * freq_hz / sample_rate_hz;
        let z1 = Complex64::from_polar(1.0, -w);
        let z2 = z1 * z1;

        let num = Complex64::new(self.b0 as f64, 0.0)
            + Complex64::new(self.b1 as f64, 0.0) * z1
            + Complex64::new(self.b2 as f64, 0.0) * z2;
        let den = Complex64::new(1.0, 0.0)
            + Complex64::new(self.a1 as f64, 0.0) * z1
            + Complex64::new(self.a2 as f64, 0.0) * z2;

        num.norm() / den.norm()
    }
}

/// Coefficient sets for a Butterworth shelving cascade
///
/// Fixed-size so it can cross the real-time boundary without heap
/// allocation; only the first `len` sections are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShelvingCascade {
    sections: [BiquadCoeffs; MAX_CASCADE_SECTIONS],
    len: usize,
}

impl ShelvingCascade {
    /// Designed sections, in processing order
    pub fn sections(&self) -> &[BiquadCoeffs] {
        &self.sections[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Design a Butterworth high-pass or low-pass cascade
///
/// Produces `slope.sections()` second-order sections realizing an analog
/// Butterworth response of order `2 * slope.sections()` (12 dB/oct per
/// second-order section). Uses the bilinear transform with a pre-warped
/// corner `wc = tan(pi * fc / sr)`; pole-pair angles are
/// `theta_k = pi * (2k + 1) / (2N)` for analog order N.
///
/// # Errors
/// Rejects a non-positive sample rate and a cutoff outside `(0, nyquist)`.
pub fn design_shelving_cascade(
    cutoff_hz: f64,
    sample_rate_hz: f64,
    slope: Slope,
    kind: FilterKind,
) -> Result<ShelvingCascade> {
    if sample_rate_hz <= 0.0 {
        return Err(DspError::InvalidFilterParameter(format!(
            "sample rate must be positive, got {sample_rate_hz}"
        )));
    }
    let nyquist = sample_rate_hz / 2.0;
    if cutoff_hz <= 0.0 || cutoff_hz >= nyquist {
        return Err(DspError::InvalidFilterParameter(format!(
            "cutoff frequency {cutoff_hz} Hz outside (0, {nyquist})"
        )));
    }

    let num_sections = slope.sections();
    let analog_order = 2 * num_sections;
    let wc = (PI * cutoff_hz / sample_rate_hz).tan();
    let wc2 = wc * wc;

    let mut cascade = ShelvingCascade::default();
    for k in 0..num_sections {
        let theta = PI * (2 * k + 1) as f64 / (2 * analog_order) as f64;
        let d = 1.0 + 2.0 * theta.sin() * wc + wc2;
        let a1 = 2.0 * (wc2 - 1.0) / d;
        let a2 = (1.0 - 2.0 * theta.sin() * wc + wc2) / d;

        // b1 must equal +/-2*b0 exactly in f32, or the transfer zero at
        // DC (high-pass) / Nyquist (low-pass) is lost to rounding.
        cascade.sections[k] = match kind {
            FilterKind::HighPass => {
                let g = (1.0 / d) as f32;
                BiquadCoeffs {
                    b0: g,
                    b1: -2.0 * g,
                    b2: g,
                    a1: a1 as f32,
                    a2: a2 as f32,
                }
            }
            FilterKind::LowPass => {
                let g = (wc2 / d) as f32;
                BiquadCoeffs {
                    b0: g,
                    b1: 2.0 * g,
                    b2: g,
                    a1: a1 as f32,
                    a2: a2 as f32,
                }
            }
        };
    }
    cascade.len = num_sections;

    Ok(cascade)
}
