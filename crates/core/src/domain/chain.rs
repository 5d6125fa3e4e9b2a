//! Runtime filter chain
//!
//! A `StageChain` holds one channel's worth of biquad stages in fixed
//! processing order: high-pass cascade, three peak bells, low-pass
//! cascade. Stages carry their own Direct Form I state so coefficient
//! swaps never discard filter history.

use crate::domain::filter::{BiquadCoeffs, DspError, Result, MAX_CASCADE_SECTIONS};

/// One biquad section with its delay line
///
/// Stages start bypassed; a bypassed stage is skipped entirely and its
/// state is left untouched.
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    coeffs: BiquadCoeffs,
    bypassed: bool,
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage {
    pub fn new() -> Self {
        Self {
            coeffs: BiquadCoeffs::default(),
            bypassed: true,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Direct Form I difference equation
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
            - c.a1 * self.y1
            - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Replace coefficients without touching the delay line
    pub fn set_coeffs(&mut self, coeffs: BiquadCoeffs) {
        self.coeffs = coeffs;
    }

    pub fn coeffs(&self) -> &BiquadCoeffs {
        &self.coeffs
    }

    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Zero the delay line
    pub fn reset(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }

    /// Magnitude of this stage's transfer function at a frequency,
    /// ignoring the bypass flag
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate_hz: f64) -> f64 {
        self.coeffs.magnitude_at(freq_hz, sample_rate_hz)
    }
}

/// Position of a band in the chain, in processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandSlot {
    HighPass,
    LowPeak,
    MidPeak,
    HighPeak,
    LowPass,
}

impl BandSlot {
    /// Number of sections a slot can hold
    pub fn section_count(self) -> usize {
        match self {
            BandSlot::HighPass | BandSlot::LowPass => MAX_CASCADE_SECTIONS,
            _ => 1,
        }
    }
}

/// All stages of one audio channel
///
/// All stages begin bypassed, so a fresh chain passes audio through
/// untouched until coefficients are installed.
#[derive(Debug, Clone, Copy)]
pub struct StageChain {
    high_pass: [Stage; MAX_CASCADE_SECTIONS],
    low_peak: Stage,
    mid_peak: Stage,
    high_peak: Stage,
    low_pass: [Stage; MAX_CASCADE_SECTIONS],
}

impl Default for StageChain {
    fn default() -> Self {
        Self::new()
    }
}

impl StageChain {
    pub fn new() -> Self {
        Self {
            high_pass: [Stage::new(); MAX_CASCADE_SECTIONS],
            low_peak: Stage::new(),
            mid_peak: Stage::new(),
            high_peak: Stage::new(),
            low_pass: [Stage::new(); MAX_CASCADE_SECTIONS],
        }
    }

    /// Run one sample through every active stage in slot order
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> f32 {
        let mut sample = input;
        for stage in &mut self.high_pass {
            if !stage.bypassed {
                sample = stage.process_sample(sample);
            }
        }
        if !self.low_peak.bypassed {
            sample = self.low_peak.process_sample(sample);
        }
        if !self.mid_peak.bypassed {
            sample = self.mid_peak.process_sample(sample);
        }
        if !self.high_peak.bypassed {
            sample = self.high_peak.process_sample(sample);
        }
        for stage in &mut self.low_pass {
            if !stage.bypassed {
                sample = stage.process_sample(sample);
            }
        }
        sample
    }

    /// Process a mono buffer in place
    pub fn process(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    pub fn stage(&self, slot: BandSlot, section: usize) -> Option<&Stage> {
        match slot {
            BandSlot::HighPass => self.high_pass.get(section),
            BandSlot::LowPass => self.low_pass.get(section),
            BandSlot::LowPeak if section == 0 => Some(&self.low_peak),
            BandSlot::MidPeak if section == 0 => Some(&self.mid_peak),
            BandSlot::HighPeak if section == 0 => Some(&self.high_peak),
            _ => None,
        }
    }

    pub fn stage_mut(&mut self, slot: BandSlot, section: usize) -> Option<&mut Stage> {
        match slot {
            BandSlot::HighPass => self.high_pass.get_mut(section),
            BandSlot::LowPass => self.low_pass.get_mut(section),
            BandSlot::LowPeak if section == 0 => Some(&mut self.low_peak),
            BandSlot::MidPeak if section == 0 => Some(&mut self.mid_peak),
            BandSlot::HighPeak if section == 0 => Some(&mut self.high_peak),
            _ => None,
        }
    }

    /// Install coefficients into one section, preserving its state
    pub fn install_coefficients(
        &mut self,
        slot: BandSlot,
        section: usize,
        coeffs: BiquadCoeffs,
    ) -> Result<()> {
        self.stage_mut(slot, section)
            .ok_or(DspError::SectionOutOfRange(section))?
            .set_coeffs(coeffs);
        Ok(())
    }

    pub fn set_bypassed(&mut self, slot: BandSlot, section: usize, bypassed: bool) -> Result<()> {
        self.stage_mut(slot, section)
            .ok_or(DspError::SectionOutOfRange(section))?
            .set_bypassed(bypassed);
        Ok(())
    }

    pub fn high_pass_mut(&mut self) -> &mut [Stage; MAX_CASCADE_SECTIONS] {
        &mut self.high_pass
    }

    pub fn low_pass_mut(&mut self) -> &mut [Stage; MAX_CASCADE_SECTIONS] {
        &mut self.low_pass
    }

    pub fn low_peak_mut(&mut self) -> &mut Stage {
        &mut self.low_peak
    }

    pub fn mid_peak_mut(&mut self) -> &mut Stage {
        &mut self.mid_peak
    }

    pub fn high_peak_mut(&mut self) -> &mut Stage {
        &mut self.high_peak
    }

    /// Zero every stage's delay line
    pub fn reset(&mut self) {
        for stage in &mut self.high_pass {
            stage.reset();
        }
        self.low_peak.reset();
        self.mid_peak.reset();
        self.high_peak.reset();
        for stage in &mut self.low_pass {
            stage.reset();
        }
    }

    /// Combined magnitude of all active stages at a frequency
    ///
    /// Product of per-stage magnitudes; a chain with every stage
    /// bypassed reports unity everywhere.
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate_hz: f64) -> f64 {
        self.high_pass
            .iter()
            .chain(std::iter::once(&self.low_peak))
            .chain(std::iter::once(&self.mid_peak))
            .chain(std::iter::once(&self.high_peak))
            .chain(self.low_pass.iter())
            .filter(|stage| !stage.bypassed)
            .map(|stage| stage.magnitude_at(freq_hz, sample_rate_hz))
            .product()
    }
}
