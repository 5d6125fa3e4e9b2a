//! Coefficient update rendering
//!
//! A `ChainUpdate` is the fully-designed coefficient set for every band,
//! computed off the audio thread from a `ChainSettings` snapshot and
//! applied to a `StageChain` in one step between blocks. Rendering can
//! fail (degenerate parameters); applying cannot, so the audio path has
//! no error branch.

use crate::domain::chain::StageChain;
use crate::domain::filter::{
    design_shelving_cascade, BiquadCoeffs, FilterKind, Result, MAX_CASCADE_SECTIONS,
};
use crate::domain::params::ChainSettings;
use tracing::trace;

/// Decibels to linear amplitude
pub fn db_to_linear(db: f32) -> f64 {
    10.0_f64.powf(db as f64 / 20.0)
}

/// Rendered coefficients for one cut slot
///
/// Sections past `active` are disabled when applied, regardless of what
/// they held before.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutSlotUpdate {
    pub sections: [BiquadCoeffs; MAX_CASCADE_SECTIONS],
    pub active: usize,
}

/// Rendered coefficients for the whole chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainUpdate {
    pub high_pass: CutSlotUpdate,
    pub low_peak: BiquadCoeffs,
    pub mid_peak: BiquadCoeffs,
    pub high_peak: BiquadCoeffs,
    pub low_pass: CutSlotUpdate,
}

impl ChainUpdate {
    /// Install every band into a chain
    ///
    /// Cut sections at or past the active count are bypassed so a slope
    /// reduction never leaves stale sections running. Delay lines are
    /// preserved throughout.
    pub fn apply_to(&self, chain: &mut StageChain) {
        Self::apply_cut(&self.high_pass, chain.high_pass_mut());
        chain.low_peak_mut().set_coeffs(self.low_peak);
        chain.low_peak_mut().set_bypassed(false);
        chain.mid_peak_mut().set_coeffs(self.mid_peak);
        chain.mid_peak_mut().set_bypassed(false);
        chain.high_peak_mut().set_coeffs(self.high_peak);
        chain.high_peak_mut().set_bypassed(false);
        Self::apply_cut(&self.low_pass, chain.low_pass_mut());
    }

    fn apply_cut(update: &CutSlotUpdate, stages: &mut [crate::domain::chain::Stage]) {
        for (i, stage) in stages.iter_mut().enumerate() {
            if i < update.active {
                stage.set_coeffs(update.sections[i]);
                stage.set_bypassed(false);
            } else {
                stage.set_bypassed(true);
            }
        }
    }
}

/// Design every band's coefficients for a settings snapshot
///
/// Pure function of the snapshot and sample rate; equal inputs produce
/// an equal update.
pub fn render_update(settings: &ChainSettings, sample_rate_hz: f64) -> Result<ChainUpdate> {
    let hp = design_shelving_cascade(
        settings.high_pass.cutoff_hz as f64,
        sample_rate_hz,
        settings.high_pass.slope,
        FilterKind::HighPass,
    )?;
    let lp = design_shelving_cascade(
        settings.low_pass.cutoff_hz as f64,
        sample_rate_hz,
        settings.low_pass.slope,
        FilterKind::LowPass,
    )?;

    let peak = |band: &crate::domain::params::PeakBandSettings| -> Result<BiquadCoeffs> {
        BiquadCoeffs::peaking(
            sample_rate_hz,
            band.freq_hz as f64,
            band.q as f64,
            db_to_linear(band.gain_db),
        )
    };

    let mut high_pass = CutSlotUpdate {
        sections: [BiquadCoeffs::default(); MAX_CASCADE_SECTIONS],
        active: hp.len(),
    };
    high_pass.sections[..hp.len()].copy_from_slice(hp.sections());

    let mut low_pass = CutSlotUpdate {
        sections: [BiquadCoeffs::default(); MAX_CASCADE_SECTIONS],
        active: lp.len(),
    };
    low_pass.sections[..lp.len()].copy_from_slice(lp.sections());

    let update = ChainUpdate {
        high_pass,
        low_peak: peak(&settings.low_peak)?,
        mid_peak: peak(&settings.mid_peak)?,
        high_peak: peak(&settings.high_peak)?,
        low_pass,
    };

    trace!(
        hp_cutoff = settings.high_pass.cutoff_hz,
        hp_sections = update.high_pass.active,
        lp_cutoff = settings.low_pass.cutoff_hz,
        lp_sections = update.low_pass.active,
        "rendered chain update"
    );

    Ok(update)
}

/// Render once and apply to both channels
///
/// On a design failure neither chain is touched; the previous
/// coefficients keep running.
pub fn update_chains(
    settings: &ChainSettings,
    sample_rate_hz: f64,
    left: &mut StageChain,
    right: &mut StageChain,
) -> Result<()> {
    let update = render_update(settings, sample_rate_hz)?;
    update.apply_to(left);
    update.apply_to(right);
    Ok(())
}
