//! User-facing EQ parameters
//!
//! `EqParams` is the shared parameter store: one atomic word per control,
//! writable from any thread (UI, preset loader) and readable without
//! locks from the audio-rate and UI-rate consumers. `ChainSettings` is a
//! point-in-time snapshot of the whole store, taken once per consumer
//! tick and discarded after use.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Parameter constraints for the EQ bands
///
/// All setters clamp to these ranges; the coefficient designer can
/// assume in-range values in steady-state operation.
pub mod ranges {
    /// Band frequency range in Hz (cutoffs and peak centers)
    pub const FREQ_MIN: f32 = 20.0;
    pub const FREQ_MAX: f32 = 20_000.0;

    /// Peak band gain range in dB
    pub const GAIN_DB_MIN: f32 = -24.0;
    pub const GAIN_DB_MAX: f32 = 24.0;

    /// Peak band quality factor range
    pub const Q_MIN: f32 = 0.1;
    pub const Q_MAX: f32 = 10.0;
}

/// Roll-off steepness of a shelving band
///
/// The ordinal encodes the number of cascaded second-order sections
/// minus one: ordinal N enables sections 0..=N of the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Slope {
    #[default]
    Db12,
    Db24,
    Db36,
    Db48,
}

impl Slope {
    /// Ordinal encoding, 0..=3
    pub fn index(self) -> usize {
        match self {
            Slope::Db12 => 0,
            Slope::Db24 => 1,
            Slope::Db36 => 2,
            Slope::Db48 => 3,
        }
    }

    /// Number of active second-order sections (ordinal + 1)
    pub fn sections(self) -> usize {
        self.index() + 1
    }

    /// Nominal roll-off in dB per octave
    pub fn db_per_octave(self) -> u32 {
        12 * (self.index() as u32 + 1)
    }

    /// Decode an ordinal, saturating at the steepest slope
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Slope::Db12,
            1 => Slope::Db24,
            2 => Slope::Db36,
            _ => Slope::Db48,
        }
    }
}

/// Settings for a cut (high-pass or low-pass) band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutBandSettings {
    pub cutoff_hz: f32,
    pub slope: Slope,
}

/// Settings for a peak (bell) band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeakBandSettings {
    pub freq_hz: f32,
    pub gain_db: f32,
    pub q: f32,
}

/// Snapshot of every user control, taken from `EqParams`
///
/// Immutable once constructed; cheap to copy across the UI/audio
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainSettings {
    pub high_pass: CutBandSettings,
    pub low_peak: PeakBandSettings,
    pub mid_peak: PeakBandSettings,
    pub high_peak: PeakBandSettings,
    pub low_pass: CutBandSettings,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            high_pass: CutBandSettings {
                cutoff_hz: ranges::FREQ_MIN,
                slope: Slope::Db12,
            },
            low_peak: PeakBandSettings {
                freq_hz: 250.0,
                gain_db: 0.0,
                q: 1.0,
            },
            mid_peak: PeakBandSettings {
                freq_hz: 1000.0,
                gain_db: 0.0,
                q: 1.0,
            },
            high_peak: PeakBandSettings {
                freq_hz: 4000.0,
                gain_db: 0.0,
                q: 1.0,
            },
            low_pass: CutBandSettings {
                cutoff_hz: ranges::FREQ_MAX,
                slope: Slope::Db12,
            },
        }
    }
}

impl ChainSettings {
    /// Sample the parameter store
    pub fn read(params: &EqParams) -> Self {
        Self {
            high_pass: CutBandSettings {
                cutoff_hz: params.hp_cutoff.load(),
                slope: Slope::from_index(params.hp_slope.load(Ordering::Relaxed) as usize),
            },
            low_peak: PeakBandSettings {
                freq_hz: params.low_freq.load(),
                gain_db: params.low_gain_db.load(),
                q: params.low_q.load(),
            },
            mid_peak: PeakBandSettings {
                freq_hz: params.mid_freq.load(),
                gain_db: params.mid_gain_db.load(),
                q: params.mid_q.load(),
            },
            high_peak: PeakBandSettings {
                freq_hz: params.high_freq.load(),
                gain_db: params.high_gain_db.load(),
                q: params.high_q.load(),
            },
            low_pass: CutBandSettings {
                cutoff_hz: params.lp_cutoff.load(),
                slope: Slope::from_index(params.lp_slope.load(Ordering::Relaxed) as usize),
            },
        }
    }
}

/// An f32 stored in an atomic word via its bit pattern
///
/// Relaxed ordering is sufficient: each control is an independent value
/// and cross-control consistency comes from the snapshot, not from
/// ordering between stores.
#[derive(Debug)]
struct AtomicF32(AtomicU32);

impl AtomicF32 {
    fn new(value: f32) -> Self {
        Self(AtomicU32::new(value.to_bits()))
    }

    fn load(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    fn store(&self, value: f32) {
        self.0.store(value.to_bits(), Ordering::Relaxed);
    }
}

/// Lock-free shared store of all EQ controls
///
/// Single conceptual owner, any number of writers at UI rate; readers
/// take `ChainSettings` snapshots. Every setter clamps to the declared
/// range and raises the change flag; consumers collapse any number of
/// changes per tick through `take_changed`.
#[derive(Debug)]
pub struct EqParams {
    hp_cutoff: AtomicF32,
    hp_slope: AtomicU32,
    low_freq: AtomicF32,
    low_gain_db: AtomicF32,
    low_q: AtomicF32,
    mid_freq: AtomicF32,
    mid_gain_db: AtomicF32,
    mid_q: AtomicF32,
    high_freq: AtomicF32,
    high_gain_db: AtomicF32,
    high_q: AtomicF32,
    lp_cutoff: AtomicF32,
    lp_slope: AtomicU32,
    changed: AtomicBool,
}

impl Default for EqParams {
    fn default() -> Self {
        Self::from_settings(&ChainSettings::default())
    }
}

impl EqParams {
    /// Create a store initialized from a snapshot, with the change flag
    /// raised so the first tick installs coefficients
    pub fn from_settings(settings: &ChainSettings) -> Self {
        Self {
            hp_cutoff: AtomicF32::new(settings.high_pass.cutoff_hz),
            hp_slope: AtomicU32::new(settings.high_pass.slope.index() as u32),
            low_freq: AtomicF32::new(settings.low_peak.freq_hz),
            low_gain_db: AtomicF32::new(settings.low_peak.gain_db),
            low_q: AtomicF32::new(settings.low_peak.q),
            mid_freq: AtomicF32::new(settings.mid_peak.freq_hz),
            mid_gain_db: AtomicF32::new(settings.mid_peak.gain_db),
            mid_q: AtomicF32::new(settings.mid_peak.q),
            high_freq: AtomicF32::new(settings.high_peak.freq_hz),
            high_gain_db: AtomicF32::new(settings.high_peak.gain_db),
            high_q: AtomicF32::new(settings.high_peak.q),
            lp_cutoff: AtomicF32::new(settings.low_pass.cutoff_hz),
            lp_slope: AtomicU32::new(settings.low_pass.slope.index() as u32),
            changed: AtomicBool::new(true),
        }
    }

    pub fn set_hp_cutoff(&self, hz: f32) {
        self.hp_cutoff
            .store(hz.clamp(ranges::FREQ_MIN, ranges::FREQ_MAX));
        self.mark_changed();
    }

    pub fn set_hp_slope(&self, slope: Slope) {
        self.hp_slope.store(slope.index() as u32, Ordering::Relaxed);
        self.mark_changed();
    }

    pub fn set_lp_cutoff(&self, hz: f32) {
        self.lp_cutoff
            .store(hz.clamp(ranges::FREQ_MIN, ranges::FREQ_MAX));
        self.mark_changed();
    }

    pub fn set_lp_slope(&self, slope: Slope) {
        self.lp_slope.store(slope.index() as u32, Ordering::Relaxed);
        self.mark_changed();
    }

    pub fn set_low_peak(&self, band: PeakBandSettings) {
        Self::store_peak(&self.low_freq, &self.low_gain_db, &self.low_q, band);
        self.mark_changed();
    }

    pub fn set_mid_peak(&self, band: PeakBandSettings) {
        Self::store_peak(&self.mid_freq, &self.mid_gain_db, &self.mid_q, band);
        self.mark_changed();
    }

    pub fn set_high_peak(&self, band: PeakBandSettings) {
        Self::store_peak(&self.high_freq, &self.high_gain_db, &self.high_q, band);
        self.mark_changed();
    }

    /// Write every control from a snapshot (preset load)
    pub fn apply_settings(&self, settings: &ChainSettings) {
        self.set_hp_cutoff(settings.high_pass.cutoff_hz);
        self.set_hp_slope(settings.high_pass.slope);
        self.set_low_peak(settings.low_peak);
        self.set_mid_peak(settings.mid_peak);
        self.set_high_peak(settings.high_peak);
        self.set_lp_cutoff(settings.low_pass.cutoff_hz);
        self.set_lp_slope(settings.low_pass.slope);
    }

    fn store_peak(freq: &AtomicF32, gain: &AtomicF32, q: &AtomicF32, band: PeakBandSettings) {
        freq.store(band.freq_hz.clamp(ranges::FREQ_MIN, ranges::FREQ_MAX));
        gain.store(band.gain_db.clamp(ranges::GAIN_DB_MIN, ranges::GAIN_DB_MAX));
        q.store(band.q.clamp(ranges::Q_MIN, ranges::Q_MAX));
    }

    /// Raise the change flag (any writer thread)
    pub fn mark_changed(&self) {
        self.changed.store(true, Ordering::Release);
    }

    /// Consume the change flag
    ///
    /// Returns true at most once per raise; concurrent parameter writes
    /// between two calls collapse into a single true.
    pub fn take_changed(&self) -> bool {
        self.changed
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
