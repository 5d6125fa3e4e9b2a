//! Domain entities and business rules

pub mod audio;
pub mod chain;
pub mod config;
pub mod filter;
pub mod params;
pub mod response;
pub mod updater;

// Re-export specific items to avoid ambiguous glob imports
pub use audio::{
    AudioEnumerator, AudioError, DeviceId, DeviceInfo, DeviceType, SampleRate, StreamConfig,
};
pub use chain::{BandSlot, Stage, StageChain};
pub use config::{ConfigError, EqPreset, PresetManager};
pub use filter::{
    design_shelving_cascade, BiquadCoeffs, DspError, FilterKind, ShelvingCascade,
    MAX_CASCADE_SECTIONS,
};
pub use params::{ChainSettings, CutBandSettings, EqParams, PeakBandSettings, Slope};
pub use response::{curve_frequency, magnitude_curve_db};
pub use updater::{db_to_linear, render_update, update_chains, ChainUpdate, CutSlotUpdate};
