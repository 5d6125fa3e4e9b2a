//! Platform-specific audio backend implementations using CPAL
//!
//! This module provides cross-platform audio support through CPAL, which abstracts
//! platform-specific APIs:
//! - Windows: WASAPI
//! - Linux: ALSA/PulseAudio
//! - macOS: CoreAudio

pub mod cpal_backend;
pub mod engine;
pub mod lockfree_buffer;
pub mod processor;
pub mod stream;

pub use cpal_backend::CpalEnumerator;
pub use engine::{EqController, EqEngine};
pub use lockfree_buffer::{sample_ring, RingConsumer, RingProducer};
pub use processor::EqProcessor;
pub use stream::AudioStream;
