//! Engine wiring and control-side coefficient updates
//!
//! `EqController` runs on the control thread: it watches the parameter
//! store, designs new coefficients when anything changed, and ships
//! them to the audio thread over the update channel. It keeps a shadow
//! chain with the same coefficients so response curves come from
//! exactly what the audio thread is running.
//!
//! `EqEngine` assembles the full duplex path: input stream, sample
//! ring, EQ processor, output stream.

use crate::audio::lockfree_buffer::sample_ring;
use crate::audio::processor::EqProcessor;
use crate::audio::stream::AudioStream;
use crossbeam::channel::{bounded, Sender, TrySendError};
use std::sync::Arc;
use tracing::{debug, info, warn};
use virelai_core::domain::audio::{DeviceId, Result, StreamConfig};
use virelai_core::domain::{magnitude_curve_db, render_update, ChainSettings, EqParams, StageChain};

/// Pending coefficient updates the audio thread can lag behind by
const UPDATE_CHANNEL_DEPTH: usize = 16;

/// Control-side owner of the parameter-to-coefficient pipeline
pub struct EqController {
    params: Arc<EqParams>,
    updates: Sender<virelai_core::domain::ChainUpdate>,
    shadow: StageChain,
    sample_rate_hz: f64,
}

impl EqController {
    pub fn new(
        params: Arc<EqParams>,
        updates: Sender<virelai_core::domain::ChainUpdate>,
        sample_rate_hz: f64,
    ) -> Self {
        Self {
            params,
            updates,
            shadow: StageChain::new(),
            sample_rate_hz,
        }
    }

    pub fn params(&self) -> &Arc<EqParams> {
        &self.params
    }

    /// Render and send an update unconditionally
    ///
    /// Used once at startup so the audio thread never runs the
    /// all-bypassed chain longer than the first block.
    pub fn prime(&mut self) {
        self.params.take_changed();
        self.push_update();
    }

    /// Check the change flag and push an update if anything moved
    ///
    /// Call at UI rate. A design failure keeps the previous
    /// coefficients running on both the audio thread and the shadow.
    pub fn tick(&mut self) {
        if self.params.take_changed() {
            self.push_update();
        }
    }

    fn push_update(&mut self) {
        let settings = ChainSettings::read(&self.params);
        match render_update(&settings, self.sample_rate_hz) {
            Ok(update) => {
                update.apply_to(&mut self.shadow);
                match self.updates.try_send(update) {
                    Ok(()) => debug!("sent coefficient update"),
                    Err(TrySendError::Full(_)) => {
                        // Audio thread drains to the newest anyway
                        warn!("update channel full, audio thread lagging");
                    }
                    Err(TrySendError::Disconnected(_)) => {
                        warn!("update channel disconnected");
                    }
                }
            }
            Err(e) => warn!("coefficient design failed, keeping previous: {}", e),
        }
    }

    /// Magnitude response of the currently installed coefficients, in dB
    pub fn response_curve(&self, width: usize) -> Vec<f64> {
        magnitude_curve_db(&self.shadow, self.sample_rate_hz, width)
    }
}

/// The full capture-process-playback path
///
/// Streams stop when this is dropped.
pub struct EqEngine {
    _input: AudioStream,
    _output: AudioStream,
    controller: EqController,
}

impl EqEngine {
    /// Build and start the duplex path between two devices
    pub fn start(
        input_device: &DeviceId,
        output_device: &DeviceId,
        config: &StreamConfig,
        params: Arc<EqParams>,
    ) -> Result<Self> {
        info!(
            "Starting EQ engine: input={}, output={}, rate={} Hz, buffer={} frames",
            input_device.as_str(),
            output_device.as_str(),
            config.sample_rate.hz(),
            config.buffer_size
        );

        let (update_tx, update_rx) = bounded(UPDATE_CHANNEL_DEPTH);

        // 4x the device buffer absorbs callback jitter between the two streams
        let ring_capacity = config.buffer_size as usize * config.channels as usize * 4;
        let (producer, consumer) = sample_ring(ring_capacity);

        let processor = EqProcessor::new(update_rx);

        let mut controller =
            EqController::new(params, update_tx, config.sample_rate.hz() as f64);
        controller.prime();

        let input = AudioStream::input(input_device, config, producer)?;
        let output = AudioStream::output(output_device, config, consumer, processor)?;

        Ok(Self {
            _input: input,
            _output: output,
            controller,
        })
    }

    pub fn controller_mut(&mut self) -> &mut EqController {
        &mut self.controller
    }

    pub fn controller(&self) -> &EqController {
        &self.controller
    }
}

impl Drop for EqEngine {
    fn drop(&mut self) {
        info!("Shutting down EQ engine");
    }
}
