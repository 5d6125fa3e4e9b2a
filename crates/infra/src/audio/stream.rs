//! Real-time audio streams
//!
//! Thin wrappers around cpal streams for the duplex passthrough path:
//! the input stream pushes captured samples into the sample ring, the
//! output stream drains the ring and runs the EQ processor over each
//! block before it reaches the device.

use crate::audio::lockfree_buffer::{RingConsumer, RingProducer};
use crate::audio::processor::EqProcessor;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig as CpalStreamConfig};
use tracing::{error, info, warn};
use virelai_core::domain::audio::{AudioError, DeviceId, Result, StreamConfig};

/// A running cpal stream
///
/// Dropping this stops the stream.
pub struct AudioStream {
    _stream: Stream,
    config: StreamConfig,
}

fn find_device(device_id: &DeviceId) -> Result<cpal::Device> {
    let host = cpal::default_host();
    #[allow(deprecated)]
    host.devices()
        .map_err(|e| AudioError::OsError(e.to_string()))?
        .find(|d| d.name().ok().as_deref() == Some(device_id.as_str()))
        .ok_or_else(|| AudioError::DeviceNotFound(device_id.as_str().to_string()))
}

fn cpal_config(config: &StreamConfig) -> CpalStreamConfig {
    CpalStreamConfig {
        channels: config.channels,
        sample_rate: config.sample_rate.hz(),
        buffer_size: cpal::BufferSize::Fixed(config.buffer_size),
    }
}

impl AudioStream {
    /// Create an input stream feeding the sample ring
    pub fn input(
        device_id: &DeviceId,
        config: &StreamConfig,
        mut producer: RingProducer,
    ) -> Result<Self> {
        info!(
            "Creating input stream: device={}, config={:?}",
            device_id.as_str(),
            config
        );

        let cpal_device = find_device(device_id)?;

        let stream = cpal_device
            .build_input_stream(
                &cpal_config(config),
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    let written = producer.push(data);
                    if written < data.len() {
                        warn!("input ring full, dropped {} samples", data.len() - written);
                    }
                },
                |err| error!("Input stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamError(format!("Failed to build stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamError(format!("Failed to start stream: {}", e)))?;

        Ok(Self {
            _stream: stream,
            config: config.clone(),
        })
    }

    /// Create an output stream draining the sample ring through the EQ
    ///
    /// The callback fills the device buffer from the ring (silence on
    /// underrun) and processes it in place, so coefficient updates land
    /// exactly on block boundaries.
    pub fn output(
        device_id: &DeviceId,
        config: &StreamConfig,
        mut consumer: RingConsumer,
        mut processor: EqProcessor,
    ) -> Result<Self> {
        info!(
            "Creating output stream: device={}, config={:?}",
            device_id.as_str(),
            config
        );

        let cpal_device = find_device(device_id)?;
        let channels = config.channels as usize;

        let stream = cpal_device
            .build_output_stream(
                &cpal_config(config),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    consumer.pop_or_silence(data);
                    processor.process_interleaved(data, channels);
                },
                |err| error!("Output stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamError(format!("Failed to build stream: {}", e)))?;

        stream
            .play()
            .map_err(|e| AudioError::StreamError(format!("Failed to start stream: {}", e)))?;

        Ok(Self {
            _stream: stream,
            config: config.clone(),
        })
    }

    /// Get stream configuration
    pub fn config(&self) -> &StreamConfig {
        &self.config
    }
}
