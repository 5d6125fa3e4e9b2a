//! CPAL-based audio device enumeration
//!
//! Provides a cross-platform view of audio devices using the CPAL library.

use cpal::traits::{DeviceTrait, HostTrait};
use tracing::{debug, info, warn};
use virelai_core::domain::audio::{
    AudioEnumerator, AudioError, DeviceId, DeviceInfo, DeviceType, Result, SampleRate,
};

fn max_channels<I>(configs: std::result::Result<I, impl std::error::Error>) -> u16
where
    I: Iterator<Item = cpal::SupportedStreamConfigRange>,
{
    configs
        .map(|iter| iter.map(|c| c.channels()).max().unwrap_or(0))
        .unwrap_or(0)
}

fn describe_device(device: &cpal::Device, device_type: DeviceType) -> DeviceInfo {
    #[allow(deprecated)]
    let name = device
        .name()
        .unwrap_or_else(|_| "Unknown Device".to_string());

    let max_input_channels = max_channels(device.supported_input_configs());
    let max_output_channels = max_channels(device.supported_output_configs());

    let default_sample_rate = device
        .default_input_config()
        .or_else(|_| device.default_output_config())
        .ok()
        .map(|config| SampleRate::from_hz(config.sample_rate()));

    let info = DeviceInfo {
        // Name doubles as ID; CPAL exposes nothing more stable
        id: DeviceId::new(name.clone()),
        name,
        device_type,
        max_input_channels,
        max_output_channels,
        default_sample_rate,
    };
    debug!("Found device: {}", info.name);
    info
}

/// CPAL-based audio enumerator
pub struct CpalEnumerator {
    host: cpal::Host,
}

impl Default for CpalEnumerator {
    fn default() -> Self {
        info!("Initializing CPAL enumerator");
        Self::new()
    }
}

impl CpalEnumerator {
    pub fn new() -> Self {
        let host = cpal::default_host();
        debug!("Using audio host: {:?}", host.id());
        Self { host }
    }

    fn determine_device_type(&self, device: &cpal::Device) -> Result<DeviceType> {
        let has_input = device.supported_input_configs().is_ok();
        let has_output = device.supported_output_configs().is_ok();

        match (has_input, has_output) {
            (true, true) => Ok(DeviceType::Duplex),
            (true, false) => Ok(DeviceType::Input),
            (false, true) => Ok(DeviceType::Output),
            (false, false) => Err(AudioError::UnsupportedConfiguration(
                "Device has no inputs or outputs".to_string(),
            )),
        }
    }
}

impl AudioEnumerator for CpalEnumerator {
    fn devices(&self) -> Result<Vec<DeviceInfo>> {
        info!("Enumerating all audio devices");
        let mut devices = Vec::new();

        #[allow(deprecated)]
        let cpal_devices = self
            .host
            .devices()
            .map_err(|e| AudioError::OsError(e.to_string()))?;

        for device in cpal_devices {
            match self.determine_device_type(&device) {
                Ok(device_type) => devices.push(describe_device(&device, device_type)),
                Err(e) => warn!("Skipping device: {}", e),
            }
        }

        info!("Found {} audio devices", devices.len());
        Ok(devices)
    }

    fn input_devices(&self) -> Result<Vec<DeviceInfo>> {
        let all_devices = self.devices()?;
        Ok(all_devices
            .into_iter()
            .filter(|d| matches!(d.device_type, DeviceType::Input | DeviceType::Duplex))
            .collect())
    }

    fn output_devices(&self) -> Result<Vec<DeviceInfo>> {
        let all_devices = self.devices()?;
        Ok(all_devices
            .into_iter()
            .filter(|d| matches!(d.device_type, DeviceType::Output | DeviceType::Duplex))
            .collect())
    }

    fn default_input_device(&self) -> Result<DeviceInfo> {
        let cpal_device = self
            .host
            .default_input_device()
            .ok_or_else(|| AudioError::DeviceNotFound("No default input device".to_string()))?;

        Ok(describe_device(&cpal_device, DeviceType::Input))
    }

    fn default_output_device(&self) -> Result<DeviceInfo> {
        let cpal_device = self
            .host
            .default_output_device()
            .ok_or_else(|| AudioError::DeviceNotFound("No default output device".to_string()))?;

        Ok(describe_device(&cpal_device, DeviceType::Output))
    }

    fn device_by_id(&self, id: &DeviceId) -> Result<DeviceInfo> {
        let devices = self.devices()?;
        devices
            .into_iter()
            .find(|d| d.id == *id)
            .ok_or_else(|| AudioError::DeviceNotFound(id.as_str().to_string()))
    }
}
