//! Real-time audio output via cpal.

use crate::{Error, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Host, Stream};

/// Extract device name via `description()` (cpal 0.17+).
fn device_name(device: &Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// Audio output device information.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
    /// Whether this is the host's default output device.
    pub is_default: bool,
}

/// Output stream configuration.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Buffer size in frames.
    pub buffer_size: u32,
    /// Output device name (uses default if `None`). Matched as a
    /// case-insensitive substring.
    pub device: Option<String>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            buffer_size: 2205,
            device: None,
        }
    }
}

/// List all available audio output devices.
pub fn list_output_devices() -> Result<Vec<AudioDevice>> {
    let host = cpal::default_host();
    let default_name = host
        .default_output_device()
        .and_then(|d| device_name(&d).ok());

    let mut devices = Vec::new();
    if let Ok(outputs) = host.output_devices() {
        for device in outputs {
            if let Ok(name) = device_name(&device) {
                let sample_rate = device
                    .default_output_config()
                    .map(|c| c.sample_rate())
                    .unwrap_or(44100);
                let is_default = default_name.as_deref() == Some(name.as_str());
                devices.push(AudioDevice {
                    name,
                    default_sample_rate: sample_rate,
                    is_default,
                });
            }
        }
    }

    Ok(devices)
}

/// Get the default audio output device info, if any.
pub fn default_output_device() -> Result<Option<AudioDevice>> {
    let host = cpal::default_host();
    Ok(host.default_output_device().and_then(|d| {
        device_name(&d).ok().map(|name| AudioDevice {
            name,
            default_sample_rate: d
                .default_output_config()
                .map(|c| c.sample_rate())
                .unwrap_or(44100),
            is_default: true,
        })
    }))
}

/// Find a cpal output device by name substring, or return the default.
pub fn find_output_device(host: &Host, name: Option<&str>) -> Result<Device> {
    match name {
        Some(search) => {
            let search_lower = search.to_lowercase();
            let devices = host
                .output_devices()
                .map_err(|e| Error::Stream(e.to_string()))?;

            for device in devices {
                if let Ok(dev_name) = device_name(&device)
                    && dev_name.to_lowercase().contains(search_lower.as_str())
                {
                    return Ok(device);
                }
            }
            Err(Error::DeviceNotFound(format!(
                "no output device matching '{}'",
                search
            )))
        }
        None => host.default_output_device().ok_or(Error::NoDevice),
    }
}

/// A live mono output stream.
///
/// The generator callback runs on the platform audio thread and fills each
/// hardware buffer in turn. Dropping the stream stops playback.
pub struct OutputStream {
    _stream: Stream,
    sample_rate: u32,
    device_name: String,
}

impl OutputStream {
    /// Open a mono f32 output stream and start it.
    ///
    /// `generate` is called with each hardware buffer to fill. If the
    /// device is multi-channel the generated mono signal is duplicated
    /// to every channel.
    pub fn open<F>(config: &StreamConfig, mut generate: F) -> Result<Self>
    where
        F: FnMut(&mut [f32]) + Send + 'static,
    {
        let host = cpal::default_host();
        let device = find_output_device(&host, config.device.as_deref())?;
        let name = device_name(&device).map_err(|e| Error::Stream(e.to_string()))?;

        let channels = device
            .default_output_config()
            .map(|c| c.channels())
            .unwrap_or(1);

        let stream_config = cpal::StreamConfig {
            channels,
            sample_rate: config.sample_rate,
            buffer_size: cpal::BufferSize::Fixed(config.buffer_size),
        };

        let mut mono: Vec<f32> = Vec::new();
        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if channels == 1 {
                        generate(data);
                        return;
                    }
                    let frames = data.len() / channels as usize;
                    mono.resize(frames, 0.0);
                    generate(&mut mono);
                    for (frame, &sample) in data.chunks_mut(channels as usize).zip(&mono) {
                        frame.fill(sample);
                    }
                },
                move |err| {
                    tracing::error!(error = %err, "output stream error");
                },
                None,
            )
            .map_err(|e| Error::Stream(e.to_string()))?;

        stream.play().map_err(|e| Error::Stream(e.to_string()))?;
        tracing::info!(
            device = %name,
            channels,
            sample_rate = config.sample_rate,
            buffer_size = config.buffer_size,
            "output stream started"
        );

        Ok(Self {
            _stream: stream,
            sample_rate: config.sample_rate,
            device_name: name,
        })
    }

    /// The configured sample rate.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The name of the device the stream is playing on.
    pub fn device_name(&self) -> &str {
        &self.device_name
    }
}
