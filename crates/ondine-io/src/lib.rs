//! Audio output layer for the Ondine tone synthesizer.
//!
//! This crate provides:
//!
//! - **Real-time output**: [`OutputStream`] drives a [`SynthRenderer`]
//!   callback through the platform audio device via cpal
//! - **Device enumeration**: [`list_output_devices`] and
//!   [`default_output_device`]
//! - **WAV export**: [`write_wav`] and [`read_wav`] for offline rendering
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ondine_io::{OutputStream, StreamConfig};
//! use ondine_synth::{Synth, SynthConfig};
//!
//! let synth = Synth::new(SynthConfig::default());
//! let controller = synth.controller();
//! let mut renderer = synth.renderer();
//!
//! let stream = OutputStream::open(&StreamConfig::default(), move |buffer| {
//!     renderer.fill(buffer);
//! })?;
//! controller.play_note(440.0)?;
//! // Stream plays until `stream` is dropped.
//! ```
//!
//! [`SynthRenderer`]: ondine_synth::SynthRenderer

mod stream;
mod wav;

pub use stream::{
    AudioDevice, OutputStream, StreamConfig, default_output_device, find_output_device,
    list_output_devices,
};
pub use wav::{WavSpec, read_wav, write_wav};

/// Error types for audio output operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio device available on the system.
    #[error("No audio output device available")]
    NoDevice,

    /// The requested audio device was not found.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio output operations.
pub type Result<T> = std::result::Result<T, Error>;
