//! Ondine Synth - Polyphonic tone synthesis engine
//!
//! This crate provides the core of the ondine synthesizer: waveform
//! generation with per-harmonic phase tracking, linear ADSR envelopes built
//! as per-sample amplitude tables, voice state, and a lock-based engine that
//! splits control (note selection) from real-time rendering.
//!
//! # Core Components
//!
//! ## Waveforms
//!
//! Phase-accumulating tone generation, continuous across buffer boundaries:
//!
//! - [`Waveform`] - Waveform kinds (Sine, Sawtooth, Square)
//! - [`Harmonics`] - Additive harmonic coefficients for the sine kind
//! - [`PhaseVector`] - Per-harmonic phase carried between renders
//! - [`render`] - Fill a buffer for one frequency, threading phase through
//!
//! ```rust
//! use ondine_synth::{render, Harmonics, PhaseVector, Waveform};
//!
//! let harmonics = Harmonics::fundamental();
//! let mut phases = PhaseVector::zeroed(harmonics.len());
//! let mut buffer = [0.0f32; 256];
//! render(440.0, &mut buffer, 44100.0, &mut phases, Waveform::Sine, &harmonics);
//! ```
//!
//! ## Envelopes
//!
//! Fixed-length amplitude tables with attack/decay/sustain/release stages:
//!
//! ```rust
//! use ondine_synth::Envelope;
//!
//! let env = Envelope::build(1.0, 0.1, 0.1, 0.8, 0.1, 44100.0).unwrap();
//! assert_eq!(env.len(), 44100);
//! ```
//!
//! ## Engine
//!
//! [`Synth`] owns the shared voice state; [`SynthController`] mutates it
//! from any thread and [`SynthRenderer`] fills output buffers under a
//! real-time deadline:
//!
//! ```rust
//! use ondine_synth::{Synth, SynthConfig};
//!
//! let synth = Synth::new(SynthConfig::default());
//! let controller = synth.controller();
//! let mut renderer = synth.renderer();
//!
//! controller.play_chord(&[261.63, 329.63, 392.00]).unwrap();
//!
//! let mut buffer = vec![0.0f32; 1024];
//! renderer.fill(&mut buffer);
//! ```
//!
//! # no_std Support
//!
//! The waveform, envelope, voice, and note modules are `no_std` compatible
//! (with `alloc`). The threaded engine requires the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! ondine-synth = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
pub mod engine;
pub mod envelope;
pub mod note;
pub mod voice;
pub mod waveform;

// Re-export main types at crate root
#[cfg(feature = "std")]
pub use engine::{Synth, SynthConfig, SynthController, SynthRenderer, WaveformTap};
pub use envelope::{Envelope, EnvelopeError};
pub use note::{NoteError, closest_note, note_to_freq, shift_octave};
pub use voice::Voice;
pub use waveform::{Harmonics, PhaseVector, Waveform, render};
