//! Linear ADSR amplitude envelopes built as per-sample tables.
//!
//! An [`Envelope`] is constructed once per note, before any audio is
//! produced, and read by the render path as a plain slice. The table form
//! keeps the real-time side allocation-free and makes the note's exact
//! length (`round(duration * sample_rate)` samples) a structural invariant.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use libm::roundf;

/// Envelope construction errors.
///
/// These are configuration errors: they surface synchronously at build
/// time and never mid-stream.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EnvelopeError {
    /// Attack plus decay alone exceed the note duration — the shape is
    /// ambiguous (no room for any sustain), so it is rejected rather than
    /// silently reinterpreted.
    #[error("attack ({attack} s) plus decay ({decay} s) exceed the note duration ({duration} s)")]
    StagesExceedDuration {
        /// Attack time in seconds.
        attack: f32,
        /// Decay time in seconds.
        decay: f32,
        /// Total note duration in seconds.
        duration: f32,
    },

    /// Duration must be positive and finite.
    #[error("note duration must be positive, got {0} s")]
    InvalidDuration(f32),

    /// Sample rate must be positive and finite.
    #[error("sample rate must be positive, got {0} Hz")]
    InvalidSampleRate(f32),
}

/// A fixed-length sequence of amplitude multipliers in `[0, 1]`.
///
/// Stages: linear attack 0→1, linear decay 1→sustain, sustain hold, linear
/// release sustain→0. Stage sample counts are computed independently; when
/// attack + decay + release would overrun the total, the sustain stage
/// collapses to zero length and the release is truncated to the samples
/// that remain.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    samples: Vec<f32>,
    sample_rate: f32,
    duration: f32,
}

impl Envelope {
    /// Build an envelope table for a note of `duration` seconds.
    ///
    /// `sustain_level` is clamped to `[0, 1]`. Fails when `attack + decay`
    /// exceed `duration` (see [`EnvelopeError::StagesExceedDuration`]).
    pub fn build(
        duration: f32,
        attack: f32,
        decay: f32,
        sustain_level: f32,
        release: f32,
        sample_rate: f32,
    ) -> Result<Self, EnvelopeError> {
        if !(duration > 0.0 && duration.is_finite()) {
            return Err(EnvelopeError::InvalidDuration(duration));
        }
        if !(sample_rate > 0.0 && sample_rate.is_finite()) {
            return Err(EnvelopeError::InvalidSampleRate(sample_rate));
        }
        if attack + decay > duration {
            return Err(EnvelopeError::StagesExceedDuration {
                attack,
                decay,
                duration,
            });
        }

        let total = roundf(duration * sample_rate) as usize;
        let sustain = sustain_level.clamp(0.0, 1.0);

        let attack_len = ((attack.max(0.0) * sample_rate) as usize).min(total);
        let decay_len = ((decay.max(0.0) * sample_rate) as usize).min(total - attack_len);
        let release_len =
            ((release.max(0.0) * sample_rate) as usize).min(total - attack_len - decay_len);
        let sustain_len = total - attack_len - decay_len - release_len;

        let mut samples = Vec::with_capacity(total);
        push_ramp(&mut samples, 0.0, 1.0, attack_len);
        push_ramp(&mut samples, 1.0, sustain, decay_len);
        samples.resize(samples.len() + sustain_len, sustain);
        push_ramp(&mut samples, sustain, 0.0, release_len);
        debug_assert_eq!(samples.len(), total);

        Ok(Self {
            samples,
            sample_rate,
            duration,
        })
    }

    /// Number of samples: exactly `round(duration * sample_rate)`.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True for a degenerate zero-length envelope.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The amplitude multipliers, one per sample.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Amplitude at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<f32> {
        self.samples.get(index).copied()
    }

    /// Sample rate the table was built for, in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Note duration in seconds.
    pub fn duration(&self) -> f32 {
        self.duration
    }
}

/// Append a linear ramp from `from` to `to` over `len` samples, endpoints
/// included, each value clamped to `[0, 1]`.
fn push_ramp(samples: &mut Vec<f32>, from: f32, to: f32, len: usize) {
    match len {
        0 => {}
        1 => samples.push(from.clamp(0.0, 1.0)),
        _ => {
            let step = (to - from) / (len - 1) as f32;
            for i in 0..len {
                let v = from + step * i as f32;
                samples.push(v.clamp(0.0, 1.0));
            }
        }
    }
}
