//! The synthesis engine: shared voice state, control API, render callback.
//!
//! [`Synth`] owns one voice behind a mutex plus a stop flag, shared between
//! two handle types with strictly divided responsibilities:
//!
//! - [`SynthController`] (any thread) selects what sounds: it starts notes
//!   and chords, stops them, and raises the cooperative stop flag. Envelope
//!   construction happens before the lock is taken; the critical section is
//!   a handful of field writes.
//! - [`SynthRenderer`] (the audio thread) fills output buffers. It snapshots
//!   the voice under the lock, computes outside it, and re-acquires the lock
//!   only to publish advanced phase and envelope position. A control write
//!   that lands mid-compute wins over the stale render result.
//!
//! A note change therefore takes effect at the next buffer boundary, never
//! mid-buffer, and the render path holds the lock only long enough to copy
//! a few fields.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::envelope::{Envelope, EnvelopeError};
use crate::voice::Voice;
use crate::waveform::{Harmonics, Waveform, render};

/// Engine configuration: sample rate, note shape, and master gain.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    /// Output sample rate in Hz.
    pub sample_rate: f32,
    /// Total duration of a triggered note in seconds.
    pub note_duration: f32,
    /// Envelope attack time in seconds.
    pub attack: f32,
    /// Envelope decay time in seconds.
    pub decay: f32,
    /// Envelope sustain level in `[0, 1]`.
    pub sustain_level: f32,
    /// Envelope release time in seconds.
    pub release: f32,
    /// Master gain applied after summing, before the final clamp.
    pub amplitude: f32,
    /// Waveform kind.
    pub waveform: Waveform,
    /// Additive harmonic coefficients (sine kind only).
    pub harmonics: Harmonics,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44100.0,
            note_duration: 0.5,
            attack: 0.05,
            decay: 0.3,
            sustain_level: 0.8,
            release: 0.1,
            amplitude: 0.3,
            waveform: Waveform::Sine,
            harmonics: Harmonics::fundamental(),
        }
    }
}

/// The shared control block: the one object both contexts write.
struct Shared {
    voice: Mutex<Voice>,
    stop: AtomicBool,
}

/// A polyphonic tone synthesizer session.
///
/// Owns the shared voice state for the lifetime of the audio session and
/// hands out [`SynthController`] and [`SynthRenderer`] handles. Explicitly
/// not a process-wide singleton: several independent synths can coexist.
pub struct Synth {
    shared: Arc<Shared>,
    config: SynthConfig,
}

impl Synth {
    /// Create a synth with the given configuration.
    pub fn new(config: SynthConfig) -> Self {
        let voice = Voice::new(config.waveform, config.harmonics.clone());
        Self {
            shared: Arc::new(Shared {
                voice: Mutex::new(voice),
                stop: AtomicBool::new(false),
            }),
            config,
        }
    }

    /// The configuration this synth was built with.
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// A control handle, cloneable and sendable to any thread.
    pub fn controller(&self) -> SynthController {
        SynthController {
            shared: Arc::clone(&self.shared),
            config: self.config.clone(),
        }
    }

    /// The render handle for the audio callback.
    pub fn renderer(&self) -> SynthRenderer {
        SynthRenderer {
            shared: Arc::clone(&self.shared),
            sample_rate: self.config.sample_rate,
            amplitude: self.config.amplitude,
            snapshot: Voice::new(self.config.waveform, self.config.harmonics.clone()),
            scratch: Vec::new(),
            tap: None,
        }
    }
}

impl Default for Synth {
    fn default() -> Self {
        Self::new(SynthConfig::default())
    }
}

/// Control-side handle: note selection and cooperative cancellation.
#[derive(Clone)]
pub struct SynthController {
    shared: Arc<Shared>,
    config: SynthConfig,
}

impl SynthController {
    /// Start a single note at `frequency` Hz.
    ///
    /// Builds a fresh envelope for the configured note duration, then
    /// swaps it in under the lock. Supersedes any sounding note with no
    /// crossfade.
    pub fn play_note(&self, frequency: f32) -> Result<(), EnvelopeError> {
        self.play_chord(&[frequency])
    }

    /// Start all `frequencies` simultaneously as one chord.
    ///
    /// Every chord member shares one envelope and one read position,
    /// started in lockstep. An empty slice is equivalent to [`stop_all`].
    ///
    /// [`stop_all`]: SynthController::stop_all
    pub fn play_chord(&self, frequencies: &[f32]) -> Result<(), EnvelopeError> {
        if frequencies.is_empty() {
            self.stop_all();
            return Ok(());
        }

        // Envelope construction stays outside the critical section.
        let envelope = Arc::new(Envelope::build(
            self.config.note_duration,
            self.config.attack,
            self.config.decay,
            self.config.sustain_level,
            self.config.release,
            self.config.sample_rate,
        )?);

        let mut voice = self.lock_voice();
        voice.activate(frequencies, envelope);
        Ok(())
    }

    /// Stop the sounding note. The next render emits silence; there is no
    /// release tail.
    pub fn stop_note(&self) {
        self.stop_all();
    }

    /// Stop everything that sounds.
    pub fn stop_all(&self) {
        self.lock_voice().clear();
    }

    /// Change the waveform kind for current and future notes.
    pub fn set_waveform(&self, waveform: Waveform) {
        self.lock_voice().set_waveform(waveform);
    }

    /// Replace the harmonic set; applies from the next note.
    pub fn set_harmonics(&self, harmonics: Harmonics) {
        self.lock_voice().set_harmonics(harmonics);
    }

    /// Raise the cooperative stop flag. The renderer emits silence from
    /// its next call onward; chunked playback loops poll this between
    /// chunks and return.
    pub fn signal_stop(&self) {
        self.shared.stop.store(true, Ordering::SeqCst);
    }

    /// Lower the stop flag, re-arming the engine.
    pub fn clear_stop(&self) {
        self.shared.stop.store(false, Ordering::SeqCst);
    }

    /// Whether a stop has been requested.
    pub fn stop_requested(&self) -> bool {
        self.shared.stop.load(Ordering::SeqCst)
    }

    fn lock_voice(&self) -> std::sync::MutexGuard<'_, Voice> {
        // A poisoned mutex means a panic elsewhere; the voice data itself
        // is plain numbers, still safe to use.
        match self.shared.voice.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Render-side handle: fills output buffers under a real-time deadline.
///
/// Holds its own scratch buffers so steady-state rendering does not
/// allocate; buffers grow only when the host supplies a larger buffer
/// than seen before.
pub struct SynthRenderer {
    shared: Arc<Shared>,
    sample_rate: f32,
    amplitude: f32,
    snapshot: Voice,
    scratch: Vec<f32>,
    tap: Option<WaveformTap>,
}

impl SynthRenderer {
    /// Fill `out` with the next buffer of mono samples.
    ///
    /// This is the real-time callback body: stop-flag check, snapshot
    /// under the lock, lock-free computation, publish under the lock,
    /// final clamp to `[-1, 1]`.
    pub fn fill(&mut self, out: &mut [f32]) {
        if self.shared.stop.load(Ordering::SeqCst) {
            out.fill(0.0);
            return;
        }

        {
            let voice = match self.shared.voice.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            self.snapshot.clone_from(&voice);
        }

        if !self.snapshot.is_active() {
            out.fill(0.0);
            return;
        }
        let Some(envelope) = self.snapshot.envelope().map(Arc::clone) else {
            out.fill(0.0);
            return;
        };

        let frames = out.len();
        let position = self.snapshot.position();
        self.scratch.resize(frames, 0.0);
        out.fill(0.0);

        // Per-voice render and envelope application; chord members sum
        // without per-voice renormalization (headroom handled by the
        // final clamp).
        let mut exhausted = position >= envelope.len();
        let sample_rate = self.sample_rate;
        let (frequencies, phases, waveform, harmonics) = self.snapshot.parts_mut();
        for (i, &frequency) in frequencies.iter().enumerate() {
            render(
                frequency,
                &mut self.scratch,
                sample_rate,
                &mut phases[i],
                waveform,
                harmonics,
            );
            for (j, sample) in self.scratch.iter().enumerate() {
                match envelope.get(position + j) {
                    Some(amp) => out[j] += sample * amp,
                    None => {
                        // Envelope exhausted: remaining samples stay zero
                        // and the voice self-terminates on publish.
                        exhausted = true;
                        break;
                    }
                }
            }
        }

        for sample in out.iter_mut() {
            *sample = (*sample * self.amplitude).clamp(-1.0, 1.0);
        }

        {
            let mut voice = self.lock_voice();
            voice.publish(&self.snapshot, frames, exhausted);
        }

        if let Some(tap) = &self.tap {
            tap.push(out);
        }
    }

    /// Attach a debug tap that receives a best-effort copy of every
    /// rendered buffer.
    pub fn install_tap(&mut self, tap: &WaveformTap) {
        self.tap = Some(tap.clone());
    }

    /// Detach the debug tap.
    pub fn remove_tap(&mut self) {
        self.tap = None;
    }

    fn lock_voice(&self) -> std::sync::MutexGuard<'_, Voice> {
        match self.shared.voice.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// One-way, best-effort copy of rendered buffers for offline inspection.
///
/// The render side uses `try_lock` and simply drops the chunk when a
/// reader holds the lock, so the tap can never stall the audio thread.
/// Capacity is bounded; once full, further samples are dropped.
#[derive(Clone)]
pub struct WaveformTap {
    buffer: Arc<Mutex<Vec<f32>>>,
    capacity: usize,
}

impl WaveformTap {
    /// A tap that retains at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(Vec::new())),
            capacity,
        }
    }

    /// Copy of everything captured so far.
    pub fn samples(&self) -> Vec<f32> {
        match self.buffer.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Discard captured samples.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.buffer.lock() {
            guard.clear();
        }
    }

    /// Render-side push: non-blocking, drops on contention or when full.
    fn push(&self, chunk: &[f32]) {
        if let Ok(mut guard) = self.buffer.try_lock() {
            let room = self.capacity.saturating_sub(guard.len());
            guard.extend_from_slice(&chunk[..chunk.len().min(room)]);
        }
    }
}
