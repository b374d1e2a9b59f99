//! Voice state: what is currently sounding.
//!
//! A [`Voice`] records the active frequencies, the per-frequency phase
//! vectors, the envelope handle, and the read position within it. Control
//! code activates and clears voices; only the render path advances phase
//! and position. The `generation` counter lets the renderer detect a
//! control write that landed while it was computing, so a stale render
//! result never overwrites a fresher note.

#[cfg(not(feature = "std"))]
use alloc::{sync::Arc, vec::Vec};
#[cfg(feature = "std")]
use std::sync::Arc;

use crate::envelope::Envelope;
use crate::waveform::{Harmonics, PhaseVector, Waveform};

/// Mutable record of the currently sounding note or chord.
#[derive(Debug, Clone, Default)]
pub struct Voice {
    /// Active frequencies in Hz; empty means silent.
    frequencies: Vec<f32>,
    /// One phase vector per active frequency, same order.
    phases: Vec<PhaseVector>,
    /// Shared envelope table; `None` means silent.
    envelope: Option<Arc<Envelope>>,
    /// Read position within the envelope, in samples.
    position: usize,
    /// Waveform kind for the next and current activation.
    waveform: Waveform,
    /// Harmonic set; phase vectors are sized to it at activation.
    harmonics: Harmonics,
    /// Bumped by every control-side write.
    generation: u64,
}

impl Voice {
    /// A silent voice with the given timbre settings.
    pub fn new(waveform: Waveform, harmonics: Harmonics) -> Self {
        Self {
            frequencies: Vec::new(),
            phases: Vec::new(),
            envelope: None,
            position: 0,
            waveform,
            harmonics,
            generation: 0,
        }
    }

    /// Start sounding `frequencies` with a fresh envelope.
    ///
    /// Phase vectors are zeroed and sized to the current harmonic set;
    /// the envelope position resets to 0. Supersedes whatever was sounding
    /// before, with no crossfade.
    pub fn activate(&mut self, frequencies: &[f32], envelope: Arc<Envelope>) {
        self.frequencies.clear();
        self.frequencies.extend_from_slice(frequencies);
        self.phases.clear();
        self.phases
            .resize(frequencies.len(), PhaseVector::zeroed(self.harmonics.len()));
        self.envelope = Some(envelope);
        self.position = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Stop sounding: clears frequencies and drops the envelope handle.
    pub fn clear(&mut self) {
        self.frequencies.clear();
        self.phases.clear();
        self.envelope = None;
        self.position = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// True while at least one frequency sounds with an envelope attached.
    pub fn is_active(&self) -> bool {
        !self.frequencies.is_empty() && self.envelope.is_some()
    }

    /// Active frequencies in Hz.
    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    /// Phase vectors, one per active frequency.
    pub fn phases(&self) -> &[PhaseVector] {
        &self.phases
    }

    /// Mutable phase vectors — render-context only.
    pub fn phases_mut(&mut self) -> &mut [PhaseVector] {
        &mut self.phases
    }

    /// Disjoint borrows of everything the render loop reads and writes:
    /// frequencies, mutable phase vectors, waveform kind, harmonic set.
    pub fn parts_mut(&mut self) -> (&[f32], &mut [PhaseVector], Waveform, &Harmonics) {
        (
            &self.frequencies,
            &mut self.phases,
            self.waveform,
            &self.harmonics,
        )
    }

    /// The envelope handle, if sounding.
    pub fn envelope(&self) -> Option<&Arc<Envelope>> {
        self.envelope.as_ref()
    }

    /// Envelope read position in samples.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Advance the envelope position — render-context only.
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// Waveform kind.
    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    /// Change the waveform kind; takes effect immediately for the sine and
    /// square kinds since all share the same phase discipline.
    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Harmonic set.
    pub fn harmonics(&self) -> &Harmonics {
        &self.harmonics
    }

    /// Replace the harmonic set; applies from the next activation, when
    /// the phase vectors are rebuilt to the new shape.
    pub fn set_harmonics(&mut self, harmonics: Harmonics) {
        self.harmonics = harmonics;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Control-write generation counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Copy advanced phase/position back from a render snapshot.
    ///
    /// Publishes only if no control write happened since the snapshot was
    /// taken; returns whether the publish was applied. When `exhausted` is
    /// set the voice self-terminates (frequencies cleared) without bumping
    /// the generation, since this is the render context's own write.
    pub fn publish(&mut self, snapshot: &Voice, frames: usize, exhausted: bool) -> bool {
        if self.generation != snapshot.generation {
            return false;
        }
        if exhausted {
            self.frequencies.clear();
            self.phases.clear();
            self.envelope = None;
            self.position = 0;
        } else {
            self.phases.clone_from(&snapshot.phases);
            self.position = snapshot.position + frames;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_envelope() -> Arc<Envelope> {
        Arc::new(Envelope::build(0.5, 0.05, 0.1, 0.8, 0.1, 44100.0).unwrap())
    }

    #[test]
    fn starts_silent() {
        let voice = Voice::new(Waveform::Sine, Harmonics::fundamental());
        assert!(!voice.is_active());
        assert!(voice.frequencies().is_empty());
    }

    #[test]
    fn activate_resets_phase_and_position() {
        let mut voice = Voice::new(Waveform::Sine, Harmonics::new(&[1.0, 0.5]));
        voice.activate(&[440.0], test_envelope());

        assert!(voice.is_active());
        assert_eq!(voice.frequencies(), &[440.0]);
        assert_eq!(voice.phases().len(), 1);
        assert_eq!(voice.phases()[0].len(), 2, "phase vector sized to harmonics");
        assert_eq!(voice.position(), 0);
    }

    #[test]
    fn chord_gets_one_phase_vector_per_frequency() {
        let mut voice = Voice::new(Waveform::Sine, Harmonics::fundamental());
        voice.activate(&[261.63, 329.63, 392.00], test_envelope());
        assert_eq!(voice.phases().len(), 3);
    }

    #[test]
    fn clear_drops_everything() {
        let mut voice = Voice::new(Waveform::Sine, Harmonics::fundamental());
        voice.activate(&[440.0], test_envelope());
        voice.set_position(100);
        voice.clear();

        assert!(!voice.is_active());
        assert!(voice.envelope().is_none());
        assert_eq!(voice.position(), 0);
    }

    #[test]
    fn publish_applies_when_generation_matches() {
        let mut voice = Voice::new(Waveform::Sine, Harmonics::fundamental());
        voice.activate(&[440.0], test_envelope());

        let snapshot = voice.clone();
        assert!(voice.publish(&snapshot, 128, false));
        assert_eq!(voice.position(), 128);
    }

    #[test]
    fn publish_skipped_after_control_write() {
        let mut voice = Voice::new(Waveform::Sine, Harmonics::fundamental());
        voice.activate(&[440.0], test_envelope());

        let snapshot = voice.clone();
        // A control write lands while the renderer computes.
        voice.activate(&[523.25], test_envelope());

        assert!(!voice.publish(&snapshot, 128, false));
        assert_eq!(voice.frequencies(), &[523.25], "newer note wins");
        assert_eq!(voice.position(), 0);
    }

    #[test]
    fn publish_exhaustion_self_terminates() {
        let mut voice = Voice::new(Waveform::Sine, Harmonics::fundamental());
        voice.activate(&[440.0], test_envelope());

        let snapshot = voice.clone();
        assert!(voice.publish(&snapshot, 512, true));
        assert!(!voice.is_active());
    }
}
