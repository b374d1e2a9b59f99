//! Waveform generation with per-harmonic phase tracking.
//!
//! All waveform kinds are generated from accumulated phase rather than
//! absolute time, so a tone stays continuous across buffer boundaries and
//! across mid-note frequency changes. The caller threads a [`PhaseVector`]
//! through successive [`render`] calls; no clock is needed.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::f32::consts::TAU;
use libm::{floorf, sinf};

/// Euclidean remainder for f32, compatible with no_std.
#[inline]
fn rem_euclid_f32(a: f32, b: f32) -> f32 {
    let r = a - b * floorf(a / b);
    if r < 0.0 { r + b } else { r }
}

/// Waveform kinds.
///
/// Only [`Waveform::Sine`] supports additive harmonics; sawtooth and square
/// are defined at the fundamental and ignore coefficients past index 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Waveform {
    /// Sine waveform — pure fundamental plus optional additive harmonics.
    #[default]
    Sine,
    /// Sawtooth waveform — bright, all-harmonic ramp.
    Sawtooth,
    /// Square waveform — odd harmonics, hollow timbre.
    Square,
}

/// Ordered additive-harmonic amplitude coefficients.
///
/// Index 0 is the fundamental (conventionally 1.0); index `i` scales the
/// partial at `frequency * (i + 1)`. The set is never empty: constructing
/// from an empty slice yields the fundamental-only set.
#[derive(Debug, Clone, PartialEq)]
pub struct Harmonics {
    coeffs: Vec<f32>,
}

impl Harmonics {
    /// Fundamental-only set: a single coefficient of 1.0.
    pub fn fundamental() -> Self {
        let mut coeffs = Vec::with_capacity(1);
        coeffs.push(1.0);
        Self { coeffs }
    }

    /// Build a harmonic set from amplitude coefficients.
    ///
    /// An empty slice degenerates to [`Harmonics::fundamental`] so the
    /// length-≥-1 invariant always holds.
    pub fn new(coeffs: &[f32]) -> Self {
        if coeffs.is_empty() {
            return Self::fundamental();
        }
        Self {
            coeffs: coeffs.to_vec(),
        }
    }

    /// Number of harmonics, fundamental included. Always ≥ 1.
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Always false; kept for API completeness.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The amplitude coefficients, fundamental first.
    pub fn coeffs(&self) -> &[f32] {
        &self.coeffs
    }
}

impl Default for Harmonics {
    fn default() -> Self {
        Self::fundamental()
    }
}

/// Per-harmonic phase in radians `[0, 2π)`, carried between renders.
///
/// Fixed shape: sized once at voice activation. A different harmonic count
/// requires a new vector, not in-place resizing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhaseVector {
    phases: Vec<f32>,
}

impl PhaseVector {
    /// A zero phase for each of `len` harmonics.
    pub fn zeroed(len: usize) -> Self {
        let mut phases = Vec::with_capacity(len.max(1));
        phases.resize(len.max(1), 0.0);
        Self { phases }
    }

    /// Number of tracked harmonics.
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// True when no phases are tracked (only for `Default`-built vectors).
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Phase of harmonic `index`, if tracked.
    pub fn get(&self, index: usize) -> Option<f32> {
        self.phases.get(index).copied()
    }

    /// All phases, fundamental first.
    pub fn phases(&self) -> &[f32] {
        &self.phases
    }
}

/// Fill `out` with one voice's waveform, threading phase through.
///
/// Each sample advances harmonic `h` by `2π·frequency·(h+1)/sample_rate`;
/// the final phases are written back to `phases` so the next call continues
/// exactly where this one left off. A `frequency` of zero (a released or
/// idle voice) zero-fills the buffer without touching trigonometry or the
/// phase vector.
///
/// No normalization happens here; summing and clamping are the caller's
/// concern.
pub fn render(
    frequency: f32,
    out: &mut [f32],
    sample_rate: f32,
    phases: &mut PhaseVector,
    waveform: Waveform,
    harmonics: &Harmonics,
) {
    if frequency <= 0.0 || phases.phases.is_empty() {
        out.fill(0.0);
        return;
    }

    match waveform {
        Waveform::Sine => {
            out.fill(0.0);
            let tracked = phases.phases.len().min(harmonics.len());
            for (h, &coeff) in harmonics.coeffs().iter().take(tracked).enumerate() {
                let inc = TAU * frequency * (h as f32 + 1.0) / sample_rate;
                let mut phase = phases.phases[h];
                for sample in out.iter_mut() {
                    *sample += coeff * sinf(phase);
                    phase = rem_euclid_f32(phase + inc, TAU);
                }
                phases.phases[h] = phase;
            }
        }
        Waveform::Sawtooth => {
            let inc = TAU * frequency / sample_rate;
            let mut phase = phases.phases[0];
            for sample in out.iter_mut() {
                let cycle = phase / TAU;
                *sample = 2.0 * (cycle - floorf(0.5 + cycle));
                phase = rem_euclid_f32(phase + inc, TAU);
            }
            phases.phases[0] = phase;
        }
        Waveform::Square => {
            let inc = TAU * frequency / sample_rate;
            let mut phase = phases.phases[0];
            for sample in out.iter_mut() {
                *sample = if sinf(phase) >= 0.0 { 1.0 } else { -1.0 };
                phase = rem_euclid_f32(phase + inc, TAU);
            }
            phases.phases[0] = phase;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "std"))]
    use alloc::vec;
    #[cfg(not(feature = "std"))]
    use alloc::vec::Vec;

    #[test]
    fn zero_frequency_is_silent() {
        let harmonics = Harmonics::fundamental();
        let mut phases = PhaseVector::zeroed(1);
        let mut buf = [1.0f32; 64];
        render(0.0, &mut buf, 44100.0, &mut phases, Waveform::Sine, &harmonics);
        assert!(buf.iter().all(|&s| s == 0.0));
        assert_eq!(phases.get(0), Some(0.0), "phase untouched while silent");
    }

    #[test]
    fn sine_frequency_440hz() {
        let harmonics = Harmonics::fundamental();
        let mut phases = PhaseVector::zeroed(1);
        let mut buf = vec![0.0f32; 44100];
        render(440.0, &mut buf, 44100.0, &mut phases, Waveform::Sine, &harmonics);

        // Count positive-going zero crossings to verify frequency.
        let mut crossings: i32 = 0;
        let mut prev = 0.0;
        for &s in &buf {
            if prev <= 0.0 && s > 0.0 {
                crossings += 1;
            }
            prev = s;
        }
        assert!(
            (crossings - 440).abs() <= 2,
            "expected ~440 zero crossings, got {}",
            crossings
        );
    }

    #[test]
    fn sine_chunked_equals_single_render() {
        let harmonics = Harmonics::new(&[1.0, 0.5, 0.25]);
        let sr = 44100.0;

        let mut whole = vec![0.0f32; 4096];
        let mut phases_whole = PhaseVector::zeroed(harmonics.len());
        render(440.0, &mut whole, sr, &mut phases_whole, Waveform::Sine, &harmonics);

        let mut chunked = vec![0.0f32; 4096];
        let mut phases_chunked = PhaseVector::zeroed(harmonics.len());
        for chunk in chunked.chunks_mut(300) {
            render(440.0, chunk, sr, &mut phases_chunked, Waveform::Sine, &harmonics);
        }

        for (i, (a, b)) in whole.iter().zip(chunked.iter()).enumerate() {
            assert!(
                (a - b).abs() < 1e-4,
                "sample {} diverged: {} vs {}",
                i,
                a,
                b
            );
        }
    }

    #[test]
    fn sawtooth_range_and_shape() {
        let harmonics = Harmonics::fundamental();
        let mut phases = PhaseVector::zeroed(1);
        let mut buf = vec![0.0f32; 44100];
        render(100.0, &mut buf, 44100.0, &mut phases, Waveform::Sawtooth, &harmonics);

        assert!(buf.iter().all(|&s| (-1.0..=1.0).contains(&s)));
        // A saw spends equal time above and below zero.
        let positive = buf.iter().filter(|&&s| s > 0.0).count();
        let ratio = positive as f32 / buf.len() as f32;
        assert!((ratio - 0.5).abs() < 0.02, "positive ratio {}", ratio);
    }

    #[test]
    fn square_is_bipolar_unit() {
        let harmonics = Harmonics::fundamental();
        let mut phases = PhaseVector::zeroed(1);
        let mut buf = vec![0.0f32; 4410];
        render(220.0, &mut buf, 44100.0, &mut phases, Waveform::Square, &harmonics);
        assert!(buf.iter().all(|&s| s == 1.0 || s == -1.0));
    }

    #[test]
    fn square_chunked_equals_single_render() {
        let harmonics = Harmonics::fundamental();
        let sr = 44100.0;

        let mut whole = vec![0.0f32; 2048];
        let mut phases_whole = PhaseVector::zeroed(1);
        render(330.0, &mut whole, sr, &mut phases_whole, Waveform::Square, &harmonics);

        let mut chunked = vec![0.0f32; 2048];
        let mut phases_chunked = PhaseVector::zeroed(1);
        for chunk in chunked.chunks_mut(129) {
            render(330.0, chunk, sr, &mut phases_chunked, Waveform::Square, &harmonics);
        }

        assert_eq!(whole, chunked);
    }

    #[test]
    fn harmonics_never_empty() {
        let h = Harmonics::new(&[]);
        assert_eq!(h.len(), 1);
        assert_eq!(h.coeffs()[0], 1.0);
    }

    #[test]
    fn phase_stays_in_range() {
        let harmonics = Harmonics::new(&[1.0, 0.7]);
        let mut phases = PhaseVector::zeroed(2);
        let mut buf = [0.0f32; 512];
        for _ in 0..50 {
            render(7040.0, &mut buf, 44100.0, &mut phases, Waveform::Sine, &harmonics);
        }
        for &p in phases.phases() {
            assert!((0.0..TAU).contains(&p), "phase out of range: {}", p);
        }
    }

    #[test]
    fn frequency_change_keeps_continuity() {
        // Phase accumulation means the waveform value right after a
        // frequency change stays close to the value right before it.
        let harmonics = Harmonics::fundamental();
        let mut phases = PhaseVector::zeroed(1);
        let sr = 44100.0;

        let mut first = vec![0.0f32; 441];
        render(440.0, &mut first, sr, &mut phases, Waveform::Sine, &harmonics);
        let before = *first.last().unwrap();

        let mut second = vec![0.0f32; 4];
        render(523.25, &mut second, sr, &mut phases, Waveform::Sine, &harmonics);

        // One sample step at either rate moves the sine by < 0.08.
        assert!(
            (second[0] - before).abs() < 0.1,
            "discontinuity across frequency change: {} -> {}",
            before,
            second[0]
        );
    }
}
