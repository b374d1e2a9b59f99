//! Note names, equal-tempered tuning, and octave shifts.
//!
//! Covers the named range C0..A8 at standard tuning (A4 = 440 Hz), which is
//! also the playable frequency window the octave-shift helpers clamp to.

#[cfg(not(feature = "std"))]
use alloc::string::String;

use libm::powf;

/// Lowest playable frequency in Hz (just under C0).
pub const MIN_FREQUENCY: f32 = 16.0;
/// Highest playable frequency in Hz (just above A8).
pub const MAX_FREQUENCY: f32 = 7100.0;

/// Semitone names, sharps only. Flats are folded in when parsing.
const NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Note parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoteError {
    /// The name did not parse as `<letter>[#|b]<octave>`.
    #[error("unrecognized note name '{0}'")]
    Unrecognized(String),
    /// The note parsed but lies outside the supported C0..A8 range.
    #[error("note '{0}' is outside the supported range C0..A8")]
    OutOfRange(String),
}

/// Frequency of the note `semitones` above C0, equal temperament.
fn semitone_to_freq(semitones: i32) -> f32 {
    // A4 = 440 Hz sits 57 semitones above C0.
    440.0 * powf(2.0, (semitones - 57) as f32 / 12.0)
}

/// Parse a note name like `"A4"`, `"C#3"`, or `"Bb2"` into a frequency.
pub fn note_to_freq(name: &str) -> Result<f32, NoteError> {
    let unrecognized = || NoteError::Unrecognized(String::from(name));

    let bytes = name.as_bytes();
    if bytes.len() < 2 {
        return Err(unrecognized());
    }

    let letter = bytes[0].to_ascii_uppercase();
    if !(b'A'..=b'G').contains(&letter) {
        return Err(unrecognized());
    }
    let base = match letter {
        b'C' => 0,
        b'D' => 2,
        b'E' => 4,
        b'F' => 5,
        b'G' => 7,
        b'A' => 9,
        b'B' => 11,
        _ => unreachable!(),
    };

    let (accidental, rest) = match bytes[1] {
        b'#' => (1, &name[2..]),
        b'b' => (-1, &name[2..]),
        _ => (0, &name[1..]),
    };

    let octave: i32 = rest.parse().map_err(|_| unrecognized())?;
    if !(0..=8).contains(&octave) {
        return Err(NoteError::OutOfRange(String::from(name)));
    }

    let semitones = octave * 12 + base + accidental;
    let freq = semitone_to_freq(semitones);
    if !(MIN_FREQUENCY..=MAX_FREQUENCY).contains(&freq) {
        return Err(NoteError::OutOfRange(String::from(name)));
    }
    Ok(freq)
}

/// Name of the equal-tempered note closest to `freq`, sharps preferred.
///
/// Intended for display; out-of-range frequencies clamp to the nearest
/// named endpoint.
pub fn closest_note(freq: f32) -> String {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    // C0 (0) through A8 (105).
    for semitones in 0..=105 {
        let dist = (semitone_to_freq(semitones) - freq).abs();
        if dist < best_dist {
            best_dist = dist;
            best = semitones;
        }
    }
    let name = NAMES[(best % 12) as usize];
    let octave = best / 12;
    let mut out = String::from(name);
    out.push((b'0' + octave as u8) as char);
    out
}

/// Shift `freq` by whole octaves, clamped to the playable window.
///
/// A shift that would leave `[MIN_FREQUENCY, MAX_FREQUENCY]` leaves the
/// frequency unchanged, matching how the front-ends stop at the ends of
/// the keyboard rather than wrapping.
pub fn shift_octave(freq: f32, octaves: i32) -> f32 {
    let shifted = freq * powf(2.0, octaves as f32);
    if (MIN_FREQUENCY..=MAX_FREQUENCY).contains(&shifted) {
        shifted
    } else {
        freq
    }
}
