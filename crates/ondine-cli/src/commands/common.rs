//! Shared tone-shaping arguments and pitch parsing.

use clap::{Args, ValueEnum};
use ondine_synth::{Harmonics, SynthConfig, Waveform, note_to_freq};

/// Waveform kind, as seen on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum WaveformArg {
    /// Additive sine with configurable harmonics
    Sine,
    /// Bipolar sawtooth
    Sawtooth,
    /// Bipolar square
    Square,
}

impl From<WaveformArg> for Waveform {
    fn from(arg: WaveformArg) -> Self {
        match arg {
            WaveformArg::Sine => Waveform::Sine,
            WaveformArg::Sawtooth => Waveform::Sawtooth,
            WaveformArg::Square => Waveform::Square,
        }
    }
}

/// Tone-shaping options shared by the play, chord, and render commands.
#[derive(Args)]
pub struct ToneArgs {
    /// Waveform kind
    #[arg(long, value_enum, default_value = "sine")]
    pub waveform: WaveformArg,

    /// Harmonic coefficients for the sine kind, comma-separated
    #[arg(long, default_value = "1.0,0.5,0.25,0.125", value_parser = parse_harmonics)]
    pub harmonics: Harmonics,

    /// Note duration in seconds
    #[arg(long, default_value = "0.5")]
    pub duration: f32,

    /// Envelope attack in seconds
    #[arg(long, default_value = "0.05")]
    pub attack: f32,

    /// Envelope decay in seconds
    #[arg(long, default_value = "0.3")]
    pub decay: f32,

    /// Envelope sustain level (0.0 - 1.0)
    #[arg(long, default_value = "0.8")]
    pub sustain: f32,

    /// Envelope release in seconds
    #[arg(long, default_value = "0.1")]
    pub release: f32,

    /// Master amplitude (0.0 - 1.0)
    #[arg(long, default_value = "0.3")]
    pub amplitude: f32,

    /// Sample rate in Hz
    #[arg(long, default_value = "44100")]
    pub sample_rate: u32,
}

impl ToneArgs {
    /// Assemble the engine configuration from the parsed flags.
    pub fn synth_config(&self) -> SynthConfig {
        SynthConfig {
            sample_rate: self.sample_rate as f32,
            note_duration: self.duration,
            attack: self.attack,
            decay: self.decay,
            sustain_level: self.sustain,
            release: self.release,
            amplitude: self.amplitude,
            waveform: self.waveform.into(),
            harmonics: self.harmonics.clone(),
        }
    }
}

fn parse_harmonics(s: &str) -> Result<Harmonics, String> {
    let coeffs: Vec<f32> = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f32>()
                .map_err(|e| format!("invalid harmonic coefficient '{}': {}", part.trim(), e))
        })
        .collect::<Result<_, _>>()?;
    if coeffs.is_empty() {
        return Err("at least one harmonic coefficient is required".to_string());
    }
    Ok(Harmonics::new(&coeffs))
}

/// Parse a pitch given either as a frequency in Hz ("440", "261.63") or a
/// note name ("A4", "C#3", "Bb2").
pub fn parse_pitch(s: &str) -> anyhow::Result<f32> {
    if let Ok(freq) = s.parse::<f32>() {
        if freq <= 0.0 {
            anyhow::bail!("frequency must be positive, got {}", freq);
        }
        return Ok(freq);
    }
    Ok(note_to_freq(s)?)
}

/// Parse a whitespace- or comma-separated list of pitches.
pub fn parse_pitches(parts: &[String]) -> anyhow::Result<Vec<f32>> {
    let mut frequencies = Vec::new();
    for part in parts {
        for token in part.split(',').filter(|t| !t.trim().is_empty()) {
            frequencies.push(parse_pitch(token.trim())?);
        }
    }
    Ok(frequencies)
}
