//! WAV file reading and writing for offline renders.

use crate::Result;
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV file specification for synthesizer output.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample; 32 means IEEE float, anything else PCM.
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            bits_per_sample: 16,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: 1,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Read a WAV file and return mono f32 samples along with the spec.
///
/// Multi-channel files are mixed down to mono by averaging channels.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let file_spec = reader.spec();
    let channels = file_spec.channels as usize;
    let spec = WavSpec {
        sample_rate: file_spec.sample_rate,
        bits_per_sample: file_spec.bits_per_sample,
    };

    let samples: Vec<f32> = match file_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let bits = file_spec.bits_per_sample;
            let max_val = (1i32 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let mono = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok((mono, spec))
}

/// Write mono samples to a WAV file.
///
/// Samples outside `[-1, 1]` are clamped during PCM quantization.
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let hound_spec = hound::WavSpec::from(spec);
    let mut writer = WavWriter::create(path, hound_spec)?;

    if spec.bits_per_sample == 32 {
        for &sample in samples {
            writer.write_sample(sample)?;
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        for &sample in samples {
            let int_sample = (sample * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_sample)?;
        }
    }

    writer.finalize()?;
    tracing::debug!(samples = samples.len(), sample_rate = spec.sample_rate, "wav written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn pcm16_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone.wav");

        let samples: Vec<f32> = (0..441)
            .map(|i| (i as f32 * std::f32::consts::TAU * 100.0 / 44100.0).sin() * 0.5)
            .collect();
        write_wav(&path, &samples, WavSpec::default()).unwrap();

        let (loaded, spec) = read_wav(&path).unwrap();
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(loaded.len(), samples.len());
        for (a, b) in samples.iter().zip(&loaded) {
            assert!((a - b).abs() < 1e-3, "16-bit quantization drift: {a} vs {b}");
        }
    }

    #[test]
    fn float32_roundtrip_is_exact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tone_f32.wav");

        let samples = vec![0.0f32, 0.25, -0.5, 0.999, -1.0];
        let spec = WavSpec {
            bits_per_sample: 32,
            ..WavSpec::default()
        };
        write_wav(&path, &samples, spec).unwrap();

        let (loaded, _) = read_wav(&path).unwrap();
        assert_eq!(loaded, samples);
    }

    #[test]
    fn out_of_range_samples_are_clamped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hot.wav");

        write_wav(&path, &[2.0, -2.0], WavSpec::default()).unwrap();
        let (loaded, _) = read_wav(&path).unwrap();
        assert!(loaded[0] <= 1.0);
        assert!(loaded[1] >= -1.0);
    }
}
