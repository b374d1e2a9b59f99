//! Criterion benchmarks for ondine-synth rendering
//!
//! Run with: cargo bench -p ondine-synth

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ondine_synth::{
    Harmonics, PhaseVector, Synth, SynthConfig, Waveform, render,
};

const SAMPLE_RATE: f32 = 44100.0;
const BLOCK_SIZES: &[usize] = &[256, 1024, 2205];

fn bench_render_waveforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    let waveforms = [
        ("Sine", Waveform::Sine),
        ("Sawtooth", Waveform::Sawtooth),
        ("Square", Waveform::Square),
    ];

    for (name, waveform) in &waveforms {
        for &block_size in BLOCK_SIZES {
            let harmonics = Harmonics::fundamental();
            let mut phases = PhaseVector::zeroed(harmonics.len());
            let mut out = vec![0.0f32; block_size];

            group.bench_with_input(
                BenchmarkId::new(*name, block_size),
                &block_size,
                |b, _| {
                    b.iter(|| {
                        render(
                            440.0,
                            &mut out,
                            SAMPLE_RATE,
                            &mut phases,
                            *waveform,
                            &harmonics,
                        );
                        black_box(out[0])
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_render_harmonic_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_harmonics");

    for &count in &[1usize, 4, 8, 16] {
        let coeffs: Vec<f32> = (0..count).map(|h| 1.0 / (h + 1) as f32).collect();
        let harmonics = Harmonics::new(&coeffs);
        let mut phases = PhaseVector::zeroed(harmonics.len());
        let mut out = vec![0.0f32; 1024];

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                render(
                    440.0,
                    &mut out,
                    SAMPLE_RATE,
                    &mut phases,
                    Waveform::Sine,
                    &harmonics,
                );
                black_box(out[0])
            })
        });
    }

    group.finish();
}

fn bench_engine_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_fill");

    let chords: [(&str, &[f32]); 3] = [
        ("single", &[440.0]),
        ("triad", &[261.63, 329.63, 392.00]),
        ("sixths", &[130.81, 164.81, 196.00, 261.63, 329.63, 392.00]),
    ];

    for (name, frequencies) in &chords {
        for &block_size in BLOCK_SIZES {
            let synth = Synth::new(SynthConfig {
                note_duration: 3600.0,
                harmonics: Harmonics::new(&[1.0, 0.5, 0.25, 0.125]),
                ..SynthConfig::default()
            });
            let controller = synth.controller();
            let mut renderer = synth.renderer();
            controller.play_chord(frequencies).unwrap();
            let mut out = vec![0.0f32; block_size];

            group.bench_with_input(
                BenchmarkId::new(*name, block_size),
                &block_size,
                |b, _| {
                    b.iter(|| {
                        renderer.fill(&mut out);
                        black_box(out[0])
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render_waveforms,
    bench_render_harmonic_counts,
    bench_engine_fill
);
criterion_main!(benches);
