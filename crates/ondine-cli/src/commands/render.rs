//! Offline rendering to WAV.

use std::path::PathBuf;

use clap::Args;
use ondine_io::{WavSpec, write_wav};
use ondine_synth::Synth;

use crate::commands::common::{ToneArgs, parse_pitches};

#[derive(Args)]
pub struct RenderArgs {
    /// Notes or frequencies to render as one chord
    #[arg(required = true)]
    pitches: Vec<String>,

    /// Output WAV path
    #[arg(short, long, default_value = "ondine.wav")]
    output: PathBuf,

    /// Write 32-bit float samples instead of 16-bit PCM
    #[arg(long)]
    float: bool,

    /// Render chunk size in frames
    #[arg(long, default_value = "2205")]
    chunk_size: usize,

    #[command(flatten)]
    tone: ToneArgs,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let frequencies = parse_pitches(&args.pitches)?;
    let synth = Synth::new(args.tone.synth_config());
    let controller = synth.controller();
    let mut renderer = synth.renderer();

    controller.play_chord(&frequencies)?;

    let total = (args.tone.duration * args.tone.sample_rate as f32).round() as usize;
    let mut samples = vec![0.0f32; total];
    for chunk in samples.chunks_mut(args.chunk_size.max(1)) {
        renderer.fill(chunk);
    }

    let spec = WavSpec {
        sample_rate: args.tone.sample_rate,
        bits_per_sample: if args.float { 32 } else { 16 },
    };
    write_wav(&args.output, &samples, spec)?;

    tracing::info!(path = %args.output.display(), samples = total, "render complete");
    println!(
        "Wrote {} ({} samples, {:.2} s at {} Hz)",
        args.output.display(),
        total,
        args.tone.duration,
        args.tone.sample_rate
    );
    Ok(())
}
