//! Single-note playback command.

use std::time::Duration;

use clap::Args;
use ondine_io::{OutputStream, StreamConfig};
use ondine_synth::Synth;

use crate::commands::common::{ToneArgs, parse_pitch};

#[derive(Args)]
pub struct PlayArgs {
    /// Note name ("A4", "C#3") or frequency in Hz ("440")
    pitch: String,

    /// Output device name (substring match)
    #[arg(long)]
    device: Option<String>,

    /// Buffer size in frames
    #[arg(long, default_value = "2205")]
    buffer_size: u32,

    #[command(flatten)]
    tone: ToneArgs,
}

pub fn run(args: PlayArgs) -> anyhow::Result<()> {
    let frequency = parse_pitch(&args.pitch)?;
    let synth = Synth::new(args.tone.synth_config());
    let controller = synth.controller();
    let mut renderer = synth.renderer();

    let stream = OutputStream::open(
        &StreamConfig {
            sample_rate: args.tone.sample_rate,
            buffer_size: args.buffer_size,
            device: args.device.clone(),
        },
        move |buffer| renderer.fill(buffer),
    )?;

    {
        let controller = controller.clone();
        ctrlc::set_handler(move || controller.signal_stop())?;
    }

    tracing::info!(frequency, device = stream.device_name(), "playing note");
    println!("Playing {} ({:.2} Hz) for {:.2} s", args.pitch, frequency, args.tone.duration);

    controller.play_note(frequency)?;

    // Hold the stream open for the note's full envelope, polling the
    // stop flag so Ctrl+C cuts playback short.
    let mut remaining = args.tone.duration + 0.1;
    while remaining > 0.0 && !controller.stop_requested() {
        std::thread::sleep(Duration::from_millis(50));
        remaining -= 0.05;
    }

    drop(stream);
    Ok(())
}
