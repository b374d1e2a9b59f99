//! Chord playback command, one-shot or interactive.

use std::io::{BufRead, Write};
use std::time::Duration;

use clap::Args;
use ondine_io::{OutputStream, StreamConfig};
use ondine_synth::{Synth, closest_note};

use crate::commands::common::{ToneArgs, parse_pitches};

#[derive(Args)]
pub struct ChordArgs {
    /// Chord members as note names or frequencies; with no members the
    /// command reads chords interactively from stdin
    pitches: Vec<String>,

    /// Output device name (substring match)
    #[arg(long)]
    device: Option<String>,

    /// Buffer size in frames
    #[arg(long, default_value = "2205")]
    buffer_size: u32,

    #[command(flatten)]
    tone: ToneArgs,
}

pub fn run(args: ChordArgs) -> anyhow::Result<()> {
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

    if args.pitches.is_empty() {
        interactive(&args, &controller)?;
    } else {
        let frequencies = parse_pitches(&args.pitches)?;
        let names: Vec<String> = frequencies.iter().map(|&f| closest_note(f)).collect();
        tracing::info!(?frequencies, "playing chord");
        println!("Playing [{}] for {:.2} s", names.join(" "), args.tone.duration);

        controller.play_chord(&frequencies)?;
        hold(&controller, args.tone.duration + 0.1);
    }

    drop(stream);
    Ok(())
}

/// Read chords line by line from stdin until EOF, "q", or Ctrl+C.
fn interactive(args: &ChordArgs, controller: &ondine_synth::SynthController) -> anyhow::Result<()> {
    println!("Enter chords as space-separated notes (\"C4 E4 G4\"); empty line stops,");
    println!("\"q\" quits.");

    let stdin = std::io::stdin();
    loop {
        if controller.stop_requested() {
            break;
        }
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            break;
        }
        if line.is_empty() {
            controller.stop_all();
            continue;
        }

        let parts: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        match parse_pitches(&parts) {
            Ok(frequencies) => {
                controller.play_chord(&frequencies)?;
                hold(controller, args.tone.duration);
            }
            Err(e) => println!("  {e}"),
        }
    }

    controller.stop_all();
    Ok(())
}

/// Sleep in small slices for `seconds`, returning early on a stop request.
fn hold(controller: &ondine_synth::SynthController, seconds: f32) {
    let mut remaining = seconds;
    while remaining > 0.0 && !controller.stop_requested() {
        std::thread::sleep(Duration::from_millis(50));
        remaining -= 0.05;
    }
}
