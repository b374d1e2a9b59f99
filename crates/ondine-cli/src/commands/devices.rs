//! Audio output device listing command.

use clap::Args;
use ondine_io::{default_output_device, list_output_devices};

#[derive(Args)]
pub struct DevicesArgs {
    /// Only show the default output device
    #[arg(long)]
    default: bool,
}

pub fn run(args: DevicesArgs) -> anyhow::Result<()> {
    if args.default {
        match default_output_device()? {
            Some(device) => {
                println!("{} ({} Hz)", device.name, device.default_sample_rate);
            }
            None => println!("No default output device."),
        }
        return Ok(());
    }

    let devices = list_output_devices()?;
    if devices.is_empty() {
        println!("No audio output devices found.");
        return Ok(());
    }

    println!("Output Devices:");
    for (idx, device) in devices.iter().enumerate() {
        let marker = if device.is_default { " (default)" } else { "" };
        println!(
            "  [{}] {} ({} Hz){}",
            idx, device.name, device.default_sample_rate, marker
        );
    }
    println!();
    println!("Tip: pick a device with a partial name:");
    println!("  ondine play A4 --device pipewire");

    Ok(())
}
