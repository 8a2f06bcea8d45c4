//! Lists the NI cards NI-DAQmx knows about together with their capabilities.
//!
//! ```text
//! nidaq_detect                 # enumerate cards and log their capabilities
//! nidaq_detect --instruments   # also open an adapter per card and print its parameters
//! ```
//!
//! Logging goes through `env_logger`; set `RUST_LOG` to change the default `info` level.

use std::process::ExitCode;

use nidaq_backend::*;
use nidaqctrl_backend::DaqmxBinding;

fn run(open_instruments: bool) -> DaqResult<()> {
    let binding = DaqmxBinding::new();
    let devices = binding.device_names()?;
    if devices.is_empty() {
        log::warn!("No NI device found");
        return Ok(());
    }
    for device in &devices {
        log::info!("Found NI device {}", device);
        DeviceInfo::query(&binding, device)?.log();
        log::info!("Analog inputs: {:?}", binding.physical_input_channels(device)?);
        log::info!("Analog outputs: {:?}", binding.physical_output_channels(device)?);
        log::info!("Counters: {:?}", binding.physical_counter_channels(device)?);
    }

    if open_instruments {
        for (name, daq) in detect_instruments(&binding, &DaqConfig::default())? {
            println!("{}: {}", name, daq.parameters().names().join(", "));
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let open_instruments = std::env::args().skip(1).any(|arg| arg == "--instruments");
    match run(open_instruments) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
