//! Drive the DAC on /dev/spidev0.0 to full scale.
//!
//! Run with `RUST_LOG=debug` to see the bus negotiation. Opening the device
//! usually needs root or membership of the `spi` group.
use std::process::ExitCode;

use log::{error, info};
use mcp492x::{Config, Mcp492x, DEFAULT_DEVICE, MAX_DAC_VALUE};

fn main() -> ExitCode {
    env_logger::init();

    info!("Creating dac object on {}", DEFAULT_DEVICE);
    let mut dac = match Mcp492x::open_default(Config::default()) {
        Ok(dac) => dac,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Setting DAC value to the max");
    if let Err(e) = dac.set_value(MAX_DAC_VALUE) {
        error!("{e}");
        return ExitCode::FAILURE;
    }
    info!("DAC set to {}", dac.value());

    dac.close();
    ExitCode::SUCCESS
}
