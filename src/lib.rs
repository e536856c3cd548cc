//! Driver for the Microchip MCP4921/MCP4922 12-bit SPI DACs
//!
//! Every write to the device is a single 2 byte frame carrying the control
//! bits (channel, buffering, gain, shutdown) and the 12-bit output code.
//! The driver encodes that frame, negotiates the bus parameters with the
//! transport and pushes the frame out on every [`Mcp492x::set_value`] call.
//!
//! The bus is abstracted behind [`Transport`]. Two implementations ship with
//! the crate:
//! - [`SpidevTransport`] for Linux `spidev` character devices (feature `linux`)
//! - [`HalTransport`] for any [`embedded_hal::spi::SpiDevice`]
//!
//! ```no_run
//! # #[cfg(all(feature = "linux", target_os = "linux"))]
//! # fn main() -> Result<(), mcp492x::Error<std::io::Error>> {
//! use mcp492x::{Config, Mcp492x, MAX_DAC_VALUE};
//!
//! let mut dac = Mcp492x::open_default(Config::default())?;
//! dac.set_value(MAX_DAC_VALUE)?;
//! dac.close();
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "linux", target_os = "linux")))]
//! # fn main() {}
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

use core::fmt;

mod config;
mod driver;
pub mod register;
#[cfg(all(feature = "linux", target_os = "linux"))]
mod linux;
pub mod transport;

pub use config::{BusSettings, Config};
pub use driver::Mcp492x;
pub use register::{encode, ControlByte, Frame};
#[cfg(all(feature = "linux", target_os = "linux"))]
pub use linux::{SpidevTransport, DEFAULT_DEVICE};
pub use transport::{HalTransport, Transfer, Transport};

/// Lowest DAC code
pub const MIN_DAC_VALUE: u16 = 0;
/// Highest DAC code, larger requests saturate to it
pub const MAX_DAC_VALUE: u16 = 4095;
/// Fastest SPI clock the device supports, larger requests saturate to it
pub const MAX_SPI_SPEED_HZ: u32 = 10_000_000;
/// Size of one register write on the wire
pub const REGISTER_BYTE_SIZE: usize = 2;

/// Errors for this crate
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The bus device could not be opened
    OpenFailed(E),
    /// The transport rejected the SPI mode, or failed to report it back
    SetModeFailed(E),
    /// The transport rejected the word size, or failed to report it back
    SetBitsPerWordFailed(E),
    /// The transport rejected the clock speed, or failed to report it back
    SetSpeedFailed(E),
    /// Sending a register frame failed
    TransferFailed(E),
    /// The driver was already closed
    Closed,
}

impl<E> Error<E> {
    /// The underlying transport error, if there is one
    pub fn source_error(&self) -> Option<&E> {
        match self {
            Error::OpenFailed(e)
            | Error::SetModeFailed(e)
            | Error::SetBitsPerWordFailed(e)
            | Error::SetSpeedFailed(e)
            | Error::TransferFailed(e) => Some(e),
            Error::Closed => None,
        }
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OpenFailed(e) => write!(f, "failed to open spi device: {e:?}"),
            Error::SetModeFailed(e) => write!(f, "could not set spi mode: {e:?}"),
            Error::SetBitsPerWordFailed(e) => {
                write!(f, "could not set spi bits per word: {e:?}")
            }
            Error::SetSpeedFailed(e) => write!(f, "could not set spi speed: {e:?}"),
            Error::TransferFailed(e) => write!(f, "could not send data to device: {e:?}"),
            Error::Closed => f.write_str("dac driver is closed"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}

/// DAC channel, only the MCP4922 has a second one
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// DAC Channel A
    #[default]
    A,
    /// DAC Channel B
    B,
}

/// Output gain relative to the reference voltage
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Gain {
    /// VOUT = VREF * D / 4096
    #[default]
    X1,
    /// VOUT = 2 * VREF * D / 4096
    X2,
}
