//! Linux `spidev` transport
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::Path;

use embedded_hal::spi::{Mode, Phase, Polarity};
use log::debug;
use ::spidev::spidevioctl::{self, SpidevTransfer};
use ::spidev::{SpiModeFlags, Spidev};

use crate::{Config, Error, Mcp492x, Transfer, Transport};

/// Bus 0, chip select 0
pub const DEFAULT_DEVICE: &str = "/dev/spidev0.0";

/// Transport over a Linux `spidev` character device
pub struct SpidevTransport {
    spi: Spidev,
}

impl SpidevTransport {
    /// Open the device read/write
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let spi = Spidev::open(path.as_ref())?;
        debug!("Opened {}", path.as_ref().display());
        Ok(Self { spi })
    }
}

fn mode_flags(mode: Mode) -> SpiModeFlags {
    let mut flags = SpiModeFlags::empty();
    if mode.phase == Phase::CaptureOnSecondTransition {
        flags |= SpiModeFlags::SPI_CPHA;
    }
    if mode.polarity == Polarity::IdleHigh {
        flags |= SpiModeFlags::SPI_CPOL;
    }
    flags
}

fn mode_from_bits(bits: u8) -> Mode {
    let flags = SpiModeFlags::from_bits_truncate(u32::from(bits));
    Mode {
        polarity: if flags.contains(SpiModeFlags::SPI_CPOL) {
            Polarity::IdleHigh
        } else {
            Polarity::IdleLow
        },
        phase: if flags.contains(SpiModeFlags::SPI_CPHA) {
            Phase::CaptureOnSecondTransition
        } else {
            Phase::CaptureOnFirstTransition
        },
    }
}

impl Transport for SpidevTransport {
    type Error = io::Error;

    fn write_mode(&mut self, mode: Mode) -> io::Result<()> {
        spidevioctl::set_mode(self.spi.as_raw_fd(), mode_flags(mode))
    }
    fn read_mode(&mut self) -> io::Result<Mode> {
        spidevioctl::get_mode(self.spi.as_raw_fd()).map(mode_from_bits)
    }
    fn write_bits_per_word(&mut self, bits: u8) -> io::Result<()> {
        spidevioctl::set_bits_per_word(self.spi.as_raw_fd(), bits)
    }
    fn read_bits_per_word(&mut self) -> io::Result<u8> {
        spidevioctl::get_bits_per_word(self.spi.as_raw_fd())
    }
    fn write_speed_hz(&mut self, hz: u32) -> io::Result<()> {
        spidevioctl::set_max_speed_hz(self.spi.as_raw_fd(), hz)
    }
    fn read_speed_hz(&mut self) -> io::Result<u32> {
        spidevioctl::get_max_speed_hz(self.spi.as_raw_fd())
    }

    fn transfer(&mut self, transfer: &mut Transfer<'_>) -> io::Result<()> {
        let len = transfer.len();
        let mut xfer = SpidevTransfer::read_write(transfer.tx, &mut transfer.rx[..len]);
        xfer.speed_hz = transfer.speed_hz;
        xfer.delay_usecs = transfer.delay_us;
        xfer.bits_per_word = transfer.bits_per_word;
        self.spi.transfer(&mut xfer)
    }

    fn close(self) {
        // the descriptor is closed when the file drops
        drop(self.spi);
    }
}

impl Mcp492x<SpidevTransport> {
    /// Open `path`, negotiate the bus and write the initial value
    pub fn open<P: AsRef<Path>>(path: P, cfg: Config) -> Result<Self, Error<io::Error>> {
        let transport = SpidevTransport::open(path).map_err(Error::OpenFailed)?;
        Self::new(transport, cfg)
    }

    /// Same as [`Mcp492x::open`] on [`DEFAULT_DEVICE`]
    pub fn open_default(cfg: Config) -> Result<Self, Error<io::Error>> {
        Self::open(DEFAULT_DEVICE, cfg)
    }
}
