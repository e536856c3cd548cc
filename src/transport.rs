//! Serial bus abstraction
//!
//! A [`Transport`] exposes each bus negotiation step on its own so the
//! driver can enforce the order (mode, bits per word, speed) and confirm
//! every write with a read back.
use embedded_hal::spi::{Mode, Operation, SpiDevice};
use log::debug;

/// One synchronous full duplex transfer
#[derive(Debug)]
pub struct Transfer<'a> {
    /// Bytes to send
    pub tx: &'a [u8],
    /// Receive scratch, at least as long as `tx`. The DAC never answers
    /// but the bus still clocks bytes in.
    pub rx: &'a mut [u8],
    /// Clock speed for this transfer
    pub speed_hz: u32,
    /// Delay after the transfer before the chip select changes
    pub delay_us: u16,
    /// Word size for this transfer
    pub bits_per_word: u8,
}

impl Transfer<'_> {
    /// Number of bytes clocked out
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    /// True when there is nothing to send
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}

/// A serial bus connection to one DAC
pub trait Transport {
    /// Error type reported by the bus
    type Error;

    /// Request an SPI mode
    fn write_mode(&mut self, mode: Mode) -> Result<(), Self::Error>;
    /// Mode the bus is actually using
    fn read_mode(&mut self) -> Result<Mode, Self::Error>;
    /// Request a word size
    fn write_bits_per_word(&mut self, bits: u8) -> Result<(), Self::Error>;
    /// Word size the bus is actually using
    fn read_bits_per_word(&mut self) -> Result<u8, Self::Error>;
    /// Request a maximum clock speed
    fn write_speed_hz(&mut self, hz: u32) -> Result<(), Self::Error>;
    /// Maximum clock speed the bus is actually using
    fn read_speed_hz(&mut self) -> Result<u32, Self::Error>;
    /// Run one transfer, blocking until it completes
    fn transfer(&mut self, transfer: &mut Transfer<'_>) -> Result<(), Self::Error>;

    /// Release the underlying handle
    fn close(self)
    where
        Self: Sized,
    {
    }
}

/// Transport over an [`embedded_hal`] SPI device
///
/// The mode and clock of an `SpiDevice` are fixed when the bus is built and
/// it always moves 8 bit words. The `write_*` steps cannot change any of
/// that, they only log a mismatch. The `read_*` steps report what the bus
/// really uses, so the driver stores those values.
pub struct HalTransport<SPI> {
    spi: SPI,
    mode: Mode,
    speed_hz: u32,
}

/// Word size of an `SpiDevice<u8>`
const HAL_BITS_PER_WORD: u8 = 8;

impl<SPI> HalTransport<SPI> {
    /// Wrap an SPI device whose bus was built with `mode` and `speed_hz`
    pub fn new(spi: SPI, mode: Mode, speed_hz: u32) -> Self {
        Self {
            spi,
            mode,
            speed_hz,
        }
    }

    /// Give back the SPI device
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI, E> Transport for HalTransport<SPI>
where
    SPI: SpiDevice<Error = E>,
{
    type Error = E;

    fn write_mode(&mut self, mode: Mode) -> Result<(), E> {
        if mode != self.mode {
            debug!("SPI bus mode is fixed at {:?}, ignoring {:?}", self.mode, mode);
        }
        Ok(())
    }
    fn read_mode(&mut self) -> Result<Mode, E> {
        Ok(self.mode)
    }
    fn write_bits_per_word(&mut self, bits: u8) -> Result<(), E> {
        if bits != HAL_BITS_PER_WORD {
            debug!("SPI bus uses {} bit words, ignoring {}", HAL_BITS_PER_WORD, bits);
        }
        Ok(())
    }
    fn read_bits_per_word(&mut self) -> Result<u8, E> {
        Ok(HAL_BITS_PER_WORD)
    }
    fn write_speed_hz(&mut self, hz: u32) -> Result<(), E> {
        if hz != self.speed_hz {
            debug!("SPI bus clock is fixed at {} Hz, ignoring {}", self.speed_hz, hz);
        }
        Ok(())
    }
    fn read_speed_hz(&mut self) -> Result<u32, E> {
        Ok(self.speed_hz)
    }

    fn transfer(&mut self, transfer: &mut Transfer<'_>) -> Result<(), E> {
        let len = transfer.len();
        let delay_ns = u32::from(transfer.delay_us) * 1_000;
        let mut ops = [
            Operation::Transfer(&mut transfer.rx[..len], transfer.tx),
            Operation::DelayNs(delay_ns),
        ];
        let ops = if delay_ns == 0 { &mut ops[..1] } else { &mut ops[..] };
        self.spi.transaction(ops)
    }
}
