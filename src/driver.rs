use log::{debug, warn};

use crate::register::{clamp_value, encode, ControlByte, Frame};
use crate::{BusSettings, Config, Error, Transfer, Transport, MAX_DAC_VALUE};

/// Receive scratch for a transfer. The DAC sends nothing back, the bus
/// only needs somewhere to put what it clocks in.
const RX_SCRATCH_SIZE: usize = 16;

/// MCP4921/MCP4922 DAC on an exclusively owned serial bus
///
/// A driver only exists in a ready state: [`Mcp492x::new`] either hands back
/// a configured device that already received its initial value, or an error.
/// The transport is released exactly once, by [`Mcp492x::close`] or on drop.
pub struct Mcp492x<T: Transport> {
    transport: Option<T>,
    cfg: Config,
    flags: ControlByte,
    bus: BusSettings,
    frame: Frame,
}

impl<T: Transport> Mcp492x<T> {
    /// Negotiate the bus parameters and write the initial value
    ///
    /// The bus is set up in a fixed order: mode, bits per word, then speed.
    /// Every write is confirmed with a read back and the confirmed values are
    /// kept. If any step fails the transport is released before returning.
    pub fn new(transport: T, cfg: Config) -> Result<Self, Error<T::Error>> {
        let flags = ControlByte::from_config(&cfg);
        let frame = encode(flags, saturate(cfg.initial_value));
        let mut dac = Self {
            transport: Some(transport),
            cfg,
            flags,
            bus: cfg.bus_settings(),
            frame,
        };
        dac.configure()?;
        dac.transmit(frame)?;
        Ok(dac)
    }

    /// Write a new 12-bit code. Codes above [`MAX_DAC_VALUE`] saturate.
    ///
    /// The control flags chosen at construction are sent unchanged. On a
    /// transfer error the driver keeps its previous state and the call may
    /// be retried.
    pub fn set_value(&mut self, value: u16) -> Result<(), Error<T::Error>> {
        let frame = encode(self.flags, saturate(value));
        self.transmit(frame)
    }

    /// Release the transport. Calling it again does nothing.
    pub fn close(&mut self) {
        if let Some(transport) = self.transport.take() {
            debug!("Releasing DAC transport");
            transport.close();
        }
    }

    /// Hand back the transport without releasing it
    pub fn destroy(mut self) -> Option<T> {
        self.transport.take()
    }

    /// True until the driver is closed
    pub fn is_open(&self) -> bool {
        self.transport.is_some()
    }

    /// Configuration the driver was created with
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Bus parameters as confirmed by the transport
    pub fn bus_settings(&self) -> BusSettings {
        self.bus
    }

    /// Last frame that went out successfully
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Last code that went out successfully
    pub fn value(&self) -> u16 {
        self.frame.value()
    }

    fn configure(&mut self) -> Result<(), Error<T::Error>> {
        let requested = self.bus;
        let spi = self.transport.as_mut().ok_or(Error::Closed)?;

        spi.write_mode(requested.mode)
            .map_err(Error::SetModeFailed)?;
        let mode = spi.read_mode().map_err(Error::SetModeFailed)?;

        spi.write_bits_per_word(requested.bits_per_word)
            .map_err(Error::SetBitsPerWordFailed)?;
        let bits_per_word = spi
            .read_bits_per_word()
            .map_err(Error::SetBitsPerWordFailed)?;

        spi.write_speed_hz(requested.speed_hz)
            .map_err(Error::SetSpeedFailed)?;
        let speed_hz = spi.read_speed_hz().map_err(Error::SetSpeedFailed)?;

        self.bus = BusSettings {
            mode,
            bits_per_word,
            speed_hz,
            delay_us: requested.delay_us,
        };
        debug!("SPI bus configured: {:?}", self.bus);
        Ok(())
    }

    fn transmit(&mut self, frame: Frame) -> Result<(), Error<T::Error>> {
        let spi = self.transport.as_mut().ok_or(Error::Closed)?;
        let mut rx = [0u8; RX_SCRATCH_SIZE];
        let mut transfer = Transfer {
            tx: frame.bytes(),
            rx: &mut rx,
            speed_hz: self.bus.speed_hz,
            delay_us: self.bus.delay_us,
            bits_per_word: self.bus.bits_per_word,
        };
        spi.transfer(&mut transfer).map_err(Error::TransferFailed)?;
        debug!("Sent frame {:02X?}", frame.bytes());
        self.frame = frame;
        Ok(())
    }
}

impl<T: Transport> Drop for Mcp492x<T> {
    fn drop(&mut self) {
        self.close();
    }
}

fn saturate(value: u16) -> u16 {
    if value > MAX_DAC_VALUE {
        warn!(
            "Requested DAC value {} is beyond the max of {}, using the max",
            value, MAX_DAC_VALUE
        );
    }
    clamp_value(value)
}
