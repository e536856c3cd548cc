use embedded_hal::spi::{Mode, MODE_0};
use log::warn;

use crate::{Channel, Gain, MAX_SPI_SPEED_HZ, MIN_DAC_VALUE};

/// Device and bus configuration, applied once when the driver is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Code written during initialization, saturates at [`crate::MAX_DAC_VALUE`]
    pub initial_value: u16,
    /// Addressed channel. Must stay [`Channel::A`] on the MCP4921
    pub channel: Channel,
    /// Buffered (low impedance) or unbuffered (high impedance) VREF input
    pub buffered: bool,
    /// Output gain
    pub gain: Gain,
    /// Output stage enabled, or shut down to a high impedance load
    pub active: bool,
    /// SPI clock polarity and phase
    pub bus_mode: Mode,
    /// SPI clock, saturates at [`MAX_SPI_SPEED_HZ`]
    pub clock_hz: u32,
    /// Usually 8
    pub bits_per_word: u8,
    /// Delay after each transfer before the chip select changes, in microseconds
    pub transfer_delay_us: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_value: MIN_DAC_VALUE,
            channel: Channel::A,
            buffered: false,
            gain: Gain::X1,
            active: true,
            bus_mode: MODE_0,
            clock_hz: MAX_SPI_SPEED_HZ,
            bits_per_word: 8,
            transfer_delay_us: 0,
        }
    }
}

impl Config {
    /// Set the code written during initialization
    pub fn with_initial_value(mut self, value: u16) -> Self {
        self.initial_value = value;
        self
    }
    /// Select the addressed channel
    pub fn with_channel(mut self, channel: Channel) -> Self {
        self.channel = channel;
        self
    }
    /// Select buffered or unbuffered VREF input
    pub fn with_buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }
    /// Select the output gain
    pub fn with_gain(mut self, gain: Gain) -> Self {
        self.gain = gain;
        self
    }
    /// Enable or shut down the output stage
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
    /// Select the SPI mode
    pub fn with_bus_mode(mut self, mode: Mode) -> Self {
        self.bus_mode = mode;
        self
    }
    /// Set the SPI clock speed
    pub fn with_clock_hz(mut self, hz: u32) -> Self {
        self.clock_hz = hz;
        self
    }
    /// Set the SPI word size
    pub fn with_bits_per_word(mut self, bits: u8) -> Self {
        self.bits_per_word = bits;
        self
    }
    /// Set the delay after each transfer
    pub fn with_transfer_delay_us(mut self, us: u16) -> Self {
        self.transfer_delay_us = us;
        self
    }

    /// Bus parameters to request from the transport, with the clock
    /// saturated to the device maximum
    pub fn bus_settings(&self) -> BusSettings {
        if self.clock_hz > MAX_SPI_SPEED_HZ {
            warn!(
                "Requested SPI clock of {} Hz is beyond the device limit, using {} Hz",
                self.clock_hz, MAX_SPI_SPEED_HZ
            );
        }
        BusSettings {
            mode: self.bus_mode,
            bits_per_word: self.bits_per_word,
            speed_hz: self.clock_hz.min(MAX_SPI_SPEED_HZ),
            delay_us: self.transfer_delay_us,
        }
    }
}

/// Bus parameters. After initialization these hold what the transport
/// reported back, which may differ from what was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusSettings {
    /// SPI clock polarity and phase
    pub mode: Mode,
    /// Word size
    pub bits_per_word: u8,
    /// Clock speed
    pub speed_hz: u32,
    /// Delay after each transfer, in microseconds
    pub delay_us: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::spi::MODE_3;

    #[test]
    fn defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.initial_value, 0);
        assert_eq!(cfg.channel, Channel::A);
        assert!(!cfg.buffered);
        assert_eq!(cfg.gain, Gain::X1);
        assert!(cfg.active);
        assert_eq!(cfg.bus_mode, MODE_0);
        assert_eq!(cfg.clock_hz, 10_000_000);
        assert_eq!(cfg.bits_per_word, 8);
        assert_eq!(cfg.transfer_delay_us, 0);
    }

    #[test]
    fn clock_saturates_at_device_limit() {
        let settings = Config::default().with_clock_hz(20_000_000).bus_settings();
        assert_eq!(settings.speed_hz, MAX_SPI_SPEED_HZ);
        let settings = Config::default().with_clock_hz(u32::MAX).bus_settings();
        assert_eq!(settings.speed_hz, 10_000_000);
    }

    #[test]
    fn slower_clocks_pass_through() {
        let settings = Config::default()
            .with_clock_hz(1_000_000)
            .with_bus_mode(MODE_3)
            .with_bits_per_word(16)
            .with_transfer_delay_us(5)
            .bus_settings();
        assert_eq!(
            settings,
            BusSettings {
                mode: MODE_3,
                bits_per_word: 16,
                speed_hz: 1_000_000,
                delay_us: 5,
            }
        );
    }
}
