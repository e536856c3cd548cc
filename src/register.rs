//! Register frame encoding
//!
//! The device takes one 16 bit word, MSB first:
//!
//! | bit 15 | bit 14 | bit 13 | bit 12 | bits 11..0 |
//! |--------|--------|--------|--------|------------|
//! | A/B    | BUF    | GA     | SHDN   | D11..D0    |
use bitfield_struct::bitfield;

use crate::{Channel, Config, Gain, MAX_DAC_VALUE, REGISTER_BYTE_SIZE};

/// High byte of a register frame: control flags and the top nibble of the code
#[bitfield(u8)]
#[derive(PartialEq, Eq)]
pub struct ControlByte {
    /// D11..D8 of the DAC code
    #[bits(4)]
    pub value_high: u8,
    /// Set to enable the output stage, cleared to shut it down
    pub active: bool,
    /// Set for gain x1, cleared for gain x2
    pub unity_gain: bool,
    /// Set for a buffered VREF input
    pub buffered: bool,
    /// Set to address channel A, cleared for channel B
    pub channel_a: bool,
}

impl ControlByte {
    /// Control flags of `cfg`, with an empty value nibble
    pub fn from_config(cfg: &Config) -> Self {
        ControlByte::new()
            .with_channel_a(cfg.channel == Channel::A)
            .with_buffered(cfg.buffered)
            .with_unity_gain(cfg.gain == Gain::X1)
            .with_active(cfg.active)
    }

    /// The same flags with the value nibble cleared
    pub fn flags(self) -> Self {
        self.with_value_high(0)
    }
}

/// One register write, exactly as it goes over the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame([u8; REGISTER_BYTE_SIZE]);

impl Frame {
    /// Raw bytes, byte 0 is sent first
    pub fn bytes(&self) -> &[u8; REGISTER_BYTE_SIZE] {
        &self.0
    }

    /// Control flags of byte 0
    pub fn control(&self) -> ControlByte {
        ControlByte::from(self.0[0]).flags()
    }

    /// The 12-bit DAC code carried in the frame
    pub fn value(&self) -> u16 {
        (u16::from(ControlByte::from(self.0[0]).value_high()) << 8) | u16::from(self.0[1])
    }
}

impl From<Frame> for [u8; REGISTER_BYTE_SIZE] {
    fn from(frame: Frame) -> Self {
        frame.0
    }
}

/// Saturate `value` to the 12-bit code range
pub fn clamp_value(value: u16) -> u16 {
    value.min(MAX_DAC_VALUE)
}

/// Encode the control flags and a DAC code into a register frame.
/// Values above [`MAX_DAC_VALUE`] saturate, there is no failure path.
pub fn encode(flags: ControlByte, value: u16) -> Frame {
    let value = clamp_value(value);
    let high = flags.with_value_high((value >> 8) as u8);
    Frame([u8::from(high), value as u8])
}
