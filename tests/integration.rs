#![cfg(target_os = "linux")]

use embedded_hal::spi::{MODE_0, MODE_3};
use embedded_hal_mock::eh1::spi::{Mock as MockSpi, Transaction as MockTransaction};
use mcp492x::{BusSettings, Channel, Config, Gain, HalTransport, Mcp492x, MAX_DAC_VALUE};

// bus built for mode 0 at 1 MHz
fn hal(spi: MockSpi<u8>) -> HalTransport<MockSpi<u8>> {
    HalTransport::new(spi, MODE_0, 1_000_000)
}

fn write_frame(bytes: [u8; 2]) -> [MockTransaction<u8>; 3] {
    [
        MockTransaction::transaction_start(),
        MockTransaction::transfer(bytes.to_vec(), vec![0x00, 0x00]),
        MockTransaction::transaction_end(),
    ]
}

#[test]
fn initial_value_defaults() {
    let trans = write_frame([0xB0, 0x00]);
    let spi = MockSpi::new(&trans);

    let dac = Mcp492x::new(hal(spi), Config::default()).unwrap();
    assert_eq!(dac.value(), 0);
    dac.destroy().unwrap().release().done();
}

#[test]
fn initial_value_channel_b() {
    let trans = write_frame([0x5F, 0xFF]);
    let spi = MockSpi::new(&trans);

    let cfg = Config::default()
        .with_initial_value(0x0FFF)
        .with_channel(Channel::B)
        .with_buffered(true)
        .with_gain(Gain::X2);
    let dac = Mcp492x::new(hal(spi), cfg).unwrap();
    assert_eq!(dac.frame().bytes(), &[0x5F, 0xFF]);
    dac.destroy().unwrap().release().done();
}

#[test]
fn set_value_keeps_flags() {
    let mut trans = Vec::new();
    trans.extend(write_frame([0xF0, 0x00]));
    trans.extend(write_frame([0xF8, 0x00]));
    trans.extend(write_frame([0xFF, 0xFF]));
    let spi = MockSpi::new(&trans);

    let cfg = Config::default().with_buffered(true);
    let mut dac = Mcp492x::new(hal(spi), cfg).unwrap();
    dac.set_value(0x0800).unwrap();
    assert_eq!(dac.value(), 0x0800);
    // out of range codes saturate
    dac.set_value(10_000).unwrap();
    assert_eq!(dac.value(), MAX_DAC_VALUE);
    assert_eq!(dac.config(), &cfg);
    dac.destroy().unwrap().release().done();
}

#[test]
fn shutdown_output() {
    let mut trans = Vec::new();
    trans.extend(write_frame([0xA1, 0x23]));
    trans.extend(write_frame([0xA0, 0x00]));
    let spi = MockSpi::new(&trans);

    let cfg = Config::default()
        .with_active(false)
        .with_initial_value(0x0123);
    let mut dac = Mcp492x::new(hal(spi), cfg).unwrap();
    dac.set_value(0).unwrap();
    dac.destroy().unwrap().release().done();
}

#[test]
fn bus_reports_its_fixed_settings() {
    let trans = write_frame([0xB0, 0x00]);
    let spi = MockSpi::new(&trans);

    let cfg = Config::default()
        .with_bus_mode(MODE_3)
        .with_bits_per_word(16)
        .with_clock_hz(1_000);
    let dac = Mcp492x::new(hal(spi), cfg).unwrap();
    assert_eq!(
        dac.bus_settings(),
        BusSettings {
            mode: MODE_0,
            bits_per_word: 8,
            speed_hz: 1_000_000,
            delay_us: 0,
        }
    );
    dac.destroy().unwrap().release().done();
}

#[test]
fn transfer_delay_follows_frame() {
    let trans = [
        MockTransaction::transaction_start(),
        MockTransaction::transfer(vec![0xB0, 0x00], vec![0x00, 0x00]),
        MockTransaction::delay(5_000),
        MockTransaction::transaction_end(),
        MockTransaction::transaction_start(),
        MockTransaction::transfer(vec![0xB4, 0x00], vec![0x00, 0x00]),
        MockTransaction::delay(5_000),
        MockTransaction::transaction_end(),
    ];
    let spi = MockSpi::new(&trans);

    let cfg = Config::default().with_transfer_delay_us(5);
    let mut dac = Mcp492x::new(hal(spi), cfg).unwrap();
    assert_eq!(dac.bus_settings().delay_us, 5);
    dac.set_value(0x0400).unwrap();
    dac.destroy().unwrap().release().done();
}
