//! The driver over the embedded-hal adapters, against scripted mocks.

#![allow(clippy::unwrap_used)]

use embedded_hal_mock::eh1::delay::NoopDelay;
use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTx};
use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTx};
use platform::hal::{DREQ, XCS, XDCS, XRESET};
use platform::{HalPins, HalSerialBus, SpiConfig};
use vs1003::{Vs1003, Vs1003Config, Vs1003Pins};

type MockSpiError = <SpiMock<u8> as embedded_hal::spi::ErrorType>::Error;

fn config() -> Vs1003Config {
    Vs1003Config::new(Vs1003Pins {
        xcs: XCS,
        xdcs: XDCS,
        dreq: DREQ,
        xreset: XRESET,
    })
}

fn byte(out: u8, back: u8) -> SpiTx<u8> {
    SpiTx::transfer_in_place(vec![out], vec![back])
}

#[test]
fn register_read_frames_over_spi() {
    let mut spi: SpiMock<u8> = SpiMock::new(&[
        byte(0x03, 0x00),
        byte(0x01, 0x00),
        byte(0xFF, 0x00),
        byte(0xFF, 0x30),
        SpiTx::flush(),
    ]);
    let mut xcs = PinMock::new(&[PinTx::set(State::Low), PinTx::set(State::High)]);
    let mut xdcs = PinMock::new(&[PinTx::set(State::High)]);
    let mut dreq = PinMock::new(&[PinTx::get(State::Low), PinTx::get(State::High)]);
    let mut xreset = PinMock::new(&[]);

    let mut profiles = Vec::new();
    {
        let bus = HalSerialBus::new(
            spi.clone(),
            SpiConfig::new(1_000_000),
            |_: &mut SpiMock<u8>, config: &SpiConfig| {
                profiles.push(config.frequency);
                Ok::<(), MockSpiError>(())
            },
        );
        let pins = HalPins::new(xcs.clone(), xdcs.clone(), dreq.clone(), xreset.clone());
        let mut vs = Vs1003::new(bus, pins, NoopDelay::new(), config());

        assert_eq!(vs.read_register(0x01).unwrap(), 0x0030);
    }
    // Boot profile applied for the frame, caller's restored after.
    assert_eq!(profiles, vec![250_000, 1_000_000]);

    spi.done();
    xcs.done();
    xdcs.done();
    dreq.done();
    xreset.done();
}

#[test]
fn data_burst_uses_data_select() {
    let mut spi: SpiMock<u8> = SpiMock::new(&[
        byte(0x00, 0x00),
        byte(0x90, 0x00),
        byte(0x00, 0x00),
        byte(0x3C, 0x00),
        byte(0x00, 0x00),
        byte(0x7F, 0x00),
        SpiTx::flush(),
    ]);
    let mut xcs = PinMock::new(&[PinTx::set(State::High)]);
    let mut xdcs = PinMock::new(&[PinTx::set(State::Low), PinTx::set(State::High)]);
    let mut dreq = PinMock::new(&[PinTx::get(State::High)]);
    let mut xreset = PinMock::new(&[]);

    {
        let bus = HalSerialBus::new(
            spi.clone(),
            SpiConfig::new(250_000),
            |_: &mut SpiMock<u8>, _: &SpiConfig| Ok::<(), MockSpiError>(()),
        );
        let pins = HalPins::new(xcs.clone(), xdcs.clone(), dreq.clone(), xreset.clone());
        let mut vs = Vs1003::new(bus, pins, NoopDelay::new(), config());
        vs.send_midi_message(0x90, 0x3C, 0x7F).unwrap();
    }

    spi.done();
    xcs.done();
    xdcs.done();
    dreq.done();
    xreset.done();
}
