//! embedded-hal 1.0 adapters
//!
//! Bridges concrete HAL types onto the [`SerialBus`] and [`PinIo`] seams:
//!
//! - [`HalSerialBus`] wraps any [`SpiBus`] and applies timing profiles
//!   through a board-supplied reconfigure hook (embedded-hal has no portable
//!   way to change the clock of a live bus).
//! - [`HalPins`] bundles the four codec lines, already typed as outputs or
//!   input by the HAL, and hands them out under fixed [`PinId`]s.

use embedded_hal::digital::{Error as _, ErrorKind as PinErrorKind, InputPin, OutputPin};
use embedded_hal::spi::{Error as _, ErrorKind as SpiErrorKind, SpiBus};

use crate::gpio::{PinDirection, PinId, PinIo, PinState};
use crate::peripheral::{SerialBus, SpiConfig};

/// [`SerialBus`] over an embedded-hal [`SpiBus`].
pub struct HalSerialBus<S, F> {
    spi: S,
    timing: SpiConfig,
    reconfigure: F,
}

impl<S, F> HalSerialBus<S, F>
where
    S: SpiBus<u8>,
    F: FnMut(&mut S, &SpiConfig) -> Result<(), S::Error>,
{
    /// Wrap `spi`, currently running at `timing`.
    pub fn new(spi: S, timing: SpiConfig, reconfigure: F) -> Self {
        Self {
            spi,
            timing,
            reconfigure,
        }
    }

    /// Give back the wrapped bus.
    pub fn release(self) -> S {
        self.spi
    }
}

impl<S, F> SerialBus for HalSerialBus<S, F>
where
    S: SpiBus<u8>,
    F: FnMut(&mut S, &SpiConfig) -> Result<(), S::Error>,
{
    type Error = SpiErrorKind;

    fn transfer_byte(&mut self, out: u8) -> Result<u8, Self::Error> {
        let mut buf = [out];
        self.spi
            .transfer_in_place(&mut buf)
            .map_err(|e| e.kind())?;
        let [response] = buf;
        Ok(response)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.spi.flush().map_err(|e| e.kind())
    }

    fn timing(&self) -> SpiConfig {
        self.timing
    }

    fn set_timing(&mut self, config: SpiConfig) -> Result<(), Self::Error> {
        if config != self.timing {
            (self.reconfigure)(&mut self.spi, &config).map_err(|e| e.kind())?;
            self.timing = config;
        }
        Ok(())
    }
}

/// Chip-select for the control (SCI) interface.
pub const XCS: PinId = PinId(0);
/// Chip-select for the data (SDI) interface.
pub const XDCS: PinId = PinId(1);
/// Data-request (ready) input.
pub const DREQ: PinId = PinId(2);
/// Hardware reset output.
pub const XRESET: PinId = PinId(3);

/// The four codec lines as embedded-hal pins, addressed as [`XCS`],
/// [`XDCS`], [`DREQ`] and [`XRESET`].
pub struct HalPins<Cs, Dcs, Dreq, Rst> {
    xcs: Cs,
    xdcs: Dcs,
    dreq: Dreq,
    xreset: Rst,
}

impl<Cs, Dcs, Dreq, Rst> HalPins<Cs, Dcs, Dreq, Rst>
where
    Cs: OutputPin,
    Dcs: OutputPin,
    Dreq: InputPin,
    Rst: OutputPin,
{
    /// Bundle the lines.
    pub fn new(xcs: Cs, xdcs: Dcs, dreq: Dreq, xreset: Rst) -> Self {
        Self {
            xcs,
            xdcs,
            dreq,
            xreset,
        }
    }

    /// Give back the individual pins.
    pub fn release(self) -> (Cs, Dcs, Dreq, Rst) {
        (self.xcs, self.xdcs, self.dreq, self.xreset)
    }

    fn drive<P: OutputPin>(pin: &mut P, state: PinState) -> Result<(), PinErrorKind> {
        match state {
            PinState::High => pin.set_high(),
            PinState::Low => pin.set_low(),
        }
        .map_err(|e| e.kind())
    }
}

impl<Cs, Dcs, Dreq, Rst> PinIo for HalPins<Cs, Dcs, Dreq, Rst>
where
    Cs: OutputPin,
    Dcs: OutputPin,
    Dreq: InputPin,
    Rst: OutputPin,
{
    type Error = PinErrorKind;

    fn configure(&mut self, pin: PinId, direction: PinDirection) -> Result<(), Self::Error> {
        // Directions are fixed by the HAL types; only reject a mismatch.
        let expected = if pin == DREQ {
            PinDirection::Input
        } else if pin == XCS || pin == XDCS || pin == XRESET {
            PinDirection::Output
        } else {
            return Err(PinErrorKind::Other);
        };
        if direction == expected {
            Ok(())
        } else {
            Err(PinErrorKind::Other)
        }
    }

    fn set_pin(&mut self, pin: PinId, state: PinState) -> Result<(), Self::Error> {
        match pin {
            XCS => Self::drive(&mut self.xcs, state),
            XDCS => Self::drive(&mut self.xdcs, state),
            XRESET => Self::drive(&mut self.xreset, state),
            _ => Err(PinErrorKind::Other),
        }
    }

    fn read_pin(&mut self, pin: PinId) -> Result<PinState, Self::Error> {
        if pin == DREQ {
            self.dreq
                .is_high()
                .map(PinState::from)
                .map_err(|e| e.kind())
        } else {
            Err(PinErrorKind::Other)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use embedded_hal_mock::eh1::digital::{Mock as PinMock, State, Transaction as PinTx};
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTx};

    type MockSpiError = <SpiMock<u8> as embedded_hal::spi::ErrorType>::Error;

    #[test]
    fn serial_bus_returns_byte_clocked_in() {
        let mut spi: SpiMock<u8> =
            SpiMock::new(&[SpiTx::transfer_in_place(vec![0x03u8], vec![0xA5u8])]);
        let reconfigure = |_: &mut SpiMock<u8>, _: &SpiConfig| Ok::<(), MockSpiError>(());
        let mut bus = HalSerialBus::new(spi.clone(), SpiConfig::new(1_000_000), reconfigure);
        assert_eq!(bus.transfer_byte(0x03).unwrap(), 0xA5);
        spi.done();
    }

    #[test]
    fn serial_bus_reconfigures_only_on_change() {
        let mut spi: SpiMock<u8> = SpiMock::new(&[]);
        let mut calls = 0u32;
        {
            let reconfigure = |_: &mut SpiMock<u8>, _: &SpiConfig| {
                calls = calls.saturating_add(1);
                Ok::<(), MockSpiError>(())
            };
            let mut bus = HalSerialBus::new(spi.clone(), SpiConfig::new(1_000_000), reconfigure);
            bus.set_timing(SpiConfig::new(1_000_000)).unwrap();
            bus.set_timing(SpiConfig::new(4_000_000)).unwrap();
            assert_eq!(bus.timing(), SpiConfig::new(4_000_000));
        }
        assert_eq!(calls, 1);
        spi.done();
    }

    #[test]
    fn pins_route_by_id() {
        let mut xcs = PinMock::new(&[PinTx::set(State::Low), PinTx::set(State::High)]);
        let mut xdcs = PinMock::new(&[PinTx::set(State::High)]);
        let mut dreq = PinMock::new(&[PinTx::get(State::High)]);
        let mut xreset = PinMock::new(&[]);
        let mut pins = HalPins::new(xcs.clone(), xdcs.clone(), dreq.clone(), xreset.clone());

        pins.set_pin(XDCS, PinState::High).unwrap();
        pins.set_pin(XCS, PinState::Low).unwrap();
        pins.set_pin(XCS, PinState::High).unwrap();
        assert_eq!(pins.read_pin(DREQ).unwrap(), PinState::High);

        xcs.done();
        xdcs.done();
        dreq.done();
        xreset.done();
    }

    #[test]
    fn pins_reject_wrong_direction_and_unknown_ids() {
        let mut pins = HalPins::new(
            PinMock::new(&[]),
            PinMock::new(&[]),
            PinMock::new(&[]),
            PinMock::new(&[]),
        );
        assert!(pins.configure(DREQ, PinDirection::Input).is_ok());
        assert!(pins.configure(XCS, PinDirection::Output).is_ok());
        assert_eq!(pins.configure(DREQ, PinDirection::Output), Err(PinErrorKind::Other));
        assert_eq!(pins.set_pin(DREQ, PinState::Low), Err(PinErrorKind::Other));
        assert_eq!(pins.read_pin(XCS), Err(PinErrorKind::Other));
        assert_eq!(pins.set_pin(PinId(42), PinState::Low), Err(PinErrorKind::Other));

        let (mut a, mut b, mut c, mut d) = pins.release();
        a.done();
        b.done();
        c.done();
        d.done();
    }
}
