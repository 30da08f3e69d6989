//! Shared fixtures for the driver integration tests.

#![allow(dead_code)]

use embedded_hal_mock::eh1::delay::NoopDelay;
use platform::mocks::{MockBus, MockPins, SimulatedVs1003};
use vs1003::{Vs1003, Vs1003Config, Vs1003Pins};

pub type TestDriver = Vs1003<MockBus, MockPins, NoopDelay>;

pub fn pins_for(chip: &SimulatedVs1003) -> Vs1003Pins {
    let w = chip.wiring();
    Vs1003Pins {
        xcs: w.xcs,
        xdcs: w.xdcs,
        dreq: w.dreq,
        xreset: w.xreset,
    }
}

/// Fresh chip and a driver configured by `tweak`, not yet booted.
pub fn driver_with(
    tweak: impl FnOnce(Vs1003Config) -> Vs1003Config,
) -> (SimulatedVs1003, TestDriver) {
    let chip = SimulatedVs1003::default();
    let config = tweak(Vs1003Config::new(pins_for(&chip)));
    let vs = Vs1003::new(chip.bus(), chip.pins(), NoopDelay::new(), config);
    (chip, vs)
}

pub fn driver() -> (SimulatedVs1003, TestDriver) {
    driver_with(|config| config)
}

/// Booted driver with logs cleared, ready for the operation under test.
pub fn booted() -> (SimulatedVs1003, TestDriver) {
    let (chip, mut vs) = driver();
    vs.begin().unwrap();
    chip.clear_logs();
    (chip, vs)
}
