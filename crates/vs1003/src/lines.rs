//! Select, reset and ready lines
//!
//! `xCS` and `xDCS` share one bus and must never be low together. A select
//! is only ever asserted through a [`Selected`] guard, which deasserts it on
//! [`Selected::release`] or when dropped on an error path. The guard borrows
//! the [`LineControl`] mutably, so a second mode cannot be entered while one
//! is held.

use platform::{PinDirection, PinId, PinIo, PinState};

use crate::config::Vs1003Pins;

/// Which interface of the chip the bus is currently talking to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusMode {
    /// Both selects high
    Idle,
    /// `xCS` low: register (SCI) transaction
    Control,
    /// `xDCS` low: stream (SDI) transaction
    Data,
}

pub(crate) struct LineControl<P> {
    pins: P,
    map: Vs1003Pins,
    mode: BusMode,
}

impl<P: PinIo> LineControl<P> {
    pub(crate) fn new(pins: P, map: Vs1003Pins) -> Self {
        Self {
            pins,
            map,
            mode: BusMode::Idle,
        }
    }

    pub(crate) fn mode(&self) -> BusMode {
        self.mode
    }

    pub(crate) fn release(self) -> P {
        self.pins
    }

    /// Set directions and park the chip in reset with both selects high.
    pub(crate) fn configure(&mut self) -> Result<(), P::Error> {
        let Vs1003Pins {
            xcs,
            xdcs,
            dreq,
            xreset,
        } = self.map;
        self.pins.configure(xreset, PinDirection::Output)?;
        self.pins.set_low(xreset)?;
        self.pins.configure(xcs, PinDirection::Output)?;
        self.pins.set_high(xcs)?;
        self.pins.configure(xdcs, PinDirection::Output)?;
        self.pins.set_high(xdcs)?;
        self.pins.configure(dreq, PinDirection::Input)?;
        self.mode = BusMode::Idle;
        Ok(())
    }

    pub(crate) fn set_reset(&mut self, asserted: bool) -> Result<(), P::Error> {
        let state = if asserted { PinState::Low } else { PinState::High };
        self.pins.set_pin(self.map.xreset, state)
    }

    pub(crate) fn is_ready(&mut self) -> Result<bool, P::Error> {
        self.pins.is_high(self.map.dreq)
    }

    /// Spin until `DREQ` is high. There is no timeout.
    pub(crate) fn await_ready(&mut self) -> Result<(), P::Error> {
        while !self.is_ready()? {}
        Ok(())
    }

    /// `xDCS` high, then `xCS` low.
    pub(crate) fn enter_control(&mut self) -> Result<Selected<'_, P>, P::Error> {
        let (xcs, xdcs) = (self.map.xcs, self.map.xdcs);
        self.select(xcs, xdcs, BusMode::Control)
    }

    /// `xCS` high, then `xDCS` low.
    pub(crate) fn enter_data(&mut self) -> Result<Selected<'_, P>, P::Error> {
        let (xcs, xdcs) = (self.map.xcs, self.map.xdcs);
        self.select(xdcs, xcs, BusMode::Data)
    }

    fn select(
        &mut self,
        line: PinId,
        other: PinId,
        mode: BusMode,
    ) -> Result<Selected<'_, P>, P::Error> {
        debug_assert_eq!(self.mode, BusMode::Idle);
        self.pins.set_high(other)?;
        self.pins.set_low(line)?;
        self.mode = mode;
        Ok(Selected {
            lines: self,
            line,
            released: false,
        })
    }

    fn deselect(&mut self, line: PinId) -> Result<(), P::Error> {
        // Whatever the outcome, the select is no longer ours to rely on.
        self.mode = BusMode::Idle;
        self.pins.set_high(line)
    }
}

/// A held select line; deasserted on drop.
pub(crate) struct Selected<'a, P: PinIo> {
    lines: &'a mut LineControl<P>,
    line: PinId,
    released: bool,
}

impl<P: PinIo> Selected<'_, P> {
    pub(crate) fn await_ready(&mut self) -> Result<(), P::Error> {
        self.lines.await_ready()
    }

    /// Deassert the select and report the pin error, if any.
    pub(crate) fn release(mut self) -> Result<(), P::Error> {
        self.released = true;
        self.lines.deselect(self.line)
    }
}

impl<P: PinIo> Drop for Selected<'_, P> {
    fn drop(&mut self) {
        if !self.released {
            let _ = self.lines.deselect(self.line);
        }
    }
}
