//! Register access over the serial control interface

use embedded_hal::delay::DelayNs;
use platform::{PinIo, SerialBus};

use crate::registers::{SCI_DUMMY, SCI_READ, SCI_WRITE};
use crate::timing::TimingScope;
use crate::{DriverError, Error, Vs1003};

impl<B, P, D> Vs1003<B, P, D>
where
    B: SerialBus,
    P: PinIo,
    D: DelayNs,
{
    /// Read a 16-bit SCI register.
    ///
    /// Waits for `DREQ`, then clocks `READ, reg` followed by two dummy bytes
    /// with `xCS` low. The value comes back high byte first.
    pub fn read_register(&mut self, reg: u8) -> Result<u16, DriverError<B, P>> {
        let mut bus = TimingScope::enter(&mut self.bus, self.profile).map_err(Error::Bus)?;
        self.lines.await_ready().map_err(Error::Pin)?;
        let control = self.lines.enter_control().map_err(Error::Pin)?;

        bus.write_byte(SCI_READ).map_err(Error::Bus)?;
        bus.write_byte(reg).map_err(Error::Bus)?;
        let hi = bus.transfer_byte(SCI_DUMMY).map_err(Error::Bus)?;
        let lo = bus.transfer_byte(SCI_DUMMY).map_err(Error::Bus)?;
        bus.flush().map_err(Error::Bus)?;

        control.release().map_err(Error::Pin)?;
        bus.finish().map_err(Error::Bus)?;

        let value = u16::from_be_bytes([hi, lo]);
        trace!("SCI read {:#x} -> {:#x}", reg, value);
        Ok(value)
    }

    /// Write a 16-bit SCI register.
    pub fn write_register(&mut self, reg: u8, value: u16) -> Result<(), DriverError<B, P>> {
        trace!("SCI write {:#x} <- {:#x}", reg, value);
        let [hi, lo] = value.to_be_bytes();

        let mut bus = TimingScope::enter(&mut self.bus, self.profile).map_err(Error::Bus)?;
        self.lines.await_ready().map_err(Error::Pin)?;
        let control = self.lines.enter_control().map_err(Error::Pin)?;

        for byte in [SCI_WRITE, reg, hi, lo] {
            bus.write_byte(byte).map_err(Error::Bus)?;
        }
        bus.flush().map_err(Error::Bus)?;

        control.release().map_err(Error::Pin)?;
        bus.finish().map_err(Error::Bus)
    }
}
