//! VS1003 device handle, boot sequence and register-level helpers

use embedded_hal::delay::DelayNs;
use platform::{PinIo, SerialBus, SpiConfig};

use crate::config::Vs1003Config;
use crate::lines::{BusMode, LineControl};
use crate::registers::*;
use crate::session::SessionState;
use crate::{DriverError, Error};

/// VS1003 decoder on a serial bus plus four control lines.
///
/// Owns its bus, pin and delay handles. Every register access and data
/// burst is a blocking transaction that waits for `DREQ` with no timeout;
/// run the driver from a context that may block.
pub struct Vs1003<B, P, D> {
    pub(crate) bus: B,
    pub(crate) lines: LineControl<P>,
    pub(crate) delay: D,
    pub(crate) config: Vs1003Config,
    /// Profile applied around each transaction; the boot profile until
    /// `begin` has set the clock multiplier.
    pub(crate) profile: SpiConfig,
    pub(crate) session: SessionState,
}

impl<B, P, D> Vs1003<B, P, D>
where
    B: SerialBus,
    P: PinIo,
    D: DelayNs,
{
    /// Create the driver. No line or bus is touched until [`begin`](Self::begin).
    pub fn new(bus: B, pins: P, delay: D, config: Vs1003Config) -> Self {
        Self {
            bus,
            lines: LineControl::new(pins, config.pins),
            delay,
            config,
            profile: config.boot_spi,
            session: SessionState::Idle,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &Vs1003Config {
        &self.config
    }

    /// Which select line is asserted. `Idle` between calls.
    pub fn bus_mode(&self) -> BusMode {
        self.lines.mode()
    }

    /// Give back the bus, pin and delay handles.
    pub fn release(self) -> (B, P, D) {
        (self.bus, self.lines.release(), self.delay)
    }

    /// Hardware reset and bring-up.
    ///
    /// Pulses `xRESET`, declicks the analog stage, sets 44.1 kHz stereo and
    /// the initial volume, soft-resets into native SDI mode, programs
    /// `SCI_CLOCKF` and switches to the fast bus profile. Any open song is
    /// forgotten. Ends with a [`print_details`](Self::print_details) dump.
    pub fn begin(&mut self) -> Result<(), DriverError<B, P>> {
        info!("VS1003: hardware reset");
        self.session = SessionState::Idle;
        self.lines.configure().map_err(Error::Pin)?;
        self.delay.delay_ms(1);

        self.profile = self.config.boot_spi;
        self.lines.set_reset(false).map_err(Error::Pin)?;

        // Keep the analog stage quiet while it powers up.
        self.write_register(SCI_VOL, VOL_POWER_DOWN)?;
        self.write_register(SCI_AUDATA, AUDATA_DECLICK)?;
        self.delay.delay_ms(100);
        self.write_register(SCI_VOL, VOL_SILENT)?;

        self.write_register(SCI_AUDATA, AUDATA_44K1_STEREO)?;
        self.set_volume(self.config.initial_volume)?;

        debug!("VS1003: soft reset");
        self.write_register(SCI_MODE, SM_SDINEW | SM_RESET)?;
        self.delay.delay_ms(1);
        self.lines.await_ready().map_err(Error::Pin)?;

        self.write_register(SCI_CLOCKF, self.config.clock_f)?;
        self.delay.delay_ms(1);
        self.lines.await_ready().map_err(Error::Pin)?;

        self.profile = self.config.spi;
        debug!("VS1003: bus clock {} Hz", self.profile.frequency);

        let dump = self.print_details()?;
        info!("VS1003: ready, chip version {}", dump.version());
        Ok(())
    }

    /// Same attenuation on both channels: 0 loudest, 255 silent.
    pub fn set_volume(&mut self, level: u8) -> Result<(), DriverError<B, P>> {
        self.set_channel_volume(level, level)
    }

    /// Per-channel attenuation in -0.5 dB steps.
    pub fn set_channel_volume(&mut self, left: u8, right: u8) -> Result<(), DriverError<B, P>> {
        self.write_register(SCI_VOL, u16::from_be_bytes([left, right]))
    }

    /// Seconds decoded since the current stream started.
    pub fn decode_time(&mut self) -> Result<u16, DriverError<B, P>> {
        self.read_register(SCI_DECODE_TIME)
    }

    /// Read and log every SCI register. Nothing is written.
    pub fn print_details(&mut self) -> Result<RegisterDump, DriverError<B, P>> {
        let mut values = [0u16; REGISTER_COUNT];
        for (reg, slot) in (0u8..).zip(values.iter_mut()) {
            *slot = self.read_register(reg)?;
        }
        let dump = RegisterDump::new(values);
        for (reg, name, value) in dump.iter() {
            info!("VS1003 {:#x} {} = {:#x}", reg, name, value);
        }
        Ok(dump)
    }
}
