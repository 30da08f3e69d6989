//! Serial bus abstraction layer
//!
//! A [`SerialBus`] shifts one byte at a time, full duplex, and exposes its
//! current timing profile ([`SpiConfig`]) so that a device driver can swap in
//! its own profile for the length of a transaction and hand the bus back
//! unchanged to whoever else shares it.

/// Full-duplex, byte-wise serial bus.
pub trait SerialBus {
    /// Error type
    type Error: core::fmt::Debug;

    /// Shift `out` onto the bus and return the byte clocked in at the same time.
    fn transfer_byte(&mut self, out: u8) -> Result<u8, Self::Error>;

    /// Shift `out` and discard the response.
    fn write_byte(&mut self, out: u8) -> Result<(), Self::Error> {
        self.transfer_byte(out).map(|_| ())
    }

    /// Wait until every shifted byte has left the wire.
    ///
    /// Called before a chip-select is released.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Currently applied timing profile.
    fn timing(&self) -> SpiConfig;

    /// Apply a timing profile.
    fn set_timing(&mut self, config: SpiConfig) -> Result<(), Self::Error>;
}

impl<T: SerialBus + ?Sized> SerialBus for &mut T {
    type Error = T::Error;

    fn transfer_byte(&mut self, out: u8) -> Result<u8, Self::Error> {
        T::transfer_byte(self, out)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        T::flush(self)
    }

    fn timing(&self) -> SpiConfig {
        T::timing(self)
    }

    fn set_timing(&mut self, config: SpiConfig) -> Result<(), Self::Error> {
        T::set_timing(self, config)
    }
}

/// SPI timing profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// SPI mode (CPOL, CPHA)
    pub mode: SpiMode,
    /// Bit order
    pub bit_order: BitOrder,
}

impl SpiConfig {
    /// Mode 0, MSB first, at `frequency` Hz.
    pub const fn new(frequency: u32) -> Self {
        Self {
            frequency,
            mode: SpiMode::Mode0,
            bit_order: BitOrder::MsbFirst,
        }
    }

    /// Same profile at a different clock.
    #[must_use]
    pub const fn with_frequency(self, frequency: u32) -> Self {
        Self { frequency, ..self }
    }

    /// Same profile in a different mode.
    #[must_use]
    pub const fn with_mode(self, mode: SpiMode) -> Self {
        Self { mode, ..self }
    }
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self::new(1_000_000)
    }
}

/// SPI modes (CPOL, CPHA)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpiMode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<SpiMode> for embedded_hal::spi::Mode {
    fn from(mode: SpiMode) -> Self {
        match mode {
            SpiMode::Mode0 => embedded_hal::spi::MODE_0,
            SpiMode::Mode1 => embedded_hal::spi::MODE_1,
            SpiMode::Mode2 => embedded_hal::spi::MODE_2,
            SpiMode::Mode3 => embedded_hal::spi::MODE_3,
        }
    }
}

/// Bit order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Most significant bit first
    MsbFirst,
    /// Least significant bit first
    LsbFirst,
}
