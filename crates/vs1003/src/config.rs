//! Driver configuration
//!
//! # Example
//!
//! ```
//! use platform::{PinId, SpiConfig};
//! use vs1003::{Vs1003Config, Vs1003Pins};
//!
//! let pins = Vs1003Pins {
//!     xcs: PinId(10),
//!     xdcs: PinId(9),
//!     dreq: PinId(8),
//!     xreset: PinId(7),
//! };
//! let config = Vs1003Config::new(pins)
//!     .with_spi(SpiConfig::new(6_000_000))
//!     .with_initial_volume(0x30);
//! assert_eq!(config.chunk_size, 32);
//! ```

use platform::{PinId, SpiConfig};

use crate::registers::CLOCKF_DEFAULT;

/// Bytes the chip accepts per `DREQ` high, and the SDI burst size.
pub const DEFAULT_CHUNK_SIZE: usize = 32;

/// Zero bytes sent by `start_song`.
pub const PRIMING_LEN: usize = 10;

/// Zero bytes sent by `stop_song` to flush the decoder.
pub const DRAINING_LEN: usize = 2048;

/// SPI clock before `SCI_CLOCKF` is set (bare crystal: reads at most CLKI/7).
pub const BOOT_SPI_HZ: u32 = 250_000;

/// SPI clock once the clock multiplier is running.
pub const SPI_HZ: u32 = 4_000_000;

/// Default volume byte applied to both channels by `begin`.
pub const DEFAULT_VOLUME: u8 = 0x20;

/// Board pins the chip is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vs1003Pins {
    /// Control chip-select (SCI), active low
    pub xcs: PinId,
    /// Data chip-select (SDI), active low
    pub xdcs: PinId,
    /// Data request, input, high when the chip can take data
    pub dreq: PinId,
    /// Hardware reset, active low
    pub xreset: PinId,
}

/// Driver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Vs1003Config {
    /// Pin assignment
    pub pins: Vs1003Pins,
    /// Bus profile for SCI/SDI traffic after `begin`
    pub spi: SpiConfig,
    /// Bus profile used during `begin`, before the clock multiplier is set
    pub boot_spi: SpiConfig,
    /// SDI burst size; `DREQ` is checked before each burst
    pub chunk_size: usize,
    /// Zero bytes sent when a song starts
    pub priming_len: usize,
    /// Zero bytes sent when a song stops
    pub draining_len: usize,
    /// `SCI_CLOCKF` value written by `begin`
    pub clock_f: u16,
    /// Volume byte written to both channels by `begin`
    pub initial_volume: u8,
}

impl Vs1003Config {
    /// Defaults for a VS1003 on a 12.288 MHz crystal.
    pub const fn new(pins: Vs1003Pins) -> Self {
        Self {
            pins,
            spi: SpiConfig::new(SPI_HZ),
            boot_spi: SpiConfig::new(BOOT_SPI_HZ),
            chunk_size: DEFAULT_CHUNK_SIZE,
            priming_len: PRIMING_LEN,
            draining_len: DRAINING_LEN,
            clock_f: CLOCKF_DEFAULT,
            initial_volume: DEFAULT_VOLUME,
        }
    }

    /// Run profile.
    #[must_use]
    pub const fn with_spi(self, spi: SpiConfig) -> Self {
        Self { spi, ..self }
    }

    /// Boot profile.
    #[must_use]
    pub const fn with_boot_spi(self, boot_spi: SpiConfig) -> Self {
        Self { boot_spi, ..self }
    }

    /// SDI burst size, at least one byte.
    ///
    /// Values above [`DEFAULT_CHUNK_SIZE`] may overrun the chip FIFO.
    #[must_use]
    pub const fn with_chunk_size(self, chunk_size: usize) -> Self {
        let chunk_size = if chunk_size == 0 { 1 } else { chunk_size };
        Self { chunk_size, ..self }
    }

    /// Zero bytes around a song.
    #[must_use]
    pub const fn with_padding(self, priming_len: usize, draining_len: usize) -> Self {
        Self {
            priming_len,
            draining_len,
            ..self
        }
    }

    /// `SCI_CLOCKF` value.
    #[must_use]
    pub const fn with_clock_f(self, clock_f: u16) -> Self {
        Self { clock_f, ..self }
    }

    /// Volume written by `begin`.
    #[must_use]
    pub const fn with_initial_volume(self, initial_volume: u8) -> Self {
        Self {
            initial_volume,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pins() -> Vs1003Pins {
        Vs1003Pins {
            xcs: PinId(0),
            xdcs: PinId(1),
            dreq: PinId(2),
            xreset: PinId(3),
        }
    }

    #[test]
    fn defaults_match_chip_contract() {
        let config = Vs1003Config::new(pins());
        assert_eq!(config.chunk_size, 32);
        assert_eq!(config.priming_len, 10);
        assert_eq!(config.draining_len, 2048);
        assert_eq!(config.clock_f, 0xB800);
        assert_eq!(config.spi.frequency, 4_000_000);
        assert_eq!(config.boot_spi.frequency, 250_000);
        assert!(config.boot_spi.frequency < config.spi.frequency);
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        assert_eq!(Vs1003Config::new(pins()).with_chunk_size(0).chunk_size, 1);
        assert_eq!(Vs1003Config::new(pins()).with_chunk_size(16).chunk_size, 16);
    }

    #[test]
    fn builders_leave_pins_alone() {
        let config = Vs1003Config::new(pins())
            .with_padding(0, 64)
            .with_clock_f(0x9800)
            .with_initial_volume(0);
        assert_eq!(config.pins, pins());
        assert_eq!((config.priming_len, config.draining_len), (0, 64));
        assert_eq!(config.clock_f, 0x9800);
        assert_eq!(config.initial_volume, 0);
    }
}
