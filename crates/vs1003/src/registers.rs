//! VS1003 register map
//!
//! Source: VLSI Solution VS1003 datasheet v1.04, section 8.7 (SCI registers).
//!
//! # Framing
//!
//! Every SCI transaction is four bytes while `xCS` is low: opcode, register
//! index, then the 16-bit value high byte first. For a read the last two bytes
//! are dummies and the chip answers on MISO. The chip needs `DREQ` high
//! before a transaction starts; after a write to `SCI_MODE`, `SCI_CLOCKF`
//! and a few others `DREQ` drops while the chip processes it.
//!
//! # Clocking
//!
//! SCI reads must not exceed CLKI/7 and writes CLKI/4. Before `SCI_CLOCKF`
//! sets the multiplier, CLKI is the bare 12.288 MHz crystal, so boot-time
//! traffic runs slow.

use core::fmt;

// ---------------------------------------------------------------------------
// Opcodes
// ---------------------------------------------------------------------------

/// SCI write opcode
pub const SCI_WRITE: u8 = 0x02;

/// SCI read opcode
pub const SCI_READ: u8 = 0x03;

/// Dummy byte clocked out while reading a register value.
pub const SCI_DUMMY: u8 = 0xFF;

// ---------------------------------------------------------------------------
// Register addresses
// ---------------------------------------------------------------------------

/// Mode control (see `SM_*` bits)
pub const SCI_MODE: u8 = 0x0;
/// Status; bits 4..=6 hold the chip version (3 = VS1003)
pub const SCI_STATUS: u8 = 0x1;
/// Built-in bass/treble enhancer
pub const SCI_BASS: u8 = 0x2;
/// Clock frequency and multiplier
pub const SCI_CLOCKF: u8 = 0x3;
/// Decode time in seconds
pub const SCI_DECODE_TIME: u8 = 0x4;
/// Sample rate and channel count; bit 0 set = stereo
pub const SCI_AUDATA: u8 = 0x5;
/// RAM write/read data
pub const SCI_WRAM: u8 = 0x6;
/// Base address for RAM write/read
pub const SCI_WRAMADDR: u8 = 0x7;
/// Stream header data 0
pub const SCI_HDAT0: u8 = 0x8;
/// Stream header data 1
pub const SCI_HDAT1: u8 = 0x9;
/// Start address of an application plugin
pub const SCI_AIADDR: u8 = 0xA;
/// Volume control; high byte left, low byte right, 0 = loudest
pub const SCI_VOL: u8 = 0xB;
/// Application control register 0
pub const SCI_AICTRL0: u8 = 0xC;
/// Application control register 1
pub const SCI_AICTRL1: u8 = 0xD;
/// Application control register 2
pub const SCI_AICTRL2: u8 = 0xE;
/// Application control register 3
pub const SCI_AICTRL3: u8 = 0xF;

/// Number of SCI registers.
pub const REGISTER_COUNT: usize = 16;

// ---------------------------------------------------------------------------
// SCI_MODE bits
// ---------------------------------------------------------------------------

/// Differential output (left channel inverted)
pub const SM_DIFF: u16 = 1 << 0;
/// Set to zero
pub const SM_SETTOZERO: u16 = 1 << 1;
/// Soft reset, self-clearing
pub const SM_RESET: u16 = 1 << 2;
/// Jump out of WAV decoding
pub const SM_OUTOFWAV: u16 = 1 << 3;
/// Power down
pub const SM_PDOWN: u16 = 1 << 4;
/// Allow SDI tests
pub const SM_TESTS: u16 = 1 << 5;
/// Stream mode
pub const SM_STREAM: u16 = 1 << 6;
/// Set to zero
pub const SM_SETTOZERO2: u16 = 1 << 7;
/// DCLK active edge
pub const SM_DACT: u16 = 1 << 8;
/// SDI bit order
pub const SM_SDIORD: u16 = 1 << 9;
/// Share SPI chip select
pub const SM_SDISHARE: u16 = 1 << 10;
/// VS1002 native SPI modes (power-on default)
pub const SM_SDINEW: u16 = 1 << 11;
/// ADPCM recording active
pub const SM_ADPCM: u16 = 1 << 12;
/// ADPCM high-pass filter active
pub const SM_ADPCM_HP: u16 = 1 << 13;
/// ADPCM recording selector (line in instead of microphone)
pub const SM_LINE_IN: u16 = 1 << 14;

// ---------------------------------------------------------------------------
// Values written during boot
// ---------------------------------------------------------------------------

/// Declick sample rate: 10 Hz, mono.
pub const AUDATA_DECLICK: u16 = 10;

/// 44.1 kHz stereo (the odd value sets the stereo bit).
pub const AUDATA_44K1_STEREO: u16 = 44_101;

/// Analog powered down.
pub const VOL_POWER_DOWN: u16 = 0xFFFF;

/// Analog powered up, both channels silent.
pub const VOL_SILENT: u16 = 0xFEFE;

/// CLKI = XTALI x 3.5, with up to +1.5x added when decoding WMA.
pub const CLOCKF_DEFAULT: u16 = 0xB800;

/// Entry point of the real-time MIDI plugin.
pub const RTMIDI_START: u16 = 0x0030;

/// Datasheet name of register `reg`.
pub const fn register_name(reg: u8) -> &'static str {
    match reg {
        SCI_MODE => "SCI_MODE",
        SCI_STATUS => "SCI_STATUS",
        SCI_BASS => "SCI_BASS",
        SCI_CLOCKF => "SCI_CLOCKF",
        SCI_DECODE_TIME => "SCI_DECODE_TIME",
        SCI_AUDATA => "SCI_AUDATA",
        SCI_WRAM => "SCI_WRAM",
        SCI_WRAMADDR => "SCI_WRAMADDR",
        SCI_HDAT0 => "SCI_HDAT0",
        SCI_HDAT1 => "SCI_HDAT1",
        SCI_AIADDR => "SCI_AIADDR",
        SCI_VOL => "SCI_VOL",
        SCI_AICTRL0 => "SCI_AICTRL0",
        SCI_AICTRL1 => "SCI_AICTRL1",
        SCI_AICTRL2 => "SCI_AICTRL2",
        SCI_AICTRL3 => "SCI_AICTRL3",
        _ => "UNKNOWN",
    }
}

/// Snapshot of all sixteen SCI registers, as read by
/// [`Vs1003::print_details`](crate::Vs1003::print_details).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RegisterDump {
    values: [u16; REGISTER_COUNT],
}

impl RegisterDump {
    /// Wrap raw values, index = register address.
    pub const fn new(values: [u16; REGISTER_COUNT]) -> Self {
        Self { values }
    }

    /// Value of register `reg`, `None` past `SCI_AICTRL3`.
    pub fn get(&self, reg: u8) -> Option<u16> {
        self.values.get(usize::from(reg)).copied()
    }

    /// Raw values, index = register address.
    pub const fn values(&self) -> &[u16; REGISTER_COUNT] {
        &self.values
    }

    /// Chip version from `SCI_STATUS` bits 4..=6.
    pub fn version(&self) -> u8 {
        self.get(SCI_STATUS)
            .and_then(|status| u8::try_from((status >> 4) & 0x7).ok())
            .unwrap_or(0)
    }

    /// `(register, name, value)` for every register.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &'static str, u16)> + '_ {
        (0u8..).zip(self.values.iter()).map(|(reg, &value)| (reg, register_name(reg), value))
    }
}

impl fmt::Display for RegisterDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (reg, name, value) in self.iter() {
            writeln!(f, "{reg:#04x} {name:<15} = {value:#06x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn names_cover_every_register() {
        for reg in 0..16u8 {
            assert_ne!(register_name(reg), "UNKNOWN", "register {reg}");
        }
        assert_eq!(register_name(0x10), "UNKNOWN");
        assert_eq!(register_name(SCI_VOL), "SCI_VOL");
    }

    #[test]
    fn mode_bits_are_distinct() {
        let bits = [
            SM_DIFF, SM_SETTOZERO, SM_RESET, SM_OUTOFWAV, SM_PDOWN, SM_TESTS, SM_STREAM,
            SM_SETTOZERO2, SM_DACT, SM_SDIORD, SM_SDISHARE, SM_SDINEW, SM_ADPCM, SM_ADPCM_HP,
            SM_LINE_IN,
        ];
        let all = bits.iter().fold(0u16, |acc, bit| acc | bit);
        assert_eq!(all, 0x7FFF);
    }

    #[test]
    fn dump_reports_version_and_lines() {
        let mut values = [0u16; REGISTER_COUNT];
        values[usize::from(SCI_STATUS)] = 3 << 4;
        values[usize::from(SCI_VOL)] = 0x2020;
        let dump = RegisterDump::new(values);

        assert_eq!(dump.version(), 3);
        assert_eq!(dump.get(SCI_VOL), Some(0x2020));
        assert_eq!(dump.get(16), None);

        let text = dump.to_string();
        assert_eq!(text.lines().count(), 16);
        assert!(text.contains("0x0b SCI_VOL         = 0x2020"));
    }
}
