//! Real-time MIDI
//!
//! With the VLSI real-time MIDI plugin running, the chip reads MIDI bytes
//! from SDI, each one padded to a 16-bit word (high byte zero).

use embedded_hal::delay::DelayNs;
use platform::{PinIo, SerialBus};

use crate::plugin::Plugin;
use crate::registers::{RTMIDI_START, SCI_AIADDR};
use crate::{DriverError, Vs1003};

/// A three-byte MIDI channel message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MidiMessage {
    /// Status byte (command and channel)
    pub command: u8,
    /// First data byte
    pub data1: u8,
    /// Second data byte
    pub data2: u8,
}

impl MidiMessage {
    /// Raw message.
    pub const fn new(command: u8, data1: u8, data2: u8) -> Self {
        Self {
            command,
            data1,
            data2,
        }
    }

    /// Note on, `channel` 0..=15.
    pub const fn note_on(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F)
    }

    /// Note off, `channel` 0..=15.
    pub const fn note_off(channel: u8, note: u8, velocity: u8) -> Self {
        Self::new(0x80 | (channel & 0x0F), note & 0x7F, velocity & 0x7F)
    }

    /// Control change, `channel` 0..=15.
    pub const fn control_change(channel: u8, controller: u8, value: u8) -> Self {
        Self::new(0xB0 | (channel & 0x0F), controller & 0x7F, value & 0x7F)
    }

    /// SDI encoding: each byte preceded by a zero pad byte.
    pub const fn encode(self) -> [u8; 6] {
        [0, self.command, 0, self.data1, 0, self.data2]
    }
}

impl<B, P, D> Vs1003<B, P, D>
where
    B: SerialBus,
    P: PinIo,
    D: DelayNs,
{
    /// Load the real-time MIDI plugin and start it.
    pub fn begin_midi(&mut self, plugin: &Plugin<'_>) -> Result<(), DriverError<B, P>> {
        let writes = self.load_plugin(plugin)?;
        self.write_register(SCI_AIADDR, RTMIDI_START)?;
        info!("VS1003: real-time MIDI started ({} plugin writes)", writes);
        Ok(())
    }

    /// Send one MIDI message to the running MIDI plugin.
    pub fn send_midi_message(
        &mut self,
        command: u8,
        data1: u8,
        data2: u8,
    ) -> Result<(), DriverError<B, P>> {
        self.send_midi(MidiMessage::new(command, data1, data2))
    }

    /// Typed variant of [`send_midi_message`](Self::send_midi_message).
    pub fn send_midi(&mut self, message: MidiMessage) -> Result<(), DriverError<B, P>> {
        trace!(
            "MIDI {:#x} {:#x} {:#x}",
            message.command,
            message.data1,
            message.data2
        );
        self.send_buffer(&message.encode())
    }
}
