//! Streaming over the serial data interface
//!
//! The chip raises `DREQ` while its input FIFO can take at least 32 more
//! bytes. `DREQ` is sampled once per [`chunk_size`](crate::Vs1003Config::chunk_size)
//! burst rather than per byte, which keeps the bus busy and is safe for
//! bursts up to that guarantee.

use embedded_hal::delay::DelayNs;
use platform::{PinIo, SerialBus};

use crate::timing::TimingScope;
use crate::{DriverError, Error, Vs1003};

impl<B, P, D> Vs1003<B, P, D>
where
    B: SerialBus,
    P: PinIo,
    D: DelayNs,
{
    /// Stream `data` to the decoder.
    pub fn send_buffer(&mut self, data: &[u8]) -> Result<(), DriverError<B, P>> {
        self.stream(data.iter().copied())
    }

    /// Stream `len` zero bytes to the decoder.
    pub fn send_zeroes(&mut self, len: usize) -> Result<(), DriverError<B, P>> {
        self.stream(core::iter::repeat_n(0, len))
    }

    fn stream(&mut self, bytes: impl Iterator<Item = u8>) -> Result<(), DriverError<B, P>> {
        let mut bytes = bytes.peekable();
        if bytes.peek().is_none() {
            return Ok(());
        }
        let chunk_size = self.config.chunk_size.max(1);

        let mut bus = TimingScope::enter(&mut self.bus, self.profile).map_err(Error::Bus)?;
        let mut data = self.lines.enter_data().map_err(Error::Pin)?;

        let mut room = 0usize;
        for byte in bytes {
            if room == 0 {
                data.await_ready().map_err(Error::Pin)?;
                room = chunk_size;
            }
            bus.write_byte(byte).map_err(Error::Bus)?;
            room = room.saturating_sub(1);
        }
        bus.flush().map_err(Error::Bus)?;

        data.release().map_err(Error::Pin)?;
        bus.finish().map_err(Error::Bus)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crate::testing::driver;

    #[test]
    fn empty_buffer_touches_nothing() {
        let (chip, mut vs) = driver();
        vs.send_buffer(&[]).unwrap();
        vs.send_zeroes(0).unwrap();
        assert!(chip.line_events().is_empty());
        assert_eq!(chip.dreq_polls(), 0);
    }

    #[test]
    fn dreq_sampled_once_per_burst() {
        let (chip, mut vs) = driver();
        let data: Vec<u8> = (0..100u8).collect();
        vs.send_buffer(&data).unwrap();
        assert_eq!(chip.sdi_bytes(), data);
        // 100 bytes in bursts of 32: 32 + 32 + 32 + 4
        assert_eq!(chip.dreq_polls(), 4);
    }

    #[test]
    fn zeroes_are_zero() {
        let (chip, mut vs) = driver();
        vs.send_zeroes(70).unwrap();
        assert_eq!(chip.sdi_bytes(), vec![0u8; 70]);
        assert_eq!(chip.stray_bytes(), 0);
    }
}
