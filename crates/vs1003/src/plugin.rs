//! Compressed plugin images
//!
//! VLSI distributes patches and applications (such as the real-time MIDI
//! plugin) as arrays of 16-bit words made of records:
//!
//! ```text
//! [register, header, payload...]
//!
//! header & 0x8000 != 0   repeat run: payload is one word, written
//!                        (header & 0x7FFF) times to `register`
//! header & 0x8000 == 0   copy run: payload is `header` words, each
//!                        written to `register` in order
//! ```

use embedded_hal::delay::DelayNs;
use platform::{PinIo, SerialBus};

use crate::{DriverError, Error, Vs1003};

const REPEAT_FLAG: u16 = 0x8000;
const COUNT_MASK: u16 = 0x7FFF;

/// A plugin image borrowed from flash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plugin<'a> {
    words: &'a [u16],
}

/// One register write decoded from a [`Plugin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PluginWrite {
    /// Target register
    pub reg: u8,
    /// Value to write
    pub value: u16,
}

/// The image ends in the middle of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("plugin image truncated")]
pub struct TruncatedImage {
    /// Index of the first missing word
    pub offset: usize,
}

impl<'a> Plugin<'a> {
    /// Wrap an image. Nothing is checked until it is decoded.
    pub const fn new(words: &'a [u16]) -> Self {
        Self { words }
    }

    /// Raw image.
    pub const fn words(&self) -> &'a [u16] {
        self.words
    }

    /// Decode the image into register writes.
    pub fn writes(&self) -> PluginWrites<'a> {
        PluginWrites {
            words: self.words,
            cursor: 0,
            run: None,
        }
    }

    /// Number of register writes the image expands to.
    pub fn write_count(&self) -> Result<usize, TruncatedImage> {
        self.writes().try_fold(0usize, |count, write| {
            write.map(|_| count.saturating_add(1))
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Run {
    Repeat { reg: u8, value: u16, left: u16 },
    Copy { reg: u8, left: u16 },
}

/// Iterator over the writes of a [`Plugin`].
///
/// Yields one `Err` at the first missing word, then ends.
#[derive(Debug, Clone)]
pub struct PluginWrites<'a> {
    words: &'a [u16],
    cursor: usize,
    run: Option<Run>,
}

impl PluginWrites<'_> {
    fn word(&self, offset: usize) -> Result<u16, TruncatedImage> {
        self.words.get(offset).copied().ok_or(TruncatedImage { offset })
    }

    fn truncated(&mut self, error: TruncatedImage) -> Option<Result<PluginWrite, TruncatedImage>> {
        self.cursor = self.words.len();
        self.run = None;
        Some(Err(error))
    }
}

impl Iterator for PluginWrites<'_> {
    type Item = Result<PluginWrite, TruncatedImage>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.run {
                Some(Run::Repeat { reg, value, left }) if left > 0 => {
                    self.run = Some(Run::Repeat {
                        reg,
                        value,
                        left: left.saturating_sub(1),
                    });
                    return Some(Ok(PluginWrite { reg, value }));
                }
                Some(Run::Copy { reg, left }) if left > 0 => {
                    let value = match self.word(self.cursor) {
                        Ok(value) => value,
                        Err(e) => return self.truncated(e),
                    };
                    self.cursor = self.cursor.saturating_add(1);
                    self.run = Some(Run::Copy {
                        reg,
                        left: left.saturating_sub(1),
                    });
                    return Some(Ok(PluginWrite { reg, value }));
                }
                _ => self.run = None,
            }

            // Next record header; a clean end is only possible here.
            let [_, reg] = self.words.get(self.cursor)?.to_be_bytes();
            let header = match self.word(self.cursor.saturating_add(1)) {
                Ok(header) => header,
                Err(e) => return self.truncated(e),
            };
            if header & REPEAT_FLAG != 0 {
                let value = match self.word(self.cursor.saturating_add(2)) {
                    Ok(value) => value,
                    Err(e) => return self.truncated(e),
                };
                self.cursor = self.cursor.saturating_add(3);
                self.run = Some(Run::Repeat {
                    reg,
                    value,
                    left: header & COUNT_MASK,
                });
            } else {
                self.cursor = self.cursor.saturating_add(2);
                self.run = Some(Run::Copy { reg, left: header });
            }
        }
    }
}

impl<B, P, D> Vs1003<B, P, D>
where
    B: SerialBus,
    P: PinIo,
    D: DelayNs,
{
    /// Upload a plugin image through `write_register`.
    ///
    /// The whole image is decoded first; a truncated image is rejected
    /// before anything reaches the chip. Returns the number of writes.
    pub fn load_plugin(&mut self, plugin: &Plugin<'_>) -> Result<usize, DriverError<B, P>> {
        let count = plugin
            .write_count()
            .map_err(|e| Error::TruncatedPlugin { offset: e.offset })?;
        debug!("plugin: {} words, {} writes", plugin.words().len(), count);

        for write in plugin.writes() {
            let PluginWrite { reg, value } =
                write.map_err(|e| Error::TruncatedPlugin { offset: e.offset })?;
            self.write_register(reg, value)?;
        }
        Ok(count)
    }
}
