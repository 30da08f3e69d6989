//! Driver error type

use thiserror::Error;

/// Errors returned by [`Vs1003`](crate::Vs1003).
///
/// Generic over the error types of the injected bus and pin handles, see
/// [`DriverError`](crate::DriverError) for the alias used in signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<BusError, PinError> {
    /// A byte transfer or timing change on the serial bus failed.
    #[error("serial bus error")]
    Bus(BusError),

    /// Driving a select/reset line or sampling DREQ failed.
    #[error("control line error")]
    Pin(PinError),

    /// `play_chunk` or `stop_song` called while no song is playing.
    #[error("no song is playing")]
    SessionNotOpen,

    /// `start_song` called while a song is already playing.
    #[error("a song is already playing")]
    SessionAlreadyOpen,

    /// The plugin image ends in the middle of a record.
    #[error("plugin image truncated")]
    TruncatedPlugin {
        /// Index of the first missing word.
        offset: usize,
    },
}
