//! Playback session
//!
//! ```text
//! Idle --start_song--> Priming --(zeroes sent)--> Streaming
//!  ^                                                 |
//!  +----(zeroes sent)---- Draining <---stop_song-----+
//! ```
//!
//! `play_chunk` is only accepted in `Streaming`. A bus or pin error while
//! priming or draining drops the session back to `Idle`.

use embedded_hal::delay::DelayNs;
use platform::{PinIo, SerialBus};

use crate::{DriverError, Error, Vs1003};

/// Where a song is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    /// No song
    #[default]
    Idle,
    /// Sending the leading zero run
    Priming,
    /// Accepting chunks
    Streaming,
    /// Sending the trailing zero run
    Draining,
}

impl SessionState {
    /// Short name for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Priming => "priming",
            Self::Streaming => "streaming",
            Self::Draining => "draining",
        }
    }
}

impl<B, P, D> Vs1003<B, P, D>
where
    B: SerialBus,
    P: PinIo,
    D: DelayNs,
{
    /// Current session state.
    pub fn session_state(&self) -> SessionState {
        self.session
    }

    /// Open a song: send the priming zero run, then accept chunks.
    pub fn start_song(&mut self) -> Result<(), DriverError<B, P>> {
        if self.session != SessionState::Idle {
            warn!("start_song while {}", self.session.as_str());
            return Err(Error::SessionAlreadyOpen);
        }
        self.transition(SessionState::Priming);
        let priming = self.send_zeroes(self.config.priming_len);
        self.settle(priming, SessionState::Streaming)
    }

    /// Hand one chunk of encoded audio to the decoder.
    pub fn play_chunk(&mut self, data: &[u8]) -> Result<(), DriverError<B, P>> {
        if self.session != SessionState::Streaming {
            warn!("play_chunk while {}", self.session.as_str());
            return Err(Error::SessionNotOpen);
        }
        self.send_buffer(data)
    }

    /// Close the song: send the draining zero run so the decoder flushes.
    pub fn stop_song(&mut self) -> Result<(), DriverError<B, P>> {
        if self.session != SessionState::Streaming {
            warn!("stop_song while {}", self.session.as_str());
            return Err(Error::SessionNotOpen);
        }
        self.transition(SessionState::Draining);
        let draining = self.send_zeroes(self.config.draining_len);
        self.settle(draining, SessionState::Idle)
    }

    fn settle(
        &mut self,
        outcome: Result<(), DriverError<B, P>>,
        next: SessionState,
    ) -> Result<(), DriverError<B, P>> {
        self.transition(if outcome.is_ok() { next } else { SessionState::Idle });
        outcome
    }

    fn transition(&mut self, next: SessionState) {
        debug!("session {} -> {}", self.session.as_str(), next.as_str());
        self.session = next;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use platform::mocks::MockFault;

    use super::SessionState;
    use crate::testing::driver;
    use crate::Error;

    #[test]
    fn full_song_cycle() {
        let (chip, mut vs) = driver();
        vs.start_song().unwrap();
        assert_eq!(vs.session_state(), SessionState::Streaming);
        vs.play_chunk(&[0xFF, 0xFB, 0x90, 0x44]).unwrap();
        vs.stop_song().unwrap();
        assert_eq!(vs.session_state(), SessionState::Idle);

        let sdi = chip.sdi_bytes();
        assert_eq!(sdi.len(), 10 + 4 + 2048);
        assert_eq!(sdi.get(10..14), Some(&[0xFF, 0xFB, 0x90, 0x44][..]));
    }

    #[test]
    fn double_start_is_rejected() {
        let (chip, mut vs) = driver();
        vs.start_song().unwrap();
        assert_eq!(vs.start_song(), Err(Error::SessionAlreadyOpen));
        assert_eq!(chip.sdi_bytes().len(), 10);
        assert_eq!(vs.session_state(), SessionState::Streaming);
    }

    #[test]
    fn stop_without_start_is_rejected() {
        let (chip, mut vs) = driver();
        assert_eq!(vs.stop_song(), Err(Error::SessionNotOpen));
        assert!(chip.sdi_bytes().is_empty());
    }

    #[test]
    fn failed_priming_falls_back_to_idle() {
        let (chip, mut vs) = driver();
        chip.fail_bus_after(3);
        assert_eq!(vs.start_song(), Err(Error::Bus(MockFault)));
        assert_eq!(vs.session_state(), SessionState::Idle);
        // Retry works once the bus recovers.
        vs.start_song().unwrap();
        assert_eq!(vs.session_state(), SessionState::Streaming);
    }
}
