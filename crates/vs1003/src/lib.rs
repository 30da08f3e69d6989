//! VS1003 MP3/WMA/MIDI decoder driver
//!
//! Blocking driver for the VLSI VS1003 on a serial bus plus four lines:
//! `xCS` (register select), `xDCS` (data select), `DREQ` (ready) and
//! `xRESET`. Bus and pins are reached through the [`platform`] seams, so the
//! same driver runs on hardware (via [`platform::HalSerialBus`] and
//! [`platform::HalPins`]) and against [`platform::mocks::SimulatedVs1003`].
//!
//! # Layers
//!
//! ```text
//! session (start_song / play_chunk / stop_song), MIDI, plugin loader
//!         ↓                         ↓
//! SCI registers (sci)        SDI streaming (sdi)
//!         ↓                         ↓
//! select/ready lines (lines), bus timing scope (timing)
//!         ↓
//! platform::SerialBus + platform::PinIo
//! ```
//!
//! Every transaction applies the driver's bus profile and restores the
//! caller's afterwards, so the bus can be shared with devices clocked
//! differently.
//!
//! # Example
//!
//! ```no_run
//! use embedded_hal::delay::DelayNs;
//! use platform::{PinIo, SerialBus};
//! use vs1003::{DriverError, Vs1003, Vs1003Config};
//!
//! fn play<B, P, D>(
//!     bus: B,
//!     pins: P,
//!     delay: D,
//!     config: Vs1003Config,
//!     song: &[u8],
//! ) -> Result<(), DriverError<B, P>>
//! where
//!     B: SerialBus,
//!     P: PinIo,
//!     D: DelayNs,
//! {
//!     let mut vs = Vs1003::new(bus, pins, delay, config);
//!     vs.begin()?;
//!     vs.set_volume(0x18)?;
//!     vs.start_song()?;
//!     for chunk in song.chunks(512) {
//!         vs.play_chunk(chunk)?;
//!     }
//!     vs.stop_song()
//! }
//! ```
//!
//! # Features
//!
//! - `defmt`: log through defmt and derive `defmt::Format`
//! - `tracing`: log through tracing (host builds)

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![allow(clippy::doc_markdown)] // register and pin names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::wildcard_imports)] // register maps

// Must come first: the log macros are textually scoped.
mod fmt;

pub mod config;
mod driver;
pub mod error;
mod lines;
pub mod midi;
pub mod plugin;
pub mod registers;
mod sci;
mod sdi;
pub mod session;
mod timing;

pub use config::{Vs1003Config, Vs1003Pins};
pub use driver::Vs1003;
pub use error::Error;
pub use lines::BusMode;
pub use midi::MidiMessage;
pub use plugin::{Plugin, PluginWrite, TruncatedImage};
pub use registers::RegisterDump;
pub use session::SessionState;

/// [`Error`] as returned by a driver over bus `B` and pins `P`.
pub type DriverError<B, P> =
    Error<<B as platform::SerialBus>::Error, <P as platform::PinIo>::Error>;
