//! Hardware Abstraction Layer for the VS1003 driver workspace
//!
//! This crate provides the trait-based seams the codec driver talks through,
//! enabling development and testing without physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Application (player, MIDI synth, ...)
//!         ↓
//! vs1003 driver (SCI/SDI protocol, playback session)
//!         ↓
//! Platform HAL (this crate - trait abstractions)
//!         ↓
//! Hardware Layer (any embedded-hal 1.0 implementation)
//! ```
//!
//! # Abstractions
//!
//! - [`gpio`] - Pins addressed by board-level [`PinId`]
//! - [`peripheral`] - Byte-wise full-duplex [`SerialBus`] with a swappable
//!   [`SpiConfig`] timing profile
//! - [`mocks`] - Simulated VS1003 for host tests (`std` feature)
//!
//! # Features
//!
//! - `std`: Enable the host mocks
//! - `defmt`: Enable defmt derives
//!
//! # Example
//!
//! ```no_run
//! use platform::{PinId, PinIo, PinState};
//!
//! fn pulse<P: PinIo>(pins: &mut P, reset: PinId) -> Result<(), P::Error> {
//!     pins.set_pin(reset, PinState::Low)?;
//!     pins.set_pin(reset, PinState::High)
//! }
//! ```

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
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this hardware HAL crate:
#![allow(clippy::doc_markdown)] // pin and register names in doc comments
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

#[cfg(feature = "std")]
extern crate std;

pub mod gpio;
pub mod hal;
pub mod peripheral;

#[cfg(any(test, feature = "std"))]
pub mod mocks;

// Re-export GPIO types
pub use gpio::{PinDirection, PinId, PinIo, PinState};

// Re-export peripheral types
pub use peripheral::{BitOrder, SerialBus, SpiConfig, SpiMode};

// Re-export embedded-hal adapters
pub use hal::{HalPins, HalSerialBus};
