//! GPIO and pin abstraction layer
//!
//! Pins are addressed by a board-level [`PinId`] instead of being owned as
//! typed handles. A driver only stores the identifiers it was configured
//! with and goes through a [`PinIo`] implementation for every access.

/// Board-level pin identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId(pub u8);

impl PinId {
    /// Raw pin number.
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl From<u8> for PinId {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// Pin state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// High (logic 1)
    High,
    /// Low (logic 0)
    Low,
}

impl PinState {
    /// `true` for [`PinState::High`].
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }

    /// `true` for [`PinState::Low`].
    pub const fn is_low(self) -> bool {
        matches!(self, Self::Low)
    }
}

impl From<bool> for PinState {
    fn from(value: bool) -> Self {
        if value {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(value: PinState) -> Self {
        matches!(value, PinState::High)
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinDirection {
    /// Input, sampled with [`PinIo::read_pin`]
    Input,
    /// Push-pull output, driven with [`PinIo::set_pin`]
    Output,
}

/// Pin read/write primitives.
pub trait PinIo {
    /// Error type
    type Error: core::fmt::Debug;

    /// Set the direction of `pin`.
    fn configure(&mut self, pin: PinId, direction: PinDirection) -> Result<(), Self::Error>;

    /// Drive an output pin.
    fn set_pin(&mut self, pin: PinId, state: PinState) -> Result<(), Self::Error>;

    /// Sample an input pin.
    fn read_pin(&mut self, pin: PinId) -> Result<PinState, Self::Error>;

    /// Drive `pin` high
    fn set_high(&mut self, pin: PinId) -> Result<(), Self::Error> {
        self.set_pin(pin, PinState::High)
    }

    /// Drive `pin` low
    fn set_low(&mut self, pin: PinId) -> Result<(), Self::Error> {
        self.set_pin(pin, PinState::Low)
    }

    /// Read pin state
    fn is_high(&mut self, pin: PinId) -> Result<bool, Self::Error> {
        self.read_pin(pin).map(PinState::is_high)
    }
}

impl<T: PinIo + ?Sized> PinIo for &mut T {
    type Error = T::Error;

    fn configure(&mut self, pin: PinId, direction: PinDirection) -> Result<(), Self::Error> {
        T::configure(self, pin, direction)
    }

    fn set_pin(&mut self, pin: PinId, state: PinState) -> Result<(), Self::Error> {
        T::set_pin(self, pin, state)
    }

    fn read_pin(&mut self, pin: PinId) -> Result<PinState, Self::Error> {
        T::read_pin(self, pin)
    }
}
