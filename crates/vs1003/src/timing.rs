//! Scoped bus timing profile
//!
//! The bus may be shared with devices that want a different clock or mode.
//! [`TimingScope`] applies the driver's profile for one transaction and puts
//! the caller's profile back when it ends, on every path.

use core::ops::{Deref, DerefMut};

use platform::{SerialBus, SpiConfig};

pub(crate) struct TimingScope<'a, B: SerialBus> {
    bus: &'a mut B,
    saved: SpiConfig,
    restored: bool,
}

impl<'a, B: SerialBus> TimingScope<'a, B> {
    /// Save the current profile and apply `profile`.
    pub(crate) fn enter(bus: &'a mut B, profile: SpiConfig) -> Result<Self, B::Error> {
        let saved = bus.timing();
        if let Err(e) = bus.set_timing(profile) {
            let _ = bus.set_timing(saved);
            return Err(e);
        }
        Ok(Self {
            bus,
            saved,
            restored: false,
        })
    }

    /// Restore the saved profile and report the error, if any.
    pub(crate) fn finish(mut self) -> Result<(), B::Error> {
        self.restored = true;
        self.bus.set_timing(self.saved)
    }
}

impl<B: SerialBus> Deref for TimingScope<'_, B> {
    type Target = B;

    fn deref(&self) -> &B {
        self.bus
    }
}

impl<B: SerialBus> DerefMut for TimingScope<'_, B> {
    fn deref_mut(&mut self) -> &mut B {
        self.bus
    }
}

impl<B: SerialBus> Drop for TimingScope<'_, B> {
    fn drop(&mut self) {
        if !self.restored {
            let _ = self.bus.set_timing(self.saved);
        }
    }
}
