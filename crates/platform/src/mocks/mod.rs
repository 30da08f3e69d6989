//! Mock implementations for testing
//!
//! [`SimulatedVs1003`] models the parts of a VS1003 a driver can observe
//! from the host side of the wires:
//!
//! - the SCI register file, answering `READ`/`WRITE` frames while `xCS` is low
//! - the SDI input FIFO, filled by bytes clocked while `xDCS` is low and
//!   drained a little every time the host samples a low `DREQ`
//! - `DREQ`, high while the FIFO has room for at least [`DREQ_THRESHOLD`] bytes
//! - `xRESET`, which empties the FIFO and reloads register defaults
//!
//! Hand [`SimulatedVs1003::bus`] and [`SimulatedVs1003::pins`] to the driver
//! and query the simulation afterwards. Protocol slips are counted rather
//! than rejected so a test can assert on them.

// Test double: plain arithmetic and indexing over small, known-bounded state.
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::indexing_slicing)]
// A stuck DREQ wait fails the test instead of hanging it.
#![allow(clippy::panic)]

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use crate::gpio::{PinDirection, PinId, PinIo, PinState};
use crate::peripheral::{SerialBus, SpiConfig};

/// Bytes the chip guarantees to accept once `DREQ` is high.
pub const DREQ_THRESHOLD: usize = 32;

/// Default SDI FIFO size.
pub const FIFO_CAPACITY: usize = 2048;

const SCI_WRITE: u8 = 0x02;
const SCI_READ: u8 = 0x03;
const SCI_MODE: usize = 0x0;
const SCI_STATUS: usize = 0x1;
const SM_RESET: u16 = 1 << 2;
const SM_SDINEW: u16 = 1 << 11;

/// Which board pins the simulated chip is wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipWiring {
    /// Control chip-select
    pub xcs: PinId,
    /// Data chip-select
    pub xdcs: PinId,
    /// Data request output of the chip
    pub dreq: PinId,
    /// Reset input of the chip
    pub xreset: PinId,
}

impl Default for ChipWiring {
    fn default() -> Self {
        Self {
            xcs: PinId(10),
            xdcs: PinId(9),
            dreq: PinId(8),
            xreset: PinId(7),
        }
    }
}

/// One completed SCI transaction as seen by the chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SciOp {
    /// Register read and the value returned
    Read {
        /// Register index
        reg: u8,
        /// Value shifted out
        value: u16,
    },
    /// Register write
    Write {
        /// Register index
        reg: u8,
        /// Value shifted in
        value: u16,
    },
}

/// Error returned by a mock handle when a fault was injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockFault;

struct Chip {
    wiring: ChipWiring,
    levels: Vec<(PinId, PinState)>,
    directions: Vec<(PinId, PinDirection)>,
    line_log: Vec<(PinId, PinState)>,
    timing: SpiConfig,
    registers: [u16; 16],
    frame: Vec<u8>,
    sci_log: Vec<SciOp>,
    sdi: Vec<u8>,
    transfer_timings: Vec<SpiConfig>,
    fifo_capacity: usize,
    fifo_fill: usize,
    drain_per_poll: usize,
    forced_busy: usize,
    dreq_polls: usize,
    busy_streak: usize,
    poll_budget: usize,
    select_violations: usize,
    overruns: usize,
    stray_bytes: usize,
    reset_pulses: usize,
    bus_fault_in: Option<usize>,
    pin_fault_in: Option<usize>,
}

impl Chip {
    fn new(wiring: ChipWiring) -> Self {
        Self {
            wiring,
            levels: Vec::new(),
            directions: Vec::new(),
            line_log: Vec::new(),
            // Whatever the other devices on the bus left behind.
            timing: SpiConfig::new(8_000_000).with_mode(crate::SpiMode::Mode3),
            registers: Self::power_on_registers(),
            frame: Vec::new(),
            sci_log: Vec::new(),
            sdi: Vec::new(),
            transfer_timings: Vec::new(),
            fifo_capacity: FIFO_CAPACITY,
            fifo_fill: 0,
            drain_per_poll: DREQ_THRESHOLD,
            forced_busy: 0,
            dreq_polls: 0,
            busy_streak: 0,
            poll_budget: 100_000,
            select_violations: 0,
            overruns: 0,
            stray_bytes: 0,
            reset_pulses: 0,
            bus_fault_in: None,
            pin_fault_in: None,
        }
    }

    fn power_on_registers() -> [u16; 16] {
        let mut regs = [0u16; 16];
        regs[SCI_MODE] = SM_SDINEW;
        // VS1003 version code in bits 4..=7
        regs[SCI_STATUS] = 3 << 4;
        regs
    }

    fn level(&self, pin: PinId) -> PinState {
        self.levels
            .iter()
            .rev()
            .find(|(id, _)| *id == pin)
            .map_or(PinState::High, |(_, state)| *state)
    }

    fn in_reset(&self) -> bool {
        self.level(self.wiring.xreset).is_low()
    }

    fn take_fault(slot: &mut Option<usize>) -> bool {
        match slot {
            Some(0) => {
                *slot = None;
                true
            }
            Some(n) => {
                *n -= 1;
                false
            }
            None => false,
        }
    }

    fn drive(&mut self, pin: PinId, state: PinState) -> Result<(), MockFault> {
        if Self::take_fault(&mut self.pin_fault_in) {
            return Err(MockFault);
        }
        let was = self.level(pin);
        self.levels.retain(|(id, _)| *id != pin);
        self.levels.push((pin, state));
        self.line_log.push((pin, state));

        if self.level(self.wiring.xcs).is_low() && self.level(self.wiring.xdcs).is_low() {
            self.select_violations += 1;
        }
        if pin == self.wiring.xcs && state.is_high() {
            self.frame.clear();
        }
        if pin == self.wiring.xreset {
            if was.is_high() && state.is_low() {
                self.reset_pulses += 1;
            }
            if state.is_low() {
                self.registers = Self::power_on_registers();
                self.fifo_fill = 0;
                self.frame.clear();
            }
        }
        Ok(())
    }

    fn sample(&mut self, pin: PinId) -> Result<PinState, MockFault> {
        if Self::take_fault(&mut self.pin_fault_in) {
            return Err(MockFault);
        }
        if pin != self.wiring.dreq {
            return Ok(self.level(pin));
        }
        self.dreq_polls += 1;
        let ready = !self.in_reset()
            && self.forced_busy == 0
            && self.fifo_capacity - self.fifo_fill >= DREQ_THRESHOLD;
        if ready {
            self.busy_streak = 0;
            return Ok(PinState::High);
        }

        self.busy_streak += 1;
        if self.busy_streak > self.poll_budget {
            panic!("DREQ polled low {} times in a row", self.busy_streak);
        }
        self.forced_busy = self.forced_busy.saturating_sub(1);
        if !self.in_reset() {
            self.fifo_fill = self.fifo_fill.saturating_sub(self.drain_per_poll);
        }
        Ok(PinState::Low)
    }

    fn transfer(&mut self, out: u8) -> Result<u8, MockFault> {
        if Self::take_fault(&mut self.bus_fault_in) {
            return Err(MockFault);
        }
        self.transfer_timings.push(self.timing);
        let control = self.level(self.wiring.xcs).is_low();
        let data = self.level(self.wiring.xdcs).is_low();
        match (control, data) {
            (true, false) => Ok(self.sci_byte(out)),
            (false, true) => {
                self.sdi_byte(out);
                Ok(0)
            }
            _ => {
                self.stray_bytes += 1;
                Ok(0xFF)
            }
        }
    }

    fn sci_byte(&mut self, out: u8) -> u8 {
        if self.frame.len() == 4 {
            self.frame.clear();
        }
        self.frame.push(out);
        let reg = self.frame.get(1).copied().unwrap_or(0);
        let value = self.registers[usize::from(reg & 0x0F)];
        match (self.frame[0], self.frame.len()) {
            (SCI_READ, 3) => value.to_be_bytes()[0],
            (SCI_READ, 4) => {
                self.sci_log.push(SciOp::Read { reg, value });
                value.to_be_bytes()[1]
            }
            (SCI_WRITE, 4) => {
                let value = u16::from_be_bytes([self.frame[2], self.frame[3]]);
                self.sci_log.push(SciOp::Write { reg, value });
                self.write_register(reg, value);
                0
            }
            _ => 0,
        }
    }

    fn write_register(&mut self, reg: u8, value: u16) {
        let index = usize::from(reg & 0x0F);
        if index == SCI_MODE && value & SM_RESET != 0 {
            self.fifo_fill = 0;
            self.registers[index] = value & !SM_RESET;
        } else {
            self.registers[index] = value;
        }
    }

    fn sdi_byte(&mut self, out: u8) {
        self.sdi.push(out);
        if self.fifo_fill >= self.fifo_capacity {
            self.overruns += 1;
        } else {
            self.fifo_fill += 1;
        }
    }
}

/// Simulated VS1003 shared between a [`MockBus`] and a [`MockPins`].
#[derive(Clone)]
pub struct SimulatedVs1003 {
    chip: Rc<RefCell<Chip>>,
}

impl SimulatedVs1003 {
    /// Create a chip wired as described by `wiring`.
    pub fn new(wiring: ChipWiring) -> Self {
        Self {
            chip: Rc::new(RefCell::new(Chip::new(wiring))),
        }
    }

    /// Bus handle for the driver.
    pub fn bus(&self) -> MockBus {
        MockBus {
            chip: Rc::clone(&self.chip),
        }
    }

    /// Pin handle for the driver.
    pub fn pins(&self) -> MockPins {
        MockPins {
            chip: Rc::clone(&self.chip),
        }
    }

    /// Wiring this chip was created with.
    pub fn wiring(&self) -> ChipWiring {
        self.chip.borrow().wiring
    }

    /// Timing profile currently applied to the bus.
    pub fn bus_timing(&self) -> SpiConfig {
        self.chip.borrow().timing
    }

    /// Overwrite the bus timing, as another device on the bus would.
    pub fn set_bus_timing(&self, timing: SpiConfig) {
        self.chip.borrow_mut().timing = timing;
    }

    /// Timing profile in force for every byte shifted so far.
    pub fn transfer_timings(&self) -> Vec<SpiConfig> {
        self.chip.borrow().transfer_timings.clone()
    }

    /// Current content of register `reg`.
    pub fn register(&self, reg: u8) -> u16 {
        self.chip.borrow().registers[usize::from(reg & 0x0F)]
    }

    /// Preload register `reg`.
    pub fn set_register(&self, reg: u8, value: u16) {
        self.chip.borrow_mut().registers[usize::from(reg & 0x0F)] = value;
    }

    /// Completed SCI transactions, oldest first.
    pub fn sci_log(&self) -> Vec<SciOp> {
        self.chip.borrow().sci_log.clone()
    }

    /// Register writes only, as `(reg, value)`.
    pub fn register_writes(&self) -> Vec<(u8, u16)> {
        self.chip
            .borrow()
            .sci_log
            .iter()
            .filter_map(|op| match *op {
                SciOp::Write { reg, value } => Some((reg, value)),
                SciOp::Read { .. } => None,
            })
            .collect()
    }

    /// Every byte received on SDI.
    pub fn sdi_bytes(&self) -> Vec<u8> {
        self.chip.borrow().sdi.clone()
    }

    /// Every host pin write, oldest first.
    pub fn line_events(&self) -> Vec<(PinId, PinState)> {
        self.chip.borrow().line_log.clone()
    }

    /// Forget recorded traffic; chip state is kept.
    pub fn clear_logs(&self) {
        let mut chip = self.chip.borrow_mut();
        chip.sci_log.clear();
        chip.sdi.clear();
        chip.line_log.clear();
        chip.transfer_timings.clear();
        chip.dreq_polls = 0;
    }

    /// Level last driven on `pin` (high if never driven).
    pub fn level(&self, pin: PinId) -> PinState {
        self.chip.borrow().level(pin)
    }

    /// Direction last configured for `pin`.
    pub fn direction(&self, pin: PinId) -> Option<PinDirection> {
        self.chip
            .borrow()
            .directions
            .iter()
            .rev()
            .find(|(id, _)| *id == pin)
            .map(|(_, dir)| *dir)
    }

    /// Times both select lines were low together.
    pub fn select_violations(&self) -> usize {
        self.chip.borrow().select_violations
    }

    /// SDI bytes that arrived with the FIFO already full.
    pub fn overruns(&self) -> usize {
        self.chip.borrow().overruns
    }

    /// Bytes shifted with neither select asserted.
    pub fn stray_bytes(&self) -> usize {
        self.chip.borrow().stray_bytes
    }

    /// `DREQ` samples taken since the last [`clear_logs`](Self::clear_logs).
    pub fn dreq_polls(&self) -> usize {
        self.chip.borrow().dreq_polls
    }

    /// Falling edges seen on `xRESET`.
    pub fn reset_pulses(&self) -> usize {
        self.chip.borrow().reset_pulses
    }

    /// Bytes waiting in the SDI FIFO.
    pub fn fifo_fill(&self) -> usize {
        self.chip.borrow().fifo_fill
    }

    /// Resize the FIFO and set how many bytes are decoded per low `DREQ` sample.
    pub fn set_fifo(&self, capacity: usize, drain_per_poll: usize) {
        let mut chip = self.chip.borrow_mut();
        chip.fifo_capacity = capacity.max(DREQ_THRESHOLD);
        chip.drain_per_poll = drain_per_poll.max(1);
        chip.fifo_fill = chip.fifo_fill.min(chip.fifo_capacity);
    }

    /// Hold `DREQ` low for the next `polls` samples.
    pub fn hold_busy(&self, polls: usize) {
        self.chip.borrow_mut().forced_busy = polls;
    }

    /// Consecutive low `DREQ` samples tolerated before the mock panics.
    pub fn set_poll_budget(&self, polls: usize) {
        self.chip.borrow_mut().poll_budget = polls;
    }

    /// Fail the bus transfer after the next `ok` successful ones.
    pub fn fail_bus_after(&self, ok: usize) {
        self.chip.borrow_mut().bus_fault_in = Some(ok);
    }

    /// Fail the pin access after the next `ok` successful ones.
    pub fn fail_pins_after(&self, ok: usize) {
        self.chip.borrow_mut().pin_fault_in = Some(ok);
    }
}

impl Default for SimulatedVs1003 {
    fn default() -> Self {
        Self::new(ChipWiring::default())
    }
}

/// Bus side of a [`SimulatedVs1003`].
pub struct MockBus {
    chip: Rc<RefCell<Chip>>,
}

impl SerialBus for MockBus {
    type Error = MockFault;

    fn transfer_byte(&mut self, out: u8) -> Result<u8, Self::Error> {
        self.chip.borrow_mut().transfer(out)
    }

    fn timing(&self) -> SpiConfig {
        self.chip.borrow().timing
    }

    fn set_timing(&mut self, config: SpiConfig) -> Result<(), Self::Error> {
        self.chip.borrow_mut().timing = config;
        Ok(())
    }
}

/// Pin side of a [`SimulatedVs1003`].
pub struct MockPins {
    chip: Rc<RefCell<Chip>>,
}

impl PinIo for MockPins {
    type Error = MockFault;

    fn configure(&mut self, pin: PinId, direction: PinDirection) -> Result<(), Self::Error> {
        let mut chip = self.chip.borrow_mut();
        chip.directions.retain(|(id, _)| *id != pin);
        chip.directions.push((pin, direction));
        Ok(())
    }

    fn set_pin(&mut self, pin: PinId, state: PinState) -> Result<(), Self::Error> {
        self.chip.borrow_mut().drive(pin, state)
    }

    fn read_pin(&mut self, pin: PinId) -> Result<PinState, Self::Error> {
        self.chip.borrow_mut().sample(pin)
    }
}
