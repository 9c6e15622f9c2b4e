//! Reset and clock control
//!
//! Each instance is gated by one bit in APBxENR and reset by the same bit in
//! APBxRSTR. [`Rcc`] only touches the bit of the instance it is asked about.

use core::ptr;
use prm_core::ClockControl;

use crate::clocks::Bus;

/// RCC register block base address
pub const RCC_BASE: usize = 0x4002_1000;

const APB2RSTR: usize = 0x0C;
const APB1RSTR: usize = 0x10;
const APB2ENR: usize = 0x18;
const APB1ENR: usize = 0x1C;

/// Enable/reset bit of one instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RccGate {
    pub bus: Bus,
    pub bit: u8,
}

impl RccGate {
    pub const fn new(bus: Bus, bit: u8) -> Self {
        Self { bus, bit }
    }

    pub const fn mask(self) -> u32 {
        1 << self.bit
    }

    const fn enable_offset(self) -> usize {
        match self.bus {
            Bus::Apb1 => APB1ENR,
            Bus::Apb2 => APB2ENR,
        }
    }

    const fn reset_offset(self) -> usize {
        match self.bus {
            Bus::Apb1 => APB1RSTR,
            Bus::Apb2 => APB2RSTR,
        }
    }
}

/// Peripheral identity with an RCC gate
pub trait RccGated: Copy {
    fn rcc_gate(self) -> RccGate;
}

/// Handle on the RCC enable and reset registers
#[derive(Debug)]
pub struct Rcc {
    base: usize,
}

impl Rcc {
    /// Take the device RCC
    ///
    /// # Safety
    ///
    /// Every writer of APBxENR and APBxRSTR, this value included, must do its
    /// read-modify-write inside a critical section. The managers always do.
    pub unsafe fn new() -> Self {
        Self { base: RCC_BASE }
    }

    /// RCC register block at `base`
    ///
    /// # Safety
    ///
    /// `base` must point to a writable, word-aligned block of at least
    /// `0x20` bytes, shared under the same rule as [`Rcc::new`].
    pub unsafe fn with_base(base: usize) -> Self {
        Self { base }
    }

    fn modify(&mut self, offset: usize, f: impl FnOnce(u32) -> u32) {
        let reg = (self.base + offset) as *mut u32;
        // SAFETY: offset is one of the APBx registers of the block handed to
        // the constructor
        unsafe { ptr::write_volatile(reg, f(ptr::read_volatile(reg))) }
    }

    fn read(&self, offset: usize) -> u32 {
        // SAFETY: see `modify`
        unsafe { ptr::read_volatile((self.base + offset) as *const u32) }
    }

    /// Enable the bus clock of `gate`
    pub fn enable(&mut self, gate: RccGate) {
        self.modify(gate.enable_offset(), |r| r | gate.mask());
        // Read back so the clock is running before the next access
        let _ = self.read(gate.enable_offset());
    }

    /// Gate the bus clock of `gate`
    pub fn disable(&mut self, gate: RccGate) {
        self.modify(gate.enable_offset(), |r| r & !gate.mask());
    }

    /// Check if the bus clock of `gate` is running
    pub fn is_enabled(&self, gate: RccGate) -> bool {
        self.read(gate.enable_offset()) & gate.mask() != 0
    }

    /// Hold `gate` in reset
    pub fn assert_reset(&mut self, gate: RccGate) {
        self.modify(gate.reset_offset(), |r| r | gate.mask());
    }

    /// Release `gate` from reset
    pub fn release_reset(&mut self, gate: RccGate) {
        self.modify(gate.reset_offset(), |r| r & !gate.mask());
    }
}

impl<Id: RccGated> ClockControl<Id> for Rcc {
    fn enable_clock(&mut self, id: Id) {
        self.enable(id.rcc_gate());
    }

    fn pulse_reset(&mut self, id: Id) {
        let gate = id.rcc_gate();
        self.assert_reset(gate);
        self.release_reset(gate);
    }

    fn disable_clock(&mut self, id: Id) {
        self.disable(id.rcc_gate());
    }
}
