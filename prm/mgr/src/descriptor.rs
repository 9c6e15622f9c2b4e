//! Per-instance peripheral descriptors

use core::fmt;
use prm_core::{OwnershipState, PeripheralFamily};

/// Metadata record for one physical peripheral instance
///
/// Everything except the ownership state is fixed at construction from chip
/// data and the bus clock configuration. The ownership state can only be
/// changed by the manager that owns the table.
pub struct Descriptor<F: PeripheralFamily> {
    id: F::Id,
    state: OwnershipState<F::UseKind>,
    class: F::Class,
    flags: F::Flags,
    clock_hz: u32,
    handle: F::Handle,
    irq: F::Irq,
}

impl<F: PeripheralFamily> Descriptor<F> {
    /// Create an unused descriptor
    pub const fn new(
        id: F::Id,
        class: F::Class,
        flags: F::Flags,
        clock_hz: u32,
        handle: F::Handle,
        irq: F::Irq,
    ) -> Self {
        Self {
            id,
            state: OwnershipState::Unused,
            class,
            flags,
            clock_hz,
            handle,
            irq,
        }
    }

    /// Instance identity
    pub fn id(&self) -> F::Id {
        self.id
    }

    /// Current ownership state
    pub fn state(&self) -> OwnershipState<F::UseKind> {
        self.state
    }

    /// Capability class
    pub fn class(&self) -> F::Class {
        self.class
    }

    /// Capability flags
    pub fn flags(&self) -> F::Flags {
        self.flags
    }

    /// Kernel clock frequency in Hz
    pub fn clock_hz(&self) -> u32 {
        self.clock_hz
    }

    /// Register block handle
    pub fn handle(&self) -> F::Handle {
        self.handle
    }

    /// Interrupt identity
    pub fn irq(&self) -> F::Irq {
        self.irq
    }

    /// Check if the instance is free
    pub fn is_unused(&self) -> bool {
        self.state.is_unused()
    }

    /// Check if the instance can serve a request for `required`
    pub fn satisfies(&self, required: F::Class) -> bool {
        self.class >= required
    }

    /// Check if the instance supports every flag in `flags`
    ///
    /// The empty set is supported by every instance.
    pub fn supports(&self, flags: F::Flags) -> bool {
        bitflags::Flags::contains(&self.flags, flags)
    }

    pub(crate) fn set_state(&mut self, state: OwnershipState<F::UseKind>) {
        self.state = state;
    }
}

impl<F: PeripheralFamily> Clone for Descriptor<F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: PeripheralFamily> Copy for Descriptor<F> {}

impl<F: PeripheralFamily> fmt::Debug for Descriptor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("family", &F::NAME)
            .field("id", &self.id)
            .field("state", &self.state)
            .field("class", &self.class)
            .field("flags", &self.flags)
            .field("clock_hz", &self.clock_hz)
            .finish()
    }
}
