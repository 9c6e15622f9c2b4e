//! Peripheral family vocabulary
//!
//! A family is a set of interchangeable hardware blocks (all timers, all
//! UARTs) that only one driver at a time may own. The manager is generic over
//! the family; everything peripheral-specific lives behind this trait.

use core::fmt;

/// Stable identity of one physical peripheral instance
///
/// The index doubles as the position of the instance's descriptor in the
/// family's table. Identity types usually enumerate every instance of the
/// family across a chip line, so an identity may name an instance that the
/// selected part does not have; the manager rejects those as invalid devices.
pub trait PeripheralId: Copy + Eq + fmt::Debug {
    /// Table index of this instance
    fn index(self) -> usize;

    /// Identity at a table index
    fn from_index(index: usize) -> Option<Self>;
}

/// Capability vocabulary of a peripheral family
pub trait PeripheralFamily {
    /// Family name used in diagnostics
    const NAME: &'static str;

    /// Source id used by the trace local filter
    const TRACE_ID: u8;

    /// Instance identity
    type Id: PeripheralId;

    /// Purpose a driver declares when claiming an instance
    type UseKind: Copy + Eq + fmt::Debug;

    /// Ordered capability class; a higher class satisfies a lower request
    type Class: Copy + Ord + fmt::Debug;

    /// Boolean feature supports of an instance
    type Flags: bitflags::Flags + Copy + fmt::Debug;

    /// Opaque reference to the register block
    type Handle: Copy;

    /// Interrupt line identity
    type Irq: Copy;
}
