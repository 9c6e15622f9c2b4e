//! Ownership state of a single peripheral instance

use core::fmt;

/// Whether a peripheral is free or claimed, and for what purpose
///
/// `Unused` is the only state from which a registration can succeed. The
/// purpose carried by `InUse` is whatever the family's use-kind vocabulary
/// declares (periodic interrupt source, encoder counter, serial port, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipState<U> {
    /// Peripheral is free
    Unused,
    /// Peripheral is owned by a driver for the given purpose
    InUse(U),
}

impl<U: Copy> OwnershipState<U> {
    /// Check if the peripheral is free
    pub const fn is_unused(&self) -> bool {
        matches!(self, OwnershipState::Unused)
    }

    /// Check if the peripheral is claimed
    pub const fn is_in_use(&self) -> bool {
        matches!(self, OwnershipState::InUse(_))
    }

    /// Purpose the current owner declared, if any
    pub fn use_kind(&self) -> Option<U> {
        match self {
            OwnershipState::Unused => None,
            OwnershipState::InUse(kind) => Some(*kind),
        }
    }
}

impl<U> Default for OwnershipState<U> {
    fn default() -> Self {
        OwnershipState::Unused
    }
}

impl<U> From<U> for OwnershipState<U> {
    fn from(kind: U) -> Self {
        OwnershipState::InUse(kind)
    }
}

impl<U: fmt::Debug> fmt::Display for OwnershipState<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnershipState::Unused => write!(f, "Unused"),
            OwnershipState::InUse(kind) => write!(f, "InUse({:?})", kind),
        }
    }
}

#[cfg(feature = "defmt")]
impl<U: defmt::Format> defmt::Format for OwnershipState<U> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            OwnershipState::Unused => defmt::write!(fmt, "Unused"),
            OwnershipState::InUse(kind) => defmt::write!(fmt, "InUse({})", kind),
        }
    }
}
