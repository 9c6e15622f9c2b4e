#![no_std]
#![forbid(unsafe_code)]

//! # PRM Core
//!
//! Core types and traits for arbitrating exclusive access to on-chip
//! peripherals. A peripheral *family* (timers, UARTs, ...) describes its
//! capability vocabulary through [`PeripheralFamily`]; the manager crate builds
//! the ownership state machine and first-fit search on top of it.

use core::fmt;

pub mod clock;
pub mod family;
pub mod irq;
pub mod ownership;

pub use clock::*;
pub use family::*;
pub use irq::*;
pub use ownership::*;

/// PRM version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type used throughout PRM
pub type PrmResult<T> = Result<T, PrmError>;

/// Error types for peripheral management operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrmError {
    /// Requested peripheral is already in use
    PeripheralBusy,
    /// Malformed request, e.g. registering with the unused state
    InvalidRequest,
    /// Identity does not name a peripheral present in the table
    InvalidDevice,
}

impl fmt::Display for PrmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrmError::PeripheralBusy => write!(f, "Peripheral is busy"),
            PrmError::InvalidRequest => write!(f, "Invalid request"),
            PrmError::InvalidDevice => write!(f, "Invalid device"),
        }
    }
}

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "std")]
impl std::error::Error for PrmError {}

#[cfg(feature = "defmt")]
impl defmt::Format for PrmError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PrmError::PeripheralBusy => defmt::write!(fmt, "PeripheralBusy"),
            PrmError::InvalidRequest => defmt::write!(fmt, "InvalidRequest"),
            PrmError::InvalidDevice => defmt::write!(fmt, "InvalidDevice"),
        }
    }
}
