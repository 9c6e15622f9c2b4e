#![no_std]
#![forbid(unsafe_code)]

//! # PRM Manager
//!
//! One [`PeripheralManager`] per peripheral family arbitrates which driver
//! owns which hardware instance, answers first-fit capability queries, and
//! owns the family's clock enable/reset/disable lifecycle. [`IrqTable`]
//! routes interrupt lines to the driver that attached to them.
//!
//! Every operation runs inside a `critical_section`, so main-context code and
//! interrupt handlers can share a manager without losing updates.

/// Emit a trace record when the `trace` feature is enabled
macro_rules! trace_event {
    ($rec:ident, $source:expr, $index:expr) => {{
        #[cfg(feature = "trace")]
        prm_trace::trace_periph!(prm_trace::TraceRecord::$rec, $source, $index);
        #[cfg(not(feature = "trace"))]
        let _ = ($source, $index);
    }};
}

pub mod descriptor;
pub mod irq;
pub mod manager;

pub use descriptor::*;
pub use irq::*;
pub use manager::*;
pub use prm_core::*;
