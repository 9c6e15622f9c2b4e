#![no_std]

//! # PRM Trace
//!
//! Binary software tracing for the peripheral managers.
//!
//! Records are built field by field between [`begin`] and [`end`], framed
//! with HDLC byte-stuffing and a checksum, and queued in a ring buffer that
//! the application drains with [`read`] (typically to a spare UART or RTT).
//!
//! Two filters decide whether a record is kept:
//! - Global filter: 128-bit mask indexed by [`TraceRecord`]. All OFF after
//!   [`init`].
//! - Local filter: 128-bit mask indexed by source id (one per peripheral
//!   family). All ON after [`init`]; id 0 always passes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prm_trace::{init, global_filter_mask, begin, end, u8, TraceRecord, filters};
//!
//! init();
//! global_filter_mask(filters::PERIPH_RECORDS);
//!
//! if begin(TraceRecord::PERIPH_REGISTER, 1) {
//!     u8(0); // instance index
//!     end();
//! }
//! ```

mod buffer;
mod macros;
mod types;

pub use buffer::{hdlc, TraceBuffer, MAX_RECORD};
pub use types::{TraceConfig, TraceRecord};

pub mod filters {
    pub use crate::types::filters::*;
}

pub mod trace_ids {
    pub use crate::types::trace_ids::*;
}

use core::cell::RefCell;
use critical_section::Mutex;

/// Ring buffer capacity in bytes
pub const BUFFER_SIZE: usize = 1024;

static TRACE_BUF: Mutex<RefCell<TraceBuffer<BUFFER_SIZE>>> =
    Mutex::new(RefCell::new(TraceBuffer::new()));

/// Run `f` with exclusive access to the global buffer
///
/// Building a whole record inside one call keeps it from interleaving with
/// records emitted by interrupt handlers.
pub fn with_buffer<F, R>(f: F) -> R
where
    F: FnOnce(&mut TraceBuffer<BUFFER_SIZE>) -> R,
{
    critical_section::with(|cs| {
        let mut buf = TRACE_BUF.borrow_ref_mut(cs);
        f(&mut buf)
    })
}

/// Initialize the tracing system
pub fn init() {
    critical_section::with(|cs| {
        TRACE_BUF.borrow_ref_mut(cs).init();
    });
}

/// Set trace configuration
pub fn set_config(config: TraceConfig) {
    critical_section::with(|cs| {
        TRACE_BUF.borrow_ref_mut(cs).set_config(config);
    });
}

/// Get current configuration
pub fn config() -> TraceConfig {
    critical_section::with(|cs| *TRACE_BUF.borrow_ref(cs).config())
}

/// Set global filter for a record type
pub fn global_filter(record: TraceRecord, enable: bool) {
    critical_section::with(|cs| {
        TRACE_BUF.borrow_ref_mut(cs).set_global_filter(record, enable);
    });
}

/// Set global filter mask directly
pub fn global_filter_mask(mask: u128) {
    critical_section::with(|cs| {
        TRACE_BUF.borrow_ref_mut(cs).set_global_filter_mask(mask);
    });
}

/// Set local filter for a source id
pub fn local_filter(id: u8, enable: bool) {
    critical_section::with(|cs| {
        TRACE_BUF.borrow_ref_mut(cs).set_local_filter(id, enable);
    });
}

/// Set local filter mask directly
pub fn local_filter_mask(mask: u128) {
    critical_section::with(|cs| {
        TRACE_BUF.borrow_ref_mut(cs).set_local_filter_mask(mask);
    });
}

/// Begin a trace record
/// Returns true if the record passes filters and should be populated
pub fn begin(record: TraceRecord, id: u8) -> bool {
    critical_section::with(|cs| TRACE_BUF.borrow_ref_mut(cs).begin(record, id))
}

/// End the current trace record and commit to buffer
pub fn end() {
    critical_section::with(|cs| {
        TRACE_BUF.borrow_ref_mut(cs).end();
    });
}

/// Output u8
pub fn u8(value: u8) {
    critical_section::with(|cs| {
        TRACE_BUF.borrow_ref_mut(cs).u8(value);
    });
}

/// Output u16
pub fn u16(value: u16) {
    critical_section::with(|cs| {
        TRACE_BUF.borrow_ref_mut(cs).u16(value);
    });
}

/// Output u32
pub fn u32(value: u32) {
    critical_section::with(|cs| {
        TRACE_BUF.borrow_ref_mut(cs).u32(value);
    });
}

/// Output zero-terminated string
pub fn str(value: &str) {
    critical_section::with(|cs| {
        TRACE_BUF.borrow_ref_mut(cs).str(value);
    });
}

/// Output object pointer (uses configured obj_ptr_size)
pub fn obj_ptr(ptr: usize) {
    critical_section::with(|cs| {
        TRACE_BUF.borrow_ref_mut(cs).obj_ptr(ptr);
    });
}

/// Read trace data from buffer
/// Returns the number of bytes read
pub fn read(buf: &mut [u8]) -> usize {
    critical_section::with(|cs| TRACE_BUF.borrow_ref_mut(cs).read(buf))
}

/// Get number of bytes available to read
pub fn available() -> usize {
    critical_section::with(|cs| TRACE_BUF.borrow_ref(cs).available())
}

/// Frames lost to overflow since [`init`]
pub fn dropped() -> u32 {
    critical_section::with(|cs| TRACE_BUF.borrow_ref(cs).dropped())
}

/// Generate the TARGET_INFO record
///
/// Should be called once during initialization so the host knows the
/// timestamp and pointer sizes before any other record arrives.
pub fn target_info(target_name: &str) {
    let endianness = if cfg!(target_endian = "big") { 1 } else { 0 };
    critical_section::with(|cs| {
        TRACE_BUF
            .borrow_ref_mut(cs)
            .target_info_record(VERSION, target_name, endianness);
    });
}

/// Version string reported in TARGET_INFO
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
