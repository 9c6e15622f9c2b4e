//! Tracing macros
//!
//! Each macro builds its record inside a single critical section.

/// Trace an ownership or clock event on one peripheral instance
///
/// Payload: instance index, then an optional status byte.
#[macro_export]
macro_rules! trace_periph {
    ($rec:expr, $id:expr, $index:expr) => {
        $crate::with_buffer(|buf| {
            if buf.begin($rec, $id) {
                buf.u8($index);
                buf.end();
            }
        })
    };
    ($rec:expr, $id:expr, $index:expr, $status:expr) => {
        $crate::with_buffer(|buf| {
            if buf.begin($rec, $id) {
                buf.u8($index);
                buf.u8($status);
                buf.end();
            }
        })
    };
}

/// Trace an interrupt table event
#[macro_export]
macro_rules! trace_irq {
    ($rec:expr, $irq:expr) => {
        $crate::with_buffer(|buf| {
            if buf.begin($rec, $crate::trace_ids::IRQ_TABLE) {
                buf.u16($irq);
                buf.end();
            }
        })
    };
}

/// Generate object dictionary record
#[macro_export]
macro_rules! trace_obj_dict {
    ($obj:expr, $name:expr) => {
        $crate::with_buffer(|buf| {
            if buf.begin($crate::TraceRecord::OBJ_DICT, 0) {
                buf.obj_ptr($obj);
                buf.str($name);
                buf.end();
            }
        })
    };
}
