//! Interrupt dispatch table
//!
//! Vector handlers forward to [`IrqTable::dispatch`], which calls whatever
//! driver attached to the line. One callback per line.

use core::cell::RefCell;
use critical_section::Mutex;
use prm_core::{IrqCallback, IrqNumber, PrmError, PrmResult};

/// Callback slots for the first `N` interrupt lines of a device
pub struct IrqTable<const N: usize> {
    slots: Mutex<RefCell<[Option<IrqCallback>; N]>>,
}

impl<const N: usize> IrqTable<N> {
    /// Create a table with every line detached
    pub const fn new() -> Self {
        Self {
            slots: Mutex::new(RefCell::new([None; N])),
        }
    }

    fn line(irq: impl IrqNumber) -> PrmResult<usize> {
        let line = irq.number() as usize;
        if line < N {
            Ok(line)
        } else {
            Err(PrmError::InvalidDevice)
        }
    }

    /// Attach `callback` to `irq`
    ///
    /// Returns [`PrmError::PeripheralBusy`] if the line already has a callback.
    pub fn attach(&self, irq: impl IrqNumber, callback: impl Into<IrqCallback>) -> PrmResult<()> {
        let line = Self::line(irq)?;
        let callback = callback.into();

        critical_section::with(|cs| {
            let mut slots = self.slots.borrow_ref_mut(cs);
            match slots[line] {
                Some(_) => Err(PrmError::PeripheralBusy),
                None => {
                    slots[line] = Some(callback);
                    Ok(())
                }
            }
        })?;

        #[cfg(feature = "trace")]
        prm_trace::trace_irq!(prm_trace::TraceRecord::IRQ_ATTACH, line as u16);
        Ok(())
    }

    /// Detach whatever is attached to `irq`
    pub fn detach(&self, irq: impl IrqNumber) -> PrmResult<()> {
        let line = Self::line(irq)?;
        critical_section::with(|cs| {
            self.slots.borrow_ref_mut(cs)[line] = None;
        });

        #[cfg(feature = "trace")]
        prm_trace::trace_irq!(prm_trace::TraceRecord::IRQ_DETACH, line as u16);
        Ok(())
    }

    /// Check if a callback is attached to `irq`
    pub fn is_attached(&self, irq: impl IrqNumber) -> bool {
        match Self::line(irq) {
            Ok(line) => critical_section::with(|cs| self.slots.borrow_ref(cs)[line].is_some()),
            Err(_) => false,
        }
    }

    /// Run the callback attached to `irq`
    ///
    /// The callback runs outside the critical section. Returns false if no
    /// callback is attached.
    pub fn dispatch(&self, irq: impl IrqNumber) -> bool {
        let number = irq.number();
        let callback = match Self::line(irq) {
            Ok(line) => critical_section::with(|cs| self.slots.borrow_ref(cs)[line]),
            Err(_) => None,
        };

        match callback {
            Some(callback) => {
                #[cfg(feature = "trace")]
                prm_trace::trace_irq!(prm_trace::TraceRecord::IRQ_DISPATCH, number);
                callback.call();
                true
            }
            None => {
                #[cfg(feature = "trace")]
                prm_trace::trace_irq!(prm_trace::TraceRecord::IRQ_UNHANDLED, number);
                let _ = number;
                false
            }
        }
    }
}

impl<const N: usize> Default for IrqTable<N> {
    fn default() -> Self {
        Self::new()
    }
}
