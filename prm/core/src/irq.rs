//! Interrupt handler abstractions

/// Interrupt line number
pub trait IrqNumber: Copy {
    /// Position of the line in the device vector table
    fn number(self) -> u16;
}

impl IrqNumber for u16 {
    fn number(self) -> u16 {
        self
    }
}

/// Object that services an interrupt line on behalf of its owner
pub trait IrqHandler: Sync {
    /// Service the interrupt
    fn handle(&self);
}

/// Callback attached to an interrupt line
#[derive(Clone, Copy)]
pub enum IrqCallback {
    /// Free function
    Function(fn()),
    /// Driver object
    Handler(&'static dyn IrqHandler),
}

impl IrqCallback {
    /// Invoke the callback
    pub fn call(&self) {
        match self {
            IrqCallback::Function(f) => f(),
            IrqCallback::Handler(h) => h.handle(),
        }
    }
}

impl From<fn()> for IrqCallback {
    fn from(f: fn()) -> Self {
        IrqCallback::Function(f)
    }
}

impl From<&'static dyn IrqHandler> for IrqCallback {
    fn from(h: &'static dyn IrqHandler) -> Self {
        IrqCallback::Handler(h)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for IrqCallback {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            IrqCallback::Function(_) => defmt::write!(fmt, "Function"),
            IrqCallback::Handler(_) => defmt::write!(fmt, "Handler"),
        }
    }
}
