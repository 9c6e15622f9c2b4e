//! Platform clock primitives consumed by the manager

/// Per-instance clock gating and reset control
///
/// Implemented by the platform layer (the RCC on STM32). The manager is the
/// only caller, always from inside its critical section.
pub trait ClockControl<Id> {
    /// Enable the bus clock feeding the instance
    fn enable_clock(&mut self, id: Id);

    /// Assert then release the instance's reset line
    fn pulse_reset(&mut self, id: Id);

    /// Gate the bus clock feeding the instance
    fn disable_clock(&mut self, id: Id);
}

impl<Id, C: ClockControl<Id> + ?Sized> ClockControl<Id> for &mut C {
    fn enable_clock(&mut self, id: Id) {
        (**self).enable_clock(id)
    }

    fn pulse_reset(&mut self, id: Id) {
        (**self).pulse_reset(id)
    }

    fn disable_clock(&mut self, id: Id) {
        (**self).disable_clock(id)
    }
}
