//! Peripheral manager for one peripheral family

use core::cell::RefCell;
use critical_section::Mutex;
use prm_core::{ClockControl, OwnershipState, PeripheralFamily, PeripheralId, PrmError, PrmResult};

use crate::descriptor::Descriptor;

/// Table contents guarded by the manager's critical section
struct Inner<F: PeripheralFamily, P, const N: usize> {
    table: [Descriptor<F>; N],
    clocks: P,
}

/// Sole arbiter of exclusive access to a peripheral family
///
/// `N` is the number of instances on the selected part; the table never
/// grows or shrinks. `P` is the platform's clock control for the family.
///
/// The manager is created once during start-up and handed to drivers by
/// reference. It only arbitrates ownership and drives clock gating; drivers
/// configure the peripheral themselves through the handle.
pub struct PeripheralManager<F: PeripheralFamily, P, const N: usize> {
    inner: Mutex<RefCell<Inner<F, P, N>>>,
}

impl<F, P, const N: usize> PeripheralManager<F, P, N>
where
    F: PeripheralFamily,
    P: ClockControl<F::Id>,
{
    /// Create a manager owning `table`
    ///
    /// Returns [`PrmError::InvalidDevice`] if a descriptor does not sit at the
    /// index of its own identity.
    pub fn new(table: [Descriptor<F>; N], clocks: P) -> PrmResult<Self> {
        for (index, descriptor) in table.iter().enumerate() {
            if descriptor.id().index() != index {
                return Err(PrmError::InvalidDevice);
            }
        }

        Ok(Self {
            inner: Mutex::new(RefCell::new(Inner { table, clocks })),
        })
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut Inner<F, P, N>) -> R) -> R {
        critical_section::with(|cs| {
            let mut inner = self.inner.borrow_ref_mut(cs);
            f(&mut inner)
        })
    }

    fn slot(id: F::Id) -> PrmResult<usize> {
        let index = id.index();
        if index < N {
            Ok(index)
        } else {
            Err(PrmError::InvalidDevice)
        }
    }

    fn lookup<R>(&self, id: F::Id, f: impl FnOnce(&Descriptor<F>) -> R) -> PrmResult<R> {
        let index = Self::slot(id)?;
        Ok(self.with_inner(|inner| f(&inner.table[index])))
    }

    /// Current ownership state of `id`
    pub fn state(&self, id: F::Id) -> PrmResult<OwnershipState<F::UseKind>> {
        self.lookup(id, Descriptor::state)
    }

    /// Register block handle of `id`
    pub fn handle(&self, id: F::Id) -> PrmResult<F::Handle> {
        self.lookup(id, Descriptor::handle)
    }

    /// Interrupt identity of `id`
    pub fn irq(&self, id: F::Id) -> PrmResult<F::Irq> {
        self.lookup(id, Descriptor::irq)
    }

    /// Kernel clock frequency of `id` in Hz
    pub fn clock_hz(&self, id: F::Id) -> PrmResult<u32> {
        self.lookup(id, Descriptor::clock_hz)
    }

    /// Capability class of `id`
    pub fn class(&self, id: F::Id) -> PrmResult<F::Class> {
        self.lookup(id, Descriptor::class)
    }

    /// Capability flags of `id`
    pub fn flags(&self, id: F::Id) -> PrmResult<F::Flags> {
        self.lookup(id, Descriptor::flags)
    }

    /// Register `id` as used by a driver
    ///
    /// `state` is the state the caller wants the instance to enter.
    /// Returns [`PrmError::PeripheralBusy`] if the instance is already in use,
    /// whatever the purpose, and [`PrmError::InvalidRequest`] if `state` is
    /// [`OwnershipState::Unused`].
    pub fn register(&self, id: F::Id, state: OwnershipState<F::UseKind>) -> PrmResult<()> {
        let index = match Self::slot(id) {
            Ok(index) => index,
            Err(err) => {
                trace_event!(PERIPH_INVALID, F::TRACE_ID, u8::MAX);
                return Err(err);
            }
        };

        let result = self.with_inner(|inner| {
            let descriptor = &mut inner.table[index];
            if descriptor.state().is_in_use() {
                return Err(PrmError::PeripheralBusy);
            }
            match state {
                OwnershipState::Unused => Err(PrmError::InvalidRequest),
                OwnershipState::InUse(_) => {
                    descriptor.set_state(state);
                    Ok(())
                }
            }
        });

        match result {
            Ok(()) => trace_event!(PERIPH_REGISTER, F::TRACE_ID, index as u8),
            Err(PrmError::PeripheralBusy) => trace_event!(PERIPH_BUSY, F::TRACE_ID, index as u8),
            Err(_) => trace_event!(PERIPH_INVALID, F::TRACE_ID, index as u8),
        }
        result
    }

    /// Register `id` for the given purpose
    pub fn claim(&self, id: F::Id, kind: F::UseKind) -> PrmResult<()> {
        self.register(id, OwnershipState::InUse(kind))
    }

    /// Mark `id` as no longer used
    ///
    /// Releasing a free instance is a no-op. The clock is left untouched.
    pub fn deregister(&self, id: F::Id) -> PrmResult<()> {
        let index = Self::slot(id)?;
        self.with_inner(|inner| inner.table[index].set_state(OwnershipState::Unused));
        trace_event!(PERIPH_DEREGISTER, F::TRACE_ID, index as u8);
        Ok(())
    }

    fn first_fit(table: &[Descriptor<F>], pred: impl Fn(&Descriptor<F>) -> bool) -> Option<usize> {
        table.iter().position(|d| d.is_unused() && pred(d))
    }

    fn traced_find(found: Option<usize>) -> Option<F::Id> {
        match found {
            Some(index) => {
                trace_event!(PERIPH_FIND, F::TRACE_ID, index as u8);
                F::Id::from_index(index)
            }
            None => {
                trace_event!(PERIPH_FIND_MISS, F::TRACE_ID, u8::MAX);
                None
            }
        }
    }

    /// First free instance, in ascending id order, whose class is at least
    /// `required`
    ///
    /// First-fit, not best-fit: a low-class request may take a high-class
    /// instance that comes earlier in the table.
    pub fn find_by_class(&self, required: F::Class) -> Option<F::Id> {
        let found = self.with_inner(|inner| Self::first_fit(&inner.table, |d| d.satisfies(required)));
        Self::traced_find(found)
    }

    /// First free instance, in ascending id order, supporting every flag in
    /// `flags`
    ///
    /// An empty `flags` set places no requirement, so it matches the first
    /// free instance.
    pub fn find_by_flag(&self, flags: F::Flags) -> Option<F::Id> {
        let found = self.with_inner(|inner| Self::first_fit(&inner.table, |d| d.supports(flags)));
        Self::traced_find(found)
    }

    fn acquire(&self, kind: F::UseKind, pred: impl Fn(&Descriptor<F>) -> bool) -> Option<F::Id> {
        let found = self.with_inner(|inner| {
            let index = Self::first_fit(&inner.table, pred)?;
            inner.table[index].set_state(OwnershipState::InUse(kind));
            Some(index)
        });
        if let Some(index) = found {
            trace_event!(PERIPH_REGISTER, F::TRACE_ID, index as u8);
        }
        Self::traced_find(found)
    }

    /// Find and register, as one indivisible step, the first free instance
    /// whose class is at least `required`
    pub fn acquire_by_class(&self, required: F::Class, kind: F::UseKind) -> Option<F::Id> {
        self.acquire(kind, |d| d.satisfies(required))
    }

    /// Find and register, as one indivisible step, the first free instance
    /// supporting every flag in `flags`
    pub fn acquire_by_flag(&self, flags: F::Flags, kind: F::UseKind) -> Option<F::Id> {
        self.acquire(kind, |d| d.supports(flags))
    }

    /// Enable the clock of `id` and pulse its reset
    ///
    /// The reset is pulsed on every enable so a re-enabled peripheral never
    /// inherits register state from its previous owner. `None`, or an id not
    /// present on this part, is a silent no-op.
    pub fn enable_clock(&self, id: impl Into<Option<F::Id>>) {
        let Some(id) = id.into() else { return };
        let Ok(index) = Self::slot(id) else { return };

        self.with_inner(|inner| {
            inner.clocks.enable_clock(id);
            inner.clocks.pulse_reset(id);
        });
        trace_event!(CLOCK_ENABLE, F::TRACE_ID, index as u8);
    }

    /// Gate the clock of `id`
    ///
    /// Registers keep their configuration. `None`, or an id not present on
    /// this part, is a silent no-op.
    pub fn disable_clock(&self, id: impl Into<Option<F::Id>>) {
        let Some(id) = id.into() else { return };
        let Ok(index) = Self::slot(id) else { return };

        self.with_inner(|inner| inner.clocks.disable_clock(id));
        trace_event!(CLOCK_DISABLE, F::TRACE_ID, index as u8);
    }

    /// Number of instances currently in use
    pub fn count_active(&self) -> usize {
        self.with_inner(|inner| inner.table.iter().filter(|d| !d.is_unused()).count())
    }

    /// Number of instances currently free
    pub fn count_inactive(&self) -> usize {
        self.with_inner(|inner| inner.table.iter().filter(|d| d.is_unused()).count())
    }

    /// Total number of instances
    pub const fn len(&self) -> usize {
        N
    }

    /// Check if the family has no instances on this part
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Read-only snapshot of the whole table, for diagnostics
    ///
    /// The table is copied out under the critical section and `f` runs on the
    /// copy afterwards, so it may call back into the manager.
    pub fn inspect<R>(&self, f: impl FnOnce(&[Descriptor<F>]) -> R) -> R {
        let table = self.with_inner(|inner| inner.table);
        f(&table)
    }
}
