#![no_std]

//! # PRM STM32F1
//!
//! Timer and USART families of the STM32F103 for the peripheral managers,
//! plus the RCC clock control they drive.
//!
//! ```rust,ignore
//! use prm_stm32f1::{timers, BusClocks, Rcc, TimerCaps, TimerManager, TimerUse};
//!
//! let clocks = BusClocks::PLL_72MHZ;
//! // SAFETY: the managers are the only RCC users
//! let rcc = unsafe { Rcc::new() };
//! let timers: TimerManager<_, { timers::medium_density::COUNT }> =
//!     TimerManager::new(timers::medium_density::table(&clocks), rcc).unwrap();
//!
//! if let Some(tim) = timers.acquire_by_flag(TimerCaps::ENCODER, TimerUse::Encoder) {
//!     timers.enable_clock(tim);
//! }
//! ```

pub mod clocks;
pub mod interrupt;
pub mod rcc;
pub mod timers;
pub mod uarts;

pub use clocks::{ApbDivider, Bus, BusClocks};
pub use interrupt::{Interrupt, INTERRUPT_COUNT};
pub use rcc::{Rcc, RccGate, RccGated, RCC_BASE};
pub use timers::{CounterWidth, TimerCaps, TimerId, TimerIrqs, TimerManager, TimerUse, Timers};
pub use uarts::{UartCaps, UartClass, UartId, UartManager, UartUse, Uarts};

/// Interrupt dispatch table covering every device vector
pub type Irqs = prm_mgr::IrqTable<INTERRUPT_COUNT>;

/// Base address of a peripheral register block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriphAddr(usize);

impl PeriphAddr {
    pub const fn new(addr: usize) -> Self {
        Self(addr)
    }

    pub const fn addr(self) -> usize {
        self.0
    }

    /// Register block pointer for a PAC or driver
    pub const fn as_ptr<T>(self) -> *const T {
        self.0 as *const T
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PeriphAddr {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=usize:#x}", self.0)
    }
}
