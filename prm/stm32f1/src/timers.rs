//! General-purpose and advanced-control timers
//!
//! TIM1 is the advanced-control timer on APB2, TIM2..TIM4 are general-purpose
//! timers on APB1. All counters on this line are 16 bits wide.

use bitflags::bitflags;
use prm_core::{PeripheralFamily, PeripheralId};
use prm_mgr::{Descriptor, PeripheralManager};

use crate::clocks::{Bus, BusClocks};
use crate::interrupt::Interrupt;
use crate::rcc::{RccGate, RccGated};
use crate::PeriphAddr;

/// Timer instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerId {
    Tim1 = 0,
    Tim2 = 1,
    Tim3 = 2,
    Tim4 = 3,
}

impl TimerId {
    /// Every timer of the line, in table order
    pub const ALL: [TimerId; 4] = [TimerId::Tim1, TimerId::Tim2, TimerId::Tim3, TimerId::Tim4];

    /// Bus feeding the timer
    pub const fn bus(self) -> Bus {
        match self {
            TimerId::Tim1 => Bus::Apb2,
            _ => Bus::Apb1,
        }
    }

    /// Register block
    pub const fn base(self) -> PeriphAddr {
        PeriphAddr::new(match self {
            TimerId::Tim1 => 0x4001_2C00,
            TimerId::Tim2 => 0x4000_0000,
            TimerId::Tim3 => 0x4000_0400,
            TimerId::Tim4 => 0x4000_0800,
        })
    }

    /// Update and capture/compare lines
    pub const fn irqs(self) -> TimerIrqs {
        match self {
            TimerId::Tim1 => TimerIrqs {
                update: Interrupt::TIM1_UP,
                capture_compare: Interrupt::TIM1_CC,
            },
            TimerId::Tim2 => TimerIrqs::shared(Interrupt::TIM2),
            TimerId::Tim3 => TimerIrqs::shared(Interrupt::TIM3),
            TimerId::Tim4 => TimerIrqs::shared(Interrupt::TIM4),
        }
    }

    /// Capture/compare channels
    pub const fn channels(self) -> u8 {
        4
    }

    /// Capability flags
    pub const fn caps(self) -> TimerCaps {
        let common = TimerCaps::ENCODER.union(TimerCaps::ADC_TRIGGER).union(TimerCaps::DMA);
        match self {
            TimerId::Tim1 => common.union(TimerCaps::COMPLEMENTARY),
            _ => common,
        }
    }
}

impl PeripheralId for TimerId {
    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Option<Self> {
        TimerId::ALL.get(index).copied()
    }
}

impl RccGated for TimerId {
    fn rcc_gate(self) -> RccGate {
        match self {
            TimerId::Tim1 => RccGate::new(Bus::Apb2, 11),
            TimerId::Tim2 => RccGate::new(Bus::Apb1, 0),
            TimerId::Tim3 => RccGate::new(Bus::Apb1, 1),
            TimerId::Tim4 => RccGate::new(Bus::Apb1, 2),
        }
    }
}

/// What a driver uses a timer for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerUse {
    /// Regular update interrupt
    PeriodicIrq,
    /// Quadrature encoder interface
    Encoder,
    /// PWM output
    Pwm,
    /// Trigger source for ADC conversions
    AdcTrigger,
}

/// Counter width; a wider counter can stand in for a narrower one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CounterWidth {
    Bits16,
    Bits32,
}

bitflags! {
    /// Timer features
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TimerCaps: u8 {
        /// Quadrature encoder mode
        const ENCODER = 1 << 0;
        /// TRGO can start ADC conversions
        const ADC_TRIGGER = 1 << 1;
        /// Complementary outputs with dead-time
        const COMPLEMENTARY = 1 << 2;
        /// DMA requests
        const DMA = 1 << 3;
    }
}

/// Interrupt lines of a timer
///
/// General-purpose timers share one line for every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerIrqs {
    pub update: Interrupt,
    pub capture_compare: Interrupt,
}

impl TimerIrqs {
    const fn shared(line: Interrupt) -> Self {
        Self {
            update: line,
            capture_compare: line,
        }
    }
}

/// Timer family
pub struct Timers;

impl PeripheralFamily for Timers {
    const NAME: &'static str = "timers";
    const TRACE_ID: u8 = 1;

    type Id = TimerId;
    type UseKind = TimerUse;
    type Class = CounterWidth;
    type Flags = TimerCaps;
    type Handle = PeriphAddr;
    type Irq = TimerIrqs;
}

/// Descriptor of `id` under `clocks`
pub const fn descriptor(id: TimerId, clocks: &BusClocks) -> Descriptor<Timers> {
    Descriptor::new(
        id,
        CounterWidth::Bits16,
        id.caps(),
        clocks.timer_clock(id.bus()),
        id.base(),
        id.irqs(),
    )
}

/// Timer manager
pub type TimerManager<P, const N: usize> = PeripheralManager<Timers, P, N>;

/// STM32F103x4/x6: TIM1..TIM3
pub mod low_density {
    use super::*;

    pub const COUNT: usize = 3;

    pub const fn table(clocks: &BusClocks) -> [Descriptor<Timers>; COUNT] {
        [
            descriptor(TimerId::Tim1, clocks),
            descriptor(TimerId::Tim2, clocks),
            descriptor(TimerId::Tim3, clocks),
        ]
    }
}

/// STM32F103x8/xB: TIM1..TIM4
pub mod medium_density {
    use super::*;

    pub const COUNT: usize = 4;

    pub const fn table(clocks: &BusClocks) -> [Descriptor<Timers>; COUNT] {
        [
            descriptor(TimerId::Tim1, clocks),
            descriptor(TimerId::Tim2, clocks),
            descriptor(TimerId::Tim3, clocks),
            descriptor(TimerId::Tim4, clocks),
        ]
    }
}
