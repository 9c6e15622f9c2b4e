//! USART family

use bitflags::bitflags;
use prm_core::{PeripheralFamily, PeripheralId};
use prm_mgr::{Descriptor, PeripheralManager};

use crate::clocks::{Bus, BusClocks};
use crate::interrupt::Interrupt;
use crate::rcc::{RccGate, RccGated};
use crate::PeriphAddr;

/// USART instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartId {
    Usart1 = 0,
    Usart2 = 1,
    Usart3 = 2,
}

impl UartId {
    pub const ALL: [UartId; 3] = [UartId::Usart1, UartId::Usart2, UartId::Usart3];

    pub const fn bus(self) -> Bus {
        match self {
            UartId::Usart1 => Bus::Apb2,
            _ => Bus::Apb1,
        }
    }

    pub const fn base(self) -> PeriphAddr {
        PeriphAddr::new(match self {
            UartId::Usart1 => 0x4001_3800,
            UartId::Usart2 => 0x4000_4400,
            UartId::Usart3 => 0x4000_4800,
        })
    }

    pub const fn irq(self) -> Interrupt {
        match self {
            UartId::Usart1 => Interrupt::USART1,
            UartId::Usart2 => Interrupt::USART2,
            UartId::Usart3 => Interrupt::USART3,
        }
    }
}

impl PeripheralId for UartId {
    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Option<Self> {
        UartId::ALL.get(index).copied()
    }
}

impl RccGated for UartId {
    fn rcc_gate(self) -> RccGate {
        match self {
            UartId::Usart1 => RccGate::new(Bus::Apb2, 14),
            UartId::Usart2 => RccGate::new(Bus::Apb1, 17),
            UartId::Usart3 => RccGate::new(Bus::Apb1, 18),
        }
    }
}

/// What a driver uses a USART for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UartUse {
    Serial,
    HalfDuplex,
    Synchronous,
    Lin,
    Irda,
    Smartcard,
}

/// Asynchronous-only UART or full USART
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UartClass {
    Uart,
    Usart,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UartCaps: u8 {
        /// Clock output for synchronous mode
        const SYNCHRONOUS = 1 << 0;
        /// RTS/CTS
        const HW_FLOW_CONTROL = 1 << 1;
        const LIN = 1 << 2;
        const IRDA = 1 << 3;
        const SMARTCARD = 1 << 4;
        const DMA = 1 << 5;
    }
}

/// USART family
pub struct Uarts;

impl PeripheralFamily for Uarts {
    const NAME: &'static str = "uarts";
    const TRACE_ID: u8 = 2;

    type Id = UartId;
    type UseKind = UartUse;
    type Class = UartClass;
    type Flags = UartCaps;
    type Handle = PeriphAddr;
    type Irq = Interrupt;
}

/// Descriptor of `id` under `clocks`
///
/// USART1..USART3 are full USARTs with every feature.
pub const fn descriptor(id: UartId, clocks: &BusClocks) -> Descriptor<Uarts> {
    Descriptor::new(
        id,
        UartClass::Usart,
        UartCaps::all(),
        clocks.pclk(id.bus()),
        id.base(),
        id.irq(),
    )
}

/// USART manager
pub type UartManager<P, const N: usize> = PeripheralManager<Uarts, P, N>;

/// STM32F103x4/x6: USART1, USART2
pub mod low_density {
    use super::*;

    pub const COUNT: usize = 2;

    pub const fn table(clocks: &BusClocks) -> [Descriptor<Uarts>; COUNT] {
        [descriptor(UartId::Usart1, clocks), descriptor(UartId::Usart2, clocks)]
    }
}

/// STM32F103x8/xB: USART1..USART3
pub mod medium_density {
    use super::*;

    pub const COUNT: usize = 3;

    pub const fn table(clocks: &BusClocks) -> [Descriptor<Uarts>; COUNT] {
        [
            descriptor(UartId::Usart1, clocks),
            descriptor(UartId::Usart2, clocks),
            descriptor(UartId::Usart3, clocks),
        ]
    }
}
