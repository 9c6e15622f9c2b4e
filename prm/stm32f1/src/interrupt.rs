//! Interrupt lines used by the timer and USART families

use prm_core::IrqNumber;

/// Number of device vectors on medium-density parts
pub const INTERRUPT_COUNT: usize = 43;

/// Device interrupt line
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Interrupt {
    TIM1_BRK = 24,
    TIM1_UP = 25,
    TIM1_TRG_COM = 26,
    TIM1_CC = 27,
    TIM2 = 28,
    TIM3 = 29,
    TIM4 = 30,
    USART1 = 37,
    USART2 = 38,
    USART3 = 39,
}

impl IrqNumber for Interrupt {
    fn number(self) -> u16 {
        self as u16
    }
}

// SAFETY: every variant is a valid STM32F103 device vector number
unsafe impl cortex_m::interrupt::InterruptNumber for Interrupt {
    #[inline(always)]
    fn number(self) -> u16 {
        self as u16
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Interrupt {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "IRQ{=u16}", *self as u16)
    }
}
