//! Bus clock configuration
//!
//! The managers record each instance's kernel clock at construction, so the
//! bus configuration has to be settled before the tables are built.

/// Peripheral bus an instance hangs off
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bus {
    /// Low-speed bus, 36 MHz max
    Apb1,
    /// High-speed bus, 72 MHz max
    Apb2,
}

/// APB prescaler applied to HCLK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ApbDivider {
    Div1 = 1,
    Div2 = 2,
    Div4 = 4,
    Div8 = 8,
    Div16 = 16,
}

impl ApbDivider {
    /// Division factor
    pub const fn divisor(self) -> u32 {
        self as u32
    }
}

/// AHB clock plus the two APB prescalers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusClocks {
    /// AHB clock in Hz
    pub hclk_hz: u32,
    /// APB1 prescaler
    pub apb1: ApbDivider,
    /// APB2 prescaler
    pub apb2: ApbDivider,
}

impl BusClocks {
    /// Reset state: 8 MHz HSI, no prescaling
    pub const HSI_8MHZ: Self = Self::new(8_000_000, ApbDivider::Div1, ApbDivider::Div1);

    /// 8 MHz HSE through PLL x9, APB1 at 36 MHz
    pub const PLL_72MHZ: Self = Self::new(72_000_000, ApbDivider::Div2, ApbDivider::Div1);

    pub const fn new(hclk_hz: u32, apb1: ApbDivider, apb2: ApbDivider) -> Self {
        Self { hclk_hz, apb1, apb2 }
    }

    const fn divider(&self, bus: Bus) -> ApbDivider {
        match bus {
            Bus::Apb1 => self.apb1,
            Bus::Apb2 => self.apb2,
        }
    }

    /// APB1 peripheral clock in Hz
    pub const fn pclk1(&self) -> u32 {
        self.pclk(Bus::Apb1)
    }

    /// APB2 peripheral clock in Hz
    pub const fn pclk2(&self) -> u32 {
        self.pclk(Bus::Apb2)
    }

    /// Peripheral clock of `bus` in Hz
    pub const fn pclk(&self, bus: Bus) -> u32 {
        self.hclk_hz / self.divider(bus).divisor()
    }

    /// Timer kernel clock on `bus` in Hz
    ///
    /// Timers get twice PCLK whenever the bus prescaler is not 1.
    pub const fn timer_clock(&self, bus: Bus) -> u32 {
        match self.divider(bus) {
            ApbDivider::Div1 => self.pclk(bus),
            _ => self.pclk(bus) * 2,
        }
    }
}

impl Default for BusClocks {
    fn default() -> Self {
        Self::HSI_8MHZ
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pll_72mhz_buses() {
        let clocks = BusClocks::PLL_72MHZ;
        assert_eq!(clocks.pclk1(), 36_000_000);
        assert_eq!(clocks.pclk2(), 72_000_000);
        assert_eq!(clocks.timer_clock(Bus::Apb1), 72_000_000);
        assert_eq!(clocks.timer_clock(Bus::Apb2), 72_000_000);
    }

    #[test]
    fn reset_state_buses() {
        let clocks = BusClocks::default();
        assert_eq!(clocks.pclk1(), 8_000_000);
        assert_eq!(clocks.timer_clock(Bus::Apb1), 8_000_000);
    }

    #[test]
    fn slow_apb2() {
        let clocks = BusClocks::new(48_000_000, ApbDivider::Div4, ApbDivider::Div16);
        assert_eq!(clocks.pclk1(), 12_000_000);
        assert_eq!(clocks.pclk2(), 3_000_000);
        assert_eq!(clocks.timer_clock(Bus::Apb2), 6_000_000);
    }
}
