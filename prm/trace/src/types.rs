//! Trace record type definitions

/// All trace record types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[allow(non_camel_case_types)]
pub enum TraceRecord {
    // [0] session (not maskable)
    EMPTY = 0,

    // [1-6] Ownership records
    PERIPH_REGISTER = 1,
    PERIPH_BUSY = 2,
    PERIPH_INVALID = 3,
    PERIPH_DEREGISTER = 4,
    PERIPH_FIND = 5,
    PERIPH_FIND_MISS = 6,

    // [7-8] Clock records
    CLOCK_ENABLE = 7,
    CLOCK_DISABLE = 8,

    // [9-12] Interrupt records
    IRQ_ATTACH = 9,
    IRQ_DETACH = 10,
    IRQ_DISPATCH = 11,
    IRQ_UNHANDLED = 12,

    // [54-64] Dictionary and target records (not maskable)
    OBJ_DICT = 54,
    TARGET_INFO = 64,

    // User records (100+)
    USER = 100,
}

impl TraceRecord {
    /// Get the record type name
    pub const fn name(self) -> &'static str {
        match self {
            Self::EMPTY => "EMPTY",
            Self::PERIPH_REGISTER => "PERIPH_REGISTER",
            Self::PERIPH_BUSY => "PERIPH_BUSY",
            Self::PERIPH_INVALID => "PERIPH_INVALID",
            Self::PERIPH_DEREGISTER => "PERIPH_DEREGISTER",
            Self::PERIPH_FIND => "PERIPH_FIND",
            Self::PERIPH_FIND_MISS => "PERIPH_FIND_MISS",
            Self::CLOCK_ENABLE => "CLOCK_ENABLE",
            Self::CLOCK_DISABLE => "CLOCK_DISABLE",
            Self::IRQ_ATTACH => "IRQ_ATTACH",
            Self::IRQ_DETACH => "IRQ_DETACH",
            Self::IRQ_DISPATCH => "IRQ_DISPATCH",
            Self::IRQ_UNHANDLED => "IRQ_UNHANDLED",
            Self::OBJ_DICT => "OBJ_DICT",
            Self::TARGET_INFO => "TARGET_INFO",
            Self::USER => "USER",
        }
    }

    /// Check if record is non-maskable (always passes filters)
    pub const fn is_non_maskable(self) -> bool {
        matches!(self, Self::EMPTY | Self::OBJ_DICT | Self::TARGET_INFO)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TraceRecord {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.name());
    }
}

/// Configuration for the trace target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceConfig {
    /// Timestamp size in bytes (1, 2, or 4)
    pub time_size: u8,
    /// Object pointer size in bytes (2, 4, or 8)
    pub obj_ptr_size: u8,
}

impl TraceConfig {
    /// Configuration matching a 32-bit target
    pub const fn new() -> Self {
        Self {
            time_size: 4,
            obj_ptr_size: 4,
        }
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Record group filters
pub mod filters {
    /// All records
    pub const ALL_RECORDS: u128 = u128::MAX;

    /// Ownership records group
    pub const PERIPH_RECORDS: u128 = 0x7E; // Bits 1-6

    /// Clock records group
    pub const CLOCK_RECORDS: u128 = 0x180; // Bits 7-8

    /// Interrupt records group
    pub const IRQ_RECORDS: u128 = 0x1E00; // Bits 9-12

    /// All user records (USER+0 to USER+24)
    pub const USER_RECORDS: u128 = 0x1FFFFFF << 100;
}

/// Source ids for the local filter
pub mod trace_ids {
    /// Timer family
    pub const TIMERS: u8 = 1;

    /// UART family
    pub const UARTS: u8 = 2;

    /// Interrupt dispatch table
    pub const IRQ_TABLE: u8 = 16;

    /// Application-specific ids start here
    pub const APP_BASE: u8 = 64;
}
