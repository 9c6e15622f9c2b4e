//! Trace buffer management
//!
//! Handles record buffering, HDLC framing, and output.

use crate::types::{TraceConfig, TraceRecord};

/// HDLC protocol constants
pub mod hdlc {
    /// HDLC flag byte (frame delimiter)
    pub const FLAG: u8 = 0x7E;
    /// HDLC escape byte
    pub const ESC: u8 = 0x7D;
    /// XOR mask for escaped bytes
    pub const ESC_XOR: u8 = 0x20;
}

/// Maximum payload of a single record
pub const MAX_RECORD: usize = 64;

/// Worst case frame: every byte stuffed, plus the flag
const MAX_FRAME: usize = 2 * (MAX_RECORD + 8) + 1;

/// Ring buffer collecting framed trace records
pub struct TraceBuffer<const N: usize> {
    /// Ring buffer storage
    data: [u8; N],
    /// Write index (head)
    head: usize,
    /// Read index (tail)
    tail: usize,
    /// Number of bytes in buffer
    used: usize,
    /// Frames dropped because the ring was full
    dropped: u32,
    /// Sequence number for HDLC frames
    sequence: u8,
    /// Current record being built
    current: Option<RecordBuilder>,
    /// Global filter (128-bit mask for record types)
    global_filter: u128,
    /// Local filter (128-bit mask for source ids)
    local_filter: u128,
    /// Configuration
    config: TraceConfig,
    /// Timestamp counter
    timestamp: u32,
}

/// Record under construction
struct RecordBuilder {
    record: TraceRecord,
    timestamp: u32,
    data: heapless::Vec<u8, MAX_RECORD>,
}

impl<const N: usize> TraceBuffer<N> {
    /// Create new trace buffer
    pub const fn new() -> Self {
        Self {
            data: [0; N],
            head: 0,
            tail: 0,
            used: 0,
            dropped: 0,
            sequence: 0,
            current: None,
            global_filter: 0,
            local_filter: u128::MAX,
            config: TraceConfig::new(),
            timestamp: 0,
        }
    }

    /// Reset the buffer and filters
    pub fn init(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.used = 0;
        self.dropped = 0;
        self.sequence = 0;
        self.current = None;
        self.global_filter = 0;
        self.local_filter = u128::MAX;
        self.timestamp = 0;
    }

    /// Set configuration
    pub fn set_config(&mut self, config: TraceConfig) {
        self.config = config;
    }

    /// Get configuration
    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Set global filter for record type
    pub fn set_global_filter(&mut self, record: TraceRecord, enable: bool) {
        let bit = record as u8;
        if bit < 128 {
            if enable {
                self.global_filter |= 1u128 << bit;
            } else {
                self.global_filter &= !(1u128 << bit);
            }
        }
    }

    /// Set global filter mask directly
    pub fn set_global_filter_mask(&mut self, mask: u128) {
        self.global_filter = mask;
    }

    /// Set local filter for a source id
    pub fn set_local_filter(&mut self, id: u8, enable: bool) {
        if id < 128 {
            if enable {
                self.local_filter |= 1u128 << id;
            } else {
                self.local_filter &= !(1u128 << id);
            }
        }
    }

    /// Set local filter mask directly
    pub fn set_local_filter_mask(&mut self, mask: u128) {
        self.local_filter = mask;
    }

    /// Check if record passes filters
    fn passes_filters(&self, record: TraceRecord, id: u8) -> bool {
        if record.is_non_maskable() {
            return true;
        }

        let rec_bit = record as u8;
        let global_pass = rec_bit >= 128 || (self.global_filter & (1u128 << rec_bit)) != 0;

        // Source id 0 always passes
        let local_pass = id == 0 || id >= 128 || (self.local_filter & (1u128 << id)) != 0;

        global_pass && local_pass
    }

    /// Begin a trace record
    ///
    /// Returns false if the record is filtered out; data written before the
    /// next `begin` is then discarded.
    pub fn begin(&mut self, record: TraceRecord, id: u8) -> bool {
        if !self.passes_filters(record, id) {
            self.current = None;
            return false;
        }

        if self.current.is_some() {
            self.end();
        }

        self.timestamp = self.timestamp.wrapping_add(1);
        self.current = Some(RecordBuilder {
            record,
            timestamp: self.timestamp,
            data: heapless::Vec::new(),
        });

        true
    }

    /// End current trace record and commit to buffer
    pub fn end(&mut self) {
        if let Some(builder) = self.current.take() {
            self.commit(builder);
        }
    }

    /// Commit record to buffer with HDLC framing
    fn commit(&mut self, builder: RecordBuilder) {
        let ts_bytes = self.timestamp_bytes(builder.timestamp);

        // ~(sequence + record + sum(timestamp + data))
        let checksum = !core::iter::once(self.sequence)
            .chain(core::iter::once(builder.record as u8))
            .chain(ts_bytes.iter().copied())
            .chain(builder.data.iter().copied())
            .fold(0u8, |acc, b| acc.wrapping_add(b));

        let mut frame = heapless::Vec::<u8, MAX_FRAME>::new();
        let add_byte = |frame: &mut heapless::Vec<u8, MAX_FRAME>, byte: u8| {
            if byte == hdlc::FLAG || byte == hdlc::ESC {
                let _ = frame.push(hdlc::ESC);
                let _ = frame.push(byte ^ hdlc::ESC_XOR);
            } else {
                let _ = frame.push(byte);
            }
        };

        add_byte(&mut frame, self.sequence);
        add_byte(&mut frame, builder.record as u8);
        for &byte in &ts_bytes {
            add_byte(&mut frame, byte);
        }
        for &byte in &builder.data {
            add_byte(&mut frame, byte);
        }
        add_byte(&mut frame, checksum);
        let _ = frame.push(hdlc::FLAG);

        // Whole frames only, a torn frame would desync the host decoder
        if N - self.used < frame.len() {
            self.dropped = self.dropped.wrapping_add(1);
            return;
        }
        for &byte in &frame {
            self.data[self.head] = byte;
            self.head = (self.head + 1) % N;
            self.used += 1;
        }

        self.sequence = self.sequence.wrapping_add(1);
    }

    /// Read available bytes from buffer
    pub fn read(&mut self, buf: &mut [u8]) -> usize {
        let mut n = 0;
        while n < buf.len() && self.used > 0 {
            buf[n] = self.data[self.tail];
            self.tail = (self.tail + 1) % N;
            self.used -= 1;
            n += 1;
        }
        n
    }

    /// Get number of bytes available to read
    pub fn available(&self) -> usize {
        self.used
    }

    /// Frames dropped on overflow since init
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    fn timestamp_bytes(&self, timestamp: u32) -> heapless::Vec<u8, 4> {
        let mut bytes = heapless::Vec::new();
        let width = match self.config.time_size {
            1 => 1,
            2 => 2,
            _ => 4,
        };
        for &byte in timestamp.to_le_bytes().iter().take(width) {
            let _ = bytes.push(byte);
        }
        bytes
    }

    /// Add u8 to current record
    pub fn u8(&mut self, value: u8) {
        if let Some(ref mut builder) = self.current {
            let _ = builder.data.push(value);
        }
    }

    /// Add u16 to current record
    pub fn u16(&mut self, value: u16) {
        if let Some(ref mut builder) = self.current {
            let _ = builder.data.extend_from_slice(&value.to_le_bytes());
        }
    }

    /// Add u32 to current record
    pub fn u32(&mut self, value: u32) {
        if let Some(ref mut builder) = self.current {
            let _ = builder.data.extend_from_slice(&value.to_le_bytes());
        }
    }

    /// Add string to current record (zero-terminated)
    pub fn str(&mut self, value: &str) {
        if let Some(ref mut builder) = self.current {
            for byte in value.as_bytes() {
                let _ = builder.data.push(*byte);
            }
            let _ = builder.data.push(0);
        }
    }

    /// Add object pointer (configured size)
    pub fn obj_ptr(&mut self, ptr: usize) {
        match self.config.obj_ptr_size {
            2 => self.u16(ptr as u16),
            8 => {
                self.u32(ptr as u32);
                self.u32(((ptr as u64) >> 32) as u32);
            }
            _ => self.u32(ptr as u32),
        }
    }

    /// Generate TARGET_INFO record (non-maskable)
    ///
    /// Contains: version, endianness, config sizes, target name
    pub fn target_info_record(&mut self, version: &str, target_name: &str, endianness: u8) {
        let mut data: heapless::Vec<u8, MAX_RECORD> = heapless::Vec::new();

        for &b in version.as_bytes() {
            data.push(b).ok();
        }
        data.push(0).ok();

        // Endianness (0=little, 1=big)
        data.push(endianness).ok();

        data.push(self.config.time_size).ok();
        data.push(self.config.obj_ptr_size).ok();

        for &b in target_name.as_bytes() {
            data.push(b).ok();
        }
        data.push(0).ok();

        let builder = RecordBuilder {
            record: TraceRecord::TARGET_INFO,
            timestamp: 0,
            data,
        };

        self.commit(builder);
    }
}

impl<const N: usize> Default for TraceBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
