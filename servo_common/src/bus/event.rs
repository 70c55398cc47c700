//! Bus events and hardware status flags.
//!
//! The bus peripheral raises one combined interrupt and reports what happened
//! through a status register. `StatusDecoder` turns a status snapshot plus
//! the buffered byte into the small event set the engines consume, so the
//! engines never look at raw flags.

use bitflags::bitflags;
use heapless::Vec;

bitflags! {
    /// Bus peripheral status register (MSSP `SSPxSTAT` layout).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StatusFlags: u8 {
        /// Receive buffer full.
        const BF = 0x01;
        /// Update address (10-bit mode only, unused).
        const UA = 0x02;
        /// Read/write: set during a read transaction.
        const RW = 0x04;
        /// Start condition detected since the last stop.
        const S  = 0x08;
        /// Stop condition detected.
        const P  = 0x10;
        /// Data/address: set when the last byte was data.
        const DA = 0x20;
    }
}

impl Default for StatusFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// One bus event as seen by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusEvent {
    /// A start (or repeated start) condition opened a transaction.
    StartSeen,
    /// A byte was clocked in from the initiator (address or data).
    ByteReadyWrite(u8),
    /// The initiator is clocking a byte out of the responder. Carries the
    /// byte currently in the buffer (the address byte on the first read).
    ByteReadyRead(u8),
    /// A stop condition closed the transaction.
    StopSeen,
}

/// Synthesizes `BusEvent`s from status snapshots.
///
/// The status register has no explicit "start" event when start interrupts
/// are disabled, so the decoder emits `StartSeen` in front of every address
/// byte.
#[derive(Debug, Clone, Default)]
pub struct StatusDecoder {
    in_transaction: bool,
}

impl StatusDecoder {
    pub const fn new() -> Self {
        Self {
            in_transaction: false,
        }
    }

    /// Whether a transaction is open.
    #[inline]
    pub const fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Decode one interrupt's status snapshot into zero, one or two events.
    pub fn decode(&mut self, status: StatusFlags, buffer: u8) -> Vec<BusEvent, 2> {
        let mut events = Vec::new();

        if status.contains(StatusFlags::P) {
            if self.in_transaction {
                self.in_transaction = false;
                push(&mut events, BusEvent::StopSeen);
            }
            return events;
        }

        if !status.contains(StatusFlags::S) {
            return events;
        }

        let is_read = status.contains(StatusFlags::RW);
        if !is_read && !status.contains(StatusFlags::BF) {
            return events;
        }

        if !status.contains(StatusFlags::DA) {
            // Address byte: a new (or repeated) transaction.
            self.in_transaction = true;
            push(&mut events, BusEvent::StartSeen);
        }

        let byte_event = if is_read {
            BusEvent::ByteReadyRead(buffer)
        } else {
            BusEvent::ByteReadyWrite(buffer)
        };
        push(&mut events, byte_event);
        events
    }

    pub fn reset(&mut self) {
        self.in_transaction = false;
    }
}

// At most two events are produced per snapshot.
#[inline]
fn push(events: &mut Vec<BusEvent, 2>, event: BusEvent) {
    let pushed = events.push(event);
    debug_assert!(pushed.is_ok());
}
