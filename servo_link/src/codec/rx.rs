//! Receive codec: rebuilds commands from the bytes a responder sees.
//!
//! One staging command is assembled per transaction. Data bytes fill the
//! kind field first (3-byte encoding only) and then the value field.

use heapless::Deque;
use servo_common::bus::{Command, Encoding};
use servo_common::consts::RX_QUEUE_CAPACITY;
use tracing::{debug, warn};

/// Command under assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Staging {
    address: u8,
    kind: Option<u8>,
    value: Option<u8>,
}

impl Staging {
    const fn new(address: u8) -> Self {
        Self {
            address,
            kind: None,
            value: None,
        }
    }

    fn command(&self) -> Option<Command> {
        self.value
            .map(|value| Command::from_raw(self.address, self.kind, value))
    }
}

/// Outcome of feeding one data byte to the receive codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxData {
    /// The byte filled an intermediate field.
    Partial,
    /// The byte completed (or overwrote) the value field.
    Complete(Command),
    /// No address was received for this transaction; the byte was dropped.
    Orphan,
}

/// Receive side of the command codec.
#[derive(Debug, Clone)]
pub struct RxCodec<const N: usize = RX_QUEUE_CAPACITY> {
    encoding: Encoding,
    staging: Option<Staging>,
    pending: Deque<Command, N>,
    dropped: u32,
}

impl<const N: usize> RxCodec<N> {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            staging: None,
            pending: Deque::new(),
            dropped: 0,
        }
    }

    /// Start a new staging command for `address`.
    pub fn on_address_received(&mut self, address: u8) {
        self.staging = Some(Staging::new(address));
    }

    /// Store `byte` in the next field of the staging command.
    ///
    /// Bytes past the value field replace the value.
    pub fn on_data_received(&mut self, byte: u8) -> RxData {
        let Some(staging) = self.staging.as_mut() else {
            return RxData::Orphan;
        };
        if self.encoding.has_kind() && staging.kind.is_none() && staging.value.is_none() {
            staging.kind = Some(byte);
            return RxData::Partial;
        }
        if staging.value.is_some() {
            debug!(address = staging.address, byte, "value overwritten");
        }
        staging.value = Some(byte);
        staging.command().map_or(RxData::Partial, RxData::Complete)
    }

    /// Close the transaction. A complete staging command is pushed on the
    /// receive queue; an incomplete one is discarded. Returns true if a
    /// command was queued.
    pub fn on_transaction_end(&mut self) -> bool {
        let Some(command) = self.staging.take().and_then(|s| s.command()) else {
            return false;
        };
        if self.pending.push_back(command).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
            warn!(?command, "receive queue full, command dropped");
            return false;
        }
        true
    }

    /// Forget the staging command without queuing it.
    pub fn abandon(&mut self) {
        self.staging = None;
    }

    #[inline]
    pub fn has_pending_command(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Oldest queued command, if any.
    #[inline]
    pub fn take_pending_command(&mut self) -> Option<Command> {
        self.pending.pop_front()
    }

    /// Commands lost to a full receive queue.
    #[inline]
    pub const fn dropped_count(&self) -> u32 {
        self.dropped
    }

    pub fn reset(&mut self) {
        self.staging = None;
        self.pending.clear();
        self.dropped = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_byte_command_assembles() {
        let mut rx: RxCodec = RxCodec::new(Encoding::TwoByte);
        rx.on_address_received(1);
        let data = rx.on_data_received(42);
        assert_eq!(data, RxData::Complete(Command::from_raw(1, None, 42)));
        assert!(!rx.has_pending_command());

        assert!(rx.on_transaction_end());
        assert_eq!(rx.take_pending_command(), Some(Command::from_raw(1, None, 42)));
        assert_eq!(rx.take_pending_command(), None);
    }

    #[test]
    fn three_byte_kind_precedes_value() {
        let mut rx: RxCodec = RxCodec::new(Encoding::ThreeByte);
        rx.on_address_received(0);
        assert_eq!(rx.on_data_received(64), RxData::Partial);
        let data = rx.on_data_received(150);
        assert_eq!(data, RxData::Complete(Command::from_raw(0, Some(64), 150)));
        rx.on_transaction_end();
        let cmd = rx.take_pending_command().unwrap();
        assert_eq!(cmd.raw_kind(), Some(64));
        assert_eq!(cmd.value(), 150);
    }

    #[test]
    fn incomplete_command_is_discarded() {
        let mut rx: RxCodec = RxCodec::new(Encoding::ThreeByte);
        rx.on_address_received(0);
        rx.on_data_received(64);
        assert!(!rx.on_transaction_end());
        assert!(!rx.has_pending_command());
    }

    #[test]
    fn data_without_address_is_orphan() {
        let mut rx: RxCodec = RxCodec::new(Encoding::TwoByte);
        assert_eq!(rx.on_data_received(7), RxData::Orphan);
        assert!(!rx.on_transaction_end());
    }

    #[test]
    fn extra_bytes_overwrite_value() {
        let mut rx: RxCodec = RxCodec::new(Encoding::TwoByte);
        rx.on_address_received(1);
        rx.on_data_received(10);
        assert_eq!(
            rx.on_data_received(11),
            RxData::Complete(Command::from_raw(1, None, 11))
        );
    }

    #[test]
    fn pending_commands_drain_fifo() {
        let mut rx: RxCodec = RxCodec::new(Encoding::TwoByte);
        for (address, value) in [(0, 1), (1, 2), (0, 3)] {
            rx.on_address_received(address);
            rx.on_data_received(value);
            rx.on_transaction_end();
        }
        let values: Vec<u8> = std::iter::from_fn(|| rx.take_pending_command())
            .map(|c| c.value())
            .collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn full_queue_counts_drops() {
        let mut rx: RxCodec<1> = RxCodec::new(Encoding::TwoByte);
        for value in [1, 2] {
            rx.on_address_received(0);
            rx.on_data_received(value);
            rx.on_transaction_end();
        }
        assert_eq!(rx.dropped_count(), 1);
        assert_eq!(rx.take_pending_command().map(|c| c.value()), Some(1));
    }

    #[test]
    fn reset_clears_everything() {
        let mut rx: RxCodec = RxCodec::new(Encoding::TwoByte);
        rx.on_address_received(0);
        rx.on_data_received(1);
        rx.on_transaction_end();
        rx.on_address_received(1);
        rx.reset();
        assert!(!rx.has_pending_command());
        assert!(!rx.on_transaction_end());
    }
}
