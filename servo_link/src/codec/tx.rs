//! Transmit codec: command serialization and field tracking.

use servo_common::bus::{Command, Encoding};
use servo_common::consts::TX_QUEUE_CAPACITY;
use tracing::trace;

use crate::error::LinkError;
use crate::queue::CommandQueue;

/// Field of the command in flight that the next dequeued byte belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TxField {
    /// Nothing prepared since the last reset.
    #[default]
    NoCommand,
    AddressPending,
    /// 3-byte encoding only.
    KindPending,
    ValuePending,
    /// Every field of the last command went out.
    Complete,
}

/// Transmit side of the command codec.
///
/// Callers check [`command_fully_sent`](Self::command_fully_sent) before
/// pulling the next byte; a drained command is only re-armed by
/// [`commands_available`](Self::commands_available).
#[derive(Debug, Clone)]
pub struct TxCodec<const N: usize = TX_QUEUE_CAPACITY> {
    queue: CommandQueue<N>,
    encoding: Encoding,
    field: TxField,
}

impl<const N: usize> TxCodec<N> {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            queue: CommandQueue::new(),
            encoding,
            field: TxField::NoCommand,
        }
    }

    #[inline]
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    #[inline]
    pub const fn field(&self) -> TxField {
        self.field
    }

    /// Bytes waiting in the transmit queue.
    #[inline]
    pub fn queued_bytes(&self) -> usize {
        self.queue.len()
    }

    /// True if at least one byte is queued. Re-arms field tracking when the
    /// previous command completed (or none was ever sent).
    pub fn commands_available(&mut self) -> bool {
        if self.queue.is_empty() {
            return false;
        }
        if matches!(self.field, TxField::NoCommand | TxField::Complete) {
            self.field = TxField::AddressPending;
        }
        true
    }

    /// Dequeue the next byte of the command in flight and advance the field.
    ///
    /// Returns `None` when no command is in flight or the queue ran dry
    /// mid-command.
    pub fn next_byte(&mut self) -> Option<u8> {
        let next = match self.field {
            TxField::NoCommand | TxField::Complete => return None,
            TxField::AddressPending if self.encoding.has_kind() => TxField::KindPending,
            TxField::AddressPending | TxField::KindPending => TxField::ValuePending,
            TxField::ValuePending => TxField::Complete,
        };
        let byte = self.queue.dequeue()?;
        trace!(from = ?self.field, to = ?next, byte, "tx field advanced");
        self.field = next;
        Some(byte)
    }

    #[inline]
    pub fn command_fully_sent(&self) -> bool {
        self.field == TxField::Complete
    }

    /// Enqueue every field of `command` in wire order.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::QueueFull` if the whole command does not fit;
    /// nothing is enqueued in that case.
    pub fn prepare_command(&mut self, command: &Command) -> Result<(), LinkError> {
        let needed = self.encoding.field_count();
        let free = self.queue.free();
        if free < needed {
            return Err(LinkError::QueueFull { needed, free });
        }
        for byte in command.wire_bytes(self.encoding) {
            self.queue.enqueue(byte)?;
        }
        if self.field == TxField::NoCommand {
            self.field = TxField::AddressPending;
        }
        Ok(())
    }

    /// Pull and drop the remaining bytes of the command in flight.
    /// Returns how many were dropped.
    pub fn discard_remaining(&mut self) -> usize {
        let mut dropped = 0;
        while !self.command_fully_sent() && self.next_byte().is_some() {
            dropped += 1;
        }
        dropped
    }

    pub fn reset(&mut self) {
        self.queue.reset();
        self.field = TxField::NoCommand;
    }
}
