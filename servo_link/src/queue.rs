//! Fixed-capacity byte FIFO feeding the bus engines.
//!
//! Enqueue only extends the tail and dequeue only advances the head. Both are
//! O(1) and never allocate.

use heapless::Deque;
use servo_common::consts::TX_QUEUE_CAPACITY;

use crate::error::LinkError;

/// Bounded byte FIFO.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue<const N: usize = TX_QUEUE_CAPACITY> {
    bytes: Deque<u8, N>,
}

impl<const N: usize> CommandQueue<N> {
    pub fn new() -> Self {
        Self {
            bytes: Deque::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Bytes that can still be enqueued.
    #[inline]
    pub fn free(&self) -> usize {
        N - self.bytes.len()
    }

    /// Append one byte at the tail.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::QueueFull` if the queue is at capacity; the queue
    /// is left unchanged.
    pub fn enqueue(&mut self, byte: u8) -> Result<(), LinkError> {
        self.bytes
            .push_back(byte)
            .map_err(|_| LinkError::QueueFull { needed: 1, free: 0 })
    }

    /// Remove the byte at the head, if any.
    #[inline]
    pub fn dequeue(&mut self) -> Option<u8> {
        self.bytes.pop_front()
    }

    /// Drop every queued byte.
    pub fn reset(&mut self) {
        self.bytes.clear();
    }
}
