//! Bus peripheral seam.

use std::collections::VecDeque;

/// Operations an engine requests from the bus peripheral.
///
/// Each call only arms the hardware; completion is reported by the next bus
/// interrupt, which steps the engine again.
pub trait BusPort {
    /// Assert a start condition.
    fn start(&mut self);
    /// Assert a stop condition.
    fn stop(&mut self);
    /// Load `byte` into the transmit buffer.
    fn write(&mut self, byte: u8);
    /// Read the receive buffer.
    fn read(&mut self) -> u8;
    /// Clock one byte in from the remote end.
    fn enable_receive(&mut self);
    /// Answer the last received byte with NACK.
    fn nack(&mut self);
    /// Stop stretching the clock.
    fn release_clock(&mut self);
}

/// One recorded port operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusAction {
    Start,
    Stop,
    Write(u8),
    Read(u8),
    EnableReceive,
    Nack,
    ReleaseClock,
}

/// Port that records every operation and serves reads from a script.
///
/// Reads past the end of the script return `0xFF` (idle bus).
#[derive(Debug, Clone, Default)]
pub struct RecordingPort {
    actions: Vec<BusAction>,
    reads: VecDeque<u8>,
}

impl RecordingPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a byte for the next `read()`.
    pub fn push_read(&mut self, byte: u8) {
        self.reads.push_back(byte);
    }

    pub fn actions(&self) -> &[BusAction] {
        &self.actions
    }

    /// Take the recorded operations, leaving the log empty.
    pub fn take_actions(&mut self) -> Vec<BusAction> {
        std::mem::take(&mut self.actions)
    }

    pub fn count(&self, action: BusAction) -> usize {
        self.actions.iter().filter(|a| **a == action).count()
    }

    /// Bytes placed on the bus, in order.
    pub fn written(&self) -> Vec<u8> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                BusAction::Write(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.reads.clear();
    }
}

impl BusPort for RecordingPort {
    fn start(&mut self) {
        self.actions.push(BusAction::Start);
    }

    fn stop(&mut self) {
        self.actions.push(BusAction::Stop);
    }

    fn write(&mut self, byte: u8) {
        self.actions.push(BusAction::Write(byte));
    }

    fn read(&mut self) -> u8 {
        let byte = self.reads.pop_front().unwrap_or(0xFF);
        self.actions.push(BusAction::Read(byte));
        byte
    }

    fn enable_receive(&mut self) {
        self.actions.push(BusAction::EnableReceive);
    }

    fn nack(&mut self) {
        self.actions.push(BusAction::Nack);
    }

    fn release_clock(&mut self) {
        self.actions.push(BusAction::ReleaseClock);
    }
}
