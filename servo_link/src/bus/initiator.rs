//! Bus initiator engine.
//!
//! Owns the bus for the transactions it starts:
//! Idle → AddressPhase → DataOut | PrepareDataIn → DataIn → StopPhase → Done.
//! Each interrupt performs exactly one transition and arms the next hardware
//! operation; nothing waits on the bus.

use servo_common::bus::{Command, Direction, Encoding};
use tracing::{debug, trace, warn};

use super::handler::CommandHandler;
use super::port::BusPort;
use crate::codec::TxCodec;
use crate::error::LinkError;

/// Initiator transaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InitiatorState {
    /// No transaction in flight.
    #[default]
    Idle,
    /// Start asserted; the address byte goes out on the next interrupt.
    AddressPhase,
    /// Write transaction: data bytes go out.
    DataOut,
    /// Read transaction: placeholders are dropped and reception armed.
    PrepareDataIn,
    /// Read transaction: the received byte is ready.
    DataIn,
    /// Last byte done; stop goes out on the next interrupt.
    StopPhase,
    /// Stop complete; re-arm or go idle.
    Done,
}

/// Initiator counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitiatorStats {
    /// Completed transactions (stop asserted).
    pub transactions: u64,
    pub writes: u64,
    pub reads: u64,
    /// Commands that ran out of queued bytes mid-flight.
    pub desync_count: u64,
}

/// Interrupt-driven bus initiator.
#[derive(Debug)]
pub struct Initiator<H> {
    state: InitiatorState,
    codec: TxCodec,
    address: u8,
    handler: Option<H>,
    stats: InitiatorStats,
}

impl<H: CommandHandler> Initiator<H> {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            state: InitiatorState::Idle,
            codec: TxCodec::new(encoding),
            address: 0,
            handler: None,
            stats: InitiatorStats::default(),
        }
    }

    /// Register the handler receiving read results. Replaces any previous one.
    pub fn set_command_handler(&mut self, handler: H) {
        self.handler = Some(handler);
    }

    #[inline]
    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    #[inline]
    pub const fn state(&self) -> InitiatorState {
        self.state
    }

    #[inline]
    pub const fn is_idle(&self) -> bool {
        matches!(self.state, InitiatorState::Idle)
    }

    #[inline]
    pub const fn stats(&self) -> &InitiatorStats {
        &self.stats
    }

    #[inline]
    pub const fn codec(&self) -> &TxCodec {
        &self.codec
    }

    /// Queue `command` and assert a start condition if the bus is idle.
    ///
    /// A transaction already in flight picks the command up from `Done`.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::QueueFull` if the command does not fit.
    pub fn submit<P: BusPort>(&mut self, command: &Command, port: &mut P) -> Result<(), LinkError> {
        self.codec.prepare_command(command)?;
        if self.state == InitiatorState::Idle {
            self.state = InitiatorState::AddressPhase;
            port.start();
            trace!(address = command.address(), "start asserted");
        }
        Ok(())
    }

    /// Advance one step. Called from the bus interrupt.
    pub fn step<P: BusPort>(&mut self, port: &mut P) -> InitiatorState {
        use InitiatorState::*;

        let next = match self.state {
            Idle => {
                trace!("bus event while idle ignored");
                Idle
            }

            AddressPhase => self.send_address(port),

            DataOut => match self.codec.next_byte() {
                Some(byte) => {
                    port.write(byte);
                    if self.codec.command_fully_sent() {
                        self.stats.writes += 1;
                        StopPhase
                    } else {
                        DataOut
                    }
                }
                None => {
                    self.desync("transmit queue drained mid-command");
                    StopPhase
                }
            },

            PrepareDataIn => {
                let dropped = self.codec.discard_remaining();
                trace!(dropped, "read placeholders discarded");
                port.enable_receive();
                DataIn
            }

            DataIn => {
                let value = port.read();
                debug!(address = self.address, value, "read complete");
                if let Some(handler) = self.handler.as_mut() {
                    handler.on_command(self.address, value);
                }
                self.stats.reads += 1;
                port.nack();
                StopPhase
            }

            StopPhase => {
                port.stop();
                self.stats.transactions += 1;
                Done
            }

            Done => {
                if self.codec.commands_available() {
                    port.start();
                    AddressPhase
                } else {
                    Idle
                }
            }
        };

        trace!(from = ?self.state, to = ?next, "initiator step");
        self.state = next;
        next
    }

    fn send_address<P: BusPort>(&mut self, port: &mut P) -> InitiatorState {
        if !self.codec.commands_available() {
            return InitiatorState::Idle;
        }
        let Some(address) = self.codec.next_byte() else {
            return InitiatorState::Idle;
        };
        self.address = address;
        port.write(address);
        match Direction::of(address) {
            Direction::Read => InitiatorState::PrepareDataIn,
            Direction::Write => InitiatorState::DataOut,
        }
    }

    fn desync(&mut self, reason: &'static str) {
        self.stats.desync_count += 1;
        warn!(reason, field = ?self.codec.field(), "initiator desync");
        // Nothing left to align with; start the next command from scratch.
        self.codec.reset();
    }

    /// Return to the initial state and empty the transmit queue.
    /// The handler stays registered.
    pub fn reset(&mut self) {
        self.state = InitiatorState::Idle;
        self.codec.reset();
        self.address = 0;
        self.stats = InitiatorStats::default();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
