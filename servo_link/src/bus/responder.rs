//! Bus responder engine.
//!
//! Reacts to transactions opened by a remote initiator. The byte following a
//! start is the address; its local sub-address selects the exposed register
//! served on reads and the target reported to the handler on writes.
//!
//! | prev byte | direction | action                                         |
//! |-----------|-----------|------------------------------------------------|
//! | address   | write     | decode local sub-address, `on_target` hook     |
//! | data      | write     | command data → handler or receive codec        |
//! | address   | read      | decode local sub-address, supply its register  |
//! | data      | read      | supply the register again                      |

use std::sync::atomic::{AtomicU8, Ordering};

use servo_common::bus::{BusEvent, Command, Direction, LocalAddressMask};
use servo_common::config::{BusConfig, Delivery};
use servo_common::consts::MAX_LOCAL_ADDRESSES;
use tracing::{debug, trace, warn};

use super::handler::CommandHandler;
use super::port::BusPort;
use crate::codec::{RxCodec, RxData};

/// Values served to read transactions, indexed by local sub-address.
///
/// Written by the measurement producer and read by the responder; each
/// update is a single byte store.
#[derive(Debug, Default)]
pub struct RegisterTable {
    values: [AtomicU8; MAX_LOCAL_ADDRESSES],
}

impl RegisterTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` for `local`. Out-of-range addresses are ignored.
    pub fn expose(&self, local: u8, value: u8) {
        match self.values.get(usize::from(local)) {
            Some(cell) => cell.store(value, Ordering::Relaxed),
            None => debug!(local, value, "expose out of range ignored"),
        }
    }

    /// Value served for `local`; zero past the end of the table.
    #[inline]
    pub fn value(&self, local: u8) -> u8 {
        self.values
            .get(usize::from(local))
            .map_or(0, |cell| cell.load(Ordering::Relaxed))
    }

    pub fn reset(&self) {
        for v in &self.values {
            v.store(0, Ordering::Relaxed);
        }
    }
}

/// What the last clocked byte of the open transaction was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResponderPhase {
    /// No transaction open.
    #[default]
    Idle,
    /// Start seen; the next byte is the address.
    AwaitAddress,
    AfterAddress,
    AfterData,
}

/// Responder counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponderStats {
    pub transactions: u64,
    /// Write commands handed to the handler or the receive queue.
    pub commands: u64,
    pub reads_served: u64,
    /// Bytes that did not fit the transaction state they arrived in.
    pub desync_count: u64,
}

/// Interrupt-driven bus responder.
#[derive(Debug)]
pub struct Responder<H> {
    phase: ResponderPhase,
    direction: Direction,
    local: u8,
    mask: LocalAddressMask,
    delivery: Delivery,
    registers: RegisterTable,
    rx: RxCodec,
    handler: Option<H>,
    stats: ResponderStats,
}

impl<H: CommandHandler> Responder<H> {
    pub fn new(config: &BusConfig) -> Self {
        Self {
            phase: ResponderPhase::Idle,
            direction: Direction::Write,
            local: 0,
            mask: config.local_mask(),
            delivery: config.delivery,
            registers: RegisterTable::new(),
            rx: RxCodec::new(config.encoding),
            handler: None,
            stats: ResponderStats::default(),
        }
    }

    /// Register the handler receiving write commands. Replaces any previous one.
    pub fn set_command_handler(&mut self, handler: H) {
        self.handler = Some(handler);
    }

    #[inline]
    pub const fn phase(&self) -> ResponderPhase {
        self.phase
    }

    /// Local sub-address of the current (or last) transaction.
    #[inline]
    pub const fn local_address(&self) -> u8 {
        self.local
    }

    #[inline]
    pub const fn delivery(&self) -> Delivery {
        self.delivery
    }

    #[inline]
    pub const fn stats(&self) -> &ResponderStats {
        &self.stats
    }

    /// Serve `value` on the next read of `local`.
    #[inline]
    pub fn expose_value(&self, local: u8, value: u8) {
        self.registers.expose(local, value);
    }

    #[inline]
    pub fn registers(&self) -> &RegisterTable {
        &self.registers
    }

    #[inline]
    pub fn has_pending_command(&self) -> bool {
        self.rx.has_pending_command()
    }

    /// Oldest command received in queued delivery mode.
    #[inline]
    pub fn take_pending_command(&mut self) -> Option<Command> {
        self.rx.take_pending_command()
    }

    /// Advance on one bus event. Called from the bus interrupt.
    pub fn step<P: BusPort>(&mut self, event: BusEvent, port: &mut P) -> ResponderPhase {
        use ResponderPhase::*;

        let next = match (self.phase, event) {
            (_, BusEvent::StartSeen) => {
                if matches!(self.phase, AfterAddress | AfterData) {
                    // Repeated start closes the previous transaction.
                    self.close_transaction();
                }
                AwaitAddress
            }

            (Idle, BusEvent::StopSeen) => Idle,
            (_, BusEvent::StopSeen) => {
                self.close_transaction();
                Idle
            }

            (AwaitAddress, BusEvent::ByteReadyWrite(byte)) => self.write_address(byte),
            (Idle, BusEvent::ByteReadyWrite(byte)) => {
                self.desync("write byte without start");
                self.write_address(byte)
            }
            (AfterAddress | AfterData, BusEvent::ByteReadyWrite(byte)) => self.write_data(byte),

            (AwaitAddress, BusEvent::ByteReadyRead(byte)) => self.read_address(byte, port),
            (Idle, BusEvent::ByteReadyRead(byte)) => {
                self.desync("read byte without start");
                self.read_address(byte, port)
            }
            (AfterAddress | AfterData, BusEvent::ByteReadyRead(_)) => {
                if self.direction != Direction::Read {
                    self.desync("read during write transaction");
                }
                self.supply(port);
                AfterData
            }
        };

        trace!(from = ?self.phase, to = ?next, ?event, "responder step");
        self.phase = next;
        next
    }

    // State 1: address of a write.
    fn write_address(&mut self, byte: u8) -> ResponderPhase {
        self.direction = Direction::Write;
        self.local = self.mask.decode(byte);
        self.rx.on_address_received(self.local);
        if self.delivery == Delivery::Synchronous {
            if let Some(handler) = self.handler.as_mut() {
                handler.on_target(self.local);
            }
        }
        ResponderPhase::AfterAddress
    }

    // State 2: data of a write.
    fn write_data(&mut self, byte: u8) -> ResponderPhase {
        if self.direction != Direction::Write {
            self.desync("write data during read transaction");
            return ResponderPhase::AfterData;
        }
        match self.rx.on_data_received(byte) {
            RxData::Partial => {}
            RxData::Complete(command) => {
                if self.delivery == Delivery::Synchronous {
                    let target = command.target();
                    debug!(local = command.address(), target, value = command.value(), "command received");
                    self.stats.commands += 1;
                    if let Some(handler) = self.handler.as_mut() {
                        if target != command.address() {
                            // Kind names another channel than the address did.
                            handler.on_target(target);
                        }
                        handler.on_command(target, command.value());
                    }
                }
            }
            RxData::Orphan => self.desync("data without staged address"),
        }
        ResponderPhase::AfterData
    }

    // State 3: address of a read.
    fn read_address<P: BusPort>(&mut self, byte: u8, port: &mut P) -> ResponderPhase {
        self.direction = Direction::Read;
        self.local = self.mask.decode(byte);
        self.supply(port);
        ResponderPhase::AfterData
    }

    fn supply<P: BusPort>(&mut self, port: &mut P) {
        port.write(self.registers.value(self.local));
        port.release_clock();
        self.stats.reads_served += 1;
    }

    fn close_transaction(&mut self) {
        self.stats.transactions += 1;
        if self.direction != Direction::Write {
            return;
        }
        match self.delivery {
            Delivery::Queued => {
                if self.rx.on_transaction_end() {
                    self.stats.commands += 1;
                    debug!(local = self.local, "command queued");
                }
            }
            Delivery::Synchronous => self.rx.abandon(),
        }
    }

    fn desync(&mut self, reason: &'static str) {
        self.stats.desync_count += 1;
        warn!(reason, phase = ?self.phase, "responder desync");
    }

    /// Return to the initial state: no transaction, empty receive queue,
    /// zeroed registers. The handler stays registered.
    pub fn reset(&mut self) {
        self.phase = ResponderPhase::Idle;
        self.direction = Direction::Write;
        self.local = 0;
        self.registers.reset();
        self.rx.reset();
        self.stats = ResponderStats::default();
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
