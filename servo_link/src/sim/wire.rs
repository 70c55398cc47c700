//! Byte-level model of the two-wire bus between one master and one slave.

use std::collections::VecDeque;

use servo_common::bus::{Direction, StatusFlags, matches_slave};
use servo_common::config::BusConfig;
use tracing::trace;

use crate::bus::BusPort;
use crate::error::LinkError;
use crate::node::{MasterNode, SlaveNode};

/// Idle bus level seen by a receiver when nobody drives it.
const IDLE_BYTE: u8 = 0xFF;

/// Upper bound on wire operations per `settle` call.
const MAX_OPS: usize = 1024;

/// Operation armed by the master's peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireOp {
    Start,
    Stop,
    Write(u8),
    EnableReceive,
    Nack,
}

/// Master-side peripheral: records armed operations.
#[derive(Debug, Default)]
pub struct MasterPort {
    ops: VecDeque<WireOp>,
    rx_buffer: u8,
}

impl BusPort for MasterPort {
    fn start(&mut self) {
        self.ops.push_back(WireOp::Start);
    }

    fn stop(&mut self) {
        self.ops.push_back(WireOp::Stop);
    }

    fn write(&mut self, byte: u8) {
        self.ops.push_back(WireOp::Write(byte));
    }

    fn read(&mut self) -> u8 {
        self.rx_buffer
    }

    fn enable_receive(&mut self) {
        self.ops.push_back(WireOp::EnableReceive);
    }

    fn nack(&mut self) {
        self.ops.push_back(WireOp::Nack);
    }

    fn release_clock(&mut self) {}
}

/// Slave-side peripheral: holds the byte loaded for the next read.
#[derive(Debug, Default)]
pub struct SlavePort {
    tx_buffer: Option<u8>,
}

impl BusPort for SlavePort {
    fn start(&mut self) {}

    fn stop(&mut self) {}

    fn write(&mut self, byte: u8) {
        self.tx_buffer = Some(byte);
    }

    fn read(&mut self) -> u8 {
        IDLE_BYTE
    }

    fn enable_receive(&mut self) {}

    fn nack(&mut self) {}

    // Clock stretching is not modelled.
    fn release_clock(&mut self) {}
}

/// The wire plus both peripherals.
#[derive(Debug)]
pub struct SimWire {
    master: MasterPort,
    slave: SlavePort,
    slave_address: u8,
    address_mask: u8,
    expect_address: bool,
    addressed: bool,
    reading: bool,
    ops: u64,
}

impl SimWire {
    pub fn new(config: &BusConfig) -> Self {
        Self {
            master: MasterPort::default(),
            slave: SlavePort::default(),
            slave_address: config.slave_address,
            address_mask: config.address_mask,
            expect_address: false,
            addressed: false,
            reading: false,
            ops: 0,
        }
    }

    /// Port handed to the master node.
    #[inline]
    pub fn master_port(&mut self) -> &mut MasterPort {
        &mut self.master
    }

    /// Wire operations carried so far.
    #[inline]
    pub const fn ops(&self) -> u64 {
        self.ops
    }

    /// True while no operation is waiting on the wire.
    #[inline]
    pub fn is_quiet(&self) -> bool {
        self.master.ops.is_empty()
    }

    /// Drop pending operations and forget the open transaction.
    pub fn reset(&mut self) {
        self.master = MasterPort::default();
        self.slave = SlavePort::default();
        self.expect_address = false;
        self.addressed = false;
        self.reading = false;
    }

    /// Carry every armed operation, raising the slave's status interrupt and
    /// the master's completion interrupt for each. Returns the number of
    /// operations carried.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::Simulation` if the engines keep the bus busy past
    /// a fixed bound.
    pub fn settle(&mut self, master: &mut MasterNode, slave: &mut SlaveNode<'_>) -> Result<usize, LinkError> {
        let mut carried = 0;
        while let Some(op) = self.master.ops.pop_front() {
            carried += 1;
            if carried > MAX_OPS {
                return Err(LinkError::Simulation(format!(
                    "bus still busy after {MAX_OPS} operations"
                )));
            }
            self.carry(op, slave);
            self.ops += 1;
            master.on_bus_event(&mut self.master);
        }
        Ok(carried)
    }

    fn carry(&mut self, op: WireOp, slave: &mut SlaveNode<'_>) {
        trace!(?op, addressed = self.addressed, "wire op");
        match op {
            WireOp::Start => {
                self.expect_address = true;
                self.addressed = false;
                self.reading = false;
            }

            WireOp::Write(byte) if self.expect_address => {
                self.expect_address = false;
                self.addressed = matches_slave(byte, self.slave_address, self.address_mask);
                self.reading = Direction::of(byte).is_read();
                if self.addressed {
                    let mut status = StatusFlags::S | StatusFlags::BF;
                    if self.reading {
                        status |= StatusFlags::RW;
                    }
                    slave.on_bus_status(status, byte, &mut self.slave);
                }
            }

            WireOp::Write(byte) => {
                if self.addressed && !self.reading {
                    let status = StatusFlags::S | StatusFlags::BF | StatusFlags::DA;
                    slave.on_bus_status(status, byte, &mut self.slave);
                }
            }

            WireOp::EnableReceive => {
                let supplied = if self.addressed && self.reading {
                    self.slave.tx_buffer.take()
                } else {
                    None
                };
                self.master.rx_buffer = supplied.unwrap_or(IDLE_BYTE);
            }

            WireOp::Nack => {}

            WireOp::Stop => {
                if self.addressed {
                    slave.on_bus_status(StatusFlags::P, 0, &mut self.slave);
                }
                self.addressed = false;
                self.expect_address = false;
                self.reading = false;
            }
        }
    }
}
