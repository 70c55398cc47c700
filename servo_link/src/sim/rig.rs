//! A master and a slave wired together.

use servo_common::config::BusConfig;

use super::wire::SimWire;
use crate::duty::{Channel, DutyScheduler};
use crate::error::LinkError;
use crate::node::{MasterNode, PwmOutputs, SlaveNode};

/// Compare registers of the simulated PWM timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareRegisters {
    values: [u8; 2],
}

impl CompareRegisters {
    #[inline]
    pub const fn get(&self, channel: Channel) -> u8 {
        self.values[channel as usize]
    }

    #[inline]
    pub const fn values(&self) -> [u8; 2] {
        self.values
    }
}

impl PwmOutputs for CompareRegisters {
    fn load_compare(&mut self, channel: Channel, duty: u8) {
        self.values[channel.index()] = duty;
    }
}

/// Master and slave nodes sharing one simulated bus.
#[derive(Debug)]
pub struct Rig<'a> {
    master: MasterNode,
    slave: SlaveNode<'a>,
    wire: SimWire,
    compare: CompareRegisters,
}

impl<'a> Rig<'a> {
    pub fn new(config: &BusConfig, duty: &'a DutyScheduler) -> Self {
        Self {
            master: MasterNode::new(config.encoding),
            slave: SlaveNode::new(config, duty),
            wire: SimWire::new(config),
            compare: CompareRegisters::default(),
        }
    }

    /// Press the button routing master samples to `channel`.
    pub fn select_target(&mut self, channel: Channel) {
        self.master.select_target(channel);
    }

    /// Master ADC completion. The transaction runs on the next `settle`.
    ///
    /// # Errors
    ///
    /// Propagates `LinkError::QueueFull` from the master.
    pub fn master_sample(&mut self, sample: u8) -> Result<(), LinkError> {
        self.master.on_sample(sample, self.wire.master_port())
    }

    /// Master poll timer.
    ///
    /// # Errors
    ///
    /// Propagates `LinkError::QueueFull` from the master.
    pub fn poll_remote(&mut self) -> Result<(), LinkError> {
        self.master.poll_remote(self.wire.master_port())
    }

    /// Slave ADC completion.
    pub fn slave_sample(&mut self, sample: u8) {
        self.slave.on_sample(sample);
    }

    /// Run the bus until no operation is pending, then let the slave main
    /// loop drain queued commands.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::Simulation` if the bus never goes quiet.
    pub fn settle(&mut self) -> Result<usize, LinkError> {
        let carried = self.wire.settle(&mut self.master, &mut self.slave)?;
        self.slave.poll();
        Ok(carried)
    }

    /// Slave PWM period interrupt. Returns the loaded compare registers.
    pub fn pwm_tick(&mut self) -> CompareRegisters {
        self.slave.on_pwm_tick(&mut self.compare);
        self.compare
    }

    #[inline]
    pub fn master(&self) -> &MasterNode {
        &self.master
    }

    #[inline]
    pub fn slave(&self) -> &SlaveNode<'a> {
        &self.slave
    }

    #[inline]
    pub fn wire(&self) -> &SimWire {
        &self.wire
    }

    /// Reset both nodes and idle the wire.
    pub fn reset(&mut self) {
        self.master.reset();
        self.slave.reset();
        self.wire.reset();
        self.compare = CompareRegisters::default();
    }
}
