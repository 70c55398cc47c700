//! Master board: samples a potentiometer, writes it to the selected servo
//! and periodically reads the slave's potentiometer back.

use servo_common::bus::{Address, Command, Encoding};
use tracing::{debug, info};

use crate::bus::{BusPort, CommandHandler, Initiator};
use crate::duty::Channel;
use crate::error::LinkError;

/// Latches the last value read from the slave.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadingLatch {
    last: Option<(u8, u8)>,
    count: u64,
}

impl ReadingLatch {
    /// Last `(address, value)` read, if any.
    #[inline]
    pub const fn last(&self) -> Option<(u8, u8)> {
        self.last
    }

    #[inline]
    pub const fn count(&self) -> u64 {
        self.count
    }
}

impl CommandHandler for ReadingLatch {
    fn on_command(&mut self, address: u8, value: u8) {
        self.last = Some((address, value));
        self.count += 1;
    }
}

/// Master board engines.
#[derive(Debug)]
pub struct MasterNode {
    initiator: Initiator<ReadingLatch>,
    target: Address,
}

impl MasterNode {
    pub fn new(encoding: Encoding) -> Self {
        let mut initiator = Initiator::new(encoding);
        initiator.set_command_handler(ReadingLatch::default());
        Self {
            initiator,
            target: Address::WriteServo0,
        }
    }

    /// Button press: route the following samples to `channel`.
    pub fn select_target(&mut self, channel: Channel) {
        self.target = match channel {
            Channel::Servo0 => Address::WriteServo0,
            Channel::Servo1 => Address::WriteServo1,
        };
        info!(target_address = self.target.raw(), "servo target selected");
    }

    #[inline]
    pub const fn target(&self) -> Address {
        self.target
    }

    /// ADC conversion complete: write the sample to the selected servo.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::QueueFull` if the bus is backed up.
    pub fn on_sample<P: BusPort>(&mut self, sample: u8, port: &mut P) -> Result<(), LinkError> {
        debug!(sample, target_address = self.target.raw(), "sample submitted");
        self.initiator.submit(&Command::new(self.target, sample), port)
    }

    /// Poll timer: read the slave's potentiometer.
    ///
    /// # Errors
    ///
    /// Returns `LinkError::QueueFull` if the bus is backed up.
    pub fn poll_remote<P: BusPort>(&mut self, port: &mut P) -> Result<(), LinkError> {
        self.initiator
            .submit(&Command::read(Address::ReadPotentiometer), port)
    }

    /// Bus interrupt.
    #[inline]
    pub fn on_bus_event<P: BusPort>(&mut self, port: &mut P) {
        self.initiator.step(port);
    }

    /// Last potentiometer value read from the slave.
    pub fn remote_reading(&self) -> Option<u8> {
        self.latch().and_then(|l| l.last()).map(|(_, value)| value)
    }

    pub fn latch(&self) -> Option<&ReadingLatch> {
        self.initiator.handler()
    }

    #[inline]
    pub fn initiator(&self) -> &Initiator<ReadingLatch> {
        &self.initiator
    }

    pub fn reset(&mut self) {
        self.initiator.reset();
        self.initiator.set_command_handler(ReadingLatch::default());
        self.target = Address::WriteServo0;
    }
}
