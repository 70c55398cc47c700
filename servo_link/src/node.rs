//! Interrupt glue for the two boards.
//!
//! Each node owns the engines of one board and exposes one entry point per
//! interrupt source. Hardware bring-up and the run loop stay outside.

pub mod master;
pub mod slave;

pub use master::{MasterNode, ReadingLatch};
pub use slave::SlaveNode;

use crate::duty::Channel;

/// PWM compare registers, loaded once per timer period.
pub trait PwmOutputs {
    fn load_compare(&mut self, channel: Channel, duty: u8);
}
