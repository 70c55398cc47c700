//! In-process two-wire bus simulation.
//!
//! Connects a [`MasterNode`](crate::node::MasterNode) and a
//! [`SlaveNode`](crate::node::SlaveNode) through a byte-level wire model so
//! whole transactions run without hardware. The wire turns each operation the
//! master arms into the status snapshot the slave peripheral would raise, then
//! raises the master's completion interrupt.

pub mod config;
pub mod rig;
pub mod runner;
pub mod wire;

pub use config::{LinkConfig, SimulationConfig, WaveformConfig};
pub use rig::{CompareRegisters, Rig};
pub use runner::{Simulation, SimulationReport};
pub use wire::{SimWire, WireOp};
