//! # Servo Link
//!
//! Two-wire command transport between a master board that samples servo
//! targets and a slave board that renders them as pulse widths.
//!
//! # Module Structure
//!
//! - [`queue`] - Fixed-capacity byte FIFO
//! - [`codec`] - Command (de)serialization and field tracking
//! - [`bus`] - Bus port seam, command handlers, initiator and responder engines
//! - [`duty`] - Dual-channel duty scheduler
//! - [`node`] - Interrupt glue for the master and slave boards
//! - [`sim`] - In-process two-wire bus simulation
//! - [`error`] - Error types
//!
//! # Architecture
//!
//! ```text
//!  master                                   slave
//! ┌───────────────────────────────┐        ┌───────────────────────────────┐
//! │ sample ─► TxCodec ─► queue    │        │ StatusDecoder ─► Responder    │
//! │                       │       │        │                   │           │
//! │ latch ◄── Initiator ◄─┘       │  bus   │   handler ◄───────┤ RxCodec   │
//! │              │                │◄──────►│      │                        │
//! │              ▼                │        │      ▼                        │
//! │           BusPort             │        │ DutyScheduler ─► compare regs │
//! └───────────────────────────────┘        └───────────────────────────────┘
//! ```
//!
//! Every engine is stepped once per bus interrupt and never blocks.

pub mod bus;
pub mod codec;
pub mod duty;
pub mod error;
pub mod node;
pub mod queue;
pub mod sim;

pub use crate::bus::{BusPort, CommandHandler, FnHandler, Initiator, Responder};
pub use crate::codec::{RxCodec, TxCodec};
pub use crate::duty::{Channel, DutyScheduler};
pub use crate::error::LinkError;
pub use crate::node::{MasterNode, PwmOutputs, SlaveNode};
pub use crate::queue::CommandQueue;
