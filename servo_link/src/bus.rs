//! Bus engines and the seams they drive.
//!
//! Both engines are explicit objects stepped once per qualifying bus
//! interrupt. Hardware access goes through [`BusPort`]; completed commands
//! leave through a [`CommandHandler`].

pub mod handler;
pub mod initiator;
pub mod port;
pub mod responder;

pub use handler::{CommandHandler, FnHandler};
pub use initiator::{Initiator, InitiatorState, InitiatorStats};
pub use port::{BusAction, BusPort, RecordingPort};
pub use responder::{RegisterTable, Responder, ResponderPhase, ResponderStats};
