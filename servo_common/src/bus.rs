//! Two-wire bus vocabulary.
//!
//! - `address`: bus addresses, direction bit, local sub-address decoding.
//! - `command`: logical commands and their wire encodings.
//! - `event`: bus events and the hardware status flags they are built from.

pub mod address;
pub mod command;
pub mod event;

pub use address::{Address, CommandKind, Direction, LocalAddressMask, matches_slave};
pub use command::{Command, Encoding};
pub use event::{BusEvent, StatusDecoder, StatusFlags};
