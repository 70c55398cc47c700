//! Command codec.
//!
//! The transmit side serializes commands onto the byte queue and tracks which
//! field of the command in flight goes out next. The receive side rebuilds
//! commands from the bytes a responder sees.

pub mod rx;
pub mod tx;

pub use rx::{RxCodec, RxData};
pub use tx::{TxCodec, TxField};
