//! Prelude module for common re-exports.
//!
//! ```rust
//! use servo_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{BusConfig, ConfigError, ConfigLoader, Delivery, LogLevel, SharedConfig};

// ─── Wire vocabulary ────────────────────────────────────────────────
pub use crate::bus::{
    Address, BusEvent, Command, CommandKind, Direction, Encoding, LocalAddressMask, StatusDecoder,
    StatusFlags,
};

// ─── Constants ──────────────────────────────────────────────────────
pub use crate::consts::{CHANNEL_COUNT, MAX_FIELD_COUNT, RX_QUEUE_CAPACITY, TX_QUEUE_CAPACITY};
