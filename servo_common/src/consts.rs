//! Protocol-wide constants for the servo link workspace.
//!
//! Single source of truth for queue capacities, address layout and PWM
//! timing. Imported by all crates.

use static_assertions::const_assert;

/// Base bus address byte of the servo slave (direction bit clear).
pub const SLAVE_ADDRESS: u8 = 0b0000_1100;

/// Address match mask of the servo slave. Bits cleared here are not
/// compared, so one slave answers on several bus addresses.
pub const SLAVE_ADDRESS_MASK: u8 = 0b1111_1100;

/// Maximum number of sub-resources a single responder can expose.
pub const MAX_LOCAL_ADDRESSES: usize = 4;

/// Default width of the local sub-address, in bits.
pub const DEFAULT_LOCAL_ADDRESS_BITS: u8 = 1;

/// Widest command on the wire: `[address][kind][value]`.
pub const MAX_FIELD_COUNT: usize = 3;

/// Capacity of the initiator transmit queue, in bytes.
pub const TX_QUEUE_CAPACITY: usize = 16;

/// Capacity of the responder receive queue, in whole commands.
pub const RX_QUEUE_CAPACITY: usize = 4;

/// Number of PWM output channels driven by the duty scheduler.
pub const CHANNEL_COUNT: usize = 2;

/// Default PWM period register value. Compare values are clamped to it.
pub const DEFAULT_PWM_PERIOD: u8 = 200;

/// Nominal PWM period in microseconds.
pub const PWM_PERIOD_US: u32 = 2000;

// A second command must fit behind one that has not drained yet.
const_assert!(TX_QUEUE_CAPACITY >= 2 * MAX_FIELD_COUNT);
// Widest local mask is two bits.
const_assert!(MAX_LOCAL_ADDRESSES >= 1 << 2);
const_assert!(CHANNEL_COUNT <= MAX_LOCAL_ADDRESSES);
