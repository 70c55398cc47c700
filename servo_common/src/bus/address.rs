//! Bus addresses and local sub-address decoding.
//!
//! The low bit of every address byte on the wire is the read/write direction.
//! A responder that answers on several bus addresses identifies the targeted
//! sub-resource from the bits just above it (the local sub-address).

/// Transfer direction encoded in bit 0 of an address byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// Initiator sends data to the responder.
    Write = 0,
    /// Initiator reads data from the responder.
    Read = 1,
}

impl Direction {
    /// Direction carried by a raw address byte.
    #[inline]
    pub const fn of(raw: u8) -> Self {
        if raw & 1 == 1 { Self::Read } else { Self::Write }
    }

    #[inline]
    pub const fn is_read(self) -> bool {
        matches!(self, Self::Read)
    }
}

/// Bus addresses understood by the servo slave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Address {
    /// Read the slave's potentiometer (local 0, read).
    ReadPotentiometer = 0b0000_1101,
    /// Write servo channel 0 (local 0, write).
    WriteServo0 = 0b0000_1100,
    /// Write servo channel 1 (local 1, write).
    WriteServo1 = 0b0000_1110,
}

impl Address {
    /// Convert from a raw address byte. Returns `None` for unknown bytes.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0b0000_1101 => Some(Self::ReadPotentiometer),
            0b0000_1100 => Some(Self::WriteServo0),
            0b0000_1110 => Some(Self::WriteServo1),
            _ => None,
        }
    }

    /// Raw address byte as clocked on the wire.
    #[inline]
    pub const fn raw(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn direction(self) -> Direction {
        Direction::of(self as u8)
    }
}

/// Logical channel targeted by a command (3-byte encoding only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandKind {
    /// First servo channel.
    Servo1 = 64,
    /// Second servo channel.
    Servo2 = 65,
}

impl CommandKind {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            64 => Some(Self::Servo1),
            65 => Some(Self::Servo2),
            _ => None,
        }
    }

    /// Local sub-address of the channel this kind targets.
    #[inline]
    pub const fn local_address(self) -> u8 {
        match self {
            Self::Servo1 => 0,
            Self::Servo2 => 1,
        }
    }

    /// Kind implied by a write address, if any.
    #[inline]
    pub const fn for_address(address: Address) -> Option<Self> {
        match address {
            Address::WriteServo0 => Some(Self::Servo1),
            Address::WriteServo1 => Some(Self::Servo2),
            Address::ReadPotentiometer => None,
        }
    }
}

/// Mask selecting the local sub-address bits of a shifted address byte.
///
/// One bit distinguishes two sub-resources, two bits distinguish four.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalAddressMask {
    bits: u8,
}

impl LocalAddressMask {
    /// Mask one bit wide (two sub-resources).
    pub const ONE_BIT: Self = Self { bits: 1 };
    /// Mask two bits wide (four sub-resources).
    pub const TWO_BITS: Self = Self { bits: 2 };

    /// Build a mask of `bits` width. Only 1 and 2 are valid.
    #[inline]
    pub const fn new(bits: u8) -> Option<Self> {
        match bits {
            1 | 2 => Some(Self { bits }),
            _ => None,
        }
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.bits
    }

    #[inline]
    pub const fn mask(self) -> u8 {
        (1 << self.bits) - 1
    }

    /// Number of sub-resources this mask can address.
    #[inline]
    pub const fn capacity(self) -> usize {
        1 << self.bits
    }

    /// Local sub-address of a raw bus byte. Bit 0 (direction) is discarded.
    #[inline]
    pub const fn decode(self, raw: u8) -> u8 {
        (raw >> 1) & self.mask()
    }
}

impl Default for LocalAddressMask {
    fn default() -> Self {
        Self::ONE_BIT
    }
}

/// Returns true if `raw` is one of the addresses answered by a slave with
/// base address `base` and match mask `mask`. The direction bit never takes
/// part in the comparison.
#[inline]
pub const fn matches_slave(raw: u8, base: u8, mask: u8) -> bool {
    let mask = mask & 0xFE;
    (raw & mask) == (base & mask)
}
