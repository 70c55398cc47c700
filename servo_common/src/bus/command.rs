//! Logical commands and their wire encodings.
//!
//! Two encodings share one layout rule: the address byte always comes first
//! and the value byte always comes last. The 3-byte encoding inserts the
//! command kind between them: `[address][kind][value]`.

use serde::{Deserialize, Serialize};

use super::address::{Address, CommandKind, Direction};

/// Number of fields per command on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// `[address][value]`
    #[default]
    TwoByte,
    /// `[address][kind][value]`
    ThreeByte,
}

impl Encoding {
    #[inline]
    pub const fn field_count(self) -> usize {
        match self {
            Self::TwoByte => 2,
            Self::ThreeByte => 3,
        }
    }

    #[inline]
    pub const fn has_kind(self) -> bool {
        matches!(self, Self::ThreeByte)
    }
}

/// A logical bus command.
///
/// On the transmit side `address` is the full address byte (direction bit
/// included). Once received, it holds the decoded local sub-address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Command {
    address: u8,
    kind: Option<u8>,
    value: u8,
}

impl Command {
    /// Build a command; the kind is implied by the address.
    pub const fn new(address: Address, value: u8) -> Self {
        let kind = match CommandKind::for_address(address) {
            Some(kind) => Some(kind as u8),
            None => None,
        };
        Self {
            address: address.raw(),
            kind,
            value,
        }
    }

    /// Build a command with an explicit kind.
    pub const fn with_kind(address: Address, kind: CommandKind, value: u8) -> Self {
        Self {
            address: address.raw(),
            kind: Some(kind as u8),
            value,
        }
    }

    /// Read request; the value byte is a placeholder.
    pub const fn read(address: Address) -> Self {
        Self::new(address, 0)
    }

    pub const fn from_raw(address: u8, kind: Option<u8>, value: u8) -> Self {
        Self {
            address,
            kind,
            value,
        }
    }

    #[inline]
    pub const fn address(&self) -> u8 {
        self.address
    }

    #[inline]
    pub const fn raw_kind(&self) -> Option<u8> {
        self.kind
    }

    #[inline]
    pub fn kind(&self) -> Option<CommandKind> {
        self.kind.and_then(CommandKind::from_u8)
    }

    #[inline]
    pub const fn value(&self) -> u8 {
        self.value
    }

    /// Local sub-address a received command applies to. A known kind
    /// names its channel; otherwise the addressed sub-resource is used.
    #[inline]
    pub fn target(&self) -> u8 {
        self.kind().map_or(self.address, CommandKind::local_address)
    }

    #[inline]
    pub const fn direction(&self) -> Direction {
        Direction::of(self.address)
    }

    /// Bytes of this command in wire order for `encoding`.
    ///
    /// A missing kind is sent as zero in the 3-byte encoding.
    pub fn wire_bytes(&self, encoding: Encoding) -> impl Iterator<Item = u8> {
        let kind = encoding.has_kind().then(|| self.kind.unwrap_or(0));
        core::iter::once(self.address)
            .chain(kind)
            .chain(core::iter::once(self.value))
    }
}
