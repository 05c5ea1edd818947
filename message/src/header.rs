use std::fmt::{
    Display,
    Formatter,
};

use packed_struct::{
    prelude::*,
    PackedStructInfo,
    PackingResult,
};

use crate::{
    checksum::Checksum,
    AckType,
    CommandSet,
    DeviceType,
    Direction,
    EncryptType,
    RoutingKey,
    StartMarker,
};

pub const SIZE_BYTES: usize = 11;

/// Number of leading header bytes the header checksum covers.
pub const CHECKSUM_COVERAGE: usize = 3;

pub const DEFAULT_VERSION: u8 = 1;

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PackedStruct, serde::Serialize, serde::Deserialize,
)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "11", endian = "lsb")]
pub struct Header {
    #[packed_field(size_bytes = "1")]
    pub marker:         StartMarker,
    #[packed_field(size_bytes = "2")]
    pub version_length: VersionLength,
    pub checksum:       u8,
    #[packed_field(size_bytes = "1")]
    pub sender:         ModuleInfo,
    #[packed_field(size_bytes = "1")]
    pub receiver:       ModuleInfo,
    pub seq:            u16,
    #[packed_field(size_bytes = "1")]
    pub ty:             CommandType,
    #[packed_field(size_bytes = "1")]
    pub cmd_set:        CommandSet,
    pub cmd_id:         u8,
}

impl Header {
    /// A header with every routing and command field zeroed.
    pub fn with_length(version: u8, total_length: u16) -> Self {
        Self {
            marker:         StartMarker,
            version_length: VersionLength {
                version,
                length: total_length,
            },
            checksum:       0,
            sender:         Default::default(),
            receiver:       Default::default(),
            seq:            0,
            ty:             Default::default(),
            cmd_set:        CommandSet::GENERAL,
            cmd_id:         0,
        }
    }

    #[inline]
    pub fn total_length(&self) -> usize {
        self.version_length.length() as usize
    }

    #[inline]
    pub fn version(&self) -> u8 {
        self.version_length.version()
    }

    #[inline]
    pub fn routing_key(&self) -> RoutingKey {
        RoutingKey {
            cmd_set:   self.cmd_set,
            direction: self.ty.direction,
            cmd_id:    self.cmd_id,
        }
    }

    /// Checksum over the marker and the packed version/length word.
    pub fn compute_checksum<C>(&self) -> PackingResult<u8>
    where
        C: Checksum<Output = u8>,
    {
        let packed = self.pack()?;
        Ok(C::checksum(&packed[..CHECKSUM_COVERAGE]))
    }

    /// One-line summary of the header. `Display` is taken by the `PackedStruct` derive.
    pub fn display(&self) -> String {
        let ty = &self.ty;

        format!(
            "{} -> {} [seq {}]: {} {}/{:#04x} (v{}, {} bytes, ack {}, enc {})",
            self.sender,
            self.receiver,
            self.seq,
            ty.direction,
            self.cmd_set,
            self.cmd_id,
            self.version(),
            self.total_length(),
            ty.ack,
            ty.encrypt,
        )
    }
}

/// Protocol version and total packet length sharing one little-endian word.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct VersionLength {
    pub version: u8,
    pub length:  u16,
}

impl VersionLength {
    pub const LENGTH_BITS: u32 = 10;
    pub const LENGTH_MASK: u16 = (1 << Self::LENGTH_BITS) - 1;
    pub const MAX_LENGTH: usize = Self::LENGTH_MASK as usize;

    pub const VERSION_BITS: u32 = 6;
    pub const VERSION_SHIFT: u32 = Self::LENGTH_BITS;
    pub const VERSION_MASK: u16 = (1 << Self::VERSION_BITS) - 1;

    #[inline]
    pub fn version(&self) -> u8 {
        (u16::from(self.version) & Self::VERSION_MASK) as u8
    }

    #[inline]
    pub fn length(&self) -> u16 {
        self.length & Self::LENGTH_MASK
    }

    #[inline]
    fn word(&self) -> u16 {
        self.length() | (u16::from(self.version()) << Self::VERSION_SHIFT)
    }
}

impl PackedStruct for VersionLength {
    type ByteArray = [u8; 2];

    #[inline]
    fn pack(&self) -> PackingResult<Self::ByteArray> {
        Ok(self.word().to_le_bytes())
    }

    #[inline]
    fn unpack(src: &Self::ByteArray) -> PackingResult<Self> {
        let word = u16::from_le_bytes(*src);

        Ok(Self {
            version: ((word >> Self::VERSION_SHIFT) & Self::VERSION_MASK) as u8,
            length:  word & Self::LENGTH_MASK,
        })
    }
}

impl PackedStructInfo for VersionLength {
    #[inline]
    fn packed_bits() -> usize {
        16
    }
}

/// Device type in the low 5 bits, module index in the high 3.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ModuleInfo {
    pub device: DeviceType,
    pub index:  u8,
}

impl ModuleInfo {
    pub const DEVICE_MASK: u8 = (1 << DeviceType::BITS) - 1;

    pub const INDEX_BITS: u32 = 3;
    pub const INDEX_SHIFT: u32 = DeviceType::BITS;
    pub const INDEX_MASK: u8 = (1 << Self::INDEX_BITS) - 1;

    #[inline]
    pub const fn new(device: DeviceType, index: u8) -> Self {
        Self {
            device,
            index,
        }
    }

    #[inline]
    pub fn to_byte(self) -> u8 {
        (self.device.value() & Self::DEVICE_MASK)
            | ((self.index & Self::INDEX_MASK) << Self::INDEX_SHIFT)
    }

    #[inline]
    pub fn from_byte(b: u8) -> Self {
        Self {
            device: DeviceType(b & Self::DEVICE_MASK),
            index:  (b >> Self::INDEX_SHIFT) & Self::INDEX_MASK,
        }
    }
}

impl PackedStruct for ModuleInfo {
    type ByteArray = [u8; 1];

    #[inline]
    fn pack(&self) -> PackingResult<Self::ByteArray> {
        Ok([self.to_byte()])
    }

    #[inline]
    fn unpack(src: &Self::ByteArray) -> PackingResult<Self> {
        Ok(Self::from_byte(src[0]))
    }
}

impl PackedStructInfo for ModuleInfo {
    #[inline]
    fn packed_bits() -> usize {
        8
    }
}

impl Display for ModuleInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.device, self.index)
    }
}

/// Direction, acknowledgement policy and encryption scheme of a packet.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct CommandType {
    pub direction: Direction,
    pub ack:       AckType,
    pub encrypt:   EncryptType,

    /// Bits 3 and 4. Written as given, which is zero for anything the builder produces.
    #[serde(default)]
    pub reserved: u8,
}

impl CommandType {
    pub const ENCRYPT_MASK: u8 = (1 << EncryptType::BITS) - 1;

    pub const RESERVED_SHIFT: u32 = EncryptType::BITS;
    pub const RESERVED_MASK: u8 = 0b11;

    pub const ACK_SHIFT: u32 = 5;
    pub const ACK_MASK: u8 = (1 << AckType::BITS) - 1;

    pub const DIRECTION_SHIFT: u32 = 7;

    #[inline]
    pub fn to_byte(self) -> u8 {
        (self.encrypt.value() & Self::ENCRYPT_MASK)
            | ((self.reserved & Self::RESERVED_MASK) << Self::RESERVED_SHIFT)
            | ((self.ack.value() & Self::ACK_MASK) << Self::ACK_SHIFT)
            | (self.direction.bit() << Self::DIRECTION_SHIFT)
    }

    #[inline]
    pub fn from_byte(b: u8) -> Self {
        Self {
            direction: Direction::from_bit(b >> Self::DIRECTION_SHIFT),
            ack:       AckType((b >> Self::ACK_SHIFT) & Self::ACK_MASK),
            encrypt:   EncryptType(b & Self::ENCRYPT_MASK),
            reserved:  (b >> Self::RESERVED_SHIFT) & Self::RESERVED_MASK,
        }
    }
}

impl PackedStruct for CommandType {
    type ByteArray = [u8; 1];

    #[inline]
    fn pack(&self) -> PackingResult<Self::ByteArray> {
        Ok([self.to_byte()])
    }

    #[inline]
    fn unpack(src: &Self::ByteArray) -> PackingResult<Self> {
        Ok(Self::from_byte(src[0]))
    }
}

impl PackedStructInfo for CommandType {
    #[inline]
    fn packed_bits() -> usize {
        8
    }
}

impl PackedStruct for CommandSet {
    type ByteArray = [u8; 1];

    #[inline]
    fn pack(&self) -> PackingResult<Self::ByteArray> {
        Ok([self.value()])
    }

    #[inline]
    fn unpack(src: &Self::ByteArray) -> PackingResult<Self> {
        Ok(CommandSet(src[0]))
    }
}

impl PackedStructInfo for CommandSet {
    #[inline]
    fn packed_bits() -> usize {
        8
    }
}
