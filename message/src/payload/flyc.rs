//! Flight controller parameter table payloads.
//!
//! A parameter definition response carries three limit fields whose interpretation depends on
//! the parameter's type id. The fixed prefix is read first, then the limit bytes are handed to
//! the parser the type id selects.

use std::{
    borrow::Cow,
    fmt::{
        Display,
        Formatter,
    },
};

use byteorder::{
    ByteOrder,
    LittleEndian,
};
use packed_struct::{
    prelude::*,
    PackingResult,
};

use super::RoutingKey;
use crate::{
    CommandSet,
    Direction,
};

pub const PARAM_DEFINITION_REQUEST: RoutingKey =
    RoutingKey::new(CommandSet::FLYCONTROLLER, Direction::Request, 0xf0);
pub const PARAM_DEFINITION: RoutingKey =
    RoutingKey::new(CommandSet::FLYCONTROLLER, Direction::Response, 0xf0);

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PackedStruct, serde::Serialize, serde::Deserialize,
)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "2", endian = "lsb")]
pub struct ParamDefinitionRequest {
    pub index: u16,
}

/// Status byte alone: there are no more parameters to list.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PackedStruct, serde::Serialize, serde::Deserialize,
)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "1", endian = "lsb")]
pub struct ParamListEnd {
    pub status: u8,
}

/// Fields of a definition that precede the limits.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PackedStruct, serde::Serialize, serde::Deserialize,
)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "7", endian = "lsb")]
pub struct ParamPrefix {
    pub status:    u8,
    pub type_id:   u16,
    pub size:      u16,
    pub attribute: u16,
}

pub const PREFIX_SIZE: usize = 7;
pub const LIMITS_SIZE: usize = 3 * 4;
pub const FIXED_SIZE: usize = PREFIX_SIZE + LIMITS_SIZE;
pub const NAME_MAX: usize = 160;
pub const FULL_SIZE: usize = FIXED_SIZE + NAME_MAX;

/// Smallest payload still read as a full definition; one name byte past the fixed part.
pub const MIN_DEFINITION_SIZE: usize = FIXED_SIZE + 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LimitKind {
    Unsigned,
    Signed,
    Float,
}

impl LimitKind {
    pub const SIGNED_TYPES: std::ops::RangeInclusive<u16> = 4..=7;
    pub const FLOAT_TYPES: std::ops::RangeInclusive<u16> = 8..=9;

    pub fn for_type_id(type_id: u16) -> Self {
        if Self::SIGNED_TYPES.contains(&type_id) {
            LimitKind::Signed
        } else if Self::FLOAT_TYPES.contains(&type_id) {
            LimitKind::Float
        } else {
            LimitKind::Unsigned
        }
    }

    pub fn unpack(self, src: &[u8; LIMITS_SIZE]) -> Limits {
        match self {
            LimitKind::Unsigned => unsigned_limits(src),
            LimitKind::Signed => signed_limits(src),
            LimitKind::Float => float_limits(src),
        }
    }
}

/// Minimum, maximum and default of a parameter, in the encoding its type calls for.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Limits {
    Unsigned { min: u32, max: u32, default: u32 },
    Signed { min: i32, max: i32, default: i32 },
    Float { min: f32, max: f32, default: f32 },
}

fn unsigned_limits(src: &[u8; LIMITS_SIZE]) -> Limits {
    Limits::Unsigned {
        min:     LittleEndian::read_u32(&src[0..4]),
        max:     LittleEndian::read_u32(&src[4..8]),
        default: LittleEndian::read_u32(&src[8..12]),
    }
}

fn signed_limits(src: &[u8; LIMITS_SIZE]) -> Limits {
    Limits::Signed {
        min:     LittleEndian::read_i32(&src[0..4]),
        max:     LittleEndian::read_i32(&src[4..8]),
        default: LittleEndian::read_i32(&src[8..12]),
    }
}

fn float_limits(src: &[u8; LIMITS_SIZE]) -> Limits {
    Limits::Float {
        min:     LittleEndian::read_f32(&src[0..4]),
        max:     LittleEndian::read_f32(&src[4..8]),
        default: LittleEndian::read_f32(&src[8..12]),
    }
}

impl Limits {
    pub fn kind(&self) -> LimitKind {
        match self {
            Limits::Unsigned { .. } => LimitKind::Unsigned,
            Limits::Signed { .. } => LimitKind::Signed,
            Limits::Float { .. } => LimitKind::Float,
        }
    }

    pub fn pack(&self) -> [u8; LIMITS_SIZE] {
        let mut out = [0u8; LIMITS_SIZE];
        let (min, rest) = out.split_at_mut(4);
        let (max, default) = rest.split_at_mut(4);

        match *self {
            Limits::Unsigned { min: lo, max: hi, default: def } => {
                LittleEndian::write_u32(min, lo);
                LittleEndian::write_u32(max, hi);
                LittleEndian::write_u32(default, def);
            },
            Limits::Signed { min: lo, max: hi, default: def } => {
                LittleEndian::write_i32(min, lo);
                LittleEndian::write_i32(max, hi);
                LittleEndian::write_i32(default, def);
            },
            Limits::Float { min: lo, max: hi, default: def } => {
                LittleEndian::write_f32(min, lo);
                LittleEndian::write_f32(max, hi);
                LittleEndian::write_f32(default, def);
            },
        }

        out
    }
}

impl Display for Limits {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Limits::Unsigned { min, max, default } => write!(f, "[{min}, {max}] default {default}"),
            Limits::Signed { min, max, default } => write!(f, "[{min}, {max}] default {default}"),
            Limits::Float { min, max, default } => write!(f, "[{min}, {max}] default {default}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParamDefinition {
    pub status:    u8,
    pub type_id:   u16,
    pub size:      u16,
    pub attribute: u16,
    pub limits:    Limits,
    /// Name bytes up to the first NUL, as carried on the wire.
    pub name:      Vec<u8>,
}

impl ParamDefinition {
    /// Reads a definition from a payload that may stop anywhere inside the name field.
    ///
    /// Missing bytes are taken as zero. Returns `None` when not even one name byte is present.
    pub fn from_partial(payload: &[u8]) -> PackingResult<Option<Self>> {
        if payload.len() < MIN_DEFINITION_SIZE {
            return Ok(None);
        }

        let mut padded = [0u8; FULL_SIZE];
        let len = payload.len().min(FULL_SIZE);
        padded[..len].copy_from_slice(&payload[..len]);

        Self::unpack_from_slice(&padded).map(Some)
    }

    /// The name as text, with invalid UTF-8 replaced.
    #[inline]
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    #[inline]
    pub fn prefix(&self) -> ParamPrefix {
        ParamPrefix {
            status:    self.status,
            type_id:   self.type_id,
            size:      self.size,
            attribute: self.attribute,
        }
    }
}

impl PackedStructSlice for ParamDefinition {
    fn pack_to_slice(&self, output: &mut [u8]) -> PackingResult<()> {
        if output.len() != FULL_SIZE {
            return Err(PackingError::BufferTooSmall);
        }

        let (prefix, rest) = output.split_at_mut(PREFIX_SIZE);
        let (limits, name) = rest.split_at_mut(LIMITS_SIZE);

        self.prefix().pack_to_slice(prefix)?;
        limits.copy_from_slice(&self.limits.pack());
        super::write_c_str(name, &self.name);

        Ok(())
    }

    #[tracing::instrument(skip(src), fields(src.len = src.len()), err, level = "trace")]
    fn unpack_from_slice(src: &[u8]) -> PackingResult<Self> {
        if src.len() < FULL_SIZE {
            return Err(PackingError::BufferTooSmall);
        }

        let prefix = ParamPrefix::unpack_from_slice(&src[..PREFIX_SIZE])?;

        let mut limit_bytes = [0u8; LIMITS_SIZE];
        limit_bytes.copy_from_slice(&src[PREFIX_SIZE..FIXED_SIZE]);

        let kind = LimitKind::for_type_id(prefix.type_id);
        tracing::trace!(type_id = prefix.type_id, ?kind, "selected limit encoding");

        Ok(Self {
            status:    prefix.status,
            type_id:   prefix.type_id,
            size:      prefix.size,
            attribute: prefix.attribute,
            limits:    kind.unpack(&limit_bytes),
            name:      super::c_str(&src[FIXED_SIZE..FULL_SIZE]).to_vec(),
        })
    }

    #[inline]
    fn packed_bytes_size(_opt_self: Option<&Self>) -> PackingResult<usize> {
        Ok(FULL_SIZE)
    }
}

impl Display for ParamDefinition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "param {:?}: type {}, size {}, attr {:#06x}, limits {}",
            self.name(),
            self.type_id,
            self.size,
            self.attribute,
            self.limits
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn definition_bytes(type_id: u16, limits: [[u8; 4]; 3], name: &[u8]) -> Vec<u8> {
        let mut out = vec![0x00];
        out.extend_from_slice(&type_id.to_le_bytes());
        out.extend_from_slice(&4u16.to_le_bytes());
        out.extend_from_slice(&0x0102u16.to_le_bytes());
        limits.iter().for_each(|l| out.extend_from_slice(l));
        out.extend_from_slice(name);

        out
    }

    #[test]
    fn sizes() {
        assert_eq!(FIXED_SIZE, 19);
        assert_eq!(FULL_SIZE, 179);
    }

    #[test]
    fn limit_kind_ranges() {
        let kinds = (0..12).map(LimitKind::for_type_id).collect::<Vec<_>>();

        use LimitKind::*;
        assert_eq!(
            kinds,
            vec![
                Unsigned, Unsigned, Unsigned, Unsigned, Signed, Signed, Signed, Signed, Float,
                Float, Unsigned, Unsigned
            ]
        );
    }

    #[test]
    fn signed_definition() {
        let bytes = definition_bytes(
            4,
            [(-10i32).to_le_bytes(), 10i32.to_le_bytes(), 0i32.to_le_bytes()],
            b"g_config_x\0",
        );

        let def = ParamDefinition::from_partial(&bytes).unwrap().unwrap();

        assert_eq!(def.limits, Limits::Signed { min: -10, max: 10, default: 0 });
        assert_eq!(def.name(), "g_config_x");
        assert_eq!(def.size, 4);
        assert_eq!(def.attribute, 0x0102);
    }

    #[test]
    fn name_may_be_cut_short() {
        let bytes = definition_bytes(2, [[1, 0, 0, 0], [2, 0, 0, 0], [3, 0, 0, 0]], b"ab");
        let def = ParamDefinition::from_partial(&bytes).unwrap().unwrap();

        assert_eq!(def.limits, Limits::Unsigned { min: 1, max: 2, default: 3 });
        assert_eq!(def.name, b"ab");

        assert_eq!(ParamDefinition::from_partial(&bytes[..FIXED_SIZE]), Ok(None));
    }

    #[test]
    fn trailing_bytes_ignored() {
        let mut bytes = definition_bytes(9, [[0; 4]; 3], &[b'n'; NAME_MAX]);
        bytes.extend_from_slice(b"trailing");

        let def = ParamDefinition::from_partial(&bytes).unwrap().unwrap();
        assert_eq!(def.name.len(), NAME_MAX);
        assert_eq!(def.limits.kind(), LimitKind::Float);
    }

    #[test]
    fn pack_pads_name() {
        let def = ParamDefinition {
            status:    0,
            type_id:   8,
            size:      4,
            attribute: 0,
            limits:    Limits::Float { min: 0.5, max: 1.5, default: 1.0 },
            name:      b"speed".to_vec(),
        };

        let packed = def.pack_to_vec().unwrap();
        assert_eq!(packed.len(), FULL_SIZE);
        assert_eq!(&packed[FIXED_SIZE..FIXED_SIZE + 6], b"speed\0");
        assert_eq!(ParamDefinition::unpack_from_slice(&packed), Ok(def));
    }

    #[test]
    fn non_utf8_name_repacks_unchanged() {
        let bytes = definition_bytes(1, [[0; 4]; 3], &[0x61, 0xff, 0x62, 0x00]);
        let def = ParamDefinition::from_partial(&bytes).unwrap().unwrap();

        assert_eq!(def.name, [0x61u8, 0xff, 0x62]);
        assert_eq!(def.name(), "a\u{fffd}b");

        let packed = def.pack_to_vec().unwrap();
        assert_eq!(&packed[..bytes.len()], bytes.as_slice());
        assert!(packed[bytes.len()..].iter().all(|&b| b == 0));
    }
}
