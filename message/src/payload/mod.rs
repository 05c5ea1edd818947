//! Structured payloads and the catalog that recognizes them.

use std::{
    borrow::Cow,
    fmt::{
        Display,
        Formatter,
    },
};

use packed_struct::{
    PackedStructSlice,
    PackingResult,
};

use crate::{
    CommandSet,
    Direction,
};

pub mod catalog;
pub mod flyc;
pub mod general;

pub use catalog::{
    resolve,
    Resolution,
};
pub use flyc::{
    Limits,
    ParamDefinition,
    ParamDefinitionRequest,
    ParamListEnd,
};
pub use general::{
    ChipRebootResponse,
    VersionInquiryResponse,
};

/// Header fields that decide how a payload is shaped.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct RoutingKey {
    pub cmd_set:   CommandSet,
    pub direction: Direction,
    pub cmd_id:    u8,
}

impl RoutingKey {
    #[inline]
    pub const fn new(cmd_set: CommandSet, direction: Direction, cmd_id: u8) -> Self {
        Self {
            cmd_set,
            direction,
            cmd_id,
        }
    }
}

impl Display for RoutingKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {:#04x}", self.cmd_set, self.direction, self.cmd_id)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Payload {
    VersionInquiry(VersionInquiryResponse),
    ChipReboot(ChipRebootResponse),
    ParamDefinitionRequest(ParamDefinitionRequest),
    ParamDefinition(ParamDefinition),
    ParamListEnd(ParamListEnd),
}

impl Payload {
    pub fn routing_key(&self) -> RoutingKey {
        match self {
            Payload::VersionInquiry(_) => general::VERSION_INQUIRY,
            Payload::ChipReboot(_) => general::CHIP_REBOOT,
            Payload::ParamDefinitionRequest(_) => flyc::PARAM_DEFINITION_REQUEST,
            Payload::ParamDefinition(_) | Payload::ParamListEnd(_) => flyc::PARAM_DEFINITION,
        }
    }

    /// Wire bytes of this record, suitable as a packet payload.
    pub fn pack_to_vec(&self) -> PackingResult<Vec<u8>> {
        match self {
            Payload::VersionInquiry(p) => p.pack_to_vec(),
            Payload::ChipReboot(p) => p.pack_to_vec(),
            Payload::ParamDefinitionRequest(p) => p.pack_to_vec(),
            Payload::ParamDefinition(p) => p.pack_to_vec(),
            Payload::ParamListEnd(p) => p.pack_to_vec(),
        }
    }
}

impl Display for Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::VersionInquiry(p) => write!(f, "{p}"),
            Payload::ChipReboot(p) => write!(f, "chip reboot: status {}", p.status),
            Payload::ParamDefinitionRequest(p) => {
                write!(f, "param definition request: index {}", p.index)
            },
            Payload::ParamDefinition(p) => write!(f, "{p}"),
            Payload::ParamListEnd(p) => write!(f, "end of param list: status {}", p.status),
        }
    }
}

/// Bytes of a fixed-width text field up to its first NUL.
#[inline]
pub(crate) fn c_str(field: &[u8]) -> &[u8] {
    match field.iter().position(|&b| b == 0) {
        Some(end) => &field[..end],
        None => field,
    }
}

#[inline]
pub(crate) fn c_str_lossy(field: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(c_str(field))
}

/// Copies `s` into a fixed-width field, truncating and NUL-padding as needed.
pub(crate) fn write_c_str(field: &mut [u8], s: &[u8]) {
    let len = s.len().min(field.len());

    field[..len].copy_from_slice(&s[..len]);
    field[len..].fill(0);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn c_strings() {
        assert_eq!(c_str(b"abc\0def"), b"abc");
        assert_eq!(c_str(b"abc"), b"abc");
        assert_eq!(c_str(b"\0abc"), b"");

        let mut field = [0xffu8; 4];
        write_c_str(&mut field, b"ab");
        assert_eq!(field, [b'a', b'b', 0, 0]);

        write_c_str(&mut field, b"abcdef");
        assert_eq!(&field, b"abcd");
    }
}
