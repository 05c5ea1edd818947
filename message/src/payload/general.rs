use std::fmt::{
    Display,
    Formatter,
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

pub const VERSION_INQUIRY: RoutingKey =
    RoutingKey::new(CommandSet::GENERAL, Direction::Response, 0x01);
pub const CHIP_REBOOT: RoutingKey =
    RoutingKey::new(CommandSet::GENERAL, Direction::Response, 0x0b);

#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct VersionInquiryResponse {
    pub unknown0:    u8,
    pub unknown1:    u8,
    pub hw_version:  [u8; Self::HW_VERSION_LEN],
    pub ldr_version: u32,
    pub app_version: u32,
    pub unknown1a:   u32,
    pub unknown1e:   u8,
}

impl VersionInquiryResponse {
    pub const HW_VERSION_LEN: usize = 16;
    pub const SIZE: usize = 2 + Self::HW_VERSION_LEN + 3 * 4 + 1;

    const HW_VERSION: usize = 2;
    const LDR_VERSION: usize = Self::HW_VERSION + Self::HW_VERSION_LEN;
    const APP_VERSION: usize = Self::LDR_VERSION + 4;
    const UNKNOWN1A: usize = Self::APP_VERSION + 4;
    const UNKNOWN1E: usize = Self::UNKNOWN1A + 4;

    pub fn hw_version(&self) -> std::borrow::Cow<'_, str> {
        super::c_str_lossy(&self.hw_version)
    }

    pub fn set_hw_version(&mut self, s: &str) {
        super::write_c_str(&mut self.hw_version, s.as_bytes());
    }
}

/// Firmware versions are four bytes, most significant first.
pub fn format_version(v: u32) -> String {
    let [a, b, c, d] = v.to_be_bytes();
    format!("{a:02}.{b:02}.{c:02}.{d:02}")
}

impl PackedStructSlice for VersionInquiryResponse {
    fn pack_to_slice(&self, output: &mut [u8]) -> PackingResult<()> {
        if output.len() != Self::SIZE {
            return Err(PackingError::BufferTooSmall);
        }

        output[0] = self.unknown0;
        output[1] = self.unknown1;
        output[Self::HW_VERSION..Self::LDR_VERSION].copy_from_slice(&self.hw_version);
        LittleEndian::write_u32(&mut output[Self::LDR_VERSION..], self.ldr_version);
        LittleEndian::write_u32(&mut output[Self::APP_VERSION..], self.app_version);
        LittleEndian::write_u32(&mut output[Self::UNKNOWN1A..], self.unknown1a);
        output[Self::UNKNOWN1E] = self.unknown1e;

        Ok(())
    }

    fn unpack_from_slice(src: &[u8]) -> PackingResult<Self> {
        if src.len() < Self::SIZE {
            return Err(PackingError::BufferTooSmall);
        }

        let mut hw_version = [0u8; Self::HW_VERSION_LEN];
        hw_version.copy_from_slice(&src[Self::HW_VERSION..Self::LDR_VERSION]);

        Ok(Self {
            unknown0: src[0],
            unknown1: src[1],
            hw_version,
            ldr_version: LittleEndian::read_u32(&src[Self::LDR_VERSION..]),
            app_version: LittleEndian::read_u32(&src[Self::APP_VERSION..]),
            unknown1a: LittleEndian::read_u32(&src[Self::UNKNOWN1A..]),
            unknown1e: src[Self::UNKNOWN1E],
        })
    }

    #[inline]
    fn packed_bytes_size(_opt_self: Option<&Self>) -> PackingResult<usize> {
        Ok(Self::SIZE)
    }
}

impl Display for VersionInquiryResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "version: hw {:?}, loader {}, app {}",
            self.hw_version(),
            format_version(self.ldr_version),
            format_version(self.app_version),
        )
    }
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PackedStruct, serde::Serialize, serde::Deserialize,
)]
#[packed_struct(bit_numbering = "msb0", size_bytes = "1", endian = "lsb")]
pub struct ChipRebootResponse {
    pub status: u8,
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample() -> VersionInquiryResponse {
        let mut v = VersionInquiryResponse {
            unknown0:    0,
            unknown1:    1,
            hw_version:  [0; 16],
            ldr_version: 0x01000000,
            app_version: 0x01020304,
            unknown1a:   0xdeadbeef,
            unknown1e:   7,
        };
        v.set_hw_version("wm220_fc");

        v
    }

    #[test]
    fn version_inquiry_layout() {
        let packed = sample().pack_to_vec().unwrap();

        assert_eq!(packed.len(), 31);
        assert_eq!(&packed[2..10], b"wm220_fc");
        assert_eq!(&packed[22..26], &[0x04, 0x03, 0x02, 0x01]);
        assert_eq!(packed[30], 7);

        assert_eq!(VersionInquiryResponse::unpack_from_slice(&packed), Ok(sample()));
    }

    #[test]
    fn version_strings() {
        let v = sample();

        assert_eq!(v.hw_version(), "wm220_fc");
        assert_eq!(format_version(v.app_version), "01.02.03.04");
    }

    #[test]
    fn chip_reboot() {
        assert_eq!(ChipRebootResponse::unpack(&[3]), Ok(ChipRebootResponse { status: 3 }));
    }
}
