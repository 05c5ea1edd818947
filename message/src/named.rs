//! Open-ended enumerands carried in the header.
//!
//! Each of these is an integer newtype with a table of the values we know names for. Values
//! without a name are still valid and round-trip unchanged.

use std::{
    fmt::{
        Display,
        Formatter,
    },
    str::FromStr,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized {kind}: {input:?}")]
pub struct ParseNameError {
    pub kind:  &'static str,
    pub input: String,
}

macro_rules! named_values {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($ty:ty, bits = $bits:expr) {
            $($variant:ident = $val:expr),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize, derive_more::From, derive_more::Into,
        )]
        #[serde(transparent)]
        $vis struct $name(pub $ty);

        impl $name {
            $(pub const $variant: Self = Self($val);)*

            /// Width of this value on the wire.
            pub const BITS: u32 = $bits;

            pub const NAMES: &'static [(&'static str, $ty)] = &[$((stringify!($variant), $val)),*];

            #[inline]
            pub const fn value(self) -> $ty {
                self.0
            }

            pub fn name(self) -> Option<&'static str> {
                Self::NAMES.iter().find(|&&(_, v)| v == self.0).map(|&(n, _)| n)
            }

            pub fn from_name(name: &str) -> Option<Self> {
                Self::NAMES
                    .iter()
                    .find(|&&(n, _)| n.eq_ignore_ascii_case(name))
                    .map(|&(_, v)| Self(v))
            }

            /// Whether the value survives masking to [`Self::BITS`].
            #[inline]
            pub fn fits(self) -> bool {
                u32::from(self.0) < (1u32 << Self::BITS)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                match self.name() {
                    Some(name) => write!(f, "{name}"),
                    None => write!(f, "{}({})", stringify!($name), self.0),
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseNameError;

            /// Accepts either the numeric value or a case-insensitive name.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let err = || ParseNameError {
                    kind:  stringify!($name),
                    input: s.to_owned(),
                };

                if s.bytes().all(|b| b.is_ascii_digit()) && !s.is_empty() {
                    let val = s.parse::<$ty>().map_err(|_| err())?;
                    let result = Self(val);

                    return result.fits().then(|| result).ok_or_else(err);
                }

                Self::from_name(s).ok_or_else(err)
            }
        }
    };
}

named_values! {
    /// Kind of module sending or receiving a packet.
    pub struct DeviceType(u8, bits = 5) {
        ANY = 0,
        CAMERA = 1,
        MOBILE_APP = 2,
        FLYCONTROLLER = 3,
        GIMBAL = 4,
        CENTER_BOARD = 5,
        REMOTE_RADIO = 6,
        WIFI = 7,
        LB_DM3XX_SKY = 8,
        LB_MCU_SKY = 9,
        PC = 10,
        BATTERY = 11,
        ESC = 12,
        DM368_GROUND = 13,
        OFDM_GROUND = 14,
        LB_68013_SKY = 15,
        SER_68013_GROUND = 16,
        MVO = 17,
        SVO = 18,
        LB_FPGA_SKY = 19,
        FPGA_GROUND = 20,
        FPGA_SIM = 21,
        STATION = 22,
        XU = 23,
        WTF = 24,
        IMU = 25,
        GPS = 26,
        WIFI_GROUND = 27,
        SIG_CVT = 28,
        PMU = 29,
        UNKNOWN30 = 30,
        WM330_OR_WM220 = 31,
    }
}

named_values! {
    /// Group of commands a command id is interpreted within.
    pub struct CommandSet(u8, bits = 8) {
        GENERAL = 0,
        SPECIAL = 1,
        CAMERA = 2,
        FLYCONTROLLER = 3,
        ZENMUSE = 4,
        CENTER_BOARD = 5,
        RADIO = 6,
        WIFI = 7,
        DM368 = 8,
        OFDM = 9,
        VO = 10,
        SIM = 11,
        ESC = 12,
        BATTERY = 13,
        DATA_RECORDER = 14,
        RTK = 15,
        AUTOTEST = 16,
        UNKNOWN17 = 17,
        UNKNOWN18 = 18,
        UNKNOWN19 = 19,
        UNKNOWN20 = 20,
        UNKNOWN21 = 21,
        UNKNOWN22 = 22,
        UNKNOWN23 = 23,
        UNKNOWN24 = 24,
        UNKNOWN25 = 25,
        UNKNOWN26 = 26,
        UNKNOWN27 = 27,
        UNKNOWN28 = 28,
        UNKNOWN29 = 29,
        UNKNOWN30 = 30,
        UNKNOWN31 = 31,
    }
}

named_values! {
    /// When the receiver is asked to acknowledge.
    pub struct AckType(u8, bits = 2) {
        NO_ACK_NEEDED = 0,
        ACK_BEFORE_EXEC = 1,
        ACK_AFTER_EXEC = 2,
    }
}

named_values! {
    pub struct EncryptType(u8, bits = 3) {
        NO_ENC = 0,
        AES_128 = 1,
        SELF_DEF = 2,
        XOR = 3,
        DES_56 = 4,
        DES_112 = 5,
        AES_192 = 6,
        AES_256 = 7,
    }
}

/// Whether a packet asks for something or answers it.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum Direction {
    #[default]
    Request,
    Response,
}

impl Direction {
    pub const BITS: u32 = 1;

    #[inline]
    pub const fn from_bit(bit: u8) -> Self {
        match bit & 1 {
            0 => Direction::Request,
            _ => Direction::Response,
        }
    }

    #[inline]
    pub const fn bit(self) -> u8 {
        match self {
            Direction::Request => 0,
            Direction::Response => 1,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Request => write!(f, "REQUEST"),
            Direction::Response => write!(f, "RESPONSE"),
        }
    }
}

impl FromStr for Direction {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "0" | "REQUEST" => Ok(Direction::Request),
            "1" | "RESPONSE" => Ok(Direction::Response),
            _ => Err(ParseNameError {
                kind:  "Direction",
                input: s.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn lookup_by_name() {
        assert_eq!("flycontroller".parse::<DeviceType>(), Ok(DeviceType::FLYCONTROLLER));
        assert_eq!("Ack_After_Exec".parse::<AckType>(), Ok(AckType::ACK_AFTER_EXEC));
        assert_eq!("3".parse::<CommandSet>(), Ok(CommandSet::FLYCONTROLLER));
        assert_eq!("response".parse::<Direction>(), Ok(Direction::Response));
    }

    #[test]
    fn numeric_values_must_fit() {
        assert_eq!("31".parse::<DeviceType>(), Ok(DeviceType(31)));
        assert!("32".parse::<DeviceType>().is_err());
        assert!("3".parse::<AckType>().is_ok());
        assert!("4".parse::<AckType>().is_err());
        assert!("8".parse::<EncryptType>().is_err());
        assert!("not_a_thing".parse::<CommandSet>().is_err());
    }

    #[test]
    fn placeholder_names() {
        assert_eq!("UNKNOWN20".parse::<CommandSet>(), Ok(CommandSet(20)));
        assert_eq!("unknown31".parse::<CommandSet>(), Ok(CommandSet(31)));
        assert_eq!(CommandSet(17).to_string(), "UNKNOWN17");
        assert_eq!("unknown30".parse::<DeviceType>(), Ok(DeviceType(30)));
        assert_eq!(DeviceType(30).to_string(), "UNKNOWN30");

        assert_eq!("UNKNOWN32".parse::<CommandSet>().ok(), None);
    }

    #[test]
    fn unknown_values_display_numerically() {
        assert_eq!(CommandSet::CAMERA.to_string(), "CAMERA");
        assert_eq!(CommandSet(200).to_string(), "CommandSet(200)");
        assert_eq!(CommandSet(200).name(), None);
    }

    proptest! {
        #[test]
        fn display_parses_back(val in 0u8..32) {
            let dev = DeviceType(val);

            if dev.name().is_some() {
                assert_eq!(dev.to_string().parse::<DeviceType>(), Ok(dev));
            }

            assert_eq!(val.to_string().parse::<DeviceType>(), Ok(dev));
        }
    }
}
