use packed_struct::{
    prelude::*,
    PackedStructInfo,
    PackingResult,
};
use serde::{
    de::Error,
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};

/// The sentinel byte every packet starts with.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct StartMarker;

impl StartMarker {
    pub const VALUE: u8 = 0x55;
}

impl PackedStruct for StartMarker {
    type ByteArray = [u8; 1];

    #[inline]
    fn pack(&self) -> PackingResult<Self::ByteArray> {
        Ok([Self::VALUE])
    }

    fn unpack(src: &Self::ByteArray) -> PackingResult<Self> {
        if src[0] == Self::VALUE {
            Ok(Self)
        } else {
            tracing::debug!(expected = Self::VALUE, got = src[0], "invalid start marker");
            Err(PackingError::InvalidValue)
        }
    }
}

impl PackedStructInfo for StartMarker {
    #[inline]
    fn packed_bits() -> usize {
        8
    }
}

impl Serialize for StartMarker {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(Self::VALUE)
    }
}

impl<'de> Deserialize<'de> for StartMarker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let val = u8::deserialize(deserializer)?;

        if val != Self::VALUE {
            return Err(Error::custom(format!(
                "start marker mismatch (expected: {:#04x}, got: {val:#04x})",
                Self::VALUE
            )));
        }

        Ok(StartMarker)
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn only_sentinel_unpacks(x in any::<u8>()) {
            let unpack_result = StartMarker::unpack(&[x]);

            match x {
                StartMarker::VALUE => assert_eq!(unpack_result, Ok(StartMarker)),
                _otherwise => assert_eq!(unpack_result, Err(PackingError::InvalidValue)),
            }
        }
    }

    #[test]
    fn serde() {
        assert_eq!(serde_json::to_string(&StartMarker).unwrap(), "85");
        assert!(serde_json::from_str::<StartMarker>("84").is_err());
    }
}
