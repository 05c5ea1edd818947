//! Checksum collaborators.
//!
//! The codec only ever talks to the [`Checksum`] trait. The two implementations below are the
//! seeded table checksums used on the wire: an 8-bit one protecting the first three header
//! bytes and a 16-bit one protecting the whole packet.

pub type Array = smallvec::SmallVec<[u8; 8]>;

pub trait Checksum {
    type Output: num_traits::PrimInt;

    fn checksum(vals: &[u8]) -> Self::Output;
    fn checksum_array(vals: &[u8]) -> Array;
}

#[inline]
pub const fn size<T>() -> usize
where
    T: Checksum,
{
    std::mem::size_of::<T::Output>()
}

#[macro_export]
macro_rules! impl_checksum {
    ($vis:vis $name:ident, u8, $algo:expr) => {
        $crate::impl_checksum!($vis $name, u8, $algo, vals, {
            let mut ret = ::smallvec::SmallVec::new();
            ret.push(<Self as $crate::checksum::Checksum>::checksum(vals));

            ret
        });
    };

    ($vis:vis $name:ident, $ty:ty, $algo:expr) => {
        $crate::impl_checksum!($vis $name, $ty, $algo, ::byteorder::LE);
    };

    ($vis:vis $name:ident, $ty:ty, $algo:expr, $endian:ty) => {
        $crate::impl_checksum!($vis $name, $ty, $algo, vals, {
            ::paste::paste! {
                let mut ret = ::smallvec::smallvec![0u8; ::std::mem::size_of::<$ty>()];

                <$endian as ::byteorder::ByteOrder>::[< write_ $ty >](
                    &mut ret[..],
                    <Self as $crate::checksum::Checksum>::checksum(vals),
                );
                ret
            }
        });
    };

    ($vis:vis $name:ident, $ty:ty, $algo:expr, $vals:ident, $array_body:expr) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        $vis struct $name;

        impl $crate::checksum::Checksum for $name {
            type Output = $ty;

            fn checksum(vals: &[u8]) -> Self::Output {
                const INSTANCE: ::crc::Crc<$ty> = ::crc::Crc::<$ty>::new(&$algo);

                INSTANCE.checksum(vals)
            }

            fn checksum_array($vals: &[u8]) -> $crate::checksum::Array {
                $array_body
            }
        }
    };
}

pub use impl_checksum;

/// Seed the header checksum register starts from.
pub const HEADER_SEED: u8 = 0x77;

/// Seed the whole-packet checksum register starts from.
pub const PACKET_SEED: u16 = 0x3692;

// The crc crate reflects `init` for reflected algorithms, so the seeds are stored pre-reflected
// to land in the register unchanged.
pub const HEADER_ALGORITHM: crc::Algorithm<u8> = crc::Algorithm {
    width:   8,
    poly:    0x31,
    init:    HEADER_SEED.reverse_bits(),
    refin:   true,
    refout:  true,
    xorout:  0x00,
    check:   0xfb,
    residue: 0x00,
};

pub const PACKET_ALGORITHM: crc::Algorithm<u16> = crc::Algorithm {
    width:   16,
    poly:    0x1021,
    init:    PACKET_SEED.reverse_bits(),
    refin:   true,
    refout:  true,
    xorout:  0x0000,
    check:   0x7109,
    residue: 0x0000,
};

impl_checksum!(pub HeaderChecksum, u8, HEADER_ALGORITHM);
impl_checksum!(pub PacketChecksum, u16, PACKET_ALGORITHM, ::byteorder::LittleEndian);

#[cfg(test)]
mod test {
    use byteorder::ByteOrder;
    use num_traits::FromPrimitive;
    use proptest::prelude::*;

    use super::*;

    impl_checksum!(pub U16CompileTest, u16, crc::CRC_16_DNP, ::byteorder::BigEndian);
    impl_checksum!(pub U32CompileTest, u32, crc::CRC_32_AIXM);

    fn basic_function_helper<C: Checksum, B: ByteOrder>(to_checksum: &[u8])
    where
        C::Output: std::fmt::Debug + FromPrimitive,
    {
        let int = C::checksum(to_checksum);
        let array = C::checksum_array(to_checksum);

        let size = std::mem::size_of::<C::Output>();
        assert_eq!(array.len(), size);

        let reread = B::read_uint(&array, size);
        let reread = C::Output::from_u64(reread).unwrap();
        assert_eq!(int, reread);
    }

    #[test]
    fn check_values() {
        assert_eq!(HeaderChecksum::checksum(b"123456789"), 0xfb);
        assert_eq!(PacketChecksum::checksum(b"123456789"), 0x7109);
    }

    #[test]
    fn header_known_vector() {
        assert_eq!(HeaderChecksum::checksum(&[0x55, 0x0d, 0x04]), 0x33);
    }

    #[test]
    fn seed_is_the_empty_checksum() {
        assert_eq!(HeaderChecksum::checksum(&[]), HEADER_SEED);
        assert_eq!(PacketChecksum::checksum(&[]), PACKET_SEED);
    }

    proptest! {
        #[test]
        fn u8(to_checksum in any::<Vec<u8>>()) {
            let int = HeaderChecksum::checksum(&to_checksum);
            let array = HeaderChecksum::checksum_array(&to_checksum);
            assert_eq!(array.len(), 1);
            assert_eq!(int, array[0]);
        }

        #[test]
        fn u16(to_checksum in any::<Vec<u8>>()) {
            basic_function_helper::<PacketChecksum, ::byteorder::LE>(&to_checksum);
            basic_function_helper::<U16CompileTest, ::byteorder::BE>(&to_checksum);
        }

        #[test]
        fn u32(to_checksum in any::<Vec<u8>>()) {
            basic_function_helper::<U32CompileTest, ::byteorder::LE>(&to_checksum);
        }
    }
}
