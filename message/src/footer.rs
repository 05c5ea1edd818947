//! Trailing whole-packet checksum.

use std::{
    fmt::{
        Debug,
        Display,
        Formatter,
    },
    marker::PhantomData,
};

use once_cell::sync::OnceCell;
use packed_struct::{
    prelude::*,
    PackingResult,
};

use crate::{
    checksum,
    Checksum,
};

pub const SIZE_BYTES: usize = 2;

/// A value followed by a checksum over its packed bytes.
///
/// Unpacking never rejects a bad checksum: the value read off the wire is carried alongside
/// and [`WithChecksum::checksum_valid`] reports whether it matches.
#[derive(Clone)]
pub struct WithChecksum<T, C> {
    val:            T,
    carried:        Option<checksum::Array>,
    cache_bytes:    OnceCell<PackingResult<Vec<u8>>>,
    cache_checksum: OnceCell<PackingResult<checksum::Array>>,
    _phantom:       PhantomData<C>,
}

impl<T, C> WithChecksum<T, C> {
    #[inline]
    pub fn new(data: T) -> Self {
        Self {
            val:            data,
            carried:        None,
            cache_bytes:    OnceCell::new(),
            cache_checksum: OnceCell::new(),
            _phantom:       PhantomData,
        }
    }

    #[inline]
    pub fn take(self) -> T {
        self.val
    }
}

impl<T, C> WithChecksum<T, C>
where
    C: Checksum,
{
    pub const CHECKSUM_SIZE: usize = checksum::size::<C>();

    #[inline]
    pub fn inner_bytes(&self) -> PackingResult<&[u8]>
    where
        T: PackedStructSlice,
    {
        self.cache_bytes
            .get_or_init(|| self.val.pack_to_vec())
            .as_ref()
            .map_err(|e| *e)
            .map(|v| v.as_slice())
    }

    /// Checksum computed over the packed value.
    #[inline]
    pub fn checksum(&self) -> PackingResult<&[u8]>
    where
        T: PackedStructSlice,
    {
        self.cache_checksum
            .get_or_init(|| {
                let inner = self.inner_bytes()?;

                Ok(C::checksum_array(inner))
            })
            .as_ref()
            .map(|array| array.as_slice())
            .map_err(|&e| e)
    }

    /// Checksum bytes as read off the wire, or the computed ones for a value built locally.
    #[inline]
    pub fn carried_checksum(&self) -> PackingResult<&[u8]>
    where
        T: PackedStructSlice,
    {
        match &self.carried {
            Some(carried) => Ok(carried.as_slice()),
            None => self.checksum(),
        }
    }

    pub fn checksum_valid(&self) -> PackingResult<bool>
    where
        T: PackedStructSlice,
    {
        Ok(self.carried_checksum()? == self.checksum()?)
    }

    #[inline]
    fn split_point(buf: &[u8]) -> usize {
        buf.len().saturating_sub(Self::CHECKSUM_SIZE)
    }
}

impl<T, C> AsRef<T> for WithChecksum<T, C> {
    fn as_ref(&self) -> &T {
        &self.val
    }
}

impl<T, C> PackedStructSlice for WithChecksum<T, C>
where
    T: PackedStructSlice,
    C: Checksum,
{
    fn pack_to_slice(&self, output: &mut [u8]) -> PackingResult<()> {
        let size = Self::packed_bytes_size(Some(self))?;
        if output.len() < size {
            return Err(PackingError::BufferTooSmall);
        }

        let (inner, checksum) = output[..size].split_at_mut(size - Self::CHECKSUM_SIZE);

        inner.copy_from_slice(self.inner_bytes()?);
        checksum.copy_from_slice(self.checksum()?);

        Ok(())
    }

    fn unpack_from_slice(src: &[u8]) -> PackingResult<Self> {
        let (inner, src_checksum) = src.split_at(Self::split_point(src));

        if src_checksum.len() != Self::CHECKSUM_SIZE {
            return Err(PackingError::BufferTooSmall);
        }

        let mut result = Self::new(T::unpack_from_slice(inner)?);
        result.carried = Some(checksum::Array::from_slice(src_checksum));

        let computed_checksum = result.checksum()?;

        if src_checksum != computed_checksum {
            tracing::warn!(
                src_checksum = %hex::encode(src_checksum),
                computed_checksum = %hex::encode(computed_checksum),
                "packet with invalid checksum"
            );
        }

        Ok(result)
    }

    fn packed_bytes_size(opt_self: Option<&Self>) -> PackingResult<usize> {
        let slf = opt_self.ok_or(PackingError::InstanceRequiredForSize)?;

        let count = T::packed_bytes_size(Some(&slf.val))? + Self::CHECKSUM_SIZE;
        Ok(count)
    }
}

impl<T, U, C> PartialEq<WithChecksum<U, C>> for WithChecksum<T, C>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &WithChecksum<U, C>) -> bool {
        self.val == other.val
    }
}

impl<T, C> Debug for WithChecksum<T, C>
where
    T: Debug + PackedStructSlice,
    C: Checksum,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let ck = match self.carried_checksum() {
            Ok(ck) => hex::encode(ck),
            Err(_) => "<failed checksum>".to_string(),
        };

        write!(f, "Checksum({:?}, 0x{})", self.val, ck)
    }
}

impl<T, C> Display for WithChecksum<T, C>
where
    T: Display + PackedStructSlice,
    C: Checksum,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let ck = match self.carried_checksum() {
            Ok(ck) => hex::encode(ck),
            Err(_) => "<failed checksum>".to_string(),
        };

        let status = match self.checksum_valid() {
            Ok(true) => "",
            _ => " [invalid]",
        };

        write!(f, "{} (checksum: 0x{}{})", self.val, ck, status)
    }
}
