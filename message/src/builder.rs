//! Assembling whole packets from semantic fields.

use packed_struct::PackedStructSlice;

use crate::{
    error::{
        Error,
        Result,
    },
    header::{
        self,
        CommandType,
        Header,
        ModuleInfo,
        VersionLength,
    },
    payload::Payload,
    AckType,
    BytesWrap,
    Checksum,
    CommandSet,
    DeviceType,
    EncryptType,
    HeaderChecksum,
    HeaderPacket,
    Packet,
    PacketChecksum,
};

/// Header defaults and masking policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct BuildOptions {
    pub protocol_version: u8,

    /// Reject values that don't fit their wire width instead of truncating them.
    pub strict: bool,
}

impl BuildOptions {
    pub const DEFAULT_PROTOCOL_VERSION: u8 = header::DEFAULT_VERSION;

    #[inline]
    pub const fn strict() -> Self {
        Self {
            protocol_version: Self::DEFAULT_PROTOCOL_VERSION,
            strict:           true,
        }
    }
}

impl Default for BuildOptions {
    #[inline]
    fn default() -> Self {
        Self {
            protocol_version: Self::DEFAULT_PROTOCOL_VERSION,
            strict:           false,
        }
    }
}

/// Everything in the header a caller chooses.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Fields {
    pub sender:   ModuleInfo,
    pub receiver: ModuleInfo,
    pub seq:      u16,
    pub ty:       CommandType,
    pub cmd_set:  CommandSet,
    pub cmd_id:   u8,
}

impl Fields {
    fn check(&self, opts: &BuildOptions) -> Result<()> {
        let check = |field, value: u8, bits| range_check(opts, field, u32::from(value), bits);

        check("protocol version", opts.protocol_version, VersionLength::VERSION_BITS)?;
        check("sender type", self.sender.device.value(), DeviceType::BITS)?;
        check("sender index", self.sender.index, ModuleInfo::INDEX_BITS)?;
        check("receiver type", self.receiver.device.value(), DeviceType::BITS)?;
        check("receiver index", self.receiver.index, ModuleInfo::INDEX_BITS)?;
        check("ack type", self.ty.ack.value(), AckType::BITS)?;
        check("encrypt type", self.ty.encrypt.value(), EncryptType::BITS)?;
        check("reserved bits", self.ty.reserved, CommandType::RESERVED_MASK.count_ones())?;

        Ok(())
    }
}

fn range_check(opts: &BuildOptions, field: &'static str, value: u32, bits: u32) -> Result<()> {
    if u64::from(value) < (1u64 << bits) {
        return Ok(());
    }

    if opts.strict {
        return Err(Error::FieldRange {
            field,
            value,
            bits,
        });
    }

    tracing::debug!(field, value, bits, "truncating field to its wire width");
    Ok(())
}

/// Total wire length of a packet carrying `payload_len` bytes.
#[inline]
pub const fn total_length(payload_len: usize) -> usize {
    header::SIZE_BYTES + payload_len + crate::footer::SIZE_BYTES
}

/// Encodes a packet with the standard checksums.
#[inline]
pub fn build(opts: &BuildOptions, hdr: &Fields, payload: &[u8]) -> Result<Vec<u8>> {
    build_with::<HeaderChecksum, PacketChecksum>(opts, hdr, payload)
}

/// Encodes a packet using `H` for the header checksum and `F` for the trailing one.
#[tracing::instrument(
    skip(opts, hdr, payload),
    fields(seq = hdr.seq, payload.len = payload.len()),
    err,
    level = "debug"
)]
pub fn build_with<H, F>(opts: &BuildOptions, hdr: &Fields, payload: &[u8]) -> Result<Vec<u8>>
where
    H: Checksum<Output = u8>,
    F: Checksum,
{
    let total = total_length(payload.len());

    if total > VersionLength::MAX_LENGTH {
        if opts.strict {
            return Err(Error::LengthOverflow {
                total,
            });
        }

        tracing::debug!(total, "packet length overflows the length field, truncating");
    }

    hdr.check(opts)?;

    let length = (total & usize::from(VersionLength::LENGTH_MASK)) as u16;
    let mut header = Header::with_length(opts.protocol_version, length);

    // Covers only the marker and length word, so it is taken before any routing field is set.
    header.checksum = header.compute_checksum::<H>()?;

    header.sender = hdr.sender;
    header.receiver = hdr.receiver;
    header.seq = hdr.seq;
    header.ty = hdr.ty;
    header.cmd_set = hdr.cmd_set;
    header.cmd_id = hdr.cmd_id;

    let packet = Packet::<BytesWrap, F>::new(HeaderPacket {
        header,
        payload: BytesWrap::from(payload),
    });

    Ok(packet.pack_to_vec()?)
}

/// Encodes a catalog record, taking its command set, direction and id from the record itself.
pub fn build_payload(opts: &BuildOptions, hdr: &Fields, payload: &Payload) -> Result<Vec<u8>> {
    let key = payload.routing_key();

    let hdr = Fields {
        ty: CommandType {
            direction: key.direction,
            ..hdr.ty
        },
        cmd_set: key.cmd_set,
        cmd_id: key.cmd_id,
        ..*hdr
    };

    build(opts, &hdr, &payload.pack_to_vec()?)
}
