//! Decoding a wire buffer into a structured view.

use std::fmt::{
    Display,
    Formatter,
};

use byteorder::{
    ByteOrder,
    LittleEndian,
};
use packed_struct::PackedStructSlice;
use tap::Pipe;

use crate::{
    error::{
        Error,
        Result,
    },
    footer,
    header::{
        self,
        Header,
    },
    payload::{
        resolve,
        Resolution,
    },
    BytesWrap,
    Checksum,
    HeaderChecksum,
    HeaderPacket,
    Packet,
    PacketChecksum,
    RoutingKey,
    StartMarker,
};

/// A decoded packet. Checksums are carried as read and only checked by [`Interpreted::verify`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Interpreted {
    pub header:     Header,
    pub payload:    BytesWrap,
    pub footer:     u16,
    pub resolution: Resolution,
}

impl Interpreted {
    #[inline]
    pub fn routing_key(&self) -> RoutingKey {
        self.header.routing_key()
    }

    /// Checks both checksums with the standard implementations.
    #[inline]
    pub fn verify_standard(&self) -> Result<()> {
        self.verify::<HeaderChecksum, PacketChecksum>()
    }

    pub fn verify<H, F>(&self) -> Result<()>
    where
        H: Checksum<Output = u8>,
        F: Checksum<Output = u16>,
    {
        let computed = self.header.compute_checksum::<H>()?;
        if computed != self.header.checksum {
            return Err(Error::HeaderChecksum {
                carried: self.header.checksum,
                computed,
            });
        }

        let inner = HeaderPacket {
            header:  self.header,
            payload: self.payload.clone(),
        }
        .pack_to_vec()?;

        let computed = F::checksum(&inner);
        if computed != self.footer {
            return Err(Error::PacketChecksum {
                carried: self.footer,
                computed,
            });
        }

        Ok(())
    }
}

impl Display for Interpreted {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header.display())?;

        match &self.resolution {
            Resolution::Known(p) => write!(f, "\n  {p}"),
            Resolution::UnrecognizedCommand => {
                write!(f, "\n  unrecognized command: {}", self.payload)
            },
            Resolution::UnrecognizedPayloadShape => {
                write!(f, "\n  unrecognized payload shape: {}", self.payload)
            },
        }
    }
}

/// Splits `buf` into header, payload and footer, then looks the payload up in the catalog.
#[tracing::instrument(skip(buf), fields(buf.len = buf.len()), err, level = "debug")]
pub fn interpret(buf: &[u8]) -> Result<Interpreted> {
    if buf.len() < header::SIZE_BYTES + footer::SIZE_BYTES {
        return Err(Error::MalformedHeader("buffer shorter than header and footer"));
    }

    if buf[0] != StartMarker::VALUE {
        return Err(Error::MalformedHeader("bad start marker"));
    }

    let declared = Header::unpack_from_slice(&buf[..header::SIZE_BYTES])?.total_length();
    if declared != buf.len() {
        return Err(Error::LengthMismatch {
            declared,
            actual: buf.len(),
        });
    }

    let packet = Packet::<BytesWrap, PacketChecksum>::unpack_from_slice(buf)?;
    let footer = packet.carried_checksum()?.pipe(LittleEndian::read_u16);

    let HeaderPacket {
        header,
        payload,
    } = packet.take();

    let resolution = resolve(header.routing_key(), payload.as_slice());

    Ok(Interpreted {
        header,
        payload,
        footer,
        resolution,
    })
}
