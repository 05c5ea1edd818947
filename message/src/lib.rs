//! Encoding and decoding of DUPC command packets.
//!
//! A packet is an 11-byte [`Header`], an opaque payload, and a 16-bit checksum over everything
//! before it. [`builder`] produces wire buffers from semantic fields; [`interpret`] goes the
//! other way and looks the payload up in the [`payload::catalog`].

mod bytes_wrap;
pub mod builder;
pub mod checksum;
pub mod error;
pub mod footer;
pub mod header;
mod header_packet;
pub mod interpret;
mod named;
pub mod payload;
mod start_marker;

pub use builder::{
    build,
    BuildOptions,
    Fields,
};
pub use bytes_wrap::BytesWrap;
pub use checksum::{
    Checksum,
    HeaderChecksum,
    PacketChecksum,
};
pub use error::{
    Error,
    Result,
};
pub use footer::WithChecksum;
pub use header::Header;
pub use header_packet::HeaderPacket;
pub use interpret::{
    interpret,
    Interpreted,
};
pub use named::{
    AckType,
    CommandSet,
    DeviceType,
    Direction,
    EncryptType,
    ParseNameError,
};
pub use payload::{
    Payload,
    Resolution,
    RoutingKey,
};
pub use start_marker::StartMarker;

pub type Packet<T = BytesWrap, C = PacketChecksum> = WithChecksum<HeaderPacket<Header, T>, C>;
