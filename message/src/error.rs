pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("malformed header: {0}")]
    MalformedHeader(&'static str),

    #[error("length mismatch: header declares {declared} bytes, buffer holds {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("packet of {total} bytes does not fit the 10-bit length field")]
    LengthOverflow { total: usize },

    #[error("{field} value {value} does not fit in {bits} bits")]
    FieldRange {
        field: &'static str,
        value: u32,
        bits:  u32,
    },

    #[error("header checksum mismatch (carried: {carried:#04x}, computed: {computed:#04x})")]
    HeaderChecksum { carried: u8, computed: u8 },

    #[error("packet checksum mismatch (carried: {carried:#06x}, computed: {computed:#06x})")]
    PacketChecksum { carried: u16, computed: u16 },

    #[error(transparent)]
    Packing(#[from] packed_struct::PackingError),
}
