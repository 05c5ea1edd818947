//! Argument parsers shared by the binaries.

use std::{
    num::ParseIntError,
    str::FromStr,
};

use message::{
    header::ModuleInfo,
    DeviceType,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgError {
    #[error("expected a module ident in TTII form (e.g. 0300), got {0:?}")]
    ModuleIdent(String),

    #[error("module type {0} does not fit in 5 bits")]
    ModuleType(u8),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error(transparent)]
    Int(#[from] ParseIntError),
}

/// Module type and index as decimal digits: one or two for the type, two for the index. An
/// optional leading `m` is accepted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ModuleIdent(pub ModuleInfo);

impl FromStr for ModuleIdent {
    type Err = ArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('m').unwrap_or(s);

        if !(3..=4).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ArgError::ModuleIdent(s.to_owned()));
        }

        let (ty, index) = digits.split_at(digits.len() - 2);
        let device = DeviceType(ty.parse()?);

        if !device.fits() {
            return Err(ArgError::ModuleType(device.value()));
        }

        Ok(ModuleIdent(ModuleInfo::new(device, index.parse()?)))
    }
}

/// Decodes hex, ignoring any whitespace between digits.
pub fn parse_hex(s: &str) -> Result<Vec<u8>, ArgError> {
    let compact = s.chars().filter(|c| !c.is_whitespace()).collect::<String>();

    Ok(hex::decode(compact)?)
}

/// Space-separated lowercase hex, one pair per byte.
pub fn format_hex(buf: &[u8]) -> String {
    buf.iter().map(|b| format!("{b:02x}")).collect::<Vec<_>>().join(" ")
}
