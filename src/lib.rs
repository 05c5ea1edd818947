//! Command-line front ends for the DUPC packet codec.

pub mod args;
pub mod trace;

mod macros;

pub use message;
