//! Common UP4 types for the UPF data-plane translator.
//!
//! This crate provides type-safe representations of the primitives carried
//! by UPF entities and by the match/action fields of P4 table entries:
//!
//! - [`Ipv4Address`]: IPv4 addresses (UE, N3 and tunnel peer addresses)
//! - [`Ip4Prefix`]: IPv4 network prefixes (CIDR notation)
//! - [`ByteSequence`]: big-endian byte strings used as field/param values

mod bytes;
mod ip;

pub use bytes::{ByteSequence, ByteSequenceError};
pub use ip::{Ip4Prefix, Ipv4Address};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid IPv4 address format: {0}")]
    InvalidIpAddress(String),

    #[error("invalid IPv4 prefix format: {0}")]
    InvalidIpPrefix(String),
}
