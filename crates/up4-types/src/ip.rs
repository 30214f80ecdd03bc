//! IPv4 address and prefix types with safe parsing.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 address wrapper with UPF-specific utilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ipv4Address(Ipv4Addr);

impl Ipv4Address {
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Ipv4Address(Ipv4Addr::new(a, b, c, d))
    }

    pub const fn from_octets(octets: [u8; 4]) -> Self {
        Ipv4Address(Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]))
    }

    pub const fn from_u32(value: u32) -> Self {
        Self::from_octets(value.to_be_bytes())
    }

    pub const fn octets(&self) -> [u8; 4] {
        self.0.octets()
    }

    pub const fn to_u32(&self) -> u32 {
        u32::from_be_bytes(self.0.octets())
    }
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for Ipv4Address {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Ipv4Addr>()
            .map(Ipv4Address)
            .map_err(|_| ParseError::InvalidIpAddress(s.to_string()))
    }
}

impl From<Ipv4Addr> for Ipv4Address {
    fn from(addr: Ipv4Addr) -> Self {
        Ipv4Address(addr)
    }
}

impl From<Ipv4Address> for Ipv4Addr {
    fn from(addr: Ipv4Address) -> Self {
        addr.0
    }
}

impl From<[u8; 4]> for Ipv4Address {
    fn from(octets: [u8; 4]) -> Self {
        Self::from_octets(octets)
    }
}

/// An IPv4 prefix in CIDR notation (e.g., 10.0.0.0/24).
///
/// The address is always stored masked to the prefix length, so
/// `10.0.0.1/24` and `10.0.0.0/24` are the same prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ip4Prefix {
    address: Ipv4Address,
    prefix_len: u8,
}

impl Ip4Prefix {
    /// Maximum prefix length for an IPv4 prefix.
    pub const MAX_PREFIX_LEN: u8 = 32;

    /// Creates a new IPv4 prefix, clearing the host bits of `address`.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix length exceeds 32.
    pub fn new(address: Ipv4Address, prefix_len: u8) -> Result<Self, ParseError> {
        if prefix_len > Self::MAX_PREFIX_LEN {
            return Err(ParseError::InvalidIpPrefix(format!(
                "prefix length {} exceeds maximum {}",
                prefix_len,
                Self::MAX_PREFIX_LEN
            )));
        }

        let mask = Self::mask_for(prefix_len);
        Ok(Ip4Prefix {
            address: Ipv4Address::from_u32(address.to_u32() & mask),
            prefix_len,
        })
    }

    /// Returns the network address of this prefix.
    pub const fn address(&self) -> &Ipv4Address {
        &self.address
    }

    /// Returns the prefix length in bits.
    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Returns true if this is a host route (/32).
    pub const fn is_host_route(&self) -> bool {
        self.prefix_len == Self::MAX_PREFIX_LEN
    }

    /// Returns true if this is the default route (0.0.0.0/0).
    pub fn is_default(&self) -> bool {
        self.prefix_len == 0
    }

    /// Returns true if `addr` falls within this prefix.
    pub fn contains(&self, addr: &Ipv4Address) -> bool {
        addr.to_u32() & Self::mask_for(self.prefix_len) == self.address.to_u32()
    }

    fn mask_for(prefix_len: u8) -> u32 {
        u32::MAX
            .checked_shl(u32::from(Self::MAX_PREFIX_LEN - prefix_len))
            .unwrap_or(0)
    }
}

impl fmt::Display for Ip4Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_len)
    }
}

impl FromStr for Ip4Prefix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr_str, len_str) = s
            .rsplit_once('/')
            .ok_or_else(|| ParseError::InvalidIpPrefix(s.to_string()))?;

        let address: Ipv4Address = addr_str
            .parse()
            .map_err(|_| ParseError::InvalidIpPrefix(s.to_string()))?;
        let prefix_len: u8 = len_str
            .parse()
            .map_err(|_| ParseError::InvalidIpPrefix(s.to_string()))?;

        Ip4Prefix::new(address, prefix_len)
    }
}

impl TryFrom<String> for Ip4Prefix {
    type Error = ParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Ip4Prefix> for String {
    fn from(prefix: Ip4Prefix) -> Self {
        prefix.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ipv4_parse() {
        let addr: Ipv4Address = "192.168.1.1".parse().unwrap();
        assert_eq!(addr.octets(), [192, 168, 1, 1]);
        assert!("192.168.1".parse::<Ipv4Address>().is_err());
    }

    #[test]
    fn test_ipv4_u32_conversion() {
        let addr = Ipv4Address::new(10, 0, 0, 1);
        assert_eq!(addr.to_u32(), 0x0a00_0001);
        assert_eq!(Ipv4Address::from_u32(0x0a00_0001), addr);
        assert_eq!(Ipv4Address::from([10, 0, 0, 1]), addr);
    }

    #[test]
    fn test_ip_prefix_parse() {
        let prefix: Ip4Prefix = "10.0.0.0/24".parse().unwrap();
        assert_eq!(prefix.prefix_len(), 24);
        assert_eq!(*prefix.address(), Ipv4Address::new(10, 0, 0, 0));
    }

    #[test]
    fn test_ip_prefix_masks_host_bits() {
        let prefix: Ip4Prefix = "17.0.0.42/24".parse().unwrap();
        assert_eq!(*prefix.address(), Ipv4Address::new(17, 0, 0, 0));
        assert_eq!(prefix, "17.0.0.0/24".parse().unwrap());
    }

    #[test]
    fn test_ip_prefix_contains() {
        let prefix: Ip4Prefix = "17.0.0.0/24".parse().unwrap();
        assert!(prefix.contains(&Ipv4Address::new(17, 0, 0, 1)));
        assert!(!prefix.contains(&Ipv4Address::new(17, 0, 1, 1)));

        let default: Ip4Prefix = "0.0.0.0/0".parse().unwrap();
        assert!(default.is_default());
        assert!(default.contains(&Ipv4Address::new(8, 8, 8, 8)));
    }

    #[test]
    fn test_ip_prefix_host_route() {
        let host: Ip4Prefix = "10.0.0.1/32".parse().unwrap();
        assert!(host.is_host_route());
        assert_eq!(*host.address(), Ipv4Address::new(10, 0, 0, 1));

        let network: Ip4Prefix = "10.0.0.0/24".parse().unwrap();
        assert!(!network.is_host_route());
    }

    #[test]
    fn test_invalid_prefix() {
        assert!("10.0.0.0/33".parse::<Ip4Prefix>().is_err());
        assert!("10.0.0.0".parse::<Ip4Prefix>().is_err());
        assert!("2001:db8::/32".parse::<Ip4Prefix>().is_err());
    }

    #[test]
    fn test_display() {
        let prefix: Ip4Prefix = "192.168.0.0/16".parse().unwrap();
        assert_eq!(prefix.to_string(), "192.168.0.0/16");
    }
}
