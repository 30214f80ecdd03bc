//! GTP-U tunnel peers.

use serde::{Deserialize, Serialize};
use std::fmt;
use up4_types::Ipv4Address;

use crate::{UpfEntityError, UpfEntityType};

/// Outer IPv4/UDP header parameters used when encapsulating towards a base
/// station, shared by every downlink session pointing at the same peer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpfGtpTunnelPeer {
    pub tun_peer_id: u8,
    pub src_addr: Ipv4Address,
    pub dst_addr: Ipv4Address,
    pub src_port: u16,
}

impl UpfGtpTunnelPeer {
    pub fn builder() -> UpfGtpTunnelPeerBuilder {
        UpfGtpTunnelPeerBuilder::default()
    }
}

impl fmt::Display for UpfGtpTunnelPeer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "GTP-Tunnel-Peer({} -> src:{}, dst:{} srcPort:{})",
            self.tun_peer_id, self.src_addr, self.dst_addr, self.src_port
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpfGtpTunnelPeerBuilder {
    tun_peer_id: Option<u8>,
    src_addr: Option<Ipv4Address>,
    dst_addr: Option<Ipv4Address>,
    src_port: Option<u16>,
}

impl UpfGtpTunnelPeerBuilder {
    pub fn with_tunnel_peer_id(mut self, peer_id: u8) -> Self {
        self.tun_peer_id = Some(peer_id);
        self
    }

    pub fn with_src_addr(mut self, addr: Ipv4Address) -> Self {
        self.src_addr = Some(addr);
        self
    }

    pub fn with_dst_addr(mut self, addr: Ipv4Address) -> Self {
        self.dst_addr = Some(addr);
        self
    }

    pub fn with_src_port(mut self, port: u16) -> Self {
        self.src_port = Some(port);
        self
    }

    pub fn build(self) -> Result<UpfGtpTunnelPeer, UpfEntityError> {
        let kind = UpfEntityType::TunnelPeer;
        Ok(UpfGtpTunnelPeer {
            tun_peer_id: self
                .tun_peer_id
                .ok_or_else(|| UpfEntityError::missing(kind, "tun_peer_id"))?,
            src_addr: self
                .src_addr
                .ok_or_else(|| UpfEntityError::missing(kind, "src_addr"))?,
            dst_addr: self
                .dst_addr
                .ok_or_else(|| UpfEntityError::missing(kind, "dst_addr"))?,
            src_port: self
                .src_port
                .ok_or_else(|| UpfEntityError::missing(kind, "src_port"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_and_display() {
        let peer = UpfGtpTunnelPeer::builder()
            .with_tunnel_peer_id(5)
            .with_src_addr(Ipv4Address::new(10, 0, 0, 1))
            .with_dst_addr(Ipv4Address::new(10, 0, 0, 2))
            .with_src_port(2152)
            .build()
            .unwrap();
        assert_eq!(
            peer.to_string(),
            "GTP-Tunnel-Peer(5 -> src:10.0.0.1, dst:10.0.0.2 srcPort:2152)"
        );
    }

    #[test]
    fn test_all_fields_required() {
        let err = UpfGtpTunnelPeer::builder()
            .with_tunnel_peer_id(5)
            .with_src_addr(Ipv4Address::new(10, 0, 0, 1))
            .with_dst_addr(Ipv4Address::new(10, 0, 0, 2))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            UpfEntityError::missing(UpfEntityType::TunnelPeer, "src_port")
        );
    }
}
