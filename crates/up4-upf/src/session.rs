//! Uplink and downlink sessions.

use serde::{Deserialize, Serialize};
use std::fmt;
use up4_types::Ipv4Address;

use crate::{UpfEntityError, UpfEntityType};

/// An uplink session, identified by the N3 address and TEID of the tunnel
/// carrying the UE's traffic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpfSessionUplink {
    pub tun_dst_addr: Ipv4Address,
    pub teid: u32,
    #[serde(default)]
    pub drop: bool,
}

impl UpfSessionUplink {
    pub fn builder() -> UpfSessionUplinkBuilder {
        UpfSessionUplinkBuilder::default()
    }

    pub fn needs_dropping(&self) -> bool {
        self.drop
    }
}

impl fmt::Display for UpfSessionUplink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UplinkSession(tun_dst_addr={}, teid={}, drop={})",
            self.tun_dst_addr, self.teid, self.drop
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpfSessionUplinkBuilder {
    tun_dst_addr: Option<Ipv4Address>,
    teid: Option<u32>,
    drop: bool,
}

impl UpfSessionUplinkBuilder {
    pub fn with_tun_dst_addr(mut self, addr: Ipv4Address) -> Self {
        self.tun_dst_addr = Some(addr);
        self
    }

    pub fn with_teid(mut self, teid: u32) -> Self {
        self.teid = Some(teid);
        self
    }

    pub fn needs_dropping(mut self, drop: bool) -> Self {
        self.drop = drop;
        self
    }

    pub fn build(self) -> Result<UpfSessionUplink, UpfEntityError> {
        let kind = UpfEntityType::SessionUplink;
        Ok(UpfSessionUplink {
            tun_dst_addr: self
                .tun_dst_addr
                .ok_or_else(|| UpfEntityError::missing(kind, "tun_dst_addr"))?,
            teid: self
                .teid
                .ok_or_else(|| UpfEntityError::missing(kind, "teid"))?,
            drop: self.drop,
        })
    }
}

/// A downlink session, identified by the UE address.
///
/// A session either drops, buffers, or forwards towards a GTP tunnel peer.
/// Only forwarding sessions carry a tunnel peer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpfSessionDownlink {
    pub ue_address: Ipv4Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tun_peer_id: Option<u8>,
    #[serde(default)]
    pub drop: bool,
    #[serde(default)]
    pub buffer: bool,
}

impl UpfSessionDownlink {
    pub fn builder() -> UpfSessionDownlinkBuilder {
        UpfSessionDownlinkBuilder::default()
    }

    pub fn needs_dropping(&self) -> bool {
        self.drop
    }

    pub fn needs_buffering(&self) -> bool {
        self.buffer
    }
}

impl fmt::Display for UpfSessionDownlink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DownlinkSession(ue_address={}", self.ue_address)?;
        if let Some(peer) = self.tun_peer_id {
            write!(f, ", tun_peer_id={}", peer)?;
        }
        write!(f, ", drop={}, buffer={})", self.drop, self.buffer)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpfSessionDownlinkBuilder {
    ue_address: Option<Ipv4Address>,
    tun_peer_id: Option<u8>,
    drop: bool,
    buffer: bool,
}

impl UpfSessionDownlinkBuilder {
    pub fn with_ue_address(mut self, addr: Ipv4Address) -> Self {
        self.ue_address = Some(addr);
        self
    }

    pub fn with_gtp_tunnel_peer_id(mut self, peer_id: u8) -> Self {
        self.tun_peer_id = Some(peer_id);
        self
    }

    pub fn needs_dropping(mut self, drop: bool) -> Self {
        self.drop = drop;
        self
    }

    pub fn needs_buffering(mut self, buffer: bool) -> Self {
        self.buffer = buffer;
        self
    }

    pub fn build(self) -> Result<UpfSessionDownlink, UpfEntityError> {
        Ok(UpfSessionDownlink {
            ue_address: self.ue_address.ok_or_else(|| {
                UpfEntityError::missing(UpfEntityType::SessionDownlink, "ue_address")
            })?,
            tun_peer_id: self.tun_peer_id,
            drop: self.drop,
            buffer: self.buffer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_uplink_defaults_to_forwarding() {
        let session = UpfSessionUplink::builder()
            .with_tun_dst_addr(Ipv4Address::new(140, 0, 100, 254))
            .with_teid(0x1234)
            .build()
            .unwrap();
        assert!(!session.needs_dropping());
        assert_eq!(
            session.to_string(),
            "UplinkSession(tun_dst_addr=140.0.100.254, teid=4660, drop=false)"
        );
    }

    #[test]
    fn test_uplink_requires_teid() {
        let err = UpfSessionUplink::builder()
            .with_tun_dst_addr(Ipv4Address::new(140, 0, 100, 254))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            UpfEntityError::missing(UpfEntityType::SessionUplink, "teid")
        );
    }

    #[test]
    fn test_downlink_flags() {
        let session = UpfSessionDownlink::builder()
            .with_ue_address(Ipv4Address::new(17, 0, 0, 1))
            .needs_buffering(true)
            .build()
            .unwrap();
        assert!(session.needs_buffering());
        assert!(!session.needs_dropping());
        assert_eq!(session.tun_peer_id, None);
        assert_eq!(
            session.to_string(),
            "DownlinkSession(ue_address=17.0.0.1, drop=false, buffer=true)"
        );
    }

    #[test]
    fn test_downlink_forwarding_display() {
        let session = UpfSessionDownlink::builder()
            .with_ue_address(Ipv4Address::new(17, 0, 0, 1))
            .with_gtp_tunnel_peer_id(2)
            .build()
            .unwrap();
        assert_eq!(
            session.to_string(),
            "DownlinkSession(ue_address=17.0.0.1, tun_peer_id=2, drop=false, buffer=false)"
        );
    }
}
