//! Typed UPF entities.
//!
//! These are the values the UPF control logic (for example a PFCP agent)
//! reasons about. Every entity maps to exactly one table of the UP4 pipeline,
//! except counters, which map to a cell of one of the two counter banks.
//!
//! # Key Components
//!
//! - [`UpfInterface`]: an N3/N6 interface prefix
//! - [`UpfSessionUplink`] / [`UpfSessionDownlink`]: per-tunnel/per-UE sessions
//! - [`UpfTerminationUplink`] / [`UpfTerminationDownlink`]: per-application terminations
//! - [`UpfGtpTunnelPeer`]: a GTP-U tunnel peer
//! - [`UpfApplication`]: an application filter
//! - [`UpfCounter`]: a counter cell
//! - [`UpfEntity`]: the closed sum of all of the above

mod application;
mod counter;
mod interface;
mod session;
mod termination;
mod tunnel_peer;

pub use application::{UpfApplication, UpfApplicationBuilder};
pub use counter::UpfCounter;
pub use interface::{UpfInterface, UpfInterfaceBuilder, UpfInterfaceType};
pub use session::{
    UpfSessionDownlink, UpfSessionDownlinkBuilder, UpfSessionUplink, UpfSessionUplinkBuilder,
};
pub use termination::{
    UpfTerminationDownlink, UpfTerminationDownlinkBuilder, UpfTerminationUplink,
    UpfTerminationUplinkBuilder,
};
pub use tunnel_peer::{UpfGtpTunnelPeer, UpfGtpTunnelPeerBuilder};

use serde::{Deserialize, Serialize};
use std::fmt;

/// The only network slice currently supported on interfaces and applications.
///
/// TODO: read the slice from the table entry or from configuration once the
/// pipeline exposes more than one mobile slice.
pub const SLICE_MOBILE: u8 = 0;

/// Errors raised when building UPF entities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpfEntityError {
    #[error("{entity} requires field '{field}'")]
    MissingField {
        entity: UpfEntityType,
        field: &'static str,
    },

    #[error("invalid L4 port range {low}..={high}")]
    InvalidPortRange { low: u16, high: u16 },
}

impl UpfEntityError {
    pub(crate) fn missing(entity: UpfEntityType, field: &'static str) -> Self {
        Self::MissingField { entity, field }
    }
}

/// Kind of a UPF entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpfEntityType {
    Interface,
    SessionUplink,
    SessionDownlink,
    TerminationUplink,
    TerminationDownlink,
    TunnelPeer,
    Application,
    Counter,
}

impl UpfEntityType {
    /// All entity kinds, in pipeline order.
    pub const ALL: [UpfEntityType; 8] = [
        Self::Interface,
        Self::SessionUplink,
        Self::SessionDownlink,
        Self::TerminationUplink,
        Self::TerminationDownlink,
        Self::TunnelPeer,
        Self::Application,
        Self::Counter,
    ];

    /// Name used in logs and error messages.
    pub const fn human_readable_name(&self) -> &'static str {
        match self {
            Self::Interface => "interface",
            Self::SessionUplink => "session_uplink",
            Self::SessionDownlink => "session_downlink",
            Self::TerminationUplink => "termination_uplink",
            Self::TerminationDownlink => "termination_downlink",
            Self::TunnelPeer => "tunnel_peer",
            Self::Application => "application",
            Self::Counter => "counter",
        }
    }
}

impl fmt::Display for UpfEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.human_readable_name())
    }
}

/// A UPF entity of any kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UpfEntity {
    Interface(UpfInterface),
    SessionUplink(UpfSessionUplink),
    SessionDownlink(UpfSessionDownlink),
    TerminationUplink(UpfTerminationUplink),
    TerminationDownlink(UpfTerminationDownlink),
    TunnelPeer(UpfGtpTunnelPeer),
    Application(UpfApplication),
    Counter(UpfCounter),
}

impl UpfEntity {
    pub fn entity_type(&self) -> UpfEntityType {
        match self {
            Self::Interface(_) => UpfEntityType::Interface,
            Self::SessionUplink(_) => UpfEntityType::SessionUplink,
            Self::SessionDownlink(_) => UpfEntityType::SessionDownlink,
            Self::TerminationUplink(_) => UpfEntityType::TerminationUplink,
            Self::TerminationDownlink(_) => UpfEntityType::TerminationDownlink,
            Self::TunnelPeer(_) => UpfEntityType::TunnelPeer,
            Self::Application(_) => UpfEntityType::Application,
            Self::Counter(_) => UpfEntityType::Counter,
        }
    }
}

impl fmt::Display for UpfEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interface(e) => e.fmt(f),
            Self::SessionUplink(e) => e.fmt(f),
            Self::SessionDownlink(e) => e.fmt(f),
            Self::TerminationUplink(e) => e.fmt(f),
            Self::TerminationDownlink(e) => e.fmt(f),
            Self::TunnelPeer(e) => e.fmt(f),
            Self::Application(e) => e.fmt(f),
            Self::Counter(e) => e.fmt(f),
        }
    }
}

macro_rules! impl_from_entity {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for UpfEntity {
                fn from(entity: $ty) -> Self {
                    UpfEntity::$variant(entity)
                }
            }
        )*
    };
}

impl_from_entity!(
    Interface(UpfInterface),
    SessionUplink(UpfSessionUplink),
    SessionDownlink(UpfSessionDownlink),
    TerminationUplink(UpfTerminationUplink),
    TerminationDownlink(UpfTerminationDownlink),
    TunnelPeer(UpfGtpTunnelPeer),
    Application(UpfApplication),
    Counter(UpfCounter),
);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use up4_types::Ipv4Address;

    #[test]
    fn test_entity_type_names() {
        let names: Vec<&str> = UpfEntityType::ALL
            .iter()
            .map(|t| t.human_readable_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "interface",
                "session_uplink",
                "session_downlink",
                "termination_uplink",
                "termination_downlink",
                "tunnel_peer",
                "application",
                "counter",
            ]
        );
    }

    #[test]
    fn test_entity_type_of_variant() {
        let peer = UpfGtpTunnelPeer::builder()
            .with_tunnel_peer_id(1)
            .with_src_addr(Ipv4Address::new(10, 0, 0, 1))
            .with_dst_addr(Ipv4Address::new(10, 0, 0, 2))
            .with_src_port(2152)
            .build()
            .unwrap();
        assert_eq!(UpfEntity::from(peer).entity_type(), UpfEntityType::TunnelPeer);
        assert_eq!(
            UpfEntity::from(UpfCounter::new(3)).entity_type(),
            UpfEntityType::Counter
        );
    }

    #[test]
    fn test_entity_json_tagging() {
        let session = UpfSessionUplink::builder()
            .with_tun_dst_addr(Ipv4Address::new(140, 0, 100, 254))
            .with_teid(1)
            .build()
            .unwrap();
        let entity = UpfEntity::from(session);
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "session_uplink");
        assert_eq!(json["tun_dst_addr"], "140.0.100.254");

        let back: UpfEntity = serde_json::from_value(json).unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn test_missing_field_message() {
        let err = UpfSessionUplink::builder().with_teid(1).build().unwrap_err();
        assert_eq!(
            err.to_string(),
            "session_uplink requires field 'tun_dst_addr'"
        );
    }
}
