//! UPF entity to table entry translation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;
use up4_pi::{
    PiAction, PiActionBuilder, PiActionParam, PiActionParamId, PiBuildError, PiFieldMatch,
    PiMatchKey, PiTableEntry,
};
use up4_types::{ByteSequence, Ipv4Address};
use up4_upf::{
    UpfApplication, UpfEntity, UpfGtpTunnelPeer, UpfInterface, UpfSessionDownlink,
    UpfSessionUplink, UpfTerminationDownlink, UpfTerminationUplink, SLICE_MOBILE,
};

use crate::error::{TranslationResult, Up4TranslationError};
use crate::p4info::{
    actions, fields, params, table_for, MatchKeyError, DIRECTION_DOWNLINK, DIRECTION_UPLINK,
    IFACE_ACCESS, IFACE_CORE,
};

/// A table entry produced by [`encode`], with an advisory when the entity
/// could not be represented exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedEntry {
    pub entry: PiTableEntry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory: Option<EncodeAdvisory>,
}

/// A lossy but accepted encoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EncodeAdvisory {
    /// The pipeline cannot drop and buffer at once; the session was encoded
    /// as buffering only. `normalized` is the session actually encoded.
    DropAndBufferDowngraded { normalized: UpfSessionDownlink },
}

impl fmt::Display for EncodeAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DropAndBufferDowngraded { normalized } => write!(
                f,
                "drop and buffer is not supported, encoded as buffer only: {}",
                normalized
            ),
        }
    }
}

#[derive(Debug, Error)]
enum EncodeError {
    #[error("counters are not stored in a table")]
    NoTable,

    #[error("interface is neither access nor core")]
    UnsupportedInterfaceType,

    #[error("forwarding downlink session requires a tunnel peer id")]
    MissingTunnelPeer,

    #[error("forwarding downlink termination requires {0}")]
    MissingTunnelParam(&'static str),

    #[error("empty L4 port range {low}..={high}")]
    EmptyPortRange { low: u16, high: u16 },

    #[error(transparent)]
    MatchKey(#[from] MatchKeyError),

    #[error(transparent)]
    Build(#[from] PiBuildError),
}

/// The match key, action and priority of an entry, before its table is known.
struct EntryParts {
    match_key: PiMatchKey,
    action: PiAction,
    priority: Option<i32>,
    advisory: Option<EncodeAdvisory>,
}

impl EntryParts {
    fn new(match_key: PiMatchKey, action: PiAction) -> Self {
        Self {
            match_key,
            action,
            priority: None,
            advisory: None,
        }
    }
}

/// Translates a UPF entity into the table entry that programs it.
///
/// Counters and entities whose state has no table representation fail with
/// [`Up4TranslationError::UnsupportedEntity`].
pub fn encode(entity: &UpfEntity) -> TranslationResult<EncodedEntry> {
    encode_entity(entity).map_err(|e| {
        debug!(entity = %entity, error = %e, "rejecting UPF entity");
        Up4TranslationError::unsupported_entity(e.to_string(), entity)
    })
}

fn encode_entity(entity: &UpfEntity) -> Result<EncodedEntry, EncodeError> {
    let info = table_for(entity.entity_type()).ok_or(EncodeError::NoTable)?;
    let parts = match entity {
        UpfEntity::Interface(e) => encode_interface(e)?,
        UpfEntity::SessionUplink(e) => encode_session_uplink(e)?,
        UpfEntity::SessionDownlink(e) => encode_session_downlink(e)?,
        UpfEntity::TerminationUplink(e) => encode_termination_uplink(e)?,
        UpfEntity::TerminationDownlink(e) => encode_termination_downlink(e)?,
        UpfEntity::TunnelPeer(e) => encode_tunnel_peer(e)?,
        UpfEntity::Application(e) => encode_application(e)?,
        UpfEntity::Counter(_) => return Err(EncodeError::NoTable),
    };
    info.check_match_key(&parts.match_key)?;

    let mut builder = PiTableEntry::builder()
        .for_table(info.table.clone())
        .with_match_key(parts.match_key)
        .with_action(parts.action);
    if let Some(priority) = parts.priority {
        builder = builder.with_priority(priority);
    }
    Ok(EncodedEntry {
        entry: builder.build()?,
        advisory: parts.advisory,
    })
}

fn key(matches: impl IntoIterator<Item = PiFieldMatch>) -> PiMatchKey {
    matches
        .into_iter()
        .fold(PiMatchKey::builder(), |b, m| b.add_field_match(m))
        .build()
}

fn with_param(
    builder: PiActionBuilder,
    id: PiActionParamId,
    value: ByteSequence,
) -> PiActionBuilder {
    builder.with_parameter(PiActionParam::new(id, value))
}

/// The slice parameter is always `SLICE_MOBILE`; any other `slice_id` on the
/// interface is not carried into the entry.
fn encode_interface(iface: &UpfInterface) -> Result<EntryParts, EncodeError> {
    let (src_iface, direction) = if iface.is_access() {
        (IFACE_ACCESS, DIRECTION_UPLINK)
    } else if iface.is_core() {
        (IFACE_CORE, DIRECTION_DOWNLINK)
    } else {
        return Err(EncodeError::UnsupportedInterfaceType);
    };
    let action = PiAction::builder().with_id(actions::SET_SOURCE_IFACE);
    let action = with_param(action, params::SRC_IFACE, ByteSequence::from_u8(src_iface));
    let action = with_param(action, params::DIRECTION, ByteSequence::from_u8(direction));
    let action = with_param(action, params::SLICE_ID, ByteSequence::from_u8(SLICE_MOBILE));

    let match_key = key([PiFieldMatch::lpm(
        fields::IPV4_DST_PREFIX,
        ByteSequence::from_ipv4(iface.prefix.address()),
        u32::from(iface.prefix.prefix_len()),
    )]);
    Ok(EntryParts::new(match_key, action.build()?))
}

fn encode_session_uplink(session: &UpfSessionUplink) -> Result<EntryParts, EncodeError> {
    let match_key = key([
        PiFieldMatch::exact(
            fields::N3_ADDRESS,
            ByteSequence::from_ipv4(&session.tun_dst_addr),
        ),
        PiFieldMatch::exact(fields::TEID, ByteSequence::from_u32(session.teid)),
    ]);
    let action_id = if session.needs_dropping() {
        actions::SET_SESSION_UPLINK_DROP
    } else {
        actions::SET_SESSION_UPLINK
    };
    Ok(EntryParts::new(
        match_key,
        PiAction::builder().with_id(action_id).build()?,
    ))
}

fn encode_session_downlink(session: &UpfSessionDownlink) -> Result<EntryParts, EncodeError> {
    let match_key = key([PiFieldMatch::exact(
        fields::UE_ADDRESS,
        ByteSequence::from_ipv4(&session.ue_address),
    )]);

    let mut advisory = None;
    let action = if session.needs_dropping() && session.needs_buffering() {
        let mut normalized = session.clone();
        normalized.drop = false;
        advisory = Some(EncodeAdvisory::DropAndBufferDowngraded { normalized });
        PiAction::builder().with_id(actions::SET_SESSION_DOWNLINK_BUFF)
    } else if session.needs_dropping() {
        PiAction::builder().with_id(actions::SET_SESSION_DOWNLINK_DROP)
    } else if session.needs_buffering() {
        PiAction::builder().with_id(actions::SET_SESSION_DOWNLINK_BUFF)
    } else {
        let peer = session.tun_peer_id.ok_or(EncodeError::MissingTunnelPeer)?;
        with_param(
            PiAction::builder().with_id(actions::SET_SESSION_DOWNLINK),
            params::TUNNEL_PEER_ID,
            ByteSequence::from_u8(peer),
        )
    };

    let mut parts = EntryParts::new(match_key, action.build()?);
    parts.advisory = advisory;
    Ok(parts)
}

fn termination_key(ue_address: &Ipv4Address, app_id: u8) -> PiMatchKey {
    key([
        PiFieldMatch::exact(fields::UE_ADDRESS, ByteSequence::from_ipv4(ue_address)),
        PiFieldMatch::exact(fields::APP_ID, ByteSequence::from_u8(app_id)),
    ])
}

fn encode_termination_uplink(term: &UpfTerminationUplink) -> Result<EntryParts, EncodeError> {
    let action = with_param(
        PiAction::builder(),
        params::CTR_IDX,
        ByteSequence::from_u32(term.counter_id),
    );
    let action = if term.needs_dropping() {
        action.with_id(actions::UPLINK_TERM_DROP)
    } else if let Some(tc) = term.traffic_class {
        with_param(action, params::TC, ByteSequence::from_u8(tc)).with_id(actions::UPLINK_TERM_FWD)
    } else {
        action.with_id(actions::UPLINK_TERM_FWD_NO_TC)
    };
    Ok(EntryParts::new(
        termination_key(&term.ue_session_id, term.application_id),
        action.build()?,
    ))
}

fn encode_termination_downlink(term: &UpfTerminationDownlink) -> Result<EntryParts, EncodeError> {
    let action = with_param(
        PiAction::builder(),
        params::CTR_IDX,
        ByteSequence::from_u32(term.counter_id),
    );
    let action = if term.needs_dropping() {
        action.with_id(actions::DOWNLINK_TERM_DROP)
    } else {
        let teid = term.teid.ok_or(EncodeError::MissingTunnelParam("a TEID"))?;
        let qfi = term.qfi.ok_or(EncodeError::MissingTunnelParam("a QFI"))?;
        let action = with_param(action, params::TEID, ByteSequence::from_u32(teid));
        let action = with_param(action, params::QFI, ByteSequence::from_u8(qfi));
        match term.traffic_class {
            Some(tc) => with_param(action, params::TC, ByteSequence::from_u8(tc))
                .with_id(actions::DOWNLINK_TERM_FWD),
            None => action.with_id(actions::DOWNLINK_TERM_FWD_NO_TC),
        }
    };
    Ok(EntryParts::new(
        termination_key(&term.ue_session_id, term.application_id),
        action.build()?,
    ))
}

fn encode_tunnel_peer(peer: &UpfGtpTunnelPeer) -> Result<EntryParts, EncodeError> {
    let match_key = key([PiFieldMatch::exact(
        fields::TUNNEL_PEER_ID,
        ByteSequence::from_u8(peer.tun_peer_id),
    )]);
    let action = PiAction::builder().with_id(actions::LOAD_TUNNEL_PARAM);
    let action = with_param(action, params::SRC_ADDR, ByteSequence::from_ipv4(&peer.src_addr));
    let action = with_param(action, params::DST_ADDR, ByteSequence::from_ipv4(&peer.dst_addr));
    let action = with_param(action, params::SPORT, ByteSequence::from_u16(peer.src_port));
    Ok(EntryParts::new(match_key, action.build()?))
}

fn encode_application(app: &UpfApplication) -> Result<EntryParts, EncodeError> {
    let mut matches = Vec::with_capacity(3);
    if let Some(prefix) = &app.ip4_prefix {
        matches.push(PiFieldMatch::lpm(
            fields::APP_IP_ADDR,
            ByteSequence::from_ipv4(prefix.address()),
            u32::from(prefix.prefix_len()),
        ));
    }
    if let Some(range) = &app.l4_port_range {
        // Deserialized entities skip the builder, so the range is checked here.
        if range.is_empty() {
            return Err(EncodeError::EmptyPortRange {
                low: *range.start(),
                high: *range.end(),
            });
        }
        matches.push(PiFieldMatch::range(
            fields::APP_L4_PORT,
            ByteSequence::from_u16(*range.start()),
            ByteSequence::from_u16(*range.end()),
        ));
    }
    if let Some(proto) = app.ip_proto {
        matches.push(PiFieldMatch::ternary(
            fields::APP_IP_PROTO,
            ByteSequence::from_u8(proto),
            ByteSequence::ones(1),
        ));
    }
    let action = with_param(
        PiAction::builder().with_id(actions::SET_APP_ID),
        params::APP_ID,
        ByteSequence::from_u8(app.app_id),
    );

    let mut parts = EntryParts::new(key(matches), action.build()?);
    parts.priority = Some(app.priority);
    Ok(parts)
}
