//! Table entry to UPF entity translation.

use thiserror::Error;
use tracing::debug;
use up4_pi::{PiActionId, PiTableEntry, PiTableId};
use up4_upf::{
    UpfApplication, UpfEntity, UpfEntityError, UpfEntityType, UpfGtpTunnelPeer, UpfInterface,
    UpfSessionDownlink, UpfSessionUplink, UpfTerminationDownlink, UpfTerminationUplink,
    SLICE_MOBILE,
};

use crate::error::{TranslationResult, Up4TranslationError};
use crate::p4info::{
    actions, fields, params, table_by_id, MatchKeyError, IFACE_ACCESS, IFACE_CORE,
};
use crate::util::{self, FieldError};

#[derive(Debug, Error)]
enum DecodeError {
    #[error("not a UP4 table")]
    UnknownTable,

    #[error("action '{action}' is not valid for table '{table}'")]
    UnexpectedAction { table: PiTableId, action: PiActionId },

    #[error("unsupported source interface type {0}")]
    UnsupportedInterfaceType(u8),

    #[error(transparent)]
    MatchKey(#[from] MatchKeyError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Entity(#[from] UpfEntityError),
}

/// Translates a UP4 table entry into the UPF entity it programs.
///
/// Fails with [`Up4TranslationError::UnsupportedEntity`] when the entry is not
/// in a UP4 table, carries an action its table does not accept, or misses or
/// malforms a field or parameter that its action requires.
pub fn decode(entry: &PiTableEntry) -> TranslationResult<UpfEntity> {
    decode_entry(entry).map_err(|e| {
        debug!(entry = %entry, error = %e, "rejecting table entry");
        Up4TranslationError::unsupported_entry(e.to_string(), entry)
    })
}

fn decode_entry(entry: &PiTableEntry) -> Result<UpfEntity, DecodeError> {
    let info = table_by_id(entry.table()).ok_or(DecodeError::UnknownTable)?;
    let action = util::action(entry)?;
    if !info.accepts_action(action.id()) {
        return Err(DecodeError::UnexpectedAction {
            table: entry.table().clone(),
            action: action.id().clone(),
        });
    }
    info.check_match_key(entry.match_key())?;

    let entity = match info.entity_type {
        UpfEntityType::Interface => decode_interface(entry)?.into(),
        UpfEntityType::SessionUplink => decode_session_uplink(entry)?.into(),
        UpfEntityType::SessionDownlink => decode_session_downlink(entry)?.into(),
        UpfEntityType::TerminationUplink => decode_termination_uplink(entry)?.into(),
        UpfEntityType::TerminationDownlink => decode_termination_downlink(entry)?.into(),
        UpfEntityType::TunnelPeer => decode_tunnel_peer(entry)?.into(),
        UpfEntityType::Application => decode_application(entry)?.into(),
        // No table holds counters.
        UpfEntityType::Counter => return Err(DecodeError::UnknownTable),
    };
    Ok(entity)
}

fn decode_interface(entry: &PiTableEntry) -> Result<UpfInterface, DecodeError> {
    let action = util::action(entry)?;
    // The direction parameter follows from the interface type and is not read.
    let builder = match util::param_u8(action, &params::SRC_IFACE)? {
        IFACE_ACCESS => UpfInterface::builder().set_access(),
        IFACE_CORE => UpfInterface::builder().set_core(),
        other => return Err(DecodeError::UnsupportedInterfaceType(other)),
    };
    Ok(builder
        .with_prefix(util::field_prefix(entry, &fields::IPV4_DST_PREFIX)?)
        .with_slice_id(SLICE_MOBILE)
        .build()?)
}

fn decode_session_uplink(entry: &PiTableEntry) -> Result<UpfSessionUplink, DecodeError> {
    let action = util::action(entry)?;
    Ok(UpfSessionUplink::builder()
        .with_tun_dst_addr(util::field_address(entry, &fields::N3_ADDRESS)?)
        .with_teid(util::field_u32(entry, &fields::TEID)?)
        .needs_dropping(action.id() == &actions::SET_SESSION_UPLINK_DROP)
        .build()?)
}

fn decode_session_downlink(entry: &PiTableEntry) -> Result<UpfSessionDownlink, DecodeError> {
    let action = util::action(entry)?;
    let builder = UpfSessionDownlink::builder()
        .with_ue_address(util::field_address(entry, &fields::UE_ADDRESS)?);
    let builder = if action.id() == &actions::SET_SESSION_DOWNLINK_DROP {
        builder.needs_dropping(true)
    } else if action.id() == &actions::SET_SESSION_DOWNLINK_BUFF {
        builder.needs_buffering(true)
    } else {
        builder.with_gtp_tunnel_peer_id(util::param_u8(action, &params::TUNNEL_PEER_ID)?)
    };
    Ok(builder.build()?)
}

fn decode_termination_uplink(entry: &PiTableEntry) -> Result<UpfTerminationUplink, DecodeError> {
    let action = util::action(entry)?;
    let mut builder = UpfTerminationUplink::builder()
        .with_ue_session_id(util::field_address(entry, &fields::UE_ADDRESS)?)
        .with_application_id(util::field_u8(entry, &fields::APP_ID)?)
        .with_counter_id(util::param_u32(action, &params::CTR_IDX)?);
    if action.id() == &actions::UPLINK_TERM_DROP {
        builder = builder.needs_dropping(true);
    } else if action.id() == &actions::UPLINK_TERM_FWD {
        builder = builder.with_traffic_class(util::param_u8(action, &params::TC)?);
    }
    Ok(builder.build()?)
}

fn decode_termination_downlink(
    entry: &PiTableEntry,
) -> Result<UpfTerminationDownlink, DecodeError> {
    let action = util::action(entry)?;
    let mut builder = UpfTerminationDownlink::builder()
        .with_ue_session_id(util::field_address(entry, &fields::UE_ADDRESS)?)
        .with_application_id(util::field_u8(entry, &fields::APP_ID)?)
        .with_counter_id(util::param_u32(action, &params::CTR_IDX)?);
    if action.id() == &actions::DOWNLINK_TERM_DROP {
        builder = builder.needs_dropping(true);
    } else {
        builder = builder
            .with_teid(util::param_u32(action, &params::TEID)?)
            .with_qfi(util::param_u8(action, &params::QFI)?);
        if action.id() == &actions::DOWNLINK_TERM_FWD {
            builder = builder.with_traffic_class(util::param_u8(action, &params::TC)?);
        }
    }
    Ok(builder.build()?)
}

fn decode_tunnel_peer(entry: &PiTableEntry) -> Result<UpfGtpTunnelPeer, DecodeError> {
    let action = util::action(entry)?;
    Ok(UpfGtpTunnelPeer::builder()
        .with_tunnel_peer_id(util::field_u8(entry, &fields::TUNNEL_PEER_ID)?)
        .with_src_addr(util::param_address(action, &params::SRC_ADDR)?)
        .with_dst_addr(util::param_address(action, &params::DST_ADDR)?)
        .with_src_port(util::param_u16(action, &params::SPORT)?)
        .build()?)
}

fn decode_application(entry: &PiTableEntry) -> Result<UpfApplication, DecodeError> {
    let action = util::action(entry)?;
    let mut builder = UpfApplication::builder()
        .with_app_id(util::param_u8(action, &params::APP_ID)?)
        .with_priority(util::priority(entry)?)
        .with_slice_id(SLICE_MOBILE);
    if util::field_is_present(entry, &fields::APP_IP_ADDR) {
        builder = builder.with_ip4_prefix(util::field_prefix(entry, &fields::APP_IP_ADDR)?);
    }
    if util::field_is_present(entry, &fields::APP_L4_PORT) {
        builder = builder.with_l4_port_range(util::field_range_u16(entry, &fields::APP_L4_PORT)?);
    }
    if util::field_is_present(entry, &fields::APP_IP_PROTO) {
        builder = builder.with_ip_proto(util::field_ternary_u8(entry, &fields::APP_IP_PROTO)?);
    }
    Ok(builder.build()?)
}
