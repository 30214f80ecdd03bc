//! Well-known identifiers of the UP4 pipeline.
//!
//! Names follow the pipeline's P4Info. The mapping from entity kind to table
//! is an exhaustive `match`, so adding an entity kind without a table fails to
//! compile rather than producing entries for the wrong table.

use thiserror::Error;
use up4_pi::{PiActionId, PiCounterId, PiMatchFieldId, PiMatchKey, PiMatchType, PiTableId};
use up4_upf::UpfEntityType;

pub mod tables {
    use super::PiTableId;

    pub const INTERFACES: PiTableId = PiTableId::of("PreQosPipe.interfaces");
    pub const SESSIONS_UPLINK: PiTableId = PiTableId::of("PreQosPipe.sessions_uplink");
    pub const SESSIONS_DOWNLINK: PiTableId = PiTableId::of("PreQosPipe.sessions_downlink");
    pub const TERMINATIONS_UPLINK: PiTableId = PiTableId::of("PreQosPipe.terminations_uplink");
    pub const TERMINATIONS_DOWNLINK: PiTableId =
        PiTableId::of("PreQosPipe.terminations_downlink");
    pub const TUNNEL_PEERS: PiTableId = PiTableId::of("PreQosPipe.tunnel_peers");
    pub const APPLICATIONS: PiTableId = PiTableId::of("PreQosPipe.applications");
}

pub mod counters {
    use super::PiCounterId;

    pub const PRE_QOS_COUNTER: PiCounterId = PiCounterId::of("PreQosPipe.pre_qos_counter");
    pub const POST_QOS_COUNTER: PiCounterId = PiCounterId::of("PostQosPipe.post_qos_counter");
}

pub mod fields {
    use super::PiMatchFieldId;

    pub const IPV4_DST_PREFIX: PiMatchFieldId = PiMatchFieldId::of("ipv4_dst_prefix");
    pub const N3_ADDRESS: PiMatchFieldId = PiMatchFieldId::of("n3_address");
    pub const TEID: PiMatchFieldId = PiMatchFieldId::of("teid");
    pub const UE_ADDRESS: PiMatchFieldId = PiMatchFieldId::of("ue_address");
    pub const APP_ID: PiMatchFieldId = PiMatchFieldId::of("app_id");
    pub const TUNNEL_PEER_ID: PiMatchFieldId = PiMatchFieldId::of("tunnel_peer_id");
    pub const APP_IP_ADDR: PiMatchFieldId = PiMatchFieldId::of("app_ip_addr");
    pub const APP_L4_PORT: PiMatchFieldId = PiMatchFieldId::of("app_l4_port");
    pub const APP_IP_PROTO: PiMatchFieldId = PiMatchFieldId::of("app_ip_proto");
}

pub mod actions {
    use super::PiActionId;

    pub const SET_SOURCE_IFACE: PiActionId = PiActionId::of("PreQosPipe.set_source_iface");
    pub const SET_SESSION_UPLINK: PiActionId = PiActionId::of("PreQosPipe.set_session_uplink");
    pub const SET_SESSION_UPLINK_DROP: PiActionId =
        PiActionId::of("PreQosPipe.set_session_uplink_drop");
    pub const SET_SESSION_DOWNLINK: PiActionId =
        PiActionId::of("PreQosPipe.set_session_downlink");
    pub const SET_SESSION_DOWNLINK_DROP: PiActionId =
        PiActionId::of("PreQosPipe.set_session_downlink_drop");
    pub const SET_SESSION_DOWNLINK_BUFF: PiActionId =
        PiActionId::of("PreQosPipe.set_session_downlink_buff");
    pub const UPLINK_TERM_FWD: PiActionId = PiActionId::of("PreQosPipe.uplink_term_fwd");
    pub const UPLINK_TERM_FWD_NO_TC: PiActionId =
        PiActionId::of("PreQosPipe.uplink_term_fwd_no_tc");
    pub const UPLINK_TERM_DROP: PiActionId = PiActionId::of("PreQosPipe.uplink_term_drop");
    pub const DOWNLINK_TERM_FWD: PiActionId = PiActionId::of("PreQosPipe.downlink_term_fwd");
    pub const DOWNLINK_TERM_FWD_NO_TC: PiActionId =
        PiActionId::of("PreQosPipe.downlink_term_fwd_no_tc");
    pub const DOWNLINK_TERM_DROP: PiActionId = PiActionId::of("PreQosPipe.downlink_term_drop");
    pub const LOAD_TUNNEL_PARAM: PiActionId = PiActionId::of("PreQosPipe.load_tunnel_param");
    pub const SET_APP_ID: PiActionId = PiActionId::of("PreQosPipe.set_app_id");
}

pub mod params {
    use up4_pi::PiActionParamId;

    pub const SRC_IFACE: PiActionParamId = PiActionParamId::of("src_iface");
    pub const DIRECTION: PiActionParamId = PiActionParamId::of("direction");
    pub const SLICE_ID: PiActionParamId = PiActionParamId::of("slice_id");
    pub const TUNNEL_PEER_ID: PiActionParamId = PiActionParamId::of("tunnel_peer_id");
    pub const CTR_IDX: PiActionParamId = PiActionParamId::of("ctr_idx");
    pub const TC: PiActionParamId = PiActionParamId::of("tc");
    pub const TEID: PiActionParamId = PiActionParamId::of("teid");
    pub const QFI: PiActionParamId = PiActionParamId::of("qfi");
    pub const SRC_ADDR: PiActionParamId = PiActionParamId::of("src_addr");
    pub const DST_ADDR: PiActionParamId = PiActionParamId::of("dst_addr");
    pub const SPORT: PiActionParamId = PiActionParamId::of("sport");
    pub const APP_ID: PiActionParamId = PiActionParamId::of("app_id");
}

// Values of the `src_iface` parameter.
pub const IFACE_ACCESS: u8 = 1;
pub const IFACE_CORE: u8 = 2;

// Values of the `direction` parameter.
pub const DIRECTION_UPLINK: u8 = 1;
pub const DIRECTION_DOWNLINK: u8 = 2;

/// A match field of a table and the match kind it is programmed with.
#[derive(Debug)]
pub struct MatchFieldInfo {
    pub id: PiMatchFieldId,
    pub match_type: PiMatchType,
}

/// A UP4 table: the entity kind stored in it, its match fields and the
/// actions it accepts.
#[derive(Debug)]
pub struct TableInfo {
    pub entity_type: UpfEntityType,
    pub table: PiTableId,
    pub match_fields: &'static [MatchFieldInfo],
    pub actions: &'static [PiActionId],
}

impl TableInfo {
    /// Returns true if the table accepts the given action.
    pub fn accepts_action(&self, action: &PiActionId) -> bool {
        self.actions.contains(action)
    }

    /// Returns the declared match kind of a field, if the table has it.
    pub fn match_type_of(&self, field: &PiMatchFieldId) -> Option<PiMatchType> {
        self.match_fields
            .iter()
            .find(|f| &f.id == field)
            .map(|f| f.match_type)
    }

    /// Checks that every field of `key` is declared by this table and is
    /// matched with the declared kind. Declared fields may be absent.
    pub fn check_match_key(&self, key: &PiMatchKey) -> Result<(), MatchKeyError> {
        for field_match in key.field_matches() {
            let actual = field_match.match_type();
            match self.match_type_of(&field_match.field_id) {
                None => {
                    return Err(MatchKeyError::UnknownField {
                        table: self.table.clone(),
                        field: field_match.field_id.clone(),
                    })
                }
                Some(expected) if expected != actual => {
                    return Err(MatchKeyError::WrongMatchType {
                        field: field_match.field_id.clone(),
                        expected,
                        actual,
                    })
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// A match key that does not fit its table's declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchKeyError {
    #[error("table '{table}' has no match field '{field}'")]
    UnknownField {
        table: PiTableId,
        field: PiMatchFieldId,
    },

    #[error("match field '{field}' is {actual}, expected {expected}")]
    WrongMatchType {
        field: PiMatchFieldId,
        expected: PiMatchType,
        actual: PiMatchType,
    },
}

macro_rules! field {
    ($id:expr, $match_type:ident) => {
        MatchFieldInfo {
            id: $id,
            match_type: PiMatchType::$match_type,
        }
    };
}

static INTERFACE_FIELDS: [MatchFieldInfo; 1] = [field!(fields::IPV4_DST_PREFIX, Lpm)];
static SESSION_UPLINK_FIELDS: [MatchFieldInfo; 2] = [
    field!(fields::N3_ADDRESS, Exact),
    field!(fields::TEID, Exact),
];
static SESSION_DOWNLINK_FIELDS: [MatchFieldInfo; 1] = [field!(fields::UE_ADDRESS, Exact)];
static TERMINATION_FIELDS: [MatchFieldInfo; 2] = [
    field!(fields::UE_ADDRESS, Exact),
    field!(fields::APP_ID, Exact),
];
static TUNNEL_PEER_FIELDS: [MatchFieldInfo; 1] = [field!(fields::TUNNEL_PEER_ID, Exact)];
static APPLICATION_FIELDS: [MatchFieldInfo; 3] = [
    field!(fields::APP_IP_ADDR, Lpm),
    field!(fields::APP_L4_PORT, Range),
    field!(fields::APP_IP_PROTO, Ternary),
];

static INTERFACE_ACTIONS: [PiActionId; 1] = [actions::SET_SOURCE_IFACE];
static SESSION_UPLINK_ACTIONS: [PiActionId; 2] = [
    actions::SET_SESSION_UPLINK,
    actions::SET_SESSION_UPLINK_DROP,
];
static SESSION_DOWNLINK_ACTIONS: [PiActionId; 3] = [
    actions::SET_SESSION_DOWNLINK,
    actions::SET_SESSION_DOWNLINK_DROP,
    actions::SET_SESSION_DOWNLINK_BUFF,
];
static TERMINATION_UPLINK_ACTIONS: [PiActionId; 3] = [
    actions::UPLINK_TERM_FWD,
    actions::UPLINK_TERM_FWD_NO_TC,
    actions::UPLINK_TERM_DROP,
];
static TERMINATION_DOWNLINK_ACTIONS: [PiActionId; 3] = [
    actions::DOWNLINK_TERM_FWD,
    actions::DOWNLINK_TERM_FWD_NO_TC,
    actions::DOWNLINK_TERM_DROP,
];
static TUNNEL_PEER_ACTIONS: [PiActionId; 1] = [actions::LOAD_TUNNEL_PARAM];
static APPLICATION_ACTIONS: [PiActionId; 1] = [actions::SET_APP_ID];

/// Every UP4 table, in pipeline order.
pub static TABLES: [TableInfo; 7] = [
    TableInfo {
        entity_type: UpfEntityType::Interface,
        table: tables::INTERFACES,
        match_fields: &INTERFACE_FIELDS,
        actions: &INTERFACE_ACTIONS,
    },
    TableInfo {
        entity_type: UpfEntityType::SessionUplink,
        table: tables::SESSIONS_UPLINK,
        match_fields: &SESSION_UPLINK_FIELDS,
        actions: &SESSION_UPLINK_ACTIONS,
    },
    TableInfo {
        entity_type: UpfEntityType::SessionDownlink,
        table: tables::SESSIONS_DOWNLINK,
        match_fields: &SESSION_DOWNLINK_FIELDS,
        actions: &SESSION_DOWNLINK_ACTIONS,
    },
    TableInfo {
        entity_type: UpfEntityType::TerminationUplink,
        table: tables::TERMINATIONS_UPLINK,
        match_fields: &TERMINATION_FIELDS,
        actions: &TERMINATION_UPLINK_ACTIONS,
    },
    TableInfo {
        entity_type: UpfEntityType::TerminationDownlink,
        table: tables::TERMINATIONS_DOWNLINK,
        match_fields: &TERMINATION_FIELDS,
        actions: &TERMINATION_DOWNLINK_ACTIONS,
    },
    TableInfo {
        entity_type: UpfEntityType::TunnelPeer,
        table: tables::TUNNEL_PEERS,
        match_fields: &TUNNEL_PEER_FIELDS,
        actions: &TUNNEL_PEER_ACTIONS,
    },
    TableInfo {
        entity_type: UpfEntityType::Application,
        table: tables::APPLICATIONS,
        match_fields: &APPLICATION_FIELDS,
        actions: &APPLICATION_ACTIONS,
    },
];

/// The counter banks whose cells are UPF counters (one per pipeline stage).
pub static COUNTERS: [PiCounterId; 2] = [counters::PRE_QOS_COUNTER, counters::POST_QOS_COUNTER];

/// Returns the table storing entities of the given kind.
///
/// Counters live in counter banks, not tables, so they have none.
pub fn table_for(entity_type: UpfEntityType) -> Option<&'static TableInfo> {
    let index = match entity_type {
        UpfEntityType::Interface => 0,
        UpfEntityType::SessionUplink => 1,
        UpfEntityType::SessionDownlink => 2,
        UpfEntityType::TerminationUplink => 3,
        UpfEntityType::TerminationDownlink => 4,
        UpfEntityType::TunnelPeer => 5,
        UpfEntityType::Application => 6,
        UpfEntityType::Counter => return None,
    };
    TABLES.get(index)
}

/// Looks up a UP4 table by its identifier.
pub fn table_by_id(table: &PiTableId) -> Option<&'static TableInfo> {
    TABLES.iter().find(|t| &t.table == table)
}

/// Returns true if the counter is one of the UPF counter banks.
pub fn is_upf_counter(counter: &PiCounterId) -> bool {
    COUNTERS.contains(counter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_table_mapping_is_bijective() {
        for entity_type in UpfEntityType::ALL {
            match table_for(entity_type) {
                Some(info) => {
                    assert_eq!(info.entity_type, entity_type);
                    assert_eq!(
                        table_by_id(&info.table).map(|t| t.entity_type),
                        Some(entity_type)
                    );
                }
                None => assert_eq!(entity_type, UpfEntityType::Counter),
            }
        }
    }

    #[test]
    fn test_table_ids_unique() {
        let ids: HashSet<&str> = TABLES.iter().map(|t| t.table.name()).collect();
        assert_eq!(ids.len(), TABLES.len());
    }

    #[test]
    fn test_action_ids_unique_across_tables() {
        let all: Vec<&PiActionId> = TABLES.iter().flat_map(|t| t.actions.iter()).collect();
        let unique: HashSet<&PiActionId> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_counter_banks() {
        assert!(is_upf_counter(&counters::PRE_QOS_COUNTER));
        assert!(is_upf_counter(&counters::POST_QOS_COUNTER));
        assert!(!is_upf_counter(&PiCounterId::of("PreQosPipe.unknown_counter")));
    }

    #[test]
    fn test_match_types() {
        let apps = table_for(UpfEntityType::Application).unwrap();
        assert_eq!(
            apps.match_type_of(&fields::APP_L4_PORT),
            Some(PiMatchType::Range)
        );
        assert_eq!(
            apps.match_type_of(&fields::APP_IP_PROTO),
            Some(PiMatchType::Ternary)
        );
        assert_eq!(apps.match_type_of(&fields::UE_ADDRESS), None);
        assert!(apps.accepts_action(&actions::SET_APP_ID));
        assert!(!apps.accepts_action(&actions::LOAD_TUNNEL_PARAM));
    }

    #[test]
    fn test_check_match_key() {
        use up4_pi::PiFieldMatch;
        use up4_types::ByteSequence;

        let apps = table_for(UpfEntityType::Application).unwrap();
        let proto = PiFieldMatch::ternary(
            fields::APP_IP_PROTO,
            ByteSequence::from_u8(6),
            ByteSequence::ones(1),
        );
        let key = PiMatchKey::builder().add_field_match(proto).build();
        assert_eq!(apps.check_match_key(&key), Ok(()));
        assert_eq!(apps.check_match_key(&PiMatchKey::default()), Ok(()));

        let exact_proto = PiFieldMatch::exact(fields::APP_IP_PROTO, ByteSequence::from_u8(6));
        let key = PiMatchKey::builder().add_field_match(exact_proto).build();
        assert_eq!(
            apps.check_match_key(&key),
            Err(MatchKeyError::WrongMatchType {
                field: fields::APP_IP_PROTO,
                expected: PiMatchType::Ternary,
                actual: PiMatchType::Exact,
            })
        );

        let foreign = PiFieldMatch::exact(fields::TEID, ByteSequence::from_u32(1));
        let key = PiMatchKey::builder().add_field_match(foreign).build();
        assert_eq!(
            apps.check_match_key(&key),
            Err(MatchKeyError::UnknownField {
                table: tables::APPLICATIONS,
                field: fields::TEID,
            })
        );
    }
}
