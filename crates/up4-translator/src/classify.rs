//! Classification of device entities into UPF entity kinds.

use tracing::trace;
use up4_pi::{PiCounterCell, PiEntity, PiTableEntry};
use up4_upf::UpfEntityType;

use crate::p4info::{is_upf_counter, table_by_id};

/// Returns the UPF entity kind a device entity represents, or `None` if it
/// belongs to neither a UP4 table nor a UPF counter bank.
///
/// Only the table or counter identifier is inspected; the entry itself may
/// still fail to decode.
pub fn classify(entity: &PiEntity) -> Option<UpfEntityType> {
    let kind = match entity {
        PiEntity::TableEntry(entry) => classify_table_entry(entry),
        PiEntity::CounterCell(cell) => classify_counter_cell(cell),
    };
    trace!(entity = %entity, kind = ?kind, "classified entity");
    kind
}

pub fn classify_table_entry(entry: &PiTableEntry) -> Option<UpfEntityType> {
    table_by_id(entry.table()).map(|info| info.entity_type)
}

pub fn classify_counter_cell(cell: &PiCounterCell) -> Option<UpfEntityType> {
    is_upf_counter(&cell.counter_id).then_some(UpfEntityType::Counter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::p4info::{counters, tables, TABLES};
    use pretty_assertions::assert_eq;
    use up4_pi::{PiCounterId, PiTableId};

    fn entry_for(table: PiTableId) -> PiEntity {
        PiTableEntry::builder()
            .for_table(table)
            .build()
            .unwrap()
            .into()
    }

    #[test]
    fn test_every_table_classifies() {
        for info in TABLES.iter() {
            assert_eq!(
                classify(&entry_for(info.table.clone())),
                Some(info.entity_type)
            );
        }
        assert_eq!(
            classify(&entry_for(tables::TUNNEL_PEERS)),
            Some(UpfEntityType::TunnelPeer)
        );
    }

    #[test]
    fn test_counter_cells() {
        let pre = PiCounterCell::new(counters::PRE_QOS_COUNTER, 7);
        let post = PiCounterCell::new(counters::POST_QOS_COUNTER, 7);
        assert_eq!(classify(&pre.into()), Some(UpfEntityType::Counter));
        assert_eq!(classify(&post.into()), Some(UpfEntityType::Counter));
    }

    #[test]
    fn test_unknown_ids() {
        assert_eq!(classify(&entry_for(PiTableId::of("FabricIngress.acl"))), None);
        let cell = PiCounterCell::new(PiCounterId::of("FabricIngress.acl_counter"), 1);
        assert_eq!(classify(&cell.into()), None);
    }
}
