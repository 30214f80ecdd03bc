//! Table entries, counter cells and the entities read back from a device.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{PiAction, PiBuildError, PiCounterId, PiMatchKey, PiTableId};

/// A P4 table entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PiTableEntry {
    table: PiTableId,
    #[serde(default)]
    match_key: PiMatchKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    priority: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action: Option<PiAction>,
}

impl PiTableEntry {
    pub fn builder() -> PiTableEntryBuilder {
        PiTableEntryBuilder::default()
    }

    pub fn table(&self) -> &PiTableId {
        &self.table
    }

    pub fn match_key(&self) -> &PiMatchKey {
        &self.match_key
    }

    /// Entry priority, only meaningful for tables with ternary or range matches.
    pub fn priority(&self) -> Option<i32> {
        self.priority
    }

    pub fn action(&self) -> Option<&PiAction> {
        self.action.as_ref()
    }
}

impl fmt::Display for PiTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} match={}", self.table, self.match_key)?;
        if let Some(priority) = self.priority {
            write!(f, " priority={}", priority)?;
        }
        match &self.action {
            Some(action) => write!(f, " action={}", action),
            None => write!(f, " action=<none>"),
        }
    }
}

/// Builder for table entries.
#[derive(Debug, Clone, Default)]
pub struct PiTableEntryBuilder {
    table: Option<PiTableId>,
    match_key: PiMatchKey,
    priority: Option<i32>,
    action: Option<PiAction>,
}

impl PiTableEntryBuilder {
    pub fn for_table(mut self, table: PiTableId) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_match_key(mut self, match_key: PiMatchKey) -> Self {
        self.match_key = match_key;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_action(mut self, action: PiAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn build(self) -> Result<PiTableEntry, PiBuildError> {
        let table = self.table.ok_or(PiBuildError::MissingTableId)?;
        Ok(PiTableEntry {
            table,
            match_key: self.match_key,
            priority: self.priority,
            action: self.action,
        })
    }
}

/// A cell of an indirect counter array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PiCounterCell {
    pub counter_id: PiCounterId,
    pub index: u64,
}

impl PiCounterCell {
    pub fn new(counter_id: PiCounterId, index: u64) -> Self {
        Self { counter_id, index }
    }
}

impl fmt::Display for PiCounterCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.counter_id, self.index)
    }
}

/// Kind of a [`PiEntity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PiEntityType {
    TableEntry,
    CounterCell,
}

impl fmt::Display for PiEntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TableEntry => write!(f, "TABLE_ENTRY"),
            Self::CounterCell => write!(f, "COUNTER_CELL"),
        }
    }
}

/// An entity exchanged with the device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiEntity {
    TableEntry(PiTableEntry),
    CounterCell(PiCounterCell),
}

impl PiEntity {
    pub fn entity_type(&self) -> PiEntityType {
        match self {
            Self::TableEntry(_) => PiEntityType::TableEntry,
            Self::CounterCell(_) => PiEntityType::CounterCell,
        }
    }
}

impl fmt::Display for PiEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TableEntry(entry) => write!(f, "{}", entry),
            Self::CounterCell(cell) => write!(f, "{}", cell),
        }
    }
}

impl From<PiTableEntry> for PiEntity {
    fn from(entry: PiTableEntry) -> Self {
        PiEntity::TableEntry(entry)
    }
}

impl From<PiCounterCell> for PiEntity {
    fn from(cell: PiCounterCell) -> Self {
        PiEntity::CounterCell(cell)
    }
}
