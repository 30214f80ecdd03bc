//! Protocol-independent (PI) runtime model for P4 table entries.
//!
//! These are the generic, weakly-typed values exchanged with a programmable
//! switch: a table entry names its table, carries a match key made of
//! per-field matches (exact, LPM, ternary or range) and an action with
//! byte-string parameters. Nothing here knows about UPF semantics; the
//! meaning of every identifier comes from the pipeline's P4Info.
//!
//! # Key Components
//!
//! - [`PiTableEntry`]: a table entry with match key, action and priority
//! - [`PiMatchKey`] / [`PiFieldMatch`]: the ordered set of field matches
//! - [`PiAction`] / [`PiActionParam`]: action identifier and parameters
//! - [`PiCounterCell`]: a single cell of an indirect counter
//! - [`PiEntity`]: either of the above, as read back from the device

mod action;
mod entry;
mod ids;
mod match_key;

pub use action::{PiAction, PiActionBuilder, PiActionParam};
pub use entry::{PiCounterCell, PiEntity, PiEntityType, PiTableEntry, PiTableEntryBuilder};
pub use ids::{PiActionId, PiActionParamId, PiCounterId, PiMatchFieldId, PiTableId};
pub use match_key::{PiFieldMatch, PiMatchKey, PiMatchKeyBuilder, PiMatchType, PiMatchValue};

/// Errors raised when building PI entities.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PiBuildError {
    #[error("table entry requires a table ID")]
    MissingTableId,

    #[error("action requires an action ID")]
    MissingActionId,
}
