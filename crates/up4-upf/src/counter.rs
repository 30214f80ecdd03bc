//! Counter cells.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A UPF counter, identified by its cell index in the pre- and post-QoS
/// counter banks. Packet and byte values are read back by the southbound
/// and are not part of the translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpfCounter {
    pub cell_id: u32,
}

impl UpfCounter {
    pub fn new(cell_id: u32) -> Self {
        Self { cell_id }
    }
}

impl fmt::Display for UpfCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Counter(cell_id={})", self.cell_id)
    }
}
