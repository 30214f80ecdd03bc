//! Match keys and per-field matches.

use serde::{Deserialize, Serialize};
use std::fmt;
use up4_types::ByteSequence;

use crate::PiMatchFieldId;

/// Comparison semantics of a match field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PiMatchType {
    Exact,
    Lpm,
    Ternary,
    Range,
}

impl fmt::Display for PiMatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "EXACT"),
            Self::Lpm => write!(f, "LPM"),
            Self::Ternary => write!(f, "TERNARY"),
            Self::Range => write!(f, "RANGE"),
        }
    }
}

/// The value side of a field match, tagged with its match kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PiMatchValue {
    Exact {
        value: ByteSequence,
    },
    Lpm {
        value: ByteSequence,
        prefix_len: u32,
    },
    Ternary {
        value: ByteSequence,
        mask: ByteSequence,
    },
    Range {
        low: ByteSequence,
        high: ByteSequence,
    },
}

impl PiMatchValue {
    pub fn match_type(&self) -> PiMatchType {
        match self {
            Self::Exact { .. } => PiMatchType::Exact,
            Self::Lpm { .. } => PiMatchType::Lpm,
            Self::Ternary { .. } => PiMatchType::Ternary,
            Self::Range { .. } => PiMatchType::Range,
        }
    }
}

impl fmt::Display for PiMatchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact { value } => write!(f, "{}", value),
            Self::Lpm { value, prefix_len } => write!(f, "{}/{}", value, prefix_len),
            Self::Ternary { value, mask } => write!(f, "{}&&&{}", value, mask),
            Self::Range { low, high } => write!(f, "{}..{}", low, high),
        }
    }
}

/// A match on a single field of a table's match key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PiFieldMatch {
    /// Match field identifier.
    pub field_id: PiMatchFieldId,
    /// Match value.
    #[serde(flatten)]
    pub value: PiMatchValue,
}

impl PiFieldMatch {
    /// Creates a new field match.
    pub fn new(field_id: PiMatchFieldId, value: PiMatchValue) -> Self {
        Self { field_id, value }
    }

    /// Creates an exact match.
    pub fn exact(field_id: PiMatchFieldId, value: ByteSequence) -> Self {
        Self::new(field_id, PiMatchValue::Exact { value })
    }

    /// Creates a longest-prefix match.
    pub fn lpm(field_id: PiMatchFieldId, value: ByteSequence, prefix_len: u32) -> Self {
        Self::new(field_id, PiMatchValue::Lpm { value, prefix_len })
    }

    /// Creates a ternary (value and mask) match.
    pub fn ternary(field_id: PiMatchFieldId, value: ByteSequence, mask: ByteSequence) -> Self {
        Self::new(field_id, PiMatchValue::Ternary { value, mask })
    }

    /// Creates an inclusive range match.
    pub fn range(field_id: PiMatchFieldId, low: ByteSequence, high: ByteSequence) -> Self {
        Self::new(field_id, PiMatchValue::Range { low, high })
    }

    pub fn match_type(&self) -> PiMatchType {
        self.value.match_type()
    }
}

impl fmt::Display for PiFieldMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field_id, self.value)
    }
}

/// The match key of a table entry.
///
/// Field matches keep their insertion order. A key holds at most one match
/// per field; adding a second one replaces the first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PiMatchKey {
    field_matches: Vec<PiFieldMatch>,
}

impl PiMatchKey {
    pub fn builder() -> PiMatchKeyBuilder {
        PiMatchKeyBuilder::default()
    }

    /// Returns the match on the given field, if present.
    pub fn field_match(&self, field_id: &PiMatchFieldId) -> Option<&PiFieldMatch> {
        self.field_matches.iter().find(|m| &m.field_id == field_id)
    }

    /// Returns true if the key carries a match on the given field.
    pub fn contains(&self, field_id: &PiMatchFieldId) -> bool {
        self.field_match(field_id).is_some()
    }

    pub fn field_matches(&self) -> &[PiFieldMatch] {
        &self.field_matches
    }

    pub fn len(&self) -> usize {
        self.field_matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_matches.is_empty()
    }

    fn insert(&mut self, field_match: PiFieldMatch) {
        match self
            .field_matches
            .iter_mut()
            .find(|m| m.field_id == field_match.field_id)
        {
            Some(existing) => *existing = field_match,
            None => self.field_matches.push(field_match),
        }
    }
}

impl fmt::Display for PiMatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, m) in self.field_matches.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", m)?;
        }
        write!(f, "}}")
    }
}

/// Builder for match keys.
#[derive(Debug, Clone, Default)]
pub struct PiMatchKeyBuilder {
    key: PiMatchKey,
}

impl PiMatchKeyBuilder {
    /// Adds a field match, replacing any previous match on the same field.
    pub fn add_field_match(mut self, field_match: PiFieldMatch) -> Self {
        self.key.insert(field_match);
        self
    }

    pub fn build(self) -> PiMatchKey {
        self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const UE_ADDRESS: PiMatchFieldId = PiMatchFieldId::of("ue_address");
    const APP_ID: PiMatchFieldId = PiMatchFieldId::of("app_id");

    #[test]
    fn test_builder_keeps_order() {
        let key = PiMatchKey::builder()
            .add_field_match(PiFieldMatch::exact(
                UE_ADDRESS,
                ByteSequence::from_u32(0x11000001),
            ))
            .add_field_match(PiFieldMatch::exact(APP_ID, ByteSequence::from_u8(3)))
            .build();

        let ids: Vec<&str> = key.field_matches().iter().map(|m| m.field_id.name()).collect();
        assert_eq!(ids, vec!["ue_address", "app_id"]);
        assert!(key.contains(&APP_ID));
        assert!(!key.contains(&PiMatchFieldId::of("teid")));
    }

    #[test]
    fn test_builder_replaces_duplicate_field() {
        let key = PiMatchKey::builder()
            .add_field_match(PiFieldMatch::exact(APP_ID, ByteSequence::from_u8(3)))
            .add_field_match(PiFieldMatch::exact(APP_ID, ByteSequence::from_u8(4)))
            .build();

        assert_eq!(key.len(), 1);
        assert_eq!(
            key.field_match(&APP_ID).map(|m| &m.value),
            Some(&PiMatchValue::Exact {
                value: ByteSequence::from_u8(4)
            })
        );
    }

    #[test]
    fn test_match_types() {
        let lpm = PiFieldMatch::lpm(UE_ADDRESS, ByteSequence::from_u32(0), 8);
        let ternary =
            PiFieldMatch::ternary(APP_ID, ByteSequence::from_u8(6), ByteSequence::ones(1));
        let range = PiFieldMatch::range(
            APP_ID,
            ByteSequence::from_u16(80),
            ByteSequence::from_u16(8080),
        );
        assert_eq!(lpm.match_type(), PiMatchType::Lpm);
        assert_eq!(ternary.match_type(), PiMatchType::Ternary);
        assert_eq!(range.match_type(), PiMatchType::Range);
    }

    #[test]
    fn test_display() {
        let key = PiMatchKey::builder()
            .add_field_match(PiFieldMatch::lpm(
                UE_ADDRESS,
                ByteSequence::from_u32(0x11000000),
                24,
            ))
            .add_field_match(PiFieldMatch::ternary(
                APP_ID,
                ByteSequence::from_u8(6),
                ByteSequence::ones(1),
            ))
            .build();
        assert_eq!(
            key.to_string(),
            "{ue_address=0x11000000/24, app_id=0x06&&&0xff}"
        );
    }

    #[test]
    fn test_serde_shape() {
        let m = PiFieldMatch::range(
            PiMatchFieldId::of("app_l4_port"),
            ByteSequence::from_u16(80),
            ByteSequence::from_u16(81),
        );
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "field_id": "app_l4_port",
                "type": "range",
                "low": "0x0050",
                "high": "0x0051"
            })
        );
        let back: PiFieldMatch = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }
}
