//! Typed readers for match fields and action parameters of a table entry.

use std::ops::RangeInclusive;

use thiserror::Error;
use up4_pi::{
    PiAction, PiActionParamId, PiMatchFieldId, PiMatchType, PiMatchValue, PiTableEntry,
};
use up4_types::{ByteSequence, ByteSequenceError, Ip4Prefix, Ipv4Address};

/// Why a field or parameter could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("missing match field '{0}'")]
    MissingField(PiMatchFieldId),

    #[error("match field '{field}' is {actual}, expected {expected}")]
    WrongMatchType {
        field: PiMatchFieldId,
        expected: PiMatchType,
        actual: PiMatchType,
    },

    #[error("missing action parameter '{0}'")]
    MissingParam(PiActionParamId),

    #[error("table entry has no action")]
    MissingAction,

    #[error("table entry has no priority")]
    MissingPriority,

    #[error("invalid value for '{name}': {source}")]
    InvalidValue {
        name: String,
        #[source]
        source: ByteSequenceError,
    },

    #[error("invalid prefix length {prefix_len} for '{field}'")]
    InvalidPrefixLength {
        field: PiMatchFieldId,
        prefix_len: u32,
    },

    #[error("ternary match '{field}' has a partial mask {mask}")]
    PartialMask {
        field: PiMatchFieldId,
        mask: ByteSequence,
    },

    #[error("range match '{field}' is empty ({low}..={high})")]
    EmptyRange {
        field: PiMatchFieldId,
        low: u16,
        high: u16,
    },
}

fn invalid(name: &impl ToString) -> impl FnOnce(ByteSequenceError) -> FieldError + '_ {
    move |source| FieldError::InvalidValue {
        name: name.to_string(),
        source,
    }
}

/// Returns true if the entry's match key has the given field.
pub fn field_is_present(entry: &PiTableEntry, field: &PiMatchFieldId) -> bool {
    entry.match_key().contains(field)
}

fn field_value<'a>(
    entry: &'a PiTableEntry,
    field: &PiMatchFieldId,
    expected: PiMatchType,
) -> Result<&'a PiMatchValue, FieldError> {
    let field_match = entry
        .match_key()
        .field_match(field)
        .ok_or_else(|| FieldError::MissingField(field.clone()))?;
    if field_match.match_type() != expected {
        return Err(FieldError::WrongMatchType {
            field: field.clone(),
            expected,
            actual: field_match.match_type(),
        });
    }
    Ok(&field_match.value)
}

fn field_exact<'a>(
    entry: &'a PiTableEntry,
    field: &PiMatchFieldId,
) -> Result<&'a ByteSequence, FieldError> {
    match field_value(entry, field, PiMatchType::Exact)? {
        PiMatchValue::Exact { value } => Ok(value),
        other => Err(FieldError::WrongMatchType {
            field: field.clone(),
            expected: PiMatchType::Exact,
            actual: other.match_type(),
        }),
    }
}

pub fn field_u8(entry: &PiTableEntry, field: &PiMatchFieldId) -> Result<u8, FieldError> {
    field_exact(entry, field)?.to_u8().map_err(invalid(field))
}

pub fn field_u32(entry: &PiTableEntry, field: &PiMatchFieldId) -> Result<u32, FieldError> {
    field_exact(entry, field)?.to_u32().map_err(invalid(field))
}

pub fn field_address(
    entry: &PiTableEntry,
    field: &PiMatchFieldId,
) -> Result<Ipv4Address, FieldError> {
    field_exact(entry, field)?.to_ipv4().map_err(invalid(field))
}

/// Reads a longest-prefix match as an IPv4 prefix.
pub fn field_prefix(entry: &PiTableEntry, field: &PiMatchFieldId) -> Result<Ip4Prefix, FieldError> {
    let (value, prefix_len) = match field_value(entry, field, PiMatchType::Lpm)? {
        PiMatchValue::Lpm { value, prefix_len } => (value, *prefix_len),
        other => {
            return Err(FieldError::WrongMatchType {
                field: field.clone(),
                expected: PiMatchType::Lpm,
                actual: other.match_type(),
            })
        }
    };
    let address = value.to_ipv4().map_err(invalid(field))?;
    let bad_len = || FieldError::InvalidPrefixLength {
        field: field.clone(),
        prefix_len,
    };
    let len = u8::try_from(prefix_len).map_err(|_| bad_len())?;
    Ip4Prefix::new(address, len).map_err(|_| bad_len())
}

/// Reads a range match of 16-bit values (e.g. L4 ports).
pub fn field_range_u16(
    entry: &PiTableEntry,
    field: &PiMatchFieldId,
) -> Result<RangeInclusive<u16>, FieldError> {
    let (low, high) = match field_value(entry, field, PiMatchType::Range)? {
        PiMatchValue::Range { low, high } => (low, high),
        other => {
            return Err(FieldError::WrongMatchType {
                field: field.clone(),
                expected: PiMatchType::Range,
                actual: other.match_type(),
            })
        }
    };
    let low = low.to_u16().map_err(invalid(field))?;
    let high = high.to_u16().map_err(invalid(field))?;
    if low > high {
        return Err(FieldError::EmptyRange {
            field: field.clone(),
            low,
            high,
        });
    }
    Ok(low..=high)
}

/// Reads an exact-value ternary match (all mask bits set) of a byte field.
pub fn field_ternary_u8(entry: &PiTableEntry, field: &PiMatchFieldId) -> Result<u8, FieldError> {
    let (value, mask) = match field_value(entry, field, PiMatchType::Ternary)? {
        PiMatchValue::Ternary { value, mask } => (value, mask),
        other => {
            return Err(FieldError::WrongMatchType {
                field: field.clone(),
                expected: PiMatchType::Ternary,
                actual: other.match_type(),
            })
        }
    };
    if mask.to_u8().map_err(invalid(field))? != u8::MAX {
        return Err(FieldError::PartialMask {
            field: field.clone(),
            mask: mask.clone(),
        });
    }
    value.to_u8().map_err(invalid(field))
}

pub fn action(entry: &PiTableEntry) -> Result<&PiAction, FieldError> {
    entry.action().ok_or(FieldError::MissingAction)
}

fn param<'a>(action: &'a PiAction, id: &PiActionParamId) -> Result<&'a ByteSequence, FieldError> {
    action
        .param(id)
        .map(|p| &p.value)
        .ok_or_else(|| FieldError::MissingParam(id.clone()))
}

pub fn param_u8(action: &PiAction, id: &PiActionParamId) -> Result<u8, FieldError> {
    param(action, id)?.to_u8().map_err(invalid(id))
}

pub fn param_u16(action: &PiAction, id: &PiActionParamId) -> Result<u16, FieldError> {
    param(action, id)?.to_u16().map_err(invalid(id))
}

pub fn param_u32(action: &PiAction, id: &PiActionParamId) -> Result<u32, FieldError> {
    param(action, id)?.to_u32().map_err(invalid(id))
}

pub fn param_address(action: &PiAction, id: &PiActionParamId) -> Result<Ipv4Address, FieldError> {
    param(action, id)?.to_ipv4().map_err(invalid(id))
}

pub fn priority(entry: &PiTableEntry) -> Result<i32, FieldError> {
    entry.priority().ok_or(FieldError::MissingPriority)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use up4_pi::{PiActionId, PiActionParam, PiFieldMatch, PiMatchKey, PiTableId};

    const PORT: PiMatchFieldId = PiMatchFieldId::of("app_l4_port");
    const PROTO: PiMatchFieldId = PiMatchFieldId::of("app_ip_proto");
    const PREFIX: PiMatchFieldId = PiMatchFieldId::of("app_ip_addr");
    const TEID: PiActionParamId = PiActionParamId::of("teid");

    fn entry_with(matches: Vec<PiFieldMatch>) -> PiTableEntry {
        let key = matches
            .into_iter()
            .fold(PiMatchKey::builder(), |b, m| b.add_field_match(m))
            .build();
        PiTableEntry::builder()
            .for_table(PiTableId::of("PreQosPipe.applications"))
            .with_match_key(key)
            .with_action(
                PiAction::builder()
                    .with_id(PiActionId::of("PreQosPipe.set_app_id"))
                    .with_parameter(PiActionParam::new(TEID, ByteSequence::copy_from(&[1, 0])))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_wrong_match_type() {
        let entry = entry_with(vec![PiFieldMatch::exact(PORT, ByteSequence::from_u16(80))]);
        assert_eq!(
            field_range_u16(&entry, &PORT),
            Err(FieldError::WrongMatchType {
                field: PORT,
                expected: PiMatchType::Range,
                actual: PiMatchType::Exact,
            })
        );
    }

    #[test]
    fn test_missing_field() {
        let entry = entry_with(vec![]);
        assert!(!field_is_present(&entry, &PORT));
        assert_eq!(field_u8(&entry, &PORT), Err(FieldError::MissingField(PORT)));
    }

    #[test]
    fn test_prefix() {
        let entry = entry_with(vec![PiFieldMatch::lpm(
            PREFIX,
            ByteSequence::from_ipv4(&Ipv4Address::new(10, 20, 0, 0)),
            16,
        )]);
        assert_eq!(
            field_prefix(&entry, &PREFIX).unwrap(),
            "10.20.0.0/16".parse::<Ip4Prefix>().unwrap()
        );

        let too_long = entry_with(vec![PiFieldMatch::lpm(PREFIX, ByteSequence::from_u32(0), 40)]);
        assert_eq!(
            field_prefix(&too_long, &PREFIX),
            Err(FieldError::InvalidPrefixLength {
                field: PREFIX,
                prefix_len: 40
            })
        );
    }

    #[test]
    fn test_range() {
        let entry = entry_with(vec![PiFieldMatch::range(
            PORT,
            ByteSequence::from_u16(80),
            ByteSequence::from_u16(443),
        )]);
        assert_eq!(field_range_u16(&entry, &PORT).unwrap(), 80..=443);

        let reversed = entry_with(vec![PiFieldMatch::range(
            PORT,
            ByteSequence::from_u16(443),
            ByteSequence::from_u16(80),
        )]);
        assert!(matches!(
            field_range_u16(&reversed, &PORT),
            Err(FieldError::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_ternary_requires_full_mask() {
        let exact = entry_with(vec![PiFieldMatch::ternary(
            PROTO,
            ByteSequence::from_u8(17),
            ByteSequence::ones(1),
        )]);
        assert_eq!(field_ternary_u8(&exact, &PROTO).unwrap(), 17);

        let wildcard = entry_with(vec![PiFieldMatch::ternary(
            PROTO,
            ByteSequence::from_u8(17),
            ByteSequence::from_u8(0x0f),
        )]);
        assert_eq!(
            field_ternary_u8(&wildcard, &PROTO),
            Err(FieldError::PartialMask {
                field: PROTO,
                mask: ByteSequence::from_u8(0x0f)
            })
        );
    }

    #[test]
    fn test_params() {
        let entry = entry_with(vec![]);
        let action = action(&entry).unwrap();
        assert_eq!(param_u32(action, &TEID).unwrap(), 256);
        assert_eq!(param_u16(action, &TEID).unwrap(), 256);
        assert!(matches!(
            param_u8(action, &TEID),
            Err(FieldError::InvalidValue { .. })
        ));
        assert_eq!(
            param_u8(action, &PiActionParamId::of("qfi")),
            Err(FieldError::MissingParam(PiActionParamId::of("qfi")))
        );
        assert_eq!(priority(&entry), Err(FieldError::MissingPriority));
    }
}
