//! Error types for UP4 translation.

use std::fmt;
use thiserror::Error;
use up4_pi::PiTableEntry;
use up4_upf::UpfEntity;

/// Result type alias for translation operations.
pub type TranslationResult<T> = Result<T, Up4TranslationError>;

/// The value a failed translation was asked to translate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationInput {
    TableEntry(Box<PiTableEntry>),
    Entity(Box<UpfEntity>),
}

impl fmt::Display for TranslationInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TableEntry(entry) => write!(f, "{}", entry),
            Self::Entity(entity) => write!(f, "{}", entity),
        }
    }
}

/// Errors that can occur while translating between table entries and UPF
/// entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Up4TranslationError {
    /// The input has no translation: unknown table, missing or malformed
    /// field, unknown action, or an entity whose state has no table entry.
    #[error("Unsupported UP4 entity: {reason}: {input}")]
    UnsupportedEntity {
        /// What made the input untranslatable.
        reason: String,
        /// The offending input.
        input: TranslationInput,
    },
}

impl Up4TranslationError {
    /// Creates an error for a table entry that cannot be decoded.
    pub fn unsupported_entry(reason: impl Into<String>, entry: &PiTableEntry) -> Self {
        Self::UnsupportedEntity {
            reason: reason.into(),
            input: TranslationInput::TableEntry(Box::new(entry.clone())),
        }
    }

    /// Creates an error for a UPF entity that cannot be encoded.
    pub fn unsupported_entity(reason: impl Into<String>, entity: &UpfEntity) -> Self {
        Self::UnsupportedEntity {
            reason: reason.into(),
            input: TranslationInput::Entity(Box::new(entity.clone())),
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::UnsupportedEntity { reason, .. } => reason,
        }
    }

    pub fn input(&self) -> &TranslationInput {
        match self {
            Self::UnsupportedEntity { input, .. } => input,
        }
    }
}
