//! Bidirectional translation between UP4 table entries and UPF entities.
//!
//! The UP4 pipeline exposes the user plane as a handful of P4 tables and two
//! counter banks. This crate classifies device entities into UPF entity kinds,
//! decodes table entries into typed [`UpfEntity`] values and encodes entities
//! back into the table entries that program them.
//!
//! # Key Components
//!
//! - [`classify`]: table entry or counter cell to [`UpfEntityType`]
//! - [`decode`]: [`PiTableEntry`] to [`UpfEntity`]
//! - [`encode`]: [`UpfEntity`] to [`EncodedEntry`]
//! - [`p4info`]: the pipeline's tables, fields, actions and parameters
//!
//! # Example
//!
//! ```
//! use up4_translator::{PipelineTranslator, Up4Translator};
//! use up4_types::Ipv4Address;
//! use up4_upf::{UpfEntity, UpfGtpTunnelPeer};
//!
//! let peer = UpfGtpTunnelPeer::builder()
//!     .with_tunnel_peer_id(5)
//!     .with_src_addr(Ipv4Address::new(10, 0, 0, 1))
//!     .with_dst_addr(Ipv4Address::new(10, 0, 0, 2))
//!     .with_src_port(2152)
//!     .build()
//!     .unwrap();
//! let entity = UpfEntity::from(peer);
//!
//! let translator = PipelineTranslator;
//! let encoded = translator.encode(&entity).unwrap();
//! assert_eq!(translator.decode(&encoded.entry).unwrap(), entity);
//! ```

mod classify;
mod decode;
mod encode;
mod error;
pub mod p4info;
mod util;

pub use classify::{classify, classify_counter_cell, classify_table_entry};
pub use decode::decode;
pub use encode::{encode, EncodeAdvisory, EncodedEntry};
pub use error::{TranslationInput, TranslationResult, Up4TranslationError};
pub use util::FieldError;

use up4_pi::{PiEntity, PiTableEntry};
use up4_upf::{UpfEntity, UpfEntityType};

/// Translation between device entities and UPF entities.
pub trait Up4Translator {
    /// Returns the UPF entity kind of a device entity, if it has one.
    fn entity_type(&self, entity: &PiEntity) -> Option<UpfEntityType>;

    /// Returns true if the device entity belongs to the UP4 pipeline.
    fn is_up4_entity(&self, entity: &PiEntity) -> bool {
        self.entity_type(entity).is_some()
    }

    fn decode(&self, entry: &PiTableEntry) -> TranslationResult<UpfEntity>;

    fn encode(&self, entity: &UpfEntity) -> TranslationResult<EncodedEntry>;
}

/// Translator for the UP4 pipeline as described by [`p4info`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineTranslator;

impl Up4Translator for PipelineTranslator {
    fn entity_type(&self, entity: &PiEntity) -> Option<UpfEntityType> {
        classify(entity)
    }

    fn decode(&self, entry: &PiTableEntry) -> TranslationResult<UpfEntity> {
        decode(entry)
    }

    fn encode(&self, entity: &UpfEntity) -> TranslationResult<EncodedEntry> {
        encode(entity)
    }
}
