//! UPF interfaces.

use serde::{Deserialize, Serialize};
use std::fmt;
use up4_types::Ip4Prefix;

use crate::{UpfEntityError, UpfEntityType, SLICE_MOBILE};

/// Role of an interface prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpfInterfaceType {
    #[default]
    Unknown,
    /// Access side (N3): uplink traffic arrives here.
    Access,
    /// Core side (N6): downlink traffic arrives here.
    Core,
    /// Downlink buffering service.
    Dbuf,
}

impl fmt::Display for UpfInterfaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "UNKNOWN"),
            Self::Access => write!(f, "ACCESS"),
            Self::Core => write!(f, "CORE"),
            Self::Dbuf => write!(f, "DBUF"),
        }
    }
}

/// An IPv4 prefix owned by the UPF on the access or core side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpfInterface {
    pub prefix: Ip4Prefix,
    pub interface_type: UpfInterfaceType,
    pub slice_id: u8,
}

impl UpfInterface {
    pub fn builder() -> UpfInterfaceBuilder {
        UpfInterfaceBuilder::default()
    }

    pub fn is_access(&self) -> bool {
        self.interface_type == UpfInterfaceType::Access
    }

    pub fn is_core(&self) -> bool {
        self.interface_type == UpfInterfaceType::Core
    }

    pub fn is_dbuf_receiver(&self) -> bool {
        self.interface_type == UpfInterfaceType::Dbuf
    }
}

impl fmt::Display for UpfInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Interface(prefix={}, type={}, slice_id={})",
            self.prefix, self.interface_type, self.slice_id
        )
    }
}

#[derive(Debug, Clone)]
pub struct UpfInterfaceBuilder {
    prefix: Option<Ip4Prefix>,
    interface_type: UpfInterfaceType,
    slice_id: u8,
}

impl Default for UpfInterfaceBuilder {
    fn default() -> Self {
        Self {
            prefix: None,
            interface_type: UpfInterfaceType::Unknown,
            slice_id: SLICE_MOBILE,
        }
    }
}

impl UpfInterfaceBuilder {
    pub fn with_prefix(mut self, prefix: Ip4Prefix) -> Self {
        self.prefix = Some(prefix);
        self
    }

    pub fn with_type(mut self, interface_type: UpfInterfaceType) -> Self {
        self.interface_type = interface_type;
        self
    }

    pub fn set_access(self) -> Self {
        self.with_type(UpfInterfaceType::Access)
    }

    pub fn set_core(self) -> Self {
        self.with_type(UpfInterfaceType::Core)
    }

    pub fn set_dbuf_receiver(self) -> Self {
        self.with_type(UpfInterfaceType::Dbuf)
    }

    pub fn with_slice_id(mut self, slice_id: u8) -> Self {
        self.slice_id = slice_id;
        self
    }

    pub fn build(self) -> Result<UpfInterface, UpfEntityError> {
        let prefix = self
            .prefix
            .ok_or_else(|| UpfEntityError::missing(UpfEntityType::Interface, "prefix"))?;
        Ok(UpfInterface {
            prefix,
            interface_type: self.interface_type,
            slice_id: self.slice_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_build_access() {
        let iface = UpfInterface::builder()
            .with_prefix("140.0.100.254/32".parse().unwrap())
            .set_access()
            .build()
            .unwrap();
        assert!(iface.is_access());
        assert!(!iface.is_core());
        assert_eq!(iface.slice_id, SLICE_MOBILE);
        assert_eq!(
            iface.to_string(),
            "Interface(prefix=140.0.100.254/32, type=ACCESS, slice_id=0)"
        );
    }

    #[test]
    fn test_default_type_is_unknown() {
        let iface = UpfInterface::builder()
            .with_prefix("17.0.0.0/24".parse().unwrap())
            .build()
            .unwrap();
        assert_eq!(iface.interface_type, UpfInterfaceType::Unknown);
        assert!(!iface.is_access() && !iface.is_core());
    }

    #[test]
    fn test_prefix_required() {
        assert_eq!(
            UpfInterface::builder().set_core().build(),
            Err(UpfEntityError::missing(UpfEntityType::Interface, "prefix"))
        );
    }
}
